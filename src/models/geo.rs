use serde::{Deserialize, Serialize};

/// GeoJSON-style geometry. Positions are `[longitude, latitude]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point([f64; 2]),
    MultiPoint(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryLevel {
    City,
    District,
    Neighborhood,
}

impl BoundaryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryLevel::City => "city",
            BoundaryLevel::District => "district",
            BoundaryLevel::Neighborhood => "neighborhood",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boundary {
    pub id: i64,
    pub name: String,
    pub level: BoundaryLevel,
    pub geometry: Geometry,
}

/// Lon/lat envelope of a geometry, used to frame map views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Compute the envelope of all positions in a geometry.
    /// Returns `None` for geometries with no positions (empty line/polygon).
    pub fn from_geometry(geometry: &Geometry) -> Option<Self> {
        let mut bbox: Option<BoundingBox> = None;
        for_each_position(geometry, |lon, lat| match bbox {
            Some(ref mut b) => b.extend(lon, lat),
            None => {
                bbox = Some(BoundingBox {
                    min_lon: lon,
                    min_lat: lat,
                    max_lon: lon,
                    max_lat: lat,
                })
            }
        });
        bbox
    }

    fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

fn for_each_position(geometry: &Geometry, mut f: impl FnMut(f64, f64)) {
    match geometry {
        Geometry::Point(p) => f(p[0], p[1]),
        Geometry::MultiPoint(points) => {
            for p in points {
                f(p[0], p[1]);
            }
        }
        Geometry::LineString(line) => {
            for p in line {
                f(p[0], p[1]);
            }
        }
        Geometry::MultiLineString(lines) => {
            for line in lines {
                for p in line {
                    f(p[0], p[1]);
                }
            }
        }
        Geometry::Polygon(rings) => {
            for ring in rings {
                for p in ring {
                    f(p[0], p[1]);
                }
            }
        }
        Geometry::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    for p in ring {
                        f(p[0], p[1]);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geojson_polygon() {
        let json = r#"{
            "type": "Polygon",
            "coordinates": [[[-8.65, 41.14], [-8.60, 41.14], [-8.60, 41.17], [-8.65, 41.17], [-8.65, 41.14]]]
        }"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to parse geometry");
        assert!(matches!(geometry, Geometry::Polygon(_)));
    }

    #[test]
    fn test_bounding_box_of_polygon() {
        let geometry = Geometry::Polygon(vec![vec![
            [-8.65, 41.14],
            [-8.60, 41.14],
            [-8.60, 41.17],
            [-8.65, 41.17],
            [-8.65, 41.14],
        ]]);

        let bbox = BoundingBox::from_geometry(&geometry).expect("polygon has positions");
        assert_eq!(bbox.min_lon, -8.65);
        assert_eq!(bbox.max_lon, -8.60);
        assert_eq!(bbox.min_lat, 41.14);
        assert_eq!(bbox.max_lat, 41.17);

        let (lon, lat) = bbox.center();
        assert!((lon - (-8.625)).abs() < 1e-9);
        assert!((lat - 41.155).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_of_multi_line_string() {
        let json = r#"{
            "type": "MultiLineString",
            "coordinates": [[[-8.65, 41.14], [-8.60, 41.15]], [[-8.63, 41.17], [-8.61, 41.16]]]
        }"#;
        let geometry: Geometry = serde_json::from_str(json).expect("Failed to parse geometry");

        let bbox = BoundingBox::from_geometry(&geometry).expect("lines have positions");
        assert_eq!(bbox.min_lon, -8.65);
        assert_eq!(bbox.max_lon, -8.60);
        assert_eq!(bbox.min_lat, 41.14);
        assert_eq!(bbox.max_lat, 41.17);
    }

    #[test]
    fn test_bounding_box_of_multi_point() {
        let geometry = Geometry::MultiPoint(vec![[-8.62, 41.15], [-8.64, 41.16]]);
        let bbox = BoundingBox::from_geometry(&geometry).unwrap();
        assert_eq!(bbox.min_lon, -8.64);
        assert_eq!(bbox.max_lat, 41.16);
    }

    #[test]
    fn test_bounding_box_of_point_is_degenerate() {
        let bbox = BoundingBox::from_geometry(&Geometry::Point([-8.61, 41.15])).unwrap();
        assert_eq!(bbox.min_lon, bbox.max_lon);
        assert_eq!(bbox.min_lat, bbox.max_lat);
    }

    #[test]
    fn test_empty_geometry_has_no_bbox() {
        assert!(BoundingBox::from_geometry(&Geometry::LineString(vec![])).is_none());
    }
}
