use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionLevel {
    FreeFlow,
    Moderate,
    Heavy,
    Severe,
}

impl std::fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CongestionLevel::FreeFlow => write!(f, "Free flow"),
            CongestionLevel::Moderate => write!(f, "Moderate"),
            CongestionLevel::Heavy => write!(f, "Heavy"),
            CongestionLevel::Severe => write!(f, "Severe"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficSegment {
    pub id: i64,
    pub name: String,
    pub region: Option<String>,
    #[serde(rename = "speedKph")]
    pub speed_kph: f64,
    #[serde(rename = "freeFlowKph")]
    pub free_flow_kph: f64,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

impl TrafficSegment {
    /// Current speed as a fraction of free-flow speed, clamped to [0, 1].
    pub fn flow_ratio(&self) -> f64 {
        if self.free_flow_kph <= 0.0 {
            return 1.0;
        }
        (self.speed_kph / self.free_flow_kph).clamp(0.0, 1.0)
    }

    pub fn congestion(&self) -> CongestionLevel {
        let ratio = self.flow_ratio();
        if ratio >= 0.8 {
            CongestionLevel::FreeFlow
        } else if ratio >= 0.5 {
            CongestionLevel::Moderate
        } else if ratio >= 0.25 {
            CongestionLevel::Heavy
        } else {
            CongestionLevel::Severe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(speed: f64, free_flow: f64) -> TrafficSegment {
        TrafficSegment {
            id: 1,
            name: "Av. da República".to_string(),
            region: Some("center".to_string()),
            speed_kph: speed,
            free_flow_kph: free_flow,
            updated_at: None,
        }
    }

    #[test]
    fn test_congestion_levels() {
        assert_eq!(segment(55.0, 60.0).congestion(), CongestionLevel::FreeFlow);
        assert_eq!(segment(35.0, 60.0).congestion(), CongestionLevel::Moderate);
        assert_eq!(segment(20.0, 60.0).congestion(), CongestionLevel::Heavy);
        assert_eq!(segment(5.0, 60.0).congestion(), CongestionLevel::Severe);
    }

    #[test]
    fn test_flow_ratio_handles_missing_free_flow() {
        // Zero free-flow speed would divide by zero; treat as free flow
        assert_eq!(segment(30.0, 0.0).flow_ratio(), 1.0);
    }
}
