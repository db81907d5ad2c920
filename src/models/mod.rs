//! Data models for CityLens backend resources.
//!
//! This module contains the data structures returned by the backend:
//!
//! - `CurrentWeather`, `ForecastDay`: weather observations and forecasts
//! - `AirQuality`: pollutant readings with AQI categorization
//! - `TrafficSegment`: road segment speeds and congestion levels
//! - `Report`, `ReportSummary`: civic issue reports and rollups
//! - `User`: accounts with role information
//! - `Boundary`, `Geometry`, `BoundingBox`: geographic boundary data

pub mod air;
pub mod geo;
pub mod report;
pub mod traffic;
pub mod user;
pub mod weather;

use serde::Deserialize;

use crate::api::ApiError;

pub use air::{AirQuality, AqiCategory};
pub use geo::{Boundary, BoundaryLevel, BoundingBox, Geometry};
pub use report::{NewReport, Report, ReportFilter, ReportStatus, ReportSummary};
pub use traffic::{CongestionLevel, TrafficSegment};
pub use user::{User, UserRole};
pub use weather::{CurrentWeather, ForecastDay};

/// Standard response envelope used by every backend endpoint:
/// `{"success": bool, "data": ..., "count": n, "message": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    // Option already deserializes a missing field as None; no serde(default)
    // here, it would force a T: Default bound on the derive.
    pub data: Option<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` or a missing body into
    /// an `ApiError::InvalidResponse`.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "backend reported failure".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("response envelope had no data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_unwraps_data() {
        let envelope: ApiEnvelope<Vec<i64>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3], "count": 3}"#)
                .expect("Failed to parse envelope");
        assert_eq!(envelope.count, Some(3));
        assert_eq!(envelope.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_parses_for_non_default_payloads() {
        // Report has no Default impl; the envelope must not require one,
        // and a missing data field must read as None.
        let envelope: ApiEnvelope<Report> =
            serde_json::from_str(r#"{"success": true, "message": "deleted"}"#)
                .expect("Failed to parse envelope");
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.into_data().is_err());
    }

    #[test]
    fn test_envelope_failure_becomes_error() {
        let envelope: ApiEnvelope<Vec<i64>> =
            serde_json::from_str(r#"{"success": false, "message": "bad filter"}"#)
                .expect("Failed to parse envelope");
        let err = envelope.into_data().unwrap_err();
        assert!(err.to_string().contains("bad filter"));
    }
}
