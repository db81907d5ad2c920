use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    /// Wire form of the status, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "Pending"),
            ReportStatus::InProgress => write!(f, "In Progress"),
            ReportStatus::Resolved => write!(f, "Resolved"),
            ReportStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: ReportStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "reporterId")]
    pub reporter_id: Option<i64>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Payload for creating a report; the backend assigns id and timestamps.
#[derive(Debug, Clone, Serialize)]
pub struct NewReport {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: u64,
    pub pending: u64,
    #[serde(rename = "inProgress")]
    pub in_progress: u64,
    pub resolved: u64,
    #[serde(default)]
    pub rejected: u64,
}

/// Query filter for report listings. Only set fields become query params.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub category: Option<String>,
    pub limit: Option<u32>,
}

impl ReportFilter {
    pub fn to_params(&self) -> Vec<(&'static str, Value)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", Value::from(status.as_str())));
        }
        if let Some(ref category) = self.category {
            params.push(("category", Value::from(category.as_str())));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", Value::from(limit)));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let json = r#"{
            "id": 417,
            "title": "Pothole on Main St",
            "description": "Deep pothole near the crosswalk",
            "category": "roads",
            "status": "in_progress",
            "latitude": 41.1579,
            "longitude": -8.6291,
            "reporterId": 88,
            "createdAt": "2025-05-02T09:13:00Z"
        }"#;

        let report: Report = serde_json::from_str(json).expect("Failed to parse report JSON");
        assert_eq!(report.id, 417);
        assert_eq!(report.status, ReportStatus::InProgress);
        assert_eq!(report.status.to_string(), "In Progress");
    }

    #[test]
    fn test_filter_params_only_include_set_fields() {
        let filter = ReportFilter {
            status: Some(ReportStatus::Pending),
            category: None,
            limit: Some(10),
        };
        let params = filter.to_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], ("status", Value::from("pending")));
        assert_eq!(params[1], ("limit", Value::from(10u32)));

        assert!(ReportFilter::default().to_params().is_empty());
    }
}
