use std::fmt;

use serde_json::Value;

/// Cache key derived from an endpoint path and optional query parameters.
///
/// Parameters are sorted by name before serialization, so two requests that
/// pass the same parameters in a different order resolve to the same key.
/// Values are serialized as JSON, matching how the backend sees them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    /// Key for an endpoint with no parameters: the endpoint path verbatim.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            key: endpoint.into(),
        }
    }

    /// Key for an endpoint plus query parameters.
    ///
    /// Renders as `endpoint?k1=JSON(v1)&k2=JSON(v2)` with keys in
    /// lexicographic order. An empty parameter list is equivalent to `new`.
    pub fn from_parts(endpoint: &str, params: &[(&str, Value)]) -> Self {
        if params.is_empty() {
            return Self::new(endpoint);
        }

        let mut sorted: Vec<&(&str, Value)> = params.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let query: Vec<String> = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        Self {
            key: format!("{}?{}", endpoint, query.join("&")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_without_params_is_endpoint() {
        let key = CacheKey::new("/app/reports/");
        assert_eq!(key.as_str(), "/app/reports/");

        let empty = CacheKey::from_parts("/app/reports/", &[]);
        assert_eq!(empty, key);
    }

    #[test]
    fn test_key_params_are_sorted() {
        let a = CacheKey::from_parts("/app/reports/", &[("a", json!(1)), ("b", json!(2))]);
        let b = CacheKey::from_parts("/app/reports/", &[("b", json!(2)), ("a", json!(1))]);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "/app/reports/?a=1&b=2");
    }

    #[test]
    fn test_key_serializes_values_as_json() {
        let key = CacheKey::from_parts(
            "/app/reports/",
            &[("status", json!("pending")), ("limit", json!(10))],
        );
        // String values keep their JSON quoting
        assert_eq!(key.as_str(), "/app/reports/?limit=10&status=\"pending\"");
    }

    #[test]
    fn test_different_params_produce_different_keys() {
        let pending = CacheKey::from_parts("/app/reports/", &[("status", json!("pending"))]);
        let resolved = CacheKey::from_parts("/app/reports/", &[("status", json!("resolved"))]);
        assert_ne!(pending, resolved);
    }
}
