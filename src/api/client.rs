//! API client for communicating with the CityLens REST backend.
//!
//! This module provides the `CityLensClient` struct for fetching weather,
//! air quality, traffic, civic report, user, and boundary data, and for
//! submitting report/user mutations.
//!
//! Read endpoints go through an in-memory request cache; every successful
//! mutation invalidates the cached entries for its resource prefix so
//! subsequent reads are forced to refetch.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;
use regex::Regex;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStats, RequestCache};
use crate::models::{
    AirQuality, ApiEnvelope, Boundary, BoundaryLevel, CurrentWeather, ForecastDay, NewReport,
    Report, ReportFilter, ReportStatus, ReportSummary, TrafficSegment, User, UserRole,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// TTL for list endpoints (reports, users, traffic segments).
/// Lists change often enough that 2 minutes is the longest safe window.
const LIST_TTL_MINUTES: i64 = 2;

/// TTL for summary/rollup endpoints.
const SUMMARY_TTL_MINUTES: i64 = 3;

/// TTL for current weather and air quality observations.
/// Stations report every few minutes; 5 minutes matches their cadence.
const CONDITIONS_TTL_MINUTES: i64 = 5;

/// TTL for geographic boundaries, which change rarely.
const BOUNDARY_TTL_MINUTES: i64 = 30;

/// API client for the CityLens backend.
///
/// The client owns its request cache (an injected instance, not a global)
/// behind a mutex: cache reads and writes are short synchronous critical
/// sections, never held across a network await.
pub struct CityLensClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    cache: Mutex<RequestCache>,
}

impl CityLensClient {
    /// Create a new client against the given base URL with a fresh cache.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_cache(base_url, RequestCache::new())
    }

    /// Create a client with a caller-supplied cache instance.
    pub fn with_cache(base_url: impl Into<String>, cache: RequestCache) -> Result<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
            cache: Mutex::new(cache),
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn cache(&self) -> MutexGuard<'_, RequestCache> {
        // A poisoned lock only means a panic elsewhere; the cache data is
        // still structurally sound, so recover it.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Send a request, retrying with exponential backoff when rate limited.
    async fn send_with_retry<F>(&self, endpoint: &str, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&Client) -> reqwest::RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = build(&self.client)
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send request to {}", endpoint))?;

            if response.status().as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(ApiError::RateLimited.into());
                }
                warn!(endpoint, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(StdDuration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::from_status(status, &body).into());
            }

            return Ok(response);
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, Value)]) -> Result<Value> {
        let url = self.url(endpoint);
        let query = query_pairs(params);

        let response = self
            .send_with_retry(endpoint, |client| client.get(&url).query(&query))
            .await?;

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))
    }

    /// Serve a read from the cache when possible; otherwise fetch and cache
    /// the successful response for `ttl`. Failed fetches and failure-shaped
    /// envelopes are never written to the cache.
    async fn cached_get(
        &self,
        endpoint: &str,
        params: &[(&str, Value)],
        ttl: Duration,
    ) -> Result<Value> {
        let key = CacheKey::from_parts(endpoint, params);
        if let Some(cached) = self.cache().get(&key) {
            return Ok(cached);
        }

        debug!(key = key.as_str(), "cache miss, fetching");
        let body = self.get_json(endpoint, params).await?;

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("backend reported failure")
                .to_string();
            return Err(ApiError::InvalidResponse(message).into());
        }

        self.cache().set(&key, body.clone(), Some(ttl));
        Ok(body)
    }

    /// Cached read returning the unwrapped envelope payload.
    async fn read<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, Value)],
        ttl_minutes: i64,
    ) -> Result<T> {
        let body = self
            .cached_get(endpoint, params, Duration::minutes(ttl_minutes))
            .await?;
        let envelope: ApiEnvelope<T> = serde_json::from_value(body)
            .with_context(|| format!("Failed to parse response from {}", endpoint))?;
        Ok(envelope.into_data()?)
    }

    /// Uncached write returning the unwrapped envelope payload.
    async fn write<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.url(endpoint);
        let response = self
            .send_with_retry(endpoint, |client| {
                let mut request = client.request(method.clone(), &url);
                if let Some(body) = body {
                    request = request.json(body);
                }
                request
            })
            .await?;

        let value: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;
        let envelope: ApiEnvelope<T> = serde_json::from_value(value)
            .with_context(|| format!("Failed to parse response from {}", endpoint))?;
        Ok(envelope.into_data()?)
    }

    /// Uncached write where only the envelope's success flag matters
    /// (delete responses carry no data).
    async fn write_ack(&self, method: Method, endpoint: &str) -> Result<()> {
        let url = self.url(endpoint);
        let response = self
            .send_with_retry(endpoint, |client| client.request(method.clone(), &url))
            .await?;

        let value: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("backend reported failure")
                .to_string();
            return Err(ApiError::InvalidResponse(message).into());
        }
        Ok(())
    }

    /// Evict every cached entry under an endpoint prefix. Called after each
    /// successful mutation so reads never serve stale data.
    fn invalidate_resource(&self, prefix: &str) {
        match Regex::new(&format!("^{}", regex::escape(prefix))) {
            Ok(pattern) => {
                self.cache().invalidate_pattern(&pattern);
            }
            // Unreachable with an escaped literal, but never worth a panic
            Err(e) => warn!(prefix, error = %e, "Failed to build invalidation pattern"),
        }
    }

    // ===== Weather =====

    pub async fn fetch_current_weather(&self, city: &str) -> Result<CurrentWeather> {
        let params = [("city", Value::from(city))];
        self.read("/app/weather/current/", &params, CONDITIONS_TTL_MINUTES)
            .await
    }

    pub async fn fetch_weather_forecast(&self, city: &str, days: u32) -> Result<Vec<ForecastDay>> {
        let params = [("city", Value::from(city)), ("days", Value::from(days))];
        self.read("/app/weather/forecast/", &params, CONDITIONS_TTL_MINUTES)
            .await
    }

    // ===== Air quality =====

    pub async fn fetch_air_quality(&self, city: &str) -> Result<AirQuality> {
        let params = [("city", Value::from(city))];
        self.read("/app/air/current/", &params, CONDITIONS_TTL_MINUTES)
            .await
    }

    // ===== Traffic =====

    pub async fn fetch_traffic_segments(&self, region: Option<&str>) -> Result<Vec<TrafficSegment>> {
        let mut params = Vec::new();
        if let Some(region) = region {
            params.push(("region", Value::from(region)));
        }
        self.read("/app/traffic/segments/", &params, LIST_TTL_MINUTES)
            .await
    }

    // ===== Civic reports =====

    pub async fn fetch_reports(&self, filter: &ReportFilter) -> Result<Vec<Report>> {
        self.read("/app/reports/", &filter.to_params(), LIST_TTL_MINUTES)
            .await
    }

    pub async fn fetch_report(&self, report_id: i64) -> Result<Report> {
        let endpoint = format!("/app/reports/{}/", report_id);
        self.read(&endpoint, &[], LIST_TTL_MINUTES).await
    }

    pub async fn fetch_report_summary(&self) -> Result<ReportSummary> {
        self.read("/app/reports/summary/all", &[], SUMMARY_TTL_MINUTES)
            .await
    }

    pub async fn create_report(&self, report: &NewReport) -> Result<Report> {
        let created = self
            .write(Method::POST, "/app/reports/", Some(report))
            .await?;
        self.invalidate_resource("/app/reports/");
        Ok(created)
    }

    pub async fn update_report_status(
        &self,
        report_id: i64,
        status: ReportStatus,
    ) -> Result<Report> {
        let endpoint = format!("/app/reports/{}/status/", report_id);
        let body = serde_json::json!({ "status": status });
        let updated = self.write(Method::PATCH, &endpoint, Some(&body)).await?;
        self.invalidate_resource("/app/reports/");
        Ok(updated)
    }

    pub async fn delete_report(&self, report_id: i64) -> Result<()> {
        let endpoint = format!("/app/reports/{}/", report_id);
        self.write_ack(Method::DELETE, &endpoint).await?;
        self.invalidate_resource("/app/reports/");
        Ok(())
    }

    // ===== Users =====

    pub async fn fetch_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        let mut params = Vec::new();
        if let Some(role) = role {
            params.push(("role", Value::from(role.as_str())));
        }
        self.read("/app/users/", &params, LIST_TTL_MINUTES).await
    }

    pub async fn update_user_role(&self, user_id: i64, role: UserRole) -> Result<User> {
        let endpoint = format!("/app/users/{}/role/", user_id);
        let body = serde_json::json!({ "role": role });
        let updated = self.write(Method::PATCH, &endpoint, Some(&body)).await?;
        self.invalidate_resource("/app/users/");
        Ok(updated)
    }

    // ===== Geographic boundaries =====

    pub async fn fetch_boundaries(&self, level: Option<BoundaryLevel>) -> Result<Vec<Boundary>> {
        let mut params = Vec::new();
        if let Some(level) = level {
            params.push(("level", Value::from(level.as_str())));
        }
        self.read("/app/geo/boundaries/", &params, BOUNDARY_TTL_MINUTES)
            .await
    }

    pub async fn fetch_boundary(&self, boundary_id: i64) -> Result<Boundary> {
        let endpoint = format!("/app/geo/boundaries/{}/", boundary_id);
        self.read(&endpoint, &[], BOUNDARY_TTL_MINUTES).await
    }
}

/// Render params for the actual HTTP query string. Strings go over the wire
/// unquoted; other values keep their compact JSON form.
fn query_pairs(params: &[(&str, Value)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.to_string(), rendered)
        })
        .collect()
}
