//! CityLens client core - typed API client, models, and request cache.
//!
//! This crate is the data layer the CityLens surfaces (mobile, dashboard)
//! sit on: a REST client for the CityLens backend (weather, air quality,
//! traffic, civic reports, users, geographic boundaries) fronted by an
//! in-memory TTL request cache with pattern-based invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod utils;

pub use api::{ApiError, CityLensClient};
pub use cache::{CacheKey, CacheStats, RequestCache};
pub use config::Config;
