//! REST API client module for the CityLens backend.
//!
//! This module provides the `CityLensClient` for fetching weather, air
//! quality, traffic, civic report, user, and boundary data.
//!
//! Reads are served through the in-memory request cache; mutations
//! invalidate the affected resource prefix after they succeed.

pub mod client;
pub mod error;

pub use client::CityLensClient;
pub use error::ApiError;
