//! In-memory request cache for backend responses.
//!
//! This module provides the `RequestCache`, a TTL-based key/value store
//! keyed by normalized (endpoint, params) pairs. It is used to avoid
//! redundant network calls for idempotent read endpoints; write paths
//! evict affected entries with pattern-based invalidation.
//!
//! The cache is an explicitly constructed instance (no singleton) so
//! lifetime and test isolation stay under the caller's control.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::{CacheStats, RequestCache};
