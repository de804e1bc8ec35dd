//! Port for the read-path accelerator: get/set/delete with TTLs and a
//! sentinel for negative entries.

use async_trait::async_trait;
use std::time::Duration;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the cache adapter.
    pub enum CacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "cache backend failure: {message}",
    }
}

/// A value read back from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// A positive hit: the cached URL.
    Url(String),
    /// A negative hit: the sentinel meaning "no such route".
    NotFound,
}

/// Get/set/delete with TTLs, best-effort semantics.
///
/// Callers never retry a cache miss or a cache write failure inline; a
/// failed read is treated as a miss, a failed write is logged and ignored
/// (per `spec.md` §4.1 failure semantics).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Read a value for `key`. Returns `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<CacheValue>, CacheError>;

    /// Write a positive entry with the given TTL.
    async fn put_url(&self, key: &str, url: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Write the negative sentinel with the given TTL.
    async fn put_not_found(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete an entry (used by the cache invalidator).
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// The literal sentinel value denoting a cached "no such route".
pub const NOT_FOUND_SENTINEL: &str = "__NOT_FOUND__";

/// Default positive entry TTL (`spec.md` §4.1): 60 seconds.
pub const DEFAULT_POSITIVE_TTL: Duration = Duration::from_secs(60);

/// Default negative entry TTL (`spec.md` §4.1): 10 seconds.
pub const DEFAULT_NEGATIVE_TTL: Duration = Duration::from_secs(10);
