//! Error types for the profile cache subsystem.

use crate::profile::CustomerId;
use std::fmt;

/// Result type for profile cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which external store an adapter error came from.
///
/// Used by [`Error::SourceUnavailable`] so callers can distinguish a failed
/// relational lookup (fatal) from a failed enrichment query (degraded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Relational store: customer rows, purchases, customer id listing.
    Relational,
    /// Document store: interest/behavior documents.
    Document,
    /// Graph store: friend and referral edges.
    Graph,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Relational => write!(f, "relational"),
            SourceKind::Document => write!(f, "document"),
            SourceKind::Graph => write!(f, "graph"),
        }
    }
}

/// Error types for the profile cache subsystem.
///
/// All operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`.
#[derive(Debug, Clone)]
pub enum Error {
    /// The customer identifier does not exist in the relational store.
    ///
    /// Fatal to a single `get_profile` call and surfaced to the caller.
    /// Nothing is written to the cache for an unknown customer.
    NotFound(CustomerId),

    /// An adapter call to one of the systems of record failed.
    ///
    /// For the mandatory relational queries (customer row, purchases,
    /// customer id listing) this is fatal to the operation. Enrichment
    /// queries (interests, friends, referrals) never surface this variant
    /// from the aggregator; they degrade to empty collections instead.
    ///
    /// **Recovery:** Retry after the source recovers.
    SourceUnavailable {
        /// Store the failed adapter belongs to.
        source: SourceKind,
        /// Adapter-provided detail (connectivity, timeout, query error).
        detail: String,
    },

    /// The key-value cache backend cannot be reached.
    ///
    /// `get_profile` degrades to direct aggregation without caching; the
    /// cache is an optimization, not a correctness dependency. `rebuild_all`
    /// fails outright, since its entire purpose is to populate the cache.
    CacheUnavailable(String),

    /// Encoding a profile for cache storage failed.
    SerializationError(String),

    /// A stored cache value could not be decoded.
    ///
    /// Indicates corrupted or malformed data in the cache. The coordinator
    /// treats this as a miss: the entry is evicted and re-aggregated.
    DecodeError(String),

    /// Schema version mismatch between code and a cached entry.
    ///
    /// Raised when `CACHE_SCHEMA_VERSION` changed between the writer and
    /// the reader. The entry is evicted and recomputed on next access; no
    /// action needed, this is expected during deployments.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from the cached entry)
        found: u32,
    },

    /// Configuration error during backend construction.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(id) => write!(f, "Customer {} not found", id),
            Error::SourceUnavailable { source, detail } => {
                write!(f, "{} source unavailable: {}", source, detail)
            }
            Error::CacheUnavailable(msg) => write!(f, "Cache unavailable: {}", msg),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// True for decode-side problems the read path treats as a cache miss.
    pub fn is_miss_equivalent(&self) -> bool {
        matches!(self, Error::DecodeError(_) | Error::VersionMismatch { .. })
    }
}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DecodeError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
