//! Versioned JSON serialization for cache storage.
//!
//! Every cache entry is a self-describing JSON document wrapping the payload
//! in a versioned envelope:
//!
//! ```text
//! {"version": 1, "payload": { ... consolidated profile ... }}
//! ```
//!
//! # Safety Guarantees
//!
//! - **Round-trip:** `decode(encode(P)) == P`, including empty collections
//!   (encoded as empty arrays, never absent fields)
//! - **Versioned:** schema changes force cache eviction, not silent
//!   misreads of old entries
//! - **Self-describing:** entries remain inspectable with any JSON tooling
//!   straight out of the backing store
//!
//! Decode failures and version mismatches are reported as distinct errors;
//! the coordinator treats both as a cache miss and re-aggregates.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Current cache schema version.
///
/// Increment when making breaking changes to cached types: adding/removing
/// fields, changing field types, renaming. Old entries are then evicted and
/// recomputed from the sources on next access.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope wrapped around every cache entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    /// Schema version: must match [`CACHE_SCHEMA_VERSION`] on decode.
    pub version: u32,
    /// The actual cached data.
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Wrap a payload in an envelope carrying the current schema version.
    pub fn new(payload: T) -> Self {
        Self {
            version: CACHE_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Encode a value for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if JSON encoding fails (e.g. a
/// non-finite float in the payload).
pub fn encode_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    serde_json::to_vec(&envelope).map_err(|e| {
        error!("Cache encoding failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a value from cache storage, validating the schema version.
///
/// # Errors
///
/// - `Error::DecodeError`: corrupted or non-envelope JSON
/// - `Error::VersionMismatch`: entry written under a different schema
pub fn decode_from_cache<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = serde_json::from_slice(bytes).map_err(|e| {
        warn!("Cache decoding failed: {}", e);
        Error::DecodeError(e.to_string())
    })?;

    if envelope.version != CACHE_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CACHE_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CACHE_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}
