//! Cache key management for the profile namespace.
//!
//! All keys owned by this subsystem share the `customer:` prefix, so flush
//! and enumeration can stay inside the namespace instead of touching the
//! whole cache database (other cache users may share it).

use crate::profile::CustomerId;

/// Namespace prefix for all profile cache keys.
pub const PROFILE_NAMESPACE: &str = "customer";

/// Build the cache key for one customer: `customer:{id}`.
pub fn profile_key(id: CustomerId) -> String {
    format!("{}:{}", PROFILE_NAMESPACE, id)
}

/// Prefix that matches every key owned by this subsystem.
pub fn profile_prefix() -> String {
    format!("{}:", PROFILE_NAMESPACE)
}

/// Parse a customer identifier back out of a profile cache key.
///
/// Returns `None` for keys outside the namespace or with a malformed id.
pub fn parse_profile_key(key: &str) -> Option<CustomerId> {
    let id = key.strip_prefix(PROFILE_NAMESPACE)?.strip_prefix(':')?;
    id.parse().ok()
}
