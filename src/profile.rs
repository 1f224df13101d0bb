//! Domain model for consolidated customer profiles.
//!
//! A [`ConsolidatedProfile`] merges one customer's identity and purchase
//! history (relational store), interest/behavior tags (document store), and
//! social relationships (graph store). It is the unit written to the profile
//! cache and the unit returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque positive customer identifier.
///
/// Primary key in the relational and document stores; a node property in
/// the graph store.
pub type CustomerId = u64;

/// Customer identity row, loaded from the relational store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
}

/// One purchase, joined with product metadata.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub purchase_id: u64,
    pub product: String,
    pub product_type: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Interest and behavior tags from the document store.
///
/// An absent document yields the default value (both collections empty);
/// absence is "no data yet", not an error.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InterestProfile {
    pub interests: Vec<String>,
    pub behavior_tags: Vec<String>,
}

/// One-hop "friend of" relationship from the graph store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRef {
    pub friend_id: CustomerId,
    pub friend_name: String,
}

/// One-hop "referred" relationship carrying the referred product.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferralRef {
    pub friend_id: CustomerId,
    pub friend_name: String,
    pub product: String,
}

/// Where a returned profile came from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Freshly aggregated from the three systems of record.
    Sources,
    /// Decoded from the profile cache.
    Cache,
}

/// Merged view of one customer across all stores.
///
/// Constructed fresh by the aggregator on every cache miss and rebuild
/// pass, immutable once constructed. Empty collections stay present when
/// encoded (empty arrays, never absent fields), so downstream consumers see
/// a stable shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConsolidatedProfile {
    pub origin: Origin,
    pub customer: Customer,
    /// Sorted by purchase date, newest first.
    pub purchases: Vec<Purchase>,
    pub interests: Vec<String>,
    pub behavior_tags: Vec<String>,
    pub friends: Vec<FriendRef>,
    pub referrals: Vec<ReferralRef>,
}

impl ConsolidatedProfile {
    /// Assemble a profile from per-store results, enforcing the purchase
    /// ordering invariant regardless of adapter behavior.
    pub fn from_sources(
        customer: Customer,
        mut purchases: Vec<Purchase>,
        interest_profile: InterestProfile,
        friends: Vec<FriendRef>,
        referrals: Vec<ReferralRef>,
    ) -> Self {
        purchases.sort_by(|a, b| b.date.cmp(&a.date));
        ConsolidatedProfile {
            origin: Origin::Sources,
            customer,
            purchases,
            interests: interest_profile.interests,
            behavior_tags: interest_profile.behavior_tags,
            friends,
            referrals,
        }
    }

    /// Customer identifier this profile belongs to.
    pub fn customer_id(&self) -> CustomerId {
        self.customer.id
    }
}
