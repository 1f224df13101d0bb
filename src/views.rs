//! Read views: pure projections over cached consolidated profiles.
//!
//! Each view is a deterministic map over an already-materialized sequence
//! of [`ConsolidatedProfile`] values; no I/O happens here. The coordinator
//! supplies the sequence by enumerating and decoding every cached entry.
//!
//! Projections carry exactly the projected keys when serialized, and absent
//! source data projects to empty collections rather than omitted fields, so
//! downstream consumers can rely on a stable shape.

use crate::profile::{ConsolidatedProfile, Customer, FriendRef, Purchase, ReferralRef};
use serde::Serialize;

/// Which projection to apply over the cached profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Customer identity only.
    ProfilesOnly,
    /// Customer identity plus one-hop friends.
    ProfilesWithFriends,
    /// Customer identity plus purchase history.
    ProfilesWithPurchases,
    /// Customer identity plus friends and referrals.
    FriendsAndReferrals,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::ProfilesOnly => write!(f, "ProfilesOnly"),
            ViewKind::ProfilesWithFriends => write!(f, "ProfilesWithFriends"),
            ViewKind::ProfilesWithPurchases => write!(f, "ProfilesWithPurchases"),
            ViewKind::FriendsAndReferrals => write!(f, "FriendsAndReferrals"),
        }
    }
}

/// One projected record.
///
/// Serializes untagged: the payload is a plain object holding only the
/// projected keys, no variant wrapper.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ProjectedProfile {
    /// `ProfilesOnly` projection.
    ProfileOnly { customer: Customer },
    /// `ProfilesWithFriends` projection.
    WithFriends {
        customer: Customer,
        friends: Vec<FriendRef>,
    },
    /// `ProfilesWithPurchases` projection.
    WithPurchases {
        customer: Customer,
        purchases: Vec<Purchase>,
    },
    /// `FriendsAndReferrals` projection.
    WithFriendsAndReferrals {
        customer: Customer,
        friends: Vec<FriendRef>,
        referrals: Vec<ReferralRef>,
    },
}

impl ProjectedProfile {
    /// Customer identity carried by every projection.
    pub fn customer(&self) -> &Customer {
        match self {
            ProjectedProfile::ProfileOnly { customer }
            | ProjectedProfile::WithFriends { customer, .. }
            | ProjectedProfile::WithPurchases { customer, .. }
            | ProjectedProfile::WithFriendsAndReferrals { customer, .. } => customer,
        }
    }
}

/// Apply one view over a sequence of consolidated profiles.
pub fn project(kind: ViewKind, profiles: &[ConsolidatedProfile]) -> Vec<ProjectedProfile> {
    profiles
        .iter()
        .map(|p| match kind {
            ViewKind::ProfilesOnly => ProjectedProfile::ProfileOnly {
                customer: p.customer.clone(),
            },
            ViewKind::ProfilesWithFriends => ProjectedProfile::WithFriends {
                customer: p.customer.clone(),
                friends: p.friends.clone(),
            },
            ViewKind::ProfilesWithPurchases => ProjectedProfile::WithPurchases {
                customer: p.customer.clone(),
                purchases: p.purchases.clone(),
            },
            ViewKind::FriendsAndReferrals => ProjectedProfile::WithFriendsAndReferrals {
                customer: p.customer.clone(),
                friends: p.friends.clone(),
                referrals: p.referrals.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{InterestProfile, Origin};

    fn profile(id: u64, name: &str) -> ConsolidatedProfile {
        ConsolidatedProfile {
            origin: Origin::Cache,
            customer: Customer {
                id,
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                city: None,
            },
            purchases: vec![],
            interests: vec![],
            behavior_tags: vec![],
            friends: vec![FriendRef {
                friend_id: id + 1,
                friend_name: "Bruno".to_string(),
            }],
            referrals: vec![],
        }
    }

    #[test]
    fn test_project_is_one_record_per_profile() {
        let profiles = vec![profile(1, "Ana"), profile(2, "Bruno")];

        for kind in [
            ViewKind::ProfilesOnly,
            ViewKind::ProfilesWithFriends,
            ViewKind::ProfilesWithPurchases,
            ViewKind::FriendsAndReferrals,
        ] {
            let projected = project(kind, &profiles);
            assert_eq!(projected.len(), 2, "view {} record count", kind);
            assert_eq!(projected[0].customer().id, 1);
            assert_eq!(projected[1].customer().id, 2);
        }
    }

    #[test]
    fn test_profiles_only_serializes_customer_key_only() {
        let projected = project(ViewKind::ProfilesOnly, &[profile(1, "Ana")]);
        let json = serde_json::to_value(&projected[0]).expect("serializes");

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["customer"]);
    }

    #[test]
    fn test_friends_and_referrals_serializes_exactly_three_keys() {
        let projected = project(ViewKind::FriendsAndReferrals, &[profile(1, "Ana")]);
        let json = serde_json::to_value(&projected[0]).expect("serializes");

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["customer", "friends", "referrals"]);
    }

    #[test]
    fn test_absent_data_projects_to_empty_collections() {
        let mut p = profile(1, "Ana");
        p.friends.clear();
        p.interests = InterestProfile::default().interests;

        let projected = project(ViewKind::FriendsAndReferrals, &[p]);
        let json = serde_json::to_value(&projected[0]).expect("serializes");
        assert_eq!(json["friends"], serde_json::json!([]));
        assert_eq!(json["referrals"], serde_json::json!([]));
    }

    #[test]
    fn test_project_empty_input() {
        assert!(project(ViewKind::ProfilesOnly, &[]).is_empty());
    }
}
