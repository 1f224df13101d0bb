//! Property-based tests for cache serialization.
//!
//! These tests use proptest to verify that the round-trip law holds for
//! arbitrarily generated consolidated profiles, catching edge cases that
//! example-based tests might miss.
//!
//! # Properties Tested
//!
//! 1. **Roundtrip Property**: decode(encode(P)) == P for ANY profile P
//! 2. **Determinism Property**: encode(P) == encode(P) always
//! 3. **Envelope Property**: all encoded entries carry the schema version
//! 4. **Shape Property**: empty collections encode as empty arrays

use chrono::{DateTime, TimeZone, Utc};
use profile_kit::serialization::{decode_from_cache, encode_for_cache, CACHE_SCHEMA_VERSION};
use profile_kit::{
    ConsolidatedProfile, Customer, FriendRef, Origin, Purchase, ReferralRef,
};
use proptest::prelude::*;

// ============================================================================
// Strategies for the domain model
// ============================================================================

fn arb_datetime() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970..2100, with sub-second precision
    (0i64..4_102_444_800i64, 0u32..1_000_000_000u32)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

prop_compose! {
    fn arb_customer()(
        id in 1u64..1_000_000,
        name in ".{0,24}",
        email in "[a-z]{1,12}@[a-z]{1,12}\\.com",
        city in proptest::option::of(".{0,16}"),
    ) -> Customer {
        Customer { id, name, email, city }
    }
}

prop_compose! {
    fn arb_purchase()(
        purchase_id in 1u64..1_000_000,
        product in ".{0,24}",
        product_type in "[a-z]{1,12}",
        amount in 0.0f64..100_000.0,
        date in arb_datetime(),
    ) -> Purchase {
        Purchase { purchase_id, product, product_type, amount, date }
    }
}

prop_compose! {
    fn arb_friend()(
        friend_id in 1u64..1_000_000,
        friend_name in ".{0,24}",
    ) -> FriendRef {
        FriendRef { friend_id, friend_name }
    }
}

prop_compose! {
    fn arb_referral()(
        friend_id in 1u64..1_000_000,
        friend_name in ".{0,24}",
        product in ".{0,24}",
    ) -> ReferralRef {
        ReferralRef { friend_id, friend_name, product }
    }
}

prop_compose! {
    fn arb_profile()(
        customer in arb_customer(),
        purchases in proptest::collection::vec(arb_purchase(), 0..8),
        interests in proptest::collection::vec("[a-z]{1,12}", 0..6),
        behavior_tags in proptest::collection::vec("[a-z-]{1,16}", 0..6),
        friends in proptest::collection::vec(arb_friend(), 0..6),
        referrals in proptest::collection::vec(arb_referral(), 0..6),
    ) -> ConsolidatedProfile {
        let mut purchases = purchases;
        purchases.sort_by(|a, b| b.date.cmp(&a.date));
        ConsolidatedProfile {
            origin: Origin::Sources,
            customer,
            purchases,
            interests,
            behavior_tags,
            friends,
            referrals,
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_profile_roundtrip(profile in arb_profile()) {
        let bytes = encode_for_cache(&profile).expect("encoding succeeds");
        let decoded: ConsolidatedProfile =
            decode_from_cache(&bytes).expect("decoding succeeds");
        prop_assert_eq!(profile, decoded);
    }

    #[test]
    fn prop_encoding_is_deterministic(profile in arb_profile()) {
        let bytes1 = encode_for_cache(&profile).expect("encoding succeeds");
        let bytes2 = encode_for_cache(&profile).expect("encoding succeeds");
        prop_assert_eq!(bytes1, bytes2);
    }

    #[test]
    fn prop_envelope_carries_schema_version(profile in arb_profile()) {
        let bytes = encode_for_cache(&profile).expect("encoding succeeds");
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("entry is valid JSON");
        prop_assert_eq!(value["version"].as_u64(), Some(CACHE_SCHEMA_VERSION as u64));
        prop_assert!(value["payload"].is_object());
    }

    #[test]
    fn prop_empty_collections_encode_as_empty_arrays(customer in arb_customer()) {
        let profile = ConsolidatedProfile {
            origin: Origin::Sources,
            customer,
            purchases: vec![],
            interests: vec![],
            behavior_tags: vec![],
            friends: vec![],
            referrals: vec![],
        };

        let bytes = encode_for_cache(&profile).expect("encoding succeeds");
        let value: serde_json::Value =
            serde_json::from_slice(&bytes).expect("entry is valid JSON");

        for field in ["purchases", "interests", "behavior_tags", "friends", "referrals"] {
            prop_assert_eq!(
                &value["payload"][field],
                &serde_json::json!([]),
                "field {} must be an empty array",
                field
            );
        }

        let decoded: ConsolidatedProfile =
            decode_from_cache(&bytes).expect("decoding succeeds");
        prop_assert_eq!(profile, decoded);
    }

    #[test]
    fn prop_origin_tag_survives_roundtrip(profile in arb_profile()) {
        let mut cached = profile.clone();
        cached.origin = Origin::Cache;

        let bytes = encode_for_cache(&cached).expect("encoding succeeds");
        let decoded: ConsolidatedProfile =
            decode_from_cache(&bytes).expect("decoding succeeds");
        prop_assert_eq!(decoded.origin, Origin::Cache);
    }
}
