//! Smoke Screen Unit tests for bid validation components
//!
//! These tests span the public API and exercise it in isolation from the
//! integration scenarios. They are intended as a smoke-screen and generally
//! test the happy-path.

use chrono::{Datelike, Timelike, Utc};
use bid_validation::{
    actor::{Actor, ActorRole},
    bid::{Amount, Bid, BidId, TimeStamp},
    settings::Settings,
    utils::{is_bech32_with_hrp, new_uuid_to_bech32},
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// new_uuid_to_bech32 yields bech32 strings under the requested prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("bid_").unwrap();

        assert!(encoded.starts_with("bid_1"));
        assert!(is_bech32_with_hrp(&encoded, "bid_"));
    }

    /// An empty prefix is not a valid human-readable part
    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
    }

    /// Consecutive ids never collide
    #[test]
    fn generates_unique_ids() {
        let id1 = BidId::new().unwrap();
        let id2 = BidId::new().unwrap();

        assert_ne!(id1, id2);
    }

    /// Generated actors get a user_ prefixed id
    #[test]
    fn generated_actor_ids_use_user_prefix() {
        let actor = Actor::generate(ActorRole::Donor).unwrap();

        assert!(is_bech32_with_hrp(&actor.id, "user_"));
        assert_eq!(actor.role, ActorRole::Donor);
    }
}

// BID MODULE TESTS
#[cfg(test)]
mod bid_tests {
    use super::*;

    /// TimeStamp::new() is close to the current time
    #[test]
    fn timestamp_new_creates_current_time() {
        let ts = TimeStamp::new();
        let now = Utc::now();

        let diff = (now - ts.to_datetime_utc()).num_seconds().abs();
        assert!(diff < 1);
    }

    /// TimeStamp can be created with specific date/time values
    #[test]
    fn timestamp_new_with_creates_specific_time() {
        let dt = TimeStamp::new_with(2024, 6, 15, 10, 30, 0)
            .unwrap()
            .to_datetime_utc();

        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    /// Impossible calendar dates are refused rather than panicking
    #[test]
    fn timestamp_new_with_rejects_invalid_dates() {
        assert!(TimeStamp::new_with(2024, 2, 30, 0, 0, 0).is_none());
    }

    /// The builder style setters fill in the payload
    #[test]
    fn bid_builder_sets_fields() {
        let bid = Bid::new()
            .set_name("Solar panels for community center")
            .set_association_fee(750)
            .set_insurance(Some(Amount::from(1_000)))
            .set_draft(true);

        assert_eq!(bid.name, "Solar panels for community center");
        assert_eq!(bid.association_fee, Amount::from(750));
        assert!(bid.insurance_required);
        assert!(bid.is_draft);
        assert!(bid.is_creation());
    }
}

// SETTINGS MODULE TESTS
#[cfg(test)]
mod settings_tests {
    use super::*;

    /// Defaults match the documented thresholds
    #[test]
    fn defaults() {
        let settings = Settings::default();

        assert_eq!(settings.min_tanafos_fee, Amount::from(50));
        assert_eq!(settings.tanafos_percentage, Amount::from(5));
        assert_eq!(settings.vat_percentage, Amount::from(15));
        assert_eq!(settings.max_bid_document_price, Amount::from(100_000));
        assert_eq!(settings.stopping_period_days, 10);
        assert_eq!(settings.max_tanafos_fee, None);
    }

    /// Settings survive a cbor round trip
    #[test]
    fn settings_cbor_roundtrip() {
        let original = Settings::new().set_max_tanafos_fee(400).set_stopping_period_days(30);

        let encoded = minicbor::to_vec(&original).unwrap();
        let decoded: Settings = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }
}
