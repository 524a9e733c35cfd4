//! Property-based tests for payment normalization.

use proptest::prelude::*;
use serde_json::{Value, json};

use super::payment::normalize_payments;

/// Strategy for a loosely-typed field value as clients actually send them.
fn loose_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-1_000_000i64..1_000_000i64).prop_map(|n| json!(n)),
        (-100_000_000i64..100_000_000i64).prop_map(|cents| json!(format!("{}.{:02}", cents / 100, (cents % 100).abs()))),
        "[a-zA-Z ]{0,8}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn raw_payment() -> impl Strategy<Value = Value> {
    (loose_value(), loose_value(), loose_value(), loose_value()).prop_map(
        |(date, paid, expenditure, mode)| {
            json!({ "date": date, "paid": paid, "expenditure": expenditure, "mode": mode })
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Normalizing an already-normalized history yields the same records.
    #[test]
    fn prop_normalize_is_idempotent(items in prop::collection::vec(raw_payment(), 0..20)) {
        let once = normalize_payments(Some(&Value::Array(items)), "16/10/2026").unwrap();
        let reencoded = serde_json::to_value(&once).expect("payments serialize");
        let twice = normalize_payments(Some(&reencoded), "17/10/2026").unwrap();

        prop_assert_eq!(once, twice);
    }

    /// Exactly one payment comes out per element that goes in.
    #[test]
    fn prop_one_to_one(items in prop::collection::vec(raw_payment(), 0..20)) {
        let count = items.len();
        let normalized = normalize_payments(Some(&Value::Array(items)), "16/10/2026").unwrap();

        prop_assert_eq!(normalized.len(), count);
    }
}
