use confhub::services::coerce::parse_size_in_bytes;
use confhub::{ConfigInstance, FromConfigValue};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::time::Duration;

proptest! {
    /// Property: integers survive being written as numbers or as strings
    #[test]
    fn prop_int_from_number_or_string(n in any::<i64>()) {
        prop_assert_eq!(i64::from_config_value(&json!(n)).unwrap(), n);
        prop_assert_eq!(i64::from_config_value(&json!(n.to_string())).unwrap(), n);
    }

    /// Property: narrowing only succeeds inside the target range
    #[test]
    fn prop_narrowing_is_range_checked(n in any::<i64>()) {
        let narrowed = i16::from_config_value(&json!(n));
        prop_assert_eq!(narrowed.is_ok(), i16::try_from(n).is_ok());
        let unsigned = u64::from_config_value(&json!(n));
        prop_assert_eq!(unsigned.is_ok(), n >= 0);
    }

    /// Property: `<n>kb`, `<n>MB` and bare `<n>` scale by powers of 1024
    #[test]
    fn prop_size_units_scale(n in 0u64..1_000_000) {
        prop_assert_eq!(parse_size_in_bytes(&n.to_string()), n);
        prop_assert_eq!(parse_size_in_bytes(&format!("{n}kb")), n * 1024);
        prop_assert_eq!(parse_size_in_bytes(&format!("{n}MB")), n * 1024 * 1024);
        prop_assert_eq!(parse_size_in_bytes(&format!("-{}kb", n + 1)), 0);
    }

    /// Property: unit durations match their std constructors
    #[test]
    fn prop_duration_units(n in 0u64..100_000) {
        prop_assert_eq!(
            Duration::from_config_value(&json!(format!("{n}s"))).unwrap(),
            Duration::from_secs(n)
        );
        prop_assert_eq!(
            Duration::from_config_value(&json!(format!("{n}ms"))).unwrap(),
            Duration::from_millis(n)
        );
        prop_assert_eq!(
            Duration::from_config_value(&json!(n)).unwrap(),
            Duration::from_nanos(n)
        );
    }

    /// Property: an absent key returns the supplied default exactly
    #[test]
    fn prop_absent_key_returns_default(
        key in "[a-z]{1,8}(\\.[a-z]{1,8}){0,2}",
        int_default in any::<i64>(),
        string_default in ".*",
    ) {
        let config = ConfigInstance::from_value("empty", json!({}));
        prop_assert_eq!(config.get_int(&key, Some(int_default)), int_default);
        prop_assert_eq!(config.get_string(&key, Some(string_default.clone())), string_default);
        prop_assert_eq!(config.get_int(&key, None), 0);
        prop_assert!(config.get_string_slice(&key, None).is_empty());
        prop_assert_eq!(config.get(&key, None), Value::Null);
    }

    /// Property: a whitespace-joined string splits back into its words
    #[test]
    fn prop_string_slice_splits_on_whitespace(words in prop::collection::vec("[a-z0-9]{1,6}", 0..8)) {
        let joined = words.join("  ");
        prop_assert_eq!(Vec::<String>::from_config_value(&json!(joined)).unwrap(), words);
    }
}
