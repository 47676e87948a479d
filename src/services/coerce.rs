//! Permissive conversion of raw settings values to typed values
//!
//! Configuration files are loosely typed: a port may be written as `8080` or
//! `"8080"`, a flag as `true` or `"1"`, a timeout as `"5s"`. The rules here
//! accept all of those and reject only values that cannot sensibly be read as
//! the target type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::errors::CoerceError;

/// A type a configuration value can be coerced into
pub trait FromConfigValue: Sized {
    /// Name used in coercion error messages
    const TYPE_NAME: &'static str;

    /// Convert a raw value, or explain why it cannot be converted
    fn from_config_value(value: &Value) -> Result<Self, CoerceError>;
}

impl FromConfigValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        Ok(value.clone())
    }
}

impl FromConfigValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok(Self::new()),
            Value::Array(_) | Value::Object(_) => Err(CoerceError::new(
                Self::TYPE_NAME,
                format!("{} cannot be rendered as a string", kind_of(value)),
            )),
        }
    }
}

impl FromConfigValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
            Value::String(s) => match s.trim() {
                "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
                "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
                other => Err(CoerceError::new(
                    Self::TYPE_NAME,
                    format!("'{other}' is not a boolean"),
                )),
            },
            Value::Null => Ok(false),
            Value::Array(_) | Value::Object(_) => Err(unsupported(Self::TYPE_NAME, value)),
        }
    }
}

macro_rules! impl_from_config_value_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromConfigValue for $t {
                const TYPE_NAME: &'static str = stringify!($t);

                fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
                    let n = integer_of(value, Self::TYPE_NAME)?;
                    <$t>::try_from(n).map_err(|_| {
                        CoerceError::new(Self::TYPE_NAME, format!("{n} is out of range"))
                    })
                }
            }
        )*
    };
}

impl_from_config_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromConfigValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| CoerceError::new(Self::TYPE_NAME, format!("{n} is not a float"))),
            Value::String(s) => s.trim().parse::<Self>().map_err(|e| {
                CoerceError::new(Self::TYPE_NAME, format!("'{s}': {e}"))
            }),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Null => Ok(0.0),
            Value::Array(_) | Value::Object(_) => Err(unsupported(Self::TYPE_NAME, value)),
        }
    }
}

impl FromConfigValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "time";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => parse_time(s.trim())
                .ok_or_else(|| CoerceError::new(Self::TYPE_NAME, format!("unrecognised time '{s}'"))),
            Value::Number(_) => {
                let secs = integer_of(value, Self::TYPE_NAME)?;
                i64::try_from(secs)
                    .ok()
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                    .ok_or_else(|| {
                        CoerceError::new(Self::TYPE_NAME, format!("{secs} is out of range"))
                    })
            }
            Value::Null => Ok(Self::default()),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                Err(unsupported(Self::TYPE_NAME, value))
            }
        }
    }
}

impl FromConfigValue for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::String(s) => {
                let s = s.trim();
                if s.contains(|c: char| matches!(c, 'n' | 's' | 'u' | 'µ' | 'μ' | 'm' | 'h')) {
                    parse_duration(s).map_err(|reason| CoerceError::new(Self::TYPE_NAME, reason))
                } else {
                    let nanos = parse_integer(s)
                        .map_err(|reason| CoerceError::new(Self::TYPE_NAME, reason))?;
                    nanos_to_duration(nanos)
                }
            }
            Value::Number(n) => match n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)) {
                Some(nanos) => nanos_to_duration(nanos),
                None => {
                    let nanos = n.as_f64().unwrap_or_default();
                    if nanos.is_finite() && nanos >= 0.0 {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let nanos = nanos as u64;
                        Ok(Self::from_nanos(nanos))
                    } else {
                        Err(CoerceError::new(Self::TYPE_NAME, format!("{n} is out of range")))
                    }
                }
            },
            Value::Null => Ok(Self::ZERO),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                Err(unsupported(Self::TYPE_NAME, value))
            }
        }
    }
}

impl FromConfigValue for Vec<i64> {
    const TYPE_NAME: &'static str = "int slice";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Array(items) => items.iter().map(i64::from_config_value).collect(),
            Value::Null => Ok(Self::new()),
            _ => Err(unsupported(Self::TYPE_NAME, value)),
        }
    }
}

impl FromConfigValue for Vec<String> {
    const TYPE_NAME: &'static str = "string slice";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        match value {
            Value::Array(items) => items.iter().map(String::from_config_value).collect(),
            Value::String(s) => Ok(s.split_whitespace().map(ToString::to_string).collect()),
            Value::Null => Ok(Self::new()),
            Value::Object(_) => Err(unsupported(Self::TYPE_NAME, value)),
            scalar => Ok(vec![String::from_config_value(scalar)?]),
        }
    }
}

impl FromConfigValue for HashMap<String, Value> {
    const TYPE_NAME: &'static str = "map";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        Ok(object_of(value, Self::TYPE_NAME)?.into_iter().collect())
    }
}

impl FromConfigValue for HashMap<String, String> {
    const TYPE_NAME: &'static str = "string map";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        object_of(value, Self::TYPE_NAME)?
            .into_iter()
            .map(|(k, v)| String::from_config_value(&v).map(|v| (k, v)))
            .collect()
    }
}

impl FromConfigValue for HashMap<String, Vec<String>> {
    const TYPE_NAME: &'static str = "string slice map";

    fn from_config_value(value: &Value) -> Result<Self, CoerceError> {
        object_of(value, Self::TYPE_NAME)?
            .into_iter()
            .map(|(k, v)| -> Result<(String, Vec<String>), CoerceError> {
                let items = match &v {
                    Value::Array(items) => items
                        .iter()
                        .map(String::from_config_value)
                        .collect::<Result<Vec<_>, _>>()?,
                    other => vec![String::from_config_value(other)?],
                };
                Ok((k, items))
            })
            .collect()
    }
}

/// Parse a human byte size such as `"10MB"`, `"512 kb"` or `"1024"`
///
/// A trailing `b`/`B` may be preceded by `k`, `m` or `g` (powers of 1024).
/// Unparseable or negative sizes are 0, as is a product that overflows.
pub fn parse_size_in_bytes(size: &str) -> u64 {
    size_in_bytes(size).unwrap_or(0)
}

/// Strict form of [`parse_size_in_bytes`]
pub fn size_in_bytes(raw: &str) -> Result<u64, CoerceError> {
    const TARGET: &str = "size in bytes";

    let mut size = raw.trim();
    let mut multiplier: u64 = 1;

    if size.len() > 1 && size.ends_with(['b', 'B']) {
        let without_b = &size[..size.len() - 1];
        let scaled = match without_b.chars().last().map(|c| c.to_ascii_lowercase()) {
            Some('k') => Some(1 << 10),
            Some('m') => Some(1 << 20),
            Some('g') => Some(1 << 30),
            _ => None,
        };
        match scaled {
            Some(scale) if without_b.len() > 1 => {
                multiplier = scale;
                size = without_b[..without_b.len() - 1].trim();
            }
            _ => size = without_b.trim(),
        }
    }

    let count = parse_integer(size).map_err(|reason| CoerceError::new(TARGET, reason))?;
    let count = u64::try_from(count)
        .map_err(|_| CoerceError::new(TARGET, format!("'{raw}' is not a valid size")))?;
    count
        .checked_mul(multiplier)
        .ok_or_else(|| CoerceError::new(TARGET, format!("'{raw}' overflows")))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a map",
    }
}

fn unsupported(target: &'static str, value: &Value) -> CoerceError {
    CoerceError::new(target, format!("{} is not convertible", kind_of(value)))
}

fn integer_of(value: &Value, target: &'static str) -> Result<i128, CoerceError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() {
                    #[allow(clippy::cast_possible_truncation)]
                    let truncated = f.trunc() as i128;
                    Ok(truncated)
                } else {
                    Err(CoerceError::new(target, format!("{n} is not finite")))
                }
            }
        }
        Value::String(s) => parse_integer(s).map_err(|reason| CoerceError::new(target, reason)),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Null => Ok(0),
        Value::Array(_) | Value::Object(_) => Err(unsupported(target, value)),
    }
}

/// Parse an integer written the way config files tend to write them:
/// optional sign, `0x`/`0o`/`0b` prefix, `_` separators, and a trailing
/// all-zero decimal part (`"8080.0"`).
fn parse_integer(raw: &str) -> Result<i128, String> {
    let mut s = raw.trim();
    if let Some((whole, fraction)) = s.split_once('.') {
        if fraction.chars().all(|c| c == '0') {
            s = whole;
        }
    }

    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let lower = unsigned.to_ascii_lowercase();
    let (radix, digits) = if let Some(d) = lower.strip_prefix("0x") {
        (16, d)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (8, d)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (2, d)
    } else {
        (10, lower.as_str())
    };

    let digits = digits.replace('_', "");
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(format!("'{raw}' is not an integer"));
    }
    let magnitude =
        i128::from_str_radix(&digits, radix).map_err(|e| format!("'{raw}' is not an integer: {e}"))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn nanos_to_duration(nanos: i128) -> Result<Duration, CoerceError> {
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| CoerceError::new(Duration::TYPE_NAME, format!("{nanos}ns is out of range")))
}

/// Parse a duration string such as `"300ms"`, `"1.5h"` or `"2h45m30s"`
fn parse_duration(s: &str) -> Result<Duration, String> {
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.starts_with('-') {
        return Err(format!("negative duration '{s}'"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, after) = rest.split_at(number_end);
        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, remaining) = after.split_at(unit_end);
        rest = remaining;

        if number.is_empty() || number == "." {
            return Err(format!("invalid duration '{s}'"));
        }
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in duration '{s}'")),
            other => return Err(format!("unknown unit '{other}' in duration '{s}'")),
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| format!("invalid duration '{s}'"))?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| format!("duration '{s}' overflows"))?;
        if !fraction.is_empty() {
            let fraction: f64 = format!("0.{fraction}")
                .parse()
                .map_err(|_| format!("invalid duration '{s}'"))?;
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_precision_loss
            )]
            let partial = (fraction * scale as f64) as u128;
            nanos = nanos
                .checked_add(partial)
                .ok_or_else(|| format!("duration '{s}' overflows"))?;
        }
        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("duration '{s}' overflows"))?;
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| format!("duration '{s}' overflows"))?;
    #[allow(clippy::cast_possible_truncation)]
    let subsec = (total % 1_000_000_000) as u32;
    Ok(Duration::new(secs, subsec))
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(t) = DateTime::parse_from_str(s, format) {
            return Some(t.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

fn object_of(value: &Value, target: &'static str) -> Result<Map<String, Value>, CoerceError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        Value::String(s) => serde_json::from_str::<Map<String, Value>>(s)
            .map_err(|e| CoerceError::new(target, format!("string is not a JSON object: {e}"))),
        Value::Null => Ok(Map::new()),
        _ => Err(unsupported(target, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_from_scalars() {
        assert_eq!(String::from_config_value(&json!("x")).unwrap(), "x");
        assert_eq!(String::from_config_value(&json!(8080)).unwrap(), "8080");
        assert_eq!(String::from_config_value(&json!(1.5)).unwrap(), "1.5");
        assert_eq!(String::from_config_value(&json!(true)).unwrap(), "true");
        assert_eq!(String::from_config_value(&Value::Null).unwrap(), "");
        assert!(String::from_config_value(&json!(["a"])).is_err());
    }

    #[test]
    fn test_bool_from_strings_and_numbers() {
        assert!(bool::from_config_value(&json!("true")).unwrap());
        assert!(bool::from_config_value(&json!("T")).unwrap());
        assert!(!bool::from_config_value(&json!("0")).unwrap());
        assert!(bool::from_config_value(&json!(2)).unwrap());
        assert!(!bool::from_config_value(&json!(0)).unwrap());
        assert!(bool::from_config_value(&json!("yes")).is_err());
    }

    #[test]
    fn test_int_from_strings() {
        assert_eq!(i64::from_config_value(&json!("8080")).unwrap(), 8080);
        assert_eq!(i64::from_config_value(&json!(" -42 ")).unwrap(), -42);
        assert_eq!(i64::from_config_value(&json!("0x1F")).unwrap(), 31);
        assert_eq!(i64::from_config_value(&json!("0b101")).unwrap(), 5);
        assert_eq!(i64::from_config_value(&json!("1_000")).unwrap(), 1000);
        assert_eq!(i64::from_config_value(&json!("8080.00")).unwrap(), 8080);
        assert!(i64::from_config_value(&json!("8080.5")).is_err());
        assert!(i64::from_config_value(&json!("abc")).is_err());
    }

    #[test]
    fn test_int_rejects_repeated_sign() {
        assert!(i64::from_config_value(&json!("--5")).is_err());
        assert!(i64::from_config_value(&json!("+-5")).is_err());
        assert!(i64::from_config_value(&json!("-+5")).is_err());
        assert!(i64::from_config_value(&json!("0x-1F")).is_err());
        assert_eq!(i64::from_config_value(&json!("+5")).unwrap(), 5);
        assert_eq!(parse_size_in_bytes("--5kb"), 0);
    }

    #[test]
    fn test_int_from_float_and_bool() {
        assert_eq!(i32::from_config_value(&json!(3.9)).unwrap(), 3);
        assert_eq!(i32::from_config_value(&json!(-3.9)).unwrap(), -3);
        assert_eq!(u8::from_config_value(&json!(true)).unwrap(), 1);
    }

    #[test]
    fn test_int_range_checks() {
        assert_eq!(i8::from_config_value(&json!(127)).unwrap(), 127);
        assert!(i8::from_config_value(&json!(128)).is_err());
        assert!(u16::from_config_value(&json!(-1)).is_err());
        assert!(u32::from_config_value(&json!("-5")).is_err());
        assert_eq!(
            u64::from_config_value(&json!(u64::MAX)).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn test_float() {
        assert!((f64::from_config_value(&json!("2.5")).unwrap() - 2.5).abs() < f64::EPSILON);
        assert!((f64::from_config_value(&json!(7)).unwrap() - 7.0).abs() < f64::EPSILON);
        assert!(f64::from_config_value(&json!("x")).is_err());
    }

    #[test]
    fn test_duration_strings() {
        assert_eq!(
            Duration::from_config_value(&json!("5s")).unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            Duration::from_config_value(&json!("1h30m")).unwrap(),
            Duration::from_secs(90 * 60)
        );
        assert_eq!(
            Duration::from_config_value(&json!("1.5s")).unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            Duration::from_config_value(&json!("250ms")).unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(
            Duration::from_config_value(&json!("10µs")).unwrap(),
            Duration::from_micros(10)
        );
        assert!(Duration::from_config_value(&json!("5 parsecs")).is_err());
        assert!(Duration::from_config_value(&json!("-5s")).is_err());
        assert!(Duration::from_config_value(&json!("5")).is_ok());
    }

    #[test]
    fn test_duration_numbers_are_nanoseconds() {
        assert_eq!(
            Duration::from_config_value(&json!(1500)).unwrap(),
            Duration::from_nanos(1500)
        );
        assert_eq!(
            Duration::from_config_value(&json!("100")).unwrap(),
            Duration::from_nanos(100)
        );
        assert!(Duration::from_config_value(&json!(-1)).is_err());
    }

    #[test]
    fn test_duration_overflow_is_an_error() {
        let err = Duration::from_config_value(&json!("94522879700260684295381835.9h")).unwrap_err();
        assert!(err.reason.contains("overflows"));
        assert!(Duration::from_config_value(&json!("99999999999999999999999999999999999999h")).is_err());
        assert!(Duration::from_config_value(&json!("18446744073709551616s")).is_err());
    }

    #[test]
    fn test_time_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        for raw in [
            "2024-03-01T12:30:00Z",
            "2024-03-01T14:30:00+02:00",
            "2024-03-01 12:30:00",
            "2024-03-01T12:30:00",
            "Fri, 01 Mar 2024 12:30:00 +0000",
        ] {
            assert_eq!(
                DateTime::<Utc>::from_config_value(&json!(raw)).unwrap(),
                expected,
                "failed for {raw}"
            );
        }
        assert_eq!(
            DateTime::<Utc>::from_config_value(&json!("2024-03-01")).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            DateTime::<Utc>::from_config_value(&json!(0)).unwrap(),
            DateTime::<Utc>::default()
        );
        assert!(DateTime::<Utc>::from_config_value(&json!("tomorrow")).is_err());
    }

    #[test]
    fn test_slices() {
        assert_eq!(
            Vec::<i64>::from_config_value(&json!([1, "2", 3.0])).unwrap(),
            vec![1, 2, 3]
        );
        assert!(Vec::<i64>::from_config_value(&json!("1 2")).is_err());
        assert_eq!(
            Vec::<String>::from_config_value(&json!("a b  c")).unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            Vec::<String>::from_config_value(&json!(["a", 1, true])).unwrap(),
            vec!["a", "1", "true"]
        );
        assert_eq!(
            Vec::<String>::from_config_value(&json!(42)).unwrap(),
            vec!["42"]
        );
    }

    #[test]
    fn test_maps() {
        let raw = json!({"a": 1, "b": "two"});
        let values = HashMap::<String, Value>::from_config_value(&raw).unwrap();
        assert_eq!(values["a"], json!(1));

        let strings = HashMap::<String, String>::from_config_value(&raw).unwrap();
        assert_eq!(strings["a"], "1");
        assert_eq!(strings["b"], "two");

        let from_json = HashMap::<String, String>::from_config_value(&json!(r#"{"k": "v"}"#)).unwrap();
        assert_eq!(from_json["k"], "v");

        let slices =
            HashMap::<String, Vec<String>>::from_config_value(&json!({"x": ["1", 2], "y": "z"}))
                .unwrap();
        assert_eq!(slices["x"], vec!["1", "2"]);
        assert_eq!(slices["y"], vec!["z"]);

        assert!(HashMap::<String, Value>::from_config_value(&json!([1])).is_err());
    }

    #[test]
    fn test_parse_size_in_bytes() {
        assert_eq!(parse_size_in_bytes("5MB"), 5 * 1024 * 1024);
        assert_eq!(parse_size_in_bytes("10kb"), 10 * 1024);
        assert_eq!(parse_size_in_bytes(" 2 GB "), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_size_in_bytes("512b"), 512);
        assert_eq!(parse_size_in_bytes("1024"), 1024);
        assert_eq!(parse_size_in_bytes("-3MB"), 0);
        assert_eq!(parse_size_in_bytes("lots"), 0);
        assert_eq!(parse_size_in_bytes(&format!("{}GB", u64::MAX)), 0);
    }

    #[test]
    fn test_size_in_bytes_reports_failures() {
        assert_eq!(size_in_bytes("3 MB").unwrap(), 3 << 20);
        assert!(size_in_bytes("-3MB").is_err());
        assert!(size_in_bytes("lots").is_err());
    }
}
