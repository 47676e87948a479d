//! The typed getter table, shared by [`ConfigInstance`](crate::ConfigInstance)
//! methods and the process-wide free functions.

/// Invoke `$callback!` with one `getter, fallible_getter => Type;` row per
/// supported value type.
macro_rules! with_typed_getters {
    ($callback:ident) => {
        $callback! {
            /// Raw value at `key` (`Value::Null` when unset)
            get, try_get_value => serde_json::Value;
            /// String value at `key`
            get_string, try_get_string => String;
            /// Boolean value at `key`
            get_bool, try_get_bool => bool;
            /// Integer value at `key`
            get_int, try_get_int => i64;
            /// `i8` value at `key`
            get_int8, try_get_int8 => i8;
            /// `i16` value at `key`
            get_int16, try_get_int16 => i16;
            /// `i32` value at `key`
            get_int32, try_get_int32 => i32;
            /// `i64` value at `key`
            get_int64, try_get_int64 => i64;
            /// Unsigned integer value at `key`
            get_uint, try_get_uint => u64;
            /// `u8` value at `key`
            get_uint8, try_get_uint8 => u8;
            /// `u16` value at `key`
            get_uint16, try_get_uint16 => u16;
            /// `u32` value at `key`
            get_uint32, try_get_uint32 => u32;
            /// `u64` value at `key`
            get_uint64, try_get_uint64 => u64;
            /// Float value at `key`
            get_float64, try_get_float64 => f64;
            /// Timestamp at `key` (RFC 3339, RFC 2822, `YYYY-MM-DD[ HH:MM:SS]` or Unix seconds)
            get_time, try_get_time => chrono::DateTime<chrono::Utc>;
            /// Duration at `key` (`"5s"`, `"1h30m"`; bare numbers are nanoseconds)
            get_duration, try_get_duration => std::time::Duration;
            /// Integer list at `key`
            get_int_slice, try_get_int_slice => Vec<i64>;
            /// String list at `key` (a plain string is split on whitespace)
            get_string_slice, try_get_string_slice => Vec<String>;
            /// Map at `key`
            get_string_map, try_get_string_map => std::collections::HashMap<String, serde_json::Value>;
            /// Map of strings at `key`
            get_string_map_string, try_get_string_map_string => std::collections::HashMap<String, String>;
            /// Map of string lists at `key`
            get_string_map_string_slice, try_get_string_map_string_slice => std::collections::HashMap<String, Vec<String>>;
        }
    };
}
