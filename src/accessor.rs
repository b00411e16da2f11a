//! Typed reads of single process environment variables.
//!
//! Every type comes with three access modes sharing one parser: `try_get*`
//! returns the error, `get*` substitutes a fallback, and `must_get*` panics.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::error::Error;
use crate::loader::Loader;
use crate::parser::FromEnvStr;

/// Read `key` from the process environment and parse it as `T`.
pub fn try_get<T: FromEnvStr>(key: &str) -> Result<T, Error> {
    Loader::new().try_get(key)
}

/// Read `key` as `T`, returning `fallback` if it is unset, empty or malformed.
pub fn get<T: FromEnvStr>(key: &str, fallback: T) -> T {
    Loader::new().get(key, fallback)
}

/// Read `key` as `T`, panicking with the [`Error`] as payload on failure.
///
/// Meant for required startup configuration.
#[track_caller]
pub fn must_get<T: FromEnvStr>(key: &str) -> T {
    Loader::new().must_get(key)
}

pub fn try_get_string(key: &str) -> Result<String, Error> {
    try_get(key)
}

pub fn get_string(key: &str, fallback: &str) -> String {
    try_get(key).unwrap_or_else(|_| fallback.to_owned())
}

#[track_caller]
pub fn must_get_string(key: &str) -> String {
    must_get(key)
}

macro_rules! accessor_triple {
    ($($ty:ty => $try_get:ident, $get:ident, $must_get:ident;)*) => {
        $(
            #[doc = concat!("Read `key` as `", stringify!($ty), "`.")]
            pub fn $try_get(key: &str) -> Result<$ty, Error> {
                try_get(key)
            }

            #[doc = concat!("Read `key` as `", stringify!($ty), "`, or return `fallback`.")]
            pub fn $get(key: &str, fallback: $ty) -> $ty {
                get(key, fallback)
            }

            #[doc = concat!("Read `key` as `", stringify!($ty), "`, or panic.")]
            #[track_caller]
            pub fn $must_get(key: &str) -> $ty {
                must_get(key)
            }
        )*
    };
}

accessor_triple! {
    i64 => try_get_int, get_int, must_get_int;
    f32 => try_get_f32, get_f32, must_get_f32;
    f64 => try_get_f64, get_f64, must_get_f64;
    bool => try_get_bool, get_bool, must_get_bool;
    DateTime<FixedOffset> => try_get_time, get_time, must_get_time;
    Duration => try_get_duration, get_duration, must_get_duration;
}
