use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::error::{DurationError, ParseError};

/// A value that can be read from the text of an environment variable.
///
/// Implemented for the closed set of types the accessors and the struct
/// loader understand. `KIND` names the type in error messages.
pub trait FromEnvStr: Sized {
    const KIND: &'static str;

    fn from_env_str(raw: &str) -> Result<Self, ParseError>;
}

impl FromEnvStr for String {
    const KIND: &'static str = "string";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        Ok(raw.to_owned())
    }
}

macro_rules! int_from_env_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromEnvStr for $ty {
                const KIND: &'static str = stringify!($ty);

                fn from_env_str(raw: &str) -> Result<Self, ParseError> {
                    Ok(raw.parse::<$ty>()?)
                }
            }
        )*
    };
}

int_from_env_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl FromEnvStr for f32 {
    const KIND: &'static str = "f32";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        let value = raw.parse::<f32>()?;
        check_float_range(raw, value.is_infinite())?;
        Ok(value)
    }
}

impl FromEnvStr for f64 {
    const KIND: &'static str = "f64";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        let value = raw.parse::<f64>()?;
        check_float_range(raw, value.is_infinite())?;
        Ok(value)
    }
}

impl FromEnvStr for bool {
    const KIND: &'static str = "bool";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        parse_bool(raw)
    }
}

impl FromEnvStr for DateTime<FixedOffset> {
    const KIND: &'static str = "time (RFC3339)";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        parse_rfc3339(raw)
    }
}

impl FromEnvStr for DateTime<Utc> {
    const KIND: &'static str = "time (RFC3339)";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        Ok(parse_rfc3339(raw)?.with_timezone(&Utc))
    }
}

impl FromEnvStr for Duration {
    const KIND: &'static str = "duration";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        Ok(parse_duration(raw)?)
    }
}

impl FromEnvStr for TimeDelta {
    const KIND: &'static str = "signed duration";

    fn from_env_str(raw: &str) -> Result<Self, ParseError> {
        Ok(parse_signed_duration(raw)?)
    }
}

/// Parse a strict RFC3339 timestamp such as `2025-08-24T12:34:56Z`.
///
/// The date and time must be separated by an uppercase `T` and a UTC offset
/// must be an uppercase `Z`; chrono alone also takes a space and lowercase.
pub fn parse_rfc3339(raw: &str) -> Result<DateTime<FixedOffset>, ParseError> {
    let parsed = DateTime::parse_from_rfc3339(raw)?;
    if raw.as_bytes().get(10) != Some(&b'T') || raw.ends_with('z') {
        return Err(ParseError::TimeLayout);
    }
    Ok(parsed)
}

// Overflowing literals parse to infinity; only explicit `inf` spellings may.
fn check_float_range(raw: &str, infinite: bool) -> Result<(), ParseError> {
    if !infinite {
        return Ok(());
    }
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity") {
        Ok(())
    } else {
        Err(ParseError::FloatRange)
    }
}

/// Parse a boolean spelling.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, ParseError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseError::Bool),
    }
}

/// Parse a compound duration literal such as `300ms`, `1h30m` or `1.5h`.
///
/// Each component is a decimal number with an optional fraction followed by
/// one of the units `ns`, `us` (`µs`, `μs`), `ms`, `s`, `m`, `h`. A bare `0`
/// is accepted without a unit. A leading `+` is allowed; a leading `-` is
/// only allowed when the total is zero, since [`Duration`] is unsigned. Use
/// [`parse_signed_duration`] for negative literals.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, nanos) = scan_duration(input)?;
    if negative && nanos != 0 {
        return Err(DurationError::Negative(input.to_owned()));
    }
    Ok(Duration::from_nanos(nanos))
}

/// Parse a compound duration literal that may be negative, such as `-1h30m`.
///
/// The magnitude is limited to what fits in an `i64` count of nanoseconds.
pub fn parse_signed_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let (negative, nanos) = scan_duration(input)?;
    let limit = if negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX.unsigned_abs()
    };
    if nanos > limit {
        return Err(DurationError::Overflow(input.to_owned()));
    }
    let signed = if negative {
        (nanos as i64).wrapping_neg()
    } else {
        nanos as i64
    };
    Ok(TimeDelta::nanoseconds(signed))
}

// Returns the sign and the magnitude in nanoseconds.
fn scan_duration(input: &str) -> Result<(bool, u64), DurationError> {
    let invalid = || DurationError::Invalid(input.to_owned());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok((negative, 0));
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = 0u64;
    while !rest.is_empty() {
        let first = rest.as_bytes()[0];
        if !(first == b'.' || first.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, consumed_whole, after_whole) = leading_int(rest).ok_or_else(invalid)?;
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut consumed_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, digit_scale, consumed, after_fraction) = leading_fraction(after_dot);
            fraction = digits;
            scale = digit_scale;
            consumed_fraction = consumed;
            rest = after_fraction;
        }

        if !consumed_whole && !consumed_fraction {
            return Err(invalid());
        }

        let unit_len = rest
            .bytes()
            .position(|byte| byte == b'.' || byte.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_owned()));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;

        let unit_nanos = unit_in_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;

        let overflow = || DurationError::Overflow(input.to_owned());
        let mut component = whole.checked_mul(unit_nanos).ok_or_else(overflow)?;
        if fraction > 0 {
            let partial = (fraction as f64 * (unit_nanos as f64 / scale)) as u64;
            component = component.checked_add(partial).ok_or_else(overflow)?;
        }
        total = total.checked_add(component).ok_or_else(overflow)?;
    }

    Ok((negative, total))
}

fn unit_in_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(1_000_000_000),
        "m" => Some(60 * 1_000_000_000),
        "h" => Some(60 * 60 * 1_000_000_000),
        _ => None,
    }
}

// Returns the value, whether any digit was consumed, and the remainder.
// `None` on overflow.
fn leading_int(input: &str) -> Option<(u64, bool, &str)> {
    let end = input
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(input.len());

    let mut value = 0u64;
    for byte in input[..end].bytes() {
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(byte - b'0'))?;
    }

    Some((value, end > 0, &input[end..]))
}

// Digits past what fits in a u64 are consumed but dropped.
fn leading_fraction(input: &str) -> (u64, f64, bool, &str) {
    let end = input
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(input.len());

    let mut value = 0u64;
    let mut scale = 1f64;
    let mut saturated = false;
    for byte in input[..end].bytes() {
        if saturated {
            continue;
        }
        let next = value
            .checked_mul(10)
            .and_then(|shifted| shifted.checked_add(u64::from(byte - b'0')));
        match next {
            Some(next) => {
                value = next;
                scale *= 10.0;
            }
            None => saturated = true,
        }
    }

    (value, scale, end > 0, &input[end..])
}
