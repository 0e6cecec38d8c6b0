//! Permissive text-to-scalar parsing used by the transcoder and the textual
//! date converters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::borrow::Cow;
use std::num::{ParseFloatError, ParseIntError};

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d %b %Y %H:%M:%S",
];

const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%d %B %Y", "%b %d, %Y"];

/// Drop a fraction made only of zeros: `"7.00"` → `"7"`. `"7."` is kept.
fn trim_zero_fraction(s: &str) -> &str {
    match s.rsplit_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
        _ => s,
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn split_radix(s: &str) -> (u32, &str) {
    let lower = s.get(..2).map(str::to_ascii_lowercase);
    match lower.as_deref() {
        Some("0x") => (16, &s[2..]),
        Some("0o") => (8, &s[2..]),
        Some("0b") => (2, &s[2..]),
        _ => (10, s),
    }
}

fn integer_parts(s: &str) -> (bool, u32, &str) {
    let (negative, body) = split_sign(trim_zero_fraction(s.trim()));
    let (radix, digits) = split_radix(body);
    (negative, radix, digits)
}

fn has_sign(digits: &str) -> bool {
    digits.starts_with(['+', '-'])
}

/// Signed integer with optional sign, `0x`/`0o`/`0b` prefix and a zero
/// fraction.
pub fn parse_i64(s: &str) -> Result<i64, ParseIntError> {
    let (negative, radix, digits) = integer_parts(s);
    if has_sign(digits) {
        // Only one sign, before any radix prefix; the std parser reports the
        // second one as an invalid digit.
        return i64::from_str_radix(&format!("+{digits}"), radix);
    }
    let digits: Cow<'_, str> = if negative {
        Cow::Owned(format!("-{digits}"))
    } else {
        Cow::Borrowed(digits)
    };
    i64::from_str_radix(&digits, radix)
}

/// Unsigned counterpart of [`parse_i64`]; a leading `-` is rejected.
pub fn parse_u64(s: &str) -> Result<u64, ParseIntError> {
    let (negative, radix, digits) = integer_parts(s);
    if negative || has_sign(digits) {
        // Let the std parser produce the InvalidDigit error.
        return u64::from_str_radix(&format!("-{digits}"), radix);
    }
    u64::from_str_radix(digits, radix)
}

pub fn parse_f64(s: &str) -> Result<f64, ParseFloatError> {
    s.trim().parse::<f64>()
}

/// `1`, `t`, `true`, `0`, `f`, `false`, ignoring ASCII case.
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s == "1" || s.eq_ignore_ascii_case("t") || s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s == "0" || s.eq_ignore_ascii_case("f") || s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Date/time from the common textual layouts. Offsets are dropped after
/// parsing, keeping the wall-clock time as written.
pub fn parse_datetime_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .or_else(|| parse_date_only(s).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Calendar date from the common textual layouts; date/time text is
/// accepted and truncated to its date.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    parse_date_only(s).or_else(|| parse_datetime_text(s).map(|dt| dt.date()))
}

fn parse_date_only(s: &str) -> Option<NaiveDate> {
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
}
