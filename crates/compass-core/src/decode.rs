//! Lenient decoding helpers for portal payloads.
//!
//! The portal has no published schema. Integers sometimes arrive as strings,
//! booleans as `0`/`1`, and timestamps in several formats. These helpers
//! turn any of those into a typed value or `None`, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a portal timestamp.
///
/// Accepted forms, tried in order:
/// - RFC 3339 (`2024-02-05T08:45:00Z`, `2024-02-05T08:45:00+11:00`)
/// - naive ISO date-time, read as UTC (`2024-02-05T08:45:00`, `2024-02-05 08:45:00.123`)
/// - ASP.NET JSON dates (`/Date(1707122700000)/`, `/Date(1707122700000+1100)/`)
/// - bare dates, read as midnight UTC (`2024-02-05`)
///
/// Empty or whitespace-only input yields `None` without a warning.
#[must_use]
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let parsed = DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| parse_naive(raw))
        .or_else(|| parse_aspnet_date(raw))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        });

    if parsed.is_none() {
        tracing::warn!(value = raw, "unparseable portal timestamp");
    }
    parsed
}

fn parse_naive(raw: &str) -> Option<DateTime<Utc>> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.and_utc())
}

fn parse_aspnet_date(raw: &str) -> Option<DateTime<Utc>> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let millis = leading_integer(inner)?;
    DateTime::from_timestamp_millis(millis)
}

/// Coerce a JSON value to an integer the way `parseInt` would: numbers are
/// truncated, strings contribute their leading signed digits.
#[must_use]
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_integer(s.trim()),
        _ => None,
    }
}

/// Coerce a JSON value to a boolean: booleans pass through, numbers are
/// non-zero, and the strings `true`/`false` (any case) are accepted.
#[must_use]
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// `deserialize_with` adapter for integer fields that may arrive as numbers,
/// numeric strings, or garbage.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_i64))
}

/// `deserialize_with` adapter for boolean fields that may arrive as `0`/`1`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_bool))
}

/// `deserialize_with` adapter for a list of integers, dropping entries that
/// do not coerce.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn lenient_i64_list<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.iter().filter_map(coerce_i64).collect()),
        _ => None,
    })
}

/// `deserialize_with` adapter for text fields that are sometimes numeric,
/// such as instance ids and person ids. Numbers and booleans are rendered as
/// text; arrays and objects become `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Resolve a portal-relative path (photo, attachment) against the base URL.
///
/// Absolute URLs pass through unchanged; empty input yields `None`.
#[must_use]
pub fn resolve_url(base: &Url, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    match base.join(path) {
        Ok(url) => Some(url.to_string()),
        Err(error) => {
            tracing::warn!(path, %error, "could not resolve portal path");
            None
        }
    }
}

/// Treat empty strings as absent.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://school.example").unwrap()
    }

    #[test]
    fn resolves_relative_photo_path() {
        assert_eq!(
            resolve_url(&base(), Some("/photo.jpg")).as_deref(),
            Some("https://school.example/photo.jpg")
        );
    }

    #[test]
    fn resolve_keeps_absolute_urls() {
        assert_eq!(
            resolve_url(&base(), Some("https://cdn.example/a.png")).as_deref(),
            Some("https://cdn.example/a.png")
        );
    }

    #[test]
    fn resolve_empty_is_none() {
        assert!(resolve_url(&base(), Some("")).is_none());
        assert!(resolve_url(&base(), Some("   ")).is_none());
        assert!(resolve_url(&base(), None).is_none());
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse_timestamp(Some("2024-02-05T08:45:00+11:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 4, 21, 45, 0).unwrap());
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse_timestamp(Some("2024-02-05T08:45:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 5, 8, 45, 0).unwrap());

        let spaced = parse_timestamp(Some("2024-02-05 08:45:00")).unwrap();
        assert_eq!(spaced, ts);
    }

    #[test]
    fn parses_aspnet_dates() {
        let ts = parse_timestamp(Some("/Date(1707122700000)/")).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_707_122_700_000);

        let offset = parse_timestamp(Some("/Date(1707122700000+1100)/")).unwrap();
        assert_eq!(offset, ts);
    }

    #[test]
    fn parses_bare_dates() {
        let ts = parse_timestamp(Some("2024-04-24")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 4, 24, 0, 0, 0).unwrap());
    }

    #[test]
    fn empty_and_garbage_timestamps_are_none() {
        assert!(parse_timestamp(None).is_none());
        assert!(parse_timestamp(Some("")).is_none());
        assert!(parse_timestamp(Some("next tuesday")).is_none());
    }

    #[rstest]
    #[case(json!(7), Some(7))]
    #[case(json!(7.9), Some(7))]
    #[case(json!("2024"), Some(2024))]
    #[case(json!(" 3 "), Some(3))]
    #[case(json!("-12abc"), Some(-12))]
    #[case(json!("abc"), None)]
    #[case(json!(""), None)]
    #[case(json!(null), None)]
    #[case(json!(true), None)]
    fn integer_coercion(#[case] value: Value, #[case] expected: Option<i64>) {
        assert_eq!(coerce_i64(&value), expected);
    }

    #[rstest]
    #[case(json!(true), Some(true))]
    #[case(json!(0), Some(false))]
    #[case(json!(1), Some(true))]
    #[case(json!("TRUE"), Some(true))]
    #[case(json!("yes"), None)]
    #[case(json!(null), None)]
    fn boolean_coercion(#[case] value: Value, #[case] expected: Option<bool>) {
        assert_eq!(coerce_bool(&value), expected);
    }

    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Probe {
        #[serde(deserialize_with = "lenient_i64")]
        period: Option<i64>,
        #[serde(deserialize_with = "lenient_bool")]
        flag: Option<bool>,
        #[serde(deserialize_with = "lenient_i64_list")]
        ids: Option<Vec<i64>>,
        #[serde(deserialize_with = "lenient_string")]
        instance: Option<String>,
    }

    #[test]
    fn adapters_tolerate_missing_and_mistyped_fields() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(probe.period.is_none());
        assert!(probe.flag.is_none());
        assert!(probe.ids.is_none());
        assert!(probe.instance.is_none());

        let probe: Probe = serde_json::from_value(json!({
            "period": "4",
            "flag": 1,
            "ids": [1, "2", "x", 3.0],
            "instance": 90210
        }))
        .unwrap();
        assert_eq!(probe.period, Some(4));
        assert_eq!(probe.flag, Some(true));
        assert_eq!(probe.ids, Some(vec![1, 2, 3]));
        assert_eq!(probe.instance.as_deref(), Some("90210"));

        let probe: Probe =
            serde_json::from_value(json!({ "period": {"nested": true}, "ids": "nope" })).unwrap();
        assert!(probe.period.is_none());
        assert!(probe.ids.is_none());
    }

    #[test]
    fn non_empty_filters_blank_strings() {
        assert_eq!(non_empty(Some("B Block".into())).as_deref(), Some("B Block"));
        assert!(non_empty(Some(String::new())).is_none());
        assert!(non_empty(None).is_none());
    }
}
