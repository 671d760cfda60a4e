//! Shared coercion helpers for CSV fields and document values.
//!
//! Every parser returns `Option` — `None` for anything unparsable or
//! outside the valid domain — so callers can map failures to the
//! appropriate field marker instead of propagating errors.

use chrono::NaiveTime;

/// Parses a duration in minutes. Negative and non-finite values are
/// invalid, not clamped.
#[must_use]
pub fn parse_minutes(s: &str) -> Option<f64> {
    let minutes = s.trim().parse::<f64>().ok()?;
    (minutes.is_finite() && minutes >= 0.0).then_some(minutes)
}

/// Parses an intervention count.
#[must_use]
pub fn parse_count(s: &str) -> Option<u64> {
    s.trim().parse::<u64>().ok()
}

/// Parses a percentage value in `[0, 100]`.
#[must_use]
pub fn parse_percentage(s: &str) -> Option<f64> {
    let pct = s.trim().parse::<f64>().ok()?;
    (pct.is_finite() && (0.0..=100.0).contains(&pct)).then_some(pct)
}

/// Parses a time of day, accepting `HH:MM:SS` and `HH:MM`.
#[must_use]
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return Some(t);
    }
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Extracts a non-empty string field from a JSON document.
#[must_use]
pub fn json_string(value: &serde_json::Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Extracts a boolean field from a JSON document.
#[must_use]
pub fn json_bool(value: &serde_json::Value) -> Option<bool> {
    value.as_bool()
}

/// Extracts a non-negative number from a JSON document.
///
/// Accepts both JSON numbers and numeric strings — some exports quote
/// the `eta` field.
#[must_use]
pub fn json_non_negative(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

/// Extracts an array of string tags from a JSON document.
///
/// Anything that is not an array yields an empty list; non-string
/// elements inside the array are dropped.
#[must_use]
pub fn json_string_array(value: &serde_json::Value) -> Vec<String> {
    value.as_array().map_or_else(Vec::new, |items| {
        items.iter().filter_map(json_string).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_minutes() {
        assert_eq!(parse_minutes("12.5"), Some(12.5));
        assert_eq!(parse_minutes(" 7 "), Some(7.0));
    }

    #[test]
    fn rejects_negative_and_garbage_minutes() {
        assert_eq!(parse_minutes("-1"), None);
        assert_eq!(parse_minutes("bad"), None);
        assert_eq!(parse_minutes("NaN"), None);
        assert_eq!(parse_minutes("inf"), None);
    }

    #[test]
    fn parses_time_formats() {
        let full = parse_time_of_day("22:15:30").unwrap();
        assert_eq!(full, NaiveTime::from_hms_opt(22, 15, 30).unwrap());
        let short = parse_time_of_day("01:45").unwrap();
        assert_eq!(short, NaiveTime::from_hms_opt(1, 45, 0).unwrap());
    }

    #[test]
    fn rejects_unparsable_time() {
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("mezzanotte"), None);
    }

    #[test]
    fn percentage_bounds() {
        assert_eq!(parse_percentage("0"), Some(0.0));
        assert_eq!(parse_percentage("100"), Some(100.0));
        assert_eq!(parse_percentage("101"), None);
        assert_eq!(parse_percentage("-5"), None);
    }

    #[test]
    fn json_string_rejects_wrong_types() {
        assert_eq!(json_string(&serde_json::json!("Roma")), Some("Roma".to_string()));
        assert_eq!(json_string(&serde_json::json!("  ")), None);
        assert_eq!(json_string(&serde_json::json!(42)), None);
        assert_eq!(json_string(&serde_json::Value::Null), None);
    }

    #[test]
    fn json_number_accepts_numeric_strings() {
        assert_eq!(json_non_negative(&serde_json::json!(63)), Some(63.0));
        assert_eq!(json_non_negative(&serde_json::json!("63")), Some(63.0));
        assert_eq!(json_non_negative(&serde_json::json!("sessanta")), None);
        assert_eq!(json_non_negative(&serde_json::json!(-2)), None);
        assert_eq!(json_non_negative(&serde_json::json!(true)), None);
    }

    #[test]
    fn json_tags_from_non_array_is_empty() {
        assert!(json_string_array(&serde_json::json!("dispnea")).is_empty());
        assert_eq!(
            json_string_array(&serde_json::json!(["dispnea", 3, "trauma"])),
            vec!["dispnea".to_string(), "trauma".to_string()]
        );
    }
}
