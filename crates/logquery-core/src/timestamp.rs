use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use logquery_types::{INTERNAL_INDEXER_FORMAT, INVALID_DATE, QueryError, Term};

/// Offset-qualified layouts tried after RFC 3339
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Layouts without an offset; read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Interpret a term as an instant in UTC
///
/// Numbers are milliseconds since the Unix epoch (fractions truncated).
/// Text is ISO 8601: with an offset it is converted to UTC, without one it
/// is taken as UTC already. A bare date means midnight.
pub fn parse_timestamp(value: impl Into<Term>) -> Result<DateTime<Utc>, QueryError> {
    let value = value.into();
    let invalid = || QueryError::InvalidTimestamp(value.to_string());

    match &value {
        Term::Text(s) => parse_text(s.trim()).ok_or_else(invalid),
        Term::Integer(millis) => DateTime::from_timestamp_millis(*millis).ok_or_else(invalid),
        Term::Float(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(millis.trunc() as i64).ok_or_else(invalid)
        }
        Term::Float(_) | Term::Null | Term::Undefined => Err(invalid()),
    }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(s, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Render a timestamp as a quoted literal in the indexer's datetime format
///
/// Input that is not a timestamp renders as `"Invalid date"` instead of
/// failing.
pub fn format_timestamp(value: impl Into<Term>) -> String {
    let formatted = match parse_timestamp(value) {
        Ok(ts) => ts.format(INTERNAL_INDEXER_FORMAT).to_string(),
        Err(err) => {
            tracing::debug!(%err, "rendering invalid timestamp");
            INVALID_DATE.to_string()
        }
    };

    format!("\"{}\"", formatted)
}
