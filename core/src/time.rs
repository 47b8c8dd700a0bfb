//! Time related utils.

use crate::Error;
use chrono::SecondsFormat;

/// DateTime used across provsign, UTC only.
pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Duration alias for the chrono duration type.
pub type Duration = chrono::TimeDelta;

/// Return the current UTC instant.
///
/// All access-window math starts from an instant captured here; never
/// round-trip instants through formatted strings.
pub fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format a datetime into an RFC 3339 string like `2022-03-01T08:12:34Z`.
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC 3339 string into a datetime.
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&chrono::Utc))
        .map_err(|e| Error::unexpected(format!("failed to parse datetime: {s}")).with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rfc3339() {
        let t = parse_rfc3339("2022-03-01T08:12:34Z").unwrap();
        assert_eq!(format_rfc3339(t), "2022-03-01T08:12:34Z");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offsets() {
        let t = parse_rfc3339("2022-03-01T09:12:34+01:00").unwrap();
        assert_eq!(format_rfc3339(t), "2022-03-01T08:12:34Z");
    }

    #[test]
    fn test_parse_rfc3339_rejects_garbage() {
        assert!(parse_rfc3339("yesterday").is_err());
    }
}
