use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::Serializer;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO 8601 instant. Values with an offset are converted to
/// UTC; values without one are read as UTC.
///
/// ```
/// use listens::iso8601::parse;
/// assert_eq!(parse("2018-11-12T10:30:00-05:00"), parse("2018-11-12T15:30:00"));
/// ```
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Formats an instant as a UTC date and time without an offset, with
/// fractional seconds only when there are any.
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.naive_utc().format(NAIVE_FORMATS[0]).to_string()
}

/// The current instant at the microsecond precision Postgres stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(instant))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_values_are_utc() {
        let expected = Utc.with_ymd_and_hms(2018, 11, 12, 15, 30, 0).unwrap();

        assert_eq!(parse("2018-11-12T15:30:00"), Some(expected));
        assert_eq!(parse("2018-11-12 15:30:00"), Some(expected));
        assert_eq!(parse("2018-11-12T15:30:00Z"), Some(expected));
        assert_eq!(parse("2018-11-12T16:30:00+01:00"), Some(expected));
    }

    #[test]
    fn fractions_survive() {
        let instant = parse("2018-11-12T15:30:00.250").unwrap();

        assert_eq!(format(&instant), "2018-11-12T15:30:00.250");
        assert_eq!(
            format(&Utc.with_ymd_and_hms(2018, 11, 12, 15, 30, 0).unwrap()),
            "2018-11-12T15:30:00"
        );
    }

    #[test]
    fn now_survives_formatting() {
        let instant = now();

        assert_eq!(instant, instant.trunc_subsecs(6));
        assert_eq!(parse(&format(&instant)), Some(instant));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2018-13-12T15:30:00"), None);
        assert_eq!(parse(""), None);
    }
}
