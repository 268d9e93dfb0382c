use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::errors::ListensError;
use crate::listen::SunlightWindow;

/// Returns the calendar date observed in `iana_timezone` at `instant_utc`.
pub fn local_date(instant_utc: DateTime<Utc>, iana_timezone: &str) -> Result<NaiveDate, ListensError> {
    let timezone: Tz = iana_timezone
        .parse()
        .map_err(|_| ListensError::InvalidIanaTimezone(iana_timezone.to_owned()))?;

    Ok(instant_utc.with_timezone(&timezone).naive_local().date())
}

/// Whether the sun is up at `instant_utc`. Sunrise itself counts as
/// day; sunset itself counts as night.
pub fn is_day(instant_utc: DateTime<Utc>, window: &SunlightWindow) -> bool {
    window.sunrise_utc() <= instant_utc && instant_utc < window.sunset_utc()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    use super::*;

    fn utc(d: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 11, d, h, m, s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 11, d).unwrap()
    }

    fn new_york_window() -> SunlightWindow {
        SunlightWindow::new(utc(12, 11, 40, 4), utc(12, 21, 40, 26)).unwrap()
    }

    #[test]
    fn local_date_follows_the_offset() {
        assert_eq!(local_date(utc(12, 15, 30, 0), "America/New_York").unwrap(), date(12));
        // 03:00 UTC is still the previous evening in New York
        assert_eq!(local_date(utc(13, 3, 0, 0), "America/New_York").unwrap(), date(12));
        assert_eq!(local_date(utc(12, 20, 0, 0), "Asia/Tokyo").unwrap(), date(13));
        assert_eq!(local_date(utc(12, 10, 0, 0), "Pacific/Kiritimati").unwrap(), date(13));
        assert_eq!(local_date(utc(12, 23, 59, 59), "UTC").unwrap(), date(12));
    }

    #[test]
    fn unknown_timezones_are_rejected() {
        match local_date(utc(12, 15, 30, 0), "Mars/Olympus_Mons") {
            Err(ListensError::InvalidIanaTimezone(tz)) => assert_eq!(tz, "Mars/Olympus_Mons"),
            other => panic!("expected InvalidIanaTimezone, got {:?}", other),
        }
    }

    #[test]
    fn window_is_half_open() {
        let window = new_york_window();

        assert!(is_day(window.sunrise_utc(), &window));
        assert!(!is_day(window.sunrise_utc() - Duration::seconds(1), &window));
        assert!(is_day(utc(12, 15, 30, 0), &window));
        assert!(is_day(window.sunset_utc() - Duration::seconds(1), &window));
        assert!(!is_day(window.sunset_utc(), &window));
        assert!(!is_day(utc(12, 23, 0, 0), &window));
    }

    proptest! {
        #[test]
        fn day_iff_within_window(offset in -200_000i64..200_000) {
            let window = new_york_window();
            let instant = window.sunrise_utc() + Duration::seconds(offset);

            let expected = window.sunrise_utc() <= instant && instant < window.sunset_utc();
            prop_assert_eq!(is_day(instant, &window), expected);
        }
    }
}
