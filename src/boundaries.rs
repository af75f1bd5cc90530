//! Day-boundary instants in US Eastern time as a fixed literal offset.
//!
//! The offset is `-05:00` (standard) or `-04:00` (daylight), chosen once per
//! computation by the caller. This deliberately does not consult the IANA
//! timezone database, so the two transition days each year resolve with
//! whichever offset the caller picked. The daily rollups this feeds accept
//! that imprecision; switching to real timezone lookups would be a behavior
//! change, not a bug fix.

use chrono::{DateTime, FixedOffset, NaiveDate};

/// Local hour after which an attendance post counts as late.
pub const ATTENDANCE_CUTOFF_HOUR: u32 = 10;
/// Local hour for the midday PR tally.
pub const MIDDAY_CUTOFF_HOUR: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub attendance_cutoff: DateTime<FixedOffset>,
    pub midday_cutoff: DateTime<FixedOffset>,
}

pub fn eastern_offset(daylight: bool) -> FixedOffset {
    let hours = if daylight { 4 } else { 5 };
    FixedOffset::west_opt(hours * 3600).expect("offset is in range")
}

/// An absolute instant for a local wall-clock time on the given date.
pub fn local_instant(
    date: NaiveDate,
    hour: u32,
    minute: u32,
    second: u32,
    offset: FixedOffset,
) -> DateTime<FixedOffset> {
    date.and_hms_opt(hour, minute, second)
        .expect("wall-clock time is in range")
        .and_local_timezone(offset)
        .single()
        .expect("fixed offsets map local times uniquely")
}

/// The four instants compliance checks compare against. Comparisons happen
/// on `DateTime` values, never on raw timestamp strings.
pub fn day_bounds(date: NaiveDate, offset: FixedOffset) -> DayBounds {
    DayBounds {
        start: local_instant(date, 0, 0, 0, offset),
        end: local_instant(date, 23, 59, 59, offset),
        attendance_cutoff: local_instant(date, ATTENDANCE_CUTOFF_HOUR, 0, 0, offset),
        midday_cutoff: local_instant(date, MIDDAY_CUTOFF_HOUR, 0, 0, offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn feb_third() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
    }

    #[test]
    fn bounds_are_ordered_within_the_day() {
        let bounds = day_bounds(feb_third(), eastern_offset(false));
        assert!(bounds.start < bounds.attendance_cutoff);
        assert!(bounds.attendance_cutoff < bounds.midday_cutoff);
        assert!(bounds.midday_cutoff < bounds.end);
    }

    #[test]
    fn standard_offset_places_ten_local_at_fifteen_utc() {
        let bounds = day_bounds(feb_third(), eastern_offset(false));
        let expected = Utc.with_ymd_and_hms(2026, 2, 3, 15, 0, 0).unwrap();
        assert_eq!(bounds.attendance_cutoff, expected);
    }

    #[test]
    fn daylight_offset_shifts_the_cutoff_an_hour_earlier_in_utc() {
        let bounds = day_bounds(feb_third(), eastern_offset(true));
        let expected = Utc.with_ymd_and_hms(2026, 2, 3, 14, 0, 0).unwrap();
        assert_eq!(bounds.attendance_cutoff, expected);
    }

    #[test]
    fn utc_message_timestamps_compare_as_instants() {
        let bounds = day_bounds(feb_third(), eastern_offset(false));
        // 09:59 local is 14:59 UTC under -05:00.
        let on_time = Utc.with_ymd_and_hms(2026, 2, 3, 14, 59, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 2, 3, 15, 1, 0).unwrap();
        assert!(on_time < bounds.attendance_cutoff);
        assert!(late > bounds.attendance_cutoff);
    }

    #[test]
    fn day_start_and_end_span_the_local_day() {
        let bounds = day_bounds(feb_third(), eastern_offset(false));
        assert_eq!(
            bounds.start,
            Utc.with_ymd_and_hms(2026, 2, 3, 5, 0, 0).unwrap()
        );
        assert_eq!(
            bounds.end,
            Utc.with_ymd_and_hms(2026, 2, 4, 4, 59, 59).unwrap()
        );
    }
}
