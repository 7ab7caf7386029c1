// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Date;

use crate::datetime::util::add_days;
use crate::types::WeekStart;

/// A date expressed as week-numbering year, week of year and day of week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoWeekDate {
    /// The week-numbering year, which differs from the calendar year around January 1st.
    pub year: i16,

    /// Week of the year, 1 to 53.
    pub week: i8,

    /// Day of the week, 1 being the configured week start.
    pub day: i8,
}

/// Gregorian leap year test.
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Week numbering following ISO 8601 rules: week 1 is the week holding
/// January 4th. With a Sunday week start the weeks run Sunday to Saturday
/// and the same rule applies.
pub fn iso_year_week_day(date: Date, week_start: WeekStart) -> Option<IsoWeekDate> {
    let day = week_start.day_number(date.weekday());
    // The fourth day of a week decides which year the week belongs to.
    let anchor = add_days(date, 3 - i64::from(day - 1))?;
    let week = i8::try_from((anchor.day_of_year() - 1) / 7 + 1).ok()?;
    Some(IsoWeekDate {
        year: anchor.year(),
        week,
        day,
    })
}

/// The first day of `week` in the week-numbering year `year`.
pub fn first_day_of_week(year: i16, week: i8, week_start: WeekStart) -> Option<Date> {
    let jan4 = Date::new(year, 1, 4).ok()?;
    let offset = i64::from(week_start.day_number(jan4.weekday()) - 1);
    let week1 = add_days(jan4, -offset)?;
    add_days(week1, (i64::from(week) - 1) * 7)
}

/// Number of weeks, 52 or 53, in the week-numbering year `year`.
pub fn weeks_in_year(year: i16, week_start: WeekStart) -> Option<i8> {
    // December 28th always falls in the last week of its year.
    let dec28 = Date::new(year, 12, 28).ok()?;
    iso_year_week_day(dec28, week_start).map(|w| w.week)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn detects_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn matches_iso_week_dates_for_monday_start() {
        let mut d = date(2019, 12, 1);
        while d < date(2027, 2, 1) {
            let iso = d.iso_week_date();
            let ours = iso_year_week_day(d, WeekStart::Monday).unwrap();
            assert_eq!(ours.year, iso.year(), "{d}");
            assert_eq!(ours.week, iso.week(), "{d}");
            assert_eq!(ours.day, iso.weekday().to_monday_one_offset(), "{d}");
            d = d.tomorrow().unwrap();
        }
    }

    #[test]
    fn assigns_year_boundary_weeks() {
        let w = iso_year_week_day(date(2024, 12, 30), WeekStart::Monday).unwrap();
        assert_eq!((w.year, w.week, w.day), (2025, 1, 1));

        let w = iso_year_week_day(date(2021, 1, 1), WeekStart::Monday).unwrap();
        assert_eq!((w.year, w.week, w.day), (2020, 53, 5));
    }

    #[test]
    fn numbers_sunday_start_weeks() {
        // 2023-01-01 is a Sunday, so it opens week 1.
        let w = iso_year_week_day(date(2023, 1, 1), WeekStart::Sunday).unwrap();
        assert_eq!((w.year, w.week, w.day), (2023, 1, 1));

        // 2026-01-01 is a Thursday, its Sunday-start week belongs to 2025.
        let w = iso_year_week_day(date(2026, 1, 1), WeekStart::Sunday).unwrap();
        assert_eq!(w.year, 2025);
        assert_eq!(w.day, 5);
    }

    #[test]
    fn finds_first_day_of_week() {
        assert_eq!(
            first_day_of_week(2025, 1, WeekStart::Monday),
            Some(date(2024, 12, 30))
        );
        assert_eq!(
            first_day_of_week(2024, 10, WeekStart::Monday),
            Some(date(2024, 3, 4))
        );
    }

    #[test]
    fn counts_weeks_in_year() {
        assert_eq!(weeks_in_year(2020, WeekStart::Monday), Some(53));
        assert_eq!(weeks_in_year(2024, WeekStart::Monday), Some(52));
    }
}
