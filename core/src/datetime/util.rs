// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::ToSpan;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::{AmbiguousOffset, TimeZone};
use jiff::Zoned;

/// Shift a date by a signed number of days, `None` when leaving the supported range.
pub fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(days.days()).ok()
}

/// Number of whole days from `from` to `to`, negative when `to` is earlier.
pub fn days_between(from: Date, to: Date) -> i64 {
    from.since(to)
        .map(|span| -i64::from(span.get_days()))
        .unwrap_or_default()
}

/// Whole minutes elapsed between two instants.
pub fn minutes_between(from: &Zoned, to: &Zoned) -> i64 {
    (to.timestamp().as_second() - from.timestamp().as_second()) / 60
}

/// Attach a time zone to a civil datetime, handles local time ambiguities:
/// - unambiguous times return directly;
/// - folds (the hour repeated when clocks go back) take the earlier instant;
/// - gaps (the hour skipped when clocks go forward) take the later instant.
pub fn from_local_datetime(tz: &TimeZone, dt: DateTime) -> Option<Zoned> {
    let ambiguous = tz.to_ambiguous_zoned(dt);
    match ambiguous.offset() {
        AmbiguousOffset::Unambiguous { .. } => ambiguous.compatible().ok(),
        AmbiguousOffset::Fold { .. } => {
            tracing::trace!(%dt, "ambiguous local time, picking earliest");
            ambiguous.earlier().ok()
        }
        AmbiguousOffset::Gap { .. } => {
            tracing::trace!(%dt, "local time falls in a gap, picking the later instant");
            ambiguous.later().ok()
        }
    }
}

/// Local midnight at the start of `date`.
pub fn start_of_day(tz: &TimeZone, date: Date) -> Option<Zoned> {
    from_local_datetime(tz, date.to_datetime(Time::midnight()))
}
