// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Resolution of BY* modifiers to the dates they select within one period.
//!
//! Every function here is pure. Values outside their semantic range select
//! nothing instead of failing.

use jiff::civil::{Date, Weekday};

use crate::datetime::{add_days, first_day_of_week, weeks_in_year};
use crate::rrule::ByDay;
use crate::types::WeekStart;

/// The period a BYDAY list is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The reference date itself; ordinals are ignored.
    Day,

    /// The week holding the reference date; ordinals are ignored.
    Week(WeekStart),

    /// The month holding the reference date.
    Month,

    /// The year holding the reference date.
    Year,
}

/// Dates of the period around `reference` matching any entry of `list`.
///
/// An unsigned entry selects every such weekday of the period, `N` the Nth
/// one from the start and `-N` the Nth one from the end. Ordinals that
/// overshoot the period select nothing.
pub fn by_day(list: &[ByDay], reference: Date, period: Period) -> Vec<Date> {
    let mut dates = match period {
        Period::Day => {
            if list.iter().any(|b| b.weekday == reference.weekday()) {
                vec![reference]
            } else {
                Vec::new()
            }
        }
        Period::Week(week_start) => {
            let offset = i64::from(week_start.day_number(reference.weekday()) - 1);
            let Some(first) = add_days(reference, -offset) else {
                return Vec::new();
            };
            list.iter()
                .filter_map(|b| add_days(first, i64::from(week_start.day_number(b.weekday) - 1)))
                .collect()
        }
        Period::Month => within(list, reference.first_of_month(), reference.last_of_month()),
        Period::Year => within(list, reference.first_of_year(), reference.last_of_year()),
    };
    dates.sort_unstable();
    dates.dedup();
    dates
}

fn within(list: &[ByDay], first: Date, last: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    for entry in list {
        let Some(first_match) = add_days(first, forward(first.weekday(), entry.weekday)) else {
            continue;
        };
        match entry.nth {
            None => {
                let mut d = first_match;
                while d <= last {
                    dates.push(d);
                    match add_days(d, 7) {
                        Some(next) => d = next,
                        None => break,
                    }
                }
            }
            Some(n) if n > 0 => {
                if let Some(d) = add_days(first_match, (i64::from(n) - 1) * 7)
                    && d <= last
                {
                    dates.push(d);
                }
            }
            Some(n) => {
                let back = forward(entry.weekday, last.weekday());
                if let Some(last_match) = add_days(last, -back)
                    && let Some(d) = add_days(last_match, (i64::from(n) + 1) * 7)
                    && d >= first
                {
                    dates.push(d);
                }
            }
        }
    }
    dates
}

/// Days from `from` forward to the next `to`, 0 when equal.
fn forward(from: Weekday, to: Weekday) -> i64 {
    i64::from(to.to_sunday_zero_offset() - from.to_sunday_zero_offset()).rem_euclid(7)
}

/// Dates of the month around `reference` for signed days of month, dropping
/// any date before `not_before`.
pub fn by_month_day(list: &[i8], reference: Date, not_before: Date) -> Vec<Date> {
    let dim = reference.days_in_month();
    let mut dates: Vec<Date> = list
        .iter()
        .filter_map(|&d| {
            let day = match d {
                0 => return None,
                d if d > 0 => d,
                d => dim + d + 1,
            };
            if !(1..=dim).contains(&day) {
                return None;
            }
            Date::new(reference.year(), reference.month(), day).ok()
        })
        .filter(|d| *d >= not_before)
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Dates of `year` for signed days of year, dropping any date before `not_before`.
pub fn by_year_day(list: &[i16], year: i16, not_before: Date) -> Vec<Date> {
    let Ok(jan1) = Date::new(year, 1, 1) else {
        return Vec::new();
    };
    let diy = jan1.days_in_year();
    let mut dates: Vec<Date> = list
        .iter()
        .filter_map(|&d| {
            let day = match d {
                0 => return None,
                d if d > 0 => d,
                d => diy + d + 1,
            };
            if !(1..=diy).contains(&day) {
                return None;
            }
            add_days(jan1, i64::from(day) - 1)
        })
        .filter(|d| *d >= not_before)
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// All days of the listed weeks of the week-numbering year `year`.
pub fn by_week_no(list: &[i8], year: i16, week_start: WeekStart) -> Vec<Date> {
    let Some(weeks) = weeks_in_year(year, week_start) else {
        return Vec::new();
    };
    let mut dates = Vec::new();
    for &w in list {
        let week = match w {
            0 => continue,
            w if w > 0 => w,
            w => weeks + w + 1,
        };
        if !(1..=weeks).contains(&week) {
            continue;
        }
        if let Some(first) = first_day_of_week(year, week, week_start) {
            dates.extend((0..7).filter_map(|i| add_days(first, i)));
        }
    }
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Pick the dates at signed 1-based `positions` of the sorted candidates.
/// Positions beyond either end select nothing.
pub fn by_set_pos(candidates: &[Date], positions: &[i32]) -> Vec<Date> {
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let len = sorted.len() as i64;
    let mut dates: Vec<Date> = positions
        .iter()
        .filter_map(|&p| {
            let p = i64::from(p);
            let index = match p {
                p if p > 0 && p <= len => p - 1,
                p if p < 0 && -p <= len => len + p,
                _ => return None,
            };
            usize::try_from(index).ok().and_then(|i| sorted.get(i).copied())
        })
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Combine the BYDAY and BYMONTHDAY results of one period.
///
/// `None` means the modifier is absent from the rule. Both present yields
/// their intersection, one present yields its own result and none present
/// yields the period's anchor date.
pub fn compose(
    by_day: Option<Vec<Date>>,
    by_month_day: Option<Vec<Date>>,
    anchor: Option<Date>,
) -> Vec<Date> {
    match (by_day, by_month_day) {
        (Some(days), Some(month_days)) => days
            .into_iter()
            .filter(|d| month_days.binary_search(d).is_ok())
            .collect(),
        (Some(dates), None) | (None, Some(dates)) => dates,
        (None, None) => anchor.into_iter().collect(),
    }
}
