// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Splitting of occurrences that run past local midnight into one fragment
//! per calendar day.

use jiff::Zoned;
use jiff::civil::{Date, Time};
use jiff::tz::TimeZone;
use jiff::SignedDuration;

use crate::datetime::{TimeOfDay, add_days, from_local_datetime, minutes_between, start_of_day};
use crate::entry::Occurrence;

/// Longest duration of a single fragment, one minute short of a day.
const MAX_FRAGMENT_MINUTES: i64 = 1439;

/// State carried down the split of one occurrence.
#[derive(Debug, Clone)]
struct Carry {
    /// Real end instant of the whole occurrence.
    end: Zoned,

    /// Date of the occurrence that was split.
    origin: Date,
}

/// Split an occurrence into per-day fragments when it crosses midnight.
///
/// The first element is the original occurrence, shortened to end at 23:59.
/// Each further fragment starts at midnight of the following day, carries
/// the origin date in `clone_of` and is displayed with a `(cont.)` suffix.
/// All-day, untimed and task occurrences are returned unchanged, as is
/// everything when `enabled` is false.
pub fn split_midnight_crossing(occ: Occurrence, tz: &TimeZone, enabled: bool) -> Vec<Occurrence> {
    let Some(start_time) = occ.time.time() else {
        return vec![occ];
    };
    if !enabled || occ.is_all_day() || occ.entry.kind.is_task() || occ.duration <= 0 {
        return vec![occ];
    }

    let Some(start) = from_local_datetime(tz, occ.date.to_datetime(start_time)) else {
        return vec![occ];
    };
    let Some(end) = start
        .timestamp()
        .checked_add(SignedDuration::from_mins(occ.duration))
        .ok()
        .map(|ts| ts.to_zoned(tz.clone()))
    else {
        return vec![occ];
    };
    let Some(midnight) = add_days(occ.date, 1).and_then(|d| start_of_day(tz, d)) else {
        return vec![occ];
    };
    if end <= midnight {
        return vec![occ];
    }

    tracing::trace!(id = %occ.id(), date = %occ.date, "splitting midnight crossing occurrence");
    let mut primary = occ.clone();
    primary.duration = (minutes_between(&start, &midnight) - 1).max(0);

    let carry = Carry {
        end,
        origin: occ.date,
    };
    let mut fragments = vec![primary];
    continue_split(&occ, &carry, midnight, &mut fragments);
    fragments
}

/// Emit the fragment starting at `midnight`, recursing while the remainder
/// still runs past the next midnight.
fn continue_split(occ: &Occurrence, carry: &Carry, midnight: Zoned, out: &mut Vec<Occurrence>) {
    let day = midnight.date();
    let next = add_days(day, 1).and_then(|d| start_of_day(midnight.time_zone(), d));

    let mut fragment = occ.clone();
    fragment.date = day;
    fragment.time = TimeOfDay::Timed(Time::midnight());
    fragment.clone_of = Some(carry.origin);

    match next {
        Some(next) if carry.end > next => {
            fragment.duration = MAX_FRAGMENT_MINUTES;
            out.push(fragment);
            continue_split(occ, carry, next, out);
        }
        _ => {
            fragment.duration =
                (minutes_between(&midnight, &carry.end) + 1).min(MAX_FRAGMENT_MINUTES);
            out.push(fragment);
        }
    }
}
