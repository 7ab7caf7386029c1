// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::civil::Time;

use crate::error::{Error, Result};

/// Minutes in a day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// When an entry happens within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// Starts at a certain wall-clock time.
    Timed(Time),

    /// Occupies the whole day.
    AllDay,

    /// Has a date but no time.
    Untimed,
}

impl TimeOfDay {
    /// Decode the stored `HHMMSS` value, where `-1` marks an untimed entry and
    /// midnight with a full-day duration marks an all-day entry.
    pub fn from_hhmmss(value: i32, duration: i64) -> Result<Self> {
        if value < 0 {
            return Ok(TimeOfDay::Untimed);
        }
        if value == 0 && duration == MINUTES_PER_DAY {
            return Ok(TimeOfDay::AllDay);
        }

        let hhmmss = u32::try_from(value).map_err(|_| Error::invalid("time", value))?;
        let (h, m, s) = (hhmmss / 10_000, hhmmss / 100 % 100, hhmmss % 100);
        let part = |v: u32| i8::try_from(v).map_err(|_| Error::invalid("time", value));
        let time =
            Time::new(part(h)?, part(m)?, part(s)?, 0).map_err(|_| Error::invalid("time", value))?;
        Ok(TimeOfDay::Timed(time))
    }

    /// The start time, if the entry is timed.
    pub fn time(self) -> Option<Time> {
        match self {
            TimeOfDay::Timed(t) => Some(t),
            TimeOfDay::AllDay | TimeOfDay::Untimed => None,
        }
    }

    /// Minutes since midnight used for ordering; entries without a time sort first.
    pub fn sort_key(self) -> i32 {
        match self {
            TimeOfDay::Timed(t) => minutes_of(t),
            TimeOfDay::AllDay | TimeOfDay::Untimed => -1,
        }
    }
}

/// Minutes since midnight of a wall-clock time.
pub fn minutes_of(time: Time) -> i32 {
    i32::from(time.hour()) * 60 + i32::from(time.minute())
}

/// Minutes since midnight of an `HHMMSS` value.
pub fn time_to_minutes(hhmmss: u32) -> u32 {
    hhmmss / 10_000 * 60 + hhmmss / 100 % 100
}

/// Add minutes to an `HHMMSS` value, returning `HHMM00`.
///
/// The hour is not wrapped, so a result past midnight reads as e.g. `250000`.
pub fn add_duration(hhmmss: u32, minutes: u32) -> u32 {
    let total = time_to_minutes(hhmmss) + minutes;
    total / 60 * 10_000 + total % 60 * 100
}

/// Map a time of day to one of `slots_per_day` equal slots.
///
/// With `round_down`, a time sitting exactly on a slot boundary belongs to
/// the previous slot, so an entry ending at 11:00 does not reach the 11:00 slot.
pub fn time_slot(time: Time, slots_per_day: u32, round_down: bool) -> u32 {
    let slots = i64::from(slots_per_day.max(1));
    let minutes = i64::from(minutes_of(time));
    let mut slot = minutes * slots / MINUTES_PER_DAY;
    if round_down && slot * MINUTES_PER_DAY == minutes * slots {
        slot -= 1;
    }
    slot.clamp(0, slots) as u32
}
