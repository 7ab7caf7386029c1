// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use jiff::{SignedDuration, Zoned};

/// Unit of a calendar step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    /// One day, 24 hours of absolute time before correction.
    Day,

    /// One week, seven days.
    Week,
}

impl StepUnit {
    fn hours(self) -> i64 {
        match self {
            StepUnit::Day => 24,
            StepUnit::Week => 7 * 24,
        }
    }
}

/// Advance `start` by `interval` units of absolute time, then undo the hour
/// a daylight-saving transition added or removed so the wall-clock hour of
/// `start` is kept.
///
/// A 23 to 0 flip means the clocks jumped forward over midnight and a 0 to
/// 23 flip means they fell back over it; those are compared as neighbouring
/// hours rather than as a 23-hour difference.
pub fn add_interval(start: &Zoned, unit: StepUnit, interval: i64) -> Option<Zoned> {
    let hours = unit.hours().checked_mul(interval)?;
    let raw = start
        .timestamp()
        .checked_add(SignedDuration::from_hours(hours))
        .ok()?
        .to_zoned(start.time_zone().clone());

    let before = start.hour();
    let after = raw.hour();
    let correction = match (before, after) {
        _ if before == after => return Some(raw),
        (23, 0) => -1,
        (0, 23) => 1,
        _ if before > after => 1,
        _ => -1,
    };

    raw.timestamp()
        .checked_add(SignedDuration::from_hours(correction))
        .ok()
        .map(|ts| ts.to_zoned(start.time_zone().clone()))
}
