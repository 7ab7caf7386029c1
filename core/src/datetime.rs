// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

mod arith;
mod iso;
mod slot;
mod util;

pub use arith::{StepUnit, add_interval};
pub use iso::{IsoWeekDate, first_day_of_week, is_leap_year, iso_year_week_day, weeks_in_year};
pub use slot::{
    MINUTES_PER_DAY, TimeOfDay, add_duration, minutes_of, time_slot, time_to_minutes,
};
pub use util::{add_days, days_between, from_local_datetime, minutes_between, start_of_day};
