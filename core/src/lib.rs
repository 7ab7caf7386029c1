// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Recurrence expansion and scheduling engine of the Almanac calendar.

mod almanac;
mod byrule;
mod cache;
mod config;
mod conflict;
mod context;
pub mod datetime;
mod entry;
mod error;
mod expand;
mod matrix;
mod merge;
mod rrule;
mod split;
mod store;
mod types;

pub use crate::almanac::{Almanac, View};
pub use crate::byrule::{
    Period, by_day, by_month_day, by_set_pos, by_week_no, by_year_day, compose,
};
pub use crate::cache::{ExpansionCache, FileCache, MemoryCache, NoCache, cache_key};
pub use crate::config::{APP_NAME, Config, ENTRY_SLOTS_RANGE, PUBLIC_LOGIN};
pub use crate::conflict::{
    Conflict, ConflictLabel, ConflictRequest, check_conflicts, times_overlap,
};
pub use crate::context::RequestContext;
pub use crate::datetime::TimeOfDay;
pub use crate::entry::{CONTINUED_SUFFIX, Entry, Occurrence};
pub use crate::error::{Error, Result};
pub use crate::expand::{Horizon, RecurrenceExpander, expand, shift_dates};
pub use crate::matrix::{ALL_ROW, BusyMatrix, Cell, MatrixRow, busy_matrix};
pub use crate::merge::{
    ExpandedEntry, MergeOptions, apply_layer_policy, combine, entries_for_day, merge_for_day,
    repeating_for_day, sort_occurrences, tasks_for_day,
};
pub use crate::rrule::{ByDay, COUNT_UNSET, ExceptionSet, Frequency, RecurrenceRule};
pub use crate::split::split_midnight_crossing;
pub use crate::store::{
    Action, Category, CategoryFilter, Directory, EntryClass, EntryQuery, EntryRow, EntryStore,
    Layer, MemoryStore, Permission, RepeatRow,
};
pub use crate::types::{
    Access, CategoryId, EntryId, EntryKind, NameOrder, Priority, Status, WeekStart,
};
