// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::sync::Arc;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Zoned};

use crate::datetime::{MINUTES_PER_DAY, TimeOfDay, add_days, from_local_datetime, minutes_of};
use crate::rrule::{ExceptionSet, RecurrenceRule};
use crate::types::{Access, CategoryId, EntryId, EntryKind, Priority, Status};

/// Time used to anchor entries without a start time, so stepping across a
/// DST transition cannot move them to a neighbouring day.
const UNTIMED_ANCHOR: Time = Time::constant(12, 0, 0, 0);

/// Suffix appended to the name of a continuation fragment.
pub const CONTINUED_SUFFIX: &str = " (cont.)";

/// A calendar entry as seen on one participant's calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry identifier, shared by every participant row.
    pub id: EntryId,

    /// Parent entry when this one is an external continuation.
    pub ext_for_id: Option<EntryId>,

    /// Login of the user who created the entry.
    pub created_by: String,

    /// Login of the participant whose calendar this row belongs to.
    pub login: String,

    pub name: String,

    pub description: String,

    pub location: Option<String>,

    pub category: Option<CategoryId>,

    pub priority: Priority,

    pub access: Access,

    /// Participation status of `login`.
    pub status: Status,

    pub kind: EntryKind,

    /// Date of the first occurrence.
    pub date: Date,

    pub time: TimeOfDay,

    /// Duration in minutes.
    pub duration: i64,

    /// Due date and time of a task.
    pub due: Option<DateTime>,

    /// Completion date of a task.
    pub completed: Option<Date>,

    /// Completion percent of a task for `login`.
    pub percent: Option<u8>,

    pub rule: Option<RecurrenceRule>,

    /// Exception and inclusion dates of a repeating entry.
    pub exceptions: ExceptionSet,
}

impl Entry {
    /// Whether the entry carries a recurrence rule.
    pub fn is_repeating(&self) -> bool {
        self.rule.is_some()
    }

    /// Whether the entry occupies its whole day.
    pub fn is_all_day(&self) -> bool {
        matches!(self.time, TimeOfDay::AllDay)
    }

    /// Last calendar day a timed entry runs into, on the wall clock.
    pub fn last_date(&self) -> Date {
        let TimeOfDay::Timed(start) = self.time else {
            return self.date;
        };
        let end = i64::from(minutes_of(start)) + self.duration;
        let days = (end - 1).max(0) / MINUTES_PER_DAY;
        add_days(self.date, days).unwrap_or(self.date)
    }

    /// The instant recurrence stepping starts from.
    pub fn anchor(&self, tz: &TimeZone) -> Option<Zoned> {
        let time = self.time.time().unwrap_or(UNTIMED_ANCHOR);
        from_local_datetime(tz, self.date.to_datetime(time))
    }
}

/// One concrete appearance of an entry on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub entry: Arc<Entry>,

    /// The calendar day of this appearance.
    pub date: Date,

    pub time: TimeOfDay,

    /// Duration in minutes, possibly shortened by a midnight split.
    pub duration: i64,

    /// Origin date when this is the continuation fragment of a split.
    pub clone_of: Option<Date>,
}

impl Occurrence {
    /// The entry on its own base date.
    pub fn of(entry: Arc<Entry>) -> Self {
        let date = entry.date;
        Self::on(entry, date)
    }

    /// The entry on `date`, keeping its time and duration.
    pub fn on(entry: Arc<Entry>, date: Date) -> Self {
        Occurrence {
            date,
            time: entry.time,
            duration: entry.duration,
            clone_of: None,
            entry,
        }
    }

    pub fn id(&self) -> EntryId {
        self.entry.id
    }

    /// Whether this is the continuation fragment of a split entry.
    pub fn is_continuation(&self) -> bool {
        self.clone_of.is_some()
    }

    /// Display name, continuation fragments are marked.
    pub fn name(&self) -> Cow<'_, str> {
        if self.is_continuation() {
            Cow::Owned(format!("{}{CONTINUED_SUFFIX}", self.entry.name))
        } else {
            Cow::Borrowed(&self.entry.name)
        }
    }

    /// Wall-clock end of a timed occurrence, wrapping past midnight.
    pub fn end_time(&self) -> Option<Time> {
        let start = self.time.time()?;
        Some(start.wrapping_add(SignedDuration::from_mins(self.duration)))
    }

    /// Whether the occurrence blocks the whole day.
    pub fn is_all_day(&self) -> bool {
        matches!(self.time, TimeOfDay::AllDay)
            || (self.time == TimeOfDay::Timed(Time::midnight())
                && self.duration == MINUTES_PER_DAY)
    }
}
