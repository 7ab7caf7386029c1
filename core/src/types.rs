// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use jiff::civil::Weekday;

use crate::error::Error;

/// Identifier of a calendar entry as assigned by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId(value)
    }
}

/// Identifier of a user category.
pub type CategoryId = i64;

/// Visibility of an entry to users other than its participants.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Visible to everyone with view permission.
    #[default]
    Public,

    /// Shown as busy time, details hidden except to assistants and admins.
    Confidential,

    /// Shown as busy time, details hidden from everybody else.
    Private,
}

impl Access {
    const CODE_PUBLIC: &str = "P";
    const CODE_CONFIDENTIAL: &str = "C";
    const CODE_PRIVATE: &str = "R";
}

impl AsRef<str> for Access {
    fn as_ref(&self) -> &str {
        match self {
            Access::Public => Self::CODE_PUBLIC,
            Access::Confidential => Self::CODE_CONFIDENTIAL,
            Access::Private => Self::CODE_PRIVATE,
        }
    }
}

impl FromStr for Access {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            Self::CODE_PUBLIC | "" => Ok(Access::Public),
            Self::CODE_CONFIDENTIAL => Ok(Access::Confidential),
            Self::CODE_PRIVATE => Ok(Access::Private),
            _ => Err(Error::invalid("access", value)),
        }
    }
}

/// Participation status for one participant of an entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted by the participant.
    #[default]
    Approved,

    /// Awaiting the participant's approval.
    Waiting,

    /// Rejected by the participant.
    Rejected,

    /// Deleted for the participant.
    Deleted,
}

impl Status {
    const CODE_APPROVED: &str = "A";
    const CODE_WAITING: &str = "W";
    const CODE_REJECTED: &str = "R";
    const CODE_DELETED: &str = "D";

    /// Whether the entry still occupies the participant's calendar.
    pub fn is_active(self) -> bool {
        matches!(self, Status::Approved | Status::Waiting)
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        match self {
            Status::Approved => Self::CODE_APPROVED,
            Status::Waiting => Self::CODE_WAITING,
            Status::Rejected => Self::CODE_REJECTED,
            Status::Deleted => Self::CODE_DELETED,
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            Self::CODE_APPROVED | "" => Ok(Status::Approved),
            Self::CODE_WAITING => Ok(Status::Waiting),
            Self::CODE_REJECTED => Ok(Status::Rejected),
            Self::CODE_DELETED => Ok(Status::Deleted),
            _ => Err(Error::invalid("status", value)),
        }
    }
}

/// The kind of a calendar entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular event.
    #[default]
    Event,

    /// An event with several participants.
    Meeting,

    /// A task with a due date.
    Task,

    /// A journal note.
    Journal,
}

impl EntryKind {
    const CODE_EVENT: &str = "E";
    const CODE_MEETING: &str = "M";
    const CODE_TASK: &str = "T";
    const CODE_JOURNAL: &str = "J";

    /// Whether the entry is a task rather than an event.
    pub fn is_task(self) -> bool {
        matches!(self, EntryKind::Task)
    }
}

impl AsRef<str> for EntryKind {
    fn as_ref(&self) -> &str {
        match self {
            EntryKind::Event => Self::CODE_EVENT,
            EntryKind::Meeting => Self::CODE_MEETING,
            EntryKind::Task => Self::CODE_TASK,
            EntryKind::Journal => Self::CODE_JOURNAL,
        }
    }
}

impl FromStr for EntryKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            Self::CODE_EVENT | "" => Ok(EntryKind::Event),
            Self::CODE_MEETING => Ok(EntryKind::Meeting),
            Self::CODE_TASK | "N" => Ok(EntryKind::Task),
            Self::CODE_JOURNAL => Ok(EntryKind::Journal),
            _ => Err(Error::invalid("entry type", value)),
        }
    }
}

/// Priority of an entry, stored as 1 (low) to 3 (high).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,

    /// Medium priority.
    #[default]
    Medium,

    /// High priority.
    High,
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        match value {
            0 | 1 => Priority::Low,
            2 => Priority::Medium,
            _ => Priority::High,
        }
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// The first day of a week, used for week numbering and weekly stepping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday.
    #[serde(rename = "SU", alias = "sunday", alias = "0")]
    Sunday,

    /// Weeks run Monday to Sunday, as in ISO 8601.
    #[default]
    #[serde(rename = "MO", alias = "monday", alias = "1")]
    Monday,
}

impl WeekStart {
    /// The weekday the week starts on.
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sunday,
            WeekStart::Monday => Weekday::Monday,
        }
    }

    /// One-based position of `weekday` inside a week starting on `self`.
    pub fn day_number(self, weekday: Weekday) -> i8 {
        match self {
            WeekStart::Sunday => weekday.to_sunday_one_offset(),
            WeekStart::Monday => weekday.to_monday_one_offset(),
        }
    }
}

impl FromStr for WeekStart {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SU" => Ok(WeekStart::Sunday),
            "MO" | "" => Ok(WeekStart::Monday),
            _ => Err(Error::invalid("week start", value)),
        }
    }
}

/// How entries sharing a start time are ordered by name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NameOrder {
    /// Byte-wise comparison of names.
    #[default]
    CaseSensitive,

    /// Comparison of lowercased names.
    CaseInsensitive,
}
