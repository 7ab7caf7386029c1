// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Boundary to the calendar store and user directory.
//!
//! Rows are decoded into typed records exactly once, here.

use std::collections::{HashMap, HashSet};

use jiff::civil::Date;

use crate::datetime::{TimeOfDay, add_days, days_between};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::rrule::{ExceptionSet, RecurrenceRule};
use crate::types::{Access, CategoryId, EntryId, EntryKind, Priority};

/// An entry row joined with one participant row, as stored.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct EntryRow {
    pub id: i64,
    pub ext_for_id: Option<i64>,
    pub create_by: String,
    /// Participant login, the creator when empty.
    pub login: String,
    pub name: String,
    pub description: String,
    pub location: Option<String>,
    pub cat_id: Option<CategoryId>,
    pub priority: u8,
    /// Access code: `P`, `C` or `R`.
    pub access: String,
    /// Participant status code: `A`, `W`, `R` or `D`.
    pub status: String,
    /// Entry type code: `E`, `M`, `T`, `N` or `J`.
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Date,
    /// Start time as `HHMMSS`, `-1` for untimed entries.
    pub time: i32,
    /// Duration in minutes.
    pub duration: i64,
    pub due_date: Option<Date>,
    /// Due time as `HHMMSS`.
    pub due_time: Option<i32>,
    pub completed: Option<Date>,
    pub percent: Option<u8>,
    pub repeat: Option<RepeatRow>,
}

/// A repeat row, as stored.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct RepeatRow {
    /// `daily`, `weekly`, `monthlyByDate`, `monthlyByDay`, `monthlyBySetPos` or `yearly`.
    #[serde(rename = "type")]
    pub rpt_type: String,
    pub end: Option<Date>,
    /// Interval between repetitions.
    pub frequency: u32,
    pub count: Option<u32>,
    pub wkst: String,
    pub bymonth: String,
    pub byweekno: String,
    pub byyearday: String,
    pub bymonthday: String,
    pub byday: String,
    pub bysetpos: String,
}

impl TryFrom<EntryRow> for Entry {
    type Error = Error;

    fn try_from(row: EntryRow) -> Result<Self> {
        let time = TimeOfDay::from_hhmmss(row.time, row.duration)?;
        let due = match row.due_date {
            Some(date) => {
                let t = match row.due_time.map(|t| TimeOfDay::from_hhmmss(t, 0)).transpose()? {
                    Some(TimeOfDay::Timed(t)) => t,
                    _ => jiff::civil::Time::midnight(),
                };
                Some(date.to_datetime(t))
            }
            None => None,
        };
        let login = if row.login.is_empty() {
            row.create_by.clone()
        } else {
            row.login
        };

        Ok(Entry {
            id: EntryId(row.id),
            ext_for_id: row.ext_for_id.map(EntryId),
            created_by: row.create_by,
            login,
            name: row.name,
            description: row.description,
            location: row.location.filter(|l| !l.is_empty()),
            category: row.cat_id.filter(|&c| c > 0),
            priority: Priority::from(row.priority),
            access: row.access.parse()?,
            status: row.status.parse()?,
            kind: row.kind.parse()?,
            date: row.date,
            time,
            duration: row.duration.max(0),
            due,
            completed: row.completed,
            percent: row.percent.map(|p| p.min(100)),
            rule: row.repeat.as_ref().map(RecurrenceRule::from_row),
            exceptions: ExceptionSet::default(),
        })
    }
}

/// Which categories a query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Entries of any category, or none.
    #[default]
    Any,

    /// Entries of one category.
    Only(CategoryId),

    /// Entries without a category.
    Uncategorized,
}

impl CategoryFilter {
    fn accepts(self, category: Option<CategoryId>) -> bool {
        match self {
            CategoryFilter::Any => true,
            CategoryFilter::Only(id) => category == Some(id),
            CategoryFilter::Uncategorized => category.is_none(),
        }
    }
}

/// Which kinds of entries a query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryClass {
    /// Events, meetings and journal entries.
    #[default]
    Events,

    /// Tasks.
    Tasks,
}

/// A query for entry rows.
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    /// Logins whose calendars are searched.
    pub logins: Vec<String>,

    /// Inclusive date range. Events must overlap it, counting the days a
    /// long event runs into, and tasks must be due by its end.
    pub range: Option<(Date, Date)>,

    pub category: CategoryFilter,

    /// Return repeating entries, with their rules, instead of single ones.
    pub repeating: bool,

    pub class: EntryClass,
}

/// Read access to stored entries.
pub trait EntryStore {
    /// Entries matching the query, never rejected or deleted ones.
    fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>>;

    /// Exception (`true`) and inclusion (`false`) dates of an entry.
    fn fetch_exceptions(&self, id: EntryId) -> Result<Vec<(Date, bool)>>;
}

/// What a viewer wants to do with a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Approve,
}

/// Permission bits granted on a calendar, `NONE` denies everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Permission(pub u8);

impl Permission {
    pub const NONE: Permission = Permission(0);
    pub const VIEW: Permission = Permission(1);
    pub const EDIT: Permission = Permission(2);
    pub const APPROVE: Permission = Permission(4);
    pub const ALL: Permission = Permission(7);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Whether the permission covers `action`.
    pub fn allows(self, action: Action) -> bool {
        let bit = match action {
            Action::View => Self::VIEW,
            Action::Edit => Self::EDIT,
            Action::Approve => Self::APPROVE,
        };
        self.0 & bit.0 != 0
    }
}

/// Another user's calendar overlaid on a viewer's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Login of the overlaid calendar.
    pub login: String,

    /// Display colour.
    pub color: String,

    /// Whether entries already on the viewer's calendar are shown again.
    pub allow_duplicates: bool,
}

/// A user-defined category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
}

/// User and access-control lookups.
pub trait Directory {
    /// Permission of `viewer` on entries of `kind` and `access` in `owner`'s calendar.
    fn access_check(
        &self,
        action: Action,
        owner: &str,
        viewer: &str,
        kind: EntryKind,
        access: Access,
    ) -> Permission;

    /// Whether `assistant` manages `boss`'s calendar.
    fn is_assistant(&self, assistant: &str, boss: &str) -> bool;

    /// Whether `login` administers the non-user calendar `nonuser`.
    fn is_nonuser_admin(&self, login: &str, nonuser: &str) -> bool;

    /// Layers configured by `login`.
    fn layers(&self, login: &str) -> Result<Vec<Layer>>;

    /// Categories visible to `login`.
    fn categories(&self, login: &str) -> Result<Vec<Category>>;
}

/// In-process entry store and directory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Vec<Entry>,
    exceptions: HashMap<EntryId, Vec<(Date, bool)>>,
    layers: HashMap<String, Vec<Layer>>,
    categories: HashMap<String, Vec<Category>>,
    assistants: HashSet<(String, String)>,
    nonuser_admins: HashSet<(String, String)>,
    grants: HashMap<(String, String), Permission>,
    default_permission: Permission,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            entries: Vec::new(),
            exceptions: HashMap::new(),
            layers: HashMap::new(),
            categories: HashMap::new(),
            assistants: HashSet::new(),
            nonuser_admins: HashSet::new(),
            grants: HashMap::new(),
            default_permission: Permission::VIEW,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a decoded entry row.
    pub fn insert(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Decode and insert a stored row.
    pub fn insert_row(&mut self, row: EntryRow) -> Result<()> {
        let entry = Entry::try_from(row)?;
        tracing::trace!(id = %entry.id, login = %entry.login, "inserted entry row");
        self.insert(entry);
        Ok(())
    }

    /// The creator's row of entry `id`, else its first participant row,
    /// with exceptions attached.
    pub fn entry(&self, id: EntryId) -> Option<Entry> {
        let mut rows = self.entries.iter().filter(|e| e.id == id);
        let first = rows.next()?;
        let mut entry = std::iter::once(first)
            .chain(rows)
            .find(|e| e.login == e.created_by)
            .unwrap_or(first)
            .clone();
        if let Some(dates) = self.exceptions.get(&id) {
            entry.exceptions = ExceptionSet::from_rows(dates.iter().copied());
        }
        Some(entry)
    }

    /// Record an exception (`true`) or inclusion (`false`) date.
    pub fn add_exception(&mut self, id: EntryId, date: Date, is_exception: bool) {
        self.exceptions
            .entry(id)
            .or_default()
            .push((date, is_exception));
    }

    pub fn add_layer(&mut self, owner: &str, layer: Layer) {
        self.layers.entry(owner.to_string()).or_default().push(layer);
    }

    pub fn add_category(&mut self, owner: &str, category: Category) {
        self.categories
            .entry(owner.to_string())
            .or_default()
            .push(category);
    }

    pub fn add_assistant(&mut self, assistant: &str, boss: &str) {
        self.assistants
            .insert((assistant.to_string(), boss.to_string()));
    }

    pub fn add_nonuser_admin(&mut self, admin: &str, nonuser: &str) {
        self.nonuser_admins
            .insert((admin.to_string(), nonuser.to_string()));
    }

    /// Grant `viewer` an explicit permission on `owner`'s calendar.
    pub fn grant(&mut self, owner: &str, viewer: &str, permission: Permission) {
        self.grants
            .insert((owner.to_string(), viewer.to_string()), permission);
    }

    /// Permission of viewers without an explicit grant.
    pub fn set_default_permission(&mut self, permission: Permission) {
        self.default_permission = permission;
    }

    fn matches(entry: &Entry, query: &EntryQuery) -> bool {
        if !entry.status.is_active()
            || entry.is_repeating() != query.repeating
            || !query.logins.iter().any(|l| *l == entry.login)
            || !query.category.accepts(entry.category)
        {
            return false;
        }

        match query.class {
            EntryClass::Events if entry.kind.is_task() => return false,
            EntryClass::Tasks if !entry.kind.is_task() => return false,
            _ => {}
        }

        let Some((from, to)) = query.range else {
            return true;
        };
        match (query.class, &entry.rule) {
            (EntryClass::Tasks, _) => {
                let due = entry.due.map(|d| d.date()).unwrap_or(entry.date);
                entry.completed.is_none() && due <= to
            }
            (EntryClass::Events, rule) => {
                // One spare day for fragments a DST shift pushes further.
                let span = days_between(entry.date, entry.last_date()) + 1;
                let last = match rule {
                    Some(rule) => rule.until,
                    None => Some(entry.date),
                };
                entry.date <= to
                    && last.and_then(|d| add_days(d, span)).is_none_or(|d| d >= from)
            }
        }
    }
}

impl EntryStore for MemoryStore {
    fn fetch_entries(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let mut found: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| Self::matches(e, query))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            (a.date, a.time.sort_key(), &a.name, a.id)
                .cmp(&(b.date, b.time.sort_key(), &b.name, b.id))
        });
        tracing::debug!(
            logins = ?query.logins,
            repeating = query.repeating,
            count = found.len(),
            "fetched entries"
        );
        Ok(found)
    }

    fn fetch_exceptions(&self, id: EntryId) -> Result<Vec<(Date, bool)>> {
        Ok(self.exceptions.get(&id).cloned().unwrap_or_default())
    }
}

impl Directory for MemoryStore {
    fn access_check(
        &self,
        action: Action,
        owner: &str,
        viewer: &str,
        _kind: EntryKind,
        _access: Access,
    ) -> Permission {
        if owner == viewer
            || self.is_assistant(viewer, owner)
            || self.is_nonuser_admin(viewer, owner)
        {
            return Permission::ALL;
        }
        let permission = self
            .grants
            .get(&(owner.to_string(), viewer.to_string()))
            .copied()
            .unwrap_or(self.default_permission);
        if permission.allows(action) {
            permission
        } else {
            Permission::NONE
        }
    }

    fn is_assistant(&self, assistant: &str, boss: &str) -> bool {
        self.assistants
            .contains(&(assistant.to_string(), boss.to_string()))
    }

    fn is_nonuser_admin(&self, login: &str, nonuser: &str) -> bool {
        self.nonuser_admins
            .contains(&(login.to_string(), nonuser.to_string()))
    }

    fn layers(&self, login: &str) -> Result<Vec<Layer>> {
        Ok(self.layers.get(login).cloned().unwrap_or_default())
    }

    fn categories(&self, login: &str) -> Result<Vec<Category>> {
        Ok(self.categories.get(login).cloned().unwrap_or_default())
    }
}
