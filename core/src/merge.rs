// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Building the ordered list of occurrences shown on one day.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::datetime::{TimeOfDay, add_days, days_between};
use crate::entry::{Entry, Occurrence};
use crate::split::split_midnight_crossing;
use crate::store::Layer;
use crate::types::{EntryId, NameOrder, Status};

/// A repeating entry together with its expanded dates.
///
/// `parts` is the split of one occurrence: its first element is the entry on
/// its own day, any further ones are continuation fragments. Each part is
/// replayed on every expanded date shifted by its day offset, so fragments
/// never need an expansion of their own.
#[derive(Debug, Clone)]
pub struct ExpandedEntry {
    pub entry: Arc<Entry>,
    pub dates: Vec<Date>,
    pub parts: Vec<Occurrence>,
}

impl ExpandedEntry {
    pub fn new(entry: Arc<Entry>, dates: Vec<Date>, tz: &TimeZone, split: bool) -> Self {
        let parts = split_midnight_crossing(Occurrence::of(entry.clone()), tz, split);
        ExpandedEntry {
            entry,
            dates,
            parts,
        }
    }

    /// Whether the entry, or one of its fragments, falls on `date`.
    pub fn occurs_on(&self, date: Date) -> bool {
        !self.on(date).is_empty()
    }

    /// The parts of the entry appearing on `date`.
    pub fn on(&self, date: Date) -> Vec<Occurrence> {
        let mut found = Vec::new();
        for part in &self.parts {
            let offset = days_between(self.entry.date, part.date);
            let Some(origin) = add_days(date, -offset) else {
                continue;
            };
            if self.dates.binary_search(&origin).is_ok() {
                let mut occ = part.clone();
                occ.date = date;
                occ.clone_of = part.clone_of.map(|_| origin);
                found.push(occ);
            }
        }
        found
    }
}

/// Options of a day merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Keep entries still waiting for the participant's approval.
    pub include_unapproved: bool,

    pub order: NameOrder,
}

fn visible(status: Status, include_unapproved: bool) -> bool {
    match status {
        Status::Approved => true,
        Status::Waiting => include_unapproved,
        Status::Rejected | Status::Deleted => false,
    }
}

fn compare_names(a: &str, b: &str, order: NameOrder) -> Ordering {
    match order {
        NameOrder::CaseSensitive => a.cmp(b),
        NameOrder::CaseInsensitive => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

/// Sort by date, then start time with untimed entries first, then name.
pub fn sort_occurrences(occurrences: &mut [Occurrence], order: NameOrder) {
    occurrences.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time.sort_key().cmp(&b.time.sort_key()))
            .then_with(|| compare_names(&a.name(), &b.name(), order))
    });
}

/// Concatenate single and repeating occurrences, dropping single ones whose
/// id is also repeating, and sort the result.
pub fn combine(
    non_repeating: Vec<Occurrence>,
    repeating: Vec<Occurrence>,
    order: NameOrder,
) -> Vec<Occurrence> {
    let repeating_ids: HashSet<EntryId> = repeating.iter().map(Occurrence::id).collect();
    let mut merged: Vec<Occurrence> = non_repeating
        .into_iter()
        .filter(|o| !repeating_ids.contains(&o.id()))
        .chain(repeating)
        .collect();
    sort_occurrences(&mut merged, order);
    merged
}

/// Occurrences of a pre-loaded list that fall on `date`.
pub fn entries_for_day(
    date: Date,
    occurrences: &[Occurrence],
    include_unapproved: bool,
) -> Vec<Occurrence> {
    occurrences
        .iter()
        .filter(|o| o.date == date && visible(o.entry.status, include_unapproved))
        .cloned()
        .collect()
}

/// Occurrences of repeating entries on `date`.
pub fn repeating_for_day(date: Date, expanded: &[ExpandedEntry]) -> Vec<Occurrence> {
    expanded.iter().flat_map(|e| e.on(date)).collect()
}

fn due_of(task: &Entry) -> DateTime {
    task.due.unwrap_or_else(|| task.date.to_datetime(Time::midnight()))
}

/// Tasks due on `date`. Open tasks already overdue on `today` are shown on
/// `today` as well.
pub fn tasks_for_day(
    date: Date,
    today: Date,
    tasks: &[Arc<Entry>],
    include_unapproved: bool,
) -> Vec<Occurrence> {
    let mut found: Vec<Occurrence> = tasks
        .iter()
        .filter(|t| t.completed.is_none() && visible(t.status, include_unapproved))
        .filter(|t| {
            let due = due_of(t).date();
            due == date || (date == today && due < today)
        })
        .map(|t| {
            let mut occ = Occurrence::on(t.clone(), date);
            occ.time = match t.due {
                Some(due) if due.date() == date => TimeOfDay::Timed(due.time()),
                _ => t.time,
            };
            occ
        })
        .collect();
    found.sort_by(|a, b| {
        due_of(&a.entry)
            .cmp(&due_of(&b.entry))
            .then_with(|| a.entry.name.cmp(&b.entry.name))
    });
    found
}

/// Everything shown on `date`: single and repeating occurrences merged and
/// sorted, followed by the tasks of the day.
pub fn merge_for_day(
    date: Date,
    today: Date,
    non_repeating: &[Occurrence],
    repeating: &[ExpandedEntry],
    tasks: &[Arc<Entry>],
    options: MergeOptions,
) -> Vec<Occurrence> {
    let singles = entries_for_day(date, non_repeating, options.include_unapproved);
    let repeated: Vec<Occurrence> = repeating_for_day(date, repeating)
        .into_iter()
        .filter(|o| visible(o.entry.status, options.include_unapproved))
        .collect();

    let mut merged = combine(singles, repeated, options.order);
    merged.extend(tasks_for_day(date, today, tasks, options.include_unapproved));
    tracing::trace!(%date, count = merged.len(), "merged day");
    merged
}

/// Resolve participant rows of the same entry across layered calendars.
///
/// Rows are grouped by id in order of first appearance. Within a group the
/// viewer's own row comes first, and a later row is dropped when its layer
/// disallows duplicates. Rows of calendars without a layer are kept.
pub fn apply_layer_policy(rows: Vec<Entry>, viewer: &str, layers: &[Layer]) -> Vec<Entry> {
    let policy: HashMap<&str, bool> = layers
        .iter()
        .map(|l| (l.login.as_str(), l.allow_duplicates))
        .collect();

    let mut order: Vec<EntryId> = Vec::new();
    let mut groups: HashMap<EntryId, Vec<Entry>> = HashMap::new();
    for row in rows {
        let group = groups.entry(row.id).or_default();
        if group.is_empty() {
            order.push(row.id);
        }
        group.push(row);
    }

    let mut resolved = Vec::new();
    for id in order {
        let Some(mut group) = groups.remove(&id) else {
            continue;
        };
        // Stable, so the remaining rows keep their order.
        group.sort_by_key(|r| r.login != viewer);
        let mut rows = group.into_iter();
        if let Some(first) = rows.next() {
            resolved.push(first);
        }
        for row in rows {
            if policy.get(row.login.as_str()).copied().unwrap_or(true) {
                resolved.push(row);
            } else {
                tracing::trace!(%id, login = %row.login, "dropped duplicate layer row");
            }
        }
    }
    resolved
}
