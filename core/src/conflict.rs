// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Scheduling conflict detection for an entry about to be saved.

use std::collections::HashMap;
use std::sync::Arc;

use jiff::civil::{Date, Time};

use crate::cache::ExpansionCache;
use crate::config::Config;
use crate::datetime::{MINUTES_PER_DAY, TimeOfDay, minutes_of};
use crate::entry::{Entry, Occurrence};
use crate::error::Result;
use crate::expand::RecurrenceExpander;
use crate::merge::{ExpandedEntry, repeating_for_day};
use crate::rrule::ExceptionSet;
use crate::split::split_midnight_crossing;
use crate::store::{Directory, EntryQuery, EntryStore};
use crate::types::{Access, EntryId};

/// Whether two intervals given as start time and minutes overlap.
///
/// One minute is taken off each non-empty duration, so an entry ending
/// exactly when the other starts does not conflict.
pub fn times_overlap(start1: Time, duration1: i64, start2: Time, duration2: i64) -> bool {
    let shorten = |d: i64| if d > 0 { d - 1 } else { d };
    let s1 = i64::from(minutes_of(start1));
    let e1 = s1 + shorten(duration1);
    let s2 = i64::from(minutes_of(start2));
    let e2 = s2 + shorten(duration2);
    !(s1 >= e2 || s2 >= e1)
}

/// A proposed entry to check against existing calendars.
#[derive(Debug, Clone)]
pub struct ConflictRequest {
    /// Every date the proposed entry occurs on.
    pub dates: Vec<Date>,

    pub time: TimeOfDay,

    /// Duration in minutes.
    pub duration: i64,

    /// Calendars to check, the requester's own when empty.
    pub participants: Vec<String>,

    /// Login of the user saving the entry.
    pub requester: String,

    /// Entry being edited, never reported against itself.
    pub exclude: Option<EntryId>,
}

/// What a conflict shows of the conflicting entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConflictLabel {
    Named { id: EntryId, name: String },
    Private,
    Confidential,
}

/// An existing entry in the way of a proposed one.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Conflict {
    /// Participant whose calendar holds the entry.
    pub login: String,

    pub label: ConflictLabel,

    pub date: Date,

    pub time: TimeOfDay,

    /// Duration in minutes.
    pub duration: i64,

    /// Wall-clock end, `None` for all-day entries.
    pub end: Option<Time>,

    pub all_day: bool,

    /// The participant already has the maximum number of entries that day.
    pub limit_exceeded: bool,
}

/// Span of the time of day in minutes, `None` for untimed entries.
fn span(time: TimeOfDay, duration: i64) -> Option<(Time, i64)> {
    match time {
        TimeOfDay::Timed(t) => Some((t, duration)),
        TimeOfDay::AllDay => Some((Time::midnight(), MINUTES_PER_DAY)),
        TimeOfDay::Untimed => None,
    }
}

/// Find the existing entries of every participant that overlap the request.
///
/// Store failures abort the check, there is no partial result.
pub fn check_conflicts<S, C>(
    store: &S,
    expander: &RecurrenceExpander,
    cache: &C,
    config: &Config,
    request: &ConflictRequest,
) -> Result<Vec<Conflict>>
where
    S: EntryStore + Directory + ?Sized,
    C: ExpansionCache + ?Sized,
{
    let Some((time, duration)) = span(request.time, request.duration) else {
        return Ok(Vec::new());
    };
    let (Some(&first), Some(&last)) = (request.dates.iter().min(), request.dates.iter().max())
    else {
        return Ok(Vec::new());
    };

    let participants: Vec<String> = match &config.single_user_login {
        Some(login) if config.single_user => vec![login.clone()],
        _ if request.participants.iter().all(|p| p.is_empty()) => {
            vec![request.requester.clone()]
        }
        _ => {
            let mut list: Vec<String> = Vec::new();
            for p in request.participants.iter().filter(|p| !p.is_empty()) {
                if !list.contains(p) {
                    list.push(p.clone());
                }
            }
            list
        }
    };

    let tz = expander.time_zone();
    let split = !config.disable_crossday_events;
    let limit = (config.limit_appts && config.limit_appts_number > 0)
        .then_some(config.limit_appts_number as usize);

    // Includes entries starting earlier whose fragments reach `first`.
    let query = EntryQuery {
        logins: participants.clone(),
        range: Some((first, last)),
        ..EntryQuery::default()
    };
    let singles = store.fetch_entries(&query)?;
    let repeating = store.fetch_entries(&EntryQuery {
        repeating: true,
        ..query
    })?;

    let mut occurrences: Vec<Occurrence> = singles
        .into_iter()
        .flat_map(|e| split_midnight_crossing(Occurrence::of(Arc::new(e)), tz, split))
        .filter(|o| request.dates.contains(&o.date))
        .collect();

    let mut expanded = Vec::with_capacity(repeating.len());
    for mut entry in repeating {
        entry.exceptions = ExceptionSet::from_rows(store.fetch_exceptions(entry.id)?);
        let entry = Arc::new(entry);
        let dates = expander.expand_cached(&entry, cache, Some(last));
        expanded.push(ExpandedEntry::new(entry, dates, tz, split));
    }
    for &date in &request.dates {
        occurrences.extend(repeating_for_day(date, &expanded));
    }
    occurrences.sort_by(|a, b| {
        (a.date, a.time.sort_key(), &a.entry.login, a.id())
            .cmp(&(b.date, b.time.sort_key(), &b.entry.login, b.id()))
    });

    let mut per_day: HashMap<(&str, Date), usize> = HashMap::new();
    let mut conflicts = Vec::new();
    for occ in &occurrences {
        let entry = &occ.entry;
        if request.exclude.is_some_and(|id| entry.id == id || entry.ext_for_id == Some(id)) {
            continue;
        }
        let Some((other_time, other_duration)) = span(occ.time, occ.duration) else {
            continue;
        };

        let count = per_day.entry((entry.login.as_str(), occ.date)).or_default();
        *count += 1;
        let limit_exceeded = limit.is_some_and(|n| *count >= n);

        if limit_exceeded || times_overlap(time, duration, other_time, other_duration) {
            conflicts.push(Conflict {
                login: entry.login.clone(),
                label: label(store, entry, &request.requester),
                date: occ.date,
                time: occ.time,
                duration: occ.duration,
                end: (!occ.is_all_day()).then(|| occ.end_time()).flatten(),
                all_day: occ.is_all_day(),
                limit_exceeded,
            });
        }
    }

    tracing::debug!(
        participants = participants.len(),
        dates = request.dates.len(),
        count = conflicts.len(),
        "checked conflicts"
    );
    Ok(conflicts)
}

fn label<D: Directory + ?Sized>(directory: &D, entry: &Entry, requester: &str) -> ConflictLabel {
    let owner = entry.login.as_str();
    match entry.access {
        Access::Private if owner != requester => ConflictLabel::Private,
        Access::Confidential
            if owner != requester
                && !directory.is_assistant(requester, owner)
                && !directory.is_nonuser_admin(requester, owner) =>
        {
            ConflictLabel::Confidential
        }
        _ => ConflictLabel::Named {
            id: entry.id,
            name: entry.name.clone(),
        },
    }
}
