// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Free/busy matrix of several participants over one work day.

use jiff::civil::{Date, Time};

use crate::config::{Config, ENTRY_SLOTS_RANGE};
use crate::datetime::{MINUTES_PER_DAY, minutes_of};
use crate::entry::Occurrence;
use crate::types::{EntryId, Status};

/// Login of the aggregate row.
pub const ALL_ROW: &str = "_all_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "id")]
pub enum Cell {
    #[default]
    Free,
    Waiting(EntryId),
    Approved(EntryId),
}

impl Cell {
    /// Mark the cell busy. Approved time is never downgraded to waiting.
    fn occupy(&mut self, status: Status, id: EntryId) {
        match (status, *self) {
            (Status::Approved, Cell::Free | Cell::Waiting(_)) => *self = Cell::Approved(id),
            (Status::Waiting, Cell::Free) => *self = Cell::Waiting(id),
            _ => {}
        }
    }

    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MatrixRow {
    pub login: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BusyMatrix {
    pub date: Date,

    /// Start of the first cell.
    pub start: Time,

    /// Minutes covered by each cell.
    pub increment: i64,

    /// The aggregate row first, then one row per participant.
    pub rows: Vec<MatrixRow>,
}

impl BusyMatrix {
    /// Start time of cell `index`.
    pub fn cell_start(&self, index: usize) -> Time {
        let minutes = i64::from(minutes_of(self.start)) + self.increment * index as i64;
        Time::new((minutes / 60) as i8, (minutes % 60) as i8, 0, 0).unwrap_or(Time::MAX)
    }

    pub fn row(&self, login: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.login == login)
    }
}

/// Build the matrix of `participants` on `date` from their occurrences.
///
/// Occurrences of other days and other logins are ignored. Untimed and
/// all-day occurrences fill the whole work day.
pub fn busy_matrix(
    date: Date,
    participants: &[String],
    occurrences: &[Occurrence],
    config: &Config,
) -> BusyMatrix {
    let (min, max) = ENTRY_SLOTS_RANGE;
    let increment = MINUTES_PER_DAY / i64::from(config.entry_slots.clamp(min, max));
    let day_start = i64::from(config.work_day_start_hour) * 60;
    let day_end = i64::from(config.work_day_end_hour) * 60;
    let columns = usize::try_from((day_end - day_start) / increment).unwrap_or(0);

    let mut rows: Vec<MatrixRow> = std::iter::once(ALL_ROW)
        .chain(participants.iter().map(String::as_str))
        .map(|login| MatrixRow {
            login: login.to_string(),
            cells: vec![Cell::Free; columns],
        })
        .collect();

    for occ in occurrences.iter().filter(|o| o.date == date) {
        let entry = &occ.entry;
        let Some(index) = participants.iter().position(|p| *p == entry.login) else {
            continue;
        };
        if !entry.status.is_active() {
            continue;
        }

        let (start, end) = match occ.time.time() {
            Some(t) if !occ.is_all_day() => {
                let start = i64::from(minutes_of(t));
                (start, start + occ.duration)
            }
            _ => (day_start, day_end),
        };
        let first = (start.max(day_start) - day_start) / increment;
        let last = (end.min(day_end) - day_start + increment - 1) / increment;
        for cell in first..last {
            let Ok(cell) = usize::try_from(cell) else {
                continue;
            };
            if cell >= columns {
                break;
            }
            rows[0].cells[cell].occupy(entry.status, entry.id);
            rows[index + 1].cells[cell].occupy(entry.status, entry.id);
        }
    }

    tracing::debug!(%date, participants = participants.len(), columns, "built busy matrix");
    BusyMatrix {
        date,
        start: Time::new(config.work_day_start_hour, 0, 0, 0).unwrap_or(Time::midnight()),
        increment,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::civil::{date, time};

    use super::*;
    use crate::datetime::TimeOfDay;
    use crate::entry::Entry;
    use crate::rrule::ExceptionSet;
    use crate::types::{Access, EntryKind, Priority};

    fn occ(id: i64, login: &str, t: TimeOfDay, duration: i64, status: Status) -> Occurrence {
        Occurrence::of(Arc::new(Entry {
            id: EntryId(id),
            ext_for_id: None,
            created_by: login.to_string(),
            login: login.to_string(),
            name: format!("entry {id}"),
            description: String::new(),
            location: None,
            category: None,
            priority: Priority::Medium,
            access: Access::Public,
            status,
            kind: EntryKind::Event,
            date: date(2024, 7, 1),
            time: t,
            duration,
            due: None,
            completed: None,
            percent: None,
            rule: None,
            exceptions: ExceptionSet::default(),
        }))
    }

    fn participants() -> Vec<String> {
        vec!["alice".to_string(), "bob".to_string()]
    }

    #[test]
    fn marks_busy_cells() {
        let config = Config::default();
        let list = [occ(1, "alice", TimeOfDay::Timed(time(9, 0, 0, 0)), 30, Status::Approved)];
        let m = busy_matrix(date(2024, 7, 1), &participants(), &list, &config);

        assert_eq!(m.increment, 10);
        assert_eq!(m.rows.len(), 3);
        let alice = m.row("alice").unwrap();
        assert_eq!(alice.cells.len(), 54);
        let busy: Vec<usize> = (0..54).filter(|&i| !alice.cells[i].is_free()).collect();
        assert_eq!(busy, vec![6, 7, 8]);
        assert_eq!(m.cell_start(6), time(9, 0, 0, 0));
        assert!(m.row("bob").unwrap().cells.iter().all(|c| c.is_free()));
        assert_eq!(m.row(ALL_ROW).unwrap().cells[6], Cell::Approved(EntryId(1)));
    }

    #[test]
    fn approved_wins_over_waiting() {
        let config = Config::default();
        let nine = TimeOfDay::Timed(time(9, 0, 0, 0));
        let list = [
            occ(1, "alice", nine, 20, Status::Approved),
            occ(2, "bob", nine, 20, Status::Waiting),
        ];
        let m = busy_matrix(date(2024, 7, 1), &participants(), &list, &config);
        assert_eq!(m.row(ALL_ROW).unwrap().cells[6], Cell::Approved(EntryId(1)));
        assert_eq!(m.row("bob").unwrap().cells[6], Cell::Waiting(EntryId(2)));
    }

    #[test]
    fn untimed_entries_fill_work_day() {
        let config = Config::default();
        let list = [occ(1, "bob", TimeOfDay::Untimed, 0, Status::Approved)];
        let m = busy_matrix(date(2024, 7, 1), &participants(), &list, &config);
        assert!(m.row("bob").unwrap().cells.iter().all(|c| !c.is_free()));
    }

    #[test]
    fn clips_entries_to_work_day() {
        let config = Config {
            entry_slots: 96,
            ..Config::default()
        };
        let list = [occ(1, "alice", TimeOfDay::Timed(time(7, 0, 0, 0)), 90, Status::Approved)];
        let m = busy_matrix(date(2024, 7, 1), &participants(), &list, &config);
        assert_eq!(m.increment, 15);
        let alice = m.row("alice").unwrap();
        assert!(!alice.cells[0].is_free());
        assert!(!alice.cells[1].is_free());
        assert!(alice.cells[2].is_free());
    }
}
