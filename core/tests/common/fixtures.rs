// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use almanac_core::{Config, EntryRow, Layer, MemoryStore, RepeatRow};
use jiff::civil::Date;

/// Creates a test configuration pinned to UTC.
#[must_use]
pub fn test_config() -> Config {
    Config {
        timezone: Some("UTC".to_string()),
        ..Config::default()
    }
}

/// Builder for stored entry rows.
///
/// # Example
///
/// ```ignore
/// let row = RowBuilder::new(1, "alice", date(2024, 1, 1)).at(90000, 60).build();
/// ```
#[derive(Debug, Clone)]
pub struct RowBuilder {
    row: EntryRow,
}

#[allow(dead_code)]
impl RowBuilder {
    #[must_use]
    pub fn new(id: i64, login: &str, date: Date) -> Self {
        Self {
            row: EntryRow {
                id,
                create_by: login.to_string(),
                name: format!("entry {id}"),
                date,
                time: 90000,
                duration: 60,
                ..EntryRow::default()
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.row.name = name.to_string();
        self
    }

    /// Start time as `HHMMSS` and duration in minutes.
    #[must_use]
    pub fn at(mut self, hhmmss: i32, duration: i64) -> Self {
        self.row.time = hhmmss;
        self.row.duration = duration;
        self
    }

    #[must_use]
    pub fn access(mut self, code: &str) -> Self {
        self.row.access = code.to_string();
        self
    }

    #[must_use]
    pub fn status(mut self, code: &str) -> Self {
        self.row.status = code.to_string();
        self
    }

    /// Row of another participant of the same entry.
    #[must_use]
    pub fn participant(mut self, login: &str) -> Self {
        self.row.login = login.to_string();
        self
    }

    #[must_use]
    pub fn category(mut self, id: i64) -> Self {
        self.row.cat_id = Some(id);
        self
    }

    /// Turn the row into a task due at `due`.
    #[must_use]
    pub fn task(mut self, due: Date) -> Self {
        self.row.kind = "T".to_string();
        self.row.time = -1;
        self.row.duration = 0;
        self.row.due_date = Some(due);
        self
    }

    #[must_use]
    pub fn repeat(mut self, repeat: RepeatRow) -> Self {
        self.row.repeat = Some(repeat);
        self
    }

    /// Repeat with the given type and `until`, no modifiers.
    #[must_use]
    pub fn repeating(self, rpt_type: &str, until: Option<Date>) -> Self {
        self.repeat(RepeatRow {
            rpt_type: rpt_type.to_string(),
            end: until,
            ..RepeatRow::default()
        })
    }

    #[must_use]
    pub fn build(self) -> EntryRow {
        self.row
    }
}

/// A store with a small office: alice overlays bob's calendar without
/// duplicates, carol is assisted by alice, and a few meetings are shared.
#[must_use]
pub fn office_store() -> MemoryStore {
    use jiff::civil::date;

    let mut store = MemoryStore::new();
    store.add_layer(
        "alice",
        Layer {
            login: "bob".to_string(),
            color: "#3366ff".to_string(),
            allow_duplicates: false,
        },
    );
    store.add_assistant("alice", "carol");

    let rows = [
        // Weekly team meeting, shared by alice and bob.
        RowBuilder::new(1, "alice", date(2024, 1, 1))
            .name("Team meeting")
            .at(100000, 60)
            .repeat(RepeatRow {
                rpt_type: "weekly".to_string(),
                byday: "MO".to_string(),
                ..RepeatRow::default()
            })
            .build(),
        RowBuilder::new(1, "alice", date(2024, 1, 1))
            .name("Team meeting")
            .at(100000, 60)
            .participant("bob")
            .repeating("weekly", None)
            .build(),
        RowBuilder::new(2, "bob", date(2024, 1, 8))
            .name("Dentist")
            .at(140000, 45)
            .access("R")
            .build(),
        RowBuilder::new(3, "carol", date(2024, 1, 8))
            .name("Board review")
            .at(93000, 90)
            .access("C")
            .build(),
        RowBuilder::new(4, "alice", date(2024, 1, 7))
            .name("Release night")
            .at(220000, 240)
            .build(),
        RowBuilder::new(5, "alice", date(2024, 1, 5))
            .name("Write report")
            .task(date(2024, 1, 5))
            .build(),
    ];
    for row in rows {
        store.insert_row(row).unwrap();
    }
    store
}
