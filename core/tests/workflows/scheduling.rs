// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Conflict checks and free/busy matrices across participants.

use almanac_core::{
    ALL_ROW, Almanac, Cell, ConflictLabel, ConflictRequest, EntryId, MemoryCache, MemoryStore,
    TimeOfDay,
};
use jiff::civil::{Date, date, time};

use crate::common::{RowBuilder, office_store, test_config};

fn request(
    dates: Vec<Date>,
    h: i8,
    m: i8,
    duration: i64,
    participants: &[&str],
) -> ConflictRequest {
    ConflictRequest {
        dates,
        time: TimeOfDay::Timed(time(h, m, 0, 0)),
        duration,
        participants: participants.iter().map(|p| p.to_string()).collect(),
        requester: "alice".to_string(),
        exclude: None,
    }
}

fn almanac() -> Almanac<MemoryStore, MemoryCache> {
    Almanac::new(test_config(), office_store(), MemoryCache::new()).unwrap()
}

#[test]
fn scheduling_reports_overlapping_meeting() {
    // Arrange
    let almanac = almanac();
    let req = request(vec![date(2024, 1, 8)], 9, 0, 60, &["alice", "carol"]);

    // Act
    let found = almanac.check_conflicts(&req).unwrap();

    // Assert: carol is assisted by alice, so her confidential entry is named.
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].login, "carol");
    assert_eq!(
        found[0].label,
        ConflictLabel::Named {
            id: EntryId(3),
            name: "Board review".to_string()
        }
    );
    assert_eq!(found[0].end, Some(time(11, 0, 0, 0)));
}

#[test]
fn scheduling_back_to_back_is_free() {
    let almanac = almanac();
    let req = request(vec![date(2024, 1, 8)], 11, 0, 60, &["alice", "bob", "carol"]);
    assert!(almanac.check_conflicts(&req).unwrap().is_empty());
}

#[test]
fn scheduling_redacts_private_entries() {
    let almanac = almanac();
    let req = request(vec![date(2024, 1, 8)], 13, 30, 60, &["bob"]);
    let found = almanac.check_conflicts(&req).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].label, ConflictLabel::Private);
}

#[test]
fn scheduling_checks_every_repeating_date() {
    let almanac = almanac();
    let mondays = vec![date(2024, 1, 15), date(2024, 1, 22), date(2024, 1, 23)];
    let found = almanac
        .check_conflicts(&request(mondays, 10, 30, 30, &["alice", "bob"]))
        .unwrap();
    let hits: Vec<(Date, &str)> = found.iter().map(|c| (c.date, c.login.as_str())).collect();
    assert_eq!(
        hits,
        vec![
            (date(2024, 1, 15), "alice"),
            (date(2024, 1, 15), "bob"),
            (date(2024, 1, 22), "alice"),
            (date(2024, 1, 22), "bob")
        ]
    );
}

#[test]
fn scheduling_editing_entry_ignores_itself() {
    let almanac = almanac();
    let mut req = request(vec![date(2024, 1, 15)], 10, 0, 60, &["alice"]);
    req.exclude = Some(EntryId(1));
    assert!(almanac.check_conflicts(&req).unwrap().is_empty());
}

#[test]
fn scheduling_finds_entry_from_previous_night() {
    let almanac = almanac();
    let req = request(vec![date(2024, 1, 8)], 1, 0, 30, &["alice"]);
    let found = almanac.check_conflicts(&req).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].label,
        ConflictLabel::Named {
            id: EntryId(4),
            name: "Release night".to_string()
        }
    );
}

#[test]
fn scheduling_finds_later_days_of_long_event() {
    let mut store = MemoryStore::new();
    store
        .insert_row(
            RowBuilder::new(50, "alice", date(2024, 2, 3))
                .name("Conference")
                .at(220000, 3000)
                .build(),
        )
        .unwrap();
    let almanac = Almanac::new(test_config(), store, MemoryCache::new()).unwrap();
    let dates = vec![date(2024, 2, 4), date(2024, 2, 5), date(2024, 2, 6)];

    let found = almanac
        .check_conflicts(&request(dates, 12, 0, 60, &["alice"]))
        .unwrap();

    let hits: Vec<(Date, i64)> = found.iter().map(|c| (c.date, c.duration)).collect();
    assert_eq!(hits, vec![(date(2024, 2, 4), 1439), (date(2024, 2, 5), 1439)]);
    assert!(found.iter().all(|c| c.time == TimeOfDay::Timed(time(0, 0, 0, 0))));
}

#[test]
fn scheduling_busy_matrix_marks_work_day() {
    // Arrange
    let mut store = office_store();
    store
        .insert_row(
            RowBuilder::new(40, "bob", date(2024, 1, 8))
                .name("Interview")
                .at(100000, 30)
                .status("W")
                .build(),
        )
        .unwrap();
    let almanac = Almanac::new(test_config(), store, MemoryCache::new()).unwrap();
    let participants = vec!["alice".to_string(), "bob".to_string()];

    // Act
    let matrix = almanac.busy_matrix(date(2024, 1, 8), &participants).unwrap();

    // Assert: 10:00 is the 13th ten-minute cell after 08:00.
    assert_eq!(matrix.cell_start(12), time(10, 0, 0, 0));
    let alice = matrix.row("alice").unwrap();
    assert_eq!(alice.cells[12], Cell::Approved(EntryId(1)));
    assert!(alice.cells[11].is_free());
    let bob = matrix.row("bob").unwrap();
    assert_eq!(bob.cells[12], Cell::Approved(EntryId(1)));
    assert_eq!(bob.cells[36], Cell::Approved(EntryId(2)));
    assert!(matches!(matrix.row(ALL_ROW).unwrap().cells[12], Cell::Approved(_)));
}
