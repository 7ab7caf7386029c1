// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Expansion of stored repeat rows.

use almanac_core::{Almanac, Entry, EntryId, MemoryStore, NoCache, RepeatRow};
use jiff::civil::{Date, Weekday, date};

use crate::common::{RowBuilder, test_config};

fn expand(repeat: RepeatRow, start: Date) -> Vec<Date> {
    let row = RowBuilder::new(1, "alice", start).repeat(repeat).build();
    let entry = Entry::try_from(row).unwrap();
    let almanac = Almanac::new(test_config(), MemoryStore::new(), NoCache).unwrap();
    almanac.expand(&entry)
}

#[test]
fn expansion_alice_daily_every_other_day() {
    // Arrange
    let repeat = RepeatRow {
        rpt_type: "daily".to_string(),
        frequency: 2,
        count: Some(5),
        ..RepeatRow::default()
    };

    // Act
    let dates = expand(repeat, date(2024, 1, 1));

    // Assert
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 7),
            date(2024, 1, 9)
        ]
    );
}

#[test]
fn expansion_weekly_monday_wednesday_friday() {
    let repeat = RepeatRow {
        rpt_type: "weekly".to_string(),
        end: Some(date(2024, 1, 28)),
        byday: "MO,WE,FR".to_string(),
        ..RepeatRow::default()
    };
    let dates = expand(repeat, date(2024, 1, 1));
    assert_eq!(dates.len(), 12);
    assert!(dates.iter().all(|d| matches!(
        d.weekday(),
        Weekday::Monday | Weekday::Wednesday | Weekday::Friday
    )));
}

#[test]
fn expansion_monthly_by_day_variant() {
    let repeat = RepeatRow {
        rpt_type: "monthlyByDay".to_string(),
        count: Some(3),
        byday: "2TU".to_string(),
        ..RepeatRow::default()
    };
    assert_eq!(
        expand(repeat, date(2024, 1, 9)),
        vec![date(2024, 1, 9), date(2024, 2, 13), date(2024, 3, 12)]
    );
}

#[test]
fn expansion_monthly_last_day_covers_leap_february() {
    let repeat = RepeatRow {
        rpt_type: "monthlyByDate".to_string(),
        end: Some(date(2025, 12, 31)),
        bymonthday: "-1".to_string(),
        ..RepeatRow::default()
    };
    let dates = expand(repeat, date(2024, 1, 31));
    assert_eq!(dates.len(), 24);
    assert!(dates.contains(&date(2024, 2, 29)));
    assert!(dates.contains(&date(2025, 2, 28)));
    assert!(dates.iter().all(|d| *d == d.last_of_month()));
}

#[test]
fn expansion_yearly_thanksgiving() {
    let repeat = RepeatRow {
        rpt_type: "yearly".to_string(),
        count: Some(2),
        bymonth: "11".to_string(),
        byday: "4TH".to_string(),
        ..RepeatRow::default()
    };
    assert_eq!(
        expand(repeat, date(2024, 11, 28)),
        vec![date(2024, 11, 28), date(2025, 11, 27)]
    );
}

#[test]
fn expansion_unset_count_uses_horizon() {
    // 999 is the stored marker for "no count".
    let repeat = RepeatRow {
        rpt_type: "weekly".to_string(),
        count: Some(999),
        ..RepeatRow::default()
    };
    let dates = expand(repeat, date(2024, 1, 1));
    assert_eq!(dates.last(), Some(&date(2024, 7, 1)));
}

#[test]
fn expansion_malformed_rules_degrade_to_nothing() {
    let repeat = RepeatRow {
        rpt_type: "fortnightly".to_string(),
        ..RepeatRow::default()
    };
    assert!(expand(repeat, date(2024, 1, 1)).is_empty());

    // Unparsable items are dropped, the rest of the rule still applies.
    let repeat = RepeatRow {
        rpt_type: "weekly".to_string(),
        count: Some(2),
        byday: "XX,FR".to_string(),
        ..RepeatRow::default()
    };
    assert_eq!(
        expand(repeat, date(2024, 1, 1)),
        vec![date(2024, 1, 5), date(2024, 1, 12)]
    );
}

#[test]
fn expansion_exceptions_from_store() {
    // Arrange
    let mut store = MemoryStore::new();
    let row = RowBuilder::new(7, "alice", date(2024, 3, 4))
        .repeating("daily", Some(date(2024, 3, 8)))
        .build();
    store.insert_row(row).unwrap();
    store.add_exception(EntryId(7), date(2024, 3, 6), true);
    store.add_exception(EntryId(7), date(2024, 3, 10), false);
    let almanac = Almanac::new(test_config(), store, NoCache).unwrap();

    // Act
    let ctx = almanac.context("alice").unwrap();
    let view = almanac
        .load_view(
            &ctx,
            date(2024, 3, 1),
            date(2024, 3, 31),
            almanac_core::CategoryFilter::Any,
        )
        .unwrap();

    // Assert
    assert_eq!(
        view.repeating[0].dates,
        vec![
            date(2024, 3, 4),
            date(2024, 3, 5),
            date(2024, 3, 7),
            date(2024, 3, 8),
            date(2024, 3, 10)
        ]
    );
}
