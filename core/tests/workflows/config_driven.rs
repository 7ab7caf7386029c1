// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Behavior switched by configuration files.

use almanac_core::{
    Almanac, CategoryFilter, Config, ConflictRequest, Error, MemoryCache, MemoryStore, TimeOfDay,
    WeekStart,
};
use jiff::civil::{date, time};

use crate::common::{RowBuilder, office_store};

fn parse(text: &str) -> Config {
    toml::from_str(text).unwrap()
}

#[test]
fn config_partial_file_keeps_defaults() {
    // Arrange
    let text = r#"
timezone = "UTC"
week_start = "SU"
entry_slots = 10
"#;

    // Act
    let mut config = parse(text);
    config.normalize().unwrap();

    // Assert
    assert_eq!(config.week_start, WeekStart::Sunday);
    assert_eq!(config.entry_slots, 72);
    assert_eq!(config.conflict_repeat_months, 6);
    assert_eq!(config.work_day_start_hour, 8);
    assert!(!config.limit_appts);
}

#[test]
fn config_rejects_inverted_work_day() {
    let mut config = parse("work_day_start_hour = 18\nwork_day_end_hour = 9\n");
    assert!(matches!(config.normalize(), Err(Error::Config(_))));
}

#[test]
fn config_single_user_needs_login() {
    let config = parse("timezone = \"UTC\"\nsingle_user = true\n");
    let err = Almanac::new(config, MemoryStore::new(), MemoryCache::new()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn config_unknown_time_zone_fails() {
    let config = parse("timezone = \"Mars/Olympus_Mons\"\n");
    let err = Almanac::new(config, MemoryStore::new(), MemoryCache::new()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn config_disabling_crossday_events_keeps_them_whole() {
    // Arrange
    let config = parse("timezone = \"UTC\"\ndisable_crossday_events = true\n");
    let almanac = Almanac::new(config, office_store(), MemoryCache::new()).unwrap();
    let ctx = almanac.context("alice").unwrap();
    let (sunday, monday) = (date(2024, 1, 7), date(2024, 1, 8));

    // Act
    let view = almanac
        .load_view(&ctx, sunday, monday, CategoryFilter::Any)
        .unwrap();

    // Assert: the release runs 240 minutes on Sunday and nothing spills over.
    let release = almanac
        .merge_for_day(&view, sunday, sunday, false)
        .into_iter()
        .find(|o| o.entry.name == "Release night")
        .unwrap();
    assert_eq!(release.duration, 240);
    assert!(
        almanac
            .merge_for_day(&view, monday, monday, false)
            .iter()
            .all(|o| o.clone_of.is_none())
    );
}

#[test]
fn config_appointment_limit_flags_busy_day() {
    // Arrange
    let day = date(2024, 2, 6);
    let mut store = MemoryStore::new();
    for (id, hhmmss) in [(1, 80000), (2, 110000)] {
        store
            .insert_row(RowBuilder::new(id, "alice", day).at(hhmmss, 30).build())
            .unwrap();
    }
    let config = parse("timezone = \"UTC\"\nlimit_appts = true\nlimit_appts_number = 2\n");
    let almanac = Almanac::new(config, store, MemoryCache::new()).unwrap();
    let request = ConflictRequest {
        dates: vec![day],
        time: TimeOfDay::Timed(time(15, 0, 0, 0)),
        duration: 30,
        participants: vec!["alice".to_string()],
        requester: "alice".to_string(),
        exclude: None,
    };

    // Act
    let found = almanac.check_conflicts(&request).unwrap();

    // Assert: the second appointment of the day reaches the limit.
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].time, TimeOfDay::Timed(time(11, 0, 0, 0)));
    assert!(found[0].limit_exceeded);
}
