// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Day views built from layered calendars.

use almanac_core::{Almanac, CategoryFilter, Config, MemoryCache, MemoryStore, Occurrence};
use jiff::civil::date;

use crate::common::{RowBuilder, office_store, test_config};

fn names(day: &[Occurrence]) -> Vec<String> {
    day.iter().map(|o| o.name().into_owned()).collect()
}

#[test]
fn day_view_merges_layers_fragments_and_tasks() {
    // Arrange
    let almanac = Almanac::new(test_config(), office_store(), MemoryCache::new()).unwrap();
    let ctx = almanac.context("alice").unwrap();
    let monday = date(2024, 1, 8);

    // Act
    let view = almanac
        .load_view(&ctx, monday, date(2024, 1, 14), CategoryFilter::Any)
        .unwrap();
    let day = almanac.merge_for_day(&view, monday, monday, false);

    // Assert
    assert_eq!(
        names(&day),
        vec![
            "Release night (cont.)",
            "Team meeting",
            "Dentist",
            "Write report"
        ]
    );
    let team = &day[1];
    assert_eq!(team.entry.login, "alice");
    assert_eq!(day[0].clone_of, Some(date(2024, 1, 7)));
}

#[test]
fn day_view_shows_layer_duplicates_when_allowed() {
    let mut store = office_store();
    store.add_layer(
        "dave",
        almanac_core::Layer {
            login: "bob".to_string(),
            color: "#999999".to_string(),
            allow_duplicates: true,
        },
    );
    store
        .insert_row(
            RowBuilder::new(1, "alice", date(2024, 1, 1))
                .name("Team meeting")
                .at(100000, 60)
                .participant("dave")
                .repeating("weekly", None)
                .build(),
        )
        .unwrap();
    let almanac = Almanac::new(test_config(), store, MemoryCache::new()).unwrap();
    let ctx = almanac.context("dave").unwrap();
    let monday = date(2024, 1, 8);

    let view = almanac
        .load_view(&ctx, monday, monday, CategoryFilter::Any)
        .unwrap();
    let logins: Vec<String> = almanac
        .merge_for_day(&view, monday, monday, false)
        .iter()
        .filter(|o| o.entry.name == "Team meeting")
        .map(|o| o.entry.login.clone())
        .collect();
    assert_eq!(logins, vec!["dave", "bob"]);
}

#[test]
fn day_view_filters_by_category() {
    let mut store = office_store();
    store
        .insert_row(
            RowBuilder::new(20, "alice", date(2024, 1, 8))
                .name("Gym")
                .at(70000, 60)
                .category(4)
                .build(),
        )
        .unwrap();
    let almanac = Almanac::new(test_config(), store, MemoryCache::new()).unwrap();
    let ctx = almanac.context("alice").unwrap();
    let monday = date(2024, 1, 8);

    let view = almanac
        .load_view(&ctx, monday, monday, CategoryFilter::Only(4))
        .unwrap();
    assert_eq!(names(&almanac.merge_for_day(&view, monday, monday, false)), vec!["Gym"]);
}

#[test]
fn day_view_waiting_entries_need_opt_in() {
    let mut store = office_store();
    store
        .insert_row(
            RowBuilder::new(21, "bob", date(2024, 1, 8))
                .name("Offsite")
                .at(160000, 60)
                .participant("alice")
                .status("W")
                .build(),
        )
        .unwrap();
    let almanac = Almanac::new(test_config(), store, MemoryCache::new()).unwrap();
    let ctx = almanac.context("alice").unwrap();
    let monday = date(2024, 1, 8);
    let view = almanac
        .load_view(&ctx, monday, monday, CategoryFilter::Any)
        .unwrap();

    let offsite = "Offsite".to_string();
    assert!(!names(&almanac.merge_for_day(&view, monday, monday, false)).contains(&offsite));
    assert!(names(&almanac.merge_for_day(&view, monday, monday, true)).contains(&offsite));
}

#[test]
fn day_view_case_insensitive_ordering() {
    let mut store = office_store();
    for (id, name) in [(30, "alpha"), (31, "Beta")] {
        store
            .insert_row(
                RowBuilder::new(id, "alice", date(2024, 1, 9))
                    .name(name)
                    .at(80000, 30)
                    .build(),
            )
            .unwrap();
    }
    let config = Config {
        sort_case_insensitive: true,
        ..test_config()
    };
    let almanac = Almanac::new(config, store, MemoryCache::new()).unwrap();
    let ctx = almanac.context("alice").unwrap();
    let tuesday = date(2024, 1, 9);
    let view = almanac
        .load_view(&ctx, tuesday, tuesday, CategoryFilter::Any)
        .unwrap();
    assert_eq!(
        names(&almanac.merge_for_day(&view, tuesday, date(2024, 1, 1), false)),
        vec!["alpha", "Beta"]
    );
}

#[test]
fn day_view_shows_every_day_of_a_long_event() {
    // Arrange: 22:00 on Saturday until midnight on Tuesday.
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
    let ctx = almanac.context("alice").unwrap();
    let (sunday, monday, tuesday) = (date(2024, 2, 4), date(2024, 2, 5), date(2024, 2, 6));

    // Act
    let view = almanac
        .load_view(&ctx, sunday, tuesday, CategoryFilter::Any)
        .unwrap();
    let day = |d| almanac.merge_for_day(&view, d, sunday, false);

    // Assert
    for d in [sunday, monday] {
        let occs = day(d);
        assert_eq!(names(&occs), vec!["Conference (cont.)"]);
        assert_eq!(occs[0].duration, 1439);
        assert_eq!(occs[0].clone_of, Some(date(2024, 2, 3)));
    }
    assert!(day(tuesday).is_empty());
}

#[test]
fn day_view_of_last_day_alone_still_finds_long_event() {
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
    let ctx = almanac.context("alice").unwrap();
    let monday = date(2024, 2, 5);

    let view = almanac
        .load_view(&ctx, monday, monday, CategoryFilter::Any)
        .unwrap();
    assert_eq!(
        names(&almanac.merge_for_day(&view, monday, monday, false)),
        vec!["Conference (cont.)"]
    );
}
