// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Expansions shared through the on-disk cache.

use std::fs;

use almanac_core::{
    Almanac, Entry, EntryId, ExpansionCache, FileCache, MemoryStore, cache_key,
};
use jiff::civil::{Date, date};

use crate::common::{RowBuilder, TempCacheDir, test_config};

fn daily_entry() -> Entry {
    let row = RowBuilder::new(1, "alice", date(2024, 5, 1))
        .repeating("daily", Some(date(2024, 5, 3)))
        .build();
    Entry::try_from(row).unwrap()
}

fn almanac(cache: FileCache) -> Almanac<MemoryStore, FileCache> {
    Almanac::new(test_config(), MemoryStore::new(), cache).unwrap()
}

fn blob_name() -> String {
    format!("{}.json", cache_key(EntryId(1)))
}

#[test]
fn file_cache_persists_single_blob() {
    // Arrange
    let tmp = TempCacheDir::new().unwrap();
    let cache = FileCache::open(tmp.nested()).unwrap();
    let almanac = almanac(cache);

    // Act
    let dates = almanac.expand(&daily_entry());

    // Assert: the directory was created and holds no leftover temp files.
    assert_eq!(dates.len(), 3);
    assert_eq!(TempCacheDir::files(&tmp.nested()), vec![blob_name()]);
}

#[test]
fn file_cache_is_shared_between_instances() {
    // Arrange: another process already stored a result for entry 1.
    let tmp = TempCacheDir::new().unwrap();
    let writer = FileCache::open(tmp.path()).unwrap();
    let stored: Vec<Date> = vec![date(2030, 1, 1)];
    writer.write(EntryId(1), &stored).unwrap();

    // Act
    let reader = almanac(FileCache::open(tmp.path()).unwrap());
    let dates = reader.expand(&daily_entry());

    // Assert
    assert_eq!(dates, stored);
}

#[test]
fn file_cache_recovers_from_corrupt_blob() {
    // Arrange
    let tmp = TempCacheDir::new().unwrap();
    fs::write(tmp.path().join(blob_name()), b"{not json").unwrap();
    let cache = FileCache::open(tmp.path()).unwrap();
    assert!(cache.read(EntryId(1)).is_err());

    // Act
    let dates = almanac(cache.clone()).expand(&daily_entry());

    // Assert: the result is recomputed and the blob rewritten.
    assert_eq!(
        dates,
        vec![date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3)]
    );
    assert_eq!(cache.read(EntryId(1)).unwrap(), Some(dates));
}

#[test]
fn file_cache_invalidate_removes_blob() {
    let tmp = TempCacheDir::new().unwrap();
    let almanac = almanac(FileCache::open(tmp.path()).unwrap());
    almanac.expand(&daily_entry());
    assert_eq!(TempCacheDir::files(tmp.path()).len(), 1);

    almanac.invalidate(EntryId(1)).unwrap();
    assert!(TempCacheDir::files(tmp.path()).is_empty());

    // Evicting a missing blob is not an error.
    almanac.invalidate(EntryId(1)).unwrap();
}
