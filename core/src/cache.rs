// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use jiff::civil::Date;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::types::EntryId;

/// Memoized expansions of repeating entries, keyed by entry id.
///
/// Contents are a pure function of the entry, so concurrent writers may race
/// freely. Callers evict an entry whenever its rule or exceptions change.
pub trait ExpansionCache {
    /// The cached dates of `id`, `None` on a miss.
    fn read(&self, id: EntryId) -> Result<Option<Vec<Date>>>;

    /// Store the dates of `id`, replacing any previous value.
    fn write(&self, id: EntryId, dates: &[Date]) -> Result<()>;

    /// Drop the cached dates of `id`.
    fn evict(&self, id: EntryId) -> Result<()>;
}

impl<C: ExpansionCache + ?Sized> ExpansionCache for Box<C> {
    fn read(&self, id: EntryId) -> Result<Option<Vec<Date>>> {
        (**self).read(id)
    }

    fn write(&self, id: EntryId, dates: &[Date]) -> Result<()> {
        (**self).write(id, dates)
    }

    fn evict(&self, id: EntryId) -> Result<()> {
        (**self).evict(id)
    }
}

/// A cache that never hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl ExpansionCache for NoCache {
    fn read(&self, _id: EntryId) -> Result<Option<Vec<Date>>> {
        Ok(None)
    }

    fn write(&self, _id: EntryId, _dates: &[Date]) -> Result<()> {
        Ok(())
    }

    fn evict(&self, _id: EntryId) -> Result<()> {
        Ok(())
    }
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<EntryId, Vec<Date>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExpansionCache for MemoryCache {
    fn read(&self, id: EntryId) -> Result<Option<Vec<Date>>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(&id).cloned())
    }

    fn write(&self, id: EntryId, dates: &[Date]) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(id, dates.to_vec());
        Ok(())
    }

    fn evict(&self, id: EntryId) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&id);
        Ok(())
    }
}

/// A cache of JSON blobs in a directory shared between processes.
///
/// Blobs are written to a temporary file in the same directory and
/// renamed into place, so readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct CacheBlob {
    id: EntryId,
    dates: Vec<Date>,
}

impl FileCache {
    /// Open the cache in `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "opened expansion cache");
        Ok(FileCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: EntryId) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(id)))
    }
}

impl ExpansionCache for FileCache {
    fn read(&self, id: EntryId) -> Result<Option<Vec<Date>>> {
        let bytes = match fs::read(self.path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let blob: CacheBlob = serde_json::from_slice(&bytes)?;
        if blob.id != id {
            tracing::warn!(%id, found = %blob.id, "cache blob belongs to another entry");
            return Ok(None);
        }
        Ok(Some(blob.dates))
    }

    fn write(&self, id: EntryId, dates: &[Date]) -> Result<()> {
        let blob = CacheBlob {
            id,
            dates: dates.to_vec(),
        };
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, &blob)?;
        tmp.flush()?;
        tmp.persist(self.path(id)).map_err(|e| e.error)?;
        Ok(())
    }

    fn evict(&self, id: EntryId) -> Result<()> {
        match fs::remove_file(self.path(id)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Stable file name stem of an entry's cache blob.
pub fn cache_key(id: EntryId) -> String {
    hex::encode(Sha256::digest(id.to_string().as_bytes()))
}
