//! Analysis history, persisted as JSON under a fixed storage key.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;
use uuid::Uuid;

use crate::analysis::AnalysisResponse;

use super::models::HistoryEntry;

/// Maximum number of retained entries; the oldest are evicted first.
pub const HISTORY_CAP: usize = 100;

pub trait HistoryStore: Send + Sync {
    /// Prepend a new entry, evicting beyond [`HISTORY_CAP`].
    fn add(&self, chords: Vec<String>, result: AnalysisResponse) -> Result<HistoryEntry>;

    /// Remove one entry. Returns whether it existed.
    fn remove(&self, id: &Uuid) -> Result<bool>;

    /// Flip an entry's favorite flag. Returns the new flag, or None if the
    /// entry does not exist.
    fn toggle_favorite(&self, id: &Uuid) -> Result<Option<bool>>;

    /// Drop every entry.
    fn clear(&self) -> Result<()>;

    /// The most recent entries, newest first.
    fn recent(&self, limit: usize) -> Vec<HistoryEntry>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// File-backed history store. Every mutation is persisted atomically.
pub struct JsonHistoryStore {
    path: PathBuf,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl JsonHistoryStore {
    /// Open the store at `path`, loading existing entries if present.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read history store: {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse history store: {:?}", path))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<()> {
        let dir = self.path.parent().context("History store has no parent dir")?;
        let json = serde_json::to_string_pretty(entries)?;

        // Write-then-rename so a crash never leaves a truncated store.
        let tmp = tempfile::NamedTempFile::new_in(dir)
            .context("Failed to create temp file for history store")?;
        fs::write(tmp.path(), json).context("Failed to write history store")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to persist history store: {:?}", self.path))?;
        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn add(&self, chords: Vec<String>, result: AnalysisResponse) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(chords, result);
        let mut entries = self.entries.lock().unwrap();
        entries.insert(0, entry.clone());
        if entries.len() > HISTORY_CAP {
            let evicted = entries.len() - HISTORY_CAP;
            warn!("History at capacity, evicting {} oldest entries", evicted);
            entries.truncate(HISTORY_CAP);
        }
        self.persist(&entries)?;
        Ok(entry)
    }

    fn remove(&self, id: &Uuid) -> Result<bool> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|entry| entry.id != *id);
        let removed = entries.len() < before;
        if removed {
            self.persist(&entries)?;
        }
        Ok(removed)
    }

    fn toggle_favorite(&self, id: &Uuid) -> Result<Option<bool>> {
        let mut entries = self.entries.lock().unwrap();
        let flag = match entries.iter_mut().find(|entry| entry.id == *id) {
            Some(entry) => {
                entry.is_favorite = !entry.is_favorite;
                Some(entry.is_favorite)
            }
            None => None,
        };
        if flag.is_some() {
            self.persist(&entries)?;
        }
        Ok(flag)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
        self.persist(&entries)
    }

    fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().unwrap();
        let mut recent: Vec<HistoryEntry> = entries.clone();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        recent
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}
