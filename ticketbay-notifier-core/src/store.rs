//! Durable set of ticket ids that have already been alerted on.
//!
//! The store is a JSON array of id strings. A missing file is a fresh start;
//! an unreadable or corrupt file degrades to an empty set and is left on disk
//! untouched. Saves never fail the caller: errors are logged and the monitor
//! keeps running (at the cost of possible duplicate alerts after a restart).
//!
//! The set grows for the lifetime of the deployment. There is no eviction.

use crate::error::{Error, Result};
use crate::types::TicketId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Previously notified ticket ids plus where they are persisted.
#[derive(Debug)]
pub struct IdentityStore {
    path: PathBuf,
    seen: HashSet<TicketId>,
    first_run: bool,
}

impl IdentityStore {
    /// Load the store from `path`.
    ///
    /// - no file: empty set, `first_run = true`
    /// - valid file: its contents, `first_run = false`
    /// - unreadable/corrupt file: empty set, `first_run = false`
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if !path.is_file() {
            tracing::info!(path = %path.display(), "No identity store found, starting fresh");
            return Self {
                path,
                seen: HashSet::new(),
                first_run: true,
            };
        }

        let seen = match read_ids(&path) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load identity store, continuing with an empty set"
                );
                HashSet::new()
            }
        };

        Self {
            path,
            seen,
            first_run: false,
        }
    }

    /// Write the full set to disk, logging (not returning) any failure.
    ///
    /// Returns whether the write succeeded.
    pub fn save(&self) -> bool {
        match write_ids(&self.seen, &self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), count = self.seen.len(), "Saved identity store");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to save identity store");
                false
            }
        }
    }

    pub fn contains(&self, id: &TicketId) -> bool {
        self.seen.contains(id)
    }

    /// Record an id as alerted. Returns false if it was already present.
    pub fn insert(&mut self, id: TicketId) -> bool {
        self.seen.insert(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// True when no store file existed at load time
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_ids(path: &Path) -> Result<HashSet<TicketId>> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Persistence(format!("failed to read {:?}: {}", path, e)))?;
    let ids: Vec<TicketId> = serde_json::from_slice(&bytes)
        .map_err(|e| Error::Persistence(format!("failed to decode {:?}: {}", path, e)))?;
    Ok(ids.into_iter().collect())
}

fn write_ids(ids: &HashSet<TicketId>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut sorted: Vec<&TicketId> = ids.iter().collect();
    sorted.sort();

    let bytes = serde_json::to_vec(&sorted)?;
    std::fs::write(path, bytes)
        .map_err(|e| Error::Persistence(format!("failed to write {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = TempDir::new().unwrap();
        let store = IdentityStore::load(dir.path().join("seen_ids.pkl"));

        assert!(store.is_first_run());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen_ids.pkl");

        let mut store = IdentityStore::load(&path);
        assert!(store.insert(TicketId::new("101")));
        assert!(store.insert(TicketId::new("abc")));
        assert!(!store.insert(TicketId::new("101")));
        assert!(store.save());

        let reloaded = IdentityStore::load(&path);
        assert!(!reloaded.is_first_run());
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(&TicketId::new("101")));
        assert!(reloaded.contains(&TicketId::new("abc")));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seen_ids.pkl");
        std::fs::write(&path, [0x80, 0x04, 0x95, 0xff, 0x00]).unwrap();

        let store = IdentityStore::load(&path);

        assert!(store.is_empty());
        assert!(!store.is_first_run());
        // The corrupt file is left in place
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x80, 0x04, 0x95, 0xff, 0x00]);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state/seen.json");

        let store = IdentityStore::load(&path);
        assert!(store.save());
        assert!(path.is_file());
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail
        let path = dir.path().join("occupied");
        std::fs::create_dir(&path).unwrap();

        let store = IdentityStore {
            path,
            seen: HashSet::new(),
            first_run: false,
        };
        assert!(!store.save());
    }
}
