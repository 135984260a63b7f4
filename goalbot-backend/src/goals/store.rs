//! GoalStore: durable, append-only objective storage.
//!
//! The collection lives behind an in-process `RwLock`. Writers hold the
//! write lock across the whole read-modify-backup-write sequence, so ids
//! stay unique and contiguous under concurrent commands. Readers never see
//! a partial file thanks to the atomic-replace write in `file_ops`.
//! Single-process only: there is no cross-process file lock.

use super::file_ops;
use crate::config::GoalsConfig;
use crate::error::StoreError;
use crate::models::{GoalsCollection, Objective, ObjectiveStatus, ProgressUpdate};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub struct GoalStore {
    path: PathBuf,
    page_size: usize,
    collection: RwLock<GoalsCollection>,
}

impl GoalStore {
    /// Open the store, loading the collection from disk.
    ///
    /// A missing or empty file is an empty collection, not an error. A file
    /// that exists but does not parse fails with `CorruptStore` and is left
    /// untouched in place.
    pub fn open(config: &GoalsConfig) -> Result<Self, StoreError> {
        let path = config.goals_file_path();
        let collection = load_collection(&path)?;
        log::info!(
            "[STORE] Loaded {} objectives and {} updates from {:?}",
            collection.objectives.len(),
            collection.updates.len(),
            path
        );
        if let Ok(backups) = file_ops::list_backups(&path) {
            if !backups.is_empty() {
                log::debug!("[STORE] {} backup files present", backups.len());
            }
        }
        Ok(Self {
            path,
            page_size: config.page_size,
            collection: RwLock::new(collection),
        })
    }

    /// Append a new objective and persist the collection. Returns the
    /// stored record with its assigned id.
    pub fn append(
        &self,
        author: &str,
        raw_text: &str,
        formatted_text: &str,
    ) -> Result<Objective, StoreError> {
        if raw_text.trim().is_empty() {
            return Err(StoreError::EmptyObjective);
        }

        let mut collection = self.collection.write().unwrap();
        let objective = Objective {
            id: collection.next_id(),
            author: author.to_string(),
            raw_text: raw_text.to_string(),
            formatted_text: formatted_text.to_string(),
            created_at: Utc::now(),
            status: ObjectiveStatus::Active,
        };
        collection.objectives.push(objective.clone());
        if let Err(e) = self.persist(&collection) {
            // Not persisted, so it must not survive in memory either.
            collection.objectives.pop();
            return Err(e);
        }

        log::info!(
            "[STORE] Objective {} created by {}",
            objective.id,
            objective.author
        );
        Ok(objective)
    }

    /// One 1-indexed page of objectives in insertion order. Pages past the
    /// end are empty, not an error.
    pub fn list(&self, page: usize, page_size: usize) -> Vec<Objective> {
        if page == 0 || page_size == 0 {
            return Vec::new();
        }
        let collection = self.collection.read().unwrap();
        collection
            .objectives
            .iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    }

    /// One page at the store's configured page size.
    pub fn list_page(&self, page: usize) -> Vec<Objective> {
        self.list(page, self.page_size)
    }

    /// Total number of stored objectives.
    pub fn count(&self) -> usize {
        self.collection.read().unwrap().objectives.len()
    }

    /// Look up a single objective by id.
    pub fn get(&self, id: u64) -> Option<Objective> {
        self.collection.read().unwrap().find(id).cloned()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Record a progress note for an existing objective.
    pub fn add_update(
        &self,
        objective_id: u64,
        author: &str,
        text: &str,
    ) -> Result<ProgressUpdate, StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut collection = self.collection.write().unwrap();
        if collection.find(objective_id).is_none() {
            return Err(StoreError::ObjectiveNotFound(objective_id));
        }
        let update = ProgressUpdate {
            objective_id,
            author: author.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        collection.updates.push(update.clone());
        if let Err(e) = self.persist(&collection) {
            collection.updates.pop();
            return Err(e);
        }

        log::info!("[STORE] Progress recorded for objective {}", objective_id);
        Ok(update)
    }

    /// The most recent `limit` updates for one objective, oldest first
    /// within that window.
    pub fn updates_for(&self, objective_id: u64, limit: usize) -> Vec<ProgressUpdate> {
        let collection = self.collection.read().unwrap();
        let matching: Vec<ProgressUpdate> = collection
            .updates
            .iter()
            .filter(|u| u.objective_id == objective_id)
            .cloned()
            .collect();
        let skip = matching.len().saturating_sub(limit);
        matching.into_iter().skip(skip).collect()
    }

    /// Serialize and replace the goals file, taking a best-effort backup of
    /// the previous contents first. A backup failure is logged, never fatal.
    fn persist(&self, collection: &GoalsCollection) -> Result<(), StoreError> {
        match file_ops::backup_current(&self.path) {
            Ok(Some(backup)) => log::debug!("[STORE] Backup written to {:?}", backup),
            Ok(None) => {}
            Err(e) => log::warn!("[STORE] Failed to back up {:?}: {}", self.path, e),
        }

        let json = serde_json::to_string_pretty(collection)?;
        file_ops::write_atomic(&self.path, &json).map_err(StoreError::StorageWrite)
    }
}

fn load_collection(path: &Path) -> Result<GoalsCollection, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(GoalsCollection::default());
        }
        Err(e) => return Err(StoreError::Io(e)),
    };
    if content.trim().is_empty() {
        return Ok(GoalsCollection::default());
    }
    serde_json::from_str(&content).map_err(|source| StoreError::CorruptStore {
        path: path.to_path_buf(),
        source,
    })
}
