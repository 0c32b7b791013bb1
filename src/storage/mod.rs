// SPDX-License-Identifier: MIT
//! Task persistence — a single JSON-array file guarded by one coarse
//! in-process lock.
//!
//! Every public operation acquires the lock, reads the whole array,
//! mutates in memory, and writes the whole array back through an atomic
//! temp-file rename. A batch insert is one such cycle, not one per task.
//! An unreadable file is quarantined (renamed aside) rather than
//! overwritten; the store then continues empty.

use anyhow::{Context as _, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::analytics::{self, Analytics, Timeline};
use crate::tasks::{EnhancedTask, StoredTask};

/// File-backed task store. Cheap to share behind an `Arc`.
pub struct TaskStore {
    path: PathBuf,
    lock: Mutex<()>,
    /// High-water id mark — seeded from the file at open, advanced on every
    /// insert. Keeps ids monotonic even after the highest row is deleted.
    last_id: AtomicU64,
}

impl TaskStore {
    /// Open (or create) the store at `path`. A missing file is initialized
    /// to an empty array so first reads do not special-case.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create storage directory {}", dir.display()))?;
            }
        }

        if !path.exists() {
            std::fs::write(&path, "[]")
                .with_context(|| format!("initialize storage file {}", path.display()))?;
            info!(path = %path.display(), "created new storage file");
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
            last_id: AtomicU64::new(0),
        };
        let max_id = store.load().iter().map(|t| t.id).max().unwrap_or(0);
        store.last_id.store(max_id, Ordering::Relaxed);

        info!(path = %store.path.display(), "task storage ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ─── File I/O (callers hold the lock) ─────────────────────────────────────

    /// Read the full array. A missing file reads as empty; unparsable JSON
    /// is quarantined and reads as empty.
    fn load(&self) -> Vec<StoredTask> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!(path = %self.path.display(), err = %e, "failed to read storage file");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(tasks) => tasks,
            Err(e) => {
                self.quarantine(&e);
                Vec::new()
            }
        }
    }

    /// Move an unreadable storage file aside so its contents survive for
    /// inspection instead of being overwritten by the next write.
    fn quarantine(&self, parse_err: &serde_json::Error) {
        let quarantine_path = self
            .path
            .with_file_name(format!(
                "{}.corrupt-{}",
                self.path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "tasks.json".to_string()),
                Utc::now().timestamp()
            ));

        match std::fs::rename(&self.path, &quarantine_path) {
            Ok(()) => warn!(
                path = %self.path.display(),
                quarantined = %quarantine_path.display(),
                err = %parse_err,
                "storage file is corrupt — quarantined, continuing with an empty store"
            ),
            Err(rename_err) => error!(
                path = %self.path.display(),
                err = %parse_err,
                rename_err = %rename_err,
                "storage file is corrupt and could not be quarantined"
            ),
        }
    }

    /// Write the full array atomically: serialize to a sibling temp file,
    /// then rename over the live file.
    fn persist(&self, tasks: &[StoredTask]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks).context("serialize task array")?;

        let tmp_path = self.path.with_file_name(format!(
            "{}.tmp",
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "tasks.json".to_string())
        ));

        std::fs::write(&tmp_path, json)
            .with_context(|| format!("write temp storage file {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replace storage file {}", self.path.display()))?;

        Ok(())
    }

    /// Next id under the lock: one past the larger of the file's max id
    /// and the in-process high-water mark.
    fn next_id(&self, tasks: &[StoredTask]) -> u64 {
        let file_max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        file_max.max(self.last_id.load(Ordering::Relaxed)) + 1
    }

    fn stored_from(task: &EnhancedTask, id: u64, note_id: &str) -> StoredTask {
        StoredTask {
            id,
            created_at: Utc::now().to_rfc3339(),
            task_name: task.task_name.clone(),
            owner: task.owner.clone(),
            owner_mapped: task.owner.clone(),
            due_date: task.due_date.clone(),
            predicted_deadline: task.predicted_deadline.clone(),
            priority: task.priority.clone(),
            priority_reason: format!("Confidence: {:.2}", task.confidence_score),
            confidence_score: task.confidence_score,
            difficulty: task.difficulty.clone(),
            category: task.category.clone(),
            has_dependency: task.has_dependency,
            dependency_info: task.dependency_info.clone(),
            risk_level: task.risk_level.clone(),
            risk_description: task.risk_description.clone(),
            progress_estimate: task.progress_estimate.clone(),
            source_note_id: note_id.to_string(),
            status: "pending".to_string(),
        }
    }

    // ─── Writes ───────────────────────────────────────────────────────────────

    /// Append one enriched task. Returns the assigned id.
    ///
    /// Ids are `max(existing) + 1` — monotonic within the file and never
    /// reused after a deletion.
    pub fn create(&self, task: &EnhancedTask, note_id: &str) -> Result<u64> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut tasks = self.load();
        let id = self.next_id(&tasks);
        tasks.push(Self::stored_from(task, id, note_id));
        self.persist(&tasks)?;
        self.last_id.store(id, Ordering::Relaxed);

        debug!(id, name = %task.task_name, "created task");
        Ok(id)
    }

    /// Append a batch of enriched tasks in a single read-append-write
    /// cycle. Returns `(stored, failed)`; a write failure fails the whole
    /// batch, nothing lands partially.
    pub fn create_batch(&self, batch: &[EnhancedTask], note_id: &str) -> (usize, usize) {
        if batch.is_empty() {
            return (0, 0);
        }

        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut tasks = self.load();
        let mut id = self.next_id(&tasks);
        for task in batch {
            tasks.push(Self::stored_from(task, id, note_id));
            id += 1;
        }

        match self.persist(&tasks) {
            Ok(()) => {
                self.last_id.store(id - 1, Ordering::Relaxed);
                info!(stored = batch.len(), note_id, "batch stored");
                (batch.len(), 0)
            }
            Err(e) => {
                error!(err = %e, note_id, "batch write failed");
                (0, batch.len())
            }
        }
    }

    /// Delete one task by id. `Ok(false)` when the id is not present —
    /// an expected outcome, not an error.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut tasks = self.load();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            debug!(id, "delete: task not found");
            return Ok(false);
        }

        self.persist(&tasks)?;
        info!(id, "deleted task");
        Ok(true)
    }

    /// Remove every stored task.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.persist(&[])?;
        info!("cleared all tasks");
        Ok(())
    }

    // ─── Reads ────────────────────────────────────────────────────────────────

    /// All stored tasks, most recent first.
    pub fn all_tasks(&self) -> Vec<StoredTask> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut tasks = self.load();
        tasks.reverse();
        tasks
    }

    /// Tasks extracted from one note, in insertion order.
    pub fn tasks_for_note(&self, note_id: &str) -> Vec<StoredTask> {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.load()
            .into_iter()
            .filter(|t| t.source_note_id == note_id)
            .collect()
    }

    pub fn count(&self) -> usize {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.load().len()
    }

    /// Recompute analytics from a full scan.
    pub fn analytics(&self) -> Analytics {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        analytics::compute(&self.load())
    }

    /// Deadline-sorted timeline of tasks that have a predicted date.
    pub fn timeline(&self) -> Timeline {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut tasks = self.load();
        tasks.reverse();
        analytics::timeline(&tasks)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(name: &str) -> EnhancedTask {
        EnhancedTask {
            task_name: name.to_string(),
            owner: "Self (You)".to_string(),
            due_date: "Friday".to_string(),
            priority: "Medium".to_string(),
            confidence_score: 0.7,
            difficulty: "Medium".to_string(),
            category: "General".to_string(),
            predicted_deadline: Some("2026-08-07".to_string()),
            has_dependency: false,
            dependency_info: None,
            risk_level: "Low".to_string(),
            risk_description: None,
            progress_estimate: "Not Started".to_string(),
        }
    }

    fn temp_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_initializes_empty_file() {
        let (_dir, store) = temp_store();
        assert_eq!(store.count(), 0);
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "[]");
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let (_dir, store) = temp_store();
        assert_eq!(store.create(&sample_task("First task here"), "n1").unwrap(), 1);
        assert_eq!(store.create(&sample_task("Second task here"), "n1").unwrap(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, store) = temp_store();
        store.create(&sample_task("First task here"), "n1").unwrap();
        let second = store.create(&sample_task("Second task here"), "n1").unwrap();
        assert!(store.delete(second).unwrap());
        let third = store.create(&sample_task("Third task here"), "n1").unwrap();
        assert_eq!(third, 3, "deleting the highest row must not free its id");
    }

    #[test]
    fn reopen_reseeds_the_id_counter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        {
            let store = TaskStore::open(&path).unwrap();
            store.create(&sample_task("First task here"), "n1").unwrap();
            store.create(&sample_task("Second task here"), "n1").unwrap();
        }
        let store = TaskStore::open(&path).unwrap();
        assert_eq!(store.create(&sample_task("Third task here"), "n1").unwrap(), 3);
    }

    #[test]
    fn delete_missing_id_is_false_and_changes_nothing() {
        let (_dir, store) = temp_store();
        store.create(&sample_task("Only task here"), "n1").unwrap();
        assert!(!store.delete(99).unwrap());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn all_tasks_most_recent_first() {
        let (_dir, store) = temp_store();
        store.create(&sample_task("First task here"), "n1").unwrap();
        store.create(&sample_task("Second task here"), "n1").unwrap();
        let tasks = store.all_tasks();
        assert_eq!(tasks[0].task_name, "Second task here");
        assert_eq!(tasks[1].task_name, "First task here");
    }

    #[test]
    fn tasks_for_note_filters_in_insertion_order() {
        let (_dir, store) = temp_store();
        store.create(&sample_task("From note one"), "n1").unwrap();
        store.create(&sample_task("From note two"), "n2").unwrap();
        store.create(&sample_task("Also from note one"), "n1").unwrap();
        let tasks = store.tasks_for_note("n1");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_name, "From note one");
        assert_eq!(tasks[1].task_name, "Also from note one");
    }

    #[test]
    fn batch_is_all_or_nothing_on_success() {
        let (_dir, store) = temp_store();
        let batch = vec![sample_task("Batch task one"), sample_task("Batch task two")];
        let (stored, failed) = store.create_batch(&batch, "n1");
        assert_eq!((stored, failed), (2, 0));
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let (_dir, store) = temp_store();
        assert_eq!(store.create_batch(&[], "n1"), (0, 0));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn clear_empties_the_store() {
        let (_dir, store) = temp_store();
        store.create(&sample_task("Task to clear out"), "n1").unwrap();
        store.clear().unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn corrupt_file_is_quarantined_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = TaskStore::open(&path).unwrap();
        assert_eq!(store.count(), 0);

        let quarantined: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(quarantined.len(), 1, "corrupt file should be moved aside");

        // The store keeps working after quarantine.
        store.create(&sample_task("Post-corruption task"), "n1").unwrap();
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn stored_reason_carries_formatted_confidence() {
        let (_dir, store) = temp_store();
        let mut task = sample_task("Confidence format check");
        task.confidence_score = 0.856;
        store.create(&task, "n1").unwrap();
        assert_eq!(store.all_tasks()[0].priority_reason, "Confidence: 0.86");
    }
}
