// SPDX-License-Identifier: MIT
//! Task data models — the three task shapes that move through the pipeline.
//!
//! `RawTask` is what the model extraction returns, `EnhancedTask` is the
//! result of every enrichment pass, `StoredTask` is the persisted record.
//! Serialized field order is struct-declaration order and is part of the
//! on-disk contract.

pub mod markdown;

use serde::{Deserialize, Serialize};

// ─── RawTask ──────────────────────────────────────────────────────────────────

/// A single task as returned by the extraction model, unvalidated.
///
/// Missing fields default to `"Self"` / `"Needs Review"` / `"Medium"` so a
/// sparse model response still deserializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub task_name: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default = "default_due_date")]
    pub due_date: String,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_owner() -> String {
    "Self".to_string()
}

fn default_due_date() -> String {
    "Needs Review".to_string()
}

fn default_priority() -> String {
    "Medium".to_string()
}

impl RawTask {
    pub fn new(task_name: impl Into<String>) -> Self {
        Self {
            task_name: task_name.into(),
            owner: default_owner(),
            due_date: default_due_date(),
            priority: default_priority(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }
}

// ─── EnhancedTask ─────────────────────────────────────────────────────────────

/// A task after every enrichment pass has run. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedTask {
    pub task_name: String,
    /// Canonical owner identity from the owner mapper.
    pub owner: String,
    /// Normalized due-date display string from the deadline predictor.
    pub due_date: String,
    /// Final priority label from the priority engine: High | Medium | Low.
    pub priority: String,
    /// Priority confidence, clamped to 0.5–1.0.
    pub confidence_score: f64,
    /// Easy | Medium | Hard.
    pub difficulty: String,
    /// One of the seven fixed categories, or "General".
    pub category: String,
    /// Predicted ISO calendar date ("2026-08-07"). `None` when uncertain.
    pub predicted_deadline: Option<String>,
    pub has_dependency: bool,
    /// "Depends on: ..." extract when a dependency phrase was found.
    pub dependency_info: Option<String>,
    /// Low | Medium | High.
    pub risk_level: String,
    pub risk_description: Option<String>,
    /// Not Started | In Progress | 50% | Blocked | Completed.
    pub progress_estimate: String,
}

// ─── StoredTask ───────────────────────────────────────────────────────────────

/// A persisted task record — `EnhancedTask` plus storage bookkeeping.
///
/// Owned exclusively by the store; ids are monotonic and never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: u64,
    /// RFC 3339 insert timestamp.
    pub created_at: String,
    pub task_name: String,
    pub owner: String,
    pub owner_mapped: String,
    pub due_date: String,
    pub predicted_deadline: Option<String>,
    pub priority: String,
    pub priority_reason: String,
    pub confidence_score: f64,
    pub difficulty: String,
    pub category: String,
    pub has_dependency: bool,
    pub dependency_info: Option<String>,
    pub risk_level: String,
    pub risk_description: Option<String>,
    pub progress_estimate: String,
    /// The note this task was extracted from.
    pub source_note_id: String,
    pub status: String,
}

// ─── MeetingSummary ───────────────────────────────────────────────────────────

/// Summary of one meeting note as returned by the summarizer model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_decisions: Vec<String>,
    #[serde(default)]
    pub blockers: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl MeetingSummary {
    /// Degraded placeholder used when the summarizer call fails.
    pub fn unavailable() -> Self {
        Self {
            summary: "Summary unavailable".to_string(),
            key_decisions: vec![],
            blockers: vec![],
            risks: vec![],
            participants: vec![],
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
