// SPDX-License-Identifier: MIT
//! Derived task analytics — recomputed from the full task array on every
//! read, never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tasks::StoredTask;

// ─── Analytics ────────────────────────────────────────────────────────────────

/// Aggregated view over every stored task.
///
/// Breakdown maps are ordered so the JSON output is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analytics {
    pub total_tasks: u64,
    pub by_priority: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub by_difficulty: BTreeMap<String, u64>,
    pub by_risk: BTreeMap<String, u64>,
    pub high_risk_count: u64,
    pub with_dependencies: u64,
    /// Mean confidence across all tasks; 0.0 for an empty store.
    pub avg_confidence: f64,
}

/// Recompute analytics from a full scan of the task array.
pub fn compute(tasks: &[StoredTask]) -> Analytics {
    if tasks.is_empty() {
        return Analytics::default();
    }

    let mut analytics = Analytics {
        total_tasks: tasks.len() as u64,
        ..Analytics::default()
    };

    let mut confidence_sum = 0.0;
    for task in tasks {
        *analytics.by_priority.entry(task.priority.clone()).or_insert(0) += 1;
        *analytics.by_category.entry(task.category.clone()).or_insert(0) += 1;
        *analytics.by_difficulty.entry(task.difficulty.clone()).or_insert(0) += 1;
        *analytics.by_risk.entry(task.risk_level.clone()).or_insert(0) += 1;

        if task.risk_level == "High" {
            analytics.high_risk_count += 1;
        }
        if task.has_dependency {
            analytics.with_dependencies += 1;
        }
        confidence_sum += task.confidence_score;
    }

    analytics.avg_confidence = confidence_sum / tasks.len() as f64;
    analytics
}

// ─── Timeline ─────────────────────────────────────────────────────────────────

/// One entry in the deadline timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub task: String,
    /// Predicted ISO date the entry sorts by.
    pub due: String,
    pub priority: String,
    pub owner: String,
}

/// Deadline-ordered view over tasks that have a predicted date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub timeline: Vec<TimelineEntry>,
    /// Number of entries (tasks without a predicted date are excluded).
    pub total_tasks: u64,
}

/// Build the timeline. Tasks without a predicted deadline are skipped;
/// the rest sort ascending by date.
pub fn timeline(tasks: &[StoredTask]) -> Timeline {
    let mut entries: Vec<TimelineEntry> = tasks
        .iter()
        .filter_map(|task| {
            task.predicted_deadline.as_ref().map(|due| TimelineEntry {
                task: task.task_name.clone(),
                due: due.clone(),
                priority: task.priority.clone(),
                owner: task.owner_mapped.clone(),
            })
        })
        .collect();

    entries.sort_by(|a, b| a.due.cmp(&b.due));

    Timeline {
        total_tasks: entries.len() as u64,
        timeline: entries,
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
