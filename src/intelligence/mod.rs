// SPDX-License-Identifier: MIT
//! The enrichment pipeline — deterministic passes over model-extracted
//! tasks, composed in a fixed order:
//!
//!   validator → priority engine → owner mapper → deadline predictor →
//!   analyzer → storage
//!
//! Every pass is a pure function over fixed tables; no model calls happen
//! here. `enrich_and_store` is the single entry point the transport layer
//! uses.

pub mod analyzer;
pub mod deadline;
pub mod owner_mapper;
pub mod priority;
pub mod text;
pub mod validator;

use chrono::NaiveDate;
use tracing::info;

use crate::storage::TaskStore;
use crate::tasks::{EnhancedTask, RawTask};

/// What one note produced: the enriched tasks plus storage counts.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub tasks: Vec<EnhancedTask>,
    pub stored: usize,
    pub failed: usize,
}

/// Run every enrichment pass over one validated task.
///
/// `today` is the note's reference date — all relative deadlines resolve
/// against it.
pub fn enrich_task(task: &RawTask, today: NaiveDate) -> EnhancedTask {
    let priority = priority::analyze_priority(
        &task.task_name,
        &task.due_date,
        &task.owner,
        &task.priority,
    );

    let (_original_owner, mapped_owner) = owner_mapper::map_owner(&task.owner);

    let prediction = deadline::predict_deadline(&task.due_date, today);

    let difficulty = analyzer::estimate_difficulty(&task.task_name);
    let category = analyzer::classify_category(&task.task_name);
    let (has_dependency, dependency_info) = analyzer::detect_dependency(&task.task_name);
    let (risk_level, risk_description) =
        analyzer::assess_risk(&task.task_name, &task.due_date, &task.owner);
    let progress_estimate = analyzer::estimate_progress(&task.task_name);

    EnhancedTask {
        task_name: task.task_name.clone(),
        owner: mapped_owner,
        due_date: prediction.display,
        priority: priority.priority,
        confidence_score: priority.confidence,
        difficulty,
        category,
        predicted_deadline: prediction.predicted,
        has_dependency,
        dependency_info,
        risk_level,
        risk_description,
        progress_estimate,
    }
}

/// Validate, enrich, and persist one note's extracted tasks.
///
/// Rejected and duplicate tasks are dropped silently; the batch insert is
/// a single storage transaction, so `failed` is only non-zero when the
/// write itself fails.
pub fn enrich_and_store(
    store: &TaskStore,
    raw_tasks: Vec<RawTask>,
    note_id: &str,
    today: NaiveDate,
) -> PipelineOutcome {
    let extracted = raw_tasks.len();
    let validated = validator::validate_and_filter(raw_tasks);

    let tasks: Vec<EnhancedTask> = validated.iter().map(|t| enrich_task(t, today)).collect();

    let (stored, failed) = store.create_batch(&tasks, note_id);

    info!(
        note_id,
        extracted,
        validated = validated.len(),
        stored,
        failed,
        "pipeline complete"
    );

    PipelineOutcome { tasks, stored, failed }
}
