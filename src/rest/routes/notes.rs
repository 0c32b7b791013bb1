// rest/routes/notes.rs — Note ingestion routes, the front door of the pipeline.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::intelligence::{self, deadline, PipelineOutcome};
use crate::tasks::{markdown, MeetingSummary};
use crate::AppContext;

#[derive(Deserialize)]
pub struct ProcessNoteRequest {
    /// Free-text meeting note.
    pub text: String,
    /// Client-supplied note id; generated when absent.
    pub note_id: Option<String>,
    /// ISO 8601 reference timestamp for relative deadlines.
    pub timestamp: Option<String>,
}

/// Extraction + enrichment + storage for one note.
///
/// Extraction failures degrade to an empty task list — a broken model
/// call must never fail the request.
async fn run_pipeline(ctx: &AppContext, body: &ProcessNoteRequest) -> (String, PipelineOutcome) {
    let note_id = body
        .note_id
        .clone()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let today = deadline::parse_reference(body.timestamp.as_deref().unwrap_or(""));

    info!(note_id, chars = body.text.len(), "processing meeting note");

    let raw_tasks = match ctx.extractor.extract_tasks(&body.text).await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!(err = %e, note_id, "task extraction failed — continuing with no tasks");
            Vec::new()
        }
    };

    let outcome = intelligence::enrich_and_store(&ctx.store, raw_tasks, &note_id, today);
    (note_id, outcome)
}

fn created_message(stored: usize, suffix: &str) -> String {
    let plural = if stored == 1 { "" } else { "s" };
    format!("{stored} task{plural} created successfully{suffix}")
}

/// Full pipeline endpoint: detailed response with summary, preview, and
/// analytics highlights.
pub async fn process_note(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ProcessNoteRequest>,
) -> Json<Value> {
    let (_note_id, outcome) = run_pipeline(&ctx, &body).await;

    if outcome.tasks.is_empty() {
        return Json(json!({
            "status": "success",
            "message": "No actionable tasks found in the meeting note",
            "tasks_created": 0,
        }));
    }

    let summary = match ctx.extractor.summarize(&body.text).await {
        Ok(s) => s,
        Err(e) => {
            warn!(err = %e, "summary generation failed — using placeholder");
            MeetingSummary::unavailable()
        }
    };

    let preview = markdown::tasks_preview(&outcome.tasks);
    let analytics = ctx.store.analytics();

    Json(json!({
        "status": "success",
        "message": created_message(outcome.stored, " with advanced analysis"),
        "tasks_created": outcome.stored,
        "summary": {
            "meeting_summary": summary.summary,
            "key_decisions": summary.key_decisions,
            "blockers": summary.blockers,
            "risks": summary.risks,
            "participants": summary.participants,
            "tasks_preview": preview,
            "high_priority_count": analytics.by_priority.get("High").copied().unwrap_or(0),
            "high_risk_count": analytics.high_risk_count,
            "dependencies_count": analytics.with_dependencies,
        },
    }))
}

/// Minimal ingestion endpoint for machine callers — same pipeline, bare
/// acknowledgement payload.
pub async fn ingest_note(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ProcessNoteRequest>,
) -> Json<Value> {
    let (note_id, outcome) = run_pipeline(&ctx, &body).await;

    if outcome.tasks.is_empty() {
        return Json(json!({
            "status": "success",
            "message": "No actionable tasks found in the meeting note",
        }));
    }

    info!(note_id, stored = outcome.stored, "ingest complete");

    Json(json!({
        "status": "success",
        "message": created_message(outcome.stored, ""),
    }))
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_message_handles_plurals() {
        assert_eq!(created_message(1, ""), "1 task created successfully");
        assert_eq!(
            created_message(3, " with advanced analysis"),
            "3 tasks created successfully with advanced analysis"
        );
        assert_eq!(created_message(0, ""), "0 tasks created successfully");
    }
}
