use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

/// Root status — service banner plus a task count.
pub async fn root_status(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": "Minuted",
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "Priority Intelligence",
            "Owner Mapping",
            "Deadline Prediction",
            "Difficulty Estimation",
            "Category Classification",
            "Dependency Detection",
            "Risk Assessment",
            "Progress Estimation",
            "Meeting Summaries",
            "Task Timeline",
        ],
        "storage": "JSON",
        "tasks_stored": ctx.store.count(),
        "endpoints": {
            "process": "/api/v1/notes",
            "ingest": "/api/v1/ingest",
            "tasks": "/api/v1/tasks",
        },
    }))
}

/// Detailed health check, analytics included.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let uptime = ctx.started_at.elapsed().as_secs();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": uptime,
        "environment": ctx.config.environment,
        "model_configured": ctx.config.model.api_key.is_some(),
        "storage_file": ctx.config.storage_file.display().to_string(),
        "tasks_count": ctx.store.count(),
        "analytics": ctx.store.analytics(),
    }))
}
