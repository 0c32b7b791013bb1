// rest/routes/analytics.rs — Derived-view REST routes.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppContext;

/// Full analytics aggregation over the task store.
pub async fn get_analytics(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "analytics": ctx.store.analytics(),
    }))
}

/// Deadline-sorted timeline of tasks with a predicted date.
pub async fn get_timeline(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let timeline = ctx.store.timeline();
    Json(json!({
        "status": "success",
        "timeline": timeline.timeline,
        "total_tasks": timeline.total_tasks,
    }))
}
