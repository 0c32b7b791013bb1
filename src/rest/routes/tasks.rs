// rest/routes/tasks.rs — Task store REST routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::AppContext;

/// All stored tasks, most recent first, with analytics attached.
pub async fn list_tasks(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let tasks = ctx.store.all_tasks();
    let analytics = ctx.store.analytics();
    Json(json!({
        "status": "success",
        "count": tasks.len(),
        "tasks": tasks,
        "analytics": analytics,
    }))
}

/// Tasks extracted from one note, in insertion order.
pub async fn tasks_for_note(
    State(ctx): State<Arc<AppContext>>,
    Path(note_id): Path<String>,
) -> Json<Value> {
    let tasks = ctx.store.tasks_for_note(&note_id);
    Json(json!({
        "status": "success",
        "note_id": note_id,
        "count": tasks.len(),
        "tasks": tasks,
    }))
}

/// Delete one task by id. 404 when the id is unknown.
pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.store.delete(id) {
        Ok(true) => Ok(Json(json!({
            "status": "success",
            "message": format!("Task #{id} deleted successfully"),
        }))),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Task #{id} not found") })),
        )),
        Err(e) => {
            error!(id, err = %e, "task delete failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to delete task" })),
            ))
        }
    }
}

/// Clear every stored task.
pub async fn clear_tasks(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match ctx.store.clear() {
        Ok(()) => Ok(Json(json!({
            "status": "success",
            "message": "All tasks cleared",
        }))),
        Err(e) => {
            error!(err = %e, "task clear failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to clear tasks" })),
            ))
        }
    }
}
