// rest/mod.rs — Public REST API server.
//
// Axum HTTP server, local only by default. Exposes the note pipeline and
// the task store.
//
// Endpoints:
//   GET    /                            (no auth)
//   GET    /api/v1/health               (no auth)
//   POST   /api/v1/notes
//   POST   /api/v1/ingest
//   GET    /api/v1/tasks
//   DELETE /api/v1/tasks
//   DELETE /api/v1/tasks/{id}
//   GET    /api/v1/notes/{note_id}/tasks
//   GET    /api/v1/analytics
//   GET    /api/v1/timeline

pub mod auth;
pub mod routes;

use anyhow::Result;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let guarded = Router::new()
        // Notes → pipeline
        .route("/api/v1/notes", post(routes::notes::process_note))
        .route("/api/v1/ingest", post(routes::notes::ingest_note))
        // Tasks
        .route(
            "/api/v1/tasks",
            get(routes::tasks::list_tasks).delete(routes::tasks::clear_tasks),
        )
        .route("/api/v1/tasks/{id}", delete(routes::tasks::delete_task))
        .route(
            "/api/v1/notes/{note_id}/tasks",
            get(routes::tasks::tasks_for_note),
        )
        // Derived views
        .route("/api/v1/analytics", get(routes::analytics::get_analytics))
        .route("/api/v1/timeline", get(routes::analytics::get_timeline))
        .route_layer(middleware::from_fn_with_state(
            ctx.clone(),
            auth::require_bearer,
        ));

    Router::new()
        // Health + status (no auth)
        .route("/", get(routes::health::root_status))
        .route("/api/v1/health", get(routes::health::health))
        .merge(guarded)
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
