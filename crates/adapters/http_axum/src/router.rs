//! Axum router assembly.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and serves captured photo files from
/// `photos_dir` under `/photos`. Includes a [`TraceLayer`] that logs each
/// HTTP request/response at the `DEBUG` level.
pub fn build<P, E, R, L>(state: AppState<P, E, R, L>, photos_dir: &Path) -> Router
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .nest_service("/photos", ServeDir::new(photos_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
