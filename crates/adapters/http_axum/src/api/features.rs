//! JSON REST handlers for features.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};
use pumpkinpi_app::services::feature_service::FeatureUpdate;
use pumpkinpi_domain::feature::Feature;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for updating a feature.
///
/// `brightness` is accepted as a JSON string or number and validated by the
/// service, so `"40"`, `40` and `"auto-toggle"` are all valid.
#[derive(Deserialize)]
pub struct UpdateFeatureRequest {
    pub enabled: Option<bool>,
    pub brightness: Option<serde_json::Value>,
}

impl From<UpdateFeatureRequest> for FeatureUpdate {
    fn from(request: UpdateFeatureRequest) -> Self {
        Self {
            enabled: request.enabled,
            brightness: request.brightness.map(|value| match value {
                serde_json::Value::String(raw) => raw,
                other => other.to_string(),
            }),
        }
    }
}

/// `GET /api/features`
pub async fn list<P, E, R, L>(State(state): State<AppState<P, E, R, L>>) -> Json<Vec<Feature>>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Json(state.features.list_features())
}

/// `GET /api/features/{id}`
pub async fn get<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
) -> Result<Json<Feature>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Ok(Json(state.features.get_feature(&id)?))
}

/// `PUT /api/features/{id}`
pub async fn update<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateFeatureRequest>,
) -> Result<Json<Feature>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let feature = state.features.update(&id, body.into()).await?;
    Ok(Json(feature))
}
