//! JSON REST handlers for sounds.

use axum::Json;
use axum::extract::{Path, State};

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};
use pumpkinpi_domain::sound::Sound;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/sounds`
pub async fn list<P, E, R, L>(State(state): State<AppState<P, E, R, L>>) -> Json<Vec<Sound>>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Json(state.sounds.list_sounds())
}

/// `GET /api/sounds/{id}`
pub async fn get<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
) -> Result<Json<Sound>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Ok(Json(state.sounds.get_sound(&id)?))
}

/// `PUT /api/sounds/{id}` — start playback and return the sound.
pub async fn play<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
) -> Result<Json<Sound>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Ok(Json(state.sounds.play(&id)?))
}
