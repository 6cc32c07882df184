//! JSON REST handlers for LEDs.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};
use pumpkinpi_domain::led::Led;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for switching an LED.
///
/// `status` is `"on"` in any case to switch on; any other string switches off.
#[derive(Deserialize)]
pub struct UpdateLedRequest {
    pub status: String,
}

/// `GET /api/leds`
pub async fn list<P, E, R, L>(State(state): State<AppState<P, E, R, L>>) -> Json<Vec<Led>>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Json(state.leds.list_leds())
}

/// `GET /api/leds/{id}`
pub async fn get<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
) -> Result<Json<Led>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Ok(Json(state.leds.get_led(&id)?))
}

/// `PUT /api/leds/{id}`
pub async fn update<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateLedRequest>,
) -> Result<Json<Led>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let led = state.leds.set_status(&id, &body.status).await?;
    Ok(Json(led))
}
