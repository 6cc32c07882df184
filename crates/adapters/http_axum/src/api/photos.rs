//! JSON REST handlers for photos and photo capture.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};
use pumpkinpi_domain::error::PumpkinError;
use pumpkinpi_domain::photo::{Photo, SortOrder};

use crate::error::ApiError;
use crate::state::AppState;

/// Id that resolves to the most recently captured photo.
const LATEST: &str = "latest";

/// Query string for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// Optional body of the capture endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct CaptureRequest {
    #[serde(default)]
    pub silent: bool,
}

/// Possible responses from the capture endpoint.
pub enum CaptureResponse {
    Created(Json<Photo>),
}

impl IntoResponse for CaptureResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/photos?sortOrder=asc|desc`
pub async fn list<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Photo>>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let order = query
        .sort_order
        .as_deref()
        .map(SortOrder::from_str)
        .transpose()
        .map_err(PumpkinError::from)?;
    Ok(Json(state.photos.list_photos(order).await?))
}

/// `GET /api/photos/{id}`; `latest` returns the newest photo.
pub async fn get<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    Path(id): Path<String>,
) -> Result<Json<Photo>, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let photo = if id == LATEST {
        state.photos.latest_photo().await?
    } else {
        state.photos.get_photo(&id).await?
    };
    Ok(Json(photo))
}

/// `POST /api/photos` — capture a new photo.
///
/// The body is optional: an empty body captures with the notification sound
/// and LED pulse.
pub async fn capture<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
    body: Bytes,
) -> Result<CaptureResponse, ApiError>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let request = parse_capture_request(&body)?;
    let photo = state.photos.capture(request.silent).await?;
    Ok(CaptureResponse::Created(Json(photo)))
}

fn parse_capture_request(body: &[u8]) -> Result<CaptureRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CaptureRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::BadRequest(format!("invalid capture request: {err}")))
}
