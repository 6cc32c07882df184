//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod features;
#[allow(clippy::missing_errors_doc)]
pub mod leds;
#[allow(clippy::missing_errors_doc)]
pub mod photos;
#[allow(clippy::missing_errors_doc)]
pub mod sounds;
pub mod sse;

use axum::Router;
use axum::routing::get;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<P, E, R, L>() -> Router<AppState<P, E, R, L>>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    Router::new()
        // LEDs
        .route("/leds", get(leds::list::<P, E, R, L>))
        .route(
            "/leds/{id}",
            get(leds::get::<P, E, R, L>).put(leds::update::<P, E, R, L>),
        )
        // Features
        .route("/features", get(features::list::<P, E, R, L>))
        .route(
            "/features/{id}",
            get(features::get::<P, E, R, L>).put(features::update::<P, E, R, L>),
        )
        // Sounds
        .route("/sounds", get(sounds::list::<P, E, R, L>))
        .route(
            "/sounds/{id}",
            get(sounds::get::<P, E, R, L>).put(sounds::play::<P, E, R, L>),
        )
        // Photos
        .route(
            "/photos",
            get(photos::list::<P, E, R, L>).post(photos::capture::<P, E, R, L>),
        )
        .route("/photos/{id}", get(photos::get::<P, E, R, L>))
        // Live updates
        .route("/events/stream", get(sse::stream::<P, E, R, L>))
}
