//! Server-Sent Events (SSE) stream for live state updates.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use pumpkinpi_app::ports::{CommandRunner, EventPublisher, FileSystem, OutputPin};
use pumpkinpi_domain::event::Event as StateEvent;

use crate::state::AppState;

/// `GET /api/events/stream` — one SSE frame per published state change.
///
/// The frame's event name is the topic (`led-update`, `feature-update`,
/// `photo-update`) and its data is the canonical entity as JSON. An
/// observer that falls behind skips the missed events.
pub async fn stream<P, E, R, L>(
    State(state): State<AppState<P, E, R, L>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>
where
    P: OutputPin + 'static,
    E: EventPublisher + Send + Sync + 'static,
    R: CommandRunner + 'static,
    L: FileSystem + 'static,
{
    let event_rx = state.event_bus.subscribe();
    let event_stream = BroadcastStream::new(event_rx).filter_map(|result| match result {
        Ok(event) => to_frame(&event).map(Ok),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE observer lagged, some events were dropped");
            None
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}

fn to_frame(event: &StateEvent) -> Option<Event> {
    match event.change.payload_json() {
        Ok(json) => Some(
            Event::default()
                .event(event.topic().as_str())
                .id(event.id.to_string())
                .data(json),
        ),
        Err(err) => {
            tracing::warn!(%err, topic = %event.topic(), "failed to encode event for SSE");
            None
        }
    }
}
