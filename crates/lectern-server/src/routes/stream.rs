//! Per-lecture live stream (server-sent events).
//!
//! Frames follow standard SSE framing: an `event:` name, a `data:` JSON
//! line, and a blank line. A `connected` frame opens the stream, lecture
//! events arrive as `highlight`/`status`/`debug` frames, and a `ping` frame
//! goes out every ~15 seconds to keep long-lived connections open through
//! intermediaries. Disconnecting drops the subscription; missed events are
//! not replayed.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use futures::Stream;
use tracing::{debug, instrument};

use lectern_core::LectureId;
use lectern_events::SubscriptionError;

use crate::errors::ApiError;
use crate::state::AppState;

/// `GET /lectures/{id}/stream`
///
/// Subscribing to an unknown or stopped lecture fails immediately rather
/// than opening a stream that will never receive events.
#[instrument(skip_all, fields(lecture_id = %id))]
pub async fn stream_lecture(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let lecture_id = LectureId::from(id);
    let active = state
        .registry
        .get_session(&lecture_id)
        .await
        .is_some_and(|s| s.is_active);
    if !active {
        return Err(SubscriptionError::NotActive(lecture_id).into());
    }

    let mut subscription = state.broadcaster.subscribe(lecture_id.clone());
    let ping_interval = state.ping_interval;
    debug!(lecture_id = %lecture_id, "stream attached");

    let stream = async_stream::stream! {
        yield Ok(Event::default().event("connected").data("{}"));

        let mut ping = tokio::time::interval_at(
            tokio::time::Instant::now() + ping_interval,
            ping_interval,
        );
        loop {
            tokio::select! {
                event = subscription.recv() => {
                    match event {
                        Some(event) => {
                            let data = serde_json::to_string(&event.data)
                                .unwrap_or_else(|_| "{}".into());
                            yield Ok(Event::default().event(event.kind.sse_event()).data(data));
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    yield Ok(Event::default().event("ping").data("{}"));
                }
            }
        }
    };

    Ok(Sse::new(stream))
}
