use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};

use crate::{error::GameResult, state::AppState};

/// Server-Sent Events stream of a game's states
///
/// The first event is the current state; the stream ends after the game
/// completes, is cancelled or is removed.
pub async fn game_updates(
    Path(game_id): Path<String>,
    State(state): State<AppState>,
) -> GameResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let subscription = state.engine.subscribe(&game_id).await?;

    tracing::debug!("SSE subscriber attached to game {}", game_id);

    let events = subscription
        .into_stream()
        .map(|snapshot| Event::default().json_data(snapshot.public_view()));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
