use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};

use crate::{core::Subscription, error::GameResult, state::AppState};

/// WebSocket endpoint for real-time game updates
///
/// # Flow
///
/// 1. Subscribe to the game (404 if it does not exist)
/// 2. Accept WebSocket connection
/// 3. Forward every state, starting with the current one
/// 4. Close once the game is over or the client disconnects
pub async fn websocket_handler(
    Path(game_id): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> GameResult<impl IntoResponse> {
    tracing::debug!("WebSocket connection attempt: game={}", game_id);

    // Subscribe before upgrading so the client gets a proper 404
    let subscription = state.engine.subscribe(&game_id).await?;

    tracing::info!("WebSocket accepted: game={}", game_id);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, subscription)))
}

/// Wrap a state for the wire
pub fn state_message(state: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": "state_update",
        "data": state
    })
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, mut subscription: Subscription) {
    let game_id = subscription.game_id().to_string();
    let (mut sender, mut receiver) = socket.split();

    // Forward game states until the subscription ends
    let mut send_task = tokio::spawn(async move {
        while let Some(snapshot) = subscription.next().await {
            let message = state_message(snapshot.public_view());
            let Ok(text) = serde_json::to_string(&message) else {
                continue;
            };
            if sender.send(Message::Text(text)).await.is_err() {
                tracing::debug!("Client went away from game={}", subscription.game_id());
                return;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    // Clients only talk to us to close the socket
    let game_id_clone = game_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    tracing::debug!("Close message for game={}", game_id_clone);
                    break;
                }
                Message::Text(text) if text.len() > 1024 => {
                    tracing::warn!(
                        "Message too large for game={}: {} bytes",
                        game_id_clone,
                        text.len()
                    );
                    break;
                }
                // Axum handles WebSocket ping/pong frames automatically
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed: game={}", game_id);
}
