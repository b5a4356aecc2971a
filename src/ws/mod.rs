pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use ulid::Ulid;

use crate::protocol::ClientMessage;
use crate::state::{AppState, ConnectionId};

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one client connection: a writer task drains the outbound queue into
/// the sink while this task reads inbound frames. Whichever side ends first
/// tears the connection down, and teardown always runs disconnect once.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn: ConnectionId = Ulid::new();
    tracing::debug!(%conn, "websocket connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut write_task = tokio::spawn(async move {
        while let Some(json) = rx.recv().await {
            if sink.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            // Writer gone means the peer is unreachable; stop reading too
            _ = &mut write_task => break,

            ws_msg = stream.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => handlers::handle_message(&state, conn, &tx, msg).await,
                            Err(e) => {
                                // Malformed payloads are dropped, the connection stays open
                                tracing::warn!(%conn, error = %e, "failed to parse inbound payload");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%conn, error = %e, "websocket error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    write_task.abort();
    handlers::disconnect(&state, conn).await;
    tracing::debug!(%conn, "websocket closed");
}
