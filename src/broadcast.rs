use crate::protocol::ServerMessage;
use crate::state::{AppState, ConnectionId};

/// Deliver `msg` to every connection registered at call start, except
/// `exclude`. Send failures are never surfaced to the caller: a failed
/// connection's writer is gone, so the session is removed after the pass and
/// its departure announced. That announcement may itself hit further dead
/// connections, hence the loop.
pub async fn broadcast(state: &AppState, msg: &ServerMessage, exclude: Option<ConnectionId>) {
    let mut failed = send_to_registered(state, msg, exclude).await;

    while let Some(conn) = failed.pop() {
        if let Some(session) = state.unregister(conn).await {
            tracing::info!(username = %session.username, "user left the chat room");
            let left = ServerMessage::UserLeft {
                username: session.username,
                online_users: state.snapshot().await,
            };
            failed.extend(send_to_registered(state, &left, None).await);
        }
    }
}

/// One fan-out pass over a registry snapshot. Returns the connections whose
/// outbound queue was already closed.
async fn send_to_registered(
    state: &AppState,
    msg: &ServerMessage,
    exclude: Option<ConnectionId>,
) -> Vec<ConnectionId> {
    let targets = state.connections().await;
    if targets.is_empty() {
        return Vec::new();
    }

    // Serialize once for the whole pass
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize outbound message");
            return Vec::new();
        }
    };

    let mut failed = Vec::new();
    for (conn, sender) in targets {
        if Some(conn) == exclude {
            continue;
        }
        if sender.send(json.clone()).is_err() {
            failed.push(conn);
        }
    }
    failed
}
