//! Inbound message dispatch.
//!
//! Every parsed client message lands here. Logins go through the session
//! lifecycle; chat messages from logged-in senders go through the command
//! router, which picks exactly one of {direct reply, broadcast}. Nothing in
//! this module returns an error to the connection task; every failure mode
//! is absorbed at its boundary.

use serde_json::Value;
use std::sync::Arc;

use crate::assistant::{self, ASSISTANT_NAME};
use crate::broadcast::broadcast;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::{AppState, ConnectionId, OutboundSender};

/// Prefix selecting the assistant command path.
pub const ASSISTANT_TRIGGER: &str = "@川小农";

/// Prefix selecting the movie command path.
pub const MOVIE_TRIGGER: &str = "@电影";

const MOVIE_PARSER_URL: &str = "https://jx.m3u8.tv/jiexi/?url=";

/// Handle one parsed client message.
pub async fn handle_message(
    state: &Arc<AppState>,
    conn: ConnectionId,
    reply: &OutboundSender,
    msg: ClientMessage,
) {
    match msg {
        ClientMessage::Login { username } => {
            login(state, conn, reply, &username).await;
        }
        ClientMessage::Message { content, timestamp } => {
            // A message before login has no sender identity; drop it
            let Some(from) = state.username_of(conn).await else {
                tracing::debug!(%conn, "dropping message from connection without session");
                return;
            };
            route_message(state, reply, from, content.trim(), timestamp).await;
        }
    }
}

/// Session login: trim, enforce uniqueness, confirm to the requester, then
/// announce to everyone else.
async fn login(state: &Arc<AppState>, conn: ConnectionId, reply: &OutboundSender, username: &str) {
    let username = username.trim().to_string();

    if let Err(e) = state.register(conn, username.clone(), reply.clone()).await {
        tracing::info!(%conn, %username, "login rejected: {e}");
        send_direct(
            reply,
            &ServerMessage::LoginFailed {
                reason: e.to_string(),
            },
        );
        return;
    }

    tracing::info!(%username, "user joined the chat room");
    send_direct(
        reply,
        &ServerMessage::LoginSuccess {
            online_users: state.snapshot().await,
        },
    );
    let joined = ServerMessage::UserJoined {
        username,
        online_users: state.snapshot().await,
    };
    broadcast(state, &joined, Some(conn)).await;
}

/// Remove the session for `conn`, if any, and announce the departure.
/// Safe to call from racing cleanup paths; only the first call broadcasts.
pub async fn disconnect(state: &Arc<AppState>, conn: ConnectionId) {
    if let Some(session) = state.unregister(conn).await {
        tracing::info!(username = %session.username, "user left the chat room");
        let left = ServerMessage::UserLeft {
            username: session.username,
            online_users: state.snapshot().await,
        };
        broadcast(state, &left, None).await;
    }
}

/// Command router: first-match-wins over the trigger prefixes, falling back
/// to plain relay.
async fn route_message(
    state: &Arc<AppState>,
    reply: &OutboundSender,
    from: String,
    content: &str,
    timestamp: Option<Value>,
) {
    if let Some(rest) = content.strip_prefix(ASSISTANT_TRIGGER) {
        // Assistant replies are private; they are never broadcast
        let answer = assistant::respond(rest.trim());
        send_direct(
            reply,
            &ServerMessage::AiReply {
                from: ASSISTANT_NAME.to_string(),
                content: answer,
                timestamp,
            },
        );
        return;
    }

    if let Some(rest) = content.strip_prefix(MOVIE_TRIGGER) {
        // A bare trigger with nothing after it is ordinary chat, not a command
        if !rest.is_empty() {
            let movie_url = rest.trim().to_string();
            let request = ServerMessage::MovieRequest {
                from,
                parsed_url: format!("{MOVIE_PARSER_URL}{movie_url}"),
                movie_url,
                timestamp,
            };
            broadcast(state, &request, None).await;
            return;
        }
    }

    let message = ServerMessage::Message {
        from,
        content: content.to_string(),
        timestamp,
    };
    broadcast(state, &message, None).await;
}

/// Queue a frame for a single connection. A closed queue means the writer is
/// already gone; the connection task's own teardown will clean up.
fn send_direct(reply: &OutboundSender, msg: &ServerMessage) {
    match serde_json::to_string(msg) {
        Ok(json) => {
            let _ = reply.send(json);
        }
        Err(e) => tracing::error!(error = %e, "failed to serialize direct reply"),
    }
}
