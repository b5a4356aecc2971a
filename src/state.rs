use crate::protocol::OnlineUser;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use ulid::Ulid;

/// Identifies one accepted WebSocket connection.
pub type ConnectionId = Ulid;

/// Outbound queue handle for one connection. Frames are serialized once and
/// pushed here; the connection's writer task drains them into the socket.
pub type OutboundSender = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq)]
pub enum LoginError {
    #[error("username already exists")]
    DuplicateUsername,
}

/// A logged-in connection. Exists in the registry exactly between a
/// successful login and the matching disconnect.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    sender: OutboundSender,
}

/// Shared application state: the connection registry. Single source of truth
/// for who is online.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<ConnectionId, Session>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a session for `conn`. The username must already be trimmed.
    /// Uniqueness check and insert happen under one write lock, so two
    /// racing logins with the same name cannot both succeed.
    pub async fn register(
        &self,
        conn: ConnectionId,
        username: String,
        sender: OutboundSender,
    ) -> Result<(), LoginError> {
        let mut sessions = self.sessions.write().await;
        if sessions.values().any(|s| s.username == username) {
            return Err(LoginError::DuplicateUsername);
        }
        sessions.insert(conn, Session { username, sender });
        Ok(())
    }

    /// Remove and return the session for `conn`, if any. Idempotent: racing
    /// cleanup paths see `None` on the second call.
    pub async fn unregister(&self, conn: ConnectionId) -> Option<Session> {
        self.sessions.write().await.remove(&conn)
    }

    /// Point-in-time presence list, safe to hold across later mutations.
    pub async fn snapshot(&self) -> Vec<OnlineUser> {
        self.sessions
            .read()
            .await
            .values()
            .map(|s| OnlineUser {
                username: s.username.clone(),
            })
            .collect()
    }

    pub async fn contains(&self, username: &str) -> bool {
        self.sessions
            .read()
            .await
            .values()
            .any(|s| s.username == username)
    }

    pub async fn username_of(&self, conn: ConnectionId) -> Option<String> {
        self.sessions
            .read()
            .await
            .get(&conn)
            .map(|s| s.username.clone())
    }

    /// Sender snapshot for a fan-out pass. Cloned handles stay valid while
    /// the registry is mutated underneath.
    pub async fn connections(&self) -> Vec<(ConnectionId, OutboundSender)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (*id, s.sender.clone()))
            .collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
