use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages clients send to the server. Anything that doesn't parse into one
/// of these variants is rejected at the dispatch boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Login {
        username: String,
    },
    Message {
        content: String,
        /// Opaque client clock value, passed back unchanged in outbound frames
        #[serde(default)]
        timestamp: Option<Value>,
    },
}

/// Messages the server sends to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    LoginSuccess {
        online_users: Vec<OnlineUser>,
    },
    LoginFailed {
        reason: String,
    },
    UserJoined {
        username: String,
        online_users: Vec<OnlineUser>,
    },
    UserLeft {
        username: String,
        online_users: Vec<OnlineUser>,
    },
    Message {
        from: String,
        content: String,
        timestamp: Option<Value>,
    },
    /// Private reply from the assistant persona, sent only to the asker
    AiReply {
        from: String,
        content: String,
        timestamp: Option<Value>,
    },
    /// Broadcast when a client requests a movie via the @电影 command
    MovieRequest {
        from: String,
        movie_url: String,
        parsed_url: String,
        timestamp: Option<Value>,
    },
}

/// One entry in a presence snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnlineUser {
    pub username: String,
}
