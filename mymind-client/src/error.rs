//! Error types for mymind-client.

use thiserror::Error;

use mymind_core::Role;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, DNS, broken body stream.
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },

    /// Non-2xx response. `message` is the server's `message`/`error` field
    /// when present, otherwise the raw body or the status line.
    #[error("server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// No stored account id for the acting role; nothing was sent.
    #[error("not logged in as {role}; run `mymind {role} login` first")]
    NotAuthenticated { role: Role },

    /// 2xx response whose body was not the expected JSON.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// 2xx response that decoded but is missing something we rely on.
    #[error("unexpected response from {url}: {detail}")]
    UnexpectedBody { url: String, detail: String },

    /// The stored child id is not numeric but the endpoint needs a number.
    #[error("account id '{id}' is not numeric")]
    InvalidUserId { id: String },
}

impl ApiError {
    /// `true` for failures where retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network { .. } => true,
            ApiError::ServerRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
