// Domain contract for reaching the remote solver
// The session driver only depends on this trait, never on the HTTP client

use async_trait::async_trait;

use super::value_objects::{AppName, Command};

/// Text the legacy client printed in place of any failed response
pub const FAILURE_SENTINEL: &str = "Failed to connect to server";

/// Error types for a single request/response exchange
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to connect to server: {0}")]
    Network(String),

    #[error("Failed to connect to server: request timed out")]
    Timeout,

    #[error("server responded with status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("invalid server address '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl TransportError {
    /// Legacy failure text, for output that must match the old client
    pub fn sentinel(&self) -> &'static str {
        FAILURE_SENTINEL
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Request/response primitive every session step is built from
///
/// Implementations are bound to one server; `send` targets the command
/// endpoint, the other two read plain GET resources from the same host.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one command for `app` and return the response body
    async fn send(&self, app: &AppName, command: &Command) -> Result<String>;

    /// Public address of this client as seen by the server
    async fn client_address(&self) -> Result<String>;

    /// Solution file stored under `<ip>_<app>` on the server
    async fn fetch_solution(&self, ip: &str, app: &AppName) -> Result<String>;
}
