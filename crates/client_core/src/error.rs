use thiserror::Error;

/// Errors surfaced by backend round-trips.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status. `message` carries the
    /// server's `error` field verbatim, or the generic fallback when the
    /// body did not parse as a failure shape.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Connect, DNS, timeout, or body-decode failure below the protocol.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_server_rejection(&self) -> bool {
        matches!(self, ClientError::Server { .. })
    }
}
