use std::time::Duration;

/// How a failure is treated by the catalog and shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network, timeout, server or payload failure. Surfaced with a retry.
    Transport,
    /// The remote source reports no such resource.
    NotFound,
    /// Aborted by the caller. Never surfaced.
    Cancelled,
}

/// Errors from the PokéAPI gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// No response within the configured deadline.
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// The remote source answered with a client error (404 and friends).
    #[error("{resource} not found (status {status})")]
    NotFound { resource: String, status: u16 },

    /// The remote source answered with a server error.
    #[error("PokéAPI error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The payload did not match the endpoint schema.
    #[error("Unexpected payload for {resource}: {reason}")]
    Decode { resource: String, reason: String },

    /// The gateway was configured with an unusable base URL.
    #[error("Invalid gateway configuration: {0}")]
    Config(String),

    /// The caller's cancellation signal fired first.
    #[error("Request cancelled")]
    Cancelled,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Request(_)
            | Self::Timeout { .. }
            | Self::Api { .. }
            | Self::Decode { .. }
            | Self::Config(_) => ErrorKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}
