//! Error taxonomy for the relay connection.
//!
//! # Design Decisions
//! - Framing failures are fatal to the connection: once a request fails to
//!   parse, the byte boundaries of the stream are unknown and the relay does
//!   not attempt to resynchronize
//! - Upstream failures are request-scoped: the peer receives a synthesized
//!   502 and the connection survives
//! - Peer write failures are fatal: the relay socket itself is broken

use thiserror::Error;

/// Errors that can occur while servicing the relay connection.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound byte stream does not parse as a well-formed request.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The outbound call to the target origin failed.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// Writing to the relay connection failed.
    #[error("peer write failed: {0}")]
    PeerWrite(std::io::Error),
}

impl RelayError {
    /// Whether the relay connection can keep serving requests after this
    /// error. Only upstream failures are recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RelayError::Upstream(_))
    }
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
