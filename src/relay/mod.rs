//! Relay loop: the per-connection state machine.
//!
//! # Data Flow
//! ```text
//! WaitingForRequest
//!     → wire reader (one request off the peer socket)
//!     → translate (hop-by-hop filtering, method semantics)
//!     → upstream client (fresh outbound call, buffered response)
//!     → serializer (relay wire bytes)
//!     → peer write
//!     → WaitingForRequest
//! ```
//!
//! # Design Decisions
//! - The loop is an explicit state enum with one transition function, so the
//!   "one failed request must not kill the connection" rule is testable in
//!   isolation against in-memory streams
//! - Strictly sequential: the next request is never read before the previous
//!   response (or error response) has been fully written
//! - A framing failure closes the connection; byte boundaries are unknown
//!   after a parse error and the relay does not resynchronize

pub mod translate;
pub mod upstream;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{RelayError, RelayResult};
use crate::wire::{self, ParsedRequest, ParsedResponse, WireReader};

use self::translate::translate;
use self::upstream::UpstreamClient;

/// States of one relay connection.
#[derive(Debug)]
pub enum RelayState {
    /// Blocked on the peer's next request. May block indefinitely; the peer
    /// is long-lived.
    WaitingForRequest,
    /// A parsed request is being relayed to its origin.
    Forwarding(ParsedRequest),
    /// A request-scoped failure is being reported to the peer as a 502.
    SendingErrorResponse(String),
    /// The connection is finished; both sockets can be released.
    Closed,
}

/// Sequential relay loop over one peer connection.
///
/// Generic over the stream halves so the whole machine runs against
/// in-memory byte streams in tests. Each accepted connection gets its own
/// loop and its own [`UpstreamClient`]; nothing is shared.
pub struct RelayLoop<R, W> {
    reader: WireReader<R>,
    writer: W,
    upstream: UpstreamClient,
}

impl<R, W> RelayLoop<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, upstream: UpstreamClient) -> Self {
        Self {
            reader: WireReader::new(reader),
            writer,
            upstream,
        }
    }

    /// Drive the state machine until the connection closes.
    pub async fn run(&mut self) {
        let mut state = RelayState::WaitingForRequest;
        loop {
            state = self.step(state).await;
            if matches!(state, RelayState::Closed) {
                break;
            }
        }
    }

    /// Perform one state transition.
    pub async fn step(&mut self, state: RelayState) -> RelayState {
        match state {
            RelayState::WaitingForRequest => self.wait_for_request().await,
            RelayState::Forwarding(request) => self.forward(request).await,
            RelayState::SendingErrorResponse(message) => self.send_error(&message).await,
            RelayState::Closed => RelayState::Closed,
        }
    }

    async fn wait_for_request(&mut self) -> RelayState {
        match self.reader.read_request().await {
            Ok(Some(request)) => {
                tracing::info!(
                    method = %request.method,
                    target = %request.target_url,
                    header_count = request.headers.len(),
                    body_bytes = request.body.len(),
                    "request received"
                );
                RelayState::Forwarding(request)
            }
            Ok(None) => {
                tracing::info!("peer closed the relay connection");
                RelayState::Closed
            }
            Err(e) => {
                tracing::error!(error = %e, "closing connection");
                RelayState::Closed
            }
        }
    }

    async fn forward(&mut self, request: ParsedRequest) -> RelayState {
        let response = match self.relay_one(&request).await {
            Ok(response) => response,
            Err(e) => return RelayState::SendingErrorResponse(e.to_string()),
        };

        let wire_bytes = wire::serialize_response(&response);
        match self.write_peer(&wire_bytes).await {
            Ok(()) => {
                tracing::debug!(
                    status = response.status,
                    wire_bytes = wire_bytes.len(),
                    "response relayed"
                );
                RelayState::WaitingForRequest
            }
            Err(e) => {
                tracing::error!(error = %e, "peer write failed");
                RelayState::Closed
            }
        }
    }

    async fn relay_one(&self, request: &ParsedRequest) -> RelayResult<ParsedResponse> {
        let outbound = translate(request)?;
        tracing::debug!(method = %outbound.method, url = %outbound.url, "forwarding to origin");
        self.upstream.execute(outbound).await
    }

    async fn send_error(&mut self, message: &str) -> RelayState {
        tracing::warn!(error = %message, "relaying failed, sending 502 to peer");
        match self.write_peer(&wire::error_response(message)).await {
            Ok(()) => RelayState::WaitingForRequest,
            Err(e) => {
                tracing::error!(error = %e, "failed to send error response");
                RelayState::Closed
            }
        }
    }

    async fn write_peer(&mut self, bytes: &[u8]) -> RelayResult<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(RelayError::PeerWrite)?;
        self.writer.flush().await.map_err(RelayError::PeerWrite)
    }
}
