//! Outbound response framing.
//!
//! # Responsibilities
//! - Render the origin response into the exact bytes written to the peer
//! - Recompute Content-Length from the buffered body
//! - Keep the persistent relay connection alive
//!
//! # Design Decisions
//! - Bodies are always fully buffered; the relay never writes chunked frames
//! - Hop-by-hop headers from the origin are dropped; the relay owns the
//!   framing of its own connection
//! - The origin's Content-Length is replaced by the buffered body length,
//!   which is the only value guaranteed to match the bytes that follow

/// One origin response, fully buffered.
///
/// Headers keep the origin's order with duplicates preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Response headers never forwarded back to the peer. They describe the
/// origin connection's framing, not the message.
const DROPPED_RESPONSE_HEADERS: [&str; 4] = [
    "connection",
    "keep-alive",
    "transfer-encoding",
    "content-length",
];

/// Render a response into relay wire bytes: status line, filtered headers,
/// recomputed `Content-Length`, `Connection: keep-alive`, blank line, body.
pub fn serialize_response(response: &ParsedResponse) -> Vec<u8> {
    let mut wire = Vec::with_capacity(response.body.len() + 256);
    wire.extend_from_slice(
        format!(
            "HTTP/1.1 {} {}\r\n",
            response.status,
            reason_phrase(response.status)
        )
        .as_bytes(),
    );
    for (name, value) in &response.headers {
        if DROPPED_RESPONSE_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
        {
            continue;
        }
        wire.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
    }
    wire.extend_from_slice(format!("Content-Length: {}\r\n", response.body.len()).as_bytes());
    wire.extend_from_slice(b"Connection: keep-alive\r\n\r\n");
    wire.extend_from_slice(&response.body);
    wire
}

/// Render the synthesized 502 written when a single relayed request fails.
/// The connection stays open, so the framing must be as strict as for a
/// forwarded response.
pub fn error_response(message: &str) -> Vec<u8> {
    let body = format!("Error: {message}");
    let mut wire = Vec::with_capacity(body.len() + 128);
    wire.extend_from_slice(b"HTTP/1.1 502 Bad Gateway\r\n");
    wire.extend_from_slice(b"Content-Type: text/plain\r\n");
    wire.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    wire.extend_from_slice(b"Connection: keep-alive\r\n\r\n");
    wire.extend_from_slice(body.as_bytes());
    wire
}

/// Reason phrase for the status line, from a fixed table of common codes.
fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
