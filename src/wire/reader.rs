//! Inbound request framing.
//!
//! # Responsibilities
//! - Read one HTTP/1.1 request from the relay socket
//! - CRLF line framing for the request line and headers
//! - Content-Length delimited body reads (no chunked support)
//! - Distinguish clean peer closure from broken framing
//!
//! # Design Decisions
//! - Generic over `AsyncRead` so unit tests run against byte slices
//! - Header lines without a colon are skipped, not fatal; real-world peers
//!   are permissive and so is the relay
//! - A stream that ends mid-line yields the partial bytes as a final line,
//!   tolerating peers that omit a trailing terminator

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

use crate::error::{RelayError, RelayResult};

/// One request parsed off the relay socket.
///
/// Headers keep their wire order and original casing; duplicates are
/// preserved. `body` holds exactly `Content-Length` bytes, or nothing when
/// the header is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    pub method: String,
    pub target_url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ParsedRequest {
    /// Case-insensitive lookup of the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reads HTTP/1.1 requests off an async byte stream, one at a time.
///
/// The reader owns the buffering; interleaved reads through it never lose
/// bytes between requests, so pipelined requests on the same stream parse
/// back to back.
pub struct WireReader<R> {
    stream: BufReader<R>,
}

impl<R: AsyncRead + Unpin> WireReader<R> {
    pub fn new(stream: R) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Read one request off the stream.
    ///
    /// `Ok(None)` signals clean closure: the peer ended the stream before
    /// sending another request. Any framing failure is
    /// [`RelayError::MalformedRequest`] and leaves the stream unusable.
    pub async fn read_request(&mut self) -> RelayResult<Option<ParsedRequest>> {
        let request_line = match self.read_line().await? {
            Some(line) if !line.is_empty() => line,
            _ => return Ok(None),
        };

        let mut fields = request_line.splitn(3, ' ');
        let method = fields.next().unwrap_or_default().to_string();
        let target = fields.next();
        let version = fields.next();
        let (Some(target), Some(_version)) = (target, version) else {
            return Err(RelayError::MalformedRequest(format!(
                "invalid request line: {request_line}"
            )));
        };
        if method.is_empty() {
            return Err(RelayError::MalformedRequest(format!(
                "invalid request line: {request_line}"
            )));
        }
        let target_url = target.to_string();

        let mut headers: Vec<(String, String)> = Vec::new();
        loop {
            let line = match self.read_line().await? {
                Some(line) => line,
                None => {
                    return Err(RelayError::MalformedRequest(
                        "unexpected end of stream in headers".into(),
                    ))
                }
            };
            if line.is_empty() {
                break;
            }
            match line.split_once(':') {
                Some((name, value)) => {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
                None => {
                    tracing::warn!(line = %line, "skipping header line without a colon");
                }
            }
        }

        let body = match content_length(&headers)? {
            0 => Vec::new(),
            declared => {
                let mut body = vec![0u8; declared];
                self.stream.read_exact(&mut body).await.map_err(|e| {
                    if e.kind() == std::io::ErrorKind::UnexpectedEof {
                        RelayError::MalformedRequest(
                            "unexpected end of stream while reading body".into(),
                        )
                    } else {
                        RelayError::MalformedRequest(format!("body read failed: {e}"))
                    }
                })?;
                body
            }
        };

        Ok(Some(ParsedRequest {
            method,
            target_url,
            headers,
            body,
        }))
    }

    /// Read one CRLF-terminated line, stripping the terminator.
    ///
    /// EOF mid-line yields the partial bytes; `None` means EOF with nothing
    /// read at all.
    async fn read_line(&mut self) -> RelayResult<Option<String>> {
        let mut line: Vec<u8> = Vec::new();
        loop {
            match self.stream.read_u8().await {
                Ok(b'\n') if line.last() == Some(&b'\r') => {
                    line.pop();
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                Ok(b) => line.push(b),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    if line.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
                }
                Err(e) => {
                    return Err(RelayError::MalformedRequest(format!("read failed: {e}")));
                }
            }
        }
    }
}

/// Declared body length, from a case-insensitive `Content-Length` scan.
/// Absent means zero; a value that is not a non-negative integer is a
/// framing failure.
fn content_length(headers: &[(String, String)]) -> RelayResult<usize> {
    for (name, value) in headers {
        if name.eq_ignore_ascii_case("content-length") {
            return value.trim().parse::<usize>().map_err(|_| {
                RelayError::MalformedRequest(format!("invalid Content-Length: {value}"))
            });
        }
    }
    Ok(0)
}
