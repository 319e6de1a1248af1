//! Request translation.
//!
//! # Responsibilities
//! - Map a parsed inbound request onto an outbound origin request
//! - Enforce method semantics (which methods carry a body)
//! - Strip hop-by-hop headers that would corrupt outbound framing
//!
//! # Design Decisions
//! - Unrecognized methods fall back to GET semantics with a warning; the
//!   peer is trusted, so an unknown verb is almost certainly a typo
//! - Headers the transport rejects are skipped with a warning, never fatal
//! - Host and Content-Length are dropped; the client derives both from the
//!   target URL and the attached body

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use crate::error::{RelayError, RelayResult};
use crate::wire::ParsedRequest;

/// Request headers never forwarded upstream. They are scoped to the relay
/// connection (or owned by the outbound transport), not to the message.
const DROPPED_REQUEST_HEADERS: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "host",
    "content-length",
];

/// An outbound request ready for the upstream client.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Translate a parsed inbound request into its outbound form.
///
/// Failure here is request-scoped: the relay connection survives and the
/// peer gets a 502.
pub fn translate(request: &ParsedRequest) -> RelayResult<OutboundRequest> {
    let url = Url::parse(&request.target_url).map_err(|e| {
        RelayError::Upstream(format!(
            "invalid target URL {:?}: {e}",
            request.target_url
        ))
    })?;
    if !url.has_host() {
        return Err(RelayError::Upstream(format!(
            "target URL has no host: {:?}",
            request.target_url
        )));
    }

    let (method, carries_body) = match request.method.to_ascii_uppercase().as_str() {
        "GET" => (Method::GET, false),
        "POST" => (Method::POST, true),
        "PUT" => (Method::PUT, true),
        "PATCH" => (Method::PATCH, true),
        "DELETE" => (Method::DELETE, false),
        "HEAD" => (Method::HEAD, false),
        "OPTIONS" => (Method::OPTIONS, false),
        other => {
            tracing::warn!(method = %other, "unrecognized method, forwarding as GET");
            (Method::GET, false)
        }
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &request.headers {
        if DROPPED_REQUEST_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
        {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(parsed_name), Ok(parsed_value)) => {
                headers.append(parsed_name, parsed_value);
            }
            _ => {
                tracing::warn!(header = %name, "skipping header rejected by transport");
            }
        }
    }

    let body = if carries_body && !request.body.is_empty() {
        Some(request.body.clone())
    } else {
        None
    };

    Ok(OutboundRequest {
        method,
        url,
        headers,
        body,
    })
}
