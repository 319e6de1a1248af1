//! Outbound origin client.
//!
//! # Responsibilities
//! - Issue the translated request to its target origin
//! - Bound every call with the fixed connect/response timeouts
//! - Buffer the complete response before the loop serializes it
//!
//! # Design Decisions
//! - reqwest with its default redirect policy; origin redirects are followed
//!   transparently
//! - One client per relay connection, owned by the loop; no state is shared
//!   across requests
//! - Bodies are buffered in full, matching the no-chunking relay framing

use std::time::Duration;

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::relay::translate::OutboundRequest;
use crate::wire::ParsedResponse;

/// HTTP client for outbound origin calls.
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client with the relay's fixed timeouts.
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Upstream(format!("client setup failed: {e}")))?;
        Ok(Self { client })
    }

    /// Send the outbound request and buffer the complete response.
    ///
    /// Blocks the caller until status, headers, and the full body are in
    /// memory, or the timeout/error fires. Headers come back in origin
    /// order with duplicates preserved.
    pub async fn execute(&self, outbound: OutboundRequest) -> RelayResult<ParsedResponse> {
        let mut builder = self
            .client
            .request(outbound.method, outbound.url)
            .headers(outbound.headers);
        if let Some(body) = outbound.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| RelayError::Upstream(e.to_string()))?
            .to_vec();

        Ok(ParsedResponse {
            status,
            headers,
            body,
        })
    }
}
