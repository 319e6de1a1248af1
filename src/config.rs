//! Fixed relay settings.
//!
//! # Design Decisions
//! - The relay deliberately exposes no config file, environment variable, or
//!   CLI surface; port and timeouts are process constants
//! - They still live in one struct so tests can shorten timeouts and bind
//!   ephemeral ports without touching the relay loop

/// Settings for one relay process.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// TCP port the relay listens on for the ship peer.
    pub listen_port: u16,

    /// Connect timeout for outbound origin calls, in seconds.
    pub connect_timeout_secs: u64,

    /// Total response timeout for outbound origin calls, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_port: 8083,
            connect_timeout_secs: 30,
            request_timeout_secs: 30,
        }
    }
}
