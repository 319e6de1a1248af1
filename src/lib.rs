//! Offshore HTTP Relay Library
//!
//! Terminates one persistent TCP connection from a trusted ship peer, reads
//! raw HTTP/1.1 requests off that wire, re-issues each to its real
//! destination over a fresh outbound connection, and writes the response
//! back onto the same persistent connection.
//!
//! ```text
//! ship peer ──TCP──▶ net::listener ──▶ relay loop ──▶ wire::reader
//!                                          │
//!                                          ├──▶ relay::translate
//!                                          ├──▶ relay::upstream ──HTTP──▶ origin
//!                                          └──▶ wire::serializer ──▶ ship peer
//! ```

pub mod config;
pub mod error;
pub mod net;
pub mod relay;
pub mod wire;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use relay::{RelayLoop, RelayState};
