//! HTTP/1.1 wire framing for the relay socket.
//!
//! # Data Flow
//! ```text
//! relay socket bytes
//!     → reader.rs (request line, headers, Content-Length body)
//!     → [relay loop translates and forwards]
//!     → serializer.rs (status line, filtered headers, recomputed length)
//!     → relay socket bytes
//! ```
//!
//! The framing is deliberately manual: this is the one piece of genuine
//! protocol parsing in the relay, kept independent of any concrete socket
//! type so it can be exercised against in-memory byte streams.

pub mod reader;
pub mod serializer;

pub use reader::{ParsedRequest, WireReader};
pub use serializer::{error_response, serialize_response, ParsedResponse};
