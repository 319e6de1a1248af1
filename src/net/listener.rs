//! Relay listener.
//!
//! # Responsibilities
//! - Bind the relay port
//! - Accept the ship peer connection
//! - Tune the accepted socket for interactive relaying (TCP_NODELAY)
//!
//! # Design Decisions
//! - The reference relay services exactly one peer for the process
//!   lifetime; `main` drops the listener after the single accept. A
//!   multi-peer deployment would call `accept` in a loop and spawn one
//!   relay loop per connection; nothing here assumes a single caller.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

/// TCP listener for relay peer connections.
pub struct RelayListener {
    inner: TcpListener,
}

impl RelayListener {
    /// Bind to the given address.
    pub async fn bind(addr: SocketAddr) -> std::io::Result<Self> {
        let inner = TcpListener::bind(addr).await?;
        let local_addr = inner.local_addr()?;
        tracing::info!(address = %local_addr, "relay listening");
        Ok(Self { inner })
    }

    /// Accept a relay peer connection.
    pub async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        let (stream, addr) = self.inner.accept().await?;
        stream.set_nodelay(true)?;
        tracing::info!(peer_addr = %addr, "ship peer connected");
        Ok((stream, addr))
    }

    /// Local address this listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }
}
