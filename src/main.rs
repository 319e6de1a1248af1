//! Offshore HTTP Relay
//!
//! Binary entry point: bind the fixed relay port, accept the one ship peer
//! connection, and run the sequential relay loop until the peer disconnects.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offshore_relay::net::RelayListener;
use offshore_relay::relay::upstream::UpstreamClient;
use offshore_relay::{RelayConfig, RelayLoop};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offshore_relay=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::default();
    tracing::info!(
        listen_port = config.listen_port,
        connect_timeout_secs = config.connect_timeout_secs,
        request_timeout_secs = config.request_timeout_secs,
        "offshore-relay starting"
    );

    let listener = RelayListener::bind(([0, 0, 0, 0], config.listen_port).into()).await?;

    // One ship peer for the process lifetime; the listener is released once
    // the peer is connected.
    let (stream, peer_addr) = listener.accept().await?;
    drop(listener);

    let upstream = UpstreamClient::new(&config)?;
    let (read_half, write_half) = stream.into_split();
    let mut relay = RelayLoop::new(read_half, write_half, upstream);
    relay.run().await;

    tracing::info!(peer_addr = %peer_addr, "relay connection closed, shutting down");
    Ok(())
}
