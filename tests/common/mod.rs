//! Shared utilities for relay integration tests.
//!
//! Mock origin servers speak just enough HTTP/1.1 for the outbound client:
//! they read one full request (headers plus Content-Length body), hand the
//! raw bytes to the test's handler, and answer with `Connection: close`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use offshore_relay::net::RelayListener;
use offshore_relay::relay::upstream::UpstreamClient;
use offshore_relay::{RelayConfig, RelayLoop};

/// Start a relay that accepts one peer connection, on an ephemeral port.
pub async fn start_relay() -> SocketAddr {
    let listener = RelayListener::bind("127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let config = RelayConfig {
            connect_timeout_secs: 5,
            request_timeout_secs: 5,
            ..RelayConfig::default()
        };
        let upstream = UpstreamClient::new(&config).unwrap();
        let (read_half, write_half) = stream.into_split();
        RelayLoop::new(read_half, write_half, upstream).run().await;
    });

    addr
}

/// Start a mock origin returning a fixed response.
#[allow(dead_code)]
pub async fn start_mock_origin(
    status: u16,
    headers: &'static [(&'static str, &'static str)],
    body: &'static [u8],
) -> SocketAddr {
    start_programmable_origin(move |_| async move {
        (
            status,
            headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body.to_vec(),
        )
    })
    .await
}

/// Start a mock origin whose handler sees the raw request bytes.
pub async fn start_programmable_origin<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, Vec<(String, String)>, Vec<u8>)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_full_request(&mut socket).await else {
                            return;
                        };
                        let (status, headers, body) = f(request).await;

                        let mut response = format!(
                            "HTTP/1.1 {} {}\r\n",
                            status,
                            match status {
                                200 => "OK",
                                404 => "Not Found",
                                500 => "Internal Server Error",
                                _ => "OK",
                            }
                        );
                        for (name, value) in &headers {
                            response.push_str(&format!("{name}: {value}\r\n"));
                        }
                        response.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        ));

                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.write_all(&body).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read one full HTTP/1.1 request (headers plus declared body) off a socket.
async fn read_full_request(socket: &mut TcpStream) -> Option<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(total) = full_request_len(&data) {
            if data.len() >= total {
                return Some(data);
            }
        }
        match socket.read(&mut buf).await {
            Ok(0) => return (!data.is_empty()).then_some(data),
            Ok(n) => data.extend_from_slice(&buf[..n]),
            Err(_) => return None,
        }
    }
}

fn full_request_len(data: &[u8]) -> Option<usize> {
    let head_end = data.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
    let head = String::from_utf8_lossy(&data[..head_end]);
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    Some(head_end + content_length)
}

/// Read one framed relay response off the peer side of the socket.
/// Returns the head (status line plus headers) and the exact body bytes.
pub async fn read_relay_response(socket: &mut TcpStream) -> (String, Vec<u8>) {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(head_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head_end = head_end + 4;
            let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .expect("relay response must carry Content-Length");
            while data.len() < head_end + content_length {
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "stream ended mid-body");
                data.extend_from_slice(&buf[..n]);
            }
            return (head, data[head_end..head_end + content_length].to_vec());
        }
        let n = socket.read(&mut buf).await.unwrap();
        assert!(n > 0, "stream ended mid-head");
        data.extend_from_slice(&buf[..n]);
    }
}
