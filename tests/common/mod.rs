//! Shared helpers for the integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `body` as the version metadata document for every request.
pub async fn start_metadata_server(body: &'static str) -> SocketAddr {
    start_flaky_metadata_server(body, 0).await
}

/// Serve `body`, but truncate the response mid-body for the first
/// `truncated_responses` requests: the head declares the full length, the
/// connection closes after four bytes. Clients see a partial read, never a
/// failed request.
pub async fn start_flaky_metadata_server(
    body: &'static str,
    truncated_responses: usize,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let remaining = Arc::new(AtomicUsize::new(truncated_responses));

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let remaining = Arc::clone(&remaining);
            tokio::spawn(async move {
                // Drain the request head; the test client sends it in one piece.
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let truncate = remaining
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
                let payload = if truncate {
                    &body[..body.len().min(4)]
                } else {
                    body
                };

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    payload
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

pub fn metadata_url(addr: SocketAddr) -> String {
    format!("http://{}/version-metadata.txt", addr)
}
