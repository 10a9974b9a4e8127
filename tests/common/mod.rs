//! Shared mock-backend utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Counts requests served by a mock backend.
pub type HitCounter = Arc<AtomicU32>;

pub fn hits(counter: &HitCounter) -> u32 {
    counter.load(Ordering::SeqCst)
}

/// Start a backend answering every request with a fixed status and body.
pub async fn start_fixed_backend(status: u16, body: &str) -> (SocketAddr, HitCounter) {
    let body = body.to_string();
    start_programmable_backend(move |_path| {
        let body = body.clone();
        async move { (status, body) }
    })
    .await
}

/// Start a backend whose response is computed from the request path.
///
/// Binds to an ephemeral port; reads the request head before answering so
/// the client never sees a response race.
pub async fn start_programmable_backend<F, Fut>(handler: F) -> (SocketAddr, HitCounter)
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counter: HitCounter = Arc::new(AtomicU32::new(0));
    let handler = Arc::new(handler);

    let task_counter = counter.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let handler = handler.clone();
            let counter = task_counter.clone();

            tokio::spawn(async move {
                let path = match read_request_path(&mut socket).await {
                    Some(path) => path,
                    None => return,
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let (status, body) = handler(path).await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, counter)
}

/// Start a backend that accepts connections and never answers, forcing the
/// client's per-attempt deadline to expire.
pub async fn start_unresponsive_backend() -> (SocketAddr, HitCounter) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let counter: HitCounter = Arc::new(AtomicU32::new(0));

    let task_counter = counter.clone();
    tokio::spawn(async move {
        let mut open = Vec::new();
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            task_counter.fetch_add(1, Ordering::SeqCst);
            // Keep the socket open without ever responding.
            open.push(socket);
        }
    });

    (addr, counter)
}

/// Read the request head and return the path of the request line.
async fn read_request_path(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let head = String::from_utf8_lossy(&buf);
    let request_line = head.lines().next()?;
    request_line.split_whitespace().nth(1).map(str::to_string)
}

/// Base URL for a mock backend address.
pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}
