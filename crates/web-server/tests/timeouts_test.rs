//! Request and connection timeout tests.

mod common;

use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
};
use common::TestApp;
use futures::stream;
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::oneshot,
    task::JoinHandle,
};
use web_server::{serve, ConnectionLimits};

/// A body that never delivers a byte is cut off by the read timeout.
#[tokio::test(start_paused = true)]
async fn stalled_request_body_times_out() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/category")
        .header("content-type", "application/json")
        .body(Body::from_stream(stream::pending::<Result<Bytes, std::io::Error>>()))
        .unwrap();

    let (status, json) = app.send_request(request).await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(json, json!({"message": "request timeout", "data": null}));
    assert_eq!(app.categories.len().await, 0);
}

struct RunningServer {
    addr: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

async fn start(limits: ConnectionLimits) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let router = TestApp::new().router;
    let handle = tokio::spawn(async move {
        serve(listener, router, limits, async {
            let _ = stopped.await;
        })
        .await;
    });
    RunningServer { addr, stop, handle }
}

/// Reads until the server closes the connection, failing if that takes longer than `within`.
async fn read_until_closed(stream: &mut TcpStream, within: Duration) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    tokio::time::timeout(within, async {
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => received.extend_from_slice(&buf[..n]),
            }
        }
    })
    .await
    .expect("server should have closed the connection");
    received
}

#[tokio::test]
async fn idle_keep_alive_connection_is_closed() {
    let server = start(ConnectionLimits {
        header_read: Duration::from_secs(10),
        idle: Duration::from_millis(200),
    })
    .await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    // The request is answered, then the connection is dropped once it goes quiet.
    let received = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    let text = String::from_utf8_lossy(&received);
    assert!(text.starts_with("HTTP/1.1 200"), "unexpected response: {text}");
    assert!(text.contains("API Running"));

    let _ = server.stop.send(());
    server.handle.await.unwrap();
}

#[tokio::test]
async fn slow_request_head_is_cut_off() {
    let server = start(ConnectionLimits {
        header_read: Duration::from_millis(200),
        idle: Duration::from_secs(30),
    })
    .await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream.write_all(b"GET /health HTTP/1.1\r\nHost: loc").await.unwrap();

    let received = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    assert!(!String::from_utf8_lossy(&received).contains("API Running"));

    let _ = server.stop.send(());
    server.handle.await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_accepting_and_returns() {
    let server = start(ConnectionLimits::default()).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let received = read_until_closed(&mut stream, Duration::from_secs(5)).await;
    assert!(String::from_utf8_lossy(&received).starts_with("HTTP/1.1 200"));

    let _ = server.stop.send(());
    tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("serve should return after shutdown")
        .unwrap();
    assert!(TcpStream::connect(server.addr).await.is_err());
}
