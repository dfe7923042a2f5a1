//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

use spiracle_gate::config::{GateConfig, SharedSecret};

pub const PASSWORD: &str = "correct horse battery staple";
pub const SESSION_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Config with a shared secret and, optionally, a webhook URL.
pub fn test_config(webhook_url: Option<String>) -> GateConfig {
    let mut config = GateConfig::default();
    config.auth.shared_secret = SharedSecret::new(PASSWORD);
    config.webhook.url = webhook_url;
    config
}

/// Drive one request through the router and decode the JSON body (Null if not JSON).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

pub fn post_json(path: &str, ip: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Log in from `ip` and return the `name=value` cookie pair.
pub async fn login_cookie(router: &Router, ip: &str) -> String {
    let request = post_json("/api/auth", ip, &serde_json::json!({ "password": PASSWORD }));
    let (status, headers, _) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);

    headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

pub fn chat_request(ip: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut request = post_json("/api/chat", ip, body);
    if let Some(cookie) = cookie {
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
    }
    request
}

/// Bodies received by a mock webhook.
pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Start a programmable mock webhook on an ephemeral port.
///
/// Each request's JSON body is captured; `f` decides the reply status and body.
pub async fn start_mock_webhook<F, Fut>(f: F) -> (SocketAddr, Captured)
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let sink = captured.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let sink = sink.clone();
            tokio::spawn(async move {
                let body = read_json_body(&mut socket).await;
                sink.lock().unwrap().push(body.clone());

                let (status, reply) = f(body).await;
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    reply.len(),
                    reply
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, captured)
}

/// Read one HTTP/1.1 request with a `Content-Length` body.
async fn read_json_body(socket: &mut TcpStream) -> Value {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return Value::Null;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(header_end + content_length);
    serde_json::from_slice(&buf[header_end..end]).unwrap_or(Value::Null)
}
