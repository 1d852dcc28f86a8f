//! Shared helpers for admin-session integration tests.

#![allow(dead_code)]

use admin_session::{ClientConfig, SessionContext};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub const PUBLIC_TOKEN: &str = "public-read-token";

/// Build an unsigned token whose payload is `claims`.
pub fn encode_token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
    format!("{}.{}.test-signature", header, payload)
}

/// Token for Alice (admin) expiring `seconds` from now.
pub fn alice_token(seconds: i64) -> String {
    encode_token(serde_json::json!({
        "exp": chrono::Utc::now().timestamp() + seconds,
        "name": "Alice",
        "email": "alice@example.com",
        "role": "admin"
    }))
}

/// One request as seen by the capture server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get("authorization").map(String::as_str)
    }
}

type Responder = dyn Fn(&CapturedRequest) -> (u16, String) + Send + Sync;

/// Minimal HTTP/1.1 server that records every request and answers with
/// whatever the responder returns.
pub struct CaptureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: JoinHandle<()>,
}

impl CaptureServer {
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(&CapturedRequest) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Arc<Responder> = Arc::new(responder);

        let handle = tokio::spawn({
            let requests = requests.clone();
            async move {
                while let Ok((socket, _)) = listener.accept().await {
                    let requests = requests.clone();
                    let responder = responder.clone();
                    tokio::spawn(async move {
                        let _ = handle_connection(socket, requests, responder).await;
                    });
                }
            }
        });

        Self {
            base_url: format!("http://{}/api", addr),
            requests,
            handle,
        }
    }

    /// Server that answers `200 {}` to everything.
    pub async fn ok() -> Self {
        Self::start(|_| (200, "{}".to_string())).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> CapturedRequest {
        self.requests().pop().expect("no request captured")
    }

    pub fn context(&self) -> SessionContext {
        SessionContext::with_tab_storage(ClientConfig {
            api_base_url: self.base_url.clone(),
            public_token: PUBLIC_TOKEN.to_string(),
        })
        .unwrap()
    }
}

impl Drop for CaptureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(
    socket: TcpStream,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    responder: Arc<Responder>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(socket);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).await?;

    let captured = CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    let (status, response_body) = responder(&captured);
    requests.lock().unwrap().push(captured);

    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        response_body.len(),
        response_body
    );
    let mut socket = reader.into_inner();
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await?;
    Ok(())
}
