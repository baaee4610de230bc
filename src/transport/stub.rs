//! Test doubles for the transport layer.

use crate::error::LvMeteoError;
use crate::transport::Transport;
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Answers every statement with the same JSON document and counts calls.
#[derive(Debug)]
pub(crate) struct StubTransport {
    response: Value,
    calls: AtomicUsize,
    statements: Mutex<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn new(response: Value) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            statements: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.statements.lock().expect("statements lock").clone()
    }
}

impl Transport for StubTransport {
    async fn execute(&self, sql: &str) -> Result<Value, LvMeteoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.statements
            .lock()
            .expect("statements lock")
            .push(sql.to_string());
        Ok(self.response.clone())
    }
}

/// A client that ignores proxy settings of the test environment.
pub(crate) fn test_client() -> Client {
    Client::builder()
        .no_proxy()
        .build()
        .expect("build test client")
}

/// Serves a single HTTP response on a random local port.
///
/// Returns the endpoint URL and a handle resolving to the raw request head.
pub(crate) async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let url = format!("http://{}/sql", listener.local_addr().expect("local addr"));
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let request = read_head(&mut socket).await;
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;
        request
    });
    (url, handle)
}

/// Accepts a connection and never answers.
pub(crate) async fn silent_server() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let url = format!("http://{}/sql", listener.local_addr().expect("local addr"));
    let handle = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept connection");
        tokio::time::sleep(Duration::from_secs(60)).await;
    });
    (url, handle)
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = socket.read(&mut chunk).await.unwrap_or(0);
        if read == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..read]);
        if head.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&head).into_owned()
}
