//! One-shot local HTTP server for exercising [`HttpClient`]s in tests.

use super::client::HttpClient;
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Plain client that ignores proxy settings so requests reach the loopback
/// listener.
pub struct LocalClient(reqwest::Client);

impl LocalClient {
    pub fn new() -> Self {
        Self(reqwest::Client::builder().no_proxy().build().unwrap())
    }
}

#[async_trait]
impl HttpClient for LocalClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// Answers a single request with `status` (e.g. `"404 Not Found"`) and a JSON
/// `body`. Returns the base URL and a handle resolving to the request target
/// (path plus query) the server saw.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut req = vec![0u8; 8192];
        let n = stream.read(&mut req).await.unwrap();
        let req_text = String::from_utf8_lossy(&req[..n]);
        let target = req_text
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or_default()
            .to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        target
    });

    (format!("http://{addr}"), handle)
}
