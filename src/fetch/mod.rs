mod basic;
mod client;
pub mod auth;
#[cfg(test)]
pub(crate) mod testing;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;

pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid URL '{url}'"))?,
    );

    let resp = client.execute(req).await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!("GET {url} returned status {status}: {body}"));
    }

    Ok(resp.bytes().await?.to_vec())
}

/// GETs `url` and decodes the body as JSON.
pub async fn fetch_json<C, T>(client: &C, url: &str) -> Result<T>
where
    C: HttpClient + ?Sized,
    T: DeserializeOwned,
{
    let bytes = fetch_bytes(client, url).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("failed to decode JSON from {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{LocalClient, serve_once};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Ping {
        ok: bool,
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_success_body() {
        let (base, server) = serve_once("200 OK", r#"{"ok": true}"#).await;

        let ping: Ping = fetch_json(&LocalClient::new(), &format!("{base}/ping"))
            .await
            .unwrap();
        assert!(ping.ok);
        assert_eq!(server.await.unwrap(), "/ping");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_and_body() {
        let (base, server) = serve_once("404 Not Found", r#"{"error": "no such plant"}"#).await;

        let err = fetch_bytes(&LocalClient::new(), &format!("{base}/plants/9"))
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("404"), "{err}");
        assert!(err.contains("no such plant"), "{err}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        assert!(fetch_bytes(&LocalClient::new(), "not a url").await.is_err());
    }
}
