//! Animation backend that downloads a Lottie document from a public URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use scraps_core::ports::{Animation, AnimationPort, FetchError};

/// Header animation shown above the home page.
pub const DEFAULT_URL: &str = "https://assets7.lottiefiles.com/packages/lf20_buoqslhs.json";

/// Requests slower than this are abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Animation port fetching a single Lottie JSON document.
pub struct LottieClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl LottieClient {
    /// Create a client for [`DEFAULT_URL`] bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_url(client, DEFAULT_URL)
    }

    /// Create a client for a custom document location.
    #[must_use]
    pub fn with_url<U: Into<String>>(client: Client, url: U) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Document location this client fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnimationPort for LottieClient {
    async fn fetch(&self) -> Result<Animation, FetchError> {
        tracing::debug!(url = %self.url, "fetching animation");
        let req = self.client.get(&self.url).timeout(self.timeout);
        let document = fetch_json(req).await?;
        Ok(Animation::from_document(document))
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json(req: RequestBuilder) -> Result<Value, FetchError> {
    let resp = req.send().await.map_err(FetchError::from)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = resp.bytes().await.map_err(FetchError::from)?;
    serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve exactly one canned HTTP response on a random local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let Ok((mut socket, _peer)) = listener.accept().await else {
                return;
            };
            let mut request = [0_u8; 1024];
            let _read: usize = socket.read(&mut request).await.unwrap_or(0);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _written: Result<(), _> = socket.write_all(response.as_bytes()).await;
        });
        format!("http://{addr}/animation.json")
    }

    fn client_for(url: String) -> LottieClient {
        LottieClient::with_url(Client::new(), url).timeout(Duration::from_millis(500))
    }

    #[tokio::test]
    async fn fetch_decodes_lottie_document() {
        let url = serve_once(
            "200 OK",
            r#"{"v":"5.7.4","fr":25,"ip":0,"op":50,"w":900,"h":400,"nm":"bread","layers":[]}"#,
        )
        .await;
        let animation = client_for(url).fetch().await.expect("animation");
        assert_eq!(animation.meta.name.as_deref(), Some("bread"));
        assert_eq!(animation.meta.height, Some(400));
        assert_eq!(animation.meta.duration_secs(), Some(2.0));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let url = serve_once("404 Not Found", "{}").await;
        let err = client_for(url).fetch().await.expect_err("404");
        assert!(matches!(err, FetchError::Status(404)), "got {err:?}");
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let url = serve_once("200 OK", "<html>nope</html>").await;
        let err = client_for(url).fetch().await.expect_err("html");
        assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = client_for(format!("http://{addr}/gone.json"))
            .fetch()
            .await
            .expect_err("nothing listening");
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let hold = tokio::spawn(async move {
            // accept and never answer
            let accepted = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(accepted);
        });

        let client = LottieClient::with_url(Client::new(), format!("http://{addr}/slow.json"))
            .timeout(Duration::from_millis(100));
        let err = client.fetch().await.expect_err("timeout");
        match err {
            FetchError::Network(inner) => assert!(inner.is_timeout(), "got {inner:?}"),
            other => panic!("expected timeout, got {other:?}"),
        }
        hold.abort();
    }

    #[test]
    fn default_client_points_at_the_header_animation() {
        let client = LottieClient::new(Client::new());
        assert_eq!(client.url(), DEFAULT_URL);
    }
}
