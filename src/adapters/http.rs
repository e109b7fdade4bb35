//! reqwest-backed [`Transport`].

use crate::domain::model::HttpReply;
use crate::domain::ports::Transport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::Client;
use std::time::Duration;

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// `timeout` bounds each request end to end; hitting it is a transport
    /// failure like any other.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<HttpReply> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        tracing::debug!("API response status: {} ({} bytes)", status, body.len());

        Ok(HttpReply {
            status,
            retry_after,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_post_returns_status_body_and_retry_after() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/transactions")
                    .header("content-type", "application/json")
                    .body(r#"{"k":"v"}"#);
                then.status(429).header("Retry-After", "7").body("slow down");
            })
            .await;

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let reply = transport
            .post(
                &server.url("/api/transactions"),
                "application/json",
                r#"{"k":"v"}"#.to_string(),
            )
            .await
            .unwrap();

        api_mock.assert_async().await;
        assert_eq!(reply.status, 429);
        assert_eq!(reply.retry_after.as_deref(), Some("7"));
        assert_eq!(reply.body, "slow down");
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error() {
        // Bind then drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let result = transport
            .post(
                &format!("http://127.0.0.1:{}/api/transactions", port),
                "application/json",
                "{}".to_string(),
            )
            .await;

        assert!(matches!(
            result,
            Err(crate::utils::error::LoadError::TransportError(_))
        ));
    }
}
