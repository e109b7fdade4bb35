use crate::domain::model::HttpReply;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Sends one request body to the target API.
///
/// Implementations return `Err` only for transport-level failures; every
/// HTTP status, including errors, comes back as an [`HttpReply`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, content_type: &str, body: String) -> Result<HttpReply>;
}

/// Suspends the driver between calls.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}
