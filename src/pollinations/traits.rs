use crate::error::Result;
use async_trait::async_trait;

/// Anything that can turn a request URL into raw image bytes.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
