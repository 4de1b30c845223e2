use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// JSON over HTTP against the remote document store. Paths are relative to
/// the store's base URL.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<serde_json::Value>;
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value>;
    async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value>;
}

pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in.
    fn user_id(&self) -> Option<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn collection(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn user_id(&self) -> Option<&str>;
    fn placeholder_image_url(&self) -> &str;
}
