use crate::core::{ConfigProvider, HttpClient};
use crate::utils::error::{PlacesError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

/// `HttpClient` backed by reqwest, resolving paths against a base URL.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Url::join drops the last segment unless the base ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Self::new(config.base_url())?;
        Ok(match config.request_timeout() {
            Some(timeout) => client.with_timeout(timeout),
            None => client,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = &body {
            request = request.json(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} {} -> {}", method, url, status);

        if !status.is_success() {
            return Err(PlacesError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, path: &str) -> Result<serde_json::Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
        self.send(Method::PUT, path, Some(body)).await
    }
}
