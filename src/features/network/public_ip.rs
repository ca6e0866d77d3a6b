use crate::shared::traits::AsyncDataCollector;
use crate::shared::error::CollectionError;
use log::debug;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Looks up the host's public IP (and whatever geolocation the service
/// returns) from a JSON endpoint such as `https://ipapi.co/json/`.
pub struct PublicIpCollector {
    client: reqwest::Client,
    url: Url,
}

impl PublicIpCollector {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, CollectionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn lookup(&self) -> Result<Value, CollectionError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        if !body.is_object() {
            return Err(CollectionError::Parse(format!(
                "expected a JSON object from {}, got {}",
                self.url, body
            )));
        }

        debug!("Public IP lookup via {} succeeded", self.url);
        Ok(body)
    }
}

#[async_trait::async_trait]
impl AsyncDataCollector<Value> for PublicIpCollector {
    async fn collect(&mut self) -> Result<Value, CollectionError> {
        self.lookup().await
    }

    async fn validate(&self) -> Result<(), CollectionError> {
        match self.url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(CollectionError::Validation(format!(
                "unsupported lookup scheme: {other}"
            ))),
        }
    }
}
