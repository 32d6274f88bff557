//! HTTP implementation of [`AnalyticsSource`].

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Url};
use serde::de::DeserializeOwned;
use taskdash_core::{CompletionStats, DurationAnalysis, ProductivityPatterns};
use tracing::debug;

use crate::config::{
    ClientConfig, COMPLETION_STATS_PATH, DURATION_ANALYSIS_PATH, PRODUCTIVITY_PATTERNS_PATH,
};
use crate::source::{AnalyticsSource, ClientError, Result};

/// Analytics backend client.
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    /// HTTP client
    client: Client,

    /// Validated configuration
    config: ClientConfig,
}

impl HttpAnalyticsClient {
    /// Create a client for the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                config.base_url,
                url.scheme()
            )));
        }

        let mut builder = ClientBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GET `path` and decode its JSON body. A `null` body decodes to `T::default()`.
    async fn get_json<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        let payload: Option<T> = serde_json::from_str(&body)?;
        Ok(payload.unwrap_or_default())
    }
}

#[async_trait]
impl AnalyticsSource for HttpAnalyticsClient {
    async fn completion_stats(&self) -> Result<CompletionStats> {
        self.get_json(COMPLETION_STATS_PATH).await
    }

    async fn productivity_patterns(&self) -> Result<ProductivityPatterns> {
        self.get_json(PRODUCTIVITY_PATTERNS_PATH).await
    }

    async fn duration_analysis(&self) -> Result<DurationAnalysis> {
        self.get_json(DURATION_ANALYSIS_PATH).await
    }
}
