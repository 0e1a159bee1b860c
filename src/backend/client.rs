//! HTTP client for the external analysis service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::analysis::{AnalysisRequest, AnalysisResponse};

use super::{
    AnalysisBackend, BackendError, VisualizationImage, DEFAULT_VISUALIZATION_CONTENT_TYPE,
};

/// HTTP client for communicating with the analysis service.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the analysis service (e.g., "http://localhost:8000")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL of the analysis service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a request body to an endpoint, appending `lang` when provided.
    ///
    /// `lang` is passed through verbatim; unrecognized values are the
    /// backend's business, not ours.
    async fn post(
        &self,
        path: &str,
        request: &AnalysisRequest,
        lang: Option<&str>,
    ) -> Result<reqwest::Response, BackendError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self.client.post(&url).json(request);
        if let Some(lang) = lang {
            builder = builder.query(&[("lang", lang)]);
        }

        let response = builder.send().await.map_err(BackendError::transport)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::shape_error(response).await)
        }
    }

    async fn shape_error(response: reqwest::Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::from_status_and_body(status.as_u16(), status.canonical_reason(), &body)
    }
}

#[async_trait]
impl AnalysisBackend for BackendClient {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        lang: Option<&str>,
    ) -> Result<AnalysisResponse, BackendError> {
        let response = self.post("analyze", request, lang).await?;
        response.json().await.map_err(BackendError::transport)
    }

    async fn visualize(
        &self,
        request: &AnalysisRequest,
        lang: Option<&str>,
    ) -> Result<VisualizationImage, BackendError> {
        let response = self.post("visualize", request, lang).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_VISUALIZATION_CONTENT_TYPE)
            .to_string();

        let bytes = response.bytes().await.map_err(BackendError::transport)?;

        Ok(VisualizationImage {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(BackendError::transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::shape_error(response).await)
        }
    }
}
