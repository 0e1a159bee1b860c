//! Client for the external harmonic-analysis service.
//!
//! The gateway never does any tonal inference itself; every analysis and
//! visualization is a single request/response exchange with this service.
//! There is no retry policy: failures propagate immediately and the caller
//! decides whether to re-trigger.

mod client;

pub use client::BackendClient;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::analysis::{AnalysisRequest, AnalysisResponse};

/// Default content type for visualizations when the backend omits one.
pub const DEFAULT_VISUALIZATION_CONTENT_TYPE: &str = "image/svg+xml";

/// Error surfaced from the analysis service.
///
/// Uniform shape for both HTTP-level failures (where `status` and `details`
/// carry the backend's own error payload) and transport failures (status
/// 500, no details). The backend's payload is never swallowed.
#[derive(Clone, Debug, Serialize, Error)]
#[error("{message} (status {status})")]
pub struct BackendError {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BackendError {
    /// Shape an error from a non-success response body.
    ///
    /// The body is parsed as JSON when possible, falling back to raw text in
    /// `details`. Message preference: the payload's `detail`, then `error`,
    /// then a generic `HTTP <status>` line.
    pub fn from_status_and_body(status: u16, reason: Option<&str>, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        let payload_message = parsed.as_ref().and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        });

        let details = match parsed {
            Some(value) => Some(value),
            None if body.is_empty() => None,
            None => Some(serde_json::json!({ "error": body })),
        };

        let message = payload_message
            .unwrap_or_else(|| format!("HTTP {} {}", status, reason.unwrap_or("")).trim_end().to_string());

        Self {
            message,
            status,
            details,
        }
    }

    /// Shape a transport-level failure (connect error, timeout, bad body).
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
            status: 500,
            details: None,
        }
    }
}

/// An opaque visualization image relayed from the backend.
#[derive(Clone, Debug)]
pub struct VisualizationImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Seam for the external analysis service.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Analyze a chord progression.
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        lang: Option<&str>,
    ) -> Result<AnalysisResponse, BackendError>;

    /// Generate a visualization image for a chord progression.
    async fn visualize(
        &self,
        request: &AnalysisRequest,
        lang: Option<&str>,
    ) -> Result<VisualizationImage, BackendError>;

    /// Check if the analysis service is reachable.
    async fn health_check(&self) -> Result<(), BackendError>;
}
