//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all gateway endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use std::time::Duration;

/// HTTP test client for the gateway
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Convenience body for an analyze/visualize call.
    pub fn progression_body(chords: &[&str]) -> serde_json::Value {
        serde_json::json!({ "chords": chords })
    }

    // ========================================================================
    // Proxy Endpoints
    // ========================================================================

    pub async fn analyze(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/api/analyze", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("analyze request failed")
    }

    pub async fn analyze_with_lang(&self, body: serde_json::Value, lang: &str) -> Response {
        self.client
            .post(format!("{}/api/analyze", self.base_url))
            .query(&[("lang", lang)])
            .json(&body)
            .send()
            .await
            .expect("analyze request failed")
    }

    pub async fn visualize(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/api/visualize", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("visualize request failed")
    }

    pub async fn visualize_with_lang(&self, body: serde_json::Value, lang: &str) -> Response {
        self.client
            .post(format!("{}/api/visualize", self.base_url))
            .query(&[("lang", lang)])
            .json(&body)
            .send()
            .await
            .expect("visualize request failed")
    }

    pub async fn options(&self, path: &str) -> Response {
        self.client
            .request(
                reqwest::Method::OPTIONS,
                format!("{}{}", self.base_url, path),
            )
            .send()
            .await
            .expect("options request failed")
    }

    // ========================================================================
    // Session Endpoints
    // ========================================================================

    pub async fn get_session(&self) -> Response {
        self.client
            .get(format!("{}/api/session", self.base_url))
            .send()
            .await
            .expect("get session request failed")
    }

    pub async fn clear_session(&self) -> Response {
        self.client
            .delete(format!("{}/api/session", self.base_url))
            .send()
            .await
            .expect("clear session request failed")
    }

    // ========================================================================
    // History Endpoints
    // ========================================================================

    pub async fn get_history(&self, limit: Option<usize>) -> Response {
        let mut request = self.client.get(format!("{}/api/history", self.base_url));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        request.send().await.expect("get history request failed")
    }

    pub async fn delete_history_entry(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/api/history/{}", self.base_url, id))
            .send()
            .await
            .expect("delete history entry request failed")
    }

    pub async fn clear_history(&self) -> Response {
        self.client
            .delete(format!("{}/api/history", self.base_url))
            .send()
            .await
            .expect("clear history request failed")
    }

    pub async fn toggle_favorite(&self, id: &str) -> Response {
        self.client
            .put(format!("{}/api/history/{}/favorite", self.base_url, id))
            .send()
            .await
            .expect("toggle favorite request failed")
    }

    // ========================================================================
    // Settings Endpoints
    // ========================================================================

    pub async fn get_settings(&self) -> Response {
        self.client
            .get(format!("{}/api/settings", self.base_url))
            .send()
            .await
            .expect("get settings request failed")
    }

    pub async fn update_settings(&self, body: serde_json::Value) -> Response {
        self.client
            .put(format!("{}/api/settings", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("update settings request failed")
    }

    // ========================================================================
    // Misc Endpoints
    // ========================================================================

    pub async fn get_tonalities(&self, theme: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}/api/tonalities", self.base_url));
        if let Some(theme) = theme {
            request = request.query(&[("theme", theme)]);
        }
        request.send().await.expect("get tonalities request failed")
    }

    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .expect("health request failed")
    }
}
