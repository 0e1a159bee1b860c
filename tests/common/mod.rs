//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, TestClient};
//! use reqwest::StatusCode;
//!
//! #[tokio::test]
//! async fn test_analyze() {
//!     let server = TestServer::spawn().await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.analyze(serde_json::json!({"chords": ["C"]})).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```
#![allow(dead_code)] // Each test binary uses its own subset of this module

mod client;
mod constants;
mod server;
mod stub_backend;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
pub use server::TestServer;
pub use stub_backend::{RecordedRequest, StubBackend};
