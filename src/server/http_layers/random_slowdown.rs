//! Dev-only middleware that delays every request, to surface loading states
//! in a UI pointed at a local gateway.
#![allow(dead_code)] // Only wired in with the `slowdown` feature

use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use std::time::Duration;

const SLOWDOWN_MILLIS: u64 = 750;

pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(SLOWDOWN_MILLIS)).await;
    next.run(request).await
}
