//! Stub analysis backend.
//!
//! Stands in for the external analysis service: a small axum server on a
//! random port whose responses are scripted per test and which records
//! every request it receives, so tests can assert on what the gateway
//! actually forwarded.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

/// One request the stub received, as forwarded by the gateway.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub endpoint: &'static str,
    pub lang: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
enum AnalyzeScript {
    Ok(serde_json::Value),
    Error { status: u16, body: serde_json::Value },
}

#[derive(Clone)]
enum VisualizeScript {
    Ok {
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    Error {
        status: u16,
        body: serde_json::Value,
    },
}

struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    analyze: Mutex<AnalyzeScript>,
    visualize: Mutex<VisualizeScript>,
}

#[derive(Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

/// A tonal C Major result, the default analyze script.
pub fn tonal_c_major_response() -> serde_json::Value {
    serde_json::json!({
        "is_tonal_progression": true,
        "identified_tonality": "C Major",
        "explanation_details": [
            {
                "observation": "Progression starts in C Major",
                "processed_chord": "C",
                "tonality_used_in_step": "C Major",
                "tonal_function": "TONIC"
            },
            {
                "observation": "Analysis complete"
            }
        ]
    })
}

async fn analyze(
    State(state): State<Arc<StubState>>,
    Query(query): Query<LangQuery>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        endpoint: "analyze",
        lang: query.lang,
        body,
    });

    match state.analyze.lock().unwrap().clone() {
        AnalyzeScript::Ok(value) => Json(value).into_response(),
        AnalyzeScript::Error { status, body } => (
            StatusCode::from_u16(status).unwrap(),
            Json(body),
        )
            .into_response(),
    }
}

async fn visualize(
    State(state): State<Arc<StubState>>,
    Query(query): Query<LangQuery>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        endpoint: "visualize",
        lang: query.lang,
        body,
    });

    match state.visualize.lock().unwrap().clone() {
        VisualizeScript::Ok {
            content_type,
            bytes,
        } => {
            let mut builder = Response::builder().status(StatusCode::OK);
            if let Some(content_type) = content_type {
                builder = builder.header(header::CONTENT_TYPE, content_type);
            }
            builder.body(Body::from(bytes)).unwrap()
        }
        VisualizeScript::Error { status, body } => (
            StatusCode::from_u16(status).unwrap(),
            Json(body),
        )
            .into_response(),
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Scriptable stand-in for the external analysis service.
pub struct StubBackend {
    /// Base URL to point the gateway's backend client at.
    pub base_url: String,

    state: Arc<StubState>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl StubBackend {
    /// Spawns the stub on a random port with the default scripts: analyze
    /// answers a tonal C Major result, visualize answers an SVG.
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState {
            requests: Mutex::new(Vec::new()),
            analyze: Mutex::new(AnalyzeScript::Ok(tonal_c_major_response())),
            visualize: Mutex::new(VisualizeScript::Ok {
                content_type: Some("image/svg+xml".to_string()),
                bytes: b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec(),
            }),
        });

        let app = Router::new()
            .route("/analyze", post(analyze))
            .route("/visualize", post(visualize))
            .route("/health", get(health))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend port");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Stub backend failed");
        });

        Self {
            base_url,
            state,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn set_analyze_ok(&self, body: serde_json::Value) {
        *self.state.analyze.lock().unwrap() = AnalyzeScript::Ok(body);
    }

    pub fn set_analyze_error(&self, status: u16, body: serde_json::Value) {
        *self.state.analyze.lock().unwrap() = AnalyzeScript::Error { status, body };
    }

    pub fn set_visualize_ok(&self, content_type: Option<&str>, bytes: &[u8]) {
        *self.state.visualize.lock().unwrap() = VisualizeScript::Ok {
            content_type: content_type.map(|ct| ct.to_string()),
            bytes: bytes.to_vec(),
        };
    }

    pub fn set_visualize_error(&self, status: u16, body: serde_json::Value) {
        *self.state.visualize.lock().unwrap() = VisualizeScript::Error { status, body };
    }

    /// Everything the stub has received so far, in order.
    pub fn received(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Received requests for one endpoint ("analyze" or "visualize").
    pub fn received_for(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.received()
            .into_iter()
            .filter(|r| r.endpoint == endpoint)
            .collect()
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
