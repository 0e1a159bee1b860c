use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::error;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use uuid::Uuid;

use crate::analysis::{build_request, RequestValidationError};
use crate::backend::BackendError;
use crate::store::{AnalysisSession, SettingsUpdate};
use crate::tonality::{
    all_tonalities, border_style_of, color_of, is_minor, BorderStyle, ColorVariant, ThemeMode,
};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{log_requests, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct AnalyzeBody {
    pub chords: Vec<String>,
    #[serde(default)]
    pub tonalities_to_test: Vec<String>,
    pub theme: Option<ThemeMode>,
}

#[derive(Deserialize, Debug)]
struct LangQuery {
    pub lang: Option<String>,
}

#[derive(Deserialize, Debug)]
struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Deserialize, Debug)]
struct ThemeQuery {
    pub theme: Option<ThemeMode>,
}

#[derive(Serialize)]
struct TonalityColorsBody {
    stroke: &'static str,
    fill: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TonalityDescriptor {
    name: &'static str,
    is_minor: bool,
    border_style: BorderStyle,
    colors: TonalityColorsBody,
}

fn validation_error_response(err: &RequestValidationError) -> Response {
    let body = match err {
        RequestValidationError::InvalidChords { failures, .. } => serde_json::json!({
            "message": err.to_string(),
            "failures": failures,
        }),
        _ => serde_json::json!({ "message": err.to_string() }),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn backend_error_response(err: BackendError) -> Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(err)).into_response()
}

fn conflict_response(message: &str) -> Response {
    (
        StatusCode::CONFLICT,
        Json(serde_json::json!({ "message": message })),
    )
        .into_response()
}

/// Permissive CORS preflight for the proxy endpoints.
async fn preflight() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
        .body(Body::empty())
        .unwrap()
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

/// Proxy a chord progression to the backend /analyze endpoint.
///
/// Malformed chords are rejected here with per-entry suggestions and never
/// sent upstream. A successful tonal analysis is recorded in history when
/// the autosave setting is on.
async fn post_analyze(
    State(state): State<ServerState>,
    Query(query): Query<LangQuery>,
    Json(body): Json<AnalyzeBody>,
) -> Response {
    let theme = body.theme.unwrap_or(ThemeMode::Light);
    let request = match build_request(&body.chords, &body.tonalities_to_test, theme) {
        Ok(request) => request,
        Err(err) => return validation_error_response(&err),
    };

    if !state
        .session
        .lock()
        .unwrap()
        .begin_analysis(&request.chords)
    {
        return conflict_response("An analysis is already in progress");
    }

    match state.backend.analyze(&request, query.lang.as_deref()).await {
        Ok(result) => {
            state
                .session
                .lock()
                .unwrap()
                .finish_analysis(result.clone());

            if result.is_tonal_progression && state.settings.get().auto_save {
                if let Err(err) = state.history.add(request.chords.clone(), result.clone()) {
                    error!("Failed to record analysis in history: {}", err);
                }
            }

            Json(result).into_response()
        }
        Err(err) => {
            state.session.lock().unwrap().fail_analysis(&err.message);
            backend_error_response(err)
        }
    }
}

/// Proxy a chord progression to the backend /visualize endpoint, relaying
/// the binary image with the backend's declared content type.
async fn post_visualize(
    State(state): State<ServerState>,
    Query(query): Query<LangQuery>,
    Json(body): Json<AnalyzeBody>,
) -> Response {
    let theme = body.theme.unwrap_or(ThemeMode::Light);
    let request = match build_request(&body.chords, &body.tonalities_to_test, theme) {
        Ok(request) => request,
        Err(err) => return validation_error_response(&err),
    };

    if !state.session.lock().unwrap().begin_visualization(theme) {
        return conflict_response("A visualization for this theme is already in progress");
    }

    match state
        .backend
        .visualize(&request, query.lang.as_deref())
        .await
    {
        Ok(image) => {
            state.session.lock().unwrap().finish_visualization(
                theme,
                &image.content_type,
                &image.bytes,
            );

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, image.content_type)
                .body(Body::from(image.bytes))
                .unwrap()
        }
        Err(err) => {
            state
                .session
                .lock()
                .unwrap()
                .fail_visualization(theme, &err.message);
            backend_error_response(err)
        }
    }
}

async fn get_session(State(session): State<GuardedSession>) -> Response {
    Json(session.lock().unwrap().snapshot()).into_response()
}

async fn clear_session(State(session): State<GuardedSession>) -> Response {
    session.lock().unwrap().clear();
    StatusCode::OK.into_response()
}

async fn get_history(
    State(history): State<GuardedHistoryStore>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(10);
    Json(history.recent(limit)).into_response()
}

async fn delete_history_entry(
    State(history): State<GuardedHistoryStore>,
    Path(id): Path<Uuid>,
) -> Response {
    match history.remove(&id) {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to remove history entry: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn clear_history(State(history): State<GuardedHistoryStore>) -> Response {
    match history.clear() {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            error!("Failed to clear history: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn toggle_favorite(
    State(history): State<GuardedHistoryStore>,
    Path(id): Path<Uuid>,
) -> Response {
    match history.toggle_favorite(&id) {
        Ok(Some(is_favorite)) => {
            Json(serde_json::json!({ "isFavorite": is_favorite })).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            error!("Failed to toggle favorite: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_settings(State(settings): State<GuardedSettingsStore>) -> Response {
    Json(settings.get()).into_response()
}

async fn put_settings(
    State(settings): State<GuardedSettingsStore>,
    Json(update): Json<SettingsUpdate>,
) -> Response {
    match settings.update(update) {
        Ok(updated) => Json(updated).into_response(),
        Err(err) => {
            error!("Failed to update settings: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The canonical tonalities with their styling, for selector UIs.
async fn get_tonalities(Query(query): Query<ThemeQuery>) -> Response {
    let theme = query.theme.unwrap_or(ThemeMode::Light);
    let descriptors: Vec<TonalityDescriptor> = all_tonalities()
        .iter()
        .map(|&name| TonalityDescriptor {
            name,
            is_minor: is_minor(Some(name)),
            border_style: border_style_of(Some(name)),
            colors: TonalityColorsBody {
                stroke: color_of(Some(name), ColorVariant::Stroke, theme),
                fill: color_of(Some(name), ColorVariant::Fill, theme),
                label: color_of(Some(name), ColorVariant::Label, theme),
            },
        })
        .collect();
    Json(descriptors).into_response()
}

async fn get_health(State(backend): State<GuardedBackend>) -> Response {
    match backend.health_check().await {
        Ok(()) => Json(serde_json::json!({ "gateway": "ok", "backend": "ok" })).into_response(),
        Err(err) => (StatusCode::BAD_GATEWAY, Json(err)).into_response(),
    }
}

impl ServerState {
    fn new(
        config: ServerConfig,
        backend: GuardedBackend,
        history: GuardedHistoryStore,
        settings: GuardedSettingsStore,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            backend,
            session: Arc::new(Mutex::new(AnalysisSession::default())),
            history,
            settings,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    backend: GuardedBackend,
    history: GuardedHistoryStore,
    settings: GuardedSettingsStore,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), backend, history, settings);

    let api_routes: Router = Router::new()
        .route("/analyze", post(post_analyze).options(preflight))
        .route("/visualize", post(post_visualize).options(preflight))
        .route("/session", get(get_session).delete(clear_session))
        .route("/history", get(get_history).delete(clear_history))
        .route("/history/{id}", delete(delete_history_entry))
        .route("/history/{id}/favorite", put(toggle_favorite))
        .route("/settings", get(get_settings).put(put_settings))
        .route("/tonalities", get(get_tonalities))
        .route("/health", get(get_health))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router.nest("/api", api_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    backend: GuardedBackend,
    history: GuardedHistoryStore,
    settings: GuardedSettingsStore,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    frontend_dir_path: Option<String>,
) -> Result<()> {
    let config = ServerConfig {
        port,
        requests_logging_level,
        frontend_dir_path,
    };
    let app = make_app(config, backend, history, settings)?;

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .unwrap();

    Ok(axum::serve(listener, app).await?)
}
