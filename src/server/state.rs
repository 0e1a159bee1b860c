use axum::extract::FromRef;

use crate::backend::AnalysisBackend;
use crate::store::{AnalysisSession, HistoryStore, SettingsStore};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedBackend = Arc<dyn AnalysisBackend>;
pub type GuardedSession = Arc<Mutex<AnalysisSession>>;
pub type GuardedHistoryStore = Arc<dyn HistoryStore>;
pub type GuardedSettingsStore = Arc<dyn SettingsStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub backend: GuardedBackend,
    pub session: GuardedSession,
    pub history: GuardedHistoryStore,
    pub settings: GuardedSettingsStore,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedBackend {
    fn from_ref(input: &ServerState) -> Self {
        input.backend.clone()
    }
}

impl FromRef<ServerState> for GuardedSession {
    fn from_ref(input: &ServerState) -> Self {
        input.session.clone()
    }
}

impl FromRef<ServerState> for GuardedHistoryStore {
    fn from_ref(input: &ServerState) -> Self {
        input.history.clone()
    }
}

impl FromRef<ServerState> for GuardedSettingsStore {
    fn from_ref(input: &ServerState) -> Self {
        input.settings.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
