//! Gateway state: the in-memory analysis session and the two JSON-persisted
//! stores (history, settings).

mod history;
mod models;
mod session;
mod settings;

pub use history::{HistoryStore, JsonHistoryStore, HISTORY_CAP};
pub use models::HistoryEntry;
pub use session::{AnalysisSession, SessionSnapshot};
pub use settings::{JsonSettingsStore, Language, Settings, SettingsStore, SettingsUpdate, ThemePreference};
