//! Tonalogy Gateway Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod analysis;
pub mod backend;
pub mod chord;
pub mod config;
pub mod server;
pub mod store;
pub mod tonality;

// Re-export commonly used types for convenience
pub use backend::{AnalysisBackend, BackendClient, BackendError};
pub use server::{run_server, RequestsLoggingLevel};
pub use store::{HistoryStore, JsonHistoryStore, JsonSettingsStore, SettingsStore};
