//! Persisted store models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AnalysisResponse;

/// One past analysis, as persisted in the history store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub chords: Vec<String>,
    pub result: AnalysisResponse,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
}

impl HistoryEntry {
    pub fn new(chords: Vec<String>, result: AnalysisResponse) -> Self {
        Self {
            id: Uuid::new_v4(),
            chords,
            result,
            timestamp: Utc::now(),
            is_favorite: false,
        }
    }
}
