//! In-memory analysis session state.
//!
//! An explicit state container with a fixed action set, owned by the server
//! state and mutated only through these methods. Results are replaced
//! wholesale. Completions write last-write-wins: there is no generation
//! token, so a result that lands late is stored as if current. Duplicate
//! submissions of the same kind are instead gated up front via the
//! `begin_*` methods.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;

use crate::analysis::AnalysisResponse;
use crate::tonality::ThemeMode;

/// One visualization slot, stored as a data URL the way the browser client
/// kept its decoded blobs.
#[derive(Clone, Debug, Default, Serialize)]
struct ThemeSlots {
    #[serde(skip_serializing_if = "Option::is_none")]
    light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dark: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFlags {
    light: bool,
    dark: bool,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    chords: Vec<String>,
    result: Option<AnalysisResponse>,
    error: Option<String>,
    visualizations: ThemeSlots,
    visualization_error: Option<String>,
    analyze_in_flight: bool,
    visualize_in_flight: ThemeFlags,
}

/// Serializable view of the session for the `/api/session` endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub is_loading: bool,
    pub chords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    visualizations: ThemeSlots,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization_error: Option<String>,
    generating: ThemeFlags,
}

impl AnalysisSession {
    /// Mark an analysis as in flight. Returns false (and changes nothing)
    /// if one is already outstanding.
    pub fn begin_analysis(&mut self, chords: &[String]) -> bool {
        if self.analyze_in_flight {
            return false;
        }
        self.analyze_in_flight = true;
        self.chords = chords.to_vec();
        true
    }

    /// Store a completed analysis, clearing any previous error.
    pub fn finish_analysis(&mut self, result: AnalysisResponse) {
        self.analyze_in_flight = false;
        self.result = Some(result);
        self.error = None;
    }

    /// Store an analysis failure, clearing any previous result.
    pub fn fail_analysis(&mut self, message: &str) {
        self.analyze_in_flight = false;
        self.error = Some(message.to_string());
        self.result = None;
    }

    /// Mark a visualization for `theme` as in flight. Returns false if one
    /// is already outstanding for that theme; the other theme's slot is
    /// unaffected, so light and dark may run concurrently.
    pub fn begin_visualization(&mut self, theme: ThemeMode) -> bool {
        let flag = match theme {
            ThemeMode::Light => &mut self.visualize_in_flight.light,
            ThemeMode::Dark => &mut self.visualize_in_flight.dark,
        };
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    /// Store a completed visualization into its theme slot.
    pub fn finish_visualization(&mut self, theme: ThemeMode, content_type: &str, bytes: &[u8]) {
        let data_url = format!("data:{};base64,{}", content_type, BASE64.encode(bytes));
        match theme {
            ThemeMode::Light => {
                self.visualize_in_flight.light = false;
                self.visualizations.light = Some(data_url);
            }
            ThemeMode::Dark => {
                self.visualize_in_flight.dark = false;
                self.visualizations.dark = Some(data_url);
            }
        }
        self.visualization_error = None;
    }

    /// Store a visualization failure. Tracked independently of the analysis
    /// error so a failed diagram never clears a successful analysis.
    pub fn fail_visualization(&mut self, theme: ThemeMode, message: &str) {
        match theme {
            ThemeMode::Light => self.visualize_in_flight.light = false,
            ThemeMode::Dark => self.visualize_in_flight.dark = false,
        }
        self.visualization_error = Some(message.to_string());
    }

    /// Reset everything.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn result(&self) -> Option<&AnalysisResponse> {
        self.result.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            is_loading: self.analyze_in_flight,
            chords: self.chords.clone(),
            result: self.result.clone(),
            error: self.error.clone(),
            visualizations: self.visualizations.clone(),
            visualization_error: self.visualization_error.clone(),
            generating: self.visualize_in_flight,
        }
    }
}
