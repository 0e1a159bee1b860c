//! Wire models for the external analysis service.
//!
//! These types match the JSON accepted and returned by the backend's
//! /analyze endpoint.

use serde::{Deserialize, Serialize};

use crate::tonality::ThemeMode;

/// Request body sent to the analysis backend.
///
/// Chords are always in ASCII accidental form. An empty
/// `tonalities_to_test` means "auto-detect" and is a documented contract
/// value, so the field is always serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub chords: Vec<String>,
    pub tonalities_to_test: Vec<String>,
    pub theme: ThemeMode,
}

/// One step of the backend's explanation of an analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExplanationStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formal_rule_applied: Option<String>,
    pub observation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_chord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonality_used_in_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_functional_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tonal_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_target_tonality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_tonality_used_in_step: Option<String>,
}

/// Result of a progression analysis.
///
/// Replaced wholesale on each new analysis, never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub is_tonal_progression: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identified_tonality: Option<String>,
    #[serde(default)]
    pub explanation_details: Vec<ExplanationStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
