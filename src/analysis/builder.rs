//! Builds validated analysis requests from raw user input.

use serde::Serialize;
use thiserror::Error;

use crate::chord::{normalize_for_transport, validate_chords, ChordValidation};
use crate::tonality::ThemeMode;

use super::AnalysisRequest;

/// Maximum number of chords in a progression.
pub const MAX_PROGRESSION_LEN: usize = 12;

/// A single chord that failed validation, with its position in the input.
#[derive(Clone, Debug, Serialize)]
pub struct ChordFailure {
    pub index: usize,
    pub chord: String,
    pub validation: ChordValidation,
}

#[derive(Debug, Error)]
pub enum RequestValidationError {
    #[error("progression is empty")]
    Empty,
    #[error("progression exceeds {MAX_PROGRESSION_LEN} chords (got {0})")]
    TooLong(usize),
    #[error("{} of {total} chords failed validation", .failures.len())]
    InvalidChords {
        total: usize,
        failures: Vec<ChordFailure>,
    },
}

/// Assemble an analysis request from raw chords, an optional tonality
/// filter, and a theme.
///
/// Fails fast: if any chord is invalid, no request is produced and the
/// error reports exactly which entries failed. An emitted request never
/// references a chord that failed validation, and every chord in it is in
/// ASCII accidental form. `tonalities_to_test` is attached verbatim; an
/// empty list means "auto-detect" on the backend side.
pub fn build_request(
    raw_chords: &[String],
    tonalities_to_test: &[String],
    theme: ThemeMode,
) -> Result<AnalysisRequest, RequestValidationError> {
    if raw_chords.is_empty() {
        return Err(RequestValidationError::Empty);
    }
    if raw_chords.len() > MAX_PROGRESSION_LEN {
        return Err(RequestValidationError::TooLong(raw_chords.len()));
    }

    let outcome = validate_chords(raw_chords);
    if !outcome.all_valid {
        let failures = raw_chords
            .iter()
            .zip(outcome.validations)
            .enumerate()
            .filter(|(_, (_, validation))| !validation.is_valid)
            .map(|(index, (chord, validation))| ChordFailure {
                index,
                chord: chord.clone(),
                validation,
            })
            .collect();
        return Err(RequestValidationError::InvalidChords {
            total: raw_chords.len(),
            failures,
        });
    }

    Ok(AnalysisRequest {
        chords: raw_chords
            .iter()
            .map(|chord| normalize_for_transport(chord.trim()))
            .collect(),
        tonalities_to_test: tonalities_to_test.to_vec(),
        theme,
    })
}
