//! Regex validation of typed chord input, with suggestions for near-misses.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    /// The triad grammar, one pattern per quality.
    static ref TRIAD_PATTERNS: [Regex; 3] = [
        // Major chords
        Regex::new(r"^[A-G][#♯b♭]?$").unwrap(),
        // Minor chords
        Regex::new(r"^[A-G][#♯b♭]?m$").unwrap(),
        // Diminished chords
        Regex::new(r"^[A-G][#♯b♭]?(dim|°)$").unwrap(),
    ];
    static ref LEADING_NOTE: Regex = Regex::new(r"^[A-G][#♯b♭]?").unwrap();
}

/// Outcome of validating a single chord string.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl ChordValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
            suggestions: None,
        }
    }

    fn invalid(message: &str, suggestions: Option<Vec<String>>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.to_string()),
            suggestions,
        }
    }
}

/// Validate a chord symbol string against the triad grammar.
///
/// Empty input gets a dedicated message. Invalid non-empty input gets up to
/// three suggestions, formed by pairing the detected leading note (and
/// accidental, if any) with each triad quality suffix.
pub fn validate_chord(chord: &str) -> ChordValidation {
    let trimmed = chord.trim();
    if trimmed.is_empty() {
        return ChordValidation::invalid("Chord cannot be empty", None);
    }

    if TRIAD_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed)) {
        return ChordValidation::valid();
    }

    ChordValidation::invalid("Invalid chord format", generate_suggestions(trimmed))
}

fn generate_suggestions(input: &str) -> Option<Vec<String>> {
    let uppercased: String = input
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .into_iter()
        .chain(input.chars().skip(1))
        .collect();

    let base = LEADING_NOTE.find(&uppercased)?.as_str();
    Some(vec![
        base.to_string(),
        format!("{}m", base),
        format!("{}dim", base),
    ])
}

/// Outcome of validating a whole progression.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordsValidation {
    pub all_valid: bool,
    pub validations: Vec<ChordValidation>,
    pub valid_chords: Vec<String>,
}

/// Validate every chord in a progression.
pub fn validate_chords(chords: &[String]) -> ChordsValidation {
    let validations: Vec<ChordValidation> = chords.iter().map(|c| validate_chord(c)).collect();
    let all_valid = validations.iter().all(|v| v.is_valid);
    let valid_chords = chords
        .iter()
        .zip(validations.iter())
        .filter(|(_, v)| v.is_valid)
        .map(|(c, _)| c.clone())
        .collect();

    ChordsValidation {
        all_valid,
        validations,
        valid_chords,
    }
}
