//! Tonality names and display styling.
//!
//! A tonality is a musical key ("C Major", "A Minor") used both as an
//! analysis hypothesis and as a color-coding key. Styling is deterministic:
//! every tonality maps to a fixed color triple per theme, and minor keys get
//! dashed borders.

mod colors;

pub use colors::{color_of, ColorVariant, TonalityColors, FALLBACK_DARK, FALLBACK_LIGHT};

use serde::{Deserialize, Serialize};

/// Light/dark rendering mode, independent of musical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Border style used for chord/tonality badges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    Solid,
    Dashed,
}

/// The canonical tonality names: 12 major and 12 minor keys.
///
/// Enharmonic spellings beyond these (e.g. "Db Major" for "C# Major") are
/// accepted by the palette as distinct keys with identical colors.
pub const CANONICAL_TONALITIES: [&str; 24] = [
    "C Major", "G Major", "D Major", "A Major", "E Major", "B Major", "F# Major", "Db Major",
    "Ab Major", "Eb Major", "Bb Major", "F Major", "A Minor", "E Minor", "B Minor", "F# Minor",
    "C# Minor", "G# Minor", "D# Minor", "Bb Minor", "F Minor", "C Minor", "G Minor", "D Minor",
];

pub fn all_tonalities() -> &'static [&'static str] {
    &CANONICAL_TONALITIES
}

/// Whether a tonality name denotes a minor key.
///
/// Case-insensitive substring test for "minor". This is a heuristic over
/// display names, not a parse of key grammar; chord qualities inside the
/// crate are carried structurally instead.
pub fn is_minor(tonality: Option<&str>) -> bool {
    match tonality {
        Some(name) => name.to_lowercase().contains("minor"),
        None => false,
    }
}

/// Dashed for minor keys, solid for everything else.
pub fn border_style_of(tonality: Option<&str>) -> BorderStyle {
    if is_minor(tonality) {
        BorderStyle::Dashed
    } else {
        BorderStyle::Solid
    }
}
