//! Static tonality color palettes for light and dark themes.
//!
//! One {stroke, fill, label} triple per tonality name per theme, fixed at
//! build time. Enharmonic pairs (C#/Db, ...) share a triple, and each minor
//! key shares the triple of its relative major, so the palette is really
//! keyed by pitch-class material.

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::ThemeMode;

/// Color triple for one tonality in one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TonalityColors {
    pub stroke: &'static str,
    pub fill: &'static str,
    pub label: &'static str,
}

/// Which member of the triple to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorVariant {
    Stroke,
    Fill,
    Label,
}

/// Neutral fallback for unknown or absent tonalities, light theme.
pub const FALLBACK_LIGHT: &str = "#999999";
/// Neutral fallback for unknown or absent tonalities, dark theme.
pub const FALLBACK_DARK: &str = "#666666";

struct PaletteRow {
    /// Every spelling that resolves to this triple: the major key, its
    /// enharmonic spellings, the relative minor, and its enharmonics.
    names: &'static [&'static str],
    light: TonalityColors,
    dark: TonalityColors,
}

macro_rules! triple {
    ($stroke:literal, $fill:literal, $label:literal) => {
        TonalityColors {
            stroke: $stroke,
            fill: $fill,
            label: $label,
        }
    };
}

static PALETTE_ROWS: [PaletteRow; 12] = [
    PaletteRow {
        names: &["C Major", "A Minor"],
        light: triple!("#4dabf7", "#a5d8ff", "#1971c2"),
        dark: triple!("#56a2e8", "#154163", "#74b9ff"),
    },
    PaletteRow {
        names: &["C# Major", "Db Major", "A# Minor", "Bb Minor"],
        light: triple!("#5BC3BA", "#ACE5DD", "#248883"),
        dark: triple!("#479d99", "#0d3e37", "#6bccc7"),
    },
    PaletteRow {
        names: &["D Major", "B Minor"],
        light: triple!("#69db7c", "#b2f2bb", "#2f9e44"),
        dark: triple!("#3a994c", "#0d3712", "#51cf66"),
    },
    PaletteRow {
        names: &["D# Major", "Eb Major", "C Minor"],
        light: triple!("#B4D85C", "#D9EFAA", "#909522"),
        dark: triple!("#797d1a", "#2b2f00", "#a3a821"),
    },
    PaletteRow {
        names: &["E Major", "C# Minor", "Db Minor"],
        light: triple!("#ffd43b", "#ffec99", "#f08c00"),
        dark: triple!("#d69e2e", "#5f3a00", "#fcc419"),
    },
    PaletteRow {
        names: &["F Major", "D Minor"],
        light: triple!("#ffa94d", "#ffd8a8", "#e8590c"),
        dark: triple!("#f17634", "#4d2b02", "#ff8c42"),
    },
    PaletteRow {
        names: &["F# Major", "Gb Major", "D# Minor", "Eb Minor"],
        light: triple!("#FF986A", "#FFD1B9", "#E4451F"),
        dark: triple!("#ff7c5c", "#a14922", "#ff9472"),
    },
    PaletteRow {
        names: &["G Major", "E Minor"],
        light: triple!("#ff8787", "#ffc9c9", "#e03131"),
        dark: triple!("#ff8383", "#5b2c2c", "#ff9999"),
    },
    PaletteRow {
        names: &["G# Major", "Ab Major", "F Minor"],
        light: triple!("#FB859A", "#FEC6D0", "#D12B47"),
        dark: triple!("#ff8ac9", "#cc59a2", "#ffa8d4"),
    },
    PaletteRow {
        names: &["A Major", "F# Minor", "Gb Minor"],
        light: triple!("#f783ac", "#fcc2d7", "#c2255c"),
        dark: triple!("#ff92ff", "#e466f7", "#ffb3ff"),
    },
    PaletteRow {
        names: &["A# Major", "Bb Major", "G Minor"],
        light: triple!("#E97DCF", "#F5C0E9", "#AF2E89"),
        dark: triple!("#db9cff", "#3a2f56", "#e5b3ff"),
    },
    PaletteRow {
        names: &["B Major", "G# Minor", "Ab Minor"],
        light: triple!("#da77f2", "#eebefa", "#9c36b5"),
        dark: triple!("#b0a7ff", "#8385fd", "#c7c2ff"),
    },
];

lazy_static! {
    static ref LIGHT_PALETTE: HashMap<String, TonalityColors> = build_palette(ThemeMode::Light);
    static ref DARK_PALETTE: HashMap<String, TonalityColors> = build_palette(ThemeMode::Dark);
}

fn build_palette(theme: ThemeMode) -> HashMap<String, TonalityColors> {
    let mut palette = HashMap::new();
    for row in &PALETTE_ROWS {
        let colors = match theme {
            ThemeMode::Light => row.light,
            ThemeMode::Dark => row.dark,
        };
        for name in row.names {
            palette.insert(name.to_lowercase(), colors);
        }
    }
    palette
}

/// Resolve one color for a tonality.
///
/// Name matching is case-insensitive ("A minor" and "A Minor" resolve the
/// same). Unknown or absent tonalities get the theme's neutral fallback;
/// this never fails, so rendering cannot break on an unrecognized key.
pub fn color_of(tonality: Option<&str>, variant: ColorVariant, theme: ThemeMode) -> &'static str {
    let fallback = match theme {
        ThemeMode::Light => FALLBACK_LIGHT,
        ThemeMode::Dark => FALLBACK_DARK,
    };

    let name = match tonality {
        Some(name) => name,
        None => return fallback,
    };

    let palette = match theme {
        ThemeMode::Light => &*LIGHT_PALETTE,
        ThemeMode::Dark => &*DARK_PALETTE,
    };

    match palette.get(&name.to_lowercase()) {
        Some(colors) => match variant {
            ColorVariant::Stroke => colors.stroke,
            ColorVariant::Fill => colors.fill,
            ColorVariant::Label => colors.label,
        },
        None => fallback,
    }
}
