//! Triad chord symbol domain model.
//!
//! A chord symbol is a note letter, an optional accidental, and a triad
//! quality. Only the three triad qualities (major, minor, diminished) are
//! representable; anything else is rejected at parse/validation time.

mod validation;

pub use validation::{validate_chord, validate_chords, ChordValidation, ChordsValidation};

use std::fmt;

/// The seven note letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Note {
    pub const ALL: [Note; 7] = [
        Note::C,
        Note::D,
        Note::E,
        Note::F,
        Note::G,
        Note::A,
        Note::B,
    ];

    /// Parse a note letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Note::C),
            'D' => Some(Note::D),
            'E' => Some(Note::E),
            'F' => Some(Note::F),
            'G' => Some(Note::G),
            'A' => Some(Note::A),
            'B' => Some(Note::B),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Note::C => 'C',
            Note::D => 'D',
            Note::E => 'E',
            Note::F => 'F',
            Note::G => 'G',
            Note::A => 'A',
            Note::B => 'B',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Accidental {
    #[default]
    Natural,
    Sharp,
    Flat,
}

impl Accidental {
    pub const ALL: [Accidental; 3] = [Accidental::Natural, Accidental::Sharp, Accidental::Flat];

    /// Display glyph. Naturals render as nothing, not "♮".
    pub fn glyph(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "♯",
            Accidental::Flat => "♭",
        }
    }

    /// ASCII form used on the wire.
    pub fn ascii(&self) -> &'static str {
        match self {
            Accidental::Natural => "",
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
        }
    }
}

/// Triad quality. The only chord qualities this system models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    #[default]
    Major,
    Minor,
    Diminished,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Major, Quality::Minor, Quality::Diminished];

    pub fn suffix(&self) -> &'static str {
        match self {
            Quality::Major => "",
            Quality::Minor => "m",
            Quality::Diminished => "dim",
        }
    }

    /// Match a quality suffix. "°" is accepted as a diminished alias.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Quality::Major),
            "m" => Some(Quality::Minor),
            "dim" | "°" => Some(Quality::Diminished),
            _ => None,
        }
    }
}

/// A triad chord symbol, e.g. "F♯m".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChordSymbol {
    pub note: Note,
    pub accidental: Accidental,
    pub quality: Quality,
}

impl ChordSymbol {
    pub fn new(note: Note, accidental: Accidental, quality: Quality) -> Self {
        Self {
            note,
            accidental,
            quality,
        }
    }

    /// Parse a chord symbol string.
    ///
    /// The first character must be a note letter (any case). An optional
    /// accidental follows, in either Unicode (♯/♭) or ASCII (#/b) form. The
    /// remaining suffix must name a triad quality.
    pub fn parse(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        let note = Note::from_char(chars.next()?)?;

        let rest = chars.as_str();
        let (accidental, suffix) = if let Some(stripped) = rest.strip_prefix(['♯', '#']) {
            (Accidental::Sharp, stripped)
        } else if let Some(stripped) = rest.strip_prefix(['♭', 'b']) {
            (Accidental::Flat, stripped)
        } else {
            (Accidental::Natural, rest)
        };

        let quality = Quality::from_suffix(suffix)?;
        Some(Self::new(note, accidental, quality))
    }

    /// The ASCII form sent to the analysis backend.
    pub fn transport(&self) -> String {
        format!(
            "{}{}{}",
            self.note.letter(),
            self.accidental.ascii(),
            self.quality.suffix()
        )
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.note.letter(),
            self.accidental.glyph(),
            self.quality.suffix()
        )
    }
}

/// Replace Unicode accidentals with their ASCII equivalents (♯→#, ♭→b).
///
/// Identity on everything else, and idempotent. Every chord goes through
/// this immediately before an analysis request is built; the backend never
/// receives Unicode accidentals.
pub fn normalize_for_transport(symbol: &str) -> String {
    symbol.replace('♯', "#").replace('♭', "b")
}
