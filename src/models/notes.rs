//! Primary notation (GABC) note representation
//!
//! A note is a pitch letter plus a shape and an ordered list of modifiers,
//! carrying the exact source range it was read from.

use serde::{Deserialize, Serialize};

use crate::text::Range;

/// Pitch letters from lowest to highest; `p` is the reserved letter above `n`
pub const PITCH_LETTERS: [char; 15] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'p',
];

/// Case-insensitive pitch letter check
pub fn is_pitch_letter(c: char) -> bool {
    pitch_ordinal(c).is_some()
}

/// Pitch letter of an NABC `h` descriptor, lowercase only
pub fn is_nabc_pitch_letter(c: char) -> bool {
    PITCH_LETTERS.contains(&c)
}

/// Ordinal position in the pitch alphabet (a = 0)
pub fn pitch_ordinal(c: char) -> Option<u8> {
    let lower = c.to_ascii_lowercase();
    PITCH_LETTERS
        .iter()
        .position(|&p| p == lower)
        .map(|i| i as u8)
}

/// Note head shape
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteShape {
    Punctum,
    PunctumInclinatum,
    Virga,
    VirgaReversa,
    Oriscus,
    Quilisma,
    Stropha,
    Liquescent,
    Cavum,
    Linea,
    Flat,
    Sharp,
    Natural,
}

impl NoteShape {
    /// Alteration signs (flat/sharp/natural) are written as notes but sound no pitch
    pub fn is_alteration(&self) -> bool {
        matches!(self, NoteShape::Flat | NoteShape::Sharp | NoteShape::Natural)
    }
}

/// Direction of a liquescent ending
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LiquescentKind {
    /// `~`
    Deminutus,
    /// `<`
    Ascending,
    /// `>`
    Descending,
}

/// Note modifier, in the order written after the pitch
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NoteModifier {
    InitioDebilis,
    PunctumMora { double: bool },
    /// `_` with its bridge-position digits (0-5)
    HorizontalEpisema { positions: Vec<u8> },
    /// `'` with an optional ictus position (0/1)
    VerticalEpisema { position: Option<u8> },
    Liquescent { kind: LiquescentKind },
    OriscusScapus,
    Quadratum,
    Fusion,
    /// `r1`..`r8`
    RhythmicSign { sign: u8 },
    /// `?` after an alteration
    Parenthesized,
    /// `##`
    SoftSharp,
}

/// A single note of primary notation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Lowercase pitch letter
    pub pitch: char,
    pub shape: NoteShape,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<NoteModifier>,
    pub range: Range,
}

impl Note {
    pub fn new(pitch: char, shape: NoteShape, range: Range) -> Self {
        Self {
            pitch: pitch.to_ascii_lowercase(),
            shape,
            modifiers: Vec::new(),
            range,
        }
    }

    /// Ordinal of the pitch (a = 0), used for melodic comparisons
    pub fn ordinal(&self) -> u8 {
        pitch_ordinal(self.pitch).unwrap_or(0)
    }

    pub fn has_modifier(&self, modifier: &NoteModifier) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn has_fusion(&self) -> bool {
        self.has_modifier(&NoteModifier::Fusion)
    }

    pub fn is_quilisma(&self) -> bool {
        self.shape == NoteShape::Quilisma
    }

    pub fn is_oriscus_scapus(&self) -> bool {
        self.has_modifier(&NoteModifier::OriscusScapus)
    }

    pub fn is_quadratum(&self) -> bool {
        self.has_modifier(&NoteModifier::Quadratum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_ordinals() {
        assert_eq!(pitch_ordinal('a'), Some(0));
        assert_eq!(pitch_ordinal('N'), Some(13));
        assert_eq!(pitch_ordinal('p'), Some(14));
        assert_eq!(pitch_ordinal('o'), None);
        assert_eq!(pitch_ordinal('z'), None);
    }

    #[test]
    fn test_nabc_pitch_letters_are_lowercase() {
        assert!(is_nabc_pitch_letter('g'));
        assert!(is_nabc_pitch_letter('p'));
        assert!(!is_nabc_pitch_letter('G'));
        assert!(!is_nabc_pitch_letter('o'));
        assert!(is_pitch_letter('G'));
    }

    #[test]
    fn test_note_normalizes_pitch_case() {
        let note = Note::new('G', NoteShape::PunctumInclinatum, Range::default());
        assert_eq!(note.pitch, 'g');
        assert_eq!(note.ordinal(), 6);
    }
}
