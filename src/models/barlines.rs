//! Bars (divisiones) and line breaks
//!
//! Bars are recognized from the start of a note group's primary content;
//! line breaks come out of the note tokenizer.

use serde::{Deserialize, Serialize};

use crate::text::Range;

/// Bar types
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BarKind {
    /// `` ` ``
    Virgula,
    /// `^`
    DivisioMinimis,
    /// `,`
    DivisioMinima,
    /// `,_` or `,0`
    DivisioMinimaAlt,
    /// `;`
    DivisioMinor,
    /// `;1` .. `;8`
    DivisioMinorVariant { variant: u8 },
    /// `:`
    DivisioMaior,
    /// `:?`
    DivisioMaiorDotted,
    /// `:'`
    DivisioMaiorAlt,
    /// `::`
    DivisioFinalis,
}

impl BarKind {
    /// Parse bar from its source spelling
    pub fn parse(text: &str) -> Option<Self> {
        let kind = match text {
            "`" => BarKind::Virgula,
            "^" => BarKind::DivisioMinimis,
            "," => BarKind::DivisioMinima,
            ",_" | ",0" => BarKind::DivisioMinimaAlt,
            ";" => BarKind::DivisioMinor,
            ":" => BarKind::DivisioMaior,
            ":?" => BarKind::DivisioMaiorDotted,
            ":'" => BarKind::DivisioMaiorAlt,
            "::" => BarKind::DivisioFinalis,
            _ => {
                let digit = text.strip_prefix(';')?.parse::<u8>().ok()?;
                if !(1..=8).contains(&digit) {
                    return None;
                }
                BarKind::DivisioMinorVariant { variant: digit }
            }
        };
        Some(kind)
    }
}

/// Bar position and metadata
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub kind: BarKind,
    pub range: Range,
}

impl Bar {
    pub fn new(kind: BarKind, range: Range) -> Self {
        Self { kind, range }
    }
}

/// End-of-line marker (`z` justified, `Z` ragged)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineBreak {
    pub ragged: bool,
    /// `+` forces a custos, `-` suppresses it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<char>,
    pub range: Range,
}
