//! Parsed document structure
//!
//! The document owns every syllable, note group and diagnostic produced by
//! one parse call. Re-parsing produces a fresh document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::barlines::{Bar, LineBreak};
use super::clef::Clef;
use super::glyphs::GlyphChain;
use super::notes::Note;
use crate::diagnostics::Diagnostic;
use crate::text::Range;

/// Header carrying the declared number of NABC lines per note
pub const NABC_LINES_HEADER: &str = "nabc-lines";

/// Header naming the piece
pub const NAME_HEADER: &str = "name";

/// One `name: value;` occurrence, in source order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderEntry {
    /// Lower-cased header name
    pub name: String,
    pub value: String,
    pub range: Range,
}

/// `%` comment, text without the leading `%`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub range: Range,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Custos {
    /// None for the automatic custos (`z0`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<char>,
    pub range: Range,
}

impl Custos {
    pub fn is_auto(&self) -> bool {
        self.pitch.is_none()
    }
}

/// Bracketed attribute `[name]` or `[name:value]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Value is code handed to an external renderer
    #[serde(default)]
    pub verbatim: bool,
    pub range: Range,
}

/// Music of one parenthesized body
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteGroup {
    /// All primary segments concatenated in encounter order
    pub primary_content: String,
    pub auxiliary_segments: Vec<String>,
    /// Source range of each auxiliary segment
    pub auxiliary_ranges: Vec<Range>,
    /// Descriptor chains, index-aligned with `auxiliary_segments`
    pub auxiliary_parsed: Vec<Vec<GlyphChain>>,
    /// Auxiliary lines following each primary snippet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub auxiliary_cycles: Vec<usize>,
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custos: Option<Custos>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Parenthesized body including the parentheses
    pub range: Range,
}

impl NoteGroup {
    pub fn has_auxiliary(&self) -> bool {
        !self.auxiliary_segments.is_empty()
    }

    pub fn last_note(&self) -> Option<&Note> {
        self.notes.last()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Syllable {
    /// Text with markup stripped
    pub text: String,
    /// Text with markup retained, when it differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styled_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clef: Option<Clef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar: Option<Bar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_break: Option<LineBreak>,
    pub note_groups: Vec<NoteGroup>,
    pub range: Range,
}

impl Syllable {
    pub fn last_note(&self) -> Option<&Note> {
        self.note_groups.iter().rev().find_map(|g| g.last_note())
    }
}

/// Result of parsing one document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Lower-cased name → value, last write wins
    pub headers: BTreeMap<String, String>,
    /// Every header occurrence in source order
    pub header_entries: Vec<HeaderEntry>,
    pub syllables: Vec<Syllable>,
    pub comments: Vec<Comment>,
    pub parse_errors: Vec<Diagnostic>,
    /// Auxiliary lines per note used by the parser, from the host or the header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nabc_lines: Option<usize>,
}

impl ParsedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Value of `nabc-lines` when present and a positive integer
    pub fn declared_nabc_lines(&self) -> Option<usize> {
        self.header(NABC_LINES_HEADER)?
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n > 0)
    }

    /// Lines per note the analyzer checks against: the parser's value, else the header
    pub fn nabc_lines_in_effect(&self) -> Option<usize> {
        self.nabc_lines.or_else(|| self.declared_nabc_lines())
    }

    pub fn note_groups(&self) -> impl Iterator<Item = &NoteGroup> {
        self.syllables.iter().flat_map(|s| s.note_groups.iter())
    }
}
