//! Parsing module for GABC documents
//!
//! This module contains all the parsing logic for converting document text
//! into a `ParsedDocument`: headers, syllable segmentation, primary notation
//! tokenizing and the auxiliary (NABC) descriptor grammar.

pub mod errors;
pub mod headers;
pub mod markers;
pub mod nabc;
pub mod notes;
pub mod position_map;
pub mod syllables;

use serde::{Deserialize, Serialize};

use crate::models::{Comment, ParsedDocument};
use crate::text::{Range, Scanner};

// Re-export commonly used types
pub use errors::ParseIssue;
pub use nabc::{parse_nabc_segment, NabcParser};
pub use position_map::PositionMap;

/// Options supplied by the host rather than the document
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ParserConfig {
    /// Overrides the `nabc-lines` header
    pub nabc_lines: Option<usize>,
}

/// Parse a complete document with default options
pub fn parse_document(text: &str) -> ParsedDocument {
    parse_document_with_config(text, &ParserConfig::default())
}

/// Parse a complete document. Never fails: syntax problems are collected in
/// `ParsedDocument::parse_errors`.
pub fn parse_document_with_config(text: &str, config: &ParserConfig) -> ParsedDocument {
    let mut doc = ParsedDocument::new();
    let mut scanner = Scanner::new(text);

    if headers::has_separator(text) {
        headers::parse_headers(&mut scanner, &mut doc);
    }

    doc.nabc_lines = config
        .nabc_lines
        .or_else(|| doc.declared_nabc_lines())
        .map(|n| n.max(1));
    let arity = doc.nabc_lines.unwrap_or(1);
    syllables::SyllableParser::new(&mut scanner, &mut doc, arity).parse();

    log::debug!(
        "parsed {} header(s), {} syllable(s), {} parse error(s)",
        doc.header_entries.len(),
        doc.syllables.len(),
        doc.parse_errors.len()
    );
    doc
}

/// Consume a `%` comment up to (not including) the end of its line
pub(crate) fn read_comment(scanner: &mut Scanner) -> Comment {
    let start = scanner.position();
    scanner.bump();
    let mut text = scanner.take_line();
    if text.ends_with('\r') {
        text.pop();
    }
    let end = start.advance('%');
    let end = text.chars().fold(end, |pos, c| pos.advance(c));
    Comment {
        text,
        range: Range::new(start, end),
    }
}
