//! Parse issues
//!
//! Syntax-level problems found while scanning. None of them stop the parse;
//! each is turned into a diagnostic on `ParsedDocument::parse_errors`.

use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::text::Range;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("Header '{name}' is not terminated by ';'")]
    UnterminatedHeader { name: String },

    #[error("Unclosed parenthesis")]
    UnclosedParenthesis,

    #[error("Unmatched closing parenthesis")]
    UnmatchedClosingParenthesis,

    #[error("Unrecognized character '{0}' in note group")]
    UnrecognizedCharacter(char),

    #[error("Attribute '[{0}' is not terminated by ']'")]
    UnterminatedAttribute(String),

    #[error("Unrecognized NABC glyph at '{0}'")]
    InvalidNabcGlyph(String),
}

impl ParseIssue {
    pub fn code(&self) -> &'static str {
        match self {
            ParseIssue::UnterminatedHeader { .. } => "unterminated-header",
            ParseIssue::UnclosedParenthesis => "unclosed-parenthesis",
            ParseIssue::UnmatchedClosingParenthesis => "unmatched-closing-parenthesis",
            ParseIssue::UnrecognizedCharacter(_) => "unrecognized-character",
            ParseIssue::UnterminatedAttribute(_) => "unterminated-attribute",
            ParseIssue::InvalidNabcGlyph(_) => "invalid-nabc-glyph",
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            ParseIssue::UnrecognizedCharacter(_) | ParseIssue::UnmatchedClosingParenthesis => {
                DiagnosticSeverity::Warning
            }
            _ => DiagnosticSeverity::Error,
        }
    }

    /// Attach a source range
    pub fn at(self, range: Range) -> Diagnostic {
        Diagnostic::new(range, self.severity(), self.code(), self.to_string())
    }
}
