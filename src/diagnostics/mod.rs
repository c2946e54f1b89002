//! Diagnostics module for chant notation
//!
//! Diagnostic types shared by the parser (syntax-level parse errors) and the
//! semantic analyzer. The analyzer is a registry of independent rule
//! functions; each rule sees either the whole document or one note group
//! together with the note that preceded it in the previous syllable.

pub mod headers;
pub mod nabc;
pub mod neumes;
pub mod segments;

use serde::{Deserialize, Serialize};

use crate::models::{Note, NoteGroup, ParsedDocument, Syllable};
use crate::text::Range;

/// Severity level for diagnostics
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

/// A diagnostic highlighting an issue at a specific range
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    pub range: Range,
    pub severity: DiagnosticSeverity,
    /// Stable identifier (e.g., "segment-count-mismatch")
    pub code: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        range: Range,
        severity: DiagnosticSeverity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            range,
            severity,
            code: code.into(),
        }
    }

    pub fn error(range: Range, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Error, code, message)
    }

    pub fn warning(range: Range, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Warning, code, message)
    }

    pub fn info(range: Range, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(range, DiagnosticSeverity::Info, code, message)
    }
}

/// Collection of diagnostics for an entire document
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Extend with multiple diagnostics
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(diagnostics);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Errors first, then warnings, then info; source order within a severity
    pub fn sorted(mut self) -> Vec<Diagnostic> {
        self.items
            .sort_by(|a, b| (a.severity, a.range.start).cmp(&(b.severity, b.range.start)));
        self.items
    }
}

/// Analyzer configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Diagnostic codes to suppress
    pub disabled_rules: Vec<String>,
}

impl AnalyzerConfig {
    pub fn is_enabled(&self, code: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == code)
    }
}

/// What a note-group rule sees
pub struct GroupContext<'a> {
    pub document: &'a ParsedDocument,
    pub syllable: &'a Syllable,
    pub syllable_index: usize,
    pub group: &'a NoteGroup,
    /// Last note of the immediately preceding syllable
    pub previous_note: Option<&'a Note>,
}

pub type DocumentRule = fn(&ParsedDocument) -> Vec<Diagnostic>;
pub type GroupRule = fn(&GroupContext<'_>) -> Vec<Diagnostic>;

/// Whole-document rules
pub const DOCUMENT_RULES: &[DocumentRule] = &[
    headers::missing_name_header,
    headers::duplicate_headers,
    headers::invalid_nabc_lines,
    segments::line_break_on_first_syllable,
    segments::nabc_without_lines_header,
];

/// Per-note-group rules
pub const GROUP_RULES: &[GroupRule] = &[
    segments::segment_count_mismatch,
    nabc::conflicting_liquescence,
    nabc::invalid_pitch_descriptor,
    neumes::ornament_without_following_note,
    neumes::oriscus_scapus_neighbors,
    neumes::quilisma_equal_or_lower,
    neumes::quilisma_pes_preceded_by_higher,
    neumes::stratus_followed_by_higher,
    neumes::quilisma_fusion_suggestion,
];

/// Run every rule over the document
pub fn analyze(document: &ParsedDocument) -> Vec<Diagnostic> {
    analyze_with_config(document, &AnalyzerConfig::default())
}

/// Run every enabled rule over the document
pub fn analyze_with_config(document: &ParsedDocument, config: &AnalyzerConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Diagnostics::new();

    for rule in DOCUMENT_RULES {
        diagnostics.extend(rule(document));
    }

    let mut previous_note: Option<&Note> = None;
    for (syllable_index, syllable) in document.syllables.iter().enumerate() {
        for group in &syllable.note_groups {
            let ctx = GroupContext {
                document,
                syllable,
                syllable_index,
                group,
                previous_note,
            };
            for rule in GROUP_RULES {
                diagnostics.extend(rule(&ctx));
            }
        }
        previous_note = syllable.last_note();
    }

    diagnostics.items.retain(|d| config.is_enabled(&d.code));
    log::debug!(
        "analyze: {} syllables, {} diagnostics",
        document.syllables.len(),
        diagnostics.items.len()
    );
    diagnostics.sorted()
}

/// Parse errors and semantic diagnostics together, in analyzer order
pub fn collect_all(document: &ParsedDocument, config: &AnalyzerConfig) -> Vec<Diagnostic> {
    let mut all = Diagnostics::new();
    all.extend(document.parse_errors.iter().cloned());
    all.extend(analyze_with_config(document, config));
    all.sorted()
}
