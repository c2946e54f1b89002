//! Header diagnostics

use std::collections::HashSet;

use crate::models::{ParsedDocument, NABC_LINES_HEADER, NAME_HEADER};
use crate::text::Range;

use super::Diagnostic;

/// Missing `name:` header
pub fn missing_name_header(document: &ParsedDocument) -> Vec<Diagnostic> {
    if document.header(NAME_HEADER).is_some() {
        return Vec::new();
    }
    vec![Diagnostic::warning(
        Range::default(),
        "missing-name-header",
        "Missing required header 'name'",
    )]
}

/// Every repeated occurrence of a header name
pub fn duplicate_headers(document: &ParsedDocument) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    document
        .header_entries
        .iter()
        .filter(|entry| !seen.insert(entry.name.as_str()))
        .map(|entry| {
            Diagnostic::warning(
                entry.range,
                "duplicate-header",
                format!("Duplicate header '{}'; the last value is used", entry.name),
            )
        })
        .collect()
}

/// `nabc-lines` present but not a positive integer
pub fn invalid_nabc_lines(document: &ParsedDocument) -> Vec<Diagnostic> {
    let Some(value) = document.header(NABC_LINES_HEADER) else {
        return Vec::new();
    };
    if document.declared_nabc_lines().is_some() {
        return Vec::new();
    }
    let range = document
        .header_entries
        .iter()
        .rev()
        .find(|e| e.name == NABC_LINES_HEADER)
        .map(|e| e.range)
        .unwrap_or_default();
    vec![Diagnostic::warning(
        range,
        "invalid-nabc-lines",
        format!("Header 'nabc-lines' must be a positive integer, found '{}'", value),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_document;

    #[test]
    fn test_name_present() {
        let doc = parse_document("name: Kyrie;\n%%\n(f)");
        assert!(missing_name_header(&doc).is_empty());
    }

    #[test]
    fn test_name_missing() {
        let doc = parse_document("mode: 1;\n%%\n(f)");
        let diags = missing_name_header(&doc);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "missing-name-header");
    }

    #[test]
    fn test_duplicate_header_reported_once_per_repeat() {
        let doc = parse_document("name: A;\nName: B;\nname: C;\n%%\n");
        let diags = duplicate_headers(&doc);
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].range.start.line, 1);
        assert_eq!(doc.header("name"), Some("C"));
    }

    #[test]
    fn test_invalid_nabc_lines() {
        let doc = parse_document("nabc-lines: two;\n%%\n");
        assert_eq!(invalid_nabc_lines(&doc).len(), 1);

        let doc = parse_document("nabc-lines: 2;\n%%\n");
        assert!(invalid_nabc_lines(&doc).is_empty());
    }
}
