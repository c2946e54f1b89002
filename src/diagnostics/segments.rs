//! Structural diagnostics: line breaks and NABC segment counts

use crate::models::{ParsedDocument, NABC_LINES_HEADER};

use super::{Diagnostic, GroupContext};

/// A line break on the very first syllable
pub fn line_break_on_first_syllable(document: &ParsedDocument) -> Vec<Diagnostic> {
    document
        .syllables
        .first()
        .and_then(|s| s.line_break.as_ref())
        .map(|lb| {
            vec![Diagnostic::error(
                lb.range,
                "line-break-on-first-syllable",
                "Line break on the first syllable",
            )]
        })
        .unwrap_or_default()
}

/// NABC snippets used without declaring `nabc-lines`
pub fn nabc_without_lines_header(document: &ParsedDocument) -> Vec<Diagnostic> {
    if document.header(NABC_LINES_HEADER).is_some() {
        return Vec::new();
    }
    document
        .note_groups()
        .find(|g| g.has_auxiliary())
        .and_then(|g| g.auxiliary_ranges.first())
        .map(|range| {
            vec![Diagnostic::error(
                *range,
                "nabc-without-lines-header",
                "NABC notation is used but header 'nabc-lines' is missing",
            )]
        })
        .unwrap_or_default()
}

/// Each NABC cycle must carry exactly the declared number of lines
pub fn segment_count_mismatch(ctx: &GroupContext<'_>) -> Vec<Diagnostic> {
    let Some(declared) = ctx.document.nabc_lines_in_effect() else {
        return Vec::new();
    };
    ctx.group
        .auxiliary_cycles
        .iter()
        .filter(|&&found| found != declared)
        .map(|found| {
            Diagnostic::error(
                ctx.group.range,
                "segment-count-mismatch",
                format!(
                    "NABC segment count mismatch: declared {}, found {}",
                    declared, found
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::analyze;
    use crate::parse::{parse_document, parse_document_with_config, ParserConfig};

    fn codes(text: &str) -> Vec<String> {
        analyze(&parse_document(text))
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn test_line_break_on_first_syllable() {
        let doc = parse_document("name: x;\n%%\n(z)");
        let diags = line_break_on_first_syllable(&doc);
        assert_eq!(diags.len(), 1);

        let doc = parse_document("name: x;\n%%\n(c4) A(f) (z)");
        assert!(line_break_on_first_syllable(&doc).is_empty());
    }

    #[test]
    fn test_nabc_without_header() {
        let found = codes("name: x;\n%%\n(f|vi)");
        assert!(found.contains(&"nabc-without-lines-header".to_string()));
        assert!(!found.contains(&"segment-count-mismatch".to_string()));
    }

    #[test]
    fn test_matching_counts_are_quiet() {
        let found = codes("name: x;\nnabc-lines: 1;\n%%\n(e|ta|f|vi)");
        assert!(!found.contains(&"segment-count-mismatch".to_string()));
    }

    #[test]
    fn test_host_override_without_header() {
        let config = ParserConfig { nabc_lines: Some(1) };
        let doc = parse_document_with_config("name: x;\n%%\n(f|vi|pu)", &config);
        let mismatches: Vec<_> = analyze(&doc)
            .into_iter()
            .filter(|d| d.code == "segment-count-mismatch")
            .collect();
        assert_eq!(mismatches.len(), 1);
        assert!(mismatches[0].message.contains("declared 1"));
        assert!(mismatches[0].message.contains("found 2"));
    }

    #[test]
    fn test_two_lines_declared_one_found() {
        let doc = parse_document("name: x;\nnabc-lines: 2;\n%%\n(f|vi)");
        let diags: Vec<_> = analyze(&doc)
            .into_iter()
            .filter(|d| d.code == "segment-count-mismatch")
            .collect();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("declared 2"));
        assert!(diags[0].message.contains("found 1"));
    }
}
