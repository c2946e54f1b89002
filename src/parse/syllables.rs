//! Body segmentation
//!
//! Splits the body into syllables: a text run followed by at most one
//! parenthesized note group. Inside a group, `|` switches between the primary
//! notation and the auxiliary (NABC) lines. Primary snippets are concatenated
//! and tracked through a `PositionMap`; each auxiliary line is parsed on its
//! own with its original origin.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{NoteGroup, ParsedDocument, Syllable};
use crate::text::{Position, Range, Scanner};

use super::errors::ParseIssue;
use super::markers::{recognize_bar, recognize_clef};
use super::nabc::{is_clean_nabc, NabcParser};
use super::notes::{is_clean_primary, tokenize_notes};
use super::position_map::PositionMap;
use super::read_comment;

lazy_static! {
    static ref MARKUP_RE: Regex = Regex::new(r"</?[a-zA-Z]+>|[{}]").expect("valid markup pattern");
}

/// Which notation the next run of a note group belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Primary notation; `after_cycle` when an auxiliary cycle just ended
    Primary { after_cycle: bool },
    /// Extra auxiliary line taken in a primary slot; the next pipe is swallowed
    Overflow,
    /// Auxiliary line number `taken` of the current cycle
    Auxiliary { taken: usize },
}

/// Auxiliary line being collected
#[derive(Debug, Clone)]
struct AuxBuffer {
    text: String,
    start: Position,
    end: Position,
}

impl AuxBuffer {
    fn at(start: Position) -> Self {
        Self {
            text: String::new(),
            start,
            end: start,
        }
    }
}

/// Group under construction
struct GroupBuilder {
    group: NoteGroup,
    map: PositionMap,
    slot: Slot,
    buffer: Option<AuxBuffer>,
}

pub struct SyllableParser<'a> {
    scanner: &'a mut Scanner,
    doc: &'a mut ParsedDocument,
    arity: usize,
}

impl<'a> SyllableParser<'a> {
    pub fn new(scanner: &'a mut Scanner, doc: &'a mut ParsedDocument, arity: usize) -> Self {
        Self {
            scanner,
            doc,
            arity: arity.max(1),
        }
    }

    /// Parse syllables until the end of input
    pub fn parse(mut self) {
        while let Some(c) = self.scanner.peek() {
            if c.is_whitespace() {
                self.scanner.bump();
            } else if c == '%' {
                let comment = read_comment(self.scanner);
                self.doc.comments.push(comment);
            } else {
                self.syllable();
            }
        }
    }

    fn syllable(&mut self) {
        let start = self.scanner.position();
        let raw = self.text_run();
        let mut syllable = Syllable::default();

        let trimmed = raw.trim();
        let plain = MARKUP_RE.replace_all(trimmed, "").into_owned();
        if plain != trimmed {
            syllable.styled_text = Some(trimmed.to_string());
        }
        syllable.text = plain;

        if self.scanner.peek() == Some('(') {
            self.note_group(&mut syllable);
        } else if syllable.text.is_empty() && syllable.styled_text.is_none() {
            // Nothing but whitespace and comments
            return;
        }

        syllable.range = Range::new(start, self.scanner.position());
        self.doc.syllables.push(syllable);
    }

    /// Literal text up to the next unescaped `(`
    fn text_run(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.scanner.peek() {
            match c {
                '(' => break,
                '$' => {
                    self.scanner.bump();
                    if let Some(escaped) = self.scanner.bump() {
                        text.push(escaped);
                    }
                }
                '%' => {
                    let comment = read_comment(self.scanner);
                    self.doc.comments.push(comment);
                }
                ')' => {
                    let pos = self.scanner.position();
                    self.scanner.bump();
                    let range = Range::new(pos, self.scanner.position());
                    self.doc
                        .parse_errors
                        .push(ParseIssue::UnmatchedClosingParenthesis.at(range));
                    text.push(c);
                }
                _ => {
                    text.push(c);
                    self.scanner.bump();
                }
            }
        }
        text
    }

    fn note_group(&mut self, syllable: &mut Syllable) {
        let open = self.scanner.position();
        self.scanner.bump();
        let mut builder = GroupBuilder {
            group: NoteGroup::default(),
            map: PositionMap::new(),
            slot: Slot::Primary { after_cycle: false },
            buffer: None,
        };

        let closed = loop {
            match self.scanner.peek() {
                None => break false,
                Some(')') => {
                    self.finish_aux_line(&mut builder);
                    self.scanner.bump();
                    break true;
                }
                Some('|') => self.pipe(&mut builder),
                Some('%') => {
                    let comment = read_comment(self.scanner);
                    if let Some(buffer) = builder.buffer.as_mut() {
                        // Keep auxiliary columns aligned with the source
                        let width: usize = comment.text.chars().map(char::len_utf16).sum();
                        buffer.text.extend(std::iter::repeat(' ').take(width + 1));
                        buffer.end = self.scanner.position();
                    }
                    self.doc.comments.push(comment);
                }
                Some(_) => self.run(&mut builder),
            }
        };

        if !closed {
            self.finish_aux_line(&mut builder);
            let range = Range::new(open, open.advance('('));
            self.doc
                .parse_errors
                .push(ParseIssue::UnclosedParenthesis.at(range));
        }

        let GroupBuilder { mut group, map, .. } = builder;
        group.range = Range::new(open, self.scanner.position());
        group.primary_content = map.text();

        if let Some(clef) = recognize_clef(&group.primary_content, &map) {
            syllable.clef = Some(clef);
        } else {
            syllable.bar = recognize_bar(&group.primary_content, &map);
            let tokens = tokenize_notes(&group.primary_content, &map);
            group.notes = tokens.notes;
            group.custos = tokens.custos;
            group.attributes = tokens.attributes;
            syllable.line_break = tokens.line_break;
            self.doc.parse_errors.extend(tokens.issues);
        }
        syllable.note_groups.push(group);
    }

    /// Maximal run of characters that are not `|`, `)` or `%`
    fn run(&mut self, builder: &mut GroupBuilder) {
        let start = self.scanner.position();
        let mut chars = Vec::new();
        while let Some(c) = self.scanner.peek() {
            if matches!(c, '|' | ')' | '%') {
                break;
            }
            chars.push((c, self.scanner.position()));
            self.scanner.bump();
        }
        let text: String = chars.iter().map(|(c, _)| *c).collect();

        match builder.slot {
            Slot::Auxiliary { .. } => {
                if let Some(buffer) = builder.buffer.as_mut() {
                    buffer.text.push_str(&text);
                    buffer.end = self.scanner.position();
                }
            }
            Slot::Primary { after_cycle: true } if is_overflow(&text) => {
                log::debug!("extra NABC line '{}' after a complete cycle", text.trim());
                let buffer = AuxBuffer {
                    text,
                    start,
                    end: self.scanner.position(),
                };
                self.push_aux_line(builder, buffer);
                builder.slot = Slot::Overflow;
            }
            _ => {
                if !text.trim().is_empty() {
                    builder.slot = Slot::Primary { after_cycle: false };
                }
                for (c, pos) in chars {
                    builder.map.push(c, pos);
                }
            }
        }
    }

    fn pipe(&mut self, builder: &mut GroupBuilder) {
        self.scanner.bump();
        let after = self.scanner.position();
        builder.slot = match builder.slot {
            Slot::Primary { .. } => {
                builder.group.auxiliary_cycles.push(0);
                builder.buffer = Some(AuxBuffer::at(after));
                Slot::Auxiliary { taken: 0 }
            }
            Slot::Overflow => Slot::Primary { after_cycle: true },
            Slot::Auxiliary { taken } => {
                self.finish_aux_line(builder);
                if taken + 1 >= self.arity {
                    Slot::Primary { after_cycle: true }
                } else {
                    builder.buffer = Some(AuxBuffer::at(after));
                    Slot::Auxiliary { taken: taken + 1 }
                }
            }
        };
    }

    fn finish_aux_line(&mut self, builder: &mut GroupBuilder) {
        if let Some(buffer) = builder.buffer.take() {
            self.push_aux_line(builder, buffer);
        }
    }

    fn push_aux_line(&mut self, builder: &mut GroupBuilder, buffer: AuxBuffer) {
        let (descriptors, issues) = NabcParser::new(&buffer.text, buffer.start).parse();
        self.doc.parse_errors.extend(issues);

        let group = &mut builder.group;
        group.auxiliary_segments.push(buffer.text);
        group.auxiliary_ranges.push(Range::new(buffer.start, buffer.end));
        group.auxiliary_parsed.push(descriptors);
        match group.auxiliary_cycles.last_mut() {
            Some(count) => *count += 1,
            None => group.auxiliary_cycles.push(1),
        }
    }
}

/// A primary-slot run that reads as NABC and not as primary notation
fn is_overflow(text: &str) -> bool {
    is_clean_nabc(text) && !is_clean_primary(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str, arity: usize) -> ParsedDocument {
        let mut doc = ParsedDocument::new();
        let mut scanner = Scanner::new(text);
        SyllableParser::new(&mut scanner, &mut doc, arity).parse();
        doc
    }

    #[test]
    fn test_text_and_groups() {
        let doc = parse("(c4) Ky(f)ri(g)e(h)", 1);
        assert_eq!(doc.syllables.len(), 4);
        assert!(doc.syllables[0].clef.is_some());
        assert!(doc.syllables[0].note_groups[0].notes.is_empty());
        let texts: Vec<_> = doc.syllables.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["", "Ky", "ri", "e"]);
        assert_eq!(
            doc.syllables[1].range,
            Range::new(Position::new(0, 5), Position::new(0, 10))
        );
    }

    #[test]
    fn test_markup_and_escapes() {
        let doc = parse("<i>A</i>{men}(f) $(x$)(g)", 1);
        assert_eq!(doc.syllables[0].text, "Amen");
        assert_eq!(doc.syllables[0].styled_text.as_deref(), Some("<i>A</i>{men}"));
        assert_eq!(doc.syllables[1].text, "(x)");
        assert!(doc.syllables[1].styled_text.is_none());
        assert!(doc.parse_errors.is_empty());
    }

    #[test]
    fn test_stray_closing_parenthesis() {
        let doc = parse("a)b(f)", 1);
        assert_eq!(doc.syllables[0].text, "a)b");
        assert_eq!(doc.parse_errors.len(), 1);
        assert_eq!(doc.parse_errors[0].code, "unmatched-closing-parenthesis");
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let doc = parse("A(fg", 1);
        assert_eq!(doc.syllables.len(), 1);
        assert_eq!(doc.syllables[0].note_groups[0].notes.len(), 2);
        assert_eq!(doc.parse_errors[0].code, "unclosed-parenthesis");
        assert_eq!(
            doc.parse_errors[0].range,
            Range::new(Position::new(0, 1), Position::new(0, 2))
        );
    }

    #[test]
    fn test_alternating_segments() {
        let doc = parse("(e|ta|f|vi)", 1);
        let group = &doc.syllables[0].note_groups[0];
        assert_eq!(group.primary_content, "ef");
        assert_eq!(group.auxiliary_segments, vec!["ta", "vi"]);
        assert_eq!(group.auxiliary_cycles, vec![1, 1]);
        assert_eq!(group.notes[1].range.start, Position::new(0, 6));
        assert_eq!(
            group.auxiliary_ranges[1],
            Range::new(Position::new(0, 8), Position::new(0, 10))
        );
        assert_eq!(group.auxiliary_parsed[1][0].root().unwrap().range.start, Position::new(0, 8));
    }

    #[test]
    fn test_multiple_auxiliary_lines() {
        let doc = parse("(f|vi|pu|g|ta|cl)", 2);
        let group = &doc.syllables[0].note_groups[0];
        assert_eq!(group.primary_content, "fg");
        assert_eq!(group.auxiliary_segments, vec!["vi", "pu", "ta", "cl"]);
        assert_eq!(group.auxiliary_cycles, vec![2, 2]);
    }

    #[test]
    fn test_extra_auxiliary_line_counts_in_cycle() {
        let doc = parse("(f|vi|pu)", 1);
        let group = &doc.syllables[0].note_groups[0];
        assert_eq!(group.primary_content, "f");
        assert_eq!(group.auxiliary_segments, vec!["vi", "pu"]);
        assert_eq!(group.auxiliary_cycles, vec![2]);
    }

    #[test]
    fn test_empty_auxiliary_slot() {
        let doc = parse("(f|)", 1);
        let group = &doc.syllables[0].note_groups[0];
        assert_eq!(group.auxiliary_segments, vec![""]);
        assert_eq!(group.auxiliary_cycles, vec![1]);
        assert!(group.auxiliary_parsed[0].is_empty());
    }

    #[test]
    fn test_bar_and_line_break() {
        let doc = parse("(::) (f) (z)", 1);
        assert!(doc.syllables[0].bar.is_some());
        assert!(doc.syllables[1].bar.is_none());
        assert!(doc.syllables[2].line_break.is_some());
    }

    #[test]
    fn test_comment_in_group() {
        let doc = parse("A(f % note\ng)", 1);
        assert_eq!(doc.comments.len(), 1);
        let notes = &doc.syllables[0].note_groups[0].notes;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].range.start, Position::new(1, 0));
    }

    #[test]
    fn test_bare_text_run() {
        let doc = parse("(f) tail", 1);
        assert_eq!(doc.syllables.len(), 2);
        assert_eq!(doc.syllables[1].text, "tail");
        assert!(doc.syllables[1].note_groups.is_empty());
    }
}
