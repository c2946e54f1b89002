//! Auxiliary (NABC) descriptor parser
//!
//! Each auxiliary segment is parsed on its own into a list of descriptor
//! chains. A chain is a root glyph with `!`-fused followers, stored flat in a
//! `GlyphChain`. Trailing `su`/`pp` ornament counts attach to the
//! root of the chain; a later one replaces an earlier one.

use crate::diagnostics::Diagnostic;
use crate::models::{
    BasicGlyph, GlyphChain, GlyphDescriptor, GlyphModifier, Ornament, OrnamentModifier, SignificantLetter,
    SignificantLetterKind,
};
use crate::text::{Position, Range, Scanner};

use super::errors::ParseIssue;

/// Run-length ornament prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrnamentPrefix {
    Subpunctis,
    Prepunctis,
}

/// Parser over one auxiliary segment
pub struct NabcParser {
    scanner: Scanner,
    issues: Vec<Diagnostic>,
    /// Start and text of the unparsable run being skipped
    garbage: Option<(Position, String)>,
}

impl NabcParser {
    pub fn new(text: &str, origin: Position) -> Self {
        Self {
            scanner: Scanner::with_origin(text, origin),
            issues: Vec::new(),
            garbage: None,
        }
    }

    /// Parse the whole segment. Consumes the parser; never fails.
    pub fn parse(mut self) -> (Vec<GlyphChain>, Vec<Diagnostic>) {
        let mut descriptors = Vec::new();
        while let Some(c) = self.scanner.peek() {
            if c.is_whitespace() || matches!(c, '/' | '`' | '!') {
                self.flush_garbage();
                self.scanner.bump();
                continue;
            }
            match self.descriptor() {
                Some(descriptor) => {
                    self.flush_garbage();
                    descriptors.push(descriptor);
                }
                None => self.skip_char(),
            }
        }
        self.flush_garbage();
        (descriptors, self.issues)
    }

    fn skip_char(&mut self) {
        let pos = self.scanner.position();
        if let Some(c) = self.scanner.bump() {
            self.garbage
                .get_or_insert_with(|| (pos, String::new()))
                .1
                .push(c);
        }
    }

    fn flush_garbage(&mut self) {
        if let Some((start, text)) = self.garbage.take() {
            let range = Range::new(start, self.scanner.position());
            log::debug!("unparsable NABC run '{}'", text);
            self.issues.push(ParseIssue::InvalidNabcGlyph(text).at(range));
        }
    }

    fn ornament_prefix(&self) -> Option<OrnamentPrefix> {
        if self.scanner.starts_with("su") {
            Some(OrnamentPrefix::Subpunctis)
        } else if self.scanner.starts_with("pp") {
            Some(OrnamentPrefix::Prepunctis)
        } else {
            None
        }
    }

    /// `su`/`pp`, optional modifier letter, count 1-9
    fn ornament(&mut self) -> Option<(OrnamentPrefix, Ornament)> {
        let prefix = self.ornament_prefix()?;
        let modifier = self.scanner.peek_at(2).and_then(OrnamentModifier::from_letter);
        let digit_at = if modifier.is_some() { 3 } else { 2 };
        let count = self
            .scanner
            .peek_at(digit_at)
            .and_then(|c| c.to_digit(10))
            .filter(|d| (1..=9).contains(d))?;
        self.scanner.bump_n(digit_at + 1);
        Some((
            prefix,
            Ornament {
                count: count as u8,
                modifier,
            },
        ))
    }

    fn glyph_code_ahead(&self) -> Option<BasicGlyph> {
        let a = self.scanner.peek()?;
        let b = self.scanner.peek_at(1)?;
        BasicGlyph::from_code(a, b)
    }

    /// One descriptor: a standalone ornament, or a fused chain of glyphs
    fn descriptor(&mut self) -> Option<GlyphChain> {
        let start = self.scanner.position();
        if let Some((prefix, ornament)) = self.ornament() {
            let mut descriptor = GlyphDescriptor::new(None, Range::new(start, self.scanner.position()));
            attach(&mut descriptor, prefix, ornament);
            return Some(GlyphChain::from_links(vec![descriptor]));
        }

        let mut links = vec![self.glyph()?];
        let mut end = self.scanner.position();
        while self.scanner.peek() == Some('!') {
            self.scanner.bump();
            if self.ornament_prefix().is_some() {
                break;
            }
            match self.glyph() {
                Some(link) => {
                    links.push(link);
                    end = self.scanner.position();
                }
                // Dangling `!`: the chain ends here
                None => break,
            }
        }

        for link in &mut links {
            link.range.end = end;
        }
        let mut chain = GlyphChain::from_links(links);

        while self.ornament_prefix().is_some() {
            match (self.ornament(), chain.root_mut()) {
                (Some((prefix, ornament)), Some(root)) => {
                    attach(root, prefix, ornament);
                    root.range.end = self.scanner.position();
                }
                _ => break,
            }
        }
        Some(chain)
    }

    /// A single chain link: code, modifiers, pitch, significant letters
    fn glyph(&mut self) -> Option<GlyphDescriptor> {
        let start = self.scanner.position();
        let glyph = self.glyph_code_ahead()?;
        self.scanner.bump_n(2);
        let mut descriptor = GlyphDescriptor::new(Some(glyph), Range::empty(start));

        while let Some(c) = self.scanner.peek() {
            if self.glyph_code_ahead().is_some() {
                break;
            }
            let modifier = match c {
                'S' => GlyphModifier::Mark,
                'G' => GlyphModifier::Grouping,
                'M' => GlyphModifier::Melodic,
                '-' => GlyphModifier::Episema,
                '>' => GlyphModifier::AugmentiveLiquescence,
                '~' => GlyphModifier::DiminutiveLiquescence,
                '0'..='9' => GlyphModifier::Variant {
                    digit: c as u8 - b'0',
                },
                _ => break,
            };
            descriptor.modifiers.push(modifier);
            self.scanner.bump();
        }

        if self.scanner.peek() == Some('h') {
            if let Some(pitch) = self.scanner.peek_at(1).filter(char::is_ascii_alphabetic) {
                descriptor.pitch = Some(pitch);
                self.scanner.bump_n(2);
            }
        }

        while let Some(letter) = self.significant_letter() {
            descriptor.significant_letters.push(letter);
        }

        descriptor.range.end = self.scanner.position();
        Some(descriptor)
    }

    /// `ls<code><1-9>` or `lt<code><1-9>` (no position 5 for Tironian notes)
    fn significant_letter(&mut self) -> Option<SignificantLetter> {
        let kind = if self.scanner.starts_with("ls") {
            SignificantLetterKind::SignificantLetter
        } else if self.scanner.starts_with("lt") {
            SignificantLetterKind::TironianNote
        } else {
            return None;
        };

        let mut code = String::new();
        let mut ahead = 2;
        let position = loop {
            let c = self.scanner.peek_at(ahead)?;
            if let Some(d) = c.to_digit(10) {
                break d;
            }
            if c.is_whitespace() || matches!(c, '!' | '/' | '`') {
                return None;
            }
            code.push(c);
            ahead += 1;
        };

        let forbidden = kind == SignificantLetterKind::TironianNote && position == 5;
        if code.is_empty() || position == 0 || forbidden {
            return None;
        }
        self.scanner.bump_n(ahead + 1);
        Some(SignificantLetter {
            kind,
            code,
            position: position as u8,
        })
    }
}

fn attach(descriptor: &mut GlyphDescriptor, prefix: OrnamentPrefix, ornament: Ornament) {
    match prefix {
        OrnamentPrefix::Subpunctis => descriptor.subpunctis = Some(ornament),
        OrnamentPrefix::Prepunctis => descriptor.prepunctis = Some(ornament),
    }
}

/// Parse one auxiliary segment whose first character sits at `origin`
/// (document start when absent). Syntax problems are logged and dropped;
/// use `NabcParser` to keep them.
pub fn parse_nabc_segment(text: &str, origin: Option<Position>) -> Vec<GlyphChain> {
    let (descriptors, issues) = NabcParser::new(text, origin.unwrap_or_default()).parse();
    if !issues.is_empty() {
        log::debug!("{} NABC issue(s) in '{}'", issues.len(), text);
    }
    descriptors
}

/// True when `text` is non-empty NABC without any unparsable run
pub fn is_clean_nabc(text: &str) -> bool {
    let (descriptors, issues) = NabcParser::new(text, Position::zero()).parse();
    !descriptors.is_empty() && issues.is_empty()
}
