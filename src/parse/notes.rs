//! Primary notation tokenizer
//!
//! Scans a note group's concatenated primary content left to right. Non-note
//! prefixes (custos, attributes, bars, line breaks, spacing) are recognized
//! before pitch letters. After a pitch, a single greedy pass consumes shape
//! and modifier tokens and stops at the first character it does not know,
//! leaving it for the outer scan. There is no backtracking.

use crate::diagnostics::Diagnostic;
use crate::models::{
    is_pitch_letter, Attribute, Custos, LineBreak, LiquescentKind, Note, NoteModifier, NoteShape,
};
use crate::text::Position;

use super::errors::ParseIssue;
use super::position_map::PositionMap;

/// Attributes whose value is code for an external renderer
const VERBATIM_ATTRIBUTES: [&str; 4] = ["nv", "gv", "ev", "alt"];

/// Everything the tokenizer found in one note group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenizedNotes {
    pub notes: Vec<Note>,
    pub custos: Option<Custos>,
    pub attributes: Vec<Attribute>,
    pub line_break: Option<LineBreak>,
    pub issues: Vec<Diagnostic>,
}

/// Tokenize primary content whose characters are located by `map`
pub fn tokenize_notes(content: &str, map: &PositionMap) -> TokenizedNotes {
    NoteTokenizer::new(content, map).run()
}

/// True when `text` tokenizes as primary notation without unknown characters
pub fn is_clean_primary(text: &str) -> bool {
    let map = PositionMap::contiguous(text, Position::zero());
    tokenize_notes(text, &map).issues.is_empty()
}

struct NoteTokenizer<'a> {
    chars: Vec<char>,
    map: &'a PositionMap,
    pos: usize,
    /// Index of the first note inside an open `@[ … ]` fusion group
    fusion_group: Option<usize>,
    out: TokenizedNotes,
}

impl<'a> NoteTokenizer<'a> {
    fn new(content: &str, map: &'a PositionMap) -> Self {
        Self {
            chars: content.chars().collect(),
            map,
            pos: 0,
            fusion_group: None,
            out: TokenizedNotes::default(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn next_is(&self, ahead: usize, pred: impl Fn(char) -> bool) -> bool {
        self.peek_at(ahead).map_or(false, pred)
    }

    fn run(mut self) -> TokenizedNotes {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => self.pos += 1,
                '/' => self.spacing(),
                '`' | '!' => self.pos += 1,
                '@' => self.fusion_marker(),
                ']' if self.fusion_group.is_some() => {
                    self.fusion_group = None;
                    self.pos += 1;
                }
                'z' if self.peek_at(1) == Some('0') => self.auto_custos(),
                'z' | 'Z' => self.line_break(),
                '+' if self.next_is(1, is_pitch_letter) => self.explicit_custos(),
                '[' => self.attribute(),
                ',' | ';' | ':' | '^' => self.bar(),
                '-' if self.next_is(1, is_pitch_letter) => self.note(),
                c if is_pitch_letter(c) => self.note(),
                other => {
                    let range = self.map.range(self.pos, self.pos + 1);
                    self.out
                        .issues
                        .push(ParseIssue::UnrecognizedCharacter(other).at(range));
                    self.pos += 1;
                }
            }
        }
        self.out
    }

    /// `/`, `//`, `/0`, `/!` and `/[n]`
    fn spacing(&mut self) {
        while self.peek() == Some('/') {
            self.pos += 1;
        }
        match self.peek() {
            Some('0') | Some('!') => self.pos += 1,
            Some('[') => {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == ']' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    /// Separated `@`: fuse with the preceding note, or open an `@[` group
    fn fusion_marker(&mut self) {
        self.pos += 1;
        if self.peek() == Some('[') {
            self.pos += 1;
            self.fusion_group = Some(self.out.notes.len());
            return;
        }
        match self.out.notes.last_mut() {
            Some(note) if !note.has_fusion() => note.modifiers.push(NoteModifier::Fusion),
            Some(_) => {}
            None => log::trace!("fusion marker before the first note of a group"),
        }
    }

    fn auto_custos(&mut self) {
        let range = self.map.range(self.pos, self.pos + 2);
        self.pos += 2;
        self.out.custos = Some(Custos { pitch: None, range });
    }

    fn explicit_custos(&mut self) {
        let pitch = self.peek_at(1).map(|c| c.to_ascii_lowercase());
        let range = self.map.range(self.pos, self.pos + 2);
        self.pos += 2;
        self.out.custos = Some(Custos { pitch, range });
    }

    fn line_break(&mut self) {
        let start = self.pos;
        let ragged = self.peek() == Some('Z');
        self.pos += 1;
        let suffix = match self.peek() {
            Some(c @ ('+' | '-')) => {
                self.pos += 1;
                Some(c)
            }
            _ => None,
        };
        self.out.line_break = Some(LineBreak {
            ragged,
            suffix,
            range: self.map.range(start, self.pos),
        });
    }

    /// Bar glyphs inside a group are recognized and skipped
    fn bar(&mut self) {
        let c = self.peek();
        self.pos += 1;
        let follow = self.peek();
        let extra = match (c, follow) {
            (Some(':'), Some(':' | '?' | '\'')) => true,
            (Some(';'), Some('1'..='8')) => true,
            (Some(','), Some('_' | '0')) => true,
            _ => false,
        };
        if extra {
            self.pos += 1;
        }
    }

    /// `[name]` or `[name:value]`, value taken verbatim up to the first `]`
    fn attribute(&mut self) {
        let start = self.pos;
        self.pos += 1;
        let close = self.chars[self.pos..].iter().position(|&c| c == ']');
        let Some(offset) = close else {
            let rest: String = self.chars[self.pos..].iter().collect();
            self.pos = self.chars.len();
            let range = self.map.range(start, self.pos);
            self.out
                .issues
                .push(ParseIssue::UnterminatedAttribute(rest).at(range));
            return;
        };

        let inner: String = self.chars[self.pos..self.pos + offset].iter().collect();
        self.pos += offset + 1;
        let (name, value) = match inner.split_once(':') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (inner, None),
        };
        let verbatim = VERBATIM_ATTRIBUTES.contains(&name.as_str());
        self.out.attributes.push(Attribute {
            name,
            value,
            verbatim,
            range: self.map.range(start, self.pos),
        });
    }

    fn note(&mut self) {
        let start = self.pos;
        let mut modifiers = Vec::new();
        if self.peek() == Some('-') {
            modifiers.push(NoteModifier::InitioDebilis);
            self.pos += 1;
        }

        let Some(letter) = self.peek() else {
            return;
        };
        self.pos += 1;
        let mut shape = if letter.is_ascii_uppercase() {
            if self.next_is(0, |c| matches!(c, '0'..='2')) {
                self.pos += 1;
            }
            NoteShape::PunctumInclinatum
        } else {
            NoteShape::Punctum
        };

        self.modifiers(&mut shape, &mut modifiers);

        let mut note = Note::new(letter, shape, self.map.range(start, self.pos));
        note.modifiers = modifiers;

        if let Some(first) = self.fusion_group {
            if self.out.notes.len() > first {
                if let Some(prev) = self.out.notes.last_mut() {
                    if !prev.has_fusion() {
                        prev.modifiers.push(NoteModifier::Fusion);
                    }
                }
            }
        }
        self.out.notes.push(note);
    }

    /// Count extra repeats of `letter` (bivirga, tristropha, ...)
    fn repeats(&mut self, letter: char, max_extra: usize) {
        let mut extra = 0;
        while extra < max_extra && self.peek() == Some(letter) {
            self.pos += 1;
            extra += 1;
        }
    }

    fn optional(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        let c = self.peek().filter(|&c| pred(c))?;
        self.pos += 1;
        Some(c)
    }

    fn modifiers(&mut self, shape: &mut NoteShape, modifiers: &mut Vec<NoteModifier>) {
        while let Some(c) = self.peek() {
            match c {
                'v' => {
                    self.pos += 1;
                    *shape = NoteShape::Virga;
                    self.repeats('v', 2);
                }
                'V' => {
                    self.pos += 1;
                    *shape = NoteShape::VirgaReversa;
                }
                'o' | 'O' => {
                    self.pos += 1;
                    *shape = NoteShape::Oriscus;
                    if c == 'O' {
                        modifiers.push(NoteModifier::OriscusScapus);
                    }
                    self.optional(|d| matches!(d, '0' | '1'));
                }
                'w' | 'W' => {
                    self.pos += 1;
                    *shape = NoteShape::Quilisma;
                    if c == 'W' {
                        modifiers.push(NoteModifier::Quadratum);
                    }
                }
                'q' => {
                    self.pos += 1;
                    modifiers.push(NoteModifier::Quadratum);
                }
                's' => {
                    self.pos += 1;
                    *shape = NoteShape::Stropha;
                    self.repeats('s', 2);
                }
                'r' => {
                    self.pos += 1;
                    match self.optional(|d| matches!(d, '0'..='8')) {
                        Some(d @ '1'..='8') => modifiers.push(NoteModifier::RhythmicSign {
                            sign: d as u8 - b'0',
                        }),
                        _ => *shape = NoteShape::Cavum,
                    }
                }
                '=' => {
                    self.pos += 1;
                    *shape = NoteShape::Linea;
                }
                'x' | 'y' => {
                    self.pos += 1;
                    *shape = if c == 'x' {
                        NoteShape::Flat
                    } else {
                        NoteShape::Natural
                    };
                    if self.optional(|d| d == '?').is_some() {
                        modifiers.push(NoteModifier::Parenthesized);
                    }
                }
                '#' => {
                    self.pos += 1;
                    *shape = NoteShape::Sharp;
                    if self.optional(|d| d == '#').is_some() {
                        modifiers.push(NoteModifier::SoftSharp);
                    }
                    if self.optional(|d| d == '?').is_some() {
                        modifiers.push(NoteModifier::Parenthesized);
                    }
                }
                '.' => {
                    self.pos += 1;
                    let double = self.optional(|d| d == '.').is_some();
                    modifiers.push(NoteModifier::PunctumMora { double });
                }
                '_' => {
                    self.pos += 1;
                    let mut positions = Vec::new();
                    while let Some(d) = self.optional(|d| matches!(d, '0'..='5')) {
                        positions.push(d as u8 - b'0');
                    }
                    modifiers.push(NoteModifier::HorizontalEpisema { positions });
                }
                '\'' => {
                    self.pos += 1;
                    let position = self
                        .optional(|d| matches!(d, '0' | '1'))
                        .map(|d| d as u8 - b'0');
                    modifiers.push(NoteModifier::VerticalEpisema { position });
                }
                '~' | '<' | '>' => {
                    self.pos += 1;
                    let kind = match c {
                        '~' => LiquescentKind::Deminutus,
                        '<' => LiquescentKind::Ascending,
                        _ => LiquescentKind::Descending,
                    };
                    modifiers.push(NoteModifier::Liquescent { kind });
                    if *shape == NoteShape::Punctum {
                        *shape = NoteShape::Liquescent;
                    }
                }
                // `@[` opens a fusion group; the outer scan handles it
                '@' if self.peek_at(1) != Some('[') => {
                    self.pos += 1;
                    modifiers.push(NoteModifier::Fusion);
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Range;

    fn tokenize(content: &str) -> TokenizedNotes {
        let map = PositionMap::contiguous(content, Position::new(0, 1));
        tokenize_notes(content, &map)
    }

    fn shapes(content: &str) -> Vec<NoteShape> {
        tokenize(content).notes.iter().map(|n| n.shape).collect()
    }

    #[test]
    fn test_plain_punctums() {
        let out = tokenize("fgh");
        assert_eq!(out.notes.len(), 3);
        assert!(out.issues.is_empty());
        assert_eq!(out.notes[1].pitch, 'g');
        assert_eq!(
            out.notes[1].range,
            Range::new(Position::new(0, 2), Position::new(0, 3))
        );
    }

    #[test]
    fn test_shapes() {
        assert_eq!(shapes("gv"), vec![NoteShape::Virga]);
        assert_eq!(shapes("gV"), vec![NoteShape::VirgaReversa]);
        assert_eq!(shapes("go1"), vec![NoteShape::Oriscus]);
        assert_eq!(shapes("gw"), vec![NoteShape::Quilisma]);
        assert_eq!(shapes("gr"), vec![NoteShape::Cavum]);
        assert_eq!(shapes("g="), vec![NoteShape::Linea]);
        assert_eq!(
            shapes("gxhyi#"),
            vec![NoteShape::Flat, NoteShape::Natural, NoteShape::Sharp]
        );
    }

    #[test]
    fn test_bivirga_and_tristropha_extend_range_only() {
        let out = tokenize("gvvhsss");
        assert_eq!(out.notes.len(), 2);
        assert_eq!(out.notes[0].range.len(), 3);
        assert!(out.notes[0].modifiers.is_empty());
        assert_eq!(out.notes[1].shape, NoteShape::Stropha);
        assert_eq!(out.notes[1].range.len(), 4);
    }

    #[test]
    fn test_punctuation_modifiers() {
        let out = tokenize("g.._12'1");
        let note = &out.notes[0];
        assert_eq!(
            note.modifiers,
            vec![
                NoteModifier::PunctumMora { double: true },
                NoteModifier::HorizontalEpisema { positions: vec![1, 2] },
                NoteModifier::VerticalEpisema { position: Some(1) },
            ]
        );
        assert_eq!(note.range.len(), 8);
    }

    #[test]
    fn test_initio_debilis_and_liquescence() {
        let out = tokenize("-fg~");
        assert_eq!(out.notes[0].modifiers, vec![NoteModifier::InitioDebilis]);
        assert_eq!(out.notes[0].range.len(), 2);
        assert_eq!(out.notes[1].shape, NoteShape::Liquescent);
    }

    #[test]
    fn test_rhythmic_sign_versus_cavum() {
        let out = tokenize("gr3hr");
        assert_eq!(out.notes[0].shape, NoteShape::Punctum);
        assert_eq!(out.notes[0].modifiers, vec![NoteModifier::RhythmicSign { sign: 3 }]);
        assert_eq!(out.notes[1].shape, NoteShape::Cavum);
    }

    #[test]
    fn test_alteration_variants() {
        let out = tokenize("g##?");
        assert_eq!(
            out.notes[0].modifiers,
            vec![NoteModifier::SoftSharp, NoteModifier::Parenthesized]
        );
    }

    #[test]
    fn test_fusion_markers() {
        let out = tokenize("f@g h @ i");
        assert!(out.notes[0].has_fusion());
        assert!(!out.notes[1].has_fusion());
        assert!(out.notes[2].has_fusion());
        // Separated marker does not stretch the note
        assert_eq!(out.notes[2].range.len(), 1);
    }

    #[test]
    fn test_fusion_group() {
        let out = tokenize("@[fgh]i");
        let fused: Vec<bool> = out.notes.iter().map(|n| n.has_fusion()).collect();
        assert_eq!(fused, vec![true, true, false, false]);
        assert!(out.issues.is_empty());
    }

    #[test]
    fn test_custos_and_line_break() {
        let out = tokenize("z0");
        assert!(out.custos.unwrap().is_auto());

        let out = tokenize("+g Z-");
        assert_eq!(out.custos.unwrap().pitch, Some('g'));
        let lb = out.line_break.unwrap();
        assert!(lb.ragged);
        assert_eq!(lb.suffix, Some('-'));
        assert!(out.notes.is_empty());
    }

    #[test]
    fn test_attributes() {
        let out = tokenize("f[shape:stroke]g[nv:\\x{y]");
        assert_eq!(out.notes.len(), 2);
        assert_eq!(out.attributes[0].name, "shape");
        assert_eq!(out.attributes[0].value.as_deref(), Some("stroke"));
        assert!(!out.attributes[0].verbatim);
        assert!(out.attributes[1].verbatim);
        assert_eq!(out.attributes[1].value.as_deref(), Some("\\x{y"));
    }

    #[test]
    fn test_unterminated_attribute() {
        let out = tokenize("f[oh");
        assert_eq!(out.notes.len(), 1);
        assert_eq!(out.issues.len(), 1);
        assert_eq!(out.issues[0].code, "unterminated-attribute");
    }

    #[test]
    fn test_bars_are_skipped_and_unknowns_reported() {
        let out = tokenize("f;3 g::");
        assert_eq!(out.notes.len(), 2);
        assert!(out.issues.is_empty());

        let out = tokenize("f*g");
        assert_eq!(out.notes.len(), 2);
        assert_eq!(out.issues[0].code, "unrecognized-character");
    }

    #[test]
    fn test_clean_primary() {
        assert!(is_clean_primary("fgh"));
        assert!(!is_clean_primary("pu"));
        assert!(!is_clean_primary("ta"));
    }
}
