//! Positions, ranges and the scanning cursor
//!
//! Positions follow the editor convention: zero-based line, and a zero-based
//! character offset counted in UTF-16 code units.

use serde::{Deserialize, Serialize};

/// A position in text (line, character)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }

    /// Create a position at (0, 0)
    pub fn zero() -> Self {
        Self { line: 0, character: 0 }
    }

    /// Position immediately after `ch` when `ch` starts at `self`
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.line + 1, 0)
        } else {
            Self::new(self.line, self.character + ch.len_utf16())
        }
    }
}

/// A range of text from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width range at a position
    pub fn empty(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Check if this range is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this range is on a single line
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Get the length in characters (only works for single-line ranges)
    pub fn len(&self) -> usize {
        if self.is_single_line() {
            self.end.character.saturating_sub(self.start.character)
        } else {
            0
        }
    }

    /// Check if a position is contained within this range
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Smallest range covering both
    pub fn cover(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Explicit scanning cursor over a document.
///
/// Owns the decoded characters plus the current offset and its editor
/// position. One scanner belongs to one parse call.
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    offset: usize,
    pos: Position,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self::with_origin(text, Position::zero())
    }

    /// Scanner whose first character sits at `origin` in some larger document
    pub fn with_origin(text: &str, origin: Position) -> Self {
        Self {
            chars: text.chars().collect(),
            offset: 0,
            pos: origin,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    pub fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.offset + ahead).copied()
    }

    /// True when the remaining input starts with `s`
    pub fn starts_with(&self, s: &str) -> bool {
        let mut i = self.offset;
        for ch in s.chars() {
            if self.chars.get(i) != Some(&ch) {
                return false;
            }
            i += 1;
        }
        true
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += 1;
        self.pos = self.pos.advance(ch);
        Some(ch)
    }

    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Consume characters while `pred` holds, returning them
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            out.push(ch);
            self.bump();
        }
        out
    }

    /// Consume up to (not including) the next newline
    pub fn take_line(&mut self) -> String {
        self.take_while(|c| c != '\n')
    }

    /// Text of the current line from the cursor to its end, without consuming
    pub fn rest_of_line(&self) -> String {
        self.chars[self.offset..]
            .iter()
            .take_while(|&&c| c != '\n')
            .collect()
    }

    /// True when the cursor is at the start of a line
    pub fn at_line_start(&self) -> bool {
        self.offset == 0 || self.chars.get(self.offset - 1) == Some(&'\n')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let p1 = Position::new(0, 5);
        let p2 = Position::new(0, 10);
        let p3 = Position::new(1, 0);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert!(p1 < p3);
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(Position::new(0, 2), Position::new(0, 5));

        assert!(range.contains(Position::new(0, 2)));
        assert!(range.contains(Position::new(0, 4)));
        assert!(!range.contains(Position::new(0, 5))); // Exclusive end
        assert!(!range.contains(Position::new(0, 1)));
    }

    #[test]
    fn test_scanner_tracks_lines_and_utf16_columns() {
        let mut scanner = Scanner::new("a\u{1D11E}\nb");
        scanner.bump();
        assert_eq!(scanner.position(), Position::new(0, 1));
        scanner.bump(); // surrogate pair
        assert_eq!(scanner.position(), Position::new(0, 3));
        scanner.bump();
        assert_eq!(scanner.position(), Position::new(1, 0));
        assert_eq!(scanner.peek(), Some('b'));
    }

    #[test]
    fn test_scanner_with_origin() {
        let mut scanner = Scanner::with_origin("vi", Position::new(3, 7));
        scanner.bump_n(2);
        assert!(scanner.is_eof());
        assert_eq!(scanner.position(), Position::new(3, 9));
    }

    #[test]
    fn test_starts_with_and_rest_of_line() {
        let mut scanner = Scanner::new("name: x;\n%%");
        assert!(scanner.starts_with("name"));
        scanner.bump_n(6);
        assert_eq!(scanner.rest_of_line(), "x;");
        assert!(!scanner.at_line_start());
    }
}
