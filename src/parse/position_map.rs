//! Position map from concatenated primary content back to the source
//!
//! Primary notation of one note group may be split across several segments
//! by auxiliary lines. The tokenizer scans the concatenation; this map turns
//! each character index of the concatenation into its original position.

use crate::text::{Position, Range};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    starts: Vec<Position>,
    chars: Vec<char>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map for a contiguous text starting at `origin`
    pub fn contiguous(text: &str, origin: Position) -> Self {
        let mut map = Self::new();
        let mut pos = origin;
        for ch in text.chars() {
            map.push(ch, pos);
            pos = pos.advance(ch);
        }
        map
    }

    pub fn push(&mut self, ch: char, pos: Position) {
        self.chars.push(ch);
        self.starts.push(pos);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The concatenated content
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Original position of character `index`
    pub fn start(&self, index: usize) -> Position {
        match self.starts.get(index) {
            Some(pos) => *pos,
            None => self.end_of_content(),
        }
    }

    /// Original position just after character `index`
    pub fn end(&self, index: usize) -> Position {
        match (self.starts.get(index), self.chars.get(index)) {
            (Some(pos), Some(ch)) => pos.advance(*ch),
            _ => self.end_of_content(),
        }
    }

    /// Range of the concatenated characters `start..end` (end exclusive)
    pub fn range(&self, start: usize, end: usize) -> Range {
        if end <= start {
            let pos = self.start(start);
            return Range::empty(pos);
        }
        Range::new(self.start(start), self.end(end - 1))
    }

    fn end_of_content(&self) -> Position {
        match self.starts.len() {
            0 => Position::zero(),
            n => self.end(n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_segments_keep_original_positions() {
        // "(e|ta|f|vi)": primary 'e' at col 1, 'f' at col 6
        let mut map = PositionMap::new();
        map.push('e', Position::new(0, 1));
        map.push('f', Position::new(0, 6));

        assert_eq!(map.range(1, 2), Range::new(Position::new(0, 6), Position::new(0, 7)));
        assert_eq!(map.range(0, 2), Range::new(Position::new(0, 1), Position::new(0, 7)));
    }

    #[test]
    fn test_out_of_bounds_is_clamped() {
        let map = PositionMap::contiguous("ab", Position::new(2, 4));
        assert_eq!(map.start(5), Position::new(2, 6));
        assert!(map.range(2, 2).is_empty());
        assert_eq!(PositionMap::new().range(0, 1), Range::default());
    }
}
