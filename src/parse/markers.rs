//! Clef and bar recognition
//!
//! Constant-size checks against a note group's primary content: a clef must
//! be the whole content, a bar only its prefix. Matches are translated back
//! to source ranges through the position map.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Bar, BarKind, Clef, ClefKind};

use super::position_map::PositionMap;

lazy_static! {
    static ref CLEF_RE: Regex =
        Regex::new(r"^\s*([cf])(b?)([1-5])(?:@([cf])(b?)([1-5]))?\s*$").expect("valid clef pattern");
    static ref BAR_RE: Regex =
        Regex::new(r"^\s*(::|:\?|:'|:|;[1-8]|;|,_|,0|,|\^|`)").expect("valid bar pattern");
}

/// Char index of a byte offset
fn char_index(content: &str, byte: usize) -> usize {
    content[..byte].chars().count()
}

fn clef_kind(letter: &str) -> ClefKind {
    if letter == "f" {
        ClefKind::F
    } else {
        ClefKind::C
    }
}

/// Whole-content clef such as `c4`, `cb3` or `c4@f3`
pub fn recognize_clef(content: &str, map: &PositionMap) -> Option<Clef> {
    let caps = CLEF_RE.captures(content)?;
    let first = caps.get(1)?;
    let line = caps.get(3)?;
    let last = caps.get(6).unwrap_or(line);

    let linked = match (caps.get(4), caps.get(6)) {
        (Some(kind), Some(line)) => Some(Box::new(Clef {
            kind: clef_kind(kind.as_str()),
            line: line.as_str().parse().ok()?,
            flat: caps.get(5).map_or(false, |m| !m.as_str().is_empty()),
            linked: None,
            range: map.range(char_index(content, kind.start()), char_index(content, line.end())),
        })),
        _ => None,
    };

    log::trace!("clef recognized: {:?}", content.trim());
    Some(Clef {
        kind: clef_kind(first.as_str()),
        line: line.as_str().parse().ok()?,
        flat: caps.get(2).map_or(false, |m| !m.as_str().is_empty()),
        linked,
        range: map.range(char_index(content, first.start()), char_index(content, last.end())),
    })
}

/// Bar at the start of the content
pub fn recognize_bar(content: &str, map: &PositionMap) -> Option<Bar> {
    let caps = BAR_RE.captures(content)?;
    let m = caps.get(1)?;
    let kind = BarKind::parse(m.as_str())?;
    let range = map.range(char_index(content, m.start()), char_index(content, m.end()));
    Some(Bar::new(kind, range))
}
