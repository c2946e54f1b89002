//! Clef representation

use serde::{Deserialize, Serialize};

use crate::text::Range;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClefKind {
    C,
    F,
}

/// A `c`/`f` clef on a staff line, optionally flatted (`cb3`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clef {
    pub kind: ClefKind,
    /// Staff line, 1 = lowest
    pub line: u8,
    pub flat: bool,
    /// Second clef linked with `@` (`c4@f3`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked: Option<Box<Clef>>,
    pub range: Range,
}
