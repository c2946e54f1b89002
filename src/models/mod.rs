//! Models module for the chant notation core
//!
//! This module contains all the data structures produced by a parse:
//! the document tree, notes of the primary notation and glyph descriptors
//! of the auxiliary notation.

pub mod barlines;
pub mod clef;
pub mod document;
pub mod glyphs;
pub mod notes;

// Re-export commonly used types
pub use barlines::*;
pub use clef::*;
pub use document::*;
pub use glyphs::*;
pub use notes::*;
