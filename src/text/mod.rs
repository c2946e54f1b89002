//! Layer 0: Source text positions
//!
//! Pure text positions and scanning with no knowledge of chant notation.
//! Every range produced by the parser is expressed in these coordinates.
//!
//! ## Modules
//!
//! - `cursor`: Editor-convention positions, ranges, and the scanning cursor

pub mod cursor;

// Re-exports for convenience
pub use cursor::{Position, Range, Scanner};
