//! GABC Chant Notation WASM Module
//!
//! Parser and semantic analyzer for GABC chant notation with interleaved
//! NABC neume lines. It provides the document model, the parser, the
//! diagnostics engine and the JavaScript-facing API used by the editor.

pub mod text;
pub mod models;
pub mod parse;
pub mod diagnostics;
pub mod api;

// Re-export commonly used types
pub use diagnostics::{analyze, analyze_with_config, AnalyzerConfig, Diagnostic, DiagnosticSeverity};
pub use models::*;
pub use parse::{parse_document, parse_document_with_config, parse_nabc_segment, ParserConfig};
pub use text::{Position, Range};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        wasm_warn!("logger not initialized: {}", e);
    }

    log::info!("GABC notation WASM module initialized");
}
