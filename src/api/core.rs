//! WASM API for parsing and analyzing chant documents
//!
//! Every call is stateless: the editor hands over the full text on each
//! change and receives a fresh document or diagnostic list.

use wasm_bindgen::prelude::*;

use crate::api::errors::ApiError;
use crate::api::helpers::{deserialize, deserialize_or_default, serialize, serialize_array};
use crate::diagnostics::{analyze_with_config, collect_all, AnalyzerConfig, Diagnostic};
use crate::models::ParsedDocument;
use crate::parse::{parse_document_with_config, parse_nabc_segment, ParserConfig};
use crate::text::Position;
use crate::{wasm_info, wasm_log, wasm_warn};

// ============================================================================
// JS-facing exports
// ============================================================================

/// Parse a document
///
/// # Returns
/// `ParsedDocument` as a plain JavaScript object
#[wasm_bindgen(js_name = parseDocument)]
pub fn parse_document_js(text: &str) -> Result<JsValue, JsValue> {
    parse_document_with_config_js(text, JsValue::UNDEFINED)
}

/// Parse a document with host options (`{ nabcLines?: number }`)
#[wasm_bindgen(js_name = parseDocumentWithConfig)]
pub fn parse_document_with_config_js(text: &str, config: JsValue) -> Result<JsValue, JsValue> {
    wasm_info!("parseDocument called: {} chars", text.chars().count());

    let config: ParserConfig = deserialize_or_default(config, "Invalid parser config")?;
    let document = parse_document_with_config(text, &config);

    wasm_log!(
        "  {} syllables, {} parse errors",
        document.syllables.len(),
        document.parse_errors.len()
    );
    if !document.parse_errors.is_empty() {
        wasm_warn!("  document has {} parse errors", document.parse_errors.len());
    }
    serialize(&document, "Document serialization error")
}

/// Parse a single NABC snippet whose first character sits at `line`/`character`
///
/// # Returns
/// JavaScript array of glyph descriptor chains
#[wasm_bindgen(js_name = parseNabcSegment)]
pub fn parse_nabc_segment_js(
    text: &str,
    line: Option<u32>,
    character: Option<u32>,
) -> Result<js_sys::Array, JsValue> {
    wasm_info!("parseNabcSegment called: '{}'", text);

    let origin = match (line, character) {
        (None, None) => None,
        (line, character) => Some(Position::new(
            line.unwrap_or(0) as usize,
            character.unwrap_or(0) as usize,
        )),
    };
    let chains = parse_nabc_segment(text, origin);

    wasm_log!("  {} descriptor chains", chains.len());
    serialize_array(&chains, "Descriptor serialization error")
}

/// Run the semantic analyzer over a previously parsed document
///
/// # Parameters
/// - `document`: object returned by `parseDocument`
/// - `config`: optional `{ disabledRules: string[] }`
#[wasm_bindgen(js_name = analyzeDocument)]
pub fn analyze_document_js(document: JsValue, config: JsValue) -> Result<js_sys::Array, JsValue> {
    wasm_info!("analyzeDocument called");

    let document: ParsedDocument = deserialize(document, "Invalid document")?;
    let config: AnalyzerConfig = deserialize_or_default(config, "Invalid analyzer config")?;
    let diagnostics = analyze_with_config(&document, &config);

    wasm_log!("  {} diagnostics", diagnostics.len());
    serialize_array(&diagnostics, "Diagnostic serialization error")
}

/// Parse and analyze in one call: parse errors plus semantic diagnostics
#[wasm_bindgen(js_name = validateText)]
pub fn validate_text_js(text: &str) -> Result<js_sys::Array, JsValue> {
    wasm_info!("validateText called: {} chars", text.chars().count());

    let diagnostics = validate_text(text);

    wasm_log!("  {} diagnostics", diagnostics.len());
    serialize_array(&diagnostics, "Diagnostic serialization error")
}

// ============================================================================
// Native and JSON entry points
// ============================================================================

/// Parse errors and semantic diagnostics for `text`, sorted by severity then position
pub fn validate_text(text: &str) -> Vec<Diagnostic> {
    let document = parse_document_with_config(text, &ParserConfig::default());
    collect_all(&document, &AnalyzerConfig::default())
}

/// Parse to a JSON string. `config_json` may be empty.
pub fn parse_document_json(text: &str, config_json: &str) -> Result<String, ApiError> {
    let config: ParserConfig = if config_json.trim().is_empty() {
        ParserConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(|e| ApiError::invalid_json("parser config", e))?
    };
    log::info!("parse_document_json: {} chars", text.len());
    Ok(serde_json::to_string(&parse_document_with_config(text, &config))?)
}

/// Analyze a JSON document produced by `parse_document_json`
pub fn analyze_document_json(document_json: &str, config_json: &str) -> Result<String, ApiError> {
    let document: ParsedDocument =
        serde_json::from_str(document_json).map_err(|e| ApiError::invalid_json("document", e))?;
    let config: AnalyzerConfig = if config_json.trim().is_empty() {
        AnalyzerConfig::default()
    } else {
        serde_json::from_str(config_json).map_err(|e| ApiError::invalid_json("analyzer config", e))?
    };
    log::info!("analyze_document_json: {} syllables", document.syllables.len());
    Ok(serde_json::to_string(&analyze_with_config(&document, &config))?)
}

/// `validate_text` as a JSON array
pub fn validate_text_json(text: &str) -> Result<String, ApiError> {
    Ok(serde_json::to_string(&validate_text(text))?)
}
