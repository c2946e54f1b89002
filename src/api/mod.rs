//! Chant notation WASM API
//!
//! This module provides the JavaScript-facing API consumed by the editor
//! integration, plus JSON string variants for hosts without JS bindings.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and console logging
//! - `errors`: Errors raised while moving values across the host boundary
//! - `core`: Parse, analyze and validate exports

pub mod helpers;
pub mod errors;
pub mod core;

pub use self::core::*;
pub use errors::ApiError;
