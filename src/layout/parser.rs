// SPDX-License-Identifier: GPL-3.0-only

//! Layout parsing logic for loading JSON layout payloads.
//!
//! This module provides functions for parsing layout payloads from JSON files
//! and strings, plus access to the bundled default layout.

use crate::layout::assets::{self, DEFAULT_LAYOUT_FILE};
use crate::layout::types::{Layout, ParseError, ParseResult, Severity, ValidationIssue};
use crate::layout::validation::validate_layout;
use std::fs;

/// Parses a keyboard layout from a JSON file.
///
/// Distinguishes I/O errors (missing file, permissions) from JSON errors
/// (malformed syntax, unknown role names) and validates the result.
///
/// # Example
///
/// ```rust,ignore
/// use wpe_keyboard::layout::parse_layout_file;
///
/// match parse_layout_file("/etc/wpe-keyboard/layout.json") {
///     Ok(result) => {
///         for warning in &result.warnings {
///             eprintln!("{}", warning);
///         }
///     }
///     Err(e) => eprintln!("Failed to parse layout: {}", e),
/// }
/// ```
pub fn parse_layout_file(path: &str) -> Result<ParseResult<Layout>, ParseError> {
    let json_str = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;

    let layout: Layout =
        serde_json::from_str(&json_str).map_err(|e| ParseError::json_error_with_path(e, path))?;

    validate_layout(layout).map_err(|e| e.with_path(path))
}

/// Parses a keyboard layout from a JSON string.
///
/// Use this when the payload is already in memory.
pub fn parse_layout_from_string(json: &str) -> Result<ParseResult<Layout>, ParseError> {
    let layout: Layout = serde_json::from_str(json).map_err(ParseError::json_error)?;

    validate_layout(layout)
}

/// Parses the bundled default layout.
///
/// # Errors
///
/// Only fails if the bundled payload itself is broken, which the test suite
/// guards against.
pub fn default_layout() -> Result<ParseResult<Layout>, ParseError> {
    let json = assets::layout_json(DEFAULT_LAYOUT_FILE).ok_or_else(|| {
        ParseError::validation_error(vec![ValidationIssue::new(
            Severity::Error,
            "Bundled layout is missing",
            DEFAULT_LAYOUT_FILE,
        )])
    })?;

    parse_layout_from_string(&json).map_err(|e| e.with_path(DEFAULT_LAYOUT_FILE))
}

// ============================================================================
// Tests
// ============================================================================
