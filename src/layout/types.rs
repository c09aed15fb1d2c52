// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for the keyboard layout payload.
//!
//! This module defines the error types produced while loading a layout, the
//! validation structures, and the immutable layout model itself: modes, rows
//! and key descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents layout from being used
    Error,
    /// Non-fatal issue that should be addressed
    Warning,
}

/// A validation issue discovered while loading a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the offending field (e.g., "alphameric[0][3].icon")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Error type for layout loading operations.
///
/// Wraps the different failure sources with enough context (file path, line
/// number, suggestion) to produce a helpful message.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error occurred while reading a layout or config file
    IoError {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// JSON parsing error
    JsonError {
        /// The underlying JSON parsing error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Fatal validation errors
    ValidationError {
        /// List of validation issues found
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },
}

impl ParseError {
    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
            suggestion: Some("Check that the file exists and you have read permissions".into()),
        }
    }

    /// Creates a JSON parsing error with context.
    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: None,
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a JSON parsing error with file path.
    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        match Self::json_error(source) {
            Self::JsonError {
                source,
                line_number,
                suggestion,
                ..
            } => Self::JsonError {
                source,
                file_path: Some(file_path.into()),
                line_number,
                suggestion,
            },
            other => other,
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation_error(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationError {
            issues,
            file_path: None,
        }
    }

    /// Attaches a file path to errors that do not carry one yet.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        match self {
            Self::ValidationError {
                issues,
                file_path: None,
            } => Self::ValidationError {
                issues,
                file_path: Some(path.into()),
            },
            Self::JsonError {
                source,
                file_path: None,
                line_number,
                suggestion,
            } => Self::JsonError {
                source,
                file_path: Some(path.into()),
                line_number,
                suggestion,
            },
            other => other,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IoError {
                source,
                file_path,
                suggestion,
            } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::JsonError {
                source,
                file_path,
                line_number,
                suggestion,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::ValidationError { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i + 1 < issues.len() {
                        writeln!(f)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoError { source, .. } => Some(source),
            ParseError::JsonError { source, .. } => Some(source),
            ParseError::ValidationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err)
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of successfully loading a layout with optional warnings.
///
/// The loader is permissive: a usable layout is returned even when non-fatal
/// validation issues are found.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully parsed layout
    pub layout: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with warnings.
    pub fn with_warnings(layout: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { layout, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the layout, discarding warnings.
    pub fn into_layout(self) -> T {
        self.layout
    }
}

// ============================================================================
// Layout Data Structures
// ============================================================================

/// Which of the two key sets is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Letters (with digits on long press)
    #[default]
    Alphameric,
    /// Digits and punctuation
    Punctuation,
}

impl LayoutMode {
    /// Both modes in rendering order.
    pub const ALL: [LayoutMode; 2] = [LayoutMode::Alphameric, LayoutMode::Punctuation];

    /// Returns the other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Alphameric => LayoutMode::Punctuation,
            LayoutMode::Punctuation => LayoutMode::Alphameric,
        }
    }

    /// Returns the payload key for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Alphameric => "alphameric",
            LayoutMode::Punctuation => "punctuation",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Special behavior of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    /// Literal key: inserts its display glyph
    #[default]
    None,
    /// Inserts a line break in multi-line fields
    Enter,
    /// Deletes one unit before the caret, repeats on long press
    Backspace,
    /// Inserts a single space
    Space,
    /// Switches between alphameric and punctuation
    ModeSwitch,
    /// Toggles the shifted glyphs
    CapsLock,
    /// Removes focus from the edited element
    Done,
}

impl KeyRole {
    /// Stable element id the host gives to keys with this role.
    #[must_use]
    pub fn element_id(self) -> Option<&'static str> {
        match self {
            KeyRole::None => None,
            KeyRole::Enter => Some("enter"),
            KeyRole::Backspace => Some("backspace"),
            KeyRole::Space => Some("spacebar"),
            KeyRole::ModeSwitch => Some("mode"),
            KeyRole::CapsLock => Some("capslock"),
            KeyRole::Done => Some("done"),
        }
    }
}

/// Immutable description of one key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDescriptor {
    /// Primary glyph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Glyph shown and inserted while caps lock is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_text: Option<String>,

    /// Glyph inserted on long press
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,

    /// Glyph inserted on long press while caps lock is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_cap_text: Option<String>,

    /// Name of an embedded icon asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Special behavior
    #[serde(default)]
    pub role: KeyRole,

    /// Disabled keys never activate
    #[serde(default, rename = "isDisabled")]
    pub disabled: bool,
}

impl KeyDescriptor {
    /// Creates a literal key with a primary and shifted glyph.
    pub fn literal(text: impl Into<String>, cap_text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            cap_text: Some(cap_text.into()),
            ..Self::default()
        }
    }

    /// Creates a key with the given role and no glyphs.
    pub fn with_role(role: KeyRole) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    /// Adds long-press glyphs.
    pub fn with_alt(mut self, alt_text: impl Into<String>, alt_cap_text: Option<&str>) -> Self {
        self.alt_text = Some(alt_text.into());
        self.alt_cap_text = alt_cap_text.map(str::to_string);
        self
    }

    /// Marks the key disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Glyph shown on the key and inserted on tap.
    ///
    /// Falls back to `text` when caps lock is on but no shifted glyph exists.
    #[must_use]
    pub fn display_glyph(&self, caps_locked: bool) -> Option<&str> {
        if caps_locked {
            if let Some(cap) = self.cap_text.as_deref() {
                return Some(cap);
            }
        }
        self.text.as_deref()
    }

    /// Glyph inserted on long press, if any.
    #[must_use]
    pub fn alt_glyph(&self, caps_locked: bool) -> Option<&str> {
        if caps_locked {
            if let Some(cap) = self.alt_cap_text.as_deref() {
                return Some(cap);
            }
        }
        self.alt_text.as_deref()
    }
}

/// Keys of one visual row, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyRow {
    /// Keys in rendering order
    pub keys: Vec<KeyDescriptor>,
}

impl KeyRow {
    /// Creates a row from its keys.
    pub fn new(keys: Vec<KeyDescriptor>) -> Self {
        Self { keys }
    }
}

/// Complete layout payload: the rows of both modes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Rows of the alphameric mode
    #[serde(default)]
    pub alphameric: Vec<KeyRow>,

    /// Rows of the punctuation mode
    #[serde(default)]
    pub punctuation: Vec<KeyRow>,
}

impl Layout {
    /// Returns the rows of the given mode.
    #[must_use]
    pub fn rows(&self, mode: LayoutMode) -> &[KeyRow] {
        match mode {
            LayoutMode::Alphameric => &self.alphameric,
            LayoutMode::Punctuation => &self.punctuation,
        }
    }

    /// Returns the number of keys across both modes.
    #[must_use]
    pub fn key_count(&self) -> usize {
        LayoutMode::ALL
            .iter()
            .flat_map(|mode| self.rows(*mode))
            .map(|row| row.keys.len())
            .sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_glyph_follows_caps_state() {
        let key = KeyDescriptor::literal("q", "Q");

        assert_eq!(key.display_glyph(false), Some("q"));
        assert_eq!(key.display_glyph(true), Some("Q"));
    }

    #[test]
    fn test_display_glyph_falls_back_without_cap_text() {
        let key = KeyDescriptor {
            text: Some("ü".to_string()),
            ..KeyDescriptor::default()
        };

        assert_eq!(key.display_glyph(true), Some("ü"));
    }

    #[test]
    fn test_alt_glyph_selection() {
        let both = KeyDescriptor::literal("q", "Q").with_alt("1", Some("!"));
        assert_eq!(both.alt_glyph(false), Some("1"));
        assert_eq!(both.alt_glyph(true), Some("!"));

        // "s" only defines altText; it is used in both caps states
        let plain = KeyDescriptor::literal("s", "S").with_alt("ß", None);
        assert_eq!(plain.alt_glyph(true), Some("ß"));

        let none = KeyDescriptor::literal("a", "A");
        assert_eq!(none.alt_glyph(false), None);
    }

    #[test]
    fn test_mode_toggle_is_involution() {
        for mode in LayoutMode::ALL {
            assert_eq!(mode.toggled().toggled(), mode);
            assert_ne!(mode.toggled(), mode);
        }
        assert_eq!(LayoutMode::default(), LayoutMode::Alphameric);
    }

    #[test]
    fn test_key_descriptor_json_field_names() {
        let json = r#"{"text": "7", "capText": "7", "altText": "{", "altCapText": "{"}"#;
        let key: KeyDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(key.role, KeyRole::None);
        assert_eq!(key.alt_cap_text.as_deref(), Some("{"));
        assert!(!key.disabled);

        let json = r#"{"role": "caps_lock", "icon": "capslock", "isDisabled": true}"#;
        let key: KeyDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(key.role, KeyRole::CapsLock);
        assert!(key.disabled);
        assert_eq!(key.text, None);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{"role": "hyper"}"#;
        assert!(serde_json::from_str::<KeyDescriptor>(json).is_err());
    }

    #[test]
    fn test_role_element_ids() {
        assert_eq!(KeyRole::Done.element_id(), Some("done"));
        assert_eq!(KeyRole::CapsLock.element_id(), Some("capslock"));
        assert_eq!(KeyRole::ModeSwitch.element_id(), Some("mode"));
        assert_eq!(KeyRole::Space.element_id(), Some("spacebar"));
        assert_eq!(KeyRole::None.element_id(), None);
    }

    #[test]
    fn test_layout_rows_by_mode() {
        let layout = Layout {
            alphameric: vec![KeyRow::new(vec![KeyDescriptor::literal("a", "A")])],
            punctuation: vec![
                KeyRow::new(vec![KeyDescriptor::literal("1", "1")]),
                KeyRow::new(vec![KeyDescriptor::with_role(KeyRole::Space)]),
            ],
        };

        assert_eq!(layout.rows(LayoutMode::Alphameric).len(), 1);
        assert_eq!(layout.rows(LayoutMode::Punctuation).len(), 2);
        assert_eq!(layout.key_count(), 3);
    }

    #[test]
    fn test_parse_error_display_includes_context() {
        let err = ParseError::validation_error(vec![
            ValidationIssue::new(Severity::Error, "Layout has no keys", "layout")
                .with_suggestion("Add at least one row"),
        ])
        .with_path("custom.json");

        let display = format!("{}", err);
        assert!(display.contains("custom.json"));
        assert!(display.contains("Layout has no keys"));
        assert!(display.contains("Suggestion"));
    }
}
