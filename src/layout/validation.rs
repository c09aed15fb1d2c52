// SPDX-License-Identifier: GPL-3.0-only

//! Validation rules for keyboard layout payloads.
//!
//! Validation is permissive: problems that still leave a usable keyboard are
//! collected as warnings, and only a layout without any key is rejected.

use crate::layout::assets;
use crate::layout::types::{
    KeyDescriptor, KeyRole, Layout, LayoutMode, ParseError, ParseResult, Severity,
    ValidationIssue,
};

/// Validates a layout and returns it with warnings.
pub fn validate_layout(layout: Layout) -> Result<ParseResult<Layout>, ParseError> {
    if layout.key_count() == 0 {
        return Err(ParseError::validation_error(vec![
            ValidationIssue::new(Severity::Error, "Layout has no keys", "layout")
                .with_suggestion("Define at least one row in 'alphameric' or 'punctuation'"),
        ]));
    }

    let mut warnings = Vec::new();

    for mode in LayoutMode::ALL {
        validate_mode(&layout, mode, &mut warnings);
    }

    for warning in &warnings {
        tracing::warn!("Layout: {}", warning);
    }

    Ok(ParseResult::with_warnings(layout, warnings))
}

/// Validates the rows of one mode.
fn validate_mode(layout: &Layout, mode: LayoutMode, warnings: &mut Vec<ValidationIssue>) {
    let rows = layout.rows(mode);

    if rows.iter().all(|row| row.keys.is_empty()) {
        warnings.push(
            ValidationIssue::new(Severity::Warning, "Mode has no keys", mode.as_str())
                .with_suggestion("Add rows or remove the mode-switch keys pointing here"),
        );
        return;
    }

    let has_mode_switch = rows
        .iter()
        .flat_map(|row| &row.keys)
        .any(|key| key.role == KeyRole::ModeSwitch && !key.disabled);
    if !has_mode_switch {
        warnings.push(
            ValidationIssue::new(
                Severity::Warning,
                "Mode has no enabled mode-switch key",
                mode.as_str(),
            )
            .with_suggestion("Add a key with \"role\": \"mode_switch\" so users can leave this mode"),
        );
    }

    for (row_idx, row) in rows.iter().enumerate() {
        if row.keys.is_empty() {
            warnings.push(ValidationIssue::new(
                Severity::Warning,
                "Row is empty",
                format!("{}[{}]", mode, row_idx),
            ));
        }

        for (key_idx, key) in row.keys.iter().enumerate() {
            let key_path = format!("{}[{}][{}]", mode, row_idx, key_idx);
            validate_key(key, &key_path, warnings);
        }
    }
}

/// Validates a single key descriptor.
pub fn validate_key(key: &KeyDescriptor, key_path: &str, warnings: &mut Vec<ValidationIssue>) {
    let glyphs = [
        ("text", &key.text),
        ("capText", &key.cap_text),
        ("altText", &key.alt_text),
        ("altCapText", &key.alt_cap_text),
    ];
    for (field, glyph) in glyphs {
        if glyph.as_deref() == Some("") {
            warnings.push(
                ValidationIssue::new(
                    Severity::Warning,
                    "Glyph is an empty string",
                    format!("{}.{}", key_path, field),
                )
                .with_suggestion("Remove the field instead of leaving it empty"),
            );
        }
    }

    if key.role == KeyRole::None && key.text.is_none() && key.icon.is_none() {
        warnings.push(
            ValidationIssue::new(
                Severity::Warning,
                "Key has no glyph, icon or role",
                key_path,
            )
            .with_suggestion("Tapping this key does nothing; give it a 'text' or a 'role'"),
        );
    }

    if key.text.is_some() && key.icon.is_some() {
        warnings.push(
            ValidationIssue::new(
                Severity::Warning,
                "Key has both text and an icon",
                key_path,
            )
            .with_suggestion("Use either 'text' or 'icon'"),
        );
    }

    if let Some(icon) = &key.icon {
        if !assets::has_icon(icon) {
            warnings.push(
                ValidationIssue::new(
                    Severity::Warning,
                    format!("Unknown icon '{}'", icon),
                    format!("{}.icon", key_path),
                )
                .with_suggestion("Use one of the bundled icons: backspace, capslock, enter, done"),
            );
        }
    }

    if key.alt_cap_text.is_some() && key.alt_text.is_none() {
        warnings.push(ValidationIssue::new(
            Severity::Warning,
            "Key has 'altCapText' but no 'altText'; long press only works with caps lock on",
            format!("{}.altCapText", key_path),
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================
