// SPDX-License-Identifier: GPL-3.0-only

//! Editing bridge between the keyboard and the host's text primitive.
//!
//! This is the only place that calls into the host editing API. Calls are
//! fire-and-forget: the bridge does not check that an editable element is
//! focused, and host failures are logged and dropped so they can never leave
//! the keyboard in a half-updated state.

use std::fmt;

/// Failure reported by the host editing primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditError {
    /// Human-readable reason
    pub message: String,
}

impl EditError {
    /// Creates an edit error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edit failed: {}", self.message)
    }
}

impl std::error::Error for EditError {}

/// Host text-editing primitive operating on the focused element.
pub trait TextEditor {
    /// Inserts `text` at the caret, replacing any selection.
    fn insert_text(&mut self, text: &str) -> Result<(), EditError>;

    /// Deletes one unit before the caret (or the selection).
    fn delete_backward(&mut self) -> Result<(), EditError>;
}

/// Fire-and-forget wrapper around the host `TextEditor`.
pub struct EditingBridge {
    editor: Box<dyn TextEditor>,
}

impl fmt::Debug for EditingBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingBridge").finish_non_exhaustive()
    }
}

impl EditingBridge {
    /// Wraps a host editor.
    pub fn new(editor: impl TextEditor + 'static) -> Self {
        Self {
            editor: Box::new(editor),
        }
    }

    /// Inserts text into the focused element.
    pub fn insert_text(&mut self, text: &str) {
        tracing::trace!("insert {:?}", text);
        if let Err(e) = self.editor.insert_text(text) {
            tracing::warn!("Dropping insert of {:?}: {}", text, e);
        }
    }

    /// Deletes one unit before the caret of the focused element.
    pub fn delete_one_unit(&mut self) {
        tracing::trace!("delete one unit");
        if let Err(e) = self.editor.delete_backward() {
            tracing::warn!("Dropping delete: {}", e);
        }
    }
}
