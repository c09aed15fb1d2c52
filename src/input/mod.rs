// SPDX-License-Identifier: GPL-3.0-only

//! Input plumbing for the keyboard.
//!
//! This module holds the two pieces that reach outside the keyboard's own
//! state:
//!
//! - **Editing bridge**: the single caller of the host text primitive
//!   (insert at caret, delete before caret)
//! - **Timers**: long-press and backspace-repeat timers that post messages
//!   back into the keyboard event loop
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use wpe_keyboard::input::{EditError, EditingBridge, TextEditor};
//!
//! struct ExecCommand;
//!
//! impl TextEditor for ExecCommand {
//!     fn insert_text(&mut self, text: &str) -> Result<(), EditError> {
//!         host::exec_command("insertText", text).map_err(EditError::new)
//!     }
//!
//!     fn delete_backward(&mut self) -> Result<(), EditError> {
//!         host::exec_command("delete", "").map_err(EditError::new)
//!     }
//! }
//!
//! let mut bridge = EditingBridge::new(ExecCommand);
//! bridge.insert_text("q");
//! bridge.delete_one_unit();
//! ```

// Sub-modules
pub mod editing;
pub mod timer;

// Re-export public API
pub use editing::{EditError, EditingBridge, TextEditor};
pub use timer::{TimerHandle, Timers};
