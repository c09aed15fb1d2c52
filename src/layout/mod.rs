// SPDX-License-Identifier: GPL-3.0-only

//! Layout Model for the on-screen keyboard.
//!
//! A layout is a static payload with two modes, `alphameric` and
//! `punctuation`. Each mode is an ordered list of rows, each row an ordered
//! list of key descriptors:
//!
//! ```json
//! {
//!     "alphameric": [
//!         [
//!             {"text": "q", "capText": "Q", "altText": "1", "altCapText": "1"},
//!             {"role": "backspace", "icon": "backspace"}
//!         ],
//!         [
//!             {"text": "1#?", "capText": "1#?", "role": "mode_switch"},
//!             {"role": "space"},
//!             {"role": "done", "icon": "done"}
//!         ]
//!     ],
//!     "punctuation": [
//!         [
//!             {"role": "caps_lock", "icon": "capslock", "isDisabled": true},
//!             {"text": "abc", "capText": "ABC", "role": "mode_switch"}
//!         ]
//!     ]
//! }
//! ```
//!
//! # Glyph selection
//!
//! While caps lock is on a key shows and inserts `capText` when defined, and
//! `text` otherwise. Long press inserts `altCapText` under the same rule,
//! falling back to `altText`.
//!
//! # Error Handling
//!
//! Loading is permissive: non-fatal problems come back as warnings in the
//! `ParseResult`, while I/O errors, JSON errors and layouts without any key
//! return a `ParseError`.
//!
//! ```rust,ignore
//! use wpe_keyboard::layout::{default_layout, parse_layout_file, ParseError};
//!
//! let layout = match parse_layout_file("layout.json") {
//!     Ok(result) => result.into_layout(),
//!     Err(ParseError::JsonError { line_number, .. }) => {
//!         eprintln!("JSON error at line {:?}", line_number);
//!         default_layout()?.into_layout()
//!     }
//!     Err(e) => return Err(e),
//! };
//! ```

// Sub-modules
pub mod assets;
pub mod parser;
pub mod types;
pub mod validation;

// Re-export public API - Error handling types
pub use types::{ParseError, ParseResult, Severity, ValidationIssue};

// Re-export public API - Parser functions
pub use parser::{default_layout, parse_layout_file, parse_layout_from_string};

// Re-export public API - Data structures
pub use types::{KeyDescriptor, KeyRole, KeyRow, Layout, LayoutMode};

// Re-export public API - Assets
pub use assets::icon_svg;
