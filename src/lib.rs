// SPDX-License-Identifier: GPL-3.0-only

//! wpe-keyboard - An on-screen soft keyboard core for embedded web views
//!
//! This crate drives text entry into the focused editable element of a host
//! document on devices without a physical keyboard. It is headless: the host
//! renders the keys and owns the editing primitive, and the crate decides
//! what every touch and focus change means.
//!
//! # Architecture
//!
//! Host events and the keyboard's own timers flow as `KeyboardMessage`s
//! through one channel into `KeyboardApp::update`:
//!
//! 1. **Focus tracking** (`focus`): editable elements gain focus, the
//!    keyboard is shown; they lose focus or leave the document, it is hidden.
//!
//! 2. **Keyboard** (`keyboard`): key widgets turn presses into taps, alt
//!    glyphs or backspace repeat; the controller applies mode and caps lock
//!    changes and forwards text to the editing bridge.
//!
//! # Modules
//!
//! - `app`: Event loop and message routing
//! - `app_settings`: Centralized constants (timings, class names)
//! - `config`: Startup configuration loaded from JSON
//! - `focus`: Element model, editability predicate and focus tracker
//! - `input`: Editing bridge and long-press/repeat timers
//! - `keyboard`: Key widgets, controller and the host `Surface` trait
//! - `layout`: Layout payload types, parsing, validation and bundled assets

pub mod app;
pub mod app_settings;
pub mod config;
pub mod focus;
pub mod input;
pub mod keyboard;
pub mod layout;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{AppError, KeyboardApp, KeyboardHandle};
pub use config::KeyboardConfig;

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`, defaulting
/// this crate to `info`.
///
/// Does nothing if the host already installed a global subscriber.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match app_settings::LOG_DIRECTIVE.parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };

    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}

// ============================================================================
// Integration Tests
// ============================================================================
