// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard interaction state.
//!
//! This module provides:
//! - **Key widgets** (`key`): the press lifecycle of one key, tap vs. long press
//! - **Controller** (`state`): mode, caps lock, visibility and effect routing
//! - **Messages** (`message`): the event vocabulary of the keyboard loop
//! - **Surface** (`surface`): what the keyboard needs from the host renderer
//!
//! # Example
//!
//! ```rust,ignore
//! use wpe_keyboard::keyboard::{KeyboardController, KeyId};
//! use wpe_keyboard::layout::LayoutMode;
//!
//! let mut controller = KeyboardController::new(&layout, surface, bridge, timers);
//! controller.show();
//!
//! let q = KeyId::new(LayoutMode::Alphameric, 0, 0);
//! controller.press_start(q);
//! controller.press_end(q);
//! ```

pub mod key;
pub mod message;
pub mod state;
pub mod surface;

pub use key::{Activation, KeyId, KeyWidget, KeyWidgetState, LongPress};
pub use message::KeyboardMessage;
pub use state::{ControllerState, KeyboardController};
pub use surface::{KeyClass, Surface};
