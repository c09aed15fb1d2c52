// SPDX-License-Identifier: GPL-3.0-only

//! Message types driving the keyboard event loop.
//!
//! Host input events (touch, focus, document mutations) and the keyboard's
//! own timers are all delivered as `KeyboardMessage`s through one channel, so
//! every state transition runs on the loop in arrival order.

use crate::focus::{ElementId, MutationRecord};
use crate::keyboard::key::KeyId;

/// Messages consumed by `KeyboardApp::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardMessage {
    /// A touch started on a key.
    KeyPressStart(KeyId),

    /// The touch on a key ended.
    KeyPressEnd(KeyId),

    /// The long-press timer of a press fired.
    ///
    /// `press` identifies the press that armed it; messages from an earlier
    /// press of the same key are ignored.
    LongPressElapsed {
        /// Key that armed the timer
        key: KeyId,
        /// Press serial
        press: u64,
    },

    /// The backspace repeat interval ticked.
    RepeatTick {
        /// Key that armed the interval
        key: KeyId,
        /// Press serial
        press: u64,
    },

    /// An element gained focus.
    Focus(ElementId),

    /// An element lost focus.
    Blur(ElementId),

    /// Nodes were added to or removed from the observed subtree.
    Mutation(MutationRecord),

    /// Stop the event loop.
    Shutdown,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutMode;

    #[test]
    fn test_timer_messages_differ_by_press_serial() {
        let key = KeyId::new(LayoutMode::Alphameric, 0, 0);

        assert_ne!(
            KeyboardMessage::LongPressElapsed { key, press: 1 },
            KeyboardMessage::LongPressElapsed { key, press: 2 }
        );
        assert_ne!(
            KeyboardMessage::RepeatTick { key, press: 1 },
            KeyboardMessage::RepeatTick { key, press: 2 }
        );
    }
}
