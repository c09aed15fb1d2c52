// SPDX-License-Identifier: GPL-3.0-only

//! Key widget: press lifecycle of a single key.
//!
//! A `KeyWidget` is built from one `KeyDescriptor` and decides, from the
//! press/release sequence and its timers, whether a touch is a tap, a
//! long-press alt glyph, or a backspace repeat. It reports what should happen
//! as an `Activation` or `LongPress` value and leaves applying it to the
//! controller.

use std::fmt;

use crate::input::{TimerHandle, Timers};
use crate::keyboard::message::KeyboardMessage;
use crate::layout::{KeyDescriptor, KeyRole, LayoutMode};

/// Identity of a mounted key: mode, row and column in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId {
    /// Mode the key belongs to
    pub mode: LayoutMode,
    /// Row index within the mode
    pub row: usize,
    /// Column index within the row
    pub column: usize,
}

impl KeyId {
    /// Creates a key id.
    pub fn new(mode: LayoutMode, row: usize, column: usize) -> Self {
        Self { mode, row, column }
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}][{}]", self.mode, self.row, self.column)
    }
}

/// Effect of a completed tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Remove focus from the edited element
    Done,
    /// Flip caps lock
    ToggleCapsLock,
    /// Switch to the other mode
    ToggleMode,
    /// Delete one unit before the caret
    DeleteBackward,
    /// Insert a line break if the field is multi-line
    LineBreak,
    /// Insert a space
    Space,
    /// Insert a glyph
    Insert(String),
}

/// Outcome of a long-press timer firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LongPress {
    /// Stale or unexpected timer message
    Ignored,
    /// Backspace repeat started
    Repeat,
    /// Insert this alt glyph; the release will not insert anything else
    InsertAlt(String),
}

/// Transient press state of one key.
#[derive(Debug, Default)]
pub struct KeyWidgetState {
    pressed: bool,
    press: u64,
    armed_alt: Option<String>,
    long_press: Option<TimerHandle>,
    repeat: Option<TimerHandle>,
}

impl KeyWidgetState {
    fn clear_timers(&mut self) {
        self.long_press = None;
        self.repeat = None;
    }
}

/// One interactive key.
#[derive(Debug)]
pub struct KeyWidget {
    id: KeyId,
    descriptor: KeyDescriptor,
    state: KeyWidgetState,
}

impl KeyWidget {
    /// Creates an idle key.
    pub fn new(id: KeyId, descriptor: KeyDescriptor) -> Self {
        Self {
            id,
            descriptor,
            state: KeyWidgetState::default(),
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn descriptor(&self) -> &KeyDescriptor {
        &self.descriptor
    }

    pub fn is_pressed(&self) -> bool {
        self.state.pressed
    }

    pub fn has_long_press_timer(&self) -> bool {
        self.state.long_press.is_some()
    }

    pub fn has_repeat_timer(&self) -> bool {
        self.state.repeat.is_some()
    }

    /// Glyph shown on the key for the given caps state.
    pub fn display_glyph(&self, caps_locked: bool) -> Option<&str> {
        self.descriptor.display_glyph(caps_locked)
    }

    /// Handles the start of a touch.
    ///
    /// Returns false, without touching any state, for disabled keys. Otherwise
    /// marks the key pressed and arms the long-press timer when the key is
    /// backspace or has an alt glyph for the current caps state.
    pub fn on_activation_start(&mut self, caps_locked: bool, press: u64, timers: &Timers) -> bool {
        if self.descriptor.disabled {
            return false;
        }

        self.state.clear_timers();
        self.state.pressed = true;
        self.state.press = press;
        self.state.armed_alt = self.descriptor.alt_glyph(caps_locked).map(str::to_string);

        if self.descriptor.role == KeyRole::Backspace || self.state.armed_alt.is_some() {
            self.state.long_press = Some(timers.once(
                timers.long_press_delay(),
                KeyboardMessage::LongPressElapsed {
                    key: self.id,
                    press,
                },
            ));
        }

        true
    }

    /// Handles the long-press timer of `press` firing.
    pub fn on_long_press(&mut self, press: u64, timers: &Timers) -> LongPress {
        if !self.state.pressed || self.state.press != press || self.state.long_press.is_none() {
            return LongPress::Ignored;
        }
        self.state.long_press = None;

        if self.descriptor.role == KeyRole::Backspace {
            self.state.repeat = Some(timers.repeating(
                timers.repeat_interval(),
                KeyboardMessage::RepeatTick {
                    key: self.id,
                    press,
                },
            ));
            return LongPress::Repeat;
        }

        match self.state.armed_alt.take() {
            Some(glyph) => {
                // The release must not insert the primary glyph as well
                self.state.pressed = false;
                LongPress::InsertAlt(glyph)
            }
            None => LongPress::Ignored,
        }
    }

    /// Returns true if a repeat tick of `press` should delete.
    pub fn accepts_repeat_tick(&self, press: u64) -> bool {
        self.state.repeat.is_some() && self.state.press == press
    }

    /// Handles the end of a touch.
    ///
    /// Disabled keys ignore it. Otherwise a still-pressed key yields its
    /// activation, and the press state and both timers are always cleared.
    pub fn on_activation_end(&mut self, caps_locked: bool) -> Option<Activation> {
        if self.descriptor.disabled {
            return None;
        }

        let activation = if self.state.pressed {
            self.activation(caps_locked)
        } else {
            None
        };

        self.state.pressed = false;
        self.state.armed_alt = None;
        self.state.clear_timers();

        activation
    }

    /// Drops any in-flight press without an effect.
    ///
    /// Returns true if the key was pressed.
    pub fn cancel(&mut self) -> bool {
        let was_pressed = self.state.pressed || self.state.long_press.is_some() || self.state.repeat.is_some();
        self.state.pressed = false;
        self.state.armed_alt = None;
        self.state.clear_timers();
        was_pressed
    }

    fn activation(&self, caps_locked: bool) -> Option<Activation> {
        match self.descriptor.role {
            KeyRole::Done => Some(Activation::Done),
            KeyRole::CapsLock => Some(Activation::ToggleCapsLock),
            KeyRole::ModeSwitch => Some(Activation::ToggleMode),
            KeyRole::Backspace => Some(Activation::DeleteBackward),
            KeyRole::Enter => Some(Activation::LineBreak),
            KeyRole::Space => Some(Activation::Space),
            KeyRole::None => self
                .descriptor
                .display_glyph(caps_locked)
                .map(|glyph| Activation::Insert(glyph.to_string())),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
