// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard controller: mode, caps lock and visibility.
//!
//! The controller owns every `KeyWidget`, the editing bridge and the host
//! surface. Key results come back to it as `Activation`s and `LongPress`
//! outcomes, and it is the only place that changes `ControllerState`.

use std::collections::HashMap;

use crate::app_settings;
use crate::focus::ElementInfo;
use crate::input::{EditingBridge, Timers};
use crate::keyboard::key::{Activation, KeyId, KeyWidget, LongPress};
use crate::keyboard::surface::{KeyClass, Surface};
use crate::layout::{KeyRole, Layout, LayoutMode};

/// Mode, caps lock and visibility of the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    /// Active key set
    pub mode: LayoutMode,
    /// Shifted glyphs selected
    pub caps_locked: bool,
    /// Keyboard shown
    pub visible: bool,
}

/// Owns the keys and applies their effects.
pub struct KeyboardController {
    state: ControllerState,
    keys: Vec<KeyWidget>,
    index: HashMap<KeyId, usize>,
    enter_keys: Vec<KeyId>,
    surface: Box<dyn Surface>,
    bridge: EditingBridge,
    timers: Timers,
    /// Reservation found before the keyboard was shown.
    saved_reservation: Option<Option<f32>>,
    next_press: u64,
}

impl std::fmt::Debug for KeyboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardController")
            .field("state", &self.state)
            .field("keys", &self.keys.len())
            .field("enter_keys", &self.enter_keys)
            .finish_non_exhaustive()
    }
}

impl KeyboardController {
    /// Mounts every key of `layout` on `surface`.
    ///
    /// The keyboard starts hidden with the alphameric set selected.
    pub fn new(
        layout: &Layout,
        surface: impl Surface + 'static,
        bridge: EditingBridge,
        timers: Timers,
    ) -> Self {
        let mut surface: Box<dyn Surface> = Box::new(surface);
        let mut keys = Vec::with_capacity(layout.key_count());
        let mut index = HashMap::new();
        let mut enter_keys = Vec::new();

        for mode in LayoutMode::ALL {
            for (row, key_row) in layout.rows(mode).iter().enumerate() {
                for (column, descriptor) in key_row.keys.iter().enumerate() {
                    let id = KeyId::new(mode, row, column);
                    surface.mount_key(id, descriptor);
                    if descriptor.disabled {
                        surface.set_key_class(id, KeyClass::Disabled, true);
                    }
                    if descriptor.role == KeyRole::Enter {
                        enter_keys.push(id);
                    }
                    index.insert(id, keys.len());
                    keys.push(KeyWidget::new(id, descriptor.clone()));
                }
            }
        }

        tracing::debug!(
            "Mounted {} keys ({} enter keys)",
            keys.len(),
            enter_keys.len()
        );

        let mut controller = Self {
            state: ControllerState::default(),
            keys,
            index,
            enter_keys,
            surface,
            bridge,
            timers,
            saved_reservation: None,
            next_press: 0,
        };
        controller.set_mode(LayoutMode::Alphameric);
        controller.set_caps_locked(false);
        controller.surface.set_keyboard_visible(false);
        controller
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Shows the keyboard for the focused element.
    ///
    /// Every call resets the mode to alphameric and clears caps lock. The
    /// bottom reservation found before the first of a run of `show` calls is
    /// what `hide` restores.
    pub fn show(&mut self) {
        self.set_mode(LayoutMode::Alphameric);
        self.set_caps_locked(false);
        self.update_enter_keys();

        if !self.state.visible {
            self.saved_reservation = Some(self.surface.bottom_reservation());
        }
        self.state.visible = true;
        self.surface.set_keyboard_visible(true);

        let height = self.surface.keyboard_height();
        self.surface.set_bottom_reservation(Some(height));
        self.surface.scroll_active_into_view();

        tracing::debug!("Keyboard shown (reserved {}px)", height);
    }

    /// Hides the keyboard and restores the previous reservation.
    ///
    /// Presses still in flight are dropped without an effect.
    pub fn hide(&mut self) {
        for key in &mut self.keys {
            if key.cancel() {
                self.surface.set_key_class(key.id(), KeyClass::Pressed, false);
            }
        }

        self.state.visible = false;
        self.surface.set_keyboard_visible(false);

        if let Some(saved) = self.saved_reservation.take() {
            self.surface.set_bottom_reservation(saved);
        }

        tracing::debug!("Keyboard hidden");
    }

    /// Shows the key set of `mode` and hides the other one.
    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.state.mode = mode;
        self.surface.set_mode_visible(mode, true);
        self.surface.set_mode_visible(mode.toggled(), false);
        tracing::trace!("Mode: {}", mode);
    }

    /// Selects shifted or primary glyphs on every key.
    pub fn set_caps_locked(&mut self, caps_locked: bool) {
        self.state.caps_locked = caps_locked;
        self.surface.set_capitalized(caps_locked);
        tracing::trace!("Caps lock: {}", caps_locked);
    }

    /// Removes focus from the edited element.
    ///
    /// Hiding follows from the blur the host reports afterwards.
    pub fn done(&mut self) {
        tracing::debug!("Done pressed, blurring active element");
        self.surface.blur_active_element();
    }

    // ========================================================================
    // Key events
    // ========================================================================

    /// Routes the start of a touch on `key`.
    pub fn press_start(&mut self, key: KeyId) {
        let Some(&i) = self.index.get(&key) else {
            tracing::warn!("Press on unknown key {}", key);
            return;
        };

        let press = self.next_press;
        self.next_press += 1;

        if self.keys[i].on_activation_start(self.state.caps_locked, press, &self.timers) {
            self.surface.set_key_class(key, KeyClass::Pressed, true);
            tracing::trace!("Press {} on {}", press, key);
        }
    }

    /// Routes the end of a touch on `key` and applies its effect.
    pub fn press_end(&mut self, key: KeyId) {
        let Some(&i) = self.index.get(&key) else {
            tracing::warn!("Release on unknown key {}", key);
            return;
        };

        let widget = &mut self.keys[i];
        if widget.descriptor().disabled {
            return;
        }
        let activation = widget.on_activation_end(self.state.caps_locked);
        self.surface.set_key_class(key, KeyClass::Pressed, false);

        if let Some(activation) = activation {
            self.apply(activation);
        }
    }

    /// Handles a long-press timer message.
    pub fn long_press_elapsed(&mut self, key: KeyId, press: u64) {
        let Some(&i) = self.index.get(&key) else {
            return;
        };

        match self.keys[i].on_long_press(press, &self.timers) {
            LongPress::Ignored => tracing::trace!("Stale long press {} on {}", press, key),
            LongPress::Repeat => tracing::debug!("Backspace repeat started"),
            LongPress::InsertAlt(glyph) => {
                self.surface.set_key_class(key, KeyClass::Pressed, false);
                self.bridge.insert_text(&glyph);
            }
        }
    }

    /// Handles a backspace repeat tick.
    pub fn repeat_tick(&mut self, key: KeyId, press: u64) {
        let accepted = self
            .index
            .get(&key)
            .is_some_and(|&i| self.keys[i].accepts_repeat_tick(press));

        if accepted {
            self.bridge.delete_one_unit();
        }
    }

    /// Applies the effect of a completed tap.
    pub fn apply(&mut self, activation: Activation) {
        tracing::trace!("Apply {:?}", activation);
        match activation {
            Activation::Done => self.done(),
            Activation::ToggleCapsLock => self.set_caps_locked(!self.state.caps_locked),
            Activation::ToggleMode => self.set_mode(self.state.mode.toggled()),
            Activation::DeleteBackward => self.bridge.delete_one_unit(),
            Activation::LineBreak => {
                if self.focused_is_multiline() {
                    self.bridge.insert_text(app_settings::LINE_BREAK);
                }
            }
            Activation::Space => self.bridge.insert_text(app_settings::SPACE),
            Activation::Insert(glyph) => self.bridge.insert_text(&glyph),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn mode(&self) -> LayoutMode {
        self.state.mode
    }

    pub fn caps_locked(&self) -> bool {
        self.state.caps_locked
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Element currently holding focus, as the host reports it.
    pub fn active_element(&self) -> Option<ElementInfo> {
        self.surface.active_element()
    }

    /// Glyph currently shown on `key`.
    pub fn display_glyph(&self, key: KeyId) -> Option<&str> {
        self.index
            .get(&key)
            .and_then(|&i| self.keys[i].display_glyph(self.state.caps_locked))
    }

    /// Keys of the active mode, in rendering order.
    pub fn visible_keys(&self) -> impl Iterator<Item = &KeyWidget> {
        let mode = self.state.mode;
        self.keys.iter().filter(move |key| key.id().mode == mode)
    }

    pub fn keys(&self) -> &[KeyWidget] {
        &self.keys
    }

    pub fn enter_keys(&self) -> &[KeyId] {
        &self.enter_keys
    }

    /// First key of `mode` with `role`.
    pub fn key_with_role(&self, mode: LayoutMode, role: KeyRole) -> Option<KeyId> {
        self.keys
            .iter()
            .find(|key| key.id().mode == mode && key.descriptor().role == role)
            .map(KeyWidget::id)
    }

    fn focused_is_multiline(&self) -> bool {
        self.surface
            .active_element()
            .is_some_and(|element| element.accepts_multiline())
    }

    // Enter keys look disabled outside multi-line fields but stay pressable.
    fn update_enter_keys(&mut self) {
        let multiline = self.focused_is_multiline();
        for &id in &self.enter_keys {
            let statically_disabled = self
                .index
                .get(&id)
                .is_some_and(|&i| self.keys[i].descriptor().disabled);
            self.surface
                .set_key_class(id, KeyClass::Disabled, statically_disabled || !multiline);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ControllerFixture, Edit};

    #[tokio::test]
    async fn test_new_mounts_all_keys_hidden() {
        let fx = ControllerFixture::new();
        let log = fx.surface.log();

        assert_eq!(log.mounted.len(), fx.controller.keys().len());
        assert!(!log.keyboard_visible);
        assert!(log.visible_modes.contains(&LayoutMode::Alphameric));
        assert!(!log.visible_modes.contains(&LayoutMode::Punctuation));
        assert_eq!(fx.controller.enter_keys().len(), 2);
        assert_eq!(fx.controller.state(), ControllerState::default());

        // The punctuation caps lock is disabled in the bundled layout
        let caps = fx
            .controller
            .key_with_role(LayoutMode::Punctuation, KeyRole::CapsLock)
            .unwrap();
        assert!(log.classes.contains(&(caps, KeyClass::Disabled)));
    }

    #[tokio::test]
    async fn test_tap_inserts_glyph_for_caps_state() {
        let mut fx = ControllerFixture::new();
        let q = fx.key(LayoutMode::Alphameric, "q");

        fx.tap(q);
        fx.controller.set_caps_locked(true);
        fx.tap(q);

        assert_eq!(fx.editor.inserted_text(), "qQ");
        assert!(!fx.surface.has_class(q, KeyClass::Pressed));
        assert!(fx.surface.log().pressed_ever.contains(&q));
    }

    #[tokio::test]
    async fn test_display_glyph_follows_caps() {
        let mut fx = ControllerFixture::new();
        let a = fx.key(LayoutMode::Alphameric, "a");

        assert_eq!(fx.controller.display_glyph(a), Some("a"));
        fx.controller.set_caps_locked(true);
        assert_eq!(fx.controller.display_glyph(a), Some("A"));
        assert!(fx.surface.log().capitalized);
    }

    #[tokio::test]
    async fn test_mode_switch_is_its_own_inverse() {
        let mut fx = ControllerFixture::new();
        let to_punctuation = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::ModeSwitch)
            .unwrap();
        let to_alphameric = fx
            .controller
            .key_with_role(LayoutMode::Punctuation, KeyRole::ModeSwitch)
            .unwrap();
        let before: Vec<KeyId> = fx.controller.visible_keys().map(KeyWidget::id).collect();

        fx.tap(to_punctuation);
        assert_eq!(fx.controller.mode(), LayoutMode::Punctuation);
        assert!(fx.surface.log().visible_modes.contains(&LayoutMode::Punctuation));
        assert!(!fx.surface.log().visible_modes.contains(&LayoutMode::Alphameric));

        fx.tap(to_alphameric);
        assert_eq!(fx.controller.mode(), LayoutMode::Alphameric);
        let after: Vec<KeyId> = fx.controller.visible_keys().map(KeyWidget::id).collect();
        assert_eq!(before, after);
        assert!(fx.editor.edits().is_empty(), "mode switch inserts nothing");
    }

    #[tokio::test]
    async fn test_caps_lock_twice_restores_glyphs() {
        let mut fx = ControllerFixture::new();
        let caps = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::CapsLock)
            .unwrap();
        let glyphs = |c: &KeyboardController| -> Vec<Option<String>> {
            c.keys()
                .iter()
                .map(|k| c.display_glyph(k.id()).map(str::to_string))
                .collect()
        };
        let before = glyphs(&fx.controller);

        fx.tap(caps);
        assert!(fx.controller.caps_locked());
        assert_ne!(glyphs(&fx.controller), before);

        fx.tap(caps);
        assert!(!fx.controller.caps_locked());
        assert_eq!(glyphs(&fx.controller), before);
        assert_eq!(fx.controller.mode(), LayoutMode::Alphameric);
    }

    #[tokio::test]
    async fn test_show_resets_state_and_reserves_space() {
        let mut fx = ControllerFixture::new();
        fx.surface.set_reservation(Some(12.0));
        fx.surface.focus(Some(ElementInfo::input(1, "text")));

        fx.controller.set_mode(LayoutMode::Punctuation);
        fx.controller.set_caps_locked(true);
        fx.controller.show();

        assert!(fx.controller.is_visible());
        assert_eq!(fx.controller.mode(), LayoutMode::Alphameric);
        assert!(!fx.controller.caps_locked());
        let log = fx.surface.log();
        assert!(log.keyboard_visible);
        assert_eq!(log.reservation, Some(240.0));
        assert_eq!(log.scroll_count, 1);
    }

    #[tokio::test]
    async fn test_show_hide_round_trip_restores_reservation() {
        for initial in [None, Some(0.0), Some(37.5)] {
            let mut fx = ControllerFixture::new();
            fx.surface.set_reservation(initial);

            fx.controller.show();
            fx.controller.hide();
            assert_eq!(fx.surface.log().reservation, initial);

            // Repeated shows still restore the pre-show value
            fx.controller.show();
            fx.controller.show();
            fx.controller.hide();
            assert_eq!(fx.surface.log().reservation, initial);
            assert!(!fx.surface.log().keyboard_visible);
        }
    }

    #[tokio::test]
    async fn test_enter_styling_tracks_multiline_focus() {
        let mut fx = ControllerFixture::new();
        let enter = fx.controller.enter_keys()[0];

        fx.surface.focus(Some(ElementInfo::input(1, "email")));
        fx.controller.show();
        assert!(fx.surface.has_class(enter, KeyClass::Disabled));

        fx.surface.focus(Some(ElementInfo::text_area(2)));
        fx.controller.show();
        assert!(!fx.surface.has_class(enter, KeyClass::Disabled));
    }

    #[tokio::test]
    async fn test_enter_inserts_line_break_only_in_multiline() {
        let mut fx = ControllerFixture::new();
        let enter = fx.controller.enter_keys()[0];

        fx.surface.focus(Some(ElementInfo::input(1, "text")));
        fx.controller.show();
        fx.tap(enter);
        assert!(fx.editor.edits().is_empty());

        fx.surface.focus(Some(ElementInfo::text_area(2)));
        fx.controller.show();
        fx.tap(enter);
        assert_eq!(fx.editor.edits(), vec![Edit::Insert("\n".to_string())]);
    }

    #[tokio::test]
    async fn test_space_backspace_and_done() {
        let mut fx = ControllerFixture::new();
        fx.surface.focus(Some(ElementInfo::input(1, "search")));
        let space = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::Space)
            .unwrap();
        let backspace = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::Backspace)
            .unwrap();
        let done = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::Done)
            .unwrap();

        fx.tap(space);
        fx.tap(backspace);
        assert_eq!(
            fx.editor.edits(),
            vec![Edit::Insert(" ".to_string()), Edit::Delete]
        );

        fx.tap(done);
        assert_eq!(fx.surface.log().blur_count, 1);
        assert!(fx.controller.active_element().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_key_never_activates_or_styles() {
        let mut fx = ControllerFixture::new();
        fx.controller.set_mode(LayoutMode::Punctuation);
        let caps = fx
            .controller
            .key_with_role(LayoutMode::Punctuation, KeyRole::CapsLock)
            .unwrap();

        fx.controller.press_start(caps);
        fx.controller.press_end(caps);
        fx.controller.press_end(caps);
        fx.controller.press_start(caps);
        fx.advance(1500).await;
        fx.controller.press_end(caps);

        assert!(!fx.controller.caps_locked());
        assert!(!fx.surface.log().pressed_ever.contains(&caps));
        assert!(fx.surface.has_class(caps, KeyClass::Disabled));
        assert!(fx.editor.edits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_press_inserts_alt_once() {
        let mut fx = ControllerFixture::new();
        let q = fx.key(LayoutMode::Alphameric, "q");

        fx.controller.press_start(q);
        fx.advance(1000).await;
        assert_eq!(fx.editor.edits(), vec![Edit::Insert("1".to_string())]);
        assert!(!fx.surface.has_class(q, KeyClass::Pressed));

        fx.advance(500).await;
        fx.controller.press_end(q);
        assert_eq!(fx.editor.inserted_text(), "1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_press_inserts_primary_once() {
        let mut fx = ControllerFixture::new();
        let q = fx.key(LayoutMode::Alphameric, "q");

        fx.controller.press_start(q);
        fx.advance(990).await;
        fx.controller.press_end(q);
        fx.advance(2000).await;

        assert_eq!(fx.editor.edits(), vec![Edit::Insert("q".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backspace_repeat_timing() {
        let mut fx = ControllerFixture::new();
        let backspace = fx
            .controller
            .key_with_role(LayoutMode::Alphameric, KeyRole::Backspace)
            .unwrap();

        fx.controller.press_start(backspace);
        fx.advance(990).await;
        assert_eq!(fx.editor.delete_count(), 0);

        // Long press at 1000ms, then ticks at 1200, 1400 and 1600
        fx.advance(650).await;
        assert_eq!(fx.editor.delete_count(), 3);

        fx.controller.press_end(backspace);
        let after_release = fx.editor.delete_count();
        fx.advance(1000).await;
        assert_eq!(fx.editor.delete_count(), after_release);
        assert!(!fx.surface.has_class(backspace, KeyClass::Pressed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_cancels_pending_press() {
        let mut fx = ControllerFixture::new();
        let q = fx.key(LayoutMode::Alphameric, "q");

        fx.controller.show();
        fx.controller.press_start(q);
        fx.controller.hide();
        assert!(!fx.surface.has_class(q, KeyClass::Pressed));

        fx.advance(1500).await;
        fx.controller.press_end(q);
        assert!(fx.editor.edits().is_empty());
    }
}
