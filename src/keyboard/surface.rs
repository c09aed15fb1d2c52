// SPDX-License-Identifier: GPL-3.0-only

//! Host rendering surface consumed by the keyboard controller.
//!
//! The controller never builds elements itself. It tells the host which keys
//! exist, which key set is shown, and which classes are on; the host owns
//! the document, the styling and the icon parsing.

use crate::app_settings;
use crate::focus::ElementInfo;
use crate::keyboard::key::KeyId;
use crate::layout::{KeyDescriptor, LayoutMode};

/// Per-key class names toggled by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// The key is held
    Pressed,
    /// The key cannot be used (static, or enter outside multi-line fields)
    Disabled,
}

impl KeyClass {
    /// Class name as used in the host stylesheet.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeyClass::Pressed => app_settings::PRESSED_CLASS,
            KeyClass::Disabled => app_settings::DISABLED_CLASS,
        }
    }
}

/// Rendering surface and focus model of the host document.
pub trait Surface {
    /// Creates the element for one key.
    ///
    /// Keys arrive row by row in rendering order. The host can use
    /// `KeyRole::element_id` and `layout::icon_svg` to build the element.
    fn mount_key(&mut self, id: KeyId, key: &KeyDescriptor);

    /// Shows or hides the whole keyboard.
    fn set_keyboard_visible(&mut self, visible: bool);

    /// Shows or hides the key set of one mode.
    fn set_mode_visible(&mut self, mode: LayoutMode, visible: bool);

    /// Sets or clears the keyboard-wide capitalized class.
    fn set_capitalized(&mut self, capitalized: bool);

    /// Sets or clears a class on one key.
    fn set_key_class(&mut self, key: KeyId, class: KeyClass, enabled: bool);

    /// Current rendered height of the keyboard, in pixels.
    fn keyboard_height(&self) -> f32;

    /// Space currently reserved at the bottom of the document, if any.
    fn bottom_reservation(&self) -> Option<f32>;

    /// Reserves space at the bottom of the document, or clears it.
    fn set_bottom_reservation(&mut self, value: Option<f32>);

    /// The element that currently holds focus.
    fn active_element(&self) -> Option<ElementInfo>;

    /// Removes focus from the active element.
    fn blur_active_element(&mut self);

    /// Scrolls the active element to the middle of the viewport.
    fn scroll_active_into_view(&mut self);
}
