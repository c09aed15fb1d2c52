// SPDX-License-Identifier: GPL-3.0-only

//! Test doubles shared by the unit and integration tests.

use std::cell::{Ref, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::mpsc::{self, UnboundedReceiver};

use crate::focus::ElementInfo;
use crate::input::{EditError, EditingBridge, TextEditor, Timers};
use crate::keyboard::{KeyClass, KeyId, KeyboardController, KeyboardMessage, Surface};
use crate::layout::{KeyDescriptor, Layout, LayoutMode, default_layout};

/// Clock step used by `advance`.
const STEP_MS: u64 = 10;

/// Everything a `RecordingSurface` was told.
#[derive(Debug)]
pub(crate) struct SurfaceLog {
    pub mounted: Vec<(KeyId, KeyDescriptor)>,
    pub keyboard_visible: bool,
    pub visible_modes: HashSet<LayoutMode>,
    pub capitalized: bool,
    pub classes: HashSet<(KeyId, KeyClass)>,
    pub pressed_ever: HashSet<KeyId>,
    pub keyboard_height: f32,
    pub reservation: Option<f32>,
    pub active: Option<ElementInfo>,
    pub blur_count: usize,
    pub scroll_count: usize,
}

impl Default for SurfaceLog {
    fn default() -> Self {
        Self {
            mounted: Vec::new(),
            keyboard_visible: false,
            visible_modes: HashSet::new(),
            capitalized: false,
            classes: HashSet::new(),
            pressed_ever: HashSet::new(),
            keyboard_height: 240.0,
            reservation: None,
            active: None,
            blur_count: 0,
            scroll_count: 0,
        }
    }
}

/// In-memory `Surface` that records every call.
///
/// Clones share the same log, so a test keeps one clone while the controller
/// owns the other.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

impl RecordingSurface {
    pub fn log(&self) -> Ref<'_, SurfaceLog> {
        self.0.borrow()
    }

    /// Moves host focus to `element` (or nowhere).
    pub fn focus(&self, element: Option<ElementInfo>) {
        self.0.borrow_mut().active = element;
    }

    pub fn set_reservation(&self, value: Option<f32>) {
        self.0.borrow_mut().reservation = value;
    }

    pub fn has_class(&self, key: KeyId, class: KeyClass) -> bool {
        self.0.borrow().classes.contains(&(key, class))
    }
}

impl Surface for RecordingSurface {
    fn mount_key(&mut self, id: KeyId, key: &KeyDescriptor) {
        self.0.borrow_mut().mounted.push((id, key.clone()));
    }

    fn set_keyboard_visible(&mut self, visible: bool) {
        self.0.borrow_mut().keyboard_visible = visible;
    }

    fn set_mode_visible(&mut self, mode: LayoutMode, visible: bool) {
        let mut log = self.0.borrow_mut();
        if visible {
            log.visible_modes.insert(mode);
        } else {
            log.visible_modes.remove(&mode);
        }
    }

    fn set_capitalized(&mut self, capitalized: bool) {
        self.0.borrow_mut().capitalized = capitalized;
    }

    fn set_key_class(&mut self, key: KeyId, class: KeyClass, enabled: bool) {
        let mut log = self.0.borrow_mut();
        if enabled {
            if class == KeyClass::Pressed {
                log.pressed_ever.insert(key);
            }
            log.classes.insert((key, class));
        } else {
            log.classes.remove(&(key, class));
        }
    }

    fn keyboard_height(&self) -> f32 {
        self.0.borrow().keyboard_height
    }

    fn bottom_reservation(&self) -> Option<f32> {
        self.0.borrow().reservation
    }

    fn set_bottom_reservation(&mut self, value: Option<f32>) {
        self.0.borrow_mut().reservation = value;
    }

    fn active_element(&self) -> Option<ElementInfo> {
        self.0.borrow().active.clone()
    }

    fn blur_active_element(&mut self) {
        let mut log = self.0.borrow_mut();
        log.active = None;
        log.blur_count += 1;
    }

    fn scroll_active_into_view(&mut self) {
        self.0.borrow_mut().scroll_count += 1;
    }
}

/// One call made on a `RecordingEditor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Edit {
    Insert(String),
    Delete,
}

/// `TextEditor` that records every call.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingEditor(Rc<RefCell<Vec<Edit>>>);

impl RecordingEditor {
    pub fn edits(&self) -> Vec<Edit> {
        self.0.borrow().clone()
    }

    pub fn inserted_text(&self) -> String {
        self.0
            .borrow()
            .iter()
            .filter_map(|edit| match edit {
                Edit::Insert(text) => Some(text.as_str()),
                Edit::Delete => None,
            })
            .collect()
    }

    pub fn delete_count(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|edit| **edit == Edit::Delete)
            .count()
    }
}

impl TextEditor for RecordingEditor {
    fn insert_text(&mut self, text: &str) -> Result<(), EditError> {
        self.0.borrow_mut().push(Edit::Insert(text.to_string()));
        Ok(())
    }

    fn delete_backward(&mut self) -> Result<(), EditError> {
        self.0.borrow_mut().push(Edit::Delete);
        Ok(())
    }
}

/// Lets spawned timer tasks run up to their next await point.
pub(crate) async fn settle_tasks() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

/// Advances the paused clock by `millis` in small steps, handing every
/// message posted meanwhile to `dispatch`.
pub(crate) async fn advance(
    rx: &mut UnboundedReceiver<KeyboardMessage>,
    millis: u64,
    mut dispatch: impl FnMut(KeyboardMessage),
) {
    let mut elapsed = 0;
    while elapsed < millis {
        let step = STEP_MS.min(millis - elapsed);
        tokio::time::sleep(Duration::from_millis(step)).await;
        settle_tasks().await;
        while let Ok(Some(message)) = rx.try_next() {
            dispatch(message);
        }
        elapsed += step;
    }
}

/// The bundled layout.
pub(crate) fn bundled_layout() -> Layout {
    default_layout()
        .expect("bundled layout must parse")
        .into_layout()
}

/// A controller over the bundled layout with recording doubles.
pub(crate) struct ControllerFixture {
    pub controller: KeyboardController,
    pub surface: RecordingSurface,
    pub editor: RecordingEditor,
    pub rx: UnboundedReceiver<KeyboardMessage>,
}

impl ControllerFixture {
    pub fn new() -> Self {
        let surface = RecordingSurface::default();
        let editor = RecordingEditor::default();
        let (tx, rx) = mpsc::unbounded();
        let timers = Timers::new(tx, Duration::from_millis(1000), Duration::from_millis(200))
            .expect("controller fixtures are built inside a runtime");
        let controller = KeyboardController::new(
            &bundled_layout(),
            surface.clone(),
            EditingBridge::new(editor.clone()),
            timers,
        );
        Self {
            controller,
            surface,
            editor,
            rx,
        }
    }

    /// Finds the key whose primary glyph is `text` in `mode`.
    pub fn key(&self, mode: LayoutMode, text: &str) -> KeyId {
        self.controller
            .keys()
            .iter()
            .find(|key| key.id().mode == mode && key.descriptor().text.as_deref() == Some(text))
            .map(|key| key.id())
            .unwrap_or_else(|| panic!("no key {:?} in {}", text, mode))
    }

    /// Presses and releases a key.
    pub fn tap(&mut self, key: KeyId) {
        self.controller.press_start(key);
        self.controller.press_end(key);
    }

    /// Advances time, routing timer messages into the controller.
    pub async fn advance(&mut self, millis: u64) {
        let controller = &mut self.controller;
        advance(&mut self.rx, millis, |message| match message {
            KeyboardMessage::LongPressElapsed { key, press } => {
                controller.long_press_elapsed(key, press)
            }
            KeyboardMessage::RepeatTick { key, press } => controller.repeat_tick(key, press),
            other => panic!("unexpected message {:?}", other),
        })
        .await;
    }
}
