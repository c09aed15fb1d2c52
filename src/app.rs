// SPDX-License-Identifier: GPL-3.0-only

use crate::config::KeyboardConfig;
use crate::focus::{FocusTracker, Node};
use crate::input::{EditingBridge, TextEditor, Timers};
use crate::keyboard::{KeyboardController, KeyboardMessage, Surface};
use crate::layout::{Layout, ParseError};
use futures::StreamExt;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use std::fmt;
use tokio::runtime::{Handle, TryCurrentError};

/// Error type for building the keyboard.
#[derive(Debug)]
pub enum AppError {
    /// The configured layout could not be loaded
    Layout(ParseError),
    /// No tokio runtime to run the keyboard timers on
    NoRuntime(TryCurrentError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Layout(e) => write!(f, "Failed to load layout: {}", e),
            AppError::NoRuntime(e) => write!(
                f,
                "No tokio runtime for keyboard timers: {}\n  Suggestion: build the keyboard inside a runtime or use KeyboardApp::with_runtime",
                e
            ),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Layout(e) => Some(e),
            AppError::NoRuntime(e) => Some(e),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        Self::Layout(err)
    }
}

impl From<TryCurrentError> for AppError {
    fn from(err: TryCurrentError) -> Self {
        Self::NoRuntime(err)
    }
}

/// Cloneable sender the host uses to feed events into the keyboard loop.
#[derive(Debug, Clone)]
pub struct KeyboardHandle {
    tx: UnboundedSender<KeyboardMessage>,
}

impl KeyboardHandle {
    /// Posts a message. Returns false once the loop has stopped.
    pub fn send(&self, message: KeyboardMessage) -> bool {
        self.tx.unbounded_send(message).is_ok()
    }
}

/// The application model: the keyboard controller, the focus tracker and
/// the sending half of their shared message channel.
#[derive(Debug)]
pub struct KeyboardApp {
    /// Keys, mode, caps lock and visibility.
    controller: KeyboardController,
    /// Registry of editable elements.
    tracker: FocusTracker,
    /// Sender cloned into handles and timers.
    tx: UnboundedSender<KeyboardMessage>,
}

impl KeyboardApp {
    /// Builds the keyboard over `layout` and returns it with the receiving
    /// end of its message channel.
    ///
    /// Timers run on the tokio runtime current at this call; the loop itself
    /// can then be driven from any executor or main loop.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoRuntime` when called outside a tokio runtime.
    pub fn new(
        config: &KeyboardConfig,
        layout: Layout,
        surface: impl Surface + 'static,
        editor: impl TextEditor + 'static,
    ) -> Result<(Self, UnboundedReceiver<KeyboardMessage>), AppError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, layout, surface, editor, runtime))
    }

    /// Like `new`, with timers spawned on `runtime`.
    pub fn with_runtime(
        config: &KeyboardConfig,
        layout: Layout,
        surface: impl Surface + 'static,
        editor: impl TextEditor + 'static,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<KeyboardMessage>) {
        let (tx, rx) = mpsc::unbounded();
        let timers = Timers::with_runtime(
            runtime,
            tx.clone(),
            config.long_press_delay(),
            config.repeat_interval(),
        );
        let controller =
            KeyboardController::new(&layout, surface, EditingBridge::new(editor), timers);

        let app = Self {
            controller,
            tracker: FocusTracker::new(),
            tx,
        };
        (app, rx)
    }

    /// Builds the keyboard over the layout named by `config`.
    ///
    /// Layout warnings are logged; fatal layout errors and a missing runtime
    /// are returned.
    pub fn from_config(
        config: &KeyboardConfig,
        surface: impl Surface + 'static,
        editor: impl TextEditor + 'static,
    ) -> Result<(Self, UnboundedReceiver<KeyboardMessage>), AppError> {
        let result = config.load_layout()?;
        if result.has_warnings() {
            tracing::warn!("Layout loaded with {} warning(s)", result.warning_count());
        }
        Self::new(config, result.into_layout(), surface, editor)
    }

    /// Returns a handle for posting host events.
    pub fn handle(&self) -> KeyboardHandle {
        KeyboardHandle {
            tx: self.tx.clone(),
        }
    }

    /// Wires focus tracking to the document under `root`.
    ///
    /// Attaches the editable elements already present, starts accepting
    /// mutation records, and shows the keyboard if an editable element is
    /// already focused.
    pub fn start(&mut self, root: &Node) {
        self.tracker.scan(root);
        match root {
            Node::Element { info, .. } => self.tracker.observe_mutations(info.id),
            Node::Text => tracing::warn!("Document root is not an element, not observing mutations"),
        }
        self.tracker.show_if_needed(&mut self.controller);
        tracing::info!(
            "Keyboard started, tracking {} editable elements",
            self.tracker.tracked_count()
        );
    }

    /// Handles one message. Returns false when the loop should stop.
    pub fn update(&mut self, message: KeyboardMessage) -> bool {
        match message {
            KeyboardMessage::KeyPressStart(key) => self.controller.press_start(key),
            KeyboardMessage::KeyPressEnd(key) => self.controller.press_end(key),
            KeyboardMessage::LongPressElapsed { key, press } => {
                self.controller.long_press_elapsed(key, press)
            }
            KeyboardMessage::RepeatTick { key, press } => self.controller.repeat_tick(key, press),
            KeyboardMessage::Focus(id) => {
                self.tracker.on_focus(id, &mut self.controller);
            }
            KeyboardMessage::Blur(id) => {
                self.tracker.on_blur(id, &mut self.controller);
            }
            KeyboardMessage::Mutation(record) => {
                self.tracker.on_mutation(&record, &mut self.controller)
            }
            KeyboardMessage::Shutdown => {
                tracing::info!("Keyboard loop shutting down");
                self.controller.hide();
                return false;
            }
        }
        true
    }

    /// Runs the event loop until `Shutdown` arrives or every sender is gone.
    pub async fn run(mut self, mut rx: UnboundedReceiver<KeyboardMessage>) {
        while let Some(message) = rx.next().await {
            if !self.update(message) {
                break;
            }
        }
        tracing::debug!("Keyboard loop stopped");
    }

    pub fn controller(&self) -> &KeyboardController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut KeyboardController {
        &mut self.controller
    }

    pub fn tracker(&self) -> &FocusTracker {
        &self.tracker
    }
}
