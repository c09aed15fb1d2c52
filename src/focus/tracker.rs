// SPDX-License-Identifier: GPL-3.0-only

//! Focus tracker: decides when the keyboard appears.
//!
//! Editable elements are kept in a registry. Focus on a tracked element shows
//! the keyboard, blur hides it. Elements inserted later are picked up from
//! mutation records, and removed elements leave the registry again.

use std::collections::HashSet;

use crate::focus::element::{ElementId, ElementInfo, Node};
use crate::keyboard::KeyboardController;

/// Structural change reported by the host for the observed subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRecord {
    /// Subtrees inserted into the document
    pub added: Vec<Node>,
    /// Subtrees removed from the document
    pub removed: Vec<Node>,
}

impl MutationRecord {
    /// A record of inserted subtrees.
    pub fn added(nodes: Vec<Node>) -> Self {
        Self {
            added: nodes,
            removed: Vec::new(),
        }
    }

    /// A record of removed subtrees.
    pub fn removed(nodes: Vec<Node>) -> Self {
        Self {
            added: Vec::new(),
            removed: nodes,
        }
    }
}

/// Registry of tracked elements plus the element the keyboard is shown for.
#[derive(Debug, Default)]
pub struct FocusTracker {
    registry: HashSet<ElementId>,
    observed_root: Option<ElementId>,
    focused: Option<ElementId>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `element` if it is editable.
    ///
    /// Returns false for non-editable elements and for elements already
    /// tracked, so attaching twice never doubles the reaction to one event.
    pub fn attach(&mut self, element: &ElementInfo) -> bool {
        if !element.is_editable() {
            return false;
        }
        let added = self.registry.insert(element.id);
        if added {
            tracing::trace!("Tracking {}", element.id);
        }
        added
    }

    /// Stops tracking `id`. Returns true if it was tracked.
    pub fn detach(&mut self, id: ElementId) -> bool {
        let removed = self.registry.remove(&id);
        if removed {
            tracing::trace!("Untracking {}", id);
        }
        removed
    }

    pub fn is_tracked(&self, id: ElementId) -> bool {
        self.registry.contains(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.registry.len()
    }

    /// Element the keyboard is currently shown for.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Attaches every editable element under `root`, `root` included.
    ///
    /// Returns the number of newly tracked elements.
    pub fn scan(&mut self, root: &Node) -> usize {
        let attached = root
            .elements()
            .into_iter()
            .filter(|element| self.attach(element))
            .count();
        tracing::debug!("Scan attached {} editable elements", attached);
        attached
    }

    /// Starts accepting mutation records for the subtree of `root`.
    pub fn observe_mutations(&mut self, root: ElementId) {
        tracing::debug!("Observing mutations under {}", root);
        self.observed_root = Some(root);
    }

    pub fn is_observing(&self) -> bool {
        self.observed_root.is_some()
    }

    /// Applies a mutation record.
    ///
    /// Removals are handled first. If the element the keyboard is shown for
    /// goes away, the keyboard is hidden since no blur will follow.
    pub fn on_mutation(&mut self, record: &MutationRecord, controller: &mut KeyboardController) {
        if !self.is_observing() {
            tracing::trace!("Ignoring mutation, not observing");
            return;
        }

        for node in &record.removed {
            for element in node.elements() {
                if self.detach(element.id) && self.focused == Some(element.id) {
                    self.focused = None;
                    controller.hide();
                }
            }
        }

        for node in &record.added {
            for element in node.elements() {
                self.attach(element);
            }
        }
    }

    /// Handles focus moving to `id`. Returns true if the keyboard was shown.
    pub fn on_focus(&mut self, id: ElementId, controller: &mut KeyboardController) -> bool {
        if !self.is_tracked(id) {
            return false;
        }
        tracing::debug!("Focus on {}", id);
        self.focused = Some(id);
        controller.show();
        true
    }

    /// Handles `id` losing focus. Returns true if the keyboard was hidden.
    pub fn on_blur(&mut self, id: ElementId, controller: &mut KeyboardController) -> bool {
        if !self.is_tracked(id) {
            return false;
        }
        tracing::debug!("Blur on {}", id);
        if self.focused == Some(id) {
            self.focused = None;
        }
        controller.hide();
        true
    }

    /// Shows the keyboard if an editable element already has focus.
    ///
    /// Used once at startup, before any focus event arrived.
    pub fn show_if_needed(&mut self, controller: &mut KeyboardController) -> bool {
        let Some(active) = controller.active_element() else {
            return false;
        };
        if !active.is_editable() {
            return false;
        }
        self.attach(&active);
        self.on_focus(active.id, controller)
    }
}

// ============================================================================
// Tests
// ============================================================================
