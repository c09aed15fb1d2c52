// SPDX-License-Identifier: GPL-3.0-only

//! Focus tracking for the host document.
//!
//! - `element`: element identity, kind and the editability predicate
//! - `tracker`: registry of editable elements and the show/hide decisions

pub mod element;
pub mod tracker;

pub use element::{
    EDITABLE_INPUT_TYPES, ElementId, ElementInfo, ElementKind, Node, is_editable_input_type,
};
pub use tracker::{FocusTracker, MutationRecord};
