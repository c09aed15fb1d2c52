// SPDX-License-Identifier: GPL-3.0-only

//! Element model of the host document as seen by the focus tracker.
//!
//! The host reports elements by identity, tag kind and (for inputs) the
//! input type. Inserted subtrees arrive as `Node` trees so the tracker can
//! walk every element they contain.

use std::fmt;

/// Input types that accept text from the soft keyboard.
pub const EDITABLE_INPUT_TYPES: &[&str] = &[
    "date",
    "datetime-local",
    "email",
    "month",
    "number",
    "password",
    "search",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Host-assigned identity of a document element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of element this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Multi-line text area
    TextArea,
    /// Single-line input with its `type` attribute
    Input {
        /// Input type as reported by the host; empty means "text"
        input_type: String,
    },
    /// Any other element, by tag name
    Other {
        /// Tag name as reported by the host
        tag: String,
    },
}

/// Identity and kind of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    /// Element identity
    pub id: ElementId,
    /// Element kind
    pub kind: ElementKind,
}

impl ElementInfo {
    /// Creates a multi-line text area.
    pub fn text_area(id: u64) -> Self {
        Self {
            id: ElementId(id),
            kind: ElementKind::TextArea,
        }
    }

    /// Creates a single-line input of the given type.
    pub fn input(id: u64, input_type: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            kind: ElementKind::Input {
                input_type: input_type.into(),
            },
        }
    }

    /// Creates a non-input element.
    pub fn other(id: u64, tag: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            kind: ElementKind::Other { tag: tag.into() },
        }
    }

    /// Returns true if the soft keyboard can edit this element.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        match &self.kind {
            ElementKind::TextArea => true,
            ElementKind::Input { input_type } => is_editable_input_type(input_type),
            ElementKind::Other { .. } => false,
        }
    }

    /// Returns true if the element accepts line breaks.
    #[must_use]
    pub fn accepts_multiline(&self) -> bool {
        matches!(self.kind, ElementKind::TextArea)
    }
}

/// Checks an input `type` against the editable allow-list.
///
/// Matching is case-insensitive and a missing type counts as `text`, the
/// way the document reports it.
#[must_use]
pub fn is_editable_input_type(input_type: &str) -> bool {
    let input_type = input_type.trim();
    if input_type.is_empty() {
        return true;
    }
    EDITABLE_INPUT_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(input_type))
}

/// A node of an inserted or removed subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with its children in document order
    Element {
        /// The element itself
        info: ElementInfo,
        /// Child nodes
        children: Vec<Node>,
    },
    /// Text, comments and other non-element nodes
    Text,
}

impl Node {
    /// Creates a leaf element node.
    pub fn leaf(info: ElementInfo) -> Self {
        Node::Element {
            info,
            children: Vec::new(),
        }
    }

    /// Creates an element node with children.
    pub fn with_children(info: ElementInfo, children: Vec<Node>) -> Self {
        Node::Element { info, children }
    }

    /// Returns every element of this subtree, depth-first, parents first.
    ///
    /// Non-element nodes are skipped together with anything below them.
    pub fn elements(&self) -> Vec<&ElementInfo> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Node::Element { info, children } = node {
                out.push(info);
                stack.extend(children.iter().rev());
            }
        }
        out
    }
}

// ============================================================================
// Tests
// ============================================================================
