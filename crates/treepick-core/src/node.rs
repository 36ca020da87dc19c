#![forbid(unsafe_code)]

//! Node and tag data model.
//!
//! Host applications describe their options as a tree of [`NodeData`] and
//! hand it to the controller; the tree store annotates it into an arena of
//! [`Node`]s addressed by [`NodeId`]. Selected nodes are projected into the
//! flat, ordered [`Tag`] list shown outside the tree.
//!
//! # Example
//!
//! ```
//! use treepick_core::NodeData;
//!
//! let data = NodeData::new("Fruits", "fruits")
//!     .child(NodeData::new("Apple", "apple"))
//!     .child(NodeData::new("Pear", "pear"));
//!
//! assert_eq!(data.label, "Fruits");
//! assert_eq!(data.children.len(), 2);
//! ```

/// Stable identifier of a node, unique within one tree instance.
///
/// Ids are arena indices: rebuilding the store from identical data yields
/// identical ids, but ids must not be persisted across differing data sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The arena index this id names.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tri-state checked display state.
///
/// `Partial` is derived from descendant state by the store and is never
/// written directly by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckedState {
    /// Not selected.
    #[default]
    Unchecked,
    /// Selected.
    Checked,
    /// Some but not all descendants are selected (display only).
    Partial,
}

impl CheckedState {
    /// Whether the node itself is selected.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        matches!(self, Self::Checked)
    }
}

/// Host-supplied hierarchical input, before store annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display label.
    pub label: String,
    /// Domain value; not necessarily unique across duplicate labels.
    pub value: String,
    /// Ordered children; empty means leaf.
    pub children: Vec<NodeData>,
    /// Seed checked state.
    pub checked: bool,
    /// Seed disabled state.
    pub disabled: bool,
    /// Seed expanded state.
    pub expanded: bool,
}

impl NodeData {
    /// Create a node with the given label and value.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            children: Vec::new(),
            checked: false,
            disabled: false,
            expanded: false,
        }
    }

    /// Add a child node.
    #[must_use]
    pub fn child(mut self, node: NodeData) -> Self {
        self.children.push(node);
        self
    }

    /// Set children from a vec.
    #[must_use]
    pub fn with_children(mut self, nodes: Vec<NodeData>) -> Self {
        self.children = nodes;
        self
    }

    /// Seed the checked state.
    #[must_use]
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Seed the disabled state.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Seed the expanded state.
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// A store-owned node: [`NodeData`] annotated with runtime state and
/// arena wiring.
///
/// # Invariants
///
/// 1. `checked == Partial` is derived from descendants, never set by the
///    controller.
/// 2. At most one node in the whole tree has `focused == true`; the store's
///    focus-flag setter is the only writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// This node's id.
    pub id: NodeId,
    /// Parent id, `None` for roots.
    pub parent: Option<NodeId>,
    /// Ordered children ids; empty means leaf.
    pub children: Vec<NodeId>,
    /// Display label.
    pub label: String,
    /// Domain value.
    pub value: String,
    /// Tri-state checked state.
    pub checked: CheckedState,
    /// Whether the node can be interacted with.
    pub disabled: bool,
    /// Whether children are shown.
    pub expanded: bool,
    /// Whether keyboard focus currently renders on this node.
    pub focused: bool,
    /// Seeded from the initial value set at (re-)initialization.
    pub is_default_value: bool,
}

impl Node {
    /// Whether this node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A flat, ordered projection of one selected node.
///
/// The tag list's element order is the selection order (append-on-add),
/// except immediately after initialization where it matches the order of
/// the supplied initial-value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Backing node id; always resolves in the current tree.
    pub id: NodeId,
    /// Domain value of the backing node.
    pub value: String,
    /// Display label of the backing node.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_data_builder() {
        let data = NodeData::new("A", "a")
            .child(NodeData::new("A1", "a1").with_disabled(true))
            .with_expanded(true);
        assert_eq!(data.children.len(), 1);
        assert!(data.expanded);
        assert!(data.children[0].disabled);
        assert!(!data.checked);
    }

    #[test]
    fn node_data_deep_equality() {
        let a = NodeData::new("A", "a").child(NodeData::new("A1", "a1"));
        let b = NodeData::new("A", "a").child(NodeData::new("A1", "a1"));
        let c = NodeData::new("A", "a").child(NodeData::new("A1", "a1").with_checked(true));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn checked_state_predicates() {
        assert!(CheckedState::Checked.is_checked());
        assert!(!CheckedState::Partial.is_checked());
        assert!(!CheckedState::Unchecked.is_checked());
        assert_eq!(CheckedState::default(), CheckedState::Unchecked);
    }

    #[test]
    fn node_id_index() {
        assert_eq!(NodeId(7).index(), 7);
    }
}
