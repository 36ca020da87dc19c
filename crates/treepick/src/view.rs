#![forbid(unsafe_code)]

//! Row projection of the active tree view.
//!
//! Renderers and the keyboard navigator both consume the tree as a flat
//! list of [`Row`]s in traversal order: the filtered view during search,
//! the full tree otherwise, honoring expanded flags either way.

use crate::store::TreeStore;
use treepick_core::{CheckedState, NodeId};

/// One visible node, flattened for rendering and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Backing node id.
    pub id: NodeId,
    /// Nesting depth, 0 for roots.
    pub depth: usize,
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
    /// Whether the focus cursor renders on this row.
    pub focused: bool,
    /// Whether the node has children.
    pub has_children: bool,
    /// Whether the node matched the active filter term (always true
    /// outside search mode).
    pub matched: bool,
}

/// Flatten the store's currently visible nodes into rows.
pub fn project<S: TreeStore>(store: &S) -> Vec<Row> {
    store
        .visible_ids()
        .into_iter()
        .filter_map(|id| {
            let node = store.node(id)?;
            let mut depth = 0;
            let mut parent = node.parent;
            while let Some(p) = parent {
                depth += 1;
                parent = store.node(p).and_then(|n| n.parent);
            }
            Some(Row {
                id,
                depth,
                label: node.label.clone(),
                value: node.value.clone(),
                checked: node.checked,
                disabled: node.disabled,
                expanded: node.expanded,
                focused: node.focused,
                has_children: node.has_children(),
                matched: store.is_match(id),
            })
        })
        .collect()
}
