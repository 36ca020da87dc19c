#![forbid(unsafe_code)]

//! Tree store: canonical node data and derived state.
//!
//! The store owns the arena of [`Node`]s and implements everything the
//! controller delegates: checked-state cascades per selection mode, the
//! authoritative tag walk, search filtering with a restorable pre-search
//! snapshot, and expansion toggling.
//!
//! The controller consumes the store through the [`TreeStore`] trait, so a
//! host can substitute its own implementation; [`ArenaStore`] is the
//! default.
//!
//! # Architecture
//!
//! Nodes live in a flat `Vec` addressed by [`NodeId`] indices, with
//! parent/child relations as id references. The filtered view is a pair of
//! per-node bit vectors (visible, matched) plus the saved expanded flags —
//! restoring a search is a copy of a small view, never a deep clone of the
//! tree.

use treepick_core::{CheckedState, Mode, Node, NodeData, NodeId, Tag};

/// Pluggable search predicate: does `node` match `term`?
pub type SearchPredicate = Box<dyn Fn(&str, &Node) -> bool>;

/// Result of applying a filter term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    /// True iff the filtered tree has zero matching nodes.
    pub all_hidden: bool,
}

/// Contract the selection controller consumes.
pub trait TreeStore {
    /// Look up a node by id. Stale ids yield `None`, never a panic.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Number of nodes in the arena.
    fn len(&self) -> usize;

    /// Whether the arena is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root node ids in tree order.
    fn roots(&self) -> &[NodeId];

    /// The authoritative current tag set, in tree order.
    fn tags(&self) -> Vec<Tag>;

    /// Flip a node's checked state, cascading per the store's mode.
    /// Unknown ids are a no-op.
    fn set_checked(&mut self, id: NodeId, checked: bool);

    /// Compute the filtered view for `term`.
    ///
    /// Entering search mode snapshots the expanded flags; refiltering
    /// recomputes from that snapshot so each term sees the pre-search
    /// shape.
    fn filter_tree(
        &mut self,
        term: &str,
        keep_tree_shape: bool,
        keep_children_visible: bool,
    ) -> FilterOutcome;

    /// Undo the last filter, restoring pre-search expanded flags.
    /// Idempotent; a no-op when not filtering.
    fn restore(&mut self);

    /// Flip a node's expanded flag. Unknown ids are a no-op.
    fn toggle_expanded(&mut self, id: NodeId);

    /// Whether a filter view is currently active.
    fn is_filtering(&self) -> bool;

    /// Whether a node matched the active filter term. Always true when no
    /// filter is active.
    fn is_match(&self, id: NodeId) -> bool;

    /// Ids of the currently visible nodes, in traversal order: the
    /// filtered view during search, the full tree otherwise, honoring
    /// expanded flags either way.
    fn visible_ids(&self) -> Vec<NodeId>;

    /// Move the node-level `focused` flag.
    ///
    /// Clears the previous holder and sets the new one, so at most one
    /// node carries the flag at any time.
    fn set_focus_flag(&mut self, id: Option<NodeId>);

    /// Replace the tree with freshly annotated data, keeping the store's
    /// mode and predicate. Nodes whose value appears in `initial_values`
    /// are marked as default values and seeded checked. Any active filter
    /// and focus flag are discarded.
    fn rebuild(&mut self, data: &[NodeData], initial_values: &[String]);
}

/// Saved view for an active filter.
#[derive(Debug, Clone)]
struct FilterView {
    visible: Vec<bool>,
    matched: Vec<bool>,
    saved_expanded: Vec<bool>,
    all_hidden: bool,
}

/// Default in-memory tree store backed by a node arena.
pub struct ArenaStore {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    mode: Mode,
    show_partially_selected: bool,
    predicate: SearchPredicate,
    filter: Option<FilterView>,
    focused: Option<NodeId>,
}

impl std::fmt::Debug for ArenaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaStore")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("mode", &self.mode)
            .field("show_partially_selected", &self.show_partially_selected)
            .field("filtering", &self.filter.is_some())
            .field("focused", &self.focused)
            .finish()
    }
}

/// Default predicate: case-insensitive substring match on the label.
fn default_predicate(term: &str, node: &Node) -> bool {
    node.label.to_lowercase().contains(&term.to_lowercase())
}

impl ArenaStore {
    /// Build a store from host data.
    ///
    /// Nodes whose value appears in `initial_values` are marked as default
    /// values and seeded checked, on top of any `checked` seeds already in
    /// the data. `predicate` defaults to case-insensitive substring match
    /// on the label.
    #[must_use]
    pub fn build(
        data: &[NodeData],
        mode: Mode,
        show_partially_selected: bool,
        predicate: Option<SearchPredicate>,
        initial_values: &[String],
    ) -> Self {
        let mut store = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            mode,
            show_partially_selected,
            predicate: predicate.unwrap_or_else(|| Box::new(default_predicate)),
            filter: None,
            focused: None,
        };
        store.rebuild(data, initial_values);
        store
    }

    fn insert(&mut self, data: &NodeData, parent: Option<NodeId>, initial: &[String]) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let is_default = initial.iter().any(|v| *v == data.value);
        self.nodes.push(Node {
            id,
            parent,
            children: Vec::new(),
            label: data.label.clone(),
            value: data.value.clone(),
            checked: if data.checked || is_default {
                CheckedState::Checked
            } else {
                CheckedState::Unchecked
            },
            disabled: data.disabled,
            expanded: data.expanded,
            focused: false,
            is_default_value: is_default,
        });

        for child in &data.children {
            let child_id = self.insert(child, Some(id), initial);
            self.nodes[id.index()].children.push(child_id);
        }
        id
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Set the whole subtree rooted at `id` to `state`.
    fn cascade_down(&mut self, id: NodeId, state: CheckedState) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_mut(current) {
                node.checked = state;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Recompute derived partial states.
    ///
    /// A node keeps `Checked` if set; otherwise it becomes `Partial` when
    /// partial display is enabled and any descendant is checked, else
    /// `Unchecked`. Post-order, so descendants resolve first.
    fn refresh_partials(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.refresh_partials_below(root);
        }
    }

    fn refresh_partials_below(&mut self, id: NodeId) -> bool {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return false,
        };

        let mut any_below = false;
        for child in children {
            any_below |= self.refresh_partials_below(child);
        }

        let show_partial = self.show_partially_selected;
        let Some(node) = self.get_mut(id) else {
            return any_below;
        };
        if node.checked != CheckedState::Checked {
            node.checked = if show_partial && any_below {
                CheckedState::Partial
            } else {
                CheckedState::Unchecked
            };
        }
        any_below || node.checked == CheckedState::Checked
    }

    fn collect_tags(&self, id: NodeId, out: &mut Vec<Tag>) {
        let Some(node) = self.get(id) else { return };
        let checked = node.checked.is_checked();
        if checked {
            out.push(Tag {
                id: node.id,
                value: node.value.clone(),
                label: node.label.clone(),
            });
        }
        // A checked branch covers its subtree, except in hierarchical mode
        // where every checked node stands for itself.
        if !checked || self.mode == Mode::Hierarchical {
            for child in &node.children {
                self.collect_tags(*child, out);
            }
        }
    }

    fn is_visible(&self, id: NodeId) -> bool {
        match &self.filter {
            Some(view) => view.visible.get(id.index()).copied().unwrap_or(false),
            None => true,
        }
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if !self.is_visible(id) {
            return;
        }
        let Some(node) = self.get(id) else { return };
        out.push(id);
        if node.expanded {
            for child in &node.children {
                self.collect_visible(*child, out);
            }
        }
    }

    fn mark_descendants(&self, id: NodeId, set: &mut [bool]) {
        if let Some(node) = self.get(id) {
            for child in &node.children {
                set[child.index()] = true;
                self.mark_descendants(*child, set);
            }
        }
    }
}

impl TreeStore for ArenaStore {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.get(id)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn tags(&self) -> Vec<Tag> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_tags(*root, &mut out);
        }
        out
    }

    fn set_checked(&mut self, id: NodeId, checked: bool) {
        if self.get(id).is_none() {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("set_checked", id = id.0, checked).entered();

        let state = if checked {
            CheckedState::Checked
        } else {
            CheckedState::Unchecked
        };

        match self.mode {
            Mode::MultiSelect => {
                self.cascade_down(id, state);
                // Unchecking breaks out of a checked subtree: every checked
                // ancestor stops covering this node, so it must release its
                // own checked state (siblings keep theirs).
                if !checked {
                    let mut parent = self.get(id).and_then(|n| n.parent);
                    while let Some(p) = parent {
                        parent = match self.get_mut(p) {
                            Some(node) => {
                                node.checked = CheckedState::Unchecked;
                                node.parent
                            }
                            None => None,
                        };
                    }
                }
            }
            Mode::SimpleSelect | Mode::RadioSelect => {
                if checked {
                    for node in &mut self.nodes {
                        node.checked = CheckedState::Unchecked;
                    }
                }
                if let Some(node) = self.get_mut(id) {
                    node.checked = state;
                }
            }
            Mode::Hierarchical => {
                if let Some(node) = self.get_mut(id) {
                    node.checked = state;
                }
            }
        }
        self.refresh_partials();
    }

    fn filter_tree(
        &mut self,
        term: &str,
        keep_tree_shape: bool,
        keep_children_visible: bool,
    ) -> FilterOutcome {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("filter_tree", term, keep_tree_shape).entered();

        // Each term filters the pre-search shape, not the previous term's
        // forced expansions.
        let saved_expanded = match self.filter.take() {
            Some(previous) => {
                for (node, expanded) in self.nodes.iter_mut().zip(&previous.saved_expanded) {
                    node.expanded = *expanded;
                }
                previous.saved_expanded
            }
            None => self.nodes.iter().map(|n| n.expanded).collect(),
        };

        let count = self.nodes.len();
        let mut matched = vec![false; count];
        for (i, node) in self.nodes.iter().enumerate() {
            matched[i] = (self.predicate)(term, node);
        }

        let mut visible = if keep_tree_shape {
            vec![true; count]
        } else {
            matched.clone()
        };

        // Ancestors of matches stay visible and are forced open so every
        // match is reachable.
        for i in 0..count {
            if !matched[i] {
                continue;
            }
            let mut parent = self.nodes[i].parent;
            while let Some(p) = parent {
                visible[p.index()] = true;
                parent = match self.get_mut(p) {
                    Some(node) => {
                        node.expanded = true;
                        node.parent
                    }
                    None => None,
                };
            }
            if keep_children_visible {
                let id = self.nodes[i].id;
                self.mark_descendants(id, &mut visible);
                if let Some(node) = self.get_mut(id) {
                    node.expanded = true;
                }
            }
        }

        let all_hidden = !matched.iter().any(|m| *m);
        self.filter = Some(FilterView {
            visible,
            matched,
            saved_expanded,
            all_hidden,
        });
        FilterOutcome { all_hidden }
    }

    fn restore(&mut self) {
        if let Some(view) = self.filter.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!("restore pre-search tree");
            for (node, expanded) in self.nodes.iter_mut().zip(&view.saved_expanded) {
                node.expanded = *expanded;
            }
        }
    }

    fn toggle_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.expanded = !node.expanded;
        }
    }

    fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    fn is_match(&self, id: NodeId) -> bool {
        match &self.filter {
            Some(view) => view.matched.get(id.index()).copied().unwrap_or(false),
            None => true,
        }
    }

    fn visible_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_visible(*root, &mut out);
        }
        out
    }

    fn set_focus_flag(&mut self, id: Option<NodeId>) {
        if let Some(prev) = self.focused.take()
            && let Some(node) = self.get_mut(prev)
        {
            node.focused = false;
        }
        if let Some(next) = id
            && let Some(node) = self.get_mut(next)
        {
            node.focused = true;
            self.focused = Some(next);
        }
    }

    fn rebuild(&mut self, data: &[NodeData], initial_values: &[String]) {
        self.nodes.clear();
        self.roots.clear();
        self.filter = None;
        self.focused = None;
        for item in data {
            let id = self.insert(item, None, initial_values);
            self.roots.push(id);
        }
        self.refresh_partials();
    }
}

impl ArenaStore {
    /// Whether the active filter hides every node.
    #[must_use]
    pub fn all_hidden(&self) -> bool {
        self.filter.as_ref().is_some_and(|v| v.all_hidden)
    }
}
