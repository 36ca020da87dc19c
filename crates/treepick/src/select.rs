#![forbid(unsafe_code)]

//! Selection controller: the stateful heart of the control.
//!
//! [`TreeSelect`] orchestrates the tree store and the keyboard navigator.
//! It owns everything the presentation layer binds to: dropdown
//! visibility, search state, the focus cursor, the ordered tag list, and
//! the outside-click subscription. Every handler commits its state change
//! first and then returns the host [`Notification`]s, so a reader of the
//! controller always observes one consistent snapshot.
//!
//! # Usage
//!
//! ```
//! use treepick::select::{Notification, TreeSelect};
//! use treepick_core::{NodeData, TreeSelectConfig};
//!
//! let data = vec![NodeData::new("Fruits", "fruits")
//!     .child(NodeData::new("Apple", "apple"))];
//! let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data, &[]);
//!
//! select.handle_trigger_click();
//! assert!(select.dropdown_open());
//! let notes = select.set_checked(select.visible_rows()[1].id, true);
//! assert!(matches!(notes.last(), Some(Notification::Change { .. })));
//! ```

use crate::navigation::{self, FocusTarget, NavAction};
use crate::store::{ArenaStore, SearchPredicate, TreeStore};
use crate::view::{self, Row};
use treepick_core::{
    ConfigFlags, KeyCode, KeyEvent, Mode, Node, NodeData, NodeId, Tag, TreeSelectConfig,
};

/// A host-facing notification, emitted strictly after the state commit
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The selection changed. `node` is the acted-upon node when one can
    /// be resolved; `None` for initialization and reorders.
    Change {
        /// The node the change acted on, if resolvable.
        node: Option<Node>,
        /// The full tag list after the commit.
        tags: Vec<Tag>,
    },
    /// A custom node action was triggered.
    Action {
        /// The node the action belongs to, if resolvable.
        node: Option<Node>,
        /// The action identifier.
        action: String,
    },
    /// A node was expanded or collapsed.
    NodeToggle(Node),
    /// The dropdown opened.
    Focus,
    /// The dropdown closed.
    Blur,
    /// Imperative focus should move to the given target (deferred
    /// post-commit effect).
    MoveFocus(FocusTarget),
    /// The row for this node should be scrolled into view.
    EnsureVisible(NodeId),
}

/// Result of dispatching one key event.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    /// Whether the event was consumed (default behaviour suppressed).
    pub consumed: bool,
    /// Notifications emitted by the consumed branch.
    pub notifications: Vec<Notification>,
}

impl KeyOutcome {
    fn pass() -> Self {
        Self {
            consumed: false,
            notifications: Vec::new(),
        }
    }
}

/// Scoped handle for the single document-level outside-click listener.
///
/// Acquired on Open-entry, released on every Closed-entry and on
/// teardown. Acquire and release are idempotent; at most one listener is
/// represented at a time. The host mirrors [`is_armed`](Self::is_armed)
/// into its real event source after each handler call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutsideClickSubscription {
    armed: bool,
}

impl OutsideClickSubscription {
    fn acquire(&mut self) {
        self.armed = true;
    }

    fn release(&mut self) {
        self.armed = false;
    }

    /// Whether the listener should currently be registered.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Reconcile the controller's ordered tag list against the store's
/// authoritative tag set.
///
/// Pure set difference by value: surviving tags keep their relative
/// order, vanished tags are removed, and every newly selected tag is
/// appended in store order. Handles arbitrary-size deltas from cascades.
///
/// Tags are keyed by `value`, which is assumed unique across the tree
/// (labels may repeat, values may not); two distinct nodes sharing a
/// value would alias to one tag.
#[must_use]
pub fn reconcile_tags(prev: &[Tag], store_tags: &[Tag]) -> Vec<Tag> {
    let mut next: Vec<Tag> = prev
        .iter()
        .filter(|t| store_tags.iter().any(|s| s.value == t.value))
        .cloned()
        .collect();
    for tag in store_tags {
        if !prev.iter().any(|t| t.value == tag.value) {
            next.push(tag.clone());
        }
    }
    next
}

/// The selection/search/navigation controller.
///
/// Generic over the tree store so hosts can substitute their own
/// implementation; [`ArenaStore`] is the default.
#[derive(Debug)]
pub struct TreeSelect<S: TreeStore = ArenaStore> {
    config: TreeSelectConfig,
    store: S,
    source: Vec<NodeData>,
    show_dropdown: bool,
    keep_dropdown_active: bool,
    search_term: String,
    search_mode_on: bool,
    all_nodes_hidden: bool,
    current_focus: Option<NodeId>,
    tags: Vec<Tag>,
    subscription: OutsideClickSubscription,
}

impl TreeSelect<ArenaStore> {
    /// Create a controller over the default arena store.
    ///
    /// Returns the initialization notifications: a `Change` with the
    /// initial tag list when `initial_values` selected anything, emitted
    /// before the first render commits.
    #[must_use]
    pub fn new(
        config: TreeSelectConfig,
        data: &[NodeData],
        initial_values: &[&str],
    ) -> (Self, Vec<Notification>) {
        Self::with_predicate(config, data, initial_values, None)
    }

    /// Like [`new`](Self::new), with a custom search predicate.
    #[must_use]
    pub fn with_predicate(
        config: TreeSelectConfig,
        data: &[NodeData],
        initial_values: &[&str],
        predicate: Option<SearchPredicate>,
    ) -> (Self, Vec<Notification>) {
        let store = ArenaStore::build(
            &[],
            config.mode,
            config.has(ConfigFlags::SHOW_PARTIALLY_SELECTED),
            predicate,
            &[],
        );
        let mut select = Self::from_store(config, store);
        let notes = select.set_data(data, initial_values);
        (select, notes)
    }
}

impl<S: TreeStore> TreeSelect<S> {
    /// Create a controller over a host-supplied store. The store starts
    /// empty until [`set_data`](Self::set_data) is called.
    #[must_use]
    pub fn from_store(config: TreeSelectConfig, store: S) -> Self {
        Self {
            config,
            store,
            source: Vec::new(),
            show_dropdown: false,
            keep_dropdown_active: false,
            search_term: String::new(),
            search_mode_on: false,
            all_nodes_hidden: false,
            current_focus: None,
            tags: Vec::new(),
            subscription: OutsideClickSubscription::default(),
        }
    }

    // --- State Access ---

    /// The configuration this controller was built with.
    #[must_use]
    pub fn config(&self) -> &TreeSelectConfig {
        &self.config
    }

    /// The tree store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub fn dropdown_open(&self) -> bool {
        self.show_dropdown
    }

    /// The raw search term, for match highlighting.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Whether a non-empty filter term is narrowing the tree.
    #[must_use]
    pub fn search_mode_on(&self) -> bool {
        self.search_mode_on
    }

    /// Whether the active filter hides every node.
    #[must_use]
    pub fn all_nodes_hidden(&self) -> bool {
        self.all_nodes_hidden
    }

    /// The focus cursor: the node keyboard navigation currently targets.
    #[must_use]
    pub fn current_focus(&self) -> Option<NodeId> {
        self.current_focus
    }

    /// The ordered tag list.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// The outside-click subscription handle.
    #[must_use]
    pub fn outside_click(&self) -> &OutsideClickSubscription {
        &self.subscription
    }

    /// Flatten the active view (filtered during search, full otherwise)
    /// into rows for rendering and navigation.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<Row> {
        view::project(&self.store)
    }

    // --- Initialization ---

    /// (Re-)initialize from host data.
    ///
    /// A no-op when `data` deep-equals the previous data. Otherwise the
    /// store is rebuilt, nodes whose value appears in `initial_values`
    /// are seeded checked, and the tag list is ordered by the initial
    /// value list (values with no matching node are dropped, never a
    /// crash). A previously focused node keeps its flag when it still
    /// resolves in the new tree.
    pub fn set_data(&mut self, data: &[NodeData], initial_values: &[&str]) -> Vec<Notification> {
        if self.source.as_slice() == data {
            return Vec::new();
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("set_data", roots = data.len()).entered();

        self.source = data.to_vec();
        let initial: Vec<String> = initial_values.iter().map(|v| (*v).to_string()).collect();
        self.store.rebuild(data, &initial);

        let store_tags = self.store.tags();
        let mut tags: Vec<Tag> = Vec::new();
        for value in &initial {
            if tags.iter().any(|t| t.value == *value) {
                continue;
            }
            if let Some(tag) = store_tags.iter().find(|t| t.value == *value) {
                tags.push(tag.clone());
            }
        }
        self.tags = tags;

        // Cursor continuity across a data swap.
        match self.current_focus {
            Some(focus) if self.store.node(focus).is_some() => {
                self.store.set_focus_flag(Some(focus));
            }
            _ => self.current_focus = None,
        }

        if self.config.dropdown != treepick_core::DropdownPolicy::Default && !self.show_dropdown {
            self.show_dropdown = true;
            self.subscription.acquire();
        }

        if self.tags.is_empty() {
            Vec::new()
        } else {
            vec![Notification::Change {
                node: None,
                tags: self.tags.clone(),
            }]
        }
    }

    // --- Dropdown Visibility ---

    /// Handle a click on the trigger (or a synthetic open from the
    /// keyboard). Toggles visibility, except that forced-open and the
    /// keep-active latch retain Open.
    pub fn handle_trigger_click(&mut self) -> Vec<Notification> {
        if self.config.has(ConfigFlags::DISABLED) {
            return Vec::new();
        }
        let next =
            self.config.forced_open() || self.keep_dropdown_active || !self.show_dropdown;
        if next == self.show_dropdown {
            return Vec::new();
        }

        let mut notes = Vec::new();
        if next {
            #[cfg(feature = "tracing")]
            tracing::debug!("dropdown open");
            self.subscription.acquire();
            self.show_dropdown = true;
            notes.push(Notification::Focus);
            notes.push(Notification::MoveFocus(FocusTarget::SearchInput));
        } else {
            self.close_dropdown(&mut notes);
        }
        notes
    }

    /// Handle a document-level click. Ignored when the click is inside
    /// the control's subtree, when forced-open is active, or when the
    /// dropdown is already closed.
    pub fn handle_outside_click(&mut self, inside_control: bool) -> Vec<Notification> {
        if self.config.forced_open() || inside_control || !self.show_dropdown {
            return Vec::new();
        }
        let mut notes = Vec::new();
        self.close_dropdown(&mut notes);
        notes
    }

    /// The search input gained or lost focus; while focused, trigger
    /// clicks keep the dropdown active instead of toggling it.
    pub fn search_input_focus(&mut self, focused: bool) {
        self.keep_dropdown_active = focused;
    }

    /// Closed-entry: release the listener, reset search, emit Blur.
    fn close_dropdown(&mut self, notes: &mut Vec<Notification>) {
        #[cfg(feature = "tracing")]
        tracing::debug!("dropdown close");
        self.subscription.release();
        self.reset_search_state();
        self.show_dropdown = false;
        notes.push(Notification::Blur);
    }

    fn reset_search_state(&mut self) {
        self.search_term.clear();
        self.store.restore();
        self.search_mode_on = false;
        self.all_nodes_hidden = false;
    }

    // --- Search ---

    /// Apply a new search term. No debounce is applied at this layer.
    pub fn set_search(&mut self, text: &str) {
        let outcome = self.store.filter_tree(
            text,
            self.config.has(ConfigFlags::KEEP_TREE_ON_SEARCH),
            self.config.has(ConfigFlags::KEEP_CHILDREN_ON_SEARCH),
        );
        self.search_term = text.to_string();
        self.search_mode_on = !text.is_empty();
        self.all_nodes_hidden = outcome.all_hidden;
    }

    // --- Selection ---

    /// Flip a node's checked state.
    ///
    /// Delegates the cascade to the store, reconciles the tag list as a
    /// set difference, closes the dropdown in the same commit for
    /// single-pick modes (unless configured open), moves the focus
    /// cursor to the acted node, and emits exactly one `Change` after
    /// the commit. Stale ids degrade to a `Change` with no node.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Vec<Notification> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("set_checked", id = id.0, checked).entered();

        let mut notes = Vec::new();
        self.store.set_checked(id, checked);
        let store_tags = self.store.tags();
        self.tags = reconcile_tags(&self.tags, &store_tags);

        let closing = self.config.mode.is_single_select()
            && !self.config.has(ConfigFlags::KEEP_OPEN_ON_SELECT)
            && !self.config.forced_open()
            && self.show_dropdown;
        if closing {
            self.close_dropdown(&mut notes);
        } else if self.config.has(ConfigFlags::CLEAR_SEARCH_ON_CHANGE) && self.search_mode_on {
            self.reset_search_state();
        }

        self.store.set_focus_flag(Some(id));
        self.current_focus = Some(id);

        notes.push(Notification::Change {
            node: self.store.node(id).cloned(),
            tags: self.tags.clone(),
        });
        notes
    }

    // --- Expansion ---

    /// Flip a node's expanded state. No tag-list effect.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Vec<Notification> {
        self.store.toggle_expanded(id);
        match self.store.node(id) {
            Some(node) => vec![Notification::NodeToggle(node.clone())],
            None => Vec::new(),
        }
    }

    // --- Tags ---

    /// Remove a tag; equivalent to unchecking its node. Keyboard-driven
    /// removals additionally request an imperative focus move computed
    /// from the pre- and post-removal tag lists.
    pub fn remove_tag(&mut self, id: NodeId, via_keyboard: bool) -> Vec<Notification> {
        let prev = self.tags.clone();
        let mut notes = self.set_checked(id, false);
        if via_keyboard {
            let target = navigation::focus_after_tag_removal(id, &prev, &self.tags);
            notes.push(Notification::MoveFocus(target));
        }
        notes
    }

    /// Replace the tag list with a host-supplied order (e.g. after a
    /// drag interaction). Reordering is presentation-origin truth; the
    /// store is not consulted.
    pub fn reorder_tags(&mut self, tags: Vec<Tag>) -> Vec<Notification> {
        self.tags = tags;
        vec![Notification::Change {
            node: None,
            tags: self.tags.clone(),
        }]
    }

    // --- Actions ---

    /// Forward a custom node action to the host.
    pub fn trigger_action(&mut self, id: NodeId, action: &str) -> Vec<Notification> {
        vec![Notification::Action {
            node: self.store.node(id).cloned(),
            action: action.to_string(),
        }]
    }

    // --- Keyboard Dispatch ---

    /// Classify and dispatch one key event. Exactly one branch executes
    /// per call; consumed branches suppress default behaviour.
    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        if self.config.has(ConfigFlags::DISABLED) {
            return KeyOutcome::pass();
        }
        let code = event.code;

        if !self.show_dropdown
            && (navigation::is_navigation_key(code, false) || code.is_alphanumeric())
        {
            // Two-step: commit the open state, then reprocess the same
            // event against it. Character keys fall through to the
            // search input instead.
            let notifications = self.handle_trigger_click();
            if code.is_alphanumeric() {
                return KeyOutcome {
                    consumed: false,
                    notifications,
                };
            }
            let mut outcome = self.handle_key(event);
            let mut merged = notifications;
            merged.append(&mut outcome.notifications);
            return KeyOutcome {
                consumed: true,
                notifications: merged,
            };
        }

        if self.show_dropdown && navigation::is_navigation_key(code, true) {
            let rows = self.visible_rows();
            let outcome = navigation::handle_navigation_key(
                self.current_focus,
                &rows,
                code,
                self.config.has(ConfigFlags::READ_ONLY),
                !self.search_mode_on,
            );

            let mut notes = Vec::new();
            match outcome.action {
                Some(NavAction::SetChecked(id, state)) => {
                    notes.extend(self.set_checked(id, state));
                }
                Some(NavAction::ToggleExpanded(id)) => {
                    notes.extend(self.toggle_expanded(id));
                }
                None => {}
            }
            if let Some(focus) = outcome.new_focus
                && Some(focus) != self.current_focus
            {
                self.store.set_focus_flag(Some(focus));
                self.current_focus = Some(focus);
                notes.push(Notification::EnsureVisible(focus));
            }
            return KeyOutcome {
                consumed: true,
                notifications: notes,
            };
        }

        if self.show_dropdown
            && matches!(code, KeyCode::Escape | KeyCode::Tab | KeyCode::BackTab)
        {
            // SimpleSelect treats Escape/Tab on a visible focused node as
            // an implicit confirm.
            if self.config.mode == Mode::SimpleSelect
                && let Some(focus) = self.current_focus
                && self.store.visible_ids().contains(&focus)
            {
                return KeyOutcome {
                    consumed: true,
                    notifications: self.set_checked(focus, true),
                };
            }
            self.keep_dropdown_active = false;
            let mut notes = Vec::new();
            self.close_dropdown(&mut notes);
            return KeyOutcome {
                consumed: true,
                notifications: notes,
            };
        }

        if code == KeyCode::Backspace && self.search_term.is_empty() && !self.tags.is_empty() {
            if let Some(last) = self.tags.last().map(|t| t.id) {
                return KeyOutcome {
                    consumed: true,
                    notifications: self.remove_tag(last, true),
                };
            }
        }

        KeyOutcome::pass()
    }
}
