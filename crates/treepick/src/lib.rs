#![forbid(unsafe_code)]

//! Hierarchical multi-select controller.
//!
//! A headless dropdown tree select: the full behavior of a tag-based
//! tree picker — selection cascades, incremental search with restore,
//! keyboard navigation, dropdown visibility — with no rendering attached.
//! A host binds [`TreeSelect`] to its presentation layer, forwards input
//! events, and applies the returned [`Notification`]s.
//!
//! # Layout
//!
//! - [`store`]: the node arena behind the [`store::TreeStore`] trait —
//!   cascades, tag walks, filter views
//! - [`view`]: flattens the visible tree into [`view::Row`]s
//! - [`navigation`]: pure keyboard classification and target computation
//! - [`select`]: the stateful controller tying it together
//!
//! Core data types (nodes, configuration, key events) live in the
//! `treepick-core` crate and are re-exported from [`core`].
//!
//! # Quick Start
//!
//! ```
//! use treepick::{Mode, NodeData, TreeSelect, TreeSelectConfig};
//!
//! let data = vec![
//!     NodeData::new("Fruits", "fruits")
//!         .child(NodeData::new("Apple", "apple"))
//!         .child(NodeData::new("Pear", "pear")),
//! ];
//! let config = TreeSelectConfig::new().with_mode(Mode::MultiSelect);
//! let (mut select, _) = TreeSelect::new(config, &data, &["pear"]);
//!
//! assert_eq!(select.tags().len(), 1);
//! select.handle_trigger_click();
//! assert!(select.dropdown_open());
//! ```

pub mod navigation;
pub mod select;
pub mod store;
pub mod view;

pub use treepick_core as core;

pub use navigation::{FocusTarget, NavAction, NavOutcome};
pub use select::{KeyOutcome, Notification, OutsideClickSubscription, TreeSelect, reconcile_tags};
pub use store::{ArenaStore, FilterOutcome, SearchPredicate, TreeStore};
pub use view::{Row, project};

pub use treepick_core::{
    CheckedState, ConfigFlags, DropdownPolicy, KeyCode, KeyEvent, Mode, Modifiers, Node, NodeData,
    NodeId, Tag, Texts, TreeSelectConfig,
};
