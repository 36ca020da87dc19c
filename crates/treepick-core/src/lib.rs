#![forbid(unsafe_code)]

//! Core types for the treepick selection controller.
//!
//! This crate defines the vocabulary the controller crate speaks:
//! canonical key events, the hierarchical node/tag data model, and the
//! configuration surface. It carries no behaviour beyond constructors and
//! small predicates; all stateful logic lives in `treepick`.

pub mod config;
pub mod event;
pub mod node;

pub use config::{ConfigFlags, DropdownPolicy, Mode, Texts, TreeSelectConfig};
pub use event::{KeyCode, KeyEvent, Modifiers};
pub use node::{CheckedState, Node, NodeData, NodeId, Tag};
