#![forbid(unsafe_code)]

//! Keyboard navigation: pure key classification and target computation.
//!
//! Nothing here mutates state. [`handle_navigation_key`] maps a key press
//! plus the current focus and visible row list to a [`NavOutcome`]; the
//! controller applies the outcome (focus commit, checkbox or expansion
//! toggle) so ordering guarantees stay in one place.

use crate::view::Row;
use treepick_core::{KeyCode, NodeId, Tag};

/// Where imperative focus should land after a keyboard interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The search input.
    SearchInput,
    /// The chip of the given tag.
    Tag(NodeId),
}

/// Side effect requested by a navigation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Toggle the node's checked state to the given value.
    SetChecked(NodeId, bool),
    /// Flip the node's expanded state.
    ToggleExpanded(NodeId),
}

/// Result of classifying one navigation key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavOutcome {
    /// The node the focus cursor should move to, if it changed.
    pub new_focus: Option<NodeId>,
    /// A state change the controller should perform.
    pub action: Option<NavAction>,
}

/// Whether `code` is a navigation key in the given dropdown state.
///
/// With the dropdown closed only the keys that should open it count;
/// open, the full navigation set applies.
#[must_use]
pub fn is_navigation_key(code: KeyCode, dropdown_open: bool) -> bool {
    match code {
        KeyCode::Up | KeyCode::Down | KeyCode::Home | KeyCode::End => true,
        KeyCode::Left
        | KeyCode::Right
        | KeyCode::PageUp
        | KeyCode::PageDown
        | KeyCode::Enter => dropdown_open,
        KeyCode::Char(' ') => dropdown_open,
        _ => false,
    }
}

/// Map a navigation key to a focus move and/or requested action.
///
/// `allow_expand_toggle` gates Left/Right collapse/expand; it is off
/// during search, where the filter owns the expansion state.
#[must_use]
pub fn handle_navigation_key(
    current_focus: Option<NodeId>,
    rows: &[Row],
    code: KeyCode,
    read_only: bool,
    allow_expand_toggle: bool,
) -> NavOutcome {
    if rows.is_empty() {
        return NavOutcome::default();
    }
    let index = current_focus.and_then(|id| rows.iter().position(|r| r.id == id));

    match code {
        KeyCode::Down => NavOutcome {
            new_focus: Some(match index {
                Some(i) if i + 1 < rows.len() => rows[i + 1].id,
                Some(i) => rows[i].id,
                None => rows[0].id,
            }),
            action: None,
        },
        KeyCode::Up => NavOutcome {
            new_focus: Some(match index {
                Some(i) if i > 0 => rows[i - 1].id,
                Some(i) => rows[i].id,
                None => rows[rows.len() - 1].id,
            }),
            action: None,
        },
        KeyCode::Home | KeyCode::PageUp => NavOutcome {
            new_focus: Some(rows[0].id),
            action: None,
        },
        KeyCode::End | KeyCode::PageDown => NavOutcome {
            new_focus: Some(rows[rows.len() - 1].id),
            action: None,
        },
        KeyCode::Left => {
            let Some(i) = index else {
                return NavOutcome::default();
            };
            let row = &rows[i];
            if row.has_children && row.expanded && allow_expand_toggle {
                NavOutcome {
                    new_focus: current_focus,
                    action: Some(NavAction::ToggleExpanded(row.id)),
                }
            } else {
                // Nearest earlier row one level up is the parent.
                let parent = rows[..i].iter().rev().find(|r| r.depth < row.depth);
                NavOutcome {
                    new_focus: parent.map(|r| r.id).or(current_focus),
                    action: None,
                }
            }
        }
        KeyCode::Right => {
            let Some(i) = index else {
                return NavOutcome::default();
            };
            let row = &rows[i];
            if row.has_children && !row.expanded && allow_expand_toggle {
                NavOutcome {
                    new_focus: current_focus,
                    action: Some(NavAction::ToggleExpanded(row.id)),
                }
            } else if row.has_children && i + 1 < rows.len() && rows[i + 1].depth > row.depth {
                NavOutcome {
                    new_focus: Some(rows[i + 1].id),
                    action: None,
                }
            } else {
                NavOutcome {
                    new_focus: current_focus,
                    action: None,
                }
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let Some(i) = index else {
                return NavOutcome::default();
            };
            let row = &rows[i];
            if read_only || row.disabled {
                NavOutcome::default()
            } else {
                NavOutcome {
                    new_focus: current_focus,
                    action: Some(NavAction::SetChecked(row.id, !row.checked.is_checked())),
                }
            }
        }
        _ => NavOutcome::default(),
    }
}

/// Compute where focus should land after a keyboard tag removal.
///
/// Prefers the tag that followed the removed one, then the one before it;
/// falls back to the search input when neither survives.
#[must_use]
pub fn focus_after_tag_removal(removed: NodeId, prev: &[Tag], next: &[Tag]) -> FocusTarget {
    let Some(index) = prev.iter().position(|t| t.id == removed) else {
        return FocusTarget::SearchInput;
    };
    let candidates = [index + 1, index.wrapping_sub(1)];
    for candidate in candidates {
        if let Some(tag) = prev.get(candidate)
            && next.iter().any(|t| t.id == tag.id)
        {
            return FocusTarget::Tag(tag.id);
        }
    }
    FocusTarget::SearchInput
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ArenaStore, TreeStore};
    use crate::view::project;
    use treepick_core::{Mode, NodeData};

    fn rows() -> Vec<Row> {
        let data = vec![
            NodeData::new("A", "a")
                .with_expanded(true)
                .child(NodeData::new("A1", "a1"))
                .child(NodeData::new("A2", "a2").with_disabled(true)),
            NodeData::new("B", "b").child(NodeData::new("B1", "b1")),
        ];
        let store = ArenaStore::build(&data, Mode::MultiSelect, false, None, &[]);
        project(&store)
    }

    fn tag(id: u32, value: &str) -> Tag {
        Tag {
            id: NodeId(id),
            value: value.into(),
            label: value.to_uppercase(),
        }
    }

    #[test]
    fn closed_dropdown_accepts_only_opening_keys() {
        assert!(is_navigation_key(KeyCode::Down, false));
        assert!(is_navigation_key(KeyCode::Home, false));
        assert!(!is_navigation_key(KeyCode::Left, false));
        assert!(!is_navigation_key(KeyCode::Enter, false));
        assert!(!is_navigation_key(KeyCode::Escape, false));
    }

    #[test]
    fn open_dropdown_accepts_full_set() {
        for code in [
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Enter,
            KeyCode::Char(' '),
        ] {
            assert!(is_navigation_key(code, true), "{code:?}");
        }
        assert!(!is_navigation_key(KeyCode::Char('x'), true));
        assert!(!is_navigation_key(KeyCode::Backspace, true));
    }

    #[test]
    fn down_moves_to_next_and_sticks_at_end() {
        let rows = rows();
        // Rows: A, A1, A2, B (B collapsed so B1 hidden).
        let out = handle_navigation_key(None, &rows, KeyCode::Down, false, true);
        assert_eq!(out.new_focus, Some(rows[0].id));

        let out = handle_navigation_key(Some(rows[0].id), &rows, KeyCode::Down, false, true);
        assert_eq!(out.new_focus, Some(rows[1].id));

        let last = rows[rows.len() - 1].id;
        let out = handle_navigation_key(Some(last), &rows, KeyCode::Down, false, true);
        assert_eq!(out.new_focus, Some(last));
    }

    #[test]
    fn up_from_nowhere_lands_on_last() {
        let rows = rows();
        let out = handle_navigation_key(None, &rows, KeyCode::Up, false, true);
        assert_eq!(out.new_focus, Some(rows[rows.len() - 1].id));
    }

    #[test]
    fn home_and_end_jump() {
        let rows = rows();
        let mid = rows[1].id;
        let out = handle_navigation_key(Some(mid), &rows, KeyCode::End, false, true);
        assert_eq!(out.new_focus, Some(rows[rows.len() - 1].id));
        let out = handle_navigation_key(Some(mid), &rows, KeyCode::Home, false, true);
        assert_eq!(out.new_focus, Some(rows[0].id));
    }

    #[test]
    fn left_collapses_then_moves_to_parent() {
        let rows = rows();
        // A is expanded with children: Left collapses.
        let out = handle_navigation_key(Some(rows[0].id), &rows, KeyCode::Left, false, true);
        assert_eq!(out.action, Some(NavAction::ToggleExpanded(rows[0].id)));

        // A1 is a leaf: Left moves to parent A.
        let out = handle_navigation_key(Some(rows[1].id), &rows, KeyCode::Left, false, true);
        assert_eq!(out.new_focus, Some(rows[0].id));
        assert_eq!(out.action, None);
    }

    #[test]
    fn right_expands_collapsed_branch_or_enters_children() {
        let rows = rows();
        // B is collapsed with children: Right expands.
        let b = rows.iter().find(|r| r.label == "B").unwrap();
        let out = handle_navigation_key(Some(b.id), &rows, KeyCode::Right, false, true);
        assert_eq!(out.action, Some(NavAction::ToggleExpanded(b.id)));

        // A is expanded: Right moves to first child.
        let out = handle_navigation_key(Some(rows[0].id), &rows, KeyCode::Right, false, true);
        assert_eq!(out.new_focus, Some(rows[1].id));
    }

    #[test]
    fn expand_toggle_suppressed_during_search() {
        let rows = rows();
        let out = handle_navigation_key(Some(rows[0].id), &rows, KeyCode::Left, false, false);
        assert_eq!(out.action, None, "collapse gated off");
        let b = rows.iter().find(|r| r.label == "B").unwrap();
        let out = handle_navigation_key(Some(b.id), &rows, KeyCode::Right, false, false);
        assert_eq!(out.action, None, "expand gated off");
    }

    #[test]
    fn enter_toggles_checked_unless_read_only_or_disabled() {
        let rows = rows();
        let out = handle_navigation_key(Some(rows[1].id), &rows, KeyCode::Enter, false, true);
        assert_eq!(out.action, Some(NavAction::SetChecked(rows[1].id, true)));

        let out = handle_navigation_key(Some(rows[1].id), &rows, KeyCode::Enter, true, true);
        assert_eq!(out.action, None);

        // A2 is disabled.
        let disabled = rows.iter().find(|r| r.disabled).unwrap();
        let out = handle_navigation_key(Some(disabled.id), &rows, KeyCode::Enter, false, true);
        assert_eq!(out.action, None);
    }

    #[test]
    fn empty_rows_are_inert() {
        let out = handle_navigation_key(Some(NodeId(0)), &[], KeyCode::Down, false, true);
        assert_eq!(out, NavOutcome::default());
    }

    #[test]
    fn tag_removal_prefers_following_then_preceding_tag() {
        let prev = vec![tag(1, "one"), tag(2, "two"), tag(3, "three")];

        // Middle removed: following tag survives.
        let next = vec![tag(1, "one"), tag(3, "three")];
        assert_eq!(
            focus_after_tag_removal(NodeId(2), &prev, &next),
            FocusTarget::Tag(NodeId(3))
        );

        // Last removed: preceding tag survives.
        let next = vec![tag(1, "one"), tag(2, "two")];
        assert_eq!(
            focus_after_tag_removal(NodeId(3), &prev, &next),
            FocusTarget::Tag(NodeId(2))
        );
    }

    #[test]
    fn tag_removal_falls_back_to_search_input() {
        let prev = vec![tag(1, "one")];
        assert_eq!(
            focus_after_tag_removal(NodeId(1), &prev, &[]),
            FocusTarget::SearchInput
        );
        // Unknown id degrades the same way.
        assert_eq!(
            focus_after_tag_removal(NodeId(9), &prev, &prev),
            FocusTarget::SearchInput
        );
    }
}
