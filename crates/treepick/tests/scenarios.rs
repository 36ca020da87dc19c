//! End-to-end controller scenarios: full interaction sequences through the
//! public API, as a host would drive them.

use treepick::{
    ConfigFlags, FocusTarget, KeyCode, KeyEvent, Mode, NodeData, Notification, TreeSelect,
    TreeSelectConfig,
};

fn data() -> Vec<NodeData> {
    vec![
        NodeData::new("A", "a")
            .with_expanded(true)
            .child(NodeData::new("A1", "a1"))
            .child(NodeData::new("A2", "a2")),
        NodeData::new("B", "b"),
    ]
}

fn tag_values(select: &TreeSelect) -> Vec<String> {
    select.tags().iter().map(|t| t.value.clone()).collect()
}

#[test]
fn partial_parent_after_initial_child_selection() {
    let config = TreeSelectConfig::new().with_flags(ConfigFlags::SHOW_PARTIALLY_SELECTED);
    let (select, notes) = TreeSelect::new(config, &data(), &["a2"]);

    assert_eq!(tag_values(&select), vec!["a2"]);
    let rows = select.visible_rows();
    let a = rows.iter().find(|r| r.label == "A").unwrap();
    assert_eq!(a.checked, treepick::CheckedState::Partial);
    let b = rows.iter().find(|r| r.label == "B").unwrap();
    assert_eq!(b.checked, treepick::CheckedState::Unchecked);
    assert_eq!(notes.len(), 1, "one init change");
}

#[test]
fn partial_parent_requires_flag() {
    let (select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &["a2"]);
    let rows = select.visible_rows();
    let a = rows.iter().find(|r| r.label == "A").unwrap();
    assert_eq!(a.checked, treepick::CheckedState::Unchecked);
}

#[test]
fn radio_select_keeps_last_pick_and_closes() {
    let config = TreeSelectConfig::new().with_mode(Mode::RadioSelect);
    let (mut select, _) = TreeSelect::new(config, &data(), &[]);
    select.handle_trigger_click();

    let rows = select.visible_rows();
    let b = rows.iter().find(|r| r.label == "B").unwrap().id;
    select.set_checked(b, true);
    assert_eq!(tag_values(&select), vec!["b"]);
    assert!(!select.dropdown_open(), "closed on first pick");

    select.handle_trigger_click();
    let rows = select.visible_rows();
    let a1 = rows.iter().find(|r| r.label == "A1").unwrap().id;
    select.set_checked(a1, true);
    assert_eq!(tag_values(&select), vec!["a1"], "previous pick auto-deselected");
    assert!(!select.dropdown_open());
}

#[test]
fn radio_select_stays_open_with_keep_open_flag() {
    let config = TreeSelectConfig::new()
        .with_mode(Mode::RadioSelect)
        .with_flags(ConfigFlags::KEEP_OPEN_ON_SELECT);
    let (mut select, _) = TreeSelect::new(config, &data(), &[]);
    select.handle_trigger_click();

    let rows = select.visible_rows();
    select.set_checked(rows[0].id, true);
    assert!(select.dropdown_open());
    assert_eq!(select.tags().len(), 1);
}

#[test]
fn hopeless_search_then_clear_restores_tree() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);
    select.handle_trigger_click();

    let before = select.visible_rows();

    select.set_search("xyz");
    assert!(select.all_nodes_hidden());
    assert!(select.visible_rows().is_empty());

    select.set_search("");
    assert!(!select.all_nodes_hidden());
    assert!(!select.search_mode_on());
    assert_eq!(select.visible_rows(), before);
}

#[test]
fn backspace_removes_newest_tag_with_one_change() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);
    select.handle_trigger_click();
    let rows = select.visible_rows();
    let t1 = rows.iter().find(|r| r.label == "A1").unwrap().id;
    let t2 = rows.iter().find(|r| r.label == "B").unwrap().id;
    select.set_checked(t1, true);
    select.set_checked(t2, true);
    select.handle_trigger_click(); // close; search stays empty

    let outcome = select.handle_key(KeyEvent::new(KeyCode::Backspace));
    assert!(outcome.consumed);
    assert_eq!(tag_values(&select), vec!["a1"]);

    let changes: Vec<_> = outcome
        .notifications
        .iter()
        .filter_map(|n| match n {
            Notification::Change { node, tags } => Some((node.clone(), tags.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(changes.len(), 1);
    let (node, tags) = &changes[0];
    assert_eq!(node.as_ref().unwrap().id, t2);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, t1);
    assert!(
        outcome
            .notifications
            .contains(&Notification::MoveFocus(FocusTarget::Tag(t1)))
    );
}

#[test]
fn outside_click_lifecycle() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);
    assert!(!select.outside_click().is_armed());

    select.handle_trigger_click();
    assert!(select.outside_click().is_armed());

    // Clicks inside the control never close.
    select.handle_outside_click(true);
    assert!(select.dropdown_open());

    // First outside click closes and disarms; a second is a no-op.
    let notes = select.handle_outside_click(false);
    assert!(!select.dropdown_open());
    assert!(!select.outside_click().is_armed());
    assert_eq!(notes, vec![Notification::Blur]);
    assert!(select.handle_outside_click(false).is_empty());
}

#[test]
fn single_pick_modes_never_exceed_one_tag() {
    for mode in [Mode::SimpleSelect, Mode::RadioSelect] {
        let config = TreeSelectConfig::new()
            .with_mode(mode)
            .with_flags(ConfigFlags::KEEP_OPEN_ON_SELECT);
        let (mut select, _) = TreeSelect::new(config, &data(), &[]);
        select.handle_trigger_click();

        let ids: Vec<_> = select.visible_rows().iter().map(|r| r.id).collect();
        for id in ids {
            select.set_checked(id, true);
            assert!(select.tags().len() <= 1, "{mode:?}");
        }
    }
}

#[test]
fn toggle_twice_restores_tree_and_tag_composition() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &["b"]);
    let rows = select.visible_rows();
    let a = rows.iter().find(|r| r.label == "A").unwrap().id;

    let before_rows = select.visible_rows();
    let mut before_tags = tag_values(&select);
    before_tags.sort();

    select.set_checked(a, true);
    select.set_checked(a, false);

    // Rows match except the focus cursor, which follows the acted node.
    let after_rows = select.visible_rows();
    assert_eq!(before_rows.len(), after_rows.len());
    for (b, a) in before_rows.iter().zip(&after_rows) {
        assert_eq!(b.checked, a.checked);
        assert_eq!(b.expanded, a.expanded);
        assert_eq!(b.id, a.id);
    }
    let mut after_tags = tag_values(&select);
    after_tags.sort();
    assert_eq!(before_tags, after_tags);
}

#[test]
fn keyboard_only_session_selects_a_node() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);

    // Down opens the closed dropdown and lands on the first row.
    let outcome = select.handle_key(KeyEvent::new(KeyCode::Down));
    assert!(outcome.consumed);
    assert!(select.dropdown_open());

    // Walk to A1 and check it.
    select.handle_key(KeyEvent::new(KeyCode::Down));
    select.handle_key(KeyEvent::new(KeyCode::Enter));
    assert_eq!(tag_values(&select), vec!["a1"]);

    // Escape closes.
    let outcome = select.handle_key(KeyEvent::new(KeyCode::Escape));
    assert!(outcome.consumed);
    assert!(!select.dropdown_open());
    assert!(outcome.notifications.contains(&Notification::Blur));
}

#[test]
fn search_narrows_keyboard_navigation_to_visible_rows() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);
    select.handle_trigger_click();
    select.set_search("a1");

    // Visible rows: A (ancestor), A1 (match). End jumps to the last
    // visible row, not to B.
    select.handle_key(KeyEvent::new(KeyCode::End));
    let focused: Vec<_> = select
        .visible_rows()
        .into_iter()
        .filter(|r| r.focused)
        .map(|r| r.label)
        .collect();
    assert_eq!(focused, vec!["A1"]);
}

#[test]
fn closing_during_search_then_reopening_shows_full_tree() {
    let (mut select, _) = TreeSelect::new(TreeSelectConfig::new(), &data(), &[]);
    select.handle_trigger_click();
    let full = select.visible_rows();

    select.set_search("a2");
    assert!(select.visible_rows().len() < full.len());

    select.handle_trigger_click(); // close resets search
    select.handle_trigger_click(); // reopen
    assert_eq!(select.visible_rows(), full);
    assert_eq!(select.search_term(), "");
}

#[test]
fn checking_during_search_with_clear_flag_shows_full_tree_again() {
    let config = TreeSelectConfig::new().with_flags(ConfigFlags::CLEAR_SEARCH_ON_CHANGE);
    let (mut select, _) = TreeSelect::new(config, &data(), &[]);
    select.handle_trigger_click();
    select.set_search("a1");

    let a1 = select
        .visible_rows()
        .iter()
        .find(|r| r.label == "A1")
        .unwrap()
        .id;
    select.set_checked(a1, true);

    assert!(select.dropdown_open());
    assert!(!select.search_mode_on());
    assert_eq!(select.visible_rows().len(), 4, "full tree visible again");
    assert_eq!(tag_values(&select), vec!["a1"]);
}

#[test]
fn hierarchical_mode_tags_every_checked_node() {
    let config = TreeSelectConfig::new().with_mode(Mode::Hierarchical);
    let (mut select, _) = TreeSelect::new(config, &data(), &[]);
    let rows = select.visible_rows();
    let a = rows.iter().find(|r| r.label == "A").unwrap().id;
    let a1 = rows.iter().find(|r| r.label == "A1").unwrap().id;

    select.set_checked(a, true);
    select.set_checked(a1, true);
    assert_eq!(tag_values(&select), vec!["a", "a1"]);

    // No cascade on uncheck either.
    select.set_checked(a, false);
    assert_eq!(tag_values(&select), vec!["a1"]);
}
