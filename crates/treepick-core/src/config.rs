#![forbid(unsafe_code)]

//! Configuration surface for the selection controller.

use bitflags::bitflags;

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Multiple picks; checking a branch cascades to its subtree.
    #[default]
    MultiSelect,
    /// Single pick; the dropdown closes on selection and Escape/Tab
    /// confirm the focused node.
    SimpleSelect,
    /// Single pick with radio semantics; checking one deselects the rest.
    RadioSelect,
    /// Multiple independent picks; no cascade, branches can show a
    /// partial-selection state.
    Hierarchical,
}

impl Mode {
    /// Whether this mode admits at most one selected node.
    #[must_use]
    pub const fn is_single_select(&self) -> bool {
        matches!(self, Self::SimpleSelect | Self::RadioSelect)
    }
}

/// Dropdown visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownPolicy {
    /// Closed until triggered.
    #[default]
    Default,
    /// Open on initialization, closable afterwards.
    Initial,
    /// Pinned open; close transitions are disabled and outside clicks
    /// are ignored.
    Always,
}

bitflags! {
    /// Boolean configuration flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigFlags: u16 {
        /// Reset the search text after every selection change.
        const CLEAR_SEARCH_ON_CHANGE = 1 << 0;
        /// Keep the full tree shape during search; non-matching nodes stay
        /// visible but are flagged unmatched.
        const KEEP_TREE_ON_SEARCH = 1 << 1;
        /// Keep a matching node's descendants visible even when only the
        /// parent matches.
        const KEEP_CHILDREN_ON_SEARCH = 1 << 2;
        /// Do not close the dropdown after a single-select pick.
        const KEEP_OPEN_ON_SELECT = 1 << 3;
        /// Derive and expose the partial state on branch nodes.
        const SHOW_PARTIALLY_SELECTED = 1 << 4;
        /// The whole control is disabled.
        const DISABLED = 1 << 5;
        /// Selections cannot be changed from the keyboard or checkboxes.
        const READ_ONLY = 1 << 6;
        /// Render the search input inside the dropdown instead of the
        /// trigger row (presentation hint only).
        const INLINE_SEARCH_INPUT = 1 << 7;
    }
}

/// Text overrides for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texts {
    /// Trigger placeholder when nothing is selected.
    pub placeholder: Option<String>,
    /// Placeholder for the inline search input.
    pub inline_search_placeholder: Option<String>,
    /// Empty-state text when the filter hides every node.
    pub no_matches: Option<String>,
    /// Accessible label for the control.
    pub label: Option<String>,
    /// Accessible label for tag remove buttons.
    pub label_remove: Option<String>,
}

impl Texts {
    /// Placeholder text, falling back to the default.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("Choose...")
    }

    /// No-matches text, falling back to the default.
    #[must_use]
    pub fn no_matches(&self) -> &str {
        self.no_matches.as_deref().unwrap_or("No matches found")
    }

    /// Remove-label text, falling back to the default.
    #[must_use]
    pub fn label_remove(&self) -> &str {
        self.label_remove.as_deref().unwrap_or("Remove")
    }
}

/// Full configuration for one controller instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSelectConfig {
    /// Selection mode.
    pub mode: Mode,
    /// Dropdown visibility policy.
    pub dropdown: DropdownPolicy,
    /// Boolean flags.
    pub flags: ConfigFlags,
    /// Text overrides.
    pub texts: Texts,
}

impl Default for ConfigFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl TreeSelectConfig {
    /// Create a default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection mode (builder).
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the dropdown policy (builder).
    #[must_use]
    pub fn with_dropdown(mut self, policy: DropdownPolicy) -> Self {
        self.dropdown = policy;
        self
    }

    /// Enable flags (builder).
    #[must_use]
    pub fn with_flags(mut self, flags: ConfigFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    /// Set text overrides (builder).
    #[must_use]
    pub fn with_texts(mut self, texts: Texts) -> Self {
        self.texts = texts;
        self
    }

    /// Whether a flag is set.
    #[must_use]
    pub fn has(&self, flag: ConfigFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Whether the dropdown is pinned open.
    #[must_use]
    pub const fn forced_open(&self) -> bool {
        matches!(self.dropdown, DropdownPolicy::Always)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TreeSelectConfig::new();
        assert_eq!(config.mode, Mode::MultiSelect);
        assert_eq!(config.dropdown, DropdownPolicy::Default);
        assert!(config.flags.is_empty());
        assert!(!config.forced_open());
    }

    #[test]
    fn builder_accumulates_flags() {
        let config = TreeSelectConfig::new()
            .with_flags(ConfigFlags::KEEP_TREE_ON_SEARCH)
            .with_flags(ConfigFlags::READ_ONLY);
        assert!(config.has(ConfigFlags::KEEP_TREE_ON_SEARCH));
        assert!(config.has(ConfigFlags::READ_ONLY));
        assert!(!config.has(ConfigFlags::DISABLED));
    }

    #[test]
    fn single_select_modes() {
        assert!(Mode::SimpleSelect.is_single_select());
        assert!(Mode::RadioSelect.is_single_select());
        assert!(!Mode::MultiSelect.is_single_select());
        assert!(!Mode::Hierarchical.is_single_select());
    }

    #[test]
    fn forced_open_tracks_policy() {
        let config = TreeSelectConfig::new().with_dropdown(DropdownPolicy::Always);
        assert!(config.forced_open());
    }

    #[test]
    fn texts_fallbacks() {
        let texts = Texts::default();
        assert_eq!(texts.placeholder(), "Choose...");
        assert_eq!(texts.no_matches(), "No matches found");
        assert_eq!(texts.label_remove(), "Remove");

        let texts = Texts {
            no_matches: Some("nothing here".into()),
            ..Texts::default()
        };
        assert_eq!(texts.no_matches(), "nothing here");
    }
}
