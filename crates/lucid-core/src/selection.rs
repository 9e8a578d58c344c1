//! Optional restriction of the passes to a chosen set of functions.
//!
//! A selection holds function names and 1-based source lines. An empty
//! selection means "everything participates". Because the renaming passes
//! replace the very names a selection was built from, every pass that mints
//! a name for a selected function calls [`Selection::admit`] so later
//! passes still recognize it. An anonymous function can only be selected by
//! line; once the normalizer names it, the minted name keeps it selected.

use rustc_hash::FxHashSet;

/// A set of function names and source lines restricting which functions
/// the passes touch.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    names: FxHashSet<String>,
    lines: FxHashSet<u32>,
}

impl Selection {
    /// Whether this selection restricts anything at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.lines.is_empty()
    }

    pub fn insert_name(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn insert_line(&mut self, line: u32) {
        self.lines.insert(line);
    }

    /// Whether a function with this name, starting on this 1-based line,
    /// participates in the passes.
    pub fn matches(&self, name: Option<&str>, line: u32) -> bool {
        if self.is_empty() {
            return true;
        }
        name.is_some_and(|n| self.names.contains(n)) || self.lines.contains(&line)
    }

    /// Whether calls to this name accumulate cross-references.
    pub fn allows_callee(&self, name: &str) -> bool {
        self.is_empty() || self.names.contains(name)
    }

    /// Keep a freshly minted name eligible for the remaining passes. Does
    /// nothing when the selection is empty (everything already matches).
    pub fn admit(&mut self, name: &str) {
        if !self.is_empty() {
            self.names.insert(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_matches_everything() {
        let selection = Selection::default();
        assert!(selection.matches(Some("anything"), 42));
        assert!(selection.matches(None, 1));
        assert!(selection.allows_callee("anything"));
    }

    #[test]
    fn test_matches_by_name_or_line() {
        let mut selection = Selection::default();
        selection.insert_name("target");
        selection.insert_line(7);
        assert!(selection.matches(Some("target"), 1));
        assert!(selection.matches(Some("other"), 7));
        assert!(selection.matches(None, 7));
        assert!(!selection.matches(Some("other"), 1));
        assert!(!selection.matches(None, 1));
    }

    #[test]
    fn test_admit_keeps_minted_names_selected() {
        let mut selection = Selection::default();
        selection.insert_name("old");
        selection.admit("f_old");
        assert!(selection.matches(Some("f_old"), 99));
        assert!(selection.allows_callee("f_old"));
    }

    #[test]
    fn test_admit_is_a_noop_when_empty() {
        let mut selection = Selection::default();
        selection.admit("anything");
        assert!(selection.is_empty());
    }
}
