//! The identifier inventory: every name and label in the program.
//!
//! A single walker pass collects the set once, up front; after that the
//! inventory is the sole collision authority. Every pass that mints a name
//! checks candidates against it and inserts the winner before writing it
//! into the tree, so a name minted early can never be re-minted later. The
//! set only grows — it is never consulted for scoping decisions.

use crate::walk::{walk, ScopeStack, Step, Visitor};
use lucid_syntax::{NodeId, NodeKind, Tree};
use rustc_hash::FxHashSet;

/// The flat set of all identifier and label names in use.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    names: FxHashSet<String>,
}

impl Inventory {
    /// Collect every identifier and statement label in the tree.
    pub fn collect(tree: &mut Tree) -> Self {
        let mut inventory = Self::default();
        let root = tree.root;
        let mut collector = Collector { names: &mut inventory.names };
        walk(tree, root, (), &mut collector);
        inventory
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Mint `{prefix}{base}`, falling back to `{prefix}{base}2`,
    /// `{prefix}{base}3`, ... until the candidate is unused. The winner is
    /// recorded before it is returned.
    pub fn mint_prefixed(&mut self, prefix: &str, base: &str) -> String {
        let mut candidate = format!("{prefix}{base}");
        let mut num = 1u32;
        while self.contains(&candidate) {
            num += 1;
            candidate = format!("{prefix}{base}{num}");
        }
        self.insert(candidate.clone());
        candidate
    }

    /// Mint `{prefix}{n}` from an externally owned counter, skipping over
    /// values already in use. The counter always advances so the next call
    /// starts past the last candidate tried.
    pub fn mint_counted(&mut self, prefix: &str, counter: &mut u32) -> String {
        loop {
            let candidate = format!("{prefix}{counter}");
            *counter += 1;
            if !self.contains(&candidate) {
                self.insert(candidate.clone());
                return candidate;
            }
        }
    }

    /// Return `base` unchanged if it is free, otherwise `base_2`, `base_3`,
    /// ... The winner is recorded before it is returned.
    pub fn dedupe(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut num = 1u32;
        while self.contains(&candidate) {
            num += 1;
            candidate = format!("{base}_{num}");
        }
        self.insert(candidate.clone());
        candidate
    }
}

struct Collector<'a> {
    names: &'a mut FxHashSet<String>,
}

impl Visitor<()> for Collector<'_> {
    fn on_node(&mut self, tree: &mut Tree, id: NodeId, _scopes: &mut ScopeStack<()>) -> Step {
        match tree.kind(id) {
            NodeKind::Ident { name } => {
                self.names.insert(name.clone());
            }
            NodeKind::Labeled { label, .. } => {
                self.names.insert(label.clone());
            }
            _ => {}
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucid_syntax::{parse, ParserOptions};

    fn collect(source: &str) -> Inventory {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        Inventory::collect(&mut tree)
    }

    #[test]
    fn test_collects_identifiers_and_labels() {
        let inventory = collect("loop: for (var i = 0; i < n; i++) { foo(i); }");
        assert!(inventory.contains("i"));
        assert!(inventory.contains("n"));
        assert!(inventory.contains("foo"));
        assert!(inventory.contains("loop"));
        assert!(!inventory.contains("bar"));
    }

    #[test]
    fn test_collects_member_property_names() {
        // Property names count: a minted name must never equal one, or a
        // later whole-tree rewrite could touch it.
        let inventory = collect("obj.prop = 1;");
        assert!(inventory.contains("obj"));
        assert!(inventory.contains("prop"));
    }

    #[test]
    fn test_mint_prefixed_appends_numbers() {
        let mut inventory = collect("var f_a = 1;");
        assert_eq!(inventory.mint_prefixed("f_", "a"), "f_a2");
        // The minted name is now reserved too.
        assert_eq!(inventory.mint_prefixed("f_", "a"), "f_a3");
        assert_eq!(inventory.mint_prefixed("f_", "b"), "f_b");
    }

    #[test]
    fn test_mint_counted_skips_used_names() {
        let mut inventory = collect("var f_e_0 = 1;");
        let mut counter = 0;
        assert_eq!(inventory.mint_counted("f_e_", &mut counter), "f_e_1");
        assert_eq!(inventory.mint_counted("f_e_", &mut counter), "f_e_2");
    }

    #[test]
    fn test_dedupe_keeps_free_names() {
        let mut inventory = collect("var taken = 1;");
        assert_eq!(inventory.dedupe("free"), "free");
        assert_eq!(inventory.dedupe("taken"), "taken_2");
        assert_eq!(inventory.dedupe("taken"), "taken_3");
    }
}
