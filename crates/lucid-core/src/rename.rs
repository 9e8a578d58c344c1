//! Final renaming pass: assign each function its display name.
//!
//! Runs after the uniquifier and normalizer, so every function already
//! carries a globally unique name and scope tracking is no longer needed.
//! Each selected function either keeps its name, takes one proposed by the
//! suggestion collaborator, or gains a call-count suffix; collisions are
//! resolved against the inventory, the function's registry record is
//! re-keyed, and one whole-tree sweep at the end rewrites every reference
//! from the old unique name to the final one.
//!
//! Functions whose name starts with [`MANUAL_PREFIX`] were named by a
//! human and are left alone.

use crate::error::Error;
use crate::inventory::Inventory;
use crate::normalize::ANON_PREFIX;
use crate::oracle::{Suggester, Suggestion};
use crate::selection::Selection;
use crate::uniquify::UNIQUE_PREFIX;
use crate::xref::FuncRegistry;
use lucid_syntax::{Codegen, CodegenOptions, NodeKind, Tree};
use rustc_hash::FxHashMap;

/// Names starting with this prefix are treated as manually finalized.
pub const MANUAL_PREFIX: &str = "F_";

/// Options for the final renaming pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameOptions {
    /// Ask the suggestion collaborator for a better base name.
    pub suggest_names: bool,
    /// Append `_xref_<count>` to each renamed function.
    pub xref_suffix: bool,
}

/// Assign final names to all selected functions and rewrite every
/// reference to match.
pub fn rename_functions(
    tree: &mut Tree,
    registry: &mut FuncRegistry,
    inventory: &mut Inventory,
    selection: &mut Selection,
    options: &RenameOptions,
    suggester: &dyn Suggester,
) -> Result<(), Error> {
    let mut subs: FxHashMap<String, String> = FxHashMap::default();

    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        let ident = match tree.kind(id) {
            NodeKind::FunctionDecl { ident, .. } => Some(*ident),
            NodeKind::FunctionExpr { ident, .. } => *ident,
            _ => None,
        };
        if let Some(ident) = ident {
            let name = tree.ident_name(ident).unwrap_or_default().to_string();
            if !name.starts_with(MANUAL_PREFIX)
                && selection.matches(Some(&name), tree.start_line(id))
            {
                let xref_count =
                    registry.lookup(&name).map_or(0, |f| registry.get(f).xrefs.len());

                let mut base = if options.suggest_names {
                    let code = Codegen::new(tree, CodegenOptions::default()).generate_node(id);
                    match suggester.suggest_name(&name, &code)? {
                        Suggestion::Name(suggested) => {
                            let prefix = if name.starts_with(ANON_PREFIX) {
                                ANON_PREFIX
                            } else {
                                UNIQUE_PREFIX
                            };
                            format!("{prefix}{suggested}")
                        }
                        Suggestion::TooLarge => {
                            tracing::warn!(
                                function = %name,
                                "function too large for a name suggestion; keeping its name"
                            );
                            name.clone()
                        }
                    }
                } else {
                    name.clone()
                };

                if options.xref_suffix {
                    base.push_str(&format!("_xref_{xref_count}"));
                }

                if base != name {
                    let final_name = inventory.dedupe(&base);
                    if let Some(func) = registry.lookup(&name) {
                        registry.rename(func, &final_name);
                    }
                    selection.admit(&final_name);
                    tree.set_ident_name(ident, final_name.clone());
                    subs.insert(name, final_name);
                }
            }
        }
        stack.extend(tree.children(id));
    }

    // References were finalized under the pre-orchestrator unique names;
    // one sweep moves them all to the final ones.
    if !subs.is_empty() {
        let mut stack = vec![tree.root];
        while let Some(id) = stack.pop() {
            if let NodeKind::Ident { name } = tree.kind(id) {
                if let Some(new_name) = subs.get(name) {
                    let new_name = new_name.clone();
                    tree.set_ident_name(id, new_name);
                }
            }
            stack.extend(tree.children(id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::oracle::Description;
    use crate::uniquify::uniquify;
    use crate::xref::build_call_graph;
    use lucid_syntax::{parse, ParserOptions};

    /// Suggests a fixed name for every function it is asked about.
    struct FixedName(&'static str);

    impl Suggester for FixedName {
        fn suggest_name(&self, _function: &str, _code: &str) -> Result<Suggestion, Error> {
            Ok(Suggestion::Name(self.0.to_string()))
        }

        fn describe(&self, _function: &str, _code: &str) -> Result<Description, Error> {
            unreachable!("rename never asks for descriptions")
        }
    }

    /// Every function is too large to suggest a name for.
    struct AlwaysTooLarge;

    impl Suggester for AlwaysTooLarge {
        fn suggest_name(&self, _function: &str, _code: &str) -> Result<Suggestion, Error> {
            Ok(Suggestion::TooLarge)
        }

        fn describe(&self, _function: &str, _code: &str) -> Result<Description, Error> {
            unreachable!("rename never asks for descriptions")
        }
    }

    fn run(source: &str, options: &RenameOptions, suggester: &dyn Suggester) -> String {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        let mut selection = Selection::default();
        uniquify(&mut tree, &mut inventory, &mut selection);
        normalize(&mut tree, &mut inventory, &mut selection);
        let mut registry = build_call_graph(&mut tree, &selection);
        rename_functions(&mut tree, &mut registry, &mut inventory, &mut selection, options, suggester)
            .expect("rename should succeed");
        lucid_syntax::Codegen::new(&tree, lucid_syntax::CodegenOptions::default()).generate()
    }

    #[test]
    fn test_passthrough_keeps_uniquified_names() {
        let result = run(
            "function a() { return b(); }\nfunction b() { return 1; }",
            &RenameOptions::default(),
            &crate::oracle::NoSuggester,
        );
        assert!(result.contains("function f_a()"));
        assert!(result.contains("function f_b()"));
        assert!(result.contains("return f_b();"));
    }

    #[test]
    fn test_suggested_names_rewrite_references() {
        let result = run(
            "function a() { return b(); }\nfunction b() { return 1; }",
            &RenameOptions { suggest_names: true, xref_suffix: false },
            &FixedName("helper"),
        );
        // Both functions get the same proposal; collision resolution keeps
        // them distinct.
        assert!(result.contains("function f_helper()"));
        assert!(result.contains("function f_helper_2()"));
        assert!(!result.contains("f_a"));
        assert!(!result.contains("f_b"));
    }

    #[test]
    fn test_anonymous_functions_keep_their_prefix() {
        let result = run(
            "var x = function () { return 1; };",
            &RenameOptions { suggest_names: true, xref_suffix: false },
            &FixedName("one"),
        );
        assert!(result.contains("function f_e_one()"));
    }

    #[test]
    fn test_xref_suffix_counts_calls() {
        let result = run(
            "function a() { b(); b(); }\nfunction b() {}",
            &RenameOptions { suggest_names: false, xref_suffix: true },
            &crate::oracle::NoSuggester,
        );
        assert!(result.contains("function f_b_xref_2()"));
        assert!(result.contains("function f_a_xref_0()"));
        assert!(result.contains("f_b_xref_2();"));
    }

    #[test]
    fn test_too_large_falls_back_to_current_name() {
        let result = run(
            "function a() { return 1; }",
            &RenameOptions { suggest_names: true, xref_suffix: false },
            &AlwaysTooLarge,
        );
        assert!(result.contains("function f_a()"));
    }

    #[test]
    fn test_manual_prefix_is_left_alone() {
        let result = run(
            "function F_checked() { return 1; }\nF_checked();",
            &RenameOptions { suggest_names: true, xref_suffix: true },
            &FixedName("ignored"),
        );
        assert!(result.contains("function F_checked()"));
        assert!(result.contains("F_checked();"));
    }

    #[test]
    fn test_registry_rekeyed_under_final_name() {
        let mut tree = parse(
            "function a() { b(); }\nfunction b() {}",
            ParserOptions::default(),
        )
        .expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        let mut selection = Selection::default();
        uniquify(&mut tree, &mut inventory, &mut selection);
        normalize(&mut tree, &mut inventory, &mut selection);
        let mut registry = build_call_graph(&mut tree, &selection);
        rename_functions(
            &mut tree,
            &mut registry,
            &mut inventory,
            &mut selection,
            &RenameOptions { suggest_names: true, xref_suffix: false },
            &FixedName("renamed"),
        )
        .expect("rename should succeed");
        let func = registry.lookup("f_renamed_2").or_else(|| registry.lookup("f_renamed"));
        assert!(func.is_some(), "record should be re-keyed under a final name");
        assert!(registry.lookup("f_a").is_none());
        assert!(registry.lookup("f_b").is_none());
    }
}
