//! Function annotation: AI-generated comments and caller summaries.
//!
//! For each selected named function this pass can do two things. It can
//! ask the collaborator for a commented rewrite, re-parse the returned
//! text, run the comment attacher over it, and splice the parameters,
//! body and comments back onto the original node (the collaborator's text
//! is an independent tree, so the subtree is imported into the main
//! arena). And it can prepend a block comment summarizing the function's
//! callers, one line per distinct caller in first-seen order with its
//! call count.

use crate::comments::attach_comments;
use crate::error::Error;
use crate::oracle::{Description, Suggester};
use crate::selection::Selection;
use crate::xref::{FuncId, FuncRegistry};
use lucid_syntax::{
    parse, Codegen, CodegenOptions, Comment, CommentKind, NodeId, NodeKind, ParserOptions, Span,
    Tree,
};
use rustc_hash::FxHashMap;

/// Options for the annotation pass.
#[derive(Debug, Clone, Copy)]
pub struct AnnotateOptions {
    /// Request descriptive comments from the collaborator.
    pub describe: bool,
    /// Prepend a caller-summary block comment.
    pub xrefs: bool,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self { describe: false, xrefs: true }
    }
}

/// Annotate every selected named function.
pub fn annotate(
    tree: &mut Tree,
    registry: &FuncRegistry,
    selection: &Selection,
    options: &AnnotateOptions,
    suggester: &dyn Suggester,
) -> Result<(), Error> {
    if !options.describe && !options.xrefs {
        return Ok(());
    }
    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        let ident = match tree.kind(id) {
            NodeKind::FunctionDecl { ident, .. } => Some(*ident),
            NodeKind::FunctionExpr { ident, .. } => *ident,
            _ => None,
        };
        if let Some(ident) = ident {
            let name = tree.ident_name(ident).unwrap_or_default().to_string();
            if selection.matches(Some(&name), tree.start_line(id)) {
                if options.describe {
                    describe_function(tree, id, &name, suggester)?;
                }
                if options.xrefs {
                    attach_xref_comment(tree, id, &name, registry);
                }
            }
        }
        // Children are collected after a possible splice, so functions
        // nested in collaborator-provided bodies are annotated too.
        stack.extend(tree.children(id));
    }
    Ok(())
}

/// Request a commented rewrite and splice it onto the node. An oversized
/// function is skipped; a rewrite that no longer looks like a function
/// keeps the original parameters and body.
fn describe_function(
    tree: &mut Tree,
    id: NodeId,
    name: &str,
    suggester: &dyn Suggester,
) -> Result<(), Error> {
    let code = Codegen::new(tree, CodegenOptions::default()).generate_node(id);
    let revised = match suggester.describe(name, &code)? {
        Description::TooLarge => {
            tracing::debug!(function = %name, "function too large to describe; skipping");
            return Ok(());
        }
        Description::Revised(text) => {
            let mut revised = parse(&text, ParserOptions::default())?;
            attach_comments(&mut revised);
            revised
        }
    };

    let Some(first) = (match revised.kind(revised.root) {
        NodeKind::Program { body } => body.first().copied(),
        _ => None,
    }) else {
        tracing::warn!(function = %name, "described rewrite was empty; keeping the original");
        return Ok(());
    };

    // The rewrite may come back as a declaration or as an expression
    // statement wrapping a function expression.
    let target = match revised.kind(first) {
        NodeKind::ExprStmt { expr } => *expr,
        _ => first,
    };
    match revised.kind(target) {
        NodeKind::FunctionDecl { params, body, .. } | NodeKind::FunctionExpr { params, body, .. } => {
            let (params, body) = (params.clone(), *body);
            let new_params: Vec<NodeId> =
                params.iter().map(|&p| tree.import_subtree(&revised, p)).collect();
            let new_body = tree.import_subtree(&revised, body);
            match &mut tree.node_mut(id).kind {
                NodeKind::FunctionDecl { params, body, .. }
                | NodeKind::FunctionExpr { params, body, .. } => {
                    *params = new_params;
                    *body = new_body;
                }
                _ => {}
            }
        }
        _ => {
            tracing::warn!(
                function = %name,
                "described rewrite is not a single function; keeping the original body"
            );
        }
    }

    let leading = revised.node(first).leading_comments.clone();
    if !leading.is_empty() {
        tree.node_mut(id).leading_comments = leading;
    }
    let trailing = revised.node(first).trailing_comments.clone();
    if !trailing.is_empty() {
        tree.node_mut(id).trailing_comments = trailing;
    }
    Ok(())
}

/// Prepend a caller-summary block comment when the function has any
/// recorded call sites.
fn attach_xref_comment(tree: &mut Tree, id: NodeId, name: &str, registry: &FuncRegistry) {
    let Some(func) = registry.lookup(name) else {
        return;
    };
    let xrefs = &registry.get(func).xrefs;
    if xrefs.is_empty() {
        return;
    }

    let mut order: Vec<FuncId> = Vec::new();
    let mut counts: FxHashMap<FuncId, usize> = FxHashMap::default();
    for xref in xrefs {
        if !counts.contains_key(&xref.caller) {
            order.push(xref.caller);
        }
        *counts.entry(xref.caller).or_insert(0) += 1;
    }

    let mut text = String::from("*\n * xrefs {{{\n");
    for caller in order {
        text.push_str(&format!(" *   {}: {}\n", registry.name_of(caller), counts[&caller]));
    }
    text.push_str(" * }}}\n ");

    let at = tree.node(id).span.start;
    tree.node_mut(id).leading_comments.push(Comment {
        kind: CommentKind::Block,
        text,
        span: Span::empty(at),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Inventory;
    use crate::normalize::normalize;
    use crate::oracle::Suggestion;
    use crate::uniquify::uniquify;
    use crate::xref::build_call_graph;

    /// Returns a fixed rewrite for every describe request.
    struct FixedRewrite(&'static str);

    impl Suggester for FixedRewrite {
        fn suggest_name(&self, _function: &str, _code: &str) -> Result<Suggestion, Error> {
            unreachable!("annotate never asks for names")
        }

        fn describe(&self, _function: &str, _code: &str) -> Result<Description, Error> {
            Ok(Description::Revised(self.0.to_string()))
        }
    }

    struct TooLarge;

    impl Suggester for TooLarge {
        fn suggest_name(&self, _function: &str, _code: &str) -> Result<Suggestion, Error> {
            unreachable!("annotate never asks for names")
        }

        fn describe(&self, _function: &str, _code: &str) -> Result<Description, Error> {
            Ok(Description::TooLarge)
        }
    }

    fn run(source: &str, options: &AnnotateOptions, suggester: &dyn Suggester) -> String {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        let mut selection = Selection::default();
        uniquify(&mut tree, &mut inventory, &mut selection);
        normalize(&mut tree, &mut inventory, &mut selection);
        let registry = build_call_graph(&mut tree, &selection);
        annotate(&mut tree, &registry, &selection, options, suggester)
            .expect("annotation should succeed");
        Codegen::new(&tree, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_xref_comment_lists_callers_with_counts() {
        let result = run(
            "function a() { b(); b(); }\nfunction c() { b(); }\nfunction b() {}",
            &AnnotateOptions::default(),
            &crate::oracle::NoSuggester,
        );
        assert!(result.contains("xrefs {{{"));
        assert!(result.contains(" *   f_a: 2"));
        assert!(result.contains(" *   f_c: 1"));
        // First-seen caller order.
        let a_at = result.find("f_a: 2").unwrap();
        let c_at = result.find("f_c: 1").unwrap();
        assert!(a_at < c_at);
    }

    #[test]
    fn test_uncalled_function_gets_no_xref_comment() {
        let result = run(
            "function lonely() { return 1; }",
            &AnnotateOptions::default(),
            &crate::oracle::NoSuggester,
        );
        assert!(!result.contains("xrefs"));
    }

    #[test]
    fn test_top_level_caller_shows_global_scope() {
        let result = run(
            "function a() {}\na();",
            &AnnotateOptions::default(),
            &crate::oracle::NoSuggester,
        );
        assert!(result.contains(" *   ! Global Scope: 1"));
    }

    #[test]
    fn test_described_rewrite_replaces_body_and_comments() {
        let rewrite = "// Adds one to its argument.\nfunction f_a(n) {\n  // bump\n  return n + 1;\n}\n";
        let result = run(
            "function a(n) { return n + 1; }",
            &AnnotateOptions { describe: true, xrefs: false },
            &FixedRewrite(rewrite),
        );
        assert!(result.contains("// Adds one to its argument."));
        assert!(result.contains("// bump"));
        assert!(result.contains("return n + 1;"));
    }

    #[test]
    fn test_too_large_function_kept_verbatim() {
        let source = "function a(n) { return n * 2; }";
        let result = run(source, &AnnotateOptions { describe: true, xrefs: false }, &TooLarge);
        assert!(result.contains("function f_a(n)"));
        assert!(result.contains("return n * 2;"));
    }

    #[test]
    fn test_non_function_rewrite_keeps_original_body() {
        let result = run(
            "function a(n) { return n - 1; }",
            &AnnotateOptions { describe: true, xrefs: false },
            &FixedRewrite("var oops = 1;"),
        );
        assert!(result.contains("return n - 1;"));
    }

    #[test]
    fn test_selection_gates_annotation() {
        let mut tree = parse(
            "function a() { b(); }\nfunction b() {}\nfunction c() { b(); }",
            ParserOptions::default(),
        )
        .expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        let mut selection = Selection::default();
        selection.insert_name("b");
        uniquify(&mut tree, &mut inventory, &mut selection);
        normalize(&mut tree, &mut inventory, &mut selection);
        let registry = build_call_graph(&mut tree, &selection);
        annotate(
            &mut tree,
            &registry,
            &selection,
            &AnnotateOptions::default(),
            &crate::oracle::NoSuggester,
        )
        .expect("annotation should succeed");
        let result = Codegen::new(&tree, CodegenOptions::default()).generate();
        // Only the selected function gets a summary; its callers keep
        // their original (unselected, unrenamed) names.
        assert!(result.contains("xrefs {{{"));
        assert!(result.contains(" *   a: 1"));
        assert!(result.contains(" *   c: 1"));
    }
}
