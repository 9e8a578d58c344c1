//! Second rewriting pass: every function becomes nameable.
//!
//! Anonymous function expressions receive a minted `f_e_<n>` identifier,
//! and arrow functions are rewritten in place into ordinary named function
//! expressions (an expression body becomes a block with a single
//! `return`). After this pass the downstream builders only ever deal with
//! named `FunctionDecl`/`FunctionExpr` nodes. Running it again changes
//! nothing.
//!
//! Sibling order is irrelevant here, so a plain explicit stack replaces
//! the scoped walker.

use crate::inventory::Inventory;
use crate::selection::Selection;
use lucid_syntax::{NodeKind, Span, Tree};

/// Prefix for names minted onto anonymous functions.
pub const ANON_PREFIX: &str = "f_e_";

/// Name every anonymous function expression and rewrite every arrow
/// function into a named function expression. Minted names are admitted
/// into an active selection; with a selection present, an anonymous
/// function participates only when selected by line.
pub fn normalize(tree: &mut Tree, inventory: &mut Inventory, selection: &mut Selection) {
    let mut counter = 0u32;
    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        match tree.kind(id) {
            NodeKind::FunctionExpr { ident: None, .. } => {
                if selection.matches(None, tree.start_line(id)) {
                    let name = inventory.mint_counted(ANON_PREFIX, &mut counter);
                    selection.admit(&name);
                    let at = tree.node(id).span.start;
                    let ident = tree.alloc(NodeKind::Ident { name }, Span::empty(at));
                    if let NodeKind::FunctionExpr { ident: slot, .. } = &mut tree.node_mut(id).kind
                    {
                        *slot = Some(ident);
                    }
                }
            }
            NodeKind::Arrow { .. } => {
                if selection.matches(None, tree.start_line(id)) {
                    let (params, body, expr_body, is_async) = match tree.kind(id) {
                        NodeKind::Arrow { params, body, expr_body, is_async } => {
                            (params.clone(), *body, *expr_body, *is_async)
                        }
                        _ => unreachable!(),
                    };
                    let name = inventory.mint_counted(ANON_PREFIX, &mut counter);
                    selection.admit(&name);
                    let at = tree.node(id).span.start;
                    let ident = tree.alloc(NodeKind::Ident { name }, Span::empty(at));
                    let body = if expr_body {
                        // `x => expr` keeps its meaning as `{ return expr; }`.
                        let expr_span = tree.node(body).span;
                        let ret = tree.alloc(NodeKind::Return { arg: Some(body) }, expr_span);
                        tree.alloc(NodeKind::Block { body: vec![ret] }, expr_span)
                    } else {
                        body
                    };
                    tree.node_mut(id).kind = NodeKind::FunctionExpr {
                        ident: Some(ident),
                        params,
                        body,
                        is_async,
                        is_generator: false,
                    };
                }
            }
            _ => {}
        }
        stack.extend(tree.children(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucid_syntax::{parse, Codegen, CodegenOptions, ParserOptions};

    fn run(source: &str) -> String {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        normalize(&mut tree, &mut inventory, &mut Selection::default());
        Codegen::new(&tree, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_anonymous_expression_gets_name() {
        let result = run("var x = function () { return 1; };");
        assert!(result.contains("function f_e_0()"));
    }

    #[test]
    fn test_arrow_becomes_named_function_expression() {
        let result = run("var x = (a, b) => a + b;");
        assert!(result.contains("function f_e_0(a, b)"));
        assert!(result.contains("return a + b;"));
        assert!(!result.contains("=>"));
    }

    #[test]
    fn test_arrow_block_body_kept() {
        let result = run("var x = a => { return a * 2; };");
        assert!(result.contains("function f_e_0(a)"));
        assert!(result.contains("return a * 2;"));
    }

    #[test]
    fn test_named_expression_untouched() {
        let result = run("var x = function named() { return 1; };");
        assert!(result.contains("function named()"));
        assert!(!result.contains("f_e_"));
    }

    #[test]
    fn test_counter_skips_taken_names() {
        let result = run("var f_e_0 = 1;\nvar x = function () {};");
        assert!(result.contains("function f_e_1()"));
    }

    #[test]
    fn test_idempotent_on_normalized_input() {
        let source = "var x = function () {};\nvar y = n => n;";
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        normalize(&mut tree, &mut inventory, &mut Selection::default());
        let once = Codegen::new(&tree, CodegenOptions::default()).generate();
        normalize(&mut tree, &mut inventory, &mut Selection::default());
        let twice = Codegen::new(&tree, CodegenOptions::default()).generate();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_selection_by_line_gates_anonymous_functions() {
        let source = "var x = function () {};\nvar y = function () {};";
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        let mut inventory = Inventory::collect(&mut tree);
        let mut selection = Selection::default();
        selection.insert_line(2);
        normalize(&mut tree, &mut inventory, &mut selection);
        let result = Codegen::new(&tree, CodegenOptions::default()).generate();
        assert!(result.contains("var x = function()"));
        assert!(result.contains("function f_e_0()"));
        assert!(selection.matches(Some("f_e_0"), 999));
    }
}
