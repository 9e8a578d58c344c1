//! Comment reattachment.
//!
//! The parser hands over comments as a flat list with spans; nothing in the
//! raw parse says which node a comment belongs to. This pass reconstructs
//! "nearest enclosing or immediately following" ownership: one full walker
//! pass per comment, attaching it as a leading or trailing annotation of
//! the first node the policy below accepts.
//!
//! Policy, evaluated per visited node:
//! 1. The program root is skipped outright (defer to its children).
//! 2. A comment starting before the node becomes a leading comment.
//! 3. A comment strictly inside a node that has no interior (no body slot,
//!    or an empty one), or strictly after a node when no siblings remain or
//!    the comment starts on the node's end line, becomes a trailing
//!    comment.
//! 4. Otherwise traversal continues into the node.
//! 5. When a scope is entered whose owner ends before the comment's line,
//!    the whole subtree is skipped. This is a correctness rule, not just a
//!    shortcut: without it a comment after a large block could be
//!    mis-attributed to a deeply nested trailing position.

use crate::walk::{walk, ScopeStack, Step, Visitor};
use lucid_syntax::{BodySlot, Comment, NodeId, NodeKind, Tree};

/// Attach every free-floating comment in the tree to a node. Comments with
/// no attachment point (an empty program) are dropped.
pub fn attach_comments(tree: &mut Tree) {
    let comments = std::mem::take(&mut tree.comments);
    for comment in comments {
        let root = tree.root;
        let mut attacher = Attacher { comment: Some(comment) };
        walk(tree, root, (), &mut attacher);
        if let Some(dropped) = attacher.comment {
            tracing::debug!(
                line = tree.line_of(dropped.span.start),
                "comment had no attachment point; dropping it"
            );
        }
    }
}

/// One walker pass carrying a single comment. `comment` is `None` once the
/// comment has found its home.
struct Attacher {
    comment: Option<Comment>,
}

impl Visitor<()> for Attacher {
    fn on_node(&mut self, tree: &mut Tree, id: NodeId, scopes: &mut ScopeStack<()>) -> Step {
        if matches!(tree.kind(id), NodeKind::Program { .. }) {
            return Step::Continue;
        }
        let Some(comment) = self.comment.as_ref() else {
            return Step::Stop;
        };

        let span = tree.node(id).span;
        let start = comment.span.start;

        if start < span.start {
            let comment = self.comment.take().expect("comment still pending");
            tree.node_mut(id).leading_comments.push(comment);
            return Step::Stop;
        }

        let inside = start > span.start && start < span.end;
        let after = start > span.end;
        let no_interior = match tree.body_of(id) {
            None => true,
            Some(BodySlot::List(body)) => body.is_empty(),
            Some(BodySlot::Single(_)) => false,
        };
        let no_siblings = !scopes.current().has_pending();
        let same_line = tree.line_of(start) == tree.end_line(id);

        if (inside && no_interior) || (after && (no_siblings || same_line)) {
            let comment = self.comment.take().expect("comment still pending");
            tree.node_mut(id).trailing_comments.push(comment);
            return Step::Stop;
        }

        Step::Continue
    }

    fn on_scope(&mut self, tree: &mut Tree, id: NodeId, _scopes: &mut ScopeStack<()>) -> Step {
        let Some(comment) = self.comment.as_ref() else {
            return Step::Stop;
        };
        // The comment lies entirely past this scope's owner; nothing inside
        // the subtree can own it.
        if tree.line_of(comment.span.start) > tree.end_line(id) {
            return Step::SkipChildren;
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucid_syntax::{parse, CommentKind, ParserOptions};

    fn attach(source: &str) -> Tree {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        attach_comments(&mut tree);
        tree
    }

    fn program_body(tree: &Tree) -> Vec<NodeId> {
        match tree.kind(tree.root) {
            NodeKind::Program { body } => body.clone(),
            other => panic!("root is not a program: {other:?}"),
        }
    }

    #[test]
    fn test_leading_comment_before_statement() {
        let tree = attach("// helper\nfunction b() { return 1; }");
        let body = program_body(&tree);
        let leading = &tree.node(body[0]).leading_comments;
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].text, " helper");
        assert_eq!(leading[0].kind, CommentKind::Line);
    }

    #[test]
    fn test_leading_comment_between_statements() {
        let tree = attach("var a = 1;\n// about b\nvar b = 2;");
        let body = program_body(&tree);
        assert!(tree.node(body[0]).leading_comments.is_empty());
        assert_eq!(tree.node(body[1]).leading_comments.len(), 1);
    }

    #[test]
    fn test_trailing_comment_same_line() {
        let tree = attach("var a = 1; // the answer\nvar b = 2;");
        let body = program_body(&tree);
        let trailing = &tree.node(body[0]).trailing_comments;
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing[0].text, " the answer");
        assert!(tree.node(body[1]).leading_comments.is_empty());
    }

    #[test]
    fn test_trailing_comment_after_last_statement() {
        let tree = attach("var a = 1;\n// done\n");
        let body = program_body(&tree);
        assert_eq!(tree.node(body[0]).trailing_comments.len(), 1);
    }

    #[test]
    fn test_comment_inside_function_attaches_to_inner_statement() {
        let tree = attach("function f() {\n  // compute\n  return 1;\n}");
        let body = program_body(&tree);
        let func = body[0];
        let block = match tree.kind(func) {
            NodeKind::FunctionDecl { body, .. } => *body,
            other => panic!("unexpected: {other:?}"),
        };
        let ret = match tree.kind(block) {
            NodeKind::Block { body } => body[0],
            other => panic!("unexpected: {other:?}"),
        };
        assert_eq!(tree.node(ret).leading_comments.len(), 1);
        assert!(tree.node(func).leading_comments.is_empty());
    }

    #[test]
    fn test_comment_after_block_does_not_sink_into_it() {
        // The comment sits after the whole function, on its own line, with
        // a sibling following; it must become the sibling's leading
        // comment, not a trailing comment buried inside the function body.
        let tree = attach("function f() {\n  return 1;\n}\n// next\nvar x = 2;");
        let body = program_body(&tree);
        let func = body[0];
        let block = match tree.kind(func) {
            NodeKind::FunctionDecl { body, .. } => *body,
            other => panic!("unexpected: {other:?}"),
        };
        let ret = match tree.kind(block) {
            NodeKind::Block { body } => body[0],
            other => panic!("unexpected: {other:?}"),
        };
        assert!(tree.node(ret).trailing_comments.is_empty());
        assert_eq!(tree.node(body[1]).leading_comments.len(), 1);
    }

    #[test]
    fn test_attachment_is_deterministic() {
        let source = "var a = 1; // one\n// two\nfunction f() { /* three */ }\n";
        let first = attach(source);
        let second = attach(source);
        let collect = |tree: &Tree| {
            (0..tree.len() as NodeId)
                .map(|id| {
                    (
                        tree.node(id).leading_comments.len(),
                        tree.node(id).trailing_comments.len(),
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(collect(&first), collect(&second));
    }

    #[test]
    fn test_comment_with_no_node_is_dropped() {
        let tree = attach("// nothing here\n");
        for id in 0..tree.len() as NodeId {
            assert!(tree.node(id).leading_comments.is_empty());
            assert!(tree.node(id).trailing_comments.is_empty());
        }
    }

    #[test]
    fn test_block_comment_inside_empty_function() {
        let tree = attach("function f() { /* empty on purpose */ }");
        let body = program_body(&tree);
        let block = match tree.kind(body[0]) {
            NodeKind::FunctionDecl { body, .. } => *body,
            other => panic!("unexpected: {other:?}"),
        };
        // The empty block has no interior, so it owns the comment.
        assert_eq!(tree.node(block).trailing_comments.len(), 1);
    }
}
