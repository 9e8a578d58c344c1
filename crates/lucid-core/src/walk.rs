//! Scope-tracking depth-first tree traversal.
//!
//! This is the single traversal primitive behind every pass: comment
//! attachment, the identifier inventory, the call-graph builder and the
//! uniquifier are all just [`Visitor`] implementations.
//!
//! The walker keeps an explicit stack of [`Scope`]s. Each scope owns a
//! pending-children worklist and a per-pass context value `C`. A scope is
//! pushed whenever the visited node owns a non-empty body (function bodies,
//! blocks, loop bodies — see `Tree::owns_scope`) and popped lazily once its
//! worklist drains, which may cascade through several empty scopes at once.

use lucid_syntax::{NodeId, Tree};

/// What a callback wants the walker to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep going: push a scope if the node owns one, then enqueue children.
    Continue,
    /// Halt the entire traversal immediately.
    Stop,
    /// Skip this node's children. From `on_scope`, the freshly pushed scope
    /// is popped again and the whole subtree is skipped.
    SkipChildren,
}

/// One activation record on the traversal stack.
#[derive(Debug)]
pub struct Scope<C> {
    pending: Vec<NodeId>,
    /// Per-pass context for this scope (substitution tables, the current
    /// enclosing function, ...).
    pub ctx: C,
}

impl<C> Scope<C> {
    fn new(ctx: C) -> Self {
        Self { pending: Vec::new(), ctx }
    }

    /// Whether any nodes remain queued in this scope.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// The stack of live scopes, innermost last.
#[derive(Debug)]
pub struct ScopeStack<C> {
    scopes: Vec<Scope<C>>,
}

impl<C> ScopeStack<C> {
    /// The innermost scope.
    pub fn current(&self) -> &Scope<C> {
        self.scopes.last().expect("walker scope stack is never empty during callbacks")
    }

    /// The innermost scope, mutably.
    pub fn current_mut(&mut self) -> &mut Scope<C> {
        self.scopes.last_mut().expect("walker scope stack is never empty during callbacks")
    }

    /// The scope enclosing the innermost one, if any.
    pub fn parent(&self) -> Option<&Scope<C>> {
        self.scopes.len().checked_sub(2).map(|i| &self.scopes[i])
    }

    /// Queue a node for traversal in the innermost scope. Nodes are
    /// processed in LIFO order: enqueue the one you want visited last,
    /// first.
    pub fn enqueue(&mut self, id: NodeId) {
        self.current_mut().pending.push(id);
    }

    /// Iterate scope contexts from innermost to outermost.
    pub fn iter_in_to_out(&self) -> impl Iterator<Item = &C> {
        self.scopes.iter().rev().map(|s| &s.ctx)
    }

    /// First non-None result of `f`, searching innermost to outermost.
    pub fn find_map<T>(&self, mut f: impl FnMut(&C) -> Option<T>) -> Option<T> {
        self.iter_in_to_out().find_map(|ctx| f(ctx))
    }

    /// Whether `f` holds for any scope context.
    pub fn any(&self, mut f: impl FnMut(&C) -> bool) -> bool {
        self.iter_in_to_out().any(|ctx| f(ctx))
    }

    /// Number of live scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

/// A traversal pass. Both hooks are optional; the defaults just continue.
pub trait Visitor<C> {
    /// Called for every node before its children are enqueued.
    fn on_node(&mut self, _tree: &mut Tree, _id: NodeId, _scopes: &mut ScopeStack<C>) -> Step {
        Step::Continue
    }

    /// Called right after a new scope is pushed for `id`, operating on the
    /// new (innermost) scope.
    fn on_scope(&mut self, _tree: &mut Tree, _id: NodeId, _scopes: &mut ScopeStack<C>) -> Step {
        Step::Continue
    }
}

/// Walk the subtree rooted at `root`, visiting every reachable node exactly
/// once, depth-first, children in source order. `root_ctx` seeds the
/// outermost scope; inner scopes start from `C::default()` and are then
/// configured by the visitor's `on_scope` hook.
pub fn walk<C: Default, V: Visitor<C>>(tree: &mut Tree, root: NodeId, root_ctx: C, visitor: &mut V) {
    let mut stack = ScopeStack { scopes: vec![Scope::new(root_ctx)] };
    stack.scopes[0].pending.push(root);

    loop {
        // Lazy scope popping, cascading through drained scopes.
        while stack.scopes.last().is_some_and(|s| s.pending.is_empty()) {
            stack.scopes.pop();
        }
        let Some(scope) = stack.scopes.last_mut() else {
            break;
        };
        let id = scope.pending.pop().expect("scope with pending nodes");

        match visitor.on_node(tree, id, &mut stack) {
            Step::Stop => return,
            Step::SkipChildren => continue,
            Step::Continue => {}
        }

        if tree.owns_scope(id) {
            stack.scopes.push(Scope::new(C::default()));
            match visitor.on_scope(tree, id, &mut stack) {
                Step::Stop => return,
                Step::SkipChildren => {
                    stack.scopes.pop();
                    continue;
                }
                Step::Continue => {}
            }
        }

        // Reversed so that popping yields source order.
        let children = tree.children(id);
        let scope = stack.scopes.last_mut().expect("current scope");
        scope.pending.extend(children.iter().rev());
    }
}
