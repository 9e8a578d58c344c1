//! First renaming pass: make every function name globally unique.
//!
//! Every selected function declaration or named function expression is
//! renamed to `f_<name>` (numbered on collision against the inventory),
//! and every identifier reference that was lexically bound to it is
//! rewritten to match. Scoping is tracked with one substitution table and
//! one pending-reset set per walker scope:
//!
//! - A substitution entry of `Some(new)` rewrites references until an
//!   inner scope shadows it.
//! - A `None` entry is a tombstone: the name is explicitly not substituted
//!   from that scope inward, overriding enclosing scopes. Parameters and
//!   reassigned names produce tombstones.
//! - Scope-chain lookup stops at the first table containing the name, so a
//!   tombstone actually wins over an outer substitution.
//!
//! Two ordering rules carry the correctness of the pass. Assignments and
//! declarators are re-enqueued right-before-left, because the right-hand
//! side must still see the old binding while the left-hand side resets it.
//! And function declarations directly inside a body are renamed when the
//! scope is entered, not when the declaration statement is reached — they
//! are hoisted in the language, so a call above the declaration must
//! rewrite too.

use crate::inventory::Inventory;
use crate::rename::MANUAL_PREFIX;
use crate::selection::Selection;
use crate::walk::{walk, ScopeStack, Step, Visitor};
use lucid_syntax::{BodySlot, NodeId, NodeKind, Tree};
use rustc_hash::{FxHashMap, FxHashSet};

/// Prefix for uniquified function names.
pub const UNIQUE_PREFIX: &str = "f_";

/// Per-scope renaming state.
#[derive(Debug, Default)]
struct UScope {
    /// name -> replacement, or `None` for a tombstone.
    subs: FxHashMap<String, Option<String>>,
    /// Left-hand identifiers that will install a tombstone when visited.
    resets: FxHashSet<NodeId>,
}

/// Rename every selected function to a globally unique name, rewriting
/// all references bound to it. Minted names are recorded in the inventory
/// and admitted into an active selection.
pub fn uniquify(tree: &mut Tree, inventory: &mut Inventory, selection: &mut Selection) {
    let root = tree.root;
    let mut pass = Uniquifier { inventory, selection, renamed: FxHashSet::default() };
    walk(tree, root, UScope::default(), &mut pass);
}

struct Uniquifier<'a> {
    inventory: &'a mut Inventory,
    selection: &'a mut Selection,
    /// Declarations already renamed during scope-entry hoisting.
    renamed: FxHashSet<NodeId>,
}

impl Uniquifier<'_> {
    /// Whether this function should be renamed: selected, and not carrying
    /// a manually chosen (already final) name.
    fn selected(&self, tree: &Tree, func: NodeId, ident: NodeId) -> bool {
        let name = tree.ident_name(ident);
        if name.is_some_and(|n| n.starts_with(MANUAL_PREFIX)) {
            return false;
        }
        self.selection.matches(name, tree.start_line(func))
    }

    /// Rename a function's identifier to a fresh `f_` name, record the
    /// substitution in the current scope, and keep the new name selected.
    fn subname(&mut self, tree: &mut Tree, ident: NodeId, scopes: &mut ScopeStack<UScope>) {
        let Some(old) = tree.ident_name(ident).map(str::to_string) else {
            return;
        };
        let new_name = self.inventory.mint_prefixed(UNIQUE_PREFIX, &old);
        self.selection.admit(&new_name);
        scopes.current_mut().ctx.subs.insert(old, Some(new_name.clone()));
        tree.set_ident_name(ident, new_name);
    }

    /// Mark an assignment target for a tombstone if any enclosing scope is
    /// currently substituting its name.
    fn mark_reset(&self, tree: &Tree, target: NodeId, scopes: &mut ScopeStack<UScope>) {
        if let Some(name) = tree.ident_name(target) {
            if scopes.any(|ctx| ctx.subs.contains_key(name)) {
                scopes.current_mut().ctx.resets.insert(target);
            }
        }
    }
}

impl Visitor<UScope> for Uniquifier<'_> {
    fn on_node(&mut self, tree: &mut Tree, id: NodeId, scopes: &mut ScopeStack<UScope>) -> Step {
        match tree.kind(id) {
            // The right-hand side still references the old binding; the
            // reset takes effect only when the left identifier is reached.
            NodeKind::Assign { left, right, .. } | NodeKind::AssignPattern { left, right } => {
                let (left, right) = (*left, *right);
                self.mark_reset(tree, left, scopes);
                scopes.enqueue(left);
                scopes.enqueue(right);
                Step::SkipChildren
            }
            NodeKind::VarDeclarator { id: target, init } => {
                let (target, init) = (*target, *init);
                self.mark_reset(tree, target, scopes);
                scopes.enqueue(target);
                if let Some(init) = init {
                    scopes.enqueue(init);
                }
                Step::SkipChildren
            }
            // A property name is never a bindable identifier; even a
            // computed lookup is left alone.
            NodeKind::Member { object, .. } => {
                let object = *object;
                scopes.enqueue(object);
                Step::SkipChildren
            }
            NodeKind::FunctionDecl { ident, .. } => {
                let ident = *ident;
                if !self.renamed.contains(&id) && self.selected(tree, id, ident) {
                    self.subname(tree, ident, scopes);
                }
                Step::Continue
            }
            NodeKind::Ident { name } => {
                let name = name.clone();
                if scopes.current_mut().ctx.resets.remove(&id) {
                    scopes.current_mut().ctx.subs.insert(name, None);
                } else if let Some(Some(new_name)) =
                    scopes.find_map(|ctx| ctx.subs.get(&name).cloned())
                {
                    tree.set_ident_name(id, new_name);
                }
                Step::Continue
            }
            _ => Step::Continue,
        }
    }

    fn on_scope(&mut self, tree: &mut Tree, id: NodeId, scopes: &mut ScopeStack<UScope>) -> Step {
        // Hoist: declarations directly in this body are visible from the
        // top of the scope.
        if let Some(BodySlot::List(body)) = tree.body_of(id) {
            let stmts: Vec<NodeId> = body.to_vec();
            for stmt in stmts {
                let decl = match tree.kind(stmt) {
                    NodeKind::ExportDecl { decl } => *decl,
                    _ => stmt,
                };
                if let NodeKind::FunctionDecl { ident, .. } = tree.kind(decl) {
                    let ident = *ident;
                    if self.selected(tree, decl, ident) {
                        self.renamed.insert(decl);
                        self.subname(tree, ident, scopes);
                    }
                }
            }
        }

        // A function expression's name is visible only inside its own
        // body, so the substitution lands in the scope just pushed.
        if let NodeKind::FunctionExpr { ident: Some(ident), .. } = tree.kind(id) {
            let ident = *ident;
            if self.selected(tree, id, ident) {
                self.subname(tree, ident, scopes);
            }
        }

        // Parameters always shadow outer bindings: tombstone any name an
        // enclosing scope (or this one) is substituting.
        if tree.is_function_like(id) {
            let params: Vec<NodeId> = match tree.kind(id) {
                NodeKind::FunctionDecl { params, .. }
                | NodeKind::FunctionExpr { params, .. }
                | NodeKind::Arrow { params, .. } => params.clone(),
                _ => Vec::new(),
            };
            for param in params {
                let name = match tree.kind(param) {
                    NodeKind::Ident { name } => Some(name.clone()),
                    NodeKind::AssignPattern { left, .. } => {
                        tree.ident_name(*left).map(str::to_string)
                    }
                    _ => None,
                };
                if let Some(name) = name {
                    if scopes.any(|ctx| ctx.subs.contains_key(&name)) {
                        scopes.current_mut().ctx.subs.insert(name, None);
                    }
                }
            }
        }

        Step::Continue
    }
}
