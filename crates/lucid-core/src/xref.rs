//! Call-graph construction: which function calls which, and where.
//!
//! Function records live in an arena ([`FuncRegistry`]) and are referenced
//! by [`FuncId`] everywhere, including from [`Xref`] entries, so a record
//! can be re-keyed under a new name without touching the edges that point
//! at it. Only calls whose callee is a bare identifier are tracked; calls
//! through member access, computed lookups or reassigned aliases
//! (`var g = f; g();`) are a documented precision limit, not an error.

use crate::selection::Selection;
use crate::walk::{walk, ScopeStack, Step, Visitor};
use lucid_syntax::{NodeId, NodeKind, Tree};
use rustc_hash::FxHashMap;

/// Index of a function record in the registry arena.
pub type FuncId = u32;

/// Display name of the sentinel record for top-level code. The leading
/// `!` cannot appear in a parsed identifier, so it can never collide with
/// a real function name.
pub const GLOBAL_SCOPE: &str = "! Global Scope";

/// Display name bound to a function expression that still has no
/// identifier (possible only when a selection kept the normalizer away).
pub const ANONYMOUS: &str = "! Anonymous";

/// One observed call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xref {
    /// The function the call appears in.
    pub caller: FuncId,
    /// 1-based source line of the call.
    pub line: u32,
}

/// The record for one named function.
#[derive(Debug)]
pub struct Function {
    pub name: String,
    /// Call sites targeting this function, in source-visit order. Only
    /// ever appended to.
    pub xrefs: Vec<Xref>,
    /// True when the record was created at a call site before any
    /// declaration was seen.
    pub creator_unknown: bool,
}

/// Arena of function records plus a name index.
#[derive(Debug)]
pub struct FuncRegistry {
    funcs: Vec<Function>,
    by_name: FxHashMap<String, FuncId>,
}

impl FuncRegistry {
    /// A registry holding only the global-scope sentinel.
    pub fn new() -> Self {
        let mut registry = Self { funcs: Vec::new(), by_name: FxHashMap::default() };
        registry.intern(GLOBAL_SCOPE, false);
        registry
    }

    /// The sentinel record for top-level code.
    pub fn global(&self) -> FuncId {
        0
    }

    /// Number of records, the sentinel included.
    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<FuncId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: FuncId) -> &Function {
        &self.funcs[id as usize]
    }

    pub fn name_of(&self, id: FuncId) -> &str {
        &self.funcs[id as usize].name
    }

    /// The record for `name`, creating it if absent. A record created here
    /// for the first time carries `creator_unknown`; an existing record is
    /// reused as-is, keeping its accumulated xrefs and flag. That reuse is
    /// what lets a call site observed before the declaration survive into
    /// the declaration's record.
    pub fn intern(&mut self, name: &str, creator_unknown: bool) -> FuncId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.funcs.len() as FuncId;
        self.funcs.push(Function {
            name: name.to_string(),
            xrefs: Vec::new(),
            creator_unknown,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn add_xref(&mut self, callee: FuncId, xref: Xref) {
        self.funcs[callee as usize].xrefs.push(xref);
    }

    /// Re-key a record under a new name. Xref edges keep pointing at the
    /// same id, so they stay valid across the rename.
    pub fn rename(&mut self, id: FuncId, new_name: &str) {
        let func = &mut self.funcs[id as usize];
        self.by_name.remove(&func.name);
        func.name = new_name.to_string();
        self.by_name.insert(new_name.to_string(), id);
    }
}

impl Default for FuncRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the tree and record a cross-reference for every direct
/// bare-identifier call. A non-empty selection gates which callees
/// accumulate edges; caller records are always created, since they label
/// the edges of whatever they call.
pub fn build_call_graph(tree: &mut Tree, selection: &Selection) -> FuncRegistry {
    let mut registry = FuncRegistry::new();
    let root = tree.root;
    let global = registry.global();
    let mut builder = GraphBuilder { registry: &mut registry, selection };
    walk(tree, root, CallCtx { func: Some(global) }, &mut builder);
    registry
}

/// Per-scope context: the function whose body this scope belongs to.
/// `None` means "inherit from the enclosing scope".
#[derive(Debug, Default)]
struct CallCtx {
    func: Option<FuncId>,
}

struct GraphBuilder<'a> {
    registry: &'a mut FuncRegistry,
    selection: &'a Selection,
}

impl Visitor<CallCtx> for GraphBuilder<'_> {
    fn on_node(&mut self, tree: &mut Tree, id: NodeId, scopes: &mut ScopeStack<CallCtx>) -> Step {
        if let NodeKind::Call { callee, .. } = tree.kind(id) {
            if let Some(name) = tree.ident_name(*callee) {
                if self.selection.allows_callee(name) {
                    let callee_id = self.registry.intern(name, true);
                    let caller = scopes
                        .find_map(|ctx| ctx.func)
                        .unwrap_or_else(|| self.registry.global());
                    let line = tree.start_line(id);
                    self.registry.add_xref(callee_id, Xref { caller, line });
                }
            }
        }
        Step::Continue
    }

    fn on_scope(&mut self, tree: &mut Tree, id: NodeId, scopes: &mut ScopeStack<CallCtx>) -> Step {
        let ident = match tree.kind(id) {
            NodeKind::FunctionDecl { ident, .. } => Some(*ident),
            NodeKind::FunctionExpr { ident, .. } => *ident,
            _ => return Step::Continue,
        };
        let name = ident
            .and_then(|ident| tree.ident_name(ident))
            .unwrap_or(ANONYMOUS)
            .to_string();
        let func = self.registry.intern(&name, false);
        scopes.current_mut().ctx.func = Some(func);
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucid_syntax::{parse, ParserOptions};

    fn graph(source: &str) -> FuncRegistry {
        let mut tree = parse(source, ParserOptions::default()).expect("source should parse");
        build_call_graph(&mut tree, &Selection::default())
    }

    fn xref_callers(registry: &FuncRegistry, name: &str) -> Vec<String> {
        let id = registry.lookup(name).unwrap_or_else(|| panic!("{name} not in registry"));
        registry
            .get(id)
            .xrefs
            .iter()
            .map(|x| registry.name_of(x.caller).to_string())
            .collect()
    }

    #[test]
    fn test_direct_call_records_caller_and_line() {
        let registry = graph("function a() {\n  return b();\n}\nfunction b() {\n  return 1;\n}");
        assert_eq!(xref_callers(&registry, "b"), vec!["a"]);
        let b = registry.lookup("b").unwrap();
        assert_eq!(registry.get(b).xrefs[0].line, 2);
    }

    #[test]
    fn test_call_before_declaration_reuses_record() {
        // `b` is first seen at the call site; the later declaration must
        // keep the xref accumulated there.
        let registry = graph("function a() { return b(); }\nfunction b() { return 1; }");
        let b = registry.lookup("b").unwrap();
        assert!(registry.get(b).creator_unknown);
        assert_eq!(registry.get(b).xrefs.len(), 1);
    }

    #[test]
    fn test_top_level_call_attributed_to_global_scope() {
        let registry = graph("function a() {}\na();");
        assert_eq!(xref_callers(&registry, "a"), vec![GLOBAL_SCOPE]);
    }

    #[test]
    fn test_member_calls_are_ignored() {
        let registry = graph("function a() { console.log(1); obj[key](); }");
        assert!(registry.lookup("log").is_none());
        assert!(registry.lookup("console").is_none());
        assert!(registry.lookup("key").is_none());
    }

    #[test]
    fn test_undeclared_callee_flagged_creator_unknown() {
        let registry = graph("function a() { return mystery(); }");
        let mystery = registry.lookup("mystery").unwrap();
        assert!(registry.get(mystery).creator_unknown);
        let a = registry.lookup("a").unwrap();
        assert!(!registry.get(a).creator_unknown);
    }

    #[test]
    fn test_xref_count_matches_call_count() {
        let registry = graph("function a() { b(); b(); }\nfunction c() { b(); }\nfunction b() {}");
        assert_eq!(xref_callers(&registry, "b"), vec!["a", "a", "c"]);
    }

    #[test]
    fn test_nested_function_is_the_caller() {
        let registry = graph("function outer() { function inner() { target(); } }");
        assert_eq!(xref_callers(&registry, "target"), vec!["inner"]);
    }

    #[test]
    fn test_reassigned_alias_not_attributed() {
        // Known precision limit: the aliased call is recorded against the
        // alias name, never against `f`.
        let registry = graph("function f() {}\nvar g = f;\ng();");
        let f = registry.lookup("f").unwrap();
        assert!(registry.get(f).xrefs.is_empty());
        assert_eq!(registry.get(registry.lookup("g").unwrap()).xrefs.len(), 1);
    }

    #[test]
    fn test_selection_gates_callee_edges() {
        let mut selection = Selection::default();
        selection.insert_name("b");
        let mut tree =
            parse("function a() { b(); c(); }\nfunction b() {}\nfunction c() {}", ParserOptions::default())
                .expect("source should parse");
        let registry = build_call_graph(&mut tree, &selection);
        assert_eq!(registry.get(registry.lookup("b").unwrap()).xrefs.len(), 1);
        // `c` still gets a record (it declares a function) but no edges.
        assert!(registry.get(registry.lookup("c").unwrap()).xrefs.is_empty());
    }

    #[test]
    fn test_rename_keeps_edges_valid() {
        let mut registry = graph("function a() { return b(); }\nfunction b() {}");
        let b = registry.lookup("b").unwrap();
        registry.rename(b, "f_b_final");
        assert!(registry.lookup("b").is_none());
        assert_eq!(registry.lookup("f_b_final"), Some(b));
        assert_eq!(xref_callers(&registry, "f_b_final"), vec!["a"]);
    }
}
