//! Arena-allocated AST for the supported JavaScript subset.
//!
//! Every node lives in one flat `Vec` inside [`Tree`] and is addressed by a
//! [`NodeId`] index. Children are ids, not boxes, so rewriting passes can
//! hold a worklist of pending nodes while mutating others — the borrow
//! checker never sees two paths into the same allocation.
//!
//! Unlike a parser that splits statements and expressions into separate
//! types, there is a single [`NodeKind`] so one generic scope-tracking
//! walker can serve every pass. Each variant declares its ordered child
//! slots through [`Tree::children`], and its body slot (the part that opens
//! a lexical scope) through [`Tree::body_of`].

use crate::span::{LineIndex, Span};

/// Node index into the tree arena.
pub type NodeId = u32;

/// Kind of a source comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A source comment. Produced once by the lexer; after attachment it is
/// owned by exactly one node's leading or trailing list.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment text without the delimiters.
    pub text: String,
    pub span: Span,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub leading_comments: Vec<Comment>,
    pub trailing_comments: Vec<Comment>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            leading_comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,  // -
    Plus,   // +
    Not,    // !
    BitNot, // ~
    Typeof, // typeof
    Void,   // void
    Delete, // delete
}

/// Binary operators (including logical).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // **

    // Comparison
    Eq,          // ==
    NotEq,       // !=
    StrictEq,    // ===
    StrictNotEq, // !==
    Lt,          // <
    LtEq,        // <=
    Gt,          // >
    GtEq,        // >=

    // Bitwise
    BitOr,  // |
    BitXor, // ^
    BitAnd, // &
    Shl,    // <<
    Shr,    // >>
    UShr,   // >>>

    // Logical
    And,             // &&
    Or,              // ||
    NullishCoalesce, // ??

    // Other
    In,         // in
    Instanceof, // instanceof
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,        // =
    AddAssign,     // +=
    SubAssign,     // -=
    MulAssign,     // *=
    DivAssign,     // /=
    ModAssign,     // %=
    PowAssign,     // **=
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    UShrAssign,    // >>>=
    BitOrAssign,   // |=
    BitXorAssign,  // ^=
    BitAndAssign,  // &=
    AndAssign,     // &&=
    OrAssign,      // ||=
    NullishAssign, // ??=
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment, // ++
    Decrement, // --
}

/// How an import specifier binds its local name.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportBinding {
    /// `import foo from "mod"`
    Default,
    /// `import * as foo from "mod"`
    Namespace,
    /// `import { bar as foo } from "mod"` — carries the external name
    Named(String),
}

/// Node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of the tree.
    Program { body: Vec<NodeId> },

    // === Statements ===
    /// `var a = 1, b;`
    VarDecl { kind: VarKind, decls: Vec<NodeId> },
    /// One `name = init` inside a declaration.
    VarDeclarator { id: NodeId, init: Option<NodeId> },
    /// `function foo() {}` — body is always a `Block` node.
    FunctionDecl {
        ident: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
        is_async: bool,
        is_generator: bool,
    },
    /// `{ ... }`
    Block { body: Vec<NodeId> },
    If {
        test: NodeId,
        consequent: NodeId,
        alternate: Option<NodeId>,
    },
    Switch { discriminant: NodeId, cases: Vec<NodeId> },
    SwitchCase { test: Option<NodeId>, consequent: Vec<NodeId> },
    For {
        init: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    },
    ForIn { left: NodeId, right: NodeId, body: NodeId },
    While { test: NodeId, body: NodeId },
    DoWhile { body: NodeId, test: NodeId },
    Break { label: Option<String> },
    Continue { label: Option<String> },
    Return { arg: Option<NodeId> },
    Throw { arg: NodeId },
    Try {
        block: NodeId,
        handler: Option<NodeId>,
        finalizer: Option<NodeId>,
    },
    Catch { param: Option<NodeId>, body: NodeId },
    Labeled { label: String, body: NodeId },
    With { object: NodeId, body: NodeId },
    ExprStmt { expr: NodeId },
    Empty,
    Debugger,

    // === Modules ===
    ImportDecl { specifiers: Vec<NodeId>, source: String },
    ImportSpec { binding: ImportBinding, local: NodeId },
    ExportNamed { specifiers: Vec<NodeId> },
    ExportSpec { local: NodeId, exported: String },
    /// `export function foo() {}` / `export var x;`
    ExportDecl { decl: NodeId },
    /// `export default expr;`
    ExportDefault { expr: NodeId },

    // === Expressions ===
    Ident { name: String },
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Regex { pattern: String, flags: String },
    This,
    Array { elements: Vec<Option<NodeId>> },
    Object { properties: Vec<NodeId> },
    Property {
        key: NodeId,
        value: NodeId,
        computed: bool,
        shorthand: bool,
    },
    /// `function() {}` — body is always a `Block` node.
    FunctionExpr {
        ident: Option<NodeId>,
        params: Vec<NodeId>,
        body: NodeId,
        is_async: bool,
        is_generator: bool,
    },
    /// `(a, b) => ...` — body is a `Block` node or a bare expression.
    Arrow {
        params: Vec<NodeId>,
        body: NodeId,
        expr_body: bool,
        is_async: bool,
    },
    Unary { op: UnaryOp, arg: NodeId },
    Binary { op: BinaryOp, left: NodeId, right: NodeId },
    Assign { op: AssignOp, left: NodeId, right: NodeId },
    /// Parameter default: `function f(a = 1)`
    AssignPattern { left: NodeId, right: NodeId },
    Update { op: UpdateOp, prefix: bool, arg: NodeId },
    Cond {
        test: NodeId,
        consequent: NodeId,
        alternate: NodeId,
    },
    Seq { exprs: Vec<NodeId> },
    Member {
        object: NodeId,
        property: NodeId,
        computed: bool,
    },
    Call { callee: NodeId, args: Vec<NodeId> },
    New { callee: NodeId, args: Vec<NodeId> },
    Spread { arg: NodeId },
    Await { arg: NodeId },
    Yield { arg: Option<NodeId>, delegate: bool },
}

impl NodeKind {
    /// Whether this kind occupies statement position. Comment attachment
    /// targets statements; everything else defers to its children.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::Program { .. }
                | NodeKind::VarDecl { .. }
                | NodeKind::FunctionDecl { .. }
                | NodeKind::Block { .. }
                | NodeKind::If { .. }
                | NodeKind::Switch { .. }
                | NodeKind::For { .. }
                | NodeKind::ForIn { .. }
                | NodeKind::While { .. }
                | NodeKind::DoWhile { .. }
                | NodeKind::Break { .. }
                | NodeKind::Continue { .. }
                | NodeKind::Return { .. }
                | NodeKind::Throw { .. }
                | NodeKind::Try { .. }
                | NodeKind::Labeled { .. }
                | NodeKind::With { .. }
                | NodeKind::ExprStmt { .. }
                | NodeKind::Empty
                | NodeKind::Debugger
                | NodeKind::ImportDecl { .. }
                | NodeKind::ExportNamed { .. }
                | NodeKind::ExportDecl { .. }
                | NodeKind::ExportDefault { .. }
        )
    }
}

/// The body slot of a node — the part that opens a lexical scope.
#[derive(Debug, Clone, Copy)]
pub enum BodySlot<'a> {
    List(&'a [NodeId]),
    Single(NodeId),
}

impl BodySlot<'_> {
    /// A single-node body always counts as non-empty.
    pub fn is_empty(&self) -> bool {
        match self {
            BodySlot::List(ids) => ids.is_empty(),
            BodySlot::Single(_) => false,
        }
    }
}

/// A parsed program: the node arena plus its free-floating comments.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    pub root: NodeId,
    /// Comments in source order; drained by the comment attacher.
    pub comments: Vec<Comment>,
    /// Source code (for error messages and line lookup).
    pub source: String,
    lines: LineIndex,
}

impl Tree {
    /// Assemble a tree from parsed parts.
    pub fn new(nodes: Vec<Node>, root: NodeId, comments: Vec<Comment>, source: String) -> Self {
        let lines = LineIndex::new(&source);
        Self { nodes, root, comments, source, lines }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(kind, span));
        id
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id as usize].kind
    }

    /// 1-based source line of a byte offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.lines.line_of(offset)
    }

    /// 1-based source line on which a node ends.
    pub fn end_line(&self, id: NodeId) -> u32 {
        self.lines.end_line_of(self.node(id).span)
    }

    /// 1-based source line on which a node starts.
    pub fn start_line(&self, id: NodeId) -> u32 {
        self.lines.line_of(self.node(id).span.start)
    }

    /// The name of an `Ident` node, if it is one.
    pub fn ident_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Overwrite the text of an `Ident` node. No-op for other kinds.
    pub fn set_ident_name(&mut self, id: NodeId, new_name: impl Into<String>) {
        if let NodeKind::Ident { name } = &mut self.node_mut(id).kind {
            *name = new_name.into();
        }
    }

    /// The body slot of a node, if it has one. These are exactly the nodes
    /// that open a lexical scope during traversal.
    pub fn body_of(&self, id: NodeId) -> Option<BodySlot<'_>> {
        match self.kind(id) {
            NodeKind::Program { body } | NodeKind::Block { body } => Some(BodySlot::List(body)),
            NodeKind::FunctionDecl { body, .. }
            | NodeKind::FunctionExpr { body, .. }
            | NodeKind::Arrow { body, .. }
            | NodeKind::While { body, .. }
            | NodeKind::DoWhile { body, .. }
            | NodeKind::For { body, .. }
            | NodeKind::ForIn { body, .. }
            | NodeKind::Labeled { body, .. }
            | NodeKind::With { body, .. }
            | NodeKind::Catch { body, .. } => Some(BodySlot::Single(*body)),
            _ => None,
        }
    }

    /// Whether visiting this node opens a new scope.
    pub fn owns_scope(&self, id: NodeId) -> bool {
        self.body_of(id).is_some_and(|b| !b.is_empty())
    }

    /// Whether this node is a function-like construct (owns parameters).
    pub fn is_function_like(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::FunctionDecl { .. } | NodeKind::FunctionExpr { .. } | NodeKind::Arrow { .. }
        )
    }

    /// All children of a node, in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_children(self.kind(id), &mut |child| out.push(child));
        out
    }

    /// Deep-copy a subtree from another tree into this arena, returning the
    /// new root id. Spans and comments come along verbatim.
    pub fn import_subtree(&mut self, other: &Tree, id: NodeId) -> NodeId {
        let node = other.node(id);
        let kind = remap_kind(&node.kind, &mut |child| self.import_subtree(other, child));
        let new_id = self.alloc(kind, node.span);
        self.nodes[new_id as usize].leading_comments = node.leading_comments.clone();
        self.nodes[new_id as usize].trailing_comments = node.trailing_comments.clone();
        new_id
    }
}

/// Invoke `f` on every child id of `kind`, in source order.
fn collect_children(kind: &NodeKind, f: &mut impl FnMut(NodeId)) {
    match kind {
        NodeKind::Program { body } | NodeKind::Block { body } => body.iter().copied().for_each(f),
        NodeKind::VarDecl { decls, .. } => decls.iter().copied().for_each(f),
        NodeKind::VarDeclarator { id, init } => {
            f(*id);
            if let Some(init) = init {
                f(*init);
            }
        }
        NodeKind::FunctionDecl { ident, params, body, .. } => {
            f(*ident);
            params.iter().copied().for_each(&mut *f);
            f(*body);
        }
        NodeKind::FunctionExpr { ident, params, body, .. } => {
            if let Some(ident) = ident {
                f(*ident);
            }
            params.iter().copied().for_each(&mut *f);
            f(*body);
        }
        NodeKind::Arrow { params, body, .. } => {
            params.iter().copied().for_each(&mut *f);
            f(*body);
        }
        NodeKind::If { test, consequent, alternate } => {
            f(*test);
            f(*consequent);
            if let Some(alt) = alternate {
                f(*alt);
            }
        }
        NodeKind::Switch { discriminant, cases } => {
            f(*discriminant);
            cases.iter().copied().for_each(f);
        }
        NodeKind::SwitchCase { test, consequent } => {
            if let Some(test) = test {
                f(*test);
            }
            consequent.iter().copied().for_each(f);
        }
        NodeKind::For { init, test, update, body } => {
            if let Some(init) = init {
                f(*init);
            }
            if let Some(test) = test {
                f(*test);
            }
            if let Some(update) = update {
                f(*update);
            }
            f(*body);
        }
        NodeKind::ForIn { left, right, body } => {
            f(*left);
            f(*right);
            f(*body);
        }
        NodeKind::While { test, body } => {
            f(*test);
            f(*body);
        }
        NodeKind::DoWhile { body, test } => {
            f(*body);
            f(*test);
        }
        NodeKind::Return { arg } => {
            if let Some(arg) = arg {
                f(*arg);
            }
        }
        NodeKind::Throw { arg } => f(*arg),
        NodeKind::Try { block, handler, finalizer } => {
            f(*block);
            if let Some(handler) = handler {
                f(*handler);
            }
            if let Some(finalizer) = finalizer {
                f(*finalizer);
            }
        }
        NodeKind::Catch { param, body } => {
            if let Some(param) = param {
                f(*param);
            }
            f(*body);
        }
        NodeKind::Labeled { body, .. } => f(*body),
        NodeKind::With { object, body } => {
            f(*object);
            f(*body);
        }
        NodeKind::ExprStmt { expr } => f(*expr),
        NodeKind::ImportDecl { specifiers, .. } | NodeKind::ExportNamed { specifiers } => {
            specifiers.iter().copied().for_each(f);
        }
        NodeKind::ImportSpec { local, .. } => f(*local),
        NodeKind::ExportSpec { local, .. } => f(*local),
        NodeKind::ExportDecl { decl } => f(*decl),
        NodeKind::ExportDefault { expr } => f(*expr),
        NodeKind::Array { elements } => elements.iter().flatten().copied().for_each(f),
        NodeKind::Object { properties } => properties.iter().copied().for_each(f),
        NodeKind::Property { key, value, .. } => {
            f(*key);
            f(*value);
        }
        NodeKind::Unary { arg, .. } | NodeKind::Update { arg, .. } | NodeKind::Spread { arg } | NodeKind::Await { arg } => {
            f(*arg);
        }
        NodeKind::Binary { left, right, .. }
        | NodeKind::Assign { left, right, .. }
        | NodeKind::AssignPattern { left, right } => {
            f(*left);
            f(*right);
        }
        NodeKind::Cond { test, consequent, alternate } => {
            f(*test);
            f(*consequent);
            f(*alternate);
        }
        NodeKind::Seq { exprs } => exprs.iter().copied().for_each(f),
        NodeKind::Member { object, property, .. } => {
            f(*object);
            f(*property);
        }
        NodeKind::Call { callee, args } | NodeKind::New { callee, args } => {
            f(*callee);
            args.iter().copied().for_each(f);
        }
        NodeKind::Yield { arg, .. } => {
            if let Some(arg) = arg {
                f(*arg);
            }
        }
        NodeKind::Ident { .. }
        | NodeKind::Null
        | NodeKind::Bool(_)
        | NodeKind::Number(_)
        | NodeKind::Str(_)
        | NodeKind::Regex { .. }
        | NodeKind::This
        | NodeKind::Empty
        | NodeKind::Debugger
        | NodeKind::Break { .. }
        | NodeKind::Continue { .. } => {}
    }
}

/// Clone a kind, passing each child id through `f`.
fn remap_kind(kind: &NodeKind, f: &mut dyn FnMut(NodeId) -> NodeId) -> NodeKind {
    match kind {
        NodeKind::Program { body } => NodeKind::Program { body: body.iter().map(|&c| f(c)).collect() },
        NodeKind::VarDecl { kind, decls } => NodeKind::VarDecl {
            kind: *kind,
            decls: decls.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::VarDeclarator { id, init } => NodeKind::VarDeclarator {
            id: f(*id),
            init: init.map(&mut *f),
        },
        NodeKind::FunctionDecl { ident, params, body, is_async, is_generator } => NodeKind::FunctionDecl {
            ident: f(*ident),
            params: params.iter().map(|&c| f(c)).collect(),
            body: f(*body),
            is_async: *is_async,
            is_generator: *is_generator,
        },
        NodeKind::FunctionExpr { ident, params, body, is_async, is_generator } => NodeKind::FunctionExpr {
            ident: ident.map(&mut *f),
            params: params.iter().map(|&c| f(c)).collect(),
            body: f(*body),
            is_async: *is_async,
            is_generator: *is_generator,
        },
        NodeKind::Arrow { params, body, expr_body, is_async } => NodeKind::Arrow {
            params: params.iter().map(|&c| f(c)).collect(),
            body: f(*body),
            expr_body: *expr_body,
            is_async: *is_async,
        },
        NodeKind::Block { body } => NodeKind::Block { body: body.iter().map(|&c| f(c)).collect() },
        NodeKind::If { test, consequent, alternate } => NodeKind::If {
            test: f(*test),
            consequent: f(*consequent),
            alternate: alternate.map(&mut *f),
        },
        NodeKind::Switch { discriminant, cases } => NodeKind::Switch {
            discriminant: f(*discriminant),
            cases: cases.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::SwitchCase { test, consequent } => NodeKind::SwitchCase {
            test: test.map(&mut *f),
            consequent: consequent.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::For { init, test, update, body } => NodeKind::For {
            init: init.map(&mut *f),
            test: test.map(&mut *f),
            update: update.map(&mut *f),
            body: f(*body),
        },
        NodeKind::ForIn { left, right, body } => NodeKind::ForIn {
            left: f(*left),
            right: f(*right),
            body: f(*body),
        },
        NodeKind::While { test, body } => NodeKind::While { test: f(*test), body: f(*body) },
        NodeKind::DoWhile { body, test } => NodeKind::DoWhile { body: f(*body), test: f(*test) },
        NodeKind::Break { label } => NodeKind::Break { label: label.clone() },
        NodeKind::Continue { label } => NodeKind::Continue { label: label.clone() },
        NodeKind::Return { arg } => NodeKind::Return { arg: arg.map(&mut *f) },
        NodeKind::Throw { arg } => NodeKind::Throw { arg: f(*arg) },
        NodeKind::Try { block, handler, finalizer } => NodeKind::Try {
            block: f(*block),
            handler: handler.map(&mut *f),
            finalizer: finalizer.map(&mut *f),
        },
        NodeKind::Catch { param, body } => NodeKind::Catch {
            param: param.map(&mut *f),
            body: f(*body),
        },
        NodeKind::Labeled { label, body } => NodeKind::Labeled {
            label: label.clone(),
            body: f(*body),
        },
        NodeKind::With { object, body } => NodeKind::With { object: f(*object), body: f(*body) },
        NodeKind::ExprStmt { expr } => NodeKind::ExprStmt { expr: f(*expr) },
        NodeKind::Empty => NodeKind::Empty,
        NodeKind::Debugger => NodeKind::Debugger,
        NodeKind::ImportDecl { specifiers, source } => NodeKind::ImportDecl {
            specifiers: specifiers.iter().map(|&c| f(c)).collect(),
            source: source.clone(),
        },
        NodeKind::ImportSpec { binding, local } => NodeKind::ImportSpec {
            binding: binding.clone(),
            local: f(*local),
        },
        NodeKind::ExportNamed { specifiers } => NodeKind::ExportNamed {
            specifiers: specifiers.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::ExportSpec { local, exported } => NodeKind::ExportSpec {
            local: f(*local),
            exported: exported.clone(),
        },
        NodeKind::ExportDecl { decl } => NodeKind::ExportDecl { decl: f(*decl) },
        NodeKind::ExportDefault { expr } => NodeKind::ExportDefault { expr: f(*expr) },
        NodeKind::Ident { name } => NodeKind::Ident { name: name.clone() },
        NodeKind::Null => NodeKind::Null,
        NodeKind::Bool(b) => NodeKind::Bool(*b),
        NodeKind::Number(n) => NodeKind::Number(*n),
        NodeKind::Str(s) => NodeKind::Str(s.clone()),
        NodeKind::Regex { pattern, flags } => NodeKind::Regex {
            pattern: pattern.clone(),
            flags: flags.clone(),
        },
        NodeKind::This => NodeKind::This,
        NodeKind::Array { elements } => NodeKind::Array {
            elements: elements.iter().map(|e| e.map(&mut *f)).collect(),
        },
        NodeKind::Object { properties } => NodeKind::Object {
            properties: properties.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::Property { key, value, computed, shorthand } => NodeKind::Property {
            key: f(*key),
            value: f(*value),
            computed: *computed,
            shorthand: *shorthand,
        },
        NodeKind::Unary { op, arg } => NodeKind::Unary { op: *op, arg: f(*arg) },
        NodeKind::Binary { op, left, right } => NodeKind::Binary {
            op: *op,
            left: f(*left),
            right: f(*right),
        },
        NodeKind::Assign { op, left, right } => NodeKind::Assign {
            op: *op,
            left: f(*left),
            right: f(*right),
        },
        NodeKind::AssignPattern { left, right } => NodeKind::AssignPattern {
            left: f(*left),
            right: f(*right),
        },
        NodeKind::Update { op, prefix, arg } => NodeKind::Update {
            op: *op,
            prefix: *prefix,
            arg: f(*arg),
        },
        NodeKind::Cond { test, consequent, alternate } => NodeKind::Cond {
            test: f(*test),
            consequent: f(*consequent),
            alternate: f(*alternate),
        },
        NodeKind::Seq { exprs } => NodeKind::Seq { exprs: exprs.iter().map(|&c| f(c)).collect() },
        NodeKind::Member { object, property, computed } => NodeKind::Member {
            object: f(*object),
            property: f(*property),
            computed: *computed,
        },
        NodeKind::Call { callee, args } => NodeKind::Call {
            callee: f(*callee),
            args: args.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::New { callee, args } => NodeKind::New {
            callee: f(*callee),
            args: args.iter().map(|&c| f(c)).collect(),
        },
        NodeKind::Spread { arg } => NodeKind::Spread { arg: f(*arg) },
        NodeKind::Await { arg } => NodeKind::Await { arg: f(*arg) },
        NodeKind::Yield { arg, delegate } => NodeKind::Yield {
            arg: arg.map(&mut *f),
            delegate: *delegate,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_source_order() {
        let mut tree = Tree::new(Vec::new(), 0, Vec::new(), String::new());
        let id = tree.alloc(NodeKind::Ident { name: "x".into() }, Span::empty(0));
        let init = tree.alloc(NodeKind::Number(1.0), Span::empty(4));
        let decl = tree.alloc(NodeKind::VarDeclarator { id, init: Some(init) }, Span::new(0, 5));
        assert_eq!(tree.children(decl), vec![id, init]);
    }

    #[test]
    fn test_function_owns_scope_even_with_empty_body() {
        let mut tree = Tree::new(Vec::new(), 0, Vec::new(), String::new());
        let ident = tree.alloc(NodeKind::Ident { name: "f".into() }, Span::empty(9));
        let block = tree.alloc(NodeKind::Block { body: vec![] }, Span::new(12, 14));
        let func = tree.alloc(
            NodeKind::FunctionDecl {
                ident,
                params: vec![],
                body: block,
                is_async: false,
                is_generator: false,
            },
            Span::new(0, 14),
        );
        // The function's body slot is a single Block node, so it opens a
        // scope; the empty Block itself does not.
        assert!(tree.owns_scope(func));
        assert!(!tree.owns_scope(block));
    }

    #[test]
    fn test_import_subtree_remaps_ids() {
        let mut a = Tree::new(Vec::new(), 0, Vec::new(), String::new());
        // Fill the arena so ids cannot accidentally line up.
        for _ in 0..10 {
            a.alloc(NodeKind::Empty, Span::empty(0));
        }

        let mut b = Tree::new(Vec::new(), 0, Vec::new(), String::new());
        let arg = b.alloc(NodeKind::Ident { name: "y".into() }, Span::empty(0));
        let ret = b.alloc(NodeKind::Return { arg: Some(arg) }, Span::new(0, 9));

        let new_ret = a.import_subtree(&b, ret);
        match a.kind(new_ret) {
            NodeKind::Return { arg: Some(new_arg) } => {
                assert_eq!(a.ident_name(*new_arg), Some("y"));
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
