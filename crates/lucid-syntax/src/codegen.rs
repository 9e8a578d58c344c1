//! JavaScript code generator.
//!
//! Converts a tree back to source text. Attached comments are part of the
//! contract here: leading comments are emitted on their own lines before
//! the node they belong to (inline before expression-level nodes), and
//! trailing comments follow the statement terminator on the same line.

use crate::ast::*;
use crate::span::Span;

/// Code generation options.
#[derive(Debug, Clone, Default)]
pub struct CodegenOptions {
    /// Indent string (default: "  ").
    pub indent: Option<String>,
}

/// The code generator.
pub struct Codegen<'a> {
    /// The tree to generate code from.
    tree: &'a Tree,
    /// Output buffer.
    output: String,
    /// Current indentation level.
    indent_level: usize,
    /// Indent string.
    indent_str: String,
}

impl<'a> Codegen<'a> {
    /// Create a new code generator.
    pub fn new(tree: &'a Tree, options: CodegenOptions) -> Self {
        let indent_str = options.indent.unwrap_or_else(|| "  ".to_string());
        Self {
            tree,
            output: String::new(),
            indent_level: 0,
            indent_str,
        }
    }

    /// Generate source code for the whole program.
    pub fn generate(mut self) -> String {
        let body = match self.tree.kind(self.tree.root) {
            NodeKind::Program { body } => body.clone(),
            _ => vec![self.tree.root],
        };
        for (i, stmt) in body.iter().enumerate() {
            if i > 0 {
                self.emit_newline();
            }
            self.emit_stmt(*stmt);
        }
        self.output.push('\n');
        self.output
    }

    /// Generate source code for a single node (statement or expression).
    pub fn generate_node(mut self, id: NodeId) -> String {
        if self.tree.kind(id).is_statement() {
            self.emit_stmt(id);
        } else {
            self.emit_expr(id);
        }
        self.output.push('\n');
        self.output
    }

    // =========================================================================
    // Output Helpers
    // =========================================================================

    fn emit(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn emit_newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Leading comments at statement level, each on its own line.
    fn emit_leading_comments(&mut self, id: NodeId) {
        let comments = self.tree.node(id).leading_comments.clone();
        for comment in &comments {
            self.emit_comment(comment);
            self.emit_newline();
        }
    }

    /// Trailing comments after the statement terminator, on the same line.
    fn emit_trailing_comments(&mut self, id: NodeId) {
        let comments = self.tree.node(id).trailing_comments.clone();
        for comment in &comments {
            self.emit(" ");
            self.emit_comment(comment);
            // A line comment swallows the rest of the line, so anything
            // after it has to move down.
            if comment.kind == CommentKind::Line && comments.len() > 1 {
                self.emit_newline();
            }
        }
    }

    /// Leading comments attached to an expression-level node.
    fn emit_inline_leading_comments(&mut self, id: NodeId) {
        let comments = self.tree.node(id).leading_comments.clone();
        for comment in &comments {
            match comment.kind {
                CommentKind::Block => {
                    self.emit_comment(comment);
                    self.emit(" ");
                }
                CommentKind::Line => {
                    self.emit_comment(comment);
                    self.emit_newline();
                }
            }
        }
    }

    fn emit_comment(&mut self, comment: &Comment) {
        match comment.kind {
            CommentKind::Line => {
                self.emit("//");
                self.emit(&comment.text);
            }
            CommentKind::Block => {
                self.emit("/*");
                self.emit(&comment.text);
                self.emit("*/");
            }
        }
    }

    // =========================================================================
    // Statement Emission
    // =========================================================================

    fn emit_stmt(&mut self, id: NodeId) {
        self.emit_leading_comments(id);
        match self.tree.kind(id).clone() {
            NodeKind::VarDecl { kind, decls } => {
                self.emit(kind.as_str());
                self.emit(" ");
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_var_declarator(*decl);
                }
                self.emit(";");
            }
            NodeKind::FunctionDecl { ident, params, body, is_async, is_generator } => {
                self.emit_function_parts(Some(ident), &params, body, is_async, is_generator);
            }
            NodeKind::Block { body } => {
                self.emit_block_body(&body);
            }
            NodeKind::If { test, consequent, alternate } => {
                self.emit("if (");
                self.emit_expr(test);
                self.emit(") ");
                self.emit_stmt_bare(consequent);
                if let Some(alt) = alternate {
                    self.emit(" else ");
                    self.emit_stmt_bare(alt);
                }
            }
            NodeKind::Switch { discriminant, cases } => {
                self.emit("switch (");
                self.emit_expr(discriminant);
                self.emit(") {");
                self.indent();
                for case in cases {
                    self.emit_newline();
                    match self.tree.kind(case).clone() {
                        NodeKind::SwitchCase { test, consequent } => {
                            if let Some(test) = test {
                                self.emit("case ");
                                self.emit_expr(test);
                                self.emit(":");
                            } else {
                                self.emit("default:");
                            }
                            self.indent();
                            for stmt in consequent {
                                self.emit_newline();
                                self.emit_stmt(stmt);
                            }
                            self.dedent();
                        }
                        other => unreachable!("switch case expected: {other:?}"),
                    }
                }
                self.dedent();
                self.emit_newline();
                self.emit("}");
            }
            NodeKind::For { init, test, update, body } => {
                self.emit("for (");
                if let Some(init) = init {
                    if matches!(self.tree.kind(init), NodeKind::VarDecl { .. }) {
                        self.emit_for_init_var(init);
                    } else {
                        self.emit_expr(init);
                    }
                }
                self.emit("; ");
                if let Some(test) = test {
                    self.emit_expr(test);
                }
                self.emit("; ");
                if let Some(update) = update {
                    self.emit_expr(update);
                }
                self.emit(") ");
                self.emit_stmt_bare(body);
            }
            NodeKind::ForIn { left, right, body } => {
                self.emit("for (");
                if matches!(self.tree.kind(left), NodeKind::VarDecl { .. }) {
                    self.emit_for_init_var(left);
                } else {
                    self.emit_expr(left);
                }
                self.emit(" in ");
                self.emit_expr(right);
                self.emit(") ");
                self.emit_stmt_bare(body);
            }
            NodeKind::While { test, body } => {
                self.emit("while (");
                self.emit_expr(test);
                self.emit(") ");
                self.emit_stmt_bare(body);
            }
            NodeKind::DoWhile { body, test } => {
                self.emit("do ");
                self.emit_stmt_bare(body);
                self.emit(" while (");
                self.emit_expr(test);
                self.emit(");");
            }
            NodeKind::Break { label } => {
                self.emit("break");
                if let Some(label) = &label {
                    self.emit(" ");
                    self.emit(label);
                }
                self.emit(";");
            }
            NodeKind::Continue { label } => {
                self.emit("continue");
                if let Some(label) = &label {
                    self.emit(" ");
                    self.emit(label);
                }
                self.emit(";");
            }
            NodeKind::Return { arg } => {
                self.emit("return");
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr(arg);
                }
                self.emit(";");
            }
            NodeKind::Throw { arg } => {
                self.emit("throw ");
                self.emit_expr(arg);
                self.emit(";");
            }
            NodeKind::Try { block, handler, finalizer } => {
                self.emit("try ");
                self.emit_stmt_bare(block);
                if let Some(handler) = handler {
                    match self.tree.kind(handler).clone() {
                        NodeKind::Catch { param, body } => {
                            self.emit(" catch ");
                            if let Some(param) = param {
                                self.emit("(");
                                self.emit_expr(param);
                                self.emit(") ");
                            }
                            self.emit_stmt_bare(body);
                        }
                        other => unreachable!("catch clause expected: {other:?}"),
                    }
                }
                if let Some(finalizer) = finalizer {
                    self.emit(" finally ");
                    self.emit_stmt_bare(finalizer);
                }
            }
            NodeKind::Labeled { label, body } => {
                self.emit(&label);
                self.emit(": ");
                self.emit_stmt_bare(body);
            }
            NodeKind::With { object, body } => {
                self.emit("with (");
                self.emit_expr(object);
                self.emit(") ");
                self.emit_stmt_bare(body);
            }
            NodeKind::ExprStmt { expr } => {
                self.emit_expr(expr);
                self.emit(";");
            }
            NodeKind::Empty => {
                self.emit(";");
            }
            NodeKind::Debugger => {
                self.emit("debugger;");
            }
            NodeKind::ImportDecl { specifiers, source } => {
                self.emit_import(&specifiers, &source);
            }
            NodeKind::ExportNamed { specifiers } => {
                self.emit("export {");
                for (i, spec) in specifiers.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    match self.tree.kind(*spec).clone() {
                        NodeKind::ExportSpec { local, exported } => {
                            let local_name =
                                self.tree.ident_name(local).unwrap_or_default().to_string();
                            self.emit(&local_name);
                            if local_name != exported {
                                self.emit(" as ");
                                self.emit(&exported);
                            }
                        }
                        other => unreachable!("export specifier expected: {other:?}"),
                    }
                }
                self.emit("};");
            }
            NodeKind::ExportDecl { decl } => {
                self.emit("export ");
                self.emit_stmt_bare(decl);
            }
            NodeKind::ExportDefault { expr } => {
                self.emit("export default ");
                self.emit_expr(expr);
                self.emit(";");
            }
            other => {
                // A bare expression in statement position (generate_node).
                debug_assert!(!is_stmt_kind(&other), "unhandled statement kind: {other:?}");
                self.emit_expr(id);
                self.emit(";");
            }
        }
        self.emit_trailing_comments(id);
    }

    /// Emit a statement in an embedded position (`if (x) stmt`).
    fn emit_stmt_bare(&mut self, id: NodeId) {
        self.emit_stmt(id);
    }

    fn emit_var_declarator(&mut self, id: NodeId) {
        match self.tree.kind(id).clone() {
            NodeKind::VarDeclarator { id: target, init } => {
                self.emit_expr(target);
                if let Some(init) = init {
                    self.emit(" = ");
                    self.emit_expr_with_prec(init, 2);
                }
            }
            other => unreachable!("declarator expected: {other:?}"),
        }
    }

    /// A `var` declaration inside a for-head, without the semicolon.
    fn emit_for_init_var(&mut self, id: NodeId) {
        match self.tree.kind(id).clone() {
            NodeKind::VarDecl { kind, decls } => {
                self.emit(kind.as_str());
                self.emit(" ");
                for (i, decl) in decls.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_var_declarator(*decl);
                }
            }
            other => unreachable!("var declaration expected: {other:?}"),
        }
    }

    fn emit_block_body(&mut self, body: &[NodeId]) {
        if body.is_empty() {
            self.emit("{}");
            return;
        }
        self.emit("{");
        self.indent();
        for stmt in body {
            self.emit_newline();
            self.emit_stmt(*stmt);
        }
        self.dedent();
        self.emit_newline();
        self.emit("}");
    }

    fn emit_import(&mut self, specifiers: &[NodeId], source: &str) {
        self.emit("import ");
        let mut named_open = false;
        let mut first = true;
        for spec in specifiers {
            match self.tree.kind(*spec).clone() {
                NodeKind::ImportSpec { binding, local } => {
                    let local_name = self.tree.ident_name(local).unwrap_or_default().to_string();
                    match binding {
                        ImportBinding::Default => {
                            self.emit(&local_name);
                        }
                        ImportBinding::Namespace => {
                            if !first {
                                self.emit(", ");
                            }
                            self.emit("* as ");
                            self.emit(&local_name);
                        }
                        ImportBinding::Named(imported) => {
                            if !named_open {
                                if !first {
                                    self.emit(", ");
                                }
                                self.emit("{");
                                named_open = true;
                            } else {
                                self.emit(", ");
                            }
                            if imported == local_name {
                                self.emit(&local_name);
                            } else {
                                self.emit(&imported);
                                self.emit(" as ");
                                self.emit(&local_name);
                            }
                        }
                    }
                    first = false;
                }
                other => unreachable!("import specifier expected: {other:?}"),
            }
        }
        if named_open {
            self.emit("}");
        }
        if !specifiers.is_empty() {
            self.emit(" from ");
        }
        self.emit("\"");
        self.emit(source);
        self.emit("\";");
    }

    // =========================================================================
    // Expression Emission
    // =========================================================================

    fn emit_expr(&mut self, id: NodeId) {
        self.emit_expr_with_prec(id, 0);
    }

    fn emit_expr_with_prec(&mut self, id: NodeId, min_prec: u8) {
        match self.tree.kind(id).clone() {
            NodeKind::Null => self.emit("null"),
            NodeKind::Bool(b) => self.emit(if b { "true" } else { "false" }),
            NodeKind::Number(n) => {
                // Handle special float values
                if n.is_nan() {
                    self.emit("NaN");
                } else if n.is_infinite() {
                    if n.is_sign_positive() {
                        self.emit("Infinity");
                    } else {
                        self.emit("-Infinity");
                    }
                } else {
                    let formatted = format_number(n);
                    self.emit(&formatted);
                }
            }
            NodeKind::Str(s) => {
                self.emit("\"");
                let escaped = escape_string(&s);
                self.emit(&escaped);
                self.emit("\"");
            }
            NodeKind::Regex { pattern, flags } => {
                self.emit("/");
                self.emit(&pattern);
                self.emit("/");
                self.emit(&flags);
            }
            NodeKind::Ident { name } => self.emit(&name),
            NodeKind::This => self.emit("this"),
            NodeKind::Array { elements } => {
                self.emit("[");
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_expr_with_prec(*elem, 2);
                    }
                }
                self.emit("]");
            }
            NodeKind::Object { properties } => {
                self.emit("{");
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_object_property(*prop);
                }
                self.emit("}");
            }
            NodeKind::FunctionExpr { ident, params, body, is_async, is_generator } => {
                self.emit_inline_leading_comments(id);
                self.emit_function_parts(ident, &params, body, is_async, is_generator);
            }
            NodeKind::Arrow { params, body, expr_body, is_async } => {
                // Arrows have low precedence; may need parens
                if min_prec > 0 {
                    self.emit("(");
                }
                if is_async {
                    self.emit("async ");
                }
                self.emit("(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr(*param);
                }
                self.emit(") => ");
                if expr_body {
                    self.emit_expr_with_prec(body, 2);
                } else {
                    match self.tree.kind(body).clone() {
                        NodeKind::Block { body } => self.emit_block_body(&body),
                        other => unreachable!("arrow block expected: {other:?}"),
                    }
                }
                if min_prec > 0 {
                    self.emit(")");
                }
            }
            NodeKind::Unary { op, arg } => {
                let op_str = match op {
                    UnaryOp::Minus => "-",
                    UnaryOp::Plus => "+",
                    UnaryOp::Not => "!",
                    UnaryOp::BitNot => "~",
                    UnaryOp::Typeof => "typeof ",
                    UnaryOp::Void => "void ",
                    UnaryOp::Delete => "delete ",
                };
                self.emit(op_str);
                self.emit_expr_with_prec(arg, 15); // Unary precedence
            }
            NodeKind::Binary { op, left, right } => {
                let (prec, op_str) = binary_op_info(op);
                let needs_parens = prec < min_prec;
                if needs_parens {
                    self.emit("(");
                }
                self.emit_expr_with_prec(left, prec);
                self.emit(" ");
                self.emit(op_str);
                self.emit(" ");
                // Right side needs higher precedence for left-associative ops
                let right_prec = if is_right_associative(op) { prec } else { prec + 1 };
                self.emit_expr_with_prec(right, right_prec);
                if needs_parens {
                    self.emit(")");
                }
            }
            NodeKind::Assign { left, right, .. } | NodeKind::AssignPattern { left, right } => {
                let op = match self.tree.kind(id) {
                    NodeKind::Assign { op, .. } => *op,
                    _ => AssignOp::Assign,
                };
                if min_prec > 2 {
                    self.emit("(");
                }
                self.emit_expr_with_prec(left, 3);
                self.emit(" ");
                self.emit(assign_op_str(op));
                self.emit(" ");
                self.emit_expr_with_prec(right, 2);
                if min_prec > 2 {
                    self.emit(")");
                }
            }
            NodeKind::Update { op, prefix, arg } => {
                let op_str = match op {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                if prefix {
                    self.emit(op_str);
                    self.emit_expr_with_prec(arg, 15);
                } else {
                    self.emit_expr_with_prec(arg, 16);
                    self.emit(op_str);
                }
            }
            NodeKind::Cond { test, consequent, alternate } => {
                if min_prec > 3 {
                    self.emit("(");
                }
                self.emit_expr_with_prec(test, 4);
                self.emit(" ? ");
                self.emit_expr_with_prec(consequent, 2);
                self.emit(" : ");
                self.emit_expr_with_prec(alternate, 2);
                if min_prec > 3 {
                    self.emit(")");
                }
            }
            NodeKind::Seq { exprs } => {
                let needs_parens = min_prec > 0;
                if needs_parens {
                    self.emit("(");
                }
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr_with_prec(*expr, 1);
                }
                if needs_parens {
                    self.emit(")");
                }
            }
            NodeKind::Member { object, property, computed } => {
                self.emit_expr_with_prec(object, 18);
                if computed {
                    self.emit("[");
                    self.emit_expr(property);
                    self.emit("]");
                } else {
                    self.emit(".");
                    self.emit_expr(property);
                }
            }
            NodeKind::Call { callee, args } => {
                self.emit_expr_with_prec(callee, 18);
                self.emit("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr_with_prec(*arg, 2);
                }
                self.emit(")");
            }
            NodeKind::New { callee, args } => {
                self.emit("new ");
                self.emit_expr_with_prec(callee, 17);
                self.emit("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.emit(", ");
                    }
                    self.emit_expr_with_prec(*arg, 2);
                }
                self.emit(")");
            }
            NodeKind::Spread { arg } => {
                self.emit("...");
                self.emit_expr_with_prec(arg, 2);
            }
            NodeKind::Await { arg } => {
                self.emit("await ");
                self.emit_expr_with_prec(arg, 15);
            }
            NodeKind::Yield { arg, delegate } => {
                self.emit("yield");
                if delegate {
                    self.emit("*");
                }
                if let Some(arg) = arg {
                    self.emit(" ");
                    self.emit_expr_with_prec(arg, 2);
                }
            }
            other => unreachable!("expression expected: {other:?}"),
        }
    }

    fn emit_object_property(&mut self, id: NodeId) {
        match self.tree.kind(id).clone() {
            NodeKind::Property { key, value, computed, shorthand } => {
                if shorthand {
                    // Shorthand survives only while key and value still agree.
                    let key_name = self.tree.ident_name(key).map(str::to_string);
                    let value_name = self.tree.ident_name(value).map(str::to_string);
                    if key_name.is_some() && key_name == value_name {
                        self.emit(&value_name.unwrap_or_default());
                        return;
                    }
                }
                if computed {
                    self.emit("[");
                    self.emit_expr(key);
                    self.emit("]");
                } else {
                    self.emit_expr(key);
                }
                self.emit(": ");
                self.emit_expr_with_prec(value, 2);
            }
            other => unreachable!("object property expected: {other:?}"),
        }
    }

    fn emit_function_parts(
        &mut self,
        ident: Option<NodeId>,
        params: &[NodeId],
        body: NodeId,
        is_async: bool,
        is_generator: bool,
    ) {
        if is_async {
            self.emit("async ");
        }
        self.emit("function");
        if is_generator {
            self.emit("*");
        }
        if let Some(ident) = ident {
            self.emit(" ");
            self.emit_expr(ident);
        }
        self.emit("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.emit_expr(*param);
        }
        self.emit(") ");
        match self.tree.kind(body).clone() {
            NodeKind::Block { body } => self.emit_block_body(&body),
            other => unreachable!("function body block expected: {other:?}"),
        }
    }
}

/// Whether a node kind belongs in statement position.
fn is_stmt_kind(kind: &NodeKind) -> bool {
    matches!(
        kind,
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

// =============================================================================
// Helper Functions
// =============================================================================

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        let s = format!("{}", n);
        // Use shorter exponential notation if beneficial
        let exp = format!("{:e}", n);
        if exp.len() < s.len() {
            exp
        } else {
            s
        }
    }
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}

fn binary_op_info(op: BinaryOp) -> (u8, &'static str) {
    match op {
        BinaryOp::Or => (4, "||"),
        BinaryOp::And => (5, "&&"),
        BinaryOp::NullishCoalesce => (4, "??"),
        BinaryOp::BitOr => (6, "|"),
        BinaryOp::BitXor => (7, "^"),
        BinaryOp::BitAnd => (8, "&"),
        BinaryOp::Eq => (9, "=="),
        BinaryOp::NotEq => (9, "!="),
        BinaryOp::StrictEq => (9, "==="),
        BinaryOp::StrictNotEq => (9, "!=="),
        BinaryOp::Lt => (10, "<"),
        BinaryOp::LtEq => (10, "<="),
        BinaryOp::Gt => (10, ">"),
        BinaryOp::GtEq => (10, ">="),
        BinaryOp::In => (10, "in"),
        BinaryOp::Instanceof => (10, "instanceof"),
        BinaryOp::Shl => (11, "<<"),
        BinaryOp::Shr => (11, ">>"),
        BinaryOp::UShr => (11, ">>>"),
        BinaryOp::Add => (12, "+"),
        BinaryOp::Sub => (12, "-"),
        BinaryOp::Mul => (13, "*"),
        BinaryOp::Div => (13, "/"),
        BinaryOp::Mod => (13, "%"),
        BinaryOp::Pow => (14, "**"),
    }
}

fn is_right_associative(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Pow)
}

fn assign_op_str(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
        AssignOp::PowAssign => "**=",
        AssignOp::ShlAssign => "<<=",
        AssignOp::ShrAssign => ">>=",
        AssignOp::UShrAssign => ">>>=",
        AssignOp::BitOrAssign => "|=",
        AssignOp::BitXorAssign => "^=",
        AssignOp::BitAndAssign => "&=",
        AssignOp::AndAssign => "&&=",
        AssignOp::OrAssign => "||=",
        AssignOp::NullishAssign => "??=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Parser, ParserOptions};

    fn roundtrip(source: &str) -> String {
        let tree = Parser::new(source, ParserOptions::default())
            .parse()
            .unwrap();
        Codegen::new(&tree, CodegenOptions::default()).generate()
    }

    #[test]
    fn test_variable_declaration() {
        let output = roundtrip("let x = 1;");
        assert!(output.contains("let x = 1;"));
    }

    #[test]
    fn test_function_declaration() {
        let output = roundtrip("function foo(a, b) { return a + b; }");
        assert!(output.contains("function foo(a, b)"));
        assert!(output.contains("return a + b;"));
    }

    #[test]
    fn test_precedence_parens() {
        let output = roundtrip("var x = (a + b) * c;");
        assert!(output.contains("(a + b) * c"));
    }

    #[test]
    fn test_no_extra_parens() {
        let output = roundtrip("var x = a + b * c;");
        assert!(output.contains("a + b * c"));
        assert!(!output.contains("("));
    }

    #[test]
    fn test_nested_if_else() {
        let output = roundtrip("if (a) { b(); } else { c(); }");
        assert!(output.contains("if (a)"));
        assert!(output.contains("else"));
    }

    #[test]
    fn test_leading_comment_emission() {
        let mut tree = Parser::new("var x = 1;", ParserOptions::default())
            .parse()
            .unwrap();
        let stmt = match tree.kind(tree.root) {
            NodeKind::Program { body } => body[0],
            _ => unreachable!(),
        };
        tree.node_mut(stmt).leading_comments.push(Comment {
            kind: CommentKind::Line,
            text: " the answer".to_string(),
            span: Span::empty(0),
        });
        let output = Codegen::new(&tree, CodegenOptions::default()).generate();
        assert!(output.starts_with("// the answer\nvar x = 1;"));
    }

    #[test]
    fn test_trailing_comment_emission() {
        let mut tree = Parser::new("var x = 1;", ParserOptions::default())
            .parse()
            .unwrap();
        let stmt = match tree.kind(tree.root) {
            NodeKind::Program { body } => body[0],
            _ => unreachable!(),
        };
        tree.node_mut(stmt).trailing_comments.push(Comment {
            kind: CommentKind::Block,
            text: " note ".to_string(),
            span: Span::empty(0),
        });
        let output = Codegen::new(&tree, CodegenOptions::default()).generate();
        assert!(output.contains("var x = 1; /* note */"));
    }

    #[test]
    fn test_generate_single_function() {
        let tree = Parser::new("function f() { return 1; }\nvar x = 2;", ParserOptions::default())
            .parse()
            .unwrap();
        let func = match tree.kind(tree.root) {
            NodeKind::Program { body } => body[0],
            _ => unreachable!(),
        };
        let output = Codegen::new(&tree, CodegenOptions::default()).generate_node(func);
        assert!(output.contains("function f()"));
        assert!(!output.contains("var x"));
    }

    #[test]
    fn test_arrow_emission() {
        let output = roundtrip("var f = (a, b) => a + b;");
        assert!(output.contains("(a, b) => a + b"));
    }

    #[test]
    fn test_switch_emission() {
        let output = roundtrip("switch (x) { case 1: a(); break; default: b(); }");
        assert!(output.contains("switch (x)"));
        assert!(output.contains("case 1:"));
        assert!(output.contains("default:"));
    }

    #[test]
    fn test_object_literal() {
        let output = roundtrip("var o = {a: 1, \"b c\": 2};");
        assert!(output.contains("a: 1"));
        assert!(output.contains("\"b c\": 2"));
    }

    #[test]
    fn test_import_export_roundtrip() {
        let tree = Parser::new(
            "import def, { a as b } from \"m\";\nexport {b as c};\n",
            ParserOptions { module: true },
        )
        .parse()
        .unwrap();
        let output = Codegen::new(&tree, CodegenOptions::default()).generate();
        assert!(output.contains("import def, {a as b} from \"m\";"));
        assert!(output.contains("export {b as c};"));
    }
}
