//! Recursive descent parser for the supported JavaScript subset.
//!
//! Uses Pratt parsing for expressions and produces nodes directly into the
//! tree arena. Parameters and declarator targets are plain identifiers
//! (optionally with defaults); destructuring patterns, classes and template
//! literals are outside the supported subset and produce parse errors.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser configuration options.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Parse as ECMAScript module (enables import/export).
    pub module: bool,
}

/// Parse error.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

/// The parser.
pub struct Parser<'a> {
    /// The lexer.
    lexer: Lexer<'a>,
    /// Current token.
    current: Token,
    /// Parser options.
    options: ParserOptions,
    /// Source code (stored on the finished tree).
    source: &'a str,
    /// Node arena under construction.
    nodes: Vec<Node>,
    /// End offset of the most recently consumed token.
    last_end: u32,
    /// When false, `in` is not parsed as a binary operator (for-in init).
    allow_in: bool,
}

/// Saved parser position for backtracking (arrow-function lookahead).
struct Snapshot<'a> {
    lexer: Lexer<'a>,
    current: Token,
    nodes_len: usize,
    last_end: u32,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str, options: ParserOptions) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            options,
            source,
            nodes: Vec::new(),
            last_end: 0,
            allow_in: true,
        }
    }

    /// Parse the entire source into a tree.
    pub fn parse(mut self) -> Result<Tree, ParseError> {
        let start = self.current.span.start;
        let mut body = Vec::new();
        while !self.is_eof() {
            body.push(self.parse_stmt()?);
        }
        let span = Span::new(start, self.last_end);
        let root = self.alloc(NodeKind::Program { body }, span);
        let comments = self.lexer.take_comments();
        Ok(Tree::new(self.nodes, root, comments, self.source.to_string()))
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(kind, span));
        id
    }

    /// Get the current token kind.
    fn peek(&self) -> &TokenKind {
        &self.current.kind
    }

    /// Advance to the next token and return the previous.
    fn advance(&mut self) -> Token {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token());
        self.last_end = prev.span.end;
        prev
    }

    /// Check if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    /// Check if at end of file.
    fn is_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    /// Consume a token if it matches, otherwise return an error.
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                format!("Expected {:?}, got {:?}", kind, self.peek()),
                self.current.span,
            ))
        }
    }

    /// Consume a token if it matches, returning true if consumed.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a semicolon (with ASI support).
    fn expect_semicolon(&mut self) -> Result<(), ParseError> {
        // Automatic Semicolon Insertion (ASI) rules:
        // 1. Explicit semicolon
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        // 2. Before closing brace
        if self.check(&TokenKind::RBrace) {
            return Ok(());
        }
        // 3. At end of file
        if self.is_eof() {
            return Ok(());
        }
        // 4. After newline - the current token was preceded by a line terminator
        if self.current.had_newline_before {
            return Ok(());
        }
        Err(ParseError::new("Expected semicolon", self.current.span))
    }

    fn snapshot(&self) -> Snapshot<'a> {
        Snapshot {
            lexer: self.lexer.clone(),
            current: self.current.clone(),
            nodes_len: self.nodes.len(),
            last_end: self.last_end,
        }
    }

    fn restore(&mut self, snapshot: Snapshot<'a>) {
        self.lexer = snapshot.lexer;
        self.current = snapshot.current;
        self.nodes.truncate(snapshot.nodes_len);
        self.last_end = snapshot.last_end;
    }

    fn finish_span(&self, start: u32) -> Span {
        Span::new(start, self.last_end)
    }

    /// Consume an identifier token, also accepting the contextual keywords
    /// `from`, `as` and `async` in binding position.
    fn expect_ident_name(&mut self) -> Result<(String, Span), ParseError> {
        let span = self.current.span;
        let name = match self.peek() {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::From => "from".to_string(),
            TokenKind::As => "as".to_string(),
            TokenKind::Async => "async".to_string(),
            other => {
                return Err(ParseError::new(
                    format!("Expected identifier, got {other:?}"),
                    span,
                ))
            }
        };
        self.advance();
        Ok((name, span))
    }

    fn parse_ident(&mut self) -> Result<NodeId, ParseError> {
        let (name, span) = self.expect_ident_name()?;
        Ok(self.alloc(NodeKind::Ident { name }, span))
    }

    // =========================================================================
    // Statement Parsing
    // =========================================================================

    fn parse_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;

        // Labeled statement: `name: stmt`
        if let TokenKind::Identifier(name) = self.peek() {
            let label = name.clone();
            if matches!(self.lexer.peek().kind, TokenKind::Colon) {
                self.advance(); // label
                self.advance(); // :
                let body = self.parse_stmt()?;
                return Ok(self.alloc(NodeKind::Labeled { label, body }, self.finish_span(start)));
            }
        }

        // `async function foo() {}`
        if self.check(&TokenKind::Async) && matches!(self.lexer.peek().kind, TokenKind::Function) {
            self.advance(); // async
            return self.parse_function_decl(true);
        }

        match self.peek() {
            // Declarations
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_var_decl_body()?;
                self.expect_semicolon()?;
                Ok(decl)
            }
            TokenKind::Function => self.parse_function_decl(false),

            // Control flow
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Switch => self.parse_switch_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Throw => self.parse_throw_stmt(),
            TokenKind::Try => self.parse_try_stmt(),
            TokenKind::With => self.parse_with_stmt(),
            TokenKind::Debugger => {
                self.advance();
                self.expect_semicolon()?;
                Ok(self.alloc(NodeKind::Debugger, self.finish_span(start)))
            }

            // Block
            TokenKind::LBrace => self.parse_block(),

            // Empty statement
            TokenKind::Semicolon => {
                self.advance();
                Ok(self.alloc(NodeKind::Empty, self.finish_span(start)))
            }

            // Modules
            TokenKind::Import => self.parse_import_decl(),
            TokenKind::Export => self.parse_export_decl(),

            TokenKind::Class => Err(ParseError::new(
                "class declarations are not supported",
                self.current.span,
            )),

            // Expression statement
            _ => {
                let expr = self.parse_expr()?;
                self.expect_semicolon()?;
                Ok(self.alloc(NodeKind::ExprStmt { expr }, self.finish_span(start)))
            }
        }
    }

    /// Parse `var/let/const a = 1, b` without the trailing semicolon.
    fn parse_var_decl_body(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let kind = match self.peek() {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            TokenKind::Const => VarKind::Const,
            _ => unreachable!("caller checked for var/let/const"),
        };
        self.advance();

        let mut decls = Vec::new();
        loop {
            let decl_start = self.current.span.start;
            let id = self.parse_ident()?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.parse_assign_expr()?)
            } else {
                None
            };
            decls.push(self.alloc(
                NodeKind::VarDeclarator { id, init },
                self.finish_span(decl_start),
            ));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        Ok(self.alloc(NodeKind::VarDecl { kind, decls }, self.finish_span(start)))
    }

    fn parse_function_decl(&mut self, is_async: bool) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star);
        let ident = self.parse_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.alloc(
            NodeKind::FunctionDecl { ident, params, body, is_async, is_generator },
            self.finish_span(start),
        ))
    }

    /// Parse a parameter list: plain identifiers, optionally with defaults.
    fn parse_params(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let param_start = self.current.span.start;
            let ident = self.parse_ident()?;
            let param = if self.eat(&TokenKind::Eq) {
                let default = self.parse_assign_expr()?;
                self.alloc(
                    NodeKind::AssignPattern { left: ident, right: default },
                    self.finish_span(param_start),
                )
            } else {
                ident
            };
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            body.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc(NodeKind::Block { body }, self.finish_span(start)))
    }

    fn parse_if_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = self.parse_stmt()?;
        let alternate = if self.eat(&TokenKind::Else) {
            Some(self.parse_stmt()?)
        } else {
            None
        };
        Ok(self.alloc(
            NodeKind::If { test, consequent, alternate },
            self.finish_span(start),
        ))
    }

    fn parse_switch_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Switch)?;
        self.expect(&TokenKind::LParen)?;
        let discriminant = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::LBrace)?;

        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_eof() {
            let case_start = self.current.span.start;
            let test = if self.eat(&TokenKind::Case) {
                let test = self.parse_expr()?;
                Some(test)
            } else {
                self.expect(&TokenKind::Default)?;
                None
            };
            self.expect(&TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.peek(),
                TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
            ) {
                consequent.push(self.parse_stmt()?);
            }
            cases.push(self.alloc(
                NodeKind::SwitchCase { test, consequent },
                self.finish_span(case_start),
            ));
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc(
            NodeKind::Switch { discriminant, cases },
            self.finish_span(start),
        ))
    }

    fn parse_for_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if matches!(self.peek(), TokenKind::Var | TokenKind::Let | TokenKind::Const) {
            self.allow_in = false;
            let decl = self.parse_var_decl_body();
            self.allow_in = true;
            Some(decl?)
        } else {
            self.allow_in = false;
            let expr = self.parse_expr();
            self.allow_in = true;
            Some(expr?)
        };

        // for-in
        if let Some(left) = init {
            if self.eat(&TokenKind::In) {
                let right = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                let body = self.parse_stmt()?;
                return Ok(self.alloc(
                    NodeKind::ForIn { left, right, body },
                    self.finish_span(start),
                ));
            }
        }

        self.expect(&TokenKind::Semicolon)?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        Ok(self.alloc(
            NodeKind::For { init, test, update, body },
            self.finish_span(start),
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        Ok(self.alloc(NodeKind::While { test, body }, self.finish_span(start)))
    }

    fn parse_do_while_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Do)?;
        let body = self.parse_stmt()?;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect_semicolon()?;
        Ok(self.alloc(NodeKind::DoWhile { body, test }, self.finish_span(start)))
    }

    fn parse_break_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Break)?;
        let label = self.parse_optional_label();
        self.expect_semicolon()?;
        Ok(self.alloc(NodeKind::Break { label }, self.finish_span(start)))
    }

    fn parse_continue_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Continue)?;
        let label = self.parse_optional_label();
        self.expect_semicolon()?;
        Ok(self.alloc(NodeKind::Continue { label }, self.finish_span(start)))
    }

    /// A label after break/continue, unless separated by a newline (ASI).
    fn parse_optional_label(&mut self) -> Option<String> {
        if self.current.had_newline_before {
            return None;
        }
        if let TokenKind::Identifier(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Some(name)
        } else {
            None
        }
    }

    fn parse_return_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Return)?;
        let arg = if self.check(&TokenKind::Semicolon)
            || self.check(&TokenKind::RBrace)
            || self.is_eof()
            || self.current.had_newline_before
        {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_semicolon()?;
        Ok(self.alloc(NodeKind::Return { arg }, self.finish_span(start)))
    }

    fn parse_throw_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Throw)?;
        let arg = self.parse_expr()?;
        self.expect_semicolon()?;
        Ok(self.alloc(NodeKind::Throw { arg }, self.finish_span(start)))
    }

    fn parse_try_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Try)?;
        let block = self.parse_block()?;

        let handler = if self.check(&TokenKind::Catch) {
            let catch_start = self.current.span.start;
            self.advance();
            let param = if self.eat(&TokenKind::LParen) {
                let param = self.parse_ident()?;
                self.expect(&TokenKind::RParen)?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(self.alloc(NodeKind::Catch { param, body }, self.finish_span(catch_start)))
        } else {
            None
        };

        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::new(
                "try statement requires catch or finally",
                self.current.span,
            ));
        }

        Ok(self.alloc(
            NodeKind::Try { block, handler, finalizer },
            self.finish_span(start),
        ))
    }

    fn parse_with_stmt(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::With)?;
        self.expect(&TokenKind::LParen)?;
        let object = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_stmt()?;
        Ok(self.alloc(NodeKind::With { object, body }, self.finish_span(start)))
    }

    // =========================================================================
    // Module Parsing
    // =========================================================================

    fn require_module(&self) -> Result<(), ParseError> {
        if self.options.module {
            Ok(())
        } else {
            Err(ParseError::new(
                "import/export is only allowed in modules",
                self.current.span,
            ))
        }
    }

    fn parse_import_decl(&mut self) -> Result<NodeId, ParseError> {
        self.require_module()?;
        let start = self.current.span.start;
        self.expect(&TokenKind::Import)?;

        // Side-effect import: `import "mod";`
        if let TokenKind::String(source) = self.peek() {
            let source = source.clone();
            self.advance();
            self.expect_semicolon()?;
            return Ok(self.alloc(
                NodeKind::ImportDecl { specifiers: Vec::new(), source },
                self.finish_span(start),
            ));
        }

        let mut specifiers = Vec::new();

        // Default import binding
        if matches!(self.peek(), TokenKind::Identifier(_)) {
            let spec_start = self.current.span.start;
            let local = self.parse_ident()?;
            specifiers.push(self.alloc(
                NodeKind::ImportSpec { binding: ImportBinding::Default, local },
                self.finish_span(spec_start),
            ));
            if self.eat(&TokenKind::Comma) {
                // fall through to * or { ... }
            }
        }

        if self.eat(&TokenKind::Star) {
            let spec_start = self.current.span.start;
            self.expect(&TokenKind::As)?;
            let local = self.parse_ident()?;
            specifiers.push(self.alloc(
                NodeKind::ImportSpec { binding: ImportBinding::Namespace, local },
                self.finish_span(spec_start),
            ));
        } else if self.eat(&TokenKind::LBrace) {
            while !self.check(&TokenKind::RBrace) {
                let spec_start = self.current.span.start;
                let (imported, imported_span) = self.expect_ident_name()?;
                let local = if self.eat(&TokenKind::As) {
                    self.parse_ident()?
                } else {
                    self.alloc(NodeKind::Ident { name: imported.clone() }, imported_span)
                };
                specifiers.push(self.alloc(
                    NodeKind::ImportSpec { binding: ImportBinding::Named(imported), local },
                    self.finish_span(spec_start),
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;
        }

        self.expect(&TokenKind::From)?;
        let source = match self.peek() {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => {
                return Err(ParseError::new(
                    "Expected module specifier string",
                    self.current.span,
                ))
            }
        };
        self.expect_semicolon()?;
        Ok(self.alloc(
            NodeKind::ImportDecl { specifiers, source },
            self.finish_span(start),
        ))
    }

    fn parse_export_decl(&mut self) -> Result<NodeId, ParseError> {
        self.require_module()?;
        let start = self.current.span.start;
        self.expect(&TokenKind::Export)?;

        if self.eat(&TokenKind::Default) {
            let expr = if self.check(&TokenKind::Function) {
                self.parse_function_expr(false)?
            } else if self.check(&TokenKind::Async)
                && matches!(self.lexer.peek().kind, TokenKind::Function)
            {
                self.advance();
                self.parse_function_expr(true)?
            } else {
                let expr = self.parse_assign_expr()?;
                self.expect_semicolon()?;
                expr
            };
            return Ok(self.alloc(NodeKind::ExportDefault { expr }, self.finish_span(start)));
        }

        if self.eat(&TokenKind::LBrace) {
            let mut specifiers = Vec::new();
            while !self.check(&TokenKind::RBrace) {
                let spec_start = self.current.span.start;
                let local = self.parse_ident()?;
                let exported = if self.eat(&TokenKind::As) {
                    self.expect_ident_name()?.0
                } else {
                    // Unwrap is fine: parse_ident only allocates Ident nodes.
                    self.nodes[local as usize]
                        .kind
                        .clone()
                        .into_ident_name()
                        .unwrap_or_default()
                };
                specifiers.push(self.alloc(
                    NodeKind::ExportSpec { local, exported },
                    self.finish_span(spec_start),
                ));
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RBrace)?;
            if self.check(&TokenKind::From) {
                return Err(ParseError::new(
                    "re-exports are not supported",
                    self.current.span,
                ));
            }
            self.expect_semicolon()?;
            return Ok(self.alloc(NodeKind::ExportNamed { specifiers }, self.finish_span(start)));
        }

        match self.peek() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const | TokenKind::Function | TokenKind::Async => {
                let decl = self.parse_stmt()?;
                Ok(self.alloc(NodeKind::ExportDecl { decl }, self.finish_span(start)))
            }
            other => Err(ParseError::new(
                format!("Unsupported export form: {other:?}"),
                self.current.span,
            )),
        }
    }

    // =========================================================================
    // Expression Parsing
    // =========================================================================

    /// Parse a full expression, including comma sequences.
    fn parse_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let first = self.parse_assign_expr()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_assign_expr()?);
        }
        Ok(self.alloc(NodeKind::Seq { exprs }, self.finish_span(start)))
    }

    /// Parse an assignment-level expression (also arrows and yield).
    fn parse_assign_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;

        if self.check(&TokenKind::Yield) {
            return self.parse_yield_expr();
        }

        // Arrow with a single unparenthesized parameter: `x => ...`
        if matches!(self.peek(), TokenKind::Identifier(_))
            && matches!(self.lexer.peek().kind, TokenKind::Arrow)
        {
            let param = self.parse_ident()?;
            self.expect(&TokenKind::Arrow)?;
            return self.parse_arrow_body(start, vec![param], false);
        }

        // Arrow with a parenthesized parameter list: `(a, b = 1) => ...`
        if self.check(&TokenKind::LParen) {
            if let Some(arrow) = self.try_parse_paren_arrow(start)? {
                return Ok(arrow);
            }
        }

        let left = self.parse_cond_expr()?;

        if self.peek().is_assignment() {
            let op = assign_op_from_token(self.peek());
            self.advance();
            let right = self.parse_assign_expr()?;
            return Ok(self.alloc(
                NodeKind::Assign { op, left, right },
                self.finish_span(start),
            ));
        }

        Ok(left)
    }

    fn parse_yield_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Yield)?;
        let delegate = self.eat(&TokenKind::Star);
        let arg = if !self.current.had_newline_before && self.peek().can_start_expr() {
            Some(self.parse_assign_expr()?)
        } else {
            None
        };
        Ok(self.alloc(NodeKind::Yield { arg, delegate }, self.finish_span(start)))
    }

    /// Attempt `( params ) => body`; restores the parser and returns None if
    /// the parenthesized form is not actually an arrow function.
    fn try_parse_paren_arrow(&mut self, start: u32) -> Result<Option<NodeId>, ParseError> {
        let snapshot = self.snapshot();
        match self.parse_paren_arrow(start) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                self.restore(snapshot);
                Ok(None)
            }
        }
    }

    fn parse_paren_arrow(&mut self, start: u32) -> Result<NodeId, ParseError> {
        let params = self.parse_params()?;
        self.expect(&TokenKind::Arrow)?;
        self.parse_arrow_body(start, params, false)
    }

    fn parse_arrow_body(
        &mut self,
        start: u32,
        params: Vec<NodeId>,
        is_async: bool,
    ) -> Result<NodeId, ParseError> {
        let (body, expr_body) = if self.check(&TokenKind::LBrace) {
            (self.parse_block()?, false)
        } else {
            (self.parse_assign_expr()?, true)
        };
        Ok(self.alloc(
            NodeKind::Arrow { params, body, expr_body, is_async },
            self.finish_span(start),
        ))
    }

    fn parse_cond_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let test = self.parse_binary_expr(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assign_expr()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_assign_expr()?;
        Ok(self.alloc(
            NodeKind::Cond { test, consequent, alternate },
            self.finish_span(start),
        ))
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let mut left = self.parse_unary_expr()?;

        loop {
            let Some(prec) = self.peek().binary_precedence() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            if matches!(self.peek(), TokenKind::In) && !self.allow_in {
                break;
            }
            let op = binary_op_from_token(self.peek());
            let right_assoc = self.peek().is_right_associative();
            self.advance();
            let right = self.parse_binary_expr(if right_assoc { prec } else { prec + 1 })?;
            left = self.alloc(
                NodeKind::Binary { op, left, right },
                self.finish_span(start),
            );
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;

        let unary_op = match self.peek() {
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Typeof => Some(UnaryOp::Typeof),
            TokenKind::Void => Some(UnaryOp::Void),
            TokenKind::Delete => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = unary_op {
            self.advance();
            let arg = self.parse_unary_expr()?;
            return Ok(self.alloc(NodeKind::Unary { op, arg }, self.finish_span(start)));
        }

        match self.peek() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if matches!(self.peek(), TokenKind::PlusPlus) {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                self.advance();
                let arg = self.parse_unary_expr()?;
                Ok(self.alloc(
                    NodeKind::Update { op, prefix: true, arg },
                    self.finish_span(start),
                ))
            }
            TokenKind::Await => {
                self.advance();
                let arg = self.parse_unary_expr()?;
                Ok(self.alloc(NodeKind::Await { arg }, self.finish_span(start)))
            }
            _ => self.parse_postfix_expr(),
        }
    }

    fn parse_postfix_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let expr = self.parse_lhs_expr()?;

        // Postfix ++/-- binds only without an intervening newline (ASI).
        if matches!(self.peek(), TokenKind::PlusPlus | TokenKind::MinusMinus)
            && !self.current.had_newline_before
        {
            let op = if matches!(self.peek(), TokenKind::PlusPlus) {
                UpdateOp::Increment
            } else {
                UpdateOp::Decrement
            };
            self.advance();
            return Ok(self.alloc(
                NodeKind::Update { op, prefix: false, arg: expr },
                self.finish_span(start),
            ));
        }

        Ok(expr)
    }

    fn parse_lhs_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let primary = if self.check(&TokenKind::New) {
            self.parse_new_expr()?
        } else {
            self.parse_primary_expr()?
        };
        self.parse_postfix_chain(primary, start)
    }

    fn parse_new_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::New)?;
        let callee_start = self.current.span.start;
        let mut callee = if self.check(&TokenKind::New) {
            self.parse_new_expr()?
        } else {
            self.parse_primary_expr()?
        };
        // Member accesses bind to the callee; the first argument list
        // belongs to `new`.
        loop {
            if self.eat(&TokenKind::Dot) {
                let property = self.parse_property_name()?;
                callee = self.alloc(
                    NodeKind::Member { object: callee, property, computed: false },
                    self.finish_span(callee_start),
                );
            } else if self.eat(&TokenKind::LBracket) {
                let property = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                callee = self.alloc(
                    NodeKind::Member { object: callee, property, computed: true },
                    self.finish_span(callee_start),
                );
            } else {
                break;
            }
        }
        let args = if self.check(&TokenKind::LParen) {
            self.parse_call_args()?
        } else {
            Vec::new()
        };
        Ok(self.alloc(NodeKind::New { callee, args }, self.finish_span(start)))
    }

    fn parse_postfix_chain(&mut self, mut expr: NodeId, start: u32) -> Result<NodeId, ParseError> {
        loop {
            if self.eat(&TokenKind::Dot) {
                let property = self.parse_property_name()?;
                expr = self.alloc(
                    NodeKind::Member { object: expr, property, computed: false },
                    self.finish_span(start),
                );
            } else if self.eat(&TokenKind::LBracket) {
                let property = self.parse_expr()?;
                self.expect(&TokenKind::RBracket)?;
                expr = self.alloc(
                    NodeKind::Member { object: expr, property, computed: true },
                    self.finish_span(start),
                );
            } else if self.check(&TokenKind::LParen) {
                let args = self.parse_call_args()?;
                expr = self.alloc(NodeKind::Call { callee: expr, args }, self.finish_span(start));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// A property name after `.` — keywords are allowed (`promise.catch`).
    fn parse_property_name(&mut self) -> Result<NodeId, ParseError> {
        let span = self.current.span;
        let name = match self.peek() {
            TokenKind::Identifier(name) => name.clone(),
            other => match keyword_text(other) {
                Some(text) => text.to_string(),
                None => {
                    return Err(ParseError::new(
                        format!("Expected property name, got {other:?}"),
                        span,
                    ))
                }
            },
        };
        self.advance();
        Ok(self.alloc(NodeKind::Ident { name }, span))
    }

    fn parse_call_args(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            if self.check(&TokenKind::Spread) {
                let spread_start = self.current.span.start;
                self.advance();
                let arg = self.parse_assign_expr()?;
                args.push(self.alloc(NodeKind::Spread { arg }, self.finish_span(spread_start)));
            } else {
                args.push(self.parse_assign_expr()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(args)
    }

    fn parse_function_expr(&mut self, is_async: bool) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        self.expect(&TokenKind::Function)?;
        let is_generator = self.eat(&TokenKind::Star);
        let ident = if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.parse_ident()?)
        } else {
            None
        };
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        Ok(self.alloc(
            NodeKind::FunctionExpr { ident, params, body, is_async, is_generator },
            self.finish_span(start),
        ))
    }

    fn parse_primary_expr(&mut self) -> Result<NodeId, ParseError> {
        let start = self.current.span.start;
        let span = self.current.span;

        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(self.alloc(NodeKind::Number(n), span))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(self.alloc(NodeKind::Str(s), span))
            }
            TokenKind::Regex { pattern, flags } => {
                self.advance();
                Ok(self.alloc(NodeKind::Regex { pattern, flags }, span))
            }
            TokenKind::True => {
                self.advance();
                Ok(self.alloc(NodeKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                Ok(self.alloc(NodeKind::Bool(false), span))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.alloc(NodeKind::Null, span))
            }
            TokenKind::This => {
                self.advance();
                Ok(self.alloc(NodeKind::This, span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(self.alloc(NodeKind::Ident { name }, span))
            }
            // Contextual keywords usable as plain identifiers
            TokenKind::From | TokenKind::As => self.parse_ident(),
            TokenKind::Async => {
                if matches!(self.lexer.peek().kind, TokenKind::Function) {
                    self.advance();
                    self.parse_function_expr(true)
                } else {
                    self.parse_ident()
                }
            }
            TokenKind::Function => self.parse_function_expr(false),
            TokenKind::LParen => {
                self.advance();
                let saved = self.allow_in;
                self.allow_in = true;
                let expr = self.parse_expr();
                self.allow_in = saved;
                let expr = expr?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array_literal(start),
            TokenKind::LBrace => self.parse_object_literal(start),
            TokenKind::Class => Err(ParseError::new(
                "class expressions are not supported",
                span,
            )),
            other => Err(ParseError::new(
                format!("Unexpected token in expression: {other:?}"),
                span,
            )),
        }
    }

    fn parse_array_literal(&mut self, start: u32) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        loop {
            if self.check(&TokenKind::RBracket) {
                break;
            }
            if self.eat(&TokenKind::Comma) {
                // Elision
                elements.push(None);
                continue;
            }
            if self.check(&TokenKind::Spread) {
                let spread_start = self.current.span.start;
                self.advance();
                let arg = self.parse_assign_expr()?;
                elements.push(Some(
                    self.alloc(NodeKind::Spread { arg }, self.finish_span(spread_start)),
                ));
            } else {
                elements.push(Some(self.parse_assign_expr()?));
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(self.alloc(NodeKind::Array { elements }, self.finish_span(start)))
    }

    fn parse_object_literal(&mut self, start: u32) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut properties = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let prop_start = self.current.span.start;
            let key_span = self.current.span;

            let (key, computed, key_name) = match self.peek().clone() {
                TokenKind::Identifier(name) => {
                    self.advance();
                    let key = self.alloc(NodeKind::Ident { name: name.clone() }, key_span);
                    (key, false, Some(name))
                }
                TokenKind::String(s) => {
                    self.advance();
                    (self.alloc(NodeKind::Str(s), key_span), false, None)
                }
                TokenKind::Number(n) => {
                    self.advance();
                    (self.alloc(NodeKind::Number(n), key_span), false, None)
                }
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_assign_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    (key, true, None)
                }
                other => match keyword_text(&other) {
                    Some(text) => {
                        self.advance();
                        let key = self.alloc(NodeKind::Ident { name: text.to_string() }, key_span);
                        (key, false, None)
                    }
                    None => {
                        return Err(ParseError::new(
                            format!("Expected property key, got {other:?}"),
                            key_span,
                        ))
                    }
                },
            };

            let (value, shorthand) = if self.eat(&TokenKind::Colon) {
                (self.parse_assign_expr()?, false)
            } else if let Some(name) = key_name {
                // Shorthand property: `{ foo }`
                let value = self.alloc(NodeKind::Ident { name }, key_span);
                (value, true)
            } else {
                return Err(ParseError::new(
                    "Expected ':' after property key",
                    self.current.span,
                ));
            };

            properties.push(self.alloc(
                NodeKind::Property { key, value, computed, shorthand },
                self.finish_span(prop_start),
            ));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc(NodeKind::Object { properties }, self.finish_span(start)))
    }
}

impl NodeKind {
    /// Extract the name of an `Ident` kind, consuming it.
    fn into_ident_name(self) -> Option<String> {
        match self {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }
}

fn binary_op_from_token(kind: &TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::StarStar => BinaryOp::Pow,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::BangEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::LtLt => BinaryOp::Shl,
        TokenKind::GtGt => BinaryOp::Shr,
        TokenKind::GtGtGt => BinaryOp::UShr,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        TokenKind::QuestionQuestion => BinaryOp::NullishCoalesce,
        TokenKind::In => BinaryOp::In,
        TokenKind::Instanceof => BinaryOp::Instanceof,
        other => unreachable!("not a binary operator: {other:?}"),
    }
}

fn assign_op_from_token(kind: &TokenKind) -> AssignOp {
    match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        TokenKind::PercentEq => AssignOp::ModAssign,
        TokenKind::StarStarEq => AssignOp::PowAssign,
        TokenKind::LtLtEq => AssignOp::ShlAssign,
        TokenKind::GtGtEq => AssignOp::ShrAssign,
        TokenKind::GtGtGtEq => AssignOp::UShrAssign,
        TokenKind::PipeEq => AssignOp::BitOrAssign,
        TokenKind::CaretEq => AssignOp::BitXorAssign,
        TokenKind::AmpEq => AssignOp::BitAndAssign,
        TokenKind::AmpAmpEq => AssignOp::AndAssign,
        TokenKind::PipePipeEq => AssignOp::OrAssign,
        TokenKind::QuestionQuestionEq => AssignOp::NullishAssign,
        other => unreachable!("not an assignment operator: {other:?}"),
    }
}

/// Keyword token text, for keywords that can appear as property names.
fn keyword_text(kind: &TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Var => "var",
        TokenKind::Let => "let",
        TokenKind::Const => "const",
        TokenKind::Function => "function",
        TokenKind::Class => "class",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::Switch => "switch",
        TokenKind::Case => "case",
        TokenKind::Default => "default",
        TokenKind::For => "for",
        TokenKind::While => "while",
        TokenKind::Do => "do",
        TokenKind::Break => "break",
        TokenKind::Continue => "continue",
        TokenKind::Return => "return",
        TokenKind::Try => "try",
        TokenKind::Catch => "catch",
        TokenKind::Finally => "finally",
        TokenKind::Throw => "throw",
        TokenKind::New => "new",
        TokenKind::Delete => "delete",
        TokenKind::Typeof => "typeof",
        TokenKind::Void => "void",
        TokenKind::In => "in",
        TokenKind::Instanceof => "instanceof",
        TokenKind::This => "this",
        TokenKind::Null => "null",
        TokenKind::True => "true",
        TokenKind::False => "false",
        TokenKind::Import => "import",
        TokenKind::Export => "export",
        TokenKind::From => "from",
        TokenKind::As => "as",
        TokenKind::Async => "async",
        TokenKind::Await => "await",
        TokenKind::Yield => "yield",
        TokenKind::With => "with",
        TokenKind::Debugger => "debugger",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Tree {
        Parser::new(source, ParserOptions::default())
            .parse()
            .expect("source should parse")
    }

    fn program_body(tree: &Tree) -> Vec<NodeId> {
        match tree.kind(tree.root) {
            NodeKind::Program { body } => body.clone(),
            other => panic!("root is not a program: {other:?}"),
        }
    }

    #[test]
    fn test_parse_var_decl() {
        let tree = parse_ok("var a = 1, b;");
        let body = program_body(&tree);
        assert_eq!(body.len(), 1);
        match tree.kind(body[0]) {
            NodeKind::VarDecl { kind: VarKind::Var, decls } => assert_eq!(decls.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_function_decl() {
        let tree = parse_ok("function add(a, b) { return a + b; }");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::FunctionDecl { ident, params, .. } => {
                assert_eq!(tree.ident_name(*ident), Some("add"));
                assert_eq!(params.len(), 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_param_default() {
        let tree = parse_ok("function f(a = 1) {}");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::FunctionDecl { params, .. } => {
                assert!(matches!(tree.kind(params[0]), NodeKind::AssignPattern { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_call_and_member() {
        let tree = parse_ok("console.log(x[0]);");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::ExprStmt { expr } => match tree.kind(*expr) {
                NodeKind::Call { callee, args } => {
                    assert!(matches!(tree.kind(*callee), NodeKind::Member { computed: false, .. }));
                    assert_eq!(args.len(), 1);
                    assert!(matches!(tree.kind(args[0]), NodeKind::Member { computed: true, .. }));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_arrow_single_param() {
        let tree = parse_ok("var f = x => x * 2;");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::VarDecl { decls, .. } => match tree.kind(decls[0]) {
                NodeKind::VarDeclarator { init: Some(init), .. } => {
                    assert!(matches!(
                        tree.kind(*init),
                        NodeKind::Arrow { expr_body: true, .. }
                    ));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_arrow_paren_params() {
        let tree = parse_ok("var f = (a, b) => { return a + b; };");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::VarDecl { decls, .. } => match tree.kind(decls[0]) {
                NodeKind::VarDeclarator { init: Some(init), .. } => match tree.kind(*init) {
                    NodeKind::Arrow { params, expr_body: false, .. } => assert_eq!(params.len(), 2),
                    other => panic!("unexpected: {other:?}"),
                },
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_paren_expr_is_not_arrow() {
        let tree = parse_ok("var x = (a + b) * 2;");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::VarDecl { decls, .. } => match tree.kind(decls[0]) {
                NodeKind::VarDeclarator { init: Some(init), .. } => {
                    assert!(matches!(
                        tree.kind(*init),
                        NodeKind::Binary { op: BinaryOp::Mul, .. }
                    ));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_for_in() {
        let tree = parse_ok("for (var k in obj) { use(k); }");
        let body = program_body(&tree);
        assert!(matches!(tree.kind(body[0]), NodeKind::ForIn { .. }));
    }

    #[test]
    fn test_parse_labeled_statement() {
        let tree = parse_ok("outer: for (;;) { break outer; }");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::Labeled { label, .. } => assert_eq!(label, "outer"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_keyword_property() {
        let tree = parse_ok("p.catch(handle);");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::ExprStmt { expr } => match tree.kind(*expr) {
                NodeKind::Call { callee, .. } => match tree.kind(*callee) {
                    NodeKind::Member { property, .. } => {
                        assert_eq!(tree.ident_name(*property), Some("catch"));
                    }
                    other => panic!("unexpected: {other:?}"),
                },
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_module_mode() {
        let err = Parser::new("import x from \"m\";", ParserOptions::default())
            .parse()
            .unwrap_err();
        assert!(err.message.contains("module"));
    }

    #[test]
    fn test_parse_module_imports() {
        let tree = Parser::new(
            "import def, { a, b as c } from \"m\";\nexport function f() {}\n",
            ParserOptions { module: true },
        )
        .parse()
        .expect("module should parse");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::ImportDecl { specifiers, source } => {
                assert_eq!(specifiers.len(), 3);
                assert_eq!(source, "m");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(tree.kind(body[1]), NodeKind::ExportDecl { .. }));
    }

    #[test]
    fn test_asi_newline() {
        // No explicit semicolons; ASI should split the statements.
        let tree = parse_ok("var a = 1\nvar b = 2\n");
        assert_eq!(program_body(&tree).len(), 2);
    }

    #[test]
    fn test_class_is_rejected() {
        let err = Parser::new("class A {}", ParserOptions::default())
            .parse()
            .unwrap_err();
        assert!(err.message.contains("not supported"));
    }

    #[test]
    fn test_comments_survive_parse() {
        let tree = parse_ok("// top\nvar a = 1; /* mid */ var b = 2;");
        assert_eq!(tree.comments.len(), 2);
    }

    #[test]
    fn test_new_expression() {
        let tree = parse_ok("var d = new Date();");
        let body = program_body(&tree);
        match tree.kind(body[0]) {
            NodeKind::VarDecl { decls, .. } => match tree.kind(decls[0]) {
                NodeKind::VarDeclarator { init: Some(init), .. } => {
                    assert!(matches!(tree.kind(*init), NodeKind::New { .. }));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }
}
