//! lucid-syntax: JavaScript parsing and printing for the lucid renamer.
//!
//! # Design Principles
//!
//! 1. **One uniform node type**
//!    - Statements, expressions and bindings all live in a single
//!      [`NodeKind`], so one generic scope-tracking walker can drive every
//!      rewriting pass.
//!
//! 2. **Arena allocation**
//!    - Nodes are stored in one contiguous vector inside [`Tree`] and
//!      referenced by [`NodeId`] indices, never pointers. Passes mutate
//!      nodes in place while holding worklists of ids.
//!
//! 3. **Comments are data**
//!    - The lexer collects every comment with its span instead of skipping
//!      it; the codegen prints attached comments back out at their nodes.
//!
//! # Example
//!
//! ```ignore
//! use lucid_syntax::{parse, Codegen, CodegenOptions, ParserOptions};
//!
//! let tree = parse("function f() { return 1; }", ParserOptions::default())?;
//! let output = Codegen::new(&tree, CodegenOptions::default()).generate();
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]

mod ast;
mod codegen;
mod lexer;
mod parser;
mod span;
mod token;

// Re-exports
pub use ast::*;
pub use codegen::{Codegen, CodegenOptions};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser, ParserOptions};
pub use span::{LineIndex, Span};
pub use token::{Token, TokenKind};

/// Parse JavaScript source code into a tree.
pub fn parse(source: &str, options: ParserOptions) -> Result<Tree, ParseError> {
    Parser::new(source, options).parse()
}
