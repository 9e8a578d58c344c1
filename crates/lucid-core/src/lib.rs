//! lucid-core: scope-aware renaming and annotation passes.
//!
//! Takes the tree produced by `lucid-syntax` and rewrites it so that every
//! function carries a unique, stable and optionally AI-suggested name, a
//! cross-reference summary of its callers, and optionally AI-generated
//! descriptive comments. The program's behavior is never changed — only
//! identifiers, comments, and (for anonymous functions) whether a name
//! exists at all.
//!
//! # Pass sequence
//!
//! 1. [`comments::attach_comments`] — map free-floating comments onto nodes
//! 2. [`inventory::Inventory::collect`] — every name in use, for collision
//!    avoidance
//! 3. [`uniquify::uniquify`] — shadowing-aware unique function names
//! 4. [`normalize::normalize`] — name anonymous functions, rewrite arrows
//! 5. [`xref::build_call_graph`] — who calls whom, and where
//! 6. [`rename::rename_functions`] — final (possibly AI-suggested) names
//! 7. [`annotate::annotate`] — caller summaries and descriptive comments
//!
//! [`pipeline::process`] runs them all in order. Every tree-shaped pass is
//! built on the scope-tracking walker in [`walk`].

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]

pub mod annotate;
pub mod comments;
pub mod error;
pub mod inventory;
pub mod normalize;
pub mod oracle;
pub mod pipeline;
pub mod rename;
pub mod selection;
pub mod uniquify;
pub mod walk;
pub mod xref;

pub use error::Error;
pub use pipeline::{process, PipelineOptions};
pub use selection::Selection;
