//! The fixed pass sequence over one program.
//!
//! parse -> attach comments -> inventory -> uniquify -> normalize ->
//! call graph -> rename -> annotate -> generate. Single-threaded and
//! synchronous; a fatal error anywhere aborts before any output exists.

use crate::annotate::{annotate, AnnotateOptions};
use crate::comments::attach_comments;
use crate::error::Error;
use crate::inventory::Inventory;
use crate::normalize::normalize;
use crate::oracle::Suggester;
use crate::rename::{rename_functions, RenameOptions};
use crate::selection::Selection;
use crate::uniquify::uniquify;
use crate::xref::build_call_graph;
use lucid_syntax::{parse, Codegen, CodegenOptions, ParserOptions};

/// What the pipeline should do beyond the always-on renaming.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Ask the suggestion collaborator for better function names.
    pub suggest_names: bool,
    /// Ask the suggestion collaborator for descriptive comments.
    pub describe: bool,
    /// Prepend caller-summary comments.
    pub xrefs: bool,
    /// Append `_xref_<count>` to renamed functions.
    pub xref_suffix: bool,
    /// Restrict the passes to these functions; empty means all.
    pub selection: Selection,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            suggest_names: false,
            describe: false,
            xrefs: true,
            xref_suffix: false,
            selection: Selection::default(),
        }
    }
}

/// Heuristic module detection, matching how the tool has always decided:
/// any mention of `import` or `export` switches the parser to module mode.
fn is_module(source: &str) -> bool {
    source.contains("import") || source.contains("export")
}

/// Run the whole pipeline over `source` and return the rewritten program.
pub fn process(
    source: &str,
    options: &PipelineOptions,
    suggester: &dyn Suggester,
) -> Result<String, Error> {
    let module = is_module(source);
    tracing::debug!(module, bytes = source.len(), "parsing");
    let mut tree = parse(source, ParserOptions { module })?;

    attach_comments(&mut tree);

    let mut inventory = Inventory::collect(&mut tree);
    tracing::debug!(names = inventory.len(), "identifier inventory built");

    let mut selection = options.selection.clone();
    uniquify(&mut tree, &mut inventory, &mut selection);
    normalize(&mut tree, &mut inventory, &mut selection);

    let mut registry = build_call_graph(&mut tree, &selection);
    tracing::debug!(functions = registry.len(), "call graph built");

    rename_functions(
        &mut tree,
        &mut registry,
        &mut inventory,
        &mut selection,
        &RenameOptions { suggest_names: options.suggest_names, xref_suffix: options.xref_suffix },
        suggester,
    )?;

    annotate(
        &mut tree,
        &registry,
        &selection,
        &AnnotateOptions { describe: options.describe, xrefs: options.xrefs },
        suggester,
    )?;

    Ok(Codegen::new(&tree, CodegenOptions::default()).generate())
}
