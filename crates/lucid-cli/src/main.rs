#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

mod logging;

use clap::Parser;
use lucid_core::oracle::{NoSuggester, OpenAiSuggester, DEFAULT_MODEL};
use lucid_core::{process, PipelineOptions, Selection};
use miette::{miette, IntoDiagnostic, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lucid")]
#[command(author, version, about = "Rename and annotate minified JavaScript", long_about = None)]
struct Cli {
    /// Input JavaScript file
    input: PathBuf,

    /// Output file for the rewritten program
    output: PathBuf,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted logs (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Ask the suggestion API for better function names
    #[arg(long)]
    suggest_names: bool,

    /// Ask the suggestion API for descriptive comments
    #[arg(long)]
    describe: bool,

    /// Annotate each function with a caller summary (on by default)
    #[arg(long, overrides_with = "no_xrefs")]
    xrefs: bool,

    /// Disable the caller summaries
    #[arg(long, overrides_with = "xrefs")]
    no_xrefs: bool,

    /// Append a call-count suffix to renamed functions
    #[arg(long)]
    xref_suffix: bool,

    /// Only process functions with this name (repeatable)
    #[arg(long, value_name = "NAME")]
    only: Vec<String>,

    /// Only process functions starting on this 1-based line (repeatable)
    #[arg(long, value_name = "LINE")]
    only_line: Vec<u32>,

    /// Chat-completions model used for suggestions
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let source = std::fs::read_to_string(&cli.input)
        .map_err(|e| miette!("failed to read {}: {e}", cli.input.display()))?;

    let mut selection = Selection::default();
    for name in &cli.only {
        selection.insert_name(name);
    }
    for line in &cli.only_line {
        selection.insert_line(*line);
    }

    let options = PipelineOptions {
        suggest_names: cli.suggest_names,
        describe: cli.describe,
        xrefs: cli.xrefs || !cli.no_xrefs,
        xref_suffix: cli.xref_suffix,
        selection,
    };

    // The suggestion client (and its API key) is only needed when an AI
    // feature was asked for.
    let output = if cli.suggest_names || cli.describe {
        let suggester = OpenAiSuggester::new(cli.model.clone()).into_diagnostic()?;
        process(&source, &options, &suggester).into_diagnostic()?
    } else {
        process(&source, &options, &NoSuggester).into_diagnostic()?
    };

    std::fs::write(&cli.output, output)
        .map_err(|e| miette!("failed to write {}: {e}", cli.output.display()))?;

    tracing::info!(output = %cli.output.display(), "wrote annotated program");
    Ok(())
}
