//! rustyhtml CLI - parse, re-print and query markup files.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::process;

use clap::{Args, Parser, Subcommand};
use rustyhtml::loader::{load_file, load_reader};
use rustyhtml::{write_node, Document, NodeKind, ParseOptions, WriteOptions, ROOT};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rustyhtml", about = "In-place HTML/XML-like markup parser")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print it back
    Print(PrintArgs),
    /// Print the elements matching a CSS selector
    Select(SelectArgs),
    /// Count nodes per kind
    Stats(InputArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Input file (- for stdin)
    input: String,

    /// Leave character references unexpanded
    #[arg(long)]
    no_entities: bool,

    /// Condense whitespace runs to a single space
    #[arg(long)]
    normalize_whitespace: bool,

    /// Trim leading and trailing whitespace from text
    #[arg(long)]
    trim_whitespace: bool,

    /// Store numeric references as single bytes instead of UTF-8
    #[arg(long)]
    no_utf8: bool,
}

#[derive(Args)]
struct PrintArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print everything on one line
    #[arg(long)]
    no_indent: bool,
}

#[derive(Args)]
struct SelectArgs {
    #[command(flatten)]
    input: InputArgs,

    /// CSS selector
    selector: String,

    /// Print everything on one line
    #[arg(long)]
    no_indent: bool,
}

impl InputArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_entities(!self.no_entities)
            .with_normalize_whitespace(self.normalize_whitespace)
            .with_trim_whitespace(self.trim_whitespace)
            .with_utf8_output(!self.no_utf8)
    }

    fn load(&self) -> rustyhtml::Result<Vec<u8>> {
        if self.input == "-" {
            load_reader(io::stdin().lock())
        } else {
            load_file(&self.input)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> rustyhtml::Result<()> {
    match cli.command {
        Command::Print(args) => run_print(args),
        Command::Select(args) => run_select(args),
        Command::Stats(args) => run_stats(args),
    }
}

fn run_print(args: PrintArgs) -> rustyhtml::Result<()> {
    let mut buf = args.input.load()?;
    let doc = Document::parse(&mut buf, args.input.options())?;
    let opts = WriteOptions { indent: !args.no_indent };

    let mut out = BufWriter::new(io::stdout().lock());
    write_node(&mut out, &doc, ROOT, &opts)?;
    out.flush()?;
    Ok(())
}

fn run_select(args: SelectArgs) -> rustyhtml::Result<()> {
    let mut buf = args.input.load()?;
    let doc = Document::parse(&mut buf, args.input.options())?;
    let matches = doc.select(&args.selector)?;
    let opts = WriteOptions { indent: !args.no_indent };

    let mut out = BufWriter::new(io::stdout().lock());
    for id in matches {
        write_node(&mut out, &doc, id, &opts)?;
        if !opts.indent {
            out.write_all(b"\n")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_stats(args: InputArgs) -> rustyhtml::Result<()> {
    let mut buf = args.load()?;
    let doc = Document::parse(&mut buf, args.options())?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for id in doc.descendants(ROOT) {
        if let Some(kind) = doc.kind(id) {
            *counts.entry(kind.label()).or_default() += 1;
        }
    }

    let mut out = io::stdout().lock();
    for (label, count) in &counts {
        writeln!(out, "{label:<14} {count}")?;
    }
    let elements: usize = doc
        .descendants(ROOT)
        .filter(|&id| doc.kind(id).map_or(false, NodeKind::is_element))
        .count();
    writeln!(out, "{:<14} {}", "elements", elements)?;
    writeln!(out, "{:<14} {}", "total", doc.node_count() - 1)?;
    Ok(())
}
