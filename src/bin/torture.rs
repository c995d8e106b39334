//! Torture pattern generator.
//!
//! Usage:
//!   torture [--pattern NAME | --index N] [--args ARGS] [--format FMT] [-o FILE]
//!   torture --list
//!   torture --examples-dir DIR [--format FMT]

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use torture_patterns::format::{FormatKind, RunOptions};
use torture_patterns::stimulus::DEFAULT_SEED;
use torture_patterns::{logging, registry, DriverConfig, Selection};

#[derive(clap::Parser, Debug)]
#[command(name = "torture")]
#[command(about = "Generate torture-test circuits with golden reference values")]
struct Args {
    /// Pattern family name (see --list).
    #[clap(long, conflicts_with = "index")]
    pattern: Option<String>,

    /// Pattern family position in the registry.
    #[clap(long)]
    index: Option<usize>,

    /// Family-specific argument string, e.g. "64-8". Omit for the default.
    #[clap(long)]
    args: Option<String>,

    /// Output format: flo, chisel, vcd or json.
    #[clap(long, default_value = "flo")]
    format: FormatKind,

    /// Cycles of reference data to embed.
    #[clap(long, default_value_t = RunOptions::default().cycles)]
    cycles: usize,

    /// Stimulus seed.
    #[clap(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Output file (default: stdout).
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// List registered patterns and their examples, then exit.
    #[clap(long)]
    list: bool,

    /// Write every registered example into this directory.
    #[clap(long, conflicts_with_all = ["pattern", "index", "args", "output"])]
    examples_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let registry = registry::global();

    if args.list {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for (i, factory) in registry.list().iter().enumerate() {
            writeln!(out, "{:>3}  {}  [{}]", i, factory.name(), factory.examples().join(", "))?;
        }
        return Ok(());
    }

    let selection = match (args.pattern, args.index) {
        (Some(name), _) => Selection::Name(name),
        (None, Some(index)) => Selection::Index(index),
        (None, None) => Selection::default(),
    };
    let config = DriverConfig {
        selection,
        args: args.args,
        format: args.format,
        run: RunOptions {
            cycles: args.cycles,
            seed: args.seed,
        },
    };

    if let Some(dir) = args.examples_dir {
        let written = torture_patterns::generate_examples(registry, &config, &dir)
            .with_context(|| format!("Failed to write examples to {}", dir.display()))?;
        eprintln!("Wrote {} example(s) to {}", written.len(), dir.display());
        return Ok(());
    }

    match args.output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            torture_patterns::generate(registry, &config, &mut out)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            torture_patterns::generate(registry, &config, &mut out)?;
        }
    }

    Ok(())
}
