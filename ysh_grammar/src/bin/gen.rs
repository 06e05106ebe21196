use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use ysh::Grammar;
use ysh_grammar::Ysh;

/// Write the YSH grammar sources the way `tree-sitter generate` lays them out.
#[derive(Parser, Debug)]
#[command(name = "ysh-gen", version, about)]
struct Args {
    /// Directory receiving `grammar.json` (and the parser sources with `--parser`)
    #[arg(short, long, value_name = "DIR", default_value = "src")]
    out_dir: PathBuf,

    /// Also generate `parser.c` and `tree_sitter/parser.h`
    #[arg(short, long)]
    parser: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let grammar = Ysh::grammar_dsl().context("invalid YSH grammar")?;

    if args.parser {
        let sources = ysh_generate::write_sources(&grammar, &args.out_dir)?;
        info!(parser = %sources.parser_c.display(), "wrote parser sources");
    } else {
        let path = ysh_generate::write_grammar_json(&grammar, &args.out_dir)?;
        info!(path = %path.display(), "wrote grammar");
    }

    Ok(())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
