//! Turns a grammar description into a compiled Tree-sitter parser.
//!
//! Generation happens in two stages: [`write_sources`] lays out `grammar.json`, `parser.c` and
//! `tree_sitter/parser.h` in a source directory, and [`compile`] builds those sources into a
//! static library that cargo links into the calling crate. [`generate`] runs both, which is what
//! a build script wants.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, info};
use tree_sitter_cli as cli;

use ysh_dsl as dsl;

/// Paths of the sources produced by [`write_sources`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Name of the grammar, as reported by the parser generator.
    pub name: String,
    pub src_dir: PathBuf,
    pub grammar_json: PathBuf,
    pub parser_c: PathBuf,
}

impl GeneratedSources {
    /// The optional hand-written external scanner living next to `parser.c`.
    pub fn scanner_c(&self) -> Option<PathBuf> {
        let path = self.src_dir.join("scanner.c");
        path.exists().then_some(path)
    }

    /// Name of the static library built by [`compile`].
    pub fn library_name(&self) -> String {
        format!("tree_sitter_{}_parser", self.name.replace('-', "_"))
    }
}

/// Writes the grammar's `grammar.json` into `src_dir` and returns its path.
pub fn write_grammar_json<P: AsRef<Path>>(dsl: &dsl::Grammar, src_dir: P) -> Result<PathBuf> {
    let src_dir = src_dir.as_ref();
    let json = dsl.to_json().context("failed to serialize grammar")?;
    let path = src_dir.join("grammar.json");
    write_file(&path, &json)?;
    Ok(path)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Runs the Tree-sitter parser generator over `dsl` and writes its sources into `src_dir`.
pub fn write_sources<P: AsRef<Path>>(dsl: &dsl::Grammar, src_dir: P) -> Result<GeneratedSources> {
    let src_dir = src_dir.as_ref();
    let json = dsl.to_json().context("failed to serialize grammar")?;
    let grammar_json = src_dir.join("grammar.json");
    write_file(&grammar_json, &json)?;

    let (name, c_src) = cli::generate::generate_parser_for_grammar(&json)
        .with_context(|| format!("failed to generate parser for grammar `{}`", dsl.name))?;

    let parser_c = src_dir.join("parser.c");
    write_file(&parser_c, &c_src)?;
    write_file(
        &src_dir.join("tree_sitter").join("parser.h"),
        tree_sitter::PARSER_HEADER,
    )?;

    info!(grammar = %name, path = %parser_c.display(), "generated parser source");

    Ok(GeneratedSources {
        name,
        src_dir: src_dir.to_path_buf(),
        grammar_json,
        parser_c,
    })
}

/// Compiles the generated parser (and `scanner.c`, if present) into a static library.
///
/// The cargo link directives are printed to stdout, so this is meant to be called from a build
/// script.
pub fn compile(sources: &GeneratedSources) -> Result<()> {
    let mut build = cc::Build::new();
    build
        .include(&sources.src_dir)
        .file(&sources.parser_c)
        .warnings(false)
        .flag_if_supported("-std=c11")
        .flag_if_supported("-Wno-unused-parameter");

    if let Some(scanner) = sources.scanner_c() {
        debug!(path = %scanner.display(), "compiling external scanner");
        build.file(scanner);
    }

    let library = sources.library_name();
    build
        .try_compile(&library)
        .with_context(|| format!("failed to compile {}", sources.parser_c.display()))?;

    info!(library = %library, "compiled parser");
    Ok(())
}

/// Generates the parser for `dsl` into `out_dir` and compiles it.
pub fn generate<P: AsRef<Path>>(dsl: &dsl::Grammar, out_dir: P) -> Result<GeneratedSources> {
    let sources = write_sources(dsl, out_dir)?;
    compile(&sources)?;
    Ok(sources)
}
