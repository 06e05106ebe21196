use anyhow::Context;
use ysh::Grammar;

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = std::env::var("OUT_DIR").context("OUT_DIR is not set")?;
    let grammar = ysh_grammar::Ysh::grammar_dsl().context("invalid YSH grammar")?;
    ysh_generate::generate(&grammar, &out_dir)?;
    Ok(())
}
