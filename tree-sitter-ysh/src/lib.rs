//! YSH grammar for tree-sitter
//!
//! This crate provides the YSH language grammar for use with tree-sitter. The parser is
//! generated from the grammar in `ysh_grammar` when the crate is built and linked in
//! statically.
//!
//! ```
//! let language = tree_sitter_ysh::verify_grammar_loads().expect("Error loading YSH grammar");
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(language).unwrap();
//! ```

use std::ptr::NonNull;

use thiserror::Error;
use tree_sitter::{Language, Parser};

/// Opaque parse table emitted by the parser generator.
#[repr(C)]
struct TSLanguage {
    _private: [u8; 0],
}

extern "C" {
    fn tree_sitter_ysh() -> *const TSLanguage;
}

/// The grammar name, as exported by the generated parser.
pub const GRAMMAR_NAME: &str = "ysh";

/// The `grammar.json` the parser was generated from.
pub const GRAMMAR_JSON: &str = include_str!(concat!(env!("OUT_DIR"), "/grammar.json"));

/// Failure to turn the linked grammar into a usable [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrammarLoadError {
    #[error("Error loading YSH grammar")]
    Null,
    #[error("Error loading YSH grammar: incompatible language version {version}")]
    IncompatibleVersion { version: usize },
}

/// Returns the YSH tree-sitter language.
pub fn language() -> Language {
    // SAFETY: `tree_sitter_ysh` returns a pointer to a static table.
    unsafe { language_from_raw(tree_sitter_ysh()) }
}

/// Loads the linked YSH grammar and checks that the runtime accepts it.
///
/// A null grammar handle and a parse table generated for an ABI the runtime does not support
/// are both reported as [`GrammarLoadError`].
pub fn verify_grammar_loads() -> Result<Language, GrammarLoadError> {
    // SAFETY: `tree_sitter_ysh` returns either null or a pointer to a static table.
    unsafe { load(tree_sitter_ysh()) }
}

/// # Safety
///
/// `raw` must be null or point to a parse table that lives for the rest of the program.
unsafe fn load(raw: *const TSLanguage) -> Result<Language, GrammarLoadError> {
    let handle = NonNull::new(raw.cast_mut()).ok_or(GrammarLoadError::Null)?;
    check_language(language_from_raw(handle.as_ptr()))
}

/// # Safety
///
/// `raw` must point to a parse table that lives for the rest of the program.
unsafe fn language_from_raw(raw: *const TSLanguage) -> Language {
    // `Language` is a transparent wrapper around the table pointer.
    std::mem::transmute::<*const TSLanguage, Language>(raw)
}

fn check_language(language: Language) -> Result<Language, GrammarLoadError> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|_| GrammarLoadError::IncompatibleVersion {
            version: language.version(),
        })?;
    Ok(language)
}
