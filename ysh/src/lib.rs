//! Assembly of Tree-sitter grammars from [`dsl`] rules.
//!
//! A grammar is put together with a [`GrammarBuilder`] and checked as a whole when it is built,
//! so that a misspelled symbol is caught before `tree-sitter generate` ever sees the grammar.

use std::collections::BTreeSet;

use thiserror::Error;

pub mod dsl {
    pub use ysh_dsl::*;
}

/// A type which describes a complete Tree-sitter grammar.
pub trait Grammar {
    fn grammar_dsl() -> Result<dsl::Grammar, BuildError>;
}

/// Errors reported by [`GrammarBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("grammar `{0}` has no rules")]
    Empty(String),
    #[error("multiple rules named `{0}` specified")]
    DuplicateRule(String),
    #[error("rule `{rule}` references undefined symbol `{symbol}`")]
    UndefinedSymbol { rule: String, symbol: String },
}

#[derive(Debug)]
pub struct GrammarBuilder {
    grammar: dsl::Grammar,
    duplicates: Vec<String>,
}

impl GrammarBuilder {
    pub fn new(name: &str) -> GrammarBuilder {
        GrammarBuilder {
            grammar: dsl::Grammar::new(name.to_string()),
            duplicates: Vec::new(),
        }
    }

    /// Adds a named rule. The first rule added becomes the start rule.
    pub fn add_rule(&mut self, name: &str, rule: dsl::Rule) -> &mut Self {
        if self.grammar.rules.contains_key(name) {
            self.duplicates.push(name.to_string());
        } else {
            self.grammar.rules.insert(name.to_string(), rule);
        }
        self
    }

    /// Adds a rule that may appear anywhere in the input, like whitespace or comments.
    pub fn add_extra(&mut self, rule: dsl::Rule) -> &mut Self {
        self.grammar.extras.push(rule);
        self
    }

    pub fn add_external(&mut self, rule: dsl::Rule) -> &mut Self {
        self.grammar.externals.push(rule);
        self
    }

    pub fn add_conflict<I, S>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grammar
            .conflicts
            .push(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn add_inline(&mut self, name: &str) -> &mut Self {
        self.grammar.inline.push(name.to_string());
        self
    }

    /// Marks a hidden rule as a supertype, so its children are reported under it.
    pub fn add_supertype(&mut self, name: &str) -> &mut Self {
        self.grammar.supertypes.push(name.to_string());
        self
    }

    pub fn set_word(&mut self, name: &str) -> &mut Self {
        self.grammar.word = Some(name.to_string());
        self
    }

    /// Validates the collected rules and returns the finished grammar.
    pub fn build(self) -> Result<dsl::Grammar, BuildError> {
        let GrammarBuilder {
            grammar,
            duplicates,
        } = self;

        if let Some(name) = duplicates.into_iter().next() {
            return Err(BuildError::DuplicateRule(name));
        }

        if grammar.rules.is_empty() {
            return Err(BuildError::Empty(grammar.name));
        }

        check_symbols(&grammar)?;

        Ok(grammar)
    }
}

/// Checks that every symbol referenced by the grammar names a rule or an external token.
fn check_symbols(grammar: &dsl::Grammar) -> Result<(), BuildError> {
    let externals: BTreeSet<&str> = grammar
        .externals
        .iter()
        .filter_map(|rule| match rule {
            dsl::Rule::Symbol(s) => Some(s.name.as_str()),
            _ => None,
        })
        .collect();
    let is_defined =
        |name: &str| grammar.rules.contains_key(name) || externals.contains(name);

    let referenced = grammar
        .rules
        .iter()
        .flat_map(|(name, rule)| rule.symbols().into_iter().map(move |s| (name.as_str(), s)))
        .chain(
            grammar
                .extras
                .iter()
                .flat_map(|rule| rule.symbols().into_iter().map(|s| ("extras", s))),
        )
        .chain(grammar.word.iter().map(|w| ("word", w.as_str())))
        .chain(grammar.inline.iter().map(|i| ("inline", i.as_str())))
        .chain(grammar.supertypes.iter().map(|s| ("supertypes", s.as_str())))
        .chain(
            grammar
                .conflicts
                .iter()
                .flatten()
                .map(|c| ("conflicts", c.as_str())),
        );

    for (rule, symbol) in referenced {
        if !is_defined(symbol) {
            return Err(BuildError::UndefinedSymbol {
                rule: rule.to_string(),
                symbol: symbol.to_string(),
            });
        }
    }

    Ok(())
}
