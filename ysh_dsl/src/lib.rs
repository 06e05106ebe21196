//! Rust interface to the Tree-sitter grammar DSL.
//!
//! An entire Tree-sitter grammar is described by a [`Grammar`], which is composed of [`Rule`]s.
//! Serializing a [`Grammar`] yields the `grammar.json` document that `tree-sitter generate`
//! consumes.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

/// A Tree-sitter grammar as described by the Tree-sitter DSL.
///
/// This serializes to a JSON object that complies with the [grammar schema][0].
///
/// The first entry of `rules` is the start rule, so rules keep their insertion order.
///
/// [0]: https://github.com/tree-sitter/tree-sitter/blob/master/cli/src/generate/grammar-schema.json
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grammar {
    pub name: String,

    pub rules: IndexMap<String, Rule>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<Rule>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub externals: Vec<Rule>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inline: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Vec<String>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
}

impl Grammar {
    pub fn new(name: String) -> Grammar {
        Grammar {
            name,
            rules: IndexMap::new(),
            extras: Vec::new(),
            externals: Vec::new(),
            inline: Vec::new(),
            conflicts: Vec::new(),
            supertypes: Vec::new(),
            word: None,
        }
    }

    /// Returns the name of the start rule, if any rule is defined.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.keys().next().map(String::as_str)
    }

    /// Serializes the grammar to the `grammar.json` format.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A rule in a Tree-sitter grammar.
///
/// Each variant has an associated convenience constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    Blank,
    String(StringRule),
    Pattern(PatternRule),
    Symbol(SymbolRule),
    Seq(SeqRule),
    Choice(ChoiceRule),
    Repeat(RepeatRule),
    #[serde(rename = "REPEAT1")]
    Repeat1(Repeat1Rule),
    Token(TokenRule),
    ImmediateToken(ImmediateTokenRule),
    Alias(AliasRule),
    Field(FieldRule),
    Prec(PrecRule),
    PrecLeft(PrecRule),
    PrecRight(PrecRule),
    PrecDynamic(PrecRule),
}

impl Rule {
    /// Creates a blank rule.
    pub fn blank() -> Rule {
        Rule::Blank
    }

    pub fn string<S: AsRef<str>>(value: S) -> Rule {
        Rule::String(StringRule {
            value: value.as_ref().into(),
        })
    }

    /// Creates a rule matching a regular expression.
    ///
    /// The pattern text is handed to Tree-sitter verbatim.
    pub fn pattern<S: AsRef<str>>(value: S) -> Rule {
        Rule::Pattern(PatternRule {
            value: value.as_ref().into(),
        })
    }

    pub fn symbol<S: AsRef<str>>(name: S) -> Rule {
        Rule::Symbol(SymbolRule {
            name: name.as_ref().into(),
        })
    }

    pub fn seq<I>(members: I) -> Rule
    where
        I: IntoIterator<Item = Rule>,
    {
        Rule::Seq(SeqRule {
            members: members.into_iter().collect(),
        })
    }

    pub fn choice<I>(members: I) -> Rule
    where
        I: IntoIterator<Item = Rule>,
    {
        Rule::Choice(ChoiceRule {
            members: members.into_iter().collect(),
        })
    }

    pub fn repeat(content: Rule) -> Rule {
        Rule::Repeat(RepeatRule {
            content: Box::new(content),
        })
    }

    pub fn repeat1(content: Rule) -> Rule {
        Rule::Repeat1(Repeat1Rule {
            content: Box::new(content),
        })
    }

    pub fn optional(rule: Rule) -> Rule {
        Rule::Choice(ChoiceRule {
            members: vec![Rule::blank(), rule],
        })
    }

    pub fn token(content: Rule) -> Rule {
        Rule::Token(TokenRule {
            content: Box::new(content),
        })
    }

    pub fn immediate_token(content: Rule) -> Rule {
        Rule::ImmediateToken(ImmediateTokenRule {
            content: Box::new(content),
        })
    }

    pub fn named_alias<S: AsRef<str>>(name: S, content: Rule) -> Rule {
        Rule::Alias(AliasRule {
            value: name.as_ref().into(),
            named: true,
            content: Box::new(content),
        })
    }

    pub fn anonymous_alias<S: AsRef<str>>(value: S, content: Rule) -> Rule {
        Rule::Alias(AliasRule {
            value: value.as_ref().into(),
            named: false,
            content: Box::new(content),
        })
    }

    pub fn field<S: AsRef<str>>(name: S, content: Rule) -> Rule {
        Rule::Field(FieldRule {
            name: name.as_ref().into(),
            content: Box::new(content),
        })
    }

    pub fn prec(value: i32, content: Rule) -> Rule {
        Rule::Prec(PrecRule::new(value, content))
    }

    pub fn prec_left(value: i32, content: Rule) -> Rule {
        Rule::PrecLeft(PrecRule::new(value, content))
    }

    pub fn prec_right(value: i32, content: Rule) -> Rule {
        Rule::PrecRight(PrecRule::new(value, content))
    }

    pub fn prec_dynamic(value: i32, content: Rule) -> Rule {
        Rule::PrecDynamic(PrecRule::new(value, content))
    }

    /// Returns the names of all symbols referenced anywhere inside this rule.
    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Rule::Blank | Rule::String(_) | Rule::Pattern(_) => {}
            Rule::Symbol(s) => {
                out.insert(&s.name);
            }
            Rule::Seq(SeqRule { members }) | Rule::Choice(ChoiceRule { members }) => {
                for member in members {
                    member.collect_symbols(out);
                }
            }
            Rule::Repeat(RepeatRule { content })
            | Rule::Repeat1(Repeat1Rule { content })
            | Rule::Token(TokenRule { content })
            | Rule::ImmediateToken(ImmediateTokenRule { content })
            | Rule::Alias(AliasRule { content, .. })
            | Rule::Field(FieldRule { content, .. })
            | Rule::Prec(PrecRule { content, .. })
            | Rule::PrecLeft(PrecRule { content, .. })
            | Rule::PrecRight(PrecRule { content, .. })
            | Rule::PrecDynamic(PrecRule { content, .. }) => content.collect_symbols(out),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StringRule {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternRule {
    pub value: String,
}

/// A rule which references a named rule in a grammar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SymbolRule {
    /// The name of the referenced rule.
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeqRule {
    pub members: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceRule {
    pub members: Vec<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepeatRule {
    pub content: Box<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Repeat1Rule {
    pub content: Box<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenRule {
    pub content: Box<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImmediateTokenRule {
    pub content: Box<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AliasRule {
    pub value: String,
    pub named: bool,
    pub content: Box<Rule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: String,
    pub content: Box<Rule>,
}

/// Shared payload of the four precedence rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrecRule {
    pub value: i32,
    pub content: Box<Rule>,
}

impl PrecRule {
    fn new(value: i32, content: Rule) -> PrecRule {
        PrecRule {
            value,
            content: Box::new(content),
        }
    }
}
