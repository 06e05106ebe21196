//! The YSH grammar.
//!
//! YSH is the structured dialect of the Oils shell. This grammar covers function definitions,
//! `var`/`setvar`/`const` declarations, shell-style command calls and `for` loops, along with
//! the expression and literal syntax they use.

use ysh::{dsl::Rule, BuildError, Grammar, GrammarBuilder};

/// Name of the generated language; the parser exports `tree_sitter_ysh`.
pub const NAME: &str = "ysh";

const COMMENT_PREC: i32 = 0;
const STRING_CONTENT_PREC: i32 = 1;

pub struct Ysh;

impl Grammar for Ysh {
    fn grammar_dsl() -> Result<ysh::dsl::Grammar, BuildError> {
        let mut builder = GrammarBuilder::new(NAME);
        builder
            .add_extra(Rule::pattern(" "))
            .add_extra(sym("comment"));

        add_definitions(&mut builder);
        add_statements(&mut builder);
        add_expressions(&mut builder);
        add_literals(&mut builder);

        builder.build()
    }
}

fn sym(name: &str) -> Rule {
    Rule::symbol(name)
}

fn s(value: &str) -> Rule {
    Rule::string(value)
}

/// `first`, then any number of `sep first`.
fn separated(first: Rule, sep: Rule) -> Rule {
    Rule::seq([first.clone(), Rule::repeat(Rule::seq([sep, first]))])
}

fn add_definitions(b: &mut GrammarBuilder) {
    b.add_rule("source_file", Rule::repeat(sym("_definition")))
        .add_rule(
            "_definition",
            Rule::choice([sym("function_definition"), sym("_statement")]),
        )
        .add_rule(
            "function_definition",
            Rule::seq([
                s("func"),
                sym("function_identifier"),
                sym("parameter_list"),
                sym("block"),
            ]),
        )
        .add_rule("function_identifier", sym("identifier"))
        .add_rule("function_parameter", sym("identifier"))
        // (positional, ...; named = default, ...)
        .add_rule(
            "parameter_list",
            Rule::seq([
                sym("left_paren"),
                Rule::optional(separated(sym("function_parameter"), sym("comma"))),
                Rule::optional(Rule::seq([
                    s(";"),
                    separated(sym("named_parameter"), sym("comma")),
                ])),
                sym("right_paren"),
            ]),
        )
        .add_rule(
            "named_parameter",
            Rule::seq([
                sym("function_parameter"),
                Rule::optional(Rule::seq([sym("equal_sign"), sym("value")])),
            ]),
        )
        .add_rule(
            "block",
            Rule::seq([
                sym("left_bracket"),
                Rule::repeat(sym("_statement")),
                sym("right_bracket"),
            ]),
        )
        .add_rule("left_bracket", s("{"))
        .add_rule("right_bracket", s("}"));
}

fn add_statements(b: &mut GrammarBuilder) {
    b.add_rule(
        "_statement",
        Rule::choice([
            sym("_declaration"),
            sym("function_call_shell"),
            sym("for_statement"),
        ]),
    )
    .add_rule(
        "_declaration",
        Rule::seq([
            Rule::choice([
                Rule::seq([Rule::choice([s("var"), s("setvar")]), sym("variable")]),
                Rule::seq([s("const"), sym("constant")]),
            ]),
            sym("equal_sign"),
            sym("expression"),
            s("\n"),
        ]),
    )
    .add_rule(
        "function_call_shell",
        Rule::seq([
            sym("function_name"),
            Rule::repeat(sym("function_call_parameter")),
            s("\n"),
        ]),
    )
    .add_rule("function_name", sym("identifier"))
    .add_rule(
        "function_call_parameter",
        Rule::choice([
            sym("dollar_variable"),
            sym("paren_expression"),
            sym("value"),
            sym("non_quoted_string"),
        ]),
    )
    // $x, $1, ${x}
    .add_rule(
        "dollar_variable",
        Rule::seq([
            sym("dollar_token"),
            Rule::choice([
                sym("variable"),
                Rule::seq([s("{"), sym("variable"), s("}")]),
            ]),
        ]),
    )
    .add_rule("dollar_token", s("$"))
    .add_rule(
        "for_statement",
        Rule::seq([
            s("for"),
            separated(sym("identifier"), sym("comma")),
            s("in"),
            sym("for_clause"),
            sym("block"),
        ]),
    )
    .add_rule(
        "for_clause",
        Rule::choice([sym("for_range"), sym("paren_expression"), sym("glob")]),
    )
    .add_rule(
        "for_range",
        Rule::seq([
            sym("left_paren"),
            Rule::choice([sym("number"), sym("variable")]),
            sym("range_operator"),
            Rule::choice([sym("number"), sym("variable")]),
            sym("right_paren"),
        ]),
    )
    .add_rule("range_operator", s("..<"))
    .add_rule("glob", Rule::repeat1(Rule::pattern(r"\w+")))
    .add_rule(
        "return_statement",
        Rule::seq([s("return"), sym("paren_expression")]),
    );
}

fn add_expressions(b: &mut GrammarBuilder) {
    let argument = Rule::choice([sym("function_parameter"), sym("value")]);

    b.add_rule(
        "paren_expression",
        Rule::seq([sym("left_paren"), sym("expression"), sym("right_paren")]),
    )
    .add_rule("left_paren", s("("))
    .add_rule("right_paren", s(")"))
    .add_rule(
        "expression",
        Rule::choice([sym("function_call"), sym("value")]),
    )
    .add_rule(
        "function_call",
        Rule::seq([
            sym("identifier"),
            sym("left_paren"),
            Rule::optional(Rule::choice([
                separated(argument, sym("comma")),
                sym("subshell"),
            ])),
            sym("right_paren"),
        ]),
    )
    // $(cmd args)
    .add_rule(
        "subshell",
        Rule::seq([
            sym("dollar_token"),
            sym("left_paren"),
            sym("function_call_shell"),
            sym("right_paren"),
        ]),
    )
    .add_rule("equal_sign", s("="))
    .add_rule("identifier", Rule::pattern("[a-zA-Z_][a-zA-Z0-9_]*"))
    .add_rule("constant", sym("identifier"))
    .add_rule(
        "variable",
        Rule::choice([sym("identifier"), sym("positional_argument")]),
    )
    .add_rule("positional_argument", Rule::pattern("[1-9][0-9]?"));
}

fn add_literals(b: &mut GrammarBuilder) {
    b.add_rule("empty_array", s("[]"))
        .add_rule("empty_dict", s("{}"))
        .add_rule("number", Rule::pattern(r"\d+"))
        .add_rule(
            "value",
            Rule::choice([
                sym("number"),
                sym("string"),
                sym("boolean"),
                sym("null"),
                sym("empty_array"),
                sym("empty_dict"),
            ]),
        )
        .add_rule(
            "string",
            Rule::choice([
                quoted("\"", r#"[^"\n\\]+"#),
                quoted("'", r"[^'\n\\]+"),
            ]),
        )
        .add_rule(
            "non_quoted_string",
            Rule::choice([sym("chars"), sym("path")]),
        )
        // A bare word running up to the end of the line.
        .add_rule("chars", Rule::pattern(r"[^ ]+\n"))
        .add_rule("path", Rule::pattern("(/[^/ ]*)+"))
        .add_rule(
            "escape_sequence",
            Rule::immediate_token(Rule::seq([s("\\"), Rule::pattern("[^xuU]")])),
        )
        .add_rule("null", s("null"))
        .add_rule("boolean", Rule::choice([s("true"), s("false")]))
        .add_rule(
            "comment",
            Rule::token(Rule::prec(
                COMMENT_PREC,
                Rule::seq([s("#"), Rule::pattern(r"[^\n]*")]),
            )),
        )
        .add_rule("comma", s(","))
        .add_rule("newline", s("\n"));
}

/// A string delimited by `quote`, whose unescaped runs match `content`.
fn quoted(quote: &str, content: &str) -> Rule {
    Rule::seq([
        s(quote),
        Rule::repeat(Rule::choice([
            Rule::immediate_token(Rule::prec(STRING_CONTENT_PREC, Rule::pattern(content))),
            sym("escape_sequence"),
        ])),
        s(quote),
    ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn grammar() -> ysh::dsl::Grammar {
        Ysh::grammar_dsl().unwrap()
    }

    #[test]
    fn test_grammar_builds() {
        let grammar = grammar();

        assert_eq!(grammar.name, "ysh");
        assert_eq!(grammar.start_rule(), Some("source_file"));
        assert_eq!(grammar.extras, [Rule::pattern(" "), sym("comment")]);
        assert!(grammar.word.is_none());
        assert!(grammar.externals.is_empty());
    }

    #[test]
    fn test_grammar_defines_statement_rules() {
        let grammar = grammar();

        for name in [
            "function_definition",
            "parameter_list",
            "named_parameter",
            "block",
            "function_call_shell",
            "dollar_variable",
            "for_statement",
            "for_range",
            "return_statement",
            "function_call",
            "subshell",
            "string",
            "escape_sequence",
            "comment",
            "newline",
        ] {
            assert!(grammar.rules.contains_key(name), "missing rule `{name}`");
        }
    }

    #[test]
    fn test_declaration_ends_with_newline() {
        let grammar = grammar();
        let Rule::Seq(declaration) = &grammar.rules["_declaration"] else {
            panic!("`_declaration` should be a sequence");
        };

        assert_eq!(declaration.members.last(), Some(&s("\n")));
        assert_eq!(declaration.members[1], sym("equal_sign"));
    }

    #[test]
    fn test_separated_list() {
        assert_eq!(
            separated(sym("identifier"), sym("comma")),
            Rule::seq([
                sym("identifier"),
                Rule::repeat(Rule::seq([sym("comma"), sym("identifier")])),
            ]),
        );
    }

    #[test]
    fn test_string_contents_are_immediate_tokens() {
        let json = serde_json::to_value(grammar().rules["string"].clone()).unwrap();
        let double = &json["members"][0]["members"];

        assert_eq!(double[0]["value"], "\"");
        assert_eq!(
            double[1]["content"]["members"][0],
            serde_json::json!({
                "type": "IMMEDIATE_TOKEN",
                "content": {
                    "type": "PREC",
                    "value": 1,
                    "content": { "type": "PATTERN", "value": "[^\"\\n\\\\]+" },
                },
            }),
        );
    }

    #[test]
    fn test_comment_pattern_stops_at_newline() {
        assert_eq!(
            grammar().rules["comment"],
            Rule::token(Rule::prec(
                0,
                Rule::seq([s("#"), Rule::pattern("[^\\n]*")]),
            )),
        );
    }
}
