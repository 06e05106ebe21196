use pretty_assertions::assert_eq;
use ysh::{dsl, BuildError, Grammar, GrammarBuilder};

fn braces() -> GrammarBuilder {
    let mut builder = GrammarBuilder::new("braces");
    builder
        .add_rule("block", dsl::Rule::seq([
            dsl::Rule::symbol("left_brace"),
            dsl::Rule::repeat(dsl::Rule::symbol("block")),
            dsl::Rule::symbol("right_brace"),
        ]))
        .add_rule("left_brace", dsl::Rule::string("{"))
        .add_rule("right_brace", dsl::Rule::string("}"))
        .add_rule("comment", dsl::Rule::pattern("#[^\\n]*"))
        .add_extra(dsl::Rule::pattern("\\s"))
        .add_extra(dsl::Rule::symbol("comment"));
    builder
}

#[test]
fn test_build_keeps_first_rule_as_start() {
    let grammar = braces().build().unwrap();

    assert_eq!(grammar.name, "braces");
    assert_eq!(grammar.start_rule(), Some("block"));
    assert_eq!(
        grammar.rules.keys().map(String::as_str).collect::<Vec<_>>(),
        ["block", "left_brace", "right_brace", "comment"],
    );
    assert_eq!(grammar.extras.len(), 2);
}

#[test]
fn test_build_rejects_duplicate_rule() {
    let mut builder = braces();
    builder.add_rule("left_brace", dsl::Rule::string("("));

    assert_eq!(
        builder.build(),
        Err(BuildError::DuplicateRule("left_brace".into())),
    );
}

#[test]
fn test_build_rejects_undefined_symbol() {
    let mut builder = braces();
    builder.add_rule("pair", dsl::Rule::seq([
        dsl::Rule::symbol("block"),
        dsl::Rule::symbol("blokc"),
    ]));

    let err = builder.build().unwrap_err();
    assert_eq!(
        err,
        BuildError::UndefinedSymbol {
            rule: "pair".into(),
            symbol: "blokc".into(),
        },
    );
    assert_eq!(
        err.to_string(),
        "rule `pair` references undefined symbol `blokc`"
    );
}

#[test]
fn test_build_checks_extras_and_word() {
    let mut builder = braces();
    builder.add_extra(dsl::Rule::symbol("whitespace"));
    assert!(matches!(
        builder.build(),
        Err(BuildError::UndefinedSymbol { rule, .. }) if rule == "extras"
    ));

    let mut builder = braces();
    builder.set_word("identifier");
    assert!(matches!(
        builder.build(),
        Err(BuildError::UndefinedSymbol { rule, .. }) if rule == "word"
    ));
}

#[test]
fn test_build_checks_supertypes() {
    let mut builder = braces();
    builder.add_supertype("_brace");
    assert_eq!(
        builder.build(),
        Err(BuildError::UndefinedSymbol {
            rule: "supertypes".into(),
            symbol: "_brace".into(),
        }),
    );

    let mut builder = braces();
    builder
        .add_rule("_brace", dsl::Rule::choice([
            dsl::Rule::symbol("left_brace"),
            dsl::Rule::symbol("right_brace"),
        ]))
        .add_supertype("_brace");
    let grammar = builder.build().unwrap();

    assert_eq!(grammar.supertypes, ["_brace"]);
    assert_eq!(
        serde_json::to_value(&grammar).unwrap()["supertypes"],
        serde_json::json!(["_brace"]),
    );
}

#[test]
fn test_build_accepts_external_symbols() {
    let mut builder = braces();
    builder
        .add_external(dsl::Rule::symbol("heredoc_body"))
        .add_rule("heredoc", dsl::Rule::symbol("heredoc_body"));

    assert!(builder.build().is_ok());
}

#[test]
fn test_build_rejects_empty_grammar() {
    assert_eq!(
        GrammarBuilder::new("nothing").build(),
        Err(BuildError::Empty("nothing".into())),
    );
}

struct Braces;

impl Grammar for Braces {
    fn grammar_dsl() -> Result<dsl::Grammar, BuildError> {
        braces().build()
    }
}

#[test]
fn test_grammar_trait_serializes() {
    let json = Braces::grammar_dsl().unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "braces");
    assert_eq!(value["rules"]["left_brace"]["type"], "STRING");
    assert_eq!(value["extras"][1]["name"], "comment");
    assert!(value.get("word").is_none());
}
