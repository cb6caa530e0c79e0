//! Contracts of the combinator primitives, exercised through
//! `Grammar::parse_rule` so the whole pipeline (lexer, table, evaluator)
//! is in play.

use tessera_core::{Pattern, Span, Value};

use crate::combinator::{
    RuleExpr, choice, empty, eof, field, list, list_min, map, node, one_or_more, optional, rule,
    sequence, structure, text, token, zero_or_more,
};
use crate::diagnostics::ErrorKind;
use crate::grammar::{Grammar, GrammarBuilder};

/// Tokens `a` `b` `c`, numbers, commas, and spaces; `Root` only anchors the
/// grammar, the rule under test is evaluated directly.
fn grammar(rules: Vec<(&str, RuleExpr)>) -> Grammar {
    let mut b = GrammarBuilder::new();
    b.token("A", Pattern::literal("a"));
    b.token("B", Pattern::literal("b"));
    b.token("C", Pattern::literal("c"));
    b.token("NUM", Pattern::regex("[0-9]+"));
    b.token("COMMA", Pattern::literal(","));
    b.token("WS", Pattern::regex("[ \t]+"));
    b.rule("Root", empty());
    for (name, body) in rules {
        b.rule(name, body);
    }
    b.build().unwrap()
}

fn texts(value: &Value) -> Vec<&str> {
    value
        .as_list()
        .unwrap()
        .iter()
        .map(|v| v.as_text().unwrap())
        .collect()
}

#[test]
fn token_matches_kind_and_advances_by_one() {
    let g = grammar(vec![("target", token("A"))]);
    let value = g.parse_rule("target", "a").unwrap();
    let Value::Token(token) = value else {
        panic!("expected a token value");
    };
    assert_eq!(g.kind_name(token.kind), "A");
    assert_eq!(token.span, Span::new(0, 1));
}

#[test]
fn token_mismatch_reports_the_expected_kind() {
    let g = grammar(vec![("target", token("A"))]);
    let err = g.parse_rule("target", "b").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("A".into()));
    assert_eq!(err.span, Span::new(0, 1));
}

#[test]
fn token_at_end_of_input_fails_at_the_eof_span() {
    let g = grammar(vec![("target", token("A"))]);
    let err = g.parse_rule("target", "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("A".into()));
    assert_eq!(err.span, Span::empty(0));
}

#[test]
fn empty_succeeds_without_consuming() {
    let g = grammar(vec![("target", sequence(vec![empty(), token("A")]))]);
    let value = g.parse_rule("target", "a").unwrap();
    let Value::Tuple(items) = value else {
        panic!("expected a tuple");
    };
    assert!(items[0].is_null());
}

#[test]
fn eof_rejects_remaining_tokens() {
    let g = grammar(vec![("target", sequence(vec![token("A"), eof()]))]);
    assert!(g.parse_rule("target", "a").is_ok());

    let err = g.parse_rule("target", "ab").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedEndOfInput);
    assert_eq!(err.span, Span::new(1, 2));
}

#[test]
fn optional_swallows_failure_without_advancing() {
    let g = grammar(vec![(
        "target",
        sequence(vec![optional(token("A")), token("B")]),
    )]);

    let Value::Tuple(items) = g.parse_rule("target", "ab").unwrap() else {
        panic!("expected a tuple");
    };
    assert!(matches!(items[0], Value::Token(_)));

    let Value::Tuple(items) = g.parse_rule("target", "b").unwrap() else {
        panic!("expected a tuple");
    };
    assert!(items[0].is_null());
}

#[test]
fn sequence_yields_values_in_order_and_propagates_the_first_failure() {
    let g = grammar(vec![(
        "target",
        sequence(vec![text(token("A")), text(token("B"))]),
    )]);

    let Value::Tuple(items) = g.parse_rule("target", "ab").unwrap() else {
        panic!("expected a tuple");
    };
    assert_eq!(items[0].as_text(), Some("a"));
    assert_eq!(items[1].as_text(), Some("b"));

    let err = g.parse_rule("target", "ac").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("B".into()));
    assert_eq!(err.span, Span::new(1, 2));
}

#[test]
fn choice_takes_the_first_success_and_stops() {
    let g = grammar(vec![(
        "target",
        choice(vec![
            map(token("A"), |_| Value::Text("first".into())),
            map(token("A"), |_| Value::Text("second".into())),
        ]),
    )]);
    assert_eq!(
        g.parse_rule("target", "a").unwrap().as_text(),
        Some("first")
    );
}

#[test]
fn choice_reports_the_furthest_failure() {
    let g = grammar(vec![(
        "target",
        choice(vec![
            sequence(vec![token("A"), token("B")]),
            sequence(vec![token("B"), token("B")]),
        ]),
    )]);
    // First alternative dies at position 0, second at position 1.
    let err = g.parse_rule("target", "bc").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("B".into()));
    assert_eq!(err.span, Span::new(1, 2));
}

#[test]
fn choice_tie_goes_to_the_earliest_alternative() {
    let g = grammar(vec![("target", choice(vec![token("A"), token("B")]))]);
    let err = g.parse_rule("target", "c").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("A".into()));
}

#[test]
fn empty_choice_is_an_authoring_bug() {
    let g = grammar(vec![("target", choice(vec![]))]);
    let err = g.parse_rule("target", "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoChoices);
}

#[test]
fn zero_or_more_collects_until_failure() {
    let g = grammar(vec![("target", zero_or_more(text(token("A"))))]);
    assert_eq!(texts(&g.parse_rule("target", "aaa").unwrap()), ["a"; 3]);
    assert_eq!(g.parse_rule("target", "").unwrap(), Value::List(vec![]));

    // The repetition itself never fails; the driver rejects the leftovers.
    let err = g.parse_rule("target", "aab").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedEndOfInput);
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn zero_length_success_terminates_the_repetition() {
    let g = grammar(vec![("target", zero_or_more(optional(token("A"))))]);
    // The inner rule always succeeds; without the guard this would never
    // terminate. The non-advancing success is kept, then iteration stops.
    let value = g.parse_rule("target", "").unwrap();
    assert_eq!(value, Value::List(vec![Value::Null]));
}

#[test]
fn one_or_more_requires_a_first_success() {
    let g = grammar(vec![("target", one_or_more(text(token("A"))))]);
    assert_eq!(texts(&g.parse_rule("target", "aa").unwrap()), ["a", "a"]);

    let err = g.parse_rule("target", "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("A".into()));
    assert_eq!(err.span, Span::empty(0));
}

#[test]
fn list_length_tracks_the_separators() {
    let g = grammar(vec![("target", list(text(token("NUM")), token("COMMA")))]);
    assert_eq!(g.parse_rule("target", "").unwrap(), Value::List(vec![]));
    assert_eq!(texts(&g.parse_rule("target", "1").unwrap()), ["1"]);
    assert_eq!(
        texts(&g.parse_rule("target", "1,2,3").unwrap()),
        ["1", "2", "3"]
    );
}

#[test]
fn list_leaves_a_trailing_separator_for_the_enclosing_rule() {
    let g = grammar(vec![("target", list(text(token("NUM")), token("COMMA")))]);
    let err = g.parse_rule("target", "1,").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedEndOfInput);
    assert_eq!(err.span, Span::new(1, 2));
}

#[test]
fn list_rejects_a_leading_separator() {
    let g = grammar(vec![("target", list(text(token("NUM")), token("COMMA")))]);
    let err = g.parse_rule("target", ",1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedEndOfInput);
    assert_eq!(err.span, Span::new(0, 1));
}

#[test]
fn list_min_makes_short_lists_hard_failures() {
    let g = grammar(vec![(
        "target",
        list_min(text(token("NUM")), token("COMMA"), 2),
    )]);
    assert_eq!(texts(&g.parse_rule("target", "1,2").unwrap()), ["1", "2"]);
    assert_eq!(
        texts(&g.parse_rule("target", "1,2,3").unwrap()),
        ["1", "2", "3"]
    );

    let err = g.parse_rule("target", "1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("COMMA".into()));
    assert_eq!(err.span, Span::empty(1));

    let err = g.parse_rule("target", "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("NUM".into()));
}

#[test]
fn map_transforms_the_value_only() {
    let g = grammar(vec![(
        "target",
        map(text(token("NUM")), |v| {
            Value::Text(format!("<{}>", v.as_text().unwrap()))
        }),
    )]);
    assert_eq!(g.parse_rule("target", "42").unwrap().as_text(), Some("<42>"));

    let err = g.parse_rule("target", "a").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExpectedToken("NUM".into()));
}

#[test]
fn text_concatenates_the_consumed_source() {
    let g = grammar(vec![(
        "target",
        text(sequence(vec![token("A"), token("WS"), token("B")])),
    )]);
    let source = "a  b";
    let value = g.parse_rule("target", source).unwrap();
    assert_eq!(value.as_text(), Some(&source[0..4]));
}

#[test]
fn struct_records_named_fields_and_drops_anonymous_ones() {
    let g = grammar(vec![(
        "target",
        structure(vec![
            field("lhs", text(token("A"))),
            anon_ws(),
            field("rhs", text(token("B"))),
        ]),
    )]);
    let value = g.parse_rule("target", "a b").unwrap();
    assert_eq!(
        value,
        Value::Record(vec![
            ("lhs".into(), Value::Text("a".into())),
            ("rhs".into(), Value::Text("b".into())),
        ])
    );
}

fn anon_ws() -> crate::combinator::Field {
    crate::combinator::anon(token("WS"))
}

#[test]
fn node_rules_wrap_value_and_consumed_spans() {
    let g = grammar(vec![(
        "Pair",
        structure(vec![
            field("lhs", text(token("A"))),
            anon_ws(),
            field("rhs", text(token("B"))),
        ]),
    )]);
    let value = g.parse_rule("Pair", "a b").unwrap();
    let node = value.as_node().unwrap();
    assert_eq!(node.kind, "Pair");
    assert_eq!(node.value.get("lhs").and_then(Value::as_text), Some("a"));
    // Every leaf token, in consumption order - the anonymous space included.
    assert_eq!(
        node.tokens,
        vec![Span::new(0, 1), Span::new(1, 2), Span::new(2, 3)]
    );
}

#[test]
fn explicit_node_kinds_join_the_node_set() {
    let g = grammar(vec![("target", node("Extra", token("A")))]);
    let value = g.parse_rule("target", "a").unwrap();
    assert_eq!(value.as_node().map(|n| n.kind.as_str()), Some("Extra"));
    assert!(g.nodes().contains("Extra"));
}

#[test]
fn recursion_limit_is_fatal_and_never_swallowed() {
    // `loop_rule` recurses without consuming anything; `optional` and
    // `choice` must pass the resulting fatal error through untouched.
    let g = grammar(vec![
        ("loop_rule", choice(vec![rule("loop_rule")])),
        ("target", optional(rule("loop_rule"))),
    ]);
    let err = g.parse_rule("target", "").unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit);
}

#[test]
fn mutually_recursive_rules_resolve_lazily() {
    // `pair` and `tail` reference each other; neither exists when the other
    // is registered.
    let g = grammar(vec![
        (
            "pair",
            sequence(vec![text(token("A")), optional(rule("tail"))]),
        ),
        (
            "tail",
            sequence(vec![token("COMMA"), rule("pair")]),
        ),
    ]);
    assert!(g.parse_rule("pair", "a,a,a").is_ok());
}
