//! Lowering: DSL AST -> grammar description.
//!
//! Every DSL node kind has exactly one structural rewrite into the
//! combinator IR, so lowering is a single walk and deterministic. Terminal
//! rules feed the token table (after unescaping); non-terminal rules
//! register under their written name, and the builder's name-case rules
//! decide node vs. alias from there.

use tessera_core::{AstNode, Pattern, Value};

use crate::combinator::{RuleExpr, anon, choice, empty, field, list, rule, sequence, structure, text};
use crate::grammar::{GrammarBuilder, GrammarError};

use super::escape::{unescape_regex, unescape_string};

pub(crate) fn lower_program(program: &AstNode) -> Result<GrammarBuilder, GrammarError> {
    let mut builder = GrammarBuilder::new();
    let rules = program
        .value
        .get("rules")
        .and_then(Value::as_list)
        .expect("a Program node always carries a rule list");

    for declaration in rules {
        let node = declaration.as_node().expect("grammar rules are nodes");
        let name = node
            .value
            .get("name")
            .and_then(Value::as_text)
            .expect("rules carry a name");
        match node.kind.as_str() {
            "TerminalRule" => {
                builder.token(name, lower_pattern(node)?);
            }
            "NonTerminalRule" => {
                let body = node
                    .value
                    .get("body")
                    .expect("non-terminal rules carry a body");
                builder.rule(name, lower_expr(body));
            }
            other => unreachable!("unexpected rule node `{other}`"),
        }
    }
    Ok(builder)
}

fn lower_pattern(terminal: &AstNode) -> Result<Pattern, GrammarError> {
    let pattern = terminal
        .value
        .get("pattern")
        .and_then(Value::as_node)
        .expect("terminal rules carry a pattern");
    let raw = pattern.value.as_text().expect("patterns carry their text");
    // Strip the quote / slash delimiters.
    let body = &raw[1..raw.len() - 1];
    match pattern.kind.as_str() {
        "StringLiteral" => Ok(Pattern::Literal(unescape_string(body)?)),
        "RegExp" => Ok(Pattern::Regex(unescape_regex(body))),
        other => unreachable!("unexpected pattern node `{other}`"),
    }
}

fn lower_expr(value: &Value) -> RuleExpr {
    match value {
        // A bare identifier: token kind if declared as one, rule otherwise.
        Value::Text(name) => rule(name.clone()),
        Value::Node(node) => match node.kind.as_str() {
            "Empty" => empty(),
            "Read" => text(lower_expr(
                node.value.get("body").expect("read nodes carry a body"),
            )),
            "List" => list(
                lower_expr(node.value.get("item").expect("list nodes carry an item")),
                lower_expr(
                    node.value
                        .get("separator")
                        .expect("list nodes carry a separator"),
                ),
            ),
            "Choice" => choice(
                node.value
                    .as_list()
                    .expect("choice nodes carry their branches")
                    .iter()
                    .map(lower_expr)
                    .collect(),
            ),
            "Sequence" => sequence(
                node.value
                    .as_list()
                    .expect("sequence nodes carry their elements")
                    .iter()
                    .map(lower_expr)
                    .collect(),
            ),
            "Struct" => {
                let fields = node
                    .value
                    .get("fields")
                    .and_then(Value::as_list)
                    .expect("struct nodes carry their fields");
                structure(fields.iter().map(lower_field).collect())
            }
            other => unreachable!("unexpected expression node `{other}`"),
        },
        other => unreachable!("unexpected expression value {other:?}"),
    }
}

fn lower_field(field_value: &Value) -> crate::combinator::Field {
    let value = lower_expr(field_value.get("value").expect("fields carry a value"));
    match field_value.get("name").and_then(Value::as_text) {
        Some(name) => field(name, value),
        None => anon(value),
    }
}
