//! The fixed grammar that parses grammar descriptions.
//!
//! Expressed directly in the combinator algebra, registered under a stable
//! set of node kinds, and built once per process. Whitespace and newlines
//! are tokens here: they separate statements and sequence elements but
//! carry no other meaning.
//!
//! Shape notes that are easy to miss when reading the rules below:
//! - `Choice` needs at least two branches and `Sequence` at least two
//!   elements; single items flow through `atomic`, so the AST mirrors what
//!   was written.
//! - `statement_sep` swallows trailing spaces, the line break, and any
//!   following indentation or blank lines.
//! - a struct's field separator is a comma *before* the line break, which
//!   forbids trailing commas the same way `list` forbids trailing
//!   separators.

use std::sync::OnceLock;

use tessera_core::{Pattern, Value};

use crate::combinator::{
    anon, choice, field, list_min, map, one_or_more, optional, rule, sequence, structure, text,
    token, zero_or_more,
};
use crate::grammar::{Grammar, GrammarBuilder, GrammarError};

/// The bootstrap grammar. Built lazily and shared; grammars are immutable
/// and reentrant, so one instance serves every caller.
pub(crate) fn bootstrap() -> &'static Grammar {
    static BOOTSTRAP: OnceLock<Grammar> = OnceLock::new();
    BOOTSTRAP.get_or_init(|| build().expect("the bootstrap grammar is well-formed"))
}

fn build() -> Result<Grammar, GrammarError> {
    let mut g = GrammarBuilder::new();

    // "::=" before ":", "<-" before "<", and the empty literal before
    // STRING: declaration order is the lexer's tie-break.
    g.token("ASSIGN", Pattern::literal("::="));
    g.token("ARROW", Pattern::literal("<-"));
    g.token("EMPTY", Pattern::literal("\"\""));
    g.token("STRING", Pattern::regex(r#""(?:[^"\\]|\\.)*""#));
    g.token("REGEX", Pattern::regex(r"/(?:[^/\\]|\\.)*/"));
    g.token("LANGLE", Pattern::literal("<"));
    g.token("RANGLE", Pattern::literal(">"));
    g.token("LBRACE", Pattern::literal("{"));
    g.token("RBRACE", Pattern::literal("}"));
    g.token("LBRACKET", Pattern::literal("["));
    g.token("RBRACKET", Pattern::literal("]"));
    g.token("COLON", Pattern::literal(":"));
    g.token("COMMA", Pattern::literal(","));
    g.token("PIPE", Pattern::literal("|"));
    g.token("IDENT", Pattern::regex("[A-Za-z_][A-Za-z0-9_]*"));
    g.token("NEWLINE", Pattern::regex(r"\r?\n"));
    g.token("WHITESPACE", Pattern::regex(r"[ \t]+"));

    g.rule(
        "Program",
        structure(vec![
            field(
                "rules",
                list_min(rule("grammar_rule"), rule("statement_sep"), 1),
            ),
            anon(zero_or_more(choice(vec![
                token("NEWLINE"),
                token("WHITESPACE"),
            ]))),
        ]),
    );

    g.rule(
        "grammar_rule",
        choice(vec![rule("TerminalRule"), rule("NonTerminalRule")]),
    );

    g.rule(
        "TerminalRule",
        structure(vec![
            field("name", text(token("IDENT"))),
            anon(rule("opt_ws")),
            anon(token("ASSIGN")),
            anon(rule("opt_ws")),
            field(
                "pattern",
                choice(vec![rule("StringLiteral"), rule("RegExp")]),
            ),
        ]),
    );

    g.rule("StringLiteral", text(token("STRING")));
    g.rule("RegExp", text(token("REGEX")));

    g.rule(
        "NonTerminalRule",
        structure(vec![
            anon(token("LANGLE")),
            field("name", text(token("IDENT"))),
            anon(token("RANGLE")),
            anon(rule("opt_ws")),
            anon(token("ASSIGN")),
            anon(rule("opt_ws")),
            field("body", rule("expression")),
        ]),
    );

    // Choice before Sequence: `A B | C` must not stop after `A B`.
    g.rule(
        "expression",
        choice(vec![
            rule("Struct"),
            rule("List"),
            rule("Read"),
            rule("Choice"),
            rule("Sequence"),
            rule("atomic"),
        ]),
    );

    g.rule("atomic", choice(vec![rule("reference"), rule("Empty")]));
    g.rule("reference", text(token("IDENT")));
    g.rule("Empty", map(token("EMPTY"), |_| Value::Null));

    g.rule(
        "Sequence",
        map(
            sequence(vec![
                rule("atomic"),
                one_or_more(sequence(vec![rule("ws"), rule("atomic")])),
            ]),
            flatten_sequence,
        ),
    );

    g.rule("Choice", list_min(rule("branch"), rule("pipe_sep"), 2));
    g.rule("branch", choice(vec![rule("Sequence"), rule("atomic")]));
    g.rule(
        "pipe_sep",
        sequence(vec![rule("opt_ws"), token("PIPE"), rule("opt_ws")]),
    );

    g.rule(
        "Read",
        structure(vec![
            anon(token("ARROW")),
            anon(rule("opt_ws")),
            field(
                "body",
                choice(vec![rule("Choice"), rule("Sequence"), rule("atomic")]),
            ),
        ]),
    );

    g.rule(
        "Struct",
        structure(vec![
            anon(token("LBRACE")),
            anon(rule("statement_sep")),
            field(
                "fields",
                list_min(rule("struct_field"), rule("field_sep"), 1),
            ),
            anon(rule("statement_sep")),
            anon(token("RBRACE")),
        ]),
    );

    g.rule(
        "field_sep",
        sequence(vec![rule("opt_ws"), token("COMMA"), rule("statement_sep")]),
    );

    g.rule(
        "struct_field",
        structure(vec![
            field("name", optional(text(token("IDENT")))),
            anon(rule("opt_ws")),
            anon(token("COLON")),
            anon(rule("opt_ws")),
            field("value", rule("expression")),
        ]),
    );

    g.rule(
        "List",
        structure(vec![
            anon(token("LBRACKET")),
            anon(rule("opt_ws")),
            field("item", rule("expression")),
            anon(rule("opt_ws")),
            anon(token("COMMA")),
            anon(rule("opt_ws")),
            field("separator", rule("expression")),
            anon(rule("opt_ws")),
            anon(token("RBRACKET")),
        ]),
    );

    g.rule(
        "statement_sep",
        sequence(vec![
            rule("opt_ws"),
            token("NEWLINE"),
            zero_or_more(choice(vec![token("WHITESPACE"), token("NEWLINE")])),
        ]),
    );

    g.rule("ws", token("WHITESPACE"));
    g.rule("opt_ws", optional(token("WHITESPACE")));

    g.build()
}

/// `atomic (ws atomic)+` comes out as `(first, [(ws, atom), ..])`; sequence
/// elements are the atoms alone, in order.
fn flatten_sequence(value: Value) -> Value {
    match value {
        Value::Tuple(parts) => {
            let mut iter = parts.into_iter();
            let first = iter.next().unwrap_or(Value::Null);
            let mut items = vec![first];
            if let Some(Value::List(pairs)) = iter.next() {
                for pair in pairs {
                    if let Value::Tuple(pair) = pair {
                        if let Some(atom) = pair.into_iter().nth(1) {
                            items.push(atom);
                        }
                    }
                }
            }
            Value::List(items)
        }
        other => other,
    }
}
