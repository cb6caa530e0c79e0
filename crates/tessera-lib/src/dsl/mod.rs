//! The self-hosted DSL frontend.
//!
//! Grammar descriptions are parsed by a fixed grammar expressed in this
//! crate's own combinator algebra ([`grammar::bootstrap`]), then lowered
//! structurally into a new [`GrammarBuilder`](crate::GrammarBuilder).
//! Parsing a user grammar is therefore just another `parse` call.

mod escape;
mod grammar;
mod lower;


use tessera_core::AstNode;

use crate::diagnostics::ParseError;

pub(crate) use grammar::bootstrap;
pub(crate) use lower::lower_program;

/// Parses DSL source into its AST without lowering it.
///
/// This is the contract point for downstream tooling (e.g. type-declaration
/// generators): the returned tree uses the bootstrap grammar's stable node
/// kinds (`Program`, `TerminalRule`, `NonTerminalRule`, `Struct`, `List`,
/// `Read`, `Choice`, `Sequence`, `Empty`, `StringLiteral`, `RegExp`).
pub fn parse(source: &str) -> Result<AstNode, ParseError> {
    bootstrap().parse(source)
}
