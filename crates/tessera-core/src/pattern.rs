//! Token declarations: the lexical layer of a grammar description.

use serde::{Deserialize, Serialize};

/// How a token kind matches source text.
///
/// Literals match verbatim. Regexes are matched anchored at the current
/// position, so each pattern controls its own greediness; there is no
/// maximal munch across kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Literal(String),
    Regex(String),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Pattern::Regex(pattern.into())
    }
}

/// A named token declaration.
///
/// Declaration order is semantic: it is the lexer's tie-break for ambiguous
/// prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDecl {
    pub name: String,
    pub pattern: Pattern,
}

impl TokenDecl {
    pub fn new(name: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}
