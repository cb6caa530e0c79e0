//! The recursive-descent evaluator that drives a rule table over a token
//! stream.
//!
//! Evaluation is functional over the input position: success carries the
//! next position, the produced value, and the tokens consumed in order;
//! failure carries the error and leaves the caller's position untouched.
//! Backtracking happens only in `optional`, `choice`, and the repetition
//! guards - once a sequence's first element succeeds, a later failure is
//! fatal for that sequence. That commit discipline is what makes the
//! furthest-error heuristic in `choice` meaningful.

use tessera_core::{AstNode, Span, Token, Value, token_text};

use crate::diagnostics::{ErrorKind, RuleError};
use crate::grammar::table::{RuleId, RuleNode, RuleTable};

/// Evaluation depth bound. Grammars are finite but inputs nest arbitrarily;
/// exceeding the bound raises a fatal error instead of overflowing the
/// stack.
const MAX_DEPTH: u32 = 2048;

/// A successful rule evaluation.
pub(crate) struct Match {
    pub pos: usize,
    pub value: Value,
    pub consumed: Vec<Token>,
}

impl Match {
    fn empty(pos: usize) -> Self {
        Match {
            pos,
            value: Value::Null,
            consumed: Vec::new(),
        }
    }
}

pub(crate) type RuleResult = Result<Match, RuleError>;

pub(crate) struct Evaluator<'g, 'src> {
    table: &'g RuleTable,
    source: &'src str,
    tokens: &'src [Token],
}

impl<'g, 'src> Evaluator<'g, 'src> {
    pub fn new(table: &'g RuleTable, source: &'src str, tokens: &'src [Token]) -> Self {
        Self {
            table,
            source,
            tokens,
        }
    }

    pub fn run(&self, id: RuleId, pos: usize) -> RuleResult {
        self.eval(id, pos, 0)
    }

    /// Span of the token at `pos`, or the end-of-input span.
    fn span_at(&self, pos: usize) -> Span {
        self.tokens
            .get(pos)
            .map_or(Span::empty(self.source.len()), |t| t.span)
    }

    fn eval(&self, id: RuleId, pos: usize, depth: u32) -> RuleResult {
        if depth >= MAX_DEPTH {
            return Err(RuleError::new(ErrorKind::RecursionLimit, self.span_at(pos)));
        }
        let depth = depth + 1;

        match self.table.node(id) {
            RuleNode::Token(kind) => match self.tokens.get(pos) {
                Some(token) if token.kind == *kind => Ok(Match {
                    pos: pos + 1,
                    value: Value::Token(*token),
                    consumed: vec![*token],
                }),
                _ => Err(RuleError::new(
                    ErrorKind::ExpectedToken(self.table.token_name(*kind).to_owned()),
                    self.span_at(pos),
                )),
            },

            RuleNode::Empty => Ok(Match::empty(pos)),

            RuleNode::Eof => {
                if pos >= self.tokens.len() {
                    Ok(Match::empty(pos))
                } else {
                    Err(RuleError::new(
                        ErrorKind::ExpectedEndOfInput,
                        self.tokens[pos].span,
                    ))
                }
            }

            RuleNode::Alias(inner) => self.eval(*inner, pos, depth),

            RuleNode::Optional(inner) => match self.eval(*inner, pos, depth) {
                Ok(m) => Ok(m),
                Err(e) if e.is_fatal() => Err(e),
                Err(_) => Ok(Match::empty(pos)),
            },

            RuleNode::Sequence(items) => {
                let mut cur = pos;
                let mut values = Vec::with_capacity(items.len());
                let mut consumed = Vec::new();
                for item in items {
                    let m = self.eval(*item, cur, depth)?;
                    cur = m.pos;
                    values.push(m.value);
                    consumed.extend(m.consumed);
                }
                Ok(Match {
                    pos: cur,
                    value: Value::Tuple(values),
                    consumed,
                })
            }

            RuleNode::Choice(alternatives) => {
                if alternatives.is_empty() {
                    return Err(RuleError::new(ErrorKind::NoChoices, self.span_at(pos)));
                }
                // On total failure, report the alternative that got
                // furthest; ties keep the earliest declared one.
                let mut best: Option<RuleError> = None;
                for alternative in alternatives {
                    match self.eval(*alternative, pos, depth) {
                        Ok(m) => return Ok(m),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            if best.as_ref().is_none_or(|b| e.span.start > b.span.start) {
                                best = Some(e);
                            }
                        }
                    }
                }
                Err(best.expect("choice has at least one alternative"))
            }

            RuleNode::ZeroOrMore(inner) => {
                let mut items = Vec::new();
                let mut consumed = Vec::new();
                let mut cur = pos;
                loop {
                    match self.eval(*inner, cur, depth) {
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(_) => break,
                        Ok(m) => {
                            let advanced = m.pos > cur;
                            cur = m.pos;
                            items.push(m.value);
                            consumed.extend(m.consumed);
                            // Zero-length success: stop rather than loop.
                            if !advanced {
                                break;
                            }
                        }
                    }
                }
                Ok(Match {
                    pos: cur,
                    value: Value::List(items),
                    consumed,
                })
            }

            RuleNode::OneOrMore(inner) => {
                let first = self.eval(*inner, pos, depth)?;
                let advanced = first.pos > pos;
                let mut cur = first.pos;
                let mut items = vec![first.value];
                let mut consumed = first.consumed;
                if advanced {
                    loop {
                        match self.eval(*inner, cur, depth) {
                            Err(e) if e.is_fatal() => return Err(e),
                            Err(_) => break,
                            Ok(m) => {
                                let advanced = m.pos > cur;
                                cur = m.pos;
                                items.push(m.value);
                                consumed.extend(m.consumed);
                                if !advanced {
                                    break;
                                }
                            }
                        }
                    }
                }
                Ok(Match {
                    pos: cur,
                    value: Value::List(items),
                    consumed,
                })
            }

            RuleNode::List {
                item,
                separator,
                min_len,
            } => self.eval_list(*item, *separator, *min_len, pos, depth),

            RuleNode::Map { inner, f } => {
                let m = self.eval(*inner, pos, depth)?;
                Ok(Match {
                    pos: m.pos,
                    value: f.apply(m.value),
                    consumed: m.consumed,
                })
            }

            RuleNode::Text(inner) => {
                let m = self.eval(*inner, pos, depth)?;
                let mut text = String::new();
                for token in &m.consumed {
                    text.push_str(token_text(self.source, token));
                }
                Ok(Match {
                    pos: m.pos,
                    value: Value::Text(text),
                    consumed: m.consumed,
                })
            }

            RuleNode::Struct(fields) => {
                let mut cur = pos;
                let mut record = Vec::new();
                let mut consumed = Vec::new();
                for (name, field_rule) in fields {
                    let m = self.eval(*field_rule, cur, depth)?;
                    cur = m.pos;
                    consumed.extend(m.consumed);
                    if let Some(name) = name {
                        record.push((name.clone(), m.value));
                    }
                }
                Ok(Match {
                    pos: cur,
                    value: Value::Record(record),
                    consumed,
                })
            }

            RuleNode::Node { kind, inner } => {
                let m = self.eval(*inner, pos, depth)?;
                let spans = m.consumed.iter().map(|t| t.span).collect();
                let node = AstNode::with_tokens(kind.clone(), m.value, spans);
                Ok(Match {
                    pos: m.pos,
                    value: Value::Node(Box::new(node)),
                    consumed: m.consumed,
                })
            }
        }
    }

    /// `item` then `(separator item)` repeated. The separator's value is
    /// dropped (its tokens are still consumed); below the minimum length
    /// every failure is hard, at or above it the list ends *before* a
    /// trailing separator so the enclosing rule fails at it.
    fn eval_list(
        &self,
        item: RuleId,
        separator: RuleId,
        min_len: usize,
        pos: usize,
        depth: u32,
    ) -> RuleResult {
        let mut items = Vec::new();
        let mut consumed = Vec::new();
        let mut cur = pos;

        match self.eval(item, cur, depth) {
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                if min_len == 0 {
                    return Ok(Match {
                        pos,
                        value: Value::List(Vec::new()),
                        consumed: Vec::new(),
                    });
                }
                return Err(e);
            }
            Ok(m) => {
                cur = m.pos;
                items.push(m.value);
                consumed.extend(m.consumed);
            }
        }

        loop {
            let sep = match self.eval(separator, cur, depth) {
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    if items.len() < min_len {
                        return Err(e);
                    }
                    break;
                }
                Ok(m) => m,
            };
            match self.eval(item, sep.pos, depth) {
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    if items.len() < min_len {
                        return Err(e);
                    }
                    break;
                }
                Ok(m) => {
                    // Zero-length separator + item: stop rather than loop.
                    if m.pos == cur {
                        break;
                    }
                    cur = m.pos;
                    consumed.extend(sep.consumed);
                    consumed.extend(m.consumed);
                    items.push(m.value);
                }
            }
        }

        Ok(Match {
            pos: cur,
            value: Value::List(items),
            consumed,
        })
    }
}
