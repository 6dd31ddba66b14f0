/// Condition evaluation for WHERE clauses
///
/// Conditions use three-valued logic: `Some(true)`, `Some(false)`, or `None`
/// for UNKNOWN. Only `Some(true)` keeps a row.

use super::expressions::{ExpressionEvaluator, Scope};
use super::functions::{text_of, FunctionContext};
use crate::parser::{CompareOp, Condition, Expression};
use crate::types::{Column, DatabaseError, Value};
use std::cmp::Ordering;

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// True only when the condition is TRUE for this row.
    pub fn matches(
        condition: &Condition,
        scope: &Scope<'_>,
        ctx: &FunctionContext<'_>,
    ) -> Result<bool, DatabaseError> {
        Ok(Self::evaluate(condition, scope, ctx)? == Some(true))
    }

    pub fn evaluate(
        condition: &Condition,
        scope: &Scope<'_>,
        ctx: &FunctionContext<'_>,
    ) -> Result<Option<bool>, DatabaseError> {
        let eval = |expr: &Expression| ExpressionEvaluator::evaluate(expr, scope, ctx);

        match condition {
            Condition::Comparison { left, op, right } => {
                let ordering = eval(left)?.compare(&eval(right)?);
                Ok(ordering.map(|o| Self::apply_op(*op, o)))
            }
            Condition::Like {
                expr,
                pattern,
                negated,
            } => {
                let value = eval(expr)?;
                let pattern = eval(pattern)?;
                if value.is_null() || pattern.is_null() {
                    return Ok(None);
                }
                let matched = like_match(&text_of(&value), &text_of(&pattern));
                Ok(Some(matched != *negated))
            }
            Condition::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let value = eval(expr)?;
                let above = value.compare(&eval(low)?).map(Ordering::is_ge);
                let below = value.compare(&eval(high)?).map(Ordering::is_le);
                Ok(and3(above, below).map(|b| b != *negated))
            }
            Condition::In {
                expr,
                list,
                negated,
            } => {
                let value = eval(expr)?;
                let mut result = Some(false);
                for item in list {
                    match value.sql_eq(&eval(item)?) {
                        Some(true) => {
                            result = Some(true);
                            break;
                        }
                        Some(false) => {}
                        None => result = None,
                    }
                }
                Ok(result.map(|b| b != *negated))
            }
            Condition::IsNull { expr, negated } => Ok(Some(eval(expr)?.is_null() != *negated)),
            Condition::Not(inner) => Ok(Self::evaluate(inner, scope, ctx)?.map(|b| !b)),
            Condition::And(left, right) => {
                let left = Self::evaluate(left, scope, ctx)?;
                if left == Some(false) {
                    return Ok(left);
                }
                Ok(and3(left, Self::evaluate(right, scope, ctx)?))
            }
            Condition::Or(left, right) => {
                let left = Self::evaluate(left, scope, ctx)?;
                if left == Some(true) {
                    return Ok(left);
                }
                Ok(or3(left, Self::evaluate(right, scope, ctx)?))
            }
        }
    }

    /// Check every expression of the condition against the available columns.
    pub fn validate(condition: &Condition, columns: &[Column]) -> Result<(), DatabaseError> {
        let check = |expr: &Expression| ExpressionEvaluator::validate(expr, columns);
        match condition {
            Condition::Comparison { left, right, .. } => {
                check(left)?;
                check(right)
            }
            Condition::Like { expr, pattern, .. } => {
                check(expr)?;
                check(pattern)
            }
            Condition::Between { expr, low, high, .. } => {
                check(expr)?;
                check(low)?;
                check(high)
            }
            Condition::In { expr, list, .. } => {
                check(expr)?;
                list.iter().try_for_each(check)
            }
            Condition::IsNull { expr, .. } => check(expr),
            Condition::Not(inner) => Self::validate(inner, columns),
            Condition::And(left, right) | Condition::Or(left, right) => {
                Self::validate(left, columns)?;
                Self::validate(right, columns)
            }
        }
    }

    const fn apply_op(op: CompareOp, ordering: Ordering) -> bool {
        match op {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::NotEq => ordering.is_ne(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::LtEq => ordering.is_le(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::GtEq => ordering.is_ge(),
        }
    }
}

fn and3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn or3(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// `%`
    AnyRun,
    /// `_`
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars().flat_map(char::to_lowercase).peekable();
    while let Some(c) = chars.next() {
        let token = match c {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            // a backslash escapes only a following wildcard
            '\\' => match chars.peek() {
                Some(&w @ ('%' | '_')) => {
                    chars.next();
                    Token::Literal(w)
                }
                _ => Token::Literal('\\'),
            },
            other => Token::Literal(other),
        };
        tokens.push(token);
    }
    tokens
}

/// Case-insensitive LIKE match.
#[must_use]
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let pattern = tokenize(pattern);

    let (mut ti, mut pi) = (0, 0);
    // position of the last `%` seen and the text index it is currently covering
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some(Token::AnyRun) => {
                backtrack = Some((pi, ti));
                pi += 1;
            }
            Some(Token::AnyOne) => {
                ti += 1;
                pi += 1;
            }
            Some(Token::Literal(c)) if *c == text[ti] => {
                ti += 1;
                pi += 1;
            }
            _ => match backtrack {
                Some((star, covered)) => {
                    pi = star + 1;
                    ti = covered + 1;
                    backtrack = Some((star, covered + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|t| *t == Token::AnyRun)
}
