/// Scalar function library
///
/// Every function is a pure mapping from argument values to one value.
/// Unless stated otherwise a NULL argument yields NULL.

use crate::parser::TrimSide;
use crate::types::{DatabaseError, Value};
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::RoundingStrategy;
use std::ops::RangeInclusive;

/// Statement-wide inputs available to functions.
#[derive(Debug, Clone, Copy)]
pub struct FunctionContext<'a> {
    pub now: NaiveDateTime,
    pub current_database: Option<&'a str>,
}

/// Largest string a function may build, in bytes.
pub const MAX_RESULT_BYTES: usize = 64 * 1024 * 1024;

/// Accepted argument counts, or `None` for an unknown function.
#[must_use]
pub fn arity(name: &str) -> Option<RangeInclusive<usize>> {
    let range = match name {
        "CONCAT" => 1..=usize::MAX,
        "CONCAT_WS" => 2..=usize::MAX,
        "SUBSTRING" | "SUBSTR" => 2..=3,
        "REPLACE" => 3..=3,
        "REVERSE" | "CHAR_LENGTH" | "CHARACTER_LENGTH" | "LENGTH" | "UPPER" | "UCASE" | "LOWER"
        | "LCASE" | "LTRIM" | "RTRIM" => 1..=1,
        "TRIM" => 1..=2,
        "LEFT" | "RIGHT" | "REPEAT" => 2..=2,
        "NOW" | "CURRENT_TIMESTAMP" | "DATABASE" | "SCHEMA" => 0..=0,
        _ => return None,
    };
    Some(range)
}

/// Reject unknown names and wrong argument counts.
pub fn check_call(name: &str, argc: usize) -> Result<(), DatabaseError> {
    let range = arity(name).ok_or_else(|| DatabaseError::UnknownFunction(name.to_string()))?;
    if range.contains(&argc) {
        Ok(())
    } else {
        Err(DatabaseError::InvalidArguments(name.to_string()))
    }
}

pub fn call(name: &str, args: Vec<Value>, ctx: &FunctionContext<'_>) -> Result<Value, DatabaseError> {
    check_call(name, args.len())?;

    match name {
        "NOW" | "CURRENT_TIMESTAMP" => return Ok(Value::DateTime(ctx.now)),
        "DATABASE" | "SCHEMA" => {
            return Ok(ctx.current_database.map_or(Value::Null, Value::from));
        }
        "CONCAT_WS" => return Ok(concat_ws(&args)),
        _ => {}
    }

    if args.iter().any(Value::is_null) {
        return Ok(Value::Null);
    }

    let text = text_of(&args[0]);
    let result = match name {
        "CONCAT" => Value::Text(args.iter().map(text_of).collect()),
        "SUBSTRING" | "SUBSTR" => {
            let start = int_arg(name, &args[1])?;
            let len = args.get(2).map(|v| int_arg(name, v)).transpose()?;
            Value::Text(substring(&text, start, len))
        }
        "REPLACE" => {
            let find = text_of(&args[1]);
            if find.is_empty() {
                Value::Text(text)
            } else {
                Value::Text(text.replace(&find, &text_of(&args[2])))
            }
        }
        "REVERSE" => Value::Text(text.chars().rev().collect()),
        "CHAR_LENGTH" | "CHARACTER_LENGTH" => Value::Integer(count(text.chars().count())),
        "LENGTH" => Value::Integer(count(text.len())),
        "UPPER" | "UCASE" => Value::Text(text.to_uppercase()),
        "LOWER" | "LCASE" => Value::Text(text.to_lowercase()),
        "LEFT" => {
            let n = clamp_len(int_arg(name, &args[1])?);
            Value::Text(text.chars().take(n).collect())
        }
        "RIGHT" => {
            let n = clamp_len(int_arg(name, &args[1])?);
            let skip = text.chars().count().saturating_sub(n);
            Value::Text(text.chars().skip(skip).collect())
        }
        "REPEAT" => {
            let n = clamp_len(int_arg(name, &args[1])?);
            // results past the cap are NULL, like MySQL past max_allowed_packet
            match text.len().checked_mul(n) {
                Some(len) if len <= MAX_RESULT_BYTES => Value::Text(text.repeat(n)),
                _ => Value::Null,
            }
        }
        "TRIM" => {
            let remove = args.get(1).map_or_else(|| " ".to_string(), text_of);
            Value::Text(trim(&text, &remove, TrimSide::Both))
        }
        "LTRIM" => Value::Text(trim(&text, " ", TrimSide::Leading)),
        "RTRIM" => Value::Text(trim(&text, " ", TrimSide::Trailing)),
        _ => return Err(DatabaseError::UnknownFunction(name.to_string())),
    };
    Ok(result)
}

/// `TRIM([side] [remove] FROM source)`; `remove` defaults to a single space.
#[must_use]
pub fn trim_value(side: TrimSide, remove: Option<&Value>, source: &Value) -> Value {
    if source.is_null() || remove.is_some_and(Value::is_null) {
        return Value::Null;
    }
    let remove = remove.map_or_else(|| " ".to_string(), text_of);
    Value::Text(trim(&text_of(source), &remove, side))
}

fn trim(text: &str, remove: &str, side: TrimSide) -> String {
    if remove.is_empty() {
        return text.to_string();
    }
    let mut rest = text;
    if matches!(side, TrimSide::Both | TrimSide::Leading) {
        while let Some(stripped) = rest.strip_prefix(remove) {
            rest = stripped;
        }
    }
    if matches!(side, TrimSide::Both | TrimSide::Trailing) {
        while let Some(stripped) = rest.strip_suffix(remove) {
            rest = stripped;
        }
    }
    rest.to_string()
}

// NULL separator gives NULL, NULL arguments are skipped
fn concat_ws(args: &[Value]) -> Value {
    let Some((separator, parts)) = args.split_first() else {
        return Value::Null;
    };
    if separator.is_null() {
        return Value::Null;
    }
    let joined = parts
        .iter()
        .filter(|v| !v.is_null())
        .map(text_of)
        .collect::<Vec<_>>()
        .join(text_of(separator).as_str());
    Value::Text(joined)
}

/// 1-based substring; a negative start counts from the end.
fn substring(text: &str, start: i64, len: Option<i64>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let total = i64::try_from(chars.len()).unwrap_or(i64::MAX);

    let begin = match start {
        0 => return String::new(),
        s if s > 0 => s - 1,
        s => total + s,
    };
    if begin < 0 || begin >= total {
        return String::new();
    }

    let end = match len {
        Some(l) if l <= 0 => return String::new(),
        Some(l) => begin.saturating_add(l).min(total),
        None => total,
    };
    let begin = usize::try_from(begin).unwrap_or(0);
    let end = usize::try_from(end).unwrap_or(begin);
    chars[begin..end].iter().collect()
}

pub fn text_of(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        other => other.to_string(),
    }
}

fn int_arg(name: &str, value: &Value) -> Result<i64, DatabaseError> {
    let parsed = match value {
        Value::Integer(i) => Some(*i),
        Value::Decimal(d) => d
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64(),
        Value::Text(s) => s.trim().parse().ok(),
        Value::Null | Value::DateTime(_) => None,
    };
    parsed.ok_or_else(|| DatabaseError::InvalidArguments(name.to_string()))
}

fn clamp_len(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
