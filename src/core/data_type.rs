use super::error::DatabaseError;
use super::value::{parse_datetime, Value};
use crate::config::OverflowPolicy;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Int,
    Decimal { precision: u8, scale: u8 }, // DECIMAL(p, s)
    Varchar { max_length: usize },        // VARCHAR(n)
    Text,
    DateTime,
}

impl DataType {
    pub const DEFAULT_DECIMAL: Self = Self::Decimal { precision: 10, scale: 0 };

    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int)
    }

    /// Coerce a value into this type for storage in `column`.
    ///
    /// NULL passes through untouched; nullability is a column concern.
    pub fn coerce(
        &self,
        column: &str,
        value: Value,
        overflow: OverflowPolicy,
    ) -> Result<Value, DatabaseError> {
        if value.is_null() {
            return Ok(value);
        }

        match self {
            Self::Int => match value {
                Value::Integer(_) => Ok(value),
                Value::Decimal(d) if d.fract().is_zero() => i64::try_from(d)
                    .map(Value::Integer)
                    .map_err(|_| DatabaseError::OutOfRange {
                        column: column.to_string(),
                        value: d.to_string(),
                    }),
                other => Err(self.mismatch(column, &other)),
            },
            Self::Decimal { precision, scale } => {
                let decimal = value
                    .as_decimal()
                    .ok_or_else(|| self.mismatch(column, &value))?;
                let mut rounded = decimal.round_dp_with_strategy(
                    u32::from(*scale),
                    RoundingStrategy::MidpointAwayFromZero,
                );
                rounded.rescale(u32::from(*scale));

                let integer_digits = integer_digit_count(rounded);
                if integer_digits > u32::from(precision.saturating_sub(*scale)) {
                    return Err(DatabaseError::OutOfRange {
                        column: column.to_string(),
                        value: decimal.to_string(),
                    });
                }
                Ok(Value::Decimal(rounded))
            }
            Self::Varchar { max_length } => match value {
                Value::Text(s) => {
                    let length = s.chars().count();
                    if length <= *max_length {
                        return Ok(Value::Text(s));
                    }
                    match overflow {
                        OverflowPolicy::Error => Err(DatabaseError::ValueTooLong {
                            column: column.to_string(),
                            max_length: *max_length,
                        }),
                        OverflowPolicy::Truncate => {
                            log::warn!(
                                "truncating {length} characters to {max_length} for column '{column}'"
                            );
                            Ok(Value::Text(s.chars().take(*max_length).collect()))
                        }
                    }
                }
                other => Err(self.mismatch(column, &other)),
            },
            Self::Text => match value {
                Value::Text(_) => Ok(value),
                other => Err(self.mismatch(column, &other)),
            },
            Self::DateTime => match value {
                Value::DateTime(_) => Ok(value),
                Value::Text(ref s) => parse_datetime(s)
                    .map(Value::DateTime)
                    .ok_or_else(|| self.mismatch(column, &value)),
                other => Err(self.mismatch(column, &other)),
            },
        }
    }

    fn mismatch(&self, column: &str, value: &Value) -> DatabaseError {
        DatabaseError::TypeMismatch {
            column: column.to_string(),
            expected: self.to_string(),
            value: value.to_string(),
        }
    }
}

fn integer_digit_count(value: Decimal) -> u32 {
    let mut whole = value.trunc().abs();
    let ten = Decimal::TEN;
    let mut digits = 0;
    while !whole.is_zero() {
        whole = (whole / ten).trunc();
        digits += 1;
    }
    digits
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Varchar { max_length } => write!(f, "varchar({max_length})"),
            Self::Text => write!(f, "text"),
            Self::DateTime => write!(f, "datetime"),
        }
    }
}
