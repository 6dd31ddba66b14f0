use super::functions::{self, FunctionContext};
use crate::parser::Expression;
use crate::types::{Column, DatabaseError, Value};

/// Column values visible to an expression: one source row.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub columns: &'a [Column],
    pub values: &'a [Value],
}

impl<'a> Scope<'a> {
    /// Scope with no columns, used for VALUES tuples and SELECT without FROM.
    pub const EMPTY: Scope<'static> = Scope {
        columns: &[],
        values: &[],
    };

    #[must_use]
    pub const fn new(columns: &'a [Column], values: &'a [Value]) -> Self {
        Self { columns, values }
    }

    pub fn lookup(&self, name: &str) -> Result<&'a Value, DatabaseError> {
        self.columns
            .iter()
            .position(|c| c.matches_name(name))
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| DatabaseError::UnknownColumn(name.to_string()))
    }
}

pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn evaluate(
        expr: &Expression,
        scope: &Scope<'_>,
        ctx: &FunctionContext<'_>,
    ) -> Result<Value, DatabaseError> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Column(name) => scope.lookup(name).cloned(),
            Expression::Function { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| Self::evaluate(arg, scope, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::call(name, args, ctx)
            }
            Expression::Trim {
                side,
                remove,
                source,
            } => {
                let source = Self::evaluate(source, scope, ctx)?;
                let remove = remove
                    .as_deref()
                    .map(|r| Self::evaluate(r, scope, ctx))
                    .transpose()?;
                Ok(functions::trim_value(*side, remove.as_ref(), &source))
            }
        }
    }

    /// Check column references and function calls without evaluating, so
    /// statements against empty tables report the same errors.
    pub fn validate(expr: &Expression, columns: &[Column]) -> Result<(), DatabaseError> {
        match expr {
            Expression::Literal(_) => Ok(()),
            Expression::Column(name) => {
                if columns.iter().any(|c| c.matches_name(name)) {
                    Ok(())
                } else {
                    Err(DatabaseError::UnknownColumn(name.clone()))
                }
            }
            Expression::Function { name, args } => {
                functions::check_call(name, args.len())?;
                args.iter().try_for_each(|arg| Self::validate(arg, columns))
            }
            Expression::Trim { remove, source, .. } => {
                if let Some(remove) = remove {
                    Self::validate(remove, columns)?;
                }
                Self::validate(source, columns)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TrimSide;
    use crate::types::DataType;
    use chrono::NaiveDate;

    fn ctx() -> FunctionContext<'static> {
        FunctionContext {
            now: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            current_database: None,
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("author_fname", DataType::Text),
            Column::new("author_lname", DataType::Text),
        ]
    }

    #[test]
    fn test_composed_functions() {
        let columns = columns();
        let values = vec![Value::from("Dave"), Value::from("Eggers")];
        let scope = Scope::new(&columns, &values);

        let expr = Expression::Function {
            name: "UPPER".to_string(),
            args: vec![Expression::Function {
                name: "CONCAT".to_string(),
                args: vec![
                    Expression::Column("author_fname".to_string()),
                    Expression::Literal(Value::from(" ")),
                    Expression::Column("AUTHOR_LNAME".to_string()),
                ],
            }],
        };
        assert_eq!(
            ExpressionEvaluator::evaluate(&expr, &scope, &ctx()).unwrap(),
            Value::from("DAVE EGGERS")
        );
    }

    #[test]
    fn test_trim_expression() {
        let expr = Expression::Trim {
            side: TrimSide::Trailing,
            remove: Some(Box::new(Expression::Literal(Value::from("!")))),
            source: Box::new(Expression::Literal(Value::from("wow!!!"))),
        };
        assert_eq!(
            ExpressionEvaluator::evaluate(&expr, &Scope::EMPTY, &ctx()).unwrap(),
            Value::from("wow")
        );
    }

    #[test]
    fn test_validate_reports_unknown_names() {
        let columns = columns();
        let unknown_column = Expression::Function {
            name: "UPPER".to_string(),
            args: vec![Expression::Column("title".to_string())],
        };
        assert!(matches!(
            ExpressionEvaluator::validate(&unknown_column, &columns),
            Err(DatabaseError::UnknownColumn(_))
        ));

        let unknown_function = Expression::Function {
            name: "FROBNICATE".to_string(),
            args: vec![],
        };
        assert!(matches!(
            ExpressionEvaluator::validate(&unknown_function, &columns),
            Err(DatabaseError::UnknownFunction(_))
        ));
    }
}
