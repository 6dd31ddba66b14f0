/// DML (Data Manipulation Language) operations
///
/// INSERT, UPDATE and DELETE. Each statement is all-or-nothing: the row
/// store validates every change before applying any of them.

use super::conditions::ConditionEvaluator;
use super::expressions::{ExpressionEvaluator, Scope};
use super::functions::FunctionContext;
use super::QueryResult;
use crate::parser::{Condition, Expression};
use crate::storage::WriteContext;
use crate::types::{DatabaseError, Table};
use log::debug;

pub struct DmlExecutor;

impl DmlExecutor {
    /// Execute INSERT statement
    ///
    /// VALUES tuples are evaluated without a row in scope, so column
    /// references inside them fail with `UnknownColumn`.
    pub fn insert(
        table: &mut Table,
        columns: Option<&[String]>,
        rows: &[Vec<Expression>],
        ctx: &FunctionContext<'_>,
        write: &WriteContext,
    ) -> Result<QueryResult, DatabaseError> {
        let tuples = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|expr| ExpressionEvaluator::evaluate(expr, &Scope::EMPTY, ctx))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let outcome = table.store.insert(&table.columns, columns, tuples, write)?;
        debug!("inserted {} row(s) into {}", outcome.row_ids.len(), table.name);

        Ok(QueryResult::Mutation {
            affected: outcome.row_ids.len(),
            last_insert_id: outcome.first_generated_id,
        })
    }

    /// Execute UPDATE statement
    ///
    /// Right-hand sides see the row as it was before the statement.
    /// Returns the number of matched rows.
    pub fn update(
        table: &mut Table,
        assignments: &[(String, Expression)],
        filter: Option<&Condition>,
        ctx: &FunctionContext<'_>,
        write: &WriteContext,
    ) -> Result<QueryResult, DatabaseError> {
        let targets = assignments
            .iter()
            .map(|(name, expr)| Ok((table.column_index(name)?, expr)))
            .collect::<Result<Vec<_>, DatabaseError>>()?;
        for (_, expr) in &targets {
            ExpressionEvaluator::validate(expr, &table.columns)?;
        }
        if let Some(filter) = filter {
            ConditionEvaluator::validate(filter, &table.columns)?;
        }

        let columns = &table.columns;
        let matched = table.store.update_where(
            columns,
            |row| match filter {
                Some(filter) => ConditionEvaluator::matches(filter, &Scope::new(columns, &row.values), ctx),
                None => Ok(true),
            },
            |row| {
                let scope = Scope::new(columns, &row.values);
                targets
                    .iter()
                    .map(|(idx, expr)| Ok((*idx, ExpressionEvaluator::evaluate(expr, &scope, ctx)?)))
                    .collect()
            },
            write,
        )?;
        debug!("updated {matched} row(s) in {}", table.name);

        Ok(QueryResult::Mutation {
            affected: matched,
            last_insert_id: None,
        })
    }

    /// Execute DELETE statement. Without WHERE every row goes; the
    /// AUTO_INCREMENT counter is kept either way.
    pub fn delete(
        table: &mut Table,
        filter: Option<&Condition>,
        ctx: &FunctionContext<'_>,
    ) -> Result<QueryResult, DatabaseError> {
        let deleted = match filter {
            None => table.store.truncate(),
            Some(filter) => {
                ConditionEvaluator::validate(filter, &table.columns)?;
                let columns = &table.columns;
                table.store.delete_where(columns, |row| {
                    ConditionEvaluator::matches(filter, &Scope::new(columns, &row.values), ctx)
                })?
            }
        };
        debug!("deleted {deleted} row(s) from {}", table.name);

        Ok(QueryResult::Mutation {
            affected: deleted,
            last_insert_id: None,
        })
    }
}
