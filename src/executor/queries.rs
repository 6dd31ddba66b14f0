/// SELECT execution
///
/// Pipeline: scan -> WHERE -> projection -> DISTINCT -> ORDER BY -> OFFSET/LIMIT.
/// Sorting always sees the whole filtered result before the limit is applied.

use super::conditions::ConditionEvaluator;
use super::expressions::{ExpressionEvaluator, Scope};
use super::functions::FunctionContext;
use super::ResultSet;
use crate::config::NullOrdering;
use crate::parser::{Condition, Expression, OrderByItem, SelectItem, SortKey, SortOrder};
use crate::types::{Column, DatabaseError, Table, Value};
use log::trace;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Borrowed view of a SELECT statement.
#[derive(Debug, Clone, Copy)]
pub struct SelectQuery<'a> {
    pub distinct: bool,
    pub items: &'a [SelectItem],
    pub filter: Option<&'a Condition>,
    pub order_by: &'a [OrderByItem],
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

struct OutputColumn {
    label: String,
    expr: Expression,
}

enum SortSource<'a> {
    /// Index into the projected row
    Output(usize),
    /// Evaluated against the source row
    Source(&'a Expression),
}

pub struct SelectExecutor;

impl SelectExecutor {
    /// Run a SELECT over `table`, or over a single empty row when there is no
    /// FROM clause.
    pub fn execute(
        table: Option<&Table>,
        query: &SelectQuery<'_>,
        null_ordering: NullOrdering,
        ctx: &FunctionContext<'_>,
    ) -> Result<ResultSet, DatabaseError> {
        let columns: &[Column] = table.map_or(&[][..], |t| t.columns.as_slice());

        let outputs = Self::expand_items(query.items, table)?;
        for output in &outputs {
            ExpressionEvaluator::validate(&output.expr, columns)?;
        }
        if let Some(filter) = query.filter {
            ConditionEvaluator::validate(filter, columns)?;
        }
        let sort_keys = Self::resolve_sort_keys(query.order_by, &outputs, columns)?;

        let source_rows: Vec<&[Value]> = match table {
            Some(table) => table.scan().map(|row| row.values.as_slice()).collect(),
            None => vec![&[][..]],
        };

        let mut results: Vec<(Vec<Value>, Vec<Value>)> = Vec::new();
        for values in source_rows {
            let scope = Scope::new(columns, values);
            if let Some(filter) = query.filter {
                if !ConditionEvaluator::matches(filter, &scope, ctx)? {
                    continue;
                }
            }

            let projected = outputs
                .iter()
                .map(|output| ExpressionEvaluator::evaluate(&output.expr, &scope, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            let keys = sort_keys
                .iter()
                .map(|(source, _)| match source {
                    SortSource::Output(idx) => Ok(projected[*idx].clone()),
                    SortSource::Source(expr) => ExpressionEvaluator::evaluate(expr, &scope, ctx),
                })
                .collect::<Result<Vec<_>, _>>()?;
            results.push((projected, keys));
        }
        trace!("select matched {} row(s)", results.len());

        if query.distinct {
            let mut seen = HashSet::new();
            results.retain(|(row, _)| seen.insert(row.iter().map(Value::key).collect::<Vec<_>>()));
        }

        if !sort_keys.is_empty() {
            // stable: rows with equal keys keep scan order
            results.sort_by(|(_, a), (_, b)| {
                a.iter()
                    .zip(b)
                    .zip(&sort_keys)
                    .map(|((a, b), (_, order))| {
                        let ordering = sort_compare(a, b, null_ordering);
                        match order {
                            SortOrder::Asc => ordering,
                            SortOrder::Desc => ordering.reverse(),
                        }
                    })
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
        }

        let rows = results
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|(row, _)| row)
            .collect();

        Ok(ResultSet {
            columns: outputs.into_iter().map(|o| o.label).collect(),
            rows,
        })
    }

    fn expand_items(items: &[SelectItem], table: Option<&Table>) -> Result<Vec<OutputColumn>, DatabaseError> {
        let mut outputs = Vec::new();
        for item in items {
            match item {
                SelectItem::Wildcard => {
                    let table = table.ok_or_else(|| {
                        DatabaseError::ParseError("SELECT * requires a FROM clause".to_string())
                    })?;
                    outputs.extend(table.columns.iter().map(|c| OutputColumn {
                        label: c.name.clone(),
                        expr: Expression::Column(c.name.clone()),
                    }));
                }
                SelectItem::Expr { expr, label, alias } => {
                    let label = match (alias, expr) {
                        (Some(alias), _) => alias.clone(),
                        (None, Expression::Column(name)) => name.clone(),
                        (None, _) => label.clone(),
                    };
                    outputs.push(OutputColumn {
                        label,
                        expr: expr.clone(),
                    });
                }
            }
        }
        Ok(outputs)
    }

    /// Output labels (aliases) win over source columns of the same name.
    fn resolve_sort_keys<'q>(
        order_by: &'q [OrderByItem],
        outputs: &[OutputColumn],
        columns: &[Column],
    ) -> Result<Vec<(SortSource<'q>, SortOrder)>, DatabaseError> {
        order_by
            .iter()
            .map(|item| {
                let source = match &item.key {
                    SortKey::Position(position) => {
                        if *position == 0 || *position > outputs.len() {
                            return Err(DatabaseError::UnknownColumn(position.to_string()));
                        }
                        SortSource::Output(position - 1)
                    }
                    SortKey::Expr(expr) => {
                        let by_label = match expr {
                            Expression::Column(name) => outputs
                                .iter()
                                .position(|o| o.label.eq_ignore_ascii_case(name)),
                            _ => None,
                        };
                        match by_label {
                            Some(idx) => SortSource::Output(idx),
                            None => {
                                ExpressionEvaluator::validate(expr, columns)?;
                                SortSource::Source(expr)
                            }
                        }
                    }
                };
                Ok((source, item.order))
            })
            .collect()
    }
}

/// Total order used by ORDER BY. NULL placement follows the policy;
/// values that cannot be compared fall back to a fixed type order.
fn sort_compare(a: &Value, b: &Value, nulls: NullOrdering) -> Ordering {
    let null_first = match nulls {
        NullOrdering::First => Ordering::Less,
        NullOrdering::Last => Ordering::Greater,
    };
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => null_first,
        (false, true) => null_first.reverse(),
        (false, false) => a.compare(b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b))),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Integer(_) | Value::Decimal(_) => 1,
        Value::DateTime(_) => 2,
        Value::Text(_) => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverflowPolicy;
    use crate::storage::WriteContext;
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

    fn books() -> Table {
        let mut table = Table::new(
            "books",
            vec![
                Column::new("title", DataType::Text),
                Column::new("pages", DataType::Int),
            ],
            None,
        )
        .unwrap();
        let wctx = WriteContext::new(ctx().now, OverflowPolicy::Error);
        let tuples = vec![
            vec![Value::from("Norse Mythology"), Value::Integer(304)],
            vec![Value::from("Just Kids"), Value::Null],
            vec![Value::from("The Namesake"), Value::Integer(291)],
            vec![Value::from("Oblivion"), Value::Integer(634)],
        ];
        let columns = table.columns.clone();
        table.store.insert(&columns, None, tuples, &wctx).unwrap();
        table
    }

    fn item(name: &str) -> SelectItem {
        SelectItem::Expr {
            expr: Expression::Column(name.to_string()),
            label: name.to_string(),
            alias: None,
        }
    }

    fn order(key: SortKey, order: SortOrder) -> OrderByItem {
        OrderByItem { key, order }
    }

    fn query<'a>(items: &'a [SelectItem], order_by: &'a [OrderByItem]) -> SelectQuery<'a> {
        SelectQuery {
            distinct: false,
            items,
            filter: None,
            order_by,
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn test_sort_before_limit() {
        let table = books();
        let items = [item("pages")];
        let order_by = [order(SortKey::Expr(Expression::Column("pages".into())), SortOrder::Desc)];
        let mut q = query(&items, &order_by);
        q.limit = Some(1);
        let result = SelectExecutor::execute(Some(&table), &q, NullOrdering::First, &ctx()).unwrap();
        assert_eq!(result.rows, vec![vec![Value::Integer(634)]]);
    }

    #[test]
    fn test_null_ordering_policy() {
        let table = books();
        let items = [item("pages")];
        let order_by = [order(SortKey::Position(1), SortOrder::Asc)];
        let q = query(&items, &order_by);

        let first = SelectExecutor::execute(Some(&table), &q, NullOrdering::First, &ctx()).unwrap();
        assert_eq!(first.rows[0], vec![Value::Null]);

        let last = SelectExecutor::execute(Some(&table), &q, NullOrdering::Last, &ctx()).unwrap();
        assert_eq!(last.rows[3], vec![Value::Null]);
        assert_eq!(last.rows[0], vec![Value::Integer(291)]);
    }

    #[test]
    fn test_offset_beyond_result() {
        let table = books();
        let items = [SelectItem::Wildcard];
        let mut q = query(&items, &[]);
        q.offset = Some(10);
        q.limit = Some(5);
        let result = SelectExecutor::execute(Some(&table), &q, NullOrdering::First, &ctx()).unwrap();
        assert!(result.rows.is_empty());
        assert_eq!(result.columns, vec!["title", "pages"]);
    }

    #[test]
    fn test_order_by_unknown_position() {
        let table = books();
        let items = [item("title")];
        let order_by = [order(SortKey::Position(2), SortOrder::Asc)];
        let q = query(&items, &order_by);
        assert!(matches!(
            SelectExecutor::execute(Some(&table), &q, NullOrdering::First, &ctx()),
            Err(DatabaseError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_select_without_from() {
        let items = [SelectItem::Expr {
            expr: Expression::Function {
                name: "REVERSE".to_string(),
                args: vec![Expression::Literal(Value::from("abc"))],
            },
            label: "REVERSE('abc')".to_string(),
            alias: None,
        }];
        let q = query(&items, &[]);
        let result = SelectExecutor::execute(None, &q, NullOrdering::First, &ctx()).unwrap();
        assert_eq!(result.columns, vec!["REVERSE('abc')"]);
        assert_eq!(result.rows, vec![vec![Value::from("cba")]]);
    }
}
