/// Row arena for a single table
///
/// Rows are kept in insertion order. Every mutation validates the complete
/// statement before touching the arena, so a failing INSERT/UPDATE/DELETE
/// leaves rows, primary-key index and AUTO_INCREMENT counter unchanged.

use super::{AutoIncrement, WriteContext};
use crate::core::{Column, DatabaseError, DefaultValue, Row, RowId, Value, ValueKey};
use log::trace;
use std::collections::{HashMap, HashSet};

type PrimaryKey = Vec<ValueKey>;

pub type Rows<'a> = std::slice::Iter<'a, Row>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub row_ids: Vec<RowId>,
    /// First AUTO_INCREMENT value generated by the statement.
    pub first_generated_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct RowStore {
    rows: Vec<Row>,
    next_row_id: RowId,
    counter: AutoIncrement,
    key_index: HashMap<PrimaryKey, RowId>,
}

impl RowStore {
    #[must_use]
    pub fn new(counter: AutoIncrement) -> Self {
        Self {
            rows: Vec::new(),
            next_row_id: 1,
            counter,
            key_index: HashMap::new(),
        }
    }

    /// Restartable iterator over the current rows in insertion order.
    #[must_use]
    pub fn scan(&self) -> Rows<'_> {
        self.rows.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub const fn auto_increment(&self) -> AutoIncrement {
        self.counter
    }

    /// Insert one row per tuple.
    ///
    /// `names` lists the target columns positionally; `None` means every
    /// column in table order.
    pub fn insert(
        &mut self,
        columns: &[Column],
        names: Option<&[String]>,
        tuples: Vec<Vec<Value>>,
        ctx: &WriteContext,
    ) -> Result<InsertOutcome, DatabaseError> {
        let targets = Self::resolve_targets(columns, names)?;
        let key_columns = primary_key_indices(columns);

        let mut counter = self.counter;
        let mut first_generated_id = None;
        let mut pending_keys: HashSet<PrimaryKey> = HashSet::new();
        let mut candidates: Vec<(Option<PrimaryKey>, Vec<Value>)> = Vec::with_capacity(tuples.len());

        for (tuple_no, tuple) in tuples.into_iter().enumerate() {
            if tuple.len() != targets.len() {
                return Err(DatabaseError::ColumnCountMismatch(tuple_no + 1));
            }

            let mut slots: Vec<Option<Value>> = vec![None; columns.len()];
            for (&idx, value) in targets.iter().zip(tuple) {
                slots[idx] = Some(value);
            }

            let mut values = Vec::with_capacity(columns.len());
            for (column, slot) in columns.iter().zip(slots) {
                let value = match slot {
                    None | Some(Value::Null) if column.auto_increment => {
                        let id = counter.allocate();
                        first_generated_id.get_or_insert(id);
                        Value::Integer(id)
                    }
                    Some(value) => column.data_type.coerce(&column.name, value, ctx.overflow)?,
                    None => default_value(column, ctx)?,
                };

                if value.is_null() && !column.nullable {
                    return Err(DatabaseError::NullNotAllowed(column.name.clone()));
                }
                if column.auto_increment {
                    if let Value::Integer(explicit) = value {
                        counter.observe(explicit);
                    }
                }
                values.push(value);
            }

            let key = if key_columns.is_empty() {
                None
            } else {
                let key = key_of(&key_columns, &values);
                if self.key_index.contains_key(&key) || !pending_keys.insert(key.clone()) {
                    return Err(duplicate_key(&key_columns, &values));
                }
                Some(key)
            };
            candidates.push((key, values));
        }

        let mut row_ids = Vec::with_capacity(candidates.len());
        for (key, values) in candidates {
            let id = self.next_row_id;
            self.next_row_id += 1;
            if let Some(key) = key {
                self.key_index.insert(key, id);
            }
            trace!("insert row {id}: {values:?}");
            self.rows.push(Row::new(id, values));
            row_ids.push(id);
        }
        self.counter = counter;

        Ok(InsertOutcome {
            row_ids,
            first_generated_id,
        })
    }

    /// Update rows matching `predicate`.
    ///
    /// `assign` returns `(column index, new value)` pairs computed from the
    /// old row. Returns the number of matched rows.
    pub fn update_where<P, U>(
        &mut self,
        columns: &[Column],
        mut predicate: P,
        mut assign: U,
        ctx: &WriteContext,
    ) -> Result<usize, DatabaseError>
    where
        P: FnMut(&Row) -> Result<bool, DatabaseError>,
        U: FnMut(&Row) -> Result<Vec<(usize, Value)>, DatabaseError>,
    {
        let mut counter = self.counter;
        let mut changes: HashMap<usize, Vec<Value>> = HashMap::new();

        for (position, row) in self.rows.iter().enumerate() {
            if !predicate(row)? {
                continue;
            }

            let mut values = row.values.clone();
            let mut assigned = vec![false; columns.len()];
            for (idx, value) in assign(row)? {
                let column = &columns[idx];
                let value = column.data_type.coerce(&column.name, value, ctx.overflow)?;
                if value.is_null() && !column.nullable {
                    return Err(DatabaseError::NullNotAllowed(column.name.clone()));
                }
                if column.auto_increment {
                    if let Value::Integer(explicit) = value {
                        counter.observe(explicit);
                    }
                }
                values[idx] = value;
                assigned[idx] = true;
            }

            if values != row.values {
                for (idx, column) in columns.iter().enumerate() {
                    if column.on_update_now && !assigned[idx] {
                        values[idx] = Value::DateTime(ctx.now);
                    }
                }
            }
            changes.insert(position, values);
        }

        let matched = changes.len();
        let key_columns = primary_key_indices(columns);
        if !key_columns.is_empty() && matched > 0 {
            let mut seen: HashSet<PrimaryKey> = HashSet::with_capacity(self.rows.len());
            for (position, row) in self.rows.iter().enumerate() {
                let values = changes.get(&position).unwrap_or(&row.values);
                if !seen.insert(key_of(&key_columns, values)) {
                    return Err(duplicate_key(&key_columns, values));
                }
            }
        }

        for (position, values) in changes {
            trace!("update row {}: {values:?}", self.rows[position].id);
            self.rows[position].values = values;
        }
        self.counter = counter;
        self.rebuild_index(&key_columns);

        Ok(matched)
    }

    /// Delete rows matching `predicate`. The AUTO_INCREMENT counter is kept.
    pub fn delete_where<P>(&mut self, columns: &[Column], mut predicate: P) -> Result<usize, DatabaseError>
    where
        P: FnMut(&Row) -> Result<bool, DatabaseError>,
    {
        let mut doomed = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            doomed.push(predicate(row)?);
        }

        let before = self.rows.len();
        let mut flags = doomed.into_iter();
        self.rows.retain(|_| !flags.next().unwrap_or(false));
        let deleted = before - self.rows.len();
        trace!("deleted {deleted} row(s)");

        self.rebuild_index(&primary_key_indices(columns));
        Ok(deleted)
    }

    /// Remove every row. The AUTO_INCREMENT counter is kept.
    pub fn truncate(&mut self) -> usize {
        let deleted = self.rows.len();
        self.rows.clear();
        self.key_index.clear();
        deleted
    }

    fn resolve_targets(columns: &[Column], names: Option<&[String]>) -> Result<Vec<usize>, DatabaseError> {
        let Some(names) = names else {
            return Ok((0..columns.len()).collect());
        };

        let mut targets = Vec::with_capacity(names.len());
        for name in names {
            let idx = columns
                .iter()
                .position(|c| c.matches_name(name))
                .ok_or_else(|| DatabaseError::UnknownColumn(name.clone()))?;
            if targets.contains(&idx) {
                return Err(DatabaseError::ColumnSpecifiedTwice(columns[idx].name.clone()));
            }
            targets.push(idx);
        }
        Ok(targets)
    }

    fn rebuild_index(&mut self, key_columns: &[usize]) {
        self.key_index.clear();
        if key_columns.is_empty() {
            return;
        }
        for row in &self.rows {
            self.key_index.insert(key_of(key_columns, &row.values), row.id);
        }
    }
}

fn primary_key_indices(columns: &[Column]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.primary_key)
        .map(|(idx, _)| idx)
        .collect()
}

fn key_of(key_columns: &[usize], values: &[Value]) -> PrimaryKey {
    key_columns.iter().map(|&idx| values[idx].key()).collect()
}

fn duplicate_key(key_columns: &[usize], values: &[Value]) -> DatabaseError {
    let entry = key_columns
        .iter()
        .map(|&idx| values[idx].to_string())
        .collect::<Vec<_>>()
        .join("-");
    DatabaseError::DuplicateKey {
        entry,
        key: "PRIMARY".to_string(),
    }
}

fn default_value(column: &Column, ctx: &WriteContext) -> Result<Value, DatabaseError> {
    match &column.default {
        Some(DefaultValue::Literal(value)) => Ok(value.clone()),
        Some(DefaultValue::CurrentTimestamp) => Ok(Value::DateTime(ctx.now)),
        None if column.nullable => Ok(Value::Null),
        None => Err(DatabaseError::MissingRequiredColumn(column.name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverflowPolicy;
    use crate::core::DataType;
    use chrono::NaiveDate;

    fn ctx() -> WriteContext {
        let now = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        WriteContext::new(now, OverflowPolicy::Error)
    }

    fn cats() -> Vec<Column> {
        vec![
            Column::new("cat_id", DataType::Int).primary_key().auto_increment(),
            Column::new("name", DataType::Varchar { max_length: 100 }).not_null(),
            Column::new("age", DataType::Int)
                .not_null()
                .with_default(DefaultValue::Literal(Value::Integer(99))),
        ]
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_insert_assigns_defaults_and_ids() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        let outcome = store
            .insert(
                &columns,
                Some(&names(&["name"])),
                vec![vec![Value::from("Ringo")], vec![Value::from("Cindy")]],
                &ctx(),
            )
            .unwrap();

        assert_eq!(outcome.first_generated_id, Some(1));
        let rows: Vec<_> = store.scan().collect();
        assert_eq!(rows[0].values, vec![Value::Integer(1), Value::from("Ringo"), Value::Integer(99)]);
        assert_eq!(rows[1].values[0], Value::Integer(2));
    }

    #[test]
    fn test_missing_required_column_fails_whole_statement() {
        let columns = vec![
            Column::new("id", DataType::Int),
            Column::new("name", DataType::Text).not_null(),
        ];
        let mut store = RowStore::new(AutoIncrement::default());
        let err = store
            .insert(&columns, Some(&names(&["id"])), vec![vec![Value::Integer(1)]], &ctx())
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MissingRequiredColumn(ref c) if c == "name"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_explicit_null_rejected() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        let err = store
            .insert(&columns, Some(&names(&["name"])), vec![vec![Value::Null]], &ctx())
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NullNotAllowed(_)));
    }

    #[test]
    fn test_duplicate_key_is_atomic() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        let err = store
            .insert(
                &columns,
                None,
                vec![
                    vec![Value::Integer(1), Value::from("A"), Value::Integer(1)],
                    vec![Value::Integer(1), Value::from("B"), Value::Integer(2)],
                ],
                &ctx(),
            )
            .unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateKey { ref entry, .. } if entry == "1"));
        assert!(store.is_empty());
        // the failed statement must not consume ids
        assert_eq!(store.auto_increment().peek(), 1);
    }

    #[test]
    fn test_counter_survives_delete() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        for name in ["a", "b", "c"] {
            store
                .insert(&columns, Some(&names(&["name"])), vec![vec![Value::from(name)]], &ctx())
                .unwrap();
        }
        let deleted = store
            .delete_where(&columns, |row| Ok(row.values[0] == Value::Integer(3)))
            .unwrap();
        assert_eq!(deleted, 1);

        let outcome = store
            .insert(&columns, Some(&names(&["name"])), vec![vec![Value::from("d")]], &ctx())
            .unwrap();
        assert_eq!(outcome.first_generated_id, Some(4));
    }

    #[test]
    fn test_update_key_collision_leaves_rows_untouched() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        store
            .insert(
                &columns,
                Some(&names(&["name"])),
                vec![vec![Value::from("a")], vec![Value::from("b")]],
                &ctx(),
            )
            .unwrap();

        let err = store
            .update_where(
                &columns,
                |_| Ok(true),
                |_| Ok(vec![(0, Value::Integer(7)), (1, Value::from("z"))]),
                &ctx(),
            )
            .unwrap_err();
        assert!(matches!(err, DatabaseError::DuplicateKey { .. }));
        let names: Vec<_> = store.scan().map(|r| r.values[1].clone()).collect();
        assert_eq!(names, vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_update_refreshes_on_update_columns() {
        let mut changed_at = Column::new("changed_at", DataType::DateTime);
        changed_at.on_update_now = true;
        let columns = vec![Column::new("body", DataType::Text), changed_at];
        let mut store = RowStore::new(AutoIncrement::default());
        store
            .insert(&columns, Some(&names(&["body"])), vec![vec![Value::from("hi")]], &ctx())
            .unwrap();

        let matched = store
            .update_where(&columns, |_| Ok(true), |_| Ok(vec![(0, Value::from("bye"))]), &ctx())
            .unwrap();
        assert_eq!(matched, 1);
        let row = store.scan().next().unwrap();
        assert_eq!(row.values[1], Value::DateTime(ctx().now));
    }

    #[test]
    fn test_truncate_keeps_counter() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::starting_at(10));
        store
            .insert(&columns, Some(&names(&["name"])), vec![vec![Value::from("a")]], &ctx())
            .unwrap();
        assert_eq!(store.truncate(), 1);
        assert!(store.is_empty());
        assert_eq!(store.auto_increment().peek(), 11);
    }

    #[test]
    fn test_unknown_and_repeated_columns() {
        let columns = cats();
        let mut store = RowStore::new(AutoIncrement::default());
        assert!(matches!(
            store.insert(&columns, Some(&names(&["nope"])), vec![vec![Value::Null]], &ctx()),
            Err(DatabaseError::UnknownColumn(_))
        ));
        assert!(matches!(
            store.insert(
                &columns,
                Some(&names(&["name", "NAME"])),
                vec![vec![Value::from("a"), Value::from("b")]],
                &ctx()
            ),
            Err(DatabaseError::ColumnSpecifiedTwice(_))
        ));
        assert!(matches!(
            store.insert(&columns, Some(&names(&["name"])), vec![vec![]], &ctx()),
            Err(DatabaseError::ColumnCountMismatch(1))
        ));
    }
}
