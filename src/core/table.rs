use super::column::{Column, DefaultValue};
use super::data_type::DataType;
use super::error::DatabaseError;
use super::value::Value;
use crate::config::OverflowPolicy;
use crate::storage::{AutoIncrement, RowStore, Rows};

/// Widest DECIMAL the value representation stores exactly.
pub const MAX_DECIMAL_DIGITS: u8 = 28;

#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub store: RowStore,
}

impl Table {
    /// Build a table after validating its column definitions.
    ///
    /// Primary-key columns are forced NOT NULL and literal defaults are
    /// stored already coerced to the column type.
    pub fn new(
        name: &str,
        mut columns: Vec<Column>,
        auto_increment_start: Option<i64>,
    ) -> Result<Self, DatabaseError> {
        if columns.is_empty() {
            return Err(DatabaseError::InvalidSchema(format!(
                "table '{name}' must have at least one column"
            )));
        }

        for (idx, column) in columns.iter().enumerate() {
            if columns[..idx].iter().any(|c| c.matches_name(&column.name)) {
                return Err(DatabaseError::InvalidSchema(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        let auto_columns: Vec<&Column> = columns.iter().filter(|c| c.auto_increment).collect();
        if auto_columns.len() > 1 {
            return Err(DatabaseError::InvalidSchema(
                "there can be only one auto column".to_string(),
            ));
        }
        if let Some(auto) = auto_columns.first() {
            if !auto.data_type.is_integer() {
                return Err(DatabaseError::InvalidSchema(format!(
                    "auto increment column '{}' must be INT",
                    auto.name
                )));
            }
            if !auto.primary_key {
                return Err(DatabaseError::InvalidSchema(format!(
                    "auto increment column '{}' must be defined as a key",
                    auto.name
                )));
            }
        }

        for column in &mut columns {
            if column.primary_key {
                column.nullable = false;
            }
            if let DataType::Decimal { precision, scale } = column.data_type {
                if precision == 0 || precision > MAX_DECIMAL_DIGITS || scale > precision {
                    return Err(DatabaseError::InvalidSchema(format!(
                        "invalid precision {precision} and scale {scale} for '{}'",
                        column.name
                    )));
                }
            }
            if column.on_update_now && column.data_type != DataType::DateTime {
                return Err(DatabaseError::InvalidSchema(format!(
                    "invalid ON UPDATE clause for '{}' column",
                    column.name
                )));
            }
            column.default = match column.default.take() {
                Some(DefaultValue::Literal(Value::Null)) if !column.nullable => {
                    return Err(DatabaseError::InvalidSchema(format!(
                        "invalid default value for '{}'",
                        column.name
                    )));
                }
                Some(DefaultValue::Literal(value)) => {
                    let coerced = column
                        .data_type
                        .coerce(&column.name, value, OverflowPolicy::Error)
                        .map_err(|_| {
                            DatabaseError::InvalidSchema(format!(
                                "invalid default value for '{}'",
                                column.name
                            ))
                        })?;
                    Some(DefaultValue::Literal(coerced))
                }
                Some(DefaultValue::CurrentTimestamp) if column.data_type != DataType::DateTime => {
                    return Err(DatabaseError::InvalidSchema(format!(
                        "invalid default value for '{}'",
                        column.name
                    )));
                }
                other => other,
            };
        }

        let counter = auto_increment_start.map_or_else(AutoIncrement::default, AutoIncrement::starting_at);
        Ok(Self {
            name: name.to_string(),
            columns,
            store: RowStore::new(counter),
        })
    }

    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.matches_name(name))
    }

    pub fn column_index(&self, name: &str) -> Result<usize, DatabaseError> {
        self.get_column_index(name)
            .ok_or_else(|| DatabaseError::UnknownColumn(name.to_string()))
    }

    /// Primary-key columns in declaration order.
    pub fn primary_key(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    #[must_use]
    pub fn scan(&self) -> Rows<'_> {
        self.store.scan()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
