/// DDL (Data Definition Language) operations
///
/// CREATE/DROP DATABASE, CREATE/DROP TABLE, plus the catalog listings
/// SHOW DATABASES, SHOW TABLES and DESCRIBE.

use super::{QueryResult, ResultSet};
use crate::parser::ColumnDef;
use crate::types::{Catalog, Column, Database, DatabaseError, DefaultValue, Table, Value};
use log::info;

pub struct DdlExecutor;

impl DdlExecutor {
    pub fn create_database(
        catalog: &mut Catalog,
        name: &str,
        if_not_exists: bool,
    ) -> Result<QueryResult, DatabaseError> {
        if if_not_exists && catalog.has_database(name) {
            return Ok(QueryResult::Success(format!(
                "Database '{name}' already exists, skipped"
            )));
        }
        catalog.create_database(name)?;
        Ok(QueryResult::Success(format!("Database '{name}' created")))
    }

    pub fn drop_database(
        catalog: &mut Catalog,
        name: &str,
        if_exists: bool,
    ) -> Result<QueryResult, DatabaseError> {
        if if_exists && !catalog.has_database(name) {
            return Ok(QueryResult::Success(format!(
                "Database '{name}' doesn't exist, skipped"
            )));
        }
        let dropped = catalog.drop_database(name)?;
        Ok(QueryResult::Success(format!(
            "Database '{name}' dropped ({} tables)",
            dropped.tables.len()
        )))
    }

    /// Execute CREATE TABLE statement
    ///
    /// Validates:
    /// - a single primary key declaration (inline or table-level)
    /// - table-level key columns exist and are listed once
    /// - everything `Table::new` checks (auto increment, defaults)
    pub fn create_table(
        db: &mut Database,
        name: String,
        if_not_exists: bool,
        column_defs: Vec<ColumnDef>,
        primary_keys: Vec<Vec<String>>,
        auto_increment_start: Option<i64>,
    ) -> Result<QueryResult, DatabaseError> {
        if db.has_table(&name) {
            if if_not_exists {
                return Ok(QueryResult::Success(format!(
                    "Table '{name}' already exists, skipped"
                )));
            }
            return Err(DatabaseError::DuplicateTable(name));
        }

        let inline_keys = column_defs.iter().filter(|d| d.primary_key).count();
        if inline_keys > 1 || primary_keys.len() + usize::from(inline_keys > 0) > 1 {
            return Err(DatabaseError::InvalidSchema(
                "multiple primary key defined".to_string(),
            ));
        }

        let mut columns: Vec<Column> = column_defs.into_iter().map(column_from_def).collect();

        if let Some(key) = primary_keys.first() {
            for (i, key_column) in key.iter().enumerate() {
                if key[..i].iter().any(|k| k.eq_ignore_ascii_case(key_column)) {
                    return Err(DatabaseError::InvalidSchema(format!(
                        "duplicate column name '{key_column}' in primary key"
                    )));
                }
                let column = columns
                    .iter_mut()
                    .find(|c| c.matches_name(key_column))
                    .ok_or_else(|| {
                        DatabaseError::InvalidSchema(format!(
                            "key column '{key_column}' doesn't exist in table"
                        ))
                    })?;
                column.primary_key = true;
            }
        }

        let table = Table::new(&name, columns, auto_increment_start)?;
        let column_count = table.columns.len();
        db.create_table(table)?;
        info!("created table {}.{name} with {column_count} columns", db.name);

        Ok(QueryResult::Success(format!("Table '{name}' created")))
    }

    pub fn drop_table(
        db: &mut Database,
        name: &str,
        if_exists: bool,
    ) -> Result<QueryResult, DatabaseError> {
        if if_exists && !db.has_table(name) {
            return Ok(QueryResult::Success(format!(
                "Table '{name}' doesn't exist, skipped"
            )));
        }
        let dropped = db.drop_table(name)?;
        info!("dropped table {}.{name} ({} rows)", db.name, dropped.row_count());
        Ok(QueryResult::Success(format!("Table '{name}' dropped")))
    }

    #[must_use]
    pub fn show_databases(catalog: &Catalog) -> QueryResult {
        QueryResult::Rows(ResultSet {
            columns: vec!["Database".to_string()],
            rows: catalog
                .database_names()
                .into_iter()
                .map(|name| vec![Value::Text(name)])
                .collect(),
        })
    }

    #[must_use]
    pub fn show_tables(db: &Database) -> QueryResult {
        QueryResult::Rows(ResultSet {
            columns: vec![format!("Tables_in_{}", db.name)],
            rows: db
                .table_names()
                .into_iter()
                .map(|name| vec![Value::Text(name)])
                .collect(),
        })
    }

    /// DESCRIBE output: Field, Type, Null, Key, Default, Extra
    #[must_use]
    pub fn describe(table: &Table) -> QueryResult {
        let rows = table
            .columns
            .iter()
            .map(|column| {
                let default = match &column.default {
                    Some(DefaultValue::Literal(value)) => value.clone(),
                    Some(DefaultValue::CurrentTimestamp) => Value::from("CURRENT_TIMESTAMP"),
                    None => Value::Null,
                };
                let mut extra = Vec::new();
                if column.auto_increment {
                    extra.push("auto_increment");
                }
                if column.on_update_now {
                    extra.push("on update CURRENT_TIMESTAMP");
                }
                vec![
                    Value::Text(column.name.clone()),
                    Value::Text(column.data_type.to_string()),
                    Value::from(if column.nullable { "YES" } else { "NO" }),
                    Value::from(if column.primary_key { "PRI" } else { "" }),
                    default,
                    Value::Text(extra.join(" ")),
                ]
            })
            .collect();

        QueryResult::Rows(ResultSet {
            columns: ["Field", "Type", "Null", "Key", "Default", "Extra"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            rows,
        })
    }
}

fn column_from_def(def: ColumnDef) -> Column {
    Column {
        name: def.name,
        data_type: def.data_type,
        nullable: !def.not_null,
        default: def.default,
        primary_key: def.primary_key,
        auto_increment: def.auto_increment,
        on_update_now: def.on_update_now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn def(name: &str, data_type: DataType) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            data_type,
            not_null: false,
            default: None,
            primary_key: false,
            auto_increment: false,
            on_update_now: false,
        }
    }

    #[test]
    fn test_create_table_with_table_level_key() {
        let mut db = Database::new("shop");
        let mut id = def("id", DataType::Int);
        id.auto_increment = true;
        DdlExecutor::create_table(
            &mut db,
            "items".to_string(),
            false,
            vec![id, def("name", DataType::Text)],
            vec![vec!["ID".to_string()]],
            None,
        )
        .unwrap();

        let table = db.get_table("items").unwrap();
        assert!(table.columns[0].primary_key);
        assert!(!table.columns[0].nullable);
    }

    #[test]
    fn test_multiple_primary_keys_rejected() {
        let mut db = Database::new("shop");
        let mut id = def("id", DataType::Int);
        id.primary_key = true;
        let err = DdlExecutor::create_table(
            &mut db,
            "items".to_string(),
            false,
            vec![id, def("name", DataType::Text)],
            vec![vec!["name".to_string()]],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidSchema(_)));
        assert!(!db.has_table("items"));
    }

    #[test]
    fn test_key_on_unknown_column_rejected() {
        let mut db = Database::new("shop");
        let err = DdlExecutor::create_table(
            &mut db,
            "items".to_string(),
            false,
            vec![def("id", DataType::Int)],
            vec![vec!["missing".to_string()]],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidSchema(_)));
    }

    #[test]
    fn test_if_not_exists_and_if_exists() {
        let mut db = Database::new("shop");
        let create = |db: &mut Database, if_not_exists| {
            DdlExecutor::create_table(
                db,
                "items".to_string(),
                if_not_exists,
                vec![def("id", DataType::Int)],
                vec![],
                None,
            )
        };
        create(&mut db, false).unwrap();
        assert!(matches!(create(&mut db, false), Err(DatabaseError::DuplicateTable(_))));
        assert!(create(&mut db, true).is_ok());

        DdlExecutor::drop_table(&mut db, "items", false).unwrap();
        assert!(DdlExecutor::drop_table(&mut db, "items", true).is_ok());
        assert!(matches!(
            DdlExecutor::drop_table(&mut db, "items", false),
            Err(DatabaseError::NoSuchTable(_))
        ));
    }

    #[test]
    fn test_describe() {
        let mut db = Database::new("shop");
        let mut id = def("id", DataType::Int);
        id.primary_key = true;
        id.auto_increment = true;
        let mut name = def("name", DataType::Varchar { max_length: 50 });
        name.default = Some(DefaultValue::Literal(Value::from("n/a")));
        DdlExecutor::create_table(&mut db, "items".to_string(), false, vec![id, name], vec![], None)
            .unwrap();

        let QueryResult::Rows(result) = DdlExecutor::describe(db.get_table("items").unwrap()) else {
            panic!("expected rows");
        };
        assert_eq!(result.columns, vec!["Field", "Type", "Null", "Key", "Default", "Extra"]);
        assert_eq!(
            result.rows[0],
            vec![
                Value::from("id"),
                Value::from("int"),
                Value::from("NO"),
                Value::from("PRI"),
                Value::Null,
                Value::from("auto_increment"),
            ]
        );
        assert_eq!(result.rows[1][1], Value::from("varchar(50)"));
        assert_eq!(result.rows[1][4], Value::from("n/a"));
    }
}
