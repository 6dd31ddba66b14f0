// Module declarations
pub mod error;
pub mod value;
pub mod data_type;
pub mod column;
pub mod row;
pub mod table;
pub mod database;
pub mod catalog;

// Re-exports for convenience
pub use error::{DatabaseError, ErrorKind};
pub use value::{Value, ValueKey};
pub use data_type::DataType;
pub use column::{Column, DefaultValue};
pub use row::{Row, RowId};
pub use table::Table;
pub use database::Database;
pub use catalog::Catalog;

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new(
            "users",
            vec![
                Column::new("id", DataType::Int).primary_key(),
                Column::new("name", DataType::Text).not_null(),
            ],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_database_creation() {
        let db = Database::new("test_db");
        assert_eq!(db.name, "test_db");
        assert_eq!(db.tables.len(), 0);
    }

    #[test]
    fn test_database_create_table() {
        let mut db = Database::new("test_db");
        assert!(db.create_table(users()).is_ok());
        assert_eq!(db.tables.len(), 1);
        assert!(db.get_table("users").is_ok());
        // table names are case-sensitive
        assert!(db.get_table("USERS").is_err());
    }

    #[test]
    fn test_database_create_duplicate_table() {
        let mut db = Database::new("test_db");
        db.create_table(users()).unwrap();
        assert!(matches!(
            db.create_table(users()),
            Err(DatabaseError::DuplicateTable(_))
        ));
    }

    #[test]
    fn test_database_drop_table() {
        let mut db = Database::new("test_db");
        db.create_table(users()).unwrap();
        assert!(db.drop_table("users").is_ok());
        assert_eq!(db.tables.len(), 0);
        assert!(matches!(
            db.drop_table("users"),
            Err(DatabaseError::NoSuchTable(_))
        ));
    }

    #[test]
    fn test_catalog_lifecycle() {
        let mut catalog = Catalog::new();
        catalog.create_database("shop").unwrap();
        catalog.create_database("app").unwrap();
        assert!(matches!(
            catalog.create_database("shop"),
            Err(DatabaseError::DuplicateDatabase(_))
        ));
        assert_eq!(catalog.database_names(), vec!["app", "shop"]);

        catalog.get_database_mut("shop").unwrap().create_table(users()).unwrap();
        let dropped = catalog.drop_database("shop").unwrap();
        assert_eq!(dropped.table_names(), vec!["users"]);
        assert_eq!(
            catalog.get_database("shop").unwrap_err().kind(),
            ErrorKind::NoSuchDatabase
        );
    }
}
