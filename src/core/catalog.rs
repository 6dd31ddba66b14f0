use std::collections::HashMap;
use log::info;
use super::database::Database;
use super::error::DatabaseError;

/// Root object of the engine - owns every database
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub databases: HashMap<String, Database>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_database(&mut self, name: &str) -> Result<(), DatabaseError> {
        if self.databases.contains_key(name) {
            return Err(DatabaseError::DuplicateDatabase(name.to_string()));
        }
        self.databases.insert(name.to_string(), Database::new(name));
        info!("created database {name}");
        Ok(())
    }

    /// Drop a database together with all of its tables.
    pub fn drop_database(&mut self, name: &str) -> Result<Database, DatabaseError> {
        let dropped = self
            .databases
            .remove(name)
            .ok_or_else(|| DatabaseError::NoSuchDatabase(name.to_string()))?;
        info!("dropped database {name} ({} tables)", dropped.tables.len());
        Ok(dropped)
    }

    #[must_use]
    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    pub fn get_database(&self, name: &str) -> Result<&Database, DatabaseError> {
        self.databases
            .get(name)
            .ok_or_else(|| DatabaseError::NoSuchDatabase(name.to_string()))
    }

    pub fn get_database_mut(&mut self, name: &str) -> Result<&mut Database, DatabaseError> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| DatabaseError::NoSuchDatabase(name.to_string()))
    }

    /// Database names in ascending order.
    #[must_use]
    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.keys().cloned().collect();
        names.sort();
        names
    }
}
