/// Engine facade: owns the catalog and configuration, hands out sessions.

use crate::config::EngineConfig;
use crate::executor::{QueryExecutor, QueryResult};
use crate::parser::{Statement, parse_statement};
use crate::types::{Catalog, DatabaseError};
use log::{debug, info};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Per-client state. Only the current database lives here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current_database: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_database(name: &str) -> Self {
        Self {
            current_database: Some(name.to_string()),
        }
    }

    #[must_use]
    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    pub(crate) fn set_current_database(&mut self, name: Option<String>) {
        self.current_database = name;
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    catalog: Catalog,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an engine; `default_database` is created up front.
    pub fn with_config(config: EngineConfig) -> Result<Self, DatabaseError> {
        let mut catalog = Catalog::new();
        if let Some(name) = &config.default_database {
            catalog.create_database(name)?;
        }
        info!(
            "engine ready (null ordering {:?}, varchar overflow {:?})",
            config.null_ordering, config.varchar_overflow
        );
        Ok(Self { catalog, config })
    }

    pub fn from_config_file(path: Option<&Path>) -> Result<Self, DatabaseError> {
        Self::with_config(EngineConfig::load(path)?)
    }

    /// New session, positioned on the default database if one is configured.
    #[must_use]
    pub fn session(&self) -> Session {
        self.config
            .default_database
            .as_deref()
            .map_or_else(Session::new, Session::with_database)
    }

    /// Parse and execute one statement.
    pub fn execute(&mut self, session: &mut Session, sql: &str) -> Result<QueryResult, DatabaseError> {
        let statement = parse_statement(sql)?;
        self.execute_statement(session, statement)
    }

    pub fn execute_statement(
        &mut self,
        session: &mut Session,
        statement: Statement,
    ) -> Result<QueryResult, DatabaseError> {
        QueryExecutor::execute(&mut self.catalog, session, &self.config, statement)
    }

    /// Execute a read-only statement through a shared borrow.
    pub fn execute_read(
        &self,
        session: &mut Session,
        statement: &Statement,
    ) -> Result<QueryResult, DatabaseError> {
        QueryExecutor::execute_read(&self.catalog, session, &self.config, statement)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Thread-safe handle. Reads share the lock; anything that can change the
/// catalog takes it exclusively, so auto-increment allocation is atomic.
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .session()
    }

    pub fn execute(&self, session: &mut Session, sql: &str) -> Result<QueryResult, DatabaseError> {
        let statement = parse_statement(sql)?;
        if statement.is_read_only() {
            debug!("shared read");
            let engine = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            engine.execute_read(session, &statement)
        } else {
            let mut engine = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            engine.execute_statement(session, statement)
        }
    }
}
