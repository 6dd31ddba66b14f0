/// Executor module - runs parsed statements against the catalog
///
/// Structure:
/// - expressions / functions: scalar evaluation and the string library
/// - conditions: WHERE evaluation (three-valued, LIKE)
/// - ddl: CREATE/DROP DATABASE and TABLE, SHOW, DESCRIBE
/// - dml: INSERT/UPDATE/DELETE
/// - queries: SELECT pipeline

pub mod conditions;
pub mod ddl;
pub mod dml;
pub mod expressions;
pub mod functions;
pub mod queries;

pub use conditions::ConditionEvaluator;
pub use ddl::DdlExecutor;
pub use dml::DmlExecutor;
pub use expressions::{ExpressionEvaluator, Scope};
pub use functions::FunctionContext;
pub use queries::{SelectExecutor, SelectQuery};

use crate::config::EngineConfig;
use crate::engine::Session;
use crate::parser::Statement;
use crate::storage::WriteContext;
use crate::types::{Catalog, Database, DatabaseError, Value};
use chrono::{Local, NaiveDateTime, SubsecRound};
use log::debug;
use serde::Serialize;

/// Column labels plus rows, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResult {
    Rows(ResultSet),
    Mutation {
        affected: usize,
        /// First AUTO_INCREMENT value generated by an INSERT, if any
        last_insert_id: Option<i64>,
    },
    Success(String),
}

pub struct QueryExecutor;

impl QueryExecutor {
    /// Execute any statement. Read-only statements are forwarded to
    /// [`QueryExecutor::execute_read`].
    pub fn execute(
        catalog: &mut Catalog,
        session: &mut Session,
        config: &EngineConfig,
        statement: Statement,
    ) -> Result<QueryResult, DatabaseError> {
        if statement.is_read_only() {
            return Self::execute_read(catalog, session, config, &statement);
        }
        debug!("execute: {statement:?}");

        let now = statement_now();
        let current = session.current_database().map(str::to_string);
        let ctx = FunctionContext {
            now,
            current_database: current.as_deref(),
        };
        let write = WriteContext::new(now, config.varchar_overflow);

        match statement {
            Statement::CreateDatabase {
                name,
                if_not_exists,
            } => DdlExecutor::create_database(catalog, &name, if_not_exists),
            Statement::DropDatabase { name, if_exists } => {
                let result = DdlExecutor::drop_database(catalog, &name, if_exists)?;
                if session.current_database() == Some(name.as_str()) {
                    session.set_current_database(None);
                }
                Ok(result)
            }
            Statement::CreateTable {
                name,
                if_not_exists,
                columns,
                primary_keys,
                auto_increment_start,
            } => DdlExecutor::create_table(
                Self::database_mut(catalog, session)?,
                name,
                if_not_exists,
                columns,
                primary_keys,
                auto_increment_start,
            ),
            Statement::DropTable { name, if_exists } => {
                DdlExecutor::drop_table(Self::database_mut(catalog, session)?, &name, if_exists)
            }
            Statement::Insert {
                table,
                columns,
                rows,
            } => {
                let table = Self::database_mut(catalog, session)?.get_table_mut(&table)?;
                DmlExecutor::insert(table, columns.as_deref(), &rows, &ctx, &write)
            }
            Statement::Update {
                table,
                assignments,
                filter,
            } => {
                let table = Self::database_mut(catalog, session)?.get_table_mut(&table)?;
                DmlExecutor::update(table, &assignments, filter.as_ref(), &ctx, &write)
            }
            Statement::Delete { table, filter } => {
                let table = Self::database_mut(catalog, session)?.get_table_mut(&table)?;
                DmlExecutor::delete(table, filter.as_ref(), &ctx)
            }
            other => Self::execute_read(catalog, session, config, &other),
        }
    }

    /// Execute a statement that leaves the catalog untouched. USE only
    /// changes the session.
    pub fn execute_read(
        catalog: &Catalog,
        session: &mut Session,
        config: &EngineConfig,
        statement: &Statement,
    ) -> Result<QueryResult, DatabaseError> {
        debug!("execute_read: {statement:?}");

        match statement {
            Statement::Select {
                distinct,
                items,
                from,
                filter,
                order_by,
                limit,
                offset,
            } => {
                let table = match from {
                    Some(name) => Some(Self::database(catalog, session)?.get_table(name)?),
                    None => None,
                };
                let ctx = FunctionContext {
                    now: statement_now(),
                    current_database: session.current_database(),
                };
                let query = SelectQuery {
                    distinct: *distinct,
                    items,
                    filter: filter.as_ref(),
                    order_by,
                    limit: *limit,
                    offset: *offset,
                };
                SelectExecutor::execute(table, &query, config.null_ordering, &ctx).map(QueryResult::Rows)
            }
            Statement::UseDatabase { name } => {
                catalog.get_database(name)?;
                session.set_current_database(Some(name.clone()));
                Ok(QueryResult::Success("Database changed".to_string()))
            }
            Statement::ShowDatabases => Ok(DdlExecutor::show_databases(catalog)),
            Statement::ShowTables => Ok(DdlExecutor::show_tables(Self::database(catalog, session)?)),
            Statement::Describe { table } => Ok(DdlExecutor::describe(
                Self::database(catalog, session)?.get_table(table)?,
            )),
            other => Err(DatabaseError::InvalidArguments(format!(
                "read-only execution of {other:?}"
            ))),
        }
    }

    /// The session's current database. A database dropped by another
    /// session counts as not selected.
    fn database<'c>(catalog: &'c Catalog, session: &Session) -> Result<&'c Database, DatabaseError> {
        let name = session
            .current_database()
            .ok_or(DatabaseError::NoDatabaseSelected)?;
        catalog
            .get_database(name)
            .map_err(|_| DatabaseError::NoDatabaseSelected)
    }

    fn database_mut<'c>(
        catalog: &'c mut Catalog,
        session: &Session,
    ) -> Result<&'c mut Database, DatabaseError> {
        let name = session
            .current_database()
            .ok_or(DatabaseError::NoDatabaseSelected)?;
        catalog
            .get_database_mut(name)
            .map_err(|_| DatabaseError::NoDatabaseSelected)
    }
}

/// NOW() for one statement: wall-clock time at second precision.
fn statement_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
