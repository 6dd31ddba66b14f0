// PrimerSQL - in-memory MySQL-flavoured relational engine
// Modular architecture: values and schema, row storage, parser, executor

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]

// Core database structures (values, types, schema, catalog)
pub mod core;

// Re-export all core types as types module
pub mod types {
    pub use crate::core::*;
}

// Engine configuration (config crate, PRIMERSQL_* environment)
pub mod config;

// Row storage (row arena, primary-key index, AUTO_INCREMENT)
pub mod storage;

// SQL parser (DDL, DML, queries, meta-commands)
pub mod parser;

// Statement executor (DDL, DML, SELECT, WHERE, string functions)
pub mod executor;

// Result rendering (text grid, JSON)
pub mod format;

// Engine facade and sessions
pub mod engine;

pub use config::{EngineConfig, NullOrdering, OverflowPolicy};
pub use core::{Catalog, Column, DataType, Database, DatabaseError, ErrorKind, Row, Table, Value};
pub use engine::{Engine, Session, SharedEngine};
pub use executor::{QueryExecutor, QueryResult, ResultSet};
pub use format::ResultFormatter;
pub use parser::{Statement, parse_statement};
