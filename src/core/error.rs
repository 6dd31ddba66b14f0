use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Can't create database '{0}'; database exists")]
    DuplicateDatabase(String),
    #[error("Unknown database '{0}'")]
    NoSuchDatabase(String),
    #[error("No database selected")]
    NoDatabaseSelected,
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),
    #[error("Table '{0}' doesn't exist")]
    NoSuchTable(String),
    #[error("Invalid table definition: {0}")]
    InvalidSchema(String),
    #[error("Field '{0}' doesn't have a default value")]
    MissingRequiredColumn(String),
    #[error("Column '{0}' cannot be null")]
    NullNotAllowed(String),
    #[error("Incorrect {expected} value: '{value}' for column '{column}'")]
    TypeMismatch {
        column: String,
        expected: String,
        value: String,
    },
    #[error("Data too long for column '{column}' (max {max_length} characters)")]
    ValueTooLong { column: String, max_length: usize },
    #[error("Out of range value for column '{column}': {value}")]
    OutOfRange { column: String, value: String },
    #[error("Duplicate entry '{entry}' for key '{key}'")]
    DuplicateKey { entry: String, key: String },
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Column '{0}' specified twice")]
    ColumnSpecifiedTwice(String),
    #[error("Column count doesn't match value count at row {0}")]
    ColumnCountMismatch(usize),
    #[error("FUNCTION {0} does not exist")]
    UnknownFunction(String),
    #[error("Incorrect arguments to {0}")]
    InvalidArguments(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JSON Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Payload-free tag for matching on the failure class of a [`DatabaseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateDatabase,
    NoSuchDatabase,
    NoDatabaseSelected,
    DuplicateTable,
    NoSuchTable,
    InvalidSchema,
    MissingRequiredColumn,
    NullNotAllowed,
    TypeMismatch,
    ValueTooLong,
    OutOfRange,
    DuplicateKey,
    UnknownColumn,
    ColumnSpecifiedTwice,
    ColumnCountMismatch,
    UnknownFunction,
    InvalidArguments,
    Parse,
    Config,
    Serialization,
}

impl DatabaseError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateDatabase(_) => ErrorKind::DuplicateDatabase,
            Self::NoSuchDatabase(_) => ErrorKind::NoSuchDatabase,
            Self::NoDatabaseSelected => ErrorKind::NoDatabaseSelected,
            Self::DuplicateTable(_) => ErrorKind::DuplicateTable,
            Self::NoSuchTable(_) => ErrorKind::NoSuchTable,
            Self::InvalidSchema(_) => ErrorKind::InvalidSchema,
            Self::MissingRequiredColumn(_) => ErrorKind::MissingRequiredColumn,
            Self::NullNotAllowed(_) => ErrorKind::NullNotAllowed,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::ValueTooLong { .. } => ErrorKind::ValueTooLong,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::UnknownColumn(_) => ErrorKind::UnknownColumn,
            Self::ColumnSpecifiedTwice(_) => ErrorKind::ColumnSpecifiedTwice,
            Self::ColumnCountMismatch(_) => ErrorKind::ColumnCountMismatch,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::ParseError(_) => ErrorKind::Parse,
            Self::Config(_) => ErrorKind::Config,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}
