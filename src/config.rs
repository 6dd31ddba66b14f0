/// Engine configuration
///
/// Loaded with priority: environment (`PRIMERSQL_*`) > config file > defaults.
/// Nested keys use a double underscore, e.g. `PRIMERSQL_NULL_ORDERING=last`.

use crate::core::DatabaseError;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Where NULL lands in an ascending ORDER BY key. Descending keys reverse it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullOrdering {
    #[default]
    First,
    Last,
}

/// What happens when text exceeds a VARCHAR(n) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    #[default]
    Error,
    Truncate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub null_ordering: NullOrdering,
    #[serde(default)]
    pub varchar_overflow: OverflowPolicy,
    /// Created at startup and selected for every new session.
    #[serde(default)]
    pub default_database: Option<String>,
}

pub const ENV_PREFIX: &str = "PRIMERSQL";

impl EngineConfig {
    /// Load configuration from an optional TOML file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, DatabaseError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build()?.try_deserialize::<Self>()?;
        log::debug!("loaded engine config: {config:?}");
        Ok(config)
    }

    #[must_use]
    pub fn with_default_database(mut self, name: &str) -> Self {
        self.default_database = Some(name.to_string());
        self
    }

    #[must_use]
    pub const fn with_null_ordering(mut self, ordering: NullOrdering) -> Self {
        self.null_ordering = ordering;
        self
    }

    #[must_use]
    pub const fn with_varchar_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.varchar_overflow = policy;
        self
    }
}
