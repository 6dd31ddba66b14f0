// In-memory row storage: append-ordered row arena per table with
// primary-key index and AUTO_INCREMENT counter.

pub mod auto_increment;
pub mod row_store;

pub use auto_increment::AutoIncrement;
pub use row_store::{InsertOutcome, RowStore, Rows};

use crate::config::OverflowPolicy;
use chrono::NaiveDateTime;

/// Statement-wide inputs for a mutation.
#[derive(Debug, Clone, Copy)]
pub struct WriteContext {
    /// Value of NOW() for the whole statement.
    pub now: NaiveDateTime,
    pub overflow: OverflowPolicy,
}

impl WriteContext {
    #[must_use]
    pub const fn new(now: NaiveDateTime, overflow: OverflowPolicy) -> Self {
        Self { now, overflow }
    }
}
