use serde::{Deserialize, Serialize};
use super::value::Value;

/// Arena identifier of a row within its table. Never reused.
pub type RowId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub values: Vec<Value>,
}

impl Row {
    #[must_use]
    pub const fn new(id: RowId, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}
