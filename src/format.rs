/// Result rendering: a text grid for people, JSON for programs.

use crate::executor::{QueryResult, ResultSet};
use crate::types::{DatabaseError, Value};
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};
use serde_json::{Map, Value as Json, json};
use std::collections::HashSet;

pub struct ResultFormatter;

impl ResultFormatter {
    #[must_use]
    pub fn render(result: &QueryResult) -> String {
        match result {
            QueryResult::Success(msg) => format!("{msg}\n"),
            QueryResult::Mutation { affected, .. } => {
                let noun = if *affected == 1 { "row" } else { "rows" };
                format!("Query OK, {affected} {noun} affected\n")
            }
            QueryResult::Rows(set) => Self::render_rows(set),
        }
    }

    fn render_rows(set: &ResultSet) -> String {
        if set.rows.is_empty() {
            return "Empty set\n".to_string();
        }

        let mut table = ComfyTable::new();
        table.load_preset(UTF8_FULL);
        table.set_header(set.columns.iter().map(Cell::new));
        for row in &set.rows {
            table.add_row(row.iter().map(|value| Cell::new(value.to_string())));
        }

        let noun = if set.rows.len() == 1 { "row" } else { "rows" };
        format!("{table}\n({} {noun})\n", set.rows.len())
    }

    /// Rows become an array of objects keyed by column label. Decimals are
    /// emitted as strings so their scale survives.
    pub fn to_json(result: &QueryResult) -> Result<String, DatabaseError> {
        let document = match result {
            QueryResult::Success(msg) => json!({ "message": msg }),
            QueryResult::Mutation {
                affected,
                last_insert_id,
            } => json!({ "affected": affected, "last_insert_id": last_insert_id }),
            QueryResult::Rows(set) => {
                let keys = unique_keys(&set.columns);
                Json::Array(
                    set.rows
                        .iter()
                        .map(|row| {
                            let object: Map<String, Json> = keys
                                .iter()
                                .cloned()
                                .zip(row.iter().map(json_value))
                                .collect();
                            Json::Object(object)
                        })
                        .collect(),
                )
            }
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Object keys for the output labels. A repeated label gets a `_2`, `_3`
/// suffix so no column is lost.
fn unique_keys(labels: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(labels.len());
    labels
        .iter()
        .map(|label| {
            let mut key = label.clone();
            let mut n = 2;
            while !used.insert(key.clone()) {
                key = format!("{label}_{n}");
                n += 1;
            }
            key
        })
        .collect()
}

fn json_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(i) => json!(i),
        Value::Decimal(_) | Value::Text(_) | Value::DateTime(_) => Json::String(value.to_string()),
    }
}
