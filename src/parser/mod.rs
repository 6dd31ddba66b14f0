// Module declarations
mod statement;
mod common;
mod expressions;
mod ddl;
mod dml;
mod queries;
mod meta;

pub use statement::{
    Statement,
    ColumnDef,
    CompareOp,
    Condition,
    Expression,
    OrderByItem,
    SelectItem,
    SortKey,
    SortOrder,
    TrimSide,
};

use crate::types::DatabaseError;
use nom::branch::alt;

/// Parse one SQL statement. Surrounding whitespace and a trailing `;` are
/// allowed.
pub fn parse_statement(input: &str) -> Result<Statement, DatabaseError> {
    let input = input.trim();
    let input = input.strip_suffix(';').unwrap_or(input).trim_end();

    let result = alt((
        meta::show_databases,
        meta::show_tables,
        meta::describe,
        meta::use_database,
        ddl::create_database,
        ddl::drop_database,
        ddl::create_table,
        ddl::drop_table,
        dml::insert,
        queries::select,
        dml::update,
        dml::delete,
        dml::truncate,
    ))(input);

    match result {
        Ok((remaining, stmt)) => {
            if remaining.trim().is_empty() {
                Ok(stmt)
            } else {
                Err(DatabaseError::ParseError(format!(
                    "unexpected input near '{}'",
                    snippet(remaining)
                )))
            }
        }
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(DatabaseError::ParseError(
            format!("syntax error near '{}'", snippet(e.input)),
        )),
        Err(nom::Err::Incomplete(_)) => Err(DatabaseError::ParseError(
            "incomplete statement".to_string(),
        )),
    }
}

fn snippet(input: &str) -> String {
    input.trim().chars().take(40).collect()
}
