use super::common::{identifier, keyword, ws};
use super::statement::Statement;
use nom::{
    branch::alt,
    combinator::{map, opt},
    sequence::{pair, preceded},
    IResult,
};

pub fn show_tables(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("SHOW"))(input)?;
    let (input, _) = opt(ws(keyword("FULL")))(input)?;
    let (input, _) = ws(keyword("TABLES"))(input)?;
    Ok((input, Statement::ShowTables))
}

pub fn show_databases(input: &str) -> IResult<&str, Statement> {
    let (input, _) = pair(
        ws(keyword("SHOW")),
        ws(alt((keyword("DATABASES"), keyword("SCHEMAS")))),
    )(input)?;
    Ok((input, Statement::ShowDatabases))
}

// DESCRIBE t | DESC t | SHOW [FULL] COLUMNS FROM t
pub fn describe(input: &str) -> IResult<&str, Statement> {
    map(
        alt((
            preceded(ws(alt((keyword("DESCRIBE"), keyword("DESC")))), ws(identifier)),
            preceded(
                pair(
                    ws(keyword("SHOW")),
                    pair(opt(ws(keyword("FULL"))), ws(alt((keyword("COLUMNS"), keyword("FIELDS"))))),
                ),
                preceded(ws(alt((keyword("FROM"), keyword("IN")))), ws(identifier)),
            ),
        )),
        |table| Statement::Describe { table },
    )(input)
}

pub fn use_database(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("USE"))(input)?;
    let (input, name) = ws(identifier)(input)?;
    Ok((input, Statement::UseDatabase { name }))
}
