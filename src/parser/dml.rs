use super::common::{column_name, identifier, keyword, ws};
use super::expressions::{condition, expression};
use super::statement::{Expression, Statement};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::opt,
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded, separated_pair},
    IResult,
};

fn value_tuple(input: &str) -> IResult<&str, Vec<Expression>> {
    delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )(input)
}

pub fn insert(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("INSERT"))(input)?;
    let (input, _) = opt(ws(keyword("INTO")))(input)?;
    let (input, table) = ws(identifier)(input)?;
    let (input, columns) = opt(delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), ws(column_name)),
        ws(char(')')),
    ))(input)?;
    let (input, _) = ws(alt((keyword("VALUES"), keyword("VALUE"))))(input)?;
    let (input, rows) = separated_list1(ws(char(',')), value_tuple)(input)?;

    Ok((
        input,
        Statement::Insert {
            table,
            columns,
            rows,
        },
    ))
}

pub fn update(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("UPDATE"))(input)?;
    let (input, table) = ws(identifier)(input)?;
    let (input, _) = ws(keyword("SET"))(input)?;
    let (input, assignments) = separated_list1(
        ws(char(',')),
        separated_pair(ws(column_name), ws(char('=')), expression),
    )(input)?;
    let (input, filter) = opt(preceded(ws(keyword("WHERE")), condition))(input)?;

    Ok((
        input,
        Statement::Update {
            table,
            assignments,
            filter,
        },
    ))
}

pub fn delete(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("DELETE FROM"))(input)?;
    let (input, table) = ws(identifier)(input)?;
    let (input, filter) = opt(preceded(ws(keyword("WHERE")), condition))(input)?;

    Ok((input, Statement::Delete { table, filter }))
}

// TRUNCATE [TABLE] t behaves like DELETE without WHERE
pub fn truncate(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("TRUNCATE"))(input)?;
    let (input, _) = opt(ws(keyword("TABLE")))(input)?;
    let (input, table) = ws(identifier)(input)?;

    Ok((input, Statement::Delete { table, filter: None }))
}
