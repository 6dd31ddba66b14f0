use crate::types::DefaultValue;
use super::common::{data_type, identifier, keyword, literal, number, ws};
use super::expressions::current_timestamp;
use super::statement::{ColumnDef, Statement};
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, map_res, opt, value as constant},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

#[derive(Debug, Clone, PartialEq)]
enum ColumnOption {
    NotNull,
    Null,
    Default(DefaultValue),
    PrimaryKey,
    AutoIncrement,
    OnUpdateNow,
}

enum TableElement {
    Column(ColumnDef),
    PrimaryKey(Vec<String>),
}

fn now_literal(input: &str) -> IResult<&str, ()> {
    alt((
        map(current_timestamp, |_| ()),
        map(
            tuple((keyword("NOW"), ws(char('(')), char(')'))),
            |_| (),
        ),
    ))(input)
}

fn default_value(input: &str) -> IResult<&str, DefaultValue> {
    alt((
        constant(DefaultValue::CurrentTimestamp, now_literal),
        map(literal, DefaultValue::Literal),
    ))(input)
}

fn column_option(input: &str) -> IResult<&str, ColumnOption> {
    ws(alt((
        constant(ColumnOption::NotNull, keyword("NOT NULL")),
        constant(ColumnOption::Null, keyword("NULL")),
        map(preceded(ws(keyword("DEFAULT")), default_value), ColumnOption::Default),
        constant(ColumnOption::PrimaryKey, keyword("PRIMARY KEY")),
        constant(ColumnOption::AutoIncrement, keyword("AUTO_INCREMENT")),
        constant(ColumnOption::OnUpdateNow, preceded(ws(keyword("ON UPDATE")), now_literal)),
    )))(input)
}

fn column_def(input: &str) -> IResult<&str, ColumnDef> {
    let (input, name) = ws(identifier)(input)?;
    let (input, data_type) = ws(data_type)(input)?;
    let (input, options) = many0(column_option)(input)?;

    let mut column = ColumnDef {
        name,
        data_type,
        not_null: false,
        default: None,
        primary_key: false,
        auto_increment: false,
        on_update_now: false,
    };
    for option in options {
        match option {
            ColumnOption::NotNull => column.not_null = true,
            ColumnOption::Null => column.not_null = false,
            ColumnOption::Default(default) => column.default = Some(default),
            ColumnOption::PrimaryKey => column.primary_key = true,
            ColumnOption::AutoIncrement => column.auto_increment = true,
            ColumnOption::OnUpdateNow => column.on_update_now = true,
        }
    }

    Ok((input, column))
}

fn name_list(input: &str) -> IResult<&str, Vec<String>> {
    delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), ws(identifier)),
        ws(char(')')),
    )(input)
}

// [CONSTRAINT name] PRIMARY KEY (a, b)
fn table_primary_key(input: &str) -> IResult<&str, Vec<String>> {
    preceded(
        pair(
            opt(pair(ws(keyword("CONSTRAINT")), ws(identifier))),
            ws(keyword("PRIMARY KEY")),
        ),
        name_list,
    )(input)
}

fn table_element(input: &str) -> IResult<&str, TableElement> {
    alt((
        map(table_primary_key, TableElement::PrimaryKey),
        map(column_def, TableElement::Column),
    ))(input)
}

// AUTO_INCREMENT = n is kept; ENGINE and CHARSET are accepted and ignored
fn table_option(input: &str) -> IResult<&str, Option<i64>> {
    ws(alt((
        map(
            preceded(
                pair(ws(keyword("AUTO_INCREMENT")), opt(ws(char('=')))),
                map_res(number, |v| v.as_int().ok_or("AUTO_INCREMENT needs an integer")),
            ),
            Some,
        ),
        map(
            tuple((
                opt(ws(keyword("DEFAULT"))),
                ws(alt((keyword("ENGINE"), keyword("CHARSET"), keyword("CHARACTER SET")))),
                opt(ws(char('='))),
                ws(identifier),
            )),
            |_| None,
        ),
    )))(input)
}

fn if_not_exists(input: &str) -> IResult<&str, bool> {
    map(opt(ws(keyword("IF NOT EXISTS"))), |found| found.is_some())(input)
}

fn if_exists(input: &str) -> IResult<&str, bool> {
    map(opt(ws(keyword("IF EXISTS"))), |found| found.is_some())(input)
}

pub fn create_table(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("CREATE TABLE"))(input)?;
    let (input, if_not_exists) = if_not_exists(input)?;
    let (input, name) = ws(identifier)(input)?;
    let (input, elements) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), table_element),
        ws(char(')')),
    )(input)?;
    let (input, options) = many0(table_option)(input)?;

    let mut columns = Vec::new();
    let mut primary_keys = Vec::new();
    for element in elements {
        match element {
            TableElement::Column(column) => columns.push(column),
            TableElement::PrimaryKey(names) => primary_keys.push(names),
        }
    }

    Ok((
        input,
        Statement::CreateTable {
            name,
            if_not_exists,
            columns,
            primary_keys,
            auto_increment_start: options.into_iter().flatten().last(),
        },
    ))
}

pub fn drop_table(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("DROP TABLE"))(input)?;
    let (input, if_exists) = if_exists(input)?;
    let (input, name) = ws(identifier)(input)?;

    Ok((input, Statement::DropTable { name, if_exists }))
}

pub fn create_database(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("CREATE"))(input)?;
    let (input, _) = ws(alt((keyword("DATABASE"), keyword("SCHEMA"))))(input)?;
    let (input, if_not_exists) = if_not_exists(input)?;
    let (input, name) = ws(identifier)(input)?;

    Ok((input, Statement::CreateDatabase { name, if_not_exists }))
}

pub fn drop_database(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("DROP"))(input)?;
    let (input, _) = ws(alt((keyword("DATABASE"), keyword("SCHEMA"))))(input)?;
    let (input, if_exists) = if_exists(input)?;
    let (input, name) = ws(identifier)(input)?;

    Ok((input, Statement::DropDatabase { name, if_exists }))
}
