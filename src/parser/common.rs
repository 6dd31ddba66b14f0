use crate::types::{DataType, Value};
use rust_decimal::Decimal;
use std::str::FromStr;
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{alpha1, char, digit1, multispace0, multispace1, satisfy},
    combinator::{map, map_res, not, opt, recognize, value as constant, verify},
    error::{Error, ErrorKind},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

/// Words that cannot be used as bare column names or aliases.
const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "AND", "OR", "NOT", "ORDER", "BY", "LIMIT", "OFFSET", "AS", "ASC",
    "DESC", "LIKE", "IS", "NULL", "IN", "BETWEEN", "DISTINCT", "VALUES", "SET", "INTO", "TRUE",
    "FALSE",
];

pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Case-insensitive keyword that must end on a word boundary.
///
/// Multi-word keywords (`"PRIMARY KEY"`) accept any whitespace between words.
pub fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let mut rest = input;
        for (i, word) in kw.split_whitespace().enumerate() {
            if i > 0 {
                rest = multispace1(rest)?.0;
            }
            rest = tag_no_case(word)(rest)?.0;
            rest = not(satisfy(is_ident_char))(rest)?.0;
        }
        Ok((rest, &input[..input.len() - rest.len()]))
    }
}

fn bare_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, recognize(char('_')))),
        take_while(is_ident_char),
    ))(input)
}

fn quoted_identifier(input: &str) -> IResult<&str, String> {
    map(
        delimited(char('`'), take_while1(|c| c != '`'), char('`')),
        str::to_string,
    )(input)
}

/// Database or table name; reserved words are allowed here.
pub fn identifier(input: &str) -> IResult<&str, String> {
    alt((quoted_identifier, map(bare_identifier, str::to_string)))(input)
}

pub fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Column name or alias: bare names must not be reserved words.
pub fn column_name(input: &str) -> IResult<&str, String> {
    alt((
        quoted_identifier,
        map(verify(bare_identifier, |s: &str| !is_reserved(s)), str::to_string),
    ))(input)
}

pub fn bare_function_name(input: &str) -> IResult<&str, &str> {
    verify(bare_identifier, |s: &str| !is_reserved(s))(input)
}

/// Quoted string literal.
///
/// Either quote character may be used; the quote is escaped by doubling it or
/// with a backslash. `\%` and `\_` keep their backslash so LIKE can tell a
/// literal wildcard from a real one.
pub fn string_literal(input: &str) -> IResult<&str, String> {
    let quote = match input.chars().next() {
        Some(q @ ('\'' | '"')) => q,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    let mut chars = input.char_indices().skip(1).peekable();
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                chars.next();
                out.push(quote);
                continue;
            }
            return Ok((&input[idx + c.len_utf8()..], out));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, '0')) => out.push('\0'),
            Some((_, wildcard @ ('%' | '_'))) => {
                out.push('\\');
                out.push(wildcard);
            }
            Some((_, other)) => out.push(other),
            None => break,
        }
    }

    // unterminated literal
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

pub fn number(input: &str) -> IResult<&str, Value> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            not(satisfy(is_ident_char)),
        ))),
        |s: &str| -> Result<Value, rust_decimal::Error> {
            if !s.contains('.') {
                if let Ok(int) = s.parse::<i64>() {
                    return Ok(Value::Integer(int));
                }
            }
            Decimal::from_str(s).map(Value::Decimal)
        },
    )(input)
}

pub fn unsigned(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse::<usize>)(input)
}

pub fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        constant(Value::Null, keyword("NULL")),
        constant(Value::Integer(1), keyword("TRUE")),
        constant(Value::Integer(0), keyword("FALSE")),
        number,
        map(string_literal, Value::Text),
    ))(input)
}

fn length(input: &str) -> IResult<&str, usize> {
    delimited(ws(char('(')), ws(unsigned), ws(char(')')))(input)
}

fn precision(input: &str) -> IResult<&str, u8> {
    map_res(digit1, str::parse::<u8>)(input)
}

pub fn data_type(input: &str) -> IResult<&str, DataType> {
    alt((
        // integer display widths like INT(11) are accepted and ignored
        map(
            pair(
                alt((
                    keyword("INTEGER"),
                    keyword("INT"),
                    keyword("BIGINT"),
                    keyword("SMALLINT"),
                    keyword("TINYINT"),
                )),
                opt(length),
            ),
            |_| DataType::Int,
        ),
        map(
            pair(
                alt((keyword("DECIMAL"), keyword("NUMERIC"), keyword("DEC"))),
                opt(delimited(
                    ws(char('(')),
                    pair(ws(precision), opt(preceded(ws(char(',')), ws(precision)))),
                    ws(char(')')),
                )),
            ),
            |(_, params)| match params {
                Some((precision, scale)) => DataType::Decimal {
                    precision,
                    scale: scale.unwrap_or(0),
                },
                None => DataType::DEFAULT_DECIMAL,
            },
        ),
        map(preceded(keyword("VARCHAR"), length), |max_length| DataType::Varchar { max_length }),
        map(preceded(keyword("CHAR"), opt(length)), |len| DataType::Varchar {
            max_length: len.unwrap_or(1),
        }),
        constant(DataType::Text, keyword("TEXT")),
        constant(DataType::DateTime, alt((keyword("DATETIME"), keyword("TIMESTAMP")))),
    ))(input)
}
