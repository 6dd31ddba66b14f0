use super::common::{bare_function_name, column_name, identifier, keyword, literal, ws};
use super::statement::{CompareOp, Condition, Expression, TrimSide};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{map, opt, value as constant},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

fn trim_side(input: &str) -> IResult<&str, TrimSide> {
    alt((
        constant(TrimSide::Both, keyword("BOTH")),
        constant(TrimSide::Leading, keyword("LEADING")),
        constant(TrimSide::Trailing, keyword("TRAILING")),
    ))(input)
}

// TRIM([BOTH|LEADING|TRAILING] [remstr] FROM str) | TRIM(str)
fn trim_call(input: &str) -> IResult<&str, Expression> {
    let (input, _) = ws(keyword("TRIM"))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, (side, remove, source)) = alt((
        map(
            tuple((
                opt(ws(trim_side)),
                opt(ws(expression)),
                preceded(ws(keyword("FROM")), ws(expression)),
            )),
            |(side, remove, source)| (side.unwrap_or(TrimSide::Both), remove, source),
        ),
        map(ws(expression), |source| (TrimSide::Both, None, source)),
    ))(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((
        input,
        Expression::Trim {
            side,
            remove: remove.map(Box::new),
            source: Box::new(source),
        },
    ))
}

// CURRENT_TIMESTAMP is a pseudo-literal; the parentheses are optional
pub fn current_timestamp(input: &str) -> IResult<&str, Expression> {
    map(
        terminated(
            keyword("CURRENT_TIMESTAMP"),
            opt(pair(ws(char('(')), char(')'))),
        ),
        |_| Expression::Function {
            name: "NOW".to_string(),
            args: Vec::new(),
        },
    )(input)
}

fn function_call(input: &str) -> IResult<&str, Expression> {
    let (input, name) = bare_function_name(input)?;
    let (input, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    )(input)?;

    Ok((
        input,
        Expression::Function {
            name: name.to_ascii_uppercase(),
            args,
        },
    ))
}

// `col` or `tbl.col`; the table qualifier is dropped
fn column_ref(input: &str) -> IResult<&str, Expression> {
    map(
        preceded(opt(terminated(identifier, char('.'))), column_name),
        Expression::Column,
    )(input)
}

pub fn expression(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        trim_call,
        current_timestamp,
        function_call,
        map(literal, Expression::Literal),
        column_ref,
        delimited(ws(char('(')), expression, ws(char(')'))),
    )))(input)
}

fn compare_op(input: &str) -> IResult<&str, CompareOp> {
    alt((
        constant(CompareOp::NotEq, tag("<>")),
        constant(CompareOp::NotEq, tag("!=")),
        constant(CompareOp::LtEq, tag("<=")),
        constant(CompareOp::GtEq, tag(">=")),
        constant(CompareOp::Eq, tag("=")),
        constant(CompareOp::Lt, tag("<")),
        constant(CompareOp::Gt, tag(">")),
    ))(input)
}

fn negation(input: &str) -> IResult<&str, bool> {
    map(opt(ws(keyword("NOT"))), |not| not.is_some())(input)
}

// expr IS [NOT] NULL | expr [NOT] BETWEEN a AND b | expr [NOT] IN (...) |
// expr [NOT] LIKE pattern | expr op expr
fn predicate(input: &str) -> IResult<&str, Condition> {
    let (input, left) = expression(input)?;

    alt((
        map(
            delimited(ws(keyword("IS")), negation, ws(keyword("NULL"))),
            |negated| Condition::IsNull {
                expr: left.clone(),
                negated,
            },
        ),
        map(
            tuple((
                negation,
                ws(keyword("BETWEEN")),
                expression,
                ws(keyword("AND")),
                expression,
            )),
            |(negated, _, low, _, high)| Condition::Between {
                expr: left.clone(),
                low,
                high,
                negated,
            },
        ),
        map(
            tuple((
                negation,
                ws(keyword("IN")),
                delimited(
                    ws(char('(')),
                    separated_list1(ws(char(',')), expression),
                    ws(char(')')),
                ),
            )),
            |(negated, _, list)| Condition::In {
                expr: left.clone(),
                list,
                negated,
            },
        ),
        map(
            tuple((negation, ws(keyword("LIKE")), expression)),
            |(negated, _, pattern)| Condition::Like {
                expr: left.clone(),
                pattern,
                negated,
            },
        ),
        map(pair(ws(compare_op), expression), |(op, right)| {
            Condition::Comparison {
                left: left.clone(),
                op,
                right,
            }
        }),
    ))(input)
}

fn primary_condition(input: &str) -> IResult<&str, Condition> {
    alt((
        delimited(ws(char('(')), condition, ws(char(')'))),
        predicate,
    ))(input)
}

fn not_condition(input: &str) -> IResult<&str, Condition> {
    alt((
        map(preceded(ws(keyword("NOT")), not_condition), |inner| {
            Condition::Not(Box::new(inner))
        }),
        primary_condition,
    ))(input)
}

// AND binds tighter than OR
fn and_condition(input: &str) -> IResult<&str, Condition> {
    let (input, first) = not_condition(input)?;
    let (input, rest) = many0(preceded(ws(keyword("AND")), not_condition))(input)?;

    let folded = rest
        .into_iter()
        .fold(first, |acc, next| Condition::And(Box::new(acc), Box::new(next)));
    Ok((input, folded))
}

pub fn condition(input: &str) -> IResult<&str, Condition> {
    let (input, first) = and_condition(input)?;
    let (input, rest) = many0(preceded(ws(keyword("OR")), and_condition))(input)?;

    let folded = rest
        .into_iter()
        .fold(first, |acc, next| Condition::Or(Box::new(acc), Box::new(next)));
    Ok((input, folded))
}
