use super::common::{column_name, identifier, keyword, string_literal, unsigned, ws};
use super::expressions::{condition, expression};
use super::statement::{OrderByItem, SelectItem, SortKey, SortOrder, Statement};
use nom::{
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{consumed, map, not, opt, value as constant},
    multi::separated_list1,
    sequence::{pair, preceded, separated_pair, terminated, tuple},
    IResult,
};

fn alias(input: &str) -> IResult<&str, String> {
    alt((
        preceded(ws(keyword("AS")), ws(alt((column_name, string_literal, identifier)))),
        ws(column_name),
    ))(input)
}

fn select_item(input: &str) -> IResult<&str, SelectItem> {
    alt((
        constant(SelectItem::Wildcard, ws(char('*'))),
        map(
            pair(ws(consumed(expression)), opt(alias)),
            |((text, expr), alias)| SelectItem::Expr {
                expr,
                label: text.trim().to_string(),
                alias,
            },
        ),
    ))(input)
}

fn sort_order(input: &str) -> IResult<&str, SortOrder> {
    alt((
        constant(SortOrder::Asc, keyword("ASC")),
        constant(SortOrder::Desc, keyword("DESC")),
    ))(input)
}

fn sort_key(input: &str) -> IResult<&str, SortKey> {
    alt((
        // a bare integer is an output column position
        map(
            ws(terminated(unsigned, not(satisfy(|c: char| c.is_alphanumeric() || c == '.')))),
            SortKey::Position,
        ),
        map(expression, SortKey::Expr),
    ))(input)
}

fn order_by_item(input: &str) -> IResult<&str, OrderByItem> {
    map(pair(sort_key, opt(ws(sort_order))), |(key, order)| OrderByItem {
        key,
        order: order.unwrap_or_default(),
    })(input)
}

// LIMIT n | LIMIT offset, n | LIMIT n OFFSET offset  ->  (offset, n)
fn limit_clause(input: &str) -> IResult<&str, (Option<usize>, usize)> {
    alt((
        map(
            separated_pair(ws(unsigned), char(','), ws(unsigned)),
            |(offset, count)| (Some(offset), count),
        ),
        map(
            pair(ws(unsigned), opt(preceded(ws(keyword("OFFSET")), ws(unsigned)))),
            |(count, offset)| (offset, count),
        ),
    ))(input)
}

pub fn select(input: &str) -> IResult<&str, Statement> {
    let (input, _) = ws(keyword("SELECT"))(input)?;
    let (input, distinct) = opt(ws(keyword("DISTINCT")))(input)?;
    let (input, items) = separated_list1(ws(char(',')), select_item)(input)?;
    let (input, from) = opt(preceded(ws(keyword("FROM")), ws(identifier)))(input)?;
    let (input, filter) = opt(preceded(ws(keyword("WHERE")), condition))(input)?;
    let (input, order_by) = opt(preceded(
        tuple((ws(keyword("ORDER")), ws(keyword("BY")))),
        separated_list1(ws(char(',')), order_by_item),
    ))(input)?;
    let (input, limit) = opt(preceded(ws(keyword("LIMIT")), limit_clause))(input)?;

    let (offset, limit) = match limit {
        Some((offset, count)) => (offset, Some(count)),
        None => (None, None),
    };

    Ok((
        input,
        Statement::Select {
            distinct: distinct.is_some(),
            items,
            from,
            filter,
            order_by: order_by.unwrap_or_default(),
            limit,
            offset,
        },
    ))
}
