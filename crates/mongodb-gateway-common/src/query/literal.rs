use mongodb::bson::{Bson, Document};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag},
    character::complete::{char, digit1, multispace0, none_of, one_of},
    combinator::{all_consuming, cut, map, map_res, opt, recognize, success, value},
    multi::separated_list0,
    sequence::{delimited, pair, separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

/// Error raised when input does not conform to the restricted literal grammar.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct LiteralError(String);

/// Parses a restricted literal grammar into BSON: objects, arrays, parenthesized tuples (treated
/// as arrays), single- or double-quoted strings, numbers, booleans, and null. Python-style
/// spellings (`True`, `False`, `None`, tuples) are accepted so that existing clients keep
/// working. Anything outside the grammar - identifiers, calls, operators - is rejected, so
/// query parameters can never smuggle in code.
pub fn parse_literal(input: &str) -> Result<Bson, LiteralError> {
    match all_consuming(ws(literal))(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(err) => Err(LiteralError(format!("{err}"))),
    }
}

fn literal(input: &str) -> IResult<&str, Bson> {
    alt((
        object,
        array,
        tuple_literal,
        map(string, Bson::String),
        number,
        boolean,
        null,
    ))(input)
}

fn object(input: &str) -> IResult<&str, Bson> {
    let entry = separated_pair(ws(string), char(':'), ws(literal));
    let entries = separated_list0(char(','), entry);
    map(
        delimited(
            char('{'),
            cut(terminated(entries, multispace0)),
            cut(char('}')),
        ),
        |pairs| Bson::Document(pairs.into_iter().collect::<Document>()),
    )(input)
}

fn array(input: &str) -> IResult<&str, Bson> {
    map(
        delimited(char('['), cut(elements), cut(char(']'))),
        Bson::Array,
    )(input)
}

// Sort specs arrive as Python tuples, for example `[('precio',-1)]`.
fn tuple_literal(input: &str) -> IResult<&str, Bson> {
    map(
        delimited(char('('), cut(elements), cut(char(')'))),
        Bson::Array,
    )(input)
}

fn elements(input: &str) -> IResult<&str, Vec<Bson>> {
    terminated(separated_list0(char(','), ws(literal)), multispace0)(input)
}

fn string(input: &str) -> IResult<&str, String> {
    alt((single_quoted, double_quoted))(input)
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        alt((
            escaped_transform(none_of("\\'"), '\\', escape_sequence),
            success(String::new()),
        )),
        char('\''),
    )(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    delimited(
        char('"'),
        alt((
            escaped_transform(none_of("\\\""), '\\', escape_sequence),
            success(String::new()),
        )),
        char('"'),
    )(input)
}

fn escape_sequence(input: &str) -> IResult<&str, char> {
    alt((
        value('\'', char('\'')),
        value('"', char('"')),
        value('\\', char('\\')),
        value('/', char('/')),
        value('\n', char('n')),
        value('\r', char('r')),
        value('\t', char('t')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, Bson> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: &str| -> Result<Bson, std::num::ParseFloatError> {
            if text.bytes().any(|byte| matches!(byte, b'.' | b'e' | b'E')) {
                text.parse::<f64>().map(Bson::Double)
            } else {
                match text.parse::<i64>() {
                    Ok(integer) => Ok(Bson::Int64(integer)),
                    // Integers too large for i64 degrade to floating point.
                    Err(_) => text.parse::<f64>().map(Bson::Double),
                }
            }
        },
    )(input)
}

fn boolean(input: &str) -> IResult<&str, Bson> {
    alt((
        value(Bson::Boolean(true), alt((tag("true"), tag("True")))),
        value(Bson::Boolean(false), alt((tag("false"), tag("False")))),
    ))(input)
}

fn null(input: &str) -> IResult<&str, Bson> {
    value(Bson::Null, alt((tag("null"), tag("None"))))(input)
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}
