//! Parse the user input.
//!
//! The parsers only split the input into its parts. Amounts are kept as
//! text, since deciding whether they are valid is up to the validator.

mod expense;

use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt},
    multi::many0,
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};

pub use expense::parse_expense;

use crate::{error::InputError, types::Member};

/// Parse a group ID followed by its members, e.g. `group1 m1=Alice m2="Bob Smith"`.
pub fn parse_group_and_members(s: &str) -> Result<(String, Vec<Member>), InputError> {
    let (_, (group_id, members)) = all_consuming(delimited(
        multispace0,
        parse_group_and_members_impl,
        multispace0,
    ))(s)
    .map_err(InputError::invalid_group_syntax)?;

    Ok((group_id, members))
}

fn parse_group_and_members_impl(s: &str) -> IResult<&str, (String, Vec<Member>)> {
    let (s, group_id) = parse_word(s)?;
    let (s, members) = many0(preceded(
        multispace1,
        map(
            separated_pair(parse_word, char('='), parse_text),
            |(id, name)| Member::new(id, &name),
        ),
    ))(s)?;
    Ok((s, (group_id.to_string(), members)))
}

/// A run of characters up to the next whitespace, `=` or `"`.
fn parse_word(s: &str) -> IResult<&str, &str> {
    is_not(" \t\r\n=\"")(s)
}

/// A run of characters up to the next whitespace. May be empty.
fn parse_token(s: &str) -> IResult<&str, &str> {
    map(opt(is_not(" \t\r\n")), |t| t.unwrap_or(""))(s)
}

/// Either a double-quoted string (which may contain whitespace) or a word.
fn parse_text(s: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(char('"'), opt(is_not("\"")), char('"')),
            |t: Option<&str>| t.unwrap_or("").to_string(),
        ),
        map(parse_word, |w| w.to_string()),
    ))(s)
}

/// An assignment like `m1=60`; the value may be empty.
fn parse_assignment(s: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(parse_word, char('='), parse_token)(s)
}

/// Apply `parser` and skip the whitespace after it.
fn spaced<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    terminated(parser, multispace0)
}
