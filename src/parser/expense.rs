//! Parse an expense.
//!
//! Syntax: `group_id title amount category paid:member_id member_id=split...`.
//! The title and the category can be double-quoted to include spaces.
//! Each member can appear at most once in the split.

use std::collections::HashMap;

use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, map, map_res, opt},
    multi::many0,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::{
    error::InputError,
    types::{ExpenseForm, GroupId},
};

use super::{parse_assignment, parse_text, parse_token, parse_word, spaced};

/// Parse an expense submitted by the user into the group it belongs to and the
/// raw form. No amount is checked here.
pub fn parse_expense(s: &str) -> Result<(GroupId, ExpenseForm), InputError> {
    let (_, result) = all_consuming(delimited(multispace0, parse_expense_impl, multispace0))(s)
        .map_err(InputError::invalid_expense_syntax)?;
    Ok(result)
}

fn parse_expense_impl(s: &str) -> IResult<&str, (GroupId, ExpenseForm)> {
    let (s, (group_id, title, amount, category, paid_by)) = tuple((
        spaced(parse_word),
        spaced(parse_text),
        spaced(parse_token),
        spaced(parse_text),
        parse_paid_by,
    ))(s)?;
    let (s, split_detail) = parse_split_detail(s)?;

    let form = ExpenseForm {
        title,
        amount: amount.to_string(),
        category,
        paid_by: paid_by.to_string(),
        split_detail,
    };

    Ok((s, (group_id.to_string(), form)))
}

/// `paid:m1`; the member ID may be left empty.
fn parse_paid_by(s: &str) -> IResult<&str, &str> {
    preceded(tag("paid:"), map(opt(parse_word), |p| p.unwrap_or("")))(s)
}

fn parse_split_detail(s: &str) -> IResult<&str, HashMap<String, String>> {
    map_res(
        many0(preceded(multispace1, parse_assignment)),
        |pairs: Vec<(&str, &str)>| -> Result<HashMap<String, String>, String> {
            let mut split_detail = HashMap::new();
            for (member_id, amount) in pairs {
                if split_detail
                    .insert(member_id.to_string(), amount.to_string())
                    .is_some()
                {
                    return Err(format!("duplicate split for `{member_id}`"));
                }
            }
            Ok(split_detail)
        },
    )(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense() -> anyhow::Result<()> {
        let (group_id, form) =
            parse_expense("group1 \"Dinner out\" 100.50 Food paid:m1 m1=60.50 m2=40")?;

        assert_eq!(group_id, "group1");
        assert_eq!(form.title, "Dinner out");
        assert_eq!(form.amount, "100.50");
        assert_eq!(form.category, "Food");
        assert_eq!(form.paid_by, "m1");
        assert_eq!(form.split_detail.len(), 2);
        assert_eq!(form.split_detail["m1"], "60.50");
        assert_eq!(form.split_detail["m2"], "40");
        Ok(())
    }

    #[test]
    fn test_amounts_are_kept_as_text() -> anyhow::Result<()> {
        let (_, form) = parse_expense("g1 Taxi abc \"Local transport\" paid: m1= m2=-3 ")?;

        assert_eq!(form.amount, "abc");
        assert_eq!(form.category, "Local transport");
        assert_eq!(form.paid_by, "");
        assert_eq!(form.split_detail["m1"], "");
        assert_eq!(form.split_detail["m2"], "-3");
        Ok(())
    }

    #[test]
    fn test_parse_expense_without_splits() -> anyhow::Result<()> {
        let (_, form) = parse_expense("g1 \"\" 10 Food paid:m1")?;
        assert_eq!(form.title, "");
        assert!(form.split_detail.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_syntax() {
        assert!(parse_expense("").is_err());
        assert!(parse_expense("g1 Taxi 10 Transport").is_err());
        assert!(parse_expense("g1 Taxi 10 Transport m1 m1=10").is_err());
        assert!(parse_expense("g1 Taxi 10 Transport paid:m1 m1=10 trailing").is_err());
    }

    #[test]
    fn test_repeated_member_in_split() {
        assert!(matches!(
            parse_expense("g1 Taxi 10 Transport paid:m1 m1=6 m1=4"),
            Err(InputError::InvalidExpenseSyntax(_))
        ));
        assert!(parse_expense("g1 Taxi 10 Transport paid:m1 m1=6 m2=4").is_ok());
    }
}
