//! Checks on the expense entry form.
//!
//! The form holds raw text, so numeric parsing happens here too: a value
//! that cannot be parsed is a validation failure, never a panic.

use log::debug;

use crate::error::ValidationError;
use crate::types::{
    Amount, ExpenseForm, Members, SplitShare, ValidatedExpense, SPLIT_TOLERANCE,
};

/// Decide whether an expense entry form can be persisted.
///
/// List of checks, in order (the first failure is returned):
/// - the title is not blank
/// - the amount is a finite number greater than zero
/// - the category is not blank
/// - a payer was selected, and it is a member of the group
/// - every member has a split amount which is a finite number, zero or more
/// - the split amounts sum to the total amount, within one cent
pub fn validate_expense_form(
    form: &ExpenseForm,
    members: &Members,
) -> Result<ValidatedExpense, ValidationError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    let amount = parse_amount(&form.amount)
        .filter(|&a| a > 0.0)
        .ok_or(ValidationError::InvalidAmount)?;

    let category = form.category.trim();
    if category.is_empty() {
        return Err(ValidationError::MissingCategory);
    }

    let paid_by = &form.paid_by;
    if paid_by.is_empty() {
        return Err(ValidationError::MissingPayer);
    }
    if !members.contains_id(paid_by) {
        return Err(ValidationError::UnknownPayer(paid_by.clone()));
    }

    let split_detail = parse_split_detail(form, members)?;
    let split_sum: Amount = split_detail.iter().map(|s| s.amount).sum();

    if !is_split_balanced(split_sum, amount) {
        debug!("Split sum {split_sum} does not match amount {amount}");
        return Err(ValidationError::SplitMismatch(split_sum, amount));
    }

    Ok(ValidatedExpense {
        title: title.to_string(),
        amount,
        category: category.to_string(),
        paid_by: paid_by.clone(),
        split_detail,
    })
}

/// One share per member, in member order. Members without an entry, or with
/// a blank or negative entry, are rejected.
fn parse_split_detail(
    form: &ExpenseForm,
    members: &Members,
) -> Result<Vec<SplitShare>, ValidationError> {
    members
        .ids()
        .map(|member_id| {
            form.split_detail
                .get(member_id)
                .and_then(|text| parse_amount(text))
                .filter(|&a| a >= 0.0)
                .map(|a| SplitShare::new(member_id, a))
                .ok_or_else(|| ValidationError::InvalidSplitFor(member_id.to_string()))
        })
        .collect()
}

/// Parse a decimal amount typed by the user. Blank and non-finite values are `None`.
fn parse_amount(text: &str) -> Option<Amount> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<Amount>().ok().filter(|a| a.is_finite())
}

/// Some amounts cannot be represented exactly as floats, so we tolerate
/// one cent of error when comparing the split with the total.
fn is_split_balanced(split_sum: Amount, amount: Amount) -> bool {
    (split_sum - amount).abs() <= SPLIT_TOLERANCE
}
