//! Functions that check the validity of user input.
//!
//! These functions are called after the parsing phase and execute
//! checks that are not easily done by the parser.

mod expense;

use crate::error::InputError;
use crate::types::Member;
pub use expense::validate_expense_form;

/// Check that a group or member ID is well formed.
pub fn validate_id(id: &str) -> Result<(), InputError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(InputError::invalid_id(id.to_string()))
    }
}

/// Check that all members of a new group have a valid ID and a non-empty name.
pub fn validate_members(members: &[Member]) -> Result<(), InputError> {
    for member in members {
        validate_id(&member.id)?;
        if member.name.trim().is_empty() {
            return Err(InputError::empty_member_name(member.id.clone()));
        }
    }
    Ok(())
}

/// IDs must be ASCII alphanumeric (plus `-` and `_`) and start with a letter.
pub fn is_valid_id(id: &str) -> bool {
    let starts_with_letter = id
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false);

    starts_with_letter
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
