//! Core implementation of the command handlers.
//!
//! This is split from `commands` so that the whole flow, from user input to
//! the database and back, can be tested without reading from a terminal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::{
    aggregator::aggregate_groups,
    builder::build_expense_record,
    database::Database,
    error::HandlerError,
    formatter::{format_members, format_user_groups},
    types::{ExpenseForm, ExpenseId, Member, Membership},
    validator::{validate_expense_form, validate_id, validate_members},
};

/// Create a group if needed, then add the given members to it.
pub async fn handle_add_group<D: Database>(
    group_id: &str,
    members: &[Member],
    database: &Arc<Mutex<D>>,
) -> Result<(), HandlerError> {
    validate_id(group_id)?;
    validate_members(members)?;

    let mut database = database.lock().await;
    database
        .add_group_if_not_exists(group_id)
        .map_err(|e| HandlerError::database("cannot add group", e))?;
    database
        .add_members_if_not_exist(group_id, members)
        .map_err(|e| HandlerError::database("cannot add group members", e))?;

    info!("Group {group_id} now has {} new member(s)", members.len());
    Ok(())
}

/// Validate an expense form against the members of its group and append it.
///
/// The database stays locked from reading the members to saving the expense,
/// so the split covers exactly the members the group has when it is saved.
/// `now` is only called once the form is valid.
pub async fn handle_add_expense<D, F>(
    group_id: &str,
    form: &ExpenseForm,
    database: &Arc<Mutex<D>>,
    now: F,
) -> Result<ExpenseId, HandlerError>
where
    D: Database,
    F: FnOnce() -> DateTime<Utc>,
{
    validate_id(group_id)?;

    let mut database = database.lock().await;
    let members = database
        .get_members(group_id)
        .map_err(|e| HandlerError::database("cannot get group members", e))?;

    if members.is_empty() {
        let user_message = format_members(&members);
        return Err(HandlerError::new(
            format!("group {group_id} has no members"),
            user_message,
        ));
    }

    let validated = validate_expense_form(form, &members).map_err(|e| {
        debug!("Invalid expense for group {group_id}: {e:?}");
        HandlerError::validation(e)
    })?;
    let record = build_expense_record(validated, now);

    let expense_id = database.save_expense(group_id, record).map_err(|e| {
        warn!("Cannot save expense in group {group_id}: {e}");
        HandlerError::save_failed(e)
    })?;

    info!("Saved expense {expense_id} in group {group_id}");
    Ok(expense_id)
}

/// Show the groups matching `membership`, with their expenses and totals.
pub async fn handle_list_groups<D: Database>(
    membership: &Membership,
    database: &Arc<Mutex<D>>,
) -> Result<String, HandlerError> {
    let snapshot = database
        .lock()
        .await
        .get_snapshot()
        .map_err(|e| HandlerError::database("cannot read groups", e))?;

    let user_groups = aggregate_groups(&snapshot, membership);
    Ok(format_user_groups(&user_groups))
}

pub async fn handle_list_members<D: Database>(
    group_id: &str,
    database: &Arc<Mutex<D>>,
) -> Result<String, HandlerError> {
    validate_id(group_id)?;

    let members = database
        .lock()
        .await
        .get_members(group_id)
        .map_err(|e| HandlerError::database("cannot get group members", e))?;

    Ok(format_members(&members))
}
