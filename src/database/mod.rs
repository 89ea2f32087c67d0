//! Storage of groups, their members and their expenses.

use crate::{
    error::DatabaseError,
    types::{ExpenseId, ExpenseRecord, Member, Members, Snapshot},
};

type DatabaseResult<T> = Result<T, DatabaseError>;

pub mod sqlite;

/// This trait abstracts over the type of database.
///
/// The implementation could save the data in any suitable database or even in memory.
pub trait Database {
    /// Add a group with the given *group_id*.
    ///
    /// If the group already exists, it is a no-op.
    fn add_group_if_not_exists(&mut self, group_id: &str) -> DatabaseResult<()>;

    /// Check if a group with the given *group_id* exists.
    fn group_exists(&self, group_id: &str) -> DatabaseResult<bool>;

    /// Add the given members to a group, after the existing ones.
    ///
    /// Members whose ID is already present are ignored. If the group does not exist,
    /// an error is returned.
    fn add_members_if_not_exist(&mut self, group_id: &str, members: &[Member])
        -> DatabaseResult<()>;

    /// Get the members of a group, in the order they were added.
    ///
    /// If the group does not exist, an error is returned.
    fn get_members(&self, group_id: &str) -> DatabaseResult<Members>;

    /// Append an expense to a group and return the ID generated for it.
    ///
    /// If the group does not exist, an error is returned.
    fn save_expense(&mut self, group_id: &str, expense: ExpenseRecord)
        -> DatabaseResult<ExpenseId>;

    /// Read all groups with their members and expenses.
    ///
    /// Groups are returned in creation order, and so are the expenses in each group.
    fn get_snapshot(&self) -> DatabaseResult<Snapshot>;
}
