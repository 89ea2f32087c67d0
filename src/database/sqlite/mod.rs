//! The implementation of a data storage using Sqlite.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task::block_in_place;

use crate::{
    error::DatabaseError,
    types::{
        ExpenseId, ExpenseRecord, GroupSnapshot, Member, Members, SavedExpense, Snapshot,
        SplitShare,
    },
};

use super::{Database, DatabaseResult};

mod schema;

pub struct SqliteDatabase {
    connection: Connection,
}

impl SqliteDatabase {
    pub fn new<P: AsRef<Path>>(path: P) -> DatabaseResult<SqliteDatabase> {
        block_in_place(|| {
            let connection = Connection::open(path)
                .map_err(|e| DatabaseError::new("cannot open database", e.into()))?;
            SqliteDatabase::with_connection(connection)
        })
    }

    /// A database that lives as long as the returned value. Useful for tests.
    pub fn in_memory() -> DatabaseResult<SqliteDatabase> {
        let connection = Connection::open_in_memory()
            .map_err(|e| DatabaseError::new("cannot open database", e.into()))?;
        SqliteDatabase::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> DatabaseResult<SqliteDatabase> {
        schema::create_all_tables(&connection)
            .map_err(|e| DatabaseError::new("cannot create tables", e))?;
        Ok(SqliteDatabase { connection })
    }

    fn get_group_ids(&self) -> anyhow::Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare_cached("SELECT id FROM expense_group ORDER BY rowid")?;
        let ids: Result<Vec<String>, _> = stmt.query_map([], |row| row.get(0))?.collect();
        Ok(ids?)
    }

    fn query_members(&self, group_id: &str) -> anyhow::Result<Members> {
        let mut stmt = self.connection.prepare_cached(
            "SELECT member_id, name FROM group_member
             WHERE group_id = ?1 ORDER BY position",
        )?;
        let members: Result<Members, _> = stmt
            .query_map(params![group_id], |row| {
                Ok(Member {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect();
        Ok(members?)
    }

    fn query_expenses(&self, group_id: &str) -> anyhow::Result<Vec<SavedExpense>> {
        let mut stmt = self.connection.prepare_cached(
            "SELECT e.id, e.title, e.amount, e.category, e.paid_by, e.timestamp, s.member_id, s.amount
             FROM expense e
             LEFT JOIN expense_split s ON e.id = s.expense_id
             WHERE e.group_id = ?1
             ORDER BY e.id, s.position",
        )?;

        let rows = stmt.query_map(params![group_id], |row| {
            Ok(ExpenseQuery {
                id: row.get(0)?,
                e_title: row.get(1)?,
                e_amount: row.get(2)?,
                e_category: row.get(3)?,
                e_paid_by: row.get(4)?,
                e_timestamp: row.get(5)?,
                s_member_id: row.get(6)?,
                s_amount: row.get(7)?,
            })
        })?;

        let rows: Result<Vec<_>, _> = rows.collect();
        Ok(parse_expense_query(rows?))
    }

    fn check_group_exists(&self, group_id: &str) -> anyhow::Result<()> {
        ensure_group_exists(&self.connection, group_id)
    }
}

impl Database for SqliteDatabase {
    fn add_group_if_not_exists(&mut self, group_id: &str) -> DatabaseResult<()> {
        let fn_impl = || -> anyhow::Result<()> {
            self.connection.execute(
                "INSERT OR IGNORE INTO expense_group (id) VALUES (?1)",
                params![group_id],
            )?;
            Ok(())
        };

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot add group", e)))
    }

    fn group_exists(&self, group_id: &str) -> DatabaseResult<bool> {
        let fn_impl = || query_group_exists(&self.connection, group_id);

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot check if group exists", e)))
    }

    fn add_members_if_not_exist(
        &mut self,
        group_id: &str,
        members: &[Member],
    ) -> DatabaseResult<()> {
        let mut fn_impl = || -> anyhow::Result<()> {
            let tx = self.connection.transaction()?;

            ensure_group_exists(&tx, group_id)?;

            {
                let mut insert_member_stmt = tx.prepare_cached(
                    "INSERT OR IGNORE INTO group_member (group_id, member_id, name, position)
                     SELECT ?1, ?2, ?3, COALESCE(MAX(position), -1) + 1
                     FROM group_member WHERE group_id = ?1",
                )?;

                for member in members {
                    let num_inserted_rows =
                        insert_member_stmt.execute(params![group_id, &member.id, &member.name])?;
                    if num_inserted_rows == 0 {
                        debug!("member {} already in group {group_id}", member.id);
                    }
                }
            }

            tx.commit()?;
            Ok(())
        };

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot add group members", e)))
    }

    fn get_members(&self, group_id: &str) -> DatabaseResult<Members> {
        let fn_impl = || -> anyhow::Result<Members> {
            self.check_group_exists(group_id)?;
            self.query_members(group_id)
        };

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot get group members", e)))
    }

    fn save_expense(
        &mut self,
        group_id: &str,
        expense: ExpenseRecord,
    ) -> DatabaseResult<ExpenseId> {
        let mut fn_impl = || -> anyhow::Result<ExpenseId> {
            let tx = self.connection.transaction()?;

            ensure_group_exists(&tx, group_id)?;

            let expense_id: i64 = {
                let mut insert_expense_stmt = tx.prepare_cached(
                    "INSERT INTO expense (group_id, title, amount, category, paid_by, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
                )?;

                insert_expense_stmt.query_row(
                    params![
                        group_id,
                        &expense.title,
                        &expense.amount,
                        &expense.category,
                        &expense.paid_by,
                        &expense.timestamp
                    ],
                    |row| row.get(0),
                )?
            };

            debug!("expense_id is {expense_id}");

            {
                let mut insert_split_stmt = tx.prepare_cached(
                    "INSERT INTO expense_split (expense_id, member_id, amount, position)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;

                for (position, share) in expense.split_detail.iter().enumerate() {
                    insert_split_stmt.execute(params![
                        &expense_id,
                        &share.member_id,
                        &share.amount,
                        &(position as i64),
                    ])?;
                }
            }

            tx.commit()?;

            Ok(expense_id)
        };

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot save expense", e)))
    }

    fn get_snapshot(&self) -> DatabaseResult<Snapshot> {
        let fn_impl = || -> anyhow::Result<Snapshot> {
            let mut snapshot = Vec::new();
            for group_id in self.get_group_ids()? {
                let members = self.query_members(&group_id)?;
                let expenses = self.query_expenses(&group_id)?;
                snapshot.push(GroupSnapshot::new(&group_id, members, expenses));
            }
            Ok(snapshot)
        };

        block_in_place(|| fn_impl().map_err(|e| map_error("cannot read groups", e)))
    }
}

/// Group the rows of the expense query (one per split share) into expenses.
/// Rows must be sorted by expense ID.
fn parse_expense_query(rows: Vec<ExpenseQuery>) -> Vec<SavedExpense> {
    let mut result: Vec<SavedExpense> = Vec::new();

    for row in rows {
        let is_same_expense = result.last().map(|e| e.id == row.id).unwrap_or(false);
        if !is_same_expense {
            result.push(SavedExpense::new(
                row.id,
                ExpenseRecord {
                    title: row.e_title,
                    amount: row.e_amount,
                    category: row.e_category,
                    paid_by: row.e_paid_by,
                    split_detail: vec![],
                    timestamp: row.e_timestamp,
                },
            ));
        }

        if let (Some(member_id), Some(amount), Some(expense)) =
            (row.s_member_id, row.s_amount, result.last_mut())
        {
            expense
                .record
                .split_detail
                .push(SplitShare { member_id, amount });
        }
    }

    result
}

struct ExpenseQuery {
    id: i64,
    e_title: String,
    e_amount: f64,
    e_category: String,
    e_paid_by: String,
    e_timestamp: DateTime<Utc>,
    s_member_id: Option<String>,
    s_amount: Option<f64>,
}

fn query_group_exists(connection: &Connection, group_id: &str) -> anyhow::Result<bool> {
    let exists = connection
        .query_row(
            "SELECT 1 FROM expense_group WHERE id = ?1",
            params![group_id],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    Ok(exists)
}

/// Fail with a "group not found" error unless the group exists.
fn ensure_group_exists(connection: &Connection, group_id: &str) -> anyhow::Result<()> {
    if query_group_exists(connection, group_id)? {
        Ok(())
    } else {
        Err(DatabaseError::group_not_found(group_id).into())
    }
}

fn map_error<T: AsRef<str>>(message: T, e: anyhow::Error) -> DatabaseError {
    match e.downcast::<DatabaseError>() {
        Ok(e) => e,
        Err(e) => DatabaseError::new(message, e),
    }
}
