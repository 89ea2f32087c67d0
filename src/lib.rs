//! Group expense entry and split validation for a travel companion app.
//!
//! The core is made of three pure functions:
//! - [validator::validate_expense_form] checks the entry form, including that the
//!   per-member split adds up to the total amount;
//! - [builder::build_expense_record] turns a valid form into the record to persist;
//! - [aggregator::aggregate_groups_for_user] rebuilds the user's groups and totals
//!   from a snapshot of all groups.
//!
//! The rest of the crate stores groups and expenses in Sqlite and serves a small
//! set of console commands on top of the core.

pub mod aggregator;
pub mod builder;
pub mod commands;
pub mod config;
pub mod database;
pub mod endpoints;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod types;
pub mod validator;
