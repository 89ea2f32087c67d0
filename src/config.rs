//! Settings read from the environment at startup.

use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::types::{CurrentUser, Membership};

const DEFAULT_DB_PATH: &str = "expenses.db";

pub struct Config {
    pub db_path: PathBuf,
    pub user: CurrentUser,
    /// Match the user against member IDs instead of display names.
    pub match_by_id: bool,
}

impl Config {
    /// Read the configuration from these variables:
    /// - `EXPENSE_DB_PATH`: path of the Sqlite database, `expenses.db` by default
    /// - `EXPENSE_USER_NAME`: display name of the current user (required)
    /// - `EXPENSE_USER_ID`: member ID of the current user, the display name by default
    /// - `EXPENSE_USER_EMAIL`: optional
    /// - `EXPENSE_MATCH_BY_ID`: `true` or `1` to find the user's groups by member ID
    pub fn from_env() -> anyhow::Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> anyhow::Result<Config> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path: PathBuf = var("EXPENSE_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
            .into();

        let display_name = var("EXPENSE_USER_NAME")
            .ok_or_else(|| anyhow!("variable is not set"))
            .context("cannot read EXPENSE_USER_NAME")?;
        let uid = var("EXPENSE_USER_ID").unwrap_or_else(|| display_name.clone());
        let email = var("EXPENSE_USER_EMAIL");

        let match_by_id = match var("EXPENSE_MATCH_BY_ID") {
            Some(v) => parse_flag(&v).context("cannot read EXPENSE_MATCH_BY_ID")?,
            None => false,
        };

        Ok(Config {
            db_path,
            user: CurrentUser {
                uid,
                display_name,
                email,
            },
            match_by_id,
        })
    }

    pub fn membership(&self) -> Membership {
        self.user.membership(self.match_by_id)
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(anyhow!("expected true or false, found `{other}`")),
    }
}
