//! Definition of the console commands and the loop that serves them.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};

use crate::{
    config::Config,
    database::Database,
    endpoints::{handle_add_expense, handle_add_group, handle_list_groups, handle_list_members},
    error::{HandlerError, InputError},
    formatter::format_categories,
    parser::{parse_expense, parse_group_and_members},
};

const HELP: &str = "This program keeps track of shared expenses in a group. Supported commands:
/help - shows this message.
/categories - lists the suggested expense categories.
/whoami - shows the current user.
/addgroup group_id member_id=Name ... - creates a group if needed and adds members to it.
/members group_id - lists the members of a group.
/expense group_id \"title\" amount category paid:member_id member_id=split ... - adds an expense.
/groups - shows your groups, their expenses and totals.
/quit - exits.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Categories,
    WhoAmI,
    AddGroup(String),
    Members(String),
    Expense(String),
    Groups,
    Quit,
}

/// What to do after a command has been served.
enum Flow {
    Continue,
    Stop,
}

/// Serve commands read line by line from `input`, writing replies to `output`,
/// until `/quit` or the end of the input.
pub async fn run<D, R, W>(
    config: &Config,
    database: &Arc<Mutex<D>>,
    input: R,
    mut output: W,
) -> std::io::Result<()>
where
    D: Database,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (reply, flow) = match parse_command(line) {
            Ok(command) => {
                debug!("Received command {:?}", command);
                match serve(command, config, database).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("{:?}", e);
                        (e.user_message().to_string(), Flow::Continue)
                    }
                }
            }
            Err(e) => (e.to_string(), Flow::Continue),
        };

        if !reply.is_empty() {
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }

        if let Flow::Stop = flow {
            break;
        }
    }

    info!("Stopped serving commands");
    Ok(())
}

async fn serve<D: Database>(
    command: Command,
    config: &Config,
    database: &Arc<Mutex<D>>,
) -> Result<(String, Flow), HandlerError> {
    let reply = match command {
        Command::Help => HELP.to_string(),
        Command::Categories => format_categories(),
        Command::WhoAmI => format_user(config),
        Command::AddGroup(s) => {
            let (group_id, members) = parse_group_and_members(&s)?;
            handle_add_group(&group_id, &members, database).await?;
            format!("Group {group_id} updated.")
        }
        Command::Members(group_id) => handle_list_members(group_id.trim(), database).await?,
        Command::Expense(s) => {
            let (group_id, form) = parse_expense(&s)?;
            let expense_id = handle_add_expense(&group_id, &form, database, Utc::now).await?;
            format!("Expense {expense_id} added!")
        }
        Command::Groups => handle_list_groups(&config.membership(), database).await?,
        Command::Quit => return Ok((String::new(), Flow::Stop)),
    };
    Ok((reply, Flow::Continue))
}

fn parse_command(line: &str) -> Result<Command, InputError> {
    let (name, args) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args = args.trim().to_string();

    match name.to_lowercase().as_str() {
        "/help" => Ok(Command::Help),
        "/categories" => Ok(Command::Categories),
        "/whoami" => Ok(Command::WhoAmI),
        "/addgroup" => Ok(Command::AddGroup(args)),
        "/members" => Ok(Command::Members(args)),
        "/expense" | "/e" => Ok(Command::Expense(args)),
        "/groups" => Ok(Command::Groups),
        "/quit" | "/exit" => Ok(Command::Quit),
        _ => Err(InputError::unknown_command(name.to_string())),
    }
}

fn format_user(config: &Config) -> String {
    let user = &config.user;
    let email = user.email.as_deref().unwrap_or("no email");
    let mode = if config.match_by_id {
        "member ID"
    } else {
        "display name"
    };
    format!(
        "{} ({}, {}); groups are matched by {}",
        user.display_name, user.uid, email, mode
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::{database::sqlite::SqliteDatabase, types::CurrentUser};

    use super::*;

    fn make_config() -> Config {
        Config {
            db_path: PathBuf::from(":memory:"),
            user: CurrentUser {
                uid: "m2".to_string(),
                display_name: "Bob".to_string(),
                email: Some("bob@example.com".to_string()),
            },
            match_by_id: false,
        }
    }

    async fn run_script(script: &str) -> String {
        let database = Arc::new(Mutex::new(SqliteDatabase::in_memory().expect("test")));
        let mut output = Vec::new();
        run(&make_config(), &database, script.as_bytes(), &mut output)
            .await
            .expect("test");
        String::from_utf8(output).expect("test")
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/help").ok(), Some(Command::Help));
        assert_eq!(
            parse_command("/E g1 Taxi 10 Transport paid:m1 m1=10").ok(),
            Some(Command::Expense(
                "g1 Taxi 10 Transport paid:m1 m1=10".to_string()
            ))
        );
        assert_eq!(
            parse_command("/members\tg1 ").ok(),
            Some(Command::Members("g1".to_string()))
        );
        assert!(matches!(
            parse_command("/delete 3"),
            Err(InputError::UnknownCommand(c)) if c == "/delete"
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_session() {
        let output = run_script(
            "/addgroup nepal m1=Alice m2=Bob\n\
             /expense nepal \"Dinner out\" 100 Food paid:m1 m1=60 m2=39\n\
             /expense nepal \"Dinner out\" 100 Food paid:m1 m1=60 m2=40\n\
             /groups\n\
             /quit\n\
             /groups\n",
        )
        .await;

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Group nepal updated.");
        assert_eq!(
            lines[1],
            "split amounts (99) do not sum to total amount (100)"
        );
        assert_eq!(lines[2], "Expense 1 added!");
        assert!(lines[3].starts_with("🧳 nepal (Alice, Bob): 100.00"));
        assert!(lines[4].contains("Dinner out [Food] 100.00 paid by Alice"));
        assert_eq!(lines[5], "Total across groups: 100.00");
        assert_eq!(lines.len(), 6);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_errors_do_not_stop_the_session() {
        let output = run_script("/nope\n/expense nepal\n\n/whoami\n").await;

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("unknown command `/nope`"));
        assert!(lines[1].starts_with("invalid syntax for an expense"));
        assert_eq!(
            lines[2],
            "Bob (m2, bob@example.com); groups are matched by display name"
        );
    }
}
