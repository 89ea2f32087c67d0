use thiserror::Error;

use crate::types::{Amount, MemberId};

/// An error that is shown to the user and logged with more detail.
#[derive(Error)]
#[error("An error occurred: {user_message}")]
pub struct HandlerError {
    message: String,
    user_message: String,
}

/// Reasons an expense entry form is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("please enter a title")]
    MissingTitle,

    #[error("please enter a valid amount")]
    InvalidAmount,

    #[error("please enter a category")]
    MissingCategory,

    #[error("please select who paid")]
    MissingPayer,

    #[error("`{0}` is not a member of this group")]
    UnknownPayer(MemberId),

    #[error("please enter a valid split amount for `{0}`")]
    InvalidSplitFor(MemberId),

    #[error("split amounts ({0}) do not sum to total amount ({1})")]
    SplitMismatch(Amount, Amount),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error(
        "invalid syntax for an expense; example of valid syntax: \
         group1 \"Dinner\" 100 Food paid:m1 m1=60 m2=40"
    )]
    InvalidExpenseSyntax(String),

    #[error(
        "invalid syntax for a group; example of valid syntax: \
         group1 m1=Alice m2=\"Bob Smith\""
    )]
    InvalidGroupSyntax(String),

    #[error(
        "invalid ID `{0}`: IDs must be alphanumeric (`-` and `_` are allowed), can only \
             include ASCII characters and must start with a letter"
    )]
    InvalidId(String),

    #[error("invalid name for `{0}`: names cannot be empty")]
    EmptyMemberName(String),

    #[error("`{0}` is not a registered group")]
    UnregisteredGroup(String),

    #[error("unknown command `{0}`; use /help to list the available commands")]
    UnknownCommand(String),
}

#[derive(Error, Debug)]
#[error("{message}: {cause}")]
pub struct DatabaseError {
    message: String,
    cause: anyhow::Error,
}

impl InputError {
    pub fn invalid_expense_syntax(e: nom::Err<nom::error::Error<&str>>) -> Self {
        InputError::InvalidExpenseSyntax(e.to_string())
    }

    pub fn invalid_group_syntax(e: nom::Err<nom::error::Error<&str>>) -> Self {
        InputError::InvalidGroupSyntax(e.to_string())
    }

    pub fn invalid_id(id: String) -> Self {
        InputError::InvalidId(id)
    }

    pub fn empty_member_name(id: String) -> Self {
        InputError::EmptyMemberName(id)
    }

    pub fn unregistered_group(group_id: String) -> Self {
        InputError::UnregisteredGroup(group_id)
    }

    pub fn unknown_command(command: String) -> Self {
        InputError::UnknownCommand(command)
    }
}

impl DatabaseError {
    pub fn new<T: AsRef<str>>(message: T, cause: anyhow::Error) -> Self {
        DatabaseError {
            message: message.as_ref().to_string(),
            cause,
        }
    }

    /// The referenced group does not exist.
    pub fn group_not_found(group_id: &str) -> Self {
        DatabaseError::new(
            "group not found",
            InputError::unregistered_group(group_id.to_string()).into(),
        )
    }

    pub fn is_group_not_found(&self) -> bool {
        matches!(
            self.cause.downcast_ref::<InputError>(),
            Some(InputError::UnregisteredGroup(_))
        )
    }
}

impl HandlerError {
    pub fn new(message: String, user_message: String) -> Self {
        HandlerError {
            message,
            user_message,
        }
    }

    pub fn database(message: &str, e: DatabaseError) -> Self {
        if e.is_group_not_found() {
            let user_message = e.cause.to_string();
            return HandlerError::new(format!("{message}: {e}"), user_message);
        }
        let message = format!("{message}: {e}");
        let user_message = "cannot query the database, please try again later".to_string();
        HandlerError {
            message,
            user_message,
        }
    }

    pub fn save_failed(e: DatabaseError) -> Self {
        let message = format!("cannot save expense: {e}");
        let user_message = format!("failed to save expense: {}", e.cause);
        HandlerError {
            message,
            user_message,
        }
    }

    pub fn validation(e: ValidationError) -> Self {
        let user_message = e.to_string();
        HandlerError {
            message: format!("expense rejected: {e:?}"),
            user_message,
        }
    }

    pub fn input(e: InputError) -> Self {
        let user_message = e.to_string();
        HandlerError {
            message: user_message.clone(),
            user_message,
        }
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }
}

impl From<InputError> for HandlerError {
    fn from(e: InputError) -> Self {
        HandlerError::input(e)
    }
}

impl std::fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
