use thiserror::Error;

/// The command does not apply right now. Never shown to the player.
#[derive(Debug, Error)]
pub enum PreconditionFailed {
    #[error("{0} is disabled")]
    Disabled(&'static str),
    #[error("Commands are suspended until the next map starts")]
    CommandsSuspended,
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("Caller is not a valid connected player")]
    InvalidPlayer,
    #[error("Caller is not holding a valid weapon")]
    NoActiveWeapon,
    #[error("Caller has no alive pawn")]
    NoAlivePawn,
}

#[derive(Debug, Error)]
pub enum InternalError {
    #[error("Internal error: command `{name}` panicked (handler bug)")]
    Panicked { name: String },
    #[error("Internal error (bug): {message}")]
    Message { message: String },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Precondition(#[from] PreconditionFailed),
    #[error("{action} failed")]
    Action {
        action: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl CommandError {
    pub fn action(action: &'static str, source: impl Into<anyhow::Error>) -> Self {
        CommandError::Action {
            action,
            source: source.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CommandError::Internal(InternalError::Message {
            message: message.into(),
        })
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Tags a failed host call with the action it was performing.
pub trait ActionResultExt<T> {
    fn action(self, action: &'static str) -> CommandResult<T>;
}

impl<T> ActionResultExt<T> for anyhow::Result<T> {
    fn action(self, action: &'static str) -> CommandResult<T> {
        self.map_err(|source| CommandError::action(action, source))
    }
}
