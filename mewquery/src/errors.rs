use thiserror::Error;

/// Code d'erreur ServerQuery « database empty result set »
pub const EMPTY_RESULT_SET: u32 = 1281;
/// Code d'erreur ServerQuery « nickname is already in use »
pub const NICKNAME_IN_USE: u32 = 513;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("ServerQuery I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ServerQuery connection lost")]
    Disconnected,
    #[error("ServerQuery not connected")]
    NotConnected,
    #[error("ServerQuery command '{command}' timed out")]
    Timeout { command: String },
    #[error("ServerQuery error {id} on '{command}': {msg}")]
    Command { command: String, id: u32, msg: String },
    #[error("ServerQuery protocol error: {0}")]
    Protocol(String),
}

impl QueryError {
    pub fn protocol(message: impl Into<String>) -> Self {
        QueryError::Protocol(message.into())
    }

    /// Vrai si la connexion doit être rétablie
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            QueryError::Disconnected | QueryError::NotConnected | QueryError::Io(_)
        )
    }

    /// Vrai pour une commande ayant répondu « pas de résultat »
    pub fn is_empty_result(&self) -> bool {
        matches!(self, QueryError::Command { id, .. } if *id == EMPTY_RESULT_SET)
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
