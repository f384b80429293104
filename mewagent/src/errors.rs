//! Erreurs des clients agent / TTS

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("NetworkError: {0}")]
    Network(String),

    #[error("ChatApiError (code {code}): {message}")]
    Api { code: u16, message: String },

    #[error("ChatApiError: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Réponse valide mais sans contenu exploitable
    #[error("ChatApiError: empty completion")]
    EmptyCompletion,

    #[error("TTSApiError: {0}")]
    InvalidUrl(String),
}

impl AgentError {
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        AgentError::Api {
            code,
            message: message.into(),
        }
    }
}

impl From<ureq::Error> for AgentError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => AgentError::from_status_code(code, "HTTP status"),
            other => AgentError::Network(other.to_string()),
        }
    }
}
