use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("NetworkError: {0}")]
    Network(String),
    // Le texte reste celui affiché dans le chat
    #[error("状态码错误：{code} ({command})")]
    UnexpectedStatus { command: String, code: u16 },
    #[error("AudioBot Error: {0}")]
    Parse(String),
    #[error("未能获取状态。")]
    UnknownState,
}

impl ControlError {
    pub fn unexpected_status(command: &str, code: u16) -> Self {
        ControlError::UnexpectedStatus {
            command: command.to_string(),
            code,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        ControlError::Parse(message.into())
    }
}

impl From<ureq::Error> for ControlError {
    fn from(err: ureq::Error) -> Self {
        ControlError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(err: serde_json::Error) -> Self {
        ControlError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
