//! Types d'erreurs pour mewpet

use mewagent::AgentError;

#[derive(Debug, thiserror::Error)]
pub enum PetError {
    #[error("你还没有宠物呢。")]
    NoPet(String),

    #[error("你的宠物目前还不能升级呢。")]
    NotUpgradable(String),

    #[error("战斗至少需要两只宠物。")]
    NotEnoughFighters,

    /// Réponse du modèle inexploitable
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for PetError {
    fn from(err: std::io::Error) -> Self {
        PetError::Persistence(err.to_string())
    }
}

/// Type Result spécialisé pour mewpet
pub type Result<T> = std::result::Result<T, PetError>;
