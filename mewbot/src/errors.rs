//! Erreurs remontées par les handlers du bot
//!
//! Chaque échec d'un handler est rendu en un unique message de chat (rouge,
//! gras) : le `Display` de chaque variante est donc le texte montré aux
//! utilisateurs.

use mewagent::AgentError;
use mewcontrol::ControlError;
use mewpet::PetError;
use mewquery::QueryError;
use mewsource::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Un collaborateur est injoignable ou a expiré
    #[error("{0}")]
    Transport(String),

    /// Playlist, morceau, interface ou animal inconnu
    #[error("{0}")]
    NotFound(String),

    /// Aucune interface musicale disponible
    #[error("当前没有可用的音乐接口。")]
    Degraded,

    /// Opération refusée pour une raison métier
    #[error("{0}")]
    Rejected(String),

    #[error("启动失败：{0}")]
    StartupFatal(String),
}

impl BotError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// L'erreur vient-elle de la connexion au serveur de chat ?
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<CatalogError> for BotError {
    fn from(err: CatalogError) -> Self {
        let msg = err.to_string();
        match err {
            CatalogError::PlaylistNotFound(_) | CatalogError::TrackNotFound(_) => {
                Self::NotFound(msg)
            }
            CatalogError::Network(_)
            | CatalogError::Api { .. }
            | CatalogError::JsonParse(_)
            | CatalogError::Unavailable(_)
            | CatalogError::Persistence(_) => Self::Transport(msg),
            CatalogError::PlaylistExists(_)
            | CatalogError::PlaylistProtected(_)
            | CatalogError::NoPlaylists
            | CatalogError::IndexOutOfRange(_)
            | CatalogError::EmptyPlaylist
            | CatalogError::NotStarted => Self::Rejected(msg),
        }
    }
}

impl From<ControlError> for BotError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::UnexpectedStatus { .. } => Self::Rejected(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

impl From<QueryError> for BotError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Command { .. } => Self::Rejected(err.to_string()),
            _ => Self::Transport(err.to_string()),
        }
    }
}

impl From<AgentError> for BotError {
    fn from(err: AgentError) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<PetError> for BotError {
    fn from(err: PetError) -> Self {
        let msg = err.to_string();
        match err {
            PetError::NoPet(_) => Self::NotFound(msg),
            PetError::NotUpgradable(_) | PetError::NotEnoughFighters => Self::Rejected(msg),
            PetError::Generation(_) | PetError::Agent(_) | PetError::Persistence(_) => {
                Self::Transport(msg)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
