//! Erreurs des backends de catalogue

use thiserror::Error;

/// Type Result personnalisé pour mewsource
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Erreurs possibles lors de l'utilisation d'un catalogue
///
/// Les variantes « métier » (playlist absente, index hors limites, ...)
/// portent directement le texte affiché dans le chat.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Erreur réseau (connexion, timeout)
    #[error("NetworkError: {0}")]
    Network(String),

    /// Réponse HTTP inattendue
    #[error("MusicApiError (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Erreur de parsing JSON
    #[error("MusicApiError: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("歌单未找到。")]
    PlaylistNotFound(String),

    #[error("歌单Id已存在。")]
    PlaylistExists(String),

    #[error("当前歌单不能删除。")]
    PlaylistProtected(String),

    #[error("未创建任何歌单。")]
    NoPlaylists,

    #[error("索引超出范围。")]
    IndexOutOfRange(usize),

    #[error("当前歌单为空。")]
    EmptyPlaylist,

    #[error("还未开始播放。")]
    NotStarted,

    #[error("没有找到对应ID的歌曲：{0}")]
    TrackNotFound(String),

    /// Le catalogue a répondu mais n'est pas exploitable
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Erreur de lecture/écriture du fichier de playlists
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CatalogError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            404 => Self::TrackNotFound(message.into()),
            _ => Self::Api {
                code,
                message: message.into(),
            },
        }
    }

    /// Vrai si l'erreur vient du transport ou du service distant
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_)
                | CatalogError::Api { .. }
                | CatalogError::JsonParse(_)
                | CatalogError::Unavailable(_)
        )
    }

    /// Vrai si l'erreur désigne un objet absent (playlist, morceau)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::PlaylistNotFound(_) | CatalogError::TrackNotFound(_)
        )
    }
}

impl From<ureq::Error> for CatalogError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => CatalogError::from_status_code(code, "HTTP status"),
            other => CatalogError::Network(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Persistence(err.to_string())
    }
}
