// mewcontrol/src/capabilities.rs
use std::fmt::Debug;

use crate::errors::Result;

/// Identité du bot audio côté serveur de chat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Identifiant stable (unique id TeamSpeak)
    pub uid: String,
    /// Identifiant de session client
    pub client_id: u64,
    /// Canal où se trouve le bot
    pub channel: u64,
}

/// Abstraction des commandes de transport (lecture / pause / stop / suivant).
pub trait TransportControl {
    /// Remplace la lecture courante par `link` et démarre.
    fn play(&self, link: &str) -> Result<()>;

    /// Reprend la lecture en pause.
    fn resume(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    /// Passe à l'entrée suivante de la file interne du lecteur.
    fn next(&self) -> Result<()>;

    /// Vide la file interne du lecteur.
    fn clear(&self) -> Result<()>;
}

pub trait VolumeControl {
    fn volume(&self) -> Result<f64>;

    fn set_volume(&self, value: u32) -> Result<()>;
}

/// État de lecture observé.
pub trait PlaybackStatus {
    fn is_playing(&self) -> Result<bool>;

    /// Lien en cours de diffusion, `None` si rien n'est chargé.
    fn current_link(&self) -> Result<Option<String>>;
}

/// Profil du bot : description, avatar, identité, listes.
pub trait BotProfile {
    fn set_description(&self, text: &str) -> Result<()>;

    fn set_avatar(&self, link: &str) -> Result<()>;

    fn identity(&self) -> Result<PlayerIdentity>;

    fn list_stream_ids(&self) -> Result<Vec<String>>;
}

/// Lecteur audio complet tel que l'utilise l'orchestrateur.
pub trait AudioPlayer: TransportControl + VolumeControl + PlaybackStatus + BotProfile + Debug + Send {}

impl<T> AudioPlayer for T where T: TransportControl + VolumeControl + PlaybackStatus + BotProfile + Debug + Send {}
