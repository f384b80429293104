//! État de la session de chat

use mewquery::{ChatEvent, Scope};

/// Auteur d'un message entrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub display_name: String,
    pub stable_uid: String,
}

impl Sender {
    pub fn new(display_name: &str, stable_uid: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            stable_uid: stable_uid.to_string(),
        }
    }
}

impl From<&ChatEvent> for Sender {
    fn from(event: &ChatEvent) -> Self {
        Self::new(&event.sender_name, &event.sender_uid)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub chat_mode_enabled: bool,
    /// Portée du dernier message reçu, utilisée pour répondre
    pub target_scope: Scope,
}
