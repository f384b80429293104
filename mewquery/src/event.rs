//! Évènements de chat reçus par le bot

use crate::protocol::Record;

/// Identifiant de canal TeamSpeak
pub type ChannelId = u64;

/// Portée d'un message : tout le serveur ou le canal courant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Server,
    Channel,
}

impl Scope {
    /// `targetmode` ServerQuery : 3 = serveur, le reste est traité comme canal
    pub fn from_target_mode(mode: u32) -> Self {
        if mode == 3 {
            Scope::Server
        } else {
            Scope::Channel
        }
    }

    pub fn target_mode(&self) -> u32 {
        match self {
            Scope::Server => 3,
            Scope::Channel => 2,
        }
    }
}

/// Message texte reçu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender_uid: String,
    pub sender_name: String,
    pub scope: Scope,
    pub body: String,
}

impl ChatEvent {
    pub fn new(sender_uid: &str, sender_name: &str, scope: Scope, body: &str) -> Self {
        Self {
            sender_uid: sender_uid.to_string(),
            sender_name: sender_name.to_string(),
            scope,
            body: body.to_string(),
        }
    }

    /// Construit l'évènement depuis une notification `notifytextmessage`.
    ///
    /// Renvoie `None` si l'émetteur n'est pas identifiable.
    pub fn from_record(record: &Record) -> Option<Self> {
        let sender_uid = record.get("invokeruid")?.clone();
        let scope = record
            .get("targetmode")
            .and_then(|m| m.parse().ok())
            .map(Scope::from_target_mode)
            .unwrap_or_default();
        Some(Self {
            sender_uid,
            sender_name: record.get("invokername").cloned().unwrap_or_default(),
            scope,
            body: record.get("msg").cloned().unwrap_or_default(),
        })
    }
}

/// Position du client query : son id de session et son canal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientPosition {
    pub client_id: u64,
    pub channel_id: ChannelId,
}
