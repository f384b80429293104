use std::fmt::Debug;
use std::time::Duration;

use crate::errors::Result;
use crate::event::{ChannelId, ChatEvent, ClientPosition, Scope};

/// Source d'évènements de chat et canal de réponse.
///
/// Toutes les opérations sont bloquantes et bornées dans le temps par
/// l'implémentation.
pub trait EventSource: Debug + Send {
    /// Ouvre (ou rouvre) la connexion et s'abonne aux messages texte.
    fn connect(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Maintient la session en vie.
    fn heartbeat(&mut self) -> Result<()>;

    /// Attend le prochain message au plus `timeout` ; `None` à l'expiration.
    fn wait_for_event(&mut self, timeout: Duration) -> Result<Option<ChatEvent>>;

    fn send(&mut self, scope: Scope, text: &str) -> Result<()>;

    /// Message global à tous les serveurs virtuels.
    fn broadcast(&mut self, text: &str) -> Result<()>;

    fn own_position(&mut self) -> Result<ClientPosition>;

    fn move_to_channel(&mut self, channel: ChannelId) -> Result<()>;

    fn is_online(&mut self, uid: &str) -> Result<bool>;

    /// Nom affiché d'un uid, `None` s'il est inconnu.
    fn resolve_identity(&mut self, uid: &str) -> Result<Option<String>>;
}
