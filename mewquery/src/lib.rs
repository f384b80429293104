//! # MewQuery
//!
//! Chat event source for MewBot, backed by the TeamSpeak 3 ServerQuery
//! text protocol.
//!
//! - [`protocol`]: escaping and record parsing
//! - [`EventSource`]: what the orchestrator needs from a chat connection
//! - [`ServerQueryClient`]: blocking TCP implementation

pub mod client;
pub mod errors;
pub mod event;
pub mod protocol;
pub mod source;

pub use client::{QueryConfig, ServerQueryClient};
pub use errors::{QueryError, Result};
pub use event::{ChannelId, ChatEvent, ClientPosition, Scope};
pub use source::EventSource;
