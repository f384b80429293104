//! # MewControl
//!
//! Control of the audio player the bot drives.
//!
//! The player is exposed through small capability traits
//! ([`TransportControl`], [`VolumeControl`], [`PlaybackStatus`], [`BotProfile`])
//! gathered in the [`AudioPlayer`] trait object used by the orchestrator.
//! [`AudioBotClient`] implements them on top of the TS3AudioBot web API.

pub mod audiobot_client;
pub mod capabilities;
pub mod errors;

pub use audiobot_client::AudioBotClient;
pub use capabilities::{
    AudioPlayer, BotProfile, PlaybackStatus, PlayerIdentity, TransportControl, VolumeControl,
};
pub use errors::{ControlError, Result};
