//! # MewBot
//!
//! Chat-driven orchestrator for a TeamSpeak 3 music bot.
//!
//! The [`Orchestrator`] sits between a chat [`EventSource`](mewquery::EventSource)
//! and a set of collaborators: catalog backends elected by priority and
//! availability ([`BackendSelector`]), an audio player kept in sync with the
//! active catalog cursor ([`PlaybackSynchronizer`]), and the optional chat
//! agent, text-to-speech relay and pet game.
//!
//! Inbound messages are routed by the first alias that prefixes them
//! ([`CommandRegistry::route`]) to a handler from an explicit
//! [`HandlerTable`]; handlers may run short blocking dialogs
//! ([`InteractionDialog`]) before replying.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mewbot::{Orchestrator, OrchestratorSettings, default_handlers, default_registry};
//! use mewcontrol::AudioBotClient;
//! use mewquery::{QueryConfig, ServerQueryClient};
//! use mewsource::HttpCatalog;
//! use std::time::Duration;
//!
//! let source = ServerQueryClient::new(QueryConfig {
//!     host: "127.0.0.1".into(),
//!     port: 10011,
//!     username: "serveradmin".into(),
//!     password: "secret".into(),
//!     nickname: "mew~".into(),
//!     server_id: 1,
//!     timeout: Duration::from_secs(10),
//! });
//! let player = AudioBotClient::new("http://127.0.0.1:58913", 0, Duration::from_secs(10));
//! let mut bot = Orchestrator::new(
//!     Box::new(source),
//!     Box::new(player),
//!     default_registry(),
//!     default_handlers(),
//!     OrchestratorSettings::default(),
//! );
//! bot.register_backend(
//!     "default",
//!     Box::new(HttpCatalog::new("http://127.0.0.1:8000", "netease", Duration::from_secs(5))),
//!     100,
//! );
//! bot.run()?;
//! # Ok::<(), mewbot::BotError>(())
//! ```

pub mod clock;
pub mod command;
pub mod defaults;
pub mod dialog;
pub mod errors;
pub mod handlers;
pub mod logs;
pub mod orchestrator;
pub mod reply;
pub mod selector;
pub mod session;
pub mod sync;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{Command, CommandRegistry, Route};
pub use defaults::{default_commands, default_registry};
pub use dialog::{DialogContext, DialogState, InteractionDialog};
pub use errors::{BotError, Result};
pub use handlers::default_handlers;
pub use orchestrator::{Handler, HandlerTable, LoopState, Orchestrator, OrchestratorSettings};
pub use reply::Tone;
pub use selector::{BackendDescriptor, BackendSelector, BackendSwitch, DEFAULT_PRIORITY};
pub use session::{Sender, Session};
pub use sync::{PlaybackSynchronizer, SyncReport};
