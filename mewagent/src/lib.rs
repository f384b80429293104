//! # MewAgent
//!
//! Optional language-model collaborators of MewBot:
//!
//! - [`ChatCompletionsClient`]: blocking client for an OpenAI-compatible
//!   `/chat/completions` endpoint, behind the [`Completion`] trait
//! - [`ChatSession`]: a [`ConversationalAgent`] keeping the chat history
//! - [`TtsRelay`]: builds text-to-speech links for the audio player

pub mod completion;
pub mod errors;
pub mod session;
pub mod tts;

pub use completion::{ChatCompletionsClient, Completion, Message, Role};
pub use errors::{AgentError, Result};
pub use session::{ChatSession, ConversationalAgent};
pub use tts::{DEFAULT_VOICE, TtsRelay};
