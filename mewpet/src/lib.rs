//! # MewPet
//!
//! Pet mini-game played through chat commands: every user owns at most one
//! pet, feeds it to earn upgrades, and sends it to narrated battles. Pets,
//! skills and battles are produced by a [`PetOracle`], normally an
//! [`AgentOracle`] backed by a chat-completion model.

pub mod error;
pub mod game;
pub mod model;
pub mod oracle;

pub use error::{PetError, Result};
pub use game::{BattleReport, PetGame};
pub use model::{FeedOutcome, Pet, PetDraft, Skill};
pub use oracle::{AgentOracle, BattleNarration, PetOracle};
