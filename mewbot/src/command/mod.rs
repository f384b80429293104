//! Commandes de chat : table des commandes et routage des messages

pub mod registry;
pub mod router;

pub use registry::{Command, CommandRegistry};
pub use router::{Route, split_args};
