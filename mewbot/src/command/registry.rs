//! # Command Registry
//!
//! Liste ordonnée des commandes reconnues. L'ordre d'enregistrement compte :
//! le routage essaie les commandes dans cet ordre et retient le premier
//! alias qui préfixe le message.
//!
//! Deux commandes peuvent partager un `name` (elles partagent alors le même
//! handler) mais jamais un alias : un alias déjà pris est retiré de la
//! commande enregistrée plus tard, avec un avertissement.

use std::collections::HashSet;

use tracing::{debug, warn};

/// Une commande de chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Nom du handler
    pub name: String,
    /// Préfixes déclenchant la commande, dans l'ordre d'essai
    pub aliases: Vec<String>,
    pub help: String,
    pub examples: Vec<String>,
}

impl Command {
    pub fn new(name: &str, aliases: &[&str], help: &str) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            help: help.to_string(),
            examples: Vec::new(),
        }
    }

    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = examples.iter().map(|e| e.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    aliases: HashSet<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une commande ; renvoie `false` si elle a été ignorée
    /// faute d'alias libre.
    pub fn register(&mut self, mut command: Command) -> bool {
        command.aliases.retain(|alias| {
            if alias.is_empty() {
                warn!(command = %command.name, "Empty alias dropped");
                return false;
            }
            if self.aliases.contains(alias) {
                warn!(command = %command.name, alias = %alias, "Duplicate alias dropped");
                return false;
            }
            true
        });
        // un alias répété dans la même commande
        let mut seen = HashSet::new();
        command.aliases.retain(|alias| seen.insert(alias.clone()));

        if command.aliases.is_empty() {
            warn!(command = %command.name, "Command without usable alias ignored");
            return false;
        }

        self.aliases.extend(command.aliases.iter().cloned());
        debug!(command = %command.name, aliases = ?command.aliases, "Command registered");
        self.commands.push(command);
        true
    }

    pub fn register_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for command in commands {
            self.register(command);
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<Command> for CommandRegistry {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.register_all(iter);
        registry
    }
}
