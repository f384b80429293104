//! Routage d'un message vers une commande

use crate::command::registry::CommandRegistry;

/// Résultat du routage : commande, alias reconnu et arguments restants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub alias: String,
    pub args: Vec<String>,
}

/// Découpe le reste du message sur les espaces simples.
///
/// Un reste vide donne un argument vide, deux espaces consécutifs un
/// argument vide entre eux.
pub fn split_args(rest: &str) -> Vec<String> {
    rest.trim().split(' ').map(String::from).collect()
}

impl CommandRegistry {
    /// Premier alias (ordre d'enregistrement puis de déclaration) qui
    /// préfixe `message` ; pas de recherche du plus long.
    pub fn route(&self, message: &str) -> Option<Route> {
        self.commands().iter().find_map(|command| {
            command.aliases.iter().find_map(|alias| {
                message.strip_prefix(alias.as_str()).map(|rest| Route {
                    name: command.name.clone(),
                    alias: alias.clone(),
                    args: split_args(rest),
                })
            })
        })
    }
}
