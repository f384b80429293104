//! Conversation avec historique

use std::fmt::Debug;

use tracing::debug;

use crate::completion::{Completion, Message};
use crate::errors::Result;

/// Agent conversationnel vu par le bot
pub trait ConversationalAgent: Debug + Send {
    /// Oublie l'historique (le prompt système est conservé)
    fn reset(&mut self);

    fn send(&mut self, text: &str) -> Result<String>;
}

#[derive(Debug)]
pub struct ChatSession {
    completion: Box<dyn Completion>,
    system_prompt: String,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(completion: Box<dyn Completion>, system_prompt: &str) -> Self {
        Self {
            completion,
            system_prompt: system_prompt.to_string(),
            history: vec![Message::system(system_prompt)],
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }
}

impl ConversationalAgent for ChatSession {
    fn reset(&mut self) {
        self.history = vec![Message::system(self.system_prompt.clone())];
    }

    fn send(&mut self, text: &str) -> Result<String> {
        self.history.push(Message::user(text));
        match self.completion.complete(&self.history) {
            Ok(reply) => {
                self.history.push(Message::assistant(reply.clone()));
                debug!(turns = self.history.len(), "Chat reply received");
                Ok(reply)
            }
            Err(e) => {
                // la question sans réponse ne reste pas dans l'historique
                self.history.pop();
                Err(e)
            }
        }
    }
}
