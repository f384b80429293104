//! Discussion avec l'agent conversationnel

use crate::errors::{BotError, Result};
use crate::orchestrator::Orchestrator;
use crate::session::Sender;

const NO_AGENT: &str = "聊天api未设置。";

/// `聊天` seul ouvre la discussion ; avec un texte, le transmet
pub fn chat(bot: &mut Orchestrator, sender: &Sender, args: &[String]) -> Result<()> {
    if bot.agent.is_none() {
        return Err(BotError::rejected(NO_AGENT));
    }
    let text = args.join(" ");
    if text.trim().is_empty() {
        bot.session.chat_mode_enabled = true;
        if let Some(agent) = bot.agent.as_mut() {
            agent.reset();
        }
        return bot.info("聊天模式已开启喵~~");
    }
    if !bot.session.chat_mode_enabled {
        return Ok(());
    }
    talk(bot, sender, &text)
}

/// Envoie un tour de parole à l'agent et relaie sa réponse
pub(crate) fn talk(bot: &mut Orchestrator, sender: &Sender, text: &str) -> Result<()> {
    let agent = bot
        .agent
        .as_mut()
        .ok_or_else(|| BotError::rejected(NO_AGENT))?;
    let reply = agent.send(&format!("{}：{}", sender.display_name, text))?;
    bot.send(&reply)
}
