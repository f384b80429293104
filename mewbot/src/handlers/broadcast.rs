//! Annonces vocales par synthèse

use crate::errors::{BotError, Result};
use crate::handlers::arg;
use crate::orchestrator::Orchestrator;
use crate::session::Sender;

const TTS_SPEED: u32 = 10;
const TTS_VOLUME: u32 = 200;

/// `广播 <texte> [voix]`
pub fn broadcast(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some(tts) = bot.tts.clone() else {
        return Err(BotError::rejected("TTSapi未设置。"));
    };
    let text = arg(args, 0);
    if text.is_empty() {
        return bot.error("请输入广播内容。");
    }
    let voice = match arg(args, 1) {
        "" => bot.settings().tts_voice.clone(),
        voice => voice.to_string(),
    };
    let link = tts.speech_link(text, &voice, TTS_SPEED, TTS_VOLUME)?;
    bot.player().play(&link)?;
    bot.success("广播中...")
}
