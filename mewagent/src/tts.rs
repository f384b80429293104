//! Relais de synthèse vocale : le bot ne télécharge rien, il construit
//! un lien que le lecteur audio ira chercher.

use url::Url;

use crate::errors::{AgentError, Result};

pub const DEFAULT_VOICE: &str = "jlshim";
const AUDIO_TYPE: &str = "wav";

#[derive(Debug, Clone)]
pub struct TtsRelay {
    url: String,
}

impl TtsRelay {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_matches('/').to_string(),
        }
    }

    /// Lien de lecture pour `text` avec la voix, la vitesse et le volume donnés
    pub fn speech_link(&self, text: &str, voice: &str, speed: u32, volume: u32) -> Result<String> {
        let link = Url::parse_with_params(
            &self.url,
            &[
                ("voiceId", voice.to_string()),
                ("text", text.to_string()),
                ("speed", speed.to_string()),
                ("volume", volume.to_string()),
                ("audioType", AUDIO_TYPE.to_string()),
            ],
        )
        .map_err(|e| AgentError::InvalidUrl(format!("{}: {}", self.url, e)))?;
        Ok(link.to_string())
    }
}
