//! Client HTTP bloquant pour l'API web de TS3AudioBot.
//!
//! Toutes les commandes passent par
//! `GET {url}/api/bot/use/{bot_id}/(/{seg1}/{seg2}/...`, chaque segment
//! étant encodé en pourcentage. Les commandes sans retour répondent 204.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, trace};
use ureq::Agent;

use crate::capabilities::{
    BotProfile, PlaybackStatus, PlayerIdentity, TransportControl, VolumeControl,
};
use crate::errors::{ControlError, Result};

/// ErrorCode renvoyé par `song` quand rien n'est en lecture
const NOTHING_PLAYING: i64 = 10;

#[derive(Debug, Deserialize)]
struct SongRaw {
    #[serde(rename = "Link", default)]
    link: Option<String>,
    #[serde(rename = "Length", default)]
    length: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorRaw {
    #[serde(rename = "ErrorCode", default)]
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ClientInfoRaw {
    #[serde(rename = "Uid")]
    uid: String,
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Channel")]
    channel: u64,
}

#[derive(Debug, Deserialize)]
struct ListEntryRaw {
    #[serde(rename = "Id")]
    id: String,
}

/// Réponse brute : statut HTTP + corps
struct RawReply {
    status: u16,
    body: String,
}

#[derive(Debug, Clone)]
pub struct AudioBotClient {
    base_url: String,
    bot_id: u32,
    agent: Agent,
}

pub fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl AudioBotClient {
    pub fn new(base_url: &str, bot_id: u32, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_id,
            agent: build_agent(timeout),
        }
    }

    fn command_url(&self, segments: &[&str]) -> String {
        let encoded: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!(
            "{}/api/bot/use/{}/(/{}",
            self.base_url,
            self.bot_id,
            encoded.join("/")
        )
    }

    fn exec(&self, segments: &[&str]) -> Result<RawReply> {
        let url = self.command_url(segments);
        trace!(url = %url, "AudioBot command");
        let mut response = self.agent.get(&url).call()?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ControlError::Network(e.to_string()))?;
        debug!(command = %segments.first().copied().unwrap_or(""), status, "AudioBot reply");
        Ok(RawReply { status, body })
    }

    /// Exécute une commande sans retour et vérifie le statut
    fn exec_expect(&self, segments: &[&str], allowed: &[u16]) -> Result<()> {
        let reply = self.exec(segments)?;
        if allowed.contains(&reply.status) {
            Ok(())
        } else {
            Err(ControlError::unexpected_status(
                &segments.join(" "),
                reply.status,
            ))
        }
    }

    fn exec_json(&self, segments: &[&str]) -> Result<String> {
        let reply = self.exec(segments)?;
        if reply.status != 200 {
            return Err(ControlError::unexpected_status(
                &segments.join(" "),
                reply.status,
            ));
        }
        Ok(reply.body)
    }

    /// Interroge `song` : `Ok(None)` quand le bot ne joue rien
    fn song(&self) -> Result<Option<SongRaw>> {
        let reply = self.exec(&["song"])?;
        match reply.status {
            200 => Ok(Some(serde_json::from_str(&reply.body)?)),
            422 => {
                let err: ErrorRaw = serde_json::from_str(&reply.body)?;
                if err.error_code == Some(NOTHING_PLAYING) {
                    Ok(None)
                } else {
                    Err(ControlError::UnknownState)
                }
            }
            _ => Err(ControlError::UnknownState),
        }
    }
}

impl TransportControl for AudioBotClient {
    fn play(&self, link: &str) -> Result<()> {
        self.exec_expect(&["play", link], &[200, 204])
    }

    fn resume(&self) -> Result<()> {
        self.exec_expect(&["play"], &[200, 204])
    }

    fn pause(&self) -> Result<()> {
        self.exec_expect(&["pause"], &[204])
    }

    fn stop(&self) -> Result<()> {
        self.exec_expect(&["stop"], &[204])
    }

    fn next(&self) -> Result<()> {
        self.exec_expect(&["next"], &[204])
    }

    fn clear(&self) -> Result<()> {
        self.exec_expect(&["clear"], &[204])
    }
}

impl VolumeControl for AudioBotClient {
    fn volume(&self) -> Result<f64> {
        let body = self.exec_json(&["volume"])?;
        let value: f64 = serde_json::from_str(body.trim())?;
        Ok(value)
    }

    fn set_volume(&self, value: u32) -> Result<()> {
        self.exec_expect(&["volume", &value.to_string()], &[200, 204])
    }
}

impl PlaybackStatus for AudioBotClient {
    fn is_playing(&self) -> Result<bool> {
        Ok(match self.song()? {
            None => false,
            Some(SongRaw { length: Some(l), .. }) if l == 0.0 => false,
            Some(_) => true,
        })
    }

    fn current_link(&self) -> Result<Option<String>> {
        Ok(self.song()?.and_then(|song| song.link))
    }
}

impl BotProfile for AudioBotClient {
    fn set_description(&self, text: &str) -> Result<()> {
        self.exec_expect(&["bot", "description", "set", text], &[204])
    }

    fn set_avatar(&self, link: &str) -> Result<()> {
        self.exec_expect(&["bot", "avatar", "set", link], &[204])
    }

    fn identity(&self) -> Result<PlayerIdentity> {
        let body = self.exec_json(&["bot", "info", "client"])?;
        let raw: ClientInfoRaw = serde_json::from_str(&body)?;
        Ok(PlayerIdentity {
            uid: raw.uid,
            client_id: raw.id,
            channel: raw.channel,
        })
    }

    fn list_stream_ids(&self) -> Result<Vec<String>> {
        let body = self.exec_json(&["list", "list"])?;
        let raw: Vec<ListEntryRaw> = serde_json::from_str(&body)?;
        Ok(raw.into_iter().map(|e| e.id).collect())
    }
}
