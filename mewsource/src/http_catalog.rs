//! Client HTTP pour les API musicales REST `/api/music/{kind}/...`
//!
//! Endpoints utilisés :
//! - `search?key=..&pageIndex=1&pageSize=..` → `data.data[]`
//! - `song?ID=a,b` → `data[]`
//! - `searchsuggest?key=..` → `data.search[]`
//! - `url?ID=..&quality=..&format=..` : lien direct, jamais appelé par le bot

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};
use ureq::Agent;
use url::Url;

use crate::error::{CatalogError, Result};
use crate::model::{Album, Artist, Track};
use crate::playlist_book::PlaylistBook;
use crate::CatalogBackend;

/// Requête utilisée pour sonder la disponibilité
const PROBE_QUERY: &str = "陈奕迅";
const DEFAULT_RETRIES: usize = 2;
const STREAM_QUALITY: u32 = 320;
const STREAM_FORMAT: &str = "mp3";
const ARTWORK_QUALITY: u32 = 500;
const ARTWORK_FORMAT: &str = "jpg";

/// Les identifiants arrivent tantôt en chaîne, tantôt en nombre
fn de_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct RawSinger {
    #[serde(rename = "ID", deserialize_with = "de_id")]
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    #[serde(rename = "ID", deserialize_with = "de_id")]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawSong {
    #[serde(rename = "ID", deserialize_with = "de_id")]
    id: String,
    title: String,
    #[serde(default)]
    singers: Vec<RawSinger>,
    #[serde(default)]
    album: Option<RawAlbum>,
}

impl From<RawSong> for Track {
    fn from(raw: RawSong) -> Self {
        Track {
            id: raw.id,
            name: raw.title,
            artists: raw
                .singers
                .into_iter()
                .map(|s| Artist {
                    id: s.id,
                    name: s.name,
                })
                .collect(),
            // l'album "0" signifie « pas d'album »
            album: raw
                .album
                .filter(|a| a.id != "0" && !a.id.is_empty())
                .map(|a| Album {
                    id: a.id,
                    name: a.name,
                }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Option<Vec<RawSong>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchPage>,
}

#[derive(Debug, Deserialize)]
struct SongsResponse {
    #[serde(default)]
    data: Option<Vec<RawSong>>,
}

#[derive(Debug, Default, Deserialize)]
struct SuggestPage {
    #[serde(default)]
    search: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    data: Option<SuggestPage>,
}

/// Backend de catalogue parlant l'API REST musicale
#[derive(Debug)]
pub struct HttpCatalog {
    base_url: String,
    kind: String,
    agent: Agent,
    retries: usize,
    book: PlaylistBook,
}

impl HttpCatalog {
    /// Crée un client avec un carnet de playlists en mémoire
    pub fn new(base_url: &str, kind: &str, timeout: Duration) -> Self {
        Self::with_playlists(base_url, kind, timeout, PlaylistBook::new())
    }

    pub fn with_playlists(
        base_url: &str,
        kind: &str,
        timeout: Duration,
        book: PlaylistBook,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            kind: kind.to_string(),
            agent,
            retries: DEFAULT_RETRIES,
            book,
        }
    }

    /// Nombre de tentatives pour les recherches (minimum 1)
    pub fn set_retries(&mut self, retries: usize) {
        self.retries = retries.max(1);
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/music/{}/{}", self.base_url, self.kind, name)
    }

    fn get_json(&self, name: &str, params: &[(&str, String)]) -> Result<String> {
        let url = self.endpoint(name);
        let mut last_err = None;
        for attempt in 0..self.retries.max(1) {
            let mut request = self.agent.get(&url);
            for (k, v) in params {
                request = request.query(*k, v);
            }
            match request.call() {
                Ok(mut response) => {
                    let body = response
                        .body_mut()
                        .read_to_string()
                        .map_err(|e| CatalogError::Network(e.to_string()))?;
                    return Ok(body);
                }
                Err(ureq::Error::StatusCode(code)) => {
                    return Err(CatalogError::from_status_code(code, url));
                }
                Err(e) => {
                    debug!(url = %url, attempt, error = %e, "Catalog request failed");
                    last_err = Some(CatalogError::Network(e.to_string()));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| CatalogError::Network(url)))
    }

    fn link(&self, track_id: &str, quality: u32, format: &str) -> Result<String> {
        let url = Url::parse_with_params(
            &self.endpoint("url"),
            &[
                ("ID", track_id.to_string()),
                ("quality", quality.to_string()),
                ("format", format.to_string()),
            ],
        )
        .map_err(|e| CatalogError::Unavailable(format!("invalid catalog url: {}", e)))?;
        Ok(url.to_string())
    }
}

impl CatalogBackend for HttpCatalog {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn available(&self) -> bool {
        match self.search(PROBE_QUERY, 1) {
            Ok(tracks) => !tracks.is_empty(),
            Err(e) => {
                warn!(url = %self.base_url, error = %e, "Catalog probe failed");
                false
            }
        }
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let body = self.get_json(
            "search",
            &[
                ("key", query.to_string()),
                ("pageIndex", "1".to_string()),
                ("pageSize", limit.to_string()),
            ],
        )?;
        let response: SearchResponse = serde_json::from_str(&body)?;
        Ok(response
            .data
            .and_then(|page| page.data)
            .unwrap_or_default()
            .into_iter()
            .map(Track::from)
            .collect())
    }

    fn suggest(&self, query: &str) -> Result<Vec<String>> {
        let body = self.get_json("searchsuggest", &[("key", query.to_string())])?;
        let response: SuggestResponse = serde_json::from_str(&body)?;
        Ok(response
            .data
            .and_then(|page| page.search)
            .unwrap_or_default())
    }

    fn tracks(&self, ids: &[String]) -> Result<Vec<Track>> {
        let ids: Vec<&str> = ids
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = self.get_json("song", &[("ID", ids.join(","))])?;
        let response: SongsResponse = serde_json::from_str(&body)?;
        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(Track::from)
            .collect())
    }

    fn stream_link(&self, track_id: &str) -> Result<String> {
        self.link(track_id, STREAM_QUALITY, STREAM_FORMAT)
    }

    fn artwork_link(&self, track_id: &str) -> Result<String> {
        self.link(track_id, ARTWORK_QUALITY, ARTWORK_FORMAT)
    }

    fn playlists(&self) -> &PlaylistBook {
        &self.book
    }

    fn playlists_mut(&mut self) -> &mut PlaylistBook {
        &mut self.book
    }
}
