#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mewagent::ConversationalAgent;
use mewbot::{
    Clock, CommandRegistry, ManualClock, Orchestrator, OrchestratorSettings, default_handlers,
};
use mewcontrol::{
    BotProfile, ControlError, PlaybackStatus, PlayerIdentity, TransportControl, VolumeControl,
};
use mewquery::{ChannelId, ChatEvent, ClientPosition, EventSource, QueryError, Scope};
use mewsource::{CatalogBackend, CatalogError, PlaylistBook, Track};

pub const PLAYER_UID: &str = "player-uid=";
pub const ALICE: &str = "alice-uid=";
pub const BOB: &str = "bob-uid=";

// ============= Event source =============

#[derive(Debug, Default)]
pub struct SourceState {
    pub incoming: VecDeque<ChatEvent>,
    pub sent: Vec<(Scope, String)>,
    pub broadcasts: Vec<String>,
    pub connected: bool,
    pub connects: usize,
    pub fail_connect: bool,
    pub channel: ChannelId,
    pub moves: Vec<ChannelId>,
    pub player_online: bool,
    pub names: HashMap<String, String>,
    /// Attentes à vide à subir avant de rendre les messages en file
    pub silent_waits: usize,
}

/// Source scriptée : rend les messages en file, sinon avance l'horloge du
/// délai demandé et renvoie `None`
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    pub state: Arc<Mutex<SourceState>>,
    clock: Arc<ManualClock>,
}

impl ScriptedSource {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        let state = SourceState {
            player_online: true,
            channel: 1,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            clock,
        }
    }

    pub fn push(&self, uid: &str, name: &str, body: &str) {
        self.state
            .lock()
            .unwrap()
            .incoming
            .push_back(ChatEvent::new(uid, name, Scope::Channel, body));
    }

    pub fn sent(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn clear_sent(&self) {
        self.state.lock().unwrap().sent.clear();
    }

    pub fn disconnect(&self) {
        self.state.lock().unwrap().connected = false;
    }
}

impl EventSource for ScriptedSource {
    fn connect(&mut self) -> mewquery::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_connect {
            return Err(QueryError::Disconnected);
        }
        state.connected = true;
        state.connects += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn heartbeat(&mut self) -> mewquery::Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(QueryError::NotConnected)
        }
    }

    fn wait_for_event(&mut self, timeout: Duration) -> mewquery::Result<Option<ChatEvent>> {
        let next = {
            let mut state = self.state.lock().unwrap();
            if state.silent_waits > 0 {
                state.silent_waits -= 1;
                None
            } else {
                state.incoming.pop_front()
            }
        };
        if next.is_none() {
            self.clock.advance(timeout);
        }
        Ok(next)
    }

    fn send(&mut self, scope: Scope, text: &str) -> mewquery::Result<()> {
        self.state.lock().unwrap().sent.push((scope, text.to_string()));
        Ok(())
    }

    fn broadcast(&mut self, text: &str) -> mewquery::Result<()> {
        self.state.lock().unwrap().broadcasts.push(text.to_string());
        Ok(())
    }

    fn own_position(&mut self) -> mewquery::Result<ClientPosition> {
        Ok(ClientPosition {
            client_id: 7,
            channel_id: self.state.lock().unwrap().channel,
        })
    }

    fn move_to_channel(&mut self, channel: ChannelId) -> mewquery::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.channel != channel {
            state.channel = channel;
            state.moves.push(channel);
        }
        Ok(())
    }

    fn is_online(&mut self, uid: &str) -> mewquery::Result<bool> {
        Ok(uid == PLAYER_UID && self.state.lock().unwrap().player_online)
    }

    fn resolve_identity(&mut self, uid: &str) -> mewquery::Result<Option<String>> {
        Ok(self.state.lock().unwrap().names.get(uid).cloned())
    }
}

// ============= Player =============

#[derive(Debug, Default)]
pub struct PlayerState {
    pub playing: bool,
    pub link: Option<String>,
    pub played: Vec<String>,
    pub descriptions: Vec<String>,
    pub avatars: Vec<String>,
    pub volume: f64,
    pub clears: usize,
    pub stops: usize,
    pub pauses: usize,
    pub channel: u64,
    pub fail_identity: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakePlayer {
    pub state: Arc<Mutex<PlayerState>>,
}

impl FakePlayer {
    pub fn new() -> Self {
        let player = Self::default();
        {
            let mut state = player.state.lock().unwrap();
            state.channel = 5;
            state.volume = 30.0;
        }
        player
    }

    /// Simule la fin du morceau en cours
    pub fn finish(&self) {
        self.state.lock().unwrap().playing = false;
    }

    pub fn played(&self) -> Vec<String> {
        self.state.lock().unwrap().played.clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.state.lock().unwrap().descriptions.clone()
    }
}

impl TransportControl for FakePlayer {
    fn play(&self, link: &str) -> mewcontrol::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.played.push(link.to_string());
        state.link = Some(link.to_string());
        state.playing = true;
        Ok(())
    }

    fn resume(&self) -> mewcontrol::Result<()> {
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    fn pause(&self) -> mewcontrol::Result<()> {
        self.state.lock().unwrap().pauses += 1;
        Ok(())
    }

    fn stop(&self) -> mewcontrol::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.stops += 1;
        state.playing = false;
        Ok(())
    }

    fn next(&self) -> mewcontrol::Result<()> {
        Ok(())
    }

    fn clear(&self) -> mewcontrol::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.clears += 1;
        state.playing = false;
        state.link = None;
        Ok(())
    }
}

impl VolumeControl for FakePlayer {
    fn volume(&self) -> mewcontrol::Result<f64> {
        Ok(self.state.lock().unwrap().volume)
    }

    fn set_volume(&self, value: u32) -> mewcontrol::Result<()> {
        self.state.lock().unwrap().volume = value as f64;
        Ok(())
    }
}

impl PlaybackStatus for FakePlayer {
    fn is_playing(&self) -> mewcontrol::Result<bool> {
        Ok(self.state.lock().unwrap().playing)
    }

    fn current_link(&self) -> mewcontrol::Result<Option<String>> {
        Ok(self.state.lock().unwrap().link.clone())
    }
}

impl BotProfile for FakePlayer {
    fn set_description(&self, text: &str) -> mewcontrol::Result<()> {
        self.state.lock().unwrap().descriptions.push(text.to_string());
        Ok(())
    }

    fn set_avatar(&self, link: &str) -> mewcontrol::Result<()> {
        self.state.lock().unwrap().avatars.push(link.to_string());
        Ok(())
    }

    fn identity(&self) -> mewcontrol::Result<PlayerIdentity> {
        let state = self.state.lock().unwrap();
        if state.fail_identity {
            return Err(ControlError::Network("connection refused".into()));
        }
        Ok(PlayerIdentity {
            uid: PLAYER_UID.to_string(),
            client_id: 3,
            channel: state.channel,
        })
    }

    fn list_stream_ids(&self) -> mewcontrol::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

// ============= Catalog =============

#[derive(Debug)]
pub struct FakeCatalog {
    kind: String,
    pub available: Arc<AtomicBool>,
    library: Vec<Track>,
    suggestions: Vec<String>,
    book: PlaylistBook,
}

impl FakeCatalog {
    pub fn new(kind: &str, available: bool) -> Self {
        Self {
            kind: kind.to_string(),
            available: Arc::new(AtomicBool::new(available)),
            library: Vec::new(),
            suggestions: Vec::new(),
            book: PlaylistBook::new(),
        }
    }

    pub fn with_library(mut self, tracks: Vec<Track>) -> Self {
        self.library = tracks;
        self
    }

    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_current(mut self, tracks: Vec<Track>) -> Self {
        self.book.current_add(tracks).unwrap();
        self
    }

    pub fn availability(&self) -> Arc<AtomicBool> {
        self.available.clone()
    }
}

pub fn stream_link(id: &str) -> String {
    format!("mem://stream/{}", id)
}

impl CatalogBackend for FakeCatalog {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn search(&self, query: &str, limit: usize) -> mewsource::Result<Vec<Track>> {
        if !self.available() {
            return Err(CatalogError::Network("down".into()));
        }
        Ok(self
            .library
            .iter()
            .filter(|t| t.name.contains(query))
            .take(limit)
            .cloned()
            .collect())
    }

    fn suggest(&self, _query: &str) -> mewsource::Result<Vec<String>> {
        Ok(self.suggestions.clone())
    }

    fn tracks(&self, ids: &[String]) -> mewsource::Result<Vec<Track>> {
        Ok(self
            .library
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    fn stream_link(&self, track_id: &str) -> mewsource::Result<String> {
        Ok(stream_link(track_id))
    }

    fn artwork_link(&self, track_id: &str) -> mewsource::Result<String> {
        Ok(format!("mem://art/{}", track_id))
    }

    fn playlists(&self) -> &PlaylistBook {
        &self.book
    }

    fn playlists_mut(&mut self) -> &mut PlaylistBook {
        &mut self.book
    }
}

pub fn track(id: &str, name: &str, artist: &str) -> Track {
    Track::new(id, name).with_artist(&format!("a{}", id), artist)
}

// ============= Agent =============

#[derive(Debug, Default, Clone)]
pub struct EchoAgent {
    pub turns: Arc<Mutex<Vec<String>>>,
    pub resets: Arc<Mutex<usize>>,
}

impl ConversationalAgent for EchoAgent {
    fn reset(&mut self) {
        *self.resets.lock().unwrap() += 1;
    }

    fn send(&mut self, text: &str) -> mewagent::Result<String> {
        self.turns.lock().unwrap().push(text.to_string());
        Ok("喵~".to_string())
    }
}

// ============= Harness =============

pub struct Harness {
    pub bot: Orchestrator,
    pub source: ScriptedSource,
    pub player: FakePlayer,
    pub clock: Arc<ManualClock>,
}

pub fn settings() -> OrchestratorSettings {
    OrchestratorSettings {
        battle_round_delay: Duration::ZERO,
        ..OrchestratorSettings::default()
    }
}

/// Orchestrateur câblé sur les fakes, avec la table de handlers complète
pub fn harness(registry: CommandRegistry) -> Harness {
    harness_with(registry, settings())
}

pub fn harness_with(registry: CommandRegistry, settings: OrchestratorSettings) -> Harness {
    let clock = Arc::new(ManualClock::new());
    let source = ScriptedSource::new(clock.clone());
    let player = FakePlayer::new();
    let shared: Arc<dyn Clock> = clock.clone();
    let bot = Orchestrator::new(
        Box::new(source.clone()),
        Box::new(player.clone()),
        registry,
        default_handlers(),
        settings,
    )
    .with_clock(shared);
    Harness {
        bot,
        source,
        player,
        clock,
    }
}

pub fn chat_event(uid: &str, name: &str, body: &str) -> ChatEvent {
    ChatEvent::new(uid, name, Scope::Channel, body)
}
