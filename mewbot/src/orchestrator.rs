//! # Orchestrator
//!
//! Boucle principale du bot : `Connecting → Listening ⇄ Standby`.
//!
//! Chaque itération d'écoute entretient la connexion, suit le lecteur audio
//! dans son canal puis attend un message au plus `poll_interval`. Un message
//! est routé vers son handler ; un délai expiré déclenche la synchronisation
//! du lecteur. Après `standby_after` sans message le bot ré-élit ses
//! interfaces et coupe le mode discussion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mewagent::{ConversationalAgent, DEFAULT_VOICE, TtsRelay};
use mewcontrol::AudioPlayer;
use mewpet::PetGame;
use mewquery::{ChatEvent, EventSource};
use mewsource::CatalogBackend;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::command::{CommandRegistry, Route};
use crate::dialog::{DEFAULT_DIALOG_STEP, DialogContext, InteractionDialog};
use crate::errors::{BotError, Result};
use crate::reply::{Tone, render};
use crate::selector::{BackendSelector, BackendSwitch};
use crate::session::{Sender, Session};
use crate::sync::{PlaybackSynchronizer, SyncReport};

pub const STANDBY_MESSAGE: &str = "那我先下线了喵~~";

/// Handler d'une commande
pub type Handler = fn(&mut Orchestrator, &Sender, &[String]) -> Result<()>;

/// Table nom de commande → handler, construite à l'enregistrement
pub type HandlerTable = HashMap<String, Handler>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Listening,
    Standby,
}

/// Réglages de la boucle et des dialogues
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Message diffusé à la connexion
    pub hello: String,
    /// Vider la file du lecteur à la connexion
    pub clear_on_connect: bool,
    pub poll_interval: Duration,
    pub standby_after: Duration,
    pub dialog_step: Duration,
    pub ask_timeout: Duration,
    pub confirm_timeout: Duration,
    /// Délai des questions du jeu (description d'animal, de compétence)
    pub pet_prompt_timeout: Duration,
    /// Pause entre deux rounds de combat
    pub battle_round_delay: Duration,
    pub tts_voice: String,
    /// Comptes dont les messages sont ignorés
    pub ignore: Vec<String>,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            hello: "Bot已上线。".to_string(),
            clear_on_connect: true,
            poll_interval: Duration::from_secs(3),
            standby_after: Duration::from_secs(60),
            dialog_step: DEFAULT_DIALOG_STEP,
            ask_timeout: Duration::from_secs(10),
            confirm_timeout: Duration::from_secs(5),
            pet_prompt_timeout: Duration::from_secs(15),
            battle_round_delay: Duration::from_millis(500),
            tts_voice: DEFAULT_VOICE.to_string(),
            ignore: vec!["serveradmin".to_string(), "ServerQuery".to_string()],
        }
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    pub(crate) source: Box<dyn EventSource>,
    pub(crate) player: Box<dyn AudioPlayer>,
    pub(crate) selector: BackendSelector,
    pub(crate) registry: CommandRegistry,
    pub(crate) handlers: HandlerTable,
    pub(crate) synchronizer: PlaybackSynchronizer,
    pub(crate) dialog: InteractionDialog,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) settings: OrchestratorSettings,
    pub(crate) session: Session,
    pub(crate) ignore: Vec<String>,
    pub(crate) agent: Option<Box<dyn ConversationalAgent>>,
    pub(crate) tts: Option<TtsRelay>,
    pub(crate) pets: Option<PetGame>,
    player_uid: Option<String>,
    state: LoopState,
    last_activity: Instant,
}

impl Orchestrator {
    pub fn new(
        source: Box<dyn EventSource>,
        player: Box<dyn AudioPlayer>,
        registry: CommandRegistry,
        handlers: HandlerTable,
        settings: OrchestratorSettings,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let last_activity = clock.now();
        Self {
            source,
            player,
            selector: BackendSelector::new(),
            registry,
            handlers,
            synchronizer: PlaybackSynchronizer::new(),
            dialog: InteractionDialog::new(settings.dialog_step),
            ignore: settings.ignore.clone(),
            clock,
            settings,
            session: Session::default(),
            agent: None,
            tts: None,
            pets: None,
            player_uid: None,
            state: LoopState::Connecting,
            last_activity,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.last_activity = clock.now();
        self.clock = clock;
        self
    }

    pub fn with_agent(mut self, agent: Box<dyn ConversationalAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    pub fn with_tts(mut self, tts: TtsRelay) -> Self {
        self.tts = Some(tts);
        self
    }

    pub fn with_pets(mut self, pets: PetGame) -> Self {
        self.pets = Some(pets);
        self
    }

    pub fn register_backend(&mut self, id: &str, handle: Box<dyn CatalogBackend>, priority: i32) {
        self.selector.register(id, handle, priority);
    }

    // ============= Accès =============

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn selector(&self) -> &BackendSelector {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut BackendSelector {
        &mut self.selector
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn ignore_list(&self) -> &[String] {
        &self.ignore
    }

    pub fn pets(&self) -> Option<&PetGame> {
        self.pets.as_ref()
    }

    /// Interface active, `Degraded` si aucune n'est disponible
    pub fn catalog(&mut self) -> Result<&mut dyn CatalogBackend> {
        self.selector.active_mut().ok_or(BotError::Degraded)
    }

    pub(crate) fn player(&self) -> &dyn AudioPlayer {
        self.player.as_ref()
    }

    pub(crate) fn pets_mut(&mut self) -> Result<&mut PetGame> {
        self.pets
            .as_mut()
            .ok_or_else(|| BotError::rejected("宠物api未设置。"))
    }

    // ============= Réponses =============

    pub fn reply(&mut self, tone: Tone, msg: &str) -> Result<()> {
        let text = render(tone, msg);
        self.source.send(self.session.target_scope, &text)?;
        Ok(())
    }

    pub fn send(&mut self, msg: &str) -> Result<()> {
        self.reply(Tone::Info, msg)
    }

    pub fn info(&mut self, msg: &str) -> Result<()> {
        self.reply(Tone::Info, msg)
    }

    pub fn success(&mut self, msg: &str) -> Result<()> {
        self.reply(Tone::Success, msg)
    }

    pub fn warning(&mut self, msg: &str) -> Result<()> {
        self.reply(Tone::Warning, msg)
    }

    pub fn error(&mut self, msg: &str) -> Result<()> {
        self.reply(Tone::Error, msg)
    }

    // ============= Dialogues =============

    fn dialog_context(&mut self) -> DialogContext<'_> {
        DialogContext {
            source: self.source.as_mut(),
            clock: self.clock.as_ref(),
            ignore: &self.ignore,
            scope: self.session.target_scope,
        }
    }

    pub fn ask(&mut self, sender: &Sender, prompt: &str, timeout: Duration) -> Result<String> {
        let dialog = self.dialog;
        dialog.ask(&mut self.dialog_context(), sender, prompt, timeout)
    }

    pub fn confirm(&mut self, sender: &Sender, prompt: &str, timeout: Duration) -> Result<bool> {
        let dialog = self.dialog;
        dialog.confirm(&mut self.dialog_context(), sender, prompt, timeout)
    }

    // ============= Démarrage =============

    /// Phase `Connecting` ; toute erreur est fatale
    pub fn start(&mut self) -> Result<()> {
        self.state = LoopState::Connecting;

        let identity = self
            .player
            .identity()
            .map_err(|e| BotError::StartupFatal(format!("AudioBot initialize failed: {}", e)))?;
        info!(uid = %identity.uid, "AudioBot identity resolved");

        self.source
            .connect()
            .map_err(|e| BotError::StartupFatal(e.to_string()))?;
        info!("Broadcast hello message");
        let hello = self.settings.hello.clone();
        self.source
            .broadcast(&hello)
            .map_err(|e| BotError::StartupFatal(e.to_string()))?;

        if self.settings.clear_on_connect {
            self.player
                .clear()
                .map_err(|e| BotError::StartupFatal(e.to_string()))?;
        }

        if !self.ignore.contains(&identity.uid) {
            self.ignore.push(identity.uid.clone());
        }
        self.player_uid = Some(identity.uid);

        self.refresh_backends();
        self.last_activity = self.clock.now();
        self.state = LoopState::Listening;
        info!("Start listening");
        Ok(())
    }

    /// Démarre puis tourne indéfiniment
    pub fn run(&mut self) -> Result<()> {
        self.start()?;
        loop {
            self.step();
        }
    }

    // ============= Boucle =============

    /// Une itération de la boucle ; les erreurs sont journalisées.
    ///
    /// Une itération en échec consomme quand même `poll_interval` avant la
    /// suivante, pour ne pas marteler le serveur.
    pub fn step(&mut self) -> LoopState {
        if let Err(e) = self.listen_once() {
            error!(error = %e, "Listen error");
            self.clock.sleep(self.settings.poll_interval);
        }
        if self.clock.now().saturating_duration_since(self.last_activity) > self.settings.standby_after {
            self.last_activity = self.clock.now();
            self.standby();
        }
        self.state
    }

    fn listen_once(&mut self) -> Result<()> {
        if !self.source.is_connected() {
            self.reconnect()?;
        }
        self.source.heartbeat()?;
        self.follow()?;

        match self.source.wait_for_event(self.settings.poll_interval)? {
            Some(event) if self.is_ignored(&event) => {
                debug!(uid = %event.sender_uid, "Ignored sender");
            }
            Some(event) => {
                self.last_activity = self.clock.now();
                self.handle_event(event);
            }
            None => {
                self.sync_tick();
            }
        }
        Ok(())
    }

    fn reconnect(&mut self) -> Result<()> {
        warn!("Server query connection lost, reconnecting");
        self.source.connect()?;
        info!("Server query reconnected");
        Ok(())
    }

    fn is_ignored(&self, event: &ChatEvent) -> bool {
        self.ignore.contains(&event.sender_uid)
    }

    /// Rejoint le canal du lecteur audio pour recevoir ses messages de canal
    pub fn follow(&mut self) -> Result<()> {
        let Some(uid) = self.player_uid.clone() else {
            return Ok(());
        };
        if !self.source.is_online(&uid)? {
            return Err(BotError::not_found("AudioBotNotFound."));
        }
        let channel = match self.player.identity() {
            Ok(identity) => identity.channel,
            Err(e) => {
                debug!(error = %e, "Cannot read player channel");
                return Ok(());
            }
        };
        self.source.move_to_channel(channel)?;
        Ok(())
    }

    pub fn sync_tick(&mut self) -> SyncReport {
        let player = self.player.as_ref();
        self.synchronizer.tick(player, self.selector.active_mut())
    }

    /// Passage en veille après une longue inactivité
    pub fn standby(&mut self) {
        self.state = LoopState::Standby;
        info!("Standby");
        self.refresh_backends();
        if self.session.chat_mode_enabled {
            self.session.chat_mode_enabled = false;
            if let Err(e) = self.send(STANDBY_MESSAGE) {
                warn!(error = %e, "Cannot announce standby");
            }
        }
        self.state = LoopState::Listening;
    }

    /// Re-sonde et ré-élit les interfaces ; un changement est annoncé
    pub fn refresh_backends(&mut self) -> Option<BackendSwitch> {
        self.selector.probe_all();
        let switch = self.selector.elect()?;
        let announce = match &switch.to {
            Some(id) => format!("已切换到接口：{}", id),
            None => BotError::Degraded.to_string(),
        };
        if let Err(e) = self.warning(&announce) {
            warn!(error = %e, "Cannot announce api switch");
        }
        Some(switch)
    }

    // ============= Messages =============

    /// Traite un message : routage puis handler, ou discussion par défaut
    pub fn handle_event(&mut self, event: ChatEvent) {
        info!(sender = %event.sender_name, uid = %event.sender_uid, msg = %event.body, "Received event");
        self.session.target_scope = event.scope;
        let sender = Sender::from(&event);

        let result = match self.registry.route(&event.body) {
            Some(route) => self.dispatch(&sender, route),
            None => self.default_handler(&sender, &event.body),
        };
        if let Err(e) = result {
            warn!(sender = %sender.display_name, error = %e, "Command failed");
            if let Err(send_err) = self.error(&e.to_string()) {
                error!(error = %send_err, "Cannot report command failure");
            }
        }
    }

    fn dispatch(&mut self, sender: &Sender, route: Route) -> Result<()> {
        let Some(handler) = self.handlers.get(&route.name).copied() else {
            warn!(command = %route.name, "No handler for command");
            return Ok(());
        };
        info!(command = %route.name, sender = %sender.display_name, args = ?route.args, "Exec command");
        handler(self, sender, &route.args)
    }

    /// Message sans commande : transmis à l'agent si la discussion est ouverte
    fn default_handler(&mut self, sender: &Sender, message: &str) -> Result<()> {
        if !self.session.chat_mode_enabled {
            debug!(sender = %sender.display_name, "Message without command ignored");
            return Ok(());
        }
        crate::handlers::chat::talk(self, sender, message)
    }

    pub(crate) fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }
}
