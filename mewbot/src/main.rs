use std::time::Duration;

use anyhow::{Context, bail};
use mewagent::{ChatCompletionsClient, ChatSession, TtsRelay};
use mewbot::logs::init_logging;
use mewbot::{Orchestrator, OrchestratorSettings, default_handlers, default_registry};
use mewconfig::get_config;
use mewcontrol::AudioBotClient;
use mewpet::{AgentOracle, PetGame};
use mewquery::{QueryConfig, ServerQueryClient};
use mewsource::{HttpCatalog, PlaylistBook};
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    let _log_handle = init_logging();
    let config = get_config();
    info!(config_dir = %config.config_dir(), "MewBot starting");

    let query = config.get_query_settings()?;
    let audiobot = config.get_audiobot_settings()?;
    let loop_settings = config.get_loop_settings()?;
    let agent = config.get_agent_settings()?;
    let tts = config.get_tts_settings()?;
    let pet = config.get_pet_settings()?;

    let source = ServerQueryClient::new(QueryConfig {
        host: query.host.clone(),
        port: query.port,
        username: query.username.clone(),
        password: query.password.clone(),
        nickname: query.nickname.clone(),
        server_id: query.server_id,
        timeout: Duration::from_secs(query.timeout_secs),
    });
    let player = AudioBotClient::new(
        &audiobot.url,
        audiobot.bot_id,
        Duration::from_secs(audiobot.timeout_secs),
    );

    let settings = OrchestratorSettings {
        hello: query.hello.clone(),
        clear_on_connect: audiobot.clear_on_connect,
        poll_interval: loop_settings.poll_interval(),
        standby_after: loop_settings.standby_after(),
        dialog_step: loop_settings.dialog_step(),
        ask_timeout: loop_settings.ask_timeout(),
        confirm_timeout: loop_settings.confirm_timeout(),
        pet_prompt_timeout: loop_settings.pet_prompt_timeout(),
        battle_round_delay: Duration::from_millis(pet.battle_round_delay_ms),
        tts_voice: tts.voice.clone(),
        ignore: loop_settings.ignore.clone(),
    };

    let mut bot = Orchestrator::new(
        Box::new(source),
        Box::new(player),
        default_registry(),
        default_handlers(),
        settings,
    );

    let catalogs = config.get_catalog_settings()?;
    if catalogs.is_empty() {
        bail!("no music api configured");
    }
    for catalog in catalogs {
        let book = match &catalog.playlists_file {
            Some(file) => PlaylistBook::open(config.resolve_path(file))
                .with_context(|| format!("cannot load playlists of {}", catalog.id))?,
            None => PlaylistBook::new(),
        };
        let handle =
            HttpCatalog::with_playlists(&catalog.url, &catalog.kind, catalog.timeout(), book);
        bot.register_backend(&catalog.id, Box::new(handle), catalog.priority);
    }

    if agent.enabled {
        let timeout = Duration::from_secs(agent.timeout_secs);
        let completion =
            ChatCompletionsClient::new(&agent.base_url, &agent.api_key, &agent.model, timeout);
        bot = bot.with_agent(Box::new(ChatSession::new(
            Box::new(completion),
            &agent.system_prompt,
        )));
        info!(model = %agent.model, "Chat agent enabled");

        if pet.enabled {
            let completion = ChatCompletionsClient::new(
                &agent.base_url,
                &agent.api_key,
                &agent.pet_model,
                timeout,
            );
            let oracle = AgentOracle::new(Box::new(completion));
            let game = PetGame::open(config.resolve_path(&pet.store_file), Box::new(oracle))
                .context("cannot load pets")?;
            bot = bot.with_pets(game);
            info!(model = %agent.pet_model, "Pet game enabled");
        }
    } else if pet.enabled {
        warn!("Pet game needs the chat agent, disabled");
    }

    if tts.enabled {
        bot = bot.with_tts(TtsRelay::new(&tts.url));
        info!(voice = %tts.voice, "TTS relay enabled");
    }

    if let Err(e) = bot.run() {
        error!(error = %e, "MewBot stopped");
        return Err(e.into());
    }
    Ok(())
}

