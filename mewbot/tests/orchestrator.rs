mod common;

use std::time::Duration;

use common::{
    ALICE, BOB, EchoAgent, FakeCatalog, PLAYER_UID, chat_event, harness, harness_with, settings,
    stream_link, track,
};
use mewbot::orchestrator::STANDBY_MESSAGE;
use mewbot::{BotError, Command, CommandRegistry, LoopState, default_registry};
use mewsource::CatalogBackend;

fn only_next() -> CommandRegistry {
    vec![Command::new("next", &["下一首"], "下一首")].into_iter().collect()
}

#[test]
fn test_next_command_end_to_end() {
    let mut h = harness(only_next());
    h.bot.register_backend(
        "default",
        Box::new(FakeCatalog::new("x", true).with_current(vec![track("42", "晴天", "周杰伦")])),
        100,
    );
    h.bot.start().unwrap();
    h.source.clear_sent();

    h.bot.handle_event(chat_event(ALICE, "alice", "下一首"));

    assert_eq!(h.bot.catalog().unwrap().cursor(), Some(0));
    assert_eq!(h.player.played(), vec![stream_link("42")]);
    let sent = h.source.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("下一首"));
}

#[test]
fn test_start_sequence() {
    let mut h = harness(only_next());
    h.bot.register_backend("default", Box::new(FakeCatalog::new("x", true)), 100);

    h.bot.start().unwrap();

    assert_eq!(h.bot.state(), LoopState::Listening);
    assert!(h.bot.ignore_list().iter().any(|uid| uid == PLAYER_UID));
    let source = h.source.state.lock().unwrap();
    assert_eq!(source.connects, 1);
    assert_eq!(source.broadcasts, vec!["Bot已上线。"]);
    assert_eq!(h.player.state.lock().unwrap().clears, 1);
    assert_eq!(h.bot.selector().active_id(), Some("default"));
}

#[test]
fn test_start_fails_without_player() {
    let mut h = harness(only_next());
    h.player.state.lock().unwrap().fail_identity = true;
    assert!(matches!(h.bot.start(), Err(BotError::StartupFatal(_))));
    assert_eq!(h.source.state.lock().unwrap().connects, 0);
}

#[test]
fn test_start_fails_when_chat_server_is_down() {
    let mut h = harness(only_next());
    h.source.state.lock().unwrap().fail_connect = true;
    assert!(matches!(h.bot.start(), Err(BotError::StartupFatal(_))));
}

#[test]
fn test_idle_step_synchronizes_and_event_step_does_not() {
    let mut h = harness(default_registry());
    h.bot.register_backend(
        "default",
        Box::new(FakeCatalog::new("x", true).with_current(vec![
            track("1", "晴天", "周杰伦"),
            track("2", "七里香", "周杰伦"),
        ])),
        100,
    );
    h.bot.start().unwrap();

    // un message : pas de synchronisation pendant ce tour
    h.source.push(ALICE, "alice", "你好");
    h.bot.step();
    assert!(h.player.played().is_empty());

    // délai expiré : le lecteur à l'arrêt reçoit le premier morceau
    h.bot.step();
    assert_eq!(h.player.played(), vec![stream_link("1")]);
    assert_eq!(h.player.descriptions(), vec!["！！正在播放来自周杰伦的晴天"]);
}

#[test]
fn test_step_follows_the_player_channel() {
    let mut h = harness(only_next());
    h.bot.start().unwrap();
    h.bot.step();
    assert_eq!(h.source.state.lock().unwrap().channel, 5);
    h.bot.step();
    assert_eq!(h.source.state.lock().unwrap().moves, vec![5]);
}

#[test]
fn test_ignored_accounts_are_not_dispatched() {
    let mut h = harness(only_next());
    h.bot.register_backend(
        "default",
        Box::new(FakeCatalog::new("x", true).with_current(vec![track("1", "晴天", "周杰伦")])),
        100,
    );
    h.bot.start().unwrap();
    h.player.state.lock().unwrap().playing = true;
    h.source.clear_sent();

    h.source.push(PLAYER_UID, "player", "下一首");
    h.source.push("serveradmin", "admin", "下一首");
    h.bot.step();
    h.bot.step();
    assert!(h.source.sent().is_empty());
    assert!(h.player.played().is_empty());
}

#[test]
fn test_handler_failure_is_one_red_message() {
    let mut h = harness(only_next());
    h.bot.register_backend("default", Box::new(FakeCatalog::new("x", true)), 100);
    h.bot.start().unwrap();
    h.source.clear_sent();

    h.bot.handle_event(chat_event(ALICE, "alice", "下一首"));
    assert_eq!(
        h.source.sent(),
        vec!["[b][color=red]当前歌单为空。[/color][/b]"]
    );
}

#[test]
fn test_degraded_without_backend() {
    let mut h = harness(only_next());
    h.bot.register_backend("default", Box::new(FakeCatalog::new("x", false)), 100);
    h.bot.start().unwrap();
    h.source.clear_sent();

    h.bot.handle_event(chat_event(ALICE, "alice", "下一首"));
    assert_eq!(
        h.source.sent(),
        vec!["[b][color=red]当前没有可用的音乐接口。[/color][/b]"]
    );
}

#[test]
fn test_route_without_handler_is_ignored() {
    let registry: CommandRegistry = vec![Command::new("dance", &["跳舞"], "")].into_iter().collect();
    let mut h = harness(registry);
    h.bot.start().unwrap();
    h.source.clear_sent();
    h.bot.handle_event(chat_event(ALICE, "alice", "跳舞"));
    assert!(h.source.sent().is_empty());
}

#[test]
fn test_chat_mode_and_standby() {
    let mut h = harness(default_registry());
    let agent = EchoAgent::default();
    h.bot = h.bot.with_agent(Box::new(agent.clone()));
    h.bot.start().unwrap();
    h.source.clear_sent();

    // hors mode discussion, un message libre est ignoré
    h.bot.handle_event(chat_event(ALICE, "alice", "你好呀"));
    assert!(h.source.sent().is_empty());

    h.bot.handle_event(chat_event(ALICE, "alice", "聊天"));
    assert!(h.bot.session().chat_mode_enabled);
    assert_eq!(*agent.resets.lock().unwrap(), 1);

    h.bot.handle_event(chat_event(ALICE, "alice", "你好呀"));
    assert_eq!(agent.turns.lock().unwrap().clone(), vec!["alice：你好呀"]);
    assert_eq!(h.source.sent().last().unwrap(), "喵~");

    // 60 s sans message : veille
    for _ in 0..21 {
        h.bot.step();
    }
    assert!(!h.bot.session().chat_mode_enabled);
    assert_eq!(h.bot.state(), LoopState::Listening);
    let standby: Vec<String> = h
        .source
        .sent()
        .into_iter()
        .filter(|m| m == STANDBY_MESSAGE)
        .collect();
    assert_eq!(standby.len(), 1);
}

#[test]
fn test_lost_connection_is_restored_on_next_step() {
    let mut h = harness(only_next());
    h.bot.start().unwrap();
    h.source.disconnect();
    h.bot.step();
    let source = h.source.state.lock().unwrap();
    assert!(source.connected);
    assert_eq!(source.connects, 2);
}

#[test]
fn test_failed_steps_still_wait_for_the_poll_interval() {
    let mut h = harness(default_registry());
    h.bot = h.bot.with_agent(Box::new(EchoAgent::default()));
    h.bot.start().unwrap();
    h.bot.handle_event(chat_event(ALICE, "alice", "聊天"));
    h.source.state.lock().unwrap().player_online = false;

    let before = h.clock.elapsed();
    for _ in 0..10 {
        h.bot.step();
    }
    assert_eq!(h.clock.elapsed() - before, Duration::from_secs(30));

    // l'inactivité continue de compter : la veille finit par arriver
    for _ in 0..11 {
        h.bot.step();
    }
    assert!(!h.bot.session().chat_mode_enabled);
    assert!(h.source.sent().iter().any(|m| m == STANDBY_MESSAGE));
}

#[test]
fn test_refused_reconnect_waits_between_attempts() {
    let mut h = harness(only_next());
    h.bot.start().unwrap();
    {
        let mut source = h.source.state.lock().unwrap();
        source.connected = false;
        source.fail_connect = true;
    }

    let before = h.clock.elapsed();
    for _ in 0..5 {
        h.bot.step();
    }
    assert_eq!(h.clock.elapsed() - before, Duration::from_secs(15));
    assert_eq!(h.source.state.lock().unwrap().connects, 1);

    h.source.state.lock().unwrap().fail_connect = false;
    h.bot.step();
    assert_eq!(h.source.state.lock().unwrap().connects, 2);
}

#[test]
fn test_clear_asks_the_sender_only() {
    let mut h = harness(default_registry());
    h.bot.register_backend(
        "default",
        Box::new(FakeCatalog::new("x", true).with_current(vec![track("1", "晴天", "周杰伦")])),
        100,
    );
    h.bot.start().unwrap();
    h.source.clear_sent();

    h.source.push(BOB, "bob", "是");
    h.source.push(ALICE, "alice", "是");
    h.bot.handle_event(chat_event(ALICE, "alice", "清空"));

    assert!(h.bot.catalog().unwrap().current_show().is_empty());
    assert_eq!(h.player.state.lock().unwrap().clears, 2);
    assert_eq!(
        h.source.sent(),
        vec![
            "你确定要清空当前歌单吗？[是/否] >",
            "[b][color=green]已为您清空歌单。[/color][/b]"
        ]
    );
}

#[test]
fn test_clear_times_out() {
    let mut h = harness(default_registry());
    h.bot.register_backend(
        "default",
        Box::new(FakeCatalog::new("x", true).with_current(vec![track("1", "晴天", "周杰伦")])),
        100,
    );
    h.bot.start().unwrap();
    h.source.clear_sent();

    let before = h.clock.elapsed();
    h.bot.handle_event(chat_event(ALICE, "alice", "清空"));
    assert_eq!(h.clock.elapsed() - before, Duration::from_secs(5));
    assert_eq!(h.bot.catalog().unwrap().current_show().len(), 1);
    assert_eq!(h.source.sent().last().unwrap(), "好的呢~");
}

#[derive(Debug)]
struct FixedOracle;

impl mewpet::PetOracle for FixedOracle {
    fn generate_pet(&self, description: &str) -> mewpet::Result<mewpet::PetDraft> {
        Ok(mewpet::PetDraft {
            name: format!("{}宝", description),
            species: "猫".to_string(),
            description: description.to_string(),
            health: 100,
            height: 30,
            weight: 4,
        })
    }

    fn generate_skill(&self, _pet: &mewpet::Pet, description: &str) -> mewpet::Result<mewpet::Skill> {
        Ok(mewpet::Skill {
            name: description.to_string(),
            kind: "魔法".to_string(),
            capability: 20,
            description: String::new(),
        })
    }

    fn narrate_battle(&self, fighters: &[mewpet::Pet]) -> mewpet::Result<mewpet::BattleNarration> {
        Ok(mewpet::BattleNarration {
            winner_index: 0,
            rounds: fighters.iter().map(|p| format!("{}出招", p.name)).collect(),
        })
    }
}

#[test]
fn test_pet_commands_need_a_game() {
    let mut h = harness(default_registry());
    h.bot.start().unwrap();
    h.source.clear_sent();
    h.bot.handle_event(chat_event(ALICE, "alice", "签到"));
    assert_eq!(
        h.source.sent(),
        vec!["[b][color=red]宠物api未设置。[/color][/b]"]
    );
}

#[test]
fn test_pet_adoption_through_chat() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = dir.path().join("pets.json");
    let mut h = harness(default_registry());
    h.bot = h
        .bot
        .with_pets(mewpet::PetGame::open(&store, Box::new(FixedOracle)).unwrap());
    h.bot.start().unwrap();
    h.source.clear_sent();

    h.bot.handle_event(chat_event(ALICE, "alice", "签到"));
    assert_eq!(h.source.sent(), vec!["你还没有宠物呢。"]);
    h.source.clear_sent();

    h.source.push(ALICE, "alice", "橘");
    h.bot.handle_event(chat_event(ALICE, "alice", "创建宠物"));
    assert_eq!(
        h.source.sent(),
        vec![
            "请输入宠物描述（15秒内） >",
            "生成中....",
            "[b][color=green]创建宠物成功！恭喜alice拥有了一只橘宝。[/color][/b]"
        ]
    );
    assert!(h.bot.pets().unwrap().has_pet(ALICE));

    let reloaded = mewpet::PetGame::open(&store, Box::new(FixedOracle)).unwrap();
    assert_eq!(reloaded.pet(ALICE).unwrap().name, "橘宝");
}

#[test]
fn test_battle_rounds_are_paced_by_the_clock() {
    let mut game = mewpet::PetGame::in_memory(Box::new(FixedOracle));
    let now = chrono::Utc::now();
    game.adopt(ALICE, "橘", now).unwrap();
    game.adopt(BOB, "黑", now).unwrap();
    game.join_battle(ALICE).unwrap();
    game.join_battle(BOB).unwrap();

    let mut custom = settings();
    custom.battle_round_delay = Duration::from_millis(500);
    let mut h = harness_with(default_registry(), custom);
    h.bot = h.bot.with_pets(game);
    h.bot.start().unwrap();
    h.source
        .state
        .lock()
        .unwrap()
        .names
        .insert(ALICE.to_string(), "alice".to_string());
    h.source.clear_sent();

    let before = h.clock.elapsed();
    h.bot.handle_event(chat_event(ALICE, "alice", "开始战斗"));

    assert_eq!(h.clock.elapsed() - before, Duration::from_secs(1));
    let sent = h.source.sent();
    assert!(sent.contains(&"[b]橘宝出招".to_string()));
    assert!(sent.contains(&"[b]黑宝出招".to_string()));
    assert_eq!(
        sent.last().unwrap(),
        "[b][color=green]最终赢家为：alice[/color][/b]"
    );
    assert!(h.bot.pets().unwrap().battle_queue().is_empty());
}
