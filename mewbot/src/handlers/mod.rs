//! Handlers des commandes de chat
//!
//! Tous ont la signature [`Handler`] ; une erreur renvoyée est affichée en
//! rouge dans le chat par l'orchestrateur.

pub mod backend;
pub mod broadcast;
pub mod chat;
pub mod help;
pub mod music;
pub mod pet;
pub mod playlist;

use lazy_static::lazy_static;
use mewsource::Track;
use regex::Regex;

use crate::errors::Result;
use crate::orchestrator::{Handler, HandlerTable, Orchestrator};

lazy_static! {
    static ref NON_DIGIT: Regex = Regex::new(r"\D").expect("valid non-digit regex");
}

pub const SEARCHING: &str = "正在搜索中....";

/// Argument `i`, vide s'il est absent
pub(crate) fn arg(args: &[String], i: usize) -> &str {
    args.get(i).map(String::as_str).unwrap_or("")
}

/// Clés multiples séparées par `,` ou `，`
pub(crate) fn split_keys(keys: &str) -> Vec<&str> {
    keys.split([',', '，']).collect()
}

/// Ne garde que les chiffres d'un identifiant saisi
pub(crate) fn digits_only(id: &str) -> String {
    NON_DIGIT.replace_all(id, "").into_owned()
}

pub(crate) fn singers(track: &Track) -> String {
    track.artist_names(" ")
}

/// Cherche le premier résultat pour `key` ; sans résultat les suggestions
/// sont proposées et `None` est renvoyé.
pub(crate) fn search_first(bot: &mut Orchestrator, key: &str) -> Result<Option<Track>> {
    let catalog = bot.catalog()?;
    if let Some(track) = catalog.search(key, 1)?.into_iter().next() {
        return Ok(Some(track));
    }
    let suggestions = catalog.suggest(key)?;
    if suggestions.is_empty() {
        bot.info("没有找到你想要的歌曲。")?;
    } else {
        bot.info(&format!(
            "没有搜到{}哦，建议你搜搜[b]{}[/b]",
            key,
            suggestions.join("，")
        ))?;
    }
    Ok(None)
}

/// Lance l'entrée courante de l'interface active sur le lecteur
pub(crate) fn play_now(bot: &mut Orchestrator) -> Result<()> {
    let catalog = bot.catalog()?;
    let track = catalog.now()?;
    let link = catalog.stream_link(&track.id)?;
    bot.player().play(&link)?;
    Ok(())
}

/// Table de tous les handlers connus
pub fn default_handlers() -> HandlerTable {
    let table: [(&str, Handler); 38] = [
        ("play_id", music::play_id),
        ("add_id", music::add_id),
        ("play", music::play),
        ("help", help::help),
        ("chat", chat::chat),
        ("search", music::search),
        ("pause", music::pause),
        ("jump", music::jump),
        ("volume", music::volume),
        ("clear", music::clear),
        ("next", music::next),
        ("previous", music::previous),
        ("add", music::add),
        ("remove_item_current", music::remove_item_current),
        ("shuffle", music::shuffle),
        ("remove_item_list", playlist::remove_item_list),
        ("add_id_item_list", playlist::add_id_item_list),
        ("add_item_list", playlist::add_item_list),
        ("show_list", playlist::show_list),
        ("list_list", playlist::list_list),
        ("play_list", playlist::play_list),
        ("delete_list", playlist::delete_list),
        ("create_list", playlist::create_list),
        ("save_current_list", playlist::save_current_list),
        ("pet_new", pet::pet_new),
        ("pet_upgrade", pet::pet_upgrade),
        ("pet_show", pet::pet_show),
        ("pet_delete", pet::pet_delete),
        ("pet_feed", pet::pet_feed),
        ("pet_battle_add", pet::pet_battle_add),
        ("pet_battle_list", pet::pet_battle_list),
        ("pet_battle_start", pet::pet_battle_start),
        ("checkin", pet::checkin),
        ("broadcast", broadcast::broadcast),
        ("update_apis", backend::update_apis),
        ("show_apis", backend::show_apis),
        ("set_priority", backend::set_priority),
        ("resume", music::resume),
    ];
    table
        .into_iter()
        .map(|(name, handler)| (name.to_string(), handler))
        .collect()
}
