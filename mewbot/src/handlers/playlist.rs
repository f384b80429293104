//! Playlists nommées

use mewsource::CURRENT_LIST_ID;

use crate::errors::{BotError, Result};
use crate::handlers::music::{add_track, track_by_id};
use crate::handlers::{SEARCHING, arg, play_now, search_first, split_keys};
use crate::orchestrator::Orchestrator;
use crate::session::Sender;

fn require_list_id(bot: &mut Orchestrator, args: &[String]) -> Result<Option<String>> {
    let list_id = arg(args, 0);
    if list_id.is_empty() {
        bot.info("请输入歌单ID。")?;
        return Ok(None);
    }
    Ok(Some(list_id.to_string()))
}

/// Vérifie `歌单ID 内容` et l'existence de la playlist
fn list_and_keys(bot: &mut Orchestrator, args: &[String]) -> Result<Option<(String, String)>> {
    let Some(list_id) = require_list_id(bot, args)? else {
        return Ok(None);
    };
    let keys = arg(args, 1);
    if keys.is_empty() {
        bot.info("请输入歌曲名")?;
        return Ok(None);
    }
    if !bot.catalog()?.list_exists(&list_id) {
        return Err(BotError::not_found("未找到歌单。"));
    }
    Ok(Some((list_id, keys.to_string())))
}

pub fn remove_item_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some(list_id) = require_list_id(bot, args)? else {
        return Ok(());
    };
    let raw = arg(args, 1);
    if raw.is_empty() {
        return bot.info("请输入歌曲序号。");
    }
    let index = match raw.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n - 1,
        _ => return bot.error("参数不正确。"),
    };
    bot.catalog()?.list_remove(&list_id, index)?;
    bot.success("删除成功！")
}

pub fn add_item_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some((list_id, keys)) = list_and_keys(bot, args)? else {
        return Ok(());
    };
    bot.info(SEARCHING)?;
    for key in split_keys(&keys) {
        match search_first(bot, key)? {
            Some(track) => add_track(bot, &list_id, track)?,
            None => break,
        }
    }
    Ok(())
}

pub fn add_id_item_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some((list_id, keys)) = list_and_keys(bot, args)? else {
        return Ok(());
    };
    bot.info(SEARCHING)?;
    for key in split_keys(&keys) {
        if let Some(track) = track_by_id(bot, key)? {
            add_track(bot, &list_id, track)?;
        }
    }
    Ok(())
}

pub fn show_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let requested = arg(args, 0);
    let catalog = bot.catalog()?;
    let (title, playlist, now) = if requested.is_empty() {
        ("当前".to_string(), catalog.current_show(), catalog.cursor())
    } else {
        let playlist = catalog
            .list_show(requested)
            .map_err(|_| BotError::not_found("未找到歌单ID请重试。"))?;
        (requested.to_string(), playlist, None)
    };

    let count = playlist.len();
    let width = count.to_string().len();
    let mut text = format!("[b][color=blue]{}歌单 共{}首歌[/color]\n", title, count);
    for (index, track) in playlist.tracks.iter().enumerate() {
        let mut line = format!(
            "[{:0width$}]\tID：{:-<9}  {}  {}",
            index + 1,
            track.id,
            track.name,
            track.artist_names("，"),
            width = width
        );
        if now == Some(index) {
            line = format!("[color=green]{} <==正在播放 [/color]", line);
        }
        text.push_str(&line);
        text.push('\n');
    }
    bot.send(&text)
}

pub fn list_list(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    let lists = bot.catalog()?.list_list()?;
    let mut text = "[b][color=blue]所有歌单[/color][/b]\n".to_string();
    for playlist in &lists {
        text.push_str(&format!("[b]ID：{}\t歌曲数量：{}[/b]\n", playlist.id, playlist.len()));
    }
    bot.send(&text)
}

pub fn play_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some(list_id) = require_list_id(bot, args)? else {
        return Ok(());
    };
    bot.catalog()?.play_list(&list_id)?;
    play_now(bot)?;
    bot.success(&format!("！！开始播放歌单ID：{}", list_id))
}

pub fn delete_list(bot: &mut Orchestrator, sender: &Sender, args: &[String]) -> Result<()> {
    let Some(list_id) = require_list_id(bot, args)? else {
        return Ok(());
    };
    let timeout = bot.settings().confirm_timeout;
    if !bot.confirm(sender, "你确定要删除该歌单吗？", timeout)? {
        return bot.info("好的呢~");
    }
    bot.catalog()?.list_delete(&list_id)?;
    bot.success("已为您删除歌单。")
}

pub fn create_list(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let Some(list_id) = require_list_id(bot, args)? else {
        return Ok(());
    };
    bot.catalog()?.list_create(&list_id)?;
    bot.success(&format!("成功创建歌单{}。", list_id))
}

pub fn save_current_list(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    let timeout = bot.settings().ask_timeout;
    let list_id = bot.ask(sender, "请输入要保存为的歌单名", timeout)?;
    if list_id.is_empty() {
        return Ok(());
    }
    let catalog = bot.catalog()?;
    catalog.list_create(&list_id)?;
    catalog.list_copy(CURRENT_LIST_ID, &list_id)?;
    bot.success(&format!("成功保存当前歌单到{}歌单", list_id))?;
    list_list(bot, sender, &[])
}
