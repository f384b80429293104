//! Lecture et playlist courante

use mewsource::{CURRENT_LIST_ID, Track};
use tracing::info;

use crate::errors::{BotError, Result};
use crate::handlers::{SEARCHING, arg, digits_only, play_now, search_first, singers, split_keys};
use crate::orchestrator::Orchestrator;
use crate::session::Sender;

/// Lance `track` puis l'insère à la position courante
pub(crate) fn play_track(bot: &mut Orchestrator, track: Track) -> Result<()> {
    info!(track = %track.name, id = %track.id, "Play");
    let link = bot.catalog()?.stream_link(&track.id)?;
    bot.player().play(&link)?;
    let msg = format!("！！开始播放来自{}的{}", singers(&track), track.name);
    bot.catalog()?.current_insert(track)?;
    bot.success(&msg)
}

pub(crate) fn add_track(bot: &mut Orchestrator, list_id: &str, track: Track) -> Result<()> {
    info!(track = %track.name, list = %list_id, "Add");
    let msg = format!("！！添加{}的{}到歌单。", singers(&track), track.name);
    bot.catalog()?.list_add(list_id, vec![track])?;
    bot.success(&msg)
}

/// Recherche par identifiant ; annonce l'absence de résultat
pub(crate) fn track_by_id(bot: &mut Orchestrator, raw_id: &str) -> Result<Option<Track>> {
    let id = digits_only(raw_id);
    let found = bot.catalog()?.tracks(&[id])?.into_iter().next();
    if found.is_none() {
        bot.info("没有找到对应ID的歌曲。")?;
    }
    Ok(found)
}

fn parse_position(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n >= 1).map(|n| n - 1)
}

pub fn play(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let query = arg(args, 0);
    if query.is_empty() {
        bot.player().resume()?;
        return Ok(());
    }
    bot.info(SEARCHING)?;
    if let Some(track) = search_first(bot, query)? {
        play_track(bot, track)?;
    }
    Ok(())
}

pub fn resume(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    bot.player().resume()?;
    Ok(())
}

pub fn play_id(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let raw = arg(args, 0);
    if raw.is_empty() {
        return bot.warning("请跟上ID。");
    }
    bot.info(SEARCHING)?;
    if let Some(track) = track_by_id(bot, raw)? {
        play_track(bot, track)?;
    }
    Ok(())
}

pub fn add(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let keys = arg(args, 0);
    if keys.is_empty() {
        bot.player().resume()?;
        return Ok(());
    }
    bot.info(SEARCHING)?;
    for key in split_keys(keys) {
        match search_first(bot, key)? {
            Some(track) => add_track(bot, CURRENT_LIST_ID, track)?,
            None => break,
        }
    }
    Ok(())
}

pub fn add_id(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let keys = arg(args, 0);
    if keys.is_empty() {
        return bot.warning("请跟上ID。");
    }
    bot.info(SEARCHING)?;
    for key in split_keys(keys) {
        if let Some(track) = track_by_id(bot, key)? {
            add_track(bot, CURRENT_LIST_ID, track)?;
        }
    }
    Ok(())
}

pub fn search(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let query = arg(args, 0);
    if query.is_empty() {
        return Ok(());
    }
    let limit = match args.get(1) {
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) => n,
            Err(_) => return bot.error("请输入正确的数字。"),
        },
        None => 10,
    };
    bot.info(SEARCHING)?;

    let tracks = bot.catalog()?.search(query, limit)?;
    if tracks.is_empty() {
        // search_first refait la recherche puis propose les suggestions
        search_first(bot, query)?;
        return Ok(());
    }
    let mut lines = vec!["搜索到的结果如下内：".to_string()];
    for track in &tracks {
        let mut line = format!("ID：{}\t歌名：{}\t歌手：{}", track.id, track.name, singers(track));
        if let Some(album) = &track.album {
            line.push_str(&format!("\t专辑：{}", album.name));
        }
        lines.push(line);
    }
    bot.info(&format!("[b]{}[/b]", lines.join("\n")))
}

pub fn pause(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    bot.player().pause()?;
    Ok(())
}

pub fn next(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    bot.catalog()?.next()?;
    play_now(bot)?;
    bot.success("切换到歌单下一首。")
}

pub fn previous(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    bot.catalog()?.previous()?;
    play_now(bot)?;
    bot.success("切换到歌单上一首。")
}

pub fn jump(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let raw = arg(args, 0);
    if raw.is_empty() {
        return Ok(());
    }
    let Some(index) = parse_position(raw) else {
        return bot.info("？跳转[索引]");
    };
    bot.catalog()?.jump(index)?;
    play_now(bot)?;
    bot.success(&format!("跳转到歌单第{}首。", index + 1))
}

pub fn volume(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let raw = arg(args, 0);
    if raw.is_empty() {
        let current = bot.player().volume()?;
        return bot.success(&format!("当前音量为：{}", current));
    }
    let Ok(value) = raw.trim().parse::<u32>() else {
        return bot.info("？音量 [大小]");
    };
    bot.player().set_volume(value)?;
    bot.success(&format!("成功调节音量：{}", value))
}

pub fn clear(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    let timeout = bot.settings().confirm_timeout;
    if !bot.confirm(sender, "你确定要清空当前歌单吗？", timeout)? {
        return bot.info("好的呢~");
    }
    bot.catalog()?
        .clear_current()
        .map_err(|_| BotError::rejected("清空歌单失败。"))?;
    bot.player().clear()?;
    bot.success("已为您清空歌单。")
}

pub fn remove_item_current(bot: &mut Orchestrator, _sender: &Sender, args: &[String]) -> Result<()> {
    let raw = arg(args, 0);
    if raw.is_empty() {
        return bot.info("请输入歌曲序号。");
    }
    let Some(index) = parse_position(raw) else {
        return bot.error("参数不正确。");
    };
    let catalog = bot.catalog()?;
    let playing = catalog.cursor() == Some(index);
    catalog.current_remove(index)?;
    bot.success("删除成功！")?;
    if playing {
        bot.player().stop()?;
    }
    Ok(())
}

pub fn shuffle(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    bot.catalog()?.shuffle()?;
    bot.success("已打乱当前歌单。")
}
