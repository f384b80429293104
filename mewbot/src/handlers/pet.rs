//! Mini-jeu des animaux

use chrono::Utc;
use mewpet::FeedOutcome;
use tracing::debug;

use crate::errors::{BotError, Result};
use crate::orchestrator::Orchestrator;
use crate::session::Sender;

/// Annonce l'absence d'animal ; `false` si `sender` n'en a pas
fn ensure_pet(bot: &mut Orchestrator, sender: &Sender) -> Result<bool> {
    if bot.pets_mut()?.has_pet(&sender.stable_uid) {
        return Ok(true);
    }
    bot.info("你还没有宠物呢。")?;
    Ok(false)
}

/// Nom affiché d'un utilisateur, son uid s'il est introuvable
fn display_name(bot: &mut Orchestrator, uid: &str) -> String {
    match bot.source.resolve_identity(uid) {
        Ok(Some(name)) => name,
        Ok(None) => uid.to_string(),
        Err(e) => {
            debug!(uid = %uid, error = %e, "Cannot resolve identity");
            uid.to_string()
        }
    }
}

pub fn pet_new(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    let owned = bot.pets_mut()?.has_pet(&sender.stable_uid);
    if owned {
        let timeout = bot.settings().confirm_timeout;
        if !bot.confirm(sender, "每个人只能创建一只宠物哦，是否要覆盖掉当前宠物？", timeout)? {
            return bot.info("好的呢");
        }
    }
    let timeout = bot.settings().pet_prompt_timeout;
    let description = bot.ask(sender, "请输入宠物描述（15秒内）", timeout)?;
    if description.is_empty() {
        return Ok(());
    }
    bot.info("生成中....")?;
    let name = bot
        .pets_mut()?
        .adopt(&sender.stable_uid, &description, Utc::now())
        .map(|pet| pet.name.clone())
        .map_err(|e| {
            debug!(error = %e, "Pet generation failed");
            BotError::rejected("创建宠物失败，请重试。")
        })?;
    bot.success(&format!(
        "创建宠物成功！恭喜{}拥有了一只{}。",
        sender.display_name, name
    ))
}

pub fn pet_upgrade(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    if !bot.pets_mut()?.is_upgradable(&sender.stable_uid)? {
        return bot.info("你的宠物目前还不能升级呢。");
    }
    let timeout = bot.settings().pet_prompt_timeout;
    let description = bot.ask(sender, "请输入技能描述（15秒内）", timeout)?;
    if description.is_empty() {
        return Ok(());
    }
    bot.info("生成技能中....")?;
    let skill = bot
        .pets_mut()?
        .upgrade(&sender.stable_uid, &description)
        .map_err(|e| {
            debug!(error = %e, "Skill generation failed");
            BotError::rejected("升级宠物失败，请重试。")
        })?;
    bot.success(&format!(
        "升级宠物成功！恭喜{}的宠物获得了新技能{}。",
        sender.display_name, skill.name
    ))
}

pub fn pet_show(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    let pet = bot.pets_mut()?.pet(&sender.stable_uid)?.clone();
    let skills: Vec<String> = pet
        .skills
        .iter()
        .map(|s| {
            format!(
                "- 技能名称：{}  技能种类：{} 技能强度：{}  技能描述：{}",
                s.name, s.kind, s.capability, s.description
            )
        })
        .collect();
    let text = format!(
        "[b][color=blue]宠物信息如下：[/color]\n\
         宠物主人：{}\n\
         宠物姓名：{}\n\
         等级：{}\n\
         身高：{}\n\
         体重：{}\n\
         种族：{}\n\
         生命值：{}\n\
         剩余升级次数：{}\n\
         库存食物：{}\n\
         上次喂食：{}\n\
         升级所需喂食次数：{}\n\
         描述：{}\n\
         技能列表：\n{}\n",
        sender.display_name,
        pet.name,
        pet.level,
        pet.height,
        pet.weight,
        pet.species,
        pet.health,
        pet.upgrade_times,
        pet.food_amount,
        pet.last_feed.format("%Y-%m-%d %H:%M"),
        pet.feeds_to_next_level(),
        pet.description,
        skills.join("\n")
    );
    bot.send(&text)
}

pub fn pet_delete(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    let timeout = bot.settings().confirm_timeout;
    if !bot.confirm(sender, "你确定要删除你的宠物吗？", timeout)? {
        return bot.info("好的呢");
    }
    bot.pets_mut()?.release(&sender.stable_uid)?;
    bot.success("删除成功。")
}

pub fn pet_feed(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    let outcome = bot.pets_mut()?.feed(&sender.stable_uid, Utc::now())?;
    match outcome {
        FeedOutcome::NoFood => bot.error("喂食失败！没有足够的食物。"),
        FeedOutcome::Full => bot.error("喂食失败！宠物还饱呢。"),
        FeedOutcome::LevelUp => bot.success("喂食成功！宠物升级！！！！！"),
        FeedOutcome::Fed => bot.success("喂食成功！"),
    }
}

pub fn checkin(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    bot.pets_mut()?.checkin(&sender.stable_uid)?;
    bot.success("签到成功，获得1食物。")
}

pub fn pet_battle_add(bot: &mut Orchestrator, sender: &Sender, _args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    if bot.pets_mut()?.join_battle(&sender.stable_uid)? {
        bot.success("宠物已成功加入战斗场。")
    } else {
        bot.info("你的宠物已经在战斗场了。")
    }
}

pub fn pet_battle_list(bot: &mut Orchestrator, _sender: &Sender, _args: &[String]) -> Result<()> {
    let waiting: Vec<(String, String)> = bot
        .pets_mut()?
        .battle_queue()
        .into_iter()
        .map(|pet| (pet.owner.clone(), pet.name.clone()))
        .collect();
    if waiting.is_empty() {
        return bot.info("当前没有宠物在等待战斗呢。");
    }
    let mut text = "[b][color=blue]当前等待战斗的宠物[/color]\n".to_string();
    for (owner, name) in waiting {
        let owner_name = display_name(bot, &owner);
        text.push_str(&format!("\t- 来自{}的{}\n", owner_name, name));
    }
    bot.send(&text)
}

pub fn pet_battle_start(bot: &mut Orchestrator, sender: &Sender, args: &[String]) -> Result<()> {
    if !ensure_pet(bot, sender)? {
        return Ok(());
    }
    if bot.pets_mut()?.battle_queue().len() < 2 {
        return pet_battle_list(bot, sender, args);
    }
    bot.info("[b]生成战斗中，请稍后")?;
    let report = bot.pets_mut()?.battle().map_err(|e| {
        debug!(error = %e, "Battle generation failed");
        BotError::rejected("生成战斗失败，请重试。")
    })?;

    bot.success("[b]战斗开始！！！！！！！！！！！！！！")?;
    let delay = bot.settings().battle_round_delay;
    for round in &report.rounds {
        if !delay.is_zero() {
            bot.clock.sleep(delay);
        }
        bot.send(&format!("[b]{}", round))?;
    }
    let winner = display_name(bot, &report.winner);
    bot.success(&format!("最终赢家为：{}", winner))
}
