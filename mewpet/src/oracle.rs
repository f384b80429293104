//! Génération du contenu du jeu par un modèle de langage

use std::fmt::Debug;

use lazy_static::lazy_static;
use mewagent::{Completion, Message};
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PetError, Result};
use crate::model::{Pet, PetDraft, Skill};

lazy_static! {
    static ref WINNER: Regex = Regex::new(r"\[(\d+)\]").expect("valid winner regex");
}

const PET_PROMPT: &str = r#"请参考用户的输入，生成指定属性的宠物json，对于用户没有给出的请推理思考产生。请严格按照以下格式返回结果
{
    "name": "示例姓名",
    "species": "示例种族",
    "description": "示例描述",
    "health": 生命值(int),
    "height": 身高(int 单位cm),
    "weight": 体重(int 单位kg)
}"#;

const SKILL_PROMPT: &str = r#"请参考用户的输入和宠物基本信息，生成指定的技能，对于用户没有给出的请推理思考产生。请严格按照以下格式返回结果
{
    "name": "技能名称",
    "type": "技能种类",
    "capability": 技能强度(int),
    "description": "技能描述(小于20个字)"
}"#;

const BATTLE_PROMPT: &str = "请模拟这些宠物回合制战斗，每回合描述以|分隔，回合数不大于12。请尽量让战斗过程曲折离奇包含战斗数值，最后一回合仅以[x]表示最终赢家（比如[1]表示宠物1获胜）。
请严格按照以下格式输出：
回合描述|回合描述|回合描述|回合描述|回合描述|[index]";

/// Résultat d'un combat : index du gagnant dans la file et récit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleNarration {
    pub winner_index: usize,
    pub rounds: Vec<String>,
}

/// Source du contenu généré (animaux, compétences, combats)
pub trait PetOracle: Debug + Send {
    fn generate_pet(&self, description: &str) -> Result<PetDraft>;

    fn generate_skill(&self, pet: &Pet, description: &str) -> Result<Skill>;

    fn narrate_battle(&self, fighters: &[Pet]) -> Result<BattleNarration>;
}

/// Extrait l'objet JSON d'une réponse (le modèle l'entoure parfois de texte)
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => return Err(PetError::Generation(format!("no JSON object in: {}", reply))),
    };
    serde_json::from_str(json).map_err(|e| PetError::Generation(e.to_string()))
}

/// Découpe `round|round|...|[n]` en rounds et index du gagnant
pub fn parse_battle(reply: &str, fighters: usize) -> Result<BattleNarration> {
    let winner_index: usize = WINNER
        .captures(reply)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| PetError::Generation(format!("no winner in: {}", reply)))?;
    if winner_index >= fighters {
        return Err(PetError::Generation(format!(
            "winner {} out of {} fighters",
            winner_index, fighters
        )));
    }

    let mut parts: Vec<&str> = reply.split('|').collect();
    parts.pop();
    let rounds = parts
        .into_iter()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect();
    Ok(BattleNarration {
        winner_index,
        rounds,
    })
}

/// Oracle adossé à un modèle de chat
#[derive(Debug)]
pub struct AgentOracle {
    completion: Box<dyn Completion>,
}

impl AgentOracle {
    pub fn new(completion: Box<dyn Completion>) -> Self {
        Self { completion }
    }

    fn ask(&self, messages: Vec<Message>) -> Result<String> {
        let reply = self.completion.complete(&messages)?;
        debug!(chars = reply.chars().count(), "Pet oracle reply");
        Ok(reply)
    }
}

fn pet_json(pet: &Pet) -> String {
    serde_json::to_string(pet).unwrap_or_default()
}

impl PetOracle for AgentOracle {
    fn generate_pet(&self, description: &str) -> Result<PetDraft> {
        let reply = self.ask(vec![Message::system(PET_PROMPT), Message::user(description)])?;
        parse_json_reply(&reply)
    }

    fn generate_skill(&self, pet: &Pet, description: &str) -> Result<Skill> {
        let reply = self.ask(vec![
            Message::system(format!("宠物的json格式基本信息如下{}", pet_json(pet))),
            Message::system(SKILL_PROMPT),
            Message::user(description),
        ])?;
        parse_json_reply(&reply)
    }

    fn narrate_battle(&self, fighters: &[Pet]) -> Result<BattleNarration> {
        let roster: String = fighters
            .iter()
            .enumerate()
            .map(|(i, pet)| format!("第{}只宠物（index: {}）：{}\n\n", i, i, pet_json(pet)))
            .collect();
        let reply = self.ask(vec![Message::system(roster), Message::system(BATTLE_PROMPT)])?;
        parse_battle(&reply, fighters.len())
    }
}
