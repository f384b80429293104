//! Données d'un animal de compagnie

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Délai minimal entre deux repas
pub const FEED_COOLDOWN_MS: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capability: i64,
    pub description: String,
}

impl Skill {
    pub fn starter() -> Self {
        Self {
            name: "小拳拳".to_string(),
            kind: "攻击".to_string(),
            capability: 1,
            description: "初始技能".to_string(),
        }
    }
}

/// Caractéristiques proposées par le modèle pour un nouvel animal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetDraft {
    pub name: String,
    pub species: String,
    pub description: String,
    pub health: i64,
    pub height: i64,
    pub weight: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    NoFood,
    Full,
    LevelUp,
    Fed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub owner: String,
    pub name: String,
    pub species: String,
    pub description: String,
    pub health: i64,
    pub height: i64,
    pub weight: i64,
    pub level: u32,
    pub upgrade_times: u32,
    pub food_amount: u32,
    pub feed_times: u32,
    pub last_feed: DateTime<Utc>,
    pub skills: Vec<Skill>,
}

impl Pet {
    pub fn from_draft(owner: &str, draft: PetDraft, now: DateTime<Utc>) -> Self {
        Self {
            owner: owner.to_string(),
            name: draft.name,
            species: draft.species,
            description: draft.description,
            health: draft.health,
            height: draft.height,
            weight: draft.weight,
            level: 0,
            upgrade_times: 0,
            food_amount: 0,
            feed_times: 0,
            last_feed: now,
            skills: vec![Skill::starter()],
        }
    }

    /// Nourrit l'animal ; un palier atteint donne une amélioration à dépenser
    pub fn feed(&mut self, now: DateTime<Utc>) -> FeedOutcome {
        if self.food_amount == 0 {
            return FeedOutcome::NoFood;
        }
        if now - self.last_feed < Duration::milliseconds(FEED_COOLDOWN_MS) {
            return FeedOutcome::Full;
        }
        self.food_amount -= 1;
        self.feed_times += 1;
        self.last_feed = now;
        if self.feed_times >= self.level + 1 {
            self.upgrade_times += 1;
            self.feed_times = 0;
            return FeedOutcome::LevelUp;
        }
        FeedOutcome::Fed
    }

    pub fn is_upgradable(&self) -> bool {
        self.upgrade_times > 0
    }

    /// Dépense une amélioration : un niveau et une compétence de plus
    pub fn upgrade(&mut self, skill: Skill) -> bool {
        if !self.is_upgradable() {
            return false;
        }
        self.level += 1;
        self.upgrade_times -= 1;
        self.skills.push(skill);
        true
    }

    /// Repas restants avant la prochaine amélioration
    pub fn feeds_to_next_level(&self) -> u32 {
        (self.level + 1).saturating_sub(self.feed_times)
    }
}
