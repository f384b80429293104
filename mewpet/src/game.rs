//! État du jeu : un animal par propriétaire, une file de combat

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::{PetError, Result};
use crate::model::{FeedOutcome, Pet, Skill};
use crate::oracle::PetOracle;

/// Issue d'un combat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    /// Propriétaire de l'animal gagnant
    pub winner: String,
    pub rounds: Vec<String>,
}

#[derive(Debug)]
pub struct PetGame {
    pets: BTreeMap<String, Pet>,
    battle_queue: Vec<String>,
    store: Option<PathBuf>,
    oracle: Box<dyn PetOracle>,
}

impl PetGame {
    pub fn in_memory(oracle: Box<dyn PetOracle>) -> Self {
        Self {
            pets: BTreeMap::new(),
            battle_queue: Vec::new(),
            store: None,
            oracle,
        }
    }

    /// Charge les animaux depuis `path` (absent = aucun animal)
    pub fn open(path: impl AsRef<Path>, oracle: Box<dyn PetOracle>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let pets = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)
                .map_err(|e| PetError::Persistence(format!("{}: {}", path.display(), e)))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            pets,
            battle_queue: Vec::new(),
            store: Some(path),
            oracle,
        })
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.pets)
            .map_err(|e| PetError::Persistence(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save pets");
        }
    }

    fn pet_mut(&mut self, owner: &str) -> Result<&mut Pet> {
        self.pets
            .get_mut(owner)
            .ok_or_else(|| PetError::NoPet(owner.to_string()))
    }

    pub fn has_pet(&self, owner: &str) -> bool {
        self.pets.contains_key(owner)
    }

    pub fn pet(&self, owner: &str) -> Result<&Pet> {
        self.pets
            .get(owner)
            .ok_or_else(|| PetError::NoPet(owner.to_string()))
    }

    pub fn pets(&self) -> impl Iterator<Item = &Pet> {
        self.pets.values()
    }

    /// Crée (ou remplace) l'animal de `owner` à partir d'une description libre
    pub fn adopt(&mut self, owner: &str, description: &str, now: DateTime<Utc>) -> Result<&Pet> {
        let draft = self.oracle.generate_pet(description)?;
        let pet = Pet::from_draft(owner, draft, now);
        info!(owner = %owner, name = %pet.name, "New pet");
        self.battle_queue.retain(|o| o != owner);
        self.pets.insert(owner.to_string(), pet);
        self.persist();
        self.pet(owner)
    }

    pub fn release(&mut self, owner: &str) -> Result<Pet> {
        let pet = self
            .pets
            .remove(owner)
            .ok_or_else(|| PetError::NoPet(owner.to_string()))?;
        self.battle_queue.retain(|o| o != owner);
        self.persist();
        Ok(pet)
    }

    pub fn feed(&mut self, owner: &str, now: DateTime<Utc>) -> Result<FeedOutcome> {
        let outcome = self.pet_mut(owner)?.feed(now);
        self.persist();
        Ok(outcome)
    }

    /// Pointage quotidien : une ration de plus, renvoie le stock
    pub fn checkin(&mut self, owner: &str) -> Result<u32> {
        let pet = self.pet_mut(owner)?;
        pet.food_amount += 1;
        let food = pet.food_amount;
        self.persist();
        Ok(food)
    }

    pub fn is_upgradable(&self, owner: &str) -> Result<bool> {
        Ok(self.pet(owner)?.is_upgradable())
    }

    /// Dépense une amélioration en générant une compétence décrite par le joueur
    pub fn upgrade(&mut self, owner: &str, description: &str) -> Result<Skill> {
        let pet = self.pet(owner)?;
        if !pet.is_upgradable() {
            return Err(PetError::NotUpgradable(owner.to_string()));
        }
        let skill = self.oracle.generate_skill(pet, description)?;
        self.pet_mut(owner)?.upgrade(skill.clone());
        self.persist();
        Ok(skill)
    }

    /// Inscrit l'animal au prochain combat ; `false` s'il l'était déjà
    pub fn join_battle(&mut self, owner: &str) -> Result<bool> {
        self.pet(owner)?;
        if self.battle_queue.iter().any(|o| o == owner) {
            return Ok(false);
        }
        self.battle_queue.push(owner.to_string());
        Ok(true)
    }

    pub fn battle_queue(&self) -> Vec<&Pet> {
        self.battle_queue
            .iter()
            .filter_map(|owner| self.pets.get(owner))
            .collect()
    }

    /// Fait combattre la file ; elle est vidée si le combat a pu être généré
    pub fn battle(&mut self) -> Result<BattleReport> {
        let fighters: Vec<Pet> = self.battle_queue().into_iter().cloned().collect();
        if fighters.len() < 2 {
            return Err(PetError::NotEnoughFighters);
        }
        let narration = self.oracle.narrate_battle(&fighters)?;
        let winner = fighters[narration.winner_index].owner.clone();
        self.battle_queue.clear();
        info!(winner = %winner, rounds = narration.rounds.len(), "Battle over");
        Ok(BattleReport {
            winner,
            rounds: narration.rounds,
        })
    }
}
