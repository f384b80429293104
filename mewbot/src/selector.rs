//! # Backend Selector
//!
//! Registre des interfaces musicales ([`CatalogBackend`]) et élection de
//! l'interface active : priorité décroissante, puis ordre d'enregistrement,
//! première interface disponible.

use mewsource::CatalogBackend;
use tracing::{debug, info, warn};

use crate::errors::{BotError, Result};

/// Priorité par défaut d'une interface
pub const DEFAULT_PRIORITY: i32 = 100;

/// Une interface enregistrée
#[derive(Debug)]
pub struct BackendDescriptor {
    pub id: String,
    pub handle: Box<dyn CatalogBackend>,
    pub priority: i32,
    /// Mis à jour uniquement par [`BackendSelector::probe_all`]
    pub available: bool,
}

/// Changement d'interface active
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSwitch {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Default)]
pub struct BackendSelector {
    backends: Vec<BackendDescriptor>,
    active: Option<String>,
}

impl BackendSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre une interface ; un id déjà connu est remplacé sur place
    /// (même rang, disponibilité à re-sonder). L'id actif est conservé :
    /// la prochaine élection annonce le vrai changement.
    pub fn register(&mut self, id: &str, handle: Box<dyn CatalogBackend>, priority: i32) {
        info!(id = %id, kind = %handle.kind(), priority, "Register music api");
        match self.backends.iter_mut().find(|b| b.id == id) {
            Some(existing) => {
                existing.handle = handle;
                existing.priority = priority;
                existing.available = false;
            }
            None => self.backends.push(BackendDescriptor {
                id: id.to_string(),
                handle,
                priority,
                available: false,
            }),
        }
    }

    /// Sonde toutes les interfaces
    pub fn probe_all(&mut self) {
        for backend in &mut self.backends {
            backend.available = backend.handle.available();
            debug!(id = %backend.id, available = backend.available, "Music api probed");
        }
    }

    /// Active la meilleure interface disponible.
    ///
    /// Renvoie le changement s'il y en a un ; sans interface disponible
    /// l'interface active devient vide.
    pub fn elect(&mut self) -> Option<BackendSwitch> {
        let winner = self
            .ranked()
            .into_iter()
            .find(|b| b.available)
            .map(|b| b.id.clone());
        if winner == self.active {
            return None;
        }
        let switch = BackendSwitch {
            from: self.active.take(),
            to: winner.clone(),
        };
        match &winner {
            Some(id) => info!(id = %id, "Api switched"),
            None => warn!("No music api available"),
        }
        self.active = winner;
        Some(switch)
    }

    /// Interfaces par priorité décroissante (tri stable : l'ordre
    /// d'enregistrement départage)
    pub fn ranked(&self) -> Vec<&BackendDescriptor> {
        let mut ranked: Vec<&BackendDescriptor> = self.backends.iter().collect();
        ranked.sort_by(|a, b| b.priority.cmp(&a.priority));
        ranked
    }

    pub fn set_priority(&mut self, id: &str, priority: i32) -> Result<()> {
        let backend = self
            .backends
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BotError::not_found("未找到对应接口。"))?;
        info!(id = %id, from = backend.priority, to = priority, "Music api priority changed");
        backend.priority = priority;
        Ok(())
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&dyn CatalogBackend> {
        let id = self.active.as_deref()?;
        self.backends
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.handle.as_ref())
    }

    pub fn active_mut(&mut self) -> Option<&mut dyn CatalogBackend> {
        let id = self.active.clone()?;
        self.backends
            .iter_mut()
            .find(|b| b.id == id)
            .map(|b| b.handle.as_mut() as &mut dyn CatalogBackend)
    }

    pub fn get(&self, id: &str) -> Option<&BackendDescriptor> {
        self.backends.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
