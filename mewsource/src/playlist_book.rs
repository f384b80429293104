//! Playlists locales d'un backend de catalogue.
//!
//! Un `PlaylistBook` possède :
//!   - un ensemble ordonné de playlists nommées,
//!   - la playlist « current » (toujours présente) que le bot joue,
//!   - un curseur `Option<usize>` dans la playlist courante.
//!
//! Le curseur vaut `None` tant que la lecture n'a pas commencé. Les
//! playlists (mais pas le curseur) peuvent être persistées dans un
//! fichier JSON ; chaque opération qui modifie une playlist sauvegarde.

use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::model::{Playlist, Track};

/// Identifiant réservé de la playlist en cours de lecture
pub const CURRENT_LIST_ID: &str = "current";

#[derive(Debug, Clone)]
pub struct PlaylistBook {
    lists: Vec<Playlist>,
    cursor: Option<usize>,
    store: Option<PathBuf>,
}

impl Default for PlaylistBook {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaylistBook {
    /// Carnet en mémoire, avec uniquement la playlist courante vide.
    pub fn new() -> Self {
        Self {
            lists: vec![Playlist::new(CURRENT_LIST_ID)],
            cursor: None,
            store: None,
        }
    }

    /// Ouvre (ou crée) un carnet persisté dans `path`.
    ///
    /// Un fichier absent donne un carnet vide ; un fichier illisible est
    /// une erreur.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut lists: Vec<Playlist> = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)
                .map_err(|e| CatalogError::Persistence(format!("{}: {}", path.display(), e)))?
        } else {
            Vec::new()
        };

        if !lists.iter().any(|l| l.id == CURRENT_LIST_ID) {
            lists.insert(0, Playlist::new(CURRENT_LIST_ID));
        }
        debug!(path = %path.display(), count = lists.len(), "Playlists loaded");

        Ok(Self {
            lists,
            cursor: None,
            store: Some(path),
        })
    }

    /// Écrit les playlists dans le fichier associé (no-op en mémoire).
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.lists)
            .map_err(|e| CatalogError::Persistence(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save playlists");
        }
    }

    fn find(&self, list_id: &str) -> Result<&Playlist> {
        self.lists
            .iter()
            .find(|l| l.id == list_id)
            .ok_or_else(|| CatalogError::PlaylistNotFound(list_id.to_string()))
    }

    fn find_mut(&mut self, list_id: &str) -> Result<&mut Playlist> {
        self.lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| CatalogError::PlaylistNotFound(list_id.to_string()))
    }

    fn current(&self) -> &Playlist {
        // la playlist courante est créée par tous les constructeurs
        self.lists
            .iter()
            .find(|l| l.id == CURRENT_LIST_ID)
            .unwrap_or(&self.lists[0])
    }

    // ============= Playlists nommées =============

    pub fn exists(&self, list_id: &str) -> bool {
        self.lists.iter().any(|l| l.id == list_id)
    }

    pub fn create(&mut self, list_id: &str) -> Result<()> {
        if self.exists(list_id) {
            return Err(CatalogError::PlaylistExists(list_id.to_string()));
        }
        self.lists.push(Playlist::new(list_id));
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, list_id: &str) -> Result<()> {
        if list_id == CURRENT_LIST_ID {
            return Err(CatalogError::PlaylistProtected(list_id.to_string()));
        }
        let pos = self
            .lists
            .iter()
            .position(|l| l.id == list_id)
            .ok_or_else(|| CatalogError::PlaylistNotFound(list_id.to_string()))?;
        self.lists.remove(pos);
        self.persist();
        Ok(())
    }

    /// Toutes les playlists sauf la courante, dans l'ordre de création.
    pub fn list(&self) -> Result<Vec<&Playlist>> {
        let lists: Vec<&Playlist> = self
            .lists
            .iter()
            .filter(|l| l.id != CURRENT_LIST_ID)
            .collect();
        if lists.is_empty() {
            return Err(CatalogError::NoPlaylists);
        }
        Ok(lists)
    }

    pub fn show(&self, list_id: &str) -> Result<&Playlist> {
        self.find(list_id)
    }

    /// Copie `src` dans `dst` (créée ou écrasée).
    pub fn copy(&mut self, src: &str, dst: &str) -> Result<()> {
        let tracks = self.find(src)?.tracks.clone();
        match self.lists.iter().position(|l| l.id == dst) {
            Some(pos) => self.lists[pos].tracks = tracks,
            None => self.lists.push(Playlist {
                id: dst.to_string(),
                tracks,
            }),
        }
        if dst == CURRENT_LIST_ID {
            self.clamp_cursor();
        }
        self.persist();
        Ok(())
    }

    pub fn add(&mut self, list_id: &str, tracks: Vec<Track>) -> Result<()> {
        self.find_mut(list_id)?.tracks.extend(tracks);
        self.persist();
        Ok(())
    }

    /// Retire le morceau `index` (base 0) et le renvoie.
    pub fn remove(&mut self, list_id: &str, index: usize) -> Result<Track> {
        let list = self.find_mut(list_id)?;
        if index >= list.tracks.len() {
            return Err(CatalogError::IndexOutOfRange(index));
        }
        let track = list.tracks.remove(index);

        if list_id == CURRENT_LIST_ID {
            // le curseur reste sur le même morceau ; s'il est retiré,
            // il recule pour que `next` tombe sur le suivant
            self.cursor = match self.cursor {
                Some(c) if index < c => Some(c - 1),
                Some(c) if index == c => c.checked_sub(1),
                other => other,
            };
            self.clamp_cursor();
        }
        self.persist();
        Ok(track)
    }

    pub fn insert(&mut self, list_id: &str, index: usize, track: Track) -> Result<()> {
        let list = self.find_mut(list_id)?;
        if index > list.tracks.len() {
            return Err(CatalogError::IndexOutOfRange(index));
        }
        list.tracks.insert(index, track);
        self.persist();
        Ok(())
    }

    pub fn clear(&mut self, list_id: &str) -> Result<()> {
        self.find_mut(list_id)?.tracks.clear();
        if list_id == CURRENT_LIST_ID {
            self.cursor = None;
        }
        self.persist();
        Ok(())
    }

    pub fn is_empty(&self, list_id: &str) -> Result<bool> {
        Ok(self.find(list_id)?.is_empty())
    }

    // ============= Playlist courante et curseur =============

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn current_list(&self) -> &Playlist {
        self.current()
    }

    fn clamp_cursor(&mut self) {
        let len = self.current().len();
        self.cursor = match self.cursor {
            _ if len == 0 => None,
            Some(c) if c >= len => Some(len - 1),
            other => other,
        };
    }

    fn current_len(&self) -> Result<usize> {
        match self.current().len() {
            0 => Err(CatalogError::EmptyPlaylist),
            n => Ok(n),
        }
    }

    /// Avance le curseur (avec bouclage) et renvoie le nouveau morceau.
    pub fn next(&mut self) -> Result<Track> {
        let len = self.current_len()?;
        self.cursor = Some(match self.cursor {
            None => 0,
            Some(c) => (c + 1) % len,
        });
        self.now()
    }

    /// Recule le curseur (avec bouclage) et renvoie le nouveau morceau.
    pub fn previous(&mut self) -> Result<Track> {
        let len = self.current_len()?;
        self.cursor = Some(match self.cursor {
            None | Some(0) => len - 1,
            Some(c) => c - 1,
        });
        self.now()
    }

    pub fn jump(&mut self, index: usize) -> Result<Track> {
        let len = self.current_len()?;
        if index >= len {
            return Err(CatalogError::IndexOutOfRange(index));
        }
        self.cursor = Some(index);
        self.now()
    }

    /// Morceau sous le curseur.
    pub fn now(&self) -> Result<Track> {
        let list = self.current();
        if list.is_empty() {
            return Err(CatalogError::EmptyPlaylist);
        }
        let index = self.cursor.ok_or(CatalogError::NotStarted)?;
        list.tracks
            .get(index)
            .cloned()
            .ok_or(CatalogError::IndexOutOfRange(index))
    }

    /// Insère `track` à la position du curseur et le rend courant.
    pub fn current_insert(&mut self, track: Track) -> Result<()> {
        let index = self.cursor.unwrap_or(0);
        self.insert(CURRENT_LIST_ID, index, track)?;
        self.cursor = Some(index);
        Ok(())
    }

    pub fn current_add(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.add(CURRENT_LIST_ID, tracks)
    }

    pub fn current_remove(&mut self, index: usize) -> Result<Track> {
        self.remove(CURRENT_LIST_ID, index)
    }

    pub fn clear_current(&mut self) -> Result<()> {
        self.clear(CURRENT_LIST_ID)
    }

    /// Remplace la playlist courante par `list_id` et place le curseur au début.
    pub fn play_list(&mut self, list_id: &str) -> Result<Track> {
        self.copy(list_id, CURRENT_LIST_ID)?;
        self.current_len()?;
        self.cursor = Some(0);
        self.now()
    }

    /// Mélange la playlist courante ; le curseur garde sa position.
    pub fn shuffle(&mut self) -> Result<()> {
        self.current_len()?;
        let mut rng = rand::rng();
        if let Ok(list) = self.find_mut(CURRENT_LIST_ID) {
            list.tracks.shuffle(&mut rng);
        }
        self.persist();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(id, format!("song {}", id)).with_artist("1", "artist")
    }

    fn book_with(ids: &[&str]) -> PlaylistBook {
        let mut book = PlaylistBook::new();
        book.current_add(ids.iter().map(|id| track(id)).collect())
            .unwrap();
        assert_eq!(book.cursor(), None);
        book
    }

    #[test]
    fn test_current_always_exists() {
        let book = PlaylistBook::new();
        assert!(book.exists(CURRENT_LIST_ID));
        assert!(matches!(book.list(), Err(CatalogError::NoPlaylists)));
    }

    #[test]
    fn test_now_before_start() {
        let book = book_with(&["1"]);
        assert!(matches!(book.now(), Err(CatalogError::NotStarted)));
        assert!(matches!(PlaylistBook::new().now(), Err(CatalogError::EmptyPlaylist)));
    }

    #[test]
    fn test_next_previous_wrap() {
        let mut book = book_with(&["1", "2", "3"]);
        assert_eq!(book.next().unwrap().id, "1");
        assert_eq!(book.next().unwrap().id, "2");
        assert_eq!(book.next().unwrap().id, "3");
        assert_eq!(book.next().unwrap().id, "1");
        assert_eq!(book.previous().unwrap().id, "3");
    }

    #[test]
    fn test_next_on_empty_fails() {
        let mut book = PlaylistBook::new();
        assert!(matches!(book.next(), Err(CatalogError::EmptyPlaylist)));
        assert!(matches!(book.previous(), Err(CatalogError::EmptyPlaylist)));
        assert_eq!(book.cursor(), None);
    }

    #[test]
    fn test_jump_range() {
        let mut book = book_with(&["1", "2"]);
        assert_eq!(book.jump(1).unwrap().id, "2");
        assert!(matches!(book.jump(2), Err(CatalogError::IndexOutOfRange(2))));
        assert_eq!(book.cursor(), Some(1));
    }

    #[test]
    fn test_current_insert_becomes_now() {
        let mut book = book_with(&["1", "2"]);
        book.jump(1).unwrap();
        book.current_insert(track("9")).unwrap();
        assert_eq!(book.now().unwrap().id, "9");
        assert_eq!(book.next().unwrap().id, "2");

        let mut fresh = PlaylistBook::new();
        fresh.current_insert(track("5")).unwrap();
        assert_eq!(fresh.now().unwrap().id, "5");
    }

    #[test]
    fn test_remove_keeps_cursor_on_same_track() {
        let mut book = book_with(&["1", "2", "3"]);
        book.jump(2).unwrap();
        book.current_remove(0).unwrap();
        assert_eq!(book.now().unwrap().id, "3");

        // retirer le morceau courant fait reculer le curseur
        book.current_remove(1).unwrap();
        assert_eq!(book.now().unwrap().id, "2");
        assert!(matches!(
            book.current_remove(5),
            Err(CatalogError::IndexOutOfRange(5))
        ));
    }

    #[test]
    fn test_create_copy_play_list() {
        let mut book = book_with(&["1", "2"]);
        book.create("fav").unwrap();
        assert!(matches!(book.create("fav"), Err(CatalogError::PlaylistExists(_))));
        book.copy(CURRENT_LIST_ID, "fav").unwrap();
        book.clear_current().unwrap();
        assert_eq!(book.cursor(), None);

        assert_eq!(book.play_list("fav").unwrap().id, "1");
        assert_eq!(book.cursor(), Some(0));
        assert_eq!(book.current_list().len(), 2);

        let ids: Vec<&str> = book.list().unwrap().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["fav"]);
    }

    #[test]
    fn test_delete_rules() {
        let mut book = PlaylistBook::new();
        assert!(matches!(
            book.delete(CURRENT_LIST_ID),
            Err(CatalogError::PlaylistProtected(_))
        ));
        assert!(matches!(
            book.delete("nope"),
            Err(CatalogError::PlaylistNotFound(_))
        ));
        book.create("x").unwrap();
        book.delete("x").unwrap();
        assert!(!book.exists("x"));
    }

    #[test]
    fn test_shuffle_keeps_tracks() {
        let mut book = book_with(&["1", "2", "3", "4"]);
        book.shuffle().unwrap();
        let mut ids: Vec<String> = book
            .current_list()
            .tracks
            .iter()
            .map(|t| t.id.clone())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(matches!(
            PlaylistBook::new().shuffle(),
            Err(CatalogError::EmptyPlaylist)
        ));
    }
}
