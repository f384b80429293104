//! # MewSource
//!
//! Catalog backends for MewBot.
//!
//! A catalog backend answers three kinds of requests:
//!
//! - **Lookup**: search by keyword, search suggestions, fetch tracks by id.
//! - **Resolution**: turn a track id into a stream link and an artwork link
//!   the audio player can fetch on its own.
//! - **Playlists**: named playlists plus the `current` playlist and its cursor,
//!   held locally in a [`PlaylistBook`].
//!
//! Several backends can be registered at once; the bot elects one of them by
//! priority and availability, so every backend must bound its network calls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mewsource::{CatalogBackend, HttpCatalog};
//! use std::time::Duration;
//!
//! let mut catalog = HttpCatalog::new("http://127.0.0.1:8000", "netease", Duration::from_secs(5));
//! if catalog.available() {
//!     let tracks = catalog.search("爱情转移", 1)?;
//!     catalog.current_add(tracks)?;
//!     let track = catalog.next()?;
//!     println!("{}", catalog.stream_link(&track.id)?);
//! }
//! # Ok::<(), mewsource::CatalogError>(())
//! ```

pub mod error;
pub mod http_catalog;
pub mod model;
pub mod playlist_book;

pub use error::{CatalogError, Result};
pub use http_catalog::HttpCatalog;
pub use model::{Album, Artist, Playlist, Track};
pub use playlist_book::{CURRENT_LIST_ID, PlaylistBook};

use std::fmt::Debug;

/// Main trait for catalog backends
///
/// Implementors provide the network-facing lookups and expose their
/// [`PlaylistBook`]; playlist and cursor operations have default
/// implementations that delegate to it.
///
/// # Examples
///
/// ```rust
/// use mewsource::{CatalogBackend, PlaylistBook, Result, Track};
///
/// #[derive(Debug, Default)]
/// struct Fixed {
///     book: PlaylistBook,
/// }
///
/// impl CatalogBackend for Fixed {
///     fn kind(&self) -> &str { "fixed" }
///     fn available(&self) -> bool { true }
///     fn search(&self, query: &str, _limit: usize) -> Result<Vec<Track>> {
///         Ok(vec![Track::new("1", query)])
///     }
///     fn suggest(&self, _query: &str) -> Result<Vec<String>> { Ok(vec![]) }
///     fn tracks(&self, ids: &[String]) -> Result<Vec<Track>> {
///         Ok(ids.iter().map(|id| Track::new(id.as_str(), "song")).collect())
///     }
///     fn stream_link(&self, id: &str) -> Result<String> { Ok(format!("mem://{}", id)) }
///     fn artwork_link(&self, _id: &str) -> Result<String> { Ok(String::new()) }
///     fn playlists(&self) -> &PlaylistBook { &self.book }
///     fn playlists_mut(&mut self) -> &mut PlaylistBook { &mut self.book }
/// }
///
/// let mut fixed = Fixed::default();
/// fixed.current_add(fixed.search("Lemon", 1).unwrap()).unwrap();
/// assert_eq!(fixed.next().unwrap().name, "Lemon");
/// ```
pub trait CatalogBackend: Debug + Send {
    // ============= Identification =============

    /// Short name of the backend implementation (shown by the status command)
    fn kind(&self) -> &str;

    /// Live availability probe; must be bounded in time
    fn available(&self) -> bool;

    // ============= Lookup =============

    fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>>;

    fn suggest(&self, query: &str) -> Result<Vec<String>>;

    fn tracks(&self, ids: &[String]) -> Result<Vec<Track>>;

    /// Fetches a single track, failing with `TrackNotFound` when absent
    fn track(&self, id: &str) -> Result<Track> {
        self.tracks(&[id.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::TrackNotFound(id.to_string()))
    }

    // ============= Resolution =============

    fn stream_link(&self, track_id: &str) -> Result<String>;

    fn artwork_link(&self, track_id: &str) -> Result<String>;

    // ============= Playlists =============

    fn playlists(&self) -> &PlaylistBook;

    fn playlists_mut(&mut self) -> &mut PlaylistBook;

    fn list_create(&mut self, list_id: &str) -> Result<()> {
        self.playlists_mut().create(list_id)
    }

    fn list_delete(&mut self, list_id: &str) -> Result<()> {
        self.playlists_mut().delete(list_id)
    }

    fn list_list(&self) -> Result<Vec<Playlist>> {
        Ok(self.playlists().list()?.into_iter().cloned().collect())
    }

    fn list_show(&self, list_id: &str) -> Result<Playlist> {
        self.playlists().show(list_id).cloned()
    }

    fn list_copy(&mut self, src: &str, dst: &str) -> Result<()> {
        self.playlists_mut().copy(src, dst)
    }

    fn list_add(&mut self, list_id: &str, tracks: Vec<Track>) -> Result<()> {
        self.playlists_mut().add(list_id, tracks)
    }

    fn list_remove(&mut self, list_id: &str, index: usize) -> Result<Track> {
        self.playlists_mut().remove(list_id, index)
    }

    fn list_insert(&mut self, list_id: &str, index: usize, track: Track) -> Result<()> {
        self.playlists_mut().insert(list_id, index, track)
    }

    fn list_clear(&mut self, list_id: &str) -> Result<()> {
        self.playlists_mut().clear(list_id)
    }

    fn list_exists(&self, list_id: &str) -> bool {
        self.playlists().exists(list_id)
    }

    // ============= Current playlist & cursor =============

    fn next(&mut self) -> Result<Track> {
        self.playlists_mut().next()
    }

    fn previous(&mut self) -> Result<Track> {
        self.playlists_mut().previous()
    }

    fn jump(&mut self, index: usize) -> Result<Track> {
        self.playlists_mut().jump(index)
    }

    fn now(&self) -> Result<Track> {
        self.playlists().now()
    }

    fn cursor(&self) -> Option<usize> {
        self.playlists().cursor()
    }

    fn current_show(&self) -> Playlist {
        self.playlists().current_list().clone()
    }

    fn current_insert(&mut self, track: Track) -> Result<()> {
        self.playlists_mut().current_insert(track)
    }

    fn current_add(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.playlists_mut().current_add(tracks)
    }

    fn current_remove(&mut self, index: usize) -> Result<Track> {
        self.playlists_mut().current_remove(index)
    }

    fn clear_current(&mut self) -> Result<()> {
        self.playlists_mut().clear_current()
    }

    fn play_list(&mut self, list_id: &str) -> Result<Track> {
        self.playlists_mut().play_list(list_id)
    }

    fn shuffle(&mut self) -> Result<()> {
        self.playlists_mut().shuffle()
    }
}
