//! # Playback Synchronizer
//!
//! Réconcilie l'état du lecteur audio avec le curseur de l'interface
//! active. Appelé une fois par tick d'inactivité, jamais pendant un handler :
//! le lecteur met un moment à enchaîner après un `play`, un tick pendant un
//! handler ferait sauter des morceaux.

use mewcontrol::AudioPlayer;
use mewsource::{CatalogBackend, Track};
use tracing::{debug, info, warn};

/// Ce qu'un tick a fait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Le curseur a avancé et un nouveau morceau a été lancé
    pub advanced: bool,
    /// Description et pochette ont été poussées au lecteur
    pub metadata_pushed: bool,
}

/// Description affichée par le lecteur pendant la lecture
pub fn now_playing_description(track: &Track) -> String {
    format!("！！正在播放来自{}的{}", track.artist_names(" "), track.name)
}

#[derive(Debug, Default)]
pub struct PlaybackSynchronizer {
    last_observed_link: Option<String>,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_observed_link(&self) -> Option<&str> {
        self.last_observed_link.as_deref()
    }

    /// Un tick complet ; sans interface active il ne fait rien
    pub fn tick(
        &mut self,
        player: &dyn AudioPlayer,
        catalog: Option<&mut dyn CatalogBackend>,
    ) -> SyncReport {
        let Some(catalog) = catalog else {
            return SyncReport::default();
        };
        SyncReport {
            advanced: self.ensure_playing(player, catalog),
            metadata_pushed: self.push_metadata_if_changed(player, &*catalog),
        }
    }

    /// Lance le morceau suivant si le lecteur est à l'arrêt
    pub fn ensure_playing(&mut self, player: &dyn AudioPlayer, catalog: &mut dyn CatalogBackend) -> bool {
        match player.is_playing() {
            Ok(true) => return false,
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "Cannot read player state");
                return false;
            }
        }
        if catalog.playlists().current_list().is_empty() {
            return false;
        }

        let track = match catalog.next() {
            Ok(track) => track,
            Err(e) => {
                warn!(error = %e, "Cannot advance current playlist");
                return false;
            }
        };
        let played = catalog
            .stream_link(&track.id)
            .map_err(|e| e.to_string())
            .and_then(|link| player.play(&link).map_err(|e| e.to_string()));
        match played {
            Ok(()) => {
                info!(track = %track.name, cursor = ?catalog.cursor(), "Advanced to next track");
                true
            }
            Err(e) => {
                warn!(track = %track.name, error = %e, "Play next failed");
                false
            }
        }
    }

    /// Pousse description et pochette quand le lien joué change
    pub fn push_metadata_if_changed(
        &mut self,
        player: &dyn AudioPlayer,
        catalog: &dyn CatalogBackend,
    ) -> bool {
        let link = match player.current_link() {
            Ok(Some(link)) => link,
            Ok(None) => return false,
            Err(e) => {
                debug!(error = %e, "Cannot read current link");
                return false;
            }
        };
        if self.last_observed_link.as_deref() == Some(link.as_str()) {
            return false;
        }
        // pas d'entrée courante : on réessaiera au prochain tick
        let track = match catalog.now() {
            Ok(track) => track,
            Err(e) => {
                debug!(error = %e, "No current entry to describe");
                return false;
            }
        };
        let avatar = catalog.artwork_link(&track.id).unwrap_or_default();

        if let Err(e) = player.set_description(&now_playing_description(&track)) {
            warn!(error = %e, "Set bot description failed");
            return false;
        }
        if let Err(e) = player.set_avatar(&avatar) {
            warn!(error = %e, "Set bot avatar failed");
        }
        debug!(link = %link, track = %track.name, "Metadata pushed");
        self.last_observed_link = Some(link);
        true
    }
}
