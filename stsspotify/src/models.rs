//! Data models for the Spotify Web API player endpoint
//!
//! Only the fields Spotistats reads are modelled; everything else in the
//! payload is ignored by serde.

use serde::Deserialize;

/// Answer of `GET /me/player`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPlayback {
    #[serde(default)]
    pub is_playing: bool,

    /// Missing when nothing is loaded, or for ads
    pub item: Option<PlaybackItem>,

    /// "track", "episode", "ad" or "unknown"
    pub currently_playing_type: Option<String>,

    pub progress_ms: Option<u64>,

    pub device: Option<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub volume_percent: Option<u32>,
}

/// A track or a podcast episode
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackItem {
    /// `None` for local files
    pub id: Option<String>,
    pub name: String,
    pub uri: Option<String>,

    #[serde(default)]
    pub artists: Vec<Artist>,

    pub album: Option<Album>,

    /// Set for episodes
    pub show: Option<Show>,

    /// Episode artwork lives here
    #[serde(default)]
    pub images: Vec<Image>,

    #[serde(default)]
    pub is_local: bool,

    pub duration_ms: Option<u64>,
}

impl PlaybackItem {
    /// Stable identity: the track id, or the uri for local files
    pub fn identity(&self) -> Option<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.uri.as_deref().filter(|uri| !uri.is_empty()))
    }

    /// Artist names, or the show name for episodes
    pub fn artist_names(&self) -> Vec<String> {
        if !self.artists.is_empty() {
            return self.artists.iter().map(|a| a.name.clone()).collect();
        }
        match &self.show {
            Some(show) => vec![show.name.clone()],
            None => Vec::new(),
        }
    }

    /// First listed image (Spotify sorts them widest first)
    pub fn art_url(&self) -> Option<&str> {
        self.album
            .as_ref()
            .and_then(|album| album.images.first())
            .or_else(|| self.images.first())
            .or_else(|| self.show.as_ref().and_then(|show| show.images.first()))
            .map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Show {
    pub name: String,
    pub publisher: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Error body returned by the Web API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub status: u16,
    pub message: String,
}
