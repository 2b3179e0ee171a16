//! Data model shared by the poller, the differ and the dispatcher

// ============================================================================
// Playback
// ============================================================================

/// One immutable read of the remote playback state
///
/// A snapshot is produced once per tick by a [`PlaybackProvider`] and never
/// modified afterwards. An idle snapshot carries no track at all.
///
/// [`PlaybackProvider`]: crate::PlaybackProvider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    is_playing: bool,
    track_id: Option<String>,
    track_name: String,
    artist_names: Vec<String>,
    album_art_url: Option<String>,
}

impl PlaybackSnapshot {
    pub fn new(
        is_playing: bool,
        track_id: Option<String>,
        track_name: impl Into<String>,
        artist_names: Vec<String>,
        album_art_url: Option<String>,
    ) -> Self {
        Self {
            is_playing,
            track_id,
            track_name: track_name.into(),
            artist_names,
            album_art_url,
        }
    }

    /// Snapshot of a track currently playing
    pub fn playing(
        track_id: impl Into<String>,
        track_name: impl Into<String>,
        artist_names: Vec<String>,
        album_art_url: Option<String>,
    ) -> Self {
        Self::new(
            true,
            Some(track_id.into()),
            track_name,
            artist_names,
            album_art_url,
        )
    }

    /// Snapshot of a track loaded in the player but paused
    pub fn paused(
        track_id: impl Into<String>,
        track_name: impl Into<String>,
        artist_names: Vec<String>,
        album_art_url: Option<String>,
    ) -> Self {
        Self::new(
            false,
            Some(track_id.into()),
            track_name,
            artist_names,
            album_art_url,
        )
    }

    /// Nothing loaded in the player
    pub fn idle() -> Self {
        Self::new(false, None, String::new(), Vec::new(), None)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track_id.as_deref()
    }

    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    pub fn artist_names(&self) -> &[String] {
        &self.artist_names
    }

    pub fn album_art_url(&self) -> Option<&str> {
        self.album_art_url.as_deref()
    }

    /// Artists joined the way they are shown to the user ("A, B")
    pub fn artists_display(&self) -> String {
        self.artist_names.join(", ")
    }
}

// ============================================================================
// Observed state
// ============================================================================

/// What the display currently reflects
///
/// Only the dispatcher moves this forward, and only once a refresh has been
/// carried through. When playback is not active the track identity is
/// cleared, so resuming the same track counts as a fresh start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedState {
    last_track_id: Option<String>,
    last_is_playing: bool,
}

impl ObservedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State reflecting a successfully dispatched snapshot
    pub fn committed_from(snapshot: &PlaybackSnapshot) -> Self {
        if snapshot.is_playing() {
            Self {
                last_track_id: snapshot.track_id.clone(),
                last_is_playing: true,
            }
        } else {
            Self::default()
        }
    }

    pub fn last_track_id(&self) -> Option<&str> {
        self.last_track_id.as_deref()
    }

    pub fn last_is_playing(&self) -> bool {
        self.last_is_playing
    }
}

// ============================================================================
// Enrichment
// ============================================================================

/// Musical key and tempo of a track, kept as the provider formats them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStats {
    pub key: String,
    pub bpm: String,
}

impl TrackStats {
    pub fn new(key: impl Into<String>, bpm: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            bpm: bpm.into(),
        }
    }

    /// "Key: F# Minor | BPM: 128"
    pub fn label(&self) -> String {
        format!("Key: {} | BPM: {}", self.key, self.bpm)
    }
}

/// What a suggestion provider is asked about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub track_name: String,
    pub artists: Vec<String>,
    pub key: Option<String>,
    pub bpm: Option<String>,
}

impl SuggestionRequest {
    pub fn new(snapshot: &PlaybackSnapshot, stats: Option<&TrackStats>) -> Self {
        Self {
            track_name: snapshot.track_name().to_string(),
            artists: snapshot.artist_names().to_vec(),
            key: stats.map(|s| s.key.clone()),
            bpm: stats.map(|s| s.bpm.clone()),
        }
    }
}

/// Derived information shown next to the playing track
///
/// Every part is optional: a failed or disabled enrichment step leaves its
/// field empty and the display falls back to a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub stats: Option<TrackStats>,
    pub ai_suggestions: Option<Vec<String>>,
}

impl Enrichment {
    pub fn new(stats: Option<TrackStats>, ai_suggestions: Option<Vec<String>>) -> Self {
        Self {
            stats,
            ai_suggestions,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.stats.as_ref().map(|s| s.key.as_str())
    }

    pub fn bpm(&self) -> Option<&str> {
        self.stats.as_ref().map(|s| s.bpm.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_none() && self.ai_suggestions.is_none()
    }
}

// ============================================================================
// Cover art and status
// ============================================================================

/// Album artwork downloaded for the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub url: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Reachability of the playback provider, as reported to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    Connected,
    Unreachable { consecutive_failures: u32 },
}
