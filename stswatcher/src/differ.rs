//! Change detection between the committed state and a fresh snapshot

use crate::model::{ObservedState, PlaybackSnapshot};

/// Classification of a snapshot against what is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    /// Playback became active (fresh start or resume)
    Started,
    /// Playback stopped or was paused
    Stopped,
    /// Still playing, but another track
    TrackChanged,
}

impl Change {
    pub fn is_changed(self) -> bool {
        self != Change::Unchanged
    }
}

/// Compares a snapshot with the observed state.
///
/// Pure function: the observed state is never touched here.
pub fn diff(observed: &ObservedState, snapshot: &PlaybackSnapshot) -> Change {
    match (observed.last_is_playing(), snapshot.is_playing()) {
        (false, true) => Change::Started,
        (true, false) => Change::Stopped,
        (true, true) if observed.last_track_id() != snapshot.track_id() => Change::TrackChanged,
        _ => Change::Unchanged,
    }
}
