//! Fake collaborators shared by the watcher integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stswatcher::{
    async_trait, CoverArt, CoverFetcher, Display, Enrichment, PlaybackProvider,
    PlaybackSnapshot, Result, StatsProvider, SuggestionProvider, SuggestionRequest, TrackStats,
    WatchError, WatchStatus,
};
use tokio::sync::Notify;

pub fn playing(id: &str) -> PlaybackSnapshot {
    PlaybackSnapshot::playing(
        id,
        format!("Song {id}"),
        vec!["Artist".to_string()],
        Some(format!("https://img.test/{id}.jpg")),
    )
}

pub fn paused(id: &str) -> PlaybackSnapshot {
    PlaybackSnapshot::paused(
        id,
        format!("Song {id}"),
        vec!["Artist".to_string()],
        Some(format!("https://img.test/{id}.jpg")),
    )
}

// ============================================================================
// Playback provider
// ============================================================================

/// Replays a script of answers, repeating the last one once exhausted
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<PlaybackSnapshot>>>,
    last: Mutex<Result<PlaybackSnapshot>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<PlaybackSnapshot>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(Ok(PlaybackSnapshot::idle())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn push(&self, answer: Result<PlaybackSnapshot>) {
        self.script.lock().unwrap().push_back(answer);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaybackProvider for ScriptedProvider {
    async fn current_playback(&self) -> Result<PlaybackSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(answer) = next {
            *last = answer;
        }
        last.clone()
    }
}

// ============================================================================
// Display
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Track(String),
    Idle,
    Cover(String),
    HideCover,
    Enrichment(Enrichment),
    Status(WatchStatus),
}

#[derive(Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<Event>>,
    fail_text: AtomicBool,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_text(&self, fail: bool) {
        self.fail_text.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn tracks(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Track(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<WatchStatus> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl Display for RecordingDisplay {
    fn show_track(&self, snapshot: &PlaybackSnapshot) -> Result<()> {
        if self.fail_text.load(Ordering::SeqCst) {
            return Err(WatchError::display("label gone"));
        }
        self.record(Event::Track(snapshot.track_name().to_string()));
        Ok(())
    }

    fn show_idle(&self) -> Result<()> {
        if self.fail_text.load(Ordering::SeqCst) {
            return Err(WatchError::display("label gone"));
        }
        self.record(Event::Idle);
        Ok(())
    }

    fn show_cover(&self, cover: &CoverArt) -> Result<()> {
        self.record(Event::Cover(cover.url.clone()));
        Ok(())
    }

    fn hide_cover(&self) -> Result<()> {
        self.record(Event::HideCover);
        Ok(())
    }

    fn show_enrichment(&self, enrichment: &Enrichment) -> Result<()> {
        self.record(Event::Enrichment(enrichment.clone()));
        Ok(())
    }

    fn show_status(&self, status: &WatchStatus) -> Result<()> {
        self.record(Event::Status(*status));
        Ok(())
    }
}

// ============================================================================
// Enrichment collaborators
// ============================================================================

pub struct FakeCovers {
    fail: bool,
}

impl FakeCovers {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self { fail: false })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true })
    }
}

#[async_trait]
impl CoverFetcher for FakeCovers {
    async fn fetch_cover(&self, url: &str) -> Result<CoverArt> {
        if self.fail {
            return Err(WatchError::fetch("HTTP 404"));
        }
        Ok(CoverArt {
            url: url.to_string(),
            bytes: vec![0u8; 4],
            mime_type: Some("image/jpeg".to_string()),
            width: 640,
            height: 640,
        })
    }
}

/// Stats provider, optionally held back until `release` is called
pub struct FakeStats {
    result: Result<TrackStats>,
    gate: Option<Notify>,
    calls: AtomicUsize,
}

impl FakeStats {
    pub fn ok(key: &str, bpm: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(TrackStats::new(key, bpm)),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: Err(WatchError::parse("labels missing")),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn gated(key: &str, bpm: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(TrackStats::new(key, bpm)),
            gate: Some(Notify::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsProvider for FakeStats {
    async fn track_stats(&self, _track_id: &str) -> Result<TrackStats> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

pub struct FakeSuggestions {
    fail: bool,
    requests: Mutex<Vec<SuggestionRequest>>,
}

impl FakeSuggestions {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SuggestionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionProvider for FakeSuggestions {
    async fn suggestions(&self, request: &SuggestionRequest) -> Result<Vec<String>> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(WatchError::fetch("quota exceeded"));
        }
        Ok(vec![
            "One - X".to_string(),
            "Two - Y".to_string(),
            "Three - Z".to_string(),
        ])
    }
}
