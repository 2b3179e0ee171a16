//! Terminal rendition of the now-playing panel

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use stswatcher::{
    CoverArt, Display, Enrichment, PlaybackSnapshot, Result, WatchError, WatchStatus,
};

pub const NO_SONG: &str = "No song playing.";
pub const NO_STATS: &str = "- - - - -";
pub const NO_SUGGESTIONS: &str = "AI suggestions unavailable";

/// What the panel currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub artists: String,
    pub cover: Option<String>,
    pub stats: String,
    pub suggestions: Vec<String>,
    pub status: Option<String>,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            title: NO_SONG.to_string(),
            artists: String::new(),
            cover: None,
            stats: NO_STATS.to_string(),
            suggestions: Vec::new(),
            status: None,
        }
    }
}

impl Panel {
    pub fn reset(&mut self) {
        let status = self.status.take();
        *self = Self {
            status,
            ..Self::default()
        };
    }

    /// New track: the previous track's cover and enrichment no longer apply
    pub fn start_track(&mut self, title: &str, artists: String) {
        self.reset();
        self.title = title.to_string();
        self.artists = artists;
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("────────────────────────────────────────\n");
        out.push_str(&format!("  {}\n", self.title));
        if !self.artists.is_empty() {
            out.push_str(&format!("  {}\n", self.artists));
        }
        if let Some(cover) = &self.cover {
            out.push_str(&format!("  [cover] {}\n", cover));
        }
        out.push_str(&format!("  {}\n", self.stats));
        if self.suggestions.is_empty() {
            out.push_str(&format!("  {}\n", NO_SUGGESTIONS));
        } else {
            out.push_str("  You might also like:\n");
            for (i, song) in self.suggestions.iter().enumerate() {
                out.push_str(&format!("    {}. {}\n", i + 1, song));
            }
        }
        if let Some(status) = &self.status {
            out.push_str(&format!("  ! {}\n", status));
        }
        out
    }
}

/// [`Display`] printing the whole panel on every update
pub struct ConsoleDisplay<W: Write + Send> {
    state: Mutex<(Panel, W)>,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDisplay<W> {
    pub fn new(writer: W) -> Self {
        Self {
            state: Mutex::new((Panel::default(), writer)),
        }
    }

    pub fn panel(&self) -> Result<Panel> {
        Ok(self.lock()?.0.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, (Panel, W)>> {
        self.state
            .lock()
            .map_err(|_| WatchError::display("console state poisoned"))
    }

    fn update(&self, change: impl FnOnce(&mut Panel)) -> Result<()> {
        let mut guard = self.lock()?;
        let (panel, writer) = &mut *guard;
        change(panel);
        writer
            .write_all(panel.render().as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| WatchError::display(e.to_string()))
    }
}

impl<W: Write + Send> Display for ConsoleDisplay<W> {
    fn show_track(&self, snapshot: &PlaybackSnapshot) -> Result<()> {
        self.update(|panel| panel.start_track(snapshot.track_name(), snapshot.artists_display()))
    }

    fn show_idle(&self) -> Result<()> {
        self.update(Panel::reset)
    }

    fn show_cover(&self, cover: &CoverArt) -> Result<()> {
        self.update(|panel| {
            panel.cover = Some(format!(
                "{} {}x{}",
                cover.mime_type.as_deref().unwrap_or("image"),
                cover.width,
                cover.height
            ));
        })
    }

    fn hide_cover(&self) -> Result<()> {
        self.update(|panel| panel.cover = None)
    }

    fn show_enrichment(&self, enrichment: &Enrichment) -> Result<()> {
        self.update(|panel| {
            panel.stats = enrichment
                .stats
                .as_ref()
                .map(|s| s.label())
                .unwrap_or_else(|| NO_STATS.to_string());
            panel.suggestions = enrichment.ai_suggestions.clone().unwrap_or_default();
        })
    }

    fn show_status(&self, status: &WatchStatus) -> Result<()> {
        self.update(|panel| {
            panel.status = match status {
                WatchStatus::Connected => None,
                WatchStatus::Unreachable { .. } => {
                    Some("Spotify unreachable, retrying...".to_string())
                }
            };
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stswatcher::TrackStats;

    fn display() -> ConsoleDisplay<Vec<u8>> {
        ConsoleDisplay::new(Vec::new())
    }

    #[test]
    fn test_initial_panel_uses_placeholders() {
        let text = Panel::default().render();
        assert!(text.contains(NO_SONG));
        assert!(text.contains(NO_STATS));
        assert!(text.contains(NO_SUGGESTIONS));
    }

    #[test]
    fn test_track_with_enrichment() {
        let display = display();
        let snapshot = PlaybackSnapshot::playing(
            "id",
            "Get Lucky",
            vec!["Daft Punk".into(), "Pharrell Williams".into()],
            None,
        );
        display.show_track(&snapshot).unwrap();
        display
            .show_enrichment(&Enrichment::new(
                Some(TrackStats::new("F# Minor", "116")),
                Some(vec!["A".into(), "B".into(), "C".into()]),
            ))
            .unwrap();

        let panel = display.panel().unwrap();
        assert_eq!(panel.title, "Get Lucky");
        assert_eq!(panel.artists, "Daft Punk, Pharrell Williams");
        assert_eq!(panel.stats, "Key: F# Minor | BPM: 116");

        let text = panel.render();
        assert!(text.contains("    3. C"));
        assert!(!text.contains(NO_SUGGESTIONS));
    }

    #[test]
    fn test_idle_resets_but_keeps_status() {
        let display = display();
        display
            .show_status(&WatchStatus::Unreachable {
                consecutive_failures: 1,
            })
            .unwrap();
        display
            .show_track(&PlaybackSnapshot::playing("id", "Song", vec![], None))
            .unwrap();
        display.show_idle().unwrap();

        let panel = display.panel().unwrap();
        assert_eq!(panel.title, NO_SONG);
        assert!(panel.status.is_some());

        display.show_status(&WatchStatus::Connected).unwrap();
        assert!(display.panel().unwrap().status.is_none());
    }

    #[test]
    fn test_new_track_drops_previous_enrichment() {
        let display = display();
        display
            .show_track(&PlaybackSnapshot::playing("a", "Song A", vec![], None))
            .unwrap();
        display
            .show_cover(&CoverArt {
                url: "https://img.test/a.jpg".to_string(),
                bytes: vec![0; 4],
                mime_type: Some("image/jpeg".to_string()),
                width: 640,
                height: 640,
            })
            .unwrap();
        display
            .show_enrichment(&Enrichment::new(
                Some(TrackStats::new("F Minor", "128")),
                Some(vec!["x".into(), "y".into(), "z".into()]),
            ))
            .unwrap();
        display
            .show_status(&WatchStatus::Unreachable {
                consecutive_failures: 1,
            })
            .unwrap();

        display
            .show_track(&PlaybackSnapshot::playing("b", "Song B", vec!["B".into()], None))
            .unwrap();

        let panel = display.panel().unwrap();
        assert_eq!(panel.title, "Song B");
        assert_eq!(panel.artists, "B");
        assert_eq!(panel.stats, NO_STATS);
        assert!(panel.suggestions.is_empty());
        assert!(panel.cover.is_none());
        assert!(panel.status.is_some());
        assert!(!panel.render().contains("F Minor"));
    }

    #[test]
    fn test_failed_enrichment_shows_placeholders() {
        let display = display();
        display.show_enrichment(&Enrichment::default()).unwrap();
        let panel = display.panel().unwrap();
        assert_eq!(panel.stats, NO_STATS);
        assert!(panel.render().contains(NO_SUGGESTIONS));
    }
}
