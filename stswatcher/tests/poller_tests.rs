//! Tick-level behaviour of the poller

mod common;

use common::*;
use std::time::Duration;
use stswatcher::{
    Change, Dispatcher, PlaybackSnapshot, Poller, TickOutcome, TrackStats, WatchError,
    WatchStatus, WatcherSettings,
};
use tokio_util::sync::CancellationToken;

fn inline_settings() -> WatcherSettings {
    WatcherSettings {
        background_refresh: false,
        ..WatcherSettings::default()
    }
}

#[tokio::test]
async fn test_first_tick_refreshes_and_then_stays_quiet() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A"))]);
    let display = RecordingDisplay::new();
    let mut poller = Poller::new(provider.clone(), Dispatcher::new(display.clone()), inline_settings());

    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Started, _)
    ));
    for _ in 0..3 {
        assert!(matches!(poller.tick().await, TickOutcome::Unchanged));
    }

    assert_eq!(provider.calls(), 4);
    assert_eq!(display.tracks(), vec!["Song A".to_string()]);
}

#[tokio::test]
async fn test_track_change_is_refreshed() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A")), Ok(playing("B"))]);
    let display = RecordingDisplay::new();
    let stats = FakeStats::ok("D Major", "120");
    let dispatcher = Dispatcher::new(display.clone()).with_stats(stats.clone());
    let mut poller = Poller::new(provider, dispatcher, inline_settings());

    poller.tick().await;
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::TrackChanged, _)
    ));
    assert_eq!(stats.calls(), 2);
    assert_eq!(display.tracks(), vec!["Song A".to_string(), "Song B".to_string()]);
}

#[tokio::test]
async fn test_pause_then_resume_refreshes_again() {
    let provider = ScriptedProvider::new(vec![
        Ok(playing("A")),
        Ok(paused("A")),
        Ok(playing("A")),
    ]);
    let display = RecordingDisplay::new();
    let stats = FakeStats::ok("D Major", "120");
    let dispatcher = Dispatcher::new(display.clone()).with_stats(stats.clone());
    let mut poller = Poller::new(provider, dispatcher, inline_settings());

    poller.tick().await;
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Stopped, _)
    ));
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Started, _)
    ));

    assert_eq!(stats.calls(), 2);
    assert!(display.events().contains(&Event::Idle));
}

#[tokio::test]
async fn test_no_active_track_counts_as_idle() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A")), Err(WatchError::NoActiveTrack)]);
    let display = RecordingDisplay::new();
    let mut poller = Poller::new(provider, Dispatcher::new(display.clone()), inline_settings());

    poller.tick().await;
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Stopped, _)
    ));
    // Pas une panne : aucun statut affiché
    assert!(display.statuses().is_empty());
    assert_eq!(poller.next_delay(), Duration::from_millis(1000));
}

#[tokio::test]
async fn test_failed_poll_keeps_the_committed_track() {
    let provider = ScriptedProvider::new(vec![
        Ok(playing("A")),
        Err(WatchError::fetch("timeout")),
        Ok(playing("A")),
        Ok(playing("B")),
    ]);
    let display = RecordingDisplay::new();
    let mut poller = Poller::new(provider, Dispatcher::new(display.clone()), inline_settings());

    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Started, _)
    ));
    assert!(matches!(poller.tick().await, TickOutcome::FetchFailed(_)));
    assert_eq!(
        poller.dispatcher().observed_state().await.last_track_id(),
        Some("A")
    );

    // Same track after the failure: nothing to refresh
    assert!(matches!(poller.tick().await, TickOutcome::Unchanged));
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::TrackChanged, _)
    ));
    assert_eq!(display.tracks(), vec!["Song A".to_string(), "Song B".to_string()]);
}

#[tokio::test]
async fn test_fetch_failures_back_off_and_recover() {
    let provider = ScriptedProvider::new(vec![
        Err(WatchError::fetch("connection refused")),
        Err(WatchError::fetch("connection refused")),
        Err(WatchError::fetch("HTTP 503")),
        Ok(playing("A")),
    ]);
    let display = RecordingDisplay::new();
    let mut poller = Poller::new(provider, Dispatcher::new(display.clone()), inline_settings());

    let mut delays = Vec::new();
    for _ in 0..3 {
        assert!(matches!(poller.tick().await, TickOutcome::FetchFailed(_)));
        delays.push(poller.next_delay());
    }
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000)
        ]
    );

    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Started, _)
    ));
    assert_eq!(poller.next_delay(), Duration::from_millis(1000));
    assert_eq!(
        display.statuses(),
        vec![
            WatchStatus::Unreachable {
                consecutive_failures: 1
            },
            WatchStatus::Connected
        ]
    );
}

#[tokio::test]
async fn test_failed_text_update_is_retried() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A"))]);
    let display = RecordingDisplay::new();
    display.fail_text(true);
    let mut poller = Poller::new(provider, Dispatcher::new(display.clone()), inline_settings());

    assert!(matches!(
        poller.tick().await,
        TickOutcome::RefreshFailed(Change::Started, WatchError::Display(_))
    ));

    display.fail_text(false);
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Refreshed(Change::Started, _)
    ));
    assert_eq!(display.tracks(), vec!["Song A".to_string()]);
}

#[tokio::test]
async fn test_single_flight_defers_changes() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A")), Ok(playing("B"))]);
    let display = RecordingDisplay::new();
    let stats = FakeStats::gated("E Minor", "95");
    let dispatcher = Dispatcher::new(display.clone()).with_stats(stats.clone());
    let mut poller = Poller::new(provider, dispatcher, WatcherSettings::default());

    assert!(matches!(poller.tick().await, TickOutcome::Spawned(Change::Started)));
    assert!(poller.refresh_in_flight());

    // B shows up while A is still being enriched
    assert!(matches!(poller.tick().await, TickOutcome::Deferred(Change::Started)));

    stats.release();
    assert!(poller.settle().await.unwrap().is_ok());
    assert_eq!(
        poller.dispatcher().observed_state().await.last_track_id(),
        Some("A")
    );

    // Detected again against the committed state
    assert!(matches!(
        poller.tick().await,
        TickOutcome::Spawned(Change::TrackChanged)
    ));
    stats.release();
    assert!(poller.settle().await.unwrap().is_ok());

    assert_eq!(stats.calls(), 2);
    assert_eq!(display.tracks(), vec!["Song A".to_string(), "Song B".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_run_polls_until_cancelled() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A"))]);
    let display = RecordingDisplay::new();
    let poller = Poller::new(provider.clone(), Dispatcher::new(display.clone()), WatcherSettings::default());

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(poller.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(3500)).await;
    cancel.cancel();
    handle.await.unwrap();

    let calls = provider.calls();
    assert!(calls >= 3, "only {} polls", calls);
    assert_eq!(display.tracks(), vec!["Song A".to_string()]);

    provider.push(Ok(PlaybackSnapshot::idle()));
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(provider.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_lets_the_inline_refresh_finish() {
    let provider = ScriptedProvider::new(vec![Ok(playing("A"))]);
    let display = RecordingDisplay::new();
    let stats = FakeStats::gated("A Minor", "100");
    let dispatcher = Dispatcher::new(display.clone()).with_stats(stats.clone());
    let poller = Poller::new(provider, dispatcher, inline_settings());

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(poller.run(cancel.clone()));

    // The first tick is now waiting for the stats
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(stats.calls(), 1);
    assert_eq!(display.tracks(), vec!["Song A".to_string()]);

    cancel.cancel();
    stats.release();
    handle.await.unwrap();

    let enrichment = display.events().into_iter().find_map(|e| match e {
        Event::Enrichment(enrichment) => Some(enrichment),
        _ => None,
    });
    assert_eq!(enrichment.and_then(|e| e.stats), Some(TrackStats::new("A Minor", "100")));
}
