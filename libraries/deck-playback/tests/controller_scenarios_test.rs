//! End-to-end scenarios for the playback controller
//!
//! Drives the controller with a scripted engine, firing engine events the way
//! a real media primitive would (including late events from superseded loads).

use deck_playback::{
    Catalog, EngineCommand, EngineEvent, PlaybackConfig, PlaybackController, PlaybackError,
    PlaybackEvent, PlaybackState, RepeatMode, ScriptedEngine, ScriptedEngineHandle, SourceKind,
    StampedEvent, Track,
};
use std::time::Duration;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn create_test_track(id: &str) -> Track {
    Track::local(
        id,
        format!("Track {}", id),
        "Test Artist",
        Duration::from_secs(200),
        format!("/audio/{}.mp3", id),
    )
}

fn remote_track(id: &str, kind: SourceKind) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Remote {}", id),
        artist: "Remote Artist".to_string(),
        duration: Duration::ZERO,
        source_uri: format!("https://media.example/{}", id),
        artwork_uri: None,
        source_kind: kind,
    }
}

/// Catalog = [A(id=1), B(id=2), C(id=3)]
fn abc_controller(repeat: RepeatMode) -> (PlaybackController, ScriptedEngineHandle) {
    let catalog = Catalog::new(vec![
        create_test_track("1"),
        create_test_track("2"),
        create_test_track("3"),
    ])
    .unwrap();
    let (engine, handle) = ScriptedEngine::new();
    let config = PlaybackConfig {
        repeat,
        shuffle: false,
        ..PlaybackConfig::default()
    };
    (
        PlaybackController::new(catalog, Box::new(engine), config),
        handle,
    )
}

fn fire(controller: &mut PlaybackController, handle: &ScriptedEngineHandle, event: EngineEvent) {
    assert!(handle.fire(event), "no load to fire events for");
    controller.process_events();
}

fn play_index(controller: &mut PlaybackController, handle: &ScriptedEngineHandle, index: usize) {
    controller.select_index(index).unwrap();
    fire(controller, handle, EngineEvent::Ready { duration: None });
    assert_eq!(controller.state(), PlaybackState::Playing);
}

fn current_id(controller: &PlaybackController) -> Option<String> {
    controller.current_track().map(|t| t.id.clone())
}

// ============================================================================
// REPEAT / QUEUE ADVANCE
// ============================================================================

#[test]
fn repeat_all_walks_catalog_and_wraps() {
    let (mut controller, handle) = abc_controller(RepeatMode::All);
    play_index(&mut controller, &handle, 0);

    fire(&mut controller, &handle, EngineEvent::Ended);
    assert_eq!(current_id(&controller).as_deref(), Some("2"));
    fire(&mut controller, &handle, EngineEvent::Ready { duration: None });

    fire(&mut controller, &handle, EngineEvent::Ended);
    assert_eq!(current_id(&controller).as_deref(), Some("3"));
    fire(&mut controller, &handle, EngineEvent::Ready { duration: None });

    fire(&mut controller, &handle, EngineEvent::Ended);
    assert_eq!(current_id(&controller).as_deref(), Some("1"));
    assert_eq!(controller.state(), PlaybackState::Loading);
}

#[test]
fn repeat_none_stops_after_last_track() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 2);
    let loads_before = handle.load_count();

    fire(&mut controller, &handle, EngineEvent::Ended);

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(controller.current_track().is_none());
    assert!(!controller.session().is_playing);
    assert_eq!(handle.load_count(), loads_before);
}

#[test]
fn repeat_none_advances_before_last_track() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 0);

    fire(&mut controller, &handle, EngineEvent::Ended);

    assert_eq!(current_id(&controller).as_deref(), Some("2"));
    assert_eq!(controller.state(), PlaybackState::Loading);
}

#[test]
fn repeat_one_restarts_without_reload() {
    let (mut controller, handle) = abc_controller(RepeatMode::One);
    play_index(&mut controller, &handle, 1);
    fire(
        &mut controller,
        &handle,
        EngineEvent::PositionUpdate(Duration::from_secs(150)),
    );
    let generation = controller.load_generation();
    let loads_before = handle.load_count();
    handle.clear_commands();
    controller.drain_events();

    fire(&mut controller, &handle, EngineEvent::Ended);

    assert_eq!(current_id(&controller).as_deref(), Some("2"));
    assert_eq!(controller.session().position, Duration::ZERO);
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.load_generation(), generation);
    assert_eq!(handle.load_count(), loads_before);
    assert_eq!(
        handle.commands(),
        vec![EngineCommand::Seek(Duration::ZERO), EngineCommand::Play]
    );
    // No Loading transition was emitted for the repeat
    assert!(!controller.drain_events().iter().any(|e| matches!(
        e,
        PlaybackEvent::StateChanged {
            state: PlaybackState::Loading
        }
    )));
}

#[test]
fn shuffle_with_repeat_none_keeps_playing() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    controller.set_shuffle(true);
    play_index(&mut controller, &handle, 2);

    for _ in 0..20 {
        let before = current_id(&controller);
        fire(&mut controller, &handle, EngineEvent::Ended);
        assert_eq!(controller.state(), PlaybackState::Loading);
        assert_ne!(current_id(&controller), before);
        fire(&mut controller, &handle, EngineEvent::Ready { duration: None });
    }
}

#[test]
fn ended_remote_track_continues_with_catalog() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    controller
        .select(remote_track("r1", SourceKind::RemotePlayable))
        .unwrap();
    fire(&mut controller, &handle, EngineEvent::Ready { duration: None });
    assert_eq!(controller.session().current_index, None);

    fire(&mut controller, &handle, EngineEvent::Ended);

    assert_eq!(current_id(&controller).as_deref(), Some("1"));
}

// ============================================================================
// UNPLAYABLE SOURCES
// ============================================================================

#[test]
fn unplayable_from_idle_stays_idle() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    let loads_before = handle.load_count();

    let err = controller
        .select(remote_track("yt", SourceKind::RemoteUnplayable))
        .unwrap_err();

    assert!(err.is_unsupported_source());
    assert_eq!(controller.state(), PlaybackState::Idle);
    assert!(controller.current_track().is_none());
    assert_eq!(handle.load_count(), loads_before);
}

#[test]
fn unplayable_while_playing_changes_nothing() {
    let (mut controller, handle) = abc_controller(RepeatMode::All);
    play_index(&mut controller, &handle, 0);
    let generation = controller.load_generation();
    handle.clear_commands();

    let err = controller
        .select(remote_track("yt", SourceKind::RemoteUnplayable))
        .unwrap_err();

    assert!(matches!(err, PlaybackError::UnsupportedSource { .. }));
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(current_id(&controller).as_deref(), Some("1"));
    assert_eq!(controller.load_generation(), generation);
    assert!(handle.commands().is_empty());

    // The playing track's events still count
    fire(&mut controller, &handle, EngineEvent::Ended);
    assert_eq!(current_id(&controller).as_deref(), Some("2"));
}

// ============================================================================
// STALE EVENTS
// ============================================================================

#[test]
fn reselect_while_loading_ignores_old_load() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    controller.select_index(0).unwrap();
    let first_load = handle.notifier(0).unwrap();

    controller.select_index(1).unwrap();

    // Slow response from track 1 arrives after track 2 was selected
    first_load.ready(Some(Duration::from_secs(999)));
    first_load.error("late failure");
    assert_eq!(controller.process_events(), 0);
    assert_eq!(controller.state(), PlaybackState::Loading);
    assert_eq!(current_id(&controller).as_deref(), Some("2"));
    assert_eq!(controller.session().duration, Duration::from_secs(200));

    fire(&mut controller, &handle, EngineEvent::Ready { duration: None });
    assert_eq!(controller.state(), PlaybackState::Playing);
}

#[test]
fn stale_position_never_leaks_into_new_track() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 0);
    let old = handle.latest_notifier().unwrap();

    controller.select_index(1).unwrap();
    old.position(Duration::from_secs(120));
    controller.process_events();

    assert_eq!(controller.session().position, Duration::ZERO);
}

#[test]
fn events_after_idle_are_dropped() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 2);
    let old = handle.latest_notifier().unwrap();
    fire(&mut controller, &handle, EngineEvent::Ended);
    assert_eq!(controller.state(), PlaybackState::Idle);

    old.position(Duration::from_secs(10));
    old.ready(None);
    controller.process_events();

    assert_eq!(controller.state(), PlaybackState::Idle);
    assert_eq!(controller.session().position, Duration::ZERO);
}

#[test]
fn handle_event_rejects_foreign_generation() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    controller.select_index(0).unwrap();
    let stale_generation = handle.notifier(0).unwrap().generation();
    controller.select_index(1).unwrap();

    let applied = controller.handle_event(StampedEvent {
        generation: stale_generation,
        event: EngineEvent::Ready { duration: None },
    });

    assert!(!applied);
    assert_eq!(controller.state(), PlaybackState::Loading);
}

// ============================================================================
// CLAMPING
// ============================================================================

#[test]
fn seek_and_volume_clamp() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 0);

    controller.seek(Duration::from_secs(500));
    assert_eq!(controller.session().position, Duration::from_secs(200));

    controller.set_volume(1.5);
    assert_eq!(controller.volume(), 1.0);

    controller.set_volume(-0.2);
    assert_eq!(controller.volume(), 0.0);
}

#[test]
fn select_resets_position() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    play_index(&mut controller, &handle, 0);
    controller.seek(Duration::from_secs(80));

    controller.select_index(1).unwrap();

    assert_eq!(controller.session().position, Duration::ZERO);
    assert!(!controller.session().is_playing);
}

#[test]
fn ui_events_follow_transitions() {
    let (mut controller, handle) = abc_controller(RepeatMode::Off);
    controller.select_index(0).unwrap();
    fire(&mut controller, &handle, EngineEvent::Ready { duration: None });

    let events = controller.drain_events();
    let states: Vec<PlaybackState> = events
        .iter()
        .filter_map(|e| match e {
            PlaybackEvent::StateChanged { state } => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![PlaybackState::Loading, PlaybackState::Playing]);
    assert!(events.iter().any(|e| matches!(
        e,
        PlaybackEvent::TrackChanged { track_id: Some(id), previous_track_id: None } if id == "1"
    )));
}
