//! Player facade tests: settings, search picks and playback wiring.

use deck_playback::{
    EngineEvent, PlaybackError, PlaybackState, ScriptedEngine, ScriptedEngineHandle, SourceKind,
};
use deck_player::{Player, PlayerError, PlayerSettings};
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn player_with_server(server: &MockServer) -> (Player, ScriptedEngineHandle) {
    let mut settings = PlayerSettings::defaults().unwrap();
    settings.search.endpoint = format!("{}/api/musica/buscar", server.uri());

    let (engine, handle) = ScriptedEngine::new();
    let player = Player::new(settings, Box::new(engine)).unwrap();
    (player, handle)
}

async fn mount_mixed_results(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("query", "gnr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "stream-1",
                "title": "November Rain",
                "artist": "Guns N' Roses",
                "durationSeconds": 537,
                "streamUri": "https://cdn.example/november-rain.mp3"
            },
            {
                "videoId": "yt-2",
                "titulo": "Don't Cry",
                "artista": "Guns N' Roses",
                "url": "https://www.youtube.com/watch?v=yt-2"
            }
        ])))
        .mount(server)
        .await;
}

#[test]
fn test_new_rejects_invalid_settings() {
    let mut settings = PlayerSettings::defaults().unwrap();
    settings.search.endpoint = "not a url".to_string();
    let (engine, _handle) = ScriptedEngine::new();

    let result = Player::new(settings, Box::new(engine));

    assert!(matches!(result, Err(PlayerError::Search(_))));
}

#[tokio::test]
async fn test_plays_default_catalog() {
    let server = MockServer::start().await;
    let (mut player, handle) = player_with_server(&server).await;

    player.play_catalog_index(1).unwrap();
    handle.fire(EngineEvent::Ready { duration: None });
    player.process_events();

    let controller = player.controller();
    assert_eq!(controller.state(), PlaybackState::Playing);
    assert_eq!(controller.current_track().unwrap().title, "Patience");
    assert_eq!(controller.volume(), 0.7);
}

#[tokio::test]
async fn test_playable_search_result_is_selected() {
    let server = MockServer::start().await;
    mount_mixed_results(&server).await;
    let (mut player, handle) = player_with_server(&server).await;

    player.search("gnr").await.unwrap();
    player.play_search_result(0).unwrap();

    let track = player.controller().current_track().unwrap().clone();
    assert_eq!(track.id, "stream-1");
    assert_eq!(track.source_kind, SourceKind::RemotePlayable);
    assert_eq!(player.controller().state(), PlaybackState::Loading);
    assert_eq!(player.controller().session().current_index, None);
    assert_eq!(handle.load_count(), 1);
}

#[tokio::test]
async fn test_unplayable_search_result_is_refused() {
    let server = MockServer::start().await;
    mount_mixed_results(&server).await;
    let (mut player, handle) = player_with_server(&server).await;

    player.search("gnr").await.unwrap();
    let err = player.play_search_result(1).unwrap_err();

    assert!(err.is_unsupported_source());
    match err {
        PlayerError::Playback(PlaybackError::UnsupportedSource { uri, .. }) => {
            assert_eq!(uri, "https://www.youtube.com/watch?v=yt-2");
        }
        other => panic!("Expected UnsupportedSource, got {:?}", other),
    }
    assert_eq!(player.controller().state(), PlaybackState::Idle);
    assert_eq!(handle.load_count(), 0);
}

#[tokio::test]
async fn test_search_result_index_out_of_range() {
    let server = MockServer::start().await;
    let (mut player, _handle) = player_with_server(&server).await;

    let err = player.play_search_result(0).unwrap_err();

    assert!(matches!(
        err,
        PlayerError::Playback(PlaybackError::IndexOutOfBounds(0))
    ));
}

#[tokio::test]
async fn test_new_search_does_not_disturb_selected_track() {
    let server = MockServer::start().await;
    mount_mixed_results(&server).await;
    Mock::given(method("GET"))
        .and(query_param("query", "metallica"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let (mut player, handle) = player_with_server(&server).await;

    player.search("gnr").await.unwrap();
    player.play_search_result(0).unwrap();
    handle.fire(EngineEvent::Ready { duration: None });
    player.process_events();

    player.search("metallica").await.unwrap();

    assert!(player.search_results().is_empty());
    assert_eq!(player.controller().state(), PlaybackState::Playing);
    assert_eq!(player.controller().current_track().unwrap().id, "stream-1");
}
