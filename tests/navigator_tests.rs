//! Inner navigator integration tests
//!
//! Everything the navigator posts must decode into the command the shell
//! expects, and must drive a real controller end to end.

mod common;

use common::*;
use graemes_music::error::PlayerError;
use graemes_music::navigator::InnerNavigator;
use graemes_music::playback::PlayerState;
use graemes_music::protocol::{decode, FrameCommand, QueueRequest, DEFAULT_PLAYLIST_NAME};

fn posted(navigator: &InnerNavigator<RecordingPort>) -> Vec<String> {
    navigator.port().posted.borrow().clone()
}

#[test]
fn set_queue_posts_a_type_one_envelope() {
    let navigator = InnerNavigator::new(RecordingPort::default());
    navigator.set_queue(ids(&["3", "9"]), "Evening", 1).unwrap();

    let envelopes = posted(&navigator);
    assert_eq!(envelopes.len(), 1);
    let raw: serde_json::Value = serde_json::from_str(&envelopes[0]).unwrap();
    assert_eq!(raw["command_type"], 1);
    assert_eq!(raw["data"]["ids"], serde_json::json!(["3", "9"]));

    let message = decode(&envelopes[0]).unwrap();
    assert_eq!(message.seq, Some(1));
    assert_eq!(
        message.command,
        FrameCommand::SetQueue(QueueRequest {
            playlist_name: "Evening".to_string(),
            ids: ids(&["3", "9"]),
            position: 1,
        })
    );
}

#[test]
fn each_command_maps_to_its_type() {
    let navigator = InnerNavigator::new(RecordingPort::default());
    navigator.set_page_name("Albums").unwrap();
    navigator.send_iframe_to_page("iframe/albums.php").unwrap();
    navigator.send_iframe_backwards().unwrap();

    let commands: Vec<FrameCommand> = posted(&navigator)
        .iter()
        .map(|raw| decode(raw).unwrap().command)
        .collect();
    assert_eq!(
        commands,
        vec![
            FrameCommand::SetPageTitle("Albums".to_string()),
            FrameCommand::Navigate("iframe/albums.php".to_string()),
            FrameCommand::GoBack,
        ]
    );
}

#[test]
fn sequence_numbers_increase_from_the_first_seq() {
    let navigator = InnerNavigator::with_first_seq(RecordingPort::default(), 1_000);
    navigator.set_page_name("One").unwrap();
    navigator.set_page_name("Two").unwrap();

    let seqs: Vec<Option<u64>> = posted(&navigator)
        .iter()
        .map(|raw| decode(raw).unwrap().seq)
        .collect();
    assert_eq!(seqs, vec![Some(1_000), Some(1_001)]);
}

#[test]
fn individual_track_queues_a_single_entry() {
    let navigator = InnerNavigator::new(RecordingPort::default());
    navigator.play_individual_track("42").unwrap();

    let message = decode(&posted(&navigator)[0]).unwrap();
    assert_eq!(
        message.command,
        FrameCommand::SetQueue(QueueRequest {
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            ids: ids(&["42"]),
            position: 0,
        })
    );
}

#[tokio::test]
async fn play_playlist_fetches_and_queues() {
    let backend = FakeBackend::with_tracks(&["a", "b", "c"]).with_playlist("7", &["a", "b", "c"]);
    let navigator = InnerNavigator::new(RecordingPort::default());

    let playlist = navigator
        .play_playlist(&backend, "7", "Road Trip", 2)
        .await
        .unwrap();

    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.track_ids, ids(&["a", "b", "c"]));
    assert_eq!(*backend.requests.borrow(), vec!["playlist:7"]);
    match decode(&posted(&navigator)[0]).unwrap().command {
        FrameCommand::SetQueue(request) => {
            assert_eq!(request.position, 2);
            assert_eq!(request.ids, ids(&["a", "b", "c"]));
        }
        other => panic!("expected a set-queue command, got {other:?}"),
    }
}

#[tokio::test]
async fn navigator_drives_the_controller_end_to_end() {
    let backend = FakeBackend::with_tracks(&["a", "b"]).with_playlist("1", &["a", "b"]);
    let navigator = InnerNavigator::new(RecordingPort::default());
    let mut ctrl = controller();

    navigator.set_page_name("Road Trip").unwrap();
    navigator
        .play_playlist(&backend, "1", "Road Trip", 0)
        .await
        .unwrap();

    let mut ticket = None;
    for raw in posted(&navigator) {
        if let Some(next) = ctrl.receive(&raw).unwrap() {
            ticket = Some(next);
        }
    }
    let ticket = ticket.expect("set-queue should start a load");
    let result = graemes_music::playback::load_track(&backend, &ticket).await;
    ctrl.finish_load(ticket, result).unwrap();
    ctrl.on_play();

    assert_eq!(ctrl.state(), PlayerState::Playing);
    assert_eq!(
        ctrl.document_title(),
        "🎵 Song a - Road Trip - Graeme's Music"
    );
}

#[tokio::test]
async fn unknown_playlist_queues_nothing_the_shell_accepts() {
    let backend = FakeBackend::default();
    let navigator = InnerNavigator::new(RecordingPort::default());
    let playlist = navigator
        .play_playlist(&backend, "404", "Gone", 0)
        .await
        .unwrap();
    assert!(playlist.track_ids.is_empty());

    let mut ctrl = controller();
    let err = ctrl.receive(&posted(&navigator)[0]).unwrap_err();
    assert!(matches!(err, PlayerError::InvalidQueue { len: 0, .. }));
}
