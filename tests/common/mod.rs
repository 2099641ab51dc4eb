//! Shared fakes for the integration tests.
#![allow(dead_code)]

use chrono::Utc;
use graemes_music::api::{AudioPayload, Backend, LoadedTrack, Track};
use graemes_music::config::AppConfig;
use graemes_music::error::{PlayerError, Result};
use graemes_music::navigator::FramePort;
use graemes_music::playback::{AudioOutput, OuterController, PlayerUi, ToggleIcon};
use std::cell::RefCell;
use std::collections::HashMap;

// ===== UI =====

#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    Title(String),
    TrackDetails { title: String, playlist: String },
    Icon(ToggleIcon),
    Loading(bool),
    Progress(f64),
    Knob(bool),
    Navigate(String),
    HideOverlay,
    StartRefresh(u32),
    StopRefresh,
}

#[derive(Debug, Default)]
pub struct RecordingUi {
    pub calls: Vec<UiCall>,
}

impl RecordingUi {
    pub fn last_title(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::Title(title) => Some(title.as_str()),
            _ => None,
        })
    }

    pub fn last_progress(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|call| match call {
            UiCall::Progress(fraction) => Some(*fraction),
            _ => None,
        })
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                UiCall::Navigate(location) => Some(location.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn saw(&self, expected: &UiCall) -> bool {
        self.calls.iter().any(|call| call == expected)
    }
}

impl PlayerUi for RecordingUi {
    fn set_document_title(&mut self, title: &str) {
        self.calls.push(UiCall::Title(title.to_string()));
    }

    fn show_track_details(&mut self, title: &str, playlist_name: &str) {
        self.calls.push(UiCall::TrackDetails {
            title: title.to_string(),
            playlist: playlist_name.to_string(),
        });
    }

    fn set_toggle_icon(&mut self, icon: ToggleIcon) {
        self.calls.push(UiCall::Icon(icon));
    }

    fn set_loading(&mut self, loading: bool) {
        self.calls.push(UiCall::Loading(loading));
    }

    fn set_snake_progress(&mut self, fraction: f64) {
        self.calls.push(UiCall::Progress(fraction));
    }

    fn set_knob_active(&mut self, active: bool) {
        self.calls.push(UiCall::Knob(active));
    }

    fn navigate_frame(&mut self, location: &str) {
        self.calls.push(UiCall::Navigate(location.to_string()));
    }

    fn hide_overlay_menu(&mut self) {
        self.calls.push(UiCall::HideOverlay);
    }

    fn start_snake_refresh(&mut self, interval_ms: u32) {
        self.calls.push(UiCall::StartRefresh(interval_ms));
    }

    fn stop_snake_refresh(&mut self) {
        self.calls.push(UiCall::StopRefresh);
    }
}

// ===== Audio =====

/// Mimics an audio element without the event loop: callers report
/// play/pause back to the controller themselves.
#[derive(Debug)]
pub struct FakeAudio {
    pub bound: Option<AudioPayload>,
    pub paused: bool,
    pub current_time: f64,
    pub duration: f64,
    pub seeks: Vec<f64>,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub fail_bind: bool,
}

impl Default for FakeAudio {
    fn default() -> Self {
        Self {
            bound: None,
            paused: true,
            current_time: 0.0,
            duration: f64::NAN,
            seeks: Vec::new(),
            play_calls: 0,
            pause_calls: 0,
            fail_bind: false,
        }
    }
}

impl AudioOutput for FakeAudio {
    fn bind(&mut self, payload: &AudioPayload) -> Result<()> {
        if self.fail_bind {
            return Err(PlayerError::Audio("unsupported source".to_string()));
        }
        self.bound = Some(payload.clone());
        self.current_time = 0.0;
        Ok(())
    }

    fn play(&mut self) {
        self.play_calls += 1;
        self.paused = false;
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.paused = true;
    }

    fn seek(&mut self, seconds: f64) {
        self.seeks.push(seconds);
        self.current_time = seconds;
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

// ===== Backend =====

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub playlists: HashMap<String, Vec<Track>>,
    pub tracks: HashMap<String, Track>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn with_tracks(ids: &[&str]) -> Self {
        let mut backend = Self::default();
        for id in ids {
            backend.tracks.insert(id.to_string(), track(id));
        }
        backend
    }

    pub fn with_playlist(mut self, playlist_id: &str, ids: &[&str]) -> Self {
        let tracks = ids.iter().map(|id| track(id)).collect();
        self.playlists.insert(playlist_id.to_string(), tracks);
        self
    }
}

impl Backend for FakeBackend {
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        self.requests.borrow_mut().push(format!("playlist:{playlist_id}"));
        Ok(self.playlists.get(playlist_id).cloned().unwrap_or_default())
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        self.requests.borrow_mut().push(format!("track:{track_id}"));
        self.tracks
            .get(track_id)
            .cloned()
            .ok_or_else(|| PlayerError::TrackNotFound(track_id.to_string()))
    }

    async fn track_audio(&self, track_id: &str) -> Result<AudioPayload> {
        self.requests.borrow_mut().push(format!("audio:{track_id}"));
        if !self.tracks.contains_key(track_id) {
            return Err(PlayerError::network(
                format!("api/return_track_file.php?track_id={track_id}"),
                "HTTP 404 Not Found",
            ));
        }
        Ok(AudioPayload::new(track_id.as_bytes().to_vec(), Some("audio/ogg")))
    }
}

// ===== Frame port =====

#[derive(Debug, Default)]
pub struct RecordingPort {
    pub posted: RefCell<Vec<String>>,
}

impl FramePort for RecordingPort {
    fn post(&self, envelope: &str) -> Result<()> {
        self.posted.borrow_mut().push(envelope.to_string());
        Ok(())
    }
}

// ===== Helpers =====

pub type TestController = OuterController<RecordingUi, FakeAudio>;

pub fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {id}"),
        source: Some(format!("/music/{id}.mp3")),
    }
}

pub fn loaded(id: &str) -> LoadedTrack {
    LoadedTrack {
        track: track(id),
        audio: AudioPayload::new(id.as_bytes().to_vec(), Some("audio/mpeg")),
        loaded_at: Utc::now(),
    }
}

pub fn controller() -> TestController {
    let mut controller =
        OuterController::new(AppConfig::default(), RecordingUi::default(), FakeAudio::default());
    controller.start();
    controller
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
