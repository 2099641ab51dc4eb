//! Seams between the playback controller and whatever hosts it.
//!
//! The browser implementations live in `components::dom`; tests use
//! recording fakes.

use crate::api::AudioPayload;
use crate::error::Result;
use crate::playback::state::ToggleIcon;

pub trait PlayerUi {
    fn set_document_title(&mut self, title: &str);
    fn show_track_details(&mut self, title: &str, playlist_name: &str);
    fn set_toggle_icon(&mut self, icon: ToggleIcon);
    /// Spin the toggle while a track downloads.
    fn set_loading(&mut self, loading: bool);
    fn set_snake_progress(&mut self, fraction: f64);
    fn set_knob_active(&mut self, active: bool);
    fn navigate_frame(&mut self, location: &str);
    fn hide_overlay_menu(&mut self);
    fn start_snake_refresh(&mut self, interval_ms: u32);
    fn stop_snake_refresh(&mut self);
}

/// The single audio element. Play/pause/end are reported back through the
/// controller's `on_play`, `on_pause` and `on_ended`.
pub trait AudioOutput {
    fn bind(&mut self, payload: &AudioPayload) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn current_time(&self) -> f64;
    /// NaN until metadata is available.
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
}
