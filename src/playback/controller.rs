//! The outer shell's controller.
//!
//! One controller exists per page. It owns the queue, the frame history and
//! the player state, and drives the injected UI and audio bindings. Loads are
//! split in two so no borrow of the controller is held across a network
//! await: `begin_load` hands out a `LoadTicket`, the caller runs
//! `load_track`, then passes the result to `finish_load`. Only the newest
//! ticket is honoured.

use crate::api::{LoadedTrack, Track};
use crate::config::AppConfig;
use crate::error::Result;
use crate::playback::binding::{AudioOutput, PlayerUi};
use crate::playback::history::FrameHistory;
use crate::playback::queue::Queue;
use crate::playback::snake::{progress_fraction, BarGeometry, SeekPlan, SnakeDrag};
use crate::playback::state::{PlayerState, ToggleIcon};
use crate::playback::title::compose_title;
use crate::protocol::{self, FrameCommand, QueueRequest, SequenceGate};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub track_id: String,
}

pub struct OuterController<U, A> {
    config: AppConfig,
    ui: U,
    audio: A,
    queue: Queue,
    history: FrameHistory,
    page_title: String,
    state: PlayerState,
    track: Option<Track>,
    loaded_at: Option<DateTime<Utc>>,
    generation: u64,
    gate: SequenceGate,
    drag: Option<SnakeDrag>,
}

impl<U: PlayerUi, A: AudioOutput> OuterController<U, A> {
    pub fn new(config: AppConfig, ui: U, audio: A) -> Self {
        let history = FrameHistory::new(config.home_location.clone());
        let page_title = config.default_page_title.clone();
        Self {
            config,
            ui,
            audio,
            queue: Queue::default(),
            history,
            page_title,
            state: PlayerState::Idle,
            track: None,
            loaded_at: None,
            generation: 0,
            gate: SequenceGate::default(),
            drag: None,
        }
    }

    /// Paint the initial title and toggle icon.
    pub fn start(&mut self) {
        self.ui.set_toggle_icon(ToggleIcon::Play);
        self.ui.set_snake_progress(0.0);
        self.refresh_title();
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn page_title(&self) -> &str {
        &self.page_title
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn document_title(&self) -> String {
        compose_title(
            self.track.as_ref().map(|track| track.title.as_str()),
            &self.page_title,
            &self.config.site_name,
            self.state.is_playing(),
        )
    }

    // ===== Frame messages =====

    /// Decode and apply a raw envelope posted by the inner frame.
    pub fn receive(&mut self, raw: &str) -> Result<Option<LoadTicket>> {
        let message = protocol::decode(raw)?;
        debug!("Received {:?} (seq {:?})", message.command.kind(), message.seq);
        if !self.gate.admit(&message) {
            debug!("Dropping stale {:?} message", message.command.kind());
            return Ok(None);
        }
        self.dispatch(message.command)
    }

    pub fn dispatch(&mut self, command: FrameCommand) -> Result<Option<LoadTicket>> {
        match command {
            FrameCommand::SetQueue(request) => self.set_queue(request),
            FrameCommand::SetPageTitle(title) => {
                self.set_page_title(title);
                Ok(None)
            }
            FrameCommand::Navigate(location) => {
                self.navigate(location);
                Ok(None)
            }
            FrameCommand::GoBack => {
                self.go_back();
                Ok(None)
            }
        }
    }

    pub fn set_queue(&mut self, request: QueueRequest) -> Result<Option<LoadTicket>> {
        info!(
            "Queue set from \"{}\": {} tracks starting at {}",
            request.playlist_name,
            request.ids.len(),
            request.position
        );
        self.queue.replace(request)?;
        Ok(self.begin_load())
    }

    pub fn set_page_title(&mut self, title: impl Into<String>) {
        self.page_title = title.into();
        self.refresh_title();
    }

    pub fn navigate(&mut self, location: impl Into<String>) {
        let location = location.into();
        debug!("Frame -> {location}");
        self.ui.navigate_frame(&location);
        self.history.push(location);
        self.ui.hide_overlay_menu();
    }

    pub fn go_back(&mut self) {
        let location = self.history.back().to_string();
        debug!("Frame back -> {location}");
        self.ui.navigate_frame(&location);
    }

    // ===== Loading =====

    /// Start loading the track under the cursor. Any load still in flight is
    /// superseded.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        let track_id = self.queue.current()?.to_string();
        self.generation += 1;
        self.state = PlayerState::Loading;
        self.ui.set_loading(true);
        info!("Loading track {track_id} (load #{})", self.generation);
        Some(LoadTicket {
            generation: self.generation,
            track_id,
        })
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<LoadedTrack>) -> Result<()> {
        if ticket.generation != self.generation {
            debug!(
                "Discarding load #{} for {}; #{} is newer",
                ticket.generation, ticket.track_id, self.generation
            );
            return Ok(());
        }
        self.ui.set_loading(false);

        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!("Loading track {} failed: {err}", ticket.track_id);
                self.settle_after_failed_load();
                return Err(err);
            }
        };

        if let Err(err) = self.audio.bind(&loaded.audio) {
            self.settle_after_failed_load();
            return Err(err);
        }

        self.ui
            .show_track_details(&loaded.track.title, self.queue.playlist_name());
        info!("Now loaded: {} ({})", loaded.track.title, loaded.track.id);
        self.track = Some(loaded.track);
        self.loaded_at = Some(loaded.loaded_at);
        self.audio.play();
        self.refresh_title();
        Ok(())
    }

    fn settle_after_failed_load(&mut self) {
        self.state = match (&self.track, self.audio.is_paused()) {
            (Some(_), false) => PlayerState::Playing,
            (Some(_), true) => PlayerState::Paused,
            (None, _) => PlayerState::Idle,
        };
        debug!("Player {} after failed load", self.state.label());
        self.refresh_title();
    }

    // ===== Transport =====

    /// Follows the element, not `state`, so the previous track can still be
    /// paused while the next one downloads.
    pub fn toggle(&mut self) {
        if !self.audio.is_paused() {
            self.audio.pause();
        } else if self.track.is_some() {
            self.audio.play();
        }
    }

    pub fn skip_forward(&mut self) -> Option<LoadTicket> {
        self.queue.advance()?;
        self.begin_load()
    }

    /// Previous entry, or back to the start of the only/first one.
    pub fn skip_backward(&mut self) -> Option<LoadTicket> {
        if self.queue.retreat().is_some() {
            return self.begin_load();
        }
        if self.track.is_some() {
            self.audio.seek(0.0);
            self.refresh_snake();
        }
        None
    }

    // ===== Audio element events =====

    pub fn on_play(&mut self) {
        debug!("Track playing");
        self.state = PlayerState::Playing;
        self.refresh_title();
        self.ui.set_toggle_icon(ToggleIcon::Pause);
        self.ui.start_snake_refresh(self.config.snake_refresh_ms);
    }

    pub fn on_pause(&mut self) {
        debug!("Track paused");
        if self.state != PlayerState::Loading {
            self.state = if self.track.is_some() {
                PlayerState::Paused
            } else {
                PlayerState::Idle
            };
        }
        self.refresh_title();
        self.ui.stop_snake_refresh();
        self.ui.set_toggle_icon(ToggleIcon::Play);
    }

    /// Returns a ticket when the queue moved on to another track. The cursor
    /// stays put while a load is in flight.
    pub fn on_ended(&mut self) -> Option<LoadTicket> {
        debug!("Track ended");
        self.ui.stop_snake_refresh();
        self.ui.set_snake_progress(0.0);
        if self.state == PlayerState::Loading {
            debug!("Previous track ended during a load; cursor kept");
            return None;
        }
        self.state = PlayerState::Idle;
        self.refresh_title();

        if self.queue.advance().is_some() {
            self.begin_load()
        } else {
            info!("Queue finished");
            None
        }
    }

    // ===== Snake =====

    pub fn refresh_snake(&mut self) {
        if self.drag.is_some() {
            return;
        }
        let fraction = progress_fraction(self.audio.current_time(), self.audio.duration());
        self.ui.set_snake_progress(fraction);
    }

    pub fn snake_press(&mut self) {
        let start = progress_fraction(self.audio.current_time(), self.audio.duration());
        let drag = SnakeDrag::begin(self.state.is_playing(), start);
        debug!("Snake drag started (resume after: {})", drag.resume_after());
        self.drag = Some(drag);
        self.ui.stop_snake_refresh();
        self.audio.pause();
        self.ui.set_knob_active(true);
    }

    pub fn snake_move(&mut self, x: f64, bar: BarGeometry) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if let Some(fraction) = drag.pointer_moved(x, bar) {
            self.ui.set_snake_progress(fraction);
        }
    }

    pub fn snake_release(&mut self, x: f64, bar: BarGeometry) -> Option<SeekPlan> {
        let drag = self.drag.take()?;
        let plan = drag.release(x, bar, self.audio.duration());
        debug!("Snake drag ended at {:.3} -> {:.2}s", plan.fraction, plan.seconds);
        self.ui.set_knob_active(false);
        self.ui.set_snake_progress(plan.fraction);
        self.audio.seek(plan.seconds);
        if plan.resume {
            self.audio.play();
        }
        Some(plan)
    }

    fn refresh_title(&mut self) {
        let title = self.document_title();
        self.ui.set_document_title(&title);
    }
}
