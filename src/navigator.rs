//! Inner frame side of the frame protocol.
//!
//! Pages inside the iframe never touch audio. They ask the outer shell to do
//! things by posting encoded `FrameMessage`s through a `FramePort`.

use crate::api::{Backend, PlaylistRef};
use crate::error::Result;
use crate::protocol::{self, FrameCommand, FrameMessage, QueueRequest, DEFAULT_PLAYLIST_NAME};
use std::cell::Cell;

/// Where encoded envelopes go. In the browser this is `window.top`.
pub trait FramePort {
    fn post(&self, envelope: &str) -> Result<()>;
}

pub struct InnerNavigator<P> {
    port: P,
    next_seq: Cell<u64>,
}

impl<P: FramePort> InnerNavigator<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            next_seq: Cell::new(1),
        }
    }

    /// Continue numbering from `first_seq`, e.g. a timestamp, so a freshly
    /// loaded page does not reuse numbers the shell has already seen.
    pub fn with_first_seq(port: P, first_seq: u64) -> Self {
        Self {
            port,
            next_seq: Cell::new(first_seq.max(1)),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    fn send(&self, command: FrameCommand) -> Result<()> {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let envelope = protocol::encode(&FrameMessage::with_seq(command, seq))?;
        self.port.post(&envelope)?;
        tracing::debug!("Posted frame message #{seq}");
        Ok(())
    }

    pub fn set_queue(
        &self,
        ids: Vec<String>,
        playlist_name: impl Into<String>,
        position: usize,
    ) -> Result<()> {
        self.send(FrameCommand::SetQueue(QueueRequest {
            playlist_name: playlist_name.into(),
            ids,
            position,
        }))
    }

    pub fn set_page_name(&self, name: impl Into<String>) -> Result<()> {
        self.send(FrameCommand::SetPageTitle(name.into()))
    }

    /// Fetch a playlist's tracks and queue them from `position`.
    pub async fn play_playlist<B: Backend>(
        &self,
        backend: &B,
        playlist_id: &str,
        playlist_name: &str,
        position: usize,
    ) -> Result<PlaylistRef> {
        let tracks = backend.playlist_tracks(playlist_id).await?;
        let playlist = PlaylistRef::from_tracks(playlist_name, &tracks);
        self.set_queue(playlist.track_ids.clone(), playlist.name.clone(), position)?;
        Ok(playlist)
    }

    pub fn play_individual_track(&self, track_id: impl Into<String>) -> Result<()> {
        self.set_queue(vec![track_id.into()], DEFAULT_PLAYLIST_NAME, 0)
    }

    pub fn send_iframe_to_page(&self, location: impl Into<String>) -> Result<()> {
        self.send(FrameCommand::Navigate(location.into()))
    }

    pub fn send_iframe_backwards(&self) -> Result<()> {
        self.send(FrameCommand::GoBack)
    }
}

/// Posts to the top-level window of the current tab.
#[cfg(target_arch = "wasm32")]
pub struct TopWindowPort {
    target_origin: String,
}

#[cfg(target_arch = "wasm32")]
impl TopWindowPort {
    /// Targets the page's own origin unless `target_origin` is given.
    pub fn new(target_origin: Option<String>) -> Self {
        let target_origin = target_origin
            .or_else(|| web_sys::window().and_then(|w| w.location().origin().ok()))
            .unwrap_or_else(|| "*".to_string());
        Self { target_origin }
    }
}

#[cfg(target_arch = "wasm32")]
impl FramePort for TopWindowPort {
    fn post(&self, envelope: &str) -> Result<()> {
        use crate::error::PlayerError;

        let top = web_sys::window()
            .and_then(|w| w.top().ok().flatten())
            .ok_or_else(|| PlayerError::protocol("no top-level window"))?;
        top.post_message(&wasm_bindgen::JsValue::from_str(envelope), &self.target_origin)
            .map_err(|err| PlayerError::protocol(format!("postMessage failed: {err:?}")))
    }
}

/// Outside the browser there is no parent frame; envelopes are only logged.
#[cfg(not(target_arch = "wasm32"))]
pub struct LoggingPort;

#[cfg(not(target_arch = "wasm32"))]
impl FramePort for LoggingPort {
    fn post(&self, envelope: &str) -> Result<()> {
        tracing::info!("Frame message (no parent frame): {envelope}");
        Ok(())
    }
}

/// First sequence number for a page loaded now: the millisecond clock times
/// 1000, so a later page starts above anything an earlier page sent.
pub fn page_first_seq() -> u64 {
    (chrono::Utc::now().timestamp_millis().max(0) as u64).saturating_mul(1000)
}
