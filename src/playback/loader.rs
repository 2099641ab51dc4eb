use crate::api::{Backend, LoadedTrack};
use crate::error::Result;
use crate::playback::controller::LoadTicket;
use chrono::Utc;

/// Fetch metadata, then the audio body, for a ticket from `begin_load`.
pub async fn load_track<B: Backend>(backend: &B, ticket: &LoadTicket) -> Result<LoadedTrack> {
    tracing::debug!("Fetching track {} (load #{})", ticket.track_id, ticket.generation);
    let track = backend.track(&ticket.track_id).await?;
    let audio = backend.track_audio(&ticket.track_id).await?;
    tracing::debug!(
        "Track {} downloaded: {} bytes of {}",
        ticket.track_id,
        audio.bytes.len(),
        audio.mime
    );
    Ok(LoadedTrack {
        track,
        audio,
        loaded_at: Utc::now(),
    })
}
