use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Track metadata as returned by `get_tracks.php`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    #[serde(alias = "track_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        alias = "file",
        alias = "file_location",
        alias = "location"
    )]
    pub source: Option<String>,
}

/// `{data: [...]}` wrapper used by every JSON endpoint.
#[derive(Debug, Deserialize)]
pub struct TrackListResponse {
    #[serde(default)]
    pub data: Vec<Track>,
}

/// An ordered list of track ids with the name the queue is shown under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistRef {
    pub name: String,
    pub track_ids: Vec<String>,
}

impl PlaylistRef {
    pub fn from_tracks(name: impl Into<String>, tracks: &[Track]) -> Self {
        Self {
            name: name.into(),
            track_ids: tracks.iter().map(|track| track.id.clone()).collect(),
        }
    }
}

/// Raw audio body returned by `return_track_file.php`.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, mime: Option<&str>) -> Self {
        let mime = mime
            .map(|value| value.split(';').next().unwrap_or(value).trim())
            .filter(|value| value.starts_with("audio/"))
            .unwrap_or(DEFAULT_AUDIO_MIME);
        Self {
            bytes,
            mime: mime.to_string(),
        }
    }
}

/// Everything needed to start playing one queue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTrack {
    pub track: Track,
    pub audio: AudioPayload,
    pub loaded_at: DateTime<Utc>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(text) => Ok(text.trim().to_string()),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_accepts_numeric_and_string_ids() {
        let numeric: Track = serde_json::from_str(r#"{"track_id": 12, "title": "A"}"#).unwrap();
        let text: Track = serde_json::from_str(r#"{"track_id": "13", "title": "B"}"#).unwrap();
        assert_eq!(numeric.id, "12");
        assert_eq!(text.id, "13");
    }

    #[test]
    fn track_rejects_object_ids() {
        let parsed = serde_json::from_str::<Track>(r#"{"track_id": {"x": 1}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn track_reads_source_aliases() {
        let track: Track =
            serde_json::from_str(r#"{"id": "4", "title": "C", "file_location": "a/b.mp3"}"#)
                .unwrap();
        assert_eq!(track.source.as_deref(), Some("a/b.mp3"));
    }

    #[test]
    fn payload_keeps_audio_mime_and_strips_parameters() {
        let payload = AudioPayload::new(vec![1, 2], Some("audio/ogg; codecs=vorbis"));
        assert_eq!(payload.mime, "audio/ogg");
        let fallback = AudioPayload::new(vec![], Some("text/html"));
        assert_eq!(fallback.mime, DEFAULT_AUDIO_MIME);
        assert_eq!(AudioPayload::new(vec![], None).mime, DEFAULT_AUDIO_MIME);
    }

    #[test]
    fn playlist_ref_keeps_backend_order() {
        let tracks = vec![
            Track { id: "9".into(), ..Default::default() },
            Track { id: "3".into(), ..Default::default() },
        ];
        let playlist = PlaylistRef::from_tracks("Mix", &tracks);
        assert_eq!(playlist.track_ids, vec!["9", "3"]);
    }
}
