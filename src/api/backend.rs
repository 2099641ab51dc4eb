//! HTTP access to the music backend.
//!
//! The backend exposes two JSON queries on `api/get_tracks.php` and the raw
//! audio body on `api/return_track_file.php`.

use crate::api::models::*;
use crate::config::AppConfig;
use crate::error::{PlayerError, Result};
use once_cell::sync::Lazy;
use std::future::Future;
use std::time::Duration;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const TRACKS_ENDPOINT: &str = "api/get_tracks.php";
const TRACK_FILE_ENDPOINT: &str = "api/return_track_file.php";

/// Read operations the player needs from the backend.
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>>;
    async fn track(&self, track_id: &str) -> Result<Track>;
    async fn track_audio(&self, track_id: &str) -> Result<AudioPayload>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    api_root: String,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(api_root: impl Into<String>, timeout: Duration) -> Self {
        let mut api_root = api_root.into();
        if !api_root.ends_with('/') {
            api_root.push('/');
        }
        Self { api_root, timeout }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let root = resolve_api_root(&config.api_base)?;
        Ok(Self::new(
            root,
            Duration::from_millis(config.request_timeout_ms),
        ))
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn playlist_tracks_url(&self, playlist_id: &str) -> String {
        self.build_url(TRACKS_ENDPOINT, "playlist_id", playlist_id)
    }

    pub fn track_url(&self, track_id: &str) -> String {
        self.build_url(TRACKS_ENDPOINT, "track_id", track_id)
    }

    pub fn track_file_url(&self, track_id: &str) -> String {
        self.build_url(TRACK_FILE_ENDPOINT, "track_id", track_id)
    }

    fn build_url(&self, endpoint: &str, key: &str, value: &str) -> String {
        format!(
            "{}{}?{}={}",
            self.api_root,
            endpoint,
            key,
            urlencoding::encode(value.trim())
        )
    }

    /// Callers wrap the whole exchange, body included, in `with_timeout`.
    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        let response = HTTP_CLIENT
            .get(url)
            .send()
            .await
            .map_err(|e| PlayerError::network(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlayerError::network(url, format!("HTTP {status}")));
        }
        Ok(response)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let body = async {
            let response = self.get(url).await?;
            response
                .text()
                .await
                .map_err(|e| PlayerError::network(url, e))
        };
        with_timeout(body, self.timeout, url).await
    }
}

impl Backend for HttpBackend {
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let url = self.playlist_tracks_url(playlist_id);
        let body = self.get_text(&url).await?;
        tracing::debug!("Playlist {playlist_id} response: {} bytes", body.len());
        parse_track_list(&body)
    }

    async fn track(&self, track_id: &str) -> Result<Track> {
        let url = self.track_url(track_id);
        let body = self.get_text(&url).await?;
        parse_single_track(&body, track_id)
    }

    async fn track_audio(&self, track_id: &str) -> Result<AudioPayload> {
        let url = self.track_file_url(track_id);
        let download = async {
            let response = self.get(&url).await?;
            let mime = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .bytes()
                .await
                .map_err(|e| PlayerError::network(url.as_str(), e))?;
            Ok::<_, PlayerError>(AudioPayload::new(bytes.to_vec(), mime.as_deref()))
        };
        with_timeout(download, self.timeout, &url).await
    }
}

pub fn parse_track_list(body: &str) -> Result<Vec<Track>> {
    let response: TrackListResponse = serde_json::from_str(body)?;
    Ok(response.data)
}

pub fn parse_single_track(body: &str, track_id: &str) -> Result<Track> {
    parse_track_list(body)?
        .into_iter()
        .next()
        .ok_or_else(|| PlayerError::TrackNotFound(track_id.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn resolve_api_root(api_base: &str) -> Result<String> {
    let href = web_sys::window()
        .map(|w| w.location())
        .and_then(|location| location.href().ok())
        .ok_or_else(|| PlayerError::network(api_base, "page location unavailable"))?;
    let resolved = web_sys::Url::new_with_base(api_base, &href)
        .map_err(|_| PlayerError::network(api_base, "invalid api_base"))?;
    Ok(resolved.href())
}

#[cfg(not(target_arch = "wasm32"))]
fn resolve_api_root(api_base: &str) -> Result<String> {
    if api_base.starts_with("http://") || api_base.starts_with("https://") {
        Ok(api_base.to_string())
    } else {
        Err(PlayerError::network(
            api_base,
            "api_base must be an absolute URL outside the browser",
        ))
    }
}

#[cfg(target_arch = "wasm32")]
async fn with_timeout<T, F>(future: F, timeout: Duration, url: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    use futures_util::future::{select, Either};

    let millis = timeout.as_millis().min(u32::MAX as u128) as u32;
    let delay = gloo_timers::future::TimeoutFuture::new(millis);
    futures_util::pin_mut!(future);
    match select(future, delay).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(PlayerError::Timeout {
            url: url.to_string(),
            millis: millis as u64,
        }),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn with_timeout<T, F>(future: F, timeout: Duration, url: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| PlayerError::Timeout {
            url: url.to_string(),
            millis: timeout.as_millis() as u64,
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        HttpBackend::new("https://music.local", Duration::from_secs(5))
    }

    #[test]
    fn builds_backend_endpoint_urls() {
        let backend = backend();
        assert_eq!(
            backend.playlist_tracks_url("7"),
            "https://music.local/api/get_tracks.php?playlist_id=7"
        );
        assert_eq!(
            backend.track_url("12"),
            "https://music.local/api/get_tracks.php?track_id=12"
        );
        assert_eq!(
            backend.track_file_url("12"),
            "https://music.local/api/return_track_file.php?track_id=12"
        );
    }

    #[test]
    fn ids_are_url_encoded() {
        assert_eq!(
            backend().track_url("a b&c"),
            "https://music.local/api/get_tracks.php?track_id=a%20b%26c"
        );
    }

    #[test]
    fn relative_api_base_is_rejected_natively() {
        let config = AppConfig::default();
        assert!(matches!(
            HttpBackend::from_config(&config),
            Err(PlayerError::Network { .. })
        ));

        let config = AppConfig {
            api_base: "http://127.0.0.1:8080/music/".to_string(),
            ..AppConfig::default()
        };
        let backend = HttpBackend::from_config(&config).unwrap();
        assert_eq!(backend.api_root(), "http://127.0.0.1:8080/music/");
    }

    #[test]
    fn parses_track_lists() {
        let body = r#"{"data": [{"track_id": "1", "title": "One"}, {"track_id": 2, "title": "Two"}]}"#;
        let tracks = parse_track_list(body).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].id, "2");
        assert_eq!(tracks[1].title, "Two");
    }

    #[test]
    fn missing_data_is_an_empty_list() {
        assert!(parse_track_list("{}").unwrap().is_empty());
    }

    #[test]
    fn single_track_takes_the_first_entry() {
        let body = r#"{"data": [{"track_id": "5", "title": "Five"}]}"#;
        assert_eq!(parse_single_track(body, "5").unwrap().title, "Five");
    }

    #[test]
    fn empty_single_track_is_not_found() {
        let err = parse_single_track(r#"{"data": []}"#, "5").unwrap_err();
        assert!(matches!(err, PlayerError::TrackNotFound(id) if id == "5"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_track_list("<html>oops</html>").unwrap_err();
        assert!(matches!(err, PlayerError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let backend = HttpBackend::new("http://127.0.0.1:9", Duration::from_secs(5));
        let err = backend.track("1").await.unwrap_err();
        assert!(matches!(
            err,
            PlayerError::Network { .. } | PlayerError::Timeout { .. }
        ));
    }
}
