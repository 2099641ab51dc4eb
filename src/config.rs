//! Runtime configuration for the player shell.
//!
//! Every field has a default so the shell runs on a bare page. A host page
//! can override any subset with a JSON document in
//! `<script type="application/json" id="player-config">`.

use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const CONFIG_ELEMENT_ID: &str = "player-config";

const MIN_REFRESH_MS: u32 = 5;
const MAX_REFRESH_MS: u32 = 1000;
const MIN_TIMEOUT_MS: u64 = 1_000;
const MAX_TIMEOUT_MS: u64 = 10 * 60 * 1000;

/// Ids of the host page elements the shell attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub skip_forwards: String,
    pub skip_backwards: String,
    pub toggle: String,
    pub track_data: String,
    pub snake: String,
    pub snake_slider: String,
    pub slider_circle: String,
    pub frame: String,
    pub overlay_menu: String,
    pub audio: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            skip_forwards: "skip_forwards".to_string(),
            skip_backwards: "skip_backwards".to_string(),
            toggle: "toggle".to_string(),
            track_data: "track_data".to_string(),
            snake: "player_snake".to_string(),
            snake_slider: "player_snake_slider".to_string(),
            slider_circle: "slide_circle".to_string(),
            frame: "content_frame".to_string(),
            overlay_menu: "large_menu_frame".to_string(),
            audio: "graemes-music-audio".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site_name: String,
    pub default_page_title: String,
    /// First entry of the frame history and the iframe's initial location.
    pub home_location: String,
    /// Prefix joined in front of `api/...` paths. Resolved against the page
    /// location in the browser, so it must be absolute on native targets.
    pub api_base: String,
    pub snake_refresh_ms: u32,
    pub request_timeout_ms: u64,
    pub play_icon: String,
    pub pause_icon: String,
    pub allow_foreign_origins: bool,
    pub elements: ElementIds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_name: "Graeme's Music".to_string(),
            default_page_title: "Home".to_string(),
            home_location: "iframe/home.php".to_string(),
            api_base: "/".to_string(),
            snake_refresh_ms: 10,
            request_timeout_ms: 30_000,
            play_icon: "assets/icons/icon.svg".to_string(),
            pause_icon: "assets/icons/icon_pause.svg".to_string(),
            allow_foreign_origins: false,
            elements: ElementIds::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_json::from_str(trimmed)?;
        Ok(config.validated())
    }

    pub fn validated(mut self) -> Self {
        self.snake_refresh_ms = self.snake_refresh_ms.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS);
        self.request_timeout_ms = self
            .request_timeout_ms
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        if self.home_location.trim().is_empty() {
            self.home_location = Self::default().home_location;
        }
        if !self.api_base.is_empty() && !self.api_base.ends_with('/') {
            self.api_base.push('/');
        }
        self
    }

    /// Read the host page's config element, falling back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn from_document() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|element| element.text_content());

        match raw {
            Some(raw) => Self::from_json(&raw).unwrap_or_else(|err| {
                tracing::error!("Ignoring #{CONFIG_ELEMENT_ID}: {err}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_document() -> Self {
        Self::default()
    }
}
