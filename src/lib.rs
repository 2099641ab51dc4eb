//! Two-frame web music player: an outer shell that owns audio playback and an
//! inner iframe that browses music and drives the shell with posted messages.

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod navigator;
pub mod playback;
pub mod protocol;
