//! The components module contains the outer shell and the built-in frame pages.

mod app;
#[cfg(target_arch = "wasm32")]
pub mod dom;
mod player;
mod playlist_frame;
mod shell;

pub use app::*;
pub use player::*;
pub use playlist_frame::*;
pub use shell::*;
