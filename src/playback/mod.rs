//! Playback state for the outer shell: queue, frame history, the player
//! state machine and the snake scrubber.

pub mod binding;
pub mod controller;
pub mod history;
pub mod loader;
pub mod queue;
pub mod snake;
pub mod state;
pub mod title;

pub use binding::{AudioOutput, PlayerUi};
pub use controller::{LoadTicket, OuterController};
pub use history::FrameHistory;
pub use loader::load_track;
pub use queue::Queue;
pub use snake::{progress_fraction, BarGeometry, SeekPlan, SnakeDrag};
pub use state::{PlayerState, ToggleIcon};
pub use title::compose_title;
