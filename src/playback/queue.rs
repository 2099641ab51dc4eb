//! The shell's playback queue.

use crate::error::{PlayerError, Result};
use crate::protocol::QueueRequest;

/// Ordered track ids slated for playback, the cursor into them and the name
/// the queue was started from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    ids: Vec<String>,
    cursor: usize,
    playlist_name: String,
}

impl Queue {
    /// Replace the whole queue. Nothing from the previous queue survives.
    pub fn replace(&mut self, request: QueueRequest) -> Result<()> {
        if request.position >= request.ids.len() {
            return Err(PlayerError::InvalidQueue {
                position: request.position,
                len: request.ids.len(),
            });
        }
        self.ids = request.ids;
        self.cursor = request.position;
        self.playlist_name = request.playlist_name;
        Ok(())
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.ids.get(self.cursor).map(String::as_str)
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.ids.len()
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0 && !self.ids.is_empty()
    }

    /// Move to the next entry. Leaves the cursor alone at the end.
    pub fn advance(&mut self) -> Option<&str> {
        if !self.has_next() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn retreat(&mut self) -> Option<&str> {
        if !self.has_previous() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }
}
