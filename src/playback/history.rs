//! Locations the inner frame has been sent to.

#[derive(Debug, Clone, PartialEq)]
pub struct FrameHistory {
    entries: Vec<String>,
}

impl FrameHistory {
    /// History always holds at least the home location.
    pub fn new(home: impl Into<String>) -> Self {
        Self {
            entries: vec![home.into()],
        }
    }

    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.push(location.into());
    }

    /// Drop the newest entry unless it is the only one, then return the
    /// location the frame should show.
    pub fn back(&mut self) -> &str {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
        self.current()
    }

    pub fn current(&self) -> &str {
        self.entries.last().map(String::as_str).unwrap_or_default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_with_one_entry_keeps_it() {
        let mut history = FrameHistory::new("iframe/home.php");
        assert_eq!(history.back(), "iframe/home.php");
        assert_eq!(history.entries(), ["iframe/home.php".to_string()]);
    }

    #[test]
    fn back_removes_exactly_the_last_entry() {
        let mut history = FrameHistory::new("home");
        history.push("albums");
        history.push("album?id=3");
        assert_eq!(history.back(), "albums");
        assert_eq!(history.len(), 2);
        assert_eq!(history.back(), "home");
        assert_eq!(history.back(), "home");
    }

    #[test]
    fn repeated_locations_are_kept() {
        let mut history = FrameHistory::new("home");
        history.push("home");
        assert_eq!(history.len(), 2);
    }
}
