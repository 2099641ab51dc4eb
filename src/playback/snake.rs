//! The "snake" progress bar and its drag-to-seek gesture.

/// Horizontal extent of the bar in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

impl BarGeometry {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn contains(&self, x: f64) -> bool {
        self.width > 0.0 && x >= self.left && x <= self.left + self.width
    }

    /// Fraction of the bar left of `x`, or `None` outside the bar.
    pub fn fraction_at(&self, x: f64) -> Option<f64> {
        self.contains(x)
            .then(|| ((x - self.left) / self.width).clamp(0.0, 1.0))
    }
}

/// Filled fraction for a playback position. Zero until the duration is known.
pub fn progress_fraction(current_time: f64, duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 || !current_time.is_finite() {
        return 0.0;
    }
    (current_time / duration).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekPlan {
    pub seconds: f64,
    pub fraction: f64,
    pub resume: bool,
}

/// An in-progress press-drag-release over the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeDrag {
    resume_after: bool,
    fraction: f64,
}

impl SnakeDrag {
    pub fn begin(was_playing: bool, start_fraction: f64) -> Self {
        Self {
            resume_after: was_playing,
            fraction: start_fraction.clamp(0.0, 1.0),
        }
    }

    pub fn resume_after(&self) -> bool {
        self.resume_after
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Track the pointer while it stays over the bar.
    pub fn pointer_moved(&mut self, x: f64, bar: BarGeometry) -> Option<f64> {
        let fraction = bar.fraction_at(x)?;
        self.fraction = fraction;
        Some(fraction)
    }

    /// Releasing outside the bar keeps the last in-bounds position.
    pub fn release(self, x: f64, bar: BarGeometry, duration: f64) -> SeekPlan {
        let fraction = bar.fraction_at(x).unwrap_or(self.fraction);
        let seconds = if duration.is_finite() && duration > 0.0 {
            duration * fraction
        } else {
            0.0
        };
        SeekPlan {
            seconds,
            fraction,
            resume: self.resume_after,
        }
    }
}
