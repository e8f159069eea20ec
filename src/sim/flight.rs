//! Fly-to-HUD tween
//!
//! A collected pickup travels in a straight line from where it was picked up
//! to its HUD icon. The tween is plain data sampled against the frame clock;
//! cancelling it is dropping the record.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Linear position tween over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub from: Vec2,
    pub to: Vec2,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Flight {
    pub fn new(from: Vec2, to: Vec2, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Completion in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Current animated position
    pub fn position(&self, now_ms: f64) -> Vec2 {
        self.from.lerp(self.to, self.progress(now_ms))
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
