//! Overlay fade animation

/// Which way the overlay is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// Toward fully opaque (hides the viewport)
    ToOpaque,
    /// Toward fully transparent (reveals the viewport)
    ToClear,
}

/// A time-boxed opacity ramp starting from whatever opacity the overlay had.
///
/// Times are in milliseconds on a monotonic frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    pub direction: FadeDirection,
    pub start_opacity: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl Fade {
    pub fn to_opaque(start_opacity: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            direction: FadeDirection::ToOpaque,
            start_opacity,
            start_ms,
            duration_ms,
        }
    }

    pub fn to_clear(start_opacity: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            direction: FadeDirection::ToClear,
            start_opacity,
            start_ms,
            duration_ms,
        }
    }

    /// Fraction of the duration elapsed, clamped to [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn opacity_at(&self, now_ms: f64) -> f32 {
        let p = self.progress(now_ms);
        match self.direction {
            FadeDirection::ToOpaque => self.start_opacity + p * (1.0 - self.start_opacity),
            FadeDirection::ToClear => self.start_opacity * (1.0 - p),
        }
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
