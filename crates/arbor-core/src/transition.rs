//! Asset transition state machine
//!
//! Drives the overlay through fade-to-opaque, asset swap and fade-to-clear.
//! The renderer feeds it frame times and reports when the new asset has been
//! placed (or failed); the driver tells the renderer when to swap and when the
//! whole transition is over. Only one transition runs at a time.

use thiserror::Error;

use crate::fade::Fade;

/// Default overlay fade duration in milliseconds
pub const DEFAULT_FADE_MS: f64 = 300.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetLoadError {
    #[error("failed to load asset {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("scene controller is busy with another transition")]
    Busy,
    #[error("scene controller dropped the load request")]
    Dropped,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("a transition to {current} is already in progress")]
    Busy { current: String },
}

/// Coarse phase, for logging and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    FadingIn,
    Loading,
    FadingOut,
}

/// Instructions for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The overlay is opaque: remove the previous asset and start fetching `path`
    Swap { path: String },
    /// The overlay has cleared again
    Finished {
        path: String,
        result: Result<(), AssetLoadError>,
    },
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    FadingIn {
        path: String,
        fade: Fade,
    },
    Loading {
        path: String,
    },
    FadingOut {
        path: String,
        fade: Fade,
        result: Result<(), AssetLoadError>,
    },
}

#[derive(Debug, Clone)]
pub struct TransitionDriver {
    fade_ms: f64,
    opacity: f32,
    state: State,
}

impl Default for TransitionDriver {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_MS)
    }
}

impl TransitionDriver {
    pub fn new(fade_ms: f64) -> Self {
        Self {
            fade_ms: fade_ms.max(0.0),
            opacity: 0.0,
            state: State::Idle,
        }
    }

    /// Current overlay opacity in [0, 1]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state {
            State::Idle => TransitionPhase::Idle,
            State::FadingIn { .. } => TransitionPhase::FadingIn,
            State::Loading { .. } => TransitionPhase::Loading,
            State::FadingOut { .. } => TransitionPhase::FadingOut,
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Asset path of the transition in progress
    pub fn current_path(&self) -> Option<&str> {
        match &self.state {
            State::Idle => None,
            State::FadingIn { path, .. }
            | State::Loading { path }
            | State::FadingOut { path, .. } => Some(path),
        }
    }

    /// Start a transition toward `path`; rejected while another is running
    pub fn begin(&mut self, path: impl Into<String>, now_ms: f64) -> Result<(), TransitionError> {
        if let Some(current) = self.current_path() {
            return Err(TransitionError::Busy {
                current: current.to_string(),
            });
        }

        let path = path.into();
        tracing::debug!(path = %path, "Transition started");
        self.state = State::FadingIn {
            path,
            fade: Fade::to_opaque(self.opacity, now_ms, self.fade_ms),
        };
        Ok(())
    }

    /// Advance the overlay animation to `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> Option<TransitionEvent> {
        match &self.state {
            State::Idle | State::Loading { .. } => None,
            State::FadingIn { path, fade } => {
                self.opacity = fade.opacity_at(now_ms);
                if !fade.is_finished(now_ms) {
                    return None;
                }
                let path = path.clone();
                self.state = State::Loading { path: path.clone() };
                Some(TransitionEvent::Swap { path })
            }
            State::FadingOut { fade, .. } => {
                self.opacity = fade.opacity_at(now_ms);
                if !fade.is_finished(now_ms) {
                    return None;
                }
                match std::mem::replace(&mut self.state, State::Idle) {
                    State::FadingOut { path, result, .. } => {
                        tracing::debug!(path = %path, ok = result.is_ok(), "Transition finished");
                        Some(TransitionEvent::Finished { path, result })
                    }
                    _ => None,
                }
            }
        }
    }

    /// The new asset is in place; start revealing it
    pub fn asset_ready(&mut self, now_ms: f64) -> bool {
        self.finish_loading(Ok(()), now_ms)
    }

    /// The fetch failed; the overlay is still cleared before reporting
    pub fn asset_failed(&mut self, error: AssetLoadError, now_ms: f64) -> bool {
        self.finish_loading(Err(error), now_ms)
    }

    fn finish_loading(&mut self, result: Result<(), AssetLoadError>, now_ms: f64) -> bool {
        let path = match &self.state {
            State::Loading { path } => path.clone(),
            _ => {
                tracing::warn!(phase = ?self.phase(), "Load result reported outside of loading phase");
                return false;
            }
        };

        self.state = State::FadingOut {
            path,
            fade: Fade::to_clear(self.opacity, now_ms, self.fade_ms),
            result,
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_swap(driver: &mut TransitionDriver, start: f64) -> (f64, String) {
        let mut now = start;
        loop {
            now += 16.0;
            if let Some(TransitionEvent::Swap { path }) = driver.tick(now) {
                return (now, path);
            }
            assert!(now < start + 10_000.0, "swap never happened");
        }
    }

    fn run_until_finished(
        driver: &mut TransitionDriver,
        start: f64,
    ) -> (f64, Result<(), AssetLoadError>) {
        let mut now = start;
        loop {
            now += 16.0;
            if let Some(TransitionEvent::Finished { result, .. }) = driver.tick(now) {
                return (now, result);
            }
            assert!(now < start + 10_000.0, "transition never finished");
        }
    }

    #[test]
    fn test_successful_transition_ordering() {
        let mut driver = TransitionDriver::default();
        driver.begin("models/a.glb", 0.0).unwrap();
        assert_eq!(driver.phase(), TransitionPhase::FadingIn);

        // Opacity climbs monotonically until the swap
        let mut last = driver.opacity();
        for t in [50.0, 100.0, 200.0] {
            assert!(driver.tick(t).is_none());
            assert!(driver.opacity() >= last);
            last = driver.opacity();
        }

        let (swap_at, path) = run_until_swap(&mut driver, 200.0);
        assert!(swap_at >= 300.0);
        assert_eq!(path, "models/a.glb");
        assert_eq!(driver.opacity(), 1.0);
        assert_eq!(driver.phase(), TransitionPhase::Loading);

        // Nothing happens while the asset loads
        assert!(driver.tick(swap_at + 5_000.0).is_none());
        assert_eq!(driver.opacity(), 1.0);

        let ready_at = swap_at + 5_000.0;
        assert!(driver.asset_ready(ready_at));
        let (done_at, result) = run_until_finished(&mut driver, ready_at);
        assert!(done_at >= ready_at + 300.0);
        assert_eq!(result, Ok(()));
        assert_eq!(driver.opacity(), 0.0);
        assert!(!driver.is_busy());
    }

    #[test]
    fn test_failed_load_still_clears_overlay() {
        let mut driver = TransitionDriver::new(300.0);
        driver.begin("models/missing.glb", 0.0).unwrap();
        let (swap_at, _) = run_until_swap(&mut driver, 0.0);

        let error = AssetLoadError::Fetch {
            path: "models/missing.glb".to_string(),
            reason: "404".to_string(),
        };
        assert!(driver.asset_failed(error.clone(), swap_at));
        assert_eq!(driver.opacity(), 1.0);

        let (_, result) = run_until_finished(&mut driver, swap_at);
        assert_eq!(result, Err(error));
        assert_eq!(driver.opacity(), 0.0);
    }

    #[test]
    fn test_begin_while_busy_is_rejected() {
        let mut driver = TransitionDriver::default();
        driver.begin("models/a.glb", 0.0).unwrap();
        let err = driver.begin("models/b.glb", 10.0).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Busy {
                current: "models/a.glb".to_string()
            }
        );
        assert_eq!(driver.current_path(), Some("models/a.glb"));
    }

    #[test]
    fn test_ready_outside_loading_is_ignored() {
        let mut driver = TransitionDriver::default();
        assert!(!driver.asset_ready(0.0));

        driver.begin("models/a.glb", 0.0).unwrap();
        // Still fading in
        assert!(!driver.asset_ready(100.0));
        assert_eq!(driver.phase(), TransitionPhase::FadingIn);
    }

    #[test]
    fn test_zero_duration_swaps_on_first_tick() {
        let mut driver = TransitionDriver::new(0.0);
        driver.begin("models/a.glb", 42.0).unwrap();
        assert_eq!(
            driver.tick(42.0),
            Some(TransitionEvent::Swap {
                path: "models/a.glb".to_string()
            })
        );
        driver.asset_ready(42.0);
        assert!(matches!(
            driver.tick(42.0),
            Some(TransitionEvent::Finished { result: Ok(()), .. })
        ));
    }

    #[test]
    fn test_back_to_back_transitions() {
        let mut driver = TransitionDriver::default();
        for (i, path) in ["a.glb", "b.glb", "c.glb"].iter().enumerate() {
            let start = i as f64 * 10_000.0;
            driver.begin(*path, start).unwrap();
            let (swap_at, swapped) = run_until_swap(&mut driver, start);
            assert_eq!(swapped, *path);
            driver.asset_ready(swap_at);
            let (_, result) = run_until_finished(&mut driver, swap_at);
            assert!(result.is_ok());
        }
    }
}
