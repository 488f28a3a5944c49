use crate::{MapError, Result};
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of an animation's progress over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationCurve {
    /// Symmetric ease-in/ease-out made of two quadratics meeting at `t = 0.5`
    Slide,
    /// Quartic ease-out: fast start with a long deceleration tail
    FastThenSlide,
}

impl AnimationCurve {
    /// Reshapes a linear fraction. Input is clamped to `[0, 1]`, so is the output.
    pub fn apply(&self, t: f64) -> f64 {
        if t.is_nan() {
            return 0.0;
        }
        let t = t.clamp(0.0, 1.0);
        let shaped = match self {
            AnimationCurve::Slide => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            AnimationCurve::FastThenSlide => 1.0 - (1.0 - t).powi(4),
        };
        shaped.clamp(0.0, 1.0)
    }
}

impl Default for AnimationCurve {
    fn default() -> Self {
        Self::Slide
    }
}

/// Progress clock for one view transition.
///
/// An animator is never cancelled in place; a new transition replaces it.
#[derive(Debug, Clone, Copy)]
pub struct Animator {
    start: Instant,
    duration: Duration,
    curve: AnimationCurve,
}

impl Animator {
    /// Starts an animation now
    pub fn new(duration_seconds: f64, curve: AnimationCurve) -> Result<Self> {
        Self::starting_at(Instant::now(), duration_seconds, curve)
    }

    /// Starts an animation at an explicit instant
    pub fn starting_at(start: Instant, duration_seconds: f64, curve: AnimationCurve) -> Result<Self> {
        if !(duration_seconds > 0.0) || !duration_seconds.is_finite() {
            return Err(MapError::OutOfRange {
                what: "animation duration",
                value: duration_seconds,
            });
        }
        Ok(Self {
            start,
            duration: Duration::from_secs_f64(duration_seconds),
            curve,
        })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn curve(&self) -> AnimationCurve {
        self.curve
    }

    /// Time since the start; an instant before the start counts as zero
    pub fn elapsed(&self, now: Instant) -> Duration {
        if now > self.start {
            now.duration_since(self.start)
        } else {
            Duration::ZERO
        }
    }

    /// Linear fraction `min(1, elapsed / duration)`
    pub fn linear_progress(&self, now: Instant) -> f64 {
        let fraction = self.elapsed(now).as_secs_f64() / self.duration.as_secs_f64();
        fraction.min(1.0)
    }

    /// Curve-shaped progress in `[0, 1]`
    pub fn progress(&self, now: Instant) -> f64 {
        self.curve.apply(self.linear_progress(now))
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.duration
    }
}
