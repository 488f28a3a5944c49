use crate::animation::animator::{AnimationCurve, Animator};
use crate::animation::interpolation::Interpolation;
use crate::core::geo::WorldPoint;
use crate::Result;
use instant::Instant;

/// An animated pan of the view center from one point to another
#[derive(Debug, Clone, Copy)]
pub struct Slide {
    from: WorldPoint,
    to: WorldPoint,
    animator: Animator,
}

impl Slide {
    pub fn new(
        from: WorldPoint,
        to: WorldPoint,
        duration_seconds: f64,
        curve: AnimationCurve,
        now: Instant,
    ) -> Result<Self> {
        Ok(Self {
            from,
            to,
            animator: Animator::starting_at(now, duration_seconds, curve)?,
        })
    }

    pub fn from(&self) -> WorldPoint {
        self.from
    }

    pub fn to(&self) -> WorldPoint {
        self.to
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Center at `now`; lands exactly on the target once done
    pub fn position(&self, now: Instant) -> WorldPoint {
        Interpolation::between(&self.from, &self.to, self.animator.progress(now))
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.animator.is_done(now)
    }
}
