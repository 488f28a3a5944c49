use crate::core::config::RedrawConfig;
use instant::Instant;
use serde::{Deserialize, Serialize};

/// What moved the view, which decides how long to wait before the
/// full-fidelity redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedrawReason {
    Scroll,
    Zoom,
    Drag,
    Resize,
}

/// Debounce for the full-fidelity redraw.
///
/// At most one redraw is pending; scheduling again replaces it.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    config: RedrawConfig,
    pending: Option<(Instant, RedrawReason)>,
}

impl RedrawScheduler {
    pub fn new(config: RedrawConfig) -> Self {
        Self {
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> &RedrawConfig {
        &self.config
    }

    /// (Re)arms the timer for `reason`, superseding any pending redraw
    pub fn schedule(&mut self, reason: RedrawReason, now: Instant) {
        let deadline = now + self.config.timeout(reason);
        if let Some((_, previous)) = self.pending.replace((deadline, reason)) {
            log::trace!("redraw for {:?} superseded by {:?}", previous, reason);
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(deadline, _)| deadline)
    }

    /// Fires once the deadline has passed, then disarms
    pub fn poll(&mut self, now: Instant) -> Option<RedrawReason> {
        match self.pending {
            Some((deadline, reason)) if now >= deadline => {
                self.pending = None;
                Some(reason)
            }
            _ => None,
        }
    }
}
