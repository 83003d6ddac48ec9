//! The one piece of state shared with the input interceptor's thread.
//!
//! Two independent slots, each behind its own lock. No code path holds both at once, and neither
//! is held while sampling the screen.

use parking_lot::Mutex;

use super::{PixelSource, ScreenPoint};
use crate::{color::Rgb8, state::InstanceKey};

/// Which instance and slot a pick lands in.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PickTarget {
    pub key: InstanceKey,
    pub slot: usize,
    /// Which request armed this. A result from an older request is stale.
    pub generation: u64,
}

/// A click captured by the interceptor, waiting for the UI thread.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PendingPick {
    pub target: PickTarget,
    pub point: ScreenPoint,
    pub rgb: Rgb8,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Handoff {
    Captured(PendingPick),
    /// Cancelled from outside the host window, by right click or escape.
    Cancelled(PickTarget),
}
impl Handoff {
    #[must_use]
    pub fn target(&self) -> &PickTarget {
        match self {
            Self::Captured(pick) => &pick.target,
            Self::Cancelled(target) => target,
        }
    }
}

#[derive(Default, Debug)]
pub struct PickHandoff {
    /// Set while clicks should be captured. Taken by whichever of capture or cancel wins.
    armed: Mutex<Option<PickTarget>>,
    pending: Mutex<Option<Handoff>>,
}
impl PickHandoff {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Start capturing clicks into `target`, replacing any previous target.
    pub fn arm(&self, target: PickTarget) {
        log::debug!("armed pick for {} slot {}", target.key, target.slot);
        *self.armed.lock() = Some(target);
    }
    pub fn disarm(&self) {
        self.armed.lock().take();
    }
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.lock().is_some()
    }
    /// Interceptor side of a primary click at `point`.
    ///
    /// Returns `true` if the click belongs to the picker and must not reach anything else.
    pub fn capture(&self, point: ScreenPoint, pixels: &dyn PixelSource) -> bool {
        let Some(target) = self.armed.lock().take() else {
            return false;
        };
        // Lock released, sampling may take a while.
        match pixels.sample(point) {
            Ok(rgb) => {
                *self.pending.lock() = Some(Handoff::Captured(PendingPick { target, point, rgb }));
            }
            Err(err) => {
                log::debug!("pick sample failed, staying armed: {err}");
                let mut armed = self.armed.lock();
                // Don't clobber a target armed while we were sampling.
                if armed.is_none() {
                    *armed = Some(target);
                }
            }
        }
        true
    }
    /// Interceptor side of a right click or escape. Returns `true` if it should be swallowed.
    pub fn cancel(&self) -> bool {
        let Some(target) = self.armed.lock().take() else {
            return false;
        };
        *self.pending.lock() = Some(Handoff::Cancelled(target));
        true
    }
    /// Take the pending handoff if it belongs to `key`. Exactly one caller ever sees it.
    pub fn take_for(&self, key: &InstanceKey) -> Option<Handoff> {
        let mut pending = self.pending.lock();
        if pending
            .as_ref()
            .is_some_and(|handoff| &handoff.target().key == key)
        {
            pending.take()
        } else {
            None
        }
    }
    /// Drop anything pending, for any instance.
    pub fn clear(&self) {
        self.pending.lock().take();
    }
}
