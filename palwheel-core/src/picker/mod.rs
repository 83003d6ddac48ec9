//! # Screen picker
//!
//! Picking a color from anywhere on screen takes three phases per instance (see [`PickerPhase`]):
//! the pick button is pressed, that press is released, and then the next primary click anywhere
//! is sampled and committed. Right click or escape cancels.
//!
//! Clicks outside the host window are only visible to a process-wide input interceptor, which the
//! [`PickerBackend`] runs on a thread of its own. The interceptor never touches widget state: it only
//! writes a [`PickHandoff`], which the UI thread drains once per frame.

mod handoff;
mod preview;

pub use handoff::{Handoff, PendingPick, PickHandoff, PickTarget};
pub use preview::PreviewBitmap;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::{
    color::Rgb8,
    state::{InstanceKey, PickerPhase, StateStore},
};

/// A position in physical screen pixels.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}
impl ScreenPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    #[must_use]
    pub const fn offset(self, by: i32) -> Self {
        Self {
            x: self.x.saturating_add(by),
            y: self.y.saturating_add(by),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("screen picking is not supported on this platform")]
    Unsupported,
    #[error("failed to install input interceptor: {0}")]
    Hook(String),
    #[error("failed to create or update preview surface: {0}")]
    Preview(String),
    #[error("failed to read screen pixel at ({x}, {y})")]
    Sample { x: i32, y: i32 },
    #[error("cursor position unavailable")]
    Cursor,
    #[error("interceptor thread exited unexpectedly")]
    ThreadGone,
}

/// Read access to what's on screen. Shared with the interceptor thread.
pub trait PixelSource: Send + Sync {
    fn cursor_position(&self) -> Result<ScreenPoint, BackendError>;
    fn sample(&self, point: ScreenPoint) -> Result<Rgb8, BackendError>;
}

/// The platform half of the picker: the global interceptor and the preview surface.
pub trait PickerBackend: Send {
    /// Start intercepting input, feeding clicks into `handoff`, and show the preview.
    /// Only called while not installed.
    fn install(&mut self, handoff: Arc<PickHandoff>) -> Result<(), BackendError>;
    /// Stop intercepting and hide the preview. Must be fine to call when not installed.
    fn uninstall(&mut self);
    fn is_installed(&self) -> bool;
    /// Move the preview so its top left corner is at `top_left`, showing `bitmap`.
    fn update_preview(
        &mut self,
        top_left: ScreenPoint,
        bitmap: &PreviewBitmap,
    ) -> Result<(), BackendError>;
    fn pixels(&self) -> &dyn PixelSource;
    /// Whether clicks outside the host window reach the handoff while installed. When not, the
    /// host's own clicks pick the most recent preview sample instead.
    fn intercepts_clicks(&self) -> bool {
        true
    }
}

/// Lets something through at most once per interval.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}
impl Throttle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }
    /// Returns true, and restarts the interval, if at least one interval has passed since the
    /// last `true`.
    pub fn ready(&mut self, now: Instant) -> bool {
        let ready = self
            .last
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if ready {
            self.last = Some(now);
        }
        ready
    }
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// What the picker needs from the frame's input.
#[derive(Copy, Clone, Debug)]
pub struct PickInput {
    pub primary_down: bool,
    pub primary_pressed: bool,
    pub secondary_pressed: bool,
    pub cancel_pressed: bool,
    pub now: Instant,
}

/// A pick finished, and this RGB should go into `slot`, keeping the slot's alpha.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PickCommit {
    pub slot: usize,
    pub rgb: Rgb8,
}

/// Drives every instance's [`PickerPhase`] and owns the backend.
pub struct Picker {
    handoff: Arc<PickHandoff>,
    backend: Box<dyn PickerBackend>,
    throttle: Throttle,
    preview_offset: i32,
    /// Most recent preview sample, for hosts whose backend can't intercept clicks.
    last_sample: Option<Rgb8>,
    /// Install failures are warned about once per request, then retried quietly.
    install_warned: bool,
    /// Bumped on every request.
    generation: u64,
}
impl Picker {
    #[must_use]
    pub fn new(
        backend: Box<dyn PickerBackend>,
        sample_interval: Duration,
        preview_offset: i32,
    ) -> Self {
        Self {
            handoff: Arc::new(PickHandoff::new()),
            backend,
            throttle: Throttle::new(sample_interval),
            preview_offset,
            last_sample: None,
            install_warned: false,
            generation: 0,
        }
    }
    /// The cell shared with the interceptor.
    #[must_use]
    pub fn handoff(&self) -> &Arc<PickHandoff> {
        &self.handoff
    }
    #[must_use]
    pub fn backend(&self) -> &dyn PickerBackend {
        self.backend.as_ref()
    }
    #[must_use]
    pub fn last_sample(&self) -> Option<Rgb8> {
        self.last_sample
    }
    /// Begin picking into `slot` for `key`. The most recent request wins: any other instance's
    /// pick is cancelled.
    pub fn request(&mut self, states: &mut StateStore, key: &InstanceKey, slot: usize) {
        for (other, state) in states.iter_mut() {
            if other != key && !state.picker.is_idle() {
                log::debug!("pick for {other} superseded by {key}");
                state.picker = PickerPhase::Idle;
            }
        }
        self.handoff.disarm();
        self.handoff.clear();
        self.throttle.reset();
        self.last_sample = None;
        self.install_warned = false;
        self.generation = self.generation.wrapping_add(1);

        log::debug!("{key} waiting for release to pick slot {slot}");
        states.get_or_default(key).picker = PickerPhase::WaitingForRelease { slot };
        self.ensure_installed();
    }
    /// Abandon `key`'s pick without committing.
    pub fn cancel(&mut self, states: &mut StateStore, key: &InstanceKey) {
        let state = states.get_or_default(key);
        if state.picker.is_idle() {
            return;
        }
        log::debug!("{key} pick cancelled");
        state.picker = PickerPhase::Idle;
        self.handoff.disarm();
        let _ = self.handoff.take_for(key);
        self.release_if_unused(states);
    }
    /// Advance `key`'s pick by one frame. Returns a commit when a pick completed.
    ///
    /// Call [`Picker::release_if_unused`] afterwards once the state is settled.
    pub fn step(
        &mut self,
        states: &mut StateStore,
        key: &InstanceKey,
        input: &PickInput,
    ) -> Option<PickCommit> {
        let phase = states.get_or_default(key).picker;
        if phase.is_idle() {
            return None;
        }

        let handoff = self.handoff.take_for(key).filter(|handoff| {
            let target = handoff.target();
            let current = target.generation == self.generation && phase.slot() == Some(target.slot);
            if !current {
                log::debug!(
                    "{key} dropping stale pick result for slot {} (request {})",
                    target.slot,
                    target.generation
                );
            }
            current
        });
        match handoff {
            Some(Handoff::Captured(pick)) => {
                log::debug!("{key} picked {:?} at {:?}", pick.rgb, pick.point);
                states.get_or_default(key).picker = PickerPhase::Idle;
                return Some(PickCommit {
                    slot: pick.target.slot,
                    rgb: pick.rgb,
                });
            }
            Some(Handoff::Cancelled(_)) => {
                log::debug!("{key} pick cancelled by interceptor");
                states.get_or_default(key).picker = PickerPhase::Idle;
                return None;
            }
            None => (),
        }

        match phase {
            PickerPhase::Idle => None,
            PickerPhase::WaitingForRelease { slot } => {
                self.ensure_installed();
                if !input.primary_down {
                    log::debug!("{key} picking slot {slot}");
                    states.get_or_default(key).picker = PickerPhase::Active { slot };
                    self.handoff.arm(PickTarget {
                        key: key.clone(),
                        slot,
                        generation: self.generation,
                    });
                }
                None
            }
            PickerPhase::Active { slot } => {
                self.ensure_installed();
                if input.secondary_pressed || input.cancel_pressed {
                    log::debug!("{key} pick cancelled");
                    states.get_or_default(key).picker = PickerPhase::Idle;
                    self.handoff.disarm();
                    return None;
                }
                if self.throttle.ready(input.now) {
                    self.refresh_preview();
                }
                let intercepting = self.backend.is_installed() && self.backend.intercepts_clicks();
                if !intercepting && input.primary_pressed {
                    if let Some(rgb) = self.last_sample.or_else(|| self.sample_cursor()) {
                        log::debug!("{key} picked {rgb:?} from host click");
                        states.get_or_default(key).picker = PickerPhase::Idle;
                        self.handoff.disarm();
                        return Some(PickCommit { slot, rgb });
                    }
                }
                None
            }
        }
    }
    /// Tear down the interceptor and preview once no instance is picking anymore.
    pub fn release_if_unused(&mut self, states: &StateStore) {
        if states.any_picking() {
            return;
        }
        self.handoff.disarm();
        self.handoff.clear();
        if self.backend.is_installed() {
            log::debug!("no picks in progress, uninstalling interceptor");
            self.backend.uninstall();
        }
    }
    fn ensure_installed(&mut self) {
        if self.backend.is_installed() {
            return;
        }
        match self.backend.install(Arc::clone(&self.handoff)) {
            Ok(()) => log::debug!("picker interceptor installed"),
            Err(err) if !self.install_warned => {
                log::warn!("screen picker unavailable, will retry: {err}");
                self.install_warned = true;
            }
            Err(err) => log::trace!("picker install retry failed: {err}"),
        }
    }
    fn sample_cursor(&self) -> Option<Rgb8> {
        let pixels = self.backend.pixels();
        match pixels.cursor_position().and_then(|point| pixels.sample(point)) {
            Ok(rgb) => Some(rgb),
            Err(err) => {
                log::debug!("cursor sample failed: {err}");
                None
            }
        }
    }
    fn refresh_preview(&mut self) {
        let pixels = self.backend.pixels();
        let sampled = pixels
            .cursor_position()
            .and_then(|point| pixels.sample(point).map(|rgb| (point, rgb)));
        let (cursor, rgb) = match sampled {
            Ok(sampled) => sampled,
            Err(err) => {
                log::debug!("preview sample failed: {err}");
                return;
            }
        };
        self.last_sample = Some(rgb);
        if !self.backend.is_installed() {
            return;
        }
        let bitmap = PreviewBitmap::render(rgb);
        if let Err(err) = self
            .backend
            .update_preview(cursor.offset(self.preview_offset), &bitmap)
        {
            log::debug!("preview update failed: {err}");
        }
    }
}
