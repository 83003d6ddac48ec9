//! Platforms without a screen picking implementation.

use std::sync::Arc;

use palwheel_core::{
    color::Rgb8,
    picker::{BackendError, PickHandoff, PickerBackend, PixelSource, PreviewBitmap, ScreenPoint},
};

#[derive(Default, Debug)]
pub struct NoPixels;
impl PixelSource for NoPixels {
    fn cursor_position(&self) -> Result<ScreenPoint, BackendError> {
        Err(BackendError::Unsupported)
    }
    fn sample(&self, _: ScreenPoint) -> Result<Rgb8, BackendError> {
        Err(BackendError::Unsupported)
    }
}

/// Never installs. Picks requested through it stay active until cancelled, committing nothing.
#[derive(Default, Debug)]
pub struct UnsupportedBackend {
    pixels: NoPixels,
}
impl PickerBackend for UnsupportedBackend {
    fn install(&mut self, _: Arc<PickHandoff>) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }
    fn uninstall(&mut self) {}
    fn is_installed(&self) -> bool {
        false
    }
    fn update_preview(&mut self, _: ScreenPoint, _: &PreviewBitmap) -> Result<(), BackendError> {
        Err(BackendError::Unsupported)
    }
    fn pixels(&self) -> &dyn PixelSource {
        &self.pixels
    }
    fn intercepts_clicks(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use palwheel_core::{
        palette::InMemoryPalette, state::PickerPhase, Argb, ColorGroup, InstanceKey,
        PointerState, WheelConfig, WheelController,
    };

    #[test]
    fn pick_never_commits() {
        let mut wheel =
            WheelController::new(WheelConfig::default(), Box::new(UnsupportedBackend::default()));
        let key = InstanceKey::new("Editor", "hair");
        let group = ColorGroup::new(0, 1, "hair");
        let mut palette = InMemoryPalette::new(vec![Argb::WHITE]);
        let disk = palwheel_core::geometry::Disk::new(ultraviolet::Vec2::zero(), 50.0);
        let now = std::time::Instant::now();

        wheel.request_pick(&key, &group, 0);
        wheel.run_frame(&key, &group, &mut palette, &PointerState::idle(now), disk, false);
        assert_eq!(wheel.picker_phase(&key), PickerPhase::Active { slot: 0 });
        let click = PointerState {
            primary_down: true,
            primary_pressed: true,
            ..PointerState::idle(now)
        };
        wheel.run_frame(&key, &group, &mut palette, &click, disk, false);
        assert_eq!(palette.get(0), Some(Argb::WHITE));
        assert!(palette.log().is_empty());

        wheel.cancel_pick(&key);
        assert!(wheel.picker_phase(&key).is_idle());
    }
}
