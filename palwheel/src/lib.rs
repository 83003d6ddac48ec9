//! egui front end for the palette color wheel, plus the platform screen pickers.
//!
//! ```ignore
//! let mut wheel = palwheel::new_controller();
//! // Each frame:
//! palwheel::ui::ColorWheelWindow { owner: "Editor", group: &group }
//!     .show(ctx, &mut wheel, &mut palette, &mut open);
//! ```

pub mod global;
pub mod input;
pub mod os;
pub mod ui;

pub use palwheel_core;

/// A controller using the user's settings and this platform's picker.
#[must_use]
pub fn new_controller() -> palwheel_core::WheelController {
    palwheel_core::WheelController::new(global::config().clone(), os::default_backend())
}
