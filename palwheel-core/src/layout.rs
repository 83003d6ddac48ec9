//! Width negotiation between the swatch, editor, and wheel panes.
//!
//! Only the swatch width and the wheel ratio are persisted. Pixel widths are re-derived from
//! those every frame, so a resized window never leaves stale geometry behind.

use crate::{config::WheelConfig, state::InstanceState};

pub const DEFAULT_LEFT_WIDTH: f32 = 220.0;
pub const DEFAULT_WHEEL_RATIO: f32 = 0.45;

/// Resolved widths for one frame, left to right.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PaneWidths {
    pub left: f32,
    pub editors: f32,
    pub wheel: f32,
    pub splitter: f32,
}
impl PaneWidths {
    /// Offsets from the left edge of the whole widget: `[left divider, editors, right divider, wheel]`.
    #[must_use]
    pub fn offsets(&self) -> [f32; 4] {
        let left_divider = self.left;
        let editors = left_divider + self.splitter;
        let right_divider = editors + self.editors;
        let wheel = right_divider + self.splitter;
        [left_divider, editors, right_divider, wheel]
    }
}

/// Which divider is being dragged.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Divider {
    /// Between swatches and editors.
    Left,
    /// Between editors and the wheel.
    Right,
}

/// Clamp a swatch width to `[min_left, max_left_fraction * total]`. The floor wins when the
/// window is too narrow for both.
#[must_use]
pub fn clamp_left(left: f32, total: f32, config: &WheelConfig) -> f32 {
    left.min(total * config.max_left_fraction)
        .max(config.min_left_width)
}

#[must_use]
pub fn clamp_ratio(ratio: f32, config: &WheelConfig) -> f32 {
    let ratio = if ratio.is_nan() {
        DEFAULT_WHEEL_RATIO
    } else {
        ratio
    };
    ratio.max(config.min_wheel_ratio).min(config.max_wheel_ratio)
}

/// Resolve this frame's widths from the persisted layout.
#[must_use]
pub fn resolve(state: &InstanceState, total: f32, config: &WheelConfig) -> PaneWidths {
    let splitter = config.splitter_width;
    let left = clamp_left(state.left_width, total, config);
    let ratio = clamp_ratio(state.wheel_ratio, config);

    let mut wheel = (total * ratio).max(config.min_wheel_width);
    let mut editors = total - left - wheel - 2.0 * splitter;
    if editors < config.min_editors_width {
        editors = config.min_editors_width;
        wheel = (total - left - editors - 2.0 * splitter).max(0.0);
    }
    PaneWidths {
        left,
        editors,
        wheel,
        splitter,
    }
}

/// Store a new swatch width, clamped.
pub fn set_left_width(state: &mut InstanceState, left: f32, total: f32, config: &WheelConfig) {
    state.left_width = clamp_left(left, total, config);
}

/// Store a new wheel ratio, clamped.
pub fn set_wheel_ratio(state: &mut InstanceState, ratio: f32, config: &WheelConfig) {
    state.wheel_ratio = clamp_ratio(ratio, config);
}

/// Apply a horizontal drag of `dx` to a divider.
pub fn drag(
    state: &mut InstanceState,
    divider: Divider,
    dx: f32,
    total: f32,
    config: &WheelConfig,
) {
    if dx == 0.0 || !dx.is_finite() {
        return;
    }
    match divider {
        Divider::Left => {
            let current = clamp_left(state.left_width, total, config);
            set_left_width(state, current + dx, total, config);
        }
        Divider::Right => {
            if total <= 0.0 {
                return;
            }
            let widths = resolve(state, total, config);
            let max_wheel =
                total - widths.left - config.min_editors_width - 2.0 * widths.splitter;
            // Dragging right shrinks the wheel.
            let wheel = (widths.wheel - dx)
                .min(max_wheel)
                .max(config.min_wheel_width);
            set_wheel_ratio(state, wheel / total, config);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = WheelConfig::default();
        let widths = resolve(&InstanceState::default(), 800.0, &config);
        assert_eq!(widths.left, 220.0);
        assert!((widths.wheel - 360.0).abs() < 1e-3);
        assert!((widths.editors - 208.0).abs() < 1e-3);
        let [left_divider, editors, right_divider, wheel] = widths.offsets();
        assert_eq!((left_divider, editors), (220.0, 226.0));
        assert!((right_divider - 434.0).abs() < 1e-3);
        assert!((wheel - 440.0).abs() < 1e-3);
    }
    #[test]
    fn narrow_clamps() {
        let config = WheelConfig::default();
        let mut state = InstanceState::default();
        set_left_width(&mut state, 500.0, 300.0, &config);
        assert_eq!(state.left_width, 180.0);
        set_wheel_ratio(&mut state, 0.05, &config);
        assert_eq!(state.wheel_ratio, 0.2);
        set_wheel_ratio(&mut state, 0.95, &config);
        assert_eq!(state.wheel_ratio, 0.8);
    }
    #[test]
    fn floor_wins() {
        let config = WheelConfig::default();
        // 0.6 * 150 = 90 < 120.
        assert_eq!(clamp_left(10.0, 150.0, &config), 120.0);
        assert_eq!(clamp_left(1000.0, 150.0, &config), 120.0);
    }
    #[test]
    fn editors_minimum() {
        let config = WheelConfig::default();
        let state = InstanceState {
            wheel_ratio: 0.8,
            ..Default::default()
        };
        let widths = resolve(&state, 600.0, &config);
        assert_eq!(widths.editors, 120.0);
        assert_eq!(widths.wheel, 600.0 - 220.0 - 120.0 - 12.0);
        // Never negative, even if nothing fits.
        let widths = resolve(&state, 100.0, &config);
        assert_eq!(widths.wheel, 0.0);
    }
    #[test]
    fn drag_left_divider() {
        let config = WheelConfig::default();
        let mut state = InstanceState::default();
        drag(&mut state, Divider::Left, 30.0, 800.0, &config);
        assert_eq!(state.left_width, 250.0);
        drag(&mut state, Divider::Left, -1000.0, 800.0, &config);
        assert_eq!(state.left_width, 120.0);
        // Ratio untouched.
        assert_eq!(state.wheel_ratio, DEFAULT_WHEEL_RATIO);
    }
    #[test]
    fn drag_right_divider() {
        let config = WheelConfig::default();
        let mut state = InstanceState::default();
        // Wheel 360 -> 400.
        drag(&mut state, Divider::Right, -40.0, 800.0, &config);
        assert!((state.wheel_ratio - 0.5).abs() < 1e-5);
        // Can't squeeze the editors under their minimum: 800 - 220 - 120 - 12 = 448.
        drag(&mut state, Divider::Right, -1000.0, 800.0, &config);
        assert!((state.wheel_ratio - 448.0 / 800.0).abs() < 1e-6);
        // And the wheel floor.
        drag(&mut state, Divider::Right, 1000.0, 800.0, &config);
        assert!((state.wheel_ratio - 0.2).abs() < 1e-6);
        assert_eq!(state.left_width, 220.0);
    }
}
