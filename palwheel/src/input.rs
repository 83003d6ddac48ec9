//! Conversions between egui's input and geometry types and the core's.

use palwheel_core::PointerState;
use ultraviolet::Vec2;

#[must_use]
pub fn vec2(pos: egui::Pos2) -> Vec2 {
    Vec2::new(pos.x, pos.y)
}
#[must_use]
pub fn pos2(vec: Vec2) -> egui::Pos2 {
    egui::pos2(vec.x, vec.y)
}
#[must_use]
pub fn rect(rect: egui::Rect) -> palwheel_core::geometry::Rect {
    palwheel_core::geometry::Rect {
        min: vec2(rect.min),
        max: vec2(rect.max),
    }
}

/// Snapshot the pointer and cancel key for this frame.
#[must_use]
pub fn pointer_state(input: &egui::InputState) -> PointerState {
    let pointer = &input.pointer;
    PointerState {
        pos: pointer.hover_pos().map(vec2),
        primary_down: pointer.primary_down(),
        primary_pressed: pointer.primary_pressed(),
        secondary_pressed: pointer.secondary_pressed(),
        cancel_pressed: input.key_pressed(egui::Key::Escape),
        now: std::time::Instant::now(),
    }
}
