use egui::Color32;
use palwheel_core::Argb;

const GROW_FACTOR: f32 = 1.15;
const SIZE: f32 = 32.0;

pub fn color32(color: Argb) -> Color32 {
    let [a, r, g, b] = color.0.to_be_bytes();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Gray that reads against `color` laid over `background`.
pub fn grayscale_contrasting(color: Color32, background: Color32) -> Color32 {
    let color: egui::Rgba = color.into();
    let background: egui::Rgba = background.into();
    let blended = background.multiply(1.0 - color.a()) + color;

    let contrasting = (blended.intensity() + 0.5) % 1.0;
    Color32::from_gray((contrasting * 255.999) as u8)
}

/// One palette slot in the swatch list: a square of the slot's color and its index.
/// Clicking it selects the slot.
#[derive(Copy, Clone)]
pub struct Swatch {
    pub index: usize,
    pub color: Argb,
    pub selected: bool,
}
impl egui::Widget for Swatch {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let enabled = ui.is_enabled();
        ui.horizontal(|ui| {
            let (rect, this) = ui.allocate_exact_size(
                egui::Vec2::splat(SIZE),
                egui::Sense {
                    click: enabled,
                    drag: false,
                    focusable: enabled,
                },
            );
            let label = format!("Idx {}", self.index);
            this.widget_info(|| {
                egui::WidgetInfo::selected(egui::WidgetType::Button, self.selected, &label)
            });

            let color = color32(self.color);
            let background = ui.style().visuals.extreme_bg_color;
            let highlighted = this.hovered() || this.has_focus();
            let stroke = if self.selected {
                ui.style().visuals.selection.stroke
            } else if highlighted {
                egui::Stroke {
                    width: 1.0,
                    color: grayscale_contrasting(color, background),
                }
            } else {
                ui.style().visuals.widgets.noninteractive.bg_stroke
            };
            // Grow a little on hover.
            let expansion = if highlighted {
                SIZE * (GROW_FACTOR - 1.0) / 2.0
            } else {
                0.0
            };
            let expansion =
                ui.ctx()
                    .animate_value_with_time(this.id, expansion, ui.style().animation_time);
            ui.painter()
                .rect(rect.expand(expansion), 2.0, color, stroke);

            let text = ui.add(egui::Label::new(label).sense(egui::Sense::click()));
            this | text
        })
        .inner
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn channels() {
        let color = color32(Argb(0xFF10_2030));
        assert_eq!(color, Color32::from_rgb(0x10, 0x20, 0x30));
        assert_eq!(color32(Argb::TRANSPARENT).a(), 0);
    }
    #[test]
    fn contrast_flips() {
        let dark = grayscale_contrasting(Color32::BLACK, Color32::BLACK);
        let light = grayscale_contrasting(Color32::WHITE, Color32::BLACK);
        assert!(dark.r() > 100);
        assert!(light.r() < 155);
    }
}
