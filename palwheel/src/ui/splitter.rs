/// A vertical bar between two panes, dragged horizontally to resize them.
pub struct Splitter {
    pub width: f32,
    pub height: f32,
}

impl egui::Widget for Splitter {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(self.width, self.height), egui::Sense::drag());

        let painter = ui.painter();
        let color = if response.dragged() {
            ui.style().visuals.selection.bg_fill
        } else if response.hovered() {
            ui.style().interact(&response).fg_stroke.color
        } else {
            ui.style().visuals.widgets.noninteractive.bg_stroke.color
        };
        painter.vline(
            rect.center().x,
            rect.y_range(),
            egui::Stroke { width: 1.0, color },
        );

        // Three dots in the middle, so it reads as grabbable.
        let dot_size = (self.width / 4.0).max(1.0);
        let spacing = dot_size * 3.0;
        for y in -1..=1i8 {
            let offset = egui::vec2(0.0, f32::from(y) * spacing);
            painter.circle_filled(rect.center() + offset, dot_size, color);
        }

        if response.dragged() || response.hovered() {
            response.on_hover_and_drag_cursor(egui::CursorIcon::ResizeHorizontal)
        } else {
            response
        }
    }
}
