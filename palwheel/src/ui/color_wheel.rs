//! The palette wheel widget: swatches, editors and the hue/saturation disk side by side.

use egui::Color32;
use palwheel_core::{
    color::hsv_to_rgb,
    geometry::Disk,
    layout::Divider,
    state::PickerPhase,
    Argb, ColorGroup, InstanceKey, PaletteStore, WheelController, WheelFrame,
};

use super::{
    splitter::Splitter,
    swatch::{color32, grayscale_contrasting, Swatch},
};
use crate::{global::settings::Settings, input};

const INNER_FILL: Color32 = Color32::from_rgba_premultiplied(26, 26, 26, 220);

/// A floating window holding one wheel instance. Closing it forgets the instance.
pub struct ColorWheelWindow<'a> {
    pub owner: &'a str,
    pub group: &'a ColorGroup,
}
impl ColorWheelWindow<'_> {
    pub fn show<S: PaletteStore + ?Sized>(
        self,
        ctx: &egui::Context,
        wheel: &mut WheelController,
        store: &mut S,
        open: &mut bool,
    ) {
        let key = InstanceKey::new(self.owner, &self.group.name);
        let was_open = *open;
        egui::Window::new(format!("{} - {}", self.owner, self.group.name))
            .id(egui::Id::new(("palwheel", key.as_str())))
            .open(open)
            .default_size([800.0, 480.0])
            .min_width(400.0)
            .min_height(240.0)
            .show(ctx, |ui| {
                if let Some(err) = Settings::get().load_error() {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        format!("Wheel settings not loaded, using defaults: {err}"),
                    );
                }
                ColorWheel {
                    key: &key,
                    group: self.group,
                }
                .show(ui, wheel, store);
            });
        if was_open && !*open {
            log::debug!("{key} closed");
            wheel.forget(&key);
        }
    }
}

/// The wheel widget itself, filling whatever space the parent gives it.
pub struct ColorWheel<'a> {
    pub key: &'a InstanceKey,
    pub group: &'a ColorGroup,
}
impl ColorWheel<'_> {
    pub fn show<S: PaletteStore + ?Sized>(
        self,
        ui: &mut egui::Ui,
        wheel: &mut WheelController,
        store: &mut S,
    ) {
        let Self { key, group } = self;
        let full = ui.available_rect_before_wrap();
        let total = full.width();
        let reserved = !wheel.picker_phase(key).is_idle();
        let status_height = if reserved {
            ui.spacing().interact_size.y * 2.0
        } else {
            0.0
        };
        let body_height = (full.height() - status_height).max(0.0);

        let widths = wheel.layout(key, total);
        let [left_divider, editors_x, right_divider, wheel_x] = widths.offsets();
        let pane = |x: f32, width: f32| {
            egui::Rect::from_min_size(
                full.min + egui::vec2(x, 0.0),
                egui::vec2(width.max(0.0), body_height),
            )
        };
        let top_down = egui::Layout::top_down(egui::Align::Min);

        let selected = wheel.selected(key, group);

        // Swatches
        {
            let rect = pane(0.0, widths.left);
            let mut ui = ui.child_ui_with_id_source(rect, top_down, "swatches");
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(&mut ui, |ui| {
                    let colors = store.colors();
                    for index in group.live_indices(colors.len()) {
                        let swatch = Swatch {
                            index,
                            color: colors[index],
                            selected: index == selected,
                        };
                        if ui.add(swatch).clicked() {
                            wheel.select(key, group, index);
                        }
                    }
                });
        }

        for (x, divider) in [(left_divider, Divider::Left), (right_divider, Divider::Right)] {
            let mut ui = ui.child_ui_with_id_source(
                pane(x, widths.splitter),
                top_down,
                ("splitter", divider == Divider::Left),
            );
            let response = ui.add(Splitter {
                width: widths.splitter,
                height: body_height,
            });
            let dx = response.drag_delta().x;
            if dx != 0.0 {
                wheel.drag_divider(key, divider, dx, total);
            }
        }

        // Editors. Selection may have changed from a swatch click.
        {
            let selected = wheel.selected(key, group);
            let rect = pane(editors_x, widths.editors);
            let mut ui = ui.child_ui_with_id_source(rect, top_down, "editors");
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(&mut ui, |ui| {
                    super::editors::show(ui, wheel, key, group, store, selected);
                });
        }

        // Disk
        let frame = {
            let rect = pane(wheel_x, widths.wheel);
            let mut ui = ui.child_ui_with_id_source(rect, top_down, "wheel");
            let (rect, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            let disk = Disk::fit(input::rect(rect));
            let pointer = ui.input(input::pointer_state);
            let frame = wheel.run_frame(key, group, store, &pointer, disk, response.hovered());
            let config = wheel.config();
            paint_wheel(&ui, &frame, config.disk_segments, config.node_radius);
            frame
        };

        match StatusBar::after_frame(reserved, frame.picker) {
            StatusBar::Hidden => (),
            StatusBar::Shown => {
                let status = egui::Rect::from_min_size(
                    full.min + egui::vec2(0.0, body_height),
                    egui::vec2(total, status_height),
                );
                let mut ui = ui.child_ui_with_id_source(status, top_down, "status");
                status_bar(&mut ui, frame.picker);
                // The picker is polled once a frame, so keep frames coming.
                ui.ctx().request_repaint_after(wheel.config().sample_interval());
            }
            StatusBar::Relayout => ui.ctx().request_repaint(),
        }

        ui.allocate_rect(full, egui::Sense::hover());
    }
}

/// What to do with the status bar once the frame's pick state is known. Its space is reserved
/// from the phase at the start of the frame, before editors can start or end a pick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum StatusBar {
    Hidden,
    Shown,
    /// Reserved space doesn't match the phase. Lay out again next frame, right away.
    Relayout,
}
impl StatusBar {
    fn after_frame(reserved: bool, phase: PickerPhase) -> Self {
        match (reserved, !phase.is_idle()) {
            (false, false) => Self::Hidden,
            (true, true) => Self::Shown,
            _ => Self::Relayout,
        }
    }
}

fn status_bar(ui: &mut egui::Ui, phase: PickerPhase) {
    ui.separator();
    ui.horizontal(|ui| {
        ui.strong("Color Picker Active");
        if let Some(slot) = phase.slot() {
            ui.label(format!("(Idx {slot})"));
        }
        ui.weak("Left-click: Pick | Right-click/Esc: Cancel");
    });
}

fn hsv_color(h: f32, s: f32, v: f32) -> Color32 {
    let (r, g, b) = hsv_to_rgb(h, s, v);
    color32(Argb::from_float4([r, g, b, 1.0]))
}

/// Paint the disk shaded at the selected color's brightness, then a node per slot.
fn paint_wheel(ui: &egui::Ui, frame: &WheelFrame, segments: usize, node_radius: f32) {
    let painter = ui.painter();
    let disk = frame.disk;
    let value = frame.value;

    let mut mesh = egui::Mesh::default();
    for index in 0..segments {
        let segment = disk.segment(index, segments);
        let [start, end] = segment.edge_hues;
        let base = mesh.vertices.len() as u32;
        let colors = [
            hsv_color(start, 0.0, value),
            hsv_color(start, 1.0, value),
            hsv_color(end, 1.0, value),
            hsv_color(end, 0.0, value),
        ];
        for (corner, color) in segment.corners.iter().zip(colors) {
            mesh.colored_vertex(input::pos2(*corner), color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    painter.add(egui::Shape::mesh(mesh));
    painter.circle_filled(input::pos2(disk.center), disk.inner, INNER_FILL);

    let background = ui.style().visuals.extreme_bg_color;
    for node in &frame.nodes {
        let center = input::pos2(node.pos);
        let fill = color32(node.color).to_opaque();
        painter.circle_filled(center, node_radius, fill);
        painter.circle_stroke(
            center,
            node_radius + 1.0,
            egui::Stroke {
                width: 1.0,
                color: grayscale_contrasting(fill, background),
            },
        );
        if node.selected || node.dragging {
            painter.circle_stroke(center, node_radius + 2.5, ui.style().visuals.selection.stroke);
        }
    }
}
