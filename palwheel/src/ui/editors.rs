//! The middle pane: numeric and text editors for the selected slot, and the pick button.

use palwheel_core::{
    state::PickerPhase, Argb, ColorGroup, InstanceKey, PaletteStore, SlotEdit, WheelController,
};

const CHANNELS: [&str; 4] = ["R", "G", "B", "A"];

/// Show editors for `slot`. Every change is committed through the controller immediately.
pub fn show<S: PaletteStore + ?Sized>(
    ui: &mut egui::Ui,
    wheel: &mut WheelController,
    key: &InstanceKey,
    group: &ColorGroup,
    store: &mut S,
    slot: usize,
) {
    let Some(&current) = store.colors().get(slot) else {
        ui.weak("No color selected");
        return;
    };
    ui.strong(format!("Idx {slot}"));

    let mut rgba = current.to_float4();
    if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed()
        && Argb::from_float4(rgba) != current
    {
        wheel.apply_edit(key, group, store, slot, SlotEdit::Rgba(rgba));
    }

    // Channels share one edit, so a drag on any of them commits all four.
    let mut changed = false;
    egui::Grid::new(ui.id().with("channels"))
        .num_columns(2)
        .show(ui, |ui| {
            for (name, value) in CHANNELS.iter().zip(rgba.iter_mut()) {
                ui.label(*name);
                changed |= ui
                    .add(
                        egui::DragValue::new(value)
                            .speed(0.001)
                            .clamp_range(0.0..=1.0)
                            .max_decimals(3),
                    )
                    .changed();
                ui.end_row();
            }

            let mut value = current.to_hsv().v;
            ui.label("V");
            if ui
                .add(
                    egui::DragValue::new(&mut value)
                        .speed(0.001)
                        .clamp_range(0.0..=1.0)
                        .max_decimals(3),
                )
                .changed()
            {
                wheel.apply_edit(key, group, store, slot, SlotEdit::Value(value));
            }
            ui.end_row();
        });
    // A drag value reports a change whenever it loses keyboard focus, edited or not.
    if changed && Argb::from_float4(rgba) != current {
        wheel.apply_edit(key, group, store, slot, SlotEdit::Rgba(rgba));
    }

    hex_field(ui, wheel, key, group, store, slot);

    ui.separator();
    pick_buttons(ui, wheel, key, group, slot);
}

/// `AARRGGBB` text, committed when focus leaves the field.
fn hex_field<S: PaletteStore + ?Sized>(
    ui: &mut egui::Ui,
    wheel: &mut WheelController,
    key: &InstanceKey,
    group: &ColorGroup,
    store: &mut S,
    slot: usize,
) {
    let Some(&current) = store.colors().get(slot) else {
        return;
    };
    // Text in progress lives in egui memory until focus leaves the field.
    let field_id = hex_field_id(key, slot);
    let buffer_id = field_id.with("buffer");
    let buffered = ui.data(|data| data.get_temp::<String>(buffer_id));
    let shown = current.to_hex();
    let mut text = buffered.clone().unwrap_or_else(|| shown.clone());

    let response = ui
        .horizontal(|ui| {
            ui.label("Hex");
            ui.add(
                egui::TextEdit::singleline(&mut text)
                    .id(field_id)
                    .char_limit(9)
                    .desired_width(90.0)
                    .font(egui::TextStyle::Monospace),
            )
        })
        .inner;

    if response.lost_focus() {
        ui.data_mut(|data| data.remove::<String>(buffer_id));
        if text != shown {
            wheel.apply_edit(key, group, store, slot, SlotEdit::Hex(&text));
        }
    } else if response.changed() {
        ui.data_mut(|data| data.insert_temp(buffer_id, text));
    } else if buffered.is_some() && !response.has_focus() {
        ui.data_mut(|data| data.remove::<String>(buffer_id));
    }
}

fn hex_field_id(key: &InstanceKey, slot: usize) -> egui::Id {
    egui::Id::new(("palwheel-hex", key.as_str(), slot))
}

fn pick_buttons(
    ui: &mut egui::Ui,
    wheel: &mut WheelController,
    key: &InstanceKey,
    group: &ColorGroup,
    slot: usize,
) {
    let phase = wheel.picker_phase(key);
    let picking_this = phase.slot() == Some(slot);
    ui.horizontal(|ui| {
        let pick = ui
            .add_enabled(
                crate::os::picking_supported(),
                egui::Button::new("Pick").selected(picking_this),
            )
            .on_hover_text("Pick a color from anywhere on screen")
            .on_disabled_hover_text("Screen picking isn't available on this platform");
        if pick.clicked() {
            if picking_this {
                wheel.cancel_pick(key);
            } else {
                wheel.request_pick(key, group, slot);
            }
        }
        if !matches!(phase, PickerPhase::Idle) && ui.button("Cancel").clicked() {
            wheel.cancel_pick(key);
        }
    });
}
