//! Per-frame orchestration of one or more wheel instances.
//!
//! The host calls [`WheelController::run_frame`] once per instance per frame with the current
//! pointer state, and paints the returned [`WheelFrame`]. All persistent state lives in here,
//! keyed by [`InstanceKey`], so the host's UI code can stay immediate-mode.

use std::time::Instant;

use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::{
    color::{parse_hex, Argb, Hsv},
    config::WheelConfig,
    geometry::{hit_test, Disk, Polar},
    layout::{self, Divider, PaneWidths},
    palette::{ColorGroup, PaletteStore},
    picker::{PickInput, Picker, PickerBackend},
    state::{InstanceKey, InstanceState, PickerPhase, StateStore},
};

/// Input for one frame, in the host window's coordinates.
#[derive(Copy, Clone, Debug)]
pub struct PointerState {
    /// `None` when the pointer is outside the host window.
    pub pos: Option<Vec2>,
    pub primary_down: bool,
    /// Went down this frame.
    pub primary_pressed: bool,
    pub secondary_pressed: bool,
    /// Escape, or whatever the host maps to cancel.
    pub cancel_pressed: bool,
    pub now: Instant,
}
impl PointerState {
    /// Nothing held, nothing pressed, pointer elsewhere.
    #[must_use]
    pub fn idle(now: Instant) -> Self {
        Self {
            pos: None,
            primary_down: false,
            primary_pressed: false,
            secondary_pressed: false,
            cancel_pressed: false,
            now,
        }
    }
    fn pick_input(&self) -> PickInput {
        PickInput {
            primary_down: self.primary_down,
            primary_pressed: self.primary_pressed,
            secondary_pressed: self.secondary_pressed,
            cancel_pressed: self.cancel_pressed,
            now: self.now,
        }
    }
}

/// An edit from the numeric or text editors.
#[derive(Copy, Clone, Debug)]
pub enum SlotEdit<'a> {
    /// Normalized `[r, g, b, a]`.
    Rgba([f32; 4]),
    /// Brightness only, keeping hue, saturation, and alpha.
    Value(f32),
    /// `RRGGBB` or `AARRGGBB`. Ignored if malformed.
    Hex(&'a str),
}

/// A color slot as placed on the disk.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct WheelNode {
    pub index: usize,
    pub pos: Vec2,
    pub color: Argb,
    pub selected: bool,
    pub dragging: bool,
}

/// Everything needed to paint one instance's wheel this frame.
#[derive(Clone, Debug)]
pub struct WheelFrame {
    pub disk: Disk,
    /// Brightness of the selected color. The disk is shaded at this value.
    pub value: f32,
    pub nodes: SmallVec<[WheelNode; 16]>,
    pub selected: usize,
    pub picker: PickerPhase,
}

pub struct WheelController {
    states: StateStore,
    picker: Picker,
    config: WheelConfig,
}
impl WheelController {
    #[must_use]
    pub fn new(config: WheelConfig, backend: Box<dyn PickerBackend>) -> Self {
        let picker = Picker::new(backend, config.sample_interval(), config.preview_offset);
        Self {
            states: StateStore::new(),
            picker,
            config,
        }
    }
    #[must_use]
    pub fn config(&self) -> &WheelConfig {
        &self.config
    }
    #[must_use]
    pub fn states(&self) -> &StateStore {
        &self.states
    }
    #[must_use]
    pub fn picker(&self) -> &Picker {
        &self.picker
    }
    pub fn state(&mut self, key: &InstanceKey) -> &InstanceState {
        self.states.get_or_default(key)
    }
    /// Drop an instance entirely, cancelling its pick if one is running.
    pub fn forget(&mut self, key: &InstanceKey) {
        self.picker.cancel(&mut self.states, key);
        self.states.forget(key);
        self.picker.release_if_unused(&self.states);
    }

    pub fn layout(&mut self, key: &InstanceKey, total: f32) -> PaneWidths {
        layout::resolve(self.states.get_or_default(key), total, &self.config)
    }
    pub fn drag_divider(&mut self, key: &InstanceKey, divider: Divider, dx: f32, total: f32) {
        layout::drag(
            self.states.get_or_default(key),
            divider,
            dx,
            total,
            &self.config,
        );
    }

    /// The selected slot, reset to the group start if it went stale.
    pub fn selected(&mut self, key: &InstanceKey, group: &ColorGroup) -> usize {
        let state = self.states.get_or_default(key);
        let selected = state.selected_in(group);
        state.selected = Some(selected);
        selected
    }
    /// Select a slot. Slots outside the group are ignored.
    pub fn select(&mut self, key: &InstanceKey, group: &ColorGroup, index: usize) {
        if group.contains(index) {
            self.states.get_or_default(key).selected = Some(index);
        }
    }
    /// Apply an editor change to `slot`. Returns whether anything was committed. An edit that
    /// leaves the color as it was commits nothing and leaves the selection alone.
    pub fn apply_edit<S: PaletteStore + ?Sized>(
        &mut self,
        key: &InstanceKey,
        group: &ColorGroup,
        store: &mut S,
        slot: usize,
        edit: SlotEdit<'_>,
    ) -> bool {
        if !group.contains(slot) {
            return false;
        }
        let Some(&current) = store.colors().get(slot) else {
            return false;
        };
        let color = match edit {
            SlotEdit::Rgba(rgba) => Argb::from_float4(rgba),
            SlotEdit::Value(v) => {
                let hsv = current.to_hsv();
                current.from_hsv_keep_alpha(Hsv { v, ..hsv })
            }
            SlotEdit::Hex(text) => match parse_hex(text, current) {
                Some(color) => color,
                None => {
                    log::trace!("ignoring malformed hex {text:?}");
                    return false;
                }
            },
        };
        // Editors report changes on focus traversal too. Only real edits reach the host.
        if color == current {
            return false;
        }
        commit(store, self.states.get_or_default(key), slot, color)
    }

    /// Start picking a screen color into `slot`. Replaces any pick in progress, in any instance.
    pub fn request_pick(&mut self, key: &InstanceKey, group: &ColorGroup, slot: usize) {
        if !group.contains(slot) {
            return;
        }
        self.picker.request(&mut self.states, key, slot);
    }
    pub fn cancel_pick(&mut self, key: &InstanceKey) {
        self.picker.cancel(&mut self.states, key);
    }
    pub fn picker_phase(&mut self, key: &InstanceKey) -> PickerPhase {
        self.states.get_or_default(key).picker
    }

    /// Run one frame of interaction for an instance.
    ///
    /// `disk` is where the wheel is drawn this frame, and `wheel_hovered` whether the pointer is
    /// over it with nothing else in the way.
    pub fn run_frame<S: PaletteStore + ?Sized>(
        &mut self,
        key: &InstanceKey,
        group: &ColorGroup,
        store: &mut S,
        pointer: &PointerState,
        disk: Disk,
        wheel_hovered: bool,
    ) -> WheelFrame {
        let Self {
            states,
            picker,
            config,
        } = self;

        let live_len = store.colors().len();
        let state = states.get_or_default(key);
        state.sanitize(group, live_len);
        let was_picking = !state.picker.is_idle();

        // Picks resolve before drags, so a drag on the same slot wins a same-frame tie.
        if let Some(pick) = picker.step(states, key, &pointer.pick_input()) {
            let state = states.get_or_default(key);
            match store.colors().get(pick.slot).copied() {
                Some(current) if group.contains(pick.slot) => {
                    commit(store, state, pick.slot, current.with_rgb(pick.rgb));
                }
                _ => log::debug!("dropping pick for stale slot {}", pick.slot),
            }
        }
        picker.release_if_unused(states);

        let state = states.get_or_default(key);
        let live = group.live_indices(live_len);

        if pointer.primary_pressed && wheel_hovered && !was_picking {
            if let Some(pos) = pointer.pos {
                // Later nodes are drawn on top, so they win overlaps.
                let grabbed = live.clone().rev().find(|&idx| {
                    let node = node_position(&disk, store.colors()[idx]);
                    hit_test(node, pos, config.node_radius, config.hit_slop)
                });
                if let Some(idx) = grabbed {
                    log::trace!("{key} grabbed slot {idx}");
                    state.dragging = Some(idx);
                    state.selected = Some(idx);
                }
            }
        }

        if let (Some(idx), true, Some(pos)) = (state.dragging, pointer.primary_down, pointer.pos) {
            if let Some(current) = store.colors().get(idx).copied() {
                let Polar { hue, saturation } = disk.screen_to_polar(pos);
                let hsv = current.to_hsv();
                let color = current.from_hsv_keep_alpha(Hsv {
                    h: hue,
                    s: saturation,
                    v: hsv.v,
                });
                commit(store, state, idx, color);
            }
        }
        if !pointer.primary_down {
            state.dragging = None;
        }

        let selected = state.selected_in(group);
        let colors = store.colors();
        let value = colors.get(selected).map_or(1.0, |color| color.to_hsv().v);
        let nodes = live
            .map(|index| {
                let color = colors[index];
                WheelNode {
                    index,
                    pos: node_position(&disk, color),
                    color,
                    selected: index == selected,
                    dragging: state.dragging == Some(index),
                }
            })
            .collect();

        WheelFrame {
            disk,
            value,
            nodes,
            selected,
            picker: state.picker,
        }
    }
}

fn node_position(disk: &Disk, color: Argb) -> Vec2 {
    let Hsv { h, s, .. } = color.to_hsv();
    disk.polar_to_screen(Polar {
        hue: h,
        saturation: s,
    })
}

/// Write one slot through to the host, and select it.
fn commit<S: PaletteStore + ?Sized>(
    store: &mut S,
    state: &mut InstanceState,
    index: usize,
    color: Argb,
) -> bool {
    if index >= store.colors().len() {
        return false;
    }
    log::trace!("commit slot {index} = {color:?}");
    store.change_color(index, color);
    store.refresh();
    state.selected = Some(index);
    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        color::Rgb8,
        palette::InMemoryPalette,
        picker::{test::MockBackend, ScreenPoint},
    };

    type Log = std::sync::Arc<parking_lot::Mutex<crate::picker::test::MockLog>>;

    fn controller() -> (WheelController, Log) {
        let (backend, log, _) = MockBackend::new();
        (
            WheelController::new(WheelConfig::default(), Box::new(backend)),
            log,
        )
    }
    fn disk() -> Disk {
        Disk::new(Vec2::new(100.0, 100.0), 80.0)
    }
    fn key() -> InstanceKey {
        InstanceKey::new("Editor", "skin")
    }
    fn at(now: Instant, pos: Vec2) -> PointerState {
        PointerState {
            pos: Some(pos),
            ..PointerState::idle(now)
        }
    }

    #[test]
    fn hex_edit_commits_and_selects() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 2, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0), Argb(0x0011_2233)]);
        assert!(wheel.apply_edit(&key(), &group, &mut palette, 1, SlotEdit::Hex("FF445566")));
        assert_eq!(palette.get(1), Some(Argb(0xFF44_5566)));
        assert_eq!(wheel.selected(&key(), &group), 1);
        assert_eq!(palette.refreshes(), 1);
    }
    #[test]
    fn malformed_hex_ignored() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 2, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0), Argb(0x0011_2233)]);
        assert!(!wheel.apply_edit(&key(), &group, &mut palette, 1, SlotEdit::Hex("12345")));
        assert_eq!(palette.get(1), Some(Argb(0x0011_2233)));
        assert_eq!(wheel.selected(&key(), &group), 0);
        assert!(palette.log().is_empty());
    }
    #[test]
    fn value_and_rgba_edits() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 1, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0x80FF_0000)]);
        wheel.apply_edit(&key(), &group, &mut palette, 0, SlotEdit::Value(0.5));
        assert_eq!(palette.get(0), Some(Argb(0x8080_0000)));
        wheel.apply_edit(
            &key(),
            &group,
            &mut palette,
            0,
            SlotEdit::Rgba([0.0, 1.0, 0.0, 1.0]),
        );
        assert_eq!(palette.get(0), Some(Argb(0xFF00_FF00)));
        // Outside the group.
        assert!(!wheel.apply_edit(&key(), &group, &mut palette, 3, SlotEdit::Value(0.1)));
    }
    #[test]
    fn same_value_twice_is_stable() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 3, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0); 3]);
        assert!(wheel.apply_edit(&key(), &group, &mut palette, 2, SlotEdit::Hex("FF010203")));
        assert!(!wheel.apply_edit(&key(), &group, &mut palette, 2, SlotEdit::Hex("FF010203")));
        assert_eq!(palette.get(2), Some(Argb(0xFF01_0203)));
        assert_eq!(wheel.selected(&key(), &group), 2);
        assert_eq!(palette.log().len(), 1);
        assert_eq!(palette.refreshes(), 1);
    }
    #[test]
    fn unchanged_edits_commit_nothing() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 2, "skin");
        let color = Argb(0x8010_2030);
        let mut palette = InMemoryPalette::new(vec![Argb(0), color]);
        let hsv = color.to_hsv();
        // What a focused-then-blurred editor hands back: the same color, re-parsed.
        let edits = [
            SlotEdit::Hex("80102030"),
            SlotEdit::Hex("#102030"),
            SlotEdit::Rgba(color.to_float4()),
            SlotEdit::Rgba([0.063, 0.125, 0.188, 0.502]),
            SlotEdit::Value(hsv.v),
        ];
        for edit in edits {
            assert!(!wheel.apply_edit(&key(), &group, &mut palette, 1, edit), "{edit:?}");
        }
        assert!(palette.log().is_empty());
        assert_eq!(palette.refreshes(), 0);
        // Selection didn't move to the edited slot either.
        assert_eq!(wheel.selected(&key(), &group), 0);
    }
    #[test]
    fn stale_selection_stays_in_group() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(2, 3, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb::WHITE; 5]);
        wheel.select(&key(), &group, 4);
        // A different, smaller group now shows under the same key.
        let shrunk = ColorGroup::new(2, 1, "skin");
        let frame = wheel.run_frame(
            &key(),
            &shrunk,
            &mut palette,
            &PointerState::idle(Instant::now()),
            disk(),
            false,
        );
        assert_eq!(frame.selected, 2);
        assert_eq!(wheel.state(&key()).selected, Some(2));
        // Selecting outside is ignored.
        wheel.select(&key(), &shrunk, 9);
        assert_eq!(wheel.selected(&key(), &shrunk), 2);
    }
    #[test]
    fn out_of_array_slots_skipped() {
        let (mut wheel, _) = controller();
        // Group claims 6 slots, array only holds 4.
        let group = ColorGroup::new(2, 6, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb::WHITE; 4]);
        let frame = wheel.run_frame(
            &key(),
            &group,
            &mut palette,
            &PointerState::idle(Instant::now()),
            disk(),
            true,
        );
        assert_eq!(
            frame.nodes.iter().map(|n| n.index).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert!(!wheel.apply_edit(&key(), &group, &mut palette, 6, SlotEdit::Value(0.1)));
    }
    #[test]
    fn drag_commits_hue_and_saturation() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 1, "skin");
        // Pure red at half brightness, half alpha. Node sits at hue 0, saturation 1: (180, 100).
        let mut palette = InMemoryPalette::new(vec![Argb(0x8080_0000)]);
        let now = Instant::now();

        let press = PointerState {
            primary_down: true,
            primary_pressed: true,
            ..at(now, Vec2::new(178.0, 101.0))
        };
        let frame = wheel.run_frame(&key(), &group, &mut palette, &press, disk(), true);
        assert!(frame.nodes[0].dragging);
        assert_eq!(wheel.state(&key()).dragging, Some(0));

        // Drag straight down, to the edge: hue 90, full saturation.
        let drag = PointerState {
            primary_down: true,
            ..at(now, Vec2::new(100.0, 180.0))
        };
        wheel.run_frame(&key(), &group, &mut palette, &drag, disk(), true);
        let color = palette.get(0).unwrap();
        assert_eq!(color.alpha(), 0x80);
        let hsv = color.to_hsv();
        assert!((hsv.h - 90.0).abs() < 1.0, "{hsv:?}");
        assert!((hsv.s - 1.0).abs() < 0.01);
        assert!((hsv.v - 128.0 / 255.0).abs() < 0.01);

        // Released while off the wheel entirely.
        let release = PointerState::idle(now);
        wheel.run_frame(&key(), &group, &mut palette, &release, disk(), false);
        assert_eq!(wheel.state(&key()).dragging, None);
    }
    #[test]
    fn press_off_node_does_nothing() {
        let (mut wheel, _) = controller();
        let group = ColorGroup::new(0, 1, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0xFFFF_0000)]);
        let press = PointerState {
            primary_down: true,
            primary_pressed: true,
            ..at(Instant::now(), Vec2::new(100.0, 100.0))
        };
        wheel.run_frame(&key(), &group, &mut palette, &press, disk(), true);
        assert_eq!(wheel.state(&key()).dragging, None);
        assert!(palette.log().is_empty());
    }
    #[test]
    fn pick_keeps_alpha() {
        let (mut wheel, log) = controller();
        let group = ColorGroup::new(0, 4, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0), Argb(0), Argb(0), Argb(0x8010_2030)]);
        let now = Instant::now();

        wheel.request_pick(&key(), &group, 3);
        let held = PointerState {
            primary_down: true,
            ..PointerState::idle(now)
        };
        wheel.run_frame(&key(), &group, &mut palette, &held, disk(), false);
        assert_eq!(
            wheel.picker_phase(&key()),
            PickerPhase::WaitingForRelease { slot: 3 }
        );
        wheel.run_frame(
            &key(),
            &group,
            &mut palette,
            &PointerState::idle(now),
            disk(),
            false,
        );
        assert_eq!(wheel.picker_phase(&key()), PickerPhase::Active { slot: 3 });

        let handoff = log.lock().handoff.clone().unwrap();
        let pixels = crate::picker::test::MockPixels {
            cursor: parking_lot::Mutex::new(ScreenPoint::new(0, 0)),
            color: parking_lot::Mutex::new(Rgb8::new(10, 20, 30)),
        };
        assert!(handoff.capture(ScreenPoint::new(3, 4), &pixels));

        let frame = wheel.run_frame(
            &key(),
            &group,
            &mut palette,
            &PointerState::idle(now),
            disk(),
            false,
        );
        assert_eq!(palette.get(3), Some(Argb(0x800A_141E)));
        assert_eq!(frame.selected, 3);
        assert!(frame.picker.is_idle());
        assert_eq!(log.lock().uninstalls, 1);
    }
    #[test]
    fn right_click_cancels_pick() {
        let (mut wheel, log) = controller();
        let group = ColorGroup::new(0, 1, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0xFF00_0000)]);
        let now = Instant::now();

        wheel.request_pick(&key(), &group, 0);
        wheel.run_frame(
            &key(),
            &group,
            &mut palette,
            &PointerState::idle(now),
            disk(),
            false,
        );
        let right = PointerState {
            secondary_pressed: true,
            ..PointerState::idle(now)
        };
        wheel.run_frame(&key(), &group, &mut palette, &right, disk(), false);
        assert!(wheel.picker_phase(&key()).is_idle());
        assert!(palette.log().is_empty());
        assert_eq!(log.lock().uninstalls, 1);
    }
    #[test]
    fn pick_click_does_not_start_drag() {
        let (backend, _, _) = MockBackend::new();
        let backend = MockBackend {
            intercepts: false,
            ..backend
        };
        let mut wheel = WheelController::new(WheelConfig::default(), Box::new(backend));
        let group = ColorGroup::new(0, 1, "skin");
        let mut palette = InMemoryPalette::new(vec![Argb(0xFFFF_0000)]);
        let now = Instant::now();

        wheel.request_pick(&key(), &group, 0);
        wheel.run_frame(
            &key(),
            &group,
            &mut palette,
            &PointerState::idle(now),
            disk(),
            true,
        );
        // Host-side click right on top of the node.
        let click = PointerState {
            primary_down: true,
            primary_pressed: true,
            ..at(now, Vec2::new(180.0, 100.0))
        };
        wheel.run_frame(&key(), &group, &mut palette, &click, disk(), true);
        assert!(wheel.picker_phase(&key()).is_idle());
        assert_eq!(wheel.state(&key()).dragging, None);
        // The mock screen is (10, 20, 30).
        assert_eq!(palette.get(0), Some(Argb(0xFF0A_141E)));
    }
    #[test]
    fn forget_cancels_pick() {
        let (mut wheel, log) = controller();
        let group = ColorGroup::new(0, 1, "skin");
        wheel.request_pick(&key(), &group, 0);
        wheel.forget(&key());
        assert!(wheel.states().is_empty());
        assert_eq!(log.lock().uninstalls, 1);
    }
    #[test]
    fn layout_through_controller() {
        let (mut wheel, _) = controller();
        wheel.drag_divider(&key(), Divider::Left, 500.0, 300.0);
        assert_eq!(wheel.state(&key()).left_width, 180.0);
        let widths = wheel.layout(&key(), 300.0);
        assert_eq!(widths.left, 180.0);
    }
}
