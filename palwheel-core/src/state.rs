//! Interaction state that outlives a single frame, keyed per widget instance.
//!
//! Owned by the controller and only ever touched from the UI thread.

use crate::palette::ColorGroup;

/// Identifies one widget instance: `owner|group name`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct InstanceKey(String);
impl InstanceKey {
    #[must_use]
    pub fn new(owner: &str, group: &str) -> Self {
        Self(format!("{owner}|{group}"))
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an instance is in the screen picking workflow.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum PickerPhase {
    #[default]
    Idle,
    /// The pick button was pressed. The press that triggered it must be released before
    /// clicks count as picks.
    WaitingForRelease { slot: usize },
    /// Sampling under the cursor until a click or cancel.
    Active { slot: usize },
}
impl PickerPhase {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
    /// The slot being picked into, if any.
    #[must_use]
    pub fn slot(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::WaitingForRelease { slot } | Self::Active { slot } => Some(slot),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct InstanceState {
    /// `None` until something is selected. Read through [`InstanceState::selected_in`].
    pub selected: Option<usize>,
    pub dragging: Option<usize>,
    /// Fraction of the total width given to the wheel pane.
    pub wheel_ratio: f32,
    /// Absolute width of the swatch pane.
    pub left_width: f32,
    pub picker: PickerPhase,
}
impl Default for InstanceState {
    fn default() -> Self {
        Self {
            selected: None,
            dragging: None,
            wheel_ratio: crate::layout::DEFAULT_WHEEL_RATIO,
            left_width: crate::layout::DEFAULT_LEFT_WIDTH,
            picker: PickerPhase::Idle,
        }
    }
}
impl InstanceState {
    /// Selected slot, falling back to the group start when unset or stale.
    #[must_use]
    pub fn selected_in(&self, group: &ColorGroup) -> usize {
        self.selected
            .filter(|&idx| group.contains(idx))
            .unwrap_or(group.start)
    }
    /// Enforce the index invariants against this frame's group and live color count.
    ///
    /// A stale selection resets to the group start, and a drag on a slot that left the group
    /// (or the color array) is dropped.
    pub fn sanitize(&mut self, group: &ColorGroup, live_len: usize) {
        let selected = self.selected_in(group);
        if self.selected != Some(selected) {
            log::trace!("selection {:?} reset to {selected}", self.selected);
        }
        self.selected = Some(selected);
        if self
            .dragging
            .is_some_and(|idx| !group.contains(idx) || idx >= live_len)
        {
            self.dragging = None;
        }
    }
}

/// Every instance's persisted state. Entries are created lazily and never evicted implicitly.
#[derive(Default, Debug)]
pub struct StateStore {
    instances: hashbrown::HashMap<InstanceKey, InstanceState>,
}
impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_or_default(&mut self, key: &InstanceKey) -> &mut InstanceState {
        self.instances.entry(key.clone()).or_default()
    }
    #[must_use]
    pub fn get(&self, key: &InstanceKey) -> Option<&InstanceState> {
        self.instances.get(key)
    }
    /// Drop an instance, e.g. when its window closes. Returns the old state.
    pub fn forget(&mut self, key: &InstanceKey) -> Option<InstanceState> {
        self.instances.remove(key)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
    /// Whether any instance has a pick in progress.
    #[must_use]
    pub fn any_picking(&self) -> bool {
        self.instances.values().any(|state| !state.picker.is_idle())
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&InstanceKey, &mut InstanceState)> + '_ {
        self.instances.iter_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn group() -> ColorGroup {
        ColorGroup::new(4, 3, "skin")
    }

    #[test]
    fn key_format() {
        assert_eq!(InstanceKey::new("Editor", "skin").as_str(), "Editor|skin");
        assert_ne!(InstanceKey::new("a|b", "c"), InstanceKey::new("a", "b|d"));
    }
    #[test]
    fn lazy_defaults() {
        let mut store = StateStore::new();
        let key = InstanceKey::new("owner", "skin");
        assert!(store.get(&key).is_none());
        let state = store.get_or_default(&key);
        assert_eq!(state.selected_in(&group()), 4);
        assert_eq!(state.picker, PickerPhase::Idle);
        state.wheel_ratio = 0.5;
        assert_eq!(store.get_or_default(&key).wheel_ratio, 0.5);
        assert_eq!(store.len(), 1);
    }
    #[test]
    fn stale_selection_resets() {
        let mut state = InstanceState {
            selected: Some(42),
            dragging: Some(6),
            ..Default::default()
        };
        state.sanitize(&group(), 100);
        assert_eq!(state.selected, Some(4));
        assert_eq!(state.dragging, Some(6));

        state.selected = Some(5);
        state.sanitize(&group(), 6);
        assert_eq!(state.selected, Some(5));
        // Index 6 is in the group but past the live array.
        assert_eq!(state.dragging, None);
    }
    #[test]
    fn picking_queries() {
        let mut store = StateStore::new();
        let a = InstanceKey::new("a", "g");
        let b = InstanceKey::new("b", "g");
        store.get_or_default(&a);
        store.get_or_default(&b).picker = PickerPhase::Active { slot: 1 };
        assert!(store.any_picking());
        store.get_or_default(&b).picker = PickerPhase::Idle;
        assert!(!store.any_picking());
        store.get_or_default(&b).picker = PickerPhase::WaitingForRelease { slot: 1 };
        assert!(store.any_picking());
        store.forget(&b);
        assert!(!store.any_picking());
    }
}
