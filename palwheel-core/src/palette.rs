//! The host side of the widget: a flat array of packed colors, viewed through named groups.
//!
//! The widget never owns colors. It reads them through [`PaletteStore`] and proposes
//! replacements one slot at a time.

use crate::color::Argb;

/// A named, contiguous run of slots in the host's color array.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ColorGroup {
    pub start: usize,
    pub count: usize,
    pub name: String,
}
impl ColorGroup {
    #[must_use]
    pub fn new(start: usize, count: usize, name: impl Into<String>) -> Self {
        Self {
            start,
            count,
            name: name.into(),
        }
    }
    /// One past the last slot.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.count)
    }
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end()).contains(&index)
    }
    /// Slot indices of this group that exist in a color array of `live_len` entries.
    pub fn live_indices(&self, live_len: usize) -> std::ops::Range<usize> {
        self.start.min(live_len)..self.end().min(live_len)
    }
}

/// The host's color data model.
pub trait PaletteStore {
    /// The whole color array. Groups index into this.
    fn colors(&self) -> &[Argb];
    /// Replace one slot. Indices past the end are ignored.
    fn change_color(&mut self, index: usize, color: Argb);
    /// Called once after each committed change, for the host to re-derive whatever depends on colors.
    fn refresh(&mut self);
}

pub mod commands {
    use crate::color::Argb;
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub enum Command {
        Changed { target: usize, from: Argb, to: Argb },
    }
}

/// A plain `Vec`-backed store that records every change as a command, so changes can be inspected.
#[derive(Default, Clone, Debug)]
pub struct InMemoryPalette {
    colors: Vec<Argb>,
    log: Vec<commands::Command>,
    refreshes: usize,
}
impl InMemoryPalette {
    #[must_use]
    pub fn new(colors: Vec<Argb>) -> Self {
        Self {
            colors,
            ..Default::default()
        }
    }
    /// Every change applied, oldest first.
    #[must_use]
    pub fn log(&self) -> &[commands::Command] {
        &self.log
    }
    /// Number of times the store was asked to refresh.
    #[must_use]
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Argb> {
        self.colors.get(index).copied()
    }
}
impl PaletteStore for InMemoryPalette {
    fn colors(&self) -> &[Argb] {
        &self.colors
    }
    fn change_color(&mut self, index: usize, color: Argb) {
        let Some(slot) = self.colors.get_mut(index) else {
            log::debug!("ignoring change to missing slot {index}");
            return;
        };
        let from = std::mem::replace(slot, color);
        self.log.push(commands::Command::Changed {
            target: index,
            from,
            to: color,
        });
    }
    fn refresh(&mut self) {
        self.refreshes += 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn group_ranges() {
        let group = ColorGroup::new(2, 4, "hair");
        assert!(group.contains(2) && group.contains(5));
        assert!(!group.contains(1) && !group.contains(6));
        assert_eq!(group.live_indices(4), 2..4);
        assert_eq!(group.live_indices(1), 1..1);
        assert_eq!(ColorGroup::new(usize::MAX - 1, 5, "huge").end(), usize::MAX);
    }
    #[test]
    fn changes_are_logged() {
        let mut palette = InMemoryPalette::new(vec![Argb(1), Argb(2)]);
        palette.change_color(1, Argb(3));
        palette.change_color(5, Argb(4));
        assert_eq!(palette.colors(), &[Argb(1), Argb(3)]);
        assert_eq!(
            palette.log(),
            &[commands::Command::Changed {
                target: 1,
                from: Argb(2),
                to: Argb(3)
            }]
        );
        palette.refresh();
        assert_eq!(palette.refreshes(), 1);
    }
}
