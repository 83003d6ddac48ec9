//! Framework-independent core of the palette color wheel: color math, disk geometry, the
//! per-instance interaction state machine, pane layout, and the screen picker's thread handoff.
//!
//! Nothing in here knows about a particular UI toolkit or operating system. The toolkit feeds in
//! a [`controller::PointerState`] each frame and paints the [`controller::WheelFrame`] it gets
//! back. The OS plugs in through [`picker::PickerBackend`].

pub mod color;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod picker;
pub mod state;

pub use color::Argb;
pub use config::WheelConfig;
pub use controller::{PointerState, SlotEdit, WheelController, WheelFrame};
pub use palette::{ColorGroup, PaletteStore};
pub use state::InstanceKey;
