pub mod color_wheel;
pub mod editors;
pub mod splitter;
pub mod swatch;

pub use color_wheel::{ColorWheel, ColorWheelWindow};
