//! Global singletons.

pub mod settings;

use palwheel_core::WheelConfig;

/// The user's wheel settings, or defaults.
pub fn config() -> &'static WheelConfig {
    &settings::Settings::get().config
}
