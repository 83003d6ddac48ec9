//! Platform screen picking backends.

#[cfg(target_os = "windows")]
mod win32;
mod unsupported;

#[cfg(target_os = "windows")]
pub use win32::{GdiPixels, Win32Backend};
pub use unsupported::{NoPixels, UnsupportedBackend};

use palwheel_core::picker::PickerBackend;

/// Whether this platform can pick colors from outside the host window.
#[must_use]
pub const fn picking_supported() -> bool {
    cfg!(target_os = "windows")
}

/// The best picker backend for this platform.
#[must_use]
pub fn default_backend() -> Box<dyn PickerBackend> {
    #[cfg(target_os = "windows")]
    {
        Box::new(Win32Backend::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedBackend::default())
    }
}
