//! Native open/save dialogs for timer configurations.
//!
//! Only Windows links `rfd`; elsewhere the dialog never returns a path and
//! configurations are opened from `settings.json` instead.

#[cfg(target_os = "windows")]
pub use rfd::FileDialog;

#[cfg(not(target_os = "windows"))]
#[derive(Default)]
pub struct FileDialog;

#[cfg(not(target_os = "windows"))]
impl FileDialog {
    pub fn new() -> Self {
        FileDialog
    }

    pub fn add_filter(self, _name: &str, _extensions: &[&str]) -> Self {
        self
    }

    pub fn set_directory<P: AsRef<std::path::Path>>(self, _path: P) -> Self {
        self
    }

    pub fn pick_file(self) -> Option<std::path::PathBuf> {
        tracing::debug!("file dialogs are unavailable on this platform");
        None
    }

    pub fn save_file(self) -> Option<std::path::PathBuf> {
        tracing::debug!("file dialogs are unavailable on this platform");
        None
    }
}
