use std::path::Path;

/// Displays a generated icon to the user.
pub trait Viewer {
    fn show(&self, path: &Path) -> Result<(), opener::OpenError>;
}

/// Opens files with the platform's default application.
/// Only the launch is awaited, never the viewer itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemViewer;

impl Viewer for SystemViewer {
    fn show(&self, path: &Path) -> Result<(), opener::OpenError> {
        opener::open(path)
    }
}

impl<V: Viewer + ?Sized> Viewer for &V {
    fn show(&self, path: &Path) -> Result<(), opener::OpenError> {
        (**self).show(path)
    }
}
