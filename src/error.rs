use crate::CastStage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CastError {
    #[error("Couldn't load image from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Couldn't save image at {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: ico_frames::Error,
    },
    #[error("Couldn't reopen saved icon at {}: {source}", .path.display())]
    Verify {
        path: PathBuf,
        source: ico_frames::Error,
    },
    #[error("Couldn't show {} in the default viewer: {source}", .path.display())]
    Viewer {
        path: PathBuf,
        source: opener::OpenError,
    },
}

impl CastError {
    /// The stage the conversion failed to reach.
    pub fn stage(&self) -> CastStage {
        match self {
            CastError::Load { .. } => CastStage::Loaded,
            CastError::Save { .. } => CastStage::Saved,
            CastError::Verify { .. } => CastStage::Verified,
            CastError::Viewer { .. } => CastStage::Shown,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            CastError::Load { path, .. }
            | CastError::Save { path, .. }
            | CastError::Verify { path, .. }
            | CastError::Viewer { path, .. } => path,
        }
    }

    /// Viewer failures happen after the icon is on disk and are not recovered from.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CastError::Viewer { .. })
    }
}
