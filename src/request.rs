use ico_frames::IconSize;
use std::borrow::Cow;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

/// Used when a request does not name any sizes.
pub const DEFAULT_ICON_SIZE: IconSize = match NonZeroU32::new(255) {
    Some(dimension) => IconSize::square(dimension),
    None => panic!("default icon size must be positive"),
};

/// A validated conversion job. Built by [`crate::ArgumentResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source: PathBuf,
    target: PathBuf,
    sizes: Option<Vec<IconSize>>,
    show_after: bool,
}

impl ConversionRequest {
    /// `sizes` must not be `Some` of an empty list.
    pub(crate) fn new(
        source: PathBuf,
        target: PathBuf,
        sizes: Option<Vec<IconSize>>,
        show_after: bool,
    ) -> Self {
        debug_assert!(sizes.as_ref().map_or(true, |s| !s.is_empty()));
        ConversionRequest {
            source,
            target,
            sizes,
            show_after,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn sizes(&self) -> Option<&[IconSize]> {
        self.sizes.as_deref()
    }

    pub fn show_after(&self) -> bool {
        self.show_after
    }

    /// The requested sizes, or [`DEFAULT_ICON_SIZE`] alone if none were given.
    pub fn resolved_sizes(&self) -> Cow<'_, [IconSize]> {
        match &self.sizes {
            Some(sizes) => Cow::Borrowed(sizes),
            None => Cow::Owned(vec![DEFAULT_ICON_SIZE]),
        }
    }
}
