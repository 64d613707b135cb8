use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

/// Width and height of a single frame inside an icon container.
/// Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconSize {
    width: NonZeroU32,
    height: NonZeroU32,
}

impl IconSize {
    pub const fn new(width: NonZeroU32, height: NonZeroU32) -> Self {
        IconSize { width, height }
    }

    pub const fn square(dimension: NonZeroU32) -> Self {
        IconSize::new(dimension, dimension)
    }

    /// Returns `None` if either side is zero.
    pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
        Some(IconSize::new(NonZeroU32::new(width)?, NonZeroU32::new(height)?))
    }

    pub fn width(&self) -> u32 {
        self.width.get()
    }

    pub fn height(&self) -> u32 {
        self.height.get()
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid icon size '{input}', expected a positive integer or WIDTHxHEIGHT")]
pub struct ParseIconSizeError {
    input: String,
}

/// Accepts either a single dimension (`32`, a square) or an explicit pair (`16x24`).
impl FromStr for IconSize {
    type Err = ParseIconSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseIconSizeError {
            input: s.to_owned(),
        };
        let (width, height) = s
            .split_once(|c| c == 'x' || c == 'X')
            .unwrap_or((s, s));
        let width = parse_dimension(width).ok_or_else(invalid)?;
        let height = parse_dimension(height).ok_or_else(invalid)?;
        Ok(IconSize::new(width, height))
    }
}

fn parse_dimension(s: &str) -> Option<NonZeroU32> {
    s.trim().parse().ok()
}
