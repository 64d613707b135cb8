#![warn(clippy::str_to_string)]
#![warn(clippy::unwrap_used)]

//! Converts raster images into multi-resolution ICO files.
//!
//! An [`ArgumentResolver`] validates command-line or caller-supplied arguments
//! into a [`ConversionRequest`], which an [`IconCaster`] then turns into an
//! icon file on disk.

mod caster;
pub use caster::*;
mod error;
pub use error::*;
mod request;
pub use request::*;
mod resolver;
pub use resolver::*;
pub mod shell;

pub use ico_frames::IconSize;
