//! Builds and inspects ICO containers on top of the `image` codecs.

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::PngEncoder;
use image::imageops::{resize, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use std::io;
use thiserror::Error;

mod directory;
pub use self::directory::*;
mod size;
pub use self::size::*;

/// Largest side length a single ICO frame can have.
pub const MAX_ICON_DIMENSION: u32 = 256;

/// Encodes `image` as an ICO container with one frame per entry in `sizes`.
/// Frames keep the order of `sizes` (duplicates included) and are scaled to
/// exactly the requested size, so non-square sources get stretched.
///
/// The whole container is built in memory; nothing is written on failure.
///
/// ## Example
/// ```no_run
/// use ico_frames::{encode_ico, IconSize};
///
/// let image = image::open("logo.png")?;
/// let sizes: Vec<IconSize> = ["16", "32", "48"]
///     .iter()
///     .map(|s| s.parse())
///     .collect::<Result<_, _>>()?;
/// std::fs::write("logo.ico", encode_ico(&image, &sizes)?)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode_ico(image: &DynamicImage, sizes: &[IconSize]) -> Result<Vec<u8>> {
    if sizes.is_empty() {
        return Err(Error::NoSizes);
    }

    let source = image.to_rgba8();
    let frames: Vec<_> = sizes
        .iter()
        .map(|&size| create_ico_frame(&source, size))
        .collect::<Result<_>>()?;

    let mut encoded = Vec::new();
    IcoEncoder::new(&mut encoded).encode_images(&frames)?;
    Ok(encoded)
}

/// An ICO container read back from disk.
#[derive(Debug)]
pub struct DecodedIcon {
    /// Frame sizes in directory order.
    pub sizes: Vec<IconSize>,
    /// The largest frame.
    pub image: DynamicImage,
}

/// Returns the directory of an ICO container together with its largest frame.
pub fn decode_ico(bytes: &[u8]) -> Result<DecodedIcon> {
    let sizes = read_directory(bytes)?;
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Ico)?;
    Ok(DecodedIcon { sizes, image })
}

fn create_ico_frame(source: &RgbaImage, size: IconSize) -> Result<IcoFrame<'static>> {
    if size.width() > MAX_ICON_DIMENSION || size.height() > MAX_ICON_DIMENSION {
        return Err(Error::UnsupportedSize(size));
    }
    let resized = resize(source, size.width(), size.height(), FilterType::Lanczos3);
    encode_ico_frame(resized.as_raw(), size)
}

fn encode_ico_frame(buf: &[u8], size: IconSize) -> Result<IcoFrame<'static>> {
    let color_type = ExtendedColorType::Rgba8;
    let mut encoded = Vec::new();
    PngEncoder::new(&mut encoded).write_image(buf, size.width(), size.height(), color_type)?;
    Ok(IcoFrame::with_encoded(
        encoded,
        size.width(),
        size.height(),
        color_type,
    )?)
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("No icon sizes were requested")]
    NoSizes,
    #[error("Icon frames can be at most 256px per side, got {0}")]
    UnsupportedSize(IconSize),
    #[error("Malformed icon container: {0}")]
    Malformed(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
