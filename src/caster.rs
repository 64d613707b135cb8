use crate::shell::{SystemViewer, Viewer};
use crate::{CastError, ConversionRequest};
use ico_frames::{decode_ico, encode_ico, IconSize};
use image::{DynamicImage, ImageReader, ImageResult};
use log::{debug, error};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastStage {
    Initialized,
    Loaded,
    Encoded,
    Saved,
    Verified,
    Shown,
    Reported,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct CastReport {
    /// The target path as it was requested.
    pub target: PathBuf,
    /// Frame sizes read back from the written file.
    pub sizes: Vec<IconSize>,
    pub elapsed: Duration,
}

impl fmt::Display for CastReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated in {}s and saved at {}",
            self.elapsed.as_secs_f64(),
            self.target.display()
        )
    }
}

/// Converts images into icon files.
///
/// Load, save and verification failures are logged here and returned as
/// recoverable errors. A failing viewer is returned as a fatal error
/// ([`CastError::is_fatal`]) even though the icon has already been written.
pub struct IconCaster<V = SystemViewer> {
    viewer: V,
}

impl IconCaster {
    pub fn new() -> Self {
        IconCaster {
            viewer: SystemViewer,
        }
    }
}

impl Default for IconCaster {
    fn default() -> Self {
        IconCaster::new()
    }
}

impl<V: Viewer> IconCaster<V> {
    pub fn with_viewer(viewer: V) -> Self {
        IconCaster { viewer }
    }

    pub fn cast(&self, request: &ConversionRequest) -> Result<CastReport, CastError> {
        let started = Instant::now();
        let source = request.source();
        let target = request.target();
        enter(CastStage::Initialized, source);

        let image = load_image(source).map_err(|source_error| {
            logged(CastError::Load {
                path: source.to_owned(),
                source: source_error,
            })
        })?;
        enter(CastStage::Loaded, source);

        let save_error = |error: ico_frames::Error| {
            logged(CastError::Save {
                path: target.to_owned(),
                source: error,
            })
        };
        let encoded = encode_ico(&image, &request.resolved_sizes()).map_err(save_error)?;
        enter(CastStage::Encoded, target);
        fs::write(target, encoded).map_err(|error| save_error(error.into()))?;
        enter(CastStage::Saved, target);

        let icon = verify_saved_icon(target)?;
        enter(CastStage::Verified, target);

        if request.show_after() {
            self.viewer
                .show(target)
                .map_err(|error| CastError::Viewer {
                    path: target.to_owned(),
                    source: error,
                })?;
            enter(CastStage::Shown, target);
        }

        let report = CastReport {
            target: target.to_owned(),
            sizes: icon.sizes,
            elapsed: started.elapsed(),
        };
        enter(CastStage::Reported, target);
        Ok(report)
    }
}

fn load_image(path: &Path) -> ImageResult<DynamicImage> {
    ImageReader::open(path)?.with_guessed_format()?.decode()
}

fn read_icon(path: &Path) -> ico_frames::Result<ico_frames::DecodedIcon> {
    decode_ico(&fs::read(path)?)
}

/// Reopens a written icon. Failures are reported apart from source load failures.
fn verify_saved_icon(path: &Path) -> Result<ico_frames::DecodedIcon, CastError> {
    read_icon(path).map_err(|error| {
        logged(CastError::Verify {
            path: path.to_owned(),
            source: error,
        })
    })
}

fn enter(stage: CastStage, path: &Path) {
    debug!("{stage:?}: {}", path.display());
}

fn logged(error: CastError) -> CastError {
    error!(stage:? = error.stage(); "{error}");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ArgumentResolver, RawArguments, SizeSpec};
    use image::{GenericImageView, Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::io;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingViewer {
        shown: RefCell<Vec<PathBuf>>,
    }

    impl Viewer for RecordingViewer {
        fn show(&self, path: &Path) -> Result<(), opener::OpenError> {
            self.shown.borrow_mut().push(path.to_owned());
            Ok(())
        }
    }

    struct BrokenViewer;

    impl Viewer for BrokenViewer {
        fn show(&self, _path: &Path) -> Result<(), opener::OpenError> {
            Err(opener::OpenError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no viewer installed",
            )))
        }
    }

    fn scratch_dir() -> TempDir {
        tempfile::tempdir().expect("temporary directory")
    }

    fn write_source(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("source.png");
        RgbaImage::from_fn(64, 48, |x, y| Rgba([(x * 3) as u8, (y * 5) as u8, 200, 255]))
            .save(&path)
            .expect("source image written");
        path
    }

    fn request(source: &Path, target: &Path, sizes: Option<&[u32]>, view: bool) -> ConversionRequest {
        ArgumentResolver::default()
            .resolve(RawArguments {
                source: Some(source.to_owned()),
                target: Some(target.to_owned()),
                sizes: sizes.map(|s| SizeSpec::Squares(s.to_vec())),
                view,
            })
            .expect("valid arguments")
    }

    fn cast(request: &ConversionRequest) -> Result<CastReport, CastError> {
        IconCaster::with_viewer(RecordingViewer::default()).cast(request)
    }

    fn squares(dimensions: &[u32]) -> Vec<IconSize> {
        dimensions
            .iter()
            .map(|&d| IconSize::from_dimensions(d, d).expect("positive dimension"))
            .collect()
    }

    fn directory_of(path: &Path) -> Vec<IconSize> {
        ico_frames::read_directory(&fs::read(path).expect("icon written")).expect("valid icon")
    }

    #[test]
    fn default_size_is_used_without_requested_sizes() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        let report = cast(&request(&write_source(&dir), &target, None, false)).expect("converted");
        assert_eq!(squares(&[255]), report.sizes);
        assert_eq!(squares(&[255]), directory_of(&target));
        assert_eq!(target, report.target);
    }

    #[test]
    fn requested_sizes_are_written_in_order() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        let sizes = [64, 16, 32, 16, 128];
        let report =
            cast(&request(&write_source(&dir), &target, Some(&sizes), false)).expect("converted");
        assert_eq!(squares(&sizes), report.sizes);
        assert_eq!(squares(&sizes), directory_of(&target));
    }

    #[test]
    fn missing_source_produces_no_output() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        let result = cast(&request(&dir.path().join("missing.png"), &target, None, false));
        let error = result.expect_err("source is missing");
        assert!(matches!(error, CastError::Load { .. }));
        assert_eq!(CastStage::Loaded, error.stage());
        assert!(!error.is_fatal());
        assert!(!target.exists());
    }

    #[test]
    fn failed_load_leaves_existing_target_untouched() {
        let dir = scratch_dir();
        let source = dir.path().join("corrupt.png");
        let target = dir.path().join("icon.ico");
        fs::write(&source, b"definitely not an image").expect("source written");
        fs::write(&target, b"previous").expect("target written");
        let result = cast(&request(&source, &target, None, false));
        assert!(matches!(result, Err(CastError::Load { .. })));
        assert_eq!(b"previous".as_slice(), fs::read(&target).expect("target kept"));
    }

    #[test]
    fn output_decodes_as_an_icon() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        cast(&request(&write_source(&dir), &target, Some(&[16, 48]), false)).expect("converted");
        let icon = decode_ico(&fs::read(&target).expect("icon written")).expect("valid icon");
        assert_eq!(squares(&[16, 48]), icon.sizes);
        assert_eq!((48, 48), icon.image.dimensions());
    }

    #[test]
    fn repeated_conversions_are_identical() {
        let dir = scratch_dir();
        let source = write_source(&dir);
        let first = dir.path().join("first.ico");
        let second = dir.path().join("second.ico");
        cast(&request(&source, &first, Some(&[32, 24]), false)).expect("converted");
        cast(&request(&source, &second, Some(&[32, 24]), false)).expect("converted");
        assert_eq!(
            fs::read(&first).expect("icon written"),
            fs::read(&second).expect("icon written")
        );
    }

    #[test]
    fn view_flag_does_not_change_output() {
        let dir = scratch_dir();
        let source = write_source(&dir);
        let hidden = dir.path().join("hidden.ico");
        let shown = dir.path().join("shown.ico");
        let viewer = RecordingViewer::default();
        let caster = IconCaster::with_viewer(&viewer);

        caster
            .cast(&request(&source, &hidden, Some(&[32]), false))
            .expect("converted");
        assert!(viewer.shown.borrow().is_empty());
        caster
            .cast(&request(&source, &shown, Some(&[32]), true))
            .expect("converted");

        assert_eq!(vec![shown.clone()], *viewer.shown.borrow());
        assert_eq!(
            fs::read(&hidden).expect("icon written"),
            fs::read(&shown).expect("icon written")
        );
    }

    #[test]
    fn viewer_failure_is_fatal_after_saving() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        let error = IconCaster::with_viewer(BrokenViewer)
            .cast(&request(&write_source(&dir), &target, Some(&[16]), true))
            .expect_err("viewer is broken");
        assert!(error.is_fatal());
        assert_eq!(CastStage::Shown, error.stage());
        assert_eq!(squares(&[16]), directory_of(&target));
    }

    #[test]
    fn oversized_frames_fail_without_writing() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        let error = cast(&request(&write_source(&dir), &target, Some(&[16, 512]), false))
            .expect_err("512 is too large");
        assert!(matches!(
            error,
            CastError::Save {
                source: ico_frames::Error::UnsupportedSize(_),
                ..
            }
        ));
        assert!(!error.is_fatal());
        assert!(!target.exists());
    }

    #[test]
    fn unwritable_target_is_a_save_error() {
        let dir = scratch_dir();
        let target = dir.path().join("missing-dir").join("icon.ico");
        let error = cast(&request(&write_source(&dir), &target, None, false))
            .expect_err("parent directory is missing");
        assert!(matches!(
            error,
            CastError::Save {
                source: ico_frames::Error::Io(_),
                ..
            }
        ));
        assert_eq!(target, error.path());
    }

    #[test]
    fn unreadable_saved_icon_is_a_verify_error() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        fs::write(&target, b"not an icon").expect("target written");
        let error = verify_saved_icon(&target).expect_err("not an icon container");
        assert!(matches!(
            error,
            CastError::Verify {
                source: ico_frames::Error::Malformed(_),
                ..
            }
        ));
        assert_eq!(CastStage::Verified, error.stage());
        assert_eq!(target, error.path());
        assert!(!error.is_fatal());
    }

    #[test]
    fn missing_saved_icon_is_a_verify_error() {
        let dir = scratch_dir();
        let error = verify_saved_icon(&dir.path().join("gone.ico")).expect_err("file is missing");
        assert!(matches!(
            error,
            CastError::Verify {
                source: ico_frames::Error::Io(_),
                ..
            }
        ));
        assert!(!error.is_fatal());
    }

    #[test]
    fn written_icon_passes_verification() {
        let dir = scratch_dir();
        let target = dir.path().join("icon.ico");
        cast(&request(&write_source(&dir), &target, Some(&[24]), false)).expect("converted");
        let icon = verify_saved_icon(&target).expect("valid icon");
        assert_eq!(squares(&[24]), icon.sizes);
    }

    #[test]
    fn report_mentions_target() {
        let report = CastReport {
            target: PathBuf::from("out.ico"),
            sizes: squares(&[16]),
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!("Generated in 1.5s and saved at out.ico", report.to_string());
    }
}
