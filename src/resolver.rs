use crate::ConversionRequest;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use ico_frames::IconSize;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_TARGET: &str = "./image.ico";

/// Command line of `icon-caster`.
///
/// Paths can be given positionally (`SOURCE TARGET`) or with `-F`/`-T`.
/// A path given as an option can't also be given positionally.
#[derive(Parser, Debug)]
#[command(
    about = "Takes any image format and converts it to .ico format.",
    after_help = "Progress messages are logged; run with RUST_LOG=info to see them."
)]
pub struct CliArguments {
    /// Location of the image to convert.
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Location where the icon is saved (should end with .ico).
    #[arg(value_name = "TARGET")]
    target: Option<PathBuf>,

    #[arg(
        short = 'F',
        long = "filepath",
        value_name = "SOURCE",
        conflicts_with = "source"
    )]
    source_option: Option<PathBuf>,

    #[arg(
        short = 'T',
        long = "targetpath",
        value_name = "TARGET",
        conflicts_with = "target"
    )]
    target_option: Option<PathBuf>,

    /// Frame sizes, `N` for an NxN square or `WxH`.
    #[arg(
        short = 'S',
        long = "sizes",
        visible_short_alias = 'D',
        visible_aliases = ["dimensions", "imagesize"],
        num_args = 1..,
        value_name = "SIZE"
    )]
    sizes: Option<Vec<IconSize>>,

    /// Open the generated icon in the default viewer.
    #[arg(short = 'V', long)]
    view: bool,
}

/// Conversion parameters as supplied by a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArguments {
    pub source: Option<PathBuf>,
    pub target: Option<PathBuf>,
    pub sizes: Option<SizeSpec>,
    pub view: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeSpec {
    /// Each dimension `d` becomes a `d`x`d` frame.
    Squares(Vec<u32>),
    Pairs(Vec<(u32, u32)>),
}

impl SizeSpec {
    fn into_sizes(self) -> Result<Vec<IconSize>, ResolveError> {
        let pairs = match self {
            SizeSpec::Squares(dimensions) => dimensions.into_iter().map(|d| (d, d)).collect(),
            SizeSpec::Pairs(pairs) => pairs,
        };
        if pairs.is_empty() {
            return Err(ResolveError::EmptySizes);
        }
        pairs
            .into_iter()
            .map(|(width, height)| {
                IconSize::from_dimensions(width, height)
                    .ok_or(ResolveError::InvalidSize(width, height))
            })
            .collect()
    }
}

impl From<CliArguments> for RawArguments {
    fn from(cli: CliArguments) -> Self {
        RawArguments {
            source: cli.source_option.or(cli.source),
            target: cli.target_option.or(cli.target),
            sizes: cli.sizes.map(|sizes| {
                SizeSpec::Pairs(sizes.iter().map(|s| (s.width(), s.height())).collect())
            }),
            view: cli.view,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Target used when none is given. `None` makes the target mandatory.
    pub default_target: Option<PathBuf>,
}

impl ResolverConfig {
    pub fn require_target() -> Self {
        ResolverConfig {
            default_target: None,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            default_target: Some(PathBuf::from(DEFAULT_TARGET)),
        }
    }
}

/// Turns command-line tokens or [`RawArguments`] into a [`ConversionRequest`].
/// Paths are not checked against the filesystem here.
#[derive(Debug, Clone, Default)]
pub struct ArgumentResolver {
    config: ResolverConfig,
}

impl ArgumentResolver {
    pub fn new(config: ResolverConfig) -> Self {
        ArgumentResolver { config }
    }

    pub fn resolve(&self, raw: RawArguments) -> Result<ConversionRequest, ResolveError> {
        let source = raw
            .source
            .ok_or(ResolveError::MissingArgument("source path"))?;
        let target = raw
            .target
            .or_else(|| self.config.default_target.clone())
            .ok_or(ResolveError::MissingArgument("target path"))?;
        let sizes = raw.sizes.map(SizeSpec::into_sizes).transpose()?;
        Ok(ConversionRequest::new(source, target, sizes, raw.view))
    }

    pub fn resolve_cli(&self, cli: CliArguments) -> Result<ConversionRequest, ResolveError> {
        self.resolve(RawArguments::from(cli))
    }

    pub fn resolve_tokens<I, T>(&self, tokens: I) -> Result<ConversionRequest, ResolveError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.resolve_cli(CliArguments::try_parse_from(tokens)?)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),
    #[error("At least one icon size is required")]
    EmptySizes,
    #[error("Invalid icon size {0}x{1}, both sides must be positive")]
    InvalidSize(u32, u32),
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl ResolveError {
    /// Reports the error the way clap reports its own and exits with a non-zero status.
    pub fn exit(self) -> ! {
        let kind = match &self {
            ResolveError::Cli(error) => error.exit(),
            ResolveError::MissingArgument(_) => ErrorKind::MissingRequiredArgument,
            ResolveError::EmptySizes | ResolveError::InvalidSize(..) => ErrorKind::InvalidValue,
        };
        CliArguments::command().error(kind, self).exit()
    }
}
