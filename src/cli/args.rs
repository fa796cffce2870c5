use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "icropper")]
#[command(
    version,
    about = "Crops sprites into opaque fragments and packs them into textures",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crop and pack a list of images into one set of textures
    Pack(PackArgs),
    /// Walk a directory tree and pack it following its _iconfig.json files
    Batch(BatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Source image files (each entry may hold several space-separated names)
    #[arg(required_unless_present = "config")]
    pub files: Vec<String>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the source files are relative to [default: .]
    #[arg(short = 's', long)]
    pub src_path: Option<PathBuf>,

    /// Output directory [default: .]
    #[arg(short = 'o', long)]
    pub out_path: Option<PathBuf>,

    /// Base name for output files [default: first image's name]
    #[arg(short = 'n', long)]
    pub out_file: Option<String>,

    /// Write the XML descriptor only (no binary descriptor)
    #[arg(long, conflicts_with = "icb_only")]
    pub xml_only: bool,

    /// Write the binary descriptor only (no XML descriptor)
    #[arg(long)]
    pub icb_only: bool,

    /// Rescale every source before cropping [default: 1.0]
    #[arg(long)]
    pub scale: Option<f32>,

    /// Base cropping block size in pixels [default: 100]
    #[arg(short = 'b', long)]
    pub block_size: Option<u32>,

    /// Fragments with at most this area are not subdivided [default: 1000]
    #[arg(long)]
    pub crop_min_area: Option<u64>,

    /// Fragments at least this full are not subdivided [default: 0.6]
    #[arg(long)]
    pub crop_max_ratio: Option<f32>,

    /// Maximum subdivision depth [default: 4]
    #[arg(long)]
    pub crop_max_depth: Option<u32>,

    /// Never halve the estimated texture size
    #[arg(long)]
    pub force_single: bool,

    /// Maximum texture side in pixels [default: 2048]
    #[arg(long)]
    pub max_texture_size: Option<u32>,

    /// Accepted for compatibility; textures are always sized automatically
    #[arg(long)]
    pub fixed_texture_size: Option<u32>,

    /// Padding between fragments in pixels [default: 1]
    #[arg(short = 'p', long)]
    pub texture_padding: Option<u32>,

    /// Report image_y bottom-up [default: true]
    #[arg(long, value_name = "BOOL")]
    pub y_axis_up: Option<bool>,

    /// Allow fragments to be placed turned a quarter [default: true]
    #[arg(long, value_name = "BOOL")]
    pub enable_rotate: Option<bool>,

    /// Texture file extension [default: png]
    #[arg(long)]
    pub texture_suffix: Option<String>,

    /// XML descriptor extension [default: xml]
    #[arg(long)]
    pub xmlfile_suffix: Option<String>,

    /// Binary descriptor extension [default: icb]
    #[arg(long)]
    pub icbfile_suffix: Option<String>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Root directory of the sources
    pub input: PathBuf,

    /// Root directory of the outputs [default: INPUT]
    pub output: Option<PathBuf>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Pack(args) => args.verbose,
            Command::Batch(args) => args.verbose,
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

impl From<&crate::config::CompressConfig> for CompressionLevel {
    fn from(config: &crate::config::CompressConfig) -> Self {
        match config {
            crate::config::CompressConfig::Level(n) => CompressionLevel::Level((*n).min(6)),
            crate::config::CompressConfig::Max(_) => CompressionLevel::Max,
        }
    }
}
