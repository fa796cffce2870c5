use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcropperError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image '{0}' is already cropped")]
    AlreadyCropped(String),

    #[error("Image '{0}' has no fragments to pack (not cropped, or fully transparent)")]
    NotCropped(String),

    #[error("Image '{0}' is already registered with the compositor")]
    AlreadyRegistered(String),

    #[error("No fragments registered with the compositor")]
    NothingToPack,

    #[error(
        "Fragment of '{name}' ({width}x{height}) does not fit a {texture_size}x{texture_size} texture with padding {padding}"
    )]
    FragmentTooLarge {
        name: String,
        width: u32,
        height: u32,
        texture_size: u32,
        padding: u32,
    },

    #[error("Slice at ({x}, {y}) exceeds texture {texture}")]
    PasteOutOfBounds { texture: usize, x: u32, y: u32 },

    #[error("Invalid fragment operation: {0}")]
    InvalidFragmentState(&'static str),

    #[error("Rotation must be a quarter turn (90, -90, 270 or -270 degrees), got {0}")]
    InvalidRotation(f32),

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build XML descriptor: {0}")]
    Xml(String),

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("No valid images found in input")]
    NoImages,
}
