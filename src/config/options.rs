use crate::packing::Size;

pub const DEFAULT_BLOCK_SIZE: u32 = 100;
pub const DEFAULT_MIN_AREA: u64 = 1000;
pub const DEFAULT_CROP_DEPTH: u32 = 4;
pub const DEFAULT_CROP_USAGE_RATIO: f32 = 0.6;
pub const DEFAULT_ROTATE_DEGREES: f32 = -90.0;

pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 2048;
pub const DEFAULT_TEXTURE_PADDING: u32 = 1;
pub const DEFAULT_TEXTURE_SUFFIX: &str = "png";
pub const DEFAULT_XML_SUFFIX: &str = "xml";
pub const DEFAULT_BIN_SUFFIX: &str = "icb";

/// Per-image cropping settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOptions {
    /// Size of the first-level grid cells
    pub block_size: Size,
    /// Fragments with at most this many pixels are not subdivided
    pub min_area: u64,
    /// Maximum tree depth below the root
    pub crop_depth: u32,
    /// Fragments with at least this share of non-transparent pixels are not subdivided
    pub crop_usage_ratio: f32,
    /// Angle applied to fragments the compositor places rotated
    pub rotate_degrees: f32,
    /// Rescale factor applied before cropping
    pub scale_ratio: f32,
}

impl CropOptions {
    /// Ratios within one percent of 1.0 leave the image untouched.
    pub fn is_scaled(&self) -> bool {
        self.scale_ratio < 0.99 || self.scale_ratio > 1.01
    }
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            block_size: Size::new(DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_SIZE),
            min_area: DEFAULT_MIN_AREA,
            crop_depth: DEFAULT_CROP_DEPTH,
            crop_usage_ratio: DEFAULT_CROP_USAGE_RATIO,
            rotate_degrees: DEFAULT_ROTATE_DEGREES,
            scale_ratio: 1.0,
        }
    }
}

/// Packing and output settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositorOptions {
    pub max_texture_size: u32,
    pub texture_padding: u32,
    pub texture_file_suffix: String,
    pub xml_file_suffix: String,
    pub icb_file_suffix: String,
    /// Never halve the estimated texture width
    pub force_single_texture: bool,
    /// Report `image_y` bottom-up
    pub flip_axis_y: bool,
    /// Allow fragments to be placed turned a quarter
    pub enable_rotate: bool,
    /// Accepted for compatibility; texture sizes are always estimated
    pub fixed_texture_size: u32,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            texture_padding: DEFAULT_TEXTURE_PADDING,
            texture_file_suffix: DEFAULT_TEXTURE_SUFFIX.to_string(),
            xml_file_suffix: DEFAULT_XML_SUFFIX.to_string(),
            icb_file_suffix: DEFAULT_BIN_SUFFIX.to_string(),
            force_single_texture: false,
            flip_axis_y: true,
            enable_rotate: true,
            fixed_texture_size: 0,
        }
    }
}
