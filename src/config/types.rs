use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::options::{
    CompositorOptions, CropOptions, DEFAULT_BIN_SUFFIX, DEFAULT_BLOCK_SIZE, DEFAULT_CROP_DEPTH,
    DEFAULT_CROP_USAGE_RATIO, DEFAULT_MAX_TEXTURE_SIZE, DEFAULT_MIN_AREA, DEFAULT_ROTATE_DEGREES,
    DEFAULT_TEXTURE_PADDING, DEFAULT_TEXTURE_SUFFIX, DEFAULT_XML_SUFFIX,
};
use crate::packing::Size;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// icropper configuration file structure.
///
/// Every command-line option has a field here. Paths are relative to the
/// config file location. The batch-only fields (`ignores` and below) are
/// read from the `_iconfig.json` files found while walking a directory tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IcropperConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Directory the source files are relative to
    pub src_path: String,
    /// Source image files or glob patterns
    pub src_files: Vec<String>,
    /// Output directory for textures and descriptors
    pub out_path: String,
    /// Base name of the output files; empty derives it from the first image
    pub out_file: String,
    /// Write only the XML descriptor
    pub xml_only: bool,
    /// Write only the binary descriptor
    pub icb_only: bool,
    /// Rescale factor applied to each source before cropping
    pub scale: f32,
    /// Base cropping unit in pixels
    pub block_size: u32,
    /// Fragments with at most this area are not subdivided
    pub crop_min_area: u64,
    /// Fragments at least this full are not subdivided
    pub crop_max_ratio: f32,
    /// Maximum subdivision depth
    pub crop_max_depth: u32,
    /// Rotation applied to fragments placed turned
    pub rotate_degrees: f32,
    /// Never halve the estimated texture size
    pub force_single: bool,
    /// Maximum texture side in pixels
    pub max_texture_size: u32,
    /// Accepted but unused; 0 means estimated sizes
    pub fixed_texture_size: u32,
    /// Padding between fragments in pixels
    pub texture_padding: u32,
    /// Report image_y bottom-up
    pub y_axis_up: bool,
    /// Allow quarter-turn placement
    pub enable_rotate: bool,
    pub texture_suffix: String,
    pub xmlfile_suffix: String,
    pub icbfile_suffix: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Directory or file names skipped by the batch walk
    pub ignores: Vec<String>,
    /// File extensions picked up by the batch walk
    pub filters: Vec<String>,
    /// Pack every remaining file on its own
    pub process_all: bool,
    /// Pack a whole directory into one output
    pub pack_dir: bool,
    /// Output name for `pack_dir`; empty uses the directory name
    pub pack_name: String,
    /// Named outputs, each packing the listed files together
    pub outputs: BTreeMap<String, Vec<String>>,
}

impl Default for IcropperConfig {
    fn default() -> Self {
        Self {
            version: 1,
            src_path: String::new(),
            src_files: Vec::new(),
            out_path: String::new(),
            out_file: String::new(),
            xml_only: false,
            icb_only: false,
            scale: 1.0,
            block_size: DEFAULT_BLOCK_SIZE,
            crop_min_area: DEFAULT_MIN_AREA,
            crop_max_ratio: DEFAULT_CROP_USAGE_RATIO,
            crop_max_depth: DEFAULT_CROP_DEPTH,
            rotate_degrees: DEFAULT_ROTATE_DEGREES,
            force_single: false,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            fixed_texture_size: 0,
            texture_padding: DEFAULT_TEXTURE_PADDING,
            y_axis_up: true,
            enable_rotate: true,
            texture_suffix: DEFAULT_TEXTURE_SUFFIX.to_string(),
            xmlfile_suffix: DEFAULT_XML_SUFFIX.to_string(),
            icbfile_suffix: DEFAULT_BIN_SUFFIX.to_string(),
            compress: None,
            ignores: vec![".svn".to_string()],
            filters: vec![".png".to_string(), ".bmp".to_string()],
            process_all: true,
            pack_dir: false,
            pack_name: String::new(),
            outputs: BTreeMap::new(),
        }
    }
}

impl IcropperConfig {
    pub fn crop_options(&self) -> CropOptions {
        CropOptions {
            block_size: Size::new(self.block_size, self.block_size),
            min_area: self.crop_min_area,
            crop_depth: self.crop_max_depth,
            crop_usage_ratio: self.crop_max_ratio,
            rotate_degrees: self.rotate_degrees,
            scale_ratio: self.scale,
        }
    }

    pub fn compositor_options(&self) -> CompositorOptions {
        CompositorOptions {
            max_texture_size: self.max_texture_size,
            texture_padding: self.texture_padding,
            texture_file_suffix: self.texture_suffix.clone(),
            xml_file_suffix: self.xmlfile_suffix.clone(),
            icb_file_suffix: self.icbfile_suffix.clone(),
            force_single_texture: self.force_single,
            flip_axis_y: self.y_axis_up,
            enable_rotate: self.enable_rotate,
            fixed_texture_size: self.fixed_texture_size,
        }
    }
}
