use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};
use log::debug;

use super::fragment::{FragmentId, FragmentTree};
use super::resizer::{resize_box, scaled_size};
use crate::config::CropOptions;
use crate::error::IcropperError;
use crate::packing::Size;

/// A source sprite and the fragments it was cropped into
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File name as given, relative to the source directory
    filename: String,
    /// Decoded pixels; rescaled in place by `crop` when scaling is configured
    raw_image: RgbaImage,
    /// Size of `raw_image` (after scaling)
    raw_size: Size,
    tree: Option<FragmentTree>,
    leaves: Vec<FragmentId>,
    options: CropOptions,
}

impl SourceImage {
    /// Decode `path/filename` with default crop options
    pub fn create_with_file_name(
        filename: &str,
        path: Option<&Path>,
    ) -> Result<Self, IcropperError> {
        let full_path = match path {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        };

        let image = ImageReader::open(&full_path)
            .map_err(|e| IcropperError::ImageLoad {
                path: full_path.clone(),
                source: e.into(),
            })?
            .with_guessed_format()
            .map_err(|e| IcropperError::ImageLoad {
                path: full_path.clone(),
                source: e.into(),
            })?
            .decode()
            .map_err(|e| IcropperError::ImageLoad {
                path: full_path.clone(),
                source: e,
            })?
            .into_rgba8();

        Ok(Self::from_image(filename, image))
    }

    /// Wrap an already decoded buffer
    pub fn from_image(filename: impl Into<String>, image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            filename: filename.into(),
            raw_image: image,
            raw_size: Size::new(width, height),
            tree: None,
            leaves: Vec::new(),
            options: CropOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CropOptions) -> Self {
        self.options = options;
        self
    }

    pub fn file_name(&self) -> &str {
        &self.filename
    }

    /// File name without its extension
    pub fn file_stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }

    pub fn size(&self) -> Size {
        self.raw_size
    }

    pub fn raw_image(&self) -> &RgbaImage {
        &self.raw_image
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Options can only change before cropping
    pub fn options_mut(&mut self) -> Option<&mut CropOptions> {
        if self.tree.is_some() {
            None
        } else {
            Some(&mut self.options)
        }
    }

    pub fn is_cropped(&self) -> bool {
        self.tree.is_some()
    }

    pub fn fragment_tree(&self) -> Option<&FragmentTree> {
        self.tree.as_ref()
    }

    pub(crate) fn fragment_tree_mut(&mut self) -> Option<&mut FragmentTree> {
        self.tree.as_mut()
    }

    /// Leaf fragments in tree order; empty before cropping or for a fully
    /// transparent image
    pub fn leaves(&self) -> &[FragmentId] {
        &self.leaves
    }

    /// Cut the image into fragments. Runs once; later calls fail without
    /// touching the existing tree.
    pub fn crop(&mut self) -> Result<(), IcropperError> {
        if self.tree.is_some() {
            return Err(IcropperError::AlreadyCropped(self.filename.clone()));
        }
        // Nothing may change before the checks pass, so a failed crop can be retried
        if self.options.block_size.is_zero() {
            return Err(IcropperError::InvalidFragmentState(
                "block size must not be zero",
            ));
        }

        if self.options.is_scaled() {
            let scaled = scaled_size(self.raw_size, self.options.scale_ratio);
            self.raw_image = resize_box(&self.raw_image, scaled);
            self.raw_size = scaled;
        }

        let mut tree = FragmentTree::new(self.raw_image.clone(), self.options);
        let root = tree.root();
        tree.crop_with_fixed_size(root, self.options.block_size)?;

        self.leaves = if tree.get(root).is_leaf() {
            // Nothing survived: the root itself is not a fragment worth packing
            Vec::new()
        } else {
            tree.leaf_fragments()
        };

        debug!(
            "Cropped '{}' ({}x{}) into {} fragments, {:.1}% area saved",
            self.filename,
            self.raw_size.width,
            self.raw_size.height,
            self.leaves.len(),
            tree.saved_area_ratio(root) * 100.0,
        );
        for &leaf in &self.leaves {
            let fragment = tree.get(leaf);
            let zone = tree.abs_zone(leaf);
            debug!(
                "  fragment ({}, {}) {}x{} depth {}: {:.0}% solid, {:.0}% opaque",
                zone.pos.x,
                zone.pos.y,
                zone.size.width,
                zone.size.height,
                tree.depth(leaf),
                fragment.solid_pixels_ratio() * 100.0,
                fragment.opacity_pixels_ratio() * 100.0,
            );
        }

        self.tree = Some(tree);
        Ok(())
    }
}
