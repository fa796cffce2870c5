use image::{RgbaImage, imageops};

use super::pixels::{PixelCount, Rotation, is_fully_transparent};
use crate::config::CropOptions;
use crate::error::IcropperError;
use crate::packing::{Size, Zone};

/// Handle of a fragment inside its [`FragmentTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(usize);

/// One rectangular region of a source image
#[derive(Debug, Clone)]
pub struct Fragment {
    image: RgbaImage,
    zone: Zone,
    rotated: Option<Rotation>,
    parent: Option<FragmentId>,
    children: Vec<FragmentId>,
}

impl Fragment {
    /// Pixels of this region; turned a quarter once the fragment is rotated
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Zone relative to the parent, in source image orientation
    pub fn relative_zone(&self) -> Zone {
        self.zone
    }

    pub fn size(&self) -> Size {
        self.zone.size
    }

    pub fn is_rotated(&self) -> bool {
        self.rotated.is_some()
    }

    pub fn parent(&self) -> Option<FragmentId> {
        self.parent
    }

    pub fn children(&self) -> &[FragmentId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Share of pixels with any alpha
    pub fn solid_pixels_ratio(&self) -> f32 {
        PixelCount::of(&self.image).solid_ratio()
    }

    /// Share of fully opaque pixels
    pub fn opacity_pixels_ratio(&self) -> f32 {
        PixelCount::of(&self.image).opaque_ratio()
    }

    pub fn is_full_transparent(&self) -> bool {
        self.zone.is_zero() || is_fully_transparent(&self.image)
    }
}

/// Arena holding the cropping tree of one source image.
///
/// The root spans the whole image at (0, 0). Children are only ever created
/// by the cropping operations below, and a fully transparent region is
/// dropped before it is attached.
#[derive(Debug, Clone)]
pub struct FragmentTree {
    nodes: Vec<Fragment>,
    options: CropOptions,
}

impl FragmentTree {
    pub fn new(image: RgbaImage, options: CropOptions) -> Self {
        let (width, height) = image.dimensions();
        let root = Fragment {
            image,
            zone: Zone::new(0, 0, width, height),
            rotated: None,
            parent: None,
            children: Vec::new(),
        };

        Self {
            nodes: vec![root],
            options,
        }
    }

    pub fn root(&self) -> FragmentId {
        FragmentId(0)
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Number of fragments in the tree, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: FragmentId) -> &Fragment {
        &self.nodes[id.0]
    }

    /// Number of ancestors between `id` and the root
    pub fn depth(&self, id: FragmentId) -> u32 {
        let mut depth = 0;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.get(parent).parent;
        }
        depth
    }

    /// Zone in source image coordinates
    pub fn abs_zone(&self, id: FragmentId) -> Zone {
        let mut zone = self.get(id).zone;
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            let node = self.get(parent);
            zone.pos = zone.pos + node.zone.pos;
            current = node.parent;
        }
        zone
    }

    /// Childless fragments under `id`, in tree order
    pub fn leaves_of(&self, id: FragmentId, leaves: &mut Vec<FragmentId>) {
        let node = self.get(id);
        if node.is_leaf() {
            leaves.push(id);
        } else {
            for &child in &node.children {
                self.leaves_of(child, leaves);
            }
        }
    }

    /// Childless fragments of the whole tree. Before any cropping this is the root.
    pub fn leaf_fragments(&self) -> Vec<FragmentId> {
        let mut leaves = Vec::new();
        self.leaves_of(self.root(), &mut leaves);
        leaves
    }

    /// Share of the fragment's area no longer covered by its leaves
    #[allow(clippy::cast_precision_loss)]
    pub fn saved_area_ratio(&self, id: FragmentId) -> f32 {
        let area = self.get(id).size().area();
        if area == 0 {
            return 0.0;
        }

        let mut leaves = Vec::new();
        self.leaves_of(id, &mut leaves);
        let leaf_area: u64 = leaves.iter().map(|&leaf| self.get(leaf).size().area()).sum();

        1.0 - leaf_area as f32 / area as f32
    }

    /// Tile the fragment into a row-major grid of `block_size` cells, the last
    /// row and column clipped. Non-transparent cells become children and are
    /// halved further.
    pub fn crop_with_fixed_size(
        &mut self,
        id: FragmentId,
        block_size: Size,
    ) -> Result<(), IcropperError> {
        let node = self.get(id);
        if !node.is_leaf() {
            return Err(IcropperError::InvalidFragmentState(
                "only a leaf fragment can be cropped",
            ));
        }
        if node.is_rotated() {
            return Err(IcropperError::InvalidFragmentState(
                "a rotated fragment cannot be cropped",
            ));
        }
        if block_size.is_zero() {
            return Err(IcropperError::InvalidFragmentState(
                "block size must not be zero",
            ));
        }

        let size = node.size();
        for y in (0..size.height).step_by(block_size.height as usize) {
            for x in (0..size.width).step_by(block_size.width as usize) {
                let width = block_size.width.min(size.width - x);
                let height = block_size.height.min(size.height - y);

                let sub_image =
                    imageops::crop_imm(&self.nodes[id.0].image, x, y, width, height).to_image();
                if width == 0 || height == 0 || is_fully_transparent(&sub_image) {
                    continue;
                }

                let child = FragmentId(self.nodes.len());
                self.nodes.push(Fragment {
                    image: sub_image,
                    zone: Zone::new(x, y, width, height),
                    rotated: None,
                    parent: Some(id),
                    children: Vec::new(),
                });

                self.crop_halving(child)?;
                self.nodes[id.0].children.push(child);
            }
        }

        Ok(())
    }

    /// Quarter the fragment unless it is deep, dense or small enough.
    pub fn crop_halving(&mut self, id: FragmentId) -> Result<(), IcropperError> {
        let node = self.get(id);
        if node.is_rotated() {
            return Err(IcropperError::InvalidFragmentState(
                "a rotated fragment cannot be cropped",
            ));
        }

        if self.depth(id) >= self.options.crop_depth
            || node.solid_pixels_ratio() >= self.options.crop_usage_ratio
            || node.size().area() <= self.options.min_area
        {
            return Ok(());
        }

        let size = node.size();
        let half = Size::new((size.width + 1) >> 1, (size.height + 1) >> 1);
        self.crop_with_fixed_size(id, half)
    }

    /// Turn a leaf by the configured angle
    pub fn rotate(&mut self, id: FragmentId) -> Result<(), IcropperError> {
        let rotation = Rotation::from_degrees(self.options.rotate_degrees)?;
        let node = &mut self.nodes[id.0];
        if !node.is_leaf() {
            return Err(IcropperError::InvalidFragmentState(
                "only a leaf fragment can be rotated",
            ));
        }
        if node.is_rotated() {
            return Err(IcropperError::InvalidFragmentState(
                "fragment is already rotated",
            ));
        }

        node.image = rotation.apply(&node.image);
        node.rotated = Some(rotation);
        Ok(())
    }

    /// Undo [`FragmentTree::rotate`]; a fragment that is not rotated is left alone.
    pub fn restore_rotation(&mut self, id: FragmentId) {
        let node = &mut self.nodes[id.0];
        if let Some(rotation) = node.rotated.take() {
            node.image = rotation.inverse().apply(&node.image);
        }
    }
}
