use std::path::{Path, PathBuf};

use image::{RgbaImage, imageops};
use log::{debug, info};

use super::types::{Descriptor, ImageEntry, RectEntry, TextureEntry, descriptor_image_y};
use crate::cli::CompressionLevel;
use crate::config::CompositorOptions;
use crate::error::IcropperError;
use crate::output::{save_texture, texture_file_name, write_xml};
use crate::packing::{FragmentRef, GuillotinePacker, Slice, most_suitable_width};
use crate::sprite::{Fragment, FragmentTree, Rotation, SourceImage};

/// Packs the leaf fragments of every registered image into square textures.
///
/// The compositor borrows the images it packs: placing a fragment turned a
/// quarter rotates that fragment's pixels inside its image. Textures and
/// slices belong to the compositor and are rebuilt by every [`composit`].
///
/// [`composit`]: Compositor::composit
pub struct Compositor<'a> {
    options: CompositorOptions,
    file_prefix: String,
    images: Vec<&'a mut SourceImage>,
    /// Fragments of every registered image; sorted largest first by `composit`
    rects: Vec<FragmentRef>,
    packer: GuillotinePacker,
    used_slices: Vec<Slice>,
    textures: Vec<RgbaImage>,
    /// Indices into `used_slices`, per texture, by (y, x)
    texture_slices: Vec<Vec<usize>>,
    /// Indices into `used_slices`, per registered image, by (texture, y, x)
    image_slices: Vec<Vec<usize>>,
}

impl<'a> Compositor<'a> {
    pub fn new(options: CompositorOptions) -> Self {
        Self {
            packer: GuillotinePacker::new(options.texture_padding),
            options,
            file_prefix: String::new(),
            images: Vec::new(),
            rects: Vec::new(),
            used_slices: Vec::new(),
            textures: Vec::new(),
            texture_slices: Vec::new(),
            image_slices: Vec::new(),
        }
    }

    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    /// Base name of every output file
    pub fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    /// Override the base name; an empty prefix is replaced by the stem of
    /// the next registered image.
    pub fn set_file_prefix(&mut self, prefix: impl Into<String>) {
        self.file_prefix = prefix.into();
    }

    pub fn images(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.iter().map(|image| &**image)
    }

    pub fn textures(&self) -> &[RgbaImage] {
        &self.textures
    }

    /// Slices holding a fragment, in placement order
    pub fn used_slices(&self) -> &[Slice] {
        &self.used_slices
    }

    /// Space still available in the textures
    pub fn free_slices(&self) -> &[Slice] {
        self.packer.free_slices()
    }

    /// Slices of one texture, top to bottom then left to right
    pub fn texture_slices(&self, texture: usize) -> Vec<&Slice> {
        self.texture_slices
            .get(texture)
            .map(|indices| indices.iter().map(|&i| &self.used_slices[i]).collect())
            .unwrap_or_default()
    }

    /// Slices of one registered image, by texture, then top to bottom, then
    /// left to right
    pub fn image_slices(&self, image: usize) -> Vec<&Slice> {
        self.image_slices
            .get(image)
            .map(|indices| indices.iter().map(|&i| &self.used_slices[i]).collect())
            .unwrap_or_default()
    }

    pub fn fragment(&self, rect: FragmentRef) -> Result<&Fragment, IcropperError> {
        Ok(self.tree(rect.image)?.get(rect.fragment))
    }

    /// Drop every registration together with the packed state.
    pub fn reset(&mut self) {
        self.clear_placement();
        self.rects.clear();
        self.images.clear();
        self.image_slices.clear();
    }

    /// Register a cropped image. Fails for images without fragments and for
    /// a second image with the same file name.
    pub fn add_image(&mut self, image: &'a mut SourceImage) -> Result<(), IcropperError> {
        if image.leaves().is_empty() {
            return Err(IcropperError::NotCropped(image.file_name().to_string()));
        }
        if self
            .images
            .iter()
            .any(|registered| registered.file_name() == image.file_name())
        {
            return Err(IcropperError::AlreadyRegistered(
                image.file_name().to_string(),
            ));
        }

        let index = self.images.len();
        self.rects.extend(
            image
                .leaves()
                .iter()
                .map(|&fragment| FragmentRef { image: index, fragment }),
        );

        if self.file_prefix.is_empty() {
            self.file_prefix = image.file_stem().to_string();
        }

        self.images.push(image);
        self.image_slices.push(Vec::new());
        Ok(())
    }

    /// Pack every registered fragment, then paste them into the textures.
    ///
    /// Previous results are discarded first, so this can run repeatedly.
    pub fn composit(&mut self) -> Result<(), IcropperError> {
        self.clear_placement();

        if self.rects.is_empty() {
            return Err(IcropperError::NothingToPack);
        }
        if self.options.enable_rotate {
            for image in &self.images {
                Rotation::from_degrees(image.options().rotate_degrees)?;
            }
        }

        // Largest first; the stable sort keeps registration order on ties
        let mut keyed = Vec::with_capacity(self.rects.len());
        for &rect in &self.rects {
            keyed.push((self.fragment(rect)?.size().area(), rect));
        }
        keyed.sort_by(|a, b| b.0.cmp(&a.0));
        self.rects = keyed.into_iter().map(|(_, rect)| rect).collect();

        for index in 0..self.rects.len() {
            let rect = self.rects[index];
            if self.insert_fragment(rect)? {
                continue;
            }

            let width = self.new_texture_width(index)?;
            self.create_texture(width);

            if !self.insert_fragment(rect)? {
                let size = self.fragment(rect)?.size();
                return Err(IcropperError::FragmentTooLarge {
                    name: self.images[rect.image].file_name().to_string(),
                    width: size.width,
                    height: size.height,
                    texture_size: width,
                    padding: self.options.texture_padding,
                });
            }
        }

        self.print_to_textures()?;

        info!(
            "Packed {} fragments from {} images into {} textures ({:.1}% usage)",
            self.used_slices.len(),
            self.images.len(),
            self.textures.len(),
            self.usage_ratio() * 100.0
        );

        Ok(())
    }

    /// Placed area over texture area across all textures; 0 without textures
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_ratio(&self) -> f32 {
        if self.textures.is_empty() {
            return 0.0;
        }

        let used: u64 = (0..self.textures.len())
            .map(|texture| self.placed_area(texture))
            .sum();
        let total: u64 = self
            .textures
            .iter()
            .map(|texture| u64::from(texture.width()) * u64::from(texture.height()))
            .sum();

        used as f32 / total as f32
    }

    /// Placed area over texture area for one texture; 0 if out of range
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_ratio_for_texture(&self, texture: usize) -> f32 {
        let Some(image) = self.textures.get(texture) else {
            return 0.0;
        };

        let total = u64::from(image.width()) * u64::from(image.height());
        if total == 0 {
            return 0.0;
        }
        self.placed_area(texture) as f32 / total as f32
    }

    /// Snapshot of the layout the descriptor files are written from
    pub fn descriptor(&self) -> Result<Descriptor, IcropperError> {
        let textures = (0..self.textures.len())
            .map(|id| TextureEntry {
                id,
                file: texture_file_name(
                    &self.file_prefix,
                    id,
                    &self.options.texture_file_suffix,
                ),
                usage: self.usage_ratio_for_texture(id),
            })
            .collect();

        let mut images = Vec::with_capacity(self.images.len());
        for (index, image) in self.images.iter().enumerate() {
            let tree = self.tree(index)?;
            let height = image.size().height;

            let rects = self
                .image_slices(index)
                .into_iter()
                .filter_map(|slice| slice.fragment.map(|rect| (slice, rect)))
                .map(|(slice, rect)| {
                    let zone = tree.abs_zone(rect.fragment);
                    RectEntry {
                        texture_id: slice.texture(),
                        texture_x: slice.zone.pos.x,
                        texture_y: slice.zone.pos.y,
                        image_x: zone.pos.x,
                        image_y: descriptor_image_y(self.options.flip_axis_y, height, zone),
                        width: zone.size.width,
                        height: zone.size.height,
                        rotated: tree.get(rect.fragment).is_rotated(),
                    }
                })
                .collect();

            images.push(ImageEntry {
                name: image.file_name().to_string(),
                width: image.size().width,
                height,
                scale: image
                    .options()
                    .is_scaled()
                    .then_some(image.options().scale_ratio),
                rects,
            });
        }

        Ok(Descriptor {
            usage: self.usage_ratio(),
            textures,
            flip_axis_y: self.options.flip_axis_y,
            images,
        })
    }

    /// Write every texture as `<path>/<prefix>_<index>.<suffix>`
    pub fn save_textures(
        &self,
        path: &Path,
        compress: Option<CompressionLevel>,
    ) -> Result<Vec<PathBuf>, IcropperError> {
        let mut written = Vec::with_capacity(self.textures.len());
        for (index, texture) in self.textures.iter().enumerate() {
            let file = path.join(texture_file_name(
                &self.file_prefix,
                index,
                &self.options.texture_file_suffix,
            ));
            save_texture(texture, &file, compress)?;
            written.push(file);
        }
        Ok(written)
    }

    /// Write the XML descriptor as `<path>/<prefix>.<xml suffix>`
    pub fn save_to_xml(&self, path: &Path) -> Result<PathBuf, IcropperError> {
        let file = path.join(format!(
            "{}.{}",
            self.file_prefix, self.options.xml_file_suffix
        ));
        write_xml(&self.descriptor()?, &file)?;
        Ok(file)
    }

    /// The binary descriptor has no defined format: only the output
    /// directory is created and nothing is written.
    pub fn save_to_bin(&self, path: &Path) -> Result<(), IcropperError> {
        std::fs::create_dir_all(path).map_err(|e| IcropperError::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(
            "Binary descriptor {}.{} has no format yet, skipped",
            self.file_prefix, self.options.icb_file_suffix
        );
        Ok(())
    }

    fn tree(&self, image: usize) -> Result<&FragmentTree, IcropperError> {
        let source = &self.images[image];
        source
            .fragment_tree()
            .ok_or_else(|| IcropperError::NotCropped(source.file_name().to_string()))
    }

    fn placed_area(&self, texture: usize) -> u64 {
        self.texture_slices
            .get(texture)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| self.used_slices[i].zone.size.area())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Forget textures and slices, turning placed fragments back upright
    fn clear_placement(&mut self) {
        for slice in self.used_slices.drain(..) {
            if let Some(rect) = slice.fragment
                && let Some(tree) = self.images[rect.image].fragment_tree_mut()
            {
                tree.restore_rotation(rect.fragment);
            }
        }
        self.packer = GuillotinePacker::new(self.options.texture_padding);
        self.textures.clear();
        self.texture_slices.clear();
        for slices in &mut self.image_slices {
            slices.clear();
        }
    }

    /// Width for a new texture, estimated from the fragments not placed yet
    fn new_texture_width(&self, first_unplaced: usize) -> Result<u32, IcropperError> {
        let remaining = &self.rects[first_unplaced..];
        let mut area = 0;
        for &rect in remaining {
            area += self.fragment(rect)?.size().area();
        }

        let block_size = self.tree(remaining[0].image)?.options().block_size;
        let width = most_suitable_width(
            area,
            block_size,
            self.options.texture_padding,
            self.options.force_single_texture,
        );
        Ok(width.min(self.options.max_texture_size))
    }

    fn create_texture(&mut self, width: u32) {
        let id = self.textures.len();
        debug!("Creating texture {} ({}x{})", id, width, width);

        self.packer.add_texture(id, width);
        self.textures.push(RgbaImage::new(width, width));
        self.texture_slices.push(Vec::new());
    }

    /// Place one fragment in the first free slice that holds it, turning it
    /// a quarter if only that fits. Returns false when nothing fits.
    fn insert_fragment(&mut self, rect: FragmentRef) -> Result<bool, IcropperError> {
        let size = self.fragment(rect)?.size();

        let slice = match self.packer.find_free_slice(size) {
            Some(slice) => slice,
            None if self.options.enable_rotate => {
                let Some(slice) = self.packer.find_free_slice(size.rotated()) else {
                    return Ok(false);
                };
                let image = &mut self.images[rect.image];
                let name = image.file_name().to_string();
                image
                    .fragment_tree_mut()
                    .ok_or(IcropperError::NotCropped(name))?
                    .rotate(rect.fragment)?;
                debug!(
                    "Rotated {}x{} fragment into texture {}",
                    size.width,
                    size.height,
                    slice.texture()
                );
                slice
            }
            None => return Ok(false),
        };

        let mut slice = slice;
        slice.fragment = Some(rect);
        self.used_slices.push(slice);
        Ok(true)
    }

    /// Paste every placed fragment into its texture and build the sorted
    /// per-texture and per-image slice lists
    fn print_to_textures(&mut self) -> Result<(), IcropperError> {
        for (index, slice) in self.used_slices.iter().enumerate() {
            let Some(rect) = slice.fragment else {
                continue;
            };
            let source = &self.images[rect.image];
            let tree = source
                .fragment_tree()
                .ok_or_else(|| IcropperError::NotCropped(source.file_name().to_string()))?;
            let pixels = tree.get(rect.fragment).image();

            let texture = &mut self.textures[slice.texture()];
            let pos = slice.zone.pos;
            if pos.x + pixels.width() > texture.width() || pos.y + pixels.height() > texture.height()
            {
                return Err(IcropperError::PasteOutOfBounds {
                    texture: slice.texture(),
                    x: pos.x,
                    y: pos.y,
                });
            }
            imageops::replace(texture, pixels, i64::from(pos.x), i64::from(pos.y));

            self.texture_slices[slice.texture()].push(index);
            self.image_slices[rect.image].push(index);
        }

        let used = &self.used_slices;
        for slices in &mut self.texture_slices {
            slices.sort_by_key(|&i| (used[i].zone.pos.y, used[i].zone.pos.x));
        }
        for slices in &mut self.image_slices {
            slices.sort_by_key(|&i| {
                (
                    used[i].texture(),
                    used[i].zone.pos.y,
                    used[i].zone.pos.x,
                )
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropOptions;
    use crate::packing::{Size, Zone};
    use image::Rgba;

    fn opaque_image(name: &str, width: u32, height: u32, color: [u8; 3]) -> SourceImage {
        let pixel = Rgba([color[0], color[1], color[2], 255]);
        SourceImage::from_image(name, RgbaImage::from_pixel(width, height, pixel))
    }

    /// One fragment per image: blocks larger than any test image
    fn whole_image(name: &str, width: u32, height: u32) -> SourceImage {
        let options = CropOptions {
            block_size: Size::new(200, 200),
            ..CropOptions::default()
        };
        let mut image = opaque_image(name, width, height, [200, 10, 10]).with_options(options);
        image.crop().unwrap();
        image
    }

    fn cropped(name: &str, width: u32, height: u32) -> SourceImage {
        let mut image = opaque_image(name, width, height, [10, 200, 10]);
        image.crop().unwrap();
        image
    }

    fn assert_slices_valid(compositor: &Compositor) {
        let padding = compositor.options().texture_padding;
        for (index, texture) in compositor.textures().iter().enumerate() {
            let slices = compositor.texture_slices(index);
            for (i, a) in slices.iter().enumerate() {
                assert!(a.zone.pos.x >= padding && a.zone.pos.y >= padding);
                assert!(a.zone.right() <= texture.width() - padding);
                assert!(a.zone.bottom() <= texture.height() - padding);
                for b in slices.iter().skip(i + 1) {
                    assert!(!a.zone.intersects(&b.zone), "{:?} overlaps {:?}", a, b);
                }
                for free in compositor.free_slices() {
                    if free.texture() == index {
                        assert!(!a.zone.intersects(&free.zone));
                    }
                }
            }
        }
    }

    #[test]
    fn test_two_blocks_default_options_use_two_textures() {
        let mut image = cropped("hero.png", 200, 100);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 2);
        assert!(compositor.textures().iter().all(|t| t.dimensions() == (128, 128)));
        assert_eq!(compositor.file_prefix(), "hero");

        let expected = 20_000.0 / (2.0 * 128.0 * 128.0);
        assert!((compositor.usage_ratio() - expected).abs() < 1e-6);
        assert_slices_valid(&compositor);
    }

    #[test]
    fn test_two_blocks_single_texture() {
        let mut image = cropped("hero.png", 200, 100);
        let options = CompositorOptions {
            force_single_texture: true,
            ..CompositorOptions::default()
        };
        let mut compositor = Compositor::new(options);
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 1);
        assert_eq!(compositor.textures()[0].dimensions(), (256, 256));

        let zones: Vec<Zone> = compositor.texture_slices(0).iter().map(|s| s.zone).collect();
        assert_eq!(
            zones,
            vec![Zone::new(1, 1, 100, 100), Zone::new(1, 102, 100, 100)]
        );

        let expected = 20_000.0 / 65_536.0;
        assert!((compositor.usage_ratio() - expected).abs() < 1e-6);
        assert!((compositor.usage_ratio_for_texture(0) - expected).abs() < 1e-6);
        assert_eq!(compositor.usage_ratio_for_texture(1), 0.0);
    }

    #[test]
    fn test_small_max_texture_forces_second_texture() {
        let mut a = whole_image("a.png", 100, 100);
        let mut b = whole_image("b.png", 100, 100);
        let options = CompositorOptions {
            max_texture_size: 128,
            texture_padding: 1,
            ..CompositorOptions::default()
        };
        let mut compositor = Compositor::new(options);
        compositor.add_image(&mut a).unwrap();
        compositor.add_image(&mut b).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 2);
        assert_eq!(compositor.image_slices(0)[0].texture(), 0);
        assert_eq!(compositor.image_slices(1)[0].texture(), 1);
        assert_slices_valid(&compositor);
    }

    #[test]
    fn test_rotation_fallback() {
        let mut wide = whole_image("wide.png", 120, 20);
        let mut tall = whole_image("tall.png", 20, 110);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut wide).unwrap();
        compositor.add_image(&mut tall).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 1);
        let slice = compositor.image_slices(1)[0];
        assert_eq!(slice.zone, Zone::new(1, 22, 110, 20));

        let rect = slice.fragment.unwrap();
        let fragment = compositor.fragment(rect).unwrap();
        assert!(fragment.is_rotated());
        assert_eq!(fragment.image().dimensions(), (110, 20));
        assert_eq!(fragment.size(), Size::new(20, 110));

        let descriptor = compositor.descriptor().unwrap();
        assert!(!descriptor.images[0].rects[0].rotated);
        assert!(descriptor.images[1].rects[0].rotated);
        assert_eq!(descriptor.images[1].rects[0].width, 20);
        assert_eq!(descriptor.images[1].rects[0].height, 110);
        assert_slices_valid(&compositor);
    }

    #[test]
    fn test_rotation_disabled_opens_new_texture() {
        let mut wide = whole_image("wide.png", 120, 20);
        let mut tall = whole_image("tall.png", 20, 110);
        let options = CompositorOptions {
            enable_rotate: false,
            ..CompositorOptions::default()
        };
        let mut compositor = Compositor::new(options);
        compositor.add_image(&mut wide).unwrap();
        compositor.add_image(&mut tall).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 2);
        assert!(compositor.used_slices().iter().all(|slice| {
            !compositor
                .fragment(slice.fragment.unwrap())
                .unwrap()
                .is_rotated()
        }));
    }

    #[test]
    fn test_composit_is_repeatable() {
        let mut wide = whole_image("wide.png", 120, 20);
        let mut tall = whole_image("tall.png", 20, 110);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut wide).unwrap();
        compositor.add_image(&mut tall).unwrap();

        compositor.composit().unwrap();
        let first = compositor.descriptor().unwrap();
        compositor.composit().unwrap();
        let second = compositor.descriptor().unwrap();

        assert_eq!(first, second);
        assert_eq!(compositor.used_slices().len(), 2);
        let rect = compositor.image_slices(1)[0].fragment.unwrap();
        assert_eq!(
            compositor.fragment(rect).unwrap().image().dimensions(),
            (110, 20)
        );
    }

    #[test]
    fn test_fragment_too_large() {
        let mut image = whole_image("big.png", 100, 100);
        let options = CompositorOptions {
            max_texture_size: 64,
            ..CompositorOptions::default()
        };
        let mut compositor = Compositor::new(options);
        compositor.add_image(&mut image).unwrap();

        assert!(matches!(
            compositor.composit(),
            Err(IcropperError::FragmentTooLarge { texture_size: 64, .. })
        ));
    }

    fn with_rotation(name: &str, degrees: f32) -> SourceImage {
        let options = CropOptions {
            rotate_degrees: degrees,
            ..CropOptions::default()
        };
        let mut image = opaque_image(name, 40, 40, [1, 2, 3]).with_options(options);
        image.crop().unwrap();
        image
    }

    #[test]
    fn test_invalid_rotation_rejected_when_rotating() {
        let mut image = with_rotation("a.png", 45.0);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut image).unwrap();

        assert!(matches!(
            compositor.composit(),
            Err(IcropperError::InvalidRotation(_))
        ));
        assert!(compositor.textures().is_empty());
    }

    #[test]
    fn test_rotation_angle_ignored_without_rotation() {
        let mut image = with_rotation("a.png", 0.0);
        let options = CompositorOptions {
            enable_rotate: false,
            ..CompositorOptions::default()
        };
        let mut compositor = Compositor::new(options);
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.textures().len(), 1);
    }

    #[test]
    fn test_add_image_rejections() {
        let mut uncropped = opaque_image("raw.png", 10, 10, [0, 0, 0]);
        let mut ghost = SourceImage::from_image("ghost.png", RgbaImage::new(50, 50));
        ghost.crop().unwrap();
        let mut first = cropped("dup.png", 10, 10);
        let mut second = cropped("dup.png", 10, 10);

        let mut compositor = Compositor::new(CompositorOptions::default());
        assert!(matches!(
            compositor.add_image(&mut uncropped),
            Err(IcropperError::NotCropped(_))
        ));
        assert!(matches!(
            compositor.add_image(&mut ghost),
            Err(IcropperError::NotCropped(_))
        ));
        compositor.add_image(&mut first).unwrap();
        assert!(matches!(
            compositor.add_image(&mut second),
            Err(IcropperError::AlreadyRegistered(_))
        ));
        assert_eq!(compositor.images().count(), 1);
    }

    #[test]
    fn test_empty_composit_fails() {
        let mut compositor = Compositor::new(CompositorOptions::default());
        assert!(matches!(
            compositor.composit(),
            Err(IcropperError::NothingToPack)
        ));
        assert_eq!(compositor.usage_ratio(), 0.0);
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut image = cropped("hero.png", 200, 100);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        compositor.reset();
        assert!(compositor.textures().is_empty());
        assert!(compositor.used_slices().is_empty());
        assert_eq!(compositor.images().count(), 0);
        assert!(matches!(
            compositor.composit(),
            Err(IcropperError::NothingToPack)
        ));
    }

    #[test]
    fn test_explicit_prefix_is_kept() {
        let mut image = cropped("hero.png", 10, 10);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.set_file_prefix("pack/heroes");
        compositor.add_image(&mut image).unwrap();
        assert_eq!(compositor.file_prefix(), "pack/heroes");
    }

    #[test]
    fn test_fragments_are_pasted() {
        let mut red = opaque_image("red.png", 30, 30, [255, 0, 0]);
        red.crop().unwrap();
        let mut blue = opaque_image("blue.png", 20, 20, [0, 0, 255]);
        blue.crop().unwrap();

        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut red).unwrap();
        compositor.add_image(&mut blue).unwrap();
        compositor.composit().unwrap();

        for (index, color) in [(0, [255, 0, 0, 255]), (1, [0, 0, 255, 255])] {
            let slice = compositor.image_slices(index)[0];
            let texture = &compositor.textures()[slice.texture()];
            let pos = slice.zone.pos;
            assert_eq!(texture.get_pixel(pos.x, pos.y), &Rgba(color));
        }
        // the padding border stays transparent
        assert_eq!(compositor.textures()[0].get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_scattered_fragments_pack_without_overlap() {
        let mut img = RgbaImage::new(420, 330);
        for (x, y, w, h) in [
            (0, 0, 37, 12),
            (50, 40, 130, 70),
            (300, 10, 90, 250),
            (10, 200, 200, 20),
            (400, 300, 20, 30),
        ] {
            for py in y..y + h {
                for px in x..x + w {
                    img.put_pixel(px, py, Rgba([1, 1, 1, 255]));
                }
            }
        }
        let mut image = SourceImage::from_image("scatter.png", img);
        image.crop().unwrap();
        let leaves = image.leaves().len();

        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        assert_eq!(compositor.used_slices().len(), leaves);
        let ratio = compositor.usage_ratio();
        assert!(ratio > 0.0 && ratio <= 1.0);
        assert_slices_valid(&compositor);

        let image_slices = compositor.image_slices(0);
        for pair in image_slices.windows(2) {
            let a = (pair[0].texture(), pair[0].zone.pos.y, pair[0].zone.pos.x);
            let b = (pair[1].texture(), pair[1].zone.pos.y, pair[1].zone.pos.x);
            assert!(a < b);
        }
    }

    #[test]
    fn test_descriptor_flips_image_y() {
        let mut image = cropped("hero.png", 200, 100);
        let mut compositor = Compositor::new(CompositorOptions::default());
        compositor.add_image(&mut image).unwrap();
        compositor.composit().unwrap();

        let descriptor = compositor.descriptor().unwrap();
        assert_eq!(descriptor.textures.len(), 2);
        assert_eq!(descriptor.textures[1].file, "hero_1.png");

        let entry = &descriptor.images[0];
        assert_eq!((entry.width, entry.height, entry.scale), (200, 100, None));
        assert_eq!(entry.rects.len(), 2);
        // both blocks span the full height: 100 - (0 + 100) - 1
        assert!(entry.rects.iter().all(|rect| rect.image_y == -1));
        assert_eq!(entry.rects[0].image_x, 0);
        assert_eq!(entry.rects[1].image_x, 100);
    }
}
