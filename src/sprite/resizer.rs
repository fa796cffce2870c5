use image::{RgbaImage, imageops, imageops::FilterType};

use crate::packing::Size;

/// Size of an image rescaled by `ratio`, each side rounded to the nearest pixel
pub fn scaled_size(size: Size, ratio: f32) -> Size {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scale = |side: u32| ((side as f32 * ratio + 0.5) as u32).max(1);
    Size::new(scale(size.width), scale(size.height))
}

/// Rescale with a box filter.
///
/// Shrinking averages every source pixel under the target pixel; growing
/// repeats source pixels, which is what a box kernel reduces to.
pub fn resize_box(img: &RgbaImage, target: Size) -> RgbaImage {
    if target.width <= img.width() && target.height <= img.height() {
        imageops::thumbnail(img, target.width, target.height)
    } else {
        imageops::resize(img, target.width, target.height, FilterType::Nearest)
    }
}
