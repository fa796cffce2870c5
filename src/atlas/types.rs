use crate::packing::Zone;

/// Everything the layout descriptor records, in output order
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Placed area over texture area, all textures together
    pub usage: f32,
    pub textures: Vec<TextureEntry>,
    /// `image_y` counts bottom-up
    pub flip_axis_y: bool,
    pub images: Vec<ImageEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureEntry {
    pub id: usize,
    pub file: String,
    pub usage: f32,
}

/// One registered source image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Present only when the source was rescaled
    pub scale: Option<f32>,
    pub rects: Vec<RectEntry>,
}

/// A fragment: where it sits in its texture and where it belongs in its image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectEntry {
    pub texture_id: usize,
    pub texture_x: u32,
    pub texture_y: u32,
    pub image_x: u32,
    /// Negative only for a flipped rect touching the image's top edge
    pub image_y: i64,
    /// Un-rotated size in the source image
    pub width: u32,
    pub height: u32,
    pub rotated: bool,
}

/// Vertical position of a fragment as the descriptor reports it.
///
/// Flipped positions are measured from the bottom edge and keep the
/// historical one-pixel offset: `height - (y + h) - 1`.
pub fn descriptor_image_y(flip_axis_y: bool, image_height: u32, zone: Zone) -> i64 {
    if flip_axis_y {
        i64::from(image_height) - i64::from(zone.bottom()) - 1
    } else {
        i64::from(zone.pos.y)
    }
}

/// Ratio rendered as a whole percentage, rounded half up
pub fn percent(ratio: f32) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let value = (ratio * 100.0 + 0.5) as i32;
    format!("{}%", value)
}
