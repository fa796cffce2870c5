mod compositor;
mod types;

pub use compositor::Compositor;
pub use types::{Descriptor, ImageEntry, RectEntry, TextureEntry, descriptor_image_y, percent};
