mod fragment;
mod loader;
mod pixels;
mod resizer;
mod source;

pub use fragment::{Fragment, FragmentId, FragmentTree};
pub use loader::{has_extension, load_sources};
pub use pixels::{PixelCount, Rotation};
pub use resizer::{resize_box, scaled_size};
pub use source::SourceImage;
