mod guillotine;
mod texture_size;
mod zone;

pub use guillotine::{FragmentRef, GuillotinePacker, Slice};
pub use texture_size::most_suitable_width;
pub use zone::{Position, Size, Zone};
