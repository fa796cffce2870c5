mod load;
mod options;
mod types;

pub use load::{LoadedConfig, expand_source_files, overlay_config};
pub use options::{CompositorOptions, CropOptions};
pub use types::{CompressConfig, IcropperConfig};
