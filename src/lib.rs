pub mod atlas;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod pipeline;
pub mod sprite;

pub use atlas::{Compositor, Descriptor};
pub use cli::{CliArgs, Command, PackArgs};
pub use error::IcropperError;
pub use sprite::{Fragment, FragmentId, FragmentTree, SourceImage};
