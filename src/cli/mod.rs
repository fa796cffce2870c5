mod args;

pub use args::{BatchArgs, CliArgs, Command, CompressionLevel, PackArgs};
