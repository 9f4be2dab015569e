// ffmpeg driving and output interpretation, independent of the CLI

pub mod core;
pub mod encoder;
pub mod process;

pub use self::core::*;
pub use encoder::Encoder;
pub use process::{FfmpegProcess, Launcher, SystemLauncher};
