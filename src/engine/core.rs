mod attributes;
mod capabilities;
mod error;
mod ffmpeg_cmd;
mod ffmpeg_info;
mod listener;
mod media_info;
pub mod patterns;
mod reader;
mod tracker;
mod types;

pub use attributes::{AudioAttributes, DIRECT_STREAM_COPY, EncodingAttributes, VideoAttributes};
pub use capabilities::{Direction, collect_codecs, collect_formats};
pub use error::{EncoderError, Result};
pub use ffmpeg_cmd::{
    Listing, build_encode_args, build_frame_args, build_listing_args, build_probe_args,
    format_ffmpeg_cmd, format_seconds,
};
pub use ffmpeg_info::{ffmpeg_version, parse_version_line};
pub use listener::{EncoderProgressListener, RecordingListener};
pub use media_info::parse_media_info;
pub use patterns::{CodecKind, StreamKind};
pub use reader::LineReader;
pub use tracker::{Phase, ProgressTracker, target_duration_ms};
pub use types::{AudioInfo, MediaInfo, ProgressSnapshot, VideoInfo, VideoSize};
