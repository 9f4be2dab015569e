use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ffscan")]
#[command(about = "Probe, list and encode media by reading ffmpeg's console output", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that ffmpeg can be run
    CheckFfmpeg,

    /// List audio or video codecs ffmpeg can decode or encode
    Codecs {
        #[arg(value_enum)]
        kind: MediaKind,

        #[arg(value_enum)]
        role: CodecRole,
    },

    /// List container formats ffmpeg can read or write
    Formats {
        #[arg(value_enum)]
        direction: FormatDirection,
    },

    /// Show container, duration and stream details of a media file
    Probe {
        /// Path to the media file
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transcode a file, showing progress
    Encode(EncodeArgs),

    /// Show the ffmpeg command an encode would run, without executing it
    DryRun(EncodeArgs),

    /// Save a single still image from a video
    Frame {
        source: PathBuf,
        target: PathBuf,

        /// Seconds into the source (defaults to the config value)
        #[arg(long)]
        offset: Option<f32>,
    },

    /// Show config status and location, or create default config if missing
    InitConfig,
}

#[derive(Args, Clone)]
pub struct EncodeArgs {
    pub source: PathBuf,
    pub target: PathBuf,

    /// Output container (defaults to the config value)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Start this many seconds into the source
    #[arg(long)]
    pub offset: Option<f32>,

    /// Encode at most this many seconds
    #[arg(long)]
    pub duration: Option<f32>,

    /// Video codec, or "copy"
    #[arg(long)]
    pub vcodec: Option<String>,

    #[arg(long)]
    pub vtag: Option<String>,

    /// Video bit rate in bits per second
    #[arg(long)]
    pub vbitrate: Option<u32>,

    #[arg(long)]
    pub frame_rate: Option<u32>,

    /// Output frame size, WIDTHxHEIGHT
    #[arg(long)]
    pub size: Option<String>,

    #[arg(long)]
    pub pix_fmt: Option<String>,

    /// Drop the video stream
    #[arg(long, conflicts_with_all = ["vcodec", "vtag", "vbitrate", "frame_rate", "size", "pix_fmt"])]
    pub no_video: bool,

    /// Audio codec, or "copy"
    #[arg(long)]
    pub acodec: Option<String>,

    /// Audio bit rate in bits per second
    #[arg(long)]
    pub abitrate: Option<u32>,

    #[arg(long)]
    pub channels: Option<u32>,

    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// 256 keeps the volume unchanged
    #[arg(long)]
    pub volume: Option<u32>,

    /// Drop the audio stream
    #[arg(long, conflicts_with_all = ["acodec", "abitrate", "channels", "sample_rate", "volume"])]
    pub no_audio: bool,

    #[arg(long)]
    pub qscale: Option<String>,

    #[arg(long)]
    pub strict: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MediaKind {
    Audio,
    Video,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CodecRole {
    Decoders,
    Encoders,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatDirection {
    Decoding,
    Encoding,
}

pub fn parse() -> Cli {
    Cli::parse()
}
