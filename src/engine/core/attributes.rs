use serde::{Deserialize, Serialize};

use super::types::VideoSize;

/// Codec name that tells ffmpeg to copy a stream without re-encoding
pub const DIRECT_STREAM_COPY: &str = "copy";

/// What to produce from an encode. At least one of `video`/`audio` must be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingAttributes {
    /// Output container, passed to `-f`
    pub format: String,
    /// Seek into the source before encoding (`-ss`)
    pub offset_secs: Option<f32>,
    /// Limit the encoded length (`-t`)
    pub duration_secs: Option<f32>,
    pub video: Option<VideoAttributes>,
    pub audio: Option<AudioAttributes>,
    pub qscale: Option<String>,
    pub strict: Option<String>,
}

impl EncodingAttributes {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn with_video(mut self, video: VideoAttributes) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_audio(mut self, audio: AudioAttributes) -> Self {
        self.audio = Some(audio);
        self
    }

    pub fn with_offset(mut self, secs: f32) -> Self {
        self.offset_secs = Some(secs);
        self
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_secs = Some(secs);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoAttributes {
    pub codec: Option<String>,
    /// FourCC tag (`-vtag`)
    pub tag: Option<String>,
    /// Bits per second
    pub bit_rate: Option<u32>,
    pub frame_rate: Option<u32>,
    pub size: Option<VideoSize>,
    pub pixel_format: Option<String>,
    pub gop_size: Option<u32>,
    pub keyint_min: Option<u32>,
    pub sc_threshold: Option<i32>,
}

impl VideoAttributes {
    pub fn codec(codec: impl Into<String>) -> Self {
        Self {
            codec: Some(codec.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioAttributes {
    pub codec: Option<String>,
    /// Bits per second
    pub bit_rate: Option<u32>,
    pub channels: Option<u32>,
    pub sampling_rate: Option<u32>,
    /// 256 is unchanged volume
    pub volume: Option<u32>,
}

impl AudioAttributes {
    pub fn codec(codec: impl Into<String>) -> Self {
        Self {
            codec: Some(codec.into()),
            ..Self::default()
        }
    }
}
