use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::patterns;

/// Everything ffmpeg's input banner told us about a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Demuxer name list exactly as ffmpeg printed it, e.g. `mov,mp4,m4a,3gp,3g2,mj2`
    pub format: String,
    /// Duration in milliseconds; 0 when the banner had no duration line
    pub duration_ms: u64,
    pub video: Option<VideoInfo>,
    pub audio: Option<AudioInfo>,
}

impl MediaInfo {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    /// Individual demuxer names from the comma-separated format list
    pub fn format_names(&self) -> Vec<&str> {
        self.format
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub decoder: String,
    pub size: Option<VideoSize>,
    pub frame_rate: Option<f32>,
    pub bit_rate_kbps: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    pub decoder: String,
    pub sampling_rate_hz: Option<u32>,
    /// 1 for mono, 2 for stereo
    pub channels: Option<u32>,
    pub bit_rate_kbps: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for VideoSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w
            .parse::<u32>()
            .map_err(|_| format!("invalid width in '{}'", s))?;
        let height = h
            .parse::<u32>()
            .map_err(|_| format!("invalid height in '{}'", s))?;
        Ok(Self { width, height })
    }
}

/// One `key=value` status line printed by ffmpeg while it encodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressSnapshot {
    pub values: BTreeMap<String, String>,
    /// Encoded position in milliseconds, when `time=` parsed
    pub elapsed_ms: Option<u64>,
    pub frame: Option<u64>,
    pub fps: Option<f64>,
    /// Output size as printed (`1024kB`)
    pub size: Option<String>,
    /// Bitrate as printed (`187.2kbits/s`)
    pub bitrate: Option<String>,
    pub speed: Option<f64>,
}

impl ProgressSnapshot {
    /// Parse a status line. `None` when the line carries no `key=value` pair.
    pub fn parse(line: &str) -> Option<Self> {
        let values = patterns::progress_pairs(line)?;
        let mut snapshot = Self::default();

        for (key, value) in &values {
            match key.as_str() {
                "time" => snapshot.elapsed_ms = patterns::parse_progress_time(value),
                "frame" => snapshot.frame = value.parse().ok(),
                "fps" => snapshot.fps = value.parse().ok(),
                "size" | "Lsize" => snapshot.size = Some(value.clone()),
                "bitrate" => snapshot.bitrate = Some(value.clone()),
                "speed" => snapshot.speed = value.trim_end_matches('x').parse().ok(),
                _ => {}
            }
        }

        snapshot.values = values;
        Some(snapshot)
    }

    /// Progress in thousandths of `target_ms`, clamped to 1000.
    /// `None` without a parsed time or with a non-positive target.
    pub fn permille(&self, target_ms: i64) -> Option<u32> {
        let elapsed = self.elapsed_ms?;
        if target_ms <= 0 {
            return None;
        }
        let perm = (elapsed as f64 * 1000.0 / target_ms as f64).round();
        Some(perm.min(1000.0) as u32)
    }
}
