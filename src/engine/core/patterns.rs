//! Line rules for ffmpeg's console output.
//!
//! Every regex is compiled once and matched case-insensitively.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

use super::types::{AudioInfo, VideoInfo, VideoSize};

fn compile(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("built-in pattern must compile")
}

static FORMAT_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*([D ])([E ])d?\s+([\w,]+)\s+.+$"));
static CODEC_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s?([D. ])([E. ])([AVSDT]).{3}\s+(\S+)"));
static CODEC_LINE_LOOSE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*([D. ])([E. ])\s+([AVSDT])\s+(\S+)"));
static LEGEND_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*[\w.]{1,6}\s+=\s"));
static RULER_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^\s*-+\s*$"));

static BANNER: Lazy<Regex> = Lazy::new(|| compile(r"^\s*Input #0, (\w+(?:,\w+)*),.*$"));
static DURATION: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*Duration: (\d\d):(\d\d):(\d\d)\.(\d).*$"));
static STREAM: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*Stream #\S+: (Audio|Video|Data): (.*?)\s*$"));
static METADATA_HEADER: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(?:Metadata|Side data|Chapters):\s*$"));

static SIZE: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)x(\d+)"));
static FRAME_RATE: Lazy<Regex> = Lazy::new(|| compile(r"([\d.]+)\s+(?:fps|tb\(r\))"));
static BIT_RATE: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)\s+kb/s"));
static SAMPLING_RATE: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)\s+Hz"));
static CHANNELS: Lazy<Regex> = Lazy::new(|| compile(r"(mono|stereo|(\d+)\s+channels)"));

static PROGRESS_PAIR: Lazy<Regex> = Lazy::new(|| compile(r"\s*(\w+)\s*=\s*(\S+)\s*"));
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| compile(r"^(\d+):(\d{2}):(\d{2})(?:\.(\d+))?$"));
static SUCCESS: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*(?:\[[^\]]+\]\s*)?video:\S+\s+audio:\S+.*\s+global headers:\S+.*$")
});
static ENCODER_TAG: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\s*\[(?:libx264|libx265|libvpx|libvpx-vp9|libaom-av1|libsvtav1|aac|libmp3lame|libopus|libvorbis) @ (?:0x)?[0-9a-f]+\]")
});
static DIAGNOSTIC_TAG: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*\[\w[\w\-/#:.]* @ (?:0x)?[0-9a-f]+\]"));

/// A line from the `File formats:` section of `ffmpeg -formats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatLine {
    pub demux: bool,
    pub mux: bool,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Audio,
    Video,
    Subtitle,
    Data,
    Attachment,
}

/// A line from the `Codecs:` section of `ffmpeg -codecs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLine {
    pub decode: bool,
    pub encode: bool,
    pub kind: CodecKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Video,
    Audio,
    Data,
}

fn flag_set(flag: &str, expected: char) -> bool {
    flag.chars().next().is_some_and(|c| c.eq_ignore_ascii_case(&expected))
}

pub fn parse_format_line(line: &str) -> Option<FormatLine> {
    let caps = FORMAT_LINE.captures(line)?;
    let names = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Some(FormatLine {
        demux: flag_set(&caps[1], 'D'),
        mux: flag_set(&caps[2], 'E'),
        names,
    })
}

pub fn parse_codec_line(line: &str) -> Option<CodecLine> {
    let caps = CODEC_LINE
        .captures(line)
        .or_else(|| CODEC_LINE_LOOSE.captures(line))?;
    let kind = match caps[3].to_ascii_uppercase().as_str() {
        "A" => CodecKind::Audio,
        "V" => CodecKind::Video,
        "S" => CodecKind::Subtitle,
        "D" => CodecKind::Data,
        _ => CodecKind::Attachment,
    };
    Some(CodecLine {
        decode: flag_set(&caps[1], 'D'),
        encode: flag_set(&caps[2], 'E'),
        kind,
        name: caps[4].to_string(),
    })
}

/// Legend (`D. = Demuxing supported`) and ruler (`---`) lines of a listing.
pub fn is_listing_decoration(line: &str) -> bool {
    LEGEND_LINE.is_match(line) || RULER_LINE.is_match(line)
}

/// Demuxer list from `Input #0, <formats>, from '...'`.
pub fn parse_banner(line: &str) -> Option<String> {
    BANNER.captures(line).map(|caps| caps[1].to_string())
}

/// `Duration: HH:MM:SS.d` in milliseconds; later digits of the fraction are ignored.
pub fn parse_duration(line: &str) -> Option<u64> {
    let caps = DURATION.captures(line)?;
    let field = |i: usize| caps[i].parse::<u64>().ok();
    let (hours, minutes, seconds, tenths) = (field(1)?, field(2)?, field(3)?, field(4)?);
    Some(tenths * 100 + seconds * 1000 + minutes * 60_000 + hours * 3_600_000)
}

/// Stream kind and its comma-separated spec from `Stream #0:0: Video: ...`.
pub fn parse_stream(line: &str) -> Option<(StreamKind, String)> {
    let caps = STREAM.captures(line)?;
    let kind = match caps[1].to_ascii_lowercase().as_str() {
        "video" => StreamKind::Video,
        "audio" => StreamKind::Audio,
        _ => StreamKind::Data,
    };
    Some((kind, caps[2].to_string()))
}

/// Metadata, side data and chapter blocks printed inside the input banner.
pub fn is_metadata_line(line: &str) -> bool {
    if METADATA_HEADER.is_match(line) {
        return true;
    }
    let body = line.trim_start();
    let indent = line.len() - body.len();
    indent >= 4 && !body.to_ascii_lowercase().starts_with("stream #") && body.contains(':')
}

fn spec_tokens(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Video stream spec: token 0 is the decoder, the rest are tried as size,
/// frame rate, then bit rate. Tokens matching none of them are ignored.
pub fn parse_video_spec(spec: &str) -> VideoInfo {
    let mut video = VideoInfo::default();
    for (i, token) in spec_tokens(spec).enumerate() {
        if i == 0 {
            video.decoder = token.to_string();
            continue;
        }
        if let Some(caps) = SIZE.captures(token) {
            if let (Ok(w), Ok(h)) = (caps[1].parse(), caps[2].parse()) {
                video.size = Some(VideoSize::new(w, h));
            }
        } else if let Some(caps) = FRAME_RATE.captures(token) {
            if let Ok(rate) = caps[1].parse::<f32>() {
                video.frame_rate = Some(rate);
            }
        } else if let Some(caps) = BIT_RATE.captures(token) {
            video.bit_rate_kbps = caps[1].parse().ok();
        }
    }
    video
}

/// Audio stream spec: token 0 is the decoder, the rest are tried as
/// sampling rate, channel layout, then bit rate.
pub fn parse_audio_spec(spec: &str) -> AudioInfo {
    let mut audio = AudioInfo::default();
    for (i, token) in spec_tokens(spec).enumerate() {
        if i == 0 {
            audio.decoder = token.to_string();
            continue;
        }
        if let Some(caps) = SAMPLING_RATE.captures(token) {
            audio.sampling_rate_hz = caps[1].parse().ok();
        } else if let Some(caps) = CHANNELS.captures(token) {
            audio.channels = match caps.get(2) {
                Some(count) => count.as_str().parse().ok(),
                None if caps[1].eq_ignore_ascii_case("mono") => Some(1),
                None => Some(2),
            };
        } else if let Some(caps) = BIT_RATE.captures(token) {
            audio.bit_rate_kbps = caps[1].parse().ok();
        }
    }
    audio
}

/// All `key=value` pairs on a line, or `None` if it has none.
pub fn progress_pairs(line: &str) -> Option<BTreeMap<String, String>> {
    let pairs: BTreeMap<String, String> = PROGRESS_PAIR
        .captures_iter(line)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();
    (!pairs.is_empty()).then_some(pairs)
}

/// Encoded position from a `time=` value in milliseconds.
///
/// Accepts `<secs>.<tenth>` and `HH:MM:SS.ff`; anything else (`N/A`,
/// negative clocks, extra precision on the seconds form) yields `None`.
pub fn parse_progress_time(value: &str) -> Option<u64> {
    if let Some(caps) = CLOCK_TIME.captures(value) {
        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;
        let millis = match caps.get(4) {
            Some(frac) => fraction_ms(frac.as_str())?,
            None => 0,
        };
        return hours
            .checked_mul(3_600_000)?
            .checked_add(minutes * 60_000 + seconds * 1000 + millis);
    }

    let (whole, tenth) = value.split_once('.')?;
    if whole.is_empty() || tenth.len() != 1 {
        return None;
    }
    let whole: u64 = whole.parse().ok()?;
    let tenth: u64 = tenth.parse().ok()?;
    whole.checked_mul(1000)?.checked_add(tenth * 100)
}

fn fraction_ms(digits: &str) -> Option<u64> {
    let mut padded: String = digits.chars().take(3).collect();
    while padded.len() < 3 {
        padded.push('0');
    }
    padded.parse().ok()
}

/// Final size summary ffmpeg prints after a successful run.
pub fn is_success_line(line: &str) -> bool {
    SUCCESS.is_match(line)
}

/// Lines tagged by an encoder library (`[libx264 @ 0x55d5c1]`), as opposed
/// to muxer or output tags such as `[mp4 @ ..]` or `[out#0/mp4 @ ..]`.
pub fn is_encoder_line(line: &str) -> bool {
    ENCODER_TAG.is_match(line)
}

/// Lines prefixed with a component tag such as `[libx264 @ 0x55d5c1]`.
pub fn is_diagnostic_line(line: &str) -> bool {
    DIAGNOSTIC_TAG.is_match(line)
}
