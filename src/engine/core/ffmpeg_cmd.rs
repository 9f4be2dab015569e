use std::path::Path;

use super::attributes::EncodingAttributes;

/// What a capability listing asks ffmpeg for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Codecs,
    Formats,
}

impl Listing {
    pub fn flag(self) -> &'static str {
        match self {
            Listing::Codecs => "-codecs",
            Listing::Formats => "-formats",
        }
    }

    /// Header line that opens the interesting section of the listing
    pub fn header(self) -> &'static str {
        match self {
            Listing::Codecs => "Codecs:",
            Listing::Formats => "File formats:",
        }
    }

    /// Newer releases shorten the formats header to `Formats:`.
    pub fn is_header(self, line: &str) -> bool {
        let line = line.trim();
        match self {
            Listing::Codecs => line == "Codecs:",
            Listing::Formats => line == "File formats:" || line == "Formats:",
        }
    }
}

/// Render seconds the way ffmpeg accepts them, keeping a fractional part (`10.0`, `1.5`).
pub fn format_seconds(secs: f32) -> String {
    let fixed = format!("{:.6}", secs);
    let trimmed = fixed.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn build_listing_args(listing: Listing) -> Vec<String> {
    vec![listing.flag().to_string()]
}

/// ffmpeg with only an input prints the input banner, then complains about
/// the missing output.
pub fn build_probe_args(source: &Path) -> Vec<String> {
    vec!["-i".to_string(), path_arg(source)]
}

/// Arguments for an encode, in the order ffmpeg applies them:
/// input seek, input, length limit, video, audio, quality, container, output.
pub fn build_encode_args(source: &Path, target: &Path, attrs: &EncodingAttributes) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    if let Some(offset) = attrs.offset_secs {
        args.push("-ss".to_string());
        args.push(format_seconds(offset));
    }
    args.push("-i".to_string());
    args.push(path_arg(source));
    if let Some(duration) = attrs.duration_secs {
        args.push("-t".to_string());
        args.push(format_seconds(duration));
    }

    match &attrs.video {
        None => args.push("-vn".to_string()),
        Some(video) => {
            let mut opt = |flag: &str, value: Option<String>| {
                if let Some(value) = value {
                    args.push(flag.to_string());
                    args.push(value);
                }
            };
            opt("-vcodec", video.codec.clone());
            opt("-vtag", video.tag.clone());
            opt("-b", video.bit_rate.map(|b| b.to_string()));
            opt("-r", video.frame_rate.map(|r| r.to_string()));
            opt("-s", video.size.map(|s| s.to_string()));
            opt("-pix_fmt", video.pixel_format.clone());
            opt("-g", video.gop_size.map(|g| g.to_string()));
            opt("-keyint_min", video.keyint_min.map(|k| k.to_string()));
            opt("-sc_threshold", video.sc_threshold.map(|t| t.to_string()));
        }
    }

    match &attrs.audio {
        None => args.push("-an".to_string()),
        Some(audio) => {
            let mut opt = |flag: &str, value: Option<String>| {
                if let Some(value) = value {
                    args.push(flag.to_string());
                    args.push(value);
                }
            };
            opt("-acodec", audio.codec.clone());
            opt("-ab", audio.bit_rate.map(|b| b.to_string()));
            opt("-ac", audio.channels.map(|c| c.to_string()));
            opt("-ar", audio.sampling_rate.map(|r| r.to_string()));
            opt("-vol", audio.volume.map(|v| v.to_string()));
        }
    }

    if let Some(qscale) = &attrs.qscale {
        args.push("-qscale".to_string());
        args.push(qscale.clone());
    }
    if let Some(strict) = &attrs.strict {
        args.push("-strict".to_string());
        args.push(strict.clone());
    }

    args.push("-f".to_string());
    args.push(attrs.format.clone());
    args.push("-y".to_string());
    args.push(path_arg(target));
    args
}

/// Single still image at `offset_secs`.
pub fn build_frame_args(source: &Path, target: &Path, offset_secs: f32) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(source),
        "-y".to_string(),
        "-f".to_string(),
        "image2".to_string(),
        "-ss".to_string(),
        format_seconds(offset_secs),
        "-t".to_string(),
        "0.001".to_string(),
        path_arg(target),
    ]
}

/// Format an ffmpeg invocation as a shell-safe string for display
pub fn format_ffmpeg_cmd(program: &str, args: &[String]) -> String {
    let parts = std::iter::once(program).chain(args.iter().map(String::as_str));
    shlex::try_join(parts).unwrap_or_else(|_| {
        // Arguments with NUL bytes cannot be quoted; show them unquoted
        std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    })
}
