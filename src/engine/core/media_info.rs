use std::io::BufRead;
use std::path::Path;

use super::error::{EncoderError, Result};
use super::patterns::{self, StreamKind};
use super::reader::LineReader;
use super::types::MediaInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AwaitingBanner,
    AwaitingDuration,
    AwaitingStreams,
    Done,
}

/// Read ffmpeg's input banner for `source` from `reader`.
///
/// Stops at the first line past the stream list and pushes it back, so an
/// encode can keep reading the same stream. `source` must be the path as it
/// was passed to ffmpeg: ffmpeg reports unreadable input as
/// `<path>: <message>`.
pub fn parse_media_info<R: BufRead>(source: &Path, reader: &mut LineReader<R>) -> Result<MediaInfo> {
    let error_prefix = format!("{}: ", source.display());
    let mut info: Option<MediaInfo> = None;
    let mut step = Step::AwaitingBanner;

    while let Some(line) = reader.read_line()? {
        tracing::debug!(target: "ffmpeg", "{}", line);

        match step {
            Step::AwaitingBanner => {
                if let Some(message) = line.strip_prefix(&error_prefix) {
                    return Err(EncoderError::InputFormat(Some(message.to_string())));
                }
                if let Some(format) = patterns::parse_banner(&line) {
                    info = Some(MediaInfo::new(format));
                    step = Step::AwaitingDuration;
                }
            }
            Step::AwaitingDuration => {
                if let Some(ms) = patterns::parse_duration(&line) {
                    if let Some(info) = info.as_mut() {
                        info.duration_ms = ms;
                    }
                    step = Step::AwaitingStreams;
                } else if !patterns::is_metadata_line(&line) {
                    step = Step::Done;
                }
            }
            Step::AwaitingStreams => {
                if let Some((kind, spec)) = patterns::parse_stream(&line) {
                    if let Some(info) = info.as_mut() {
                        match kind {
                            StreamKind::Video => info.video = Some(patterns::parse_video_spec(&spec)),
                            StreamKind::Audio => info.audio = Some(patterns::parse_audio_spec(&spec)),
                            StreamKind::Data => {}
                        }
                    }
                } else if !patterns::is_metadata_line(&line) {
                    step = Step::Done;
                }
            }
            Step::Done => {}
        }

        if step == Step::Done {
            reader.push_back(line);
            break;
        }
    }

    info.ok_or(EncoderError::InputFormat(None))
}
