use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::core::{
    CodecKind, Direction, EncoderError, EncoderProgressListener, EncodingAttributes, Listing,
    MediaInfo, ProgressTracker, Result, build_encode_args, build_frame_args, build_listing_args,
    build_probe_args, collect_codecs, collect_formats, format_ffmpeg_cmd, parse_media_info,
    target_duration_ms,
};
use crate::engine::process::{Channel, Launcher, Session, SystemLauncher};

struct Silent;

impl EncoderProgressListener for Silent {}

/// Entry point for everything that runs ffmpeg.
///
/// Each call launches its own process and owns it until the call returns,
/// so one `Encoder` can serve several threads.
#[derive(Debug, Clone, Default)]
pub struct Encoder<L = SystemLauncher> {
    launcher: L,
}

impl Encoder<SystemLauncher> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffmpeg executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self::with_launcher(SystemLauncher::new(program))
    }
}

impl<L: Launcher> Encoder<L> {
    pub fn with_launcher(launcher: L) -> Self {
        Self { launcher }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    fn open(&self, args: &[String], channel: Channel) -> Result<Session> {
        tracing::info!("running {}", format_ffmpeg_cmd(self.launcher.program(), args));
        Ok(Session::open(&self.launcher, args, channel)?)
    }

    fn list_codecs(&self, kind: CodecKind, direction: Direction) -> Result<Vec<String>> {
        let mut session = self.open(&build_listing_args(Listing::Codecs), Channel::Stdout)?;
        let names = collect_codecs(session.reader(), kind, direction)?;
        session.close()?;
        Ok(names)
    }

    fn list_formats(&self, direction: Direction) -> Result<Vec<String>> {
        let mut session = self.open(&build_listing_args(Listing::Formats), Channel::Stdout)?;
        let names = collect_formats(session.reader(), direction)?;
        session.close()?;
        Ok(names)
    }

    pub fn list_audio_decoders(&self) -> Result<Vec<String>> {
        self.list_codecs(CodecKind::Audio, Direction::Decode)
    }

    pub fn list_audio_encoders(&self) -> Result<Vec<String>> {
        self.list_codecs(CodecKind::Audio, Direction::Encode)
    }

    pub fn list_video_decoders(&self) -> Result<Vec<String>> {
        self.list_codecs(CodecKind::Video, Direction::Decode)
    }

    pub fn list_video_encoders(&self) -> Result<Vec<String>> {
        self.list_codecs(CodecKind::Video, Direction::Encode)
    }

    /// Containers ffmpeg can write
    pub fn list_supported_encoding_formats(&self) -> Result<Vec<String>> {
        self.list_formats(Direction::Encode)
    }

    /// Containers ffmpeg can read
    pub fn list_supported_decoding_formats(&self) -> Result<Vec<String>> {
        self.list_formats(Direction::Decode)
    }

    /// Describe a media file from ffmpeg's input banner.
    pub fn probe(&self, source: &Path) -> Result<MediaInfo> {
        let source = std::path::absolute(source)?;
        let mut session = self.open(&build_probe_args(&source), Channel::Stderr)?;
        let info = parse_media_info(&source, session.reader())?;
        session.close()?;
        tracing::debug!(format = %info.format, duration_ms = info.duration_ms, "probed {}", source.display());
        Ok(info)
    }

    /// Transcode `source` into `target`, reporting to `listener` as it goes.
    ///
    /// Returns once ffmpeg has exited. The target's parent directory is
    /// created when missing.
    pub fn encode(
        &self,
        source: &Path,
        target: &Path,
        attributes: &EncodingAttributes,
        listener: Option<&mut dyn EncoderProgressListener>,
    ) -> Result<()> {
        validate(attributes)?;

        let source = std::path::absolute(source)?;
        let target = prepare_target(target)?;
        let args = build_encode_args(&source, &target, attributes);

        match listener {
            Some(listener) => self.run_encode(&source, &target, &args, attributes, listener),
            None => self.run_encode(&source, &target, &args, attributes, &mut Silent),
        }
    }

    fn run_encode(
        &self,
        source: &Path,
        target: &Path,
        args: &[String],
        attributes: &EncodingAttributes,
        listener: &mut dyn EncoderProgressListener,
    ) -> Result<()> {
        let mut session = self.open(args, Channel::Stderr)?;

        let info = parse_media_info(source, session.reader())?;
        let target_ms = target_duration_ms(
            info.duration_ms,
            attributes.offset_secs,
            attributes.duration_secs,
        );
        tracing::debug!(target_ms, "encoding {}", target.display());
        listener.source_info(&info);

        let mut tracker = ProgressTracker::new(target_ms);
        while let Some(line) = session.read_line()? {
            tracing::debug!(target: "ffmpeg", "{}", line);
            tracker.feed(&line, listener)?;
            if tracker.is_finished() {
                break;
            }
        }
        tracker.finish()?;
        session.close()?;

        tracing::info!("encoded {}", target.display());
        Ok(())
    }

    /// Write a single still image taken `offset_secs` into `source`.
    pub fn extract_frame(&self, source: &Path, target: &Path, offset_secs: f32) -> Result<()> {
        if !source.exists() {
            return Err(EncoderError::SourceNotFound(source.to_path_buf()));
        }
        let source = std::path::absolute(source)?;
        let target = prepare_target(target)?;

        let mut session = self.open(&build_frame_args(&source, &target, offset_secs), Channel::Stderr)?;
        while let Some(line) = session.read_line()? {
            tracing::info!(target: "ffmpeg", "{}", line);
        }
        if let Some(status) = session.close()? {
            if !status.success() {
                tracing::warn!(%status, "frame extraction exited unsuccessfully");
            }
        }
        Ok(())
    }
}

fn validate(attributes: &EncodingAttributes) -> Result<()> {
    if attributes.video.is_none() && attributes.audio.is_none() {
        return Err(EncoderError::InvalidAttributes(
            "both audio and video attributes are missing".to_string(),
        ));
    }
    if attributes.format.trim().is_empty() {
        return Err(EncoderError::InvalidAttributes(
            "output format is empty".to_string(),
        ));
    }
    Ok(())
}

fn prepare_target(target: &Path) -> Result<PathBuf> {
    let target = std::path::absolute(target)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(target)
}
