use super::types::MediaInfo;

/// Receives events while an encode runs. Every method defaults to a no-op.
///
/// Callbacks arrive synchronously on the thread that called `encode`.
pub trait EncoderProgressListener {
    /// Source description parsed from ffmpeg's banner, delivered once before
    /// any progress.
    fn source_info(&mut self, _info: &MediaInfo) {}

    /// Free-text diagnostic from ffmpeg (warnings, notices, the final summary).
    fn message(&mut self, _message: &str) {}

    /// Progress in thousandths of the target duration, 0..=1000.
    fn progress(&mut self, _permille: u32) {}
}

/// Listener that records every event, handy for callers that only want the
/// outcome and a transcript.
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    pub source: Option<MediaInfo>,
    pub messages: Vec<String>,
    pub progress: Vec<u32>,
}

impl EncoderProgressListener for RecordingListener {
    fn source_info(&mut self, info: &MediaInfo) {
        self.source = Some(info.clone());
    }

    fn message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn progress(&mut self, permille: u32) {
        self.progress.push(permille);
    }
}
