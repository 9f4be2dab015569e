use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of a probe, encode, frame extraction or capability listing.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// ffmpeg could not read the input. Carries ffmpeg's own message when
    /// it echoed `<path>: <message>`.
    #[error("input not readable{}", detail(.0))]
    InputFormat(Option<String>),

    #[error("ffmpeg i/o failed: {0}")]
    Io(#[from] io::Error),

    /// A line the output grammar does not allow, or output that stopped too
    /// early. The text is ffmpeg's line verbatim.
    #[error("{0}")]
    Protocol(String),

    #[error("invalid encoding attributes: {0}")]
    InvalidAttributes(String),

    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EncoderError>;
