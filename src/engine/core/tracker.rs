use super::error::{EncoderError, Result};
use super::listener::EncoderProgressListener;
use super::patterns;
use super::types::ProgressSnapshot;

/// Where an encode's console output currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Warnings and output echo before `Output #0`
    PreOutput,
    OutputHeader,
    MappingHeader,
    MappingBody,
    Progress,
    /// Summary line seen; the rest is encoder chatter
    Finished,
}

const INFO_PREFIXES: [&str; 4] = ["WARNING:", "Please", "Press [q]", "[libx264"];
const OUTPUT_ECHO_PREFIXES: [&str; 3] = ["  Metadata:", "  Duration:", "    "];

/// Follows an encode through ffmpeg's output after the input banner and
/// turns `time=` updates into permille progress.
///
/// Feed lines with [`feed`](Self::feed), then call [`finish`](Self::finish)
/// once the stream is exhausted.
#[derive(Debug)]
pub struct ProgressTracker {
    phase: Phase,
    target_ms: i64,
    mapping_seen: bool,
    in_early_mapping: bool,
    last_warning: Option<String>,
    last_permille: Option<u32>,
    warned_no_target: bool,
}

impl ProgressTracker {
    /// `target_ms` is the length the encode is expected to produce. Progress
    /// is only reported when it is positive.
    pub fn new(target_ms: i64) -> Self {
        Self {
            phase: Phase::PreOutput,
            target_ms,
            mapping_seen: false,
            in_early_mapping: false,
            last_warning: None,
            last_permille: None,
            warned_no_target: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn last_permille(&self) -> Option<u32> {
        self.last_permille
    }

    pub fn feed(&mut self, line: &str, listener: &mut dyn EncoderProgressListener) -> Result<()> {
        while !self.step(line, listener)? {}
        Ok(())
    }

    /// One matcher for the current phase. `Ok(false)` means the phase moved
    /// on without consuming `line`.
    fn step(&mut self, line: &str, listener: &mut dyn EncoderProgressListener) -> Result<bool> {
        match self.phase {
            Phase::PreOutput => self.pre_output(line, listener),
            Phase::OutputHeader => {
                if line.starts_with("  ") {
                    return Ok(true);
                }
                self.phase = if self.mapping_seen {
                    Phase::Progress
                } else {
                    Phase::MappingHeader
                };
                Ok(false)
            }
            Phase::MappingHeader => {
                if line.starts_with("Stream mapping:") {
                    self.mapping_seen = true;
                    self.phase = Phase::MappingBody;
                    Ok(true)
                } else {
                    Err(EncoderError::Protocol(line.to_string()))
                }
            }
            Phase::MappingBody => {
                if line.starts_with("  ") {
                    return Ok(true);
                }
                self.phase = Phase::Progress;
                Ok(false)
            }
            Phase::Progress => {
                self.progress(line, listener);
                Ok(true)
            }
            Phase::Finished => Ok(true),
        }
    }

    fn pre_output(&mut self, line: &str, listener: &mut dyn EncoderProgressListener) -> Result<bool> {
        if self.in_early_mapping {
            if line.starts_with("  ") {
                return Ok(true);
            }
            self.in_early_mapping = false;
        }

        if line.starts_with("Stream mapping:") {
            // Releases since 2012 print the mapping before the output banner
            self.mapping_seen = true;
            self.in_early_mapping = true;
        } else if INFO_PREFIXES.iter().any(|p| line.starts_with(p))
            || patterns::is_diagnostic_line(line)
        {
            listener.message(line);
        } else if line.starts_with("Output #") {
            self.phase = Phase::OutputHeader;
        } else if !OUTPUT_ECHO_PREFIXES.iter().any(|p| line.starts_with(p)) {
            return Err(EncoderError::Protocol(line.to_string()));
        }
        Ok(true)
    }

    fn progress(&mut self, line: &str, listener: &mut dyn EncoderProgressListener) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        match ProgressSnapshot::parse(line) {
            Some(snapshot) => {
                if let Some(permille) = snapshot.permille(self.target_ms) {
                    self.last_permille = Some(permille);
                    listener.progress(permille);
                } else if snapshot.elapsed_ms.is_some() && !self.warned_no_target {
                    self.warned_no_target = true;
                    tracing::warn!(
                        target_ms = self.target_ms,
                        "target duration is not positive, progress will not be reported"
                    );
                }
                self.last_warning = None;
            }
            None => {
                listener.message(line);
                if patterns::is_success_line(line) {
                    self.phase = Phase::Finished;
                }
                self.last_warning = Some(line.to_string());
            }
        }
    }

    /// Verdict once ffmpeg's output has ended.
    pub fn finish(self) -> Result<()> {
        match self.phase {
            Phase::Finished => Ok(()),
            Phase::Progress => match self.last_warning {
                Some(line)
                    if patterns::is_success_line(&line) || patterns::is_encoder_line(&line) =>
                {
                    Ok(())
                }
                Some(line) => Err(EncoderError::Protocol(line)),
                None => Err(unexpected_end()),
            },
            _ => Err(unexpected_end()),
        }
    }
}

fn unexpected_end() -> EncoderError {
    EncoderError::Protocol("unexpected end of ffmpeg output".to_string())
}

/// Milliseconds an encode is expected to produce: the requested duration,
/// otherwise what is left of the source after the offset. Can be negative
/// when the offset lies past the end of the source.
pub fn target_duration_ms(
    source_duration_ms: u64,
    offset_secs: Option<f32>,
    duration_secs: Option<f32>,
) -> i64 {
    match duration_secs {
        Some(secs) => (secs as f64 * 1000.0).round() as i64,
        None => {
            let offset = offset_secs
                .map(|secs| (secs as f64 * 1000.0).round() as i64)
                .unwrap_or(0);
            source_duration_ms as i64 - offset
        }
    }
}
