use std::process::{Command, Stdio};

use super::error::{EncoderError, Result};

/// Check if ffmpeg is available and return its version line
pub fn ffmpeg_version(program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(EncoderError::Protocol(format!(
            "{} -version failed with status: {}",
            program, output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("Unknown version");
    Ok(first_line.to_string())
}

/// Version token from `ffmpeg version 6.1.1-3ubuntu5 Copyright ...`
pub fn parse_version_line(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some(name), Some("version")) if name.eq_ignore_ascii_case("ffmpeg") => {
            words.next().map(|v| v.trim_end_matches(','))
        }
        _ => None,
    }
}
