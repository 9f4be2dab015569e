use std::io::{self, BufRead};

use super::ffmpeg_cmd::Listing;
use super::patterns::{self, CodecKind};
use super::reader::LineReader;

/// Which side of a codec or container a listing query is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

/// Walk a listing until its section header, then hand every entry line to
/// `on_entry`. Stops at the first line `on_entry` rejects.
fn scan_section<R, F>(reader: &mut LineReader<R>, listing: Listing, mut on_entry: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(&str) -> bool,
{
    let mut in_section = false;
    while let Some(line) = reader.read_line()? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !in_section {
            in_section = listing.is_header(trimmed);
            continue;
        }
        if patterns::is_listing_decoration(&line) {
            continue;
        }
        if !on_entry(&line) {
            tracing::debug!(line = %line, "end of {} section", listing.header());
            break;
        }
    }
    Ok(())
}

/// Audio or video codec names from `ffmpeg -codecs`, in listing order.
pub fn collect_codecs<R: BufRead>(
    reader: &mut LineReader<R>,
    kind: CodecKind,
    direction: Direction,
) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    scan_section(reader, Listing::Codecs, |line| {
        let Some(codec) = patterns::parse_codec_line(line) else {
            return false;
        };
        let wanted = match direction {
            Direction::Decode => codec.decode,
            Direction::Encode => codec.encode,
        };
        if wanted && codec.kind == kind && matches!(kind, CodecKind::Audio | CodecKind::Video) {
            names.push(codec.name);
        }
        true
    })?;
    Ok(names)
}

/// Container names from `ffmpeg -formats`, in listing order without duplicates.
pub fn collect_formats<R: BufRead>(
    reader: &mut LineReader<R>,
    direction: Direction,
) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    scan_section(reader, Listing::Formats, |line| {
        let Some(format) = patterns::parse_format_line(line) else {
            return false;
        };
        let wanted = match direction {
            Direction::Decode => format.demux,
            Direction::Encode => format.mux,
        };
        if wanted {
            for name in format.names {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        true
    })?;
    Ok(names)
}
