use std::io::{self, BufRead};

/// Line reader over ffmpeg's console output with one line of pushback.
///
/// Lines end at `\n`, `\r` or `\r\n`: ffmpeg redraws its progress line with
/// bare carriage returns, so each redraw is delivered as its own line.
/// Invalid UTF-8 is replaced rather than rejected.
pub struct LineReader<R> {
    inner: R,
    pending: Option<String>,
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
            skip_lf: false,
        }
    }

    /// Next line without its terminator, or `None` once the stream is
    /// exhausted and nothing is pushed back.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }

        let mut buf = Vec::new();
        loop {
            let available = match self.inner.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    start = 1;
                }
            }

            match available[start..]
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
            {
                Some(pos) => {
                    let end = start + pos;
                    buf.extend_from_slice(&available[start..end]);
                    self.skip_lf = available[end] == b'\r';
                    self.inner.consume(end + 1);
                    return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
                }
                None => {
                    buf.extend_from_slice(&available[start..]);
                    let len = available.len();
                    self.inner.consume(len);
                }
            }
        }

        if buf.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
        }
    }

    /// Re-deliver `line` on the next [`read_line`](Self::read_line).
    ///
    /// Only one line can be held; the parsers never look further ahead.
    pub fn push_back(&mut self, line: String) {
        debug_assert!(self.pending.is_none(), "pushback buffer already full");
        self.pending = Some(line);
    }

    /// Read and discard everything left, returning how many lines were dropped.
    pub fn drain(&mut self) -> io::Result<usize> {
        let mut count = 0;
        while let Some(line) = self.read_line()? {
            tracing::trace!(target: "ffmpeg", "{}", line);
            count += 1;
        }
        Ok(count)
    }
}
