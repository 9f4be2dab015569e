// ffmpeg subprocess handling: launching, stream capture, guaranteed cleanup

use std::io::{self, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::engine::core::LineReader;

pub type OutputStream = Box<dyn Read + Send>;

/// Starts ffmpeg with a list of arguments
pub trait Launcher {
    /// Executable name, for log lines and command rendering
    fn program(&self) -> &str;

    fn launch(&self, args: &[String]) -> io::Result<FfmpegProcess>;
}

/// Launches a real executable found on PATH or at an explicit location
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    program: String,
}

impl SystemLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemLauncher {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Launcher for SystemLauncher {
    fn program(&self) -> &str {
        &self.program
    }

    fn launch(&self, args: &[String]) -> io::Result<FfmpegProcess> {
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;
        tracing::debug!(pid = child.id(), program = %self.program, "ffmpeg started");
        Ok(FfmpegProcess::from_child(child))
    }
}

/// Handle on a running ffmpeg. Dropping it before [`wait`](Self::wait)
/// kills and reaps the child.
pub struct FfmpegProcess {
    child: Option<Child>,
    stdout: Option<OutputStream>,
    stderr: Option<OutputStream>,
    finished: bool,
}

impl FfmpegProcess {
    pub fn from_child(mut child: Child) -> Self {
        let stdout = child.stdout.take().map(|s| Box::new(s) as OutputStream);
        let stderr = child.stderr.take().map(|s| Box::new(s) as OutputStream);
        Self {
            child: Some(child),
            stdout,
            stderr,
            finished: false,
        }
    }

    /// A process-less handle over canned output
    pub fn from_streams(stdout: impl Read + Send + 'static, stderr: impl Read + Send + 'static) -> Self {
        Self {
            child: None,
            stdout: Some(Box::new(stdout)),
            stderr: Some(Box::new(stderr)),
            finished: false,
        }
    }

    pub fn take_stdout(&mut self) -> Option<OutputStream> {
        self.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<OutputStream> {
        self.stderr.take()
    }

    /// Wait for a normal exit. `None` when there is no child behind the handle.
    pub fn wait(&mut self) -> io::Result<Option<ExitStatus>> {
        self.finished = true;
        match self.child.as_mut() {
            Some(child) => child.wait().map(Some),
            None => Ok(None),
        }
    }

    /// Kill and reap. Errors are ignored: the child may already be gone.
    pub fn terminate(&mut self) {
        self.finished = true;
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.kill() {
                tracing::trace!(error = %e, "kill after exit");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for FfmpegProcess {
    fn drop(&mut self) {
        if !self.finished {
            self.terminate();
        }
    }
}

/// Which ffmpeg stream a session parses; the other is drained unread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Listings (`-codecs`, `-formats`)
    Stdout,
    /// Banners, progress and diagnostics
    Stderr,
}

/// A launched ffmpeg with a line reader on one of its streams.
pub struct Session {
    process: FfmpegProcess,
    reader: LineReader<BufReader<OutputStream>>,
    drain: Option<JoinHandle<u64>>,
}

impl Session {
    pub fn open<L: Launcher + ?Sized>(launcher: &L, args: &[String], channel: Channel) -> io::Result<Self> {
        let mut process = launcher.launch(args)?;
        let (wanted, unwanted) = match channel {
            Channel::Stdout => (process.take_stdout(), process.take_stderr()),
            Channel::Stderr => (process.take_stderr(), process.take_stdout()),
        };
        let wanted = wanted.ok_or_else(|| io::Error::other("ffmpeg output was not captured"))?;

        // Keep the pipe we don't parse empty so ffmpeg never blocks writing to it
        let drain = unwanted.map(|mut stream| {
            std::thread::spawn(move || io::copy(&mut stream, &mut io::sink()).unwrap_or(0))
        });

        Ok(Self {
            process,
            reader: LineReader::new(BufReader::new(wanted)),
            drain,
        })
    }

    pub fn reader(&mut self) -> &mut LineReader<BufReader<OutputStream>> {
        &mut self.reader
    }

    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.reader.read_line()
    }

    /// Consume what is left, wait for exit and collect the drain thread.
    pub fn close(mut self) -> io::Result<Option<ExitStatus>> {
        let skipped = self.reader.drain()?;
        let status = self.process.wait()?;
        if let Some(handle) = self.drain.take() {
            let drained = handle.join().unwrap_or(0);
            tracing::trace!(bytes = drained, "drained unused ffmpeg stream");
        }
        tracing::debug!(?status, skipped_lines = skipped, "ffmpeg finished");
        Ok(status)
    }
}
