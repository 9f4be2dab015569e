// Canned ffmpeg output and a launcher that replays it
use ffscan::engine::{FfmpegProcess, Launcher};
use std::io::{self, Cursor};
use std::sync::Mutex;

/// Replays fixed stdout/stderr text and records every argument list it was given
pub struct ScriptedLauncher {
    stdout: String,
    stderr: String,
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedLauncher {
    pub fn stderr(text: &str) -> Self {
        Self {
            stdout: String::new(),
            stderr: text.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn stdout(text: &str) -> Self {
        Self {
            stdout: text.to_string(),
            stderr: String::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_args(&self) -> Vec<String> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Launcher for ScriptedLauncher {
    fn program(&self) -> &str {
        "ffmpeg"
    }

    fn launch(&self, args: &[String]) -> io::Result<FfmpegProcess> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(FfmpegProcess::from_streams(
            Cursor::new(self.stdout.clone().into_bytes()),
            Cursor::new(self.stderr.clone().into_bytes()),
        ))
    }
}

/// Launcher whose process cannot be started
pub struct BrokenLauncher;

impl Launcher for BrokenLauncher {
    fn program(&self) -> &str {
        "missing-ffmpeg"
    }

    fn launch(&self, _args: &[String]) -> io::Result<FfmpegProcess> {
        Err(io::Error::new(io::ErrorKind::NotFound, "missing-ffmpeg not found"))
    }
}

pub const VERSION_PREAMBLE: &str = "\
ffmpeg version 4.4.2-0ubuntu0.22.04.1 Copyright (c) 2000-2021 the FFmpeg developers
  built with gcc 11 (Ubuntu 11.2.0-19ubuntu1)
  configuration: --prefix=/usr --enable-gpl --enable-libx264
  libavutil      56. 70.100 / 56. 70.100
  libavcodec     58.134.100 / 58.134.100
";

/// `ffmpeg -i clip.mp4` with metadata blocks as current releases print them
pub const MP4_PROBE: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from '/media/clip.mp4':
  Metadata:
    major_brand     : isom
    minor_version   : 512
    compatible_brands: isomiso2avc1mp41
    encoder         : Lavf58.76.100
  Duration: 00:01:30.50, start: 0.000000, bitrate: 1628 kb/s
  Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1280x720 [SAR 1:1 DAR 16:9], 1495 kb/s, 29.97 fps, 29.97 tbr, 30k tbn, 59.94 tbc (default)
    Metadata:
      handler_name    : VideoHandler
      vendor_id       : [0][0][0][0]
  Stream #0:1(und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo, fltp, 128 kb/s (default)
    Metadata:
      handler_name    : SoundHandler
      vendor_id       : [0][0][0][0]
At least one output file must be specified
";

/// Encode of a 10 second avi in the pre-2012 layout: output banner before the mapping
pub const LEGACY_ENCODE: &str = "\
Input #0, avi, from '/media/in.avi':
  Duration: 00:00:10.0, start: 0.000000, bitrate: 1000 kb/s
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, 25 tbr
    Stream #0.1: Audio: mp3, 44100 Hz, stereo, s16, 128 kb/s
Output #0, avi, to '/tmp/out.avi':
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, q=2-31, 200 kb/s, 25 tbn, 25 tbc
    Stream #0.1: Audio: libmp3lame, 44100 Hz, stereo, s16, 128 kb/s
Stream mapping:
  Stream #0.0 -> #0.0
  Stream #0.1 -> #0.1
Press [q] to stop encoding
frame=   50 fps=  0 q=2.0 size=     100kB time=2.5 bitrate= 327.7kbits/s\rframe=  125 fps=  0 q=2.0 size=     250kB time=5.0 bitrate= 409.6kbits/s\rframe=  250 fps=  0 q=2.0 Lsize=     500kB time=10.0 bitrate= 409.6kbits/s
video:330kB audio:157kB global headers:0kB muxing overhead 2.569%
[libx264 @ 0x1c4e0a0] frame I:1     Avg QP:20.00  size:  1234
[libx264 @ 0x1c4e0a0] kb/s:409.60
";

/// Encode in the current layout: mapping, then the output banner, summary tagged by the muxer
pub const MODERN_ENCODE: &str = "\
Input #0, mov,mp4,m4a,3gp,3g2,mj2, from '/media/clip.mp4':
  Metadata:
    major_brand     : isom
  Duration: 00:00:02.00, start: 0.000000, bitrate: 15 kb/s
  Stream #0:0[0x1](und): Video: mpeg4 (Simple Profile) (mp4v / 0x7634706D), yuv420p, 320x240, 12 kb/s, 25 fps, 25 tbr, 12800 tbn (default)
      Metadata:
        handler_name    : VideoHandler
Stream mapping:
  Stream #0:0 -> #0:0 (mpeg4 (native) -> mpeg4 (native))
Press [q] to stop, [?] for help
Output #0, avi, to '/tmp/out.avi':
  Metadata:
    ISFT            : Lavf60.16.100
  Stream #0:0(und): Video: mpeg4 (FMP4 / 0x34504D46), yuv420p(progressive), 320x240, q=2-31, 200 kb/s, 25 fps, 25 tbn (default)
      Side data:
        cpb: bitrate max/min/avg: 0/0/200000 buffer size: 0 vbv_delay: N/A
frame=   25 fps=0.0 q=2.0 size=       0kB time=00:00:01.00 bitrate=   0.0kbits/s speed=N/A\r[out#0/avi @ 0x55d5c1] video:20kB audio:0kB subtitle:0kB other streams:0kB global headers:0kB muxing overhead: 9.257812%
frame=   50 fps=0.0 q=2.0 Lsize=      22kB time=00:00:02.00 bitrate= 187.2kbits/s speed=  40x
";

/// `ffmpeg -codecs`, dotted flag layout
pub const CODECS_LISTING: &str = "\
Codecs:
 D..... = Decoding supported
 .E.... = Encoding supported
 ..V... = Video codec
 ..A... = Audio codec
 ..S... = Subtitle codec
 ..D... = Data codec
 ..T... = Attachment codec
 ...I.. = Intra frame-only codec
 ....L. = Lossy compression
 .....S = Lossless compression
 -------
 DEVI.S ffv1                 FFmpeg video codec #1
 DEV.L. h264                 H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10 (decoders: h264 h264_v4l2m2m ) (encoders: libx264 )
 D.V.L. hevc                 H.265 / HEVC (High Efficiency Video Coding)
 DEAIL. aac                  AAC (Advanced Audio Coding) (decoders: aac aac_fixed )
 D.AIL. mp3                  MP3 (MPEG audio layer 3) (decoders: mp3float mp3 )
 .EAIL. opus_enc_only        made-up encoder-only audio codec
 DES... ass                  ASS (Advanced SSA) subtitle (decoders: ssa ass ) (encoders: ssa ass )
 ..D... bin_data             binary data
";

/// `ffmpeg -formats`
pub const FORMATS_LISTING: &str = "\
File formats:
 D. = Demuxing supported
 .E = Muxing supported
 --
 D  aac             raw ADTS AAC (Advanced Audio Coding)
 DE avi             AVI (Audio Video Interleaved)
 DE matroska,webm   Matroska / WebM
  E mp4             MP4 (MPEG-4 Part 14)
 D  mov,mp4,m4a,3gp,3g2,mj2 QuickTime / MOV
 DE mp3             MP3 (MPEG audio layer 3)
  E webm            WebM
";
