// Still image extraction

use ffscan::engine::{EncoderError, Encoder};
use std::fs;
use tempfile::TempDir;

use crate::common::fixtures::*;

const FRAME_OUTPUT: &str = "\
Input #0, avi, from '/media/in.avi':
  Duration: 00:00:10.0, start: 0.000000, bitrate: 1000 kb/s
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, 25 tbr
Output #0, image2, to '/tmp/frame.jpg':
    Stream #0.0: Video: mjpeg, yuvj420p, 320x240, q=2-31, 200 kb/s, 25 tbn, 25 tbc
Stream mapping:
  Stream #0.0 -> #0.0
frame=    1 fps=  0 q=3.1 Lsize=      -0kB time=0.0 bitrate=  -0.0kbits/s
video:9kB audio:0kB global headers:0kB muxing overhead -100.000000%
";

#[test]
fn extract_frame_builds_image2_command() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("in.avi");
    fs::write(&source, b"avi").unwrap();
    let target = temp_dir.path().join("frames").join("thumb.jpg");

    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(FRAME_OUTPUT));
    encoder.extract_frame(&source, &target, 1.5).unwrap();

    let source = source.to_string_lossy().into_owned();
    let target_str = target.to_string_lossy().into_owned();
    assert_eq!(
        encoder.launcher().last_args(),
        vec![
            "-i", source.as_str(), "-y", "-f", "image2", "-ss", "1.5", "-t", "0.001",
            target_str.as_str(),
        ]
    );
    assert!(target.parent().unwrap().is_dir());
}

#[test]
fn extract_frame_requires_existing_source() {
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(FRAME_OUTPUT));
    let err = encoder
        .extract_frame(
            &temp_dir.path().join("missing.avi"),
            &temp_dir.path().join("thumb.jpg"),
            1.0,
        )
        .unwrap_err();

    assert!(matches!(err, EncoderError::SourceNotFound(_)));
    assert_eq!(encoder.launcher().call_count(), 0);
}

#[test]
fn extract_frame_ignores_ffmpeg_complaints() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("in.avi");
    fs::write(&source, b"not really avi").unwrap();

    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(&format!(
        "{}: Invalid data found when processing input\n",
        source.display()
    )));
    encoder
        .extract_frame(&source, &temp_dir.path().join("thumb.jpg"), 1.0)
        .unwrap();
}
