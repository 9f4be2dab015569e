// Encode runs driven by scripted ffmpeg output

use ffscan::engine::{
    AudioAttributes, EncoderError, Encoder, EncodingAttributes, RecordingListener,
    VideoAttributes,
};
use std::path::Path;
use tempfile::TempDir;

use crate::common::fixtures::*;

fn avi_attributes() -> EncodingAttributes {
    EncodingAttributes::new("avi")
        .with_video(VideoAttributes::codec("mpeg4"))
        .with_audio(AudioAttributes::codec("libmp3lame"))
}

#[test]
fn legacy_encode_reports_progress_and_source() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("out").join("clip.avi");
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    let mut listener = RecordingListener::default();

    encoder
        .encode(Path::new("/media/in.avi"), &target, &avi_attributes(), Some(&mut listener))
        .unwrap();

    assert_eq!(listener.progress, vec![250, 500, 1000]);
    let source = listener.source.unwrap();
    assert_eq!(source.format, "avi");
    assert_eq!(source.duration_ms, 10_000);
    assert!(listener.messages.iter().any(|m| m.starts_with("video:330kB")));
    // statistics after the summary are not forwarded
    assert!(!listener.messages.iter().any(|m| m.contains("Avg QP")));
    assert!(target.parent().unwrap().is_dir());
}

#[test]
fn modern_encode_with_clock_times() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("out.avi");
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(MODERN_ENCODE));
    let mut listener = RecordingListener::default();

    let attrs = EncodingAttributes::new("avi").with_video(VideoAttributes::codec("mpeg4"));
    encoder
        .encode(Path::new("/media/clip.mp4"), &target, &attrs, Some(&mut listener))
        .unwrap();

    assert_eq!(listener.progress, vec![500]);
    assert_eq!(listener.messages[0], "Press [q] to stop, [?] for help");
}

#[test]
fn encode_without_listener_behaves_the_same() {
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &avi_attributes(),
            None,
        )
        .unwrap();
}

#[test]
fn encode_builds_arguments_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("out.avi");
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    let attrs = avi_attributes().with_offset(2.0).with_duration(4.0);

    encoder
        .encode(Path::new("/media/in.avi"), &target, &attrs, None)
        .unwrap();

    let args = encoder.launcher().last_args();
    let target = target.to_string_lossy().into_owned();
    assert_eq!(
        args,
        vec![
            "-ss", "2.0", "-i", "/media/in.avi", "-t", "4.0", "-vcodec", "mpeg4", "-acodec",
            "libmp3lame", "-f", "avi", "-y", target.as_str(),
        ]
    );
}

#[test]
fn explicit_duration_sets_progress_target() {
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    let mut listener = RecordingListener::default();
    let attrs = avi_attributes().with_duration(5.0);

    encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &attrs,
            Some(&mut listener),
        )
        .unwrap();

    // 10 s of output against a 5 s target clamps at 1000
    assert_eq!(listener.progress, vec![500, 1000, 1000]);
}

#[test]
fn offset_past_end_reports_no_progress() {
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    let mut listener = RecordingListener::default();
    let attrs = avi_attributes().with_offset(30.0);

    encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &attrs,
            Some(&mut listener),
        )
        .unwrap();

    assert!(listener.progress.is_empty());
}

#[test]
fn missing_attributes_rejected_before_launch() {
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(LEGACY_ENCODE));
    let err = encoder
        .encode(
            Path::new("/media/in.avi"),
            Path::new("/tmp/never.avi"),
            &EncodingAttributes::new("avi"),
            None,
        )
        .unwrap_err();

    assert!(matches!(err, EncoderError::InvalidAttributes(_)));
    assert_eq!(encoder.launcher().call_count(), 0);
}

#[test]
fn stream_ending_after_mapping_fails() {
    let output = "\
Input #0, avi, from '/media/in.avi':
  Duration: 00:00:10.0, start: 0.000000, bitrate: 1000 kb/s
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, 25 tbr
Output #0, avi, to '/tmp/out.avi':
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, q=2-31, 200 kb/s
Stream mapping:
  Stream #0.0 -> #0.0
";
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(output));
    let err = encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &avi_attributes(),
            None,
        )
        .unwrap_err();
    assert!(matches!(err, EncoderError::Protocol(_)));
}

#[test]
fn unknown_encoder_is_reported_verbatim() {
    let output = "\
Input #0, avi, from '/media/in.avi':
  Duration: 00:00:10.0, start: 0.000000, bitrate: 1000 kb/s
    Stream #0.0: Video: mpeg4, yuv420p, 320x240, 25 tbr
Unknown encoder 'libnothing'
";
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(output));
    let err = encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &EncodingAttributes::new("avi").with_video(VideoAttributes::codec("libnothing")),
            None,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown encoder 'libnothing'");
}

#[test]
fn unreadable_source_fails_encode() {
    let output = "/media/in.avi: No such file or directory\n";
    let temp_dir = TempDir::new().unwrap();
    let encoder = Encoder::with_launcher(ScriptedLauncher::stderr(output));
    let mut listener = RecordingListener::default();
    let err = encoder
        .encode(
            Path::new("/media/in.avi"),
            &temp_dir.path().join("out.avi"),
            &avi_attributes(),
            Some(&mut listener),
        )
        .unwrap_err();
    assert!(matches!(err, EncoderError::InputFormat(Some(_))));
    assert!(listener.source.is_none());
}
