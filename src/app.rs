use crate::cli::{Cli, CodecRole, Commands, EncodeArgs, FormatDirection, MediaKind};
use anyhow::{Context, Result};
use ffscan::config::{self, DefaultsConfig};
use ffscan::engine::{self, Encoder, EncoderProgressListener, MediaInfo};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

pub fn run(cli: Cli) {
    let config = config::Config::load().unwrap_or_else(|e| {
        tracing::warn!("Config missing or invalid, using defaults: {:#}", e);
        config::Config::default()
    });
    let encoder = Encoder::with_program(config.ffmpeg_program());

    match cli.command {
        Commands::CheckFfmpeg => handle_check_ffmpeg(&config),
        Commands::Codecs { kind, role } => handle_codecs(&encoder, kind, role),
        Commands::Formats { direction } => handle_formats(&encoder, direction),
        Commands::Probe { file, json } => handle_probe(&encoder, &file, json),
        Commands::Encode(args) => handle_encode(&encoder, &args, &config.defaults),
        Commands::DryRun(args) => handle_dry_run(&config, &args),
        Commands::Frame {
            source,
            target,
            offset,
        } => handle_frame(
            &encoder,
            &source,
            &target,
            offset.unwrap_or(config.defaults.frame_offset_secs),
        ),
        Commands::InitConfig => handle_init_config(),
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {:#}", context, err);
    process::exit(1);
}

fn handle_check_ffmpeg(config: &config::Config) {
    let program = config.ffmpeg_program();
    match engine::ffmpeg_version(&program) {
        Ok(line) => {
            let version = engine::parse_version_line(&line).unwrap_or(line.as_str());
            println!("ffmpeg found ({}): version {}", program, version);
            process::exit(0);
        }
        Err(e) => fail(&format!("Error running {}", program), e),
    }
}

fn print_names(names: &[String]) {
    for name in names {
        println!("{}", name);
    }
    eprintln!("Total: {}", names.len());
}

fn handle_codecs(encoder: &Encoder, kind: MediaKind, role: CodecRole) {
    let result = match (kind, role) {
        (MediaKind::Audio, CodecRole::Decoders) => encoder.list_audio_decoders(),
        (MediaKind::Audio, CodecRole::Encoders) => encoder.list_audio_encoders(),
        (MediaKind::Video, CodecRole::Decoders) => encoder.list_video_decoders(),
        (MediaKind::Video, CodecRole::Encoders) => encoder.list_video_encoders(),
    };
    match result {
        Ok(names) => print_names(&names),
        Err(e) => fail("Error listing codecs", e),
    }
}

fn handle_formats(encoder: &Encoder, direction: FormatDirection) {
    let result = match direction {
        FormatDirection::Decoding => encoder.list_supported_decoding_formats(),
        FormatDirection::Encoding => encoder.list_supported_encoding_formats(),
    };
    match result {
        Ok(names) => print_names(&names),
        Err(e) => fail("Error listing formats", e),
    }
}

fn describe(info: &MediaInfo) -> String {
    let mut out = format!(
        "Format: {}\nDuration: {:.2} seconds\n",
        info.format,
        info.duration().as_secs_f64()
    );
    if let Some(video) = &info.video {
        out.push_str(&format!("Video: {}", video.decoder));
        if let Some(size) = video.size {
            out.push_str(&format!(", {}", size));
        }
        if let Some(fps) = video.frame_rate {
            out.push_str(&format!(", {} fps", fps));
        }
        if let Some(kbps) = video.bit_rate_kbps {
            out.push_str(&format!(", {} kb/s", kbps));
        }
        out.push('\n');
    }
    if let Some(audio) = &info.audio {
        out.push_str(&format!("Audio: {}", audio.decoder));
        if let Some(hz) = audio.sampling_rate_hz {
            out.push_str(&format!(", {} Hz", hz));
        }
        if let Some(channels) = audio.channels {
            out.push_str(&format!(", {} ch", channels));
        }
        if let Some(kbps) = audio.bit_rate_kbps {
            out.push_str(&format!(", {} kb/s", kbps));
        }
        out.push('\n');
    }
    out
}

fn handle_probe(encoder: &Encoder, file: &Path, json: bool) {
    let info = match encoder.probe(file) {
        Ok(info) => info,
        Err(e) => fail("Error", e),
    };
    if json {
        match serde_json::to_string_pretty(&info) {
            Ok(text) => println!("{}", text),
            Err(e) => fail("Error serializing probe result", e),
        }
    } else {
        print!("{}", describe(&info));
    }
}

/// Prints progress on one terminal line
#[derive(Default)]
struct ConsoleProgress {
    printed: bool,
}

impl EncoderProgressListener for ConsoleProgress {
    fn source_info(&mut self, info: &MediaInfo) {
        println!("Source: {} ({:.2}s)", info.format, info.duration().as_secs_f64());
    }

    fn message(&mut self, message: &str) {
        tracing::info!(target: "ffmpeg", "{}", message);
    }

    fn progress(&mut self, permille: u32) {
        self.printed = true;
        print!("\rProgress: {:.1}%", permille as f64 / 10.0);
        std::io::stdout().flush().ok();
    }
}

fn build_attributes(
    args: &EncodeArgs,
    defaults: &DefaultsConfig,
) -> Result<engine::EncodingAttributes> {
    let mut attrs = engine::EncodingAttributes::new(
        args.format.clone().unwrap_or_else(|| defaults.format.clone()),
    );
    attrs.offset_secs = args.offset;
    attrs.duration_secs = args.duration;
    attrs.qscale = args.qscale.clone().or_else(|| defaults.qscale.clone());
    attrs.strict = args.strict.clone().or_else(|| defaults.strict.clone());

    if !args.no_video {
        let size = args
            .size
            .as_deref()
            .map(str::parse::<engine::VideoSize>)
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid --size")?;
        attrs.video = Some(engine::VideoAttributes {
            codec: args.vcodec.clone(),
            tag: args.vtag.clone(),
            bit_rate: args.vbitrate,
            frame_rate: args.frame_rate,
            size,
            pixel_format: args.pix_fmt.clone(),
            ..Default::default()
        });
    }

    if !args.no_audio {
        attrs.audio = Some(engine::AudioAttributes {
            codec: args.acodec.clone(),
            bit_rate: args.abitrate,
            channels: args.channels,
            sampling_rate: args.sample_rate,
            volume: args.volume,
        });
    }

    Ok(attrs)
}

fn handle_encode(encoder: &Encoder, args: &EncodeArgs, defaults: &DefaultsConfig) {
    let attrs = match build_attributes(args, defaults) {
        Ok(attrs) => attrs,
        Err(e) => fail("Error", e),
    };

    println!(
        "Encoding: {} → {}",
        args.source.display(),
        args.target.display()
    );

    let mut console = ConsoleProgress::default();
    let result = encoder.encode(&args.source, &args.target, &attrs, Some(&mut console));
    if console.printed {
        println!();
    }

    match result {
        Ok(()) => println!("Encoded: {}", args.target.display()),
        Err(e) => fail("Encoding failed", e),
    }
}

fn absolute_or_given(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn handle_dry_run(config: &config::Config, args: &EncodeArgs) {
    let attrs = match build_attributes(args, &config.defaults) {
        Ok(attrs) => attrs,
        Err(e) => fail("Error", e),
    };
    let ffmpeg_args = engine::build_encode_args(
        &absolute_or_given(&args.source),
        &absolute_or_given(&args.target),
        &attrs,
    );
    println!(
        "{}",
        engine::format_ffmpeg_cmd(&config.ffmpeg_program(), &ffmpeg_args)
    );
}

fn handle_frame(encoder: &Encoder, source: &Path, target: &Path, offset: f32) {
    match encoder.extract_frame(source, target, offset) {
        Ok(()) => println!("Frame written: {}", target.display()),
        Err(e) => fail("Frame extraction failed", e),
    }
}

fn handle_init_config() {
    match config::Config::load() {
        Ok(cfg) => {
            match config::Config::config_path() {
                Ok(path) => println!("Config loaded successfully from {}", path.display()),
                Err(e) => println!("Config loaded, but config path unknown: {:#}", e),
            }
            println!("{:#?}", cfg);
        }
        Err(e) => {
            println!("Config missing or invalid: {:#}", e);
            println!("Creating default config...");

            let cfg = config::Config::default();
            if let Err(err) = cfg.save() {
                fail("Failed to save default config", err);
            }
            match config::Config::config_path() {
                Ok(path) => println!("Default config saved to {}", path.display()),
                Err(e) => println!("Default config saved (path unknown): {:#}", e),
            }
        }
    }
}
