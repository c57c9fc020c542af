#![warn(missing_docs)]
//! # asciiview binary
//!
//! Command-line shell for the conversion server: upload a file, preview
//! ASCII output, scrub or play video frames, and download export artifacts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use asciiview_app::{
    AppError, ExportArtifact, RunLog, SessionController, UploadOutcome, app_version,
    server_from_env, unix_now_ms,
};
use asciiview_core::{ColorMode, ExportKind, MediaFile, RenderParams};
use asciiview_gateway::GatewayClient;
use asciiview_http::HttpTransport;
use asciiview_playback::TickOutcome;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "asciiview", version = app_version(), about = "ASCII art conversion client")]
struct Cli {
    /// Conversion server base URL; falls back to ASCIIVIEW_SERVER, then the
    /// local default.
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Probes server connectivity.
    Health,
    /// Converts an image (or renders a video's first frame) to ASCII text.
    Convert {
        /// Media file to upload.
        file: PathBuf,
        #[command(flatten)]
        params: ParamArgs,
        /// Write the text here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Prints the video descriptor reported by the server.
    Info {
        /// Video file to probe.
        file: PathBuf,
    },
    /// Renders one video timestamp as ASCII text.
    Frame {
        /// Video file to upload.
        file: PathBuf,
        /// Timestamp in seconds.
        #[arg(long, default_value_t = 0.0)]
        time: f64,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Plays a bounded ASCII preview of a video in the terminal.
    Play {
        /// Video file to upload.
        file: PathBuf,
        /// Stop after this many frames.
        #[arg(long, default_value_t = 120)]
        max_frames: u64,
        #[command(flatten)]
        params: ParamArgs,
    },
    /// Runs a server-side export and saves the artifact.
    Export {
        /// Media file to upload.
        file: PathBuf,
        /// Export variant.
        #[arg(long, value_enum)]
        kind: ExportArg,
        #[command(flatten)]
        params: ParamArgs,
        /// Output directory for the artifact.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Debug, clap::Args)]
struct ParamArgs {
    /// Output width in characters.
    #[arg(long, default_value_t = 100)]
    width: u32,
    /// Contrast multiplier.
    #[arg(long, default_value_t = 1.0)]
    contrast: f32,
    /// Optional color selection.
    #[arg(long, value_enum)]
    color: Option<ColorArg>,
}

impl ParamArgs {
    fn to_params(&self) -> RenderParams {
        RenderParams {
            width: self.width,
            contrast: self.contrast,
            color: self.color.map(ColorArg::to_mode),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorArg {
    White,
    Green,
    Amber,
    Cyan,
}

impl ColorArg {
    fn to_mode(self) -> ColorMode {
        match self {
            ColorArg::White => ColorMode::White,
            ColorArg::Green => ColorMode::Green,
            ColorArg::Amber => ColorMode::Amber,
            ColorArg::Cyan => ColorMode::Cyan,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    /// Rendered PNG of an image upload.
    Png,
    /// Rendered PNG of the current video frame.
    FramePng,
    /// Full ASCII MP4 render.
    Video,
    /// Full ASCII GIF render.
    Gif,
    /// Per-frame text files packed as ZIP.
    Frames,
}

impl ExportArg {
    fn to_kind(self) -> ExportKind {
        match self {
            ExportArg::Png => ExportKind::StaticPng,
            ExportArg::FramePng => ExportKind::FramePng,
            ExportArg::Video => ExportKind::Video,
            ExportArg::Gif => ExportKind::Gif,
            ExportArg::Frames => ExportKind::Frames,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("asciiview: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let log = RunLog::create()?;
    log.log(&format!("asciiview {} starting", app_version()));

    let server = server_from_env(cli.server);
    let transport = Arc::new(HttpTransport::new()?);
    let gateway = GatewayClient::new(server.clone(), transport)?;
    let mut controller = SessionController::new(gateway.clone());
    log.log(&format!("server {server}"));

    match cli.command {
        Command::Health => {
            gateway.health()?;
            println!("server ok: {server}");
        }
        Command::Convert {
            file,
            params,
            output,
        } => {
            controller.handle_params_changed(params.to_params(), unix_now_ms());
            upload(&mut controller, &file, &log)?;
            let text = require_text(&controller)?;
            match output {
                Some(path) => fs::write(&path, text)?,
                None => print!("{text}"),
            }
        }
        Command::Info { file } => {
            upload(&mut controller, &file, &log)?;
            let descriptor = controller.descriptor().ok_or(AppError::NoVideoLoaded)?;
            println!(
                "duration: {:.3}s  fps: {:.3}  frames: {}  source: {}x{}",
                descriptor.duration_secs,
                descriptor.fps,
                descriptor.frame_count,
                descriptor.width,
                descriptor.height
            );
        }
        Command::Frame { file, time, params } => {
            controller.handle_params_changed(params.to_params(), unix_now_ms());
            upload(&mut controller, &file, &log)?;
            controller
                .handle_scrub(time)
                .ok_or(AppError::NoVideoLoaded)?;
            print!("{}", require_text(&controller)?);
        }
        Command::Play {
            file,
            max_frames,
            params,
        } => {
            controller.handle_params_changed(params.to_params(), unix_now_ms());
            upload(&mut controller, &file, &log)?;
            play_loop(&mut controller, max_frames)?;
        }
        Command::Export {
            file,
            kind,
            params,
            output_dir,
        } => {
            controller.handle_params_changed(params.to_params(), unix_now_ms());
            upload(&mut controller, &file, &log)?;
            let artifact = controller.run_export(kind.to_kind(), unix_now_ms())?;
            let path = write_artifact(&output_dir, &artifact)?;
            log.log(&format!("export saved: {}", path.display()));
            println!("saved {}", path.display());
        }
    }

    Ok(())
}

fn upload(
    controller: &mut SessionController,
    path: &Path,
    log: &RunLog,
) -> Result<(), AppError> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    let mime_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");

    let file = MediaFile::new(file_name, mime_type, bytes)?;
    log.log(&format!("upload {} ({})", file.file_name, file.mime_type));

    match controller.handle_upload(file) {
        UploadOutcome::Unsupported => {
            let message = controller
                .view()
                .inline_error
                .clone()
                .unwrap_or_else(|| "unsupported file type".to_string());
            Err(AppError::Io(std::io::Error::other(message)))
        }
        UploadOutcome::VideoInfoFailed => {
            let message = controller
                .view()
                .inline_error
                .clone()
                .unwrap_or_else(|| "video info fetch failed".to_string());
            Err(AppError::Io(std::io::Error::other(message)))
        }
        UploadOutcome::Image(_) | UploadOutcome::Video(_) => Ok(()),
    }
}

fn require_text(controller: &SessionController) -> Result<String, AppError> {
    if let Some(message) = &controller.view().inline_error {
        return Err(AppError::Io(std::io::Error::other(message.clone())));
    }
    controller
        .view()
        .ascii_text
        .clone()
        .ok_or(AppError::NoTextResult)
}

fn play_loop(controller: &mut SessionController, max_frames: u64) -> Result<(), AppError> {
    let interval_ms = controller.handle_play().ok_or(AppError::NoVideoLoaded)?;

    for _ in 0..max_frames {
        match controller.handle_tick() {
            TickOutcome::FetchFrame(_) => {
                if let Some(text) = &controller.view().ascii_text {
                    // ANSI home + clear keeps the frame in place like the page did.
                    print!("\x1b[2J\x1b[H{text}");
                }
            }
            TickOutcome::Finished => break,
            TickOutcome::Ignored => break,
        }
        thread::sleep(Duration::from_millis(interval_ms));
    }

    controller.handle_stop();
    Ok(())
}

fn write_artifact(output_dir: &Path, artifact: &ExportArtifact) -> Result<PathBuf, AppError> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)?;
    Ok(path)
}
