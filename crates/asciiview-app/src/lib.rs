#![warn(missing_docs)]
//! # asciiview-app
//!
//! ## Purpose
//! Orchestrates upload classification, conversion requests, playback,
//! debounced re-conversion, exports, and view state for `asciiview`.
//!
//! ## Responsibilities
//! - React to user actions: file drop, parameter change, scrub, play, export.
//! - Route every conversion through the single in-flight guard.
//! - Drive the progress simulator next to long-running export requests.
//! - Project all outcomes into [`ViewState`] for rendering.
//!
//! ## Data flow
//! Upload -> classification -> gateway request(s) -> view projection.
//! Playback ticks and debounce polls re-enter the same guarded fetch path.
//!
//! ## Ownership and lifetimes
//! The controller owns session state (current file, descriptor, playback,
//! guard, debouncer); event handlers take absolute `now_ms` values so the
//! whole flow is testable without a wall clock.
//!
//! ## Error model
//! Interactive preview failures land in the inline error panel; export
//! failures land on the blocking alert channel. Both are terminal for the
//! triggering action: single attempt, no retry. Subsystem errors are wrapped
//! in [`AppError`] where a caller needs them.

use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use asciiview_core::{
    CoreError, ExportKind, MediaFile, MediaKind, RenderParams, TEXT_ARTIFACT_NAME,
    VideoDescriptor, export_file_name,
};
use asciiview_gateway::{GatewayClient, GatewayError};
use asciiview_playback::{
    ConversionGuard, Debouncer, PlaybackController, PlaybackError, TickOutcome,
};
use asciiview_progress::{ProgressError, ProgressSimulator, estimate_export_ms};
use asciiview_ui::ViewState;
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("ASCIIVIEW_VERSION");

/// Default conversion server when neither flag nor env var is set.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Resolves the server base URL: explicit value, then `ASCIIVIEW_SERVER`,
/// then the default.
pub fn server_from_env(explicit: Option<String>) -> String {
    if let Some(server) = explicit {
        return server;
    }

    match std::env::var("ASCIIVIEW_SERVER") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => DEFAULT_SERVER.to_string(),
    }
}

/// Checks the debounced auto-conversion env switch.
///
/// Semantics:
/// - Unset => auto conversion enabled.
/// - `0`, `false`, `off` (case-insensitive) => disabled.
/// - Any other value => enabled.
pub fn auto_convert_enabled_from_env() -> bool {
    match std::env::var("ASCIIVIEW_AUTO_CONVERT") {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            !(normalized == "0" || normalized == "false" || normalized == "off")
        }
        Err(_) => true,
    }
}

/// Returns the current Unix time in milliseconds.
pub fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// What a guarded conversion request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Result text applied to the shared surface.
    Rendered,
    /// Guard was busy; the request was dropped without a network call.
    Dropped,
    /// Request failed; message shown in the inline panel.
    Failed,
}

/// Target of one guarded conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchTarget {
    /// Re-convert the uploaded image.
    Image,
    /// Render the video frame at this time.
    Frame(f64),
}

/// Claimed conversion slot with the parameter snapshot taken at begin time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConversion {
    /// What to convert.
    pub target: FetchTarget,
    /// Parameter snapshot read when the request was issued.
    pub params: RenderParams,
}

/// Result of one upload action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Declared type is neither image nor video; inline error shown and no
    /// network request made.
    Unsupported,
    /// Image upload; one conversion was attempted immediately.
    Image(ConversionOutcome),
    /// Video upload; descriptor loaded and the first frame was requested.
    Video(ConversionOutcome),
    /// Video upload whose info fetch failed; inline error shown.
    VideoInfoFailed,
}

/// One downloadable export result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Download file name per artifact naming rules.
    pub file_name: String,
    /// Artifact bytes as returned by the server.
    pub bytes: Vec<u8>,
}

/// Top-level session controller replacing the original page-global state.
pub struct SessionController {
    gateway: GatewayClient,
    view: ViewState,
    params: RenderParams,
    file: Option<MediaFile>,
    descriptor: Option<VideoDescriptor>,
    playback: Option<PlaybackController>,
    guard: ConversionGuard,
    debouncer: Debouncer,
    export_progress: Option<ProgressSimulator>,
}

impl SessionController {
    /// Creates a controller around a configured gateway client.
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            gateway,
            view: ViewState::new(APP_VERSION),
            params: RenderParams::default(),
            file: None,
            descriptor: None,
            playback: None,
            guard: ConversionGuard::new(),
            debouncer: Debouncer::default(),
            export_progress: None,
        }
    }

    /// Returns the current view snapshot.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the loaded video descriptor, if any.
    pub fn descriptor(&self) -> Option<&VideoDescriptor> {
        self.descriptor.as_ref()
    }

    /// Returns the playback controller, if a video is loaded.
    pub fn playback(&self) -> Option<&PlaybackController> {
        self.playback.as_ref()
    }

    /// Returns `true` while a conversion is outstanding.
    pub fn is_converting(&self) -> bool {
        self.guard.is_converting()
    }

    /// Handles a file selection or drop.
    ///
    /// Unsupported types show the inline error and issue no network request;
    /// the previous session (file, descriptor, playback) stays intact. An
    /// accepted upload stops active playback and replaces the session before
    /// converting: images convert immediately, videos run the info fetch
    /// followed by a first-frame render.
    pub fn handle_upload(&mut self, file: MediaFile) -> UploadOutcome {
        let kind = match file.kind() {
            Ok(kind) => kind,
            Err(_) => {
                self.view.upload_rejected();
                return UploadOutcome::Unsupported;
            }
        };

        if let Some(playback) = &mut self.playback {
            playback.stop();
        }
        self.playback = None;
        self.descriptor = None;
        self.debouncer.cancel();

        self.view.upload_accepted(kind);
        self.file = Some(file);

        match kind {
            MediaKind::Image => UploadOutcome::Image(self.run_conversion(FetchTarget::Image)),
            MediaKind::Video => self.load_video(),
        }
    }

    fn load_video(&mut self) -> UploadOutcome {
        let gateway = self.gateway.clone();
        let file = match &self.file {
            Some(file) => file,
            None => return UploadOutcome::VideoInfoFailed,
        };

        let info = match gateway.fetch_video_info(file) {
            Ok(info) => info,
            Err(error) => {
                self.view.show_inline_error(error.to_string());
                return UploadOutcome::VideoInfoFailed;
            }
        };

        let playback = match PlaybackController::new(info.fps, info.duration) {
            Ok(playback) => playback,
            Err(error) => {
                self.view.show_inline_error(error.to_string());
                return UploadOutcome::VideoInfoFailed;
            }
        };

        self.descriptor = Some(VideoDescriptor {
            duration_secs: info.duration,
            fps: info.fps,
            frame_count: info.frame_count,
            width: info.width,
            height: info.height,
            video_path: info.video_path,
        });
        self.playback = Some(playback);
        self.view.set_timeline_max(info.duration);
        self.view.set_timeline_position(0.0);

        UploadOutcome::Video(self.run_conversion(FetchTarget::Frame(0.0)))
    }

    /// Applies a parameter panel change at `now_ms`.
    ///
    /// The snapshot is stored immediately; the re-conversion itself is
    /// debounced and issued from [`SessionController::poll`] once the quiet
    /// period elapses. Without a loaded file this only stores the snapshot.
    pub fn handle_params_changed(&mut self, params: RenderParams, now_ms: u64) {
        self.params = params;
        if self.file.is_some() && auto_convert_enabled_from_env() {
            self.debouncer.poke(now_ms);
        }
    }

    /// Polls the debouncer; fires at most one deferred re-conversion.
    pub fn poll(&mut self, now_ms: u64) -> Option<ConversionOutcome> {
        if !self.debouncer.fire(now_ms) {
            return None;
        }

        let target = match self.view.mode {
            Some(MediaKind::Image) => FetchTarget::Image,
            Some(MediaKind::Video) => {
                let time = self
                    .playback
                    .as_ref()
                    .map(|playback| playback.current_time())
                    .unwrap_or(0.0);
                FetchTarget::Frame(time)
            }
            None => return None,
        };

        Some(self.run_conversion(target))
    }

    /// Starts playback.
    ///
    /// # Returns
    /// The timer interval in milliseconds when a timer must be armed; `None`
    /// when no video is loaded or playback is already active.
    pub fn handle_play(&mut self) -> Option<u64> {
        if !self.view.can_play() {
            return None;
        }

        let playback = self.playback.as_mut()?;
        if playback.play() {
            return Some(playback.frame_interval_ms());
        }
        None
    }

    /// Pauses playback; the cursor is retained.
    pub fn handle_pause(&mut self) {
        if let Some(playback) = &mut self.playback {
            playback.pause();
        }
    }

    /// Stops playback and resets the timeline cursor to zero.
    pub fn handle_stop(&mut self) {
        if let Some(playback) = &mut self.playback {
            playback.stop();
        }
        self.view.set_timeline_position(0.0);
    }

    /// Advances playback by one timer tick.
    ///
    /// The frame fetch is fire-and-forget with respect to the schedule: a
    /// busy guard drops the fetch and the displayed frame silently lags.
    pub fn handle_tick(&mut self) -> TickOutcome {
        let outcome = match &mut self.playback {
            Some(playback) => playback.tick(),
            None => return TickOutcome::Ignored,
        };

        match outcome {
            TickOutcome::FetchFrame(time) => {
                self.view.set_timeline_position(time);
                self.run_conversion(FetchTarget::Frame(time));
            }
            TickOutcome::Finished => {
                self.view.set_timeline_position(0.0);
                self.run_conversion(FetchTarget::Frame(0.0));
            }
            TickOutcome::Ignored => {}
        }

        outcome
    }

    /// Handles a manual timeline input.
    ///
    /// Active playback pauses first; exactly one fetch is issued for the
    /// clamped time, which is returned together with its outcome.
    pub fn handle_scrub(&mut self, time_sec: f64) -> Option<(f64, ConversionOutcome)> {
        let playback = self.playback.as_mut()?;
        let clamped = playback.scrub(time_sec);
        self.view.set_timeline_position(clamped);
        Some((clamped, self.run_conversion(FetchTarget::Frame(clamped))))
    }

    /// Claims the conversion slot and snapshots parameters for one request.
    ///
    /// # Returns
    /// `None` when a conversion is already in flight (the request is
    /// dropped) or when no media matching the target is loaded.
    pub fn begin_conversion(&mut self, target: FetchTarget) -> Option<PendingConversion> {
        let loaded = match target {
            FetchTarget::Image => self.file.is_some(),
            FetchTarget::Frame(_) => self.descriptor.is_some(),
        };
        if !loaded || !self.guard.try_begin() {
            return None;
        }

        self.view.set_converting(true);
        Some(PendingConversion {
            target,
            params: self.params.clone(),
        })
    }

    /// Applies the result of a conversion started with
    /// [`SessionController::begin_conversion`].
    ///
    /// Responses are not sequenced: whichever completion arrives last wins
    /// the shared result surface, so a slow response can overwrite a newer
    /// one. The source behaves the same way; flagged as a latent bug rather
    /// than intended behavior.
    pub fn complete_conversion(&mut self, result: Result<String, GatewayError>) -> ConversionOutcome {
        self.guard.finish();
        self.view.set_converting(false);

        match result {
            Ok(text) => {
                self.view.apply_ascii_text(text);
                ConversionOutcome::Rendered
            }
            Err(error) => {
                self.view.show_inline_error(error.to_string());
                ConversionOutcome::Failed
            }
        }
    }

    fn run_conversion(&mut self, target: FetchTarget) -> ConversionOutcome {
        let Some(pending) = self.begin_conversion(target) else {
            return ConversionOutcome::Dropped;
        };

        let gateway = self.gateway.clone();
        let result = match pending.target {
            FetchTarget::Image => match &self.file {
                Some(file) => gateway.convert_image(file, &pending.params),
                None => Err(GatewayError::Contract("no image loaded".to_string())),
            },
            FetchTarget::Frame(time) => match &self.descriptor {
                Some(descriptor) => {
                    gateway.fetch_frame(&descriptor.video_path, time, &pending.params)
                }
                None => Err(GatewayError::Contract("no video loaded".to_string())),
            },
        };

        self.complete_conversion(result)
    }

    /// Runs one export request with the progress simulator alongside.
    ///
    /// The request blocks the caller, so a shell that wants to display
    /// intermediate percentages must issue this call off its render thread
    /// and drive [`SessionController::poll_export`] from there; a
    /// single-threaded caller only ever observes the settled 0 or 100.
    ///
    /// # Errors
    /// Returns [`AppError::NoMediaLoaded`] / [`AppError::NoVideoLoaded`] for
    /// missing preconditions and [`AppError::Gateway`] when the request
    /// fails; the failure message is also placed on the alert channel.
    pub fn run_export(&mut self, kind: ExportKind, now_ms: u64) -> Result<ExportArtifact, AppError> {
        let file = self.file.clone().ok_or(AppError::NoMediaLoaded)?;
        let descriptor = self.descriptor.clone();

        let needs_video = !matches!(kind, ExportKind::StaticPng);
        if needs_video && descriptor.is_none() {
            return Err(AppError::NoVideoLoaded);
        }

        let frame_count = descriptor
            .as_ref()
            .map(|descriptor| descriptor.frame_count)
            .unwrap_or(0);
        let estimated_ms = estimate_export_ms(kind, frame_count);
        self.export_progress = Some(ProgressSimulator::start(now_ms, estimated_ms)?);
        self.view.set_export_percent(0);

        let gateway = self.gateway.clone();
        let params = self.params.clone();
        let result = match (kind, descriptor) {
            (ExportKind::StaticPng, _) => gateway.export_image_png(&file, &params),
            (ExportKind::FramePng, Some(descriptor)) => {
                let time = self
                    .playback
                    .as_ref()
                    .map(|playback| playback.current_time())
                    .unwrap_or(0.0);
                gateway.export_frame_png(&descriptor.video_path, time, &params)
            }
            (ExportKind::Video, Some(descriptor)) => {
                gateway.export_video(&descriptor.video_path, &file.file_name, &params)
            }
            (ExportKind::Gif, Some(descriptor)) => {
                gateway.export_gif(&descriptor.video_path, &file.file_name, &params)
            }
            (ExportKind::Frames, Some(descriptor)) => {
                gateway.export_frames(&descriptor.video_path, &file.file_name, &params)
            }
            (_, None) => return Err(AppError::NoVideoLoaded),
        };

        match result {
            Ok(bytes) => {
                if let Some(progress) = &mut self.export_progress {
                    progress.complete();
                }
                self.view.set_export_percent(100);
                Ok(ExportArtifact {
                    file_name: export_file_name(kind, &file.file_name),
                    bytes,
                })
            }
            Err(error) => {
                if let Some(progress) = &mut self.export_progress {
                    progress.fail();
                }
                self.view.clear_export_percent();
                self.view.show_alert(error.to_string());
                Err(AppError::Gateway(error))
            }
        }
    }

    /// Updates the displayed export percentage for `now_ms`.
    ///
    /// Intended for shells polling from a timer while the export request
    /// runs on another thread.
    pub fn poll_export(&mut self, now_ms: u64) -> Option<u8> {
        let progress = self.export_progress.as_mut()?;
        let percent = progress.poll(now_ms);
        self.view.set_export_percent(percent);
        Some(percent)
    }

    /// Packages the current ASCII text as the fixed-name text artifact.
    ///
    /// # Errors
    /// Returns [`AppError::NoTextResult`] when nothing has been rendered.
    pub fn save_text_artifact(&self) -> Result<ExportArtifact, AppError> {
        let text = self.view.ascii_text.clone().ok_or(AppError::NoTextResult)?;
        Ok(ExportArtifact {
            file_name: TEXT_ARTIFACT_NAME.to_string(),
            bytes: text.into_bytes(),
        })
    }
}

/// Append-only per-run log file placed next to the executable.
pub struct RunLog {
    file: Mutex<File>,
    path: PathBuf,
}

impl RunLog {
    /// Creates the log file for this run.
    ///
    /// # Errors
    /// Returns [`AppError::Io`] when the executable directory cannot be
    /// resolved or the file cannot be created.
    pub fn create() -> Result<Self, AppError> {
        let exe_path = std::env::current_exe()?;
        let exe_dir = exe_path.parent().ok_or_else(|| {
            AppError::Io(std::io::Error::other("executable parent directory is missing"))
        })?;

        let path = exe_dir.join(format!("{}_asciiview_log.txt", unix_now_ms()));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
            path,
        })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line; logging failures are swallowed so they
    /// never break a user action.
    pub fn log(&self, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "[{}] {line}", unix_now_ms());
        }
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Core model error.
    #[error("media error: {0}")]
    Core(#[from] CoreError),
    /// Gateway/transport error.
    #[error("conversion error: {0}")]
    Gateway(#[from] GatewayError),
    /// Playback construction error.
    #[error("playback error: {0}")]
    Playback(#[from] PlaybackError),
    /// Progress simulator error.
    #[error("progress error: {0}")]
    Progress(#[from] ProgressError),
    /// Filesystem error from the CLI shell or run log.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Export or conversion requested before any upload.
    #[error("no media loaded")]
    NoMediaLoaded,
    /// Video export requested without a loaded video.
    #[error("no video loaded")]
    NoVideoLoaded,
    /// Text save requested before any conversion result.
    #[error("no ascii text to save")]
    NoTextResult,
}
