#![warn(missing_docs)]
//! # asciiview-ui
//!
//! ## Purpose
//! Defines the view-facing runtime state model for `asciiview`.
//!
//! ## Responsibilities
//! - Represent the mode indicator, result surface, and timeline values.
//! - Split failures into the inline panel and the blocking alert channel.
//! - Expose guard checks for playback availability.
//!
//! ## Data flow
//! Coordinator events mutate [`ViewState`] through reducer methods; a shell
//! renders snapshots of it.
//!
//! ## Ownership and lifetimes
//! `ViewState` owns all string/status values so reducers stay simple and no
//! display handle leaks into coordination logic.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Error text is
//! data here, not a `Result`.

use asciiview_core::MediaKind;

/// Inline message shown for unsupported upload types (original UI string).
pub const UNSUPPORTED_FILE_MESSAGE: &str = "不支持的文件类型";

/// Aggregate view state replacing the original page-global variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// App version string sourced from root `VERSION`.
    pub version: String,
    /// Current media mode indicator; `None` before the first upload.
    pub mode: Option<MediaKind>,
    /// Current ASCII text on the shared result surface.
    pub ascii_text: Option<String>,
    /// Inline error panel for interactive preview failures.
    pub inline_error: Option<String>,
    /// Blocking alert channel for export failures.
    pub alert: Option<String>,
    /// Timeline maximum in seconds; set from the reported video duration.
    pub timeline_max_secs: f64,
    /// Timeline cursor position in seconds.
    pub timeline_position_secs: f64,
    /// Mirrors the in-flight conversion guard for display.
    pub converting: bool,
    /// Export progress percentage while an export runs.
    pub export_percent: Option<u8>,
}

impl ViewState {
    /// Creates the pre-upload view state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            mode: None,
            ascii_text: None,
            inline_error: None,
            alert: None,
            timeline_max_secs: 0.0,
            timeline_position_secs: 0.0,
            converting: false,
            export_percent: None,
        }
    }

    /// Applies an accepted upload: mode switches and stale video state is
    /// cleared until the info fetch repopulates it.
    pub fn upload_accepted(&mut self, kind: MediaKind) {
        self.mode = Some(kind);
        self.inline_error = None;
        self.ascii_text = None;
        self.timeline_max_secs = 0.0;
        self.timeline_position_secs = 0.0;
        self.export_percent = None;
    }

    /// Shows the unsupported-type inline error; mode is left unchanged.
    pub fn upload_rejected(&mut self) {
        self.inline_error = Some(UNSUPPORTED_FILE_MESSAGE.to_string());
    }

    /// Applies a successful conversion result to the shared surface.
    ///
    /// A success clears any previous inline error; no error state persists
    /// across subsequent successful actions.
    pub fn apply_ascii_text(&mut self, text: impl Into<String>) {
        self.ascii_text = Some(text.into());
        self.inline_error = None;
    }

    /// Shows an interactive preview failure in the inline panel.
    pub fn show_inline_error(&mut self, message: impl Into<String>) {
        self.inline_error = Some(message.into());
    }

    /// Shows an export failure on the blocking alert channel.
    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    /// Dismisses the blocking alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Sets the timeline maximum from the reported video duration.
    pub fn set_timeline_max(&mut self, duration_secs: f64) {
        self.timeline_max_secs = duration_secs;
    }

    /// Moves the timeline cursor.
    pub fn set_timeline_position(&mut self, time_secs: f64) {
        self.timeline_position_secs = time_secs;
    }

    /// Mirrors the conversion guard state.
    pub fn set_converting(&mut self, converting: bool) {
        self.converting = converting;
    }

    /// Updates the export progress display.
    pub fn set_export_percent(&mut self, percent: u8) {
        self.export_percent = Some(percent);
    }

    /// Hides the export progress display.
    pub fn clear_export_percent(&mut self) {
        self.export_percent = None;
    }

    /// Returns `true` when video controls should be visible.
    pub fn video_controls_visible(&self) -> bool {
        self.mode == Some(MediaKind::Video)
    }

    /// Returns `true` when play actions are available.
    pub fn can_play(&self) -> bool {
        self.video_controls_visible() && self.timeline_max_secs > 0.0
    }
}
