#![warn(missing_docs)]
//! # asciiview-core
//!
//! ## Purpose
//! Defines the pure data model used across the `asciiview` workspace.
//!
//! ## Responsibilities
//! - Classify uploaded media by declared MIME type.
//! - Represent uploaded files, render parameters, and video descriptors.
//! - Name downloadable export artifacts deterministically.
//!
//! ## Data flow
//! The coordinator classifies a [`MediaFile`] into a [`MediaKind`], snapshots
//! [`RenderParams`] from the parameter panel, and (for videos) stores the
//! [`VideoDescriptor`] returned by the server info endpoint.
//!
//! ## Ownership and lifetimes
//! Files and descriptors own their backing buffers/strings; a new upload
//! replaces the previous session values wholesale.
//!
//! ## Error model
//! Unsupported media types and blank identifiers return [`CoreError`]
//! variants with caller-actionable categorization. Render parameter values
//! are intentionally not validated here: malformed values are forwarded to
//! the server and its rejection is displayed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server default render width (characters).
pub const DEFAULT_WIDTH: u32 = 100;

/// Server default contrast multiplier.
pub const DEFAULT_CONTRAST: f32 = 1.0;

/// Fixed file name for the saved ASCII text artifact.
pub const TEXT_ARTIFACT_NAME: &str = "ascii_art.txt";

/// Fixed file name for exported PNG snapshots (image and frame variants).
pub const PNG_ARTIFACT_NAME: &str = "ascii_art.png";

/// Media category derived from the declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Still image; converts immediately on upload.
    Image,
    /// Video; requires an info fetch before frame rendering.
    Video,
}

/// Classifies a declared MIME type into a supported media kind.
///
/// # Errors
/// Returns [`CoreError::UnsupportedMedia`] for anything that is not an
/// `image/*` or `video/*` type. The caller must not issue any network
/// request for unsupported uploads.
pub fn classify_media_type(mime_type: &str) -> Result<MediaKind, CoreError> {
    let normalized = mime_type.trim().to_ascii_lowercase();
    if normalized.starts_with("image/") {
        return Ok(MediaKind::Image);
    }
    if normalized.starts_with("video/") {
        return Ok(MediaKind::Video);
    }

    Err(CoreError::UnsupportedMedia {
        declared: mime_type.to_string(),
    })
}

/// One uploaded media file with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// Original file name as provided by the user.
    pub file_name: String,
    /// Declared MIME type (classification input; never sniffed client-side).
    pub mime_type: String,
    /// Raw file bytes forwarded to the server untouched.
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Constructs a validated media file.
    ///
    /// # Errors
    /// Returns [`CoreError::BlankFileName`] when the name is empty or
    /// whitespace only.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, CoreError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(CoreError::BlankFileName);
        }

        Ok(Self {
            file_name,
            mime_type: mime_type.into(),
            bytes,
        })
    }

    /// Classifies this file by its declared MIME type.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedMedia`] for non image/video types.
    pub fn kind(&self) -> Result<MediaKind, CoreError> {
        classify_media_type(&self.mime_type)
    }
}

/// Fixed set of selectable render colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Plain white glyphs (server default).
    White,
    /// Terminal green.
    Green,
    /// Amber monochrome.
    Amber,
    /// Cyan monochrome.
    Cyan,
}

impl ColorMode {
    /// Returns the lowercase form-field value for this color.
    pub fn as_form_value(&self) -> &'static str {
        match self {
            ColorMode::White => "white",
            ColorMode::Green => "green",
            ColorMode::Amber => "amber",
            ColorMode::Cyan => "cyan",
        }
    }
}

/// Point-in-time snapshot of the parameter panel.
///
/// Values are forwarded as-is; the server owns validation and any rejection
/// becomes a displayed error.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Output width in characters.
    pub width: u32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Optional color selection; omitted from the form when `None`.
    pub color: Option<ColorMode>,
}

impl RenderParams {
    /// Projects the snapshot into multipart form fields.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("width".to_string(), self.width.to_string()),
            ("contrast".to_string(), self.contrast.to_string()),
        ];
        if let Some(color) = self.color {
            fields.push(("color".to_string(), color.as_form_value().to_string()));
        }
        fields
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            contrast: DEFAULT_CONTRAST,
            color: None,
        }
    }
}

/// Immutable description of an uploaded video, as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Total duration in seconds.
    pub duration_secs: f64,
    /// Frames per second.
    pub fps: f64,
    /// Total frame count.
    pub frame_count: u64,
    /// Source pixel width.
    pub width: u32,
    /// Source pixel height.
    pub height: u32,
    /// Opaque server-side reference used by frame and export requests.
    pub video_path: String,
}

/// Server-side export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Rendered PNG of the current image.
    StaticPng,
    /// Rendered PNG of one video frame.
    FramePng,
    /// Full ASCII MP4 render.
    Video,
    /// Full ASCII GIF render.
    Gif,
    /// Per-frame text files packed as ZIP.
    Frames,
}

/// Computes the download file name for one export artifact.
///
/// PNG exports use the fixed `ascii_art.png` name. The remaining kinds derive
/// from the source file basename; a basename that does not encode as ASCII
/// falls back to a fixed default so download headers stay well-formed.
pub fn export_file_name(kind: ExportKind, source_file_name: &str) -> String {
    match kind {
        ExportKind::StaticPng | ExportKind::FramePng => PNG_ARTIFACT_NAME.to_string(),
        ExportKind::Video => match ascii_base_name(source_file_name) {
            Some(base) => format!("{base}_ascii.mp4"),
            None => "ascii_video.mp4".to_string(),
        },
        ExportKind::Gif => match ascii_base_name(source_file_name) {
            Some(base) => format!("{base}_ascii.gif"),
            None => "ascii_gif.gif".to_string(),
        },
        ExportKind::Frames => match ascii_base_name(source_file_name) {
            Some(base) => format!("{base}_ascii_frames.zip"),
            None => "ascii_frames.zip".to_string(),
        },
    }
}

/// Returns the extension-stripped basename when it is non-empty pure ASCII.
pub fn ascii_base_name(file_name: &str) -> Option<String> {
    let base = match file_name.rfind('.') {
        Some(position) if position > 0 => &file_name[..position],
        _ => file_name,
    };

    if base.is_empty() || !base.is_ascii() {
        return None;
    }

    Some(base.to_string())
}

/// Error type for core domain validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Declared MIME type is neither image nor video.
    #[error("unsupported media type: {declared}")]
    UnsupportedMedia {
        /// Declared MIME type from the upload.
        declared: String,
    },
    /// Upload carries no usable file name.
    #[error("file name is empty")]
    BlankFileName,
}
