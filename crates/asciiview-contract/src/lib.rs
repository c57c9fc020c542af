#![warn(missing_docs)]
//! # asciiview-contract
//!
//! ## Purpose
//! Defines the conversion server response schema and client-side parsing
//! helpers.
//!
//! ## Responsibilities
//! - Parse the `{success, data, error}` envelope used by JSON endpoints.
//! - Validate video info payloads before they become playback descriptors.
//! - Extract error messages from failed binary-endpoint responses.
//!
//! ## Data flow
//! Raw JSON response -> [`parse_convert_response`] /
//! [`parse_video_info_response`] -> gateway client -> coordinator state.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs to avoid borrowing from transient network
//! buffers.
//!
//! ## Error model
//! Invalid JSON, `success:false` envelopes, and contract violations return
//! [`ContractError`] variants. Application failures preserve the server
//! message verbatim for display.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Envelope shared by all JSON endpoints. Missing `data`/`error` fields
/// deserialize as `None` without requiring `T: Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Successful conversion payload: one block of ASCII text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertData {
    /// Rendered ASCII text, newline separated rows.
    pub text: String,
}

/// Raw video info payload nested under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VideoInfoData {
    duration: f64,
    fps: f64,
    frame_count: u64,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

/// Validated video info combined with the sibling `video_path` reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Total duration in seconds.
    pub duration: f64,
    /// Frames per second; strictly positive after validation.
    pub fps: f64,
    /// Total frame count.
    pub frame_count: u64,
    /// Source pixel width.
    pub width: u32,
    /// Source pixel height.
    pub height: u32,
    /// Opaque server-side reference for frame and export requests.
    pub video_path: String,
}

#[derive(Debug, Deserialize)]
struct VideoInfoEnvelope {
    success: bool,
    data: Option<VideoInfoData>,
    video_path: Option<String>,
    error: Option<String>,
}

/// Parses a conversion (image or frame) response into ASCII text.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON,
/// [`ContractError::Api`] when the server reports `success:false`, and
/// [`ContractError::InvalidContract`] when a success envelope carries no
/// text payload.
pub fn parse_convert_response(raw: &[u8]) -> Result<ConvertData, ContractError> {
    let envelope: Envelope<ConvertData> =
        serde_json::from_slice(raw).map_err(ContractError::Decode)?;

    if !envelope.success {
        return Err(ContractError::Api(failure_message(envelope.error)));
    }

    let data = envelope.data.ok_or_else(|| {
        ContractError::InvalidContract("success envelope is missing data.text".to_string())
    })?;

    if data.text.is_empty() {
        return Err(ContractError::InvalidContract(
            "success envelope carries empty text".to_string(),
        ));
    }

    Ok(data)
}

/// Parses and validates a video info response.
///
/// # Errors
/// Returns [`ContractError::Api`] for `success:false` envelopes and
/// [`ContractError::InvalidContract`] when the payload is unusable for
/// playback (non-positive fps, blank `video_path`, missing data).
pub fn parse_video_info_response(raw: &[u8]) -> Result<VideoInfo, ContractError> {
    let envelope: VideoInfoEnvelope =
        serde_json::from_slice(raw).map_err(ContractError::Decode)?;

    if !envelope.success {
        return Err(ContractError::Api(failure_message(envelope.error)));
    }

    let data = envelope.data.ok_or_else(|| {
        ContractError::InvalidContract("video info envelope is missing data".to_string())
    })?;
    let video_path = envelope.video_path.unwrap_or_default();

    if video_path.trim().is_empty() {
        return Err(ContractError::InvalidContract(
            "video info is missing video_path".to_string(),
        ));
    }

    if !(data.fps > 0.0) {
        return Err(ContractError::InvalidContract(format!(
            "video fps must be positive, got {}",
            data.fps
        )));
    }

    Ok(VideoInfo {
        duration: data.duration,
        fps: data.fps,
        frame_count: data.frame_count,
        width: data.width,
        height: data.height,
        video_path,
    })
}

/// Extracts a display message from a failed binary-endpoint body.
///
/// Binary endpoints answer JSON only on failure; a body that is not a valid
/// envelope degrades to a bounded raw snippet so something is always shown.
pub fn parse_error_body(raw: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<Envelope<serde_json::Value>>(raw)
        && !envelope.success
    {
        return failure_message(envelope.error);
    }

    let snippet = String::from_utf8_lossy(raw);
    let mut message: String = snippet.chars().take(200).collect();
    if message.trim().is_empty() {
        message = "server returned an unreadable error".to_string();
    }
    message
}

fn failure_message(error: Option<String>) -> String {
    match error {
        Some(message) if !message.trim().is_empty() => message,
        _ => "server reported failure without a message".to_string(),
    }
}

/// Contract parsing errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Server-reported application failure (`success:false`).
    #[error("{0}")]
    Api(String),
    /// Parsed payload violates contract expectations.
    #[error("response contract violation: {0}")]
    InvalidContract(String),
}
