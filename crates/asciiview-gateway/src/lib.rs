#![warn(missing_docs)]
//! # asciiview-gateway
//!
//! ## Purpose
//! Builds multipart requests for the conversion server and turns raw
//! responses into typed results.
//!
//! ## Responsibilities
//! - Catalog the server endpoints and their multipart field layouts.
//! - Assemble one [`ApiRequest`] per operation as pure data.
//! - Execute requests through an injectable [`ApiTransport`].
//! - Split binary-endpoint responses into artifact bytes or error envelopes.
//!
//! ## Data flow
//! Coordinator -> assembly function -> [`GatewayClient`] -> transport ->
//! [`RawResponse`] -> contract parsing -> typed result.
//!
//! ## Ownership and lifetimes
//! Requests own copies of file bytes and field values so transports can send
//! them without borrowing coordinator state across a suspension point.
//!
//! ## Error model
//! Every operation is a single attempt with no retry or backoff; transport
//! failures, `success:false` envelopes, and contract violations surface as
//! [`GatewayError`] variants for the caller to display.

use std::sync::Arc;

use asciiview_contract::{
    ContractError, VideoInfo, parse_convert_response, parse_error_body, parse_video_info_response,
};
use asciiview_core::{MediaFile, RenderParams};
use thiserror::Error;
use url::Url;

/// Server endpoints consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Image to ASCII text conversion.
    ConvertImage,
    /// Video metadata probe; returns the server-side reference path.
    VideoInfo,
    /// Single-frame ASCII text conversion.
    VideoFrame,
    /// Rendered PNG of the uploaded image.
    ExportImagePng,
    /// Rendered PNG of one video frame.
    ExportFramePng,
    /// Full ASCII MP4 render.
    ExportVideo,
    /// Full ASCII GIF render.
    ExportGif,
    /// Per-frame text files packed as ZIP.
    ExportFrames,
    /// Connectivity probe.
    Health,
}

impl Endpoint {
    /// Returns the request path for this endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::ConvertImage => "/api/convert/image",
            Endpoint::VideoInfo => "/api/convert/video/info",
            Endpoint::VideoFrame => "/api/convert/video/frame",
            Endpoint::ExportImagePng => "/api/convert/image/export_png",
            Endpoint::ExportFramePng => "/api/convert/video/export_frame_png",
            Endpoint::ExportVideo => "/api/convert/video/export_video",
            Endpoint::ExportGif => "/api/convert/video/export_gif",
            Endpoint::ExportFrames => "/api/convert/video/export_frames",
            Endpoint::Health => "/health",
        }
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value, forwarded as-is.
        value: String,
    },
    /// File field with declared type.
    File {
        /// Field name (always `file` for this server).
        name: String,
        /// Original file name.
        file_name: String,
        /// Declared MIME type.
        mime_type: String,
        /// Raw file bytes.
        bytes: Vec<u8>,
    },
}

/// One assembled request, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Target endpoint.
    pub endpoint: Endpoint,
    /// Multipart parts in send order.
    pub parts: Vec<FormPart>,
}

/// Raw response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, empty when absent.
    pub content_type: String,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns `true` when the body declares a JSON content type.
    pub fn is_json(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .starts_with("application/json")
    }
}

/// Abstract transport executed once per user action.
pub trait ApiTransport: Send + Sync {
    /// Sends one assembled request to `base_url` joined with the endpoint
    /// path.
    ///
    /// # Errors
    /// Returns [`GatewayError::Transport`] for network-level failures.
    fn send(&self, base_url: &str, request: &ApiRequest) -> Result<RawResponse, GatewayError>;
}

/// Builds the image conversion request.
pub fn build_convert_image(file: &MediaFile, params: &RenderParams) -> ApiRequest {
    let mut parts = vec![file_part(file)];
    parts.extend(param_parts(params));
    ApiRequest {
        endpoint: Endpoint::ConvertImage,
        parts,
    }
}

/// Builds the video info request (file only).
pub fn build_video_info(file: &MediaFile) -> ApiRequest {
    ApiRequest {
        endpoint: Endpoint::VideoInfo,
        parts: vec![file_part(file)],
    }
}

/// Builds a single-frame conversion request against the server-side
/// reference path.
pub fn build_video_frame(video_path: &str, time_sec: f64, params: &RenderParams) -> ApiRequest {
    let mut parts = vec![
        text_part("video_path", video_path),
        text_part("time_sec", &time_sec.to_string()),
    ];
    parts.extend(param_parts(params));
    ApiRequest {
        endpoint: Endpoint::VideoFrame,
        parts,
    }
}

/// Builds the image PNG export request.
pub fn build_export_image_png(file: &MediaFile, params: &RenderParams) -> ApiRequest {
    let mut parts = vec![file_part(file)];
    parts.extend(param_parts(params));
    ApiRequest {
        endpoint: Endpoint::ExportImagePng,
        parts,
    }
}

/// Builds the frame PNG export request.
pub fn build_export_frame_png(
    video_path: &str,
    time_sec: f64,
    params: &RenderParams,
) -> ApiRequest {
    let mut parts = vec![
        text_part("video_path", video_path),
        text_part("time_sec", &time_sec.to_string()),
    ];
    parts.extend(param_parts(params));
    ApiRequest {
        endpoint: Endpoint::ExportFramePng,
        parts,
    }
}

/// Builds one of the long-running video export requests (MP4/GIF/ZIP).
pub fn build_video_export(
    endpoint: Endpoint,
    video_path: &str,
    filename: &str,
    params: &RenderParams,
) -> ApiRequest {
    let mut parts = vec![
        text_part("video_path", video_path),
        text_part("filename", filename),
    ];
    parts.extend(param_parts(params));
    ApiRequest { endpoint, parts }
}

fn file_part(file: &MediaFile) -> FormPart {
    FormPart::File {
        name: "file".to_string(),
        file_name: file.file_name.clone(),
        mime_type: file.mime_type.clone(),
        bytes: file.bytes.clone(),
    }
}

fn text_part(name: &str, value: &str) -> FormPart {
    FormPart::Text {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn param_parts(params: &RenderParams) -> Vec<FormPart> {
    params
        .form_fields()
        .into_iter()
        .map(|(name, value)| FormPart::Text { name, value })
        .collect()
}

/// Typed client over an injectable transport.
#[derive(Clone)]
pub struct GatewayClient {
    base_url: String,
    transport: Arc<dyn ApiTransport>,
}

impl GatewayClient {
    /// Creates a client after validating the base URL.
    ///
    /// # Errors
    /// Returns [`GatewayError::InvalidBaseUrl`] for unparseable URLs or
    /// schemes other than `http`/`https`.
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn ApiTransport>,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Converts an uploaded image into ASCII text.
    ///
    /// # Errors
    /// Surfaces transport failures, `success:false` envelopes, and contract
    /// violations as [`GatewayError`].
    pub fn convert_image(
        &self,
        file: &MediaFile,
        params: &RenderParams,
    ) -> Result<String, GatewayError> {
        let response = self.send(&build_convert_image(file, params))?;
        Ok(parse_convert_response(&response.body)?.text)
    }

    /// Probes an uploaded video for its descriptor.
    ///
    /// # Errors
    /// Surfaces transport failures and contract violations as
    /// [`GatewayError`].
    pub fn fetch_video_info(&self, file: &MediaFile) -> Result<VideoInfo, GatewayError> {
        let response = self.send(&build_video_info(file))?;
        Ok(parse_video_info_response(&response.body)?)
    }

    /// Renders one video timestamp as ASCII text.
    ///
    /// # Errors
    /// Surfaces transport failures and contract violations as
    /// [`GatewayError`].
    pub fn fetch_frame(
        &self,
        video_path: &str,
        time_sec: f64,
        params: &RenderParams,
    ) -> Result<String, GatewayError> {
        let response = self.send(&build_video_frame(video_path, time_sec, params))?;
        Ok(parse_convert_response(&response.body)?.text)
    }

    /// Exports the uploaded image as a rendered PNG.
    ///
    /// # Errors
    /// Surfaces transport and server failures as [`GatewayError`].
    pub fn export_image_png(
        &self,
        file: &MediaFile,
        params: &RenderParams,
    ) -> Result<Vec<u8>, GatewayError> {
        let response = self.send(&build_export_image_png(file, params))?;
        expect_binary(response)
    }

    /// Exports one video frame as a rendered PNG.
    ///
    /// # Errors
    /// Surfaces transport and server failures as [`GatewayError`].
    pub fn export_frame_png(
        &self,
        video_path: &str,
        time_sec: f64,
        params: &RenderParams,
    ) -> Result<Vec<u8>, GatewayError> {
        let response = self.send(&build_export_frame_png(video_path, time_sec, params))?;
        expect_binary(response)
    }

    /// Exports the full ASCII video render (MP4).
    ///
    /// # Errors
    /// Surfaces transport and server failures as [`GatewayError`].
    pub fn export_video(
        &self,
        video_path: &str,
        filename: &str,
        params: &RenderParams,
    ) -> Result<Vec<u8>, GatewayError> {
        let request = build_video_export(Endpoint::ExportVideo, video_path, filename, params);
        expect_binary(self.send(&request)?)
    }

    /// Exports the full ASCII GIF render.
    ///
    /// # Errors
    /// Surfaces transport and server failures as [`GatewayError`].
    pub fn export_gif(
        &self,
        video_path: &str,
        filename: &str,
        params: &RenderParams,
    ) -> Result<Vec<u8>, GatewayError> {
        let request = build_video_export(Endpoint::ExportGif, video_path, filename, params);
        expect_binary(self.send(&request)?)
    }

    /// Exports all frames as text files packed in a ZIP.
    ///
    /// # Errors
    /// Surfaces transport and server failures as [`GatewayError`].
    pub fn export_frames(
        &self,
        video_path: &str,
        filename: &str,
        params: &RenderParams,
    ) -> Result<Vec<u8>, GatewayError> {
        let request = build_video_export(Endpoint::ExportFrames, video_path, filename, params);
        expect_binary(self.send(&request)?)
    }

    /// Probes server connectivity.
    ///
    /// # Errors
    /// Returns [`GatewayError::UnexpectedStatus`] for non-2xx answers.
    pub fn health(&self) -> Result<(), GatewayError> {
        let response = self.send(&ApiRequest {
            endpoint: Endpoint::Health,
            parts: Vec::new(),
        })?;

        if !response.is_http_success() {
            return Err(GatewayError::UnexpectedStatus {
                status: response.status,
            });
        }
        Ok(())
    }

    fn send(&self, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        self.transport.send(&self.base_url, request)
    }
}

/// Splits a binary-endpoint response into artifact bytes or an error.
///
/// The server answers artifact bytes on success and a JSON envelope on
/// failure, so the content type decides which path a body takes.
fn expect_binary(response: RawResponse) -> Result<Vec<u8>, GatewayError> {
    if response.is_http_success() && !response.is_json() {
        return Ok(response.body);
    }

    Err(GatewayError::Api(parse_error_body(&response.body)))
}

/// Validates the configured server base URL.
///
/// # Errors
/// Returns [`GatewayError::InvalidBaseUrl`] for unparseable URLs or schemes
/// other than `http`/`https`.
pub fn validate_base_url(base_url: &str) -> Result<(), GatewayError> {
    let parsed = Url::parse(base_url)
        .map_err(|error| GatewayError::InvalidBaseUrl(format!("invalid server url: {error}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(GatewayError::InvalidBaseUrl(
            "server url must use http or https".to_string(),
        ));
    }

    Ok(())
}

/// Gateway error taxonomy: network, application, and contract failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configured server URL violates client policy.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Network-level failure (connection refused, timeout, broken body).
    #[error("network failure: {0}")]
    Transport(String),
    /// Server-reported application failure, message shown verbatim.
    #[error("{0}")]
    Api(String),
    /// Response body violated the contract.
    #[error("contract failure: {0}")]
    Contract(String),
    /// Endpoint answered an unexpected HTTP status without an envelope.
    #[error("unexpected http status {status}")]
    UnexpectedStatus {
        /// Observed status code.
        status: u16,
    },
}

impl From<ContractError> for GatewayError {
    fn from(error: ContractError) -> Self {
        match error {
            ContractError::Api(message) => GatewayError::Api(message),
            other => GatewayError::Contract(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for request assembly and binary splitting.

    use super::*;

    fn fixture_file() -> MediaFile {
        MediaFile::new("cat.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
            .expect("fixture file should build")
    }

    #[test]
    fn convert_image_request_leads_with_the_file_part() {
        let request = build_convert_image(&fixture_file(), &RenderParams::default());
        assert_eq!(request.endpoint, Endpoint::ConvertImage);
        assert!(matches!(&request.parts[0], FormPart::File { name, .. } if name == "file"));
        assert!(
            matches!(&request.parts[1], FormPart::Text { name, value } if name == "width" && value == "100")
        );
    }

    #[test]
    fn frame_request_carries_reference_and_time() {
        let request = build_video_frame("uploads/clip.mp4", 1.25, &RenderParams::default());
        assert!(
            matches!(&request.parts[0], FormPart::Text { name, value } if name == "video_path" && value == "uploads/clip.mp4")
        );
        assert!(
            matches!(&request.parts[1], FormPart::Text { name, value } if name == "time_sec" && value == "1.25")
        );
    }

    #[test]
    fn binary_split_prefers_artifact_bytes() {
        let artifact = RawResponse {
            status: 200,
            content_type: "image/png".to_string(),
            body: vec![1, 2, 3],
        };
        assert_eq!(expect_binary(artifact).unwrap(), vec![1, 2, 3]);

        let failure = RawResponse {
            status: 500,
            content_type: "application/json".to_string(),
            body: br#"{"success": false, "error": "boom"}"#.to_vec(),
        };
        match expect_binary(failure) {
            Err(GatewayError::Api(message)) => assert_eq!(message, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn base_url_policy_rejects_non_http_schemes() {
        validate_base_url("http://127.0.0.1:8000").expect("http should pass");
        validate_base_url("https://ascii.example.test").expect("https should pass");
        assert!(validate_base_url("ftp://ascii.example.test").is_err());
        assert!(validate_base_url("not a url").is_err());
    }
}
