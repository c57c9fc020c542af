#![warn(missing_docs)]
//! # asciiview-http
//!
//! ## Purpose
//! Implements the gateway transport over real HTTP with `reqwest`.
//!
//! ## Responsibilities
//! - Translate assembled [`ApiRequest`] parts into multipart bodies.
//! - Execute one blocking POST (or GET for the health probe) per call.
//! - Hand raw status/content-type/body back to the gateway untouched.
//!
//! ## Data flow
//! Gateway client -> [`HttpTransport::send`] -> conversion server ->
//! [`RawResponse`].
//!
//! ## Ownership and lifetimes
//! Request parts are cloned into the multipart body; nothing borrows past
//! the blocking call.
//!
//! ## Error model
//! Every network-level failure maps to [`GatewayError::Transport`]. The
//! transport never retries; single attempt per user action.

use std::time::Duration;

use asciiview_gateway::{ApiRequest, ApiTransport, Endpoint, FormPart, GatewayError, RawResponse};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

/// Default request timeout for interactive conversions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Timeout for long-running export requests; the progress simulator covers
/// the wait cosmetically.
pub const EXPORT_TIMEOUT_SECS: u64 = 600;

/// Blocking `reqwest` transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with interactive and export timeouts.
    ///
    /// # Errors
    /// Returns [`GatewayError::Transport`] when the TLS/client setup fails.
    pub fn new() -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(EXPORT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|error| GatewayError::Transport(error.to_string()))?;

        Ok(Self { client })
    }
}

impl ApiTransport for HttpTransport {
    fn send(&self, base_url: &str, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        let url = join_url(base_url, request.endpoint.path());

        let response = if request.endpoint == Endpoint::Health {
            self.client.get(&url).send()
        } else {
            self.client
                .post(&url)
                .multipart(build_form(&request.parts)?)
                .send()
        }
        .map_err(|error| GatewayError::Transport(error.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response
            .bytes()
            .map_err(|error| GatewayError::Transport(error.to_string()))?
            .to_vec();

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                mime_type,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|error| {
                        GatewayError::Transport(format!("invalid mime type: {error}"))
                    })?;
                form.part(name.clone(), file)
            }
        };
    }
    Ok(form)
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    //! Unit tests for URL joining.

    use super::*;

    #[test]
    fn join_strips_duplicate_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/", "/api/convert/image"),
            "http://127.0.0.1:8000/api/convert/image"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000", "/health"),
            "http://127.0.0.1:8000/health"
        );
    }
}
