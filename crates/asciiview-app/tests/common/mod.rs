//! Shared fixtures for app integration tests.

use std::sync::{Arc, Mutex};

use asciiview_app::SessionController;
use asciiview_core::MediaFile;
use asciiview_gateway::{
    ApiRequest, ApiTransport, Endpoint, FormPart, GatewayClient, GatewayError, RawResponse,
};
use serde_json::json;

/// Fixture descriptor values served by [`FakeServer`].
pub const FIXTURE_DURATION: f64 = 2.0;
#[allow(dead_code)]
pub const FIXTURE_FPS: f64 = 10.0;
#[allow(dead_code)]
pub const FIXTURE_FRAME_COUNT: u64 = 20;

/// Scripted in-memory conversion server.
///
/// Records every request and answers deterministic fixtures; conversion
/// text encodes the received width/time so assertions can pin exact values.
#[derive(Clone, Default)]
pub struct FakeServer {
    calls: Arc<Mutex<Vec<ApiRequest>>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

#[allow(dead_code)]
impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next request answer a `success:false` envelope.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().expect("fail lock should work") = Some(message.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("call lock should work").len()
    }

    pub fn endpoints(&self) -> Vec<Endpoint> {
        self.calls
            .lock()
            .expect("call lock should work")
            .iter()
            .map(|request| request.endpoint)
            .collect()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.calls
            .lock()
            .expect("call lock should work")
            .last()
            .cloned()
    }
}

fn text_field(request: &ApiRequest, name: &str) -> Option<String> {
    request.parts.iter().find_map(|part| match part {
        FormPart::Text {
            name: part_name,
            value,
        } if part_name == name => Some(value.clone()),
        _ => None,
    })
}

fn json_response(status: u16, body: serde_json::Value) -> RawResponse {
    RawResponse {
        status,
        content_type: "application/json".to_string(),
        body: body.to_string().into_bytes(),
    }
}

fn binary_response(content_type: &str, body: Vec<u8>) -> RawResponse {
    RawResponse {
        status: 200,
        content_type: content_type.to_string(),
        body,
    }
}

impl ApiTransport for FakeServer {
    fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<RawResponse, GatewayError> {
        self.calls
            .lock()
            .expect("call lock should work")
            .push(request.clone());

        if let Some(message) = self.fail_next.lock().expect("fail lock should work").take() {
            return Ok(json_response(
                500,
                json!({"success": false, "error": message}),
            ));
        }

        let response = match request.endpoint {
            Endpoint::ConvertImage => {
                let width = text_field(request, "width").unwrap_or_default();
                json_response(
                    200,
                    json!({"success": true, "data": {"text": format!("image@w{width}\n")}}),
                )
            }
            Endpoint::VideoFrame => {
                let time = text_field(request, "time_sec").unwrap_or_default();
                json_response(
                    200,
                    json!({"success": true, "data": {"text": format!("frame@{time}\n")}}),
                )
            }
            Endpoint::VideoInfo => json_response(
                200,
                json!({
                    "success": true,
                    "data": {
                        "duration": FIXTURE_DURATION,
                        "fps": FIXTURE_FPS,
                        "frame_count": FIXTURE_FRAME_COUNT,
                        "width": 640,
                        "height": 360,
                    },
                    "video_path": "uploads/clip.mp4",
                }),
            ),
            Endpoint::ExportImagePng | Endpoint::ExportFramePng => {
                binary_response("image/png", vec![0x89, 0x50, 0x4e, 0x47])
            }
            Endpoint::ExportVideo => binary_response("video/mp4", vec![0x00, 0x01, 0x02]),
            Endpoint::ExportGif => binary_response("image/gif", b"GIF89a".to_vec()),
            Endpoint::ExportFrames => binary_response("application/zip", b"PK\x03\x04".to_vec()),
            Endpoint::Health => json_response(200, json!({"status": "ok"})),
        };

        Ok(response)
    }
}

#[allow(dead_code)]
pub fn image_file() -> MediaFile {
    MediaFile::new("cat.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .expect("image fixture should build")
}

#[allow(dead_code)]
pub fn video_file() -> MediaFile {
    MediaFile::new("clip.mp4", "video/mp4", vec![0x00, 0x01]).expect("video fixture should build")
}

#[allow(dead_code)]
pub fn pdf_file() -> MediaFile {
    MediaFile::new("report.pdf", "application/pdf", vec![0x25, 0x50])
        .expect("pdf fixture should build")
}

#[allow(dead_code)]
pub fn controller(server: &FakeServer) -> SessionController {
    let client = GatewayClient::new("http://ascii.test", Arc::new(server.clone()))
        .expect("gateway client should build");
    SessionController::new(client)
}
