//! Integration tests for debounced parameter re-conversion.

mod common;

use asciiview_app::ConversionOutcome;
use asciiview_core::RenderParams;
use asciiview_gateway::Endpoint;

fn params_with_width(width: u32) -> RenderParams {
    RenderParams {
        width,
        ..RenderParams::default()
    }
}

#[test]
fn rapid_changes_issue_exactly_one_conversion() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);
    controller.handle_upload(common::image_file());
    let uploads = server.call_count();

    // Slider drag: a burst of changes inside the 300 ms quiet window.
    controller.handle_params_changed(params_with_width(80), 1_000);
    controller.handle_params_changed(params_with_width(90), 1_100);
    controller.handle_params_changed(params_with_width(120), 1_250);

    assert_eq!(controller.poll(1_400), None);
    assert_eq!(
        controller.poll(1_550),
        Some(ConversionOutcome::Rendered)
    );
    assert_eq!(controller.poll(1_600), None);

    assert_eq!(server.call_count(), uploads + 1);
    // The conversion uses the last snapshot of the burst.
    assert_eq!(
        controller.view().ascii_text.as_deref(),
        Some("image@w120\n")
    );
}

#[test]
fn changes_without_a_file_never_convert() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);

    controller.handle_params_changed(params_with_width(80), 1_000);
    assert_eq!(controller.poll(2_000), None);
    assert_eq!(server.call_count(), 0);
}

#[test]
fn video_mode_refetches_the_current_frame() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);
    controller.handle_upload(common::video_file());
    controller.handle_scrub(1.5);

    controller.handle_params_changed(params_with_width(60), 5_000);
    assert_eq!(controller.poll(5_300), Some(ConversionOutcome::Rendered));

    let request = server.last_request().expect("a frame fetch should exist");
    assert_eq!(request.endpoint, Endpoint::VideoFrame);
    assert_eq!(controller.view().ascii_text.as_deref(), Some("frame@1.5\n"));
}
