//! Integration tests for the video upload flow: info fetch, descriptor,
//! first-frame render, timeline population.

mod common;

use asciiview_app::{ConversionOutcome, UploadOutcome};
use asciiview_gateway::Endpoint;

#[test]
fn video_upload_fetches_info_then_first_frame() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);

    let outcome = controller.handle_upload(common::video_file());
    assert_eq!(outcome, UploadOutcome::Video(ConversionOutcome::Rendered));

    assert_eq!(
        server.endpoints(),
        vec![Endpoint::VideoInfo, Endpoint::VideoFrame]
    );
    assert_eq!(controller.view().ascii_text.as_deref(), Some("frame@0\n"));
}

#[test]
fn timeline_max_matches_reported_duration() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);

    controller.handle_upload(common::video_file());

    assert_eq!(controller.view().timeline_max_secs, common::FIXTURE_DURATION);
    assert_eq!(controller.view().timeline_position_secs, 0.0);
    assert!(controller.view().can_play());

    let descriptor = controller.descriptor().expect("descriptor should load");
    assert_eq!(descriptor.video_path, "uploads/clip.mp4");
    assert_eq!(descriptor.frame_count, common::FIXTURE_FRAME_COUNT);
}

#[test]
fn failed_info_fetch_reports_inline_and_leaves_no_descriptor() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);

    server.fail_next("cannot read video");
    let outcome = controller.handle_upload(common::video_file());

    assert_eq!(outcome, UploadOutcome::VideoInfoFailed);
    assert_eq!(
        controller.view().inline_error.as_deref(),
        Some("cannot read video")
    );
    assert!(controller.descriptor().is_none());
    assert!(controller.playback().is_none());
    assert_eq!(server.call_count(), 1);
}
