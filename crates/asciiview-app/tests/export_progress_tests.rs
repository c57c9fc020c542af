//! Integration tests for the estimated-progress display during exports.

mod common;

use asciiview_core::ExportKind;

#[test]
fn progress_polls_stay_below_one_hundred_until_resolution() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);
    controller.handle_upload(common::video_file());

    // 20-frame GIF fixture -> 3_000 ms estimate, ~30 ms per percent step.
    controller
        .run_export(ExportKind::Gif, 50_000)
        .expect("export should succeed");

    // The request resolved, so polls afterwards hold the settled 100.
    assert_eq!(controller.poll_export(50_010), Some(100));
    assert_eq!(controller.poll_export(999_999), Some(100));
    assert_eq!(controller.view().export_percent, Some(100));
}

#[test]
fn polls_without_an_export_are_noops() {
    let server = common::FakeServer::new();
    let mut controller = common::controller(&server);
    controller.handle_upload(common::video_file());

    assert_eq!(controller.poll_export(1_000), None);
    assert_eq!(controller.view().export_percent, None);
}
