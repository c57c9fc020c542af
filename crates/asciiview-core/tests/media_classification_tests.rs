//! Integration tests for MIME-based media classification.

use asciiview_core::{CoreError, MediaFile, MediaKind, classify_media_type};

#[test]
fn image_and_video_prefixes_are_supported() {
    assert_eq!(classify_media_type("image/jpeg").unwrap(), MediaKind::Image);
    assert_eq!(classify_media_type("IMAGE/PNG").unwrap(), MediaKind::Image);
    assert_eq!(classify_media_type("video/webm").unwrap(), MediaKind::Video);
}

#[test]
fn unsupported_types_keep_the_declared_value() {
    let error = classify_media_type("application/pdf").expect_err("pdf should be rejected");
    match error {
        CoreError::UnsupportedMedia { declared } => assert_eq!(declared, "application/pdf"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn media_file_rejects_blank_names() {
    assert!(MediaFile::new("  ", "image/png", vec![1, 2, 3]).is_err());

    let file = MediaFile::new("cat.png", "image/png", vec![1, 2, 3]).expect("file should build");
    assert_eq!(file.kind().unwrap(), MediaKind::Image);
}
