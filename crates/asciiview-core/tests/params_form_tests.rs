//! Integration tests for parameter snapshot form projection.

use asciiview_core::{ColorMode, RenderParams};

#[test]
fn snapshot_projects_width_and_contrast() {
    let params = RenderParams {
        width: 120,
        contrast: 1.5,
        color: None,
    };

    let fields = params.form_fields();
    assert_eq!(fields[0], ("width".to_string(), "120".to_string()));
    assert_eq!(fields[1], ("contrast".to_string(), "1.5".to_string()));
    assert_eq!(fields.len(), 2);
}

#[test]
fn selected_color_is_appended_lowercase() {
    let params = RenderParams {
        width: 80,
        contrast: 1.0,
        color: Some(ColorMode::Green),
    };

    let fields = params.form_fields();
    assert_eq!(fields[2], ("color".to_string(), "green".to_string()));
}

#[test]
fn malformed_looking_values_are_forwarded_untouched() {
    // Width zero is nonsense to the renderer; it still goes to the server,
    // whose rejection is displayed instead of client-side validation.
    let params = RenderParams {
        width: 0,
        contrast: -3.0,
        color: None,
    };

    let fields = params.form_fields();
    assert_eq!(fields[0].1, "0");
    assert_eq!(fields[1].1, "-3");
}
