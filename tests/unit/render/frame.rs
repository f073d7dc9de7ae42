use super::*;

fn renderer() -> FrameRenderer {
    FrameRenderer::new()
}

fn is_accent_like(px: [u8; 3], accent: AccentColor) -> bool {
    let a = accent.to_array();
    px.iter()
        .zip(a.iter())
        .all(|(&p, &c)| (i16::from(p) - i16::from(c)).abs() <= 8)
}

#[test]
fn visible_text_counts_characters_not_bytes() {
    let req = RenderRequest::new("héllo✨", 2, AccentColor::WHITE);
    assert_eq!(req.visible_text(), "hé");
    assert_eq!(req.text_len(), 6);
    assert!(!req.is_complete());

    let done = RenderRequest::new("héllo✨", 99, AccentColor::WHITE);
    assert_eq!(done.revealed(), 6);
    assert_eq!(done.visible_text(), "héllo✨");
    assert!(done.is_complete());
    assert!(!done.shows_cursor());
}

#[test]
fn hidden_cursor_overrides_auto() {
    let req = RenderRequest::new("abc", 1, AccentColor::WHITE);
    assert!(req.shows_cursor());
    assert!(!req.with_cursor(CursorMode::Hidden).shows_cursor());
}

#[test]
fn frame_has_full_hd_rgb_layout() {
    let r = renderer();
    let frame = r
        .render_frame(&RenderRequest::new("Hi", 0, AccentColor::MATRIX_GREEN))
        .unwrap();
    assert_eq!((frame.width, frame.height), (1920, 1080));
    assert_eq!(frame.data.len(), 1920 * 1080 * 3);
    assert_eq!(r.canvas(), Canvas::FULL_HD);
}

#[test]
fn flat_fill_outside_the_banner_without_background() {
    let frame = renderer()
        .render_frame(&RenderRequest::new("Hi", 1, AccentColor::CRIMSON))
        .unwrap();
    assert_eq!(frame.pixel(10, 10), FALLBACK_FILL);
    assert_eq!(frame.pixel(1900, 1070), FALLBACK_FILL);
}

#[test]
fn banner_darkens_the_fill_and_carries_an_accent_border() {
    let frame = renderer()
        .render_frame(&RenderRequest::new("Hi", 1, AccentColor::AZURE))
        .unwrap();
    let inside = frame.pixel(1800, 540);
    for (c, fill) in inside.iter().zip(FALLBACK_FILL) {
        assert!(*c < fill, "banner interior {inside:?} not darker than fill");
    }
    let border = frame.pixel(1800, layout::BANNER_Y);
    assert!(border[2] > 150, "border {border:?} should be azure-ish");
}

#[test]
fn left_marker_appears_once_typing_starts() {
    let r = renderer();
    let accent = AccentColor::AMBER;
    let (x, y) = (66, 540);

    let blank = r.render_frame(&RenderRequest::new("Hi", 0, accent)).unwrap();
    assert!(!is_accent_like(blank.pixel(x, y), accent));

    let typing = r.render_frame(&RenderRequest::new("Hi", 1, accent)).unwrap();
    assert!(is_accent_like(typing.pixel(x, y), accent));
}

#[test]
fn right_marker_only_on_completed_text() {
    let r = renderer();
    let accent = AccentColor::MATRIX_GREEN;
    let x = layout::right_marker_x(2) as u32 + 20;

    let partial = r.render_frame(&RenderRequest::new("Hi", 1, accent)).unwrap();
    assert!(!is_accent_like(partial.pixel(x, 540), accent));

    let done = r.render_frame(&RenderRequest::new("Hi", 2, accent)).unwrap();
    assert!(is_accent_like(done.pixel(x, 540), accent));
}

#[test]
fn cursor_block_sits_after_the_revealed_prefix() {
    let r = renderer();
    let accent = AccentColor::WHITE;
    let (cx, cy) = layout::cursor_rect(layout::LEFT_MARGIN).center();

    let with_cursor = r.render_frame(&RenderRequest::new("Hi", 0, accent)).unwrap();
    assert_eq!(with_cursor.pixel(cx as u32, cy as u32), [255, 255, 255]);

    let hidden = r
        .render_frame(&RenderRequest::new("Hi", 0, accent).with_cursor(CursorMode::Hidden))
        .unwrap();
    assert_ne!(hidden.pixel(cx as u32, cy as u32), [255, 255, 255]);
}

#[test]
fn cursor_follows_the_measured_text_end() {
    let r = renderer();
    let req = RenderRequest::new("Hi!", 2, AccentColor::WHITE);
    let end = r.text_end_x(req.visible_text()).unwrap();
    assert!(end >= layout::LEFT_MARGIN);

    let frame = r.render_frame(&req).unwrap();
    let (cx, cy) = layout::cursor_rect(end).center();
    assert_eq!(frame.pixel(cx as u32, cy as u32), [255, 255, 255]);
}

#[test]
fn mismatched_backdrop_is_rejected() {
    let small = Backdrop {
        width: 4,
        height: 4,
        rgba8_premul: std::sync::Arc::new(vec![255; 64]),
    };
    let err = renderer()
        .render_frame(&RenderRequest::new("Hi", 1, AccentColor::WHITE).with_background(Some(&small)))
        .unwrap_err();
    assert!(matches!(err, TypebannerError::Validation(_)));
}

#[test]
fn png_roundtrip_keeps_pixels() {
    let frame = renderer()
        .render_frame(&RenderRequest::new("Hi", 2, AccentColor::CRIMSON))
        .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    frame.save_png(&path).unwrap();

    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back.dimensions(), (1920, 1080));
    assert_eq!(back.as_raw(), &frame.data);
}
