use super::*;

#[test]
fn banner_is_vertically_centered() {
    let r = banner_rect();
    assert_eq!(r.y, 470.0);
    assert_eq!(r.y + r.h, 610.0);
    assert_eq!(r.center().1, TEXT_CENTER_Y);
}

#[test]
fn right_marker_sits_past_estimated_text() {
    assert_eq!(right_marker_x(0), 200.0);
    assert_eq!(right_marker_x(12), 150.0 + 12.0 * 43.0 + 50.0);
}

#[test]
fn cursor_starts_at_the_text_end_inside_the_banner() {
    let c = cursor_rect(LEFT_MARGIN + 100.0);
    assert_eq!(c.x, 250.0);
    assert_eq!((c.w, c.h), (CURSOR_WIDTH, CURSOR_HEIGHT));
    assert!(c.y >= BANNER_Y as f32 && c.y + c.h <= (BANNER_Y + BANNER_HEIGHT) as f32);
}

#[test]
fn frame_size_comes_from_the_canvas() {
    assert_eq!((FRAME_WIDTH, FRAME_HEIGHT), (Canvas::FULL_HD.width, Canvas::FULL_HD.height));
}

#[test]
fn text_layer_covers_banner_with_glow_bleed() {
    assert!(TEXT_LAYER_Y < BANNER_Y);
    assert!(TEXT_LAYER_Y + TEXT_LAYER_HEIGHT > BANNER_Y + BANNER_HEIGHT);
    assert!(TEXT_LAYER_Y + TEXT_LAYER_HEIGHT <= FRAME_HEIGHT);
}

#[test]
fn markers_point_toward_the_text() {
    let [top, tip, _] = left_marker_triangle();
    assert!(tip.0 > top.0);
    let [top, tip, _] = right_marker_triangle(4);
    assert!(tip.0 < top.0);
}
