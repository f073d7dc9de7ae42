//! Fixed geometry of the terminal banner on the 1920x1080 canvas.
//!
//! The cursor follows the laid-out text. The right marker is placed from an estimate instead: the
//! visible text is assumed to advance [`CHAR_ADVANCE`] pixels per character.

use crate::foundation::core::Canvas;

/// Frame width in pixels.
pub const FRAME_WIDTH: u32 = Canvas::FULL_HD.width;
/// Frame height in pixels.
pub const FRAME_HEIGHT: u32 = Canvas::FULL_HD.height;

/// Height of the highlighted banner band.
pub const BANNER_HEIGHT: u32 = 140;
/// Top edge of the banner band (vertically centered).
pub const BANNER_Y: u32 = (FRAME_HEIGHT - BANNER_HEIGHT) / 2;
/// Banner fill opacity (black).
pub const BANNER_FILL_OPACITY: f32 = 0.4;
/// Banner border stroke width.
pub const BANNER_STROKE_WIDTH: f32 = 2.0;

/// Left edge of the typed text.
pub const LEFT_MARGIN: f32 = 150.0;
/// Text size in pixels.
pub const FONT_SIZE: f32 = 72.0;
/// Font stack for the typed text.
pub const FONT_FAMILY: &str = "Courier New, Consolas, Monaco, DejaVu Sans Mono, monospace";
/// Estimated horizontal advance of one character at [`FONT_SIZE`], used for the right marker.
pub const CHAR_ADVANCE: f32 = 43.0;

/// Vertical center of the banner (and of the text line).
pub const TEXT_CENTER_Y: f32 = (FRAME_HEIGHT / 2) as f32;
/// Baseline that optically centers cap-height glyphs on [`TEXT_CENTER_Y`].
pub const TEXT_BASELINE_Y: f32 = TEXT_CENTER_Y + FONT_SIZE * 0.35;

/// Block cursor width.
pub const CURSOR_WIDTH: f32 = 40.0;
/// Block cursor height.
pub const CURSOR_HEIGHT: f32 = 68.0;

/// Left edge of the left (">") marker.
pub const LEFT_MARKER_X: f32 = 60.0;
/// Gap between the estimated end of the text and the right ("<") marker.
pub const MARKER_GAP: f32 = 50.0;
/// Marker triangle width.
pub const MARKER_WIDTH: f32 = 28.0;
/// Marker triangle height.
pub const MARKER_HEIGHT: f32 = 32.0;

/// Default opacity of the black overlay drawn over a background image.
pub const DEFAULT_OVERLAY_OPACITY: f32 = 0.7;
/// Flat fill used when no background image is available (`#0f0f23`).
pub const FALLBACK_FILL: [u8; 3] = [0x0f, 0x0f, 0x23];

/// Gaussian standard deviation of the text glow.
pub const GLOW_SIGMA: f32 = 3.0;
/// Blur kernel radius of the text glow (three sigma).
pub const GLOW_RADIUS: u32 = 9;

/// Top edge of the offscreen text layer (banner plus glow bleed).
pub const TEXT_LAYER_Y: u32 = BANNER_Y - GLOW_RADIUS;
/// Height of the offscreen text layer.
pub const TEXT_LAYER_HEIGHT: u32 = BANNER_HEIGHT + 2 * GLOW_RADIUS;

/// Axis-aligned rectangle in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PxRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl PxRect {
    /// Center point of the rectangle.
    pub fn center(self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Estimated width of the first `visible_count` characters.
pub fn estimated_text_width(visible_count: usize) -> f32 {
    visible_count as f32 * CHAR_ADVANCE
}

/// Banner band rectangle.
pub fn banner_rect() -> PxRect {
    PxRect {
        x: 0.0,
        y: BANNER_Y as f32,
        w: FRAME_WIDTH as f32,
        h: BANNER_HEIGHT as f32,
    }
}

/// Block cursor rectangle starting where the laid-out text ends (`text_end_x`).
pub fn cursor_rect(text_end_x: f32) -> PxRect {
    PxRect {
        x: text_end_x,
        y: TEXT_CENTER_Y - CURSOR_HEIGHT / 2.0,
        w: CURSOR_WIDTH,
        h: CURSOR_HEIGHT,
    }
}

/// Left edge of the right marker once `visible_count` characters are shown.
pub fn right_marker_x(visible_count: usize) -> f32 {
    LEFT_MARGIN + estimated_text_width(visible_count) + MARKER_GAP
}

/// Right-pointing triangle to the left of the text.
pub fn left_marker_triangle() -> [(f32, f32); 3] {
    let half = MARKER_HEIGHT / 2.0;
    [
        (LEFT_MARKER_X, TEXT_CENTER_Y - half),
        (LEFT_MARKER_X + MARKER_WIDTH, TEXT_CENTER_Y),
        (LEFT_MARKER_X, TEXT_CENTER_Y + half),
    ]
}

/// Left-pointing triangle after the completed text.
pub fn right_marker_triangle(visible_count: usize) -> [(f32, f32); 3] {
    let x = right_marker_x(visible_count);
    let half = MARKER_HEIGHT / 2.0;
    [
        (x + MARKER_WIDTH, TEXT_CENTER_Y - half),
        (x, TEXT_CENTER_Y),
        (x + MARKER_WIDTH, TEXT_CENTER_Y + half),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
