use std::path::Path;

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::{
    assets::{color::AccentColor, decode::Backdrop, fonts},
    foundation::{
        core::Canvas,
        error::{TypebannerError, TypebannerResult},
        math::opacity_to_u8,
    },
    render::{
        blur::blur_painted_region,
        composite::{over_in_place, over_region_in_place},
        layout::{
            self, BANNER_FILL_OPACITY, BANNER_STROKE_WIDTH, DEFAULT_OVERLAY_OPACITY,
            FALLBACK_FILL, GLOW_RADIUS, GLOW_SIGMA, TEXT_LAYER_Y,
        },
        text_layer::{measure_text_end, rasterize_text_layer},
    },
};

/// A rendered frame as opaque RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    /// RGB value at `(x, y)`.
    ///
    /// Panics when the coordinate is outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = ((y * self.width + x) * 3) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Copy into an [`image::RgbImage`].
    pub fn to_rgb_image(&self) -> TypebannerResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| TypebannerError::render("frame buffer does not match its dimensions"))
    }

    /// Write the frame as a PNG.
    pub fn save_png(&self, path: &Path) -> TypebannerResult<()> {
        self.to_rgb_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn from_opaque_premul(width: u32, height: u32, rgba: &[u8]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for px in rgba.chunks_exact(4) {
            data.extend_from_slice(&px[..3]);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

/// Whether the block cursor is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    /// Shown while the reveal is incomplete.
    #[default]
    Auto,
    /// Never shown; used for the held final frame.
    Hidden,
}

/// Everything one frame depends on.
#[derive(Clone, Copy, Debug)]
pub struct RenderRequest<'a> {
    /// The whole line being typed.
    pub full_text: &'a str,
    /// Number of leading characters revealed (clamped to the text length).
    pub visible_count: usize,
    /// Accent color for text, cursor, markers and banner border.
    pub text_color: AccentColor,
    /// Prepared background image, if any.
    pub background: Option<&'a Backdrop>,
    /// Opacity of the black overlay drawn over the background image.
    pub overlay_opacity: f32,
    /// Cursor policy.
    pub cursor: CursorMode,
}

impl<'a> RenderRequest<'a> {
    /// Request with no background, default overlay and automatic cursor.
    pub fn new(full_text: &'a str, visible_count: usize, text_color: AccentColor) -> Self {
        Self {
            full_text,
            visible_count,
            text_color,
            background: None,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            cursor: CursorMode::Auto,
        }
    }

    /// Set the background image.
    pub fn with_background(mut self, background: Option<&'a Backdrop>) -> Self {
        self.background = background;
        self
    }

    /// Set the overlay opacity.
    pub fn with_overlay_opacity(mut self, overlay_opacity: f32) -> Self {
        self.overlay_opacity = overlay_opacity;
        self
    }

    /// Set the cursor policy.
    pub fn with_cursor(mut self, cursor: CursorMode) -> Self {
        self.cursor = cursor;
        self
    }

    /// Length of the full text in characters.
    pub fn text_len(&self) -> usize {
        self.full_text.chars().count()
    }

    /// `visible_count` clamped to `[0, text_len]`.
    pub fn revealed(&self) -> usize {
        self.visible_count.min(self.text_len())
    }

    /// `true` once every character is revealed.
    pub fn is_complete(&self) -> bool {
        self.revealed() == self.text_len()
    }

    /// `true` when this frame carries the block cursor.
    pub fn shows_cursor(&self) -> bool {
        self.cursor == CursorMode::Auto && !self.is_complete()
    }

    /// The revealed prefix of the text.
    pub fn visible_text(&self) -> &'a str {
        let n = self.revealed();
        match self.full_text.char_indices().nth(n) {
            Some((byte, _)) => &self.full_text[..byte],
            None => self.full_text,
        }
    }
}

/// Anything that can turn a [`RenderRequest`] into a [`Frame`].
///
/// The assembler only depends on this trait, so frame sequencing can be driven by stand-ins.
pub trait FrameSource {
    /// Canvas every produced frame has.
    fn canvas(&self) -> Canvas;

    /// Render one frame. Implementations must be deterministic for identical requests.
    fn render_frame(&self, req: &RenderRequest<'_>) -> TypebannerResult<Frame>;
}

/// CPU banner renderer.
///
/// Holds only immutable state (font database and resolver); every call is a pure function of its
/// request.
pub struct FrameRenderer {
    canvas: Canvas,
    svg_opts: usvg::Options<'static>,
}

impl FrameRenderer {
    /// Renderer using system fonts.
    pub fn new() -> Self {
        Self::with_font_dirs::<&Path>(&[])
    }

    /// Renderer using system fonts plus fonts found in `dirs`.
    pub fn with_font_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let svg_opts = usvg::Options {
            fontdb: fonts::build_fontdb(dirs),
            font_resolver: fonts::monospace_first_resolver(),
            ..Default::default()
        };
        Self {
            canvas: Canvas::FULL_HD,
            svg_opts,
        }
    }

    /// Load a background image fitted to this renderer's canvas; `None` when missing or unreadable.
    pub fn open_backdrop(&self, path: &Path) -> Option<Backdrop> {
        Backdrop::open(path, self.canvas)
    }

    /// X coordinate where `visible` ends when laid out with this renderer's fonts.
    ///
    /// The block cursor starts here; see [`layout::cursor_rect`].
    pub fn text_end_x(&self, visible: &str) -> TypebannerResult<f32> {
        measure_text_end(&self.svg_opts, visible)
    }

    fn paint_background(
        &self,
        pixmap: &mut tiny_skia::Pixmap,
        background: Option<&Backdrop>,
        overlay_opacity: f32,
    ) -> TypebannerResult<()> {
        let [r, g, b] = FALLBACK_FILL;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));

        let Some(backdrop) = background else {
            return Ok(());
        };
        if backdrop.width != self.canvas.width || backdrop.height != self.canvas.height {
            return Err(TypebannerError::validation(format!(
                "backdrop is {}x{}, renderer canvas is {}x{}",
                backdrop.width, backdrop.height, self.canvas.width, self.canvas.height
            )));
        }
        over_in_place(pixmap.data_mut(), &backdrop.rgba8_premul, 1.0)?;
        fill_rect(
            pixmap,
            layout::PxRect {
                x: 0.0,
                y: 0.0,
                w: self.canvas.width as f32,
                h: self.canvas.height as f32,
            },
            [0, 0, 0],
            opacity_to_u8(overlay_opacity),
        )
    }

    fn paint_glyphs(
        &self,
        pixmap: &mut tiny_skia::Pixmap,
        req: &RenderRequest<'_>,
    ) -> TypebannerResult<()> {
        let layer = rasterize_text_layer(
            &self.svg_opts,
            req.visible_text(),
            req.shows_cursor(),
            req.text_color,
        )?;

        let (w, h) = (self.canvas.width, self.canvas.height);
        if let Some(glow) = blur_painted_region(
            &layer.rgba8_premul,
            layer.width,
            layer.height,
            GLOW_RADIUS,
            GLOW_SIGMA,
        )? {
            over_region_in_place(
                pixmap.data_mut(),
                w,
                h,
                &glow.rgba8_premul,
                glow.width,
                glow.height,
                glow.x,
                TEXT_LAYER_Y + glow.y,
            )?;
        }
        over_region_in_place(
            pixmap.data_mut(),
            w,
            h,
            &layer.rgba8_premul,
            layer.width,
            layer.height,
            0,
            TEXT_LAYER_Y,
        )
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FrameRenderer {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn render_frame(&self, req: &RenderRequest<'_>) -> TypebannerResult<Frame> {
        let Canvas { width, height } = self.canvas;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| TypebannerError::render("failed to allocate frame pixmap"))?;

        self.paint_background(&mut pixmap, req.background, req.overlay_opacity)?;

        let accent = req.text_color.to_array();
        let banner = layout::banner_rect();
        fill_rect(&mut pixmap, banner, [0, 0, 0], opacity_to_u8(BANNER_FILL_OPACITY))?;
        stroke_rect(&mut pixmap, banner, accent, BANNER_STROKE_WIDTH)?;

        if req.revealed() > 0 {
            fill_triangle(&mut pixmap, layout::left_marker_triangle(), accent)?;
        }
        if req.is_complete() {
            fill_triangle(
                &mut pixmap,
                layout::right_marker_triangle(req.revealed()),
                accent,
            )?;
        }

        self.paint_glyphs(&mut pixmap, req)?;
        Ok(Frame::from_opaque_premul(width, height, pixmap.data()))
    }
}

/// Render one frame with a throwaway renderer, loading the background from `background_ref`.
///
/// A missing or unreadable background falls back to the flat fill. Prefer a long-lived
/// [`FrameRenderer`] when rendering many frames.
pub fn render(
    text: &str,
    visible_count: usize,
    color: AccentColor,
    background_ref: Option<&Path>,
    overlay_opacity: f32,
) -> TypebannerResult<Frame> {
    let renderer = FrameRenderer::new();
    let backdrop = background_ref.and_then(|p| renderer.open_backdrop(p));
    let req = RenderRequest::new(text, visible_count, color)
        .with_background(backdrop.as_ref())
        .with_overlay_opacity(overlay_opacity);
    renderer.render_frame(&req)
}

fn solid_paint(rgb: [u8; 3], alpha: u8) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], alpha);
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(r: layout::PxRect) -> TypebannerResult<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x, r.y, r.w, r.h)
        .ok_or_else(|| TypebannerError::render(format!("degenerate rect {r:?}")))
}

fn fill_rect(
    pixmap: &mut tiny_skia::Pixmap,
    rect: layout::PxRect,
    rgb: [u8; 3],
    alpha: u8,
) -> TypebannerResult<()> {
    if alpha == 0 {
        return Ok(());
    }
    pixmap.fill_rect(
        to_skia_rect(rect)?,
        &solid_paint(rgb, alpha),
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(())
}

fn stroke_rect(
    pixmap: &mut tiny_skia::Pixmap,
    rect: layout::PxRect,
    rgb: [u8; 3],
    width: f32,
) -> TypebannerResult<()> {
    let path = tiny_skia::PathBuilder::from_rect(to_skia_rect(rect)?);
    let stroke = tiny_skia::Stroke {
        width,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(
        &path,
        &solid_paint(rgb, 255),
        &stroke,
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(())
}

fn fill_triangle(
    pixmap: &mut tiny_skia::Pixmap,
    points: [(f32, f32); 3],
    rgb: [u8; 3],
) -> TypebannerResult<()> {
    let mut pb = tiny_skia::PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    pb.line_to(points[1].0, points[1].1);
    pb.line_to(points[2].0, points[2].1);
    pb.close();
    let path = pb
        .finish()
        .ok_or_else(|| TypebannerError::render("degenerate marker triangle"))?;
    pixmap.fill_path(
        &path,
        &solid_paint(rgb, 255),
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::identity(),
        None,
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
