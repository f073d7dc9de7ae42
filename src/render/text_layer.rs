use resvg::tiny_skia;

use crate::{
    assets::color::AccentColor,
    foundation::error::{TypebannerError, TypebannerResult},
    render::layout::{
        self, FONT_FAMILY, FONT_SIZE, FRAME_WIDTH, LEFT_MARGIN, PxRect, TEXT_BASELINE_Y,
        TEXT_LAYER_HEIGHT, TEXT_LAYER_Y,
    },
};

/// Offscreen strip holding the typed glyphs and the cursor, in frame coordinates starting at
/// `(0, TEXT_LAYER_Y)`.
pub(crate) struct TextLayer {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
    /// Cursor block in frame coordinates, when one was painted.
    pub cursor: Option<PxRect>,
}

/// SVG markup for the glyphs. `visible` is already cut to the revealed prefix.
pub(crate) fn text_layer_svg(visible: &str, color: AccentColor) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 {y} {w} {h}">"#,
        w = FRAME_WIDTH,
        h = TEXT_LAYER_HEIGHT,
        y = TEXT_LAYER_Y,
    );
    if !visible.is_empty() {
        svg.push_str(&format!(
            r#"<text x="{LEFT_MARGIN}" y="{TEXT_BASELINE_Y}" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}" font-weight="bold" fill="{fill}" xml:space="preserve">{}</text>"#,
            escape_xml_text(visible),
            fill = color.to_hex(),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn parse(opts: &usvg::Options<'_>, svg: &str) -> TypebannerResult<usvg::Tree> {
    usvg::Tree::from_str(svg, opts)
        .map_err(|e| TypebannerError::render(format!("text layer markup rejected: {e}")))
}

/// Pen position after the laid-out text, or the left margin when nothing was laid out.
///
/// usvg builds text bounding boxes from glyph advances, so the right edge includes trailing
/// spaces and the advance of the last glyph.
fn text_end_x(group: &usvg::Group) -> f32 {
    group
        .children()
        .iter()
        .map(|node| match node {
            usvg::Node::Text(text) => text.bounding_box().right(),
            usvg::Node::Group(g) => text_end_x(g),
            _ => LEFT_MARGIN,
        })
        .fold(LEFT_MARGIN, f32::max)
}

/// Where the text ends once `visible` is laid out with the renderer's fonts.
pub(crate) fn measure_text_end(opts: &usvg::Options<'_>, visible: &str) -> TypebannerResult<f32> {
    if visible.is_empty() {
        return Ok(LEFT_MARGIN);
    }
    let tree = parse(opts, &text_layer_svg(visible, AccentColor::WHITE))?;
    Ok(text_end_x(tree.root()))
}

/// Lay out and rasterize the glyph strip, then append the cursor block where the text ends.
///
/// Text the markup parser rejects (e.g. control characters) fails the layer, and with it the frame.
pub(crate) fn rasterize_text_layer(
    opts: &usvg::Options<'_>,
    visible: &str,
    cursor: bool,
    color: AccentColor,
) -> TypebannerResult<TextLayer> {
    let tree = parse(opts, &text_layer_svg(visible, color))?;

    let mut pixmap = tiny_skia::Pixmap::new(FRAME_WIDTH, TEXT_LAYER_HEIGHT)
        .ok_or_else(|| TypebannerError::render("failed to allocate text layer pixmap"))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let cursor = if cursor {
        let rect = layout::cursor_rect(text_end_x(tree.root()));
        let local = tiny_skia::Rect::from_xywh(rect.x, rect.y - TEXT_LAYER_Y as f32, rect.w, rect.h)
            .ok_or_else(|| TypebannerError::render(format!("degenerate cursor {rect:?}")))?;
        let [r, g, b] = color.to_array();
        let mut paint = tiny_skia::Paint::default();
        paint.set_color_rgba8(r, g, b, 255);
        pixmap.fill_rect(local, &paint, tiny_skia::Transform::identity(), None);
        Some(rect)
    } else {
        None
    };

    Ok(TextLayer {
        width: pixmap.width(),
        height: pixmap.height(),
        rgba8_premul: pixmap.take(),
        cursor,
    })
}

fn escape_xml_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text_layer.rs"]
mod tests;
