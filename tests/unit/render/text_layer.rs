use super::*;

fn opts() -> usvg::Options<'static> {
    usvg::Options {
        fontdb: crate::assets::fonts::build_fontdb(&[] as &[&std::path::Path]),
        font_resolver: crate::assets::fonts::monospace_first_resolver(),
        ..Default::default()
    }
}

fn alpha_at(layer: &TextLayer, x: u32, y: u32) -> u8 {
    layer.rgba8_premul[((y * layer.width + x) * 4 + 3) as usize]
}

/// Rightmost column left of `limit` with solid coverage on the text line.
fn ink_end(layer: &TextLayer, limit: u32) -> Option<u32> {
    let y0 = layout::TEXT_CENTER_Y as u32 - 30 - TEXT_LAYER_Y;
    let y1 = layout::TEXT_CENTER_Y as u32 + 30 - TEXT_LAYER_Y;
    (0..limit)
        .rev()
        .find(|&x| (y0..y1).any(|y| alpha_at(layer, x, y) > 128))
}

#[test]
fn markup_escapes_user_text() {
    let svg = text_layer_svg("<b>&\"'", AccentColor::MATRIX_GREEN);
    assert!(svg.contains("&lt;b&gt;&amp;&quot;&apos;"));
    assert!(!svg.contains("<b>"));
}

#[test]
fn empty_prefix_emits_no_text_element() {
    let svg = text_layer_svg("", AccentColor::AZURE);
    assert!(!svg.contains("<text"));
}

#[test]
fn cursor_only_layer_paints_the_block_at_the_margin() {
    let layer = rasterize_text_layer(&opts(), "", true, AccentColor::WHITE).unwrap();
    assert_eq!((layer.width, layer.height), (FRAME_WIDTH, TEXT_LAYER_HEIGHT));

    let rect = layer.cursor.unwrap();
    assert_eq!(rect, layout::cursor_rect(LEFT_MARGIN));
    let (cx, cy) = rect.center();
    let y = cy as u32 - TEXT_LAYER_Y;
    let idx = ((y * layer.width + cx as u32) * 4) as usize;
    assert_eq!(&layer.rgba8_premul[idx..idx + 4], &[255, 255, 255, 255]);
}

#[test]
fn no_cursor_and_no_text_is_fully_transparent() {
    let layer = rasterize_text_layer(&opts(), "", false, AccentColor::WHITE).unwrap();
    assert!(layer.cursor.is_none());
    assert!(layer.rgba8_premul.iter().all(|&b| b == 0));
}

#[test]
fn cursor_touches_the_last_glyph_for_narrow_and_wide_text() {
    for text in ["Welcome iiiiiiiiiiiiW", "Welcome WWWWWWWWWWWW"] {
        let layer = rasterize_text_layer(&opts(), text, true, AccentColor::WHITE).unwrap();
        let rect = layer.cursor.unwrap();
        let Some(end) = ink_end(&layer, rect.x.floor() as u32) else {
            eprintln!("skipping: no font rendered glyphs for {text:?}");
            return;
        };
        let gap = rect.x - (end + 1) as f32;
        assert!(
            (-1.0..=14.0).contains(&gap),
            "{text:?}: glyphs end at x={end}, cursor at x={} (gap {gap})",
            rect.x
        );
    }
}

#[test]
fn measured_end_matches_the_painted_cursor() {
    let text = "Hi ferris";
    let end = measure_text_end(&opts(), text).unwrap();
    let layer = rasterize_text_layer(&opts(), text, true, AccentColor::WHITE).unwrap();
    assert_eq!(layer.cursor, Some(layout::cursor_rect(end)));
    assert_eq!(measure_text_end(&opts(), "").unwrap(), LEFT_MARGIN);
}

#[test]
fn trailing_space_moves_the_cursor() {
    let bare = measure_text_end(&opts(), "Hi").unwrap();
    let spaced = measure_text_end(&opts(), "Hi ").unwrap();
    if bare == LEFT_MARGIN {
        eprintln!("skipping: no font laid out text");
        return;
    }
    assert!(spaced > bare, "space advance ignored: {bare} vs {spaced}");
}
