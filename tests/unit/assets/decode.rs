use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn backdrop_matches_canvas_and_premultiplies() {
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([100, 50, 200, 128]));
    let canvas = Canvas {
        width: 4,
        height: 4,
    };

    let backdrop = decode_backdrop(&png_bytes(img), canvas).unwrap();
    assert_eq!((backdrop.width, backdrop.height), (4, 4));
    assert_eq!(backdrop.rgba8_premul.len(), 4 * 4 * 4);
    assert_eq!(
        &backdrop.rgba8_premul[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn wide_image_is_center_cropped() {
    // Left third red, middle third green, right third blue; a square crop keeps the middle.
    let img = image::RgbaImage::from_fn(30, 10, |x, _| match x {
        0..=9 => image::Rgba([255, 0, 0, 255]),
        10..=19 => image::Rgba([0, 255, 0, 255]),
        _ => image::Rgba([0, 0, 255, 255]),
    });
    let canvas = Canvas {
        width: 10,
        height: 10,
    };
    let backdrop = decode_backdrop(&png_bytes(img), canvas).unwrap();
    let center = ((5 * 10 + 5) * 4) as usize;
    assert_eq!(&backdrop.rgba8_premul[center..center + 4], &[0, 255, 0, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_backdrop(b"not an image", Canvas::FULL_HD).is_err());
}

#[test]
fn missing_or_corrupt_files_degrade_to_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Backdrop::open(&dir.path().join("nope.png"), Canvas::FULL_HD).is_none());

    let corrupt = dir.path().join("corrupt.png");
    std::fs::write(&corrupt, b"\x89PNG but not really").unwrap();
    assert!(Backdrop::open(&corrupt, Canvas::FULL_HD).is_none());
}
