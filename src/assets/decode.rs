use std::{path::Path, sync::Arc};

use anyhow::Context;
use image::imageops::FilterType;

use crate::foundation::{
    core::Canvas,
    error::{TypebannerError, TypebannerResult},
    math::premultiply_rgba8_in_place,
};

/// A background image already scaled and center-cropped to cover a canvas.
#[derive(Clone, Debug)]
pub struct Backdrop {
    /// Width in pixels (equals the target canvas width).
    pub width: u32,
    /// Height in pixels (equals the target canvas height).
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Backdrop {
    /// Load and fit the image at `path`.
    ///
    /// A missing or undecodable file yields `None` so the renderer falls back to a flat fill.
    pub fn open(path: &Path, canvas: Canvas) -> Option<Self> {
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "background image not found, using flat fill");
            return None;
        }
        match load_backdrop(path, canvas) {
            Ok(backdrop) => Some(backdrop),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "background image unreadable, using flat fill");
                None
            }
        }
    }
}

/// Read and fit the image at `path`, surfacing IO and decoding errors.
pub fn load_backdrop(path: &Path, canvas: Canvas) -> TypebannerResult<Backdrop> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read background image '{}'", path.display()))?;
    decode_backdrop(&bytes, canvas)
}

/// Decode `bytes` and scale/crop it to fill `canvas` (preserve aspect, center crop).
pub fn decode_backdrop(bytes: &[u8], canvas: Canvas) -> TypebannerResult<Backdrop> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(TypebannerError::validation(
            "backdrop canvas must be non-empty",
        ));
    }
    let dyn_img = image::load_from_memory(bytes).context("decode background image")?;
    let filled = dyn_img.resize_to_fill(canvas.width, canvas.height, FilterType::Triangle);
    let rgba = filled.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Backdrop {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
