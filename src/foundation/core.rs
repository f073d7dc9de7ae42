use crate::foundation::error::{TypebannerError, TypebannerResult};

/// Absolute 0-based frame index in output-video order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

/// Integer frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    /// Frame rate used for welcome greetings.
    pub const WELCOME: Fps = Fps(6);
    /// Frame rate used for manual renders.
    pub const PREVIEW: Fps = Fps(5);

    /// Create a validated FPS value.
    pub fn new(fps: u32) -> TypebannerResult<Self> {
        if fps == 0 {
            return Err(TypebannerError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Raw frames-per-second value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of frames covering `secs`, rounded up and never less than one.
    pub fn frames_for_secs_ceil(self, secs: f64) -> u64 {
        let frames = (secs.max(0.0) * f64::from(self.0)).ceil() as u64;
        frames.max(1)
    }
}

impl TryFrom<u32> for Fps {
    type Error = TypebannerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(value: Fps) -> Self {
        value.0
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 1920x1080 banner canvas.
    pub const FULL_HD: Canvas = Canvas {
        width: 1920,
        height: 1080,
    };
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
