use crate::foundation::core::Fps;
use crate::render::frame::CursorMode;

/// Leading pause before typing starts, in seconds.
pub const PAUSE_SECS: f64 = 0.5;
/// Default number of times the final frame is repeated.
pub const DEFAULT_HOLD_FRAMES: u32 = 30;

/// Section of the output video a step belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Empty banner (cursor only) before the first character.
    Pause,
    /// One character revealed per frame.
    Typing,
    /// Completed text without cursor, repeated.
    Hold,
}

/// One distinct frame to render and how many times it is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStep {
    /// Phase this step belongs to.
    pub phase: FramePhase,
    /// Characters revealed.
    pub visible_count: usize,
    /// Cursor policy for the render.
    pub cursor: CursorMode,
    /// Number of consecutive output frames carrying this image.
    pub repeat: u64,
}

/// Ordered plan for a typing animation of `text_len` characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSequence {
    text_len: usize,
    pause_frames: u64,
    hold_frames: u64,
}

impl FrameSequence {
    /// Plan for `text_len` characters at `fps`, holding the final frame `hold_frames` times.
    pub fn new(text_len: usize, fps: Fps, hold_frames: u32) -> Self {
        Self {
            text_len,
            pause_frames: pause_frames_for(fps),
            hold_frames: u64::from(hold_frames),
        }
    }

    /// Number of leading pause frames.
    pub fn pause_frames(&self) -> u64 {
        self.pause_frames
    }

    /// Number of typing frames (one per character).
    pub fn typing_frames(&self) -> u64 {
        self.text_len as u64
    }

    /// Number of final hold frames.
    pub fn hold_frames(&self) -> u64 {
        self.hold_frames
    }

    /// Output length when every frame renders.
    pub fn expected_len(&self) -> u64 {
        self.pause_frames + self.typing_frames() + self.hold_frames
    }

    /// Steps in output order.
    pub fn steps(&self) -> impl Iterator<Item = FrameStep> + '_ {
        let pause = std::iter::once(FrameStep {
            phase: FramePhase::Pause,
            visible_count: 0,
            cursor: CursorMode::Auto,
            repeat: self.pause_frames,
        });
        let typing = (1..=self.text_len).map(|n| FrameStep {
            phase: FramePhase::Typing,
            visible_count: n,
            cursor: CursorMode::Auto,
            repeat: 1,
        });
        let hold = std::iter::once(FrameStep {
            phase: FramePhase::Hold,
            visible_count: self.text_len,
            cursor: CursorMode::Hidden,
            repeat: self.hold_frames,
        });
        pause.chain(typing).chain(hold)
    }
}

/// `max(1, ceil(fps * 0.5))`.
pub fn pause_frames_for(fps: Fps) -> u64 {
    fps.frames_for_secs_ceil(PAUSE_SECS)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/plan.rs"]
mod tests;
