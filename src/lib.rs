//! typebanner renders terminal-style "typing" banner animations to MP4 and delivers them as
//! welcome greetings.
//!
//! The pipeline is synchronous and deterministic:
//!
//! - Render single frames with a [`FrameRenderer`] (or the one-shot [`render`])
//! - Stream the pause/typing/hold sequence into a [`FrameSink`] with [`assemble_into`]
//! - Encode to MP4 through the system `ffmpeg` with [`assemble`]
//!
//! The [`WelcomeService`] wraps generation for chat bots: channel mapping, size-limit fallback and
//! plain-text greetings when the video cannot be sent. Platform SDKs plug in through
//! [`GreetingTransport`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod foundation;

pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod sequence;
pub(crate) mod welcome;

pub use crate::assets::color::{ACCENT_PALETTE, AccentColor, pick_accent};
pub use crate::assets::decode::{Backdrop, decode_backdrop, load_backdrop};
pub use crate::config::{DEFAULT_ATTACHMENT_LIMIT_BYTES, WelcomeConfig};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{TypebannerError, TypebannerResult};

pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, VideoSpec, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::frame::{
    CursorMode, Frame, FrameRenderer, FrameSource, RenderRequest, render,
};
pub use crate::render::layout;
pub use crate::sequence::assembler::{
    AssembleOpts, AssemblyReport, FrameOutcome, SkippedFrame, assemble, assemble_into,
    assemble_with,
};
pub use crate::sequence::plan::{
    DEFAULT_HOLD_FRAMES, FramePhase, FrameSequence, FrameStep, PAUSE_SECS, pause_frames_for,
};
pub use crate::welcome::artifact::{
    ArtifactGenerator, WelcomeArtifacts, generate_welcome_artifact,
    generate_welcome_artifact_with, welcome_text,
};
pub use crate::welcome::delivery::{
    ChannelId, ChannelPermissions, Community, CommunityId, DeliveryOutcome, EmbedField,
    FallbackReason, GreetingEmbed, GreetingTransport, Member, WelcomeChannels, WelcomeService,
    WelcomeStatus, attachment_name, fallback_text, too_large_text,
};
