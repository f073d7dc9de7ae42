use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::assets::{color::AccentColor, decode::Backdrop};
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TypebannerError, TypebannerResult};
use crate::render::frame::{Frame, FrameRenderer, FrameSource, RenderRequest};
use crate::render::layout::DEFAULT_OVERLAY_OPACITY;
use crate::sequence::plan::{DEFAULT_HOLD_FRAMES, FramePhase, FrameSequence, FrameStep};

/// Options for [`assemble`] and [`assemble_into`].
#[derive(Clone, Debug)]
pub struct AssembleOpts {
    /// Output frame rate.
    pub fps: Fps,
    /// Number of times the completed frame is repeated at the end.
    pub hold_frames: u32,
    /// Background image; missing or unreadable files fall back to the flat fill.
    pub background: Option<PathBuf>,
    /// Accent color.
    pub color: AccentColor,
    /// Opacity of the black overlay drawn over the background image.
    pub overlay_opacity: f32,
    /// Extra directories searched for fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Log skipped frames.
    pub verbose: bool,
}

impl Default for AssembleOpts {
    fn default() -> Self {
        Self {
            fps: Fps::PREVIEW,
            hold_frames: DEFAULT_HOLD_FRAMES,
            background: None,
            color: AccentColor::default(),
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
            font_dirs: Vec::new(),
            verbose: false,
        }
    }
}

/// Result of rendering one planned step.
#[derive(Clone, Debug)]
pub enum FrameOutcome {
    /// The frame rendered; shared by every output slot that repeats it.
    Rendered(Arc<Frame>),
    /// The frame failed to render and was left out of the video.
    Skipped {
        /// Characters the failed frame would have revealed.
        visible_count: usize,
        /// Render error message.
        reason: String,
    },
}

/// A step that produced no frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFrame {
    /// Phase of the failed step.
    pub phase: FramePhase,
    /// Characters the failed frame would have revealed.
    pub visible_count: usize,
    /// Render error message.
    pub reason: String,
}

/// Summary of one assembly run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Frames pushed into the sink.
    pub frames_written: u64,
    /// Pause frames written.
    pub pause_frames: u64,
    /// Typing frames written.
    pub typing_frames: u64,
    /// Hold frames written.
    pub hold_frames: u64,
    /// `true` when the hold repeated an earlier frame because the final render failed.
    pub hold_fallback: bool,
    /// Steps that failed to render, in plan order.
    pub skipped: Vec<SkippedFrame>,
}

impl AssemblyReport {
    fn record(&mut self, phase: FramePhase, n: u64) {
        self.frames_written += n;
        match phase {
            FramePhase::Pause => self.pause_frames += n,
            FramePhase::Typing => self.typing_frames += n,
            FramePhase::Hold => self.hold_frames += n,
        }
    }
}

/// Pushes frames into a sink, calling `begin` lazily before the first one.
struct OrderedWriter<'s, K: FrameSink + ?Sized> {
    sink: &'s mut K,
    cfg: Option<SinkConfig>,
    next: u64,
}

impl<K: FrameSink + ?Sized> OrderedWriter<'_, K> {
    fn write(&mut self, frame: &Frame, times: u64) -> TypebannerResult<()> {
        if times == 0 {
            return Ok(());
        }
        if let Some(cfg) = self.cfg.take() {
            self.sink.begin(cfg)?;
        }
        for _ in 0..times {
            self.sink.push_frame(FrameIndex(self.next), frame)?;
            self.next += 1;
        }
        Ok(())
    }

    fn started(&self) -> bool {
        self.cfg.is_none()
    }
}

fn render_step<S: FrameSource + ?Sized>(
    source: &S,
    step: &FrameStep,
    text: &str,
    opts: &AssembleOpts,
    backdrop: Option<&Backdrop>,
) -> TypebannerResult<FrameOutcome> {
    let req = RenderRequest::new(text, step.visible_count, opts.color)
        .with_background(backdrop)
        .with_overlay_opacity(opts.overlay_opacity)
        .with_cursor(step.cursor);
    match source.render_frame(&req) {
        Ok(frame) => Ok(FrameOutcome::Rendered(Arc::new(frame))),
        Err(err) if !err.is_fatal() => Ok(FrameOutcome::Skipped {
            visible_count: step.visible_count,
            reason: err.to_string(),
        }),
        Err(err) => Err(err),
    }
}

fn validate_text(text: &str) -> TypebannerResult<usize> {
    let len = text.chars().count();
    if len == 0 {
        return Err(TypebannerError::validation("text must not be empty"));
    }
    Ok(len)
}

/// Render the full typing sequence for `text` into `sink`.
///
/// Frames that fail to render are skipped; the hold falls back to the last good frame. The sink is
/// only started once a frame exists, so an all-failing run leaves it untouched and returns
/// [`TypebannerError::EmptySequence`].
#[tracing::instrument(skip(source, opts, sink), fields(fps = opts.fps.get(), hold = opts.hold_frames))]
pub fn assemble_into<S, K>(
    source: &S,
    text: &str,
    opts: &AssembleOpts,
    sink: &mut K,
) -> TypebannerResult<AssemblyReport>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let text_len = validate_text(text)?;
    let plan = FrameSequence::new(text_len, opts.fps, opts.hold_frames);
    let canvas = source.canvas();
    let backdrop = opts
        .background
        .as_deref()
        .and_then(|p| Backdrop::open(p, canvas));

    let mut writer = OrderedWriter {
        sink,
        cfg: Some(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: opts.fps,
        }),
        next: 0,
    };
    let mut report = AssemblyReport::default();
    let mut last_good: Option<Arc<Frame>> = None;

    for step in plan.steps() {
        let frame = match render_step(source, &step, text, opts, backdrop.as_ref())? {
            FrameOutcome::Rendered(frame) => frame,
            FrameOutcome::Skipped {
                visible_count,
                reason,
            } => {
                if opts.verbose {
                    tracing::warn!(phase = ?step.phase, visible_count, %reason, "frame skipped");
                }
                report.skipped.push(SkippedFrame {
                    phase: step.phase,
                    visible_count,
                    reason,
                });
                match (step.phase, last_good.as_ref()) {
                    (FramePhase::Hold, Some(prev)) => {
                        report.hold_fallback = true;
                        Arc::clone(prev)
                    }
                    _ => continue,
                }
            }
        };
        writer.write(&frame, step.repeat)?;
        report.record(step.phase, step.repeat);
        last_good = Some(frame);
    }

    if !writer.started() {
        return Err(TypebannerError::empty_sequence(format!(
            "no frame of {} planned rendered for {text_len} characters",
            plan.expected_len()
        )));
    }
    writer.sink.end()?;

    tracing::debug!(
        written = report.frames_written,
        planned = plan.expected_len(),
        skipped = report.skipped.len(),
        "sequence assembled"
    );
    Ok(report)
}

/// Render `text` with `source` and encode it to `output_path`.
///
/// The video is encoded inside a temporary directory next to `output_path` and renamed into place
/// on success; nothing is left behind on failure.
pub fn assemble_with<S: FrameSource + ?Sized>(
    source: &S,
    text: &str,
    output_path: &Path,
    opts: &AssembleOpts,
) -> TypebannerResult<(PathBuf, AssemblyReport)> {
    validate_text(text)?;
    ensure_parent_dir(output_path)?;
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let scratch = tempfile::Builder::new()
        .prefix(".typebanner-")
        .tempdir_in(parent)
        .with_context(|| format!("create scratch dir in '{}'", parent.display()))?;
    let tmp_out = scratch.path().join("render.mp4");

    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&tmp_out));
    let report = assemble_into(source, text, opts, &mut sink)?;

    std::fs::rename(&tmp_out, output_path).with_context(|| {
        format!(
            "move '{}' to '{}'",
            tmp_out.display(),
            output_path.display()
        )
    })?;
    tracing::debug!(out = %output_path.display(), frames = report.frames_written, "video written");
    Ok((output_path.to_path_buf(), report))
}

/// Render `text` into an MP4 at `output_path` with a fresh [`FrameRenderer`].
pub fn assemble(text: &str, output_path: &Path, opts: &AssembleOpts) -> TypebannerResult<PathBuf> {
    validate_text(text)?;
    let renderer = FrameRenderer::with_font_dirs(&opts.font_dirs);
    assemble_with(&renderer, text, output_path, opts).map(|(path, _)| path)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/assembler.rs"]
mod tests;
