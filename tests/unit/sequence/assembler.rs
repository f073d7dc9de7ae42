use std::collections::HashSet;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;
use crate::render::frame::CursorMode;

/// Encodes `visible_count` in red and the cursor policy (1 = auto) in green.
struct StubSource {
    fail_counts: HashSet<usize>,
    fail_hold: bool,
    fatal: bool,
}

impl StubSource {
    fn ok() -> Self {
        Self {
            fail_counts: HashSet::new(),
            fail_hold: false,
            fatal: false,
        }
    }
}

impl FrameSource for StubSource {
    fn canvas(&self) -> Canvas {
        Canvas {
            width: 4,
            height: 2,
        }
    }

    fn render_frame(&self, req: &RenderRequest<'_>) -> TypebannerResult<Frame> {
        let hold = req.cursor == CursorMode::Hidden;
        if self.fatal {
            return Err(TypebannerError::validation("bad backdrop"));
        }
        if (hold && self.fail_hold) || (!hold && self.fail_counts.contains(&req.revealed())) {
            return Err(TypebannerError::render("glyph markup rejected"));
        }
        let mut data = Vec::new();
        for _ in 0..8 {
            data.extend_from_slice(&[req.revealed() as u8, u8::from(!hold), 0]);
        }
        Ok(Frame {
            width: 4,
            height: 2,
            data,
        })
    }
}

fn opts(fps: u32, hold: u32) -> AssembleOpts {
    AssembleOpts {
        fps: Fps::new(fps).unwrap(),
        hold_frames: hold,
        ..AssembleOpts::default()
    }
}

fn tags(sink: &InMemorySink) -> Vec<(u8, u8)> {
    sink.frames()
        .iter()
        .map(|(_, f)| (f.data[0], f.data[1]))
        .collect()
}

#[test]
fn full_sequence_orders_pause_typing_hold() {
    let mut sink = InMemorySink::new();
    let report = assemble_into(&StubSource::ok(), "Hi!", &opts(6, 30), &mut sink).unwrap();

    assert_eq!(report.frames_written, 36);
    assert_eq!(
        (report.pause_frames, report.typing_frames, report.hold_frames),
        (3, 3, 30)
    );
    assert!(report.skipped.is_empty());
    assert!(sink.is_ended());
    assert_eq!(sink.config().unwrap().fps.get(), 6);

    let t = tags(&sink);
    assert_eq!(&t[..6], &[(0, 1), (0, 1), (0, 1), (1, 1), (2, 1), (3, 1)]);
    assert!(t[6..].iter().all(|&tag| tag == (3, 0)));

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (0..36).collect::<Vec<_>>());
}

#[test]
fn empty_text_is_rejected_before_the_sink_starts() {
    let mut sink = InMemorySink::new();
    let err = assemble_into(&StubSource::ok(), "", &opts(6, 30), &mut sink).unwrap_err();
    assert!(matches!(err, TypebannerError::Validation(_)));
    assert!(sink.config().is_none());
}

#[test]
fn failed_typing_frames_are_omitted_not_substituted() {
    let source = StubSource {
        fail_counts: HashSet::from([2]),
        ..StubSource::ok()
    };
    let mut sink = InMemorySink::new();
    let report = assemble_into(&source, "abc", &opts(6, 2), &mut sink).unwrap();

    assert_eq!(report.frames_written, 3 + 2 + 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].phase, FramePhase::Typing);
    assert_eq!(report.skipped[0].visible_count, 2);
    assert!(report.skipped[0].reason.contains("glyph markup rejected"));

    let counts: Vec<u8> = tags(&sink).iter().map(|t| t.0).collect();
    assert_eq!(counts, vec![0, 0, 0, 1, 3, 3, 3]);
}

#[test]
fn failed_hold_repeats_the_last_good_frame() {
    let source = StubSource {
        fail_hold: true,
        ..StubSource::ok()
    };
    let mut sink = InMemorySink::new();
    let report = assemble_into(&source, "ab", &opts(6, 4), &mut sink).unwrap();

    assert!(report.hold_fallback);
    assert_eq!(report.hold_frames, 4);
    let t = tags(&sink);
    assert_eq!(t.len(), 3 + 2 + 4);
    assert!(t[5..].iter().all(|&tag| tag == (2, 1)));
}

#[test]
fn nothing_rendered_is_an_empty_sequence() {
    let source = StubSource {
        fail_counts: HashSet::from([0, 1, 2]),
        fail_hold: true,
        ..StubSource::ok()
    };
    let mut sink = InMemorySink::new();
    let err = assemble_into(&source, "ab", &opts(6, 30), &mut sink).unwrap_err();
    assert!(matches!(err, TypebannerError::EmptySequence(_)));
    assert!(sink.config().is_none());
    assert!(!sink.is_ended());
}

#[test]
fn non_render_errors_abort_the_run() {
    let source = StubSource {
        fatal: true,
        ..StubSource::ok()
    };
    let mut sink = InMemorySink::new();
    let err = assemble_into(&source, "ab", &opts(6, 30), &mut sink).unwrap_err();
    assert!(matches!(err, TypebannerError::Validation(_)));
}

#[test]
fn assemble_rejects_empty_text_without_creating_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    let err = assemble("", &out, &opts(6, 30)).unwrap_err();
    assert!(matches!(err, TypebannerError::Validation(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn empty_sequence_leaves_no_scratch_behind() {
    let source = StubSource {
        fail_counts: HashSet::from([0, 1]),
        fail_hold: true,
        ..StubSource::ok()
    };
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mp4");
    let err = assemble_with(&source, "a", &out, &opts(6, 1)).unwrap_err();
    assert!(matches!(err, TypebannerError::EmptySequence(_)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
