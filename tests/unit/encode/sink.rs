use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(6).unwrap(),
    }
}

fn solid(width: u32, height: u32, v: u8) -> Frame {
    Frame {
        width,
        height,
        data: vec![v; (width * height * 3) as usize],
    }
}

#[test]
fn captures_config_and_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(2, 2, 1)).unwrap();
    sink.push_frame(FrameIndex(1), &solid(2, 2, 2)).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg(2, 2)));
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
    assert_eq!(sink.frames()[1].1.data[0], 2);
}

#[test]
fn consecutive_duplicates_share_storage() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    let f = solid(2, 2, 7);
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &f).unwrap();
    }
    let frames = sink.frames();
    assert!(Arc::ptr_eq(&frames[0].1, &frames[2].1));
}

#[test]
fn rejects_out_of_order_and_mismatched_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &solid(2, 2, 0)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &solid(2, 2, 0)).is_err());
    assert!(sink.push_frame(FrameIndex(4), &solid(4, 2, 0)).is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &solid(2, 2, 0)).is_err());
}
