//! End-to-end blink scenarios driven through landmark frames

use blink_detector::{
    BlinkConfig, BlinkDetector, BlinkNotification, BlinkPattern, BlinkSource, BlinkState,
};
use landmarks::{Eye, FrameInput, LandmarkSource, Point, VecSource, FACE_MESH_REFINED_LANDMARKS};

const FRAME_MS: u64 = 33;

/// Build a face whose eyes both have the requested aspect ratio
fn face_with_ear(timestamp_ms: u64, ear: f32) -> FrameInput {
    let mut points = vec![Point::new(0.5, 0.5); FACE_MESH_REFINED_LANDMARKS];
    for eye in Eye::BOTH {
        let contour = eye.contour();
        let (a, b) = contour.corners();
        points[a].x = 0.3;
        points[b].x = 0.4;
        points[contour.upper_lid()].y = 0.4;
        points[contour.lower_lid()].y = 0.4 + ear * 0.1;
    }
    FrameInput::with_face(timestamp_ms, points)
}

fn session(ears: &[f32]) -> Vec<FrameInput> {
    ears.iter()
        .enumerate()
        .map(|(i, &ear)| face_with_ear(i as u64 * FRAME_MS, ear))
        .collect()
}

fn run(detector: &mut BlinkDetector, frames: Vec<FrameInput>) -> Vec<Option<BlinkNotification>> {
    let mut source = VecSource::new(frames);
    let mut blinks = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        blinks.push(detector.process_frame(frame).blink);
    }
    blinks
}

#[test]
fn single_blink_after_calibration() {
    let mut ears = vec![0.30; 10];
    ears.extend([0.15; 3]);

    let mut detector = BlinkDetector::new(BlinkConfig::default()).unwrap();
    let blinks = run(&mut detector, session(&ears));

    let emitted: Vec<usize> = blinks
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.map(|_| i))
        .collect();
    // smoothed EAR: 0.25 on frame 10, 0.20 on frame 11, below 0.216
    assert_eq!(emitted, vec![11]);

    let event = blinks[11].unwrap().event;
    assert_eq!(event.count, 1);
    assert_eq!(event.timestamp_ms, 11 * FRAME_MS);
    assert_eq!(event.source, BlinkSource::Detected);
    assert_eq!(detector.snapshot(event.timestamp_ms).state, BlinkState::EyesClosed);
}

#[test]
fn second_blink_requires_reopening() {
    let mut ears = vec![0.30; 10];
    ears.extend([0.15; 3]);
    // hovering between the thresholds does not reopen
    ears.extend([0.24; 5]);
    ears.extend([0.15; 3]);

    let mut detector = BlinkDetector::new(BlinkConfig::default()).unwrap();
    run(&mut detector, session(&ears));
    assert_eq!(detector.total_blinks(), 1);

    // reopen fully, then close again
    let start = ears.len() as u64 * FRAME_MS;
    let mut more = Vec::new();
    for i in 0..5 {
        more.push(face_with_ear(start + i * FRAME_MS, 0.30));
    }
    for i in 5..8 {
        more.push(face_with_ear(start + i * FRAME_MS, 0.10));
    }
    run(&mut detector, more);
    assert_eq!(detector.total_blinks(), 2);
}

#[test]
fn faceless_gap_does_not_break_detection() {
    let mut frames = session(&[0.30; 10]);
    for i in 10..40 {
        frames.push(FrameInput::no_face(i * FRAME_MS));
    }
    for i in 40..43 {
        frames.push(face_with_ear(i * FRAME_MS, 0.10));
    }

    let mut detector = BlinkDetector::new(BlinkConfig::default()).unwrap();
    let blinks = run(&mut detector, frames);

    assert!(blinks[10..40].iter().all(Option::is_none));
    assert_eq!(detector.total_blinks(), 1);
    assert!(detector.snapshot(43 * FRAME_MS).presence.face_present);
}

#[test]
fn sinks_receive_every_blink() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut detector = BlinkDetector::new(BlinkConfig::default()).unwrap();
    detector.add_sink(tx);

    let mut ears = vec![0.30; 10];
    ears.extend([0.10; 3]);
    run(&mut detector, session(&ears));
    detector.register_manual_blink(2000);

    let first = rx.try_recv().unwrap();
    assert_eq!(first.event.source, BlinkSource::Detected);
    let second = rx.try_recv().unwrap();
    assert_eq!(second.event.source, BlinkSource::Manual);
    assert_eq!(second.event.count, 2);
    assert!(rx.try_recv().is_err());
}

#[test]
fn steady_manual_blinks_read_as_rhythmic() {
    let mut detector = BlinkDetector::new(BlinkConfig::default()).unwrap();
    let mut last = None;
    for i in 0..5 {
        last = Some(detector.register_manual_blink(i * 1000));
    }
    let stats = last.unwrap().stats;
    assert_eq!(stats.pattern, BlinkPattern::Rhythmic);
    assert_eq!(stats.blinks_per_second, 1.0);
}
