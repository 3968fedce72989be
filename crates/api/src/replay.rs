//! Offline replay of recorded landmark frames

use std::path::Path;

use blink_detector::{BlinkConfig, BlinkDetector, BlinkNotification, DetectorSnapshot};
use landmarks::{JsonLinesSource, LandmarkSource};
use serde::Serialize;
use tracing::info;

use crate::ApiError;

/// Result of replaying a recording
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    pub frames: u64,
    /// Lines that did not parse as a frame
    pub skipped_lines: usize,
    pub blinks: Vec<BlinkNotification>,
    pub snapshot: DetectorSnapshot,
}

/// Run every frame of a JSON-lines recording through a fresh detector
pub fn replay_file(path: impl AsRef<Path>, config: BlinkConfig) -> Result<ReplaySummary, ApiError> {
    let path = path.as_ref();
    info!("Replaying landmark frames from {}", path.display());
    let mut source = JsonLinesSource::open(path)?.skip_malformed(true);
    replay(&mut source, config).map(|mut summary| {
        summary.skipped_lines = source.skipped();
        summary
    })
}

/// Run every frame of a source through a fresh detector
pub fn replay(source: &mut impl LandmarkSource, config: BlinkConfig) -> Result<ReplaySummary, ApiError> {
    let mut detector = BlinkDetector::new(config)?;
    let mut frames = 0;
    let mut last_timestamp_ms = 0;
    let mut blinks = Vec::new();

    while let Some(frame) = source.next_frame()? {
        frames += 1;
        last_timestamp_ms = last_timestamp_ms.max(frame.timestamp_ms);
        if let Some(blink) = detector.process_frame(frame).blink {
            info!(
                count = blink.event.count,
                timestamp_ms = blink.event.timestamp_ms,
                pattern = ?blink.stats.pattern,
                "Blink"
            );
            blinks.push(blink);
        }
    }

    let snapshot = detector.snapshot(last_timestamp_ms);
    info!(frames, blinks = snapshot.total_blinks, "Replay finished");
    Ok(ReplaySummary {
        frames,
        skipped_lines: 0,
        blinks,
        snapshot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::VecSource;

    #[test]
    fn test_replay_empty_source() {
        let summary = replay(&mut VecSource::new(Vec::new()), BlinkConfig::default()).unwrap();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.snapshot.total_blinks, 0);
    }
}
