//! Landmark sources

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::{FrameInput, LandmarkError};

/// Anything that delivers landmark frames one at a time.
///
/// `Ok(None)` signals the end of the stream. Frames are pulled, so a
/// consumer never sees two frames at once.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, LandmarkError>;
}

/// In-memory source, mostly for tests and synthetic sessions
#[derive(Debug, Default)]
pub struct VecSource {
    frames: VecDeque<FrameInput>,
}

impl VecSource {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for VecSource {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, LandmarkError> {
        Ok(self.frames.pop_front())
    }
}

/// Replays a recorded session stored as one JSON `FrameInput` per line.
///
/// Blank lines are skipped. With `skip_malformed` set, undecodable lines are
/// logged and dropped instead of ending the replay.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    skip_malformed: bool,
    skipped: usize,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a recording on disk
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LandmarkError> {
        let path = path.as_ref();
        info!("Opening landmark recording {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            skip_malformed: false,
            skipped: 0,
        }
    }

    /// Drop undecodable lines instead of failing
    pub fn skip_malformed(mut self, skip: bool) -> Self {
        self.skip_malformed = skip;
        self
    }

    /// Number of lines dropped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<FrameInput>, LandmarkError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                debug!("Landmark recording exhausted after {} lines", self.line);
                return Ok(None);
            }
            self.line += 1;

            let text = buf.trim();
            if text.is_empty() {
                continue;
            }

            match serde_json::from_str::<FrameInput>(text) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) if self.skip_malformed => {
                    warn!("Skipping malformed frame on line {}: {}", self.line, e);
                    self.skipped += 1;
                }
                Err(e) => {
                    return Err(LandmarkError::Malformed {
                        line: self.line,
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}
