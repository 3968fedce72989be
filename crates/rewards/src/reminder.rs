//! "Remember to blink" reminder

/// Flags a reminder when a visible face has not blinked for a while.
///
/// The clock starts at the first timestamp observed, so callers may use any
/// time origin (session-relative or epoch milliseconds).
#[derive(Debug, Clone)]
pub struct BlinkReminder {
    timeout_ms: u64,
    last_blink_ms: Option<u64>,
}

impl BlinkReminder {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            last_blink_ms: None,
        }
    }

    /// Start the clock at `timestamp_ms` unless already running
    pub fn observe(&mut self, timestamp_ms: u64) {
        self.last_blink_ms.get_or_insert(timestamp_ms);
    }

    pub fn on_blink(&mut self, timestamp_ms: u64) {
        let last = self.last_blink_ms.get_or_insert(timestamp_ms);
        *last = (*last).max(timestamp_ms);
    }

    /// Whether to show the reminder; never nags without a face or before
    /// the clock has started
    pub fn is_due(&self, now_ms: u64, face_present: bool) -> bool {
        match self.last_blink_ms {
            Some(last) => face_present && now_ms.saturating_sub(last) >= self.timeout_ms,
            None => false,
        }
    }

    /// Stop the clock; it restarts at the next observed timestamp
    pub fn reset(&mut self) {
        self.last_blink_ms = None;
    }
}
