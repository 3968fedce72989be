//! Blink event sinks
//!
//! Downstream consumers (rewards, UI bridges, metrics) subscribe through a
//! `BlinkSink`. Sinks run inside frame processing, so they must not block;
//! the channel sinks hand the notification off and return.

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace};

use crate::{BlinkEvent, BlinkStats};

/// A blink together with the statistics right after it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkNotification {
    pub event: BlinkEvent,
    pub stats: BlinkStats,
}

/// Receives every counted blink
pub trait BlinkSink: Send {
    fn on_blink(&mut self, notification: &BlinkNotification);
}

impl BlinkSink for Vec<BlinkNotification> {
    fn on_blink(&mut self, notification: &BlinkNotification) {
        self.push(*notification);
    }
}

impl BlinkSink for mpsc::UnboundedSender<BlinkNotification> {
    fn on_blink(&mut self, notification: &BlinkNotification) {
        if self.send(*notification).is_err() {
            debug!("Blink receiver dropped, notification discarded");
        }
    }
}

impl BlinkSink for broadcast::Sender<BlinkNotification> {
    fn on_blink(&mut self, notification: &BlinkNotification) {
        // Err only means nobody is subscribed right now
        if self.send(*notification).is_err() {
            trace!("No blink subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlinkPattern, BlinkSource};

    fn notification(count: u64) -> BlinkNotification {
        BlinkNotification {
            event: BlinkEvent {
                timestamp_ms: count * 100,
                count,
                ear: Some(0.15),
                source: BlinkSource::Detected,
            },
            stats: BlinkStats {
                blinks_per_second: 0.2,
                window_count: 1,
                pattern: BlinkPattern::None,
            },
        }
    }

    #[tokio::test]
    async fn test_mpsc_sink_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = tx;
        sink.on_blink(&notification(1));
        assert_eq!(rx.recv().await.unwrap().event.count, 1);
    }

    #[test]
    fn test_closed_mpsc_sink_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = tx;
        sink.on_blink(&notification(1));
    }

    #[tokio::test]
    async fn test_broadcast_sink_fans_out() {
        let (tx, mut a) = broadcast::channel(8);
        let mut b = tx.subscribe();
        let mut sink = tx;
        sink.on_blink(&notification(3));
        assert_eq!(a.recv().await.unwrap().event.count, 3);
        assert_eq!(b.recv().await.unwrap().event.count, 3);
    }
}
