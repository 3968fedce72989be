//! Blink Rewards
//!
//! Gamification layered on top of blink events: milestone achievements,
//! a simulated token balance, cheer/cadence messages, and a blink reminder.
//! Everything here consumes `BlinkNotification`s and never feeds back into
//! detection.

mod achievements;
mod messages;
mod reminder;
mod tokens;

pub use achievements::{Achievement, AchievementTracker, MILESTONES};
pub use messages::{pattern_messages, Message, MessageBoard, MessageKind, PickedMessage, CHEERS};
pub use reminder::BlinkReminder;
pub use tokens::TokenWallet;

use blink_detector::BlinkNotification;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Reward error types
#[derive(Error, Debug)]
pub enum RewardError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reward configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Token balance at session start
    pub initial_tokens: f64,
    /// Tokens credited per blink
    pub tokens_per_blink: f64,
    /// Minimum gap between cheers (milliseconds)
    pub cheer_cooldown_ms: u64,
    /// Probability of a cheer after a blink
    pub cheer_chance: f64,
    /// Probability of a cadence message when a cadence is recognized
    pub pattern_chance: f64,
    /// Time without blinking before the reminder shows (milliseconds)
    pub reminder_timeout_ms: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            initial_tokens: 0.00001,
            tokens_per_blink: 0.00001,
            cheer_cooldown_ms: 3000,
            cheer_chance: 0.3,
            pattern_chance: 0.2,
            reminder_timeout_ms: 10_000,
        }
    }
}

impl RewardConfig {
    pub fn validate(&self) -> Result<(), RewardError> {
        for (name, p) in [("cheer_chance", self.cheer_chance), ("pattern_chance", self.pattern_chance)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(RewardError::Config(format!("{} must be in [0, 1], got {}", name, p)));
            }
        }
        if !(self.tokens_per_blink.is_finite() && self.tokens_per_blink >= 0.0) {
            return Err(RewardError::Config("tokens_per_blink must be >= 0".into()));
        }
        Ok(())
    }
}

/// What a single blink earned
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardUpdate {
    pub blink_count: u64,
    pub tokens: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievement: Option<Achievement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<PickedMessage>,
}

/// Session reward summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardSummary {
    pub tokens: f64,
    pub achievements: Vec<Achievement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_achievement: Option<Achievement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<PickedMessage>,
}

/// Reward engine for one session
pub struct RewardEngine {
    achievements: AchievementTracker,
    wallet: TokenWallet,
    board: MessageBoard,
    reminder: BlinkReminder,
    last_message: Option<PickedMessage>,
}

impl RewardEngine {
    /// Create a new reward engine
    pub fn new(config: RewardConfig) -> Result<Self, RewardError> {
        config.validate()?;
        info!("Creating reward engine with config: {:?}", config);
        Ok(Self {
            achievements: AchievementTracker::default(),
            wallet: TokenWallet::new(config.initial_tokens, config.tokens_per_blink),
            board: MessageBoard::new(config.cheer_cooldown_ms, config.cheer_chance, config.pattern_chance),
            reminder: BlinkReminder::new(config.reminder_timeout_ms),
            last_message: None,
        })
    }

    /// Apply one blink
    pub fn on_blink<R: Rng + ?Sized>(&mut self, notification: &BlinkNotification, rng: &mut R) -> RewardUpdate {
        let event = &notification.event;
        self.reminder.on_blink(event.timestamp_ms);
        let tokens = self.wallet.credit_blink();
        let achievement = self.achievements.check(event.count);
        let message = self
            .board
            .on_blink(event.timestamp_ms, notification.stats.pattern, rng);
        if let Some(m) = message {
            debug!(kind = ?m.kind, "Message picked: {}", m.message.text);
            self.last_message = Some(m);
        }

        RewardUpdate {
            blink_count: event.count,
            tokens,
            achievement,
            message,
        }
    }

    pub fn summary(&self) -> RewardSummary {
        RewardSummary {
            tokens: self.wallet.balance(),
            achievements: self.achievements.unlocked(),
            next_achievement: self.achievements.next(),
            last_message: self.last_message,
        }
    }

    /// Note a frame timestamp; the first one starts the reminder clock
    pub fn observe_frame(&mut self, timestamp_ms: u64) {
        self.reminder.observe(timestamp_ms);
    }

    /// Whether the blink reminder should show
    pub fn reminder_due(&self, now_ms: u64, face_present: bool) -> bool {
        self.reminder.is_due(now_ms, face_present)
    }

    /// Start a fresh session; the reminder clock restarts at the next frame
    pub fn reset(&mut self) {
        self.achievements.reset();
        self.wallet.reset();
        self.board.reset();
        self.reminder.reset();
        self.last_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blink_detector::{BlinkEvent, BlinkPattern, BlinkSource, BlinkStats};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn blink(count: u64) -> BlinkNotification {
        BlinkNotification {
            event: BlinkEvent {
                timestamp_ms: count * 700,
                count,
                ear: Some(0.12),
                source: BlinkSource::Detected,
            },
            stats: BlinkStats {
                blinks_per_second: 1.4,
                window_count: 7,
                pattern: BlinkPattern::None,
            },
        }
    }

    fn quiet_engine() -> RewardEngine {
        let config = RewardConfig {
            cheer_chance: 0.0,
            pattern_chance: 0.0,
            ..Default::default()
        };
        RewardEngine::new(config).unwrap()
    }

    #[test]
    fn test_fiftieth_blink_unlocks_first_flight() {
        let mut engine = quiet_engine();
        let mut rng = StdRng::seed_from_u64(1);
        let mut unlocked = Vec::new();
        for count in 1..=120 {
            if let Some(a) = engine.on_blink(&blink(count), &mut rng).achievement {
                unlocked.push(a.count);
            }
        }
        assert_eq!(unlocked, vec![50, 100]);
        assert_eq!(engine.summary().next_achievement.unwrap().count, 200);
    }

    #[test]
    fn test_tokens_accrue_per_blink() {
        let mut engine = quiet_engine();
        let mut rng = StdRng::seed_from_u64(1);
        let update = engine.on_blink(&blink(1), &mut rng);
        assert!((update.tokens - 0.00002).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_chance_rejected() {
        let config = RewardConfig {
            cheer_chance: 1.5,
            ..Default::default()
        };
        assert!(RewardEngine::new(config).is_err());
    }

    #[test]
    fn test_reset_clears_session() {
        let mut engine = quiet_engine();
        let mut rng = StdRng::seed_from_u64(1);
        engine.on_blink(&blink(50), &mut rng);
        engine.reset();

        let summary = engine.summary();
        assert!(summary.achievements.is_empty());
        assert!((summary.tokens - 0.00001).abs() < 1e-12);
        assert!(!engine.reminder_due(100_000, true));

        engine.observe_frame(100_000);
        assert!(!engine.reminder_due(105_000, true));
        assert!(engine.reminder_due(110_000, true));
    }

    #[test]
    fn test_last_message_is_kept() {
        let config = RewardConfig {
            cheer_chance: 1.0,
            ..Default::default()
        };
        let mut engine = RewardEngine::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let update = engine.on_blink(&blink(1), &mut rng);
        assert!(update.message.is_some());
        assert_eq!(engine.summary().last_message, update.message);
    }
}
