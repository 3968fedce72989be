//! Cheer and cadence messages shown after blinks

use blink_detector::BlinkPattern;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// A short icon + text message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Message {
    pub icon: &'static str,
    pub text: &'static str,
}

const fn msg(icon: &'static str, text: &'static str) -> Message {
    Message { icon, text }
}

/// Generic encouragement
pub static CHEERS: [Message; 15] = [
    msg("😄", "Keep blinking, space cadet!"),
    msg("👁️", "Your eyes are working overtime!"),
    msg("🚀", "Blinking at light speed!"),
    msg("⭐", "You're a blinking superstar!"),
    msg("🌌", "Navigating the blinkiverse!"),
    msg("🤖", "AI detected: Human blinking pattern!"),
    msg("👽", "Are you from another planet?"),
    msg("🎯", "Bullseye! Perfect blink detected!"),
    msg("⚡", "Lightning fast blinks!"),
    msg("🎪", "Welcome to the blink circus!"),
    msg("🎭", "The blinking performance of a lifetime!"),
    msg("🎨", "You're painting with blinks!"),
    msg("🎵", "Blinking to the rhythm of space!"),
    msg("🎮", "Level up! Blink master!"),
    msg("🏆", "Champion blinker detected!"),
];

static FAST: [Message; 3] = [
    msg("⚡", "Lightning blinks! Slow down there, speed demon!"),
    msg("🏃", "Running a blink marathon?"),
    msg("🎯", "Rapid fire blinking detected!"),
];

static SLOW: [Message; 3] = [
    msg("🐌", "Taking your time with those blinks!"),
    msg("🧘", "Meditative blinking mode activated!"),
    msg("😴", "Getting sleepy there?"),
];

static RHYTHMIC: [Message; 3] = [
    msg("🎵", "Blinking to the beat!"),
    msg("🎪", "The rhythm of the blink circus!"),
    msg("🎭", "A blinking performance!"),
];

/// Messages for a cadence, empty for `BlinkPattern::None`
pub fn pattern_messages(pattern: BlinkPattern) -> &'static [Message] {
    match pattern {
        BlinkPattern::None => &[],
        BlinkPattern::Fast => &FAST,
        BlinkPattern::Slow => &SLOW,
        BlinkPattern::Rhythmic => &RHYTHMIC,
    }
}

/// Why a message was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Generic cheer; may be rewritten by a language model
    Cheer,
    /// Reaction to the blink cadence
    Pattern(BlinkPattern),
}

/// A message picked for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickedMessage {
    pub kind: MessageKind,
    #[serde(flatten)]
    pub message: Message,
}

/// Decides which message, if any, follows a blink
#[derive(Debug, Clone)]
pub struct MessageBoard {
    cooldown_ms: u64,
    cheer_chance: f64,
    pattern_chance: f64,
    last_cheer_ms: Option<u64>,
}

impl MessageBoard {
    pub fn new(cooldown_ms: u64, cheer_chance: f64, pattern_chance: f64) -> Self {
        Self {
            cooldown_ms,
            cheer_chance,
            pattern_chance,
            last_cheer_ms: None,
        }
    }

    /// Roll for a message after a blink.
    ///
    /// Cheers are rolled first and respect the cooldown. A cadence message
    /// rolled afterwards replaces the cheer.
    pub fn on_blink<R: Rng + ?Sized>(
        &mut self,
        timestamp_ms: u64,
        pattern: BlinkPattern,
        rng: &mut R,
    ) -> Option<PickedMessage> {
        let cheer = self.roll_cheer(timestamp_ms, rng);
        let cadence = self.roll_pattern(pattern, rng);
        cadence.or(cheer)
    }

    fn roll_cheer<R: Rng + ?Sized>(&mut self, timestamp_ms: u64, rng: &mut R) -> Option<PickedMessage> {
        if let Some(last) = self.last_cheer_ms {
            if timestamp_ms.saturating_sub(last) < self.cooldown_ms {
                debug!("Cheer suppressed: in cooldown period");
                return None;
            }
        }
        if !rng.gen_bool(self.cheer_chance) {
            return None;
        }
        self.last_cheer_ms = Some(timestamp_ms);
        CHEERS.choose(rng).map(|&message| PickedMessage {
            kind: MessageKind::Cheer,
            message,
        })
    }

    fn roll_pattern<R: Rng + ?Sized>(&self, pattern: BlinkPattern, rng: &mut R) -> Option<PickedMessage> {
        let messages = pattern_messages(pattern);
        if messages.is_empty() || !rng.gen_bool(self.pattern_chance) {
            return None;
        }
        messages.choose(rng).map(|&message| PickedMessage {
            kind: MessageKind::Pattern(pattern),
            message,
        })
    }

    /// Pick a cheer unconditionally
    pub fn random_cheer<R: Rng + ?Sized>(rng: &mut R) -> Message {
        *CHEERS.choose(rng).unwrap_or(&CHEERS[0])
    }

    pub fn reset(&mut self) {
        self.last_cheer_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_cheer_respects_cooldown() {
        let mut board = MessageBoard::new(3000, 1.0, 0.0);
        let mut rng = rng();

        let first = board.on_blink(1000, BlinkPattern::None, &mut rng).unwrap();
        assert_eq!(first.kind, MessageKind::Cheer);
        assert!(board.on_blink(2500, BlinkPattern::None, &mut rng).is_none());
        assert!(board.on_blink(4000, BlinkPattern::None, &mut rng).is_some());
    }

    #[test]
    fn test_pattern_message_wins() {
        let mut board = MessageBoard::new(3000, 1.0, 1.0);
        let picked = board.on_blink(0, BlinkPattern::Fast, &mut rng()).unwrap();
        assert_eq!(picked.kind, MessageKind::Pattern(BlinkPattern::Fast));
        assert!(FAST.contains(&picked.message));
    }

    #[test]
    fn test_no_pattern_no_pattern_message() {
        let mut board = MessageBoard::new(3000, 0.0, 1.0);
        assert!(board.on_blink(0, BlinkPattern::None, &mut rng()).is_none());
    }

    #[test]
    fn test_zero_chance_is_silent() {
        let mut board = MessageBoard::new(0, 0.0, 0.0);
        let mut rng = rng();
        for t in 0..100 {
            assert!(board.on_blink(t * 1000, BlinkPattern::Rhythmic, &mut rng).is_none());
        }
    }

    #[test]
    fn test_every_pattern_has_messages() {
        for pattern in [BlinkPattern::Fast, BlinkPattern::Slow, BlinkPattern::Rhythmic] {
            assert_eq!(pattern_messages(pattern).len(), 3);
        }
    }
}
