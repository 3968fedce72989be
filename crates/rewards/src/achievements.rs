//! Blink count milestones

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

/// A milestone unlocked at an exact blink count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub count: u64,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Built-in milestone catalogue, ordered by count
pub static MILESTONES: [Achievement; 5] = [
    Achievement {
        count: 50,
        title: "First Flight",
        description: "You've taken your first steps into the cosmos!",
        icon: "🚀",
    },
    Achievement {
        count: 100,
        title: "Orbit Breaker",
        description: "Breaking through the atmosphere!",
        icon: "🌌",
    },
    Achievement {
        count: 200,
        title: "Star Seeker",
        description: "Navigating through the stellar void!",
        icon: "⭐",
    },
    Achievement {
        count: 500,
        title: "Galaxy Rider",
        description: "Riding the cosmic waves!",
        icon: "🌠",
    },
    Achievement {
        count: 1000,
        title: "Master of the Cosmos",
        description: "You are one with the universe!",
        icon: "👑",
    },
];

/// Unlocks each milestone once per session
#[derive(Debug, Clone)]
pub struct AchievementTracker {
    catalogue: &'static [Achievement],
    unlocked: BTreeSet<u64>,
}

impl Default for AchievementTracker {
    fn default() -> Self {
        Self::new(&MILESTONES)
    }
}

impl AchievementTracker {
    pub fn new(catalogue: &'static [Achievement]) -> Self {
        Self {
            catalogue,
            unlocked: BTreeSet::new(),
        }
    }

    /// Check the blink count against the catalogue.
    ///
    /// Only a milestone whose count equals `blink_count` unlocks, and at most
    /// one per call.
    pub fn check(&mut self, blink_count: u64) -> Option<Achievement> {
        let achievement = *self
            .catalogue
            .iter()
            .find(|a| a.count == blink_count && !self.unlocked.contains(&a.count))?;

        self.unlocked.insert(achievement.count);
        info!("Achievement unlocked: {} ({} blinks)", achievement.title, achievement.count);
        Some(achievement)
    }

    /// Milestones unlocked this session, lowest count first
    pub fn unlocked(&self) -> Vec<Achievement> {
        self.catalogue
            .iter()
            .filter(|a| self.unlocked.contains(&a.count))
            .copied()
            .collect()
    }

    /// Next milestone still locked
    pub fn next(&self) -> Option<Achievement> {
        self.catalogue
            .iter()
            .find(|a| !self.unlocked.contains(&a.count))
            .copied()
    }

    pub fn reset(&mut self) {
        self.unlocked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocks_at_exact_count() {
        let mut tracker = AchievementTracker::default();
        assert!(tracker.check(49).is_none());
        assert_eq!(tracker.check(50).unwrap().title, "First Flight");
        assert!(tracker.check(51).is_none());
    }

    #[test]
    fn test_unlocks_once() {
        let mut tracker = AchievementTracker::default();
        assert!(tracker.check(100).is_some());
        assert!(tracker.check(100).is_none());
        assert_eq!(tracker.unlocked().len(), 1);
    }

    #[test]
    fn test_next_milestone() {
        let mut tracker = AchievementTracker::default();
        assert_eq!(tracker.next().unwrap().count, 50);
        tracker.check(50);
        assert_eq!(tracker.next().unwrap().count, 100);
    }

    #[test]
    fn test_reset_relocks() {
        let mut tracker = AchievementTracker::default();
        tracker.check(50);
        tracker.reset();
        assert!(tracker.unlocked().is_empty());
        assert!(tracker.check(50).is_some());
    }
}
