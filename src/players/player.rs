//! Players and their scoring.
//!
//! A `Player` records every submission: successful sets with the time it
//! took to find them, failed attempts, and the timestamp of the last
//! penalty. Timestamps come from the owning game's clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::capability::FoldCapability;
use crate::cards::{Card, CardSet};
use crate::core::Result;

/// Who a player is, independent of how they have played.
///
/// Used to seat a player and to re-seat the roster on a soft reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Unique within a game. Blank bot names are generated on seating.
    pub name: String,

    /// Bots ignore submitted cards and pick a valid set themselves.
    pub is_ai: bool,

    /// Opaque difficulty descriptor for bots.
    pub difficulty: Option<String>,

    /// Display color chosen by the client.
    pub color: Option<String>,
}

impl PlayerProfile {
    /// A human player.
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A bot with an optional name. Blank names are generated.
    pub fn bot(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ai: true,
            ..Self::default()
        }
    }

    /// Set the difficulty descriptor.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Set the display color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// A seated participant.
#[derive(Clone, Debug)]
pub struct Player {
    profile: PlayerProfile,
    found_sets: Vec<CardSet>,
    calls: u32,
    answer_times: Vec<Duration>,
    last_penalty: Option<Duration>,
}

impl Player {
    /// Seat a player with clean statistics.
    #[must_use]
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            profile,
            found_sets: Vec::new(),
            calls: 0,
            answer_times: Vec::new(),
            last_penalty: None,
        }
    }

    /// Player name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// True for bots.
    #[must_use]
    pub fn is_ai(&self) -> bool {
        self.profile.is_ai
    }

    /// Identity without statistics.
    #[must_use]
    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Timestamp of the active penalty, if any.
    #[must_use]
    pub fn last_penalty(&self) -> Option<Duration> {
        self.last_penalty
    }

    /// True while `now` is within `penalty_time` of the last penalty.
    #[must_use]
    pub fn is_under_penalty(&self, now: Duration, penalty_time: Duration) -> bool {
        self.last_penalty
            .is_some_and(|stamp| now.saturating_sub(stamp) <= penalty_time)
    }

    /// Submit `cards` through `fold`.
    ///
    /// On success the set is recorded along with `now - reference`, the time
    /// the player took to find it. On failure a penalty is stamped at `now`
    /// and the fold error is returned.
    pub fn submit_set(
        &mut self,
        cards: &[Card],
        reference: Duration,
        now: Duration,
        fold: &mut dyn FoldCapability,
    ) -> Result<()> {
        match fold.try_fold(cards) {
            Ok(()) => {
                let mut set: CardSet = cards.iter().copied().collect();
                set.sort_unstable();
                self.found_sets.push(set);
                self.calls += 1;
                self.answer_times.push(now.saturating_sub(reference));
                Ok(())
            }
            Err(err) => {
                self.apply_penalty(now);
                Err(err)
            }
        }
    }

    /// Stamp a penalty at `now` and count it as a call.
    pub fn apply_penalty(&mut self, now: Duration) -> Duration {
        self.last_penalty = Some(now);
        self.calls += 1;
        now
    }

    /// Shift an active penalty forward by a paused interval.
    pub fn resume_penalty(&mut self, paused: Duration) -> Option<Duration> {
        if let Some(stamp) = self.last_penalty.as_mut() {
            *stamp += paused;
        }
        self.last_penalty
    }

    /// Detached statistics.
    #[must_use]
    pub fn stats(&self) -> PlayerStats {
        let valid = self.found_sets.len() as u32;
        let average_answer_time = if self.answer_times.is_empty() {
            0
        } else {
            let total: f64 = self.answer_times.iter().map(Duration::as_secs_f64).sum();
            (total / self.answer_times.len() as f64) as u64
        };

        PlayerStats {
            name: self.profile.name.clone(),
            is_ai: self.profile.is_ai,
            difficulty: self.profile.difficulty.clone(),
            color: self.profile.color.clone(),
            calls: self.calls,
            number_valid_sets: valid,
            number_invalid_sets: self.calls.saturating_sub(valid),
            valid_sets: self.found_sets.clone(),
            average_answer_time,
            answer_times: self.answer_times.iter().map(Duration::as_secs_f64).collect(),
        }
    }
}

/// Value copy of a player's statistics, as sent to clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub is_ai: bool,
    pub difficulty: Option<String>,
    pub color: Option<String>,
    pub calls: u32,
    pub number_valid_sets: u32,
    pub number_invalid_sets: u32,
    pub valid_sets: Vec<CardSet>,
    /// Mean seconds to find a set, truncated.
    pub average_answer_time: u64,
    /// Seconds to find each set.
    pub answer_times: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineError;

    /// Accepts exactly one set, once.
    struct Board {
        accept: Vec<Card>,
        folds: usize,
    }

    impl FoldCapability for Board {
        fn try_fold(&mut self, cards: &[Card]) -> Result<()> {
            if !self.accept.is_empty() && cards == self.accept.as_slice() {
                self.accept.clear();
                self.folds += 1;
                Ok(())
            } else {
                Err(EngineError::InvalidSet)
            }
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn set() -> Vec<Card> {
        vec![Card::new(3333), Card::new(1111), Card::new(2222)]
    }

    #[test]
    fn test_successful_submit() {
        let mut board = Board { accept: set(), folds: 0 };
        let mut player = Player::new(PlayerProfile::human("Alice"));

        player.submit_set(&set(), secs(100), secs(107), &mut board).unwrap();

        let stats = player.stats();
        assert_eq!(board.folds, 1);
        assert_eq!(stats.calls, 1);
        assert_eq!(stats.number_valid_sets, 1);
        assert_eq!(stats.number_invalid_sets, 0);
        assert_eq!(stats.valid_sets[0].as_slice(), &[Card::new(1111), Card::new(2222), Card::new(3333)]);
        assert_eq!(stats.answer_times, vec![7.0]);
        assert_eq!(stats.average_answer_time, 7);
        assert!(player.last_penalty().is_none());
    }

    #[test]
    fn test_failed_submit_applies_penalty() {
        let mut board = Board { accept: vec![], folds: 0 };
        let mut player = Player::new(PlayerProfile::human("Bob"));

        let err = player.submit_set(&set(), secs(0), secs(50), &mut board).unwrap_err();

        assert_eq!(err, EngineError::InvalidSet);
        assert_eq!(player.last_penalty(), Some(secs(50)));
        assert_eq!(player.stats().calls, 1);
        assert_eq!(player.stats().number_invalid_sets, 1);
    }

    #[test]
    fn test_penalty_window() {
        let mut player = Player::new(PlayerProfile::human("Carol"));
        let window = secs(20);

        assert!(!player.is_under_penalty(secs(0), window));
        player.apply_penalty(secs(100));

        assert!(player.is_under_penalty(secs(110), window));
        assert!(player.is_under_penalty(secs(120), window));
        assert!(!player.is_under_penalty(secs(121), window));
    }

    #[test]
    fn test_resume_penalty_shifts_stamp() {
        let mut player = Player::new(PlayerProfile::human("Dan"));
        assert_eq!(player.resume_penalty(secs(30)), None);

        player.apply_penalty(secs(100));
        assert_eq!(player.resume_penalty(secs(30)), Some(secs(130)));
        assert!(player.is_under_penalty(secs(145), secs(20)));
    }

    #[test]
    fn test_average_is_truncated() {
        let mut player = Player::new(PlayerProfile::human("Eve"));
        player.answer_times = vec![Duration::from_millis(1500), Duration::from_millis(2200)];
        assert_eq!(player.stats().average_answer_time, 1);
    }

    #[test]
    fn test_profile_builders() {
        let bot = PlayerProfile::bot("").with_difficulty("hard").with_color("#f00");
        assert!(bot.is_ai);
        assert_eq!(bot.difficulty.as_deref(), Some("hard"));
        assert_eq!(bot.color.as_deref(), Some("#f00"));

        let human = PlayerProfile::human("Alice");
        assert!(!human.is_ai);
    }

    #[test]
    fn test_stats_wire_names() {
        let stats = Player::new(PlayerProfile::human("Alice")).stats();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["isAi"], false);
        assert_eq!(json["numberValidSets"], 0);
        assert_eq!(json["averageAnswerTime"], 0);
    }
}
