//! One Set game: grid, roster, timer and the rules that tie them together.

use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::state::GameState;
use super::timer::MatchTimer;
use crate::cards::{Card, CardSet};
use crate::core::{EngineConfig, EngineError, GameRng, Result, SharedClock};
use crate::grid::{Grid, GridSnapshot};
use crate::players::{Player, PlayerProfile, PlayerStats};

/// Default roster capacity.
pub const DEFAULT_MAX_PLAYERS: usize = 4;

/// Default cooldown after an invalid submission.
pub const DEFAULT_PENALTY_TIME: Duration = Duration::from_secs(20);

/// Result of a submission that reached the validity check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Player who submitted.
    pub player_name: String,
    /// Cards actually checked. Bots substitute their own pick.
    pub set: CardSet,
    /// True when the set was folded.
    pub is_valid: bool,
    /// Why the set was refused; a penalty was applied.
    pub rejection: Option<EngineError>,
}

/// Value copy of a game for callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub grid: GridSnapshot,
    pub players: Vec<PlayerStats>,
}

/// A single game.
///
/// Not internally synchronized: callers serialize access, typically through
/// the session store's per-session lock.
#[derive(Clone, Debug)]
pub struct Game {
    grid: Grid,
    players: Vec<Player>,
    max_players: usize,
    penalty_time: Duration,
    state: GameState,
    timer: MatchTimer,
    exhaustive: bool,
    clock: SharedClock,
    rng: GameRng,
}

impl Game {
    /// Wrap a dealt grid with default roster and penalty rules.
    ///
    /// `rng` drives bot picks, bot names and the grids of later resets.
    pub fn new(grid: Grid, clock: SharedClock, rng: GameRng) -> Self {
        let timer = MatchTimer::new(clock.now());
        Self {
            grid,
            players: Vec::new(),
            max_players: DEFAULT_MAX_PLAYERS,
            penalty_time: DEFAULT_PENALTY_TIME,
            state: GameState::New,
            timer,
            exhaustive: false,
            clock,
            rng,
        }
    }

    /// Deal a grid and apply every rule from `config`.
    pub fn from_config(config: &EngineConfig, clock: SharedClock, mut rng: GameRng) -> Result<Self> {
        let grid = Grid::new(config.geometry, config.exhaustive_search, rng.fork())?;
        let mut game = Self::new(grid, clock, rng)
            .with_max_players(config.max_players)
            .with_penalty_time(Duration::from_secs(config.penalty_time_secs));
        game.exhaustive = config.exhaustive_search;
        Ok(game)
    }

    /// Set the roster capacity.
    #[must_use]
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Set the penalty cooldown.
    #[must_use]
    pub fn with_penalty_time(mut self, penalty_time: Duration) -> Self {
        self.penalty_time = penalty_time;
        self
    }

    // === Accessors ===

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The playground.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Roster capacity.
    #[must_use]
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Penalty cooldown.
    #[must_use]
    pub fn penalty_time(&self) -> Duration {
        self.penalty_time
    }

    /// Number of seated players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Statistics for every seated player, in seating order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerStats> {
        self.players.iter().map(Player::stats).collect()
    }

    /// Statistics for one player.
    #[must_use]
    pub fn player(&self, name: &str) -> Option<PlayerStats> {
        self.find(name).map(Player::stats)
    }

    /// Active time since the last successful find.
    #[must_use]
    pub fn active_elapsed(&self) -> Duration {
        self.timer.active_elapsed(self.clock.now())
    }

    /// Value copy of the whole game.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            grid: self.grid.snapshot(),
            players: self.players(),
        }
    }

    /// True when the pile is empty and no set remains on display.
    #[must_use]
    pub fn is_game_ended(&self) -> bool {
        self.grid.draw_pile_len() == 0 && self.grid.current_valid_sets().is_empty()
    }

    fn find(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name() == name)
    }

    // === Roster ===

    /// Seat a player and return the name they were seated under.
    ///
    /// Bots with a blank name get a generated `bot-xxxxxxxx` name.
    pub fn add_player(&mut self, mut profile: PlayerProfile) -> Result<String> {
        if profile.name.is_empty() && !profile.is_ai {
            return Err(EngineError::NameRequired);
        }
        if self.players.len() >= self.max_players {
            return Err(EngineError::RosterFull { max: self.max_players });
        }
        if profile.name.is_empty() {
            profile.name = format!("bot-{:08x}", self.rng.next_u32());
        }
        if self.find(&profile.name).is_some() {
            return Err(EngineError::DuplicateName { name: profile.name });
        }

        let name = profile.name.clone();
        info!("player {} joined (ai: {})", name, profile.is_ai);
        self.players.push(Player::new(profile));
        Ok(name)
    }

    /// Remove a player by name.
    pub fn remove_player(&mut self, name: &str) -> Result<()> {
        if self.players.is_empty() {
            return Err(EngineError::NoPlayers);
        }
        let before = self.players.len();
        self.players.retain(|p| p.name() != name);
        if self.players.len() == before {
            return Err(EngineError::PlayerNotFound { name: name.to_string() });
        }
        info!("player {} left", name);
        Ok(())
    }

    /// Stamp a penalty on a player.
    pub fn apply_penalty_to(&mut self, name: &str) -> Result<Duration> {
        let now = self.clock.now();
        let player = self
            .find_mut(name)
            .ok_or_else(|| EngineError::PlayerNotFound { name: name.to_string() })?;
        Ok(player.apply_penalty(now))
    }

    // === Play ===

    /// Submit a set on behalf of a player.
    ///
    /// Bots ignore `cards` and submit a random valid set from the display.
    /// An invalid set is not an error: the outcome reports it and the player
    /// is penalised. Errors are reserved for submissions that never reach
    /// the validity check.
    pub fn submit_set_from_player(&mut self, name: &str, cards: &[Card]) -> Result<SubmitOutcome> {
        let index = self
            .players
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| EngineError::PlayerNotFound { name: name.to_string() })?;

        if self.state.is_terminal() {
            return Err(EngineError::GameEnded);
        }

        let set: CardSet = if self.players[index].is_ai() {
            if self.grid.is_stale() {
                self.grid.recompute_valid_sets();
            }
            self.rng
                .choose(self.grid.valid_sets())
                .cloned()
                .ok_or(EngineError::SetNotFound)?
        } else {
            cards.iter().copied().collect()
        };

        let now = self.clock.now();
        let player = &mut self.players[index];
        if player.is_under_penalty(now, self.penalty_time) {
            return Err(EngineError::StillUnderPenalty { name: name.to_string() });
        }

        let outcome = match player.submit_set(&set, self.timer.reference(), now, &mut self.grid) {
            Ok(()) => {
                self.timer.reset(now);
                debug!("{} found {:?}", name, set.as_slice());
                SubmitOutcome {
                    player_name: name.to_string(),
                    set,
                    is_valid: true,
                    rejection: None,
                }
            }
            Err(err) => {
                debug!("{} submitted {:?}: {}", name, set.as_slice(), err);
                SubmitOutcome {
                    player_name: name.to_string(),
                    set,
                    is_valid: false,
                    rejection: Some(err),
                }
            }
        };
        Ok(outcome)
    }

    /// Pause or resume the match timer.
    ///
    /// Resuming restarts the running interval at now, paused or not, and
    /// shifts every active penalty by the pause just ended. No-op once the
    /// game has ended.
    pub fn toggle_timer(&mut self, pause: bool) {
        if self.state.is_terminal() {
            return;
        }
        let now = self.clock.now();

        if pause {
            if self.timer.pause(now) {
                self.transition(GameState::Paused);
            }
            return;
        }

        if let Some(paused) = self.timer.resume(now) {
            for player in &mut self.players {
                player.resume_penalty(paused);
            }
        }
        self.transition(GameState::Running);
    }

    /// Refill the display, apply `pause`, and detect the end of the game.
    ///
    /// Afterwards the display holds at least one valid set unless the draw
    /// pile is exhausted.
    pub fn update_game(&mut self, pause: bool) {
        self.grid.recompute_valid_sets();

        if self.grid.is_missing_cards() && self.grid.draw_if_possible() {
            self.grid.recompute_valid_sets();
        }

        while self.grid.valid_sets().is_empty() {
            if !self.grid.draw_if_possible() {
                break;
            }
            self.grid.recompute_valid_sets();
        }

        self.toggle_timer(pause);

        if self.is_game_ended() {
            self.transition(GameState::Ended);
        }
    }

    /// Start over with a fresh grid.
    ///
    /// A hard reset empties the roster; a soft reset re-seats the same
    /// players with clean statistics.
    pub fn reset(&mut self, hard: bool) -> Result<()> {
        let grid = Grid::new(self.grid.geometry(), self.exhaustive, self.rng.fork())?;
        let profiles: Vec<PlayerProfile> = if hard {
            Vec::new()
        } else {
            self.players.iter().map(|p| p.profile().clone()).collect()
        };

        self.grid = grid;
        self.players = profiles.into_iter().map(Player::new).collect();
        self.timer = MatchTimer::new(self.clock.now());
        self.state = GameState::New;
        info!("game reset (hard: {}), {} players kept", hard, self.players.len());
        Ok(())
    }

    fn transition(&mut self, next: GameState) {
        if self.state != next {
            info!("game {} -> {}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::{Geometry, ManualClock};

    fn game(seed: u64) -> (Game, ManualClock) {
        let clock = ManualClock::new(Duration::from_secs(1_000));
        let grid = Grid::new(Geometry::CLASSIC, false, GameRng::new(seed)).unwrap();
        (Game::new(grid, Arc::new(clock.clone()), GameRng::new(seed + 1)), clock)
    }

    #[test]
    fn test_defaults() {
        let (game, _) = game(1);
        assert_eq!(game.state(), GameState::New);
        assert_eq!(game.max_players(), 4);
        assert_eq!(game.penalty_time(), Duration::from_secs(20));
        assert_eq!(game.player_count(), 0);
    }

    #[test]
    fn test_add_player_rules() {
        let (mut game, _) = game(1);

        assert_eq!(game.add_player(PlayerProfile::human("")), Err(EngineError::NameRequired));
        assert_eq!(game.add_player(PlayerProfile::human("Alice")).unwrap(), "Alice");
        assert_eq!(
            game.add_player(PlayerProfile::human("Alice")),
            Err(EngineError::DuplicateName { name: "Alice".into() })
        );
        assert!(game.add_player(PlayerProfile::human("alice")).is_ok());
    }

    #[test]
    fn test_bot_name_generated() {
        let (mut game, _) = game(1);
        let name = game.add_player(PlayerProfile::bot("")).unwrap();

        assert!(name.starts_with("bot-"));
        assert_eq!(name.len(), 12);
        assert!(game.player(&name).unwrap().is_ai);
    }

    #[test]
    fn test_remove_player() {
        let (mut game, _) = game(1);
        assert_eq!(game.remove_player("Alice"), Err(EngineError::NoPlayers));

        game.add_player(PlayerProfile::human("Alice")).unwrap();
        assert_eq!(
            game.remove_player("Bob"),
            Err(EngineError::PlayerNotFound { name: "Bob".into() })
        );
        game.remove_player("Alice").unwrap();
        assert_eq!(game.player_count(), 0);
    }

    #[test]
    fn test_unknown_player_checked_before_end() {
        let (mut game, _) = game(1);
        game.state = GameState::Ended;
        assert_eq!(
            game.submit_set_from_player("ghost", &[]),
            Err(EngineError::PlayerNotFound { name: "ghost".into() })
        );

        game.add_player(PlayerProfile::human("Alice")).unwrap();
        assert_eq!(game.submit_set_from_player("Alice", &[]), Err(EngineError::GameEnded));
    }

    #[test]
    fn test_toggle_timer_transitions() {
        let (mut game, clock) = game(1);

        game.toggle_timer(false);
        assert_eq!(game.state(), GameState::Running);

        clock.advance(Duration::from_secs(10));
        game.toggle_timer(true);
        assert_eq!(game.state(), GameState::Paused);

        clock.advance(Duration::from_secs(100));
        assert_eq!(game.active_elapsed(), Duration::from_secs(10));

        game.toggle_timer(false);
        clock.advance(Duration::from_secs(5));
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.active_elapsed(), Duration::from_secs(15));
    }

    #[test]
    fn test_resume_without_pause_restarts_interval() {
        let (mut game, clock) = game(1);
        game.toggle_timer(false);

        clock.advance(Duration::from_secs(30));
        game.toggle_timer(false);
        clock.advance(Duration::from_secs(5));

        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.active_elapsed(), Duration::from_secs(5));
    }

    #[test]
    fn test_ended_is_terminal() {
        let (mut game, _) = game(1);
        game.state = GameState::Ended;

        game.toggle_timer(false);
        assert_eq!(game.state(), GameState::Ended);
        game.toggle_timer(true);
        assert_eq!(game.state(), GameState::Ended);
    }

    #[test]
    fn test_reset_soft_keeps_roster() {
        let (mut game, _) = game(1);
        game.add_player(PlayerProfile::human("Alice").with_color("red")).unwrap();
        game.apply_penalty_to("Alice").unwrap();
        game.toggle_timer(false);

        game.reset(false).unwrap();
        let stats = game.player("Alice").unwrap();
        assert_eq!(stats.calls, 0);
        assert_eq!(stats.color.as_deref(), Some("red"));
        assert_eq!(game.state(), GameState::New);

        game.reset(true).unwrap();
        assert_eq!(game.player_count(), 0);
    }

    #[test]
    fn test_apply_penalty_unknown() {
        let (mut game, _) = game(1);
        assert!(matches!(
            game.apply_penalty_to("nobody"),
            Err(EngineError::PlayerNotFound { .. })
        ));
    }
}
