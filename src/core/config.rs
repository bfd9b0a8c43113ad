//! Engine configuration types.
//!
//! Hosts configure the engine at startup by providing:
//! - `Geometry`: values per feature and number of feature dimensions
//! - `SessionConfig`: session store capacity, lifetime and admin secret
//! - `EngineConfig`: everything above plus roster and penalty rules
//!
//! Every field has a default, so a configuration document only needs to
//! name what it overrides.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Smallest supported number of values per feature.
pub const MIN_ROWS: u8 = 2;

/// Largest supported number of values per feature (one decimal digit).
pub const MAX_ROWS: u8 = 9;

/// Feature geometry: `rows` values per feature across `cols` dimensions.
///
/// A valid set holds `rows` cards, the deck holds `rows^cols` cards and the
/// standard display holds `rows * cols` cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    rows: u8,
    cols: u8,
}

impl Geometry {
    /// Classic Set: 3 values across 4 features.
    pub const CLASSIC: Self = Self { rows: 3, cols: 4 };

    /// Create a validated geometry.
    ///
    /// Requires `2 <= rows <= 9` and `cols == rows + 1`.
    pub fn new(rows: u8, cols: u8) -> Result<Self> {
        let geometry = Self { rows, cols };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Check the geometry rules.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_ROWS..=MAX_ROWS).contains(&self.rows) {
            return Err(EngineError::configuration(format!(
                "rows must be within {}..={}, got {}",
                MIN_ROWS, MAX_ROWS, self.rows
            )));
        }
        if u16::from(self.cols) != u16::from(self.rows) + 1 {
            return Err(EngineError::configuration(format!(
                "cols must equal rows + 1, got rows={} cols={}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Values per feature, also the number of cards in a set.
    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows as usize
    }

    /// Number of feature dimensions.
    #[must_use]
    pub const fn cols(self) -> usize {
        self.cols as usize
    }

    /// Number of cards in the full deck.
    #[must_use]
    pub fn deck_size(self) -> usize {
        self.rows().pow(self.cols as u32)
    }

    /// Number of cards on a full display.
    #[must_use]
    pub const fn display_size(self) -> usize {
        self.rows() * self.cols()
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Session store settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum live sessions before new ones are refused.
    pub max_sessions: usize,

    /// Absolute session lifetime from creation, in seconds.
    pub ttl_secs: u64,

    /// Master secret for wiping every session. Empty disables the wipe.
    pub admin_secret: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 100,
            ttl_secs: 3600,
            admin_secret: String::new(),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Card geometry for every game.
    pub geometry: Geometry,

    /// Roster capacity per game.
    pub max_players: usize,

    /// Cooldown after an invalid submission, in seconds.
    pub penalty_time_secs: u64,

    /// Longer names are truncated.
    pub player_name_max_chars: usize,

    /// Shorter human names are rejected.
    pub player_name_min_chars: usize,

    /// Compute every set of the full deck at grid creation (slow, diagnostics only).
    pub exhaustive_search: bool,

    /// Store seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Session store settings.
    pub session: SessionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::CLASSIC,
            max_players: 4,
            penalty_time_secs: 20,
            player_name_max_chars: 20,
            player_name_min_chars: 3,
            exhaustive_search: false,
            seed: None,
            session: SessionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// ```
    /// use set_engine::core::EngineConfig;
    ///
    /// let config = EngineConfig::from_json(r#"{ "max_players": 6, "session": { "ttl_secs": 60 } }"#).unwrap();
    /// assert_eq!(config.max_players, 6);
    /// assert_eq!(config.session.ttl_secs, 60);
    /// assert_eq!(config.penalty_time_secs, 20);
    /// ```
    pub fn from_json(document: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(document)
            .map_err(|e| EngineError::configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field rules.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if self.max_players == 0 {
            return Err(EngineError::configuration("max_players must be at least 1"));
        }
        if self.player_name_min_chars > self.player_name_max_chars {
            return Err(EngineError::configuration(
                "player_name_min_chars exceeds player_name_max_chars",
            ));
        }
        if self.session.max_sessions == 0 {
            return Err(EngineError::configuration("max_sessions must be at least 1"));
        }
        Ok(())
    }

    /// Set the geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the roster capacity.
    #[must_use]
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    /// Set the penalty cooldown.
    #[must_use]
    pub fn with_penalty_time_secs(mut self, secs: u64) -> Self {
        self.penalty_time_secs = secs;
        self
    }

    /// Set the store seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the session capacity.
    #[must_use]
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.session.max_sessions = max_sessions;
        self
    }

    /// Set the session lifetime.
    #[must_use]
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.session.ttl_secs = ttl_secs;
        self
    }

    /// Set the admin secret.
    #[must_use]
    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.session.admin_secret = secret.into();
        self
    }
}
