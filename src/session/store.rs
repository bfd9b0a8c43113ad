//! Session registry.
//!
//! The store map and each game have separate locks. The map lock is only
//! held to look up, insert or evict entries; game operations run under the
//! per-session lock returned by `get`, so sessions never wait on each other.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::core::{EngineConfig, EngineError, GameRng, Result, SharedClock};
use crate::game::Game;

/// Shared, lockable handle to one session's game.
pub type GameHandle = Arc<Mutex<Game>>;

#[derive(Debug)]
struct SessionEntry {
    game: GameHandle,
    secret: String,
    created: Duration,
    last_accessed: Duration,
}

/// Bookkeeping for one session, without the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub created: Duration,
    pub last_accessed: Duration,
    pub ttl: Duration,
}

/// Registry of live sessions.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<FxHashMap<String, SessionEntry>>,
    config: EngineConfig,
    clock: SharedClock,
    rng: Mutex<GameRng>,
}

impl SessionStore {
    /// Create an empty store. Games are built from `config`.
    pub fn new(config: EngineConfig, clock: SharedClock) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Ok(Self {
            sessions: Mutex::new(FxHashMap::default()),
            config,
            clock,
            rng: Mutex::new(rng),
        })
    }

    /// Configuration every new game is built from.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn ttl(&self) -> Duration {
        Duration::from_secs(self.config.session.ttl_secs)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// True when no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// True if `id` names a live session.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Bookkeeping for `id`, without touching it.
    #[must_use]
    pub fn info(&self, id: &str) -> Option<SessionInfo> {
        let ttl = self.ttl();
        self.sessions.lock().get(id).map(|entry| SessionInfo {
            created: entry.created,
            last_accessed: entry.last_accessed,
            ttl,
        })
    }

    /// Register a new session with a fresh game.
    ///
    /// Re-creating an existing id is a no-op. A full store first evicts
    /// expired sessions and fails only if that frees nothing. The game is
    /// built with the map unlocked, and the checks run again before insert.
    pub fn create(&self, id: &str, secret: &str) -> Result<()> {
        if id.is_empty() {
            return Err(EngineError::InvalidSessionId);
        }

        let now = self.clock.now();
        if !self.has_room_for(&mut self.sessions.lock(), id, now)? {
            return Ok(());
        }

        let rng = self.rng.lock().fork();
        let game = Game::from_config(&self.config, self.clock.clone(), rng)?;

        let mut sessions = self.sessions.lock();
        if !self.has_room_for(&mut sessions, id, now)? {
            return Ok(());
        }
        sessions.insert(
            id.to_string(),
            SessionEntry {
                game: Arc::new(Mutex::new(game)),
                secret: secret.to_string(),
                created: now,
                last_accessed: now,
            },
        );
        info!("session {} created ({} live)", id, sessions.len());
        Ok(())
    }

    /// False if `id` already exists. Evicts expired sessions when full.
    fn has_room_for(
        &self,
        sessions: &mut FxHashMap<String, SessionEntry>,
        id: &str,
        now: Duration,
    ) -> Result<bool> {
        if sessions.contains_key(id) {
            debug!("session {} already exists", id);
            return Ok(false);
        }

        let max = self.config.session.max_sessions;
        if sessions.len() >= max {
            let evicted = evict_expired(sessions, now, self.ttl());
            if evicted > 0 {
                warn!("evicted {} expired sessions at capacity", evicted);
            }
        }
        if sessions.len() >= max {
            return Err(EngineError::MaxSessionsReached { max });
        }
        Ok(true)
    }

    /// Resolve a session, checking its secret and touching its access time.
    pub fn get(&self, id: &str, secret: &str) -> Result<GameHandle> {
        if id.is_empty() {
            return Err(EngineError::InvalidSessionId);
        }

        let mut sessions = self.sessions.lock();
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| EngineError::SessionNotFound { id: id.to_string() })?;

        if entry.secret != secret {
            warn!("rejected secret for session {}", id);
            return Err(EngineError::InvalidSecret);
        }

        entry.last_accessed = self.clock.now();
        Ok(Arc::clone(&entry.game))
    }

    /// Remove one session after checking its secret.
    pub fn remove(&self, id: &str, secret: &str) -> Result<()> {
        if id.is_empty() {
            return Err(EngineError::InvalidSessionId);
        }

        let mut sessions = self.sessions.lock();
        match sessions.get(id) {
            None => Err(EngineError::SessionNotFound { id: id.to_string() }),
            Some(entry) if entry.secret != secret => Err(EngineError::InvalidSecret),
            Some(_) => {
                sessions.remove(id);
                info!("session {} removed", id);
                Ok(())
            }
        }
    }

    /// Drop every session whose lifetime since creation reached the TTL.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_idle(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        evict_expired(&mut sessions, now, self.ttl())
    }

    /// Drop every session. Requires the configured admin secret.
    pub fn wipe_all(&self, admin_secret: &str) -> Result<usize> {
        let expected = &self.config.session.admin_secret;
        if expected.is_empty() || admin_secret != expected {
            warn!("rejected admin wipe");
            return Err(EngineError::not_allowed("admin secret mismatch"));
        }

        let mut sessions = self.sessions.lock();
        let count = sessions.len();
        sessions.clear();
        info!("wiped {} sessions", count);
        Ok(count)
    }
}

fn evict_expired(sessions: &mut FxHashMap<String, SessionEntry>, now: Duration, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| now.saturating_sub(entry.created) < ttl);
    before - sessions.len()
}
