//! The operation surface.
//!
//! Each method resolves its session (id, existence, secret), takes the
//! per-session lock for the rest of the call, and applies the view rules on
//! top of the game logic. Nothing here panics on bad input; every failure
//! becomes an error response that still carries the operation's fields.

use std::time::Duration;

use log::{debug, info};

use super::request::{
    AddPlayerRequest, ApplyPenaltyRequest, ChangeGameStateRequest, DeleteAllSessionsRequest,
    InitSessionRequest, RemovePlayerRequest, Request, ResetGameRequest, SessionRef,
    SubmitSetRequest,
};
use super::response::{
    ConfigBody, GridBody, HintsBody, PlayersBody, Reply, Response, SubmitBody,
};
use crate::cards::CardSet;
use crate::core::{EngineConfig, EngineError, Result, SharedClock};
use crate::game::{Game, GameState};
use crate::players::PlayerProfile;
use crate::session::SessionStore;

/// Typed entry point over a session store.
#[derive(Debug)]
pub struct Service {
    store: SessionStore,
}

impl Service {
    pub fn new(config: EngineConfig, clock: SharedClock) -> Result<Self> {
        Ok(Self::from_store(SessionStore::new(config, clock)?))
    }

    pub fn from_store(store: SessionStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run `f` on the resolved game, reporting the state it leaves behind.
    fn with_game<T: Default>(
        &self,
        session: &SessionRef,
        f: impl FnOnce(&mut Game) -> Result<T>,
    ) -> Response<T> {
        self.with_game_or(session, f, |_| T::default())
    }

    /// Like `with_game`, but a failed `f` reports `on_error(game)` as body.
    ///
    /// Session failures have no game to read and report `T::default()`.
    fn with_game_or<T: Default>(
        &self,
        session: &SessionRef,
        f: impl FnOnce(&mut Game) -> Result<T>,
        on_error: impl FnOnce(&Game) -> T,
    ) -> Response<T> {
        let handle = match self.store.get(&session.session_id, &session.secret) {
            Ok(handle) => handle,
            Err(err) => return Response::failure(&err),
        };
        let mut game = handle.lock();
        let response = match f(&mut game) {
            Ok(body) => Response::success(body),
            Err(err) => Response::failure_with(&err, on_error(&game)),
        };
        response.with_game_state(game.state())
    }

    // === Sessions ===

    pub fn init_session(&self, request: &InitSessionRequest) -> Response<()> {
        Response::from_result(self.store.create(&request.session_id, &request.session_secret))
    }

    pub fn delete_all_sessions(&self, request: &DeleteAllSessionsRequest) -> Response<()> {
        Response::from_result(self.store.wipe_all(&request.admin_secret).map(|_| ()))
    }

    // === Players ===

    pub fn add_player(&self, request: &AddPlayerRequest) -> Response<PlayersBody> {
        let config = self.store.config();
        let name: String = request.name.chars().take(config.player_name_max_chars).collect();
        let min_chars = config.player_name_min_chars;

        self.with_game_or(
            &request.session,
            |game| {
                if game.state() == GameState::Running {
                    return Err(EngineError::not_allowed("game is running"));
                }
                if !request.is_ai && !name.is_empty() && name.chars().count() < min_chars {
                    return Err(EngineError::InvalidPlayerName { name: name.clone() });
                }

                let mut profile = if request.is_ai {
                    PlayerProfile::bot(name.clone())
                } else {
                    PlayerProfile::human(name.clone())
                };
                profile.color = request.color.clone();
                profile.difficulty = request.difficulty.clone();

                game.add_player(profile)?;
                Ok(players_body(game))
            },
            players_body,
        )
    }

    pub fn remove_player(&self, request: &RemovePlayerRequest) -> Response<PlayersBody> {
        self.with_game_or(
            &request.session,
            |game| {
                if game.state() == GameState::Running {
                    return Err(EngineError::not_allowed("game is running"));
                }
                game.remove_player(&request.name)?;
                Ok(players_body(game))
            },
            players_body,
        )
    }

    pub fn get_players_info(&self, session: &SessionRef) -> Response<PlayersBody> {
        self.with_game(session, |game| Ok(players_body(game)))
    }

    /// Submit a set, then refresh the game whatever the verdict.
    ///
    /// A refused set is still a success response: `isValid` is false and
    /// the reason travels in `error`. Failures echo the submitted set and
    /// player name with `isValid` false.
    pub fn submit_set(&self, request: &SubmitSetRequest) -> Response<SubmitBody> {
        let refused = || SubmitBody {
            is_valid: false,
            set: CardSet::from_slice(&request.card_set),
            player_name: request.player_name.clone(),
        };
        let handle = match self.store.get(&request.session.session_id, &request.session.secret) {
            Ok(handle) => handle,
            Err(err) => return Response::failure_with(&err, refused()),
        };
        let mut game = handle.lock();

        let attempt = game.submit_set_from_player(&request.player_name, &request.card_set);
        game.update_game(false);
        let state = game.state();

        match attempt {
            Ok(outcome) => {
                let response = Response::success(SubmitBody {
                    is_valid: outcome.is_valid,
                    set: outcome.set,
                    player_name: outcome.player_name,
                })
                .with_game_state(state);
                match outcome.rejection {
                    Some(err) => response.with_error(&err),
                    None => response,
                }
            }
            Err(err) => {
                debug!("submission from {} refused: {}", request.player_name, err);
                Response::failure_with(&err, refused()).with_game_state(state)
            }
        }
    }

    pub fn apply_penalty(&self, request: &ApplyPenaltyRequest) -> Response<()> {
        self.with_game(&request.session, |game| {
            game.apply_penalty_to(&request.player_name).map(|_: Duration| ())
        })
    }

    // === Game ===

    /// Pause or resume, refreshing the display first.
    pub fn change_game_state(&self, request: &ChangeGameStateRequest) -> Response<GridBody> {
        self.with_game(&request.session, |game| {
            if game.player_count() == 0 {
                return Err(EngineError::NoPlayers);
            }
            if game.state().is_terminal() || game.is_game_ended() {
                return Err(EngineError::GameEnded);
            }
            game.update_game(request.enable_pause);
            Ok(grid_body(game))
        })
    }

    pub fn get_game(&self, session: &SessionRef) -> Response<GridBody> {
        self.with_game(session, |game| Ok(grid_body(game)))
    }

    pub fn get_game_state(&self, session: &SessionRef) -> Response<()> {
        self.with_game(session, |_| Ok(()))
    }

    pub fn get_hints(&self, session: &SessionRef) -> Response<HintsBody> {
        self.with_game(session, |game| {
            let sets = game.grid().current_valid_sets().into_owned();
            if sets.is_empty() {
                return Err(EngineError::NoSetsLeft);
            }
            Ok(HintsBody { sets })
        })
    }

    pub fn reset_game(&self, request: &ResetGameRequest) -> Response<()> {
        self.with_game(&request.session, |game| game.reset(request.hard))
    }

    /// Public engine settings and crate version. Needs no session.
    pub fn get_config(&self) -> Response<ConfigBody> {
        Response::success(ConfigBody::from_config(self.store.config()))
    }

    // === Dispatch ===

    /// Route a decoded request to its operation.
    pub fn handle(&self, request: &Request) -> Reply {
        match request {
            Request::InitSession(r) => Reply::Ack(self.init_session(r)),
            Request::DeleteAllSessions(r) => Reply::Ack(self.delete_all_sessions(r)),
            Request::AddPlayer(r) => Reply::Players(self.add_player(r)),
            Request::RemovePlayer(r) => Reply::Players(self.remove_player(r)),
            Request::GetPlayersInfo(r) => Reply::Players(self.get_players_info(r)),
            Request::SubmitSet(r) => Reply::Submit(self.submit_set(r)),
            Request::ApplyPenalty(r) => Reply::Ack(self.apply_penalty(r)),
            Request::ChangeGameState(r) => Reply::Grid(self.change_game_state(r)),
            Request::GetGame(r) => Reply::Grid(self.get_game(r)),
            Request::GetGameState(r) => Reply::Ack(self.get_game_state(r)),
            Request::GetHints(r) => Reply::Hints(self.get_hints(r)),
            Request::ResetGame(r) => Reply::Ack(self.reset_game(r)),
            Request::GetConfig => Reply::Config(self.get_config()),
        }
    }

    /// Decode `payload` for `operation` and run it.
    ///
    /// Decode failures come back as `INVALID_PARAMS` error replies.
    pub fn dispatch(&self, operation: &str, payload: &str) -> Reply {
        match Request::decode(operation, payload) {
            Ok(request) => {
                info!("{}", request.operation());
                self.handle(&request)
            }
            Err(err) => {
                debug!("{} rejected: {}", operation, err);
                Reply::Ack(Response::failure(&err))
            }
        }
    }
}

fn players_body(game: &Game) -> PlayersBody {
    PlayersBody {
        players_stats: game.players(),
    }
}

fn grid_body(game: &Game) -> GridBody {
    GridBody {
        grid: game.grid().rows_layout(),
        draw_pile_count: game.grid().draw_pile_len() as i64,
    }
}
