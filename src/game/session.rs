//! Session state machine
//!
//! A [`Session`] is one player's view of one game: the controlled army, the
//! current position, the move history, and the state gating which commands
//! are accepted. Sessions are snapshots like everything else here - every
//! successful command returns a new `Session` and leaves the old one valid.
//!
//! # State Flow
//!
//! ```text
//! [Logging] --open/join--> [YourTurn] <--play/refresh--> [WaitingForOpponent]
//!                                 \                        /
//!                                  +------> [Ended] <-----+
//! ```
//!
//! # State Descriptions
//!
//! - **Logging**: No game attached yet; only `open` and `join` are accepted.
//! - **YourTurn**: The controlled army is to move; only `play` is accepted.
//! - **WaitingForOpponent**: The opposing army is to move; only `refresh`
//!   is accepted.
//! - **Ended**: A terminal phase (checkmate or stalemate) was reached; no
//!   further command is accepted.
//!
//! Whether `open`/`join` land in YourTurn or WaitingForOpponent depends on
//! comparing the controlled army against the turn-army derived from the
//! stored history. The caller serializes commands per game name; the engine
//! assumes at most one in-flight command per game.

use tracing::info;

use crate::board::Position;
use crate::error::{SessionError, SessionResult, StorageError};
use crate::game::engine;
use crate::game::history::MoveHistory;
use crate::game::state::{evaluate_phase, GamePhase};
use crate::notation::Move;
use crate::pieces::Army;
use crate::storage::GameStore;

/// Which commands a session currently accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No game attached
    Logging,

    /// The controlled army is to move
    YourTurn,

    /// The opposing army is to move
    WaitingForOpponent,

    /// The game reached checkmate or stalemate; terminal
    Ended,
}

/// One player's attachment to one game
#[derive(Clone, Debug)]
pub struct Session {
    game_name: String,
    state: SessionState,
    army: Army,
    position: Position,
    history: MoveHistory,
}

impl Session {
    /// A fresh session with no game attached
    pub fn logging() -> Session {
        Session {
            game_name: String::new(),
            state: SessionState::Logging,
            army: Army::White,
            position: Position::starting(),
            history: MoveHistory::new(),
        }
    }

    /// Open a game as White, creating it in the store when missing
    pub fn open(&self, game_name: &str, store: &mut dyn GameStore) -> SessionResult<Session> {
        self.require(SessionState::Logging, "open")?;

        if !store.game_exists(game_name)? {
            store.create_game(game_name)?;
            info!("[SESSION] Created game '{}'", game_name);
        }
        let moves = store.all_moves(game_name)?;
        Self::attach(game_name, Army::White, moves)
    }

    /// Join an existing game as Black
    pub fn join(&self, game_name: &str, store: &mut dyn GameStore) -> SessionResult<Session> {
        self.require(SessionState::Logging, "join")?;

        if !store.game_exists(game_name)? {
            return Err(StorageError::UnknownGame {
                game: game_name.to_string(),
            }
            .into());
        }
        let moves = store.all_moves(game_name)?;
        Self::attach(game_name, Army::Black, moves)
    }

    /// Play one move from notation text
    ///
    /// Accepted only in YourTurn. Parses against the current position,
    /// runs the engine's validation chain, posts the move to the store, and
    /// returns the successor session. Any failure leaves this session (and
    /// the store, for parse/rule failures) untouched.
    pub fn play(&self, notation: &str, store: &mut dyn GameStore) -> SessionResult<Session> {
        self.require(SessionState::YourTurn, "play")?;

        let mv = Move::parse(notation, &self.position, self.army)?;
        let (position, history) = engine::apply_move(&self.position, &self.history, mv)?;
        store.post_move(&self.game_name, &mv)?;
        info!("[SESSION] {:?} played {} in '{}'", self.army, mv, self.game_name);

        Ok(self.successor(position, history))
    }

    /// Re-fetch the stored history and recompute the state
    ///
    /// Accepted only in WaitingForOpponent: a YourTurn session has nothing
    /// new to learn, and a Logging session has no game to ask about.
    pub fn refresh(&self, store: &dyn GameStore) -> SessionResult<Session> {
        self.require(SessionState::WaitingForOpponent, "refresh")?;

        let history = MoveHistory::from_moves(store.all_moves(&self.game_name)?);
        let position = history.replay();

        Ok(self.successor(position, history))
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn army(&self) -> Army {
        self.army
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// The derived phase for the army to move
    pub fn phase(&self) -> GamePhase {
        evaluate_phase(&self.position, self.history.turn_army())
    }

    /// Build the session that follows open/join
    fn attach(game_name: &str, army: Army, moves: Vec<Move>) -> SessionResult<Session> {
        let history = MoveHistory::from_moves(moves);
        let position = history.replay();
        let state = Self::derive_state(&position, &history, army);

        info!(
            "[SESSION] Attached to '{}' as {:?}: {:?}",
            game_name, army, state
        );
        Ok(Session {
            game_name: game_name.to_string(),
            state,
            army,
            position,
            history,
        })
    }

    /// Build the session that follows a successful play/refresh
    fn successor(&self, position: Position, history: MoveHistory) -> Session {
        let state = Self::derive_state(&position, &history, self.army);
        if state != self.state {
            info!(
                "[SESSION] '{}' transition {:?} -> {:?}",
                self.game_name, self.state, state
            );
        }
        Session {
            game_name: self.game_name.clone(),
            state,
            army: self.army,
            position,
            history,
        }
    }

    /// State from the controlled army versus the derived turn-army, with
    /// terminal phases taking precedence
    fn derive_state(position: &Position, history: &MoveHistory, army: Army) -> SessionState {
        let turn_army = history.turn_army();
        if evaluate_phase(position, turn_army).is_terminal() {
            SessionState::Ended
        } else if turn_army == army {
            SessionState::YourTurn
        } else {
            SessionState::WaitingForOpponent
        }
    }

    fn require(&self, expected: SessionState, command: &str) -> SessionResult<()> {
        if self.state != expected {
            return Err(SessionError::InvalidTransition {
                message: format!("cannot {} while {:?}", command, self.state),
            });
        }
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::logging()
    }
}
