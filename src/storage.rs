//! Move-history storage
//!
//! The store is an external collaborator: the engine only needs to create a
//! game, ask whether one exists, fetch its moves, and append one move. Any
//! failure is surfaced as an opaque [`StorageError`]; the engine never
//! retries or repairs.
//!
//! Two implementations ship with the crate: [`MemoryStore`], a plain map
//! for tests and single-process play, and [`JsonStore`], one JSON document
//! per game under a configured directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::error::{StorageError, StorageResult};
use crate::notation::Move;

/// The history-store collaborator boundary
pub trait GameStore {
    /// Register a new game with an empty history
    fn create_game(&mut self, game: &str) -> StorageResult<()>;

    /// Whether a game is stored under the given name
    fn game_exists(&self, game: &str) -> StorageResult<bool>;

    /// The full move list of a game, oldest first
    fn all_moves(&self, game: &str) -> StorageResult<Vec<Move>>;

    /// Append one move to a game's history
    fn post_move(&mut self, game: &str, mv: &Move) -> StorageResult<()>;
}

/// In-memory store backed by a map from game name to move list
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: HashMap<String, Vec<Move>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl GameStore for MemoryStore {
    fn create_game(&mut self, game: &str) -> StorageResult<()> {
        if self.games.contains_key(game) {
            return Err(StorageError::GameExists {
                game: game.to_string(),
            });
        }
        self.games.insert(game.to_string(), Vec::new());
        Ok(())
    }

    fn game_exists(&self, game: &str) -> StorageResult<bool> {
        Ok(self.games.contains_key(game))
    }

    fn all_moves(&self, game: &str) -> StorageResult<Vec<Move>> {
        self.games
            .get(game)
            .cloned()
            .ok_or_else(|| StorageError::UnknownGame {
                game: game.to_string(),
            })
    }

    fn post_move(&mut self, game: &str, mv: &Move) -> StorageResult<()> {
        let moves = self
            .games
            .get_mut(game)
            .ok_or_else(|| StorageError::UnknownGame {
                game: game.to_string(),
            })?;
        moves.push(*mv);
        Ok(())
    }
}

/// File-backed store: one JSON document per game under a root directory
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> JsonStore {
        JsonStore { root: root.into() }
    }

    pub fn from_config(config: &StoreConfig) -> JsonStore {
        JsonStore::new(config.root_dir.clone())
    }

    fn game_path(&self, game: &str) -> PathBuf {
        self.root.join(format!("{game}.json"))
    }

    fn write_moves(&self, game: &str, moves: &[Move]) -> StorageResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
        }
        let json = serde_json::to_string_pretty(moves)?;
        fs::write(self.game_path(game), json)?;
        Ok(())
    }
}

impl GameStore for JsonStore {
    fn create_game(&mut self, game: &str) -> StorageResult<()> {
        if self.game_path(game).exists() {
            return Err(StorageError::GameExists {
                game: game.to_string(),
            });
        }
        self.write_moves(game, &[])?;
        info!("[STORE] Created game document for '{}'", game);
        Ok(())
    }

    fn game_exists(&self, game: &str) -> StorageResult<bool> {
        Ok(self.game_path(game).exists())
    }

    fn all_moves(&self, game: &str) -> StorageResult<Vec<Move>> {
        let path = self.game_path(game);
        if !path.exists() {
            return Err(StorageError::UnknownGame {
                game: game.to_string(),
            });
        }
        let contents = fs::read_to_string(&path)?;
        match serde_json::from_str(&contents) {
            Ok(moves) => Ok(moves),
            Err(e) => {
                warn!("[STORE] Game document at {:?} is corrupt: {}", path, e);
                Err(e.into())
            }
        }
    }

    fn post_move(&mut self, game: &str, mv: &Move) -> StorageResult<()> {
        let mut moves = self.all_moves(game)?;
        moves.push(*mv);
        self.write_moves(game, &moves)
    }
}
