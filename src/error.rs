//! Error types for the rules engine
//!
//! Provides custom error types for move parsing, move validation, session
//! state transitions, and the move-history store. Parsing failures and
//! rule rejections are deliberately separate kinds so callers can tell
//! "syntactically invalid" apart from "well-formed but illegal".

use thiserror::Error;

/// Errors that can occur while interpreting move notation
#[derive(Error, Debug)]
pub enum ParseError {
    /// Notation does not match any accepted shape
    #[error("Malformed move notation: {notation}")]
    Malformed { notation: String },

    /// A coordinate falls outside the 8x8 grid
    #[error("Square outside the board: {square}")]
    OutOfBoard { square: String },
}

/// Errors that can occur when a well-formed move is checked against the rules
#[derive(Error, Debug)]
pub enum MoveError {
    /// Move rejected by the movement rules
    #[error("Illegal move: {reason}")]
    IllegalMove { reason: String },
}

/// Errors that can occur when driving a session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Command invoked while the session is in the wrong state
    #[error("Invalid session transition: {message}")]
    InvalidTransition { message: String },

    /// Move notation could not be interpreted
    #[error("Move rejected: {0}")]
    Parse(#[from] ParseError),

    /// Move rejected by the movement rules
    #[error("Move rejected: {0}")]
    Move(#[from] MoveError),

    /// The history store reported a failure
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Errors propagated from the move-history store
///
/// The engine surfaces these unchanged; it never retries or repairs a
/// failing store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No game stored under the given name
    #[error("Unknown game: {game}")]
    UnknownGame { game: String },

    /// A game with the given name already exists
    #[error("Game already exists: {game}")]
    GameExists { game: String },

    /// Underlying file operation failed
    #[error("Storage io failure: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be read back
    #[error("Storage document corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type alias for move validation
pub type GameResult<T> = Result<T, MoveError>;

/// Result type alias for session commands
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type alias for store operations
pub type StorageResult<T> = Result<T, StorageError>;
