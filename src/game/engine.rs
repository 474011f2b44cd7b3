//! Move validation and application
//!
//! The ordered validation chain for a candidate move:
//!
//! 1. a piece stands on the origin square
//! 2. that piece belongs to the army whose turn it is (derived from
//!    history length)
//! 3. the destination does not hold a friendly piece
//! 4. the piece-kind movement predicate accepts the move
//!
//! Failures leave every input untouched - snapshots make partial mutation
//! impossible. Note that the chain ends at the movement predicate: a move
//! that exposes its own king is applied, and only surfaces when the phase
//! is evaluated. [`legal_moves`] is the stricter enumeration used for
//! terminal classification; it does filter by king safety.

use tracing::debug;

use crate::board::Position;
use crate::error::{GameResult, MoveError};
use crate::game::history::MoveHistory;
use crate::game::state::is_square_attacked;
use crate::notation::Move;
use crate::pieces::Army;
use crate::rules::piece_moves::{is_valid_move, possible_moves};

/// Run the validation chain without applying anything
pub fn validate_move(position: &Position, army: Army, mv: &Move) -> GameResult<()> {
    let piece = position.piece_at(mv.from).ok_or_else(|| MoveError::IllegalMove {
        reason: format!("no piece on {}", mv.from),
    })?;

    if piece.army != army {
        return Err(MoveError::IllegalMove {
            reason: format!("piece on {} belongs to {:?}", mv.from, piece.army),
        });
    }

    if let Some(target) = position.piece_at(mv.to) {
        if target.army == army {
            return Err(MoveError::IllegalMove {
                reason: format!("own piece on destination {}", mv.to),
            });
        }
    }

    if !is_valid_move(piece.kind, army, mv.from, mv.to, position) {
        return Err(MoveError::IllegalMove {
            reason: format!("{:?} cannot move {} to {}", piece.kind, mv.from, mv.to),
        });
    }

    Ok(())
}

/// Validate and apply one move, producing the next snapshots
///
/// The moving army is derived from the history length; on success the move
/// is appended and the relocated position returned. On failure both inputs
/// are exactly as they were.
pub fn apply_move(
    position: &Position,
    history: &MoveHistory,
    mv: Move,
) -> GameResult<(Position, MoveHistory)> {
    let army = history.turn_army();
    validate_move(position, army, &mv)?;

    debug!("[GAME] {:?} plays {}", army, mv);
    Ok((position.apply(&mv), history.with_move(mv)))
}

/// Every fully legal move for the army: pseudo-legal candidates filtered by
/// king safety through scratch-snapshot simulation
pub fn legal_moves(position: &Position, army: Army) -> Vec<Move> {
    let mut moves = Vec::new();

    for (from, piece) in position.pieces_of(army) {
        for to in possible_moves(piece.kind, army, from, position) {
            let mv = if position.is_occupied(to) {
                Move::capture(from, to)
            } else {
                Move::new(from, to)
            };

            let trial = position.apply(&mv);
            let Some(king_square) = trial.king_square(army) else {
                continue;
            };
            if !is_square_attacked(&trial, king_square, army) {
                moves.push(mv);
            }
        }
    }

    moves
}
