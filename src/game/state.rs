//! Terminal-state evaluation
//!
//! Derives the game phase for the army to move: still playing, in check,
//! checkmated, or stalemated. The phase is computed from the position, never
//! stored, so it cannot drift from the board.
//!
//! Detection runs in two steps. First, attack detection: the king's square
//! is "attacked" when it is a valid destination for any opposing piece under
//! the movement predicates, with turn bookkeeping ignored entirely. Second,
//! reply enumeration: every pseudo-legal move of the army is applied to a
//! scratch snapshot and discarded if the king is still attacked afterwards.
//! The simulate-and-filter pass is what catches pinned pieces; there is no
//! shortcut that preserves correctness.

use tracing::{info, warn};

use crate::board::{Position, Square};
use crate::notation::Move;
use crate::pieces::Army;
use crate::rules::piece_moves::{is_valid_move, possible_moves};

/// The derived phase of a game for the army to move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    /// Game continues and the army to move is not in check
    Playing,

    /// The army to move is in check but has at least one escaping move
    Check,

    /// The army to move is in check and every reply leaves the king
    /// attacked
    Checkmate,

    /// The army to move is not in check but has no legal move
    Stalemate,
}

impl GamePhase {
    /// Whether the game is over
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Checkmate | GamePhase::Stalemate)
    }
}

/// Evaluate the phase for the given army on the given position
///
/// Pure function: the same position and army always produce the same
/// answer.
pub fn evaluate_phase(position: &Position, army: Army) -> GamePhase {
    let Some(king_square) = position.king_square(army) else {
        warn!(
            "[GAME] Cannot find {:?} king; position may be corrupted",
            army
        );
        return GamePhase::Playing;
    };

    let in_check = is_square_attacked(position, king_square, army);
    let has_reply = has_legal_reply(position, army);

    match (in_check, has_reply) {
        (true, true) => {
            info!(
                "[GAME] {:?} king on {} is under attack",
                army, king_square
            );
            GamePhase::Check
        }
        (true, false) => {
            info!("[GAME] ========== CHECKMATE! ==========");
            info!(
                "[GAME] {:?} king on {} is attacked and no reply escapes",
                army, king_square
            );
            GamePhase::Checkmate
        }
        (false, false) => {
            info!("[GAME] ========== STALEMATE! ==========");
            info!("[GAME] {:?} has no legal moves but is not in check", army);
            GamePhase::Stalemate
        }
        (false, true) => GamePhase::Playing,
    }
}

/// Check whether a square held by the defending army is attacked
///
/// True when any opposing piece could move onto the square under the
/// movement predicates. Turn bookkeeping plays no part here.
pub fn is_square_attacked(position: &Position, square: Square, defender: Army) -> bool {
    position.pieces_of(defender.other()).any(|(from, piece)| {
        is_valid_move(piece.kind, piece.army, from, square, position)
    })
}

/// Whether the army has at least one move that leaves its own king safe
///
/// Applies each pseudo-legal candidate to a scratch snapshot and checks the
/// king's square afterwards; returns as soon as one survivor is found.
fn has_legal_reply(position: &Position, army: Army) -> bool {
    for (from, piece) in position.pieces_of(army) {
        for to in possible_moves(piece.kind, army, from, position) {
            let trial = position.apply(&Move::new(from, to));
            let Some(king_square) = trial.king_square(army) else {
                continue;
            };
            if !is_square_attacked(&trial, king_square, army) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::PieceKind::*;

    fn sq(text: &str) -> Square {
        Square::from_algebraic(text).unwrap()
    }

    #[test]
    fn test_starting_position_is_playing() {
        let position = Position::starting();

        assert_eq!(evaluate_phase(&position, Army::White), GamePhase::Playing);
        assert_eq!(evaluate_phase(&position, Army::Black), GamePhase::Playing);
    }

    #[test]
    fn test_check_with_escape() {
        //! A rook gives check but the king can step aside
        let position = Position::from_pieces(&[
            (King, Army::White, sq("e1")),
            (Rook, Army::Black, sq("e8")),
            (King, Army::Black, sq("a8")),
        ]);

        assert_eq!(evaluate_phase(&position, Army::White), GamePhase::Check);
    }

    #[test]
    fn test_back_rank_checkmate() {
        //! Classic back-rank mate: rook on the first rank, king boxed in by
        //! its own pawns
        let position = Position::from_pieces(&[
            (King, Army::White, sq("g1")),
            (Pawn, Army::White, sq("f2")),
            (Pawn, Army::White, sq("g2")),
            (Pawn, Army::White, sq("h2")),
            (Rook, Army::Black, sq("e1")),
            (King, Army::Black, sq("e8")),
        ]);

        assert_eq!(evaluate_phase(&position, Army::White), GamePhase::Checkmate);
    }

    #[test]
    fn test_cornered_king_stalemate() {
        //! King on a8 with the queen on c7 covering every flight square:
        //! no check, no move
        let position = Position::from_pieces(&[
            (King, Army::Black, sq("a8")),
            (Queen, Army::White, sq("c7")),
            (King, Army::White, sq("c6")),
        ]);

        assert_eq!(evaluate_phase(&position, Army::Black), GamePhase::Stalemate);
    }

    #[test]
    fn test_pinned_blocker_cannot_rescue() {
        //! The a8 rook gives check, the d2 knight covers the b1 flight
        //! square, and the b2 rook is the only piece that could block - but
        //! sliding it to a2 uncovers the h8 bishop. Only the simulate-and-
        //! filter pass sees that this is mate.
        let position = Position::from_pieces(&[
            (King, Army::White, sq("a1")),
            (Rook, Army::White, sq("b2")),
            (Rook, Army::Black, sq("a8")),
            (Knight, Army::Black, sq("d2")),
            (Bishop, Army::Black, sq("h8")),
            (King, Army::Black, sq("g8")),
        ]);

        assert_eq!(evaluate_phase(&position, Army::White), GamePhase::Checkmate);
    }

    #[test]
    fn test_attack_detection_ignores_turn() {
        //! is_square_attacked answers for either army on the same position
        let position = Position::from_pieces(&[
            (Rook, Army::Black, sq("e8")),
            (King, Army::White, sq("e1")),
            (Rook, Army::White, sq("a4")),
            (King, Army::Black, sq("a8")),
        ]);

        assert!(is_square_attacked(&position, sq("e1"), Army::White));
        assert!(is_square_attacked(&position, sq("a8"), Army::Black));
    }

    #[test]
    fn test_check_detection_is_symmetric() {
        //! Mirroring the board and the armies mirrors the answer
        let white_in_check = Position::from_pieces(&[
            (King, Army::White, sq("e1")),
            (Queen, Army::Black, sq("e5")),
            (King, Army::Black, sq("a8")),
        ]);
        let black_in_check = Position::from_pieces(&[
            (King, Army::Black, sq("e8")),
            (Queen, Army::White, sq("e4")),
            (King, Army::White, sq("a1")),
        ]);

        assert_eq!(
            evaluate_phase(&white_in_check, Army::White),
            evaluate_phase(&black_in_check, Army::Black),
            "Mirrored positions must evaluate to the same phase"
        );
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let position = Position::from_pieces(&[
            (King, Army::White, sq("e1")),
            (Rook, Army::Black, sq("e8")),
            (King, Army::Black, sq("a8")),
        ]);

        let first = evaluate_phase(&position, Army::White);
        let second = evaluate_phase(&position, Army::White);

        assert_eq!(first, second, "Evaluation must not depend on prior calls");
    }
}
