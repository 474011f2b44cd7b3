//! Move history
//!
//! The ordered, append-only list of moves played in a game. Whose turn it is
//! falls out of the length - even means White to move - so there is no
//! second source of truth to drift out of sync with the move list.

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::notation::Move;
use crate::pieces::Army;

/// Ordered, append-only record of the moves played so far
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveHistory {
    moves: Vec<Move>,
}

impl MoveHistory {
    pub fn new() -> MoveHistory {
        MoveHistory::default()
    }

    /// Wrap a move list fetched from storage
    pub fn from_moves(moves: Vec<Move>) -> MoveHistory {
        MoveHistory { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Get the last move made
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// The army to move: White after an even number of moves, Black after
    /// an odd number
    pub fn turn_army(&self) -> Army {
        if self.moves.len() % 2 == 0 {
            Army::White
        } else {
            Army::Black
        }
    }

    /// A new history with one move appended; the original is untouched
    pub fn with_move(&self, mv: Move) -> MoveHistory {
        let mut moves = self.moves.clone();
        moves.push(mv);
        MoveHistory { moves }
    }

    /// Replay the whole history from the starting arrangement
    ///
    /// Stored moves were validated when they were posted, so replay applies
    /// them without re-checking.
    pub fn replay(&self) -> Position {
        self.moves
            .iter()
            .fold(Position::starting(), |position, mv| position.apply(mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv(from: &str, to: &str) -> Move {
        Move::new(
            Square::from_algebraic(from).unwrap(),
            Square::from_algebraic(to).unwrap(),
        )
    }

    #[test]
    fn test_turn_parity() {
        //! White to move iff the history length is even
        let mut history = MoveHistory::new();
        assert_eq!(history.turn_army(), Army::White);

        history = history.with_move(mv("e2", "e4"));
        assert_eq!(history.turn_army(), Army::Black);

        history = history.with_move(mv("e7", "e5"));
        assert_eq!(history.turn_army(), Army::White);

        history = history.with_move(mv("g1", "f3"));
        assert_eq!(history.turn_army(), Army::Black);
    }

    #[test]
    fn test_with_move_leaves_original_untouched() {
        let history = MoveHistory::new();
        let extended = history.with_move(mv("e2", "e4"));

        assert!(history.is_empty(), "Original history must not grow");
        assert_eq!(extended.len(), 1);
        assert_eq!(extended.last_move(), Some(&mv("e2", "e4")));
    }

    #[test]
    fn test_replay_reconstructs_position() {
        let history = MoveHistory::new()
            .with_move(mv("e2", "e4"))
            .with_move(mv("e7", "e5"));

        let position = history.replay();

        assert!(position.is_occupied(Square::from_algebraic("e4").unwrap()));
        assert!(position.is_occupied(Square::from_algebraic("e5").unwrap()));
        assert!(!position.is_occupied(Square::from_algebraic("e2").unwrap()));
        assert!(!position.is_occupied(Square::from_algebraic("e7").unwrap()));
        assert_eq!(position.piece_count(), 32, "No captures in this opening");
    }

    #[test]
    fn test_empty_replay_is_starting_position() {
        assert_eq!(MoveHistory::new().replay(), Position::starting());
    }

    #[test]
    fn test_history_serializes_for_storage() {
        let history = MoveHistory::new().with_move(mv("e2", "e4"));

        let json = serde_json::to_string(&history).expect("Should serialize");
        let decoded: MoveHistory = serde_json::from_str(&json).expect("Should deserialize");

        assert_eq!(decoded, history);
    }
}
