//! Immutable board snapshots
//!
//! A [`Position`] maps each of the 64 squares to an optional piece. It is
//! never mutated in place: [`Position::apply`] produces a fresh snapshot,
//! which keeps history replay and terminal-state simulation trivially safe.
//!
//! Off-board squares answer "empty" from every query here; the rules layer
//! independently rejects off-board destinations, so the two layers agree on
//! a single policy.

use crate::board::square::Square;
use crate::notation::Move;
use crate::pieces::{Army, Piece, PieceKind};

/// Piece placement for one point in a game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    squares: [Option<Piece>; 64],
}

impl Position {
    /// A board with no pieces on it
    pub fn empty() -> Position {
        Position {
            squares: [None; 64],
        }
    }

    /// The standard starting arrangement
    ///
    /// Back ranks run R N B Q K B N R from file a, pawns on each army's
    /// second row.
    pub fn starting() -> Position {
        use PieceKind::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut position = Position::empty();
        for (i, &kind) in back_rank.iter().enumerate() {
            let col = i as i8 + 1;
            position.put(Square::new(col, 1), Piece::new(kind, Army::White));
            position.put(Square::new(col, 8), Piece::new(kind, Army::Black));
            position.put(Square::new(col, 2), Piece::new(Pawn, Army::White));
            position.put(Square::new(col, 7), Piece::new(Pawn, Army::Black));
        }
        position
    }

    /// Build a position from explicit placements (test scaffolding and
    /// scenario setup)
    pub fn from_pieces(placements: &[(PieceKind, Army, Square)]) -> Position {
        let mut position = Position::empty();
        for &(kind, army, square) in placements {
            position.put(square, Piece::new(kind, army));
        }
        position
    }

    fn put(&mut self, square: Square, piece: Piece) {
        self.squares[square.index()] = Some(piece);
    }

    /// Piece on the given square; `None` for empty or off-board squares
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if !square.is_on_board() {
            return None;
        }
        self.squares[square.index()]
    }

    pub fn is_occupied(&self, square: Square) -> bool {
        self.piece_at(square).is_some()
    }

    /// Apply a move, producing the next snapshot
    ///
    /// Relocates the piece at `mv.from` to `mv.to`; whatever stood on the
    /// destination is removed. Legality has been established by the caller;
    /// this performs no checking of its own.
    pub fn apply(&self, mv: &Move) -> Position {
        let mut next = self.clone();
        next.squares[mv.to.index()] = next.squares[mv.from.index()].take();
        next
    }

    /// All occupied squares with their pieces
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(|(i, slot)| {
            slot.map(|piece| {
                let square = Square::new((i % 8) as i8 + 1, (i / 8) as i8 + 1);
                (square, piece)
            })
        })
    }

    /// Occupied squares belonging to one army
    pub fn pieces_of(&self, army: Army) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.army == army)
    }

    /// Square of the given army's king, if it is still on the board
    pub fn king_square(&self, army: Army) -> Option<Square> {
        self.pieces_of(army)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Total number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|slot| slot.is_some()).count()
    }

    /// Display grid: 8 rows of 8 symbols, rank 8 first, `.` for empty
    /// squares, uppercase White / lowercase Black. Pure projection.
    pub fn display_grid(&self) -> [[char; 8]; 8] {
        let mut grid = [['.'; 8]; 8];
        for (i, grid_row) in grid.iter_mut().enumerate() {
            let row = 8 - i as i8;
            for (j, cell) in grid_row.iter_mut().enumerate() {
                if let Some(piece) = self.piece_at(Square::new(j as i8 + 1, row)) {
                    *cell = piece.symbol();
                }
            }
        }
        grid
    }

    /// The display grid flattened to the 64-character wire form consumed by
    /// display collaborators
    pub fn projection(&self) -> String {
        self.display_grid().iter().flatten().collect()
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_piece_counts() {
        let position = Position::starting();

        let white = position.pieces_of(Army::White).count();
        let black = position.pieces_of(Army::Black).count();

        assert_eq!(white, 16, "Should have 16 white pieces");
        assert_eq!(black, 16, "Should have 16 black pieces");
        assert_eq!(position.piece_count(), 32);
    }

    #[test]
    fn test_starting_king_positions() {
        let position = Position::starting();

        assert_eq!(
            position.king_square(Army::White),
            Square::from_algebraic("e1"),
            "White king starts on e1"
        );
        assert_eq!(
            position.king_square(Army::Black),
            Square::from_algebraic("e8"),
            "Black king starts on e8"
        );
    }

    #[test]
    fn test_middle_ranks_start_empty() {
        let position = Position::starting();

        for row in 3..=6 {
            for col in 1..=8 {
                assert!(
                    !position.is_occupied(Square::new(col, row)),
                    "Square ({col}, {row}) should be empty at the start"
                );
            }
        }
    }

    #[test]
    fn test_off_board_queries_answer_empty() {
        let position = Position::starting();

        assert_eq!(position.piece_at(Square::new(0, 1)), None);
        assert_eq!(position.piece_at(Square::new(9, 9)), None);
        assert!(!position.is_occupied(Square::new(5, 0)));
    }

    #[test]
    fn test_apply_relocates_piece() {
        let position = Position::starting();
        let mv = Move::new(
            Square::from_algebraic("e2").unwrap(),
            Square::from_algebraic("e4").unwrap(),
        );

        let next = position.apply(&mv);

        assert!(
            !next.is_occupied(Square::from_algebraic("e2").unwrap()),
            "Origin empties after the move"
        );
        assert_eq!(
            next.piece_at(Square::from_algebraic("e4").unwrap()),
            Some(Piece::new(PieceKind::Pawn, Army::White)),
            "Destination holds the moved piece"
        );
        assert_eq!(
            position.piece_at(Square::from_algebraic("e2").unwrap()),
            Some(Piece::new(PieceKind::Pawn, Army::White)),
            "The prior snapshot is untouched"
        );
    }

    #[test]
    fn test_apply_capture_reduces_count_by_one() {
        let from = Square::from_algebraic("d4").unwrap();
        let to = Square::from_algebraic("e5").unwrap();
        let position = Position::from_pieces(&[
            (PieceKind::Pawn, Army::White, from),
            (PieceKind::Pawn, Army::Black, to),
        ]);

        let next = position.apply(&Move::capture(from, to));

        assert_eq!(next.piece_count(), 1, "Capture removes exactly one piece");
        assert_eq!(
            next.piece_at(to),
            Some(Piece::new(PieceKind::Pawn, Army::White))
        );
    }

    #[test]
    fn test_display_grid_starting_layout() {
        let grid = Position::starting().display_grid();

        assert_eq!(grid[0], ['r', 'n', 'b', 'q', 'k', 'b', 'n', 'r']);
        assert_eq!(grid[1], ['p'; 8]);
        assert_eq!(grid[4], ['.'; 8]);
        assert_eq!(grid[6], ['P'; 8]);
        assert_eq!(grid[7], ['R', 'N', 'B', 'Q', 'K', 'B', 'N', 'R']);
    }

    #[test]
    fn test_projection_starting_layout() {
        let projection = Position::starting().projection();

        assert_eq!(projection.len(), 64);
        assert_eq!(&projection[0..8], "rnbqkbnr", "Rank 8 prints first");
        assert_eq!(&projection[8..16], "pppppppp");
        assert_eq!(&projection[16..24], "........");
        assert_eq!(&projection[48..56], "PPPPPPPP");
        assert_eq!(&projection[56..64], "RNBQKBNR", "Rank 1 prints last");
    }
}
