//! Piece primitives
//!
//! The two armies, the six piece kinds, and the immutable piece value that
//! occupies a board square. Pieces never mutate; a captured piece is removed
//! from the position, not transformed.

use serde::{Deserialize, Serialize};

/// One of the two sides of a chess game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Army {
    White,
    Black,
}

impl Army {
    /// The opposing army
    pub fn other(self) -> Army {
        match self {
            Army::White => Army::Black,
            Army::Black => Army::White,
        }
    }

    /// Row this army's pawns start on
    pub fn pawn_row(self) -> i8 {
        match self {
            Army::White => 2,
            Army::Black => 7,
        }
    }

    /// Row delta of a forward pawn step for this army
    pub fn forward(self) -> i8 {
        match self {
            Army::White => 1,
            Army::Black => -1,
        }
    }
}

/// The six kinds of chess piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceKind {
    /// Notation symbol for this kind (`P R N B Q K`)
    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Inverse of [`symbol`](Self::symbol); `None` for unknown characters
    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        match symbol {
            'P' => Some(PieceKind::Pawn),
            'R' => Some(PieceKind::Rook),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// An immutable piece value: a kind fighting for an army
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub army: Army,
}

impl Piece {
    pub fn new(kind: PieceKind, army: Army) -> Piece {
        Piece { kind, army }
    }

    /// Display symbol: uppercase for White, lowercase for Black
    pub fn symbol(self) -> char {
        match self.army {
            Army::White => self.kind.symbol(),
            Army::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}
