//! Move notation
//!
//! A [`Move`] is a parsed, validated instruction: origin square, destination
//! square, capture flag. It is produced from compact text and doubles as the
//! storage document for game histories, so it carries serde derives.
//!
//! # Accepted shapes
//!
//! - `Pe2e4` - piece symbol, origin, destination
//! - `e2e4` - origin and destination; the kind is read off the board
//! - `Qh4` / `e4` - symbol (or bare pawn) and destination; the origin is
//!   inferred when exactly one piece of the moving army can reach it
//! - `Rah6` - as above with a file or rank disambiguator
//! - an optional `x` directly before the destination marks a capture
//!
//! Parsing stays on the syntactic side of the fence: it consults the
//! movement predicates only to infer an abbreviated origin, and it never
//! decides chess-rule legality. A well-formed move that breaks the rules is
//! a [`MoveError`](crate::error::MoveError) later, not a parse failure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Position, Square};
use crate::error::ParseError;
use crate::pieces::{Army, PieceKind};
use crate::rules::piece_moves;

/// A parsed move instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub is_capture: bool,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            is_capture: false,
        }
    }

    pub fn capture(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            is_capture: true,
        }
    }

    /// Parse move text against the current position for the moving army
    ///
    /// The army is needed for origin inference on abbreviated input; the
    /// caller derives it from history length.
    pub fn parse(text: &str, position: &Position, army: Army) -> Result<Move, ParseError> {
        let malformed = || ParseError::Malformed {
            notation: text.to_string(),
        };

        let chars: Vec<char> = text.trim().chars().collect();
        if chars.len() < 2 || chars.len() > 6 {
            return Err(malformed());
        }

        // Optional leading piece symbol. An uppercase letter here must be
        // one of the six known symbols.
        let (symbol_kind, body) = if chars[0].is_ascii_uppercase() {
            match PieceKind::from_symbol(chars[0]) {
                Some(kind) => (Some(kind), &chars[1..]),
                None => return Err(malformed()),
            }
        } else {
            (None, &chars[..])
        };

        // Optional capture marker, valid only directly before the
        // destination square.
        let mut body = body.to_vec();
        let explicit_capture = match body.iter().position(|&c| c == 'x') {
            Some(i) if i + 3 == body.len() => {
                body.remove(i);
                true
            }
            Some(_) => return Err(malformed()),
            None => false,
        };

        let mv = match body.len() {
            // Destination only: origin inferred.
            2 => {
                let to = parse_square(body[0], body[1], text)?;
                let kind = symbol_kind.unwrap_or(PieceKind::Pawn);
                let from = infer_origin(position, army, kind, to, None).ok_or_else(malformed)?;
                Move::new(from, to)
            }
            // Disambiguated destination: file or rank hint plus square.
            3 => {
                let to = parse_square(body[1], body[2], text)?;
                let kind = symbol_kind.unwrap_or(PieceKind::Pawn);
                let hint = OriginHint::from_char(body[0]).ok_or_else(malformed)?;
                let from =
                    infer_origin(position, army, kind, to, Some(hint)).ok_or_else(malformed)?;
                Move::new(from, to)
            }
            // Origin and destination spelled out.
            4 => {
                let from = parse_square(body[0], body[1], text)?;
                let to = parse_square(body[2], body[3], text)?;
                if from == to {
                    return Err(malformed());
                }
                Move::new(from, to)
            }
            _ => return Err(malformed()),
        };

        let captures_opponent = position
            .piece_at(mv.to)
            .is_some_and(|target| target.army != army);

        Ok(Move {
            is_capture: explicit_capture || captures_opponent,
            ..mv
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_capture {
            write!(f, "{}x{}", self.from, self.to)
        } else {
            write!(f, "{}{}", self.from, self.to)
        }
    }
}

/// File or rank disambiguator in abbreviated notation
#[derive(Clone, Copy)]
enum OriginHint {
    File(i8),
    Rank(i8),
}

impl OriginHint {
    fn from_char(c: char) -> Option<OriginHint> {
        match c {
            'a'..='h' => Some(OriginHint::File(c as i8 - 'a' as i8 + 1)),
            '1'..='8' => Some(OriginHint::Rank(c as i8 - '1' as i8 + 1)),
            _ => None,
        }
    }

    fn matches(self, square: Square) -> bool {
        match self {
            OriginHint::File(col) => square.col == col,
            OriginHint::Rank(row) => square.row == row,
        }
    }
}

/// Parse one algebraic square, distinguishing malformed text from
/// coordinates that miss the 8x8 grid
fn parse_square(file: char, rank: char, notation: &str) -> Result<Square, ParseError> {
    if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
        return Err(ParseError::Malformed {
            notation: notation.to_string(),
        });
    }
    Square::from_algebraic(&format!("{file}{rank}")).ok_or(ParseError::OutOfBoard {
        square: format!("{file}{rank}"),
    })
}

/// Find the single origin from which a piece of the given kind could make
/// this move; `None` when no piece qualifies or the choice is ambiguous
fn infer_origin(
    position: &Position,
    army: Army,
    kind: PieceKind,
    to: Square,
    hint: Option<OriginHint>,
) -> Option<Square> {
    let mut candidates = position
        .pieces_of(army)
        .filter(|(_, piece)| piece.kind == kind)
        .map(|(square, _)| square)
        .filter(|&square| hint.map_or(true, |h| h.matches(square)))
        .filter(|&square| piece_moves::is_valid_move(kind, army, square, to, position));

    let origin = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }
    Some(origin)
}
