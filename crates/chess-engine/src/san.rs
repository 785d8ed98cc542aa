//! Standard Algebraic Notation output.
//!
//! Only the base move text is produced here ("Nf3", "exd5", "e8=Q",
//! "O-O-O"); check and mate suffixes depend on the position after the move
//! and are appended by the game layer.

use crate::movegen::{generate_moves, MoveList};
use crate::position::Position;
use chess_core::{Move, MoveFlag, Piece};

/// Writes the SAN for a legal move of `position`.
///
/// Disambiguation follows the standard minimal rule: a file letter when the
/// file tells the candidates apart, else a rank digit, else both.
pub fn move_to_san(position: &Position, m: Move) -> String {
    match m.flag() {
        MoveFlag::CastleKingside => return "O-O".to_string(),
        MoveFlag::CastleQueenside => return "O-O-O".to_string(),
        _ => {}
    }

    let (from, to) = (m.from(), m.to());
    let (piece, _) = position
        .piece_at(from)
        .expect("SAN requested for a move with an empty origin square");

    let mut san = String::new();

    if piece != Piece::Pawn {
        san.push(piece.san_char());
        san.push_str(&disambiguation(position, m, piece));
    }

    if m.is_capture() {
        if piece == Piece::Pawn {
            san.push(from.file().to_char());
        }
        san.push('x');
    }

    san.push(to.file().to_char());
    san.push(to.rank().to_char());

    if let Some(promoted) = m.flag().promotion_piece() {
        san.push('=');
        san.push(promoted.san_char());
    }

    san
}

/// The minimal origin hint needed when several pieces of the same type can
/// legally reach the destination.
fn disambiguation(position: &Position, m: Move, piece: Piece) -> String {
    let mut moves = MoveList::new();
    generate_moves(position, &mut moves);

    let mut rivals = 0;
    let mut share_file = 0;
    let mut share_rank = 0;
    for &other in moves.as_slice() {
        if other.to() != m.to() || position.piece_type_on(position.turn(), other.from()) != Some(piece)
        {
            continue;
        }
        rivals += 1;
        if other.from().file() == m.from().file() {
            share_file += 1;
        }
        if other.from().rank() == m.from().rank() {
            share_rank += 1;
        }
    }

    // The move itself is counted once in each bucket.
    if rivals <= 1 {
        String::new()
    } else if share_file == 1 {
        m.from().file().to_char().to_string()
    } else if share_rank == 1 {
        m.from().rank().to_char().to_string()
    } else {
        format!("{}{}", m.from().file().to_char(), m.from().rank().to_char())
    }
}
