//! Perft: exhaustive move-tree leaf counting for generator validation.

use crate::movegen::{generate_moves, MoveList};
use crate::position::Position;

/// Counts leaf nodes of the legal move tree to `depth`.
///
/// Drives make/undo on the position in place; the position is unchanged
/// when this returns.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    generate_moves(position, &mut moves);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in moves.as_slice() {
        let undo = position.make_move(m);
        nodes += perft(position, depth - 1);
        position.undo_move(&undo);
    }
    nodes
}

/// Node count below each root move, sorted by coordinate notation.
///
/// The per-move split against a known-good engine pinpoints which root move
/// a perft mismatch hides under.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let mut moves = MoveList::new();
    generate_moves(position, &mut moves);

    let mut results = Vec::with_capacity(moves.len());
    for &m in moves.as_slice() {
        let undo = position.make_move(m);
        let nodes = if depth > 1 {
            perft(position, depth - 1)
        } else {
            1
        };
        position.undo_move(&undo);
        results.push((m.to_string(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
