//! Static evaluation: material, piece-square tables and passed pawns,
//! tapered between midgame and endgame by remaining material.

use crate::pst::{table_square, ENDGAME, MIDGAME, PST};
use chess_core::{Color, Piece};
use chess_engine::Position;

/// Piece values in centipawns, indexed by piece type.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Phase weight per piece type; a full board sums to [`MAX_PHASE`].
const PHASE_WEIGHTS: [i32; 6] = [0, 1, 1, 2, 4, 0];
const MAX_PHASE: i32 = 24;

const PASSED_PAWN_MID: i32 = 20;
const PASSED_PAWN_END: i32 = 40;

/// For each color and square, every square on the pawn's own and adjacent
/// files on ranks ahead of it.
const PASSED_MASKS: [[u64; 64]; 2] = passed_masks();

const fn passed_masks() -> [[u64; 64]; 2] {
    let mut table = [[0u64; 64]; 2];
    let mut sq = 0u8;
    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;

        let mut color = 0;
        while color < 2 {
            let mut mask = 0u64;
            let mut r = if color == 0 { rank + 1 } else { 0 };
            let r_end = if color == 0 { 8 } else { rank };
            while r < r_end {
                let mut f = file - 1;
                while f <= file + 1 {
                    if f >= 0 && f < 8 {
                        mask |= 1u64 << (r * 8 + f);
                    }
                    f += 1;
                }
                r += 1;
            }
            table[color][sq as usize] = mask;
            color += 1;
        }
        sq += 1;
    }
    table
}

/// Centipawn score from White's perspective.
///
/// Midgame and endgame components are blended by the phase of the game; the
/// phase is clamped at [`MAX_PHASE`], so promoted material cannot push the
/// taper past the pure-midgame end.
pub fn evaluate(position: &Position) -> i32 {
    let mut mg = 0i32;
    let mut eg = 0i32;
    let phase = game_phase(position).min(MAX_PHASE);

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };

        for piece in Piece::ALL {
            for sq in position.pieces[color.index()][piece.index()] {
                let entry = table_square(color, sq);
                mg += sign * (PIECE_VALUES[piece.index()] + PST[MIDGAME][piece.index()][entry]);
                eg += sign * (PIECE_VALUES[piece.index()] + PST[ENDGAME][piece.index()][entry]);

                if piece == Piece::Pawn && pawn_is_passed(position, color, sq.index()) {
                    mg += sign * PASSED_PAWN_MID;
                    eg += sign * PASSED_PAWN_END;
                }
            }
        }
    }

    (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE
}

fn game_phase(position: &Position) -> i32 {
    let mut phase = 0;
    for color in 0..2 {
        for piece in 0..6 {
            phase += position.pieces[color][piece].count() as i32 * PHASE_WEIGHTS[piece];
        }
    }
    phase
}

/// A pawn is passed when no enemy pawn sits ahead of it on its own or an
/// adjacent file.
fn pawn_is_passed(position: &Position, us: Color, sq: u8) -> bool {
    let their_pawns = position.pieces[us.opposite().index()][Piece::Pawn.index()].0;
    their_pawns & PASSED_MASKS[us.index()][sq as usize] == 0
}
