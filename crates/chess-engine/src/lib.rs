//! Bitboard chess engine core.
//!
//! The crate models a legal chess position and everything needed to drive a
//! game or a search on top of it:
//!
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - piece bitboards with occupancy caches, FEN round-trip,
//!   Zobrist hashing and in-place make/undo via [`UndoState`]
//! - [`generate_moves`] - strictly legal move generation into a
//!   caller-owned [`MoveList`]; sliding attacks come from magic-bitboard
//!   tables with a deduplicated attack pool
//! - [`Game`] - history wrapper with repetition and 50-move draw detection
//! - [`move_to_san`] / [`import_game`] - SAN output and PGN movetext import
//! - [`perft`] / [`perft_divide`] - move-count validation
//!
//! All shared tables (leaper attacks, magic tables, Zobrist keys) are
//! immutable process-wide state, const-initialized or built exactly once
//! before first use. The engine itself is single-threaded and synchronous:
//! a [`Position`] is mutated in place and never shared across make/undo.

mod attacks;
mod bitboard;
mod game;
mod movegen;
mod perft;
mod pgn;
mod position;
mod san;
mod zobrist;

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
pub use bitboard::Bitboard;
pub use game::Game;
pub use movegen::{generate_moves, MoveList};
pub use perft::{perft, perft_divide};
pub use pgn::import_game;
pub use position::{CastlingRights, Position, UndoState};
pub use san::move_to_san;
