//! Foundational chess types shared by the engine and search crates.
//!
//! This crate deliberately contains no move generation or evaluation logic,
//! only the value types every layer agrees on:
//!
//! - [`Square`], [`File`], [`Rank`] - board coordinates
//! - [`Color`] and [`Piece`] - who and what
//! - [`Move`] - a move packed into 16 bits with its [`MoveFlag`] nibble
//! - [`Fen`] - the raw six-field FEN splitter and its [`FenError`]

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, Rank, Square};
