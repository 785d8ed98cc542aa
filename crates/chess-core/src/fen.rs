//! FEN (Forsyth-Edwards Notation) field parsing.
//!
//! [`Fen`] splits and validates the six FEN fields; turning the fields into
//! an actual board is the engine's job, so this layer stays purely textual.

use thiserror::Error;

/// Reasons a FEN string is rejected. Every variant is malformed input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    PiecePlacement(String),

    #[error("bad side to move '{0}', expected 'w' or 'b'")]
    SideToMove(String),

    #[error("bad castling field: {0}")]
    Castling(String),

    #[error("bad en passant square: {0}")]
    EnPassant(String),

    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("bad fullmove number: {0}")]
    FullmoveNumber(String),
}

/// The six validated fields of a FEN string.
///
/// Field contents are kept as text (plus the two parsed counters); the
/// engine maps them onto bitboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Rank-by-rank piece placement, rank 8 first (e.g. "rnbqkbnr/ppp...").
    pub placement: String,
    /// 'w' or 'b'.
    pub side_to_move: char,
    /// Castling availability ("KQkq", a subset, or "-").
    pub castling: String,
    /// En passant target square ("e3", "d6", or "-").
    pub en_passant: String,
    /// Plies since the last pawn move or capture.
    pub halfmove_clock: u32,
    /// Fullmove counter, starting at 1.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Splits and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        check_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => 'w',
            "b" => 'b',
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        check_castling(fields[2])?;
        check_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u32>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;
        let fullmove_number = fields[5]
            .parse::<u32>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            placement: fields[0].to_string(),
            side_to_move,
            castling: fields[2].to_string(),
            en_passant: fields[3].to_string(),
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn check_placement(placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::PiecePlacement(format!(
            "{} ranks, expected 8",
            ranks.len()
        )));
    }

    for (i, rank) in ranks.iter().enumerate() {
        let mut squares = 0u32;
        for c in rank.chars() {
            if let Some(d) = c.to_digit(10) {
                squares += d;
            } else if "pnbrqkPNBRQK".contains(c) {
                squares += 1;
            } else {
                return Err(FenError::PiecePlacement(format!(
                    "unknown character '{}' in rank {}",
                    c,
                    8 - i
                )));
            }
        }
        if squares != 8 {
            return Err(FenError::PiecePlacement(format!(
                "rank {} covers {} squares",
                8 - i,
                squares
            )));
        }
    }

    Ok(())
}

fn check_castling(castling: &str) -> Result<(), FenError> {
    if castling == "-" {
        return Ok(());
    }
    if castling.is_empty() || castling.chars().any(|c| !"KQkq".contains(c)) {
        return Err(FenError::Castling(castling.to_string()));
    }
    Ok(())
}

fn check_en_passant(ep: &str) -> Result<(), FenError> {
    if ep == "-" {
        return Ok(());
    }
    let bytes = ep.as_bytes();
    let ok = bytes.len() == 2
        && (b'a'..=b'h').contains(&bytes[0])
        && (bytes[1] == b'3' || bytes[1] == b'6');
    if ok {
        Ok(())
    } else {
        Err(FenError::EnPassant(ep.to_string()))
    }
}
