//! Position representation: bitboards, FEN round-trip, attack queries and
//! incremental make/undo.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::zobrist::ZOBRIST;
use crate::Bitboard;
use chess_core::{Color, Fen, FenError, Move, MoveFlag, Piece, Square};

/// Castling availability as a 4-bit mask: WK = 1, WQ = 2, BK = 4, BQ = 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    /// Builds rights from the low four bits of `mask`.
    #[inline]
    pub const fn new(mask: u8) -> Self {
        CastlingRights(mask & 0b1111)
    }

    /// The raw 4-bit mask.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// True if `color` may still castle kingside.
    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        let bit = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        self.0 & bit != 0
    }

    /// True if `color` may still castle queenside.
    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        let bit = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        self.0 & bit != 0
    }

    /// Drops both rights of `color`.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let bits = match color {
            Color::White => Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE,
        };
        self.0 &= !bits;
    }

    /// Drops the kingside right of `color`.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let bit = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        self.0 &= !bit;
    }

    /// Drops the queenside right of `color`.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let bit = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        self.0 &= !bit;
    }
}

/// Everything [`Position::make_move`] destroys and [`Position::undo_move`]
/// needs to restore the position bit for bit.
#[derive(Debug, Clone)]
pub struct UndoState {
    mov: Move,
    moved: Piece,
    captured: Option<Piece>,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
}

impl UndoState {
    /// The move this state undoes.
    #[inline]
    pub fn mov(&self) -> Move {
        self.mov
    }
}

/// A chess position.
///
/// Piece placement lives in twelve bitboards indexed by color and piece
/// type. The per-color occupancy unions and their combined union are caches
/// kept in sync incrementally by make/undo; they are valid after every
/// completed call, never stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece bitboards by `[color][piece type]`.
    pub pieces: [[Bitboard; 6]; 2],
    /// Union of each color's piece bitboards.
    pub occupancy: [Bitboard; 2],
    /// Union of both occupancies.
    pub all_occupancy: Bitboard,
    /// Castling availability.
    pub castling_rights: CastlingRights,
    /// Square behind a pawn that just double-pushed, if any.
    pub en_passant: Option<Square>,
    /// Plies since the last pawn move or capture (50-move rule).
    pub halfmove_clock: u32,
    /// Plies since the start of the game; the side to move is `ply & 1`.
    pub ply: u32,
}

impl Position {
    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("the standard starting FEN parses")
    }

    /// Builds a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = Fen::parse(fen)?;

        let mut position = Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            all_occupancy: Bitboard::EMPTY,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: fen.halfmove_clock,
            ply: 0,
        };

        for (rank_index, rank) in fen.placement.split('/').enumerate() {
            let rank_base = (7 - rank_index as u8) * 8;
            let mut file = 0u8;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    // SAFETY: the FEN validator bounds every rank to 8 squares.
                    let sq = unsafe { Square::from_index_unchecked(rank_base + file) };
                    position.pieces[color.index()][piece.index()] |= Bitboard::from_square(sq);
                    file += 1;
                }
            }
        }

        let mut rights = 0u8;
        for c in fen.castling.chars() {
            match c {
                'K' => rights |= CastlingRights::WHITE_KINGSIDE,
                'Q' => rights |= CastlingRights::WHITE_QUEENSIDE,
                'k' => rights |= CastlingRights::BLACK_KINGSIDE,
                'q' => rights |= CastlingRights::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        position.castling_rights = CastlingRights::new(rights);

        if fen.en_passant != "-" {
            position.en_passant = Square::from_algebraic(&fen.en_passant);
        }

        position.ply = fen.fullmove_number.saturating_sub(1) * 2
            + if fen.side_to_move == 'b' { 1 } else { 0 };

        position.compute_occupancy();
        Ok(position)
    }

    /// Emits the canonical FEN string; exact inverse of [`Position::from_fen`]
    /// for legal positions.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                // SAFETY: rank and file are both below 8.
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                match self.piece_at(sq) {
                    Some((piece, color)) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if self.turn() == Color::White { 'w' } else { 'b' });

        fen.push(' ');
        if self.castling_rights.raw() == 0 {
            fen.push('-');
        } else {
            if self.castling_rights.kingside(Color::White) {
                fen.push('K');
            }
            if self.castling_rights.queenside(Color::White) {
                fen.push('Q');
            }
            if self.castling_rights.kingside(Color::Black) {
                fen.push('k');
            }
            if self.castling_rights.queenside(Color::Black) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number().to_string());

        fen
    }

    /// Side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        Color::from_ply(self.ply)
    }

    /// Fullmove counter as FEN reports it.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply / 2 + 1
    }

    /// Piece and color on a square, if occupied.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in [Color::White, Color::Black] {
            if let Some(piece) = self.piece_type_on(color, sq) {
                return Some((piece, color));
            }
        }
        None
    }

    /// Piece type of `color` on a square, if any.
    #[inline]
    pub fn piece_type_on(&self, color: Color, sq: Square) -> Option<Piece> {
        if !self.occupancy[color.index()].contains(sq) {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()].contains(sq))
    }

    /// The square of `us`'s king.
    ///
    /// # Panics
    /// Panics if that side has no king; positions always carry exactly one
    /// king per side.
    #[inline]
    pub fn king_square(&self, us: Color) -> Square {
        self.pieces[us.index()][Piece::King.index()]
            .lsb()
            .expect("exactly one king per side")
    }

    /// Zobrist hash of the position.
    ///
    /// The en-passant file key is folded in whenever the square is set, even
    /// when no pawn could actually capture there; repetition counting relies
    /// on this exact convention.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0u64;

        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                for sq in self.pieces[color.index()][piece.index()] {
                    hash ^= ZOBRIST.pieces[color.index()][piece.index()][sq.index() as usize];
                }
            }
        }

        hash ^= ZOBRIST.castling[self.castling_rights.raw() as usize];

        if let Some(sq) = self.en_passant {
            hash ^= ZOBRIST.en_passant_file[sq.file().index() as usize];
        }

        if self.turn() == Color::Black {
            hash ^= ZOBRIST.black_to_move;
        }

        hash
    }

    /// Rebuilds the occupancy caches from the piece bitboards. Idempotent;
    /// make/undo keep the caches current on their own.
    pub fn compute_occupancy(&mut self) {
        for color in 0..2 {
            self.occupancy[color] = Bitboard::EMPTY;
            for piece in 0..6 {
                self.occupancy[color] |= self.pieces[color][piece];
            }
        }
        self.all_occupancy = self.occupancy[0] | self.occupancy[1];
    }

    /// Checks the structural invariants: exactly one king per side, pairwise
    /// disjoint piece bitboards, occupancy caches matching their unions.
    pub fn validate_occupancy(&self) -> bool {
        if self.pieces[0][Piece::King.index()].count() != 1
            || self.pieces[1][Piece::King.index()].count() != 1
        {
            return false;
        }

        let mut unions = [Bitboard::EMPTY; 2];
        for color in 0..2 {
            for piece in 0..6 {
                if (unions[color] & self.pieces[color][piece]).any() {
                    return false;
                }
                unions[color] |= self.pieces[color][piece];
            }
        }

        (unions[0] & unions[1]).is_empty()
            && self.occupancy == unions
            && self.all_occupancy == (unions[0] | unions[1])
    }

    /// True if the opponent of `us` attacks `sq`.
    pub fn square_attacked(&self, us: Color, sq: Square) -> bool {
        let them = us.opposite();
        let their = &self.pieces[them.index()];

        if (pawn_attacks(sq, us) & their[Piece::Pawn.index()]).any() {
            return true;
        }
        if (knight_attacks(sq) & their[Piece::Knight.index()]).any() {
            return true;
        }
        if (king_attacks(sq) & their[Piece::King.index()]).any() {
            return true;
        }

        let diag = bishop_attacks(sq, self.all_occupancy);
        if (diag & (their[Piece::Bishop.index()] | their[Piece::Queen.index()])).any() {
            return true;
        }

        let ortho = rook_attacks(sq, self.all_occupancy);
        (ortho & (their[Piece::Rook.index()] | their[Piece::Queen.index()])).any()
    }

    /// The subset of `mask` attacked by the opponent of `us`.
    pub fn attacked_squares(&self, us: Color, mask: Bitboard) -> Bitboard {
        let mut attacked = Bitboard::EMPTY;
        for sq in mask {
            if self.square_attacked(us, sq) {
                attacked |= Bitboard::from_square(sq);
            }
        }
        attacked
    }

    /// True if `us`'s king is in check.
    #[inline]
    pub fn king_checked(&self, us: Color) -> bool {
        self.square_attacked(us, self.king_square(us))
    }

    /// Applies a legal move in place and returns the state needed to take it
    /// back. Occupancy caches are valid when this returns.
    pub fn make_move(&mut self, m: Move) -> UndoState {
        let us = self.turn();
        let them = us.opposite();
        let (from, to, flag) = (m.from(), m.to(), m.flag());

        let moved = self
            .piece_type_on(us, from)
            .expect("make_move: no piece on the origin square");
        let captured = if flag == MoveFlag::EnPassant {
            Some(Piece::Pawn)
        } else if flag.is_capture() {
            Some(
                self.piece_type_on(them, to)
                    .expect("make_move: capture flag with an empty destination"),
            )
        } else {
            None
        };

        let undo = UndoState {
            mov: m,
            moved,
            captured,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        };

        self.remove_piece(us, moved, from);
        match flag {
            MoveFlag::CastleKingside => {
                self.add_piece(us, Piece::King, to);
                let (rook_from, rook_to) = match us {
                    Color::White => (Square::H1, Square::F1),
                    Color::Black => (Square::H8, Square::F8),
                };
                self.remove_piece(us, Piece::Rook, rook_from);
                self.add_piece(us, Piece::Rook, rook_to);
            }
            MoveFlag::CastleQueenside => {
                self.add_piece(us, Piece::King, to);
                let (rook_from, rook_to) = match us {
                    Color::White => (Square::A1, Square::D1),
                    Color::Black => (Square::A8, Square::D8),
                };
                self.remove_piece(us, Piece::Rook, rook_from);
                self.add_piece(us, Piece::Rook, rook_to);
            }
            MoveFlag::EnPassant => {
                self.add_piece(us, Piece::Pawn, to);
                self.remove_piece(them, Piece::Pawn, en_passant_victim(us, to));
            }
            _ => {
                if let Some(victim) = captured {
                    self.remove_piece(them, victim, to);
                }
                self.add_piece(us, flag.promotion_piece().unwrap_or(moved), to);
            }
        }

        self.en_passant = if flag == MoveFlag::DoublePush {
            // The skipped square sits halfway between origin and destination.
            Some(unsafe { Square::from_index_unchecked((from.index() + to.index()) / 2) })
        } else {
            None
        };

        if moved == Piece::King {
            self.castling_rights.remove_color(us);
        } else if moved == Piece::Rook {
            match from {
                Square::A1 => self.castling_rights.remove_queenside(Color::White),
                Square::H1 => self.castling_rights.remove_kingside(Color::White),
                Square::A8 => self.castling_rights.remove_queenside(Color::Black),
                Square::H8 => self.castling_rights.remove_kingside(Color::Black),
                _ => {}
            }
        }
        if flag.is_capture() {
            // A rook taken on its home square removes that right too.
            match to {
                Square::A1 => self.castling_rights.remove_queenside(Color::White),
                Square::H1 => self.castling_rights.remove_kingside(Color::White),
                Square::A8 => self.castling_rights.remove_queenside(Color::Black),
                Square::H8 => self.castling_rights.remove_kingside(Color::Black),
                _ => {}
            }
        }

        if moved == Piece::Pawn || flag.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.ply += 1;
        undo
    }

    /// Reverts the move recorded in `undo`, restoring the position bit for
    /// bit. The ply is decremented first so `turn()` names the mover again.
    pub fn undo_move(&mut self, undo: &UndoState) {
        self.ply -= 1;
        let us = self.turn();
        let them = us.opposite();

        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;

        let (from, to, flag) = (undo.mov.from(), undo.mov.to(), undo.mov.flag());
        match flag {
            MoveFlag::CastleKingside => {
                self.remove_piece(us, Piece::King, to);
                self.add_piece(us, Piece::King, from);
                let (rook_from, rook_to) = match us {
                    Color::White => (Square::H1, Square::F1),
                    Color::Black => (Square::H8, Square::F8),
                };
                self.remove_piece(us, Piece::Rook, rook_to);
                self.add_piece(us, Piece::Rook, rook_from);
            }
            MoveFlag::CastleQueenside => {
                self.remove_piece(us, Piece::King, to);
                self.add_piece(us, Piece::King, from);
                let (rook_from, rook_to) = match us {
                    Color::White => (Square::A1, Square::D1),
                    Color::Black => (Square::A8, Square::D8),
                };
                self.remove_piece(us, Piece::Rook, rook_to);
                self.add_piece(us, Piece::Rook, rook_from);
            }
            MoveFlag::EnPassant => {
                self.remove_piece(us, Piece::Pawn, to);
                self.add_piece(us, Piece::Pawn, from);
                self.add_piece(them, Piece::Pawn, en_passant_victim(us, to));
            }
            _ => {
                self.remove_piece(us, flag.promotion_piece().unwrap_or(undo.moved), to);
                self.add_piece(us, undo.moved, from);
                if let Some(victim) = undo.captured {
                    self.add_piece(them, victim, to);
                }
            }
        }
    }

    #[inline]
    fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        debug_assert!(!self.all_occupancy.contains(sq));
        self.pieces[color.index()][piece.index()] |= bb;
        self.occupancy[color.index()] |= bb;
        self.all_occupancy |= bb;
    }

    #[inline]
    fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        debug_assert!(self.pieces[color.index()][piece.index()].contains(sq));
        self.pieces[color.index()][piece.index()] ^= bb;
        self.occupancy[color.index()] ^= bb;
        self.all_occupancy ^= bb;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
pub(crate) fn en_passant_victim(us: Color, to: Square) -> Square {
    let index = match us {
        Color::White => to.index() - 8,
        Color::Black => to.index() + 8,
    };
    // SAFETY: en-passant destinations are on ranks 3 and 6.
    unsafe { Square::from_index_unchecked(index) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fen_roundtrip() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), Fen::STARTPOS);
        assert_eq!(pos.turn(), Color::White);
        assert_eq!(pos.fullmove_number(), 1);
        assert!(pos.validate_occupancy());
    }

    #[test]
    fn fen_roundtrip_midgame() {
        let fens = [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "8/8/8/8/8/8/8/R3K2k w Q - 99 51",
        ];
        for fen in fens {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
            assert!(pos.validate_occupancy(), "{fen}");
        }
    }

    #[test]
    fn from_fen_rejects_garbage() {
        assert!(Position::from_fen("not a fen").is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPZPPP/RNBQKBNR w KQkq - 0 1")
            .is_err());
        assert!(Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1")
            .is_err());
    }

    #[test]
    fn ply_encodes_side_and_fullmove() {
        let black = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
            .unwrap();
        assert_eq!(black.ply, 1);
        assert_eq!(black.turn(), Color::Black);

        let later =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 13").unwrap();
        assert_eq!(later.ply, 24);
        assert_eq!(later.fullmove_number(), 13);
    }

    #[test]
    fn piece_lookup() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(sq("d8")), Some((Piece::Queen, Color::Black)));
        assert_eq!(pos.piece_at(sq("e4")), None);
    }

    #[test]
    fn occupancy_recompute_is_idempotent() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        pos.compute_occupancy();
        pos.compute_occupancy();
        assert_eq!(pos, before);
    }

    #[test]
    fn attack_queries_startpos() {
        let pos = Position::startpos();
        // White pawns on d2/f2 cover e3; nothing of Black's reaches it.
        assert!(pos.square_attacked(Color::Black, sq("e3")));
        assert!(!pos.square_attacked(Color::White, sq("e3")));
        assert!(!pos.king_checked(Color::White));
        assert!(!pos.king_checked(Color::Black));
    }

    #[test]
    fn attacked_squares_filters_mask() {
        let pos = Position::from_fen("4k3/8/8/8/7b/8/8/4K3 w - - 0 1").unwrap();
        let mask = Bitboard::from_square(Square::E1)
            | Bitboard::from_square(Square::F1)
            | Bitboard::from_square(Square::G1);
        // The h4 bishop rakes d8..e1; of the mask only e1 is hit.
        assert_eq!(
            pos.attacked_squares(Color::White, mask),
            Bitboard::from_square(Square::E1)
        );
    }

    #[test]
    fn make_move_quiet_and_capture() {
        let mut pos = Position::startpos();
        let undo = pos.make_move(Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush));
        assert_eq!(pos.turn(), Color::Black);
        assert_eq!(pos.en_passant, Some(sq("e3")));
        assert_eq!(pos.halfmove_clock, 0);
        assert!(pos.validate_occupancy());

        pos.undo_move(&undo);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn make_undo_restores_bit_for_bit() {
        // One move of every flavor: quiet, capture, double push, en passant,
        // both castles, promotion, capture-promotion.
        let cases = [
            (Fen::STARTPOS, Move::quiet(sq("g1"), sq("f3"))),
            (
                "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                Move::new(sq("e4"), sq("d5"), MoveFlag::Capture),
            ),
            (
                "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
                Move::new(sq("e4"), sq("e5"), MoveFlag::Quiet),
            ),
            (
                "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
                Move::new(sq("e5"), sq("f6"), MoveFlag::EnPassant),
            ),
            (
                "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1",
                Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside),
            ),
            (
                "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R b KQkq - 0 1",
                Move::new(Square::E8, Square::C8, MoveFlag::CastleQueenside),
            ),
            (
                "8/P6k/8/8/8/8/8/K7 w - - 0 1",
                Move::new(sq("a7"), sq("a8"), MoveFlag::PromoteQueen),
            ),
            (
                "1n5k/P7/8/8/8/8/8/K7 w - - 0 1",
                Move::new(sq("a7"), sq("b8"), MoveFlag::PromoteKnightCapture),
            ),
        ];

        for (fen, m) in cases {
            let mut pos = Position::from_fen(fen).unwrap();
            let original = pos.clone();
            let hash = pos.zobrist_hash();

            let undo = pos.make_move(m);
            assert!(pos.validate_occupancy(), "after make {m:?} on {fen}");
            assert_ne!(pos.zobrist_hash(), hash, "hash must change: {m:?}");

            pos.undo_move(&undo);
            assert_eq!(pos, original, "undo of {m:?} on {fen}");
            assert_eq!(pos.zobrist_hash(), hash);
        }
    }

    #[test]
    fn castling_moves_the_rook() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        pos.make_move(Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside));
        assert_eq!(pos.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(pos.piece_at(Square::H1), None);
        assert!(!pos.castling_rights.kingside(Color::White));
        assert!(!pos.castling_rights.queenside(Color::White));
        assert!(pos.castling_rights.kingside(Color::Black));
    }

    #[test]
    fn rook_moves_and_captures_drop_rights() {
        let mut pos =
            Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        pos.make_move(Move::quiet(Square::A1, Square::B1));
        assert!(!pos.castling_rights.queenside(Color::White));
        assert!(pos.castling_rights.kingside(Color::White));

        let mut pos =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make_move(Move::new(Square::A1, Square::A8, MoveFlag::Capture));
        assert!(!pos.castling_rights.queenside(Color::Black));
        assert!(pos.castling_rights.kingside(Color::Black));
    }

    #[test]
    fn en_passant_capture_removes_the_pawn_behind() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        pos.make_move(Move::new(sq("e5"), sq("f6"), MoveFlag::EnPassant));
        assert_eq!(pos.piece_at(sq("f6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq("f5")), None);
        assert_eq!(pos.en_passant, None);
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_and_capture_only() {
        let mut pos = Position::from_fen(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 5 4",
        )
        .unwrap();
        let undo = pos.make_move(Move::quiet(sq("g1"), sq("f3")));
        assert_eq!(pos.halfmove_clock, 6);
        pos.undo_move(&undo);

        pos.make_move(Move::new(sq("e4"), sq("d5"), MoveFlag::Capture));
        assert_eq!(pos.halfmove_clock, 0);
    }

    #[test]
    fn hash_invariant_under_make_undo_sequences() {
        let mut pos = Position::startpos();
        let hash = pos.zobrist_hash();
        let moves = [
            Move::new(sq("e2"), sq("e4"), MoveFlag::DoublePush),
            Move::new(sq("e7"), sq("e5"), MoveFlag::DoublePush),
            Move::quiet(sq("g1"), sq("f3")),
            Move::quiet(sq("b8"), sq("c6")),
        ];
        let mut undos = Vec::new();
        for m in moves {
            undos.push(pos.make_move(m));
        }
        for undo in undos.iter().rev() {
            pos.undo_move(undo);
        }
        assert_eq!(pos.zobrist_hash(), hash);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn hash_depends_on_side_castling_and_ep() {
        let base = Position::startpos().zobrist_hash();

        let black_to_move =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
                .unwrap()
                .zobrist_hash();
        assert_ne!(base, black_to_move);

        let no_castling =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1")
                .unwrap()
                .zobrist_hash();
        assert_ne!(base, no_castling);

        // The ep key is hashed whenever the square is set, capturable or not.
        let with_ep =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        let mut without_ep = with_ep.clone();
        without_ep.en_passant = None;
        assert_ne!(with_ep.zobrist_hash(), without_ep.zobrist_hash());
    }

    #[test]
    fn halfmove_clock_survives_fen_roundtrip_above_fifty() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 120 80").unwrap();
        assert_eq!(pos.halfmove_clock, 120);
        assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/R3K2k w Q - 120 80");
    }
}
