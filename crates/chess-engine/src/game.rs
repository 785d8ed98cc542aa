//! Game history wrapper around [`Position`].
//!
//! A [`Game`] owns one position mutated in place, the undo arena needed to
//! walk back through the played moves, and a Zobrist-hash multiset that
//! makes threefold-repetition detection a map lookup. Draw detection (the
//! 50-move rule and repetition) lives here because it needs history the
//! bare position does not keep.

use crate::movegen::{generate_moves, MoveList};
use crate::position::{Position, UndoState};
use crate::san::move_to_san;
use chess_core::{FenError, Move};
use std::collections::HashMap;

struct HistoryEntry {
    undo: UndoState,
    mov: Move,
}

/// A full game: position, move history and repetition bookkeeping.
pub struct Game {
    /// The current position. Mutated in place by make/undo.
    pub position: Position,
    history: Vec<HistoryEntry>,
    /// Occurrence count per position hash, the current position included.
    repetitions: HashMap<u64, u32>,
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// A game starting from an arbitrary FEN.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    fn from_position(position: Position) -> Self {
        let mut repetitions = HashMap::new();
        repetitions.insert(position.zobrist_hash(), 1);
        Game {
            position,
            history: Vec::new(),
            repetitions,
        }
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        generate_moves(&self.position, &mut moves);
        moves
    }

    /// True if the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.position.king_checked(self.position.turn())
    }

    /// Plays a move. The move must come from [`Game::legal_moves`]; this is
    /// the search hot path and performs no legality re-check.
    pub fn make_move(&mut self, m: Move) {
        let undo = self.position.make_move(m);
        self.history.push(HistoryEntry { undo, mov: m });
        *self
            .repetitions
            .entry(self.position.zobrist_hash())
            .or_insert(0) += 1;
    }

    /// Takes back the last played move. Does nothing on an empty history.
    pub fn undo_move(&mut self) {
        let Some(entry) = self.history.pop() else {
            return;
        };

        let hash = self.position.zobrist_hash();
        if let Some(count) = self.repetitions.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&hash);
            }
        }

        self.position.undo_move(&entry.undo);
    }

    /// Forgets the game and returns to the standard starting position.
    pub fn reset(&mut self) {
        self.position = Position::startpos();
        self.history.clear();
        self.repetitions.clear();
        self.repetitions.insert(self.position.zobrist_hash(), 1);
    }

    /// True if the game is drawn by the 50-move rule (100 plies without a
    /// pawn move or capture) or by threefold repetition.
    pub fn is_draw(&self) -> bool {
        if self.position.halfmove_clock >= 100 {
            return true;
        }
        self.repetitions
            .get(&self.position.zobrist_hash())
            .is_some_and(|&count| count >= 3)
    }

    /// How often the current position has occurred, itself included.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.position.zobrist_hash())
            .copied()
            .unwrap_or(0)
    }

    /// Number of plies played since the game was created.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// The played moves, oldest first.
    pub fn moves(&self) -> impl ExactSizeIterator<Item = Move> + '_ {
        self.history.iter().map(|entry| entry.mov)
    }

    /// SAN for a legal move of the current position, with the `+` / `#`
    /// suffix the position after the move calls for.
    pub fn san(&self, m: Move) -> String {
        let mut san = move_to_san(&self.position, m);

        let mut after = self.position.clone();
        after.make_move(m);
        if after.king_checked(after.turn()) {
            let mut replies = MoveList::new();
            generate_moves(&after, &mut replies);
            san.push(if replies.is_empty() { '#' } else { '+' });
        }

        san
    }

    /// Finds the legal move whose SAN matches `token`. Check and mate
    /// suffixes on the token are ignored.
    pub fn find_san(&self, token: &str) -> Option<Move> {
        let token = token.trim_end_matches(['+', '#']);
        self.legal_moves()
            .as_slice()
            .iter()
            .copied()
            .find(|&m| move_to_san(&self.position, m) == token)
    }

    /// Resolves a SAN token and plays it, returning the move, or `None` if
    /// no legal move matches.
    pub fn make_move_san(&mut self, token: &str) -> Option<Move> {
        let m = self.find_san(token)?;
        self.make_move(m);
        Some(m)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game() {
        let game = Game::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.legal_moves().len(), 20);
        assert!(!game.is_check());
        assert!(!game.is_draw());
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn make_and_undo_track_history() {
        let mut game = Game::new();
        let e4 = game.make_move_san("e4").unwrap();
        game.make_move_san("e5").unwrap();
        assert_eq!(game.ply_count(), 2);
        assert_eq!(game.moves().next(), Some(e4));

        game.undo_move();
        game.undo_move();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.position, Position::startpos());

        // Extra undo is a no-op.
        game.undo_move();
        assert_eq!(game.ply_count(), 0);
    }

    #[test]
    fn knight_shuffle_repetition_draw() {
        let mut game = Game::new();
        for token in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(token).unwrap();
        }
        // Start position seen twice; not yet a draw.
        assert_eq!(game.repetition_count(), 2);
        assert!(!game.is_draw());

        for token in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(token).unwrap();
        }
        assert_eq!(game.repetition_count(), 3);
        assert!(game.is_draw());
    }

    #[test]
    fn undo_unwinds_repetition_counts() {
        let mut game = Game::new();
        for token in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"] {
            game.make_move_san(token).unwrap();
        }
        assert!(game.is_draw());
        game.undo_move();
        assert!(!game.is_draw());
        game.make_move_san("Ng8").unwrap();
        assert!(game.is_draw());
    }

    #[test]
    fn fifty_move_rule() {
        let game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 100 70").unwrap();
        assert!(game.is_draw());

        let mut game = Game::from_fen("8/8/8/8/8/8/8/R3K2k w Q - 99 70").unwrap();
        assert!(!game.is_draw());
        // A quiet rook move ticks the clock over the line.
        let m = game.find_san("Ra2").unwrap();
        game.make_move(m);
        assert!(game.is_draw());
    }

    #[test]
    fn reset_restores_the_start() {
        let mut game = Game::new();
        game.make_move_san("e4").unwrap();
        game.make_move_san("c5").unwrap();
        game.reset();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.position, Position::startpos());
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn san_check_and_mate_suffixes() {
        // Fool's mate: Qh4 is mate.
        let mut game = Game::new();
        for token in ["f3", "e5", "g4"] {
            game.make_move_san(token).unwrap();
        }
        let mate = game.find_san("Qh4").unwrap();
        assert_eq!(game.san(mate), "Qh4#");

        // A plain check gets a plus.
        let mut game = Game::from_fen("4k3/8/8/8/8/8/8/4KR2 w - - 0 1").unwrap();
        let check = game.find_san("Rf8").unwrap();
        assert_eq!(game.san(check), "Rf8+");
    }

    #[test]
    fn find_san_ignores_suffixes_and_rejects_garbage() {
        let mut game = Game::new();
        for token in ["f3", "e5", "g4"] {
            game.make_move_san(token).unwrap();
        }
        assert!(game.find_san("Qh4#").is_some());
        assert!(game.find_san("Qh4").is_some());
        assert!(game.find_san("Qh5").is_none());
        assert!(game.find_san("xyzzy").is_none());
    }

    #[test]
    fn fools_mate_leaves_no_replies() {
        let mut game = Game::new();
        for token in ["f3", "e5", "g4", "Qh4"] {
            game.make_move_san(token).unwrap();
        }
        assert!(game.is_check());
        assert!(game.legal_moves().is_empty());
    }
}
