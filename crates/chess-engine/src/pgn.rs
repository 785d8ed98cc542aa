//! PGN movetext import.
//!
//! Imports are tolerant by design: tag pairs, brace comments, NAG glyphs,
//! move numbers and result tokens are stripped, and the remaining tokens are
//! matched one by one against the SAN of the current legal moves. The first
//! token that matches nothing stops the import, leaving the game at that
//! ply; the halt is logged, not raised.

use crate::game::Game;
use tracing::warn;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Plays the movetext of `pgn` onto a fresh game from the standard start.
///
/// Returns the game as far as it could be replayed; on a malformed token the
/// game simply ends at the previous ply.
pub fn import_game(pgn: &str) -> Game {
    let mut game = Game::new();

    for token in movetext_tokens(pgn) {
        if game.make_move_san(&token).is_none() {
            warn!(
                token = %token,
                ply = game.ply_count(),
                "PGN token matches no legal move, stopping import"
            );
            break;
        }
    }

    game
}

/// Candidate SAN tokens of a PGN text: tags and comments removed, move
/// numbers, NAGs and result markers dropped.
fn movetext_tokens(pgn: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(pgn.len());
    let mut in_tag = false;
    let mut in_comment = false;

    for c in pgn.chars() {
        match c {
            '[' if !in_comment => in_tag = true,
            ']' if in_tag => {
                in_tag = false;
                cleaned.push(' ');
            }
            '{' if !in_tag => in_comment = true,
            '}' if in_comment => {
                in_comment = false;
                cleaned.push(' ');
            }
            _ if in_tag || in_comment => {}
            _ => cleaned.push(c),
        }
    }

    cleaned
        .split_whitespace()
        .filter(|token| !RESULT_TOKENS.contains(token))
        .filter(|token| !token.starts_with('$'))
        .filter_map(|token| {
            let token = strip_move_number(token);
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}

/// Drops a leading `\d+\.`-style move number, glued continuations included
/// ("1.e4" becomes "e4", "3..." becomes ""). Tokens without the trailing dot
/// ("0-0") pass through untouched.
fn strip_move_number(token: &str) -> &str {
    let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == token.len() || !rest.starts_with('.') {
        return token;
    }
    rest.trim_start_matches('.')
}
