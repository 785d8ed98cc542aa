//! Zobrist keys for position hashing.
//!
//! A position hash is the XOR of one key per piece placement, one key for
//! the current castling-rights mask, one key for the en-passant file when an
//! en-passant square is set, and one key when Black is to move. The keys are
//! produced by a fixed-seed xorshift64 at compile time, so every build and
//! every process computes identical hashes.

/// The full key table: 768 piece keys, 16 castling-mask keys, 8 en-passant
/// file keys and the side-to-move key.
pub struct ZobristKeys {
    /// Keys by `[color][piece type][square]`.
    pub pieces: [[[u64; 64]; 6]; 2],
    /// One key per 4-bit castling-rights mask.
    pub castling: [u64; 16],
    /// One key per en-passant file, XOR'd in whenever the square is set.
    pub en_passant_file: [u64; 8],
    /// XOR'd in when Black is to move.
    pub black_to_move: u64,
}

impl ZobristKeys {
    const fn new() -> Self {
        // xorshift64 with a golden-ratio seed; const-evaluable and fixed.
        const fn next(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut castling = [0u64; 16];
        let mut en_passant_file = [0u64; 8];

        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut square = 0;
                while square < 64 {
                    state = next(state);
                    pieces[color][piece][square] = state;
                    square += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        let mut mask = 0;
        while mask < 16 {
            state = next(state);
            castling[mask] = state;
            mask += 1;
        }

        let mut file = 0;
        while file < 8 {
            state = next(state);
            en_passant_file[file] = state;
            file += 1;
        }

        state = next(state);

        ZobristKeys {
            pieces,
            castling,
            en_passant_file,
            black_to_move: state,
        }
    }
}

/// Process-wide immutable key table, fixed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
