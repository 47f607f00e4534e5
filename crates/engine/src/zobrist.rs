//! Zobrist hashing tables and full-hash recomputation.
//!
//! The keys are generated from a compile-time fixed seed with a splitmix64
//! stream, so hashes are identical across runs and processes. The tables are
//! built once behind a `OnceLock` and shared by every `Board` in the process;
//! they are immutable after initialization and safe for concurrent reads.
//!
//! A position's hash is the XOR of: one `piece_square` key per occupied
//! square, `black_to_move` iff black is to move, `en_passant_file[f]` iff
//! file `f` has an active en-passant target, and `castle_rights[rights]`
//! unconditionally. `make_move`/`unmake_move` maintain the hash by XOR-ing
//! exactly the terms that change.

use std::sync::OnceLock;

use crate::board::Board;
use crate::piece::{PieceColor, PieceKind};
use crate::square::Square;

const SEED: u64 = 0x4C61_6E74_6572_6E21;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    castle_rights: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed = SEED;

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for kind in color {
            for square in kind {
                *square = next_random_u64(&mut seed);
            }
        }
    }

    let black_to_move = next_random_u64(&mut seed);

    let mut castle_rights = [0u64; 16];
    for key in &mut castle_rights {
        *key = next_random_u64(&mut seed);
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = next_random_u64(&mut seed);
    }

    ZobristTables {
        piece_square,
        black_to_move,
        castle_rights,
        en_passant_file,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Key for a `(color, kind, square)` occupancy term.
#[inline]
pub fn piece_square_key(color: PieceColor, kind: PieceKind, square: Square) -> u64 {
    tables().piece_square[color.index()][kind.index()][square as usize]
}

/// Toggle key for black to move.
#[inline]
pub fn black_to_move_key() -> u64 {
    tables().black_to_move
}

/// Key for a 4-bit castle-rights word (`0..=15`).
#[inline]
pub fn castle_rights_key(rights: u8) -> u64 {
    tables().castle_rights[(rights & 0x0F) as usize]
}

/// Key for an active en-passant file (`0..=7`). File 8 ("none") contributes
/// nothing and must be skipped by the caller.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Recompute the full position hash from scratch.
///
/// The board's maintained hash must equal this at all times; the board's
/// debug assertions and the invariant tests rely on it.
pub fn compute_hash(board: &Board) -> u64 {
    let mut hash = 0u64;

    for square in 0..64 {
        let piece = board.piece_at(square);
        if !piece.is_empty() {
            hash ^= piece_square_key(piece.color(), piece.kind(), square);
        }
    }

    if board.side_to_move() == PieceColor::Black {
        hash ^= black_to_move_key();
    }

    let ep_file = board.en_passant_file();
    if ep_file < 8 {
        hash ^= en_passant_file_key(ep_file);
    }

    hash ^= castle_rights_key(board.castle_rights());

    hash
}
