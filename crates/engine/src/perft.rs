//! Perft: exhaustive move-path enumeration.
//!
//! `perft(board, d)` counts the leaf positions reachable in exactly `d` legal
//! half-moves. The counts for well-known positions are tabulated across the
//! chess-programming literature, which makes perft the sharpest correctness
//! check the generator and make/unmake machinery have.

use crate::board::Board;
use crate::move_gen::MoveGenerator;

/// Count leaf nodes at `depth` half-moves below the current position.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut generator = MoveGenerator::new();
    perft_inner(board, &mut generator, depth)
}

fn perft_inner(board: &mut Board, generator: &mut MoveGenerator, depth: u32) -> u64 {
    let moves = generator.generate(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv);
        nodes += perft_inner(board, generator, depth - 1);
        board.unmake_move(mv);
    }
    nodes
}

/// Per-root-move breakdown, the usual tool for bisecting a perft mismatch
/// against a known-good engine.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(crate::moves::Move, u64)> {
    let mut generator = MoveGenerator::new();
    let moves = generator.generate(board);
    let mut counts = Vec::with_capacity(moves.len());
    for mv in moves {
        board.make_move(mv);
        let nodes = if depth <= 1 {
            1
        } else {
            perft_inner(board, &mut generator, depth - 1)
        };
        board.unmake_move(mv);
        counts.push((mv, nodes));
    }
    counts
}
