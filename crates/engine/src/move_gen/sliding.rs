//! Rook, bishop and queen moves.

use super::MoveGenerator;
use crate::board::Board;
use crate::moves::Move;
use crate::piece::PieceKind;
use crate::square::{direction_between, squares_to_edge, Square, DIRECTION_OFFSETS};

pub(super) fn generate(gen: &mut MoveGenerator, board: &Board) {
    for (kind, directions) in [
        (PieceKind::Rook, 0..4usize),
        (PieceKind::Bishop, 4..8),
        (PieceKind::Queen, 0..8),
    ] {
        for &from in board.piece_list(gen.friendly, kind).squares() {
            let pinned = gen.is_pinned(from);
            if pinned && gen.is_check {
                // A move along the pin ray can never block or capture a
                // checker that sits off that ray.
                continue;
            }
            for direction in directions.clone() {
                let offset = DIRECTION_OFFSETS[direction];
                if pinned && !parallel_to_pin(gen.king, from, offset) {
                    continue;
                }
                walk_ray(gen, board, from, direction, offset);
            }
        }
    }
}

fn walk_ray(gen: &mut MoveGenerator, board: &Board, from: Square, direction: usize, offset: i8) {
    let mut target = from as i8;
    for _ in 0..squares_to_edge(from, direction) {
        target += offset;
        let to = target as Square;
        let piece = board.piece_at(to);
        if !piece.is_empty() && piece.is_color(gen.friendly) {
            break;
        }
        let is_capture = !piece.is_empty();
        if gen.resolves_check(to) && (is_capture || !gen.captures_only) {
            gen.moves.push(Move::new(from, to));
        }
        if is_capture {
            break;
        }
    }
}

/// A pinned slider may only walk the two directions that stay on the ray
/// between it and the king.
#[inline]
fn parallel_to_pin(king: Square, from: Square, offset: i8) -> bool {
    let pin_direction = direction_between(king, from);
    offset == pin_direction || offset == -pin_direction
}
