//! Knight moves. A pinned knight never has a legal move: no knight jump
//! stays on a ray.

use super::{tables, MoveGenerator};
use crate::board::Board;
use crate::moves::Move;
use crate::piece::PieceKind;

pub(super) fn generate(gen: &mut MoveGenerator, board: &Board) {
    for &from in board.piece_list(gen.friendly, PieceKind::Knight).squares() {
        if gen.is_pinned(from) {
            continue;
        }
        let targets = tables::knight_attacks(from) & !gen.friendly_occupancy;
        for to in targets.iter() {
            if !gen.resolves_check(to) {
                continue;
            }
            let is_capture = !board.piece_at(to).is_empty();
            if is_capture || !gen.captures_only {
                gen.moves.push(Move::new(from, to));
            }
        }
    }
}
