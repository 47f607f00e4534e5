//! King steps and castling.

use super::{tables, MoveGenerator};
use crate::board::{castling, Board};
use crate::moves::Move;
use crate::piece::PieceColor;
use crate::square::Square;

pub(super) fn generate(gen: &mut MoveGenerator, board: &Board) {
    let from = gen.king;

    for to in tables::king_attacks(from).iter() {
        if gen.attack_map.contains(to) {
            continue;
        }
        let target = board.piece_at(to);
        if target.is_empty() {
            if !gen.captures_only {
                gen.moves.push(Move::new(from, to));
            }
        } else if !target.is_color(gen.friendly) {
            gen.moves.push(Move::new(from, to));
        }
    }

    if !gen.is_check {
        generate_castles(gen, board);
    }
}

/// Castling: rights bit set, intermediate squares empty, and the two squares
/// the king crosses (its path square and destination) unattacked. The king's
/// origin is covered by the not-in-check guard, and the queenside b-file
/// square only has to be empty, not safe.
fn generate_castles(gen: &mut MoveGenerator, board: &Board) {
    let rights = board.castle_rights();
    let (kingside_right, queenside_right) = match gen.friendly {
        PieceColor::White => {
            (castling::WHITE_KINGSIDE, castling::WHITE_QUEENSIDE)
        }
        PieceColor::Black => {
            (castling::BLACK_KINGSIDE, castling::BLACK_QUEENSIDE)
        }
    };
    let from = gen.king;

    if rights & kingside_right != 0 {
        let path = from + 1; // f-file
        let destination = from + 2; // g-file
        if board.piece_at(path).is_empty()
            && board.piece_at(destination).is_empty()
            && !gen.attack_map.contains(path)
            && !gen.attack_map.contains(destination)
        {
            gen.moves
                .push(Move::with_flag(from, destination, Move::FLAG_CASTLE));
        }
    }

    if rights & queenside_right != 0 {
        let path = from - 1; // d-file
        let destination = from - 2; // c-file
        let rook_lane: Square = from - 3; // b-file
        if board.piece_at(path).is_empty()
            && board.piece_at(destination).is_empty()
            && board.piece_at(rook_lane).is_empty()
            && !gen.attack_map.contains(path)
            && !gen.attack_map.contains(destination)
        {
            gen.moves
                .push(Move::with_flag(from, destination, Move::FLAG_CASTLE));
        }
    }
}
