//! Pawn pushes, captures, promotions and en passant.
//!
//! En passant is the one move where the pin and check masks are not enough:
//! removing both the capturing and the captured pawn from a shared rank can
//! uncover a rook or queen against the king. That case is decided by a pure
//! scan over `squares` with the two pawn squares treated as empty; the board
//! is never touched.

use super::{tables, MoveGenerator};
use crate::board::Board;
use crate::moves::Move;
use crate::piece::{PieceColor, PieceKind};
use crate::square::{aligned_through, dir, rank_of, squares_to_edge, Square};

pub(super) fn generate(gen: &mut MoveGenerator, board: &Board) {
    let (push_offset, home_rank, promotion_rank) = match gen.friendly {
        PieceColor::White => (-8i8, 6u8, 0u8),
        PieceColor::Black => (8i8, 1u8, 7u8),
    };
    let en_passant_square = board.en_passant_square();

    for &from in board.piece_list(gen.friendly, PieceKind::Pawn).squares() {
        let pinned = gen.is_pinned(from);
        if pinned && gen.is_check {
            continue;
        }

        let ahead = (from as i8 + push_offset) as Square;
        if board.piece_at(ahead).is_empty() && (!pinned || aligned_through(gen.king, from, ahead)) {
            if rank_of(ahead) == promotion_rank {
                if gen.resolves_check(ahead) {
                    push_promotions(gen, from, ahead);
                }
            } else {
                if gen.resolves_check(ahead) && !gen.captures_only {
                    gen.moves.push(Move::new(from, ahead));
                }
                if rank_of(from) == home_rank {
                    let two_ahead = (ahead as i8 + push_offset) as Square;
                    if board.piece_at(two_ahead).is_empty()
                        && gen.resolves_check(two_ahead)
                        && !gen.captures_only
                    {
                        gen.moves
                            .push(Move::with_flag(from, two_ahead, Move::FLAG_DOUBLE_PUSH));
                    }
                }
            }
        }

        for to in tables::pawn_attacks(gen.friendly, from).iter() {
            if pinned && !aligned_through(gen.king, from, to) {
                continue;
            }
            let target = board.piece_at(to);
            if !target.is_empty() {
                if !target.is_color(gen.friendly) && gen.resolves_check(to) {
                    if rank_of(to) == promotion_rank {
                        push_promotions(gen, from, to);
                    } else {
                        gen.moves.push(Move::new(from, to));
                    }
                }
            } else if Some(to) == en_passant_square {
                let victim = Board::en_passant_victim(to, gen.friendly);
                // The capture can answer a check either by blocking on the
                // target square or by taking the double-pushed checker.
                if gen.is_check
                    && !gen.check_mask.contains(to)
                    && !gen.check_mask.contains(victim)
                {
                    continue;
                }
                if en_passant_exposes_king(board, gen.friendly, gen.king, from, victim) {
                    continue;
                }
                gen.moves
                    .push(Move::with_flag(from, to, Move::FLAG_EN_PASSANT));
            }
        }
    }
}

fn push_promotions(gen: &mut MoveGenerator, from: Square, to: Square) {
    for flag in [
        Move::FLAG_PROMOTE_QUEEN,
        Move::FLAG_PROMOTE_ROOK,
        Move::FLAG_PROMOTE_BISHOP,
        Move::FLAG_PROMOTE_KNIGHT,
    ] {
        gen.moves.push(Move::with_flag(from, to, flag));
    }
}

/// The horizontal discovered-check test: with the capturing pawn and its
/// victim lifted off their shared rank, scan leftward then rightward from
/// the king; an enemy rook or queen as the first piece means the capture is
/// illegal.
fn en_passant_exposes_king(
    board: &Board,
    friendly: PieceColor,
    king: Square,
    from: Square,
    victim: Square,
) -> bool {
    if rank_of(king) != rank_of(from) {
        return false;
    }

    for direction in [dir::LEFT, dir::RIGHT] {
        let offset = if direction == dir::LEFT { -1i8 } else { 1i8 };
        let mut target = king as i8;
        for _ in 0..squares_to_edge(king, direction) {
            target += offset;
            let square = target as Square;
            if square == from || square == victim {
                continue;
            }
            let piece = board.piece_at(square);
            if piece.is_empty() {
                continue;
            }
            if !piece.is_color(friendly) && piece.slides_orthogonally() {
                return true;
            }
            break;
        }
    }

    false
}
