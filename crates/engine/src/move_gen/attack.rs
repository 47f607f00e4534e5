//! Opponent attack-map construction.
//!
//! The map is the union of every square the attacking side attacks, used to
//! filter king moves and castle paths. Sliding rays treat the defending king
//! as transparent: a king standing on a check ray must not be able to step
//! one square further along the same ray, so the attacker's ray continues
//! through it.

use super::tables;
use crate::bitset::BitSet;
use crate::board::Board;
use crate::piece::{PieceColor, PieceKind};
use crate::square::{squares_to_edge, Square, DIRECTION_OFFSETS};

/// Every square attacked by `attacker`, with `transparent_king` (the
/// defender's king) treated as empty for sliding rays.
pub(super) fn attack_map(
    board: &Board,
    attacker: PieceColor,
    transparent_king: Square,
) -> BitSet {
    let mut attacks = BitSet::EMPTY;

    for (kind, directions) in [
        (PieceKind::Rook, 0..4),
        (PieceKind::Bishop, 4..8),
        (PieceKind::Queen, 0..8),
    ] {
        for &from in board.piece_list(attacker, kind).squares() {
            for direction in directions.clone() {
                let offset = DIRECTION_OFFSETS[direction];
                let mut target = from as i8;
                for _ in 0..squares_to_edge(from, direction) {
                    target += offset;
                    let square = target as Square;
                    attacks.insert(square);
                    if !board.piece_at(square).is_empty() && square != transparent_king {
                        break;
                    }
                }
            }
        }
    }

    for &from in board.piece_list(attacker, PieceKind::Knight).squares() {
        attacks |= tables::knight_attacks(from);
    }

    for &from in board.piece_list(attacker, PieceKind::Pawn).squares() {
        attacks |= tables::pawn_attacks(attacker, from);
    }

    attacks |= tables::king_attacks(board.king_square(attacker));

    attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    #[test]
    fn test_rook_ray_stops_at_blocker() {
        let board =
            Board::from_fen("4k3/8/8/8/4p3/8/4R3/4K3 w - - 0 1").expect("FEN should parse");
        let attacks = attack_map(&board, PieceColor::White, board.king_square(PieceColor::Black));

        assert!(attacks.contains(sq("e3")));
        assert!(attacks.contains(sq("e4"))); // the blocker itself is attacked
        assert!(!attacks.contains(sq("e5"))); // but nothing behind it
        assert!(attacks.contains(sq("a2")));
        assert!(attacks.contains(sq("h2")));
    }

    #[test]
    fn test_defending_king_is_transparent() {
        //! The ray must continue through the defending king so it cannot
        //! retreat along the check line.
        let board =
            Board::from_fen("8/8/8/8/1r2K3/8/8/7k w - - 0 1").expect("FEN should parse");
        let attacks = attack_map(&board, PieceColor::Black, board.king_square(PieceColor::White));

        assert!(attacks.contains(sq("e4")));
        assert!(attacks.contains(sq("f4"))); // behind the white king
        assert!(attacks.contains(sq("g4")));
    }

    #[test]
    fn test_pawn_and_knight_contributions() {
        let board =
            Board::from_fen("4k3/8/8/3p4/8/5n2/8/4K3 w - - 0 1").expect("FEN should parse");
        let attacks = attack_map(&board, PieceColor::Black, board.king_square(PieceColor::White));

        // d5 pawn attacks c4 and e4.
        assert!(attacks.contains(sq("c4")));
        assert!(attacks.contains(sq("e4")));
        // f3 knight attacks e1 and g1 among others.
        assert!(attacks.contains(sq("e1")));
        assert!(attacks.contains(sq("g1")));
        // Black king ring.
        assert!(attacks.contains(sq("d8")));
        assert!(attacks.contains(sq("f7")));
    }
}
