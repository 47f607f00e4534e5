//! Precomputed per-square attack patterns for the leaping pieces.
//!
//! Knight, king and pawn attacks depend only on the square (and color, for
//! pawns), so they are baked into bitboard tables once per process. Sliding
//! attacks depend on occupancy and are walked at generation time instead.

use std::sync::OnceLock;

use crate::bitset::BitSet;
use crate::piece::PieceColor;
use crate::square::{square_at, Square, NUM_SQUARES};

/// Squares a knight on `square` attacks.
#[inline]
pub fn knight_attacks(square: Square) -> BitSet {
    tables().knight[square as usize]
}

/// Squares a king on `square` attacks.
#[inline]
pub fn king_attacks(square: Square) -> BitSet {
    tables().king[square as usize]
}

/// Squares a pawn of `color` on `square` attacks (diagonally forward).
///
/// Also usable in reverse: intersecting `pawn_attacks(us, king)` with the
/// enemy pawn bitboard finds enemy pawns giving check.
#[inline]
pub fn pawn_attacks(color: PieceColor, square: Square) -> BitSet {
    tables().pawn[color.index()][square as usize]
}

struct AttackTables {
    knight: [BitSet; NUM_SQUARES],
    king: [BitSet; NUM_SQUARES],
    pawn: [[BitSet; NUM_SQUARES]; 2],
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

#[inline]
fn tables() -> &'static AttackTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> AttackTables {
    let mut knight = [BitSet::EMPTY; NUM_SQUARES];
    let mut king = [BitSet::EMPTY; NUM_SQUARES];
    let mut pawn = [[BitSet::EMPTY; NUM_SQUARES]; 2];

    const KNIGHT_JUMPS: [(i8, i8); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];
    const KING_STEPS: [(i8, i8); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    for square in 0..NUM_SQUARES as Square {
        let rank = (square / 8) as i8;
        let file = (square % 8) as i8;

        for (rank_step, file_step) in KNIGHT_JUMPS {
            if let Some(target) = offset_square(rank + rank_step, file + file_step) {
                knight[square as usize].insert(target);
            }
        }
        for (rank_step, file_step) in KING_STEPS {
            if let Some(target) = offset_square(rank + rank_step, file + file_step) {
                king[square as usize].insert(target);
            }
        }
        // White pawns attack toward rank index 0, black toward rank index 7.
        for file_step in [-1, 1] {
            if let Some(target) = offset_square(rank - 1, file + file_step) {
                pawn[PieceColor::White.index()][square as usize].insert(target);
            }
            if let Some(target) = offset_square(rank + 1, file + file_step) {
                pawn[PieceColor::Black.index()][square as usize].insert(target);
            }
        }
    }

    AttackTables { knight, king, pawn }
}

#[inline]
fn offset_square(rank: i8, file: i8) -> Option<Square> {
    if (0..8).contains(&rank) && (0..8).contains(&file) {
        Some(square_at(rank as u8, file as u8))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::parse_square;

    #[test]
    fn test_knight_attack_counts() {
        // Corner, edge, center.
        assert_eq!(knight_attacks(parse_square("a8").unwrap()).count_ones(), 2);
        assert_eq!(knight_attacks(parse_square("a4").unwrap()).count_ones(), 4);
        assert_eq!(knight_attacks(parse_square("e4").unwrap()).count_ones(), 8);
    }

    #[test]
    fn test_knight_attack_pattern() {
        let attacks = knight_attacks(parse_square("b1").unwrap());
        assert!(attacks.contains(parse_square("a3").unwrap()));
        assert!(attacks.contains(parse_square("c3").unwrap()));
        assert!(attacks.contains(parse_square("d2").unwrap()));
        assert_eq!(attacks.count_ones(), 3);
    }

    #[test]
    fn test_king_attack_counts() {
        assert_eq!(king_attacks(parse_square("a1").unwrap()).count_ones(), 3);
        assert_eq!(king_attacks(parse_square("a4").unwrap()).count_ones(), 5);
        assert_eq!(king_attacks(parse_square("d5").unwrap()).count_ones(), 8);
    }

    #[test]
    fn test_pawn_attacks_are_forward_diagonals() {
        let e4 = parse_square("e4").unwrap();
        let white = pawn_attacks(PieceColor::White, e4);
        assert!(white.contains(parse_square("d5").unwrap()));
        assert!(white.contains(parse_square("f5").unwrap()));
        assert_eq!(white.count_ones(), 2);

        let black = pawn_attacks(PieceColor::Black, e4);
        assert!(black.contains(parse_square("d3").unwrap()));
        assert!(black.contains(parse_square("f3").unwrap()));
        assert_eq!(black.count_ones(), 2);
    }

    #[test]
    fn test_rook_file_pawn_attacks_stay_on_board() {
        let a2 = parse_square("a2").unwrap();
        let white = pawn_attacks(PieceColor::White, a2);
        assert_eq!(white.count_ones(), 1);
        assert!(white.contains(parse_square("b3").unwrap()));
    }
}
