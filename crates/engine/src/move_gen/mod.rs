//! Legal move generation.
//!
//! The generator produces fully legal moves in one pass, without making and
//! unmaking candidate moves. Legality is decided up front from three pieces
//! of information computed per call:
//!
//! 1. the opponent's attack map (with the friendly king transparent to
//!    sliding rays), which filters king steps and castle paths;
//! 2. a check mask - the checker's square plus the squares of the check ray,
//!    the only targets that can resolve a single check;
//! 3. pin rays - every piece sitting on one may only move along the ray
//!    connecting it to the king.
//!
//! Double check short-circuits to king moves only. The single residual case
//! not covered by pins and checks is the horizontal discovered check an
//! en-passant capture can open; the pawn module handles it with a pure rank
//! scan.
//!
//! Move order within the returned list is unspecified.

mod attack;
mod king;
mod knight;
mod pawn;
mod sliding;
pub mod tables;

use crate::bitset::BitSet;
use crate::board::Board;
use crate::moves::Move;
use crate::piece::{PieceColor, PieceKind};
use crate::square::{squares_to_edge, Square, DIRECTION_OFFSETS};

/// Reusable legal-move generator.
///
/// Holds the scratch state of the last `generate` call; `in_check` reports on
/// the position that call saw. The generator is not reentrant and must not be
/// shared across threads with a board that is being mutated.
pub struct MoveGenerator {
    moves: Vec<Move>,
    friendly: PieceColor,
    enemy: PieceColor,
    king: Square,
    friendly_occupancy: BitSet,
    attack_map: BitSet,
    check_mask: BitSet,
    pin_rays: BitSet,
    is_check: bool,
    is_double_check: bool,
    captures_only: bool,
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new()
    }
}

impl MoveGenerator {
    pub fn new() -> Self {
        MoveGenerator {
            moves: Vec::new(),
            friendly: PieceColor::White,
            enemy: PieceColor::Black,
            king: 0,
            friendly_occupancy: BitSet::EMPTY,
            attack_map: BitSet::EMPTY,
            check_mask: BitSet::EMPTY,
            pin_rays: BitSet::EMPTY,
            is_check: false,
            is_double_check: false,
            captures_only: false,
        }
    }

    /// All legal moves for the side to move.
    pub fn generate(&mut self, board: &Board) -> Vec<Move> {
        self.run(board, false)
    }

    /// Legal moves without the quiet ones (keeps captures, promotions and
    /// castles), for quiescence-style callers.
    pub fn generate_without_quiets(&mut self, board: &Board) -> Vec<Move> {
        self.run(board, true)
    }

    /// Whether the side to move was in check in the last generated position.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.is_check
    }

    fn run(&mut self, board: &Board, captures_only: bool) -> Vec<Move> {
        self.moves = Vec::with_capacity(64);
        self.captures_only = captures_only;
        self.friendly = board.side_to_move();
        self.enemy = self.friendly.opponent();
        self.king = board.king_square(self.friendly);
        self.friendly_occupancy = board.occupancy(self.friendly);

        self.attack_map = attack::attack_map(board, self.enemy, self.king);
        self.compute_pins_and_checks(board);

        king::generate(self, board);
        if !self.is_double_check {
            sliding::generate(self, board);
            knight::generate(self, board);
            pawn::generate(self, board);
        }

        std::mem::take(&mut self.moves)
    }

    /// Scan outward from the king along every relevant ray, classifying the
    /// first pieces found into pins and sliding checks, then add knight and
    /// pawn checkers.
    fn compute_pins_and_checks(&mut self, board: &Board) {
        self.check_mask = BitSet::EMPTY;
        self.pin_rays = BitSet::EMPTY;
        self.is_check = false;
        self.is_double_check = false;

        let enemy_has_orthogonal = !board.piece_list(self.enemy, PieceKind::Rook).is_empty()
            || !board.piece_list(self.enemy, PieceKind::Queen).is_empty();
        let enemy_has_diagonal = !board.piece_list(self.enemy, PieceKind::Bishop).is_empty()
            || !board.piece_list(self.enemy, PieceKind::Queen).is_empty();
        let first_direction = if enemy_has_orthogonal { 0 } else { 4 };
        let last_direction = if enemy_has_diagonal { 8 } else { 4 };

        for direction in first_direction..last_direction {
            let diagonal = direction >= 4;
            let offset = DIRECTION_OFFSETS[direction];
            let mut ray_mask = BitSet::EMPTY;
            let mut candidate: Option<Square> = None;
            let mut target = self.king as i8;

            for _ in 0..squares_to_edge(self.king, direction) {
                target += offset;
                let square = target as Square;
                ray_mask.insert(square);
                let piece = board.piece_at(square);
                if piece.is_empty() {
                    continue;
                }
                if piece.is_color(self.friendly) {
                    if candidate.is_none() {
                        candidate = Some(square);
                        continue;
                    }
                    // Second friendly piece shields the first; no pin here.
                    break;
                }
                let attacks_along_ray = if diagonal {
                    piece.slides_diagonally()
                } else {
                    piece.slides_orthogonally()
                };
                if attacks_along_ray {
                    if candidate.is_some() {
                        self.pin_rays |= ray_mask;
                    } else {
                        self.check_mask |= ray_mask;
                        self.register_check();
                    }
                }
                break;
            }
            if self.is_double_check {
                // Only king moves can answer; no need to finish the scan.
                break;
            }
        }

        let knight_checkers =
            tables::knight_attacks(self.king) & board.bitboard(self.enemy, PieceKind::Knight);
        for square in knight_checkers.iter() {
            self.check_mask.insert(square);
            self.register_check();
        }

        let pawn_checkers =
            tables::pawn_attacks(self.friendly, self.king) & board.bitboard(self.enemy, PieceKind::Pawn);
        for square in pawn_checkers.iter() {
            self.check_mask.insert(square);
            self.register_check();
        }
    }

    #[inline]
    fn register_check(&mut self) {
        if self.is_check {
            self.is_double_check = true;
        } else {
            self.is_check = true;
        }
    }

    #[inline]
    fn is_pinned(&self, square: Square) -> bool {
        self.pin_rays.contains(square)
    }

    /// Check-resolution rule: when in single check a non-king move must land
    /// inside the check mask.
    #[inline]
    fn resolves_check(&self, target: Square) -> bool {
        !self.is_check || self.check_mask.contains(target)
    }
}
