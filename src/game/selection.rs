//! Selection state for the click-driven input flow.
//!
//! Tracks the currently selected square together with the legal moves that
//! start there, cached from the generation call that ran at selection time:
//!
//! 1. the player clicks a friendly piece -> selection stores square + moves
//! 2. the view paints the cached destinations as spotted/targeted tiles
//! 3. the player clicks a destination -> the matching move is applied
//! 4. the selection is cleared, ready for the next interaction

use lantern_engine::{Move, PieceKind, Square};

/// The selected square and its cached legal moves.
#[derive(Debug, Default)]
pub struct Selection {
    selected: Option<Square>,
    moves: Vec<Move>,
}

impl Selection {
    pub fn select(&mut self, square: Square, moves: Vec<Move>) {
        debug_assert!(moves.iter().all(|m| m.from() == square));
        self.selected = Some(square);
        self.moves = moves;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.moves.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn square(&self) -> Option<Square> {
        self.selected
    }

    /// Whether `square` is a legal destination of the selected piece.
    pub fn is_target(&self, square: Square) -> bool {
        self.moves.iter().any(|m| m.to() == square)
    }

    /// The move to apply for a click on `target`.
    ///
    /// When several legal moves share the destination - the promotion case -
    /// the queen promotion is chosen on the player's behalf.
    pub fn move_to(&self, target: Square) -> Option<Move> {
        let mut first_match = None;
        for &m in self.moves.iter().filter(|m| m.to() == target) {
            if m.promotion_kind() == Some(PieceKind::Queen) {
                return Some(m);
            }
            first_match.get_or_insert(m);
        }
        first_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: Square, to: Square) -> Move {
        Move::new(from, to)
    }

    #[test]
    fn test_selection_default_is_empty() {
        let selection = Selection::default();
        assert!(!selection.is_selected());
        assert!(selection.square().is_none());
        assert!(!selection.is_target(0));
    }

    #[test]
    fn test_select_and_clear() {
        let mut selection = Selection::default();
        selection.select(52, vec![mv(52, 44), mv(52, 36)]);

        assert!(selection.is_selected());
        assert_eq!(selection.square(), Some(52));
        assert!(selection.is_target(44));
        assert!(selection.is_target(36));
        assert!(!selection.is_target(28));

        selection.clear();
        assert!(!selection.is_selected());
        assert!(!selection.is_target(44));
    }

    #[test]
    fn test_move_to_picks_the_single_match() {
        let mut selection = Selection::default();
        selection.select(52, vec![mv(52, 44), mv(52, 36)]);
        assert_eq!(selection.move_to(36), Some(mv(52, 36)));
        assert_eq!(selection.move_to(20), None);
    }

    #[test]
    fn test_move_to_prefers_queen_promotion() {
        //! Four promotion moves share (from, to); human input resolves to
        //! the queen automatically.
        let mut selection = Selection::default();
        let from = 8;
        let to = 0;
        selection.select(
            from,
            vec![
                Move::with_flag(from, to, Move::FLAG_PROMOTE_KNIGHT),
                Move::with_flag(from, to, Move::FLAG_PROMOTE_BISHOP),
                Move::with_flag(from, to, Move::FLAG_PROMOTE_ROOK),
                Move::with_flag(from, to, Move::FLAG_PROMOTE_QUEEN),
            ],
        );

        let chosen = selection.move_to(to).expect("promotion move expected");
        assert_eq!(chosen.promotion_kind(), Some(PieceKind::Queen));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut selection = Selection::default();
        selection.select(12, vec![mv(12, 20)]);
        selection.clear();
        selection.clear();
        assert!(!selection.is_selected());
    }
}
