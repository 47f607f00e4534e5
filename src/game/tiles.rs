//! The view contract: 8x8 tile snapshots.
//!
//! The facade never talks to a concrete renderer. It produces a full
//! [`TileGrid`] snapshot - one [`FieldTileState`] per square, rows counted
//! from the top of the board (row 0 = rank 8) - and consumes `(row, col)`
//! clicks. Everything here is serde-serializable so a remote or recorded
//! view can consume the same snapshots.

use lantern_engine::{PieceColor, PieceKind};
use serde::{Deserialize, Serialize};

/// Visual effect of a tile, driven by selection and check state.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TileEffect {
    /// Nothing special.
    #[default]
    None,
    /// The currently selected square.
    Highlighted,
    /// An empty square the selected piece may move to.
    Spotted,
    /// An enemy-occupied square the selected piece may capture on.
    Targeted,
    /// The friendly king's square while in check.
    Checked,
}

/// A piece as the view sees it.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct TilePiece {
    pub color: PieceColor,
    pub kind: PieceKind,
}

/// One square of the snapshot.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTileState {
    pub piece: Option<TilePiece>,
    pub effect: TileEffect,
}

/// Full-board snapshot, indexed `[row][col]` with row 0 at the top.
pub type TileGrid = [[FieldTileState; 8]; 8];

/// The renderer side of the contract: it receives a complete snapshot after
/// every state change. Click events travel the other way as plain
/// `(row, col)` calls into the game model.
pub trait BoardView {
    fn set_position(&mut self, tiles: &TileGrid);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tile_is_empty_with_no_effect() {
        let tile = FieldTileState::default();
        assert!(tile.piece.is_none());
        assert_eq!(tile.effect, TileEffect::None);
    }

    #[test]
    fn test_tile_serde_round_trip() {
        let tile = FieldTileState {
            piece: Some(TilePiece {
                color: PieceColor::Black,
                kind: PieceKind::Knight,
            }),
            effect: TileEffect::Targeted,
        };
        let json = serde_json::to_string(&tile).expect("serialize");
        let back: FieldTileState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, tile);
    }
}
