//! # Lantern Chess - Game-Model Facade
//!
//! The layer between the position engine and whatever renders the board.
//! It owns the authoritative [`engine::Board`], tracks the player's tile
//! selection, runs the click state machine, snapshots the board into view
//! tiles and dispatches turns to optional per-side AI players over a
//! worker-thread reply channel.
//!
//! A renderer plugs in by forwarding `(row, col)` clicks to
//! [`GameModel::handle_tile_clicked`] and pulling [`GameModel::tiles`]
//! snapshots; an AI plugs in by implementing [`ChessAi`].

pub mod game;

pub use game::ai::{ChessAi, RandomAi, ReplySink};
pub use game::model::{GameModel, GameOutcome};
pub use game::selection::Selection;
pub use game::tiles::{BoardView, FieldTileState, TileEffect, TileGrid, TilePiece};

pub use lantern_engine as engine;
