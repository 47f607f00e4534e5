//! Game-model layer: the authoritative board, selection state, tile
//! snapshots for the view and turn dispatch to human or AI players.
//!
//! # Module Organization
//!
//! - `model` - the [`model::GameModel`] facade and its click state machine
//! - `selection` - the selected square and its cached legal destinations
//! - `tiles` - the view contract: tile snapshots and effects
//! - `ai` - the [`ai::ChessAi`] contract, reply channel and a random mover

pub mod ai;
pub mod model;
pub mod selection;
pub mod tiles;
