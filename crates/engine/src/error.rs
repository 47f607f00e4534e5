//! Error types for the position engine.

use thiserror::Error;

/// Errors surfaced at the engine's input boundary.
///
/// Everything here is a rejection of caller-supplied data (FEN text). Internal
/// inconsistencies are bugs and are handled with debug assertions instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// FEN record does not have the six whitespace-separated fields.
    #[error("FEN must have 6 fields, found {found}")]
    FenFieldCount { found: usize },

    /// Piece placement field is malformed.
    #[error("invalid FEN piece placement: {reason}")]
    FenPlacement { reason: String },

    /// Side-to-move field is neither `w` nor `b`.
    #[error("invalid FEN side to move: {field}")]
    FenSideToMove { field: String },

    /// Castle-rights field is not `-` or a subset of `KQkq`.
    #[error("invalid FEN castle rights: {field}")]
    FenCastleRights { field: String },

    /// En-passant field is not `-` or a legal square name.
    #[error("invalid FEN en-passant square: {field}")]
    FenEnPassant { field: String },

    /// Half-move clock or full-move number is not a number.
    #[error("invalid FEN move counter: {field}")]
    FenCounter { field: String },

    /// The placement parsed but does not describe a playable position.
    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
