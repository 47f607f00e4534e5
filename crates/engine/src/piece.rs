//! Compact piece encoding and predicates.
//!
//! A piece is a 5-bit code: `0` is an empty square, the low 3 bits carry the
//! type (pawn = 1 .. king = 6) and the high 2 bits carry the color mask
//! (bit 3 white, bit 4 black). A non-empty code has exactly one color bit set.
//! The encoding keeps the whole board in 64 bytes and makes color/type tests
//! single mask operations.

use serde::{Deserialize, Serialize};

const TYPE_MASK: u8 = 0b00111;
const WHITE_MASK: u8 = 0b01000;
const BLACK_MASK: u8 = 0b10000;

/// Side color. Also the first index of every per-side table in the crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceColor {
    White = 0,
    Black = 1,
}

impl PieceColor {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opponent(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    #[inline]
    fn mask(self) -> u8 {
        match self {
            PieceColor::White => WHITE_MASK,
            PieceColor::Black => BLACK_MASK,
        }
    }
}

/// Piece type, numbered so that `kind as u8` is the low-3-bit type code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Zero-based table index (pawn = 0 .. king = 5).
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Decode a low-3-bit type code. Returns `None` for 0 and 7.
    #[inline]
    pub fn from_code(code: u8) -> Option<PieceKind> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A square's content: empty, or a colored piece.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    #[inline]
    pub fn new(color: PieceColor, kind: PieceKind) -> Piece {
        Piece(color.mask() | kind as u8)
    }

    /// The raw 5-bit code, as stored in the packed game-state word.
    #[inline]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Rebuild a piece from a stored code. A zero code is the empty square.
    #[inline]
    pub fn from_code(code: u8) -> Piece {
        debug_assert!(code == 0 || PieceKind::from_code(code & TYPE_MASK).is_some());
        Piece(code)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The piece color. Must not be called on the empty square.
    #[inline]
    pub fn color(self) -> PieceColor {
        debug_assert!(!self.is_empty());
        if self.0 & WHITE_MASK != 0 {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }

    /// The piece type. Must not be called on the empty square.
    #[inline]
    pub fn kind(self) -> PieceKind {
        debug_assert!(!self.is_empty());
        match PieceKind::from_code(self.0 & TYPE_MASK) {
            Some(kind) => kind,
            None => unreachable!("corrupt piece code"),
        }
    }

    #[inline]
    pub fn is_color(self, color: PieceColor) -> bool {
        self.0 & color.mask() != 0
    }

    #[inline]
    pub fn is(self, color: PieceColor, kind: PieceKind) -> bool {
        self.0 == color.mask() | kind as u8
    }

    /// True for bishops and queens: pieces that slide along diagonals.
    #[inline]
    pub fn slides_diagonally(self) -> bool {
        matches!(self.0 & TYPE_MASK, 3 | 5)
    }

    /// True for rooks and queens: pieces that slide along ranks and files.
    #[inline]
    pub fn slides_orthogonally(self) -> bool {
        matches!(self.0 & TYPE_MASK, 4 | 5)
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn fen_char(self) -> char {
        let letter = match self.kind() {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color() {
            PieceColor::White => letter.to_ascii_uppercase(),
            PieceColor::Black => letter,
        }
    }

    /// Decode a FEN letter into a piece.
    pub fn from_fen_char(letter: char) -> Option<Piece> {
        let color = if letter.is_ascii_uppercase() {
            PieceColor::White
        } else {
            PieceColor::Black
        };
        let kind = match letter.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(color, kind))
    }
}
