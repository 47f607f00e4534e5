//! The mutable position: squares, piece lists, bitboards and the
//! make/unmake machinery with incremental Zobrist hashing.
//!
//! `squares` is the source of truth; the per-side piece lists, per-type
//! bitboards and king squares are redundant views that are kept in sync
//! incrementally so move generation never scans the board. A packed game
//! state word travels on a stack per made move, which is what lets
//! `unmake_move` restore the previous position bit-for-bit, including the
//! captured piece, castle rights, en-passant file and fifty-move counter.
//!
//! The board trusts its callers: `make_move` is only ever handed a move that
//! came out of the generator for this exact position. Consistency between
//! the redundant views is enforced with debug assertions, not runtime
//! checks.

use crate::bitset::BitSet;
use crate::error::{EngineError, EngineResult};
use crate::fen::{self, Setup};
use crate::moves::Move;
use crate::piece::{Piece, PieceColor, PieceKind};
use crate::piece_list::PieceList;
use crate::square::{file_of, square_at, Square};
use crate::zobrist;

/// Castle-rights bits: bit 0 WK, bit 1 WQ, bit 2 BK, bit 3 BQ.
pub mod castling {
    pub const WHITE_KINGSIDE: u8 = 1 << 0;
    pub const WHITE_QUEENSIDE: u8 = 1 << 1;
    pub const BLACK_KINGSIDE: u8 = 1 << 2;
    pub const BLACK_QUEENSIDE: u8 = 1 << 3;
    pub const ALL: u8 = 0b1111;
}

/// Per-square masks AND-ed onto the rights word when a move touches the
/// square. Home squares of kings and rooks clear the rights they anchor;
/// applying the mask for both endpoints of a move covers king moves, rook
/// moves and rook captures uniformly.
const RIGHTS_MASK: [u8; 64] = {
    let mut masks = [castling::ALL; 64];
    masks[0] = castling::ALL & !castling::BLACK_QUEENSIDE; // a8
    masks[4] = castling::ALL & !(castling::BLACK_KINGSIDE | castling::BLACK_QUEENSIDE); // e8
    masks[7] = castling::ALL & !castling::BLACK_KINGSIDE; // h8
    masks[56] = castling::ALL & !castling::WHITE_QUEENSIDE; // a1
    masks[60] = castling::ALL & !(castling::WHITE_KINGSIDE | castling::WHITE_QUEENSIDE); // e1
    masks[63] = castling::ALL & !castling::WHITE_KINGSIDE; // h1
    masks
};

/// Packed game state: bits 0-3 castle rights, 4-7 en-passant file (8 = none),
/// 8-12 captured piece code, 13-19 fifty-move counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct StateEntry(u32);

impl StateEntry {
    fn new(rights: u8, ep_file: u8, captured: u8, fifty: u8) -> StateEntry {
        StateEntry(
            rights as u32
                | (ep_file as u32) << 4
                | (captured as u32) << 8
                | (fifty as u32) << 13,
        )
    }

    fn castle_rights(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    fn en_passant_file(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    fn captured(self) -> Piece {
        Piece::from_code(((self.0 >> 8) & 0x1F) as u8)
    }

    fn fifty(self) -> u8 {
        ((self.0 >> 13) & 0x7F) as u8
    }
}

/// A chess position, mutated only through [`Board::make_move`] and
/// [`Board::unmake_move`]. Cloning yields a fully independent deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Piece; 64],
    side_to_move: PieceColor,
    ply_count: u32,
    zobrist: u64,
    piece_lists: [[PieceList; 5]; 2],
    king_square: [Square; 2],
    bitboards: [[BitSet; 6]; 2],
    state: StateEntry,
    state_stack: Vec<StateEntry>,
    hash_history: Vec<u64>,
}

impl Board {
    /// Construct a board from a FEN record.
    pub fn from_fen(fen: &str) -> EngineResult<Board> {
        Board::from_setup(fen::parse(fen)?)
    }

    /// The canonical startup position.
    pub fn start_position() -> Board {
        match Board::from_fen(crate::START_FEN) {
            Ok(board) => board,
            Err(_) => unreachable!("the canonical startup FEN is valid"),
        }
    }

    /// Serialize the position back into canonical FEN.
    pub fn to_fen(&self) -> String {
        fen::emit(self)
    }

    pub(crate) fn from_setup(setup: Setup) -> EngineResult<Board> {
        let mut board = Board {
            squares: setup.squares,
            side_to_move: setup.side_to_move,
            ply_count: (setup.fullmove_number as u32 - 1) * 2 + setup.side_to_move.index() as u32,
            zobrist: 0,
            piece_lists: Default::default(),
            king_square: [0; 2],
            bitboards: [[BitSet::EMPTY; 6]; 2],
            state: StateEntry::new(
                setup.castle_rights,
                setup.en_passant_file,
                0,
                setup.halfmove_clock.min(127),
            ),
            state_stack: Vec::with_capacity(64),
            hash_history: Vec::with_capacity(64),
        };

        let mut kings = [0usize; 2];
        for square in 0..64 {
            let piece = board.squares[square as usize];
            if piece.is_empty() {
                continue;
            }
            let color = piece.color();
            board.bitboards[color.index()][piece.kind().index()].insert(square);
            if piece.kind() == PieceKind::King {
                board.king_square[color.index()] = square;
                kings[color.index()] += 1;
            } else {
                let list = &mut board.piece_lists[color.index()][piece.kind().index()];
                if list.count() >= 10 {
                    return Err(EngineError::InvalidPosition {
                        reason: format!("more than 10 {:?}s of one color", piece.kind()),
                    });
                }
                list.add(square);
            }
        }
        if kings != [1, 1] {
            return Err(EngineError::InvalidPosition {
                reason: format!(
                    "expected one king per side, found {} white and {} black",
                    kings[0], kings[1]
                ),
            });
        }

        board.zobrist = zobrist::compute_hash(&board);
        board.hash_history.push(board.zobrist);
        debug_assert!(board.is_consistent());
        Ok(board)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Piece {
        self.squares[square as usize]
    }

    #[inline]
    pub fn side_to_move(&self) -> PieceColor {
        self.side_to_move
    }

    /// Total half-moves since the start of the game.
    #[inline]
    pub fn ply_count(&self) -> u32 {
        self.ply_count
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.ply_count / 2 + 1
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.zobrist
    }

    #[inline]
    pub fn castle_rights(&self) -> u8 {
        self.state.castle_rights()
    }

    /// The file with an active en-passant target, or 8 when there is none.
    #[inline]
    pub fn en_passant_file(&self) -> u8 {
        self.state.en_passant_file()
    }

    /// The en-passant target square (the square a capturing pawn lands on),
    /// derived from the active file and the side to move.
    pub fn en_passant_square(&self) -> Option<Square> {
        let file = self.en_passant_file();
        if file > 7 {
            return None;
        }
        let rank = match self.side_to_move {
            PieceColor::White => 2,
            PieceColor::Black => 5,
        };
        Some(square_at(rank, file))
    }

    /// Half-moves since the last capture or pawn move.
    #[inline]
    pub fn fifty_move_counter(&self) -> u8 {
        self.state.fifty()
    }

    #[inline]
    pub fn king_square(&self, color: PieceColor) -> Square {
        self.king_square[color.index()]
    }

    #[inline]
    pub fn bitboard(&self, color: PieceColor, kind: PieceKind) -> BitSet {
        self.bitboards[color.index()][kind.index()]
    }

    /// The piece list for a non-king piece type.
    #[inline]
    pub fn piece_list(&self, color: PieceColor, kind: PieceKind) -> &PieceList {
        debug_assert!(kind != PieceKind::King);
        &self.piece_lists[color.index()][kind.index()]
    }

    /// All squares occupied by one side.
    pub fn occupancy(&self, color: PieceColor) -> BitSet {
        let boards = &self.bitboards[color.index()];
        BitSet(boards.iter().fold(0, |acc, b| acc | b.0))
    }

    pub fn all_occupancy(&self) -> BitSet {
        self.occupancy(PieceColor::White) | self.occupancy(PieceColor::Black)
    }

    /// The square of the pawn removed by an en-passant capture landing on
    /// `to`: one rank toward the mover. Shared by `make_move`, `unmake_move`
    /// and the generator so the arithmetic cannot diverge.
    #[inline]
    pub fn en_passant_victim(to: Square, mover: PieceColor) -> Square {
        match mover {
            PieceColor::White => to + 8,
            PieceColor::Black => to - 8,
        }
    }

    /// Apply a move produced by the generator for this position.
    pub fn make_move(&mut self, mv: Move) {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let mover = self.squares[from as usize];
        debug_assert!(mover.is_color(us), "make_move with foreign piece");
        let mover_kind = mover.kind();
        let prev = self.state;
        let mut hash = self.zobrist;

        if prev.en_passant_file() < 8 {
            hash ^= zobrist::en_passant_file_key(prev.en_passant_file());
        }
        hash ^= zobrist::castle_rights_key(prev.castle_rights());

        let capture_square = if mv.is_en_passant() {
            Board::en_passant_victim(to, us)
        } else {
            to
        };
        let captured = self.squares[capture_square as usize];
        if !captured.is_empty() {
            self.remove_piece(capture_square);
            hash ^= zobrist::piece_square_key(them, captured.kind(), capture_square);
        }

        if let Some(promoted_kind) = mv.promotion_kind() {
            self.remove_piece(from);
            self.put_piece(to, Piece::new(us, promoted_kind));
            hash ^= zobrist::piece_square_key(us, PieceKind::Pawn, from);
            hash ^= zobrist::piece_square_key(us, promoted_kind, to);
        } else {
            self.shift_piece(from, to);
            hash ^= zobrist::piece_square_key(us, mover_kind, from);
            hash ^= zobrist::piece_square_key(us, mover_kind, to);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(from, to);
            self.shift_piece(rook_from, rook_to);
            hash ^= zobrist::piece_square_key(us, PieceKind::Rook, rook_from);
            hash ^= zobrist::piece_square_key(us, PieceKind::Rook, rook_to);
        }

        let rights = prev.castle_rights() & RIGHTS_MASK[from as usize] & RIGHTS_MASK[to as usize];
        let ep_file = if mv.is_double_push() { file_of(to) } else { 8 };
        let fifty = if !captured.is_empty() || mover_kind == PieceKind::Pawn {
            0
        } else {
            (prev.fifty() + 1).min(127)
        };

        hash ^= zobrist::castle_rights_key(rights);
        if ep_file < 8 {
            hash ^= zobrist::en_passant_file_key(ep_file);
        }
        hash ^= zobrist::black_to_move_key();

        self.side_to_move = them;
        self.ply_count += 1;
        self.state_stack.push(prev);
        self.state = StateEntry::new(rights, ep_file, captured.code(), fifty);
        self.zobrist = hash;
        self.hash_history.push(hash);

        debug_assert!(self.is_consistent(), "board desync after {mv}");
    }

    /// Reverse the most recent [`Board::make_move`]. The board compares
    /// bit-for-bit to its pre-make state afterwards.
    pub fn unmake_move(&mut self, mv: Move) {
        let Some(prev) = self.state_stack.pop() else {
            debug_assert!(false, "unmake_move without a matching make_move");
            return;
        };
        let us = self.side_to_move.opponent();
        let from = mv.from();
        let to = mv.to();
        let undo = self.state;

        self.hash_history.pop();
        debug_assert!(!self.hash_history.is_empty());
        self.zobrist = self.hash_history.last().copied().unwrap_or(0);

        if mv.is_promotion() {
            self.remove_piece(to);
            self.put_piece(from, Piece::new(us, PieceKind::Pawn));
        } else {
            self.shift_piece(to, from);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(from, to);
            self.shift_piece(rook_to, rook_from);
        }

        let captured = undo.captured();
        if !captured.is_empty() {
            let capture_square = if mv.is_en_passant() {
                Board::en_passant_victim(to, us)
            } else {
                to
            };
            self.put_piece(capture_square, captured);
        }

        self.side_to_move = us;
        self.ply_count -= 1;
        self.state = prev;

        debug_assert!(self.is_consistent(), "board desync after unmaking {mv}");
    }

    /// Draw by rule: fifty-move rule or threefold repetition.
    pub fn is_draw_by_rule(&self) -> bool {
        self.is_draw_by_fifty_move_rule() || self.is_draw_by_repetition()
    }

    #[inline]
    pub fn is_draw_by_fifty_move_rule(&self) -> bool {
        self.state.fifty() >= 100
    }

    /// Threefold repetition: the current position (squares, side to move,
    /// castle rights, en-passant file - exactly what the hash covers) has
    /// occurred three or more times.
    pub fn is_draw_by_repetition(&self) -> bool {
        self.hash_history
            .iter()
            .filter(|&&hash| hash == self.zobrist)
            .count()
            >= 3
    }

    fn remove_piece(&mut self, square: Square) {
        let piece = self.squares[square as usize];
        debug_assert!(!piece.is_empty() && piece.kind() != PieceKind::King);
        let color = piece.color().index();
        let kind = piece.kind().index();
        self.squares[square as usize] = Piece::EMPTY;
        self.bitboards[color][kind].remove(square);
        self.piece_lists[color][kind].remove(square);
    }

    fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square as usize].is_empty());
        debug_assert!(piece.kind() != PieceKind::King);
        let color = piece.color().index();
        let kind = piece.kind().index();
        self.squares[square as usize] = piece;
        self.bitboards[color][kind].insert(square);
        self.piece_lists[color][kind].add(square);
    }

    fn shift_piece(&mut self, from: Square, to: Square) {
        let piece = self.squares[from as usize];
        debug_assert!(!piece.is_empty());
        debug_assert!(self.squares[to as usize].is_empty());
        let color = piece.color().index();
        let kind = piece.kind();
        self.squares[from as usize] = Piece::EMPTY;
        self.squares[to as usize] = piece;
        self.bitboards[color][kind.index()].remove(from);
        self.bitboards[color][kind.index()].insert(to);
        if kind == PieceKind::King {
            self.king_square[color] = to;
        } else {
            self.piece_lists[color][kind.index()].move_piece(from, to);
        }
    }

    /// Full cross-check of the redundant views. Runs inside the debug
    /// assertions of make/unmake; tests call it after random move sequences.
    pub fn is_consistent(&self) -> bool {
        let mut kings = [0usize; 2];
        for square in 0..64 {
            let piece = self.squares[square as usize];
            for color in [PieceColor::White, PieceColor::Black] {
                for kind in PieceKind::ALL {
                    let in_bitboard = self.bitboards[color.index()][kind.index()].contains(square);
                    let expected = !piece.is_empty() && piece.is(color, kind);
                    if in_bitboard != expected {
                        return false;
                    }
                    if kind != PieceKind::King {
                        let in_list = self.piece_lists[color.index()][kind.index()].contains(square);
                        if in_list != expected {
                            return false;
                        }
                    }
                }
            }
            if !piece.is_empty() && piece.kind() == PieceKind::King {
                kings[piece.color().index()] += 1;
                if self.king_square[piece.color().index()] != square {
                    return false;
                }
            }
        }
        kings == [1, 1] && self.zobrist == zobrist::compute_hash(self)
    }
}

/// Rook relocation for a castle identified by the king's path: kingside puts
/// the rook one square inside the king's destination, queenside likewise from
/// the other corner.
#[inline]
fn castle_rook_squares(king_from: Square, king_to: Square) -> (Square, Square) {
    if king_to > king_from {
        (king_to + 1, king_to - 1)
    } else {
        (king_to - 2, king_to + 1)
    }
}

impl std::fmt::Display for Board {
    /// ASCII diagram with rank and file labels, for logs and test output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in 0..8u8 {
            write!(f, "{} ", 8 - rank)?;
            for file in 0..8u8 {
                let piece = self.piece_at(square_at(rank, file));
                let symbol = if piece.is_empty() {
                    '.'
                } else {
                    piece.fen_char()
                };
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h  {:?} to move", self.side_to_move)
    }
}
