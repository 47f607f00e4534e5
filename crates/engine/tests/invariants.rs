//! Law-style invariant tests: the redundant board views must agree after
//! arbitrary legal move sequences, and make/unmake must be a perfect
//! involution.
//!
//! The walks use a small deterministic xorshift generator so failures
//! reproduce exactly.

use lantern_engine::piece::{PieceColor, PieceKind};
use lantern_engine::{Board, MoveGenerator, START_FEN};

struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

/// Walk up to `plies` random legal moves, checking every universal invariant
/// at every step. Restarts from the initial position when the game ends.
fn random_walk(fen: &str, seed: u64, plies: usize) {
    let initial = Board::from_fen(fen).expect("FEN should parse");
    let mut board = initial.clone();
    let mut generator = MoveGenerator::new();
    let mut rng = XorShift(seed);

    for ply in 0..plies {
        let moves = generator.generate(&board);
        if moves.is_empty() {
            board = initial.clone();
            continue;
        }
        let mv = moves[rng.below(moves.len())];

        // Make/unmake must restore the position bit-for-bit.
        let before = board.clone();
        board.make_move(mv);
        board.unmake_move(mv);
        assert_eq!(board, before, "unmake diverged after {mv} at ply {ply}");

        board.make_move(mv);
        assert!(
            board.is_consistent(),
            "bitboards, piece lists or hash desynced after {mv} at ply {ply}\n{board}"
        );

        // FEN round trip: emitting and re-parsing reproduces the position.
        let emitted = board.to_fen();
        let reparsed = Board::from_fen(&emitted).expect("emitted FEN should parse");
        assert_eq!(reparsed.to_fen(), emitted);
        assert_eq!(reparsed.zobrist(), board.zobrist(), "hash differs after FEN round trip");
    }
}

#[test]
fn test_random_walk_from_start() {
    random_walk(START_FEN, 0x1ED5_1CE5, 200);
}

#[test]
fn test_random_walk_from_kiwipete() {
    random_walk(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        0xBADC_0FFE,
        200,
    );
}

#[test]
fn test_random_walk_endgame_with_en_passant_traffic() {
    random_walk("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 42, 300);
}

#[test]
fn test_piece_lists_match_squares_in_start_position() {
    let board = Board::start_position();
    for color in [PieceColor::White, PieceColor::Black] {
        assert_eq!(board.piece_list(color, PieceKind::Pawn).count(), 8);
        assert_eq!(board.piece_list(color, PieceKind::Knight).count(), 2);
        assert_eq!(board.piece_list(color, PieceKind::Bishop).count(), 2);
        assert_eq!(board.piece_list(color, PieceKind::Rook).count(), 2);
        assert_eq!(board.piece_list(color, PieceKind::Queen).count(), 1);
        for kind in [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            for &square in board.piece_list(color, kind).squares() {
                assert!(board.piece_at(square).is(color, kind));
                assert!(board.bitboard(color, kind).contains(square));
            }
        }
    }
    assert!(board.is_consistent());
}
