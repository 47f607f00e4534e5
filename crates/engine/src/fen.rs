//! Forsyth-Edwards Notation codec.
//!
//! Parsing produces a [`Setup`] that the board constructor turns into a full
//! position; emission is the exact inverse. Parsing a legal FEN and emitting
//! it again yields the canonical form of the input.

use crate::board::{castling, Board};
use crate::error::{EngineError, EngineResult};
use crate::piece::{Piece, PieceColor};
use crate::square::{file_of, parse_square, square_at, square_name};

/// A parsed FEN record, before derived state (lists, bitboards, hash) exists.
pub(crate) struct Setup {
    pub squares: [Piece; 64],
    pub side_to_move: PieceColor,
    pub castle_rights: u8,
    pub en_passant_file: u8,
    pub halfmove_clock: u8,
    pub fullmove_number: u16,
}

/// Parse the six whitespace-separated FEN fields.
pub(crate) fn parse(fen: &str) -> EngineResult<Setup> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(EngineError::FenFieldCount {
            found: fields.len(),
        });
    }

    let squares = parse_placement(fields[0])?;

    let side_to_move = match fields[1] {
        "w" => PieceColor::White,
        "b" => PieceColor::Black,
        other => {
            return Err(EngineError::FenSideToMove {
                field: other.to_string(),
            })
        }
    };

    let castle_rights = parse_castle_rights(fields[2])?;

    let en_passant_file = match fields[3] {
        "-" => 8,
        name => match parse_square(name) {
            Some(square) => file_of(square),
            None => {
                return Err(EngineError::FenEnPassant {
                    field: name.to_string(),
                })
            }
        },
    };

    let halfmove_clock: u8 = fields[4].parse().map_err(|_| EngineError::FenCounter {
        field: fields[4].to_string(),
    })?;
    let fullmove_number: u16 = fields[5].parse().map_err(|_| EngineError::FenCounter {
        field: fields[5].to_string(),
    })?;
    if fullmove_number == 0 {
        return Err(EngineError::FenCounter {
            field: fields[5].to_string(),
        });
    }

    Ok(Setup {
        squares,
        side_to_move,
        castle_rights,
        en_passant_file,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_placement(field: &str) -> EngineResult<[Piece; 64]> {
    let placement_err = |reason: String| EngineError::FenPlacement { reason };

    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(placement_err(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    let mut squares = [Piece::EMPTY; 64];
    for (rank, rank_field) in ranks.iter().enumerate() {
        let mut file = 0u8;
        for symbol in rank_field.chars() {
            if let Some(run) = symbol.to_digit(10) {
                if run == 0 || run > 8 {
                    return Err(placement_err(format!("bad empty run '{symbol}'")));
                }
                file += run as u8;
            } else {
                let piece = Piece::from_fen_char(symbol)
                    .ok_or_else(|| placement_err(format!("unknown piece letter '{symbol}'")))?;
                if file > 7 {
                    return Err(placement_err(format!("rank {} overflows", 8 - rank)));
                }
                squares[square_at(rank as u8, file) as usize] = piece;
                file += 1;
            }
        }
        if file != 8 {
            return Err(placement_err(format!(
                "rank {} has {} files",
                8 - rank,
                file
            )));
        }
    }

    Ok(squares)
}

fn parse_castle_rights(field: &str) -> EngineResult<u8> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for symbol in field.chars() {
        let bit = match symbol {
            'K' => castling::WHITE_KINGSIDE,
            'Q' => castling::WHITE_QUEENSIDE,
            'k' => castling::BLACK_KINGSIDE,
            'q' => castling::BLACK_QUEENSIDE,
            _ => {
                return Err(EngineError::FenCastleRights {
                    field: field.to_string(),
                })
            }
        };
        if rights & bit != 0 {
            return Err(EngineError::FenCastleRights {
                field: field.to_string(),
            });
        }
        rights |= bit;
    }
    Ok(rights)
}

/// Serialize a board into canonical FEN.
pub(crate) fn emit(board: &Board) -> String {
    let mut fen = String::with_capacity(90);

    for rank in 0..8u8 {
        let mut empty_run = 0;
        for file in 0..8u8 {
            let piece = board.piece_at(square_at(rank, file));
            if piece.is_empty() {
                empty_run += 1;
            } else {
                if empty_run > 0 {
                    fen.push(char::from_digit(empty_run, 10).unwrap_or('0'));
                    empty_run = 0;
                }
                fen.push(piece.fen_char());
            }
        }
        if empty_run > 0 {
            fen.push(char::from_digit(empty_run, 10).unwrap_or('0'));
        }
        if rank < 7 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match board.side_to_move() {
        PieceColor::White => 'w',
        PieceColor::Black => 'b',
    });

    fen.push(' ');
    let rights = board.castle_rights();
    if rights == 0 {
        fen.push('-');
    } else {
        // Each bit is tested against zero; equality with 1 only works for the
        // white-kingside mask.
        if rights & castling::WHITE_KINGSIDE != 0 {
            fen.push('K');
        }
        if rights & castling::WHITE_QUEENSIDE != 0 {
            fen.push('Q');
        }
        if rights & castling::BLACK_KINGSIDE != 0 {
            fen.push('k');
        }
        if rights & castling::BLACK_QUEENSIDE != 0 {
            fen.push('q');
        }
    }

    fen.push(' ');
    match board.en_passant_square() {
        Some(square) => fen.push_str(&square_name(square)),
        None => fen.push('-'),
    }

    fen.push_str(&format!(
        " {} {}",
        board.fifty_move_counter(),
        board.fullmove_number()
    ));

    fen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::piece::PieceKind;
    use crate::START_FEN;

    #[test]
    fn test_start_position_round_trip() {
        let board = Board::from_fen(START_FEN).expect("FEN should parse");
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let fens = [
            "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 42",
            "4k3/8/8/8/8/8/8/4K3 b - - 99 73",
        ];
        for fen in fens {
            let board = Board::from_fen(fen).expect("FEN should parse");
            assert_eq!(board.to_fen(), fen, "round trip failed for {fen}");
        }
    }

    #[test]
    fn test_parsed_placement() {
        let board = Board::from_fen(START_FEN).expect("FEN should parse");
        // a8 = 0 holds the black queenside rook, h1 = 63 the white one.
        assert!(board.piece_at(0).is(PieceColor::Black, PieceKind::Rook));
        assert!(board.piece_at(63).is(PieceColor::White, PieceKind::Rook));
        assert!(board.piece_at(4).is(PieceColor::Black, PieceKind::King));
        assert!(board.piece_at(60).is(PieceColor::White, PieceKind::King));
        assert_eq!(board.side_to_move(), PieceColor::White);
        assert_eq!(board.castle_rights(), 0b1111);
        assert_eq!(board.en_passant_file(), 8);
    }

    #[test]
    fn test_field_count_error() {
        let err = Board::from_fen("8/8/8/8/8/8/8/8 w -").unwrap_err();
        assert_eq!(err, EngineError::FenFieldCount { found: 3 });
    }

    #[test]
    fn test_bad_placement_is_rejected() {
        assert!(Board::from_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(Board::from_fen("xnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").is_err());
        assert!(Board::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").is_err());
        assert!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").is_err());
    }

    #[test]
    fn test_bad_side_and_counters_are_rejected() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1").unwrap_err(),
            EngineError::FenSideToMove { .. }
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - zero 1").unwrap_err(),
            EngineError::FenCounter { .. }
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 0").unwrap_err(),
            EngineError::FenCounter { .. }
        ));
    }

    #[test]
    fn test_bad_castle_and_ep_fields_are_rejected() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w KX - 0 1").unwrap_err(),
            EngineError::FenCastleRights { .. }
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9 0 1").unwrap_err(),
            EngineError::FenEnPassant { .. }
        ));
    }

    #[test]
    fn test_missing_king_is_rejected() {
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
            EngineError::InvalidPosition { .. }
        ));
        assert!(matches!(
            Board::from_fen("4k2k/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err(),
            EngineError::InvalidPosition { .. }
        ));
    }
}
