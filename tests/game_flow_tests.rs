//! Integration tests for the game-model facade: the click state machine,
//! tile snapshots, and the human-vs-AI turn loop over the reply channel.

use std::time::Duration;

use lantern_chess::engine::square::parse_square;
use lantern_chess::engine::{Move, PieceColor, PieceKind};
use lantern_chess::{BoardView, GameModel, GameOutcome, RandomAi, TileEffect, TileGrid};

fn click(model: &mut GameModel, name: &str) -> Option<Move> {
    let square = parse_square(name).expect("square name");
    model.handle_tile_clicked(square / 8, square % 8)
}

fn effect_at(grid: &TileGrid, name: &str) -> TileEffect {
    let square = parse_square(name).expect("square name");
    grid[(square / 8) as usize][(square % 8) as usize].effect
}

#[test]
fn test_click_empty_square_does_nothing_when_idle() {
    let mut model = GameModel::new();
    assert_eq!(click(&mut model, "e4"), None);
    let grid = model.tiles();
    for row in &grid {
        for tile in row {
            assert_eq!(tile.effect, TileEffect::None);
        }
    }
}

#[test]
fn test_click_enemy_piece_does_nothing_when_idle() {
    let mut model = GameModel::new();
    assert_eq!(click(&mut model, "e7"), None);
    assert_eq!(effect_at(&model.tiles(), "e7"), TileEffect::None);
}

#[test]
fn test_selecting_own_piece_highlights_and_spots_destinations() {
    let mut model = GameModel::new();
    assert_eq!(click(&mut model, "e2"), None);

    let grid = model.tiles();
    assert_eq!(effect_at(&grid, "e2"), TileEffect::Highlighted);
    assert_eq!(effect_at(&grid, "e3"), TileEffect::Spotted);
    assert_eq!(effect_at(&grid, "e4"), TileEffect::Spotted);
    assert_eq!(effect_at(&grid, "d2"), TileEffect::None);
}

#[test]
fn test_reselection_moves_the_highlight() {
    let mut model = GameModel::new();
    click(&mut model, "e2");
    click(&mut model, "g1");

    let grid = model.tiles();
    assert_eq!(effect_at(&grid, "g1"), TileEffect::Highlighted);
    assert_eq!(effect_at(&grid, "e2"), TileEffect::None);
    assert_eq!(effect_at(&grid, "f3"), TileEffect::Spotted);
}

#[test]
fn test_click_legal_destination_applies_the_move() {
    let mut model = GameModel::new();
    click(&mut model, "e2");
    let applied = click(&mut model, "e4").expect("e2-e4 applies");

    assert_eq!(applied.to_string(), "e2e4");
    assert_eq!(model.side_to_move(), PieceColor::Black);
    assert_eq!(model.board().en_passant_file(), 4);
    // Selection is gone after the move.
    assert_eq!(effect_at(&model.tiles(), "e4"), TileEffect::None);
}

#[test]
fn test_click_illegal_destination_clears_selection_silently() {
    let mut model = GameModel::new();
    click(&mut model, "e2");
    assert_eq!(click(&mut model, "e5"), None);

    let grid = model.tiles();
    assert_eq!(effect_at(&grid, "e2"), TileEffect::None);
    assert_eq!(effect_at(&grid, "e3"), TileEffect::None);
}

#[test]
fn test_capture_destination_is_targeted() {
    let mut model = GameModel::new();
    model
        .set_position("4k3/8/8/4p3/4R3/8/8/4K3 w - - 0 1")
        .expect("FEN should parse");
    click(&mut model, "e4");

    let grid = model.tiles();
    assert_eq!(effect_at(&grid, "e4"), TileEffect::Highlighted);
    assert_eq!(effect_at(&grid, "d4"), TileEffect::Spotted);
    assert_eq!(effect_at(&grid, "e5"), TileEffect::Targeted);
    // The rook's ray stops at the pawn; e6 is unreachable.
    assert_eq!(effect_at(&grid, "e6"), TileEffect::None);
}

#[test]
fn test_checked_effect_marks_the_king_tile() {
    let mut model = GameModel::new();
    model
        .set_position("4k3/8/8/8/8/8/4R3/4K3 b - - 0 1")
        .expect("FEN should parse");
    let grid = model.tiles();
    assert_eq!(effect_at(&grid, "e8"), TileEffect::Checked);
}

#[test]
fn test_publish_pushes_snapshot_to_view() {
    struct RecordingView {
        snapshots: usize,
        last_had_pieces: bool,
    }
    impl BoardView for RecordingView {
        fn set_position(&mut self, tiles: &TileGrid) {
            self.snapshots += 1;
            self.last_had_pieces = tiles
                .iter()
                .flatten()
                .filter(|tile| tile.piece.is_some())
                .count()
                == 32;
        }
    }

    let mut model = GameModel::new();
    let mut view = RecordingView {
        snapshots: 0,
        last_had_pieces: false,
    };
    model.publish(&mut view);
    assert_eq!(view.snapshots, 1);
    assert!(view.last_had_pieces);
}

#[test]
fn test_clicks_cannot_move_pieces_while_ai_owns_the_turn() {
    let mut model = GameModel::new();
    model.set_ai(PieceColor::Black, Box::new(RandomAi::new()));

    // White (human) plays; now it is the AI's turn.
    click(&mut model, "e2");
    click(&mut model, "e4");
    assert_eq!(model.side_to_move(), PieceColor::Black);

    // Clicking a black piece may select it, but no click applies a move.
    click(&mut model, "e7");
    assert_eq!(click(&mut model, "e5"), None);
    assert_eq!(model.side_to_move(), PieceColor::Black);
    assert!(model
        .board()
        .piece_at(parse_square("e5").unwrap())
        .is_empty());
}

#[test]
fn test_human_vs_ai_round_trip() {
    let mut model = GameModel::new();
    model.set_ai(PieceColor::Black, Box::new(RandomAi::new()));

    click(&mut model, "e2");
    let human_move = click(&mut model, "e4").expect("human move applies");
    assert_eq!(human_move.to_string(), "e2e4");

    // The facade dispatched to the AI; its reply crosses the channel and is
    // applied on this thread by the pump.
    let ai_move = model
        .pump_blocking(Duration::from_secs(5))
        .expect("AI reply within timeout");
    assert_eq!(model.side_to_move(), PieceColor::White);
    assert_eq!(model.board().ply_count(), 2);
    assert!(!ai_move.is_none());
}

#[test]
fn test_ai_opens_the_game_as_white() {
    let mut model = GameModel::new();
    model.set_ai(PieceColor::White, Box::new(RandomAi::new()));
    model.begin();

    let opening = model
        .pump_blocking(Duration::from_secs(5))
        .expect("white AI opens");
    assert!(!opening.is_none());
    assert_eq!(model.side_to_move(), PieceColor::Black);
    assert_eq!(model.board().ply_count(), 1);
}

#[test]
fn test_ai_vs_ai_alternates_in_game_order() {
    let mut model = GameModel::new();
    model.set_ai(PieceColor::White, Box::new(RandomAi::new()));
    model.set_ai(PieceColor::Black, Box::new(RandomAi::new()));
    model.begin();

    for ply in 1..=10u32 {
        if model.outcome() != GameOutcome::InProgress {
            break;
        }
        model
            .pump_blocking(Duration::from_secs(5))
            .expect("AI move within timeout");
        assert_eq!(model.board().ply_count(), ply);
    }
}

#[test]
fn test_stale_replies_are_dropped_after_reset() {
    let mut model = GameModel::new();
    model.set_ai(PieceColor::Black, Box::new(RandomAi::new()));

    click(&mut model, "e2");
    click(&mut model, "e4");

    // Abandon the game before the AI reply is consumed. The stale reply
    // must not mutate the new game.
    model
        .set_position("4k3/8/8/8/8/8/8/4K3 w - - 0 1")
        .expect("FEN should parse");
    assert_eq!(model.pump_blocking(Duration::from_millis(750)), None);
    assert_eq!(model.board().ply_count(), 0);
}

#[test]
fn test_promotion_through_clicks_picks_queen() {
    let mut model = GameModel::new();
    model
        .set_position("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
        .expect("FEN should parse");

    click(&mut model, "a7");
    let applied = click(&mut model, "a8").expect("promotion applies");
    assert_eq!(applied.promotion_kind(), Some(PieceKind::Queen));
}

#[test]
fn test_snapshot_serializes_for_remote_views() {
    let mut model = GameModel::new();
    let grid = model.tiles();
    let json = serde_json::to_string(&grid).expect("snapshot serializes");
    let back: TileGrid = serde_json::from_str(&json).expect("snapshot deserializes");
    assert_eq!(back, grid);
}
