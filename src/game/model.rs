//! The game-model facade.
//!
//! `GameModel` is the single owner of the authoritative board. Everything
//! funnels through it: view clicks, AI replies, position resets. AI replies
//! arrive over an internal channel and are only applied by [`GameModel::pump`]
//! on the thread that owns the model, so the board is never mutated from a
//! worker.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use lantern_engine::square::square_at;
use lantern_engine::{Board, EngineError, Move, MoveGenerator, PieceColor};

use super::ai::{AiReply, ChessAi, ReplySink};
use super::selection::Selection;
use super::tiles::{BoardView, FieldTileState, TileEffect, TileGrid, TilePiece};

/// Terminal state of the current game, recomputed after every applied move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    InProgress,
    Checkmate { winner: PieceColor },
    Stalemate,
    DrawByRule,
}

enum PlayerSlot {
    Human,
    Ai(Box<dyn ChessAi>),
}

impl PlayerSlot {
    fn is_human(&self) -> bool {
        matches!(self, PlayerSlot::Human)
    }
}

/// The facade owning the board, the move generator, the selection state and
/// the per-side player slots.
pub struct GameModel {
    board: Board,
    generator: MoveGenerator,
    selection: Selection,
    players: [PlayerSlot; 2],
    reply_tx: Sender<AiReply>,
    reply_rx: Receiver<AiReply>,
    game_id: u64,
    outcome: GameOutcome,
    last_move: Move,
}

impl Default for GameModel {
    fn default() -> Self {
        GameModel::new()
    }
}

impl GameModel {
    /// A model on the startup position with two human players.
    pub fn new() -> Self {
        let (reply_tx, reply_rx) = channel();
        GameModel {
            board: Board::start_position(),
            generator: MoveGenerator::new(),
            selection: Selection::default(),
            players: [PlayerSlot::Human, PlayerSlot::Human],
            reply_tx,
            reply_rx,
            game_id: 0,
            outcome: GameOutcome::InProgress,
            last_move: Move::NONE,
        }
    }

    /// Attach an AI to one side and hand it the current position.
    pub fn set_ai(&mut self, color: PieceColor, mut ai: Box<dyn ChessAi>) {
        ai.init(&self.board);
        info!(?color, "AI attached");
        self.players[color.index()] = PlayerSlot::Ai(ai);
    }

    /// Detach the AI (if any) from one side.
    pub fn set_human(&mut self, color: PieceColor) {
        self.players[color.index()] = PlayerSlot::Human;
    }

    /// Parse a FEN record and install the position. On failure the previous
    /// position stays untouched. Attached AIs are re-initialized.
    pub fn set_position(&mut self, fen: &str) -> Result<(), EngineError> {
        let board = Board::from_fen(fen)?;
        info!(fen, "position installed");
        self.board = board;
        self.game_id += 1;
        self.last_move = Move::NONE;
        self.selection.clear();
        self.refresh_outcome();
        for slot in &mut self.players {
            if let PlayerSlot::Ai(ai) = slot {
                ai.init(&self.board);
            }
        }
        Ok(())
    }

    /// Start play: when the side to move is AI-controlled, hand it the
    /// position so it produces the first reply. A no-op for human sides.
    pub fn begin(&mut self) {
        self.dispatch_to_mover();
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    #[inline]
    pub fn side_to_move(&self) -> PieceColor {
        self.board.side_to_move()
    }

    /// Whether the side to move is in check right now.
    pub fn is_check(&mut self) -> bool {
        self.generator.generate(&self.board);
        self.generator.in_check()
    }

    /// Snapshot the board for the view: every square's piece plus its
    /// effect. Effects come from the selection (highlighted square, spotted
    /// empty destinations, targeted capture destinations) and from check
    /// (the friendly king's square).
    pub fn tiles(&mut self) -> TileGrid {
        self.generator.generate(&self.board);
        let in_check = self.generator.in_check();
        let king = self.board.king_square(self.board.side_to_move());

        let mut grid: TileGrid = Default::default();
        for row in 0..8u8 {
            for col in 0..8u8 {
                let square = square_at(row, col);
                let piece = self.board.piece_at(square);

                let effect = if self.selection.square() == Some(square) {
                    TileEffect::Highlighted
                } else if self.selection.is_target(square) {
                    if piece.is_empty() {
                        TileEffect::Spotted
                    } else {
                        TileEffect::Targeted
                    }
                } else if in_check && square == king {
                    TileEffect::Checked
                } else {
                    TileEffect::None
                };

                grid[row as usize][col as usize] = FieldTileState {
                    piece: if piece.is_empty() {
                        None
                    } else {
                        Some(TilePiece {
                            color: piece.color(),
                            kind: piece.kind(),
                        })
                    },
                    effect,
                };
            }
        }
        grid
    }

    /// Push the current snapshot to a view.
    pub fn publish(&mut self, view: &mut dyn BoardView) {
        let grid = self.tiles();
        view.set_position(&grid);
    }

    /// The click state machine. Returns the move that was applied, if any.
    ///
    /// - a click on a piece of the side to move selects it (re-selection
    ///   included);
    /// - with a selection active and a human on turn, a click on a legal
    ///   destination applies the move (queen on promotions) and anything
    ///   else silently clears the selection;
    /// - while an AI owns the turn, clicks never move pieces.
    pub fn handle_tile_clicked(&mut self, row: u8, col: u8) -> Option<Move> {
        if row > 7 || col > 7 {
            warn!(row, col, "click outside the board ignored");
            return None;
        }
        let square = square_at(row, col);
        let side = self.board.side_to_move();
        let piece = self.board.piece_at(square);

        if self.outcome != GameOutcome::InProgress {
            return None;
        }

        if !piece.is_empty() && piece.is_color(side) {
            let moves: Vec<Move> = self
                .generator
                .generate(&self.board)
                .into_iter()
                .filter(|m| m.from() == square)
                .collect();
            debug!(square, count = moves.len(), "piece selected");
            self.selection.select(square, moves);
            return None;
        }

        if !self.selection.is_selected() {
            return None;
        }
        if !self.players[side.index()].is_human() {
            // The AI owns the turn; leave the selection alone.
            return None;
        }

        match self.selection.move_to(square) {
            Some(mv) => {
                self.apply_move(mv);
                Some(mv)
            }
            None => {
                debug!(square, "not a legal destination, selection cleared");
                self.selection.clear();
                None
            }
        }
    }

    /// Drain the AI reply channel without blocking, applying at most one
    /// pending move. Call this from the thread that owns the model (a frame
    /// tick, typically).
    pub fn pump(&mut self) -> Option<Move> {
        while let Ok(reply) = self.reply_rx.try_recv() {
            if let Some(mv) = self.accept_reply(reply) {
                return Some(mv);
            }
        }
        None
    }

    /// Like [`GameModel::pump`] but waits up to `timeout` for a reply.
    pub fn pump_blocking(&mut self, timeout: Duration) -> Option<Move> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.reply_rx.recv_timeout(remaining) {
                Ok(reply) => {
                    if let Some(mv) = self.accept_reply(reply) {
                        return Some(mv);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }

    fn accept_reply(&mut self, reply: AiReply) -> Option<Move> {
        if reply.game_id != self.game_id {
            debug!(?reply, "stale AI reply for an abandoned game dropped");
            return None;
        }
        if reply.color != self.board.side_to_move() {
            error!(?reply, "AI replied out of turn");
            debug_assert!(false, "AI replied out of turn");
            return None;
        }
        let legal = self.generator.generate(&self.board);
        if !legal.contains(&reply.mv) {
            error!(mv = %reply.mv, "AI replied with an illegal move");
            debug_assert!(false, "AI replied with an illegal move");
            return None;
        }

        self.apply_move(reply.mv);
        Some(reply.mv)
    }

    fn apply_move(&mut self, mv: Move) {
        info!(mv = %mv, side = ?self.board.side_to_move(), "move applied");
        self.board.make_move(mv);
        self.last_move = mv;
        self.selection.clear();
        self.refresh_outcome();
        if self.outcome == GameOutcome::InProgress {
            self.dispatch_to_mover();
        }
    }

    /// Hand the last applied move to the AI owning the side to move, if any.
    /// Alternating dispatch means a side's next `accept_move` can only
    /// follow the application of its previous reply.
    fn dispatch_to_mover(&mut self) {
        let side = self.board.side_to_move();
        let sink = ReplySink::new(self.reply_tx.clone(), self.game_id, side);
        if let PlayerSlot::Ai(ai) = &mut self.players[side.index()] {
            debug!(?side, mv = %self.last_move, "dispatching to AI");
            ai.accept_move(self.last_move, sink);
        }
    }

    fn refresh_outcome(&mut self) {
        let legal = self.generator.generate(&self.board);
        let side = self.board.side_to_move();
        self.outcome = if legal.is_empty() {
            if self.generator.in_check() {
                GameOutcome::Checkmate {
                    winner: side.opponent(),
                }
            } else {
                GameOutcome::Stalemate
            }
        } else if self.board.is_draw_by_rule() {
            GameOutcome::DrawByRule
        } else {
            GameOutcome::InProgress
        };

        if self.outcome != GameOutcome::InProgress {
            info!(outcome = ?self.outcome, "game over");
        }
    }
}
