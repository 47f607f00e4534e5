//! The AI contract and its worker-thread reply plumbing.
//!
//! An AI never touches the facade's board. It receives positions and applied
//! moves, searches on its own private copy (usually on a worker thread) and
//! posts its chosen move back through a [`ReplySink`]. The sink is consumed
//! by [`ReplySink::submit`], so "reply exactly once" is enforced by move
//! semantics, and the message crosses back to the thread that owns the
//! authoritative board via the facade's channel - the worker never mutates
//! shared state.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;

use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use lantern_engine::{Board, Move, MoveGenerator, PieceColor};

/// A chess-playing opponent attached to one side of a [`crate::GameModel`].
pub trait ChessAi: Send {
    /// Install the starting position. The AI typically keeps a private copy.
    fn init(&mut self, board: &Board);

    /// The opponent just played `applied` (already made on the caller's
    /// board); at some later point, invoke `reply` exactly once with a legal
    /// move for the side now to move.
    ///
    /// `applied` is the null move when the AI opens the game and there is no
    /// opponent move to report.
    ///
    /// Implementations must not block the caller: spawn a worker and return.
    /// The sink may be carried to and fired from that worker thread.
    fn accept_move(&mut self, applied: Move, reply: ReplySink);
}

/// A move posted back by an AI, tagged with the game generation it belongs
/// to so replies for abandoned positions can be dropped.
#[derive(Debug)]
pub struct AiReply {
    pub(crate) game_id: u64,
    pub(crate) color: PieceColor,
    pub(crate) mv: Move,
}

/// Single-use reply handle handed to [`ChessAi::accept_move`].
pub struct ReplySink {
    tx: Sender<AiReply>,
    game_id: u64,
    color: PieceColor,
}

impl ReplySink {
    pub(crate) fn new(tx: Sender<AiReply>, game_id: u64, color: PieceColor) -> Self {
        ReplySink { tx, game_id, color }
    }

    /// Deliver the AI's move. Consumes the sink.
    pub fn submit(self, mv: Move) {
        let reply = AiReply {
            game_id: self.game_id,
            color: self.color,
            mv,
        };
        if self.tx.send(reply).is_err() {
            warn!("game model dropped before the AI reply arrived");
        }
    }
}

/// Uniform-random legal mover.
///
/// Exists to exercise the AI contract and the threading model; it is not a
/// playing-strength engine. The private board lives behind an `Arc<Mutex>`
/// shared with the worker so the copy also records the AI's own replies.
pub struct RandomAi {
    board: Arc<Mutex<Board>>,
}

impl RandomAi {
    pub fn new() -> Self {
        RandomAi {
            board: Arc::new(Mutex::new(Board::start_position())),
        }
    }
}

impl Default for RandomAi {
    fn default() -> Self {
        RandomAi::new()
    }
}

impl ChessAi for RandomAi {
    fn init(&mut self, board: &Board) {
        *lock_board(&self.board) = board.clone();
    }

    fn accept_move(&mut self, applied: Move, reply: ReplySink) {
        if !applied.is_none() {
            lock_board(&self.board).make_move(applied);
        }

        let shared = Arc::clone(&self.board);
        thread::spawn(move || {
            let mut board = lock_board(&shared);
            let mut generator = MoveGenerator::new();
            let moves = generator.generate(&board);

            let Some(&chosen) = moves.as_slice().choose(&mut rand::rng()) else {
                debug!("no legal reply available, game is over");
                return;
            };
            board.make_move(chosen);
            drop(board);

            reply.submit(chosen);
        });
    }
}

/// A poisoned lock only means a previous worker panicked mid-search; the
/// board data itself is still structurally sound, so recover it.
fn lock_board(board: &Arc<Mutex<Board>>) -> std::sync::MutexGuard<'_, Board> {
    match board.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
