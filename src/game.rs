#![cfg(feature = "std")]
//! The game object exposed to the outer layer.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::core::{
    apply_move, decode_move, legal_destinations, Board, Coordinate, MoveError, NotationError,
    Score,
};
use crate::domain::{EngineMoveResult, MoveRequest, MoveResult};
use crate::engine::{terminated, EngineBridge, EngineError, EngineState};

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("cannot decode engine move: {0}")]
    Notation(#[from] NotationError),
    #[error("engine proposed illegal move {notation}: {source}")]
    IllegalEngineMove {
        notation: String,
        source: MoveError,
    },
    #[error("engine has no move to play")]
    NoEngineMove,
    #[error("the game is over")]
    GameOver,
}

impl GameError {
    /// The engine could not be reached; a retry or fallback is in order.
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, GameError::Engine(e) if e.is_unavailable())
    }

    /// The engine answered, but with nothing playable on this board (for
    /// instance a flat-board engine's move). The session itself is fine.
    pub fn is_bad_engine_reply(&self) -> bool {
        matches!(
            self,
            GameError::IllegalEngineMove { .. }
                | GameError::Notation(_)
                | GameError::Engine(EngineError::MalformedResponse { .. })
        )
    }
}

/// One game: the board and the engine session playing against it.
///
/// Mutating calls take `&mut self`, so only one move is ever in progress
/// on a game. Share it behind a `tokio::sync::Mutex` when several callers
/// need it.
pub struct Game {
    board: Board,
    engine: EngineBridge,
}

impl Game {
    /// A game from the standard starting position.
    pub fn new(engine: EngineBridge) -> Self {
        Self::with_board(Board::new(), engine)
    }

    /// A game from an arbitrary position. The engine's history is replaced
    /// with the board's.
    pub fn with_board(board: Board, engine: EngineBridge) -> Self {
        let history = board.notation_history().map(str::to_string).collect();
        Self {
            board,
            engine: engine.with_history(history),
        }
    }

    /// Spawn the configured engine and start a fresh game against it.
    pub fn start(config: &EngineConfig) -> Result<Self, GameError> {
        Ok(Self::new(EngineBridge::spawn(config)?))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn engine(&self) -> &EngineBridge {
        &self.engine
    }

    /// Give up the board and hand back the engine session, e.g. to shut it
    /// down.
    pub fn into_engine(self) -> EngineBridge {
        self.engine
    }

    /// Squares the piece may move to right now.
    pub fn legal_moves(&self, piece_id: &str) -> Result<Vec<Coordinate>, MoveError> {
        legal_destinations(&self.board, piece_id)
    }

    /// Validate and apply a move typed by the human. On success the move is
    /// added to the engine history; no search is started.
    pub fn apply_human_move(&mut self, request: &MoveRequest) -> MoveResult {
        let outcome = request
            .destination()
            .and_then(|to| apply_move(&mut self.board, &request.piece_id, to));
        match outcome {
            Ok(outcome) => {
                log::info!("human played {}", outcome.record.notation);
                self.engine.record_move(outcome.record.notation.clone());
                MoveResult::from_outcome(&outcome)
            }
            Err(e) => {
                log::info!("rejected move of {}: {}", request.piece_id, e);
                MoveResult::rejected(&e, self.board.white_to_move(), self.board.score())
            }
        }
    }

    /// Ask the engine for a move and apply it as if it had been typed. The
    /// proposal is validated like any other move; the board is untouched
    /// when it is rejected.
    pub async fn request_engine_move(&mut self) -> Result<EngineMoveResult, GameError> {
        if self.board.is_over() {
            return Err(GameError::GameOver);
        }
        let best = self.engine.search().await?;
        if best.is_null() {
            return Err(GameError::NoEngineMove);
        }

        let (from, to) = decode_move(&best.mv)?;
        let illegal = |source: MoveError| GameError::IllegalEngineMove {
            notation: best.mv.clone(),
            source,
        };
        let piece_id = self
            .board
            .piece_at(from)
            .map(|p| p.id.clone())
            .ok_or_else(|| illegal(MoveError::EmptySquare(from)))?;
        let outcome = apply_move(&mut self.board, &piece_id, to).map_err(illegal)?;

        log::info!("engine played {} ({})", outcome.record.notation, piece_id);
        self.engine.record_move(outcome.record.notation.clone());
        let result = MoveResult::from_outcome(&outcome);
        Ok(EngineMoveResult {
            notation: outcome.record.notation,
            piece_id,
            game_ended: best.is_final() || result.checkmate,
            ponder: best.ponder,
            result,
        })
    }

    /// Reset to the starting position and start a new game in the engine.
    pub async fn start_new_game(&mut self) -> Result<(), GameError> {
        self.board = Board::new();
        self.engine.new_game().await?;
        Ok(())
    }

    /// Replace the engine session with a freshly spawned one that carries
    /// the current move history.
    pub async fn restart_engine(&mut self, config: &EngineConfig) -> Result<(), GameError> {
        self.replace_engine(EngineBridge::spawn(config)?).await
    }

    /// Swap in another engine session, seeded with the current history.
    /// The old session is shut down once the new one has finished its
    /// handshake; if the new one dies first the old one is kept.
    pub async fn replace_engine(&mut self, fresh: EngineBridge) -> Result<(), GameError> {
        let history = self.board.notation_history().map(str::to_string).collect();
        let fresh = fresh.with_history(history);
        if fresh.ready().await == EngineState::Terminated {
            return Err(terminated("replacement engine exited during the handshake").into());
        }
        let old = std::mem::replace(&mut self.engine, fresh);
        old.shutdown().await;
        Ok(())
    }
}
