//! Player trait and implementations
//!
//! This module defines the Player trait and provides concrete implementations:
//! - RandomPlayer: uniformly random legal moves, used for self play and as a
//!   stand-in when the engine is unavailable
//! - CliPlayer: moves typed on the terminal

use crate::core::board::Board;
use crate::domain::MoveRequest;
use rand::rngs::SmallRng;

/// Interface implemented by different player types.
pub trait Player: Send {
    /// Choose the next move for the side to move, or `None` if the player
    /// has nothing to offer (no legal move, or input ended).
    fn select_move(&mut self, rng: &mut SmallRng, board: &Board) -> Option<MoveRequest>;

    /// Inform the player of a move that was rejected.
    fn handle_rejection(&mut self, _request: &MoveRequest, _reason: &str) {}
}

// Re-export implementations
pub mod random;
pub use random::RandomPlayer;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::CliPlayer;
