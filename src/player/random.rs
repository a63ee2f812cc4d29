use crate::core::{board::Board, legal_moves};
use crate::domain::MoveRequest;
use rand::rngs::SmallRng;
use rand::Rng;

use super::Player;

/// Plays a uniformly random legal move.
pub struct RandomPlayer;

impl RandomPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RandomPlayer {
    fn select_move(&mut self, rng: &mut SmallRng, board: &Board) -> Option<MoveRequest> {
        let moves = legal_moves(board);
        if moves.is_empty() {
            return None;
        }
        let (piece_id, to) = &moves[rng.random_range(0..moves.len())];
        Some(MoveRequest::to(piece_id.clone(), *to))
    }
}
