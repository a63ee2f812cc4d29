#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};

use crate::core::{
    board::Board, decode_move, decode_square, encode_square, legal_destinations, Coordinate,
};
use crate::domain::MoveRequest;
use crate::ui::print_board;
use rand::rngs::SmallRng;

use super::{Player, RandomPlayer};

/// Reads moves typed on stdin.
pub struct CliPlayer {
    suggestions: RandomPlayer,
}

impl CliPlayer {
    pub fn new() -> Self {
        Self {
            suggestions: RandomPlayer::new(),
        }
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// What the user typed at the move prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliInput {
    Move(MoveRequest),
    /// Accept the suggested move.
    Suggestion,
    ShowMoves(String),
    Board,
    Help,
    Quit,
}

/// Parse one line of user input against the current board.
///
/// Moves may be given as a move token (`a2la3l`, legacy `e2e4`), as two
/// squares (`a2l a3l`) or as a piece id and a square (`wp1 a3l`).
pub fn parse_input(board: &Board, line: &str) -> Result<CliInput, String> {
    let mut parts = line.split_whitespace();
    let (first, second) = match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => return Ok(CliInput::Suggestion),
        (Some(a), b, None) => (a, b),
        _ => return Err("too many words; try 'help'".to_string()),
    };

    match (first.to_ascii_lowercase().as_str(), second) {
        ("help" | "?", None) => return Ok(CliInput::Help),
        ("quit" | "exit", None) => return Ok(CliInput::Quit),
        ("board", None) => return Ok(CliInput::Board),
        ("moves", Some(id)) => return Ok(CliInput::ShowMoves(id.to_string())),
        ("moves", None) => return Err("usage: moves <piece id>".to_string()),
        _ => {}
    }

    let (from, to) = match second {
        None => decode_move(first).map_err(|e| e.to_string())?,
        Some(dest) => {
            let to = decode_square(dest).map_err(|e| e.to_string())?;
            if board.piece(first).is_some() {
                return Ok(CliInput::Move(MoveRequest::to(first, to)));
            }
            (decode_square(first).map_err(|e| e.to_string())?, to)
        }
    };
    let piece = board
        .piece_at(from)
        .ok_or_else(|| format!("no piece on {}", from))?;
    Ok(CliInput::Move(MoveRequest::to(piece.id.clone(), to)))
}

fn format_squares(squares: &[Coordinate]) -> String {
    if squares.is_empty() {
        return "(none)".to_string();
    }
    squares
        .iter()
        .map(|c| encode_square(*c))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Player for CliPlayer {
    fn select_move(&mut self, rng: &mut SmallRng, board: &Board) -> Option<MoveRequest> {
        let suggestion = self.suggestions.select_move(rng, board);
        let stdin = io::stdin();
        loop {
            match &suggestion {
                Some(s) => std::print!(
                    "\n{} to move [suggestion: {} {}] (or 'help'): ",
                    board.side_to_move(),
                    s.piece_id,
                    s.destination().map(encode_square).unwrap_or_default()
                ),
                None => std::print!("\n{} to move (or 'help'): ", board.side_to_move()),
            }
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            match parse_input(board, line.trim()) {
                Ok(CliInput::Move(request)) => return Some(request),
                Ok(CliInput::Suggestion) => match &suggestion {
                    Some(s) => return Some(s.clone()),
                    None => std::println!("No legal move to suggest."),
                },
                Ok(CliInput::ShowMoves(id)) => match legal_destinations(board, &id) {
                    Ok(squares) => std::println!("{}: {}", id, format_squares(&squares)),
                    Err(e) => std::println!("✗ {}", e),
                },
                Ok(CliInput::Board) => print_board(board),
                Ok(CliInput::Help) => print_move_help(),
                Ok(CliInput::Quit) => return None,
                Err(e) => std::println!("✗ {}", e),
            }
        }
    }

    fn handle_rejection(&mut self, request: &MoveRequest, reason: &str) {
        std::println!("✗ {} cannot go there: {}", request.piece_id, reason);
    }
}

fn print_move_help() {
    std::println!("\n╔════════════════════════════════════════════════════════╗");
    std::println!("║                     MOVE HELP                          ║");
    std::println!("╠════════════════════════════════════════════════════════╣");
    std::println!("║ Squares: <file a-h><rank 1-8><layer l|m|u>             ║");
    std::println!("║   l = lower, m = middle, u = upper board               ║");
    std::println!("║                                                        ║");
    std::println!("║ Examples:                                              ║");
    std::println!("║   a2la3l    - move the piece on a2l to a3l             ║");
    std::println!("║   a2l a3l   - same, as two squares                     ║");
    std::println!("║   wp1 a3l   - move piece wp1 to a3l                    ║");
    std::println!("║   moves wq  - list squares piece wq can reach          ║");
    std::println!("║   board     - show the board                           ║");
    std::println!("║   quit      - leave the game                           ║");
    std::println!("║                                                        ║");
    std::println!("║ Press ENTER without input to play the suggestion.      ║");
    std::println!("╚════════════════════════════════════════════════════════╝\n");
}
