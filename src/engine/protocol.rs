//! The subset of the UCI text protocol spoken to the engine.

use std::fmt;

/// Commands written to the engine's stdin, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    SetOption { name: String, value: String },
    UciNewGame,
    /// Full position from the start, replayed through `moves`.
    Position { moves: Vec<String> },
    GoNodes(u32),
    Stop,
    Quit,
}

impl fmt::Display for UciCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciCommand::SetOption { name, value } => {
                write!(f, "setoption name {} value {}", name, value)
            }
            UciCommand::UciNewGame => f.write_str("ucinewgame"),
            UciCommand::Position { moves } if moves.is_empty() => f.write_str("position startpos"),
            UciCommand::Position { moves } => {
                write!(f, "position startpos moves {}", moves.join(" "))
            }
            UciCommand::GoNodes(n) => write!(f, "go nodes {}", n),
            UciCommand::Stop => f.write_str("stop"),
            UciCommand::Quit => f.write_str("quit"),
        }
    }
}

/// The engine's answer to a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    /// Move token exactly as sent, two- or three-character squares.
    pub mv: String,
    /// Predicted reply. Informational only.
    pub ponder: Option<String>,
}

impl BestMove {
    /// The engine had no move to offer (`(none)` or `0000`).
    pub fn is_null(&self) -> bool {
        self.mv == "(none)" || self.mv == "0000"
    }

    /// No ponder move came back, so the engine expects no further play.
    pub fn is_final(&self) -> bool {
        self.ponder.is_none()
    }
}

/// Classification of one complete line of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    BestMove(BestMove),
    /// `bestmove` with no move token.
    MalformedBestMove(String),
    Other(String),
}

impl EngineLine {
    pub fn parse(line: &str) -> EngineLine {
        let mut tokens = line.split_ascii_whitespace();
        if tokens.next() != Some("bestmove") {
            return EngineLine::Other(line.to_string());
        }
        let Some(mv) = tokens.next() else {
            return EngineLine::MalformedBestMove(line.to_string());
        };
        let ponder = match tokens.next() {
            Some("ponder") => tokens.next().map(str::to_string),
            _ => None,
        };
        EngineLine::BestMove(BestMove {
            mv: mv.to_string(),
            ponder,
        })
    }
}
