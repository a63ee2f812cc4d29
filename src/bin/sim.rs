use layerchess::{apply_move, Board, Color, Player, RandomPlayer};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

const DEFAULT_MAX_PLIES: usize = 200;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if !(3..=4).contains(&args.len()) {
        eprintln!("Usage: {} <seed1> <seed2> [max_plies]", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let max_plies: usize = match args.get(3) {
        Some(n) => n.parse()?,
        None => DEFAULT_MAX_PLIES,
    };

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);
    let mut white = RandomPlayer::new();
    let mut black = RandomPlayer::new();
    let mut board = Board::new();

    while !board.is_over() && board.history().len() < max_plies {
        let request = if board.white_to_move() {
            white.select_move(&mut rng1, &board)
        } else {
            black.select_move(&mut rng2, &board)
        };
        let Some(request) = request else {
            break;
        };
        let to = request.destination()?;
        apply_move(&mut board, &request.piece_id, to)?;
    }

    let winner = board.winner().map(|c| match c {
        Color::White => "white",
        Color::Black => "black",
    });
    let score = board.score();
    let moves: Vec<&str> = board.notation_history().collect();

    let result = json!({
        "plies": board.history().len(),
        "winner": winner,
        "white_score": score.white,
        "black_score": score.black,
        "moves": moves,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
