#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use layerchess::{
    init_logging, print_board, CliPlayer, EngineBridge, EngineConfig, Game, GameError, Player,
    RandomPlayer, DEFAULT_ENGINE, DEFAULT_NODES,
};

#[cfg(feature = "std")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct EngineArgs {
    #[arg(long, env = "LAYERCHESS_ENGINE", default_value = DEFAULT_ENGINE)]
    engine: String,
    #[arg(long = "engine-arg", help = "Extra argument passed to the engine (repeatable)")]
    engine_args: Vec<String>,
    #[arg(long, default_value_t = DEFAULT_NODES)]
    nodes: u32,
    #[arg(long, default_value_t = 60, help = "Search timeout in seconds, 0 to wait forever")]
    timeout_secs: u64,
    #[arg(long, help = "Fix RNG seed for reproducible suggestions and fallback moves")]
    seed: Option<u64>,
}

#[cfg(feature = "std")]
impl EngineArgs {
    fn config(&self) -> EngineConfig {
        let timeout = (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        EngineConfig::new(self.engine.clone())
            .with_args(self.engine_args.clone())
            .with_nodes(self.nodes)
            .with_search_timeout(timeout)
    }

    fn rng(&self) -> SmallRng {
        match self.seed {
            Some(s) => {
                println!("Using fixed seed: {} (game will be reproducible)", s);
                SmallRng::seed_from_u64(s)
            }
            None => {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            }
        }
    }
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play white against the engine on the terminal.
    Play {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long, help = "Play random moves for black if the engine fails or answers with an unplayable move")]
        fallback: bool,
    },
    /// Watch a random player (white) against the engine.
    Watch {
        #[command(flatten)]
        engine: EngineArgs,
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { engine, fallback } => {
            let mut rng = engine.rng();
            let config = engine.config();
            println!("Starting engine {}...", config.program);
            let mut game = Game::start(&config)?;
            game.engine().ready().await;
            let mut human = CliPlayer::new();
            run_game(&mut game, &mut human, &mut rng, fallback, usize::MAX).await?;
            game.into_engine().shutdown().await;
        }
        Commands::Watch { engine, max_plies } => {
            let mut rng = engine.rng();
            let config = engine.config();
            println!("Starting engine {}...", config.program);
            let bridge = EngineBridge::spawn(&config)?;
            bridge.ready().await;
            let mut game = Game::new(bridge);
            let mut white = RandomPlayer::new();
            run_game(&mut game, &mut white, &mut rng, false, max_plies).await?;
            game.into_engine().shutdown().await;
        }
    }
    Ok(())
}

/// Alternate `white` and the engine until the game ends, input runs out or
/// `max_plies` moves have been played.
#[cfg(feature = "std")]
async fn run_game(
    game: &mut Game,
    white: &mut dyn Player,
    rng: &mut SmallRng,
    fallback: bool,
    max_plies: usize,
) -> anyhow::Result<()> {
    let mut stand_in = RandomPlayer::new();
    let mut engine_down = false;
    print_board(game.board());

    while game.board().history().len() < max_plies {
        let Some(request) = white.select_move(rng, game.board()) else {
            println!("No move from white, leaving the game.");
            break;
        };
        let result = game.apply_human_move(&request);
        if !result.valid {
            white.handle_rejection(&request, result.reason.as_deref().unwrap_or("illegal"));
            continue;
        }
        println!(
            "White plays {}{}",
            result.notation.as_deref().unwrap_or("?"),
            result
                .captured
                .as_deref()
                .map(|c| format!(", capturing {}", c))
                .unwrap_or_default()
        );
        if result.checkmate {
            print_board(game.board());
            println!("White takes the black king and wins.");
            break;
        }

        if engine_down {
            if !play_stand_in(game, &mut stand_in, rng) {
                break;
            }
        } else {
            match game.request_engine_move().await {
                Ok(reply) => {
                    println!(
                        "Black plays {} ({}){}",
                        reply.notation,
                        reply.piece_id,
                        reply
                            .ponder
                            .as_deref()
                            .map(|p| format!(", expecting {}", p))
                            .unwrap_or_default()
                    );
                    if reply.result.checkmate {
                        print_board(game.board());
                        println!("Black takes the white king and wins.");
                        break;
                    }
                    if reply.game_ended {
                        println!("The engine expects no further play.");
                    }
                }
                Err(e) if fallback && (e.is_engine_unavailable() || e.is_bad_engine_reply()) => {
                    eprintln!("Engine failed ({}), black now plays random moves.", e);
                    engine_down = true;
                    if !play_stand_in(game, &mut stand_in, rng) {
                        break;
                    }
                }
                Err(e) if e.is_engine_unavailable() || e.is_bad_engine_reply() => {
                    eprintln!("Engine failed ({}). Rerun with --fallback to keep playing.", e);
                    break;
                }
                Err(GameError::NoEngineMove) => {
                    println!("The engine has no move. Game over.");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        print_board(game.board());
    }
    Ok(())
}

/// Play one random move for black. Returns false when the game is over.
#[cfg(feature = "std")]
fn play_stand_in(game: &mut Game, stand_in: &mut RandomPlayer, rng: &mut SmallRng) -> bool {
    let Some(request) = stand_in.select_move(rng, game.board()) else {
        println!("Black has no legal move.");
        return false;
    };
    let result = game.apply_human_move(&request);
    println!(
        "Black (stand-in) plays {}",
        result.notation.as_deref().unwrap_or("?")
    );
    if result.checkmate {
        println!("Black takes the white king and wins.");
        return false;
    }
    true
}
