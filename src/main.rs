//! Diamond Duel command line.
//!
//! ## Usage
//!
//! - `diamond-duel` - Run a short demo
//! - `diamond-duel console` - Play over a line-oriented text console
//! - `diamond-duel watch` - Watch minimax and MCTS play each other
//!
//! Set `RUST_LOG=info` to see every turn, `RUST_LOG=debug` for search details.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use diamond_duel::board::{Board, CaptureRule, Point, Side, Topology};
use diamond_duel::console::ConsoleEngine;
use diamond_duel::game::{Event, Game, GameConfig, Mode, Step};
use diamond_duel::mcts::{Mcts, MctsConfig};
use diamond_duel::minimax;
use diamond_duel::position::{GameState, Move};

/// Diamond Duel: movement-and-capture on a 21-point lattice
#[derive(Parser)]
#[command(name = "diamond-duel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Seed for the MCTS random stream
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Which immobile pieces are captured. The default, `contested`, is the
    /// interactive rule; the library default and strict rule is `immobilized`,
    /// under which the opening move ends the game
    #[arg(long, global = true, value_enum, default_value_t = RuleArg::Contested)]
    capture_rule: RuleArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a short demo of both engines
    Demo,
    /// Start the text console
    Console,
    /// Watch an AI-vs-AI game
    Watch {
        /// Stop after this many moves
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
        /// Pause between moves in milliseconds (default: 500)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RuleArg {
    /// Every piece with no empty neighbour
    Immobilized,
    /// Only immobile pieces touching an enemy piece
    Contested,
}

impl From<RuleArg> for CaptureRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Immobilized => CaptureRule::Immobilized,
            RuleArg::Contested => CaptureRule::Contested,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let topology = Topology::standard().context("built-in lattice is invalid")?;
    let board = Board::new(topology, cli.capture_rule.into());
    let config = GameConfig {
        seed: cli.seed,
        ..GameConfig::default()
    };

    match cli.command {
        Some(Commands::Console) => {
            let mut console = ConsoleEngine::new(Game::new(board, config));
            console.run().context("console I/O failed")?;
        }
        Some(Commands::Watch {
            max_turns,
            delay_ms,
        }) => {
            let config = match delay_ms {
                Some(ms) => GameConfig {
                    move_delay: Duration::from_millis(ms),
                    ..config
                },
                None => config,
            };
            run_watch(board, config, max_turns)?;
        }
        Some(Commands::Demo) | None => run_demo(&board, cli.seed)?,
    }
    Ok(())
}

fn run_demo(board: &Board, seed: Option<u64>) -> Result<()> {
    println!("Diamond Duel\n");

    println!("=== Initial Layout ===");
    let mut state = GameState::initial();
    println!("{state}");

    println!("=== HUMAN opens ===");
    let mv = Move::new(Point::BOTTOM_INNER, Point::CENTER_SOUTH);
    let captures = state
        .apply_move(board, Side::Human, mv)
        .with_context(|| format!("opening move {mv} rejected"))?;
    println!("HUMAN {mv}, {} captured", captures.len());
    println!("{state}");
    if let Some(outcome) = state.outcome() {
        println!("Game over: {outcome}");
        return Ok(());
    }

    println!("=== Minimax (depth 4) ===");
    let result = minimax::best_move(board, &state, Side::Ai, 4);
    match result.best {
        Some(best) => println!("Best: {best}, score {}, {} nodes", result.score, result.nodes),
        None => println!("No move"),
    }

    println!("\n=== MCTS (fast) ===");
    let config = MctsConfig::fast();
    let mut mcts = match seed {
        Some(seed) => Mcts::with_seed(config, seed),
        None => Mcts::new(config),
    };
    let search = mcts.search(board, &state, Side::Ai);
    match search.best {
        Some(best) => println!(
            "Best: {best}, {} iterations, {} nodes",
            search.stats.iterations, search.stats.nodes
        ),
        None => println!("No move"),
    }
    for (mv, visits, winrate) in &search.stats.root_children {
        println!(
            "  {:<28} visits {visits:>5}  winrate {:.1}%",
            mv.to_string(),
            winrate * 100.0
        );
    }
    Ok(())
}

fn run_watch(board: Board, config: GameConfig, max_turns: u32) -> Result<()> {
    let delay = config.move_delay;
    let mut game = Game::new(board, config);
    game.handle(Event::SelectMode(Mode::AiVsAi))
        .context("cannot start AI-vs-AI")?;

    println!("{}", game.state());
    while game.outcome().is_none() && game.snapshot().turn < max_turns {
        match game.step() {
            Step::Moved(side, mv) => {
                let snap = game.snapshot();
                println!("{:>3}. {side} {mv}", snap.turn);
                for c in &snap.last_captures {
                    println!("     captured {} {}", c.side, c.point);
                }
            }
            Step::Passed(side) => println!("     {side} passes"),
            Step::Idle => break,
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    println!("\n{}", game.state());
    match game.outcome() {
        Some(outcome) => println!("Result: {outcome}"),
        None => {
            info!("stopped after {max_turns} moves");
            println!("Result: unfinished after {max_turns} moves");
        }
    }
    Ok(())
}
