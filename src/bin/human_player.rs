use clap::Parser;
use npuzzle_solver::engine::{Difficulty, Game, Move, PuzzleSize};
use npuzzle_solver::heuristics::{self, Heuristic};
use npuzzle_solver::solver::{Algorithm, SolverConfig};
use npuzzle_solver::utils::format_path;
use npuzzle_solver::worker::spawn_solve;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Puzzle size
    #[clap(short, long, value_enum, default_value_t = PuzzleSize::Eight)]
    size: PuzzleSize,

    /// Length of the scrambling walk
    #[clap(short = 'f', long, value_enum, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Seed for the first shuffle (defaults to the current time)
    #[clap(long)]
    seed: Option<u64>,

    /// Enable debug messages
    #[clap(short, long)]
    debug: bool,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}

fn hint_config() -> SolverConfig {
    SolverConfig::new(Algorithm::AStar).with_heuristic(Heuristic::LinearConflict)
}

/// Solves the current board on a worker thread and prints a progress dot while waiting.
fn show_hint(game: &mut Game) {
    let mut handle = spawn_solve(game.board().clone(), hint_config());
    print!("Thinking");
    let report = loop {
        if let Some(report) = handle.try_result() {
            break Some(report);
        }
        if !handle.is_running() {
            break handle.try_result();
        }
        print!(".");
        let _ = io::stdout().flush();
        thread::sleep(Duration::from_millis(100));
    };
    println!();

    match report.as_ref().and_then(|r| r.path()) {
        Some([]) => println!("Already solved."),
        Some(path) => {
            println!("Hint: move the blank {} ({} moves to go).", path[0], path.len());
            game.load_solution(path.to_vec());
        }
        None => println!("No hint available within the search budget."),
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }),
    )
    .init();

    let mut game = match Game::new(args.size.dimension()) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Cannot create puzzle: {}", e);
            return;
        }
    };
    let mut seed = args.seed.unwrap_or_else(clock_seed);
    if let Err(e) = game.shuffle(args.difficulty, seed) {
        eprintln!("Cannot shuffle puzzle: {}", e);
        return;
    }
    println!("Welcome to the {}!", game.board().puzzle_name());

    loop {
        println!("---------------------");
        println!("Moves: {}", game.moves());
        println!("{}", game.board());

        if game.is_solved() {
            println!();
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Moves: {}", game.moves());
            println!("---------------------");
            break;
        }

        print!("Enter a tile to slide (row col), a direction (up/down/left/right), 'h' hint, 'p' play hint, 'u' undo, 'n' new, 'a' analyze, 'q' quit: ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();
        match trimmed_input {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "u" => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Cannot undo further (no moves made since the shuffle).");
                }
                continue;
            }
            "h" => {
                show_hint(&mut game);
                continue;
            }
            "p" => {
                match game.play_next_move() {
                    Ok(Some(mv)) => println!("Played {}. Remaining: {}", mv, format_path(game.pending_moves())),
                    Ok(None) => println!("No hint loaded. Press 'h' first."),
                    Err(e) => println!("Hint no longer applies: {}", e),
                }
                continue;
            }
            "n" => {
                seed = seed.wrapping_add(1);
                if let Err(e) = game.shuffle(args.difficulty, seed) {
                    println!("Cannot shuffle: {}", e);
                }
                continue;
            }
            "a" => {
                println!("{}", heuristics::analyze(game.board()));
                continue;
            }
            _ => {}
        }

        if let Ok(mv) = trimmed_input.parse::<Move>() {
            match game.apply_move(mv) {
                Ok(()) => println!("Move processed."),
                Err(e) => println!("Invalid move: {}", e),
            }
            continue;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        if parts.len() == 2 {
            if let (Ok(r), Ok(c)) = (parts[0].parse::<usize>(), parts[1].parse::<usize>()) {
                match game.slide_tile(r, c) {
                    Ok(_) => println!("Move processed."),
                    Err(e) => println!("Invalid move: {}", e),
                }
            } else {
                println!("Invalid input: Please enter numbers for row and column (e.g., '2 1').");
            }
        } else {
            println!("Invalid input format. Use 'row col', a direction, 'h', 'p', 'u', 'n', 'a' or 'q'.");
        }
    }
}
