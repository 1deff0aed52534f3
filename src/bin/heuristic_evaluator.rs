use clap::Parser;
use log::{info, warn};
use npuzzle_solver::engine::{Board, Difficulty, PuzzleSize};
use npuzzle_solver::heuristics::Heuristic;
use npuzzle_solver::solver::{Algorithm, SolverConfig};
use npuzzle_solver::worker::compare;
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Puzzle size
    #[clap(short, long, value_enum, default_value_t = PuzzleSize::Eight)]
    size: PuzzleSize,

    /// Length of the scrambling walk
    #[clap(short = 'f', long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Number of scrambled boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Seed of the first board; board `i` uses `seed + i`
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Algorithms to run with every heuristic
    #[clap(short, long, value_enum, num_args = 1.., default_values_t = [Algorithm::AStar, Algorithm::IdaStar])]
    algorithms: Vec<Algorithm>,

    /// Also run breadth-first search as a baseline
    #[clap(long)]
    baseline: bool,

    /// Enable debug messages
    #[clap(short, long)]
    debug: bool,
}

#[derive(Default)]
struct Tally {
    solved: u32,
    failed: u32,
    nodes: u64,
    moves: u64,
    secs: f64,
}

impl Tally {
    fn average(&self, total: u64) -> f64 {
        if self.solved == 0 {
            0.0
        } else {
            total as f64 / self.solved as f64
        }
    }
}

fn configurations(args: &Args) -> Vec<SolverConfig> {
    let mut configs = Vec::new();
    if args.baseline {
        configs.push(SolverConfig::new(Algorithm::BreadthFirst));
    }
    for &algorithm in &args.algorithms {
        if algorithm.uses_heuristic() {
            configs.extend(
                Heuristic::ALL
                    .into_iter()
                    .map(|h| SolverConfig::new(algorithm).with_heuristic(h)),
            );
        } else if !configs.iter().any(|c| c.algorithm == algorithm) {
            configs.push(SolverConfig::new(algorithm));
        }
    }
    configs
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "info" }),
    )
    .init();

    let configs = configurations(&args);
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    println!(
        "Starting heuristic evaluation for {} boards ({}x{}, {:?})...",
        args.boards,
        args.size.dimension(),
        args.size.dimension(),
        args.difficulty
    );

    for board_idx in 0..args.boards {
        let current_seed = args.seed + board_idx;
        let board = match Board::scrambled(
            args.size.dimension(),
            args.difficulty.scramble_moves(),
            current_seed,
        ) {
            Ok(board) => board,
            Err(e) => {
                warn!("Cannot build board {}: {}", board_idx, e);
                continue;
            }
        };

        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);
        for (config, report) in compare(&board, &configs) {
            let label = if config.algorithm.is_optimal() {
                format!("{}*", config.label())
            } else {
                config.label()
            };
            let tally = tallies.entry(label.clone()).or_default();
            match report.stats.solution_length {
                Some(len) => {
                    tally.solved += 1;
                    tally.nodes += report.stats.nodes_explored as u64;
                    tally.moves += len as u64;
                    tally.secs += report.stats.elapsed.as_secs_f64();
                }
                None => tally.failed += 1,
            }
            println!(
                "  {:<28} {:<16} Nodes: {:<8} Moves: {}",
                label,
                report.status.to_string(),
                report.stats.nodes_explored,
                report
                    .stats
                    .solution_length
                    .map_or("-".to_string(), |len| len.to_string())
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", args.boards);
    println!("\n--- Averages over solved boards (* = shortest solutions guaranteed) ---");

    let mut rows: Vec<(String, Tally)> = tallies.into_iter().collect();
    rows.sort_by(|a, b| {
        a.1.average(a.1.nodes)
            .total_cmp(&b.1.average(b.1.nodes))
            .then_with(|| a.0.cmp(&b.0))
    });
    for (label, tally) in &rows {
        println!(
            "{:<28}: Solved {:>3}/{:<3} Avg nodes = {:>10.1}  Avg moves = {:>6.2}  Avg time = {:.4}s",
            label,
            tally.solved,
            tally.solved + tally.failed,
            tally.average(tally.nodes),
            tally.average(tally.moves),
            tally.secs / f64::from(tally.solved.max(1)),
        );
    }
    info!("evaluated {} configurations", rows.len());
}
