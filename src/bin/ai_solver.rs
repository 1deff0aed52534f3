use clap::Parser;
use log::debug;
use npuzzle_solver::engine::Board;
use npuzzle_solver::heuristics::{self, Heuristic};
use npuzzle_solver::solver::{solve, Algorithm, Budget, SearchReport, SearchStatus, SolverConfig};
use npuzzle_solver::utils::{format_path, format_path_compact, read_board_file};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Search algorithm
    #[clap(short, long, value_enum, default_value_t = Algorithm::AStar)]
    algorithm: Algorithm,

    /// Heuristic for astar, greedy and ida-star
    #[clap(long, value_enum, default_value_t = Heuristic::Manhattan)]
    heuristic: Heuristic,

    /// Maximum number of nodes to expand (defaults depend on the algorithm)
    #[clap(long)]
    max_nodes: Option<usize>,

    /// Wall-clock limit in seconds
    #[clap(long)]
    time_limit: Option<f64>,

    /// Depth cap for dfs
    #[clap(long)]
    max_depth: Option<usize>,

    /// Maximum number of ida-star passes
    #[clap(long)]
    max_iterations: Option<usize>,

    /// Search even if the board fails the parity test
    #[clap(long)]
    no_solvability_check: bool,

    /// Print the result as JSON instead of text
    #[clap(long)]
    json: bool,

    /// Enable debug messages
    #[clap(short, long)]
    debug: bool,

    /// Path to the board file (one row per line, 0 or _ for the blank)
    board_file: PathBuf,
}

impl Args {
    fn config(&self) -> SolverConfig {
        let mut budget = Budget::for_algorithm(self.algorithm);
        if let Some(max_nodes) = self.max_nodes {
            budget = budget.with_max_nodes(max_nodes);
        }
        if let Some(secs) = self.time_limit {
            budget = budget.with_time_limit(Duration::from_secs_f64(secs.max(0.0)));
        }
        if let Some(max_depth) = self.max_depth {
            budget = budget.with_max_depth(max_depth);
        }
        if let Some(max_iterations) = self.max_iterations {
            budget = budget.with_max_iterations(max_iterations);
        }

        let config = SolverConfig::new(self.algorithm)
            .with_heuristic(self.heuristic)
            .with_budget(budget);
        if self.no_solvability_check {
            config.without_solvability_check()
        } else {
            config
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    puzzle: String,
    algorithm: Algorithm,
    heuristic: Option<Heuristic>,
    solvable: bool,
    #[serde(flatten)]
    report: &'a SearchReport,
}

fn print_text(board: &Board, config: &SolverConfig, report: &SearchReport) {
    println!(
        "Searching with {} ({})...\n",
        config.algorithm.description(),
        config.label()
    );
    match &report.status {
        SearchStatus::Solved(path) => {
            println!("Solution found:\n");
            println!("Moves ({}): {}", path.len(), format_path(path));
            println!("Compact:   {}", format_path_compact(path));
            if !config.algorithm.is_optimal() {
                println!("({} does not guarantee a shortest solution)", config.algorithm);
            }
            if let Ok(end) = board.replay(path) {
                println!("\nFinal board state:\n{}\n", end);
            }
        }
        SearchStatus::Exhausted if !board.is_solvable() => {
            println!("Board is not solvable.\n");
        }
        SearchStatus::Exhausted => println!("No solution exists.\n"),
        SearchStatus::BudgetExceeded => println!("Search budget exceeded.\n"),
    }

    let stats = &report.stats;
    println!("Nodes explored:    {}", stats.nodes_explored);
    println!("Max depth reached: {}", stats.max_depth_reached);
    println!("Max frontier size: {}", stats.max_frontier_size);
    println!("Time:              {:.3}s", stats.elapsed.as_secs_f64());
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "debug" } else { "warn" }),
    )
    .init();

    let board = match read_board_file(&args.board_file) {
        Ok(board) => board,
        Err(e) => {
            eprintln!(
                "Failed to read board from {}: {}",
                args.board_file.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };
    let config = args.config();
    debug!("solver configuration: {:?}", config);

    if !args.json {
        println!("Loaded {} from {}\n", board.puzzle_name(), args.board_file.display());
        println!("Initial board state:\n{}\n", board);
        println!("{}\n", heuristics::analyze(&board));
    }

    let report = solve(&board, &config);

    if args.json {
        let output = JsonOutput {
            puzzle: board.puzzle_name(),
            algorithm: config.algorithm,
            heuristic: config.algorithm.uses_heuristic().then_some(config.heuristic),
            solvable: board.is_solvable(),
            report: &report,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode result: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_text(&board, &config, &report);
    }

    if report.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
