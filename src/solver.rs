//! Search algorithms over `Board` states.
//!
//! Every search runs on a fresh `Search`, which owns its frontier, visited sets, node arena and
//! statistics. `Search::run` consumes the instance, so a finished search cannot be reused and
//! no statistics carry over between runs.
//!
//! "Nodes explored" counts expanded nodes, i.e. nodes whose successors were generated. A node
//! that is recognised as the goal, or pruned by a depth or cost bound, is not counted. The
//! node budget caps this count and is checked, together with the optional time limit, before
//! every expansion.
use log::{debug, info, trace};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::engine::{Board, Move};
use crate::heuristics::{self, Heuristic};

/// Default node ceiling for breadth-first, depth-first and greedy search.
pub const DEFAULT_MAX_NODES: usize = 100_000;
/// Default node ceiling for A*, whose nodes carry more bookkeeping.
pub const ASTAR_MAX_NODES: usize = 50_000;
/// Default depth cap for depth-first search.
pub const DEFAULT_MAX_DEPTH: usize = 50;
/// Default number of IDA* threshold refinements.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// The search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum Algorithm {
    #[value(name = "bfs")]
    #[serde(rename = "bfs")]
    BreadthFirst,
    #[value(name = "dfs")]
    #[serde(rename = "dfs")]
    DepthFirst,
    #[value(name = "astar")]
    #[serde(rename = "astar")]
    AStar,
    #[value(name = "greedy")]
    #[serde(rename = "greedy")]
    GreedyBestFirst,
    #[value(name = "ida-star")]
    #[serde(rename = "ida-star")]
    IdaStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::BreadthFirst,
        Algorithm::DepthFirst,
        Algorithm::AStar,
        Algorithm::GreedyBestFirst,
        Algorithm::IdaStar,
    ];

    /// Short name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "bfs",
            Algorithm::DepthFirst => "dfs",
            Algorithm::AStar => "astar",
            Algorithm::GreedyBestFirst => "greedy",
            Algorithm::IdaStar => "ida-star",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "Breadth-First Search",
            Algorithm::DepthFirst => "Depth-First Search",
            Algorithm::AStar => "A* Search",
            Algorithm::GreedyBestFirst => "Greedy Best-First Search",
            Algorithm::IdaStar => "IDA* (Iterative Deepening A*)",
        }
    }

    /// Whether the configured `Heuristic` affects this algorithm.
    pub fn uses_heuristic(self) -> bool {
        matches!(
            self,
            Algorithm::AStar | Algorithm::GreedyBestFirst | Algorithm::IdaStar
        )
    }

    /// Whether a solution found by this algorithm is guaranteed to be shortest, given an
    /// admissible heuristic.
    pub fn is_optimal(self) -> bool {
        matches!(
            self,
            Algorithm::BreadthFirst | Algorithm::AStar | Algorithm::IdaStar
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown algorithm '{}'", s))
    }
}

/// Limits that force a search to stop with `SearchStatus::BudgetExceeded`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Budget {
    /// Maximum number of expanded nodes.
    pub max_nodes: usize,
    /// Maximum wall-clock time.
    pub time_limit: Option<Duration>,
    /// Depth cap for depth-first search.
    pub max_depth: usize,
    /// Maximum number of IDA* passes.
    pub max_iterations: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Budget {
            max_nodes: DEFAULT_MAX_NODES,
            time_limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Budget {
    /// The default budget for `algorithm`.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::AStar => Budget::default().with_max_nodes(ASTAR_MAX_NODES),
            _ => Budget::default(),
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Everything needed to run one search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    /// Ignored by the uninformed algorithms.
    pub heuristic: Heuristic,
    pub budget: Budget,
    /// Refuse unsolvable boards up front instead of searching them.
    pub check_solvability: bool,
}

impl SolverConfig {
    /// Manhattan distance, the algorithm's default budget and the solvability pre-check.
    pub fn new(algorithm: Algorithm) -> Self {
        SolverConfig {
            algorithm,
            heuristic: Heuristic::Manhattan,
            budget: Budget::for_algorithm(algorithm),
            check_solvability: true,
        }
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn without_solvability_check(mut self) -> Self {
        self.check_solvability = false;
        self
    }

    /// Label such as `astar(linear-conflict)` or `bfs`.
    pub fn label(&self) -> String {
        if self.algorithm.uses_heuristic() {
            format!("{}({})", self.algorithm, self.heuristic)
        } else {
            self.algorithm.to_string()
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Number of expanded nodes.
    pub nodes_explored: usize,
    /// Deepest expanded node, or the solution length if that is deeper.
    pub max_depth_reached: usize,
    /// Largest frontier seen. For IDA* this is the longest path held on the recursion stack.
    pub max_frontier_size: usize,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Number of moves in the solution, if one was found.
    pub solution_length: Option<usize>,
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchStatus {
    /// The goal was reached; the moves lead from the start board to the goal.
    Solved(Vec<Move>),
    /// Every reachable state was explored without reaching the goal.
    Exhausted,
    /// A node, time, depth or iteration limit stopped the search.
    BudgetExceeded,
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::Solved(_) => f.write_str("SOLVED"),
            SearchStatus::Exhausted => f.write_str("EXHAUSTED"),
            SearchStatus::BudgetExceeded => f.write_str("BUDGET_EXCEEDED"),
        }
    }
}

/// Result of one search: the outcome plus the statistics gathered while producing it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchReport {
    pub status: SearchStatus,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        matches!(self.status, SearchStatus::Solved(_))
    }

    /// The solution moves, if the search succeeded.
    pub fn path(&self) -> Option<&[Move]> {
        match &self.status {
            SearchStatus::Solved(path) => Some(path),
            _ => None,
        }
    }
}

/// A discovered state. Parents are indices into the arena of the search that created it.
#[derive(Debug)]
struct Node {
    board: Board,
    parent: Option<usize>,
    mv: Option<Move>,
    depth: usize,
}

/// Priority queue entry for A* and greedy search.
///
/// Entries pop in order of lowest `priority` (`f = g + h` for A*, `h` for greedy), then
/// lowest `h`, then earliest insertion.
#[derive(Debug)]
struct FrontierEntry {
    priority: f64,
    h: f64,
    seq: u64,
    index: usize,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Outcome of one cost-bounded IDA* pass below a node.
enum Bound {
    Found,
    /// Smallest `f` that exceeded the threshold, or infinity if nothing did.
    Next(f64),
    Aborted,
}

/// A single-use search.
pub struct Search {
    config: SolverConfig,
    arena: Vec<Node>,
    stats: SearchStats,
    started: Instant,
}

impl Search {
    pub fn new(config: SolverConfig) -> Self {
        Search {
            config,
            arena: Vec::new(),
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    /// Searches from `start` until the goal is reached, the reachable space is exhausted or
    /// the budget runs out.
    ///
    /// No solvability pre-check is done here; see `solve` for that.
    pub fn run(mut self, start: &Board) -> SearchReport {
        self.started = Instant::now();
        debug!(
            "starting {} on {} (budget {:?})",
            self.config.label(),
            start.puzzle_name(),
            self.config.budget
        );

        let status = match self.config.algorithm {
            Algorithm::BreadthFirst => self.breadth_first(start),
            Algorithm::DepthFirst => self.depth_first(start),
            Algorithm::AStar => self.best_first(start, false),
            Algorithm::GreedyBestFirst => self.best_first(start, true),
            Algorithm::IdaStar => self.ida_star(start),
        };

        self.stats.elapsed = self.started.elapsed();
        if let SearchStatus::Solved(path) = &status {
            self.stats.solution_length = Some(path.len());
            self.stats.max_depth_reached = self.stats.max_depth_reached.max(path.len());
        }
        debug!(
            "{} finished with {}: {} nodes explored in {:?}",
            self.config.label(),
            status,
            self.stats.nodes_explored,
            self.stats.elapsed
        );

        SearchReport {
            status,
            stats: self.stats,
        }
    }

    fn over_budget(&self) -> bool {
        if self.stats.nodes_explored >= self.config.budget.max_nodes {
            trace!("node budget of {} reached", self.config.budget.max_nodes);
            return true;
        }
        match self.config.budget.time_limit {
            Some(limit) if self.started.elapsed() >= limit => {
                trace!("time limit of {:?} reached", limit);
                true
            }
            _ => false,
        }
    }

    fn record_expansion(&mut self, depth: usize) {
        self.stats.nodes_explored += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);
    }

    fn note_frontier(&mut self, len: usize) {
        self.stats.max_frontier_size = self.stats.max_frontier_size.max(len);
    }

    fn estimate(&self, board: &Board) -> f64 {
        heuristics::evaluate(board, self.config.heuristic)
    }

    fn push_node(&mut self, board: Board, parent: Option<usize>, mv: Option<Move>) -> usize {
        let depth = parent.map_or(0, |p| self.arena[p].depth + 1);
        self.arena.push(Node {
            board,
            parent,
            mv,
            depth,
        });
        self.arena.len() - 1
    }

    /// Walks parent links from `index` back to the root and returns the moves in order.
    fn path_to(&self, index: usize) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.arena[index].depth);
        let mut current = Some(index);
        while let Some(i) = current {
            let node = &self.arena[i];
            if let Some(mv) = node.mv {
                moves.push(mv);
            }
            current = node.parent;
        }
        moves.reverse();
        moves
    }

    /// Level-by-level search. The goal test runs when a state is generated, so the search
    /// stops as soon as the goal enters the frontier.
    fn breadth_first(&mut self, start: &Board) -> SearchStatus {
        if start.is_goal() {
            return SearchStatus::Solved(Vec::new());
        }

        let root = self.push_node(start.clone(), None, None);
        let mut queue = VecDeque::from([root]);
        let mut visited: HashSet<Board> = HashSet::from([start.clone()]);

        while let Some(index) = queue.pop_front() {
            if self.over_budget() {
                return SearchStatus::BudgetExceeded;
            }
            let depth = self.arena[index].depth;
            let successors = self.arena[index].board.neighbors();
            self.record_expansion(depth);

            for (child, mv) in successors {
                if visited.contains(&child) {
                    continue;
                }
                visited.insert(child.clone());
                let is_goal = child.is_goal();
                let child_index = self.push_node(child, Some(index), Some(mv));
                if is_goal {
                    return SearchStatus::Solved(self.path_to(child_index));
                }
                queue.push_back(child_index);
            }
            self.note_frontier(queue.len());
        }

        SearchStatus::Exhausted
    }

    /// Depth-first search with an explicit stack and a depth cap.
    ///
    /// A state is searched again only when it is reached at a strictly smaller depth than
    /// before. If the cap cut off any branch, an unsuccessful search reports
    /// `BudgetExceeded` because the space was not fully explored.
    fn depth_first(&mut self, start: &Board) -> SearchStatus {
        if start.is_goal() {
            return SearchStatus::Solved(Vec::new());
        }

        let max_depth = self.config.budget.max_depth;
        let root = self.push_node(start.clone(), None, None);
        let mut stack = vec![root];
        let mut best_depth: HashMap<Board, usize> = HashMap::from([(start.clone(), 0)]);
        let mut cut_off = false;

        while let Some(index) = stack.pop() {
            let depth = self.arena[index].depth;
            // Superseded by a shallower visit pushed later.
            if best_depth.get(&self.arena[index].board) != Some(&depth) {
                continue;
            }
            if depth >= max_depth {
                cut_off = true;
                continue;
            }
            if self.over_budget() {
                return SearchStatus::BudgetExceeded;
            }
            let successors = self.arena[index].board.neighbors();
            self.record_expansion(depth);

            // Reverse so that the first move in `Move::ALL` is popped first.
            for (child, mv) in successors.into_iter().rev() {
                let child_depth = depth + 1;
                if best_depth
                    .get(&child)
                    .map_or(false, |&seen| seen <= child_depth)
                {
                    continue;
                }
                best_depth.insert(child.clone(), child_depth);
                let is_goal = child.is_goal();
                let child_index = self.push_node(child, Some(index), Some(mv));
                if is_goal {
                    return SearchStatus::Solved(self.path_to(child_index));
                }
                stack.push(child_index);
            }
            self.note_frontier(stack.len());
        }

        if cut_off {
            debug!("depth cap of {} cut off part of the search", max_depth);
            SearchStatus::BudgetExceeded
        } else {
            SearchStatus::Exhausted
        }
    }

    /// A* (`greedy == false`) or greedy best-first (`greedy == true`) search.
    ///
    /// A* keeps the best `g` seen per state and re-queues a state only when it is reached
    /// along a strictly cheaper path, reopening it if it was already expanded. Greedy queues
    /// each state once, ordered by `h` alone.
    fn best_first(&mut self, start: &Board, greedy: bool) -> SearchStatus {
        let mut frontier = BinaryHeap::new();
        let mut best_g: HashMap<Board, usize> = HashMap::from([(start.clone(), 0)]);
        let mut closed: HashSet<Board> = HashSet::new();
        let mut seq: u64 = 0;

        let h = self.estimate(start);
        let root = self.push_node(start.clone(), None, None);
        frontier.push(FrontierEntry {
            priority: h,
            h,
            seq,
            index: root,
        });

        while let Some(entry) = frontier.pop() {
            let index = entry.index;
            let depth = self.arena[index].depth;
            let board = &self.arena[index].board;
            // Closed, or superseded by an entry with a cheaper path.
            if closed.contains(board) || best_g.get(board).map_or(false, |&g| g < depth) {
                continue;
            }
            if board.is_goal() {
                return SearchStatus::Solved(self.path_to(index));
            }
            if self.over_budget() {
                return SearchStatus::BudgetExceeded;
            }

            let successors = self.arena[index].board.neighbors();
            closed.insert(self.arena[index].board.clone());
            self.record_expansion(depth);

            for (child, mv) in successors {
                let g = depth + 1;
                let queue_it = if greedy {
                    !best_g.contains_key(&child)
                } else {
                    best_g.get(&child).map_or(true, |&old| g < old)
                };
                if !queue_it {
                    continue;
                }
                // A cheaper path reopens a closed state.
                closed.remove(&child);
                best_g.insert(child.clone(), g);

                let h = self.estimate(&child);
                let priority = if greedy { h } else { g as f64 + h };
                let child_index = self.push_node(child, Some(index), Some(mv));
                seq += 1;
                frontier.push(FrontierEntry {
                    priority,
                    h,
                    seq,
                    index: child_index,
                });
            }
            self.note_frontier(frontier.len());
        }

        SearchStatus::Exhausted
    }

    /// Iterative-deepening A*: repeated depth-first passes bounded by `f = g + h`.
    ///
    /// The first threshold is `h(start)`; each further pass uses the smallest `f` that
    /// exceeded the previous threshold. Only the current path is kept in memory.
    fn ida_star(&mut self, start: &Board) -> SearchStatus {
        let mut threshold = self.estimate(start);
        let mut path = vec![start.clone()];
        let mut moves = Vec::new();

        for iteration in 0..self.config.budget.max_iterations {
            debug!("IDA* pass {} with threshold {}", iteration + 1, threshold);
            match self.bounded_search(&mut path, &mut moves, 0, threshold) {
                Bound::Found => return SearchStatus::Solved(moves),
                Bound::Aborted => return SearchStatus::BudgetExceeded,
                Bound::Next(next) if next.is_infinite() => return SearchStatus::Exhausted,
                Bound::Next(next) => threshold = next,
            }
        }

        debug!(
            "IDA* gave up after {} passes",
            self.config.budget.max_iterations
        );
        SearchStatus::BudgetExceeded
    }

    fn bounded_search(
        &mut self,
        path: &mut Vec<Board>,
        moves: &mut Vec<Move>,
        g: usize,
        threshold: f64,
    ) -> Bound {
        let Some(node) = path.last() else {
            return Bound::Next(f64::INFINITY);
        };
        let f = g as f64 + self.estimate(node);
        if f > threshold {
            return Bound::Next(f);
        }
        if node.is_goal() {
            return Bound::Found;
        }
        if self.over_budget() {
            return Bound::Aborted;
        }

        let successors = node.neighbors();
        self.record_expansion(g);
        self.note_frontier(path.len());

        let mut next = f64::INFINITY;
        for (child, mv) in successors {
            // Stepping straight back can never be part of a shortest path.
            if moves.last().map_or(false, |last| last.opposite() == mv) {
                continue;
            }
            path.push(child);
            moves.push(mv);
            match self.bounded_search(path, moves, g + 1, threshold) {
                Bound::Found => return Bound::Found,
                Bound::Aborted => return Bound::Aborted,
                Bound::Next(t) => next = next.min(t),
            }
            path.pop();
            moves.pop();
        }
        Bound::Next(next)
    }
}

/// Solves `board` with `config`.
///
/// When `config.check_solvability` is set, an unsolvable board is reported as
/// `SearchStatus::Exhausted` without searching. Otherwise this is `Search::run` on a fresh
/// instance.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::{Board, Move};
/// use npuzzle_solver::solver::{solve, Algorithm, SearchStatus, SolverConfig};
///
/// let board = Board::from_rows(&[[1, 2, 3], [4, 5, 6], [7, 0, 8]]).unwrap();
/// let report = solve(&board, &SolverConfig::new(Algorithm::AStar));
/// assert_eq!(report.status, SearchStatus::Solved(vec![Move::Right]));
/// assert_eq!(report.stats.solution_length, Some(1));
/// ```
pub fn solve(board: &Board, config: &SolverConfig) -> SearchReport {
    if config.check_solvability && !board.is_solvable() {
        info!(
            "{} board is not solvable, skipping {}",
            board.puzzle_name(),
            config.label()
        );
        return SearchReport {
            status: SearchStatus::Exhausted,
            stats: SearchStats::default(),
        };
    }
    Search::new(*config).run(board)
}
