//! Running searches off the calling thread.
//!
//! `spawn_solve` moves one search onto a background thread so an interactive front end can
//! keep reading input; `compare` fans several configurations out over the rayon pool.
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::engine::Board;
use crate::solver::{self, SearchReport, SolverConfig};

/// Handle to a search running on its own thread.
pub struct SolveHandle {
    config: SolverConfig,
    running: Arc<AtomicBool>,
    rx: mpsc::Receiver<SearchReport>,
    thread: Option<thread::JoinHandle<()>>,
}

/// Clears the shared running flag when the worker exits, including by unwinding.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Starts solving `board` on a new thread and returns immediately.
pub fn spawn_solve(board: Board, config: SolverConfig) -> SolveHandle {
    let running = Arc::new(AtomicBool::new(true));
    let (tx, rx) = mpsc::channel();

    let guard = RunningGuard(Arc::clone(&running));
    let thread = thread::spawn(move || {
        let _guard = guard;
        let report = solver::solve(&board, &config);
        if tx.send(report).is_err() {
            debug!("solve handle dropped before {} finished", config.label());
        }
    });

    SolveHandle {
        config,
        running,
        rx,
        thread: Some(thread),
    }
}

impl SolveHandle {
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// `true` until the worker has finished its search.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Returns the report if the search is finished, without blocking.
    pub fn try_result(&mut self) -> Option<SearchReport> {
        let report = self.rx.try_recv().ok()?;
        self.reap();
        Some(report)
    }

    /// Blocks until the search finishes. Returns `None` if the worker thread died.
    pub fn join(mut self) -> Option<SearchReport> {
        let report = self.rx.recv().ok();
        self.reap();
        report
    }

    fn reap(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("solver thread for {} panicked", self.config.label());
            }
        }
    }
}

/// Runs every configuration against `board` in parallel. Results keep the order of
/// `configs`.
pub fn compare(board: &Board, configs: &[SolverConfig]) -> Vec<(SolverConfig, SearchReport)> {
    debug!(
        "comparing {} configurations on {}",
        configs.len(),
        board.puzzle_name()
    );
    configs
        .par_iter()
        .map(|config| (*config, solver::solve(board, config)))
        .collect()
}
