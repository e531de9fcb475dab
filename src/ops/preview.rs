//! Soft time budget for live-preview calls.
//!
//! A drag preview re-runs a shape or fill on every pointer move. The engine
//! never cancels work; the budget only measures a call and logs a warning
//! when it runs long.

use std::time::{Duration, Instant};

/// Budget for one interactive preview frame.
pub const DEFAULT_PREVIEW_BUDGET: Duration = Duration::from_millis(100);

/// A finished preview call and how long it took.
#[derive(Debug)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
    pub over_budget: bool,
}

/// Run `f` to completion and report its duration against `budget`.
pub fn run_with_budget<T>(label: &str, budget: Duration, f: impl FnOnce() -> T) -> Timed<T> {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    let over_budget = elapsed > budget;
    if over_budget {
        log_warn!(
            "Preview '{}' took {:.1} ms (budget {} ms)",
            label,
            elapsed.as_secs_f64() * 1000.0,
            budget.as_millis()
        );
    }
    Timed {
        value,
        elapsed,
        over_budget,
    }
}

/// `run_with_budget` with the default 100 ms budget.
pub fn run_preview<T>(label: &str, f: impl FnOnce() -> T) -> Timed<T> {
    run_with_budget(label, DEFAULT_PREVIEW_BUDGET, f)
}
