//! Trial execution helpers.
//!
//! A single problem is usually evaluated over several independent runs and
//! the per-criterion scores averaged.  These free functions are that loop —
//! deliberately thin, so GUIs and benchmarks can build their own around
//! [`Simulation`] without fighting a framework.

use std::collections::BTreeMap;

use crate::{RatingCriteria, SimResult, Simulation};

/// Outcome of one completed run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Problem name.
    pub name: String,
    /// Ticks actually executed (less than the configured length if the run
    /// was terminated early).
    pub ticks: u64,
    /// Final score per registered criterion.
    pub scores: BTreeMap<RatingCriteria, f64>,
}

/// Run the simulation once from a fresh setup and collect its result.
pub fn run_problem(sim: &mut Simulation) -> SimResult<SimulationResult> {
    sim.run()?;
    Ok(SimulationResult {
        name: sim.name().to_owned(),
        ticks: sim.current_tick().0,
        scores: sim.scores(),
    })
}

/// Run `runs` independent trials sequentially and average each criterion's
/// final score.
///
/// Each trial starts from a fresh setup; a deterministic problem therefore
/// yields the same scores every trial and the average equals any single run.
pub fn average_scores(
    sim: &mut Simulation,
    runs: u32,
) -> SimResult<BTreeMap<RatingCriteria, f64>> {
    let mut totals: BTreeMap<RatingCriteria, f64> = BTreeMap::new();
    for _ in 0..runs {
        let result = run_problem(sim)?;
        for (criterion, score) in result.scores {
            *totals.entry(criterion).or_insert(0.0) += score;
        }
    }
    if runs > 0 {
        for total in totals.values_mut() {
            *total /= runs as f64;
        }
    }
    Ok(totals)
}

/// Run `runs` independent trials on Rayon's thread pool and average each
/// criterion's final score.
///
/// `make_sim` builds a fresh [`Simulation`] per trial; trials share nothing
/// mutable (the region inside each vehicle manager may be a shared
/// `Arc<Region>`, which is read-only by construction).
#[cfg(feature = "parallel")]
pub fn average_scores_parallel<F>(
    make_sim: F,
    runs: u32,
) -> SimResult<BTreeMap<RatingCriteria, f64>>
where
    F: Fn() -> SimResult<Simulation> + Sync,
{
    use rayon::prelude::*;

    let results: Vec<SimulationResult> = (0..runs)
        .into_par_iter()
        .map(|_| {
            let mut sim = make_sim()?;
            run_problem(&mut sim)
        })
        .collect::<SimResult<_>>()?;

    let mut totals: BTreeMap<RatingCriteria, f64> = BTreeMap::new();
    for result in &results {
        for (&criterion, score) in &result.scores {
            *totals.entry(criterion).or_insert(0.0) += score;
        }
    }
    if runs > 0 {
        for total in totals.values_mut() {
            *total /= runs as f64;
        }
    }
    Ok(totals)
}
