//! Draw loop driving a [`CalibrationHarness`] to completion.
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::Result;
use crate::harness::{CalibrationHarness, RunSummary};
use crate::traits::SimulationModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One draw after the other on the calling thread.
    #[default]
    Sequential,
    /// Draws spread over the rayon thread pool.
    Parallel,
}

/// Replay every behavioural vector and close the result file.
///
/// The first failing draw stops the run: no further draws are started, the
/// records already completed are written and the error is returned.
pub fn run<M: SimulationModel>(
    harness: CalibrationHarness<M>,
    mode: ExecutionMode,
) -> Result<RunSummary> {
    let draws = harness.draws();
    info!(draws, ?mode, "starting GLUE run");
    let started = Instant::now();

    let outcome = match mode {
        ExecutionMode::Sequential => run_sequential(&harness),
        ExecutionMode::Parallel => run_parallel(&harness, draws),
    };
    if let Err(e) = outcome {
        warn!(error = %e, "run aborted");
        return Err(e);
    }

    let summary = harness.finish()?;
    info!(
        records = summary.records,
        elapsed_s = started.elapsed().as_secs_f64(),
        path = %summary.path.display(),
        "GLUE run complete"
    );
    Ok(summary)
}

fn run_sequential<M: SimulationModel>(harness: &CalibrationHarness<M>) -> Result<()> {
    while harness.run_draw()?.is_some() {}
    Ok(())
}

fn run_parallel<M: SimulationModel>(harness: &CalibrationHarness<M>, draws: usize) -> Result<()> {
    (0..draws)
        .into_par_iter()
        .try_for_each(|_| harness.run_draw().map(|_| ()))
}
