//! Independent model runs over many parameter sets.
//!
//! Each run owns its parameters and output buffers; only the forcing is
//! shared, read-only, so the runs are distributed across threads with rayon.

use rayon::prelude::*;
use tracing::info;

use crate::error::SwbmError;
use crate::evaluate::{Skill, correlate};
use crate::forcing::{DateWindow, ForcingSeries};
use crate::output::SimulationOutput;
use crate::params::Parameters;
use crate::swbm::simulate;

/// Result of one parameter set in a sweep.
#[derive(Debug)]
pub struct SweepResult {
    pub params: Parameters,
    pub outcome: Result<SweepRun, SwbmError>,
}

/// A successful sweep member.
#[derive(Debug)]
pub struct SweepRun {
    pub output: SimulationOutput,
    /// Skill over the window; `None` when the run was truncated and does
    /// not cover the observations.
    pub skill: Option<Skill>,
}

/// Simulate every parameter set and score it against the observations.
///
/// Results come back in the order of `param_sets`. A failing set only
/// affects its own entry.
pub fn sweep(
    forcing: &ForcingSeries,
    param_sets: &[Parameters],
    n_days: Option<usize>,
    window: &DateWindow,
) -> Vec<SweepResult> {
    info!(runs = param_sets.len(), "starting parameter sweep");
    param_sets
        .par_iter()
        .map(|params| SweepResult {
            params: *params,
            outcome: run_one(forcing, params, n_days, window),
        })
        .collect()
}

fn run_one(
    forcing: &ForcingSeries,
    params: &Parameters,
    n_days: Option<usize>,
    window: &DateWindow,
) -> Result<SweepRun, SwbmError> {
    let output = simulate(forcing, params, n_days)?;
    let skill = if output.len() == forcing.len() {
        Some(correlate(forcing, &output, window)?)
    } else {
        None
    };
    Ok(SweepRun { output, skill })
}

/// The sweep member with the highest finite skill sum.
pub fn best_by_skill(results: &[SweepResult]) -> Option<&SweepResult> {
    results
        .iter()
        .filter_map(|r| match &r.outcome {
            Ok(SweepRun {
                skill: Some(skill), ..
            }) if skill.sum.is_finite() => Some((r, skill.sum)),
            _ => None,
        })
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(r, _)| r)
}
