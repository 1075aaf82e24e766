//! Stage chains
//!
//! Both simple and planetary gearboxes are a series of stages where each
//! stage's output speed drives the next. [`propagate`] walks such a series
//! and keeps a running product of stage ratios; the product is exact
//! multiplication of per-stage ratios rather than end speed / start speed, so
//! it stays correct when some stage is driven at zero speed.

use gearcore::{ChainResult, GearError, PlanetaryStage, StageError};
use log::debug;

/// Per-stage answer of a [`GearStage`]
pub trait StageSolution {
    fn output_speed(&self) -> f64;
    /// Output speed / input speed of this stage
    fn gear_ratio(&self) -> f64;
}

/// A stage that turns an input speed into an output speed.
pub trait GearStage {
    type Solution: StageSolution;

    fn solve(&self, input_speed: f64) -> Result<Self::Solution, StageError>;
}

/// Outcome of running a speed through a series of stages
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation<T> {
    pub total_ratio: f64,
    pub output_speed: f64,
    pub stages: Vec<T>,
}

/// Feed `input_speed` through `stages` in order.
///
/// Fails on the first bad stage, tagged with its index; nothing is returned
/// for the stages that had already been solved.
pub fn propagate<S: GearStage>(
    stages: &[S],
    input_speed: f64,
) -> Result<Propagation<S::Solution>, GearError> {
    if stages.is_empty() {
        return Err(GearError::EmptyChain);
    }

    let mut speed = input_speed;
    let mut total_ratio = 1.0;
    let mut solved = Vec::with_capacity(stages.len());

    for (index, stage) in stages.iter().enumerate() {
        let solution = stage.solve(speed).map_err(|e| e.at(index))?;
        total_ratio *= solution.gear_ratio();
        speed = solution.output_speed();
        solved.push(solution);
    }

    debug!(
        "propagated {} stage(s): total ratio {:.6}, {} -> {}",
        stages.len(),
        total_ratio,
        input_speed,
        speed
    );

    Ok(Propagation {
        total_ratio,
        output_speed: speed,
        stages: solved,
    })
}

/// Solve a chain of planetary stages driven at `input_speed`.
pub fn solve_chain(stages: &[PlanetaryStage], input_speed: f64) -> Result<ChainResult, GearError> {
    let propagation = propagate(stages, input_speed)?;
    Ok(ChainResult {
        total_ratio: propagation.total_ratio,
        final_output_speed: propagation.output_speed,
        per_stage: propagation.stages,
    })
}
