//! Reflected inertia of planetary chains
//!
//! A component turning at `r` times the reference shaft speed stores the same
//! kinetic energy as an inertia of `J·r²` on that shaft. Each stage's
//! components are first reflected to the stage input, then the stage as a
//! whole is reflected to the chain input through the ratio of everything
//! upstream of it.

use gearcore::{
    GearError, InertiaBreakdown, InertiaResult, Member, PlanetaryStage, Role, StageError,
    StageInertia, StageInertiaTerms,
};
use log::trace;

use crate::planetary::case_ratio;

/// Reflect an inertia through a speed ratio: `J·r²`
pub fn reflect_inertia(inertia: f64, ratio: f64) -> f64 {
    inertia * ratio.powi(2)
}

/// Inertia of one stage seen from its own input, using the stage geometry
/// for the ratio.
pub fn solve_stage_inertia(
    stage: &PlanetaryStage,
    inertia: &StageInertia,
) -> Result<StageInertiaTerms, StageError> {
    let case = stage.validate()?;
    let gear_ratio = case_ratio(case, stage.sun_teeth, stage.ring_teeth);
    solve_stage_inertia_with_ratio(stage, inertia, gear_ratio)
}

/// Inertia of one stage seen from its own input, given the stage ratio.
///
/// The fixed member does not move and contributes nothing. Planets are
/// lumped at the carrier's speed; their spin about their own axes is
/// ignored, which underestimates their share.
pub fn solve_stage_inertia_with_ratio(
    stage: &PlanetaryStage,
    inertia: &StageInertia,
    gear_ratio: f64,
) -> Result<StageInertiaTerms, StageError> {
    let case = stage.validate()?;
    inertia.validate()?;
    if !gear_ratio.is_finite() {
        return Err(StageError::DegenerateRatio {
            quantity: "gear ratio",
            value: gear_ratio,
        });
    }

    let j_input = inertia.of(case.input());
    let j_output_reflected = reflect_inertia(inertia.of(case.output()), gear_ratio);

    let carrier_speed_ratio = match stage.roles.role_of(Member::Carrier) {
        Role::Input => 1.0,
        Role::Output => gear_ratio,
        Role::Fixed => 0.0,
    };
    let j_planets_reflected =
        reflect_inertia(inertia.planet_set(stage.num_planets), carrier_speed_ratio);

    trace!(
        "{}: J_in={:e}, J_out'={:e}, J_planets'={:e}",
        case, j_input, j_output_reflected, j_planets_reflected
    );

    Ok(StageInertiaTerms {
        j_input,
        j_output_reflected,
        j_planets_reflected,
        j_stage_equivalent: j_input + j_output_reflected + j_planets_reflected,
    })
}

/// Total inertia of a planetary chain reflected to its input shaft.
///
/// `stage_ratios` are the per-stage ratios from the kinematic solution. A
/// stage is weighted by the square of the product of the ratios before it,
/// not including its own.
pub fn solve_chain_inertia(
    stages: &[PlanetaryStage],
    stage_ratios: &[f64],
    inertias: &[StageInertia],
) -> Result<InertiaResult, GearError> {
    if stages.is_empty() {
        return Err(GearError::EmptyChain);
    }
    if inertias.len() != stages.len() {
        return Err(GearError::LengthMismatch {
            what: "inertia records",
            expected: stages.len(),
            found: inertias.len(),
        });
    }
    if stage_ratios.len() != stages.len() {
        return Err(GearError::LengthMismatch {
            what: "stage ratios",
            expected: stages.len(),
            found: stage_ratios.len(),
        });
    }

    let mut accumulated_ratio = 1.0;
    let mut j_total = 0.0;
    let mut per_stage = Vec::with_capacity(stages.len());

    for (index, ((stage, inertia), &ratio)) in
        stages.iter().zip(inertias).zip(stage_ratios).enumerate()
    {
        let terms =
            solve_stage_inertia_with_ratio(stage, inertia, ratio).map_err(|e| e.at(index))?;
        let j_stage_reflected_to_input = reflect_inertia(terms.j_stage_equivalent, accumulated_ratio);

        per_stage.push(InertiaBreakdown {
            terms,
            accumulated_ratio_before_stage: accumulated_ratio,
            j_stage_reflected_to_input,
        });
        j_total += j_stage_reflected_to_input;
        accumulated_ratio *= ratio;
    }

    Ok(InertiaResult { j_total, per_stage })
}
