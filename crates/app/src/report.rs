//! Text and JSON rendering of results.

use std::fmt;

use gearcore::{ChainResult, GearPair, InertiaResult, SimpleChainResult};
use serde::Serialize;

/// Ratios smaller than this in magnitude are shown as `0:1`.
const ZERO_RATIO: f64 = 1e-12;

/// A ratio as `decimal / N:1`.
///
/// The decimal keeps the sign (a negative ratio reverses direction). The
/// `N:1` form is the magnitude, or its reciprocal when below one, so a 0.25
/// ratio and a 4.0 ratio both read `4:1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioDisplay {
    pub ratio: f64,
    pub decimals: usize,
    pub reduced_decimals: usize,
}

impl RatioDisplay {
    pub fn planetary(ratio: f64) -> Self {
        Self {
            ratio,
            decimals: 6,
            reduced_decimals: 3,
        }
    }

    pub fn simple(ratio: f64) -> Self {
        Self {
            ratio,
            decimals: 2,
            reduced_decimals: 1,
        }
    }

    /// The `N` of `N:1`; zero for a (near) zero ratio.
    pub fn reduced(&self) -> f64 {
        let magnitude = self.ratio.abs();
        if magnitude < ZERO_RATIO {
            0.0
        } else if magnitude >= 1.0 {
            magnitude
        } else {
            1.0 / magnitude
        }
    }
}

impl fmt::Display for RatioDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*} / ", self.decimals, self.ratio)?;
        if self.reduced() == 0.0 {
            write!(f, "0:1")
        } else {
            write!(f, "{:.*}:1", self.reduced_decimals, self.reduced())
        }
    }
}

pub struct SimpleReport<'a> {
    pub input_speed: f64,
    pub pairs: &'a [GearPair],
    pub result: &'a SimpleChainResult,
}

impl fmt::Display for SimpleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input speed: {} min⁻¹", self.input_speed)?;
        writeln!(f)?;
        for (index, (pair, ratio)) in self.pairs.iter().zip(&self.result.per_stage_ratio).enumerate() {
            writeln!(
                f,
                "Stage {}: {}/{} = {:.4}",
                index + 1,
                pair.driving_teeth,
                pair.driven_teeth,
                ratio
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total ratio: {}", RatioDisplay::simple(self.result.total_ratio))?;
        write!(
            f,
            "Output speed = {} × {:.6} = {:.1} min⁻¹",
            self.input_speed, self.result.total_ratio, self.result.output_speed
        )
    }
}

pub struct PlanetaryReport<'a> {
    pub input_speed: f64,
    pub kinematics: &'a ChainResult,
    pub inertia: Option<&'a InertiaResult>,
}

impl fmt::Display for PlanetaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input speed: {} rpm", self.input_speed)?;
        writeln!(f)?;
        for (index, stage) in self.kinematics.per_stage.iter().enumerate() {
            writeln!(
                f,
                "Stage {}: K = {:.3}, {}, ratio = {:.6}, {:.6} -> {:.6} rpm",
                index + 1,
                stage.internal_ratio,
                stage.case,
                stage.gear_ratio,
                stage.input_speed,
                stage.output_speed
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Total ratio (product of stage ratios): {}",
            RatioDisplay::planetary(self.kinematics.total_ratio)
        )?;
        write!(f, "Output speed: {:.6} rpm", self.kinematics.final_output_speed)?;

        if let Some(inertia) = self.inertia {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "=== INERTIA ===")?;
            writeln!(
                f,
                "Total equivalent inertia (reflected to input): {:.8} kg·m²",
                inertia.j_total
            )?;
            for (index, stage) in inertia.per_stage.iter().enumerate() {
                writeln!(f)?;
                writeln!(f, "Stage {}:", index + 1)?;
                writeln!(f, "  J input:             {:.8} kg·m²", stage.terms.j_input)?;
                writeln!(f, "  J output reflected:  {:.8} kg·m²", stage.terms.j_output_reflected)?;
                writeln!(f, "  J planets reflected: {:.8} kg·m²", stage.terms.j_planets_reflected)?;
                writeln!(f, "  Stage equivalent:    {:.8} kg·m²", stage.terms.j_stage_equivalent)?;
                write!(
                    f,
                    "  Through ratio {:.6}:  {:.8} kg·m²",
                    stage.accumulated_ratio_before_stage, stage.j_stage_reflected_to_input
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SimpleOutput<'a> {
    pub input_speed: f64,
    #[serde(flatten)]
    pub result: &'a SimpleChainResult,
}

#[derive(Debug, Serialize)]
pub struct PlanetaryOutput<'a> {
    pub input_speed: f64,
    pub kinematics: &'a ChainResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inertia: Option<&'a InertiaResult>,
}
