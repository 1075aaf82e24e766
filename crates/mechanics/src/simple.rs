//! Fixed-axis gear chains

use gearcore::{GearError, GearPair, SimpleChainResult, StageError};

use crate::chain::{GearStage, StageSolution, propagate};

/// Answer for one gear pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairSolution {
    pub output_speed: f64,
    pub ratio: f64,
}

impl StageSolution for PairSolution {
    fn output_speed(&self) -> f64 {
        self.output_speed
    }

    fn gear_ratio(&self) -> f64 {
        self.ratio
    }
}

impl GearStage for GearPair {
    type Solution = PairSolution;

    fn solve(&self, input_speed: f64) -> Result<PairSolution, StageError> {
        self.validate()?;
        if !input_speed.is_finite() {
            return Err(StageError::DegenerateRatio {
                quantity: "input speed",
                value: input_speed,
            });
        }
        let ratio = self.ratio();
        Ok(PairSolution {
            output_speed: input_speed * ratio,
            ratio,
        })
    }
}

/// Solve a chain of gear pairs driven at `input_speed`.
///
/// Each pair's ratio is driving / driven teeth, a constant of the geometry,
/// so the output speed is taken as `input_speed × total_ratio` directly.
pub fn solve_simple_chain(
    pairs: &[GearPair],
    input_speed: f64,
) -> Result<SimpleChainResult, GearError> {
    let propagation = propagate(pairs, input_speed)?;
    Ok(SimpleChainResult {
        total_ratio: propagation.total_ratio,
        per_stage_ratio: propagation.stages.iter().map(|pair| pair.ratio).collect(),
        output_speed: input_speed * propagation.total_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearcore::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_two_stage_reduction() {
        let pairs = [GearPair::new(20.0, 45.0), GearPair::new(15.0, 30.0)];
        let result = solve_simple_chain(&pairs, 1500.0).unwrap();

        // 20/45 * 15/30 = 2/9
        assert!((result.total_ratio - 2.0 / 9.0).abs() < 1e-12);
        assert!((result.output_speed - 1500.0 * 2.0 / 9.0).abs() < 1e-9);
        assert_eq!(result.per_stage_ratio.len(), 2);
        assert!((result.per_stage_ratio[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert_eq!(solve_simple_chain(&[], 1500.0), Err(GearError::EmptyChain));
    }

    #[test]
    fn test_bad_pair_reports_index() {
        let pairs = [
            GearPair::new(20.0, 45.0),
            GearPair::new(20.0, 45.0),
            GearPair::new(0.0, 45.0),
        ];
        let err = solve_simple_chain(&pairs, 1500.0).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
        assert_eq!(err.stage_index(), Some(2));
    }

    #[test]
    fn test_non_finite_speed_rejected() {
        let pairs = [GearPair::new(20.0, 45.0)];
        for speed in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = solve_simple_chain(&pairs, speed).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DegenerateRatio);
            assert_eq!(err.stage_index(), Some(0));
        }
    }

    proptest! {
        #[test]
        fn prop_single_pair_output_is_exact(
            driving in 1.0f64..500.0,
            driven in 1.0f64..500.0,
            speed in -20_000.0f64..20_000.0,
        ) {
            let result = solve_simple_chain(&[GearPair::new(driving, driven)], speed).unwrap();
            let expected = speed * driving / driven;
            prop_assert!((result.output_speed - expected).abs() < 1e-9 * expected.abs().max(1.0));
        }
    }
}
