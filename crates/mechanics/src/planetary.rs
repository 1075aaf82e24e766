//! Planetary Stage Kinematics
//!
//! Every planetary stage obeys the Willis identity
//!
//! `n_ring·z_ring + n_sun·z_sun = n_carrier·(z_ring + z_sun)`
//!
//! With one member held (speed 0) and one driven, the speed of the third
//! follows by isolating it. The stage ratio is output speed / input speed;
//! holding the carrier reverses the output, and that sign is kept here.

use gearcore::{KinematicCase, Member, PlanetaryStage, StageError, StageKinematicResult};
use log::{debug, warn};
use nalgebra::Vector3;

use crate::chain::{GearStage, StageSolution};

/// Angular speeds of the three members of a planetary stage
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemberSpeeds {
    pub sun: f64,
    pub carrier: f64,
    pub ring: f64,
}

impl MemberSpeeds {
    fn from_vector(speeds: Vector3<f64>) -> Self {
        Self {
            sun: speeds[0],
            carrier: speeds[1],
            ring: speeds[2],
        }
    }

    fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.sun, self.carrier, self.ring)
    }

    pub fn of(&self, member: Member) -> f64 {
        self.as_vector()[slot(member)]
    }

    /// How far these speeds are from satisfying the Willis identity.
    ///
    /// Zero (up to rounding) for any physically consistent set of speeds.
    pub fn willis_residual(&self, sun_teeth: f64, ring_teeth: f64) -> f64 {
        willis_coefficients(sun_teeth, ring_teeth).dot(&self.as_vector())
    }
}

fn slot(member: Member) -> usize {
    match member {
        Member::Sun => 0,
        Member::Carrier => 1,
        Member::Ring => 2,
    }
}

/// Willis identity over (sun, carrier, ring), rearranged to `c · n = 0`
fn willis_coefficients(sun_teeth: f64, ring_teeth: f64) -> Vector3<f64> {
    Vector3::new(sun_teeth, -(sun_teeth + ring_teeth), ring_teeth)
}

/// Speeds of all three members when `case` is driven at `input_speed`.
///
/// Tooth counts are assumed validated (positive).
pub fn member_speeds(
    case: KinematicCase,
    sun_teeth: f64,
    ring_teeth: f64,
    input_speed: f64,
) -> MemberSpeeds {
    let coefficients = willis_coefficients(sun_teeth, ring_teeth);

    // Fixed member stays at zero
    let mut speeds: Vector3<f64> = Vector3::zeros();
    speeds[slot(case.input())] = input_speed;

    let out = slot(case.output());
    let unknown = -coefficients.dot(&speeds) / coefficients[out];
    // Normalise -0.0 from a stationary input
    speeds[out] = if unknown == 0.0 { 0.0 } else { unknown };

    MemberSpeeds::from_vector(speeds)
}

/// Closed-form ratio (output/input) of a planetary stage
pub fn case_ratio(case: KinematicCase, sun_teeth: f64, ring_teeth: f64) -> f64 {
    let (zs, zr) = (sun_teeth, ring_teeth);
    match case {
        KinematicCase::RingToCarrier => zr / (zr + zs),
        KinematicCase::CarrierToRing => (zr + zs) / zr,
        KinematicCase::SunToCarrier => zs / (zr + zs),
        KinematicCase::CarrierToSun => (zr + zs) / zs,
        KinematicCase::SunToRing => -zs / zr,
        KinematicCase::RingToSun => -zr / zs,
    }
}

/// Solve one planetary stage driven at `input_speed`.
///
/// The ratio comes from geometry alone, so it stays well defined when the
/// stage is driven at zero speed (the output is then zero).
pub fn solve_stage(
    stage: &PlanetaryStage,
    input_speed: f64,
) -> Result<StageKinematicResult, StageError> {
    let case = stage.validate()?;
    if !input_speed.is_finite() {
        return Err(StageError::DegenerateRatio {
            quantity: "input speed",
            value: input_speed,
        });
    }
    if input_speed == 0.0 {
        warn!("{} stage driven at zero speed, output is stationary", case);
    }

    let gear_ratio = case_ratio(case, stage.sun_teeth, stage.ring_teeth);
    let speeds = member_speeds(case, stage.sun_teeth, stage.ring_teeth, input_speed);
    let output_speed = speeds.of(case.output());

    debug!(
        "{}: K={:.3}, ratio={:.6}, {} -> {}",
        case,
        stage.internal_ratio(),
        gear_ratio,
        input_speed,
        output_speed
    );

    Ok(StageKinematicResult {
        input_speed,
        output_speed,
        gear_ratio,
        internal_ratio: stage.internal_ratio(),
        case,
    })
}

impl StageSolution for StageKinematicResult {
    fn output_speed(&self) -> f64 {
        self.output_speed
    }

    fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }
}

impl GearStage for PlanetaryStage {
    type Solution = StageKinematicResult;

    fn solve(&self, input_speed: f64) -> Result<StageKinematicResult, StageError> {
        solve_stage(self, input_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use gearcore::{ErrorKind, Role, RoleAssignment};
    use proptest::prelude::*;

    fn stage(case: KinematicCase) -> PlanetaryStage {
        PlanetaryStage::new(case.roles(), 20.0, 20.0, 60.0)
    }

    #[test]
    fn test_sun_fixed_ring_drives_carrier() {
        let result = solve_stage(&stage(KinematicCase::RingToCarrier), 100.0).unwrap();

        // 100 * 60 / 80 = 75 rpm
        assert!((result.output_speed - 75.0).abs() < 1e-9);
        assert!((result.gear_ratio - 0.75).abs() < 1e-9);
        assert!((result.internal_ratio - 3.0).abs() < 1e-9);
        assert_eq!(result.case, KinematicCase::RingToCarrier);
    }

    #[test]
    fn test_sun_fixed_carrier_drives_ring() {
        let result = solve_stage(&stage(KinematicCase::CarrierToRing), 100.0).unwrap();

        // 100 * 80 / 60
        assert_abs_diff_eq!(result.output_speed, 400.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.gear_ratio, 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ring_fixed_sun_drives_carrier() {
        let result = solve_stage(&stage(KinematicCase::SunToCarrier), 100.0).unwrap();

        // 100 * 20 / 80 = 25 rpm, a 4:1 reduction
        assert!((result.output_speed - 25.0).abs() < 1e-9);
        assert!((result.gear_ratio - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_ring_fixed_carrier_drives_sun() {
        let result = solve_stage(&stage(KinematicCase::CarrierToSun), 100.0).unwrap();

        assert!((result.output_speed - 400.0).abs() < 1e-9);
        assert!((result.gear_ratio - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_carrier_fixed_sun_drives_ring_reversed() {
        let result = solve_stage(&stage(KinematicCase::SunToRing), 100.0).unwrap();

        // -100 * 20 / 60
        assert_abs_diff_eq!(result.output_speed, -100.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.gear_ratio, -1.0 / 3.0, epsilon = 1e-12);
        assert!(result.gear_ratio < 0.0);
    }

    #[test]
    fn test_carrier_fixed_ring_drives_sun_reversed() {
        let result = solve_stage(&stage(KinematicCase::RingToSun), 100.0).unwrap();

        assert!((result.output_speed + 300.0).abs() < 1e-9);
        assert!((result.gear_ratio + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_input_roles_rejected() {
        let roles = RoleAssignment::new(Role::Input, Role::Input, Role::Input);
        let err = solve_stage(&PlanetaryStage::new(roles, 20.0, 20.0, 60.0), 100.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTopology);
    }

    #[test]
    fn test_non_positive_teeth_rejected() {
        let mut bad = stage(KinematicCase::SunToCarrier);
        bad.ring_teeth = 0.0;
        assert_eq!(
            solve_stage(&bad, 100.0).unwrap_err().kind(),
            ErrorKind::InvalidGeometry
        );
    }

    #[test]
    fn test_non_finite_input_speed_rejected() {
        let err = solve_stage(&stage(KinematicCase::SunToCarrier), f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DegenerateRatio);
    }

    #[test]
    fn test_overflowing_tooth_sum_rejected() {
        let huge = PlanetaryStage::new(KinematicCase::SunToCarrier.roles(), 1e308, 20.0, 1e308);
        let err = solve_stage(&huge, 1500.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidGeometry);
    }

    #[test]
    fn test_zero_input_speed_keeps_geometric_ratio() {
        let result = solve_stage(&stage(KinematicCase::SunToRing), 0.0).unwrap();

        assert_eq!(result.output_speed, 0.0);
        assert!(result.output_speed.is_sign_positive());
        assert!((result.gear_ratio + 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_solving_twice_is_bit_identical() {
        for case in KinematicCase::ALL {
            let a = solve_stage(&stage(case), 1234.5).unwrap();
            let b = solve_stage(&stage(case), 1234.5).unwrap();
            assert_eq!(a.output_speed.to_bits(), b.output_speed.to_bits());
            assert_eq!(a.gear_ratio.to_bits(), b.gear_ratio.to_bits());
        }
    }

    #[test]
    fn test_member_speeds_hold_fixed_member_still() {
        let speeds = member_speeds(KinematicCase::RingToCarrier, 20.0, 60.0, 100.0);
        assert_eq!(speeds.sun, 0.0);
        assert_eq!(speeds.ring, 100.0);
        assert!((speeds.carrier - 75.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_solution_satisfies_willis_identity(
            case_index in 0usize..6,
            sun_teeth in 8.0f64..200.0,
            ring_teeth in 8.0f64..400.0,
            input_speed in -10_000.0f64..10_000.0,
        ) {
            let case = KinematicCase::ALL[case_index];
            let speeds = member_speeds(case, sun_teeth, ring_teeth, input_speed);
            let scale = (sun_teeth + ring_teeth) * input_speed.abs().max(1.0);
            prop_assert!(speeds.willis_residual(sun_teeth, ring_teeth).abs() < 1e-9 * scale);
            prop_assert_eq!(speeds.of(case.fixed()), 0.0);
        }

        #[test]
        fn prop_ratio_matches_speeds(
            case_index in 0usize..6,
            sun_teeth in 8.0f64..200.0,
            ring_teeth in 8.0f64..400.0,
            input_speed in 1.0f64..10_000.0,
        ) {
            let case = KinematicCase::ALL[case_index];
            let stage = PlanetaryStage::new(case.roles(), sun_teeth, 18.0, ring_teeth);
            let result = solve_stage(&stage, input_speed).unwrap();
            let measured = result.output_speed / input_speed;
            prop_assert!((measured - result.gear_ratio).abs() < 1e-9 * result.gear_ratio.abs().max(1.0));
        }
    }
}
