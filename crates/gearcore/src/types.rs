//! Stage descriptions and result records.
//!
//! Every record here is a plain value built fresh per calculation.

use serde::{Deserialize, Serialize};

use crate::error::StageError;
use crate::topology::{KinematicCase, Member, RoleAssignment};

const DEFAULT_PLANETS: u32 = 3;

fn positive(field: &'static str, value: f64) -> Result<f64, StageError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(StageError::InvalidGeometry {
            field,
            expected: "a positive number",
            value,
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, StageError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(StageError::InvalidGeometry {
            field,
            expected: "a non-negative number",
            value,
        })
    }
}

/// A fixed-axis gear pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearPair {
    pub driving_teeth: f64,
    pub driven_teeth: f64,
}

impl GearPair {
    pub fn new(driving_teeth: f64, driven_teeth: f64) -> Self {
        Self {
            driving_teeth,
            driven_teeth,
        }
    }

    /// Speed ratio output/input of the pair
    pub fn ratio(&self) -> f64 {
        self.driving_teeth / self.driven_teeth
    }

    pub fn validate(&self) -> Result<(), StageError> {
        positive("driving_teeth", self.driving_teeth)?;
        positive("driven_teeth", self.driven_teeth)?;
        Ok(())
    }
}

/// One planetary (sun/carrier/ring) stage.
///
/// Planet teeth do not enter the speed equation; they are carried for
/// completeness and validated like the other tooth counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryStage {
    #[serde(flatten)]
    pub roles: RoleAssignment,
    pub sun_teeth: f64,
    pub planet_teeth: f64,
    pub ring_teeth: f64,
    pub num_planets: u32,
}

impl PlanetaryStage {
    pub fn new(roles: RoleAssignment, sun_teeth: f64, planet_teeth: f64, ring_teeth: f64) -> Self {
        Self {
            roles,
            sun_teeth,
            planet_teeth,
            ring_teeth,
            num_planets: DEFAULT_PLANETS,
        }
    }

    pub fn with_planets(mut self, num_planets: u32) -> Self {
        self.num_planets = num_planets;
        self
    }

    /// Internal ratio K = ring teeth / sun teeth
    pub fn internal_ratio(&self) -> f64 {
        self.ring_teeth / self.sun_teeth
    }

    /// Check roles, then geometry, and return the kinematic case.
    pub fn validate(&self) -> Result<KinematicCase, StageError> {
        let case = self.roles.case()?;
        positive("sun_teeth", self.sun_teeth)?;
        positive("planet_teeth", self.planet_teeth)?;
        positive("ring_teeth", self.ring_teeth)?;
        positive("sun_teeth + ring_teeth", self.sun_teeth + self.ring_teeth)?;
        if self.num_planets == 0 {
            return Err(StageError::InvalidGeometry {
                field: "num_planets",
                expected: "at least 1",
                value: 0.0,
            });
        }
        Ok(case)
    }
}

/// Moments of inertia of the parts of a planetary stage (kg·m²).
///
/// `planet` is the inertia of a single planet; the planet set is lumped as
/// `planet × num_planets`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageInertia {
    pub sun: f64,
    pub planet: f64,
    pub ring: f64,
    pub carrier: f64,
}

impl StageInertia {
    pub fn new(sun: f64, planet: f64, ring: f64, carrier: f64) -> Self {
        Self {
            sun,
            planet,
            ring,
            carrier,
        }
    }

    pub fn of(&self, member: Member) -> f64 {
        match member {
            Member::Sun => self.sun,
            Member::Carrier => self.carrier,
            Member::Ring => self.ring,
        }
    }

    pub fn planet_set(&self, num_planets: u32) -> f64 {
        self.planet * num_planets as f64
    }

    pub fn validate(&self) -> Result<(), StageError> {
        non_negative("sun inertia", self.sun)?;
        non_negative("planet inertia", self.planet)?;
        non_negative("ring inertia", self.ring)?;
        non_negative("carrier inertia", self.carrier)?;
        Ok(())
    }
}

/// Solution of one planetary stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageKinematicResult {
    pub input_speed: f64,
    pub output_speed: f64,
    /// Output speed / input speed; negative when the stage reverses
    pub gear_ratio: f64,
    pub internal_ratio: f64,
    pub case: KinematicCase,
}

/// Solution of a chain of planetary stages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainResult {
    pub total_ratio: f64,
    pub final_output_speed: f64,
    pub per_stage: Vec<StageKinematicResult>,
}

impl ChainResult {
    pub fn stage_ratios(&self) -> Vec<f64> {
        self.per_stage.iter().map(|stage| stage.gear_ratio).collect()
    }
}

/// Solution of a chain of simple gear pairs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimpleChainResult {
    pub total_ratio: f64,
    pub per_stage_ratio: Vec<f64>,
    pub output_speed: f64,
}

/// Inertia of one stage as seen from that stage's own input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageInertiaTerms {
    pub j_input: f64,
    pub j_output_reflected: f64,
    pub j_planets_reflected: f64,
    pub j_stage_equivalent: f64,
}

/// Inertia of one stage as seen from the input of the whole chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InertiaBreakdown {
    #[serde(flatten)]
    pub terms: StageInertiaTerms,
    /// Product of the ratios of all stages before this one
    pub accumulated_ratio_before_stage: f64,
    pub j_stage_reflected_to_input: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InertiaResult {
    pub j_total: f64,
    pub per_stage: Vec<InertiaBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::topology::Role;

    fn sun_driven() -> RoleAssignment {
        RoleAssignment::new(Role::Input, Role::Output, Role::Fixed)
    }

    #[test]
    fn test_gear_pair_ratio() {
        let pair = GearPair::new(20.0, 45.0);
        assert!((pair.ratio() - 20.0 / 45.0).abs() < 1e-12);
        assert!(pair.validate().is_ok());
    }

    #[test]
    fn test_gear_pair_rejects_non_positive_and_nan() {
        assert!(GearPair::new(0.0, 45.0).validate().is_err());
        assert!(GearPair::new(20.0, -1.0).validate().is_err());
        assert!(GearPair::new(f64::NAN, 45.0).validate().is_err());
    }

    #[test]
    fn test_internal_ratio() {
        let stage = PlanetaryStage::new(sun_driven(), 20.0, 20.0, 60.0);
        assert!((stage.internal_ratio() - 3.0).abs() < 1e-12);
        assert_eq!(stage.num_planets, 3);
    }

    #[test]
    fn test_topology_checked_before_geometry() {
        let roles = RoleAssignment::new(Role::Input, Role::Input, Role::Input);
        let stage = PlanetaryStage::new(roles, 0.0, 20.0, 60.0);
        assert_eq!(stage.validate().unwrap_err().kind(), ErrorKind::InvalidTopology);
    }

    #[test]
    fn test_geometry_validation() {
        let stage = PlanetaryStage::new(sun_driven(), -20.0, 20.0, 60.0);
        match stage.validate() {
            Err(StageError::InvalidGeometry { field, .. }) => assert_eq!(field, "sun_teeth"),
            other => panic!("unexpected {other:?}"),
        }

        let stage = PlanetaryStage::new(sun_driven(), 20.0, 20.0, 60.0).with_planets(0);
        assert_eq!(stage.validate().unwrap_err().kind(), ErrorKind::InvalidGeometry);
    }

    #[test]
    fn test_tooth_sum_must_stay_finite() {
        let stage = PlanetaryStage::new(sun_driven(), 1e308, 20.0, 1e308);
        match stage.validate() {
            Err(StageError::InvalidGeometry { field, value, .. }) => {
                assert_eq!(field, "sun_teeth + ring_teeth");
                assert!(value.is_infinite());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_stage_inertia_lookup() {
        let inertia = StageInertia::new(1.0, 0.5, 3.0, 4.0);
        assert_eq!(inertia.of(Member::Sun), 1.0);
        assert_eq!(inertia.of(Member::Ring), 3.0);
        assert_eq!(inertia.of(Member::Carrier), 4.0);
        assert!((inertia.planet_set(4) - 2.0).abs() < 1e-12);
        assert!(StageInertia::new(-1.0, 0.0, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_stage_inertia_missing_fields_default_to_zero() {
        let inertia: StageInertia = serde_json::from_str(r#"{"ring": 0.25}"#).unwrap();
        assert_eq!(inertia, StageInertia::new(0.0, 0.0, 0.25, 0.0));
    }

    #[test]
    fn test_planetary_stage_serializes_roles_inline() {
        let stage = PlanetaryStage::new(sun_driven(), 20.0, 20.0, 60.0);
        let json = serde_json::to_value(stage).unwrap();
        assert_eq!(json["sun"], "input");
        assert_eq!(json["ring_teeth"], 60.0);
    }
}
