//! Gearbox description files.
//!
//! Planetary gearboxes are read from JSON. Stages either spell out their own
//! roles or inherit a gearbox-wide input/output pick. A `half_stage` entry is
//! shorthand for a stage that reuses the first stage's ring, roles and planet
//! count, with the given planet teeth standing in as its sun.

use std::fs;
use std::path::{Path, PathBuf};

use gearcore::{GearError, GearPair, Member, PlanetaryStage, Role, RoleAssignment, StageInertia};
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no input speed given (set input_speed or pass --speed)")]
    MissingInputSpeed,

    #[error("invalid input speed {0}")]
    InvalidInputSpeed(f64),

    #[error("stage {}: roles missing (give sun, carrier and ring, or a gearbox-wide input and output)", .0 + 1)]
    MissingRoles(usize),

    #[error("stage {}: a half stage needs a full stage before it", .0 + 1)]
    HalfStageFirst(usize),

    #[error(transparent)]
    Gear(#[from] GearError),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the command-line speed over the file's.
pub fn resolve_speed(file_speed: Option<f64>, cli_speed: Option<f64>) -> Result<f64, ConfigError> {
    let speed = cli_speed.or(file_speed).ok_or(ConfigError::MissingInputSpeed)?;
    if !speed.is_finite() {
        return Err(ConfigError::InvalidInputSpeed(speed));
    }
    Ok(speed)
}

/// A simple gear chain as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleGearbox {
    pub input_speed: Option<f64>,
    #[serde(default)]
    pub stages: Vec<GearPair>,
}

impl SimpleGearbox {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HalfStageSpec {
    pub planet_teeth: f64,
    /// Inertia of one planet (kg·m²); also used as the half stage's sun
    pub planet_inertia: Option<f64>,
}

fn default_planets() -> u32 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullStageSpec {
    pub sun: Option<Role>,
    pub carrier: Option<Role>,
    pub ring: Option<Role>,
    pub sun_teeth: f64,
    pub planet_teeth: f64,
    pub ring_teeth: f64,
    #[serde(default = "default_planets")]
    pub num_planets: u32,
    pub inertia: Option<StageInertia>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StageSpec {
    Half { half_stage: HalfStageSpec },
    Full(FullStageSpec),
}

/// A planetary gearbox as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct PlanetaryGearbox {
    pub input_speed: Option<f64>,
    pub input: Option<Member>,
    pub output: Option<Member>,
    pub stages: Vec<StageSpec>,
}

/// A planetary gearbox ready for the solvers
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGearbox {
    pub stages: Vec<PlanetaryStage>,
    /// One record per stage when any stage carries inertia data
    pub inertias: Option<Vec<StageInertia>>,
}

impl PlanetaryGearbox {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_json(path)
    }

    fn roles_for(&self, index: usize, spec: &FullStageSpec) -> Result<RoleAssignment, ConfigError> {
        if let (Some(sun), Some(carrier), Some(ring)) = (spec.sun, spec.carrier, spec.ring) {
            return Ok(RoleAssignment::new(sun, carrier, ring));
        }
        match (self.input, self.output) {
            (Some(input), Some(output)) => {
                RoleAssignment::from_driving(input, output).map_err(|e| e.at(index).into())
            }
            _ => Err(ConfigError::MissingRoles(index)),
        }
    }

    /// Expand half stages and settle roles into a plain list of stages.
    pub fn resolve(&self) -> Result<ResolvedGearbox, ConfigError> {
        let mut stages: Vec<PlanetaryStage> = Vec::with_capacity(self.stages.len());
        let mut inertias: Vec<StageInertia> = Vec::with_capacity(self.stages.len());
        let mut has_inertia = false;

        for (index, spec) in self.stages.iter().enumerate() {
            match spec {
                StageSpec::Full(full) => {
                    let roles = self.roles_for(index, full)?;
                    stages.push(
                        PlanetaryStage::new(roles, full.sun_teeth, full.planet_teeth, full.ring_teeth)
                            .with_planets(full.num_planets),
                    );
                    has_inertia |= full.inertia.is_some();
                    inertias.push(full.inertia.unwrap_or_default());
                }
                StageSpec::Half { half_stage } => {
                    let (Some(&first), Some(&first_inertia)) = (stages.first(), inertias.first())
                    else {
                        return Err(ConfigError::HalfStageFirst(index));
                    };

                    let stage = PlanetaryStage::new(
                        first.roles,
                        half_stage.planet_teeth,
                        half_stage.planet_teeth,
                        first.ring_teeth,
                    )
                    .with_planets(first.num_planets);
                    let planet = half_stage.planet_inertia.unwrap_or(0.0);
                    let inertia =
                        StageInertia::new(planet, planet, first_inertia.ring, first_inertia.carrier);
                    debug!(
                        "stage {} is a half stage: sun {} teeth, ring {} teeth",
                        index + 1,
                        stage.sun_teeth,
                        stage.ring_teeth
                    );

                    has_inertia |= half_stage.planet_inertia.is_some();
                    stages.push(stage);
                    inertias.push(inertia);
                }
            }
        }

        Ok(ResolvedGearbox {
            stages,
            inertias: has_inertia.then_some(inertias),
        })
    }
}
