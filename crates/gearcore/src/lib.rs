//! Shared value types for gear train calculations.
//!
//! This crate provides:
//! - Stage descriptions for simple gear pairs and planetary stages
//! - Role assignments and the six kinematic cases of a planetary stage
//! - Result records returned by the solvers in `mechanics`
//! - Error types shared by every solver

pub mod error;
pub mod topology;
pub mod types;

pub use error::{ErrorKind, GearError, StageError};
pub use topology::{KinematicCase, Member, Role, RoleAssignment};
pub use types::*;
