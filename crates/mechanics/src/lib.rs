//! Gear train kinematics and inertia reflection.
//!
//! Provides:
//! - Planetary stage solving over the six kinematic cases
//! - Ratio and speed accumulation across simple and planetary chains
//! - Reflection of component inertia back to the input shaft

pub mod chain;
pub mod inertia;
pub mod planetary;
pub mod simple;

pub use chain::{GearStage, Propagation, StageSolution, propagate, solve_chain};
pub use inertia::{reflect_inertia, solve_chain_inertia, solve_stage_inertia, solve_stage_inertia_with_ratio};
pub use planetary::{MemberSpeeds, case_ratio, member_speeds, solve_stage};
pub use simple::solve_simple_chain;
