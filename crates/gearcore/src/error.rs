//! Error types for gear train calculations.

use thiserror::Error;

use crate::topology::Role;

/// The kinds of failure a calculation can report, independent of where they occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidGeometry,
    InvalidTopology,
    EmptyChain,
    LengthMismatch,
    DegenerateRatio,
}

/// Failure of a single stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    /// A tooth count, planet count or inertia is out of range or not a number
    #[error("invalid geometry: {field} must be {expected}, got {value}")]
    InvalidGeometry {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },

    /// The roles of sun, carrier and ring are not a permutation of input/output/fixed
    #[error(
        "invalid topology: sun={sun}, carrier={carrier}, ring={ring} \
         must assign input, output and fixed exactly once"
    )]
    InvalidTopology { sun: Role, carrier: Role, ring: Role },

    /// A speed or ratio that has to be finite is not
    #[error("degenerate ratio: {quantity} is {value}")]
    DegenerateRatio { quantity: &'static str, value: f64 },
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::InvalidGeometry { .. } => ErrorKind::InvalidGeometry,
            StageError::InvalidTopology { .. } => ErrorKind::InvalidTopology,
            StageError::DegenerateRatio { .. } => ErrorKind::DegenerateRatio,
        }
    }

    /// Attribute this failure to the stage at `index` (zero-based) of a chain.
    pub fn at(self, index: usize) -> GearError {
        GearError::Stage {
            index,
            source: self,
        }
    }
}

/// Failure of a chain calculation.
///
/// Chains fail atomically: no partial results accompany any of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GearError {
    /// No stages were supplied
    #[error("gear chain has no stages")]
    EmptyChain,

    /// A per-stage list does not have one entry per stage
    #[error("expected {expected} {what} (one per stage), got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A stage failed; `index` is zero-based, the message counts from 1
    #[error("stage {}: {source}", .index + 1)]
    Stage {
        index: usize,
        #[source]
        source: StageError,
    },
}

impl GearError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GearError::EmptyChain => ErrorKind::EmptyChain,
            GearError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            GearError::Stage { source, .. } => source.kind(),
        }
    }

    /// Zero-based index of the failing stage, if the failure belongs to one.
    pub fn stage_index(&self) -> Option<usize> {
        match self {
            GearError::Stage { index, .. } => Some(*index),
            _ => None,
        }
    }
}
