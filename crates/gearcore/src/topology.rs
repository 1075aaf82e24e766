//! Roles of the members of a planetary stage.
//!
//! A planetary stage holds one member still, drives one and takes power off
//! the third. Of the 27 ways to hand out roles only the six permutations are
//! meaningful; [`RoleAssignment::case`] maps an assignment onto one of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StageError;

/// One of the three coaxial members of a planetary stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Member {
    Sun,
    Carrier,
    Ring,
}

impl Member {
    pub const ALL: [Member; 3] = [Member::Sun, Member::Carrier, Member::Ring];
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Member::Sun => "sun",
            Member::Carrier => "carrier",
            Member::Ring => "ring",
        };
        f.write_str(name)
    }
}

/// What a member does in its stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
    Fixed,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Input => "input",
            Role::Output => "output",
            Role::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

/// The role handed to each member of a planetary stage.
///
/// Any combination can be represented; only permutations of
/// input/output/fixed pass [`RoleAssignment::case`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub sun: Role,
    pub carrier: Role,
    pub ring: Role,
}

impl RoleAssignment {
    pub fn new(sun: Role, carrier: Role, ring: Role) -> Self {
        Self { sun, carrier, ring }
    }

    /// Roles from an input/output pick, holding the remaining member fixed.
    ///
    /// Picking the same member for both fails with `InvalidTopology`.
    pub fn from_driving(input: Member, output: Member) -> Result<Self, StageError> {
        let role = |member: Member| {
            if member == input {
                Role::Input
            } else if member == output {
                Role::Output
            } else {
                Role::Fixed
            }
        };
        let roles = Self::new(role(Member::Sun), role(Member::Carrier), role(Member::Ring));
        roles.case()?;
        Ok(roles)
    }

    pub fn role_of(&self, member: Member) -> Role {
        match member {
            Member::Sun => self.sun,
            Member::Carrier => self.carrier,
            Member::Ring => self.ring,
        }
    }

    /// The member holding `role`, if exactly one does.
    fn sole(&self, role: Role) -> Option<Member> {
        let mut holders = Member::ALL
            .into_iter()
            .filter(|member| self.role_of(*member) == role);
        match (holders.next(), holders.next()) {
            (Some(member), None) => Some(member),
            _ => None,
        }
    }

    /// Select the kinematic case these roles describe.
    pub fn case(&self) -> Result<KinematicCase, StageError> {
        let invalid = StageError::InvalidTopology {
            sun: self.sun,
            carrier: self.carrier,
            ring: self.ring,
        };
        match (self.sole(Role::Fixed), self.sole(Role::Input), self.sole(Role::Output)) {
            (Some(fixed), Some(input), Some(_)) => {
                KinematicCase::from_members(fixed, input).ok_or(invalid)
            }
            _ => Err(invalid),
        }
    }
}

/// The six ways a planetary stage can be driven.
///
/// Named by power flow; the member not mentioned is held fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinematicCase {
    /// Sun fixed, ring drives carrier
    RingToCarrier,
    /// Sun fixed, carrier drives ring
    CarrierToRing,
    /// Ring fixed, sun drives carrier
    SunToCarrier,
    /// Ring fixed, carrier drives sun
    CarrierToSun,
    /// Carrier fixed, sun drives ring in the opposite direction
    SunToRing,
    /// Carrier fixed, ring drives sun in the opposite direction
    RingToSun,
}

impl KinematicCase {
    pub const ALL: [KinematicCase; 6] = [
        KinematicCase::RingToCarrier,
        KinematicCase::CarrierToRing,
        KinematicCase::SunToCarrier,
        KinematicCase::CarrierToSun,
        KinematicCase::SunToRing,
        KinematicCase::RingToSun,
    ];

    /// Case for a given fixed and input member; `None` if they coincide.
    pub fn from_members(fixed: Member, input: Member) -> Option<Self> {
        use KinematicCase::*;
        use Member::*;
        match (fixed, input) {
            (Sun, Ring) => Some(RingToCarrier),
            (Sun, Carrier) => Some(CarrierToRing),
            (Ring, Sun) => Some(SunToCarrier),
            (Ring, Carrier) => Some(CarrierToSun),
            (Carrier, Sun) => Some(SunToRing),
            (Carrier, Ring) => Some(RingToSun),
            _ => None,
        }
    }

    pub fn fixed(self) -> Member {
        match self {
            KinematicCase::RingToCarrier | KinematicCase::CarrierToRing => Member::Sun,
            KinematicCase::SunToCarrier | KinematicCase::CarrierToSun => Member::Ring,
            KinematicCase::SunToRing | KinematicCase::RingToSun => Member::Carrier,
        }
    }

    pub fn input(self) -> Member {
        match self {
            KinematicCase::RingToCarrier | KinematicCase::RingToSun => Member::Ring,
            KinematicCase::CarrierToRing | KinematicCase::CarrierToSun => Member::Carrier,
            KinematicCase::SunToCarrier | KinematicCase::SunToRing => Member::Sun,
        }
    }

    pub fn output(self) -> Member {
        match self {
            KinematicCase::RingToCarrier | KinematicCase::SunToCarrier => Member::Carrier,
            KinematicCase::CarrierToRing | KinematicCase::SunToRing => Member::Ring,
            KinematicCase::CarrierToSun | KinematicCase::RingToSun => Member::Sun,
        }
    }

    /// Whether the output turns against the input (carrier held).
    pub fn is_reversing(self) -> bool {
        self.fixed() == Member::Carrier
    }

    pub fn roles(self) -> RoleAssignment {
        let role = |member: Member| {
            if member == self.input() {
                Role::Input
            } else if member == self.output() {
                Role::Output
            } else {
                Role::Fixed
            }
        };
        RoleAssignment::new(role(Member::Sun), role(Member::Carrier), role(Member::Ring))
    }

    pub fn label(self) -> &'static str {
        match self {
            KinematicCase::RingToCarrier => "ring→carrier",
            KinematicCase::CarrierToRing => "carrier→ring",
            KinematicCase::SunToCarrier => "sun→carrier",
            KinematicCase::CarrierToSun => "carrier→sun",
            KinematicCase::SunToRing => "sun→ring (reversal)",
            KinematicCase::RingToSun => "ring→sun (reversal)",
        }
    }
}

impl fmt::Display for KinematicCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
