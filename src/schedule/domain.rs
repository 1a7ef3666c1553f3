use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Lowest temperature a setpoint schedule may hold (°C).
pub const MIN_TEMPERATURE: f64 = -50.0;
/// Highest temperature a setpoint schedule may hold (°C).
pub const MAX_TEMPERATURE: f64 = 200.0;

/// Value category of a schedule.
///
/// The domain fixes both the admissible slot values and the set of legal
/// operations (see [`Domain::permits`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Setpoint temperatures in °C, bounded to `[-50, 200]`.
    Temperature,
    /// On/off availability, values are exactly 0 or 1.
    Binary,
    /// Unbounded real values (load densities, fractions).
    Real,
}

/// Algebra operations defined on schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    MultiplyByScalar,
    DivideByScalar,
    And,
    Or,
    Not,
    ElementMin,
    ElementMax,
    NormalizeByMax,
}

impl Operation {
    /// Tag used when composing result names, e.g. `"occ:ADD:extra"`.
    pub fn tag(self) -> &'static str {
        match self {
            Operation::Add => "ADD",
            Operation::Subtract => "SUB",
            Operation::MultiplyByScalar => "MUL",
            Operation::DivideByScalar => "DIV",
            Operation::And => "AND",
            Operation::Or => "OR",
            Operation::Not => "INVERTED",
            Operation::ElementMin => "MIN",
            Operation::ElementMax => "MAX",
            Operation::NormalizeByMax => "normalized",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::MultiplyByScalar => "multiply_by_scalar",
            Operation::DivideByScalar => "divide_by_scalar",
            Operation::And => "and",
            Operation::Or => "or",
            Operation::Not => "not",
            Operation::ElementMin => "element_min",
            Operation::ElementMax => "element_max",
            Operation::NormalizeByMax => "normalize_by_max",
        };
        write!(f, "{name}")
    }
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Temperature, Domain::Binary, Domain::Real];

    /// Operator-legality table.
    pub fn permits(self, op: Operation) -> bool {
        use Operation::*;
        match op {
            Add | Subtract | MultiplyByScalar | DivideByScalar => {
                matches!(self, Domain::Temperature | Domain::Real)
            }
            And | Or | Not => self == Domain::Binary,
            ElementMin | ElementMax | NormalizeByMax => true,
        }
    }

    /// Fails with `UnsupportedOperation` when `op` is not legal for this domain.
    pub fn ensure(self, op: Operation) -> Result<()> {
        if self.permits(op) {
            Ok(())
        } else {
            Err(ScheduleError::UnsupportedOperation { op, domain: self })
        }
    }

    /// Fails with `DomainMismatch` unless `other` equals `self`.
    pub fn ensure_same(self, other: Domain) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(ScheduleError::mismatch(self, other))
        }
    }

    /// Checks a single slot value against the domain bounds.
    ///
    /// Non-finite values are rejected in every domain.
    pub fn check(self, slot: usize, value: f64) -> Result<()> {
        let ok = value.is_finite()
            && match self {
                Domain::Temperature => (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value),
                Domain::Binary => value == 0.0 || value == 1.0,
                Domain::Real => true,
            };
        if ok {
            Ok(())
        } else {
            Err(ScheduleError::OutOfRange {
                slot,
                value,
                domain: self,
            })
        }
    }

    /// Name of the matching `ScheduleTypeLimits` object in the simulation engine.
    pub fn type_limits_name(self) -> &'static str {
        match self {
            Domain::Temperature => "Temperature",
            Domain::Binary => "On/Off",
            Domain::Real => "Any Number",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Temperature => "temperature",
            Domain::Binary => "binary",
            Domain::Real => "real",
        };
        write!(f, "{name}")
    }
}
