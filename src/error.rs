//! Error taxonomy for schedule construction and algebra.
//!
//! Every check runs before a value is returned, so a caller that receives an
//! error never observes a partially built schedule.

use thiserror::Error;

use crate::schedule::domain::{Domain, Operation};

/// Errors raised by schedule construction, algebra and calendar overlays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Wrong entry count or internal domain disagreement.
    #[error("Construction failed: {0}")]
    Construction(String),
    /// Two operands (or a container and its content) carry different domains.
    #[error("Domain mismatch: expected {expected}, found {found}")]
    DomainMismatch { expected: Domain, found: Domain },
    /// The operation is not defined for the operand domain.
    #[error("Operation {op} is not supported for {domain} schedules")]
    UnsupportedOperation { op: Operation, domain: Domain },
    /// A slot value violates the bounds of its domain.
    #[error("Value {value} at slot {slot} is out of range for {domain} schedules")]
    OutOfRange {
        slot: usize,
        value: f64,
        domain: Domain,
    },
    /// Breakpoint list is empty, unordered, or does not end at 24:00.
    #[error("Malformed compact input: {0}")]
    MalformedCompactInput(String),
    /// Attempt to fill a fixed-length container with a different number of values.
    #[error("Fixed-length container holds exactly {expected} values (got {actual})")]
    ImmutableViolation { expected: usize, actual: usize },
    /// Date token that is not a valid reference-year date, or a reversed range.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl ScheduleError {
    pub fn mismatch(expected: Domain, found: Domain) -> Self {
        Self::DomainMismatch { expected, found }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
