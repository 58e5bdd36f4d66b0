//! Errors from trigger mutators and validation.
//!
//! These are raised synchronously by setters and never reach the run
//! shell; they are the "invalid-argument" row of the error taxonomy.

use scheduler_core::InvalidKeyError;
use std::fmt;

/// Errors raised by `Trigger` mutators and by the misfire-instruction
/// validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// A name/group field failed validation (see [`scheduler_core::key`]).
    InvalidKey(InvalidKeyError),
    /// `endTime` would be set before `startTime`, or vice versa.
    EndBeforeStart,
    /// An unrecognized misfire instruction code was supplied.
    UnknownMisfireInstruction {
        /// The rejected code.
        code: i32,
    },
}

impl From<InvalidKeyError> for TriggerError {
    fn from(err: InvalidKeyError) -> Self {
        Self::InvalidKey(err)
    }
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(err) => write!(f, "{err}"),
            Self::EndBeforeStart => write!(f, "endTime must be at or after startTime"),
            Self::UnknownMisfireInstruction { code } => {
                write!(f, "unknown misfire instruction: {code}")
            }
        }
    }
}

impl std::error::Error for TriggerError {}
