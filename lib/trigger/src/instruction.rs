//! Instruction codes returned by `executionComplete` (the run shell's name
//! for the call is `Trigger::execution_complete`), and the base misfire
//! instruction shared by every concrete trigger.
//!
//! These integers are part of the wire contract between trigger
//! implementations and the run shell; they must stay stable.

use std::fmt;

/// The misfire instruction that always means "defer to the concrete
/// trigger's own `update_after_misfire`". Every concrete trigger accepts
/// this code in addition to whatever codes it defines itself.
pub const MISFIRE_INSTRUCTION_SMART_POLICY: i32 = 0;

/// Disposition the run shell applies after a fire completes, as decided by
/// `Trigger::execution_complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CompletedExecutionInstruction {
    /// Proceed normally; no change to the trigger's disposition.
    Noop = 0,
    /// Re-run the job immediately, preserving the execution context.
    ReExecuteJob = 1,
    /// Mark this trigger `COMPLETE`.
    SetTriggerComplete = 2,
    /// Remove this trigger from the store.
    DeleteTrigger = 3,
    /// Mark every trigger for the job `COMPLETE`.
    SetAllJobTriggersComplete = 4,
    /// Mark this trigger `ERROR`.
    SetTriggerError = 5,
    /// Mark every trigger for the job `ERROR`.
    SetAllJobTriggersError = 6,
}

impl CompletedExecutionInstruction {
    /// Returns the numeric wire code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl Default for CompletedExecutionInstruction {
    fn default() -> Self {
        Self::Noop
    }
}

impl fmt::Display for CompletedExecutionInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Noop => "NOOP",
            Self::ReExecuteJob => "RE_EXECUTE_JOB",
            Self::SetTriggerComplete => "SET_TRIGGER_COMPLETE",
            Self::DeleteTrigger => "DELETE_TRIGGER",
            Self::SetAllJobTriggersComplete => "SET_ALL_JOB_TRIGGERS_COMPLETE",
            Self::SetTriggerError => "SET_TRIGGER_ERROR",
            Self::SetAllJobTriggersError => "SET_ALL_JOB_TRIGGERS_ERROR",
        };
        f.write_str(name)
    }
}

/// Error returned when a numeric instruction code has no matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownInstructionCode(pub i32);

impl fmt::Display for UnknownInstructionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown completed-execution instruction code: {}", self.0)
    }
}

impl std::error::Error for UnknownInstructionCode {}

impl TryFrom<i32> for CompletedExecutionInstruction {
    type Error = UnknownInstructionCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Noop),
            1 => Ok(Self::ReExecuteJob),
            2 => Ok(Self::SetTriggerComplete),
            3 => Ok(Self::DeleteTrigger),
            4 => Ok(Self::SetAllJobTriggersComplete),
            5 => Ok(Self::SetTriggerError),
            6 => Ok(Self::SetAllJobTriggersError),
            other => Err(UnknownInstructionCode(other)),
        }
    }
}
