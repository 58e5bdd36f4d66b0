//! Trigger lifecycle states.
//!
//! The core only names these states and their meanings; the state itself
//! lives in the job store, not on a `Trigger` value (see the module-level
//! docs on [`crate::Trigger`]). The numeric encoding is part of the store
//! wire contract and must not change.

use std::fmt;

/// Lifecycle state of a trigger, as tracked by the job store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum TriggerState {
    /// Unknown or absent. Sentinel used when a trigger is not in the store.
    None = -1,
    /// Eligible to fire on its normal schedule.
    Normal = 0,
    /// Administratively paused; will not fire until resumed to `Normal`.
    Paused = 1,
    /// The schedule is exhausted or was explicitly completed; will not fire
    /// again.
    Complete = 2,
    /// The scheduler could not instantiate or fire the trigger. Never
    /// retried automatically.
    Error = 3,
    /// The trigger's job is stateful and currently executing; mutually
    /// excluded from firing until execution completes.
    Blocked = 4,
}

impl TriggerState {
    /// Returns the numeric encoding persisted by the job store.
    #[must_use]
    pub const fn code(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "NONE",
            Self::Normal => "NORMAL",
            Self::Paused => "PAUSED",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
            Self::Blocked => "BLOCKED",
        };
        f.write_str(name)
    }
}

/// Error returned when a numeric state code has no matching `TriggerState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTriggerStateCode(pub i8);

impl fmt::Display for UnknownTriggerStateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown trigger state code: {}", self.0)
    }
}

impl std::error::Error for UnknownTriggerStateCode {}

impl TryFrom<i8> for TriggerState {
    type Error = UnknownTriggerStateCode;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(Self::None),
            0 => Ok(Self::Normal),
            1 => Ok(Self::Paused),
            2 => Ok(Self::Complete),
            3 => Ok(Self::Error),
            4 => Ok(Self::Blocked),
            other => Err(UnknownTriggerStateCode(other)),
        }
    }
}
