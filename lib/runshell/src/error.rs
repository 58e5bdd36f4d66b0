//! Errors raised inside the run shell's firing sequence.
//!
//! None of these ever escape [`crate::shell::JobRunShell::run`] uncaptured
//! — they are either handled inline or reported through the consumed
//! scheduler-listener bus. They exist as typed values so call sites can
//! match on origin rather than parse a message.

use std::fmt;

/// Errors the shell itself raises while driving a firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The job factory could not instantiate a job for the fired bundle.
    JobInstantiationFailed {
        /// Reason reported by the factory.
        reason: String,
    },
    /// The job raised something other than a [`JobExecutionError`]; the
    /// shell wraps it here before notifying listeners.
    JobExecutionThrew {
        /// Reason extracted from the non-domain error.
        reason: String,
    },
    /// A trigger's `executionComplete` raised an error. Logged as a bug
    /// in the trigger; the instruction code defaults to NOOP.
    TriggerThrew {
        /// Reason reported by the trigger.
        reason: String,
    },
    /// The job store failed to persist the completed firing.
    Persistence {
        /// Reason reported by the store.
        reason: String,
    },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JobInstantiationFailed { reason } => {
                write!(f, "job instantiation failed: {reason}")
            }
            Self::JobExecutionThrew { reason } => {
                write!(f, "job execution threw: {reason}")
            }
            Self::TriggerThrew { reason } => {
                write!(f, "trigger threw during executionComplete: {reason}")
            }
            Self::Persistence { reason } => {
                write!(f, "job store persistence failed: {reason}")
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

/// The domain-specific error a job raises to report a failed execution.
///
/// Carries `refire`, the job's own opinion on whether it should be run
/// again immediately; a synthesized instance (wrapping a non-domain
/// error the job raised) always sets this to `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobExecutionError {
    /// Human-readable failure reason.
    pub reason: String,
    /// Whether the job believes an immediate re-execution would help.
    pub refire: bool,
}

impl JobExecutionError {
    /// Creates a job execution error with an explicit refire preference.
    pub fn new(reason: impl Into<String>, refire: bool) -> Self {
        Self {
            reason: reason.into(),
            refire,
        }
    }

    /// Synthesizes a job execution error from a non-domain failure. The
    /// job gave no opinion on refiring, so `refire` is `false`.
    pub fn synthesized(reason: impl Into<String>) -> Self {
        Self::new(reason, false)
    }
}

impl fmt::Display for JobExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job execution error: {}", self.reason)
    }
}

impl std::error::Error for JobExecutionError {}
