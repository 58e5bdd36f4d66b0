//! Error handling foundation for the scheduler core.
//!
//! This module provides the `Result` type alias using rootcause, plus
//! `ClientError`: the "reject at the door" error raised by pre-scheduling
//! validation, before a trigger ever reaches the run shell.
//!
//! Each crate defines its own domain-specific error types in their own
//! error modules, using rootcause's `.context()` to add layer-appropriate
//! context as errors propagate up the stack.

use rootcause::Report;
use std::fmt;

/// A Result type alias using rootcause's Report for error handling.
///
/// Each layer adds its own context via `.context()` as errors propagate.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

/// Raised when a trigger fails the pre-scheduling validation gate
/// (`Trigger::validate`). A client error is never retried; the trigger is
/// rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    /// Human-readable reason the trigger was rejected.
    pub reason: String,
}

impl ClientError {
    /// Creates a client error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client error: {}", self.reason)
    }
}

impl std::error::Error for ClientError {}
