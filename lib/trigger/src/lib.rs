//! Trigger base: the polymorphic fire-time calculator every concrete
//! schedule (simple interval, cron expression, calendar-aware — all out of
//! scope here) must honor.
//!
//! This crate provides:
//!
//! - [`Trigger`] / [`TriggerBase`]: identity, schedule metadata, listener
//!   ordering, and the mutator/comparator rules every trigger follows.
//! - [`FireTimeSchedule`]: the capability table a concrete trigger
//!   implements to supply fire-time math and its own misfire codes.
//! - [`TriggerState`]: the lifecycle state names the job store persists.
//! - [`CompletedExecutionInstruction`]: the wire contract between a
//!   trigger's `execution_complete` and the run shell.

pub mod calendar;
pub mod error;
pub mod instruction;
pub mod schedule;
pub mod state;
#[allow(clippy::module_inception)]
mod trigger;

pub use calendar::Calendar;
pub use error::TriggerError;
pub use instruction::{
    CompletedExecutionInstruction, MISFIRE_INSTRUCTION_SMART_POLICY, UnknownInstructionCode,
};
pub use schedule::FireTimeSchedule;
pub use state::{TriggerState, UnknownTriggerStateCode};
pub use trigger::{JobDataMap, Trigger, TriggerBase, compare_next_fire_time};
