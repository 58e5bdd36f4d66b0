//! The fire-time contract every concrete trigger must implement.
//!
//! This is the "capability table" referred to in the design notes: rather
//! than modeling triggers as a class hierarchy, the common fields live on
//! [`crate::TriggerBase`] and fire-time math is dispatched through this
//! trait. Concrete schedules (simple interval, cron expression,
//! calendar-aware) are out of scope for this crate; only the contract is
//! specified here.

use crate::TriggerError;
use crate::calendar::Calendar;
use crate::trigger::TriggerBase;
use chrono::{DateTime, Utc};

/// Fire-time calculator and misfire-code set for a concrete trigger type.
///
/// Trigger values hold this behind `Box<dyn FireTimeSchedule>` so a single
/// due-queue can hold heterogeneous concrete trigger types, the way a
/// Quartz-style scheduler mixes simple and cron triggers in one queue
/// ordered purely by next fire time.
pub trait FireTimeSchedule: std::fmt::Debug + Send + Sync {
    /// Clones this schedule into a fresh box. Used to give `Trigger` a
    /// `Clone` impl despite holding a trait object.
    fn clone_box(&self) -> Box<dyn FireTimeSchedule>;

    /// Whether this schedule can fire at sub-second precision. If `false`,
    /// the trigger's `startTime` is truncated to second boundaries on
    /// assignment.
    fn supports_millisecond_precision(&self) -> bool;

    /// Computes and records the first fire time, honoring `calendar` if
    /// supplied. Called once when the trigger is added to a scheduler.
    fn compute_first_fire_time(
        &mut self,
        base: &TriggerBase,
        calendar: Option<&dyn Calendar>,
    ) -> Option<DateTime<Utc>>;

    /// Returns the next time this trigger will fire, or `None` if it will
    /// not fire again.
    fn next_fire_time(&self) -> Option<DateTime<Utc>>;

    /// Returns the time this trigger most recently fired, or `None` if it
    /// has never fired.
    fn previous_fire_time(&self) -> Option<DateTime<Utc>>;

    /// Returns the next fire time strictly after `after`, without mutating
    /// the schedule's own state.
    fn fire_time_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>>;

    /// Returns the final fire time, or `None` for an unbounded schedule.
    fn final_fire_time(&self) -> Option<DateTime<Utc>>;

    /// Returns whether this trigger could still fire again.
    fn may_fire_again(&self) -> bool;

    /// Validates a misfire instruction code understood by this concrete
    /// trigger. [`crate::MISFIRE_INSTRUCTION_SMART_POLICY`] is always
    /// valid and is checked by the caller before this is invoked.
    fn validate_misfire_instruction(&self, instruction: i32) -> Result<(), TriggerError>;

    /// Advances schedule state past the fire time that was just consumed.
    fn triggered(&mut self, base: &TriggerBase, calendar: Option<&dyn Calendar>);

    /// Repairs schedule state after a missed fire, per the trigger's
    /// configured misfire instruction.
    fn update_after_misfire(&mut self, base: &TriggerBase, calendar: Option<&dyn Calendar>);

    /// Repairs schedule state after the named calendar changed, skipping
    /// ahead past any now-excluded fire times within
    /// `misfire_threshold_ms` of now.
    fn update_with_new_calendar(
        &mut self,
        base: &TriggerBase,
        calendar: Option<&dyn Calendar>,
        misfire_threshold_ms: i64,
    );

    /// Decides this trigger's disposition after one execution pass
    /// completed, given whether the job succeeded. The run shell logs a
    /// `Result::Err` here as a bug in the trigger and falls back to
    /// [`crate::CompletedExecutionInstruction::Noop`].
    fn execution_complete(
        &mut self,
        base: &TriggerBase,
        job_succeeded: bool,
    ) -> Result<crate::CompletedExecutionInstruction, TriggerError>;
}
