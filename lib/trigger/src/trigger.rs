//! The trigger base: identity, schedule metadata, listener ordering, and
//! the state-machine-adjacent bookkeeping every concrete trigger shares.

use crate::calendar::Calendar;
use crate::error::TriggerError;
use crate::instruction::MISFIRE_INSTRUCTION_SMART_POLICY;
use crate::schedule::FireTimeSchedule;
use chrono::{DateTime, SubsecRound, Utc};
use scheduler_core::{ClientError, JobKey, TriggerKey};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Payload carried to the job, keyed by name. Ordered so serialization is
/// deterministic.
pub type JobDataMap = BTreeMap<String, serde_json::Value>;

/// Fields common to every trigger, independent of how it computes its own
/// fire times.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerBase {
    key: TriggerKey,
    job_key: JobKey,
    description: Option<String>,
    job_data_map: JobDataMap,
    volatile: bool,
    calendar_name: Option<String>,
    fire_instance_id: Option<String>,
    misfire_instruction: i32,
    trigger_listener_names: Vec<String>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
}

impl TriggerBase {
    /// Returns the trigger's own identity.
    #[must_use]
    pub fn key(&self) -> &TriggerKey {
        &self.key
    }

    /// Returns the identity of the job this trigger fires.
    #[must_use]
    pub fn job_key(&self) -> &JobKey {
        &self.job_key
    }

    /// Returns the opaque human-readable description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the job data map carried to the job on fire.
    ///
    /// The job should not mutate this during execution; the run shell
    /// hands the job a merged clone, not this map, so any mutation here is
    /// never re-persisted.
    #[must_use]
    pub fn job_data_map(&self) -> &JobDataMap {
        &self.job_data_map
    }

    /// Returns a mutable handle to the job data map.
    pub fn job_data_map_mut(&mut self) -> &mut JobDataMap {
        &mut self.job_data_map
    }

    /// Returns whether this trigger is persisted across restarts.
    #[must_use]
    pub fn volatile(&self) -> bool {
        self.volatile
    }

    /// Sets whether this trigger is persisted across restarts.
    pub fn set_volatile(&mut self, volatile: bool) {
        self.volatile = volatile;
    }

    /// Returns the named calendar filtering this trigger's fire times, if
    /// any.
    #[must_use]
    pub fn calendar_name(&self) -> Option<&str> {
        self.calendar_name.as_deref()
    }

    /// Sets the named calendar filtering this trigger's fire times.
    pub fn set_calendar_name(&mut self, calendar_name: Option<String>) {
        self.calendar_name = calendar_name;
    }

    /// Returns the fire-instance id set by the job store for the current
    /// fire, if any. Opaque to the core.
    #[must_use]
    pub fn fire_instance_id(&self) -> Option<&str> {
        self.fire_instance_id.as_deref()
    }

    /// Sets the fire-instance id. Called by the job store; never
    /// validated here.
    pub fn set_fire_instance_id(&mut self, fire_instance_id: Option<String>) {
        self.fire_instance_id = fire_instance_id;
    }

    /// Returns the current misfire instruction code.
    #[must_use]
    pub fn misfire_instruction(&self) -> i32 {
        self.misfire_instruction
    }

    /// Returns the listener names registered on this trigger, in
    /// notification order.
    #[must_use]
    pub fn trigger_listener_names(&self) -> &[String] {
        &self.trigger_listener_names
    }

    /// Appends a listener name. Order is significant: listeners are
    /// notified in insertion order.
    pub fn add_trigger_listener(&mut self, name: impl Into<String>) {
        self.trigger_listener_names.push(name.into());
    }

    /// Removes the first occurrence of `name`, returning whether it was
    /// present.
    pub fn remove_trigger_listener(&mut self, name: &str) -> bool {
        if let Some(pos) = self.trigger_listener_names.iter().position(|n| n == name) {
            self.trigger_listener_names.remove(pos);
            true
        } else {
            false
        }
    }

    /// Returns the earliest instant at which this trigger may fire.
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Returns the inclusive upper bound on fire times, if any.
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }
}

/// A trigger: identity plus schedule plus execution metadata.
///
/// Concrete schedules are out of scope here; fire-time math is dispatched
/// through the boxed [`FireTimeSchedule`] capability table, so a single
/// due-queue can hold heterogeneous concrete trigger types (simple
/// interval, cron, ...) ordered purely by next fire time.
#[derive(Debug)]
pub struct Trigger {
    base: TriggerBase,
    schedule: Box<dyn FireTimeSchedule>,
}

impl Clone for Trigger {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            schedule: self.schedule.clone_box(),
        }
    }
}

impl Trigger {
    /// Creates a new trigger. `group` and `job_group` default to
    /// [`scheduler_core::DEFAULT_GROUP`] when `None`; an empty name,
    /// job name, or whitespace-only group is rejected.
    pub fn new(
        name: impl Into<String>,
        group: Option<&str>,
        job_name: impl Into<String>,
        job_group: Option<&str>,
        start_time: DateTime<Utc>,
        schedule: impl FireTimeSchedule + 'static,
    ) -> Result<Self, TriggerError> {
        let key = TriggerKey::new(name, group)?;
        let job_key = JobKey::new(job_name, job_group)?;
        let start_time = if schedule.supports_millisecond_precision() {
            start_time
        } else {
            start_time.trunc_subsecs(0)
        };
        Ok(Self {
            base: TriggerBase {
                key,
                job_key,
                description: None,
                job_data_map: JobDataMap::new(),
                volatile: false,
                calendar_name: None,
                fire_instance_id: None,
                misfire_instruction: MISFIRE_INSTRUCTION_SMART_POLICY,
                trigger_listener_names: Vec::new(),
                start_time,
                end_time: None,
            },
            schedule: Box::new(schedule),
        })
    }

    /// Returns the common fields shared by every trigger.
    #[must_use]
    pub fn base(&self) -> &TriggerBase {
        &self.base
    }

    /// Returns a mutable handle to the common fields.
    pub fn base_mut(&mut self) -> &mut TriggerBase {
        &mut self.base
    }

    /// Returns the concrete schedule.
    #[must_use]
    pub fn schedule(&self) -> &dyn FireTimeSchedule {
        self.schedule.as_ref()
    }

    /// Renames the trigger, keeping its current group.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TriggerError> {
        let group = self.base.key.group().to_string();
        self.base.key = TriggerKey::new(name, Some(&group))?;
        Ok(())
    }

    /// Moves the trigger to a different group (`None` resets to the
    /// default group).
    pub fn set_group(&mut self, group: Option<&str>) -> Result<(), TriggerError> {
        let name = self.base.key.name().to_string();
        self.base.key = TriggerKey::new(name, group)?;
        Ok(())
    }

    /// Re-points this trigger at a different job name, keeping the current
    /// job group.
    pub fn set_job_name(&mut self, job_name: impl Into<String>) -> Result<(), TriggerError> {
        let job_group = self.base.job_key.group().to_string();
        self.base.job_key = JobKey::new(job_name, Some(&job_group))?;
        Ok(())
    }

    /// Re-points this trigger at a different job group (`None` resets to
    /// the default group).
    pub fn set_job_group(&mut self, job_group: Option<&str>) -> Result<(), TriggerError> {
        let job_name = self.base.job_key.name().to_string();
        self.base.job_key = JobKey::new(job_name, job_group)?;
        Ok(())
    }

    /// Sets the opaque human-readable description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.base.description = description;
    }

    /// Sets the inclusive upper bound on fire times. Rejects an `end_time`
    /// before the current `start_time`.
    pub fn set_end_time(&mut self, end_time: Option<DateTime<Utc>>) -> Result<(), TriggerError> {
        if let Some(end) = end_time
            && end < self.base.start_time
        {
            return Err(TriggerError::EndBeforeStart);
        }
        self.base.end_time = end_time;
        Ok(())
    }

    /// Sets the earliest instant at which this trigger may fire. Rejects a
    /// `start_time` after the current `end_time`, and truncates
    /// sub-second precision when the schedule does not support it.
    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) -> Result<(), TriggerError> {
        if let Some(end) = self.base.end_time
            && start_time > end
        {
            return Err(TriggerError::EndBeforeStart);
        }
        self.base.start_time = if self.schedule.supports_millisecond_precision() {
            start_time
        } else {
            start_time.trunc_subsecs(0)
        };
        Ok(())
    }

    /// Sets the misfire instruction. [`MISFIRE_INSTRUCTION_SMART_POLICY`]
    /// is always accepted; any other code is validated by the concrete
    /// schedule.
    pub fn set_misfire_instruction(&mut self, instruction: i32) -> Result<(), TriggerError> {
        if instruction != MISFIRE_INSTRUCTION_SMART_POLICY {
            self.schedule.validate_misfire_instruction(instruction)?;
        }
        self.base.misfire_instruction = instruction;
        Ok(())
    }

    /// Pre-scheduling validation gate. Fails with a client error if the
    /// identity fields are not in a schedulable state.
    ///
    /// In practice the eager validation in every setter above means this
    /// always succeeds once a `Trigger` has been constructed — it exists
    /// as the named checkpoint a scheduler calls before accepting a
    /// trigger for scheduling.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base.key.name().trim().is_empty() {
            return Err(ClientError::new("trigger name is required"));
        }
        if self.base.job_key.name().trim().is_empty() {
            return Err(ClientError::new("job name is required"));
        }
        Ok(())
    }

    /// Computes and records the first fire time, honoring `calendar`.
    pub fn compute_first_fire_time(
        &mut self,
        calendar: Option<&dyn Calendar>,
    ) -> Option<DateTime<Utc>> {
        self.schedule.compute_first_fire_time(&self.base, calendar)
    }

    /// Returns the next time this trigger will fire.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.next_fire_time()
    }

    /// Returns the time this trigger most recently fired.
    #[must_use]
    pub fn previous_fire_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.previous_fire_time()
    }

    /// Returns the next fire time strictly after `after`.
    #[must_use]
    pub fn fire_time_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.fire_time_after(after)
    }

    /// Returns the final fire time, or `None` for an unbounded schedule.
    #[must_use]
    pub fn final_fire_time(&self) -> Option<DateTime<Utc>> {
        self.schedule.final_fire_time()
    }

    /// Returns whether this trigger could still fire again.
    #[must_use]
    pub fn may_fire_again(&self) -> bool {
        self.schedule.may_fire_again()
    }

    /// Advances schedule state past the fire time that was just consumed.
    pub fn triggered(&mut self, calendar: Option<&dyn Calendar>) {
        self.schedule.triggered(&self.base, calendar);
        tracing::debug!(
            trigger = %self.base.key,
            next_fire_time = ?self.schedule.next_fire_time(),
            "trigger advanced past consumed fire time"
        );
    }

    /// Repairs schedule state after a missed fire.
    pub fn update_after_misfire(&mut self, calendar: Option<&dyn Calendar>) {
        tracing::warn!(trigger = %self.base.key, "repairing trigger schedule after misfire");
        self.schedule.update_after_misfire(&self.base, calendar);
    }

    /// Repairs schedule state after the named calendar changed.
    pub fn update_with_new_calendar(
        &mut self,
        calendar: Option<&dyn Calendar>,
        misfire_threshold_ms: i64,
    ) {
        tracing::debug!(trigger = %self.base.key, "repairing trigger schedule after calendar update");
        self.schedule
            .update_with_new_calendar(&self.base, calendar, misfire_threshold_ms);
    }

    /// Asks this trigger to decide its disposition after an execution
    /// pass, given whether the job succeeded.
    pub fn execution_complete(
        &mut self,
        job_succeeded: bool,
    ) -> Result<crate::CompletedExecutionInstruction, TriggerError> {
        self.schedule.execution_complete(&self.base, job_succeeded)
    }
}

impl PartialEq for Trigger {
    /// Identity is the `(group, name)` pair; the schedule and every other
    /// field are irrelevant to equality.
    fn eq(&self, other: &Self) -> bool {
        self.base.key == other.base.key
    }
}

impl Eq for Trigger {}

impl std::hash::Hash for Trigger {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.base.key.hash(state);
    }
}

/// Total order used for due-queue selection: ascending by next fire time,
/// with an absent next fire time sorting last. Two triggers with the same
/// next fire time (including both absent) compare equal under this order
/// even if their identities differ — this is a scheduling order, not an
/// identity order, and is inconsistent with `Eq`.
///
/// Deliberately not exposed as `Trigger`'s `Ord`/`PartialOrd` impl: a
/// `BTreeSet`/`BTreeMap` of triggers assumes its ordering agrees with
/// `Eq`, and this one doesn't (two distinct triggers with the same next
/// fire time compare equal here). Due-queue code sorts with this
/// function directly — `triggers.sort_by(compare_next_fire_time)` — and
/// must not put `Trigger` in an ordered-by-`Ord` collection.
#[must_use]
pub fn compare_next_fire_time(a: &Trigger, b: &Trigger) -> Ordering {
    match (a.next_fire_time(), b.next_fire_time()) {
        (None, None) => Ordering::Equal,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}
