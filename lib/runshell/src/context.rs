//! The per-fire execution context.
//!
//! Carries everything a [`crate::interfaces::Job`] or a listener needs to
//! know about the firing it is being asked to observe, and the run-time
//! bookkeeping the shell accumulates across one or more execution passes.
//!
//! The instantiated job itself is held by the shell alongside this
//! context rather than inside it — `execute(&mut self, &mut
//! JobExecutionContext)` would otherwise need the job to borrow the very
//! struct that owns it. Functionally the two travel together for the
//! lifetime of one firing, exactly as the design calls for.

use crate::interfaces::{FiredBundle, JobDetail, SchedulerHandle};
use chrono::{DateTime, Utc};
use scheduler_trigger::{JobDataMap, Trigger};
use std::sync::Arc;

/// Per-fire bundle threaded through the run shell's listener
/// notifications, job execution, and store reporting.
#[derive(Debug, Clone)]
pub struct JobExecutionContext {
    scheduler_handle: Arc<dyn SchedulerHandle>,
    trigger: Trigger,
    job_detail: JobDetail,
    merged_job_data_map: JobDataMap,
    scheduled_fire_time: DateTime<Utc>,
    fire_time: DateTime<Utc>,
    previous_fire_time: Option<DateTime<Utc>>,
    next_fire_time: Option<DateTime<Utc>>,
    refire_count: u32,
    recovering: bool,
    job_run_time_millis: Option<i64>,
}

impl JobExecutionContext {
    /// Builds a context for a freshly fired bundle. The job data map
    /// merges the job's own defaults with the trigger's overrides, the
    /// trigger taking precedence on key collision.
    #[must_use]
    pub fn new(scheduler_handle: Arc<dyn SchedulerHandle>, bundle: FiredBundle) -> Self {
        let mut merged_job_data_map = bundle.job_detail.job_data_map.clone();
        merged_job_data_map.extend(bundle.trigger.base().job_data_map().clone());

        Self {
            scheduler_handle,
            trigger: bundle.trigger,
            job_detail: bundle.job_detail,
            merged_job_data_map,
            scheduled_fire_time: bundle.scheduled_fire_time,
            fire_time: bundle.fire_time,
            previous_fire_time: bundle.previous_fire_time,
            next_fire_time: bundle.next_fire_time,
            refire_count: 0,
            recovering: bundle.recovering,
            job_run_time_millis: None,
        }
    }

    /// Returns the opaque scheduler handle.
    #[must_use]
    pub fn scheduler_handle(&self) -> &Arc<dyn SchedulerHandle> {
        &self.scheduler_handle
    }

    /// Returns the trigger that fired.
    #[must_use]
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Returns a mutable handle to the trigger that fired.
    pub fn trigger_mut(&mut self) -> &mut Trigger {
        &mut self.trigger
    }

    /// Returns the job this firing belongs to.
    #[must_use]
    pub fn job_detail(&self) -> &JobDetail {
        &self.job_detail
    }

    /// Returns the merged job data map handed to the job.
    #[must_use]
    pub fn merged_job_data_map(&self) -> &JobDataMap {
        &self.merged_job_data_map
    }

    /// Returns the instant the trigger was scheduled to fire.
    #[must_use]
    pub fn scheduled_fire_time(&self) -> DateTime<Utc> {
        self.scheduled_fire_time
    }

    /// Returns the instant the scheduler actually delivered the firing.
    #[must_use]
    pub fn fire_time(&self) -> DateTime<Utc> {
        self.fire_time
    }

    /// Returns the trigger's previous fire time, if any.
    #[must_use]
    pub fn previous_fire_time(&self) -> Option<DateTime<Utc>> {
        self.previous_fire_time
    }

    /// Returns the trigger's next fire time as of the moment it fired.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        self.next_fire_time
    }

    /// Returns how many times this firing has been re-executed.
    #[must_use]
    pub fn refire_count(&self) -> u32 {
        self.refire_count
    }

    /// Increments the refire counter. Called once per `RE_EXECUTE_JOB`
    /// instruction.
    pub fn increment_refire_count(&mut self) {
        self.refire_count += 1;
    }

    /// Returns whether this firing is a misfire recovery replay.
    #[must_use]
    pub fn recovering(&self) -> bool {
        self.recovering
    }

    /// Returns the most recently recorded execution wall-clock time, in
    /// milliseconds, if an execution pass has completed.
    #[must_use]
    pub fn job_run_time_millis(&self) -> Option<i64> {
        self.job_run_time_millis
    }

    /// Records the wall-clock duration of the execution pass that just
    /// finished.
    pub fn set_job_run_time_millis(&mut self, millis: i64) {
        self.job_run_time_millis = Some(millis);
    }
}
