//! External collaborators the run shell consumes.
//!
//! Every trait here is a leaf boundary: the shell calls it as an opaque
//! capability and never inspects the implementation. All are plain
//! synchronous traits — the shell is a blocking worker, per the run
//! loop's own design constraints, so nothing here is `async`.

use crate::context::JobExecutionContext;
use crate::error::{JobExecutionError, SchedulerError};
use chrono::{DateTime, Utc};
use scheduler_trigger::{CompletedExecutionInstruction, JobDataMap, Trigger};

/// Static description of the job a trigger fires, independent of any one
/// fire. Opaque beyond what the shell needs to build a context and merge
/// job data.
#[derive(Debug, Clone)]
pub struct JobDetail {
    /// Human-readable name for this job, e.g. for listener logging.
    pub name: String,
    /// Whether concurrent executions of this job must be serialized. A
    /// stateful job's triggers move to BLOCKED while it runs; enforced by
    /// the store/scheduler, not the shell.
    pub stateful: bool,
    /// Job-level defaults, overridden per-fire by the trigger's own
    /// `jobDataMap` when merged into a [`JobExecutionContext`].
    pub job_data_map: JobDataMap,
}

/// The packet handed from the scheduler's decision loop to a shell via
/// `Initialize`.
#[derive(Debug, Clone)]
pub struct FiredBundle {
    /// The trigger that fired.
    pub trigger: Trigger,
    /// The job this trigger fires.
    pub job_detail: JobDetail,
    /// The instant the trigger was scheduled to fire.
    pub scheduled_fire_time: DateTime<Utc>,
    /// The instant the scheduler actually delivered the firing.
    pub fire_time: DateTime<Utc>,
    /// The trigger's previous fire time, if any.
    pub previous_fire_time: Option<DateTime<Utc>>,
    /// The trigger's next fire time, if any, as of the moment it fired.
    pub next_fire_time: Option<DateTime<Utc>>,
    /// Whether this firing is a misfire recovery replay.
    pub recovering: bool,
}

/// Opaque handle back to the owning scheduler. The shell never calls
/// anything on this directly; it exists only so a [`JobExecutionContext`]
/// can carry it through to whatever a `Job` implementation needs from it.
pub trait SchedulerHandle: std::fmt::Debug + Send + Sync {}

/// A unit of work a trigger fires.
pub trait Job: Send {
    /// Runs the job against the context for this fire. Domain failures
    /// are reported as a [`JobExecutionError`]; anything else the
    /// implementation panics with or returns via another error type is
    /// caught by the shell and wrapped as
    /// [`SchedulerError::JobExecutionThrew`].
    fn execute(&mut self, context: &mut JobExecutionContext) -> Result<(), JobExecutionError>;
}

/// Instantiates a `Job` for a fired bundle.
pub trait JobFactory: Send + Sync {
    /// Creates a fresh job instance for this firing.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::JobInstantiationFailed`] if construction
    /// fails; the shell reports this to the scheduler-listener bus and
    /// aborts the firing before ever calling [`Job::execute`].
    fn new_job(&self, bundle: &FiredBundle) -> Result<Box<dyn Job>, SchedulerError>;
}

/// Reports a completed firing's disposition to the persistent job store.
pub trait JobStoreNotifier: Send + Sync {
    /// Persists the outcome of a firing.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Persistence`] on a store write failure;
    /// the shell retries this call per its persistence-retry policy.
    fn notify_job_store_job_complete(
        &self,
        context: &JobExecutionContext,
        instruction: CompletedExecutionInstruction,
    ) -> Result<(), SchedulerError>;
}

/// The scheduler-wide listener bus and thread-wake hook.
pub trait SchedulerListenerBus: Send + Sync {
    /// Reports an error to every registered scheduler listener.
    fn notify_scheduler_listeners_error(&self, message: &str, error: &SchedulerError);

    /// Reports that a trigger has no further fire time and is finalized.
    fn notify_scheduler_listeners_finalized(&self, trigger: &Trigger);

    /// Wakes the scheduler thread so it can pick the next due trigger.
    fn notify_scheduler_thread(&self);
}

/// Dispatches trigger-listener notifications for one firing.
pub trait TriggerListenerDispatch: Send + Sync {
    /// Notifies trigger listeners that the trigger fired. Returns
    /// whether any listener vetoed this execution.
    ///
    /// # Errors
    ///
    /// An error here aborts the firing per the pre-listener error policy.
    fn notify_trigger_listeners_fired(
        &self,
        context: &JobExecutionContext,
    ) -> Result<bool, SchedulerError>;

    /// Notifies trigger listeners of the instruction code
    /// `executionComplete` produced.
    fn notify_trigger_listeners_complete(
        &self,
        context: &JobExecutionContext,
        instruction: CompletedExecutionInstruction,
    );
}

/// Dispatches job-listener notifications for one firing.
pub trait JobListenerDispatch: Send + Sync {
    /// Notifies job listeners the job is about to execute.
    ///
    /// # Errors
    ///
    /// An error here aborts the firing per the pre-listener error policy.
    fn notify_job_listeners_to_be_executed(
        &self,
        context: &JobExecutionContext,
    ) -> Result<(), SchedulerError>;

    /// Notifies job listeners the job has executed, with its (possibly
    /// absent) error.
    ///
    /// # Errors
    ///
    /// Unlike every other post-listener call, a failure here aborts the
    /// firing entirely: the shell does not ask the trigger for its
    /// disposition, does not notify the job store, and does not finalize
    /// (wake the scheduler thread / return itself to its pool). Every
    /// other post-listener failure is logged and ignored instead.
    fn notify_job_listeners_was_executed(
        &self,
        context: &JobExecutionContext,
        error: Option<&JobExecutionError>,
    ) -> Result<(), SchedulerError>;

    /// Notifies job listeners the firing was vetoed before execution.
    fn notify_job_listeners_was_vetoed(&self, context: &JobExecutionContext);
}

/// Returns a completed shell to its owning pool.
pub trait ShellFactory: Send + Sync {
    /// Called once, at the very end of `run`, regardless of outcome.
    fn return_job_run_shell(&self);
}
