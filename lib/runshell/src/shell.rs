//! The Job Run Shell: drives one firing decision end to end.
//!
//! A shell is constructed once per worker slot and reused across firings
//! via [`JobRunShell::initialize`]/[`JobRunShell::passivate`]. `run` is a
//! plain blocking loop — no coroutines, no `async` — the thread-pool
//! owner that dispatches a shell to a worker provides all the
//! concurrency this needs.

use crate::config::RunShellConfig;
use crate::context::JobExecutionContext;
use crate::error::{JobExecutionError, SchedulerError};
use crate::interfaces::{
    FiredBundle, Job, JobFactory, JobListenerDispatch, JobStoreNotifier, SchedulerHandle,
    SchedulerListenerBus, ShellFactory, TriggerListenerDispatch,
};
use scheduler_trigger::CompletedExecutionInstruction;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Drives a single firing decision: instantiate the job, run the
/// pre/post listener notifications, execute the job (possibly more than
/// once if instructed to re-execute), ask the trigger for its
/// disposition, and report completion to the job store.
pub struct JobRunShell {
    job_factory: Arc<dyn JobFactory>,
    scheduler_listener_bus: Arc<dyn SchedulerListenerBus>,
    trigger_listeners: Arc<dyn TriggerListenerDispatch>,
    job_listeners: Arc<dyn JobListenerDispatch>,
    job_store_notifier: Arc<dyn JobStoreNotifier>,
    shell_factory: Arc<dyn ShellFactory>,
    config: RunShellConfig,
    shutdown_requested: Arc<AtomicBool>,
    job: Option<Box<dyn Job>>,
    context: Option<JobExecutionContext>,
}

impl JobRunShell {
    /// Builds a shell around its consumed collaborators. `shutdown_flag`
    /// is shared with the owning worker pool so `request_shutdown`
    /// (called from any thread) can stop this shell's persistence-retry
    /// loop without touching an in-flight job execution.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        job_factory: Arc<dyn JobFactory>,
        scheduler_listener_bus: Arc<dyn SchedulerListenerBus>,
        trigger_listeners: Arc<dyn TriggerListenerDispatch>,
        job_listeners: Arc<dyn JobListenerDispatch>,
        job_store_notifier: Arc<dyn JobStoreNotifier>,
        shell_factory: Arc<dyn ShellFactory>,
        config: RunShellConfig,
        shutdown_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            job_factory,
            scheduler_listener_bus,
            trigger_listeners,
            job_listeners,
            job_store_notifier,
            shell_factory,
            config,
            shutdown_requested: shutdown_flag,
            job: None,
            context: None,
        }
    }

    /// Requests that this shell's persistence-retry loop stop at its
    /// next check. Does not interrupt an in-flight job execution.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
    }

    /// Instantiates the job for `bundle` via the job factory and builds
    /// a fresh execution context. Must be called before `run`.
    ///
    /// # Errors
    ///
    /// Returns the factory's error after reporting it to the
    /// scheduler-listener bus. The caller must not call `run` on
    /// failure.
    pub fn initialize(
        &mut self,
        scheduler_handle: Arc<dyn SchedulerHandle>,
        bundle: FiredBundle,
    ) -> Result<(), SchedulerError> {
        let job = match self.job_factory.new_job(&bundle) {
            Ok(job) => job,
            Err(err) => {
                self.report_error("job factory failed to instantiate job", &err);
                return Err(err);
            }
        };

        self.job = Some(job);
        self.context = Some(JobExecutionContext::new(scheduler_handle, bundle));
        Ok(())
    }

    /// Traces the error at `warn` level and delivers it to the
    /// scheduler-listener bus. Every error path in `run` goes through
    /// this so an operator tailing logs sees the same failures the bus
    /// delivers to registered listeners.
    fn report_error(&self, message: &str, error: &SchedulerError) {
        tracing::warn!(error = %error, "{message}");
        self.scheduler_listener_bus
            .notify_scheduler_listeners_error(message, error);
    }

    /// Extension point called once at the start of `run`. No-op at the
    /// base; exists for persistent-store subclasses to open a
    /// transaction.
    fn begin(&self) {}

    /// Extension point called once per execution pass (`false` on a
    /// re-execute pass, `true` on the terminal pass), symmetric with
    /// `begin`.
    fn complete(&self, _successful: bool) {}

    /// Clears the job and context so this shell can be returned to a
    /// pool and reused for a different firing.
    fn passivate(&mut self) {
        self.job = None;
        self.context = None;
    }

    fn context(&self) -> &JobExecutionContext {
        self.context
            .as_ref()
            .expect("initialize must be called before run")
    }

    /// Runs this firing to completion, re-executing the job as many
    /// times as the trigger instructs.
    ///
    /// Returns `true` once the firing is fully disposed of (including
    /// the veto and happy paths); returns `false` if the persistence-retry
    /// loop observed a shutdown request before the job store ever
    /// accepted the completion, or if the was-executed job-listener
    /// notification itself failed (in which case the shell returns
    /// without finalizing at all — no trigger disposition, no store
    /// write, no wake, no return to its pool).
    pub fn run(&mut self) -> bool {
        self.begin();

        let vetoed = match self
            .trigger_listeners
            .notify_trigger_listeners_fired(self.context())
        {
            Ok(vetoed) => vetoed,
            Err(err) => {
                self.report_error("trigger listener failed while notifying fired", &err);
                self.finalize();
                return true;
            }
        };

        if vetoed {
            self.job_listeners
                .notify_job_listeners_was_vetoed(self.context());
            self.complete(true);
            self.finalize();
            return true;
        }

        if let Err(err) = self
            .job_listeners
            .notify_job_listeners_to_be_executed(self.context())
        {
            self.report_error("job listener failed while notifying to-be-executed", &err);
            self.finalize();
            return true;
        }

        loop {
            let job_error = self.execute_job_pass();

            if let Err(err) = self
                .job_listeners
                .notify_job_listeners_was_executed(self.context(), job_error.as_ref())
            {
                self.report_error("job listener failed while notifying was-executed", &err);
                return false;
            }

            let instruction = self.ask_trigger_execution_complete(job_error.is_none());

            self.trigger_listeners
                .notify_trigger_listeners_complete(self.context(), instruction);
            if self.context().trigger().next_fire_time().is_none() {
                self.scheduler_listener_bus
                    .notify_scheduler_listeners_finalized(self.context().trigger());
            }

            if instruction == CompletedExecutionInstruction::ReExecuteJob {
                self.context
                    .as_mut()
                    .expect("initialize must be called before run")
                    .increment_refire_count();
                self.complete(false);
                continue;
            }

            self.complete(true);

            if let Err(err) = self
                .job_store_notifier
                .notify_job_store_job_complete(self.context(), instruction)
            {
                match err {
                    SchedulerError::Persistence { .. } => {
                        if !self.persistence_retry_loop(instruction) {
                            self.finalize();
                            return false;
                        }
                    }
                    other => {
                        self.report_error("job store notification failed", &other);
                    }
                }
            }

            break;
        }

        self.finalize();
        true
    }

    /// Runs one execution pass: invokes the job, timing it, and
    /// translates a panic into a synthesized
    /// [`JobExecutionError`]/[`SchedulerError::JobExecutionThrew`] pair
    /// exactly as a non-domain error is handled.
    fn execute_job_pass(&mut self) -> Option<JobExecutionError> {
        let mut job = self
            .job
            .take()
            .expect("initialize must be called before run");
        let mut context = self
            .context
            .take()
            .expect("initialize must be called before run");

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| job.execute(&mut context)));
        let elapsed_ms = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
        context.set_job_run_time_millis(elapsed_ms);

        let job_error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(panic) => {
                let reason = panic_reason(&panic);
                self.report_error(
                    "job execution threw",
                    &SchedulerError::JobExecutionThrew {
                        reason: reason.clone(),
                    },
                );
                Some(JobExecutionError::synthesized(reason))
            }
        };

        self.job = Some(job);
        self.context = Some(context);
        job_error
    }

    /// Calls the trigger's `execution_complete`, logging a trigger bug
    /// and defaulting to NOOP on error.
    fn ask_trigger_execution_complete(
        &mut self,
        job_succeeded: bool,
    ) -> CompletedExecutionInstruction {
        let context = self
            .context
            .as_mut()
            .expect("initialize must be called before run");
        match context.trigger_mut().execution_complete(job_succeeded) {
            Ok(instruction) => instruction,
            Err(err) => {
                self.report_error(
                    "trigger threw during executionComplete",
                    &SchedulerError::TriggerThrew {
                        reason: err.to_string(),
                    },
                );
                CompletedExecutionInstruction::default()
            }
        }
    }

    /// Retries the job-store completion notification on the configured
    /// interval until it succeeds or a shutdown is requested. A thread
    /// interrupt is not modeled in Rust; the shutdown flag is the sole
    /// exit condition besides success.
    fn persistence_retry_loop(&self, instruction: CompletedExecutionInstruction) -> bool {
        loop {
            if self.shutdown_requested.load(Ordering::SeqCst) {
                tracing::debug!(trigger = %self.context().trigger().base().key(), "persistence retry loop stopping on shutdown request");
                return false;
            }

            std::thread::sleep(std::time::Duration::from_secs(
                self.config.persistence_retry_interval_seconds,
            ));

            match self
                .job_store_notifier
                .notify_job_store_job_complete(self.context(), instruction)
            {
                Ok(()) => {
                    tracing::debug!(trigger = %self.context().trigger().base().key(), "job store completion persisted after retry");
                    return true;
                }
                Err(SchedulerError::Persistence { .. }) => continue,
                Err(other) => {
                    self.report_error("job store notification failed during retry", &other);
                    continue;
                }
            }
        }
    }

    /// Wakes the scheduler thread and returns this shell to its pool.
    /// Called exactly once at the end of every `run`, regardless of
    /// outcome.
    fn finalize(&mut self) {
        tracing::debug!("firing finalized, returning shell to pool");
        self.scheduler_listener_bus.notify_scheduler_thread();
        self.passivate();
        self.shell_factory.return_job_run_shell();
    }
}

fn panic_reason(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "job panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{FiredBundle, JobDetail};
    use chrono::{DateTime, TimeZone, Utc};
    use scheduler_trigger::{Calendar, FireTimeSchedule, JobDataMap, Trigger, TriggerBase, TriggerError};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeHandle;
    impl SchedulerHandle for FakeHandle {}

    /// A schedule whose `execution_complete` is driven by a canned queue
    /// of instructions, and whose `next_fire_time` flips to `None` once
    /// the queue is drained — exercising the "finalized" notification.
    #[derive(Debug, Clone)]
    struct ScriptedSchedule {
        instructions: std::collections::VecDeque<CompletedExecutionInstruction>,
        has_more_fire_times: bool,
    }

    impl ScriptedSchedule {
        fn new(instructions: Vec<CompletedExecutionInstruction>) -> Self {
            Self {
                instructions: instructions.into(),
                has_more_fire_times: true,
            }
        }
    }

    impl FireTimeSchedule for ScriptedSchedule {
        fn clone_box(&self) -> Box<dyn FireTimeSchedule> {
            Box::new(self.clone())
        }
        fn supports_millisecond_precision(&self) -> bool {
            true
        }
        fn compute_first_fire_time(
            &mut self,
            _base: &TriggerBase,
            _calendar: Option<&dyn Calendar>,
        ) -> Option<DateTime<Utc>> {
            Some(at(0))
        }
        fn next_fire_time(&self) -> Option<DateTime<Utc>> {
            if self.has_more_fire_times {
                Some(at(10))
            } else {
                None
            }
        }
        fn previous_fire_time(&self) -> Option<DateTime<Utc>> {
            None
        }
        fn fire_time_after(&self, _after: DateTime<Utc>) -> Option<DateTime<Utc>> {
            None
        }
        fn final_fire_time(&self) -> Option<DateTime<Utc>> {
            None
        }
        fn may_fire_again(&self) -> bool {
            self.has_more_fire_times
        }
        fn validate_misfire_instruction(&self, _instruction: i32) -> Result<(), TriggerError> {
            Ok(())
        }
        fn triggered(&mut self, _base: &TriggerBase, _calendar: Option<&dyn Calendar>) {}
        fn update_after_misfire(&mut self, _base: &TriggerBase, _calendar: Option<&dyn Calendar>) {}
        fn update_with_new_calendar(
            &mut self,
            _base: &TriggerBase,
            _calendar: Option<&dyn Calendar>,
            _misfire_threshold_ms: i64,
        ) {
        }
        fn execution_complete(
            &mut self,
            _base: &TriggerBase,
            _job_succeeded: bool,
        ) -> Result<CompletedExecutionInstruction, TriggerError> {
            let instruction = self
                .instructions
                .pop_front()
                .unwrap_or(CompletedExecutionInstruction::Noop);
            if instruction != CompletedExecutionInstruction::ReExecuteJob {
                self.has_more_fire_times = false;
            }
            Ok(instruction)
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn bundle_with(instructions: Vec<CompletedExecutionInstruction>) -> FiredBundle {
        let trigger = Trigger::new(
            "nightly-report",
            None,
            "send-report",
            None,
            at(0),
            ScriptedSchedule::new(instructions),
        )
        .unwrap();

        FiredBundle {
            trigger,
            job_detail: JobDetail {
                name: "send-report".to_string(),
                stateful: false,
                job_data_map: JobDataMap::new(),
            },
            scheduled_fire_time: at(0),
            fire_time: at(0),
            previous_fire_time: None,
            next_fire_time: Some(at(10)),
            recovering: false,
        }
    }

    /// Records every call it receives, in order, for assertion.
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn record(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, event: &str) -> usize {
            self.events().iter().filter(|e| e.as_str() == event).count()
        }
    }

    struct CountingJob {
        recorder: Arc<Recorder>,
        fails_with: Option<FailureMode>,
    }

    enum FailureMode {
        Domain,
        Panic,
    }

    impl Job for CountingJob {
        fn execute(&mut self, _context: &mut JobExecutionContext) -> Result<(), JobExecutionError> {
            self.recorder.record("job.execute");
            match self.fails_with {
                None => Ok(()),
                Some(FailureMode::Domain) => {
                    Err(JobExecutionError::new("domain failure", false))
                }
                Some(FailureMode::Panic) => panic!("non-domain failure"),
            }
        }
    }

    struct FakeFactory {
        recorder: Arc<Recorder>,
        fails_with: Option<FailureMode>,
    }

    impl JobFactory for FakeFactory {
        fn new_job(&self, _bundle: &FiredBundle) -> Result<Box<dyn Job>, SchedulerError> {
            Ok(Box::new(CountingJob {
                recorder: self.recorder.clone(),
                fails_with: match &self.fails_with {
                    None => None,
                    Some(FailureMode::Domain) => Some(FailureMode::Domain),
                    Some(FailureMode::Panic) => Some(FailureMode::Panic),
                },
            }))
        }
    }

    struct FakeListenerBus {
        recorder: Arc<Recorder>,
    }

    impl SchedulerListenerBus for FakeListenerBus {
        fn notify_scheduler_listeners_error(&self, _message: &str, _error: &SchedulerError) {
            self.recorder.record("scheduler_bus.error");
        }
        fn notify_scheduler_listeners_finalized(&self, _trigger: &Trigger) {
            self.recorder.record("scheduler_bus.finalized");
        }
        fn notify_scheduler_thread(&self) {
            self.recorder.record("scheduler_bus.notify_thread");
        }
    }

    struct FakeTriggerListeners {
        recorder: Arc<Recorder>,
        vetoes: bool,
    }

    impl TriggerListenerDispatch for FakeTriggerListeners {
        fn notify_trigger_listeners_fired(
            &self,
            _context: &JobExecutionContext,
        ) -> Result<bool, SchedulerError> {
            self.recorder.record("trigger_listeners.fired");
            Ok(self.vetoes)
        }
        fn notify_trigger_listeners_complete(
            &self,
            _context: &JobExecutionContext,
            _instruction: CompletedExecutionInstruction,
        ) {
            self.recorder.record("trigger_listeners.complete");
        }
    }

    struct FakeJobListeners {
        recorder: Arc<Recorder>,
        was_executed_fails: bool,
    }

    impl JobListenerDispatch for FakeJobListeners {
        fn notify_job_listeners_to_be_executed(
            &self,
            _context: &JobExecutionContext,
        ) -> Result<(), SchedulerError> {
            self.recorder.record("job_listeners.to_be_executed");
            Ok(())
        }
        fn notify_job_listeners_was_executed(
            &self,
            _context: &JobExecutionContext,
            _error: Option<&JobExecutionError>,
        ) -> Result<(), SchedulerError> {
            self.recorder.record("job_listeners.was_executed");
            if self.was_executed_fails {
                return Err(SchedulerError::JobExecutionThrew {
                    reason: "listener boom".to_string(),
                });
            }
            Ok(())
        }
        fn notify_job_listeners_was_vetoed(&self, _context: &JobExecutionContext) {
            self.recorder.record("job_listeners.was_vetoed");
        }
    }

    struct FakeStoreNotifier {
        recorder: Arc<Recorder>,
        always_fails_with: Option<SchedulerError>,
        fail_times_then_succeed: Mutex<u32>,
    }

    impl JobStoreNotifier for FakeStoreNotifier {
        fn notify_job_store_job_complete(
            &self,
            _context: &JobExecutionContext,
            _instruction: CompletedExecutionInstruction,
        ) -> Result<(), SchedulerError> {
            self.recorder.record("store.notify_complete");
            if let Some(err) = &self.always_fails_with {
                return Err(err.clone());
            }
            let mut remaining = self.fail_times_then_succeed.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(SchedulerError::Persistence {
                    reason: "disk full".to_string(),
                });
            }
            Ok(())
        }
    }

    struct FakeShellFactory {
        recorder: Arc<Recorder>,
    }

    impl ShellFactory for FakeShellFactory {
        fn return_job_run_shell(&self) {
            self.recorder.record("shell_factory.returned");
        }
    }

    struct Harness {
        shell: JobRunShell,
        recorder: Arc<Recorder>,
        shutdown: Arc<AtomicBool>,
    }

    fn build_harness(
        job_failure: Option<FailureMode>,
        trigger_vetoes: bool,
        store_failure: Option<SchedulerError>,
        store_failures_before_success: u32,
    ) -> Harness {
        build_harness_full(
            job_failure,
            trigger_vetoes,
            store_failure,
            store_failures_before_success,
            false,
        )
    }

    fn build_harness_full(
        job_failure: Option<FailureMode>,
        trigger_vetoes: bool,
        store_failure: Option<SchedulerError>,
        store_failures_before_success: u32,
        job_listener_was_executed_fails: bool,
    ) -> Harness {
        let recorder = Arc::new(Recorder::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let shell = JobRunShell::new(
            Arc::new(FakeFactory {
                recorder: recorder.clone(),
                fails_with: job_failure,
            }),
            Arc::new(FakeListenerBus {
                recorder: recorder.clone(),
            }),
            Arc::new(FakeTriggerListeners {
                recorder: recorder.clone(),
                vetoes: trigger_vetoes,
            }),
            Arc::new(FakeJobListeners {
                recorder: recorder.clone(),
                was_executed_fails: job_listener_was_executed_fails,
            }),
            Arc::new(FakeStoreNotifier {
                recorder: recorder.clone(),
                always_fails_with: store_failure,
                fail_times_then_succeed: Mutex::new(store_failures_before_success),
            }),
            Arc::new(FakeShellFactory {
                recorder: recorder.clone(),
            }),
            RunShellConfig {
                persistence_retry_interval_seconds: 0,
                misfire_threshold_ms: 60_000,
            },
            shutdown.clone(),
        );

        Harness {
            shell,
            recorder,
            shutdown,
        }
    }

    #[test]
    fn happy_path_fires_job_once_and_reports_noop() {
        let mut harness = build_harness(None, false, None, 0);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        let result = harness.shell.run();

        assert!(result);
        assert_eq!(harness.recorder.count("job.execute"), 1);
        assert_eq!(harness.recorder.count("store.notify_complete"), 1);
        assert_eq!(harness.recorder.count("shell_factory.returned"), 1);
        assert_eq!(harness.recorder.count("scheduler_bus.notify_thread"), 1);
        assert_eq!(harness.recorder.count("scheduler_bus.finalized"), 1);
    }

    #[test]
    fn veto_skips_execution_and_store_notification() {
        let mut harness = build_harness(None, true, None, 0);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        let result = harness.shell.run();

        assert!(result);
        assert_eq!(harness.recorder.count("job.execute"), 0);
        assert_eq!(harness.recorder.count("job_listeners.was_vetoed"), 1);
        assert_eq!(harness.recorder.count("store.notify_complete"), 0);
        assert_eq!(harness.recorder.count("shell_factory.returned"), 1);
    }

    #[test]
    fn job_panic_is_reported_and_execution_complete_still_runs() {
        let mut harness = build_harness(Some(FailureMode::Panic), false, None, 0);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        let result = harness.shell.run();

        assert!(result);
        assert_eq!(harness.recorder.count("scheduler_bus.error"), 1);
        assert_eq!(harness.recorder.count("job_listeners.was_executed"), 1);
        assert_eq!(harness.recorder.count("trigger_listeners.complete"), 1);
    }

    #[test]
    fn domain_failure_does_not_report_to_scheduler_bus() {
        let mut harness = build_harness(Some(FailureMode::Domain), false, None, 0);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        harness.shell.run();

        assert_eq!(harness.recorder.count("scheduler_bus.error"), 0);
    }

    #[test]
    fn re_execute_runs_job_three_times_and_refire_count_ends_at_two() {
        let mut harness = build_harness(
            None,
            false,
            None,
            0,
        );
        harness
            .shell
            .initialize(
                Arc::new(FakeHandle),
                bundle_with(vec![
                    CompletedExecutionInstruction::ReExecuteJob,
                    CompletedExecutionInstruction::ReExecuteJob,
                    CompletedExecutionInstruction::Noop,
                ]),
            )
            .unwrap();

        let result = harness.shell.run();

        assert!(result);
        assert_eq!(harness.recorder.count("job.execute"), 3);
        assert_eq!(harness.recorder.count("store.notify_complete"), 1);
    }

    #[test]
    fn persistence_failure_then_shutdown_returns_false() {
        let mut harness = build_harness(
            None,
            false,
            Some(SchedulerError::Persistence {
                reason: "disk full".to_string(),
            }),
            0,
        );
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        harness.shutdown.store(true, Ordering::SeqCst);
        let result = harness.shell.run();

        assert!(!result);
        assert_eq!(harness.recorder.count("shell_factory.returned"), 1);
    }

    #[test]
    fn persistence_retry_eventually_succeeds() {
        let mut harness = build_harness(None, false, None, 2);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        let result = harness.shell.run();

        assert!(result);
        assert_eq!(harness.recorder.count("store.notify_complete"), 3);
    }

    #[test]
    fn was_executed_listener_failure_aborts_without_finalizing() {
        let mut harness = build_harness_full(None, false, None, 0, true);
        harness
            .shell
            .initialize(Arc::new(FakeHandle), bundle_with(vec![CompletedExecutionInstruction::Noop]))
            .unwrap();

        let result = harness.shell.run();

        assert!(!result);
        assert_eq!(harness.recorder.count("job.execute"), 1);
        assert_eq!(harness.recorder.count("job_listeners.was_executed"), 1);
        assert_eq!(harness.recorder.count("trigger_listeners.complete"), 0);
        assert_eq!(harness.recorder.count("store.notify_complete"), 0);
        assert_eq!(harness.recorder.count("scheduler_bus.notify_thread"), 0);
        assert_eq!(harness.recorder.count("shell_factory.returned"), 0);
    }
}
