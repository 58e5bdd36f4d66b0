//! Job Execution Context and the Job Run Shell: the single-fire execution
//! envelope that runs a job, observes its outcome, notifies listeners,
//! and reports disposition back to the job store.
//!
//! This crate provides:
//!
//! - [`context::JobExecutionContext`]: the per-fire bundle threaded
//!   through listener notifications, job execution, and store reporting.
//! - [`shell::JobRunShell`]: the blocking run loop driving one firing
//!   decision end to end, including re-execute passes and the
//!   persistence-retry loop.
//! - [`interfaces`]: the plain synchronous traits every external
//!   collaborator (job factory, job store, listener buses, shell pool)
//!   implements.
//! - [`config::RunShellConfig`]: the shell's own two tunables
//!   (persistence-retry interval, misfire threshold), loaded from the
//!   environment.

pub mod config;
pub mod context;
pub mod error;
pub mod interfaces;
pub mod shell;

pub use config::RunShellConfig;
pub use context::JobExecutionContext;
pub use error::{JobExecutionError, SchedulerError};
pub use interfaces::{
    FiredBundle, Job, JobDetail, JobFactory, JobListenerDispatch, JobStoreNotifier,
    SchedulerHandle, SchedulerListenerBus, ShellFactory, TriggerListenerDispatch,
};
pub use shell::JobRunShell;
