//! Calendar: an external predicate on instants used to mask out otherwise
//! eligible fire times.
//!
//! Concrete calendars (business-hours, holiday lists, ...) are out of
//! scope here; this trait is the full extent of the core's calendar
//! contract — the capability a `FireTimeSchedule` needs when computing or
//! repairing fire times.

use chrono::{DateTime, Utc};

/// A named filter over instants.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Returns whether `time_stamp` is included (i.e. not masked out) by
    /// this calendar.
    fn is_time_included(&self, time_stamp: DateTime<Utc>) -> bool;

    /// Returns the next instant at or after `time_stamp` that this
    /// calendar includes.
    fn next_included_time(&self, time_stamp: DateTime<Utc>) -> DateTime<Utc>;
}
