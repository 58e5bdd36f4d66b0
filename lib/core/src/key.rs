//! Name/group identity for triggers and jobs.
//!
//! Every trigger and every job is addressed by a `(group, name)` pair. The
//! pair is the key by which a job store uniquely identifies a trigger or a
//! job; two triggers with the same group and name are the same trigger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group used when no explicit group is supplied.
pub const DEFAULT_GROUP: &str = "DEFAULT";

/// Error returned when a name or group fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKeyError {
    /// Which field failed (`"name"` or `"group"`).
    pub field: &'static str,
    /// Why it failed.
    pub reason: String,
}

impl fmt::Display for InvalidKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.reason)
    }
}

impl std::error::Error for InvalidKeyError {}

/// Validates a required name field: non-null (not applicable in Rust) and
/// non-empty once trimmed.
pub fn validate_name(field: &'static str, name: &str) -> Result<(), InvalidKeyError> {
    if name.trim().is_empty() {
        return Err(InvalidKeyError {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Resolves an optional group to the default sentinel, rejecting
/// whitespace-only groups.
pub fn resolve_group(field: &'static str, group: Option<&str>) -> Result<String, InvalidKeyError> {
    match group {
        None => Ok(DEFAULT_GROUP.to_string()),
        Some(g) if g.trim().is_empty() => Err(InvalidKeyError {
            field,
            reason: "must not be empty or whitespace".to_string(),
        }),
        Some(g) => Ok(g.to_string()),
    }
}

macro_rules! define_key {
    ($(#[$meta:meta])* $name:ident, $name_field:expr, $group_field:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            name: String,
            group: String,
        }

        impl $name {
            /// Creates a key, defaulting a `None` group to
            /// [`DEFAULT_GROUP`] and rejecting an empty name or a
            /// whitespace-only group.
            pub fn new(
                name: impl Into<String>,
                group: Option<&str>,
            ) -> Result<Self, InvalidKeyError> {
                let name = name.into();
                validate_name($name_field, &name)?;
                let group = resolve_group($group_field, group)?;
                Ok(Self { name, group })
            }

            /// Returns the name component.
            #[must_use]
            pub fn name(&self) -> &str {
                &self.name
            }

            /// Returns the group component.
            #[must_use]
            pub fn group(&self) -> &str {
                &self.group
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}", self.group, self.name)
            }
        }
    };
}

define_key!(
    /// Identity of a trigger: `(group, name)`.
    TriggerKey,
    "name",
    "group"
);

define_key!(
    /// Identity of a job: `(group, name)`.
    JobKey,
    "jobName",
    "jobGroup"
);
