//! Lifecycle status machine shared by groups, persons, members and officers.
//!
//! Transitions are pure: [`StatusMachine::transition`] only computes the next
//! state. Persisting the new status and appending a [`StateLogEntry`] are
//! separate, explicit steps performed by the caller.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coded_enum::define_coded_enum;
use super::group::GroupStatus;

define_coded_enum! {
    /// Status of a person, member or officer.
    pub enum Status {
        /// No longer current.
        Inactive = (-10, "inactive", "Inactive"),
        /// Default for new rows.
        New = (0, "new", "New"),
        /// Current.
        Active = (10, "active", "Active"),
    }
}

impl Status {
    /// Whether the status counts as currently active.
    pub fn is_active(self) -> bool {
        self.code() > 0
    }
}

/// Lifecycle events accepted by every status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEvent {
    /// Move to `active`.
    Activate,
    /// Move to `inactive`.
    Deactivate,
}

impl StatusEvent {
    /// Machine name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition was not allowed from the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {event} from status {from}")]
pub struct TransitionError {
    /// Machine name of the rejected source state.
    pub from: &'static str,
    /// Rejected event.
    pub event: StatusEvent,
}

/// Status types that can be driven by [`StatusEvent`]s.
pub trait StatusMachine: Copy + Send + Sync + 'static {
    /// Compute the state reached by applying `event`.
    fn transition(self, event: StatusEvent) -> Result<Self, TransitionError>;

    /// Machine name for logging.
    fn state_name(self) -> &'static str;
}

impl StatusMachine for Status {
    fn transition(self, event: StatusEvent) -> Result<Self, TransitionError> {
        Ok(match event {
            StatusEvent::Activate => Self::Active,
            StatusEvent::Deactivate => Self::Inactive,
        })
    }

    fn state_name(self) -> &'static str {
        self.as_str()
    }
}

/// Guard on group activation. Always passes; reserved for business rules.
pub fn can_activate_group(_status: GroupStatus) -> bool {
    true
}

impl StatusMachine for GroupStatus {
    fn transition(self, event: StatusEvent) -> Result<Self, TransitionError> {
        let rejected = TransitionError {
            from: self.as_str(),
            event,
        };
        if !matches!(self, Self::Active | Self::Inactive | Self::New) {
            return Err(rejected);
        }
        match event {
            StatusEvent::Activate if can_activate_group(self) => Ok(Self::Active),
            StatusEvent::Activate => Err(rejected),
            StatusEvent::Deactivate => Ok(Self::Inactive),
        }
    }

    fn state_name(self) -> &'static str {
        self.as_str()
    }
}

define_coded_enum! {
    /// Entity families that carry a status.
    pub enum EntityKind {
        /// Group.
        Group = (1, "group", "Group"),
        /// Person.
        Person = (2, "person", "Person"),
        /// Member.
        Member = (3, "member", "Member"),
        /// Officer.
        Officer = (4, "officer", "Officer"),
    }
}

/// Append-only journal entry for one status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateLogEntry {
    /// Entity family.
    pub entity: EntityKind,
    /// Entity id.
    pub entity_id: Uuid,
    /// State before the transition.
    pub from_state: String,
    /// State after the transition.
    pub to_state: String,
    /// Event that caused the transition.
    pub event: StatusEvent,
    /// Operator or process that requested the transition.
    pub actor: Option<String>,
    /// Free-text reason.
    pub description: Option<String>,
    /// When the transition was recorded.
    pub recorded_at: DateTime<Utc>,
}
