//! Operator-driven status transitions with an append-only journal.

use std::sync::Arc;

use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    GroupRepository, MemberRepository, OfficerRepository, PersonRepository, StateLogRepository,
};
use crate::domain::{EntityKind, Error, StateLogEntry, StatusEvent, StatusMachine};

/// A requested transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    /// Entity type.
    pub entity: EntityKind,
    /// Entity id.
    pub id: Uuid,
    /// Event to apply.
    pub event: StatusEvent,
    /// Operator recorded in the journal.
    pub actor: Option<String>,
    /// Free-text reason recorded in the journal.
    pub description: Option<String>,
}

/// Loads an entity, applies a transition, persists the new status and
/// appends a [`StateLogEntry`].
#[derive(Clone)]
pub struct StatusTransitionService {
    groups: Arc<dyn GroupRepository>,
    people: Arc<dyn PersonRepository>,
    members: Arc<dyn MemberRepository>,
    officers: Arc<dyn OfficerRepository>,
    log: Arc<dyn StateLogRepository>,
    clock: Arc<dyn Clock>,
}

fn missing(entity: EntityKind, id: Uuid) -> Error {
    Error::not_found(format!("{} {id} not found", entity.as_str()))
}

fn transition<S: StatusMachine>(current: S, event: StatusEvent) -> Result<S, Error> {
    current
        .transition(event)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

impl StatusTransitionService {
    /// Create a service.
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        people: Arc<dyn PersonRepository>,
        members: Arc<dyn MemberRepository>,
        officers: Arc<dyn OfficerRepository>,
        log: Arc<dyn StateLogRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            groups,
            people,
            members,
            officers,
            log,
            clock,
        }
    }

    /// Apply a transition and journal it.
    ///
    /// # Errors
    /// `NotFound` when the entity does not exist, `InvalidRequest` when the
    /// current status does not allow the event.
    pub async fn apply(&self, request: TransitionRequest) -> Result<StateLogEntry, Error> {
        let TransitionRequest {
            entity,
            id,
            event,
            actor,
            description,
        } = request;

        let (from_state, to_state) = match entity {
            EntityKind::Group => {
                let group = self
                    .groups
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| missing(entity, id))?;
                let next = transition(group.status, event)?;
                self.groups.set_status(id, next).await?;
                (group.status.state_name(), next.state_name())
            }
            EntityKind::Person => {
                let person = self
                    .people
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| missing(entity, id))?;
                let next = transition(person.status, event)?;
                self.people.set_status(id, next).await?;
                (person.status.state_name(), next.state_name())
            }
            EntityKind::Member => {
                let member = self
                    .members
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| missing(entity, id))?;
                let next = transition(member.status, event)?;
                self.members.set_status(id, next).await?;
                (member.status.state_name(), next.state_name())
            }
            EntityKind::Officer => {
                let officer = self
                    .officers
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| missing(entity, id))?;
                let next = transition(officer.status, event)?;
                self.officers.set_status(id, next).await?;
                (officer.status.state_name(), next.state_name())
            }
        };

        let entry = StateLogEntry {
            entity,
            entity_id: id,
            from_state: from_state.to_owned(),
            to_state: to_state.to_owned(),
            event,
            actor,
            description,
            recorded_at: self.clock.utc(),
        };
        self.log.append(entry.clone()).await?;
        info!(
            entity = %entity,
            entity_id = %id,
            from = from_state,
            to = to_state,
            "status transition recorded"
        );
        Ok(entry)
    }
}

#[cfg(test)]
#[path = "status_transitions_tests.rs"]
mod tests;
