//! In-memory roster store implementing every repository port.
//!
//! Used for `--dry-run` passes and integration tests. It mirrors the
//! PostgreSQL constraints the reconcilers rely on: unique `(bhs_id, kind)`
//! on groups, natural-key upserts, cascading deletes and the `SET NULL`
//! parent link.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::{
    GroupRepository, GroupRepositoryError, MemberRepository, MemberRepositoryError,
    OfficerRepository, OfficerRepositoryError, OwnerRepository, OwnerRepositoryError,
    PersonRepository, PersonRepositoryError, StateLogRepository, StateLogRepositoryError,
    UserAccountRepository, UserAccountRepositoryError,
};
use crate::domain::{
    AccountProfile, Group, GroupKind, GroupStatus, GroupUpsert, Member, MemberKey, MemberUpsert,
    Officer, OfficerKey, OfficerUpsert, Person, PersonUpsert, StateLogEntry, Status, TreeNode,
    Upserted, UserAccount,
};

#[derive(Debug, Default)]
struct RosterState {
    groups: HashMap<Uuid, Group>,
    persons: HashMap<Uuid, Person>,
    members: HashMap<Uuid, Member>,
    officers: HashMap<Uuid, Officer>,
    accounts: HashMap<String, UserAccount>,
    group_owners: HashMap<Uuid, BTreeSet<Uuid>>,
    person_owners: HashMap<Uuid, BTreeSet<Uuid>>,
    state_log: Vec<StateLogEntry>,
}

impl RosterState {
    fn remove_group(&mut self, id: Uuid) {
        self.groups.remove(&id);
        self.group_owners.remove(&id);
        self.members.retain(|_, member| member.key.group_id != id);
        self.officers.retain(|_, officer| officer.key.group_id != id);
        for group in self.groups.values_mut() {
            if group.parent_id == Some(id) {
                group.parent_id = None;
            }
        }
    }

    fn remove_person(&mut self, id: Uuid) {
        self.persons.remove(&id);
        self.person_owners.remove(&id);
        self.members.retain(|_, member| member.key.person_id != id);
        self.officers.retain(|_, officer| officer.key.person_id != id);
    }

    fn accounts_for<'a>(&self, emails: impl Iterator<Item = &'a str>) -> BTreeSet<Uuid> {
        emails
            .filter(|email| !email.is_empty())
            .filter_map(|email| self.accounts.get(email))
            .map(|account| account.id)
            .collect()
    }

    fn officer_accounts(&self, group_id: Uuid) -> BTreeSet<Uuid> {
        let emails = self
            .officers
            .values()
            .filter(|officer| officer.key.group_id == group_id && officer.status == Status::Active)
            .filter_map(|officer| self.persons.get(&officer.key.person_id))
            .map(|person| person.email.as_str());
        self.accounts_for(emails)
    }
}

/// Shared in-memory store. Clone the `Arc` to hand it to each port.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    state: Mutex<RosterState>,
}

impl InMemoryRoster {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every group, ordered by `tree_sort` then name.
    pub async fn groups(&self) -> Vec<Group> {
        let state = self.state.lock().await;
        let mut groups: Vec<Group> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| {
            (a.tree_sort.is_none(), a.tree_sort, &a.name)
                .cmp(&(b.tree_sort.is_none(), b.tree_sort, &b.name))
        });
        groups
    }

    /// Every person, ordered by last then first name.
    pub async fn persons(&self) -> Vec<Person> {
        let state = self.state.lock().await;
        let mut persons: Vec<Person> = state.persons.values().cloned().collect();
        persons.sort_by(|a, b| a.sort_name().cmp(&b.sort_name()));
        persons
    }

    /// Every member, ordered by natural key.
    pub async fn members(&self) -> Vec<Member> {
        let state = self.state.lock().await;
        let mut members: Vec<Member> = state.members.values().cloned().collect();
        members.sort_by_key(|member| member.key);
        members
    }

    /// Every officer, ordered by natural key.
    pub async fn officers(&self) -> Vec<Officer> {
        let state = self.state.lock().await;
        let mut officers: Vec<Officer> = state.officers.values().cloned().collect();
        officers.sort_by_key(|officer| officer.key);
        officers
    }

    /// Every account, ordered by email.
    pub async fn accounts(&self) -> Vec<UserAccount> {
        let state = self.state.lock().await;
        let mut accounts: Vec<UserAccount> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        accounts
    }

    /// Journal entries in append order.
    pub async fn state_log(&self) -> Vec<StateLogEntry> {
        self.state.lock().await.state_log.clone()
    }
}

#[async_trait]
impl GroupRepository for InMemoryRoster {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self.state.lock().await.groups.get(&id).cloned())
    }

    async fn upsert(&self, upsert: GroupUpsert) -> Result<Upserted<Group>, GroupRepositoryError> {
        let mut state = self.state.lock().await;
        if let (Some(bhs_id), Some(kind)) = (upsert.bhs_id, upsert.kind) {
            let clash = state.groups.values().any(|group| {
                group.id != upsert.id && group.bhs_id == Some(bhs_id) && group.kind == Some(kind)
            });
            if clash {
                return Err(GroupRepositoryError::conflict("groups_bhs_id_kind_key"));
            }
        }
        let (value, created) = match state.groups.get_mut(&upsert.id) {
            Some(group) => {
                group.apply_upsert(upsert);
                (group.clone(), false)
            }
            None => {
                let group = Group::from_upsert(upsert);
                state.groups.insert(group.id, group.clone());
                (group, true)
            }
        };
        Ok(Upserted { value, created })
    }

    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, GroupRepositoryError> {
        let live: HashSet<&Uuid> = live_ids.iter().collect();
        let mut state = self.state.lock().await;
        let stale: Vec<Uuid> = state
            .groups
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in &stale {
            state.remove_group(*id);
        }
        Ok(stale.len())
    }

    async fn list_tree_nodes(&self) -> Result<Vec<TreeNode>, GroupRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .values()
            .map(|group| TreeNode {
                id: group.id,
                name: group.name.clone(),
                kind: group.kind,
                code: group.code.clone(),
                parent_id: group.parent_id,
            })
            .collect())
    }

    async fn replace_tree_sort(
        &self,
        assignments: &[(Uuid, i32)],
    ) -> Result<(), GroupRepositoryError> {
        let mut state = self.state.lock().await;
        for group in state.groups.values_mut() {
            group.tree_sort = None;
        }
        for (id, position) in assignments {
            if let Some(group) = state.groups.get_mut(id) {
                group.tree_sort = Some(*position);
            }
        }
        Ok(())
    }

    async fn list_active_quartets(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let state = self.state.lock().await;
        let mut quartets: Vec<Group> = state
            .groups
            .values()
            .filter(|group| {
                group.kind == Some(GroupKind::Quartet) && group.status == GroupStatus::Active
            })
            .cloned()
            .collect();
        quartets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(quartets)
    }

    async fn set_is_senior(&self, id: Uuid, is_senior: bool) -> Result<(), GroupRepositoryError> {
        if let Some(group) = self.state.lock().await.groups.get_mut(&id) {
            group.is_senior = is_senior;
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: GroupStatus) -> Result<(), GroupRepositoryError> {
        if let Some(group) = self.state.lock().await.groups.get_mut(&id) {
            group.status = status;
        }
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for InMemoryRoster {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, PersonRepositoryError> {
        Ok(self.state.lock().await.persons.get(&id).cloned())
    }

    async fn upsert(
        &self,
        upsert: PersonUpsert,
    ) -> Result<Upserted<Person>, PersonRepositoryError> {
        let mut state = self.state.lock().await;
        let (value, created) = match state.persons.get_mut(&upsert.id) {
            Some(person) => {
                person.apply_upsert(upsert);
                (person.clone(), false)
            }
            None => {
                let person = Person::from_upsert(upsert);
                state.persons.insert(person.id, person.clone());
                (person, true)
            }
        };
        Ok(Upserted { value, created })
    }

    async fn record_membership(
        &self,
        id: Uuid,
        status: Status,
        current_through: Option<NaiveDate>,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state.persons.get_mut(&id).map(|person| {
            person.status = status;
            person.current_through = current_through;
            person.clone()
        }))
    }

    async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, PersonRepositoryError> {
        let live: HashSet<&Uuid> = live_ids.iter().collect();
        let mut state = self.state.lock().await;
        let stale: Vec<Uuid> = state
            .persons
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in &stale {
            state.remove_person(*id);
        }
        Ok(stale.len())
    }

    async fn list_active_members_of(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Person>, PersonRepositoryError> {
        let state = self.state.lock().await;
        let mut persons: Vec<Person> = state
            .members
            .values()
            .filter(|member| member.key.group_id == group_id && member.status == Status::Active)
            .filter_map(|member| state.persons.get(&member.key.person_id).cloned())
            .collect();
        persons.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(persons)
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), PersonRepositoryError> {
        if let Some(person) = self.state.lock().await.persons.get_mut(&id) {
            person.status = status;
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryRoster {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, MemberRepositoryError> {
        Ok(self.state.lock().await.members.get(&id).cloned())
    }

    async fn upsert(
        &self,
        upsert: MemberUpsert,
    ) -> Result<Upserted<Member>, MemberRepositoryError> {
        let mut state = self.state.lock().await;
        let existing = state
            .members
            .values()
            .find(|member| member.key == upsert.key)
            .map(|member| member.id);
        let id = existing.unwrap_or_else(Uuid::new_v4);
        let member = Member::from_upsert(id, upsert);
        state.members.insert(id, member.clone());
        Ok(Upserted {
            value: member,
            created: existing.is_none(),
        })
    }

    async fn delete_orphans(
        &self,
        live_keys: &[MemberKey],
    ) -> Result<usize, MemberRepositoryError> {
        let live: HashSet<&MemberKey> = live_keys.iter().collect();
        let mut state = self.state.lock().await;
        let before = state.members.len();
        state.members.retain(|_, member| live.contains(&member.key));
        Ok(before - state.members.len())
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), MemberRepositoryError> {
        if let Some(member) = self.state.lock().await.members.get_mut(&id) {
            member.status = status;
        }
        Ok(())
    }
}

#[async_trait]
impl OfficerRepository for InMemoryRoster {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Officer>, OfficerRepositoryError> {
        Ok(self.state.lock().await.officers.get(&id).cloned())
    }

    async fn upsert(
        &self,
        upsert: OfficerUpsert,
    ) -> Result<Upserted<Officer>, OfficerRepositoryError> {
        let mut state = self.state.lock().await;
        let existing = state
            .officers
            .values()
            .find(|officer| officer.key == upsert.key)
            .map(|officer| officer.id);
        let id = existing.unwrap_or_else(Uuid::new_v4);
        let officer = Officer::from_upsert(id, upsert);
        state.officers.insert(id, officer.clone());
        Ok(Upserted {
            value: officer,
            created: existing.is_none(),
        })
    }

    async fn delete_orphans(
        &self,
        live_keys: &[OfficerKey],
    ) -> Result<usize, OfficerRepositoryError> {
        let live: HashSet<&OfficerKey> = live_keys.iter().collect();
        let mut state = self.state.lock().await;
        let before = state.officers.len();
        state.officers.retain(|_, officer| live.contains(&officer.key));
        Ok(before - state.officers.len())
    }

    async fn set_status(&self, id: Uuid, status: Status) -> Result<(), OfficerRepositoryError> {
        if let Some(officer) = self.state.lock().await.officers.get_mut(&id) {
            officer.status = status;
        }
        Ok(())
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryRoster {
    async fn upsert_by_email(
        &self,
        profile: AccountProfile,
    ) -> Result<UserAccount, UserAccountRepositoryError> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .entry(profile.email.clone())
            .or_insert_with(|| UserAccount {
                id: Uuid::new_v4(),
                email: profile.email.clone(),
                name: String::new(),
                first_name: String::new(),
                last_name: String::new(),
            });
        account.name = profile.name;
        account.first_name = profile.first_name;
        account.last_name = profile.last_name;
        Ok(account.clone())
    }

}

#[async_trait]
impl OwnerRepository for InMemoryRoster {
    async fn recompute_group_owners(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut state = self.state.lock().await;
        let owners = state.officer_accounts(group_id);
        let ids = owners.iter().copied().collect();
        state.group_owners.insert(group_id, owners);
        Ok(ids)
    }

    async fn recompute_person_owners(
        &self,
        person_id: Uuid,
    ) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let mut state = self.state.lock().await;
        let owners = state
            .persons
            .get(&person_id)
            .map(|person| state.accounts_for(std::iter::once(person.email.as_str())))
            .unwrap_or_default();
        let ids = owners.iter().copied().collect();
        state.person_owners.insert(person_id, owners);
        Ok(ids)
    }

    async fn group_owners(&self, group_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .group_owners
            .get(&group_id)
            .map(|owners| owners.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn person_owners(&self, person_id: Uuid) -> Result<Vec<Uuid>, OwnerRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .person_owners
            .get(&person_id)
            .map(|owners| owners.iter().copied().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StateLogRepository for InMemoryRoster {
    async fn append(&self, entry: StateLogEntry) -> Result<(), StateLogRepositoryError> {
        self.state.lock().await.state_log.push(entry);
        Ok(())
    }
}
