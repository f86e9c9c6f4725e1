//! Export contract over raw rows of the legacy membership database.
//!
//! [`LegacySnapshot`] holds the raw tables; its `export_*` methods apply the
//! liveness filters, cursor windows and per-key aggregation that turn those
//! rows into the flat [`super::source_records`] the reconcilers consume.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::source_records::{
    HumanRecord, JoinRecord, RoleRecord, StructureRecord, status_from_end_date,
};
use super::status::Status;

/// Structure kinds in export order. Parents precede children.
pub const STRUCTURE_TIERS: [&str; 6] = [
    "organization",
    "district",
    "group",
    "chapter",
    "chorus",
    "quartet",
];

/// Kinds whose enrolments end on the latest inactive date rather than the
/// latest subscription expiry.
const INACTIVE_DATE_KINDS: [&str; 2] = ["chorus", "chapter"];

/// Raw structure row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureRow {
    /// Exported columns.
    #[serde(flatten)]
    pub record: StructureRecord,
    /// Set when the structure was deleted.
    pub deleted_by_id: Option<String>,
    /// Last modification.
    pub modified: Option<DateTime<Utc>>,
}

/// Raw human row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanRow {
    /// Exported columns; `status` and `current_through` are recomputed.
    #[serde(flatten)]
    pub record: HumanRecord,
    /// Set when the human was merged into another.
    pub merged_id: Option<String>,
    /// Set when the human was deleted.
    pub deleted_by_id: Option<String>,
    /// Last modification.
    pub modified: Option<DateTime<Utc>>,
}

/// Raw subscription row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRow {
    /// Subscription id.
    pub id: Uuid,
    /// Subscriber.
    pub human_id: Uuid,
    /// Only editable subscriptions count towards membership expiry.
    #[serde(default)]
    pub items_editable: bool,
    /// Set when the subscription was deleted.
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
    /// Paid-through date.
    #[serde(default)]
    pub current_through: Option<NaiveDate>,
    /// Last modification.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Raw role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRow {
    /// Row id.
    pub id: Uuid,
    /// Role name.
    pub name: String,
    /// Role holder.
    pub human_id: Uuid,
    /// Structure the role belongs to.
    pub structure_id: Uuid,
    /// Start date.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End date.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Last modification.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Raw membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRow {
    /// Membership id.
    pub id: Uuid,
    /// Set when the membership was deleted.
    #[serde(default)]
    pub deleted_by_id: Option<String>,
    /// Last modification.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Raw join row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRow {
    /// Row id.
    pub id: Uuid,
    /// Structure joined.
    pub structure_id: Uuid,
    /// Membership the join belongs to.
    pub membership_id: Uuid,
    /// Subscription paying for the join.
    pub subscription_id: Uuid,
    /// Only paid joins count.
    #[serde(default)]
    pub paid: bool,
    /// Set when the join was deleted.
    #[serde(default)]
    pub deleted: Option<DateTime<Utc>>,
    /// Voice part token.
    #[serde(default)]
    pub part: Option<String>,
    /// Enrolment date.
    #[serde(default)]
    pub established_date: Option<NaiveDate>,
    /// Date the enrolment lapsed.
    #[serde(default)]
    pub inactive_date: Option<NaiveDate>,
    /// Last modification.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Every legacy table the export reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySnapshot {
    /// Structures.
    pub structures: Vec<StructureRow>,
    /// Humans.
    pub humans: Vec<HumanRow>,
    /// Subscriptions.
    pub subscriptions: Vec<SubscriptionRow>,
    /// Roles.
    pub roles: Vec<RoleRow>,
    /// Memberships.
    pub memberships: Vec<MembershipRow>,
    /// Joins.
    pub joins: Vec<JoinRow>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

fn touched(modified: Option<DateTime<Utc>>, cursor: Option<DateTime<Utc>>) -> bool {
    match cursor {
        None => true,
        Some(cursor) => modified.is_some_and(|modified| modified >= cursor),
    }
}

/// Latest date where any missing value wins, mirroring a descending sort with
/// nulls first.
fn latest_open_ended(dates: impl IntoIterator<Item = Option<NaiveDate>>) -> Option<NaiveDate> {
    let mut latest = None;
    for date in dates {
        let date = date?;
        latest = latest.max(Some(date));
    }
    latest
}

/// Latest present date; `None` only when every value is missing.
fn latest_present(dates: impl IntoIterator<Item = Option<NaiveDate>>) -> Option<NaiveDate> {
    dates.into_iter().flatten().max()
}

impl HumanRow {
    fn is_live(&self) -> bool {
        is_blank(self.merged_id.as_deref()) && is_blank(self.deleted_by_id.as_deref())
    }
}

impl StructureRow {
    fn is_live(&self) -> bool {
        is_blank(self.deleted_by_id.as_deref())
    }
}

impl LegacySnapshot {
    fn live_structures(&self) -> HashMap<Uuid, &StructureRow> {
        self.structures
            .iter()
            .filter(|row| row.is_live())
            .map(|row| (row.record.id, row))
            .collect()
    }

    fn live_humans(&self) -> HashMap<Uuid, &HumanRow> {
        self.humans
            .iter()
            .filter(|row| row.is_live())
            .map(|row| (row.record.id, row))
            .collect()
    }

    /// Live structures, tier by tier in [`STRUCTURE_TIERS`] order. Kinds
    /// outside the tiers are not exported.
    pub fn export_structures(&self, cursor: Option<DateTime<Utc>>) -> Vec<StructureRecord> {
        STRUCTURE_TIERS
            .iter()
            .flat_map(|tier| {
                self.structures.iter().filter(move |row| {
                    row.record.kind.as_deref() == Some(*tier)
                        && row.is_live()
                        && touched(row.modified, cursor)
                })
            })
            .map(|row| row.record.clone())
            .collect()
    }

    /// Live humans annotated with membership expiry and status.
    ///
    /// With a cursor, a human is exported when it or any of its
    /// subscriptions changed inside the window.
    pub fn export_humans(
        &self,
        cursor: Option<DateTime<Utc>>,
        today: NaiveDate,
    ) -> Vec<HumanRecord> {
        let epoch = NaiveDate::from_ymd_opt(1, 1, 1);
        let mut subscriptions: HashMap<Uuid, Vec<&SubscriptionRow>> = HashMap::new();
        for subscription in &self.subscriptions {
            subscriptions
                .entry(subscription.human_id)
                .or_default()
                .push(subscription);
        }

        self.humans
            .iter()
            .filter(|row| row.is_live())
            .filter_map(|row| {
                let owned = subscriptions
                    .get(&row.record.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let changed = touched(row.modified, cursor)
                    || owned.iter().any(|sub| touched(sub.modified, cursor));
                if !changed {
                    return None;
                }
                let current_through = owned
                    .iter()
                    .filter(|sub| sub.items_editable && sub.deleted.is_none())
                    .filter_map(|sub| sub.current_through)
                    .filter(|date| Some(*date) > epoch)
                    .max();
                let status = match current_through {
                    Some(date) if date >= today => Status::Active,
                    _ => Status::Inactive,
                };
                Some(HumanRecord {
                    status: Some(status),
                    current_through,
                    ..row.record.clone()
                })
            })
            .collect()
    }

    /// Roles aggregated per `(name, human, structure)`.
    pub fn export_roles(&self, cursor: Option<DateTime<Utc>>, today: NaiveDate) -> Vec<RoleRecord> {
        let structures = self.live_structures();
        let humans = self.live_humans();
        let mut grouped: BTreeMap<(String, Uuid, Uuid), Vec<&RoleRow>> = BTreeMap::new();
        for role in &self.roles {
            if !structures.contains_key(&role.structure_id)
                || !humans.contains_key(&role.human_id)
                || !touched(role.modified, cursor)
            {
                continue;
            }
            grouped
                .entry((role.name.clone(), role.human_id, role.structure_id))
                .or_default()
                .push(role);
        }

        grouped
            .into_iter()
            .map(|((name, human_id, structure_id), rows)| {
                let start_date = rows.iter().filter_map(|row| row.start_date).min();
                let end_date = latest_present(rows.iter().map(|row| row.end_date));
                RoleRecord {
                    name,
                    human_id,
                    structure_id,
                    start_date,
                    end_date,
                    status: status_from_end_date(end_date, today),
                }
            })
            .collect()
    }

    /// Paid enrolments aggregated per `(structure, human)`.
    pub fn export_joins(&self, cursor: Option<DateTime<Utc>>, today: NaiveDate) -> Vec<JoinRecord> {
        let structures = self.live_structures();
        let humans = self.live_humans();
        let memberships: HashMap<Uuid, &MembershipRow> = self
            .memberships
            .iter()
            .filter(|row| is_blank(row.deleted_by_id.as_deref()))
            .map(|row| (row.id, row))
            .collect();
        let subscriptions: HashMap<Uuid, &SubscriptionRow> = self
            .subscriptions
            .iter()
            .filter(|row| row.deleted.is_none())
            .map(|row| (row.id, row))
            .collect();
        let every_subscription: HashMap<Uuid, &SubscriptionRow> =
            self.subscriptions.iter().map(|row| (row.id, row)).collect();

        let mut all_rows: HashMap<(Uuid, Uuid), Vec<&JoinRow>> = HashMap::new();
        for join in &self.joins {
            if let Some(subscription) = every_subscription.get(&join.subscription_id) {
                all_rows
                    .entry((join.structure_id, subscription.human_id))
                    .or_default()
                    .push(join);
            }
        }

        let mut selected: BTreeMap<(Uuid, Uuid), Vec<&JoinRow>> = BTreeMap::new();
        for join in &self.joins {
            if !join.paid || join.deleted.is_some() {
                continue;
            }
            let (Some(membership), Some(subscription)) = (
                memberships.get(&join.membership_id),
                subscriptions.get(&join.subscription_id),
            ) else {
                continue;
            };
            if !structures.contains_key(&join.structure_id)
                || !humans.contains_key(&subscription.human_id)
            {
                continue;
            }
            let changed = touched(join.modified, cursor)
                || touched(membership.modified, cursor)
                || touched(subscription.modified, cursor);
            if changed {
                selected
                    .entry((join.structure_id, subscription.human_id))
                    .or_default()
                    .push(join);
            }
        }

        selected
            .into_iter()
            .map(|((structure_id, human_id), rows)| {
                let history = all_rows
                    .get(&(structure_id, human_id))
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let vocal_part = history
                    .iter()
                    .max_by_key(|row| row.modified)
                    .and_then(|row| row.part.clone());
                let start_date = rows.iter().filter_map(|row| row.established_date).min();
                let by_inactive_date = structures
                    .get(&structure_id)
                    .and_then(|row| row.record.kind.as_deref())
                    .is_some_and(|kind| INACTIVE_DATE_KINDS.contains(&kind));
                let end_date = if by_inactive_date {
                    latest_open_ended(history.iter().map(|row| row.inactive_date))
                } else {
                    latest_open_ended(history.iter().map(|row| {
                        every_subscription
                            .get(&row.subscription_id)
                            .and_then(|sub| sub.current_through)
                    }))
                };
                JoinRecord {
                    structure_id,
                    human_id,
                    vocal_part,
                    start_date,
                    end_date,
                    status: status_from_end_date(end_date, today),
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "legacy_export_tests.rs"]
mod tests;
