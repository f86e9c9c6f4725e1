//! Group reconciliation from legacy structures, plus the group-wide
//! maintenance passes: orphan deletion, tree sort and senior refresh.

use std::sync::Arc;

use chrono::NaiveDate;
use normalization::{validate_email, validate_phone, validate_url};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::ports::{GroupRepository, PersonRepository};
use crate::domain::tokens::{
    district_token, division_token, group_gender_token, group_kind_token, group_status_token,
};
use crate::domain::{
    District, Error, Group, GroupContact, GroupGender, GroupKind, GroupStatus, GroupUpsert,
    StructureRecord, Upserted, aic_name, compute_tree_sort, is_senior_quartet,
};

/// Marker appended to a preferred name standing in for a missing name.
pub const NAME_PENDING_MARKER: &str = "(NAME APPROVAL PENDING)";
/// Name used when neither name nor preferred name is present.
pub const UNKNOWN_NAME: &str = "(UNKNOWN)";

/// Resolve the display name of a structure.
///
/// A trailing `", The"` moves to the front, an empty name falls back to the
/// preferred name marked as pending, and finally to `(UNKNOWN)`.
///
/// # Examples
/// ```
/// use roster_backend::domain::resolve_group_name;
///
/// assert_eq!(resolve_group_name(Some(" Harmonizers, The "), None), "The Harmonizers");
/// assert_eq!(
///     resolve_group_name(Some(""), Some("Vocal Four")),
///     "Vocal Four (NAME APPROVAL PENDING)"
/// );
/// assert_eq!(resolve_group_name(None, None), "(UNKNOWN)");
/// ```
pub fn resolve_group_name(name: Option<&str>, preferred_name: Option<&str>) -> String {
    let name = name.unwrap_or_default().trim();
    let name = match name.split_once(", The") {
        Some((head, _)) => format!("The {head}"),
        None => name.to_owned(),
    };
    if !name.is_empty() {
        return name;
    }
    let preferred = preferred_name.unwrap_or_default().trim();
    if preferred.is_empty() {
        UNKNOWN_NAME.to_owned()
    } else {
        format!("{preferred} {NAME_PENDING_MARKER}")
    }
}

fn text(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

fn normalise_contact(record: &StructureRecord) -> GroupContact {
    GroupContact {
        website: validate_url(text(record.website.as_ref())),
        email: validate_email(text(record.email.as_ref())),
        phone: validate_phone(text(record.phone.as_ref())),
        fax_phone: validate_phone(text(record.fax.as_ref())),
        facebook: validate_url(text(record.facebook.as_ref())),
        twitter: validate_url(text(record.twitter.as_ref())),
        youtube: validate_url(text(record.youtube.as_ref())),
        pinterest: validate_url(text(record.pinterest.as_ref())),
        flickr: validate_url(text(record.flickr.as_ref())),
        instagram: validate_url(text(record.instagram.as_ref())),
        soundcloud: validate_url(text(record.soundcloud.as_ref())),
    }
}

/// Reconciles structures into groups.
#[derive(Clone)]
pub struct GroupReconciler {
    groups: Arc<dyn GroupRepository>,
    people: Arc<dyn PersonRepository>,
    senior_reference_date: NaiveDate,
}

impl GroupReconciler {
    /// Create a reconciler. `senior_reference_date` anchors age calculations
    /// for senior quartet eligibility.
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        people: Arc<dyn PersonRepository>,
        senior_reference_date: NaiveDate,
    ) -> Self {
        Self {
            groups,
            people,
            senior_reference_date,
        }
    }

    /// Upsert the group matching a structure record.
    ///
    /// Unknown tokens never fail the upsert. An unresolvable parent is
    /// stored as `None`.
    pub async fn upsert_group(&self, record: &StructureRecord) -> Result<Upserted<Group>, Error> {
        if record.id.is_nil() {
            return Err(Error::invalid_request("structure record has a nil id"));
        }

        let mut name = resolve_group_name(record.name.as_deref(), record.preferred_name.as_deref());
        let mut status = group_status_token(record.status_id.as_deref())
            .logged("status")
            .unwrap_or(GroupStatus::New);
        if let Some(champion) = record.bhs_id.and_then(aic_name) {
            champion.clone_into(&mut name);
            status = GroupStatus::Aic;
        }

        let kind = group_kind_token(record.kind.as_deref()).logged("kind");
        let gender = group_gender_token(record.gender.as_deref())
            .logged("gender")
            .unwrap_or(GroupGender::Male);
        let division = division_token(record.division.as_deref()).logged("division");
        let code = record
            .chapter_code
            .as_deref()
            .unwrap_or_default()
            .to_owned();

        let parent = self.resolve_parent(record).await?;
        let district = self.resolve_district(parent.as_ref(), kind, &code).await?;

        let upsert = GroupUpsert {
            id: record.id,
            name,
            status,
            kind,
            gender,
            district,
            division,
            bhs_id: record.bhs_id,
            code,
            contact: normalise_contact(record),
            visitor_information: text(record.visitor_information.as_ref()).trim().to_owned(),
            start_date: record.established_date,
            parent_id: parent.map(|group| group.id),
        };
        let result = self.groups.upsert(upsert).await?;
        debug!(group_id = %result.value.id, created = result.created, "group reconciled");
        Ok(result)
    }

    async fn resolve_parent(&self, record: &StructureRecord) -> Result<Option<Group>, Error> {
        let Some(parent_id) = record.parent_id else {
            return Ok(None);
        };
        let parent = self.groups.find_by_id(parent_id).await?;
        if parent.is_none() {
            warn!(group_id = %record.id, parent_id = %parent_id, "parent group not found");
        }
        Ok(parent)
    }

    async fn resolve_district(
        &self,
        parent: Option<&Group>,
        kind: Option<GroupKind>,
        own_code: &str,
    ) -> Result<Option<District>, Error> {
        let Some(parent) = parent else {
            return Ok((kind == Some(GroupKind::International)).then_some(District::Bhs));
        };
        let code = match parent.kind {
            Some(GroupKind::International) => own_code.to_owned(),
            Some(GroupKind::District) => parent.code.clone(),
            Some(GroupKind::Chapter) => match parent.parent_id {
                Some(grandparent_id) => self
                    .groups
                    .find_by_id(grandparent_id)
                    .await?
                    .map(|grandparent| grandparent.code)
                    .unwrap_or_default(),
                None => String::new(),
            },
            _ => return Ok(None),
        };
        Ok(district_token(Some(&code)).logged("district"))
    }

    /// Delete groups absent from a full structure export.
    pub async fn delete_orphans(&self, live_ids: &[Uuid]) -> Result<usize, Error> {
        let deleted = self.groups.delete_orphans(live_ids).await?;
        info!(deleted, "group orphans deleted");
        Ok(deleted)
    }

    /// Recompute `tree_sort` for every group. Returns the number numbered.
    pub async fn sort_tree(&self) -> Result<usize, Error> {
        let nodes = self.groups.list_tree_nodes().await?;
        let assignments = compute_tree_sort(&nodes);
        if assignments.is_empty() && !nodes.is_empty() {
            warn!("no international root group; tree sort cleared");
        }
        self.groups.replace_tree_sort(&assignments).await?;
        info!(sorted = assignments.len(), "tree sort recomputed");
        Ok(assignments.len())
    }

    /// Whether a quartet qualifies as senior on the reference date.
    pub async fn get_is_senior(&self, group: &Group) -> Result<bool, Error> {
        if group.kind != Some(GroupKind::Quartet) {
            return Err(Error::invalid_request(format!(
                "group {} is not a quartet",
                group.id
            )));
        }
        let singers = self.people.list_active_members_of(group.id).await?;
        let birth_dates: Vec<_> = singers.iter().map(|person| person.birth_date).collect();
        Ok(is_senior_quartet(&birth_dates, self.senior_reference_date))
    }

    /// Recompute `is_senior` for every active quartet, persisting only
    /// changed values. Returns the number of groups updated.
    pub async fn refresh_seniors(&self) -> Result<usize, Error> {
        let quartets = self.groups.list_active_quartets().await?;
        let mut changed = 0;
        for quartet in &quartets {
            let is_senior = self.get_is_senior(quartet).await?;
            if is_senior != quartet.is_senior {
                self.groups.set_is_senior(quartet.id, is_senior).await?;
                changed += 1;
            }
        }
        info!(checked = quartets.len(), changed, "senior designations refreshed");
        Ok(changed)
    }
}

#[cfg(test)]
#[path = "group_reconciler_tests.rs"]
mod tests;
