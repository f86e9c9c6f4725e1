//! Domain primitives, reconcilers and orchestration.
//!
//! Purpose: Define the canonical roster entities (groups, persons, members,
//! officers, user accounts), the token tables that map legacy source values
//! onto them, and the services that reconcile legacy exports into the
//! canonical store. Persistence and queueing live behind [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Group, Person, Member, Officer, UserAccount: canonical entities.
//! - GroupReconciler, PersonReconciler, OfficerReconciler, MemberReconciler:
//!   per-entity upsert and orphan deletion.
//! - OwnerSynchronizer: account upsert and owner recomputation.
//! - SyncPassService: full and windowed reconciliation passes.
//! - StatusTransitionService: journalled activate/deactivate.
//! - ReportService: roster and quartet projections.

mod coded_enum;

pub mod aic;
pub mod error;
pub mod group;
pub mod group_reconciler;
pub mod legacy_export;
pub mod member;
pub mod member_reconciler;
pub mod officer;
pub mod officer_reconciler;
pub mod owner_sync;
pub mod person;
pub mod person_reconciler;
pub mod ports;
pub mod reconcile_service;
pub mod reports;
pub mod seniority;
pub mod source_records;
pub mod status;
pub mod status_transitions;
pub mod sync_pass;
pub mod sync_window;
pub mod tokens;
pub mod tree_sort;
pub mod upserted;
pub mod user_account;

#[cfg(test)]
pub(crate) mod fixtures;

pub use self::aic::{AIC_ROSTER, aic_name};
pub use self::coded_enum::ParseCodedEnumError;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::group::{
    District, Division, Group, GroupContact, GroupGender, GroupKind, GroupStatus, GroupUpsert,
};
pub use self::group_reconciler::{GroupReconciler, resolve_group_name};
pub use self::legacy_export::{LegacySnapshot, STRUCTURE_TIERS};
pub use self::member::{Member, MemberKey, MemberUpsert};
pub use self::member_reconciler::{MemberReconciler, member_key};
pub use self::officer::{Office, Officer, OfficerKey, OfficerUpsert};
pub use self::officer_reconciler::{
    OfficerReconciler, merge_roles_by_office, office_for_role, officer_key,
};
pub use self::owner_sync::OwnerSynchronizer;
pub use self::person::{Person, PersonGender, PersonUpsert, VoicePart};
pub use self::person_reconciler::{PersonReconciler, person_upsert};
pub use self::reconcile_service::ReconcileService;
pub use self::reports::{QuartetRow, ReportService, RosterRow};
pub use self::seniority::{age_in_years, is_senior_quartet};
pub use self::source_records::{
    HumanRecord, JoinRecord, RoleRecord, StructureRecord, status_from_end_date,
};
pub use self::status::{
    EntityKind, StateLogEntry, Status, StatusEvent, StatusMachine, TransitionError,
};
pub use self::status_transitions::{StatusTransitionService, TransitionRequest};
pub use self::sync_pass::{Reconcilers, SyncPassService, SyncReport};
pub use self::sync_window::SyncWindow;
pub use self::tokens::Token;
pub use self::tree_sort::{TreeNode, compute_tree_sort};
pub use self::upserted::Upserted;
pub use self::user_account::{AccountProfile, UserAccount};
