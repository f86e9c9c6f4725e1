//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::{define_port_error, define_repository_error};

mod group_repository;
mod member_repository;
mod officer_repository;
mod owner_repository;
mod person_repository;
mod reconcile_command;
mod reconcile_queue;
mod source_export;
mod state_log_repository;
mod user_account_repository;

#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
#[cfg(test)]
pub use member_repository::MockMemberRepository;
pub use member_repository::{MemberRepository, MemberRepositoryError};
#[cfg(test)]
pub use officer_repository::MockOfficerRepository;
pub use officer_repository::{OfficerRepository, OfficerRepositoryError};
#[cfg(test)]
pub use owner_repository::MockOwnerRepository;
pub use owner_repository::{OwnerRepository, OwnerRepositoryError};
#[cfg(test)]
pub use person_repository::MockPersonRepository;
pub use person_repository::{PersonRepository, PersonRepositoryError};
#[cfg(test)]
pub use reconcile_command::MockReconcileCommand;
pub use reconcile_command::{ReconcileCommand, ReconcileOutcome};
#[cfg(test)]
pub use reconcile_queue::MockReconcileQueue;
pub use reconcile_queue::{
    DrainReport, JobFailure, ReconcileJob, ReconcileQueue, ReconcileQueueError,
};
#[cfg(test)]
pub use source_export::MockSourceExport;
pub use source_export::{SourceExport, SourceExportError};
#[cfg(test)]
pub use state_log_repository::MockStateLogRepository;
pub use state_log_repository::{StateLogRepository, StateLogRepositoryError};
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{UserAccountRepository, UserAccountRepositoryError};
