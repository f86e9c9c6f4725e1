//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between row structs and domain types; every
//! reconcile rule lives in the domain services. Row structs (`models`) and
//! table definitions (`schema`) stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use roster_backend::outbound::persistence::{DbPool, DieselGroupRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::for_workers("postgres://localhost/roster", 4)).await?;
//! let groups = DieselGroupRepository::new(pool);
//! ```

mod diesel_group_repository;
mod diesel_member_repository;
mod diesel_officer_repository;
mod diesel_owner_repository;
mod diesel_person_repository;
mod diesel_state_log_repository;
mod diesel_user_account_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_member_repository::DieselMemberRepository;
pub use diesel_officer_repository::DieselOfficerRepository;
pub use diesel_owner_repository::DieselOwnerRepository;
pub use diesel_person_repository::DieselPersonRepository;
pub use diesel_state_log_repository::DieselStateLogRepository;
pub use diesel_user_account_repository::DieselUserAccountRepository;
pub use error_mapping::RepositoryError;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
