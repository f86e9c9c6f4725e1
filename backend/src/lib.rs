//! Roster reconciliation backend.
//!
//! Reconciles a legacy membership export into a canonical roster of groups,
//! persons, officers and members. The [`domain`] module holds the entities,
//! reconcilers and orchestration behind ports; [`outbound`] provides the
//! Diesel, in-memory, JSON snapshot, queue and CSV adapters; [`app`] wires
//! them for the `roster-sync` binary.

pub mod app;
pub mod config;
pub mod domain;
pub mod outbound;
