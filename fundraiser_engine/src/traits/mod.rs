//! The database abstraction the engine is built against.
//!
//! Backends implement [`ContributionDatabase`] to act as the record store for the fundraiser server.
//! The SQLite implementation lives in the `sqlite` module and is the default.
mod contribution_database;
mod data_objects;

pub use contribution_database::{ContributionDatabase, ContributionDbError};
pub use data_objects::SettlementOutcome;
