//! Fundraiser Payment Engine
//!
//! The fundraiser payment engine records contributions to a community fundraising drive and keeps the
//! running totals honest. This library contains the core logic for the engine. It is transport-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is
//!    the data types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`PaymentFlowApi`] and [`TallyApi`]). This provides the public-facing
//!    functionality of the engine. It is responsible for the contribution lifecycle (pending →
//!    success/failed, reconciled against the gateway's signed callback) and for the aggregate views the
//!    live dashboard renders. Specific backends need to implement the [`traits::ContributionDatabase`]
//!    trait in order to act as a backend for the fundraiser server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when a
//! contribution is created, paid, or fails. A simple hook system is used so that you can easily react to
//! these events, e.g. to push live updates to connected dashboards.
mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{tally_objects, PaymentFlowApi, PaymentFlowError, TallyApi};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
