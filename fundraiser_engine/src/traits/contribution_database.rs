use thiserror::Error;

use crate::{
    db_types::{Contribution, NewContribution, OrderId, PaymentId},
    tally_objects::{HistoryPage, Pagination, TallySnapshot},
    traits::SettlementOutcome,
};

/// This trait defines the behaviour of record stores backing the fundraiser payment engine.
///
/// This behaviour includes:
/// * Persisting one contribution record per gateway order id.
/// * Guarded terminal-state transitions that are atomic per order id, so duplicate or racing gateway
///   callbacks resolve to exactly one applied transition.
/// * Aggregate reads (totals, ward breakdown, paginated history) over the successful subset only.
///   Reads never block writers; a snapshot may be stale by the time it is returned.
#[allow(async_fn_in_trait)]
pub trait ContributionDatabase {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores a new contribution record in `Created` status with the pending payment id sentinel.
    ///
    /// There is exactly one record per order id; a second insert for the same order id returns
    /// [`ContributionDbError::ContributionAlreadyExists`].
    async fn insert_contribution(
        &self,
        contribution: NewContribution,
        order_id: &OrderId,
    ) -> Result<Contribution, ContributionDbError>;

    /// Fetches the contribution record for the given gateway order id, if any.
    async fn fetch_contribution_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Contribution>, ContributionDbError>;

    /// Compare-and-set `Created → Success`, also recording the gateway payment id.
    ///
    /// The lookup-and-update is atomic with respect to other transitions on the same order id: of two
    /// concurrent calls, exactly one observes `Applied` and the other `AlreadySettled`.
    async fn mark_success(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<SettlementOutcome, ContributionDbError>;

    /// Compare-and-set `Created → Failed`, recording the gateway payment id when one was supplied.
    async fn mark_failed(
        &self,
        order_id: &OrderId,
        payment_id: Option<&PaymentId>,
    ) -> Result<SettlementOutcome, ContributionDbError>;

    /// Recomputes the aggregate totals over successful contributions.
    ///
    /// For a fixed snapshot of the store this is a pure function of the `Success` subset: pending and
    /// failed records never influence the result.
    async fn fetch_tally(&self) -> Result<TallySnapshot, ContributionDbError>;

    /// Fetches one page of successful contributions, newest first, in the redacted history projection.
    async fn fetch_history_page(&self, pagination: Pagination) -> Result<HistoryPage, ContributionDbError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), ContributionDbError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ContributionDbError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Cannot insert contribution, since one already exists for order {0}")]
    ContributionAlreadyExists(OrderId),
    #[error("No contribution found for order {0}")]
    ContributionNotFound(OrderId),
}

impl From<sqlx::Error> for ContributionDbError {
    fn from(e: sqlx::Error) -> Self {
        ContributionDbError::DatabaseError(e.to_string())
    }
}
