//! `SqliteDatabase` is a concrete implementation of a fundraiser payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`ContributionDatabase`] trait.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{contributions, new_pool};
use crate::{
    db_types::{Contribution, ContributionStatus, NewContribution, OrderId, PaymentId},
    tally_objects::{HistoryPage, Pagination, TallySnapshot},
    traits::{ContributionDatabase, ContributionDbError, SettlementOutcome},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool for the given database URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, ContributionDbError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Re-reads the record after a settlement attempt and classifies what actually happened.
    ///
    /// Called only when the guarded UPDATE affected no rows, so the record is either absent or already
    /// terminal.
    async fn classify_unapplied(
        &self,
        order_id: &OrderId,
        target: ContributionStatus,
    ) -> Result<SettlementOutcome, ContributionDbError> {
        let mut conn = self.pool.acquire().await?;
        let contribution = contributions::fetch_contribution_by_order_id(order_id, &mut conn)
            .await?
            .ok_or_else(|| ContributionDbError::ContributionNotFound(order_id.clone()))?;
        if contribution.status == target {
            Ok(SettlementOutcome::AlreadySettled(contribution))
        } else {
            Ok(SettlementOutcome::Conflict(contribution))
        }
    }
}

impl ContributionDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_contribution(
        &self,
        contribution: NewContribution,
        order_id: &OrderId,
    ) -> Result<Contribution, ContributionDbError> {
        let mut conn = self.pool.acquire().await?;
        let contribution = contributions::insert_contribution(contribution, order_id, &mut conn).await?;
        debug!("🗃️ Contribution for order [{order_id}] saved with id {}", contribution.id);
        Ok(contribution)
    }

    async fn fetch_contribution_by_order_id(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<Contribution>, ContributionDbError> {
        let mut conn = self.pool.acquire().await?;
        let contribution = contributions::fetch_contribution_by_order_id(order_id, &mut conn).await?;
        Ok(contribution)
    }

    async fn mark_success(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
    ) -> Result<SettlementOutcome, ContributionDbError> {
        let rows = {
            let mut conn = self.pool.acquire().await?;
            contributions::settle_success(order_id, payment_id, &mut conn).await?
        };
        if rows == 1 {
            let contribution = self
                .fetch_contribution_by_order_id(order_id)
                .await?
                .ok_or_else(|| ContributionDbError::ContributionNotFound(order_id.clone()))?;
            debug!("🗃️ Order [{order_id}] settled as successful with payment id {payment_id}");
            return Ok(SettlementOutcome::Applied(contribution));
        }
        self.classify_unapplied(order_id, ContributionStatus::Success).await
    }

    async fn mark_failed(
        &self,
        order_id: &OrderId,
        payment_id: Option<&PaymentId>,
    ) -> Result<SettlementOutcome, ContributionDbError> {
        let rows = {
            let mut conn = self.pool.acquire().await?;
            contributions::settle_failed(order_id, payment_id, &mut conn).await?
        };
        if rows == 1 {
            let contribution = self
                .fetch_contribution_by_order_id(order_id)
                .await?
                .ok_or_else(|| ContributionDbError::ContributionNotFound(order_id.clone()))?;
            debug!("🗃️ Order [{order_id}] settled as failed");
            return Ok(SettlementOutcome::Applied(contribution));
        }
        self.classify_unapplied(order_id, ContributionStatus::Failed).await
    }

    async fn fetch_tally(&self) -> Result<TallySnapshot, ContributionDbError> {
        let mut conn = self.pool.acquire().await?;
        let snapshot = contributions::fetch_tally(&mut conn).await?;
        Ok(snapshot)
    }

    async fn fetch_history_page(&self, pagination: Pagination) -> Result<HistoryPage, ContributionDbError> {
        let pagination = pagination.clamped();
        let mut conn = self.pool.acquire().await?;
        let total = contributions::count_successful(&mut conn).await?;
        let entries = contributions::fetch_history_entries(pagination.limit(), pagination.offset(), &mut conn).await?;
        let has_more = pagination.offset() + (entries.len() as i64) < total;
        Ok(HistoryPage {
            entries,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
            has_more,
        })
    }

    async fn close(&mut self) -> Result<(), ContributionDbError> {
        self.pool.close().await;
        Ok(())
    }
}
